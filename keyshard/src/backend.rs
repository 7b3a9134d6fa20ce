//! One-time curve backend initialization
//!
//! Arithmetic backends are pure code, but no key material should be handled
//! by a backend that has never demonstrated it computes correctly. A
//! [`Backend`] is an explicitly-owned gate around one curve: the first
//! [`initialize`](Backend::initialize) call runs the curve's known-answer
//! [self-test](crate::curve::CurveOps::self_test), and every later call
//! (or any number of concurrent calls) coalesces onto that single run.
//!
//! Passing the gate yields an [`Arithmetic`] handle, the only way to reach
//! the raw scalar/point operations. Code that is handed an [`Arithmetic`]
//! can rely on the backend being ready; there is no way to race ahead of a
//! half-initialized backend.
//!
//! ```rust,ignore
//! use keyshard::{backend::Backend, curve::Ed25519};
//!
//! static ED25519: Backend<Ed25519> = Backend::new();
//!
//! let arithmetic = ED25519.initialize()?;
//! let share = arithmetic.scalar_random(&mut rand_core::OsRng);
//! ```

use core::{fmt, marker::PhantomData};
use std::sync::OnceLock;

use generic_ec::{NonZero, Point, Scalar, SecretScalar};
use rand_core::{CryptoRng, RngCore};

use crate::curve::{CurveOps, InvalidSignature, SelfTestFailed};

/// Initialization gate for the backend of curve `C`
///
/// The gate is inert until the first [`initialize`](Self::initialize) call.
/// [`new`](Self::new) is `const`, so a gate can live in a `static` shared by
/// the whole process, or be constructed per test to exercise initialization
/// from a clean slate.
pub struct Backend<C: CurveOps> {
    state: OnceLock<Result<(), SelfTestFailed>>,
    _curve: PhantomData<C>,
}

impl<C: CurveOps> Backend<C> {
    /// Creates a gate in the uninitialized state
    pub const fn new() -> Self {
        Self {
            state: OnceLock::new(),
            _curve: PhantomData,
        }
    }

    /// Initializes the backend, returning the arithmetic handle
    ///
    /// The underlying self-test runs exactly once per gate, no matter how
    /// many callers race into this function; all of them observe the same
    /// outcome once the run completes.
    pub fn initialize(&self) -> Result<Arithmetic<C>, SelfTestFailed> {
        match self.state.get_or_init(C::self_test) {
            Ok(()) => Ok(Arithmetic(PhantomData)),
            Err(err) => Err(*err),
        }
    }

    /// Returns the arithmetic handle of an already-initialized backend
    ///
    /// Fails with [`NotInitialized`] until [`initialize`](Self::initialize)
    /// has completed successfully.
    pub fn handle(&self) -> Result<Arithmetic<C>, NotInitialized> {
        match self.state.get() {
            Some(Ok(())) => Ok(Arithmetic(PhantomData)),
            _ => Err(NotInitialized),
        }
    }

    /// Whether the self-test has already run and passed
    pub fn is_initialized(&self) -> bool {
        matches!(self.state.get(), Some(Ok(())))
    }
}

impl<C: CurveOps> Default for Backend<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: CurveOps> fmt::Debug for Backend<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Backend")
            .field("curve", &C::NAME)
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

/// Handle to an initialized curve backend
///
/// Exposes scalar and point arithmetic mod the curve's group order, plus
/// signature verification. Obtainable only through a [`Backend`] gate.
/// Every operation is a pure function: inputs are never mutated, results
/// are always fully reduced scalars or valid curve points.
#[derive(Debug, Clone, Copy)]
pub struct Arithmetic<C: CurveOps>(PhantomData<C>);

impl<C: CurveOps> Arithmetic<C> {
    /// Samples a uniformly random scalar in `[0, n)` from a
    /// cryptographically secure source
    pub fn scalar_random(&self, rng: &mut (impl RngCore + CryptoRng)) -> SecretScalar<C::Curve> {
        SecretScalar::random(rng)
    }

    /// Reduces a big-endian integer of any width mod the group order
    pub fn scalar_reduce(&self, bytes: &[u8]) -> Scalar<C::Curve> {
        Scalar::from_be_bytes_mod_order(bytes)
    }

    /// Additive inverse mod the group order
    pub fn scalar_negate(&self, x: &Scalar<C::Curve>) -> Scalar<C::Curve> {
        -*x
    }

    /// Multiplicative inverse mod the group order
    ///
    /// Zero has no inverse; inverting it is reported as [`NonInvertible`]
    /// rather than producing a garbage value.
    pub fn scalar_invert(&self, x: &Scalar<C::Curve>) -> Result<Scalar<C::Curve>, NonInvertible> {
        let x = NonZero::from_scalar(*x).ok_or(NonInvertible)?;
        Ok(*x.invert().as_ref())
    }

    /// `a + b` mod the group order
    pub fn scalar_add(&self, a: &Scalar<C::Curve>, b: &Scalar<C::Curve>) -> Scalar<C::Curve> {
        *a + *b
    }

    /// `a - b` mod the group order
    pub fn scalar_sub(&self, a: &Scalar<C::Curve>, b: &Scalar<C::Curve>) -> Scalar<C::Curve> {
        *a - *b
    }

    /// `a * b` mod the group order
    pub fn scalar_mul(&self, a: &Scalar<C::Curve>, b: &Scalar<C::Curve>) -> Scalar<C::Curve> {
        *a * *b
    }

    /// `x * G` where `G` is the curve's base point
    pub fn base_point_mul(&self, x: &Scalar<C::Curve>) -> Point<C::Curve> {
        Point::generator() * x
    }

    /// Sum of two curve points
    pub fn point_add(&self, a: &Point<C::Curve>, b: &Point<C::Curve>) -> Point<C::Curve> {
        *a + *b
    }

    /// Opens a signed message; see [`CurveOps::verify`]
    pub fn verify<'m>(
        &self,
        public_key: &Point<C::Curve>,
        signed_message: &'m [u8],
    ) -> Result<&'m [u8], InvalidSignature> {
        C::verify(public_key, signed_message)
    }
}

/// Backend has not been initialized yet
#[derive(Debug, Clone, Copy)]
pub struct NotInitialized;

impl fmt::Display for NotInitialized {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("curve backend is not initialized")
    }
}

impl std::error::Error for NotInitialized {}

/// Attempted to invert the zero scalar
#[derive(Debug, Clone, Copy)]
pub struct NonInvertible;

impl fmt::Display for NonInvertible {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("zero scalar has no multiplicative inverse")
    }
}

impl std::error::Error for NonInvertible {}
