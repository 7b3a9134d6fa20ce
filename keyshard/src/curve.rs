//! Curve capability interface
//!
//! Every protocol in this crate (secret sharing, root key generation,
//! child derivation) is written once, generic over [`CurveOps`]. A
//! [`CurveOps`] implementation binds a concrete curve together with its
//! native byte encodings, its signature scheme and the constants that key
//! material of that curve is tagged with.
//!
//! Out of the box, two curves are provided:
//! * [`Ed25519`], requires the `curve-ed25519` feature: EdDSA-style
//!   signing, used by Solana-, Cardano- and similar chains
//! * [`Secp256k1`], requires the `curve-secp256k1` feature: ECDSA-style
//!   signing, used by Bitcoin- and Ethereum-style chains

use core::fmt;

use generic_ec::{
    errors::{InvalidPoint, InvalidScalar},
    NonZero, Point, Scalar, SecretScalar,
};

#[cfg(feature = "curve-ed25519")]
mod ed25519;
#[cfg(feature = "curve-secp256k1")]
mod secp256k1;

#[cfg(feature = "curve-ed25519")]
pub use ed25519::Ed25519;
#[cfg(feature = "curve-secp256k1")]
pub use secp256k1::Secp256k1;

/// Size of a chain code in bytes
pub const CHAIN_CODE_SIZE: usize = 32;

/// Size of a signature in bytes: both supported schemes use 64-byte
/// signatures (`R ‖ s` for EdDSA, compact `r ‖ s` for ECDSA)
pub const SIGNATURE_SIZE: usize = 64;

/// Determines an underlying curve and the set of curve-specific encodings
/// and primitives used by the protocols in this crate
///
/// Implementations are zero-sized types; all state lives in the values they
/// operate on. The one stateful concern, one-time backend initialization,
/// is handled by [`Backend`](crate::backend::Backend).
pub trait CurveOps: Sized + Clone + Copy + fmt::Debug {
    /// Name of the curve
    const NAME: &'static str;

    /// Underlying curve providing scalar and point arithmetic
    type Curve: generic_ec::Curve;

    /// Size of a serialized scalar in bytes
    const SCALAR_SIZE: usize;
    /// Size of a serialized point in bytes
    const POINT_SIZE: usize;

    /// ASCII tag that prefixes a serialized private root key
    ///
    /// Must be distinct from every other prefix in the system, including
    /// [`PUBLIC_KEY_PREFIX`](Self::PUBLIC_KEY_PREFIX) and the prefixes of
    /// other curves.
    const PRIVATE_KEY_PREFIX: &'static str;
    /// ASCII tag that prefixes a serialized public root key
    const PUBLIC_KEY_PREFIX: &'static str;

    /// HMAC key used to turn a seed into root key material
    const SEED_SALT: &'static [u8];

    /// Byte array that contains bytes representation of the point
    type PointBytes: AsRef<[u8]>;
    /// Serializes a point in the curve's native (compressed) encoding
    fn serialize_point(point: &Point<Self::Curve>) -> Self::PointBytes;
    /// Deserializes a point
    fn deserialize_point(bytes: &[u8]) -> Result<Point<Self::Curve>, InvalidPoint>;

    /// Byte array that contains bytes representation of the scalar
    type ScalarBytes: AsRef<[u8]>;
    /// Serializes a scalar in the curve's native byte order
    fn serialize_scalar(scalar: &Scalar<Self::Curve>) -> Self::ScalarBytes;
    /// Deserializes a scalar
    fn deserialize_scalar(bytes: &[u8]) -> Result<Scalar<Self::Curve>, InvalidScalar>;
    /// Deserializes a secret scalar
    fn deserialize_secret_scalar(bytes: &[u8]) -> Result<SecretScalar<Self::Curve>, InvalidScalar> {
        let mut scalar = Self::deserialize_scalar(bytes)?;
        Ok(SecretScalar::new(&mut scalar))
    }

    /// Opens a signed message with the curve's native signature scheme
    ///
    /// `signed_message` is the [`SIGNATURE_SIZE`]-byte signature followed by
    /// the message. On success, returns the message. A wrong key, a
    /// malformed signature or a tampered message all fail with
    /// [`InvalidSignature`]; the message is never handed out unverified.
    fn verify<'m>(
        public_key: &Point<Self::Curve>,
        signed_message: &'m [u8],
    ) -> Result<&'m [u8], InvalidSignature>;

    /// Known-answer check of the backend arithmetic and codecs
    ///
    /// Run once per backend by [`Backend::initialize`](crate::backend::Backend::initialize)
    /// before any key material is handled.
    fn self_test() -> Result<(), SelfTestFailed> {
        let one = Scalar::<Self::Curve>::one();
        let two = one + one;

        let generator = Point::<Self::Curve>::generator() * one;
        if generator.is_zero() || generator + generator != Point::generator() * two {
            return Err(SelfTestFailed);
        }

        let point_bytes = Self::serialize_point(&generator);
        if point_bytes.as_ref().len() != Self::POINT_SIZE
            || !matches!(Self::deserialize_point(point_bytes.as_ref()), Ok(p) if p == generator)
        {
            return Err(SelfTestFailed);
        }
        let scalar_bytes = Self::serialize_scalar(&two);
        if scalar_bytes.as_ref().len() != Self::SCALAR_SIZE
            || !matches!(Self::deserialize_scalar(scalar_bytes.as_ref()), Ok(s) if s == two)
        {
            return Err(SelfTestFailed);
        }

        match NonZero::from_scalar(two) {
            Some(two_nonzero) => {
                if two_nonzero.invert() * two != one {
                    return Err(SelfTestFailed);
                }
            }
            None => return Err(SelfTestFailed),
        }

        Ok(())
    }
}

/// Signature verification failed
#[derive(Debug, Clone, Copy)]
pub struct InvalidSignature;

impl fmt::Display for InvalidSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid signature")
    }
}

impl std::error::Error for InvalidSignature {}

/// Curve backend failed its known-answer self-test
#[derive(Debug, Clone, Copy)]
pub struct SelfTestFailed;

impl fmt::Display for SelfTestFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("curve backend failed its arithmetic self-test")
    }
}

impl std::error::Error for SelfTestFailed {}
