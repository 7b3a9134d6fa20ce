//! Threshold secret sharing over a curve's scalar field
//!
//! [`split`] breaks a secret scalar into `n` shares such that any
//! `threshold` of them reconstruct it via [`combine`], while any smaller
//! subset reveals nothing about the secret: the polynomial coefficients are
//! drawn fresh and uniformly at random on every call, so the construction
//! is information-theoretically hiding below the threshold.
//!
//! Shares are indexed by the nonzero x-coordinate they were evaluated at.
//! The share map produced by [`split`] guarantees distinct indices; keep
//! them distinct when shares travel between parties, as two shares with the
//! same index are one share.

use core::{fmt, num::NonZeroU16};
use std::collections::BTreeMap;

use generic_ec::{NonZero, Scalar, SecretScalar};
use rand_core::{CryptoRng, RngCore};

use crate::curve::CurveOps;

/// Index of a share: the x-coordinate the sharing polynomial was evaluated
/// at. Zero is unrepresentable, as the polynomial at zero *is* the secret.
pub type ShareIndex = NonZeroU16;

/// Splits `secret` into `share_count` shares, any `threshold` of which
/// reconstruct it
///
/// Shares are indexed `1..=share_count`. Requires `2 <= threshold` and
/// `threshold <= share_count`.
pub fn split<C: CurveOps>(
    secret: &SecretScalar<C::Curve>,
    threshold: u16,
    share_count: u16,
    rng: &mut (impl RngCore + CryptoRng),
) -> Result<BTreeMap<ShareIndex, SecretScalar<C::Curve>>, InvalidThreshold> {
    if threshold < 2 {
        return Err(InvalidThreshold(ThresholdReason::LessThanTwo));
    }
    if threshold > share_count {
        return Err(InvalidThreshold(ThresholdReason::ExceedsShareCount));
    }

    // f(x) = secret + a_1 x + ... + a_{threshold-1} x^{threshold-1}
    let coefficients = (1..threshold)
        .map(|_| SecretScalar::<C::Curve>::random(rng))
        .collect::<Vec<_>>();

    let mut shares = BTreeMap::new();
    for index in (1..=share_count).filter_map(ShareIndex::new) {
        let x = index_to_scalar::<C>(index);
        let mut y = Scalar::<C::Curve>::zero();
        for coefficient in coefficients.iter().rev() {
            y = y * x + coefficient.as_ref();
        }
        y = y * x + secret.as_ref();
        shares.insert(index, SecretScalar::new(&mut y));
    }
    Ok(shares)
}

/// Reconstructs a secret from shares by Lagrange interpolation at zero
///
/// The share map does not carry the threshold it was split with, so this
/// function cannot tell a quorum from a non-quorum: handing it at least
/// `threshold` shares of the same [`split`] is the caller's obligation.
/// Given a real quorum, every qualifying subset reconstructs the same
/// secret. Fewer than two shares are rejected, as no secret worth sharing
/// is recoverable from one share.
pub fn combine<C: CurveOps>(
    shares: &BTreeMap<ShareIndex, SecretScalar<C::Curve>>,
) -> Result<SecretScalar<C::Curve>, CombineError> {
    if shares.len() < 2 {
        return Err(CombineError(CombineReason::TooFewShares));
    }

    let mut secret = Scalar::<C::Curve>::zero();
    for (index_i, y_i) in shares {
        let x_i = index_to_scalar::<C>(*index_i);

        // lambda_i = prod_{j != i} x_j / (x_j - x_i)
        let mut num = Scalar::<C::Curve>::one();
        let mut denom = NonZero::<Scalar<C::Curve>>::one();
        for index_j in shares.keys() {
            if index_j == index_i {
                continue;
            }
            let x_j = index_to_scalar::<C>(*index_j);
            let Some(difference) = NonZero::from_scalar(x_j - x_i) else {
                return Err(CombineError(CombineReason::IndicesNotDistinct));
            };
            num *= x_j;
            denom = denom * difference;
        }
        let lambda_i = num * denom.invert();

        secret = secret + lambda_i * y_i.as_ref();
    }
    Ok(SecretScalar::new(&mut secret))
}

/// Embeds a share index into the scalar field
///
/// Group orders of all supported curves exceed `u16::MAX`, so distinct
/// indices always map to distinct nonzero scalars.
fn index_to_scalar<C: CurveOps>(index: ShareIndex) -> Scalar<C::Curve> {
    Scalar::from(index.get())
}

/// Secret cannot be split with the requested threshold
#[derive(Debug)]
pub struct InvalidThreshold(ThresholdReason);

#[derive(Debug)]
enum ThresholdReason {
    LessThanTwo,
    ExceedsShareCount,
}

impl fmt::Display for InvalidThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            ThresholdReason::LessThanTwo => f.write_str("Threshold cannot be less than two"),
            ThresholdReason::ExceedsShareCount => {
                f.write_str("Threshold cannot be greater than the total number of shares")
            }
        }
    }
}

impl std::error::Error for InvalidThreshold {}

/// Shares cannot be combined
#[derive(Debug)]
pub struct CombineError(CombineReason);

#[derive(Debug)]
enum CombineReason {
    TooFewShares,
    IndicesNotDistinct,
}

impl fmt::Display for CombineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            CombineReason::TooFewShares => {
                f.write_str("at least two shares are required to reconstruct a secret")
            }
            CombineReason::IndicesNotDistinct => f.write_str("share indices are not distinct"),
        }
    }
}

impl std::error::Error for CombineError {}
