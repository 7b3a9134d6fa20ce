//! Non-hardened hierarchical key derivation
//!
//! BIP32-style child derivation generalized to every curve this crate
//! supports. Only the non-hardened half of the tree exists here: a child
//! key must be computable from the parent *public* key alone, because in a
//! multi-party deployment no single machine ever holds the combined private
//! key; each party derives against the shared public root and applies the
//! resulting shift to its own share.
//!
//! Each derivation step feeds the parent chain code, the parent public
//! point and the child index through HMAC-SHA-512; the left half of the
//! output becomes an additive scalar shift, the right half the child chain
//! code. Adding the shift to the parent secret scalar and adding
//! `shift * G` to the parent public point land on the same child key, which
//! is what keeps the private and public derivation paths interchangeable.

use core::{fmt, num, ops, str};

use generic_array::{
    typenum::{U32, U64},
    GenericArray,
};
use generic_ec::{Curve, Point, Scalar, SecretScalar};
use hmac::Mac as _;

pub mod seeded;

pub(crate) type HmacSha512 = hmac::Hmac<sha2::Sha512>;

/// Beginning of hardened child indexes
///
/// Indexes `i` with `H <= i` address the hardened half of the tree, which
/// requires the parent private key and is never derived by this crate.
pub const H: u32 = 1 << 31;

/// Child index in range `0 <= i < 2^31`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(into = "u32"))]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(try_from = "u32"))]
pub struct NonHardenedIndex(u32);

/// Chain code of an extended key
///
/// Auxiliary bytes carried alongside a key that feed child derivation,
/// preventing children from being computable from the bare parent key.
pub type ChainCode = [u8; 32];

/// Extended public key
#[derive(Clone, Copy, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(bound = "")
)]
pub struct ExtendedPublicKey<E: Curve> {
    /// The public key that can be used for signature verification
    pub public_key: Point<E>,
    /// A chain code that is used to derive child keys
    pub chain_code: ChainCode,
}

/// Extended secret key
#[derive(Clone, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(bound = "")
)]
pub struct ExtendedSecretKey<E: Curve> {
    /// The secret key that can be used for signing
    pub secret_key: SecretScalar<E>,
    /// A chain code that is used to derive child keys
    pub chain_code: ChainCode,
}

/// Pair of extended secret and public keys
#[derive(Clone, Debug)]
pub struct ExtendedKeyPair<E: Curve> {
    public_key: ExtendedPublicKey<E>,
    secret_key: ExtendedSecretKey<E>,
}

/// A shift that can be applied to a parent key to obtain a child key
///
/// Contains the already-derived child public key, as deriving it is part of
/// calculating the shift.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(bound = "")
)]
pub struct DerivedShift<E: Curve> {
    /// Additive shift from parent to child key
    pub shift: Scalar<E>,
    /// Derived child extended public key
    pub child_public_key: ExtendedPublicKey<E>,
}

impl NonHardenedIndex {
    /// The smallest possible index, `0`
    pub const MIN: Self = Self(0);
    /// The largest possible index, `2^31 - 1`
    pub const MAX: Self = Self(H - 1);
}

impl ops::Deref for NonHardenedIndex {
    type Target = u32;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TryFrom<u32> for NonHardenedIndex {
    type Error = IndexOutOfRange;
    fn try_from(value: u32) -> Result<Self, Self::Error> {
        if value < H {
            Ok(Self(value))
        } else {
            Err(IndexOutOfRange)
        }
    }
}

impl From<NonHardenedIndex> for u32 {
    fn from(value: NonHardenedIndex) -> Self {
        value.0
    }
}

impl str::FromStr for NonHardenedIndex {
    type Err = ParseIndexError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let index = s.parse::<u32>().map_err(ParseIndexError::ParseInt)?;
        NonHardenedIndex::try_from(index).map_err(ParseIndexError::OutOfRange)
    }
}

impl fmt::Display for NonHardenedIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl<E: Curve> From<&ExtendedSecretKey<E>> for ExtendedPublicKey<E> {
    fn from(sk: &ExtendedSecretKey<E>) -> Self {
        ExtendedPublicKey {
            public_key: Point::generator() * &sk.secret_key,
            chain_code: sk.chain_code,
        }
    }
}

impl<E: Curve> From<ExtendedSecretKey<E>> for ExtendedKeyPair<E> {
    fn from(secret_key: ExtendedSecretKey<E>) -> Self {
        Self {
            public_key: (&secret_key).into(),
            secret_key,
        }
    }
}

impl<E: Curve> ExtendedKeyPair<E> {
    /// Returns chain code of the key
    pub fn chain_code(&self) -> &ChainCode {
        debug_assert_eq!(self.public_key.chain_code, self.secret_key.chain_code);
        &self.public_key.chain_code
    }

    /// Returns extended public key
    pub fn public_key(&self) -> &ExtendedPublicKey<E> {
        &self.public_key
    }

    /// Returns extended secret key
    pub fn secret_key(&self) -> &ExtendedSecretKey<E> {
        &self.secret_key
    }
}

/// Derives the shift for a non-hardened child
///
/// Since only non-hardened indexes are accepted, the parent public key and
/// chain code fully determine the result: every party holding them computes
/// the same shift and the same child public key.
pub fn derive_public_shift<E: Curve>(
    parent_public_key: &ExtendedPublicKey<E>,
    child_index: NonHardenedIndex,
) -> DerivedShift<E> {
    // hmac keys of any size are fine, but chain codes are always 32 bytes
    #[allow(clippy::expect_used)]
    let hmac = HmacSha512::new_from_slice(&parent_public_key.chain_code)
        .expect("this never fails: hmac can handle keys of any size");
    let i = hmac
        .clone()
        .chain_update(parent_public_key.public_key.to_bytes(true))
        .chain_update(child_index.to_be_bytes())
        .finalize()
        .into_bytes();
    calculate_shift(&hmac, parent_public_key, child_index, i)
}

/// Derives a child extended public key from the parent extended public key
pub fn derive_child_public_key<E: Curve>(
    parent_public_key: &ExtendedPublicKey<E>,
    child_index: NonHardenedIndex,
) -> ExtendedPublicKey<E> {
    derive_public_shift(parent_public_key, child_index).child_public_key
}

/// Derives a child key pair (extended secret key + public key) from the
/// parent key pair
///
/// The child public key matches what [`derive_child_public_key`] computes
/// from the public half alone.
pub fn derive_child_key_pair<E: Curve>(
    parent_key: &ExtendedKeyPair<E>,
    child_index: NonHardenedIndex,
) -> ExtendedKeyPair<E> {
    let shift = derive_public_shift(&parent_key.public_key, child_index);
    let mut child_sk = &parent_key.secret_key.secret_key + shift.shift;
    let child_sk = SecretScalar::new(&mut child_sk);
    ExtendedKeyPair {
        secret_key: ExtendedSecretKey {
            secret_key: child_sk,
            chain_code: shift.child_public_key.chain_code,
        },
        public_key: shift.child_public_key,
    }
}

fn calculate_shift<E: Curve>(
    hmac: &HmacSha512,
    parent_public_key: &ExtendedPublicKey<E>,
    child_index: NonHardenedIndex,
    mut i: GenericArray<u8, U64>,
) -> DerivedShift<E> {
    loop {
        let (i_left, i_right) = split_into_two_halves(&i);

        if let Ok(shift) = Scalar::<E>::from_be_bytes(i_left) {
            let child_pk = parent_public_key.public_key + Point::generator() * shift;
            if !child_pk.is_zero() {
                return DerivedShift {
                    shift,
                    child_public_key: ExtendedPublicKey {
                        public_key: child_pk,
                        chain_code: (*i_right).into(),
                    },
                };
            }
        }

        i = hmac
            .clone()
            .chain_update([0x01])
            .chain_update(i_right)
            .chain_update(child_index.to_be_bytes())
            .finalize()
            .into_bytes()
    }
}

/// Splits array `I` of 64 bytes into two arrays `I_L = I[..32]` and
/// `I_R = I[32..]`
pub(crate) fn split_into_two_halves(
    i: &GenericArray<u8, U64>,
) -> (&GenericArray<u8, U32>, &GenericArray<u8, U32>) {
    generic_array::sequence::Split::split(i)
}

/// Index is not in the non-hardened range
#[derive(Debug, Clone, Copy)]
pub struct IndexOutOfRange;

impl fmt::Display for IndexOutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("index is not in the non-hardened range")
    }
}

impl std::error::Error for IndexOutOfRange {}

/// Failed to parse a child index
#[derive(Debug)]
pub enum ParseIndexError {
    /// Index is not an unsigned integer
    ParseInt(num::ParseIntError),
    /// Index is out of the non-hardened range
    OutOfRange(IndexOutOfRange),
}

impl fmt::Display for ParseIndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseIndexError::ParseInt(_) => f.write_str("index is not an unsigned integer"),
            ParseIndexError::OutOfRange(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl std::error::Error for ParseIndexError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseIndexError::ParseInt(err) => Some(err),
            ParseIndexError::OutOfRange(err) => Some(err),
        }
    }
}
