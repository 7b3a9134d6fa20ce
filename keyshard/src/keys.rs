//! Root keys and their textual encoding
//!
//! A root key pair is the anchor of a derivation tree: a secret scalar (or
//! its public point) plus a chain code. Root keys travel between systems as
//! self-describing ASCII strings,
//! `<prefix><hex key material><hex chain code>`, with curve- and
//! kind-specific prefixes, so a key can never be mistaken for one of the
//! wrong curve or kind. [`RootKey`] is the parsed form; strings are decoded
//! and encoded only at this boundary.

use core::{fmt, str};

use generic_ec::{NonZero, Scalar, SecretScalar};
use hmac::Mac as _;
use rand_core::{CryptoRng, RngCore};

use crate::{
    curve::{CurveOps, CHAIN_CODE_SIZE},
    hd::{split_into_two_halves, ChainCode, ExtendedKeyPair, ExtendedPublicKey, ExtendedSecretKey, HmacSha512},
};

/// Smallest accepted seed, in bytes
pub const MIN_SEED_SIZE: usize = 16;
/// Largest accepted seed, in bytes
pub const MAX_SEED_SIZE: usize = 64;

/// Size of the seed drawn internally by [`generate_root_key`]
const RANDOM_SEED_SIZE: usize = 32;

/// Generates a fresh root key pair
///
/// Draws a seed from `rng` and derives the pair from it, so generated and
/// [seed-derived](root_key_from_seed) root keys are built identically.
pub fn generate_root_key<C: CurveOps>(
    rng: &mut (impl RngCore + CryptoRng),
) -> ExtendedKeyPair<C::Curve> {
    let mut seed = [0u8; RANDOM_SEED_SIZE];
    rng.fill_bytes(&mut seed);
    master_key_from_seed::<C>(&seed)
}

/// Derives the root key pair determined by `seed`
///
/// The same seed bytes always produce the same pair. The seed must carry
/// real entropy: anything shorter than [`MIN_SEED_SIZE`] (or longer than
/// [`MAX_SEED_SIZE`]) is rejected with [`InvalidSeed`].
pub fn root_key_from_seed<C: CurveOps>(
    seed: &[u8],
) -> Result<ExtendedKeyPair<C::Curve>, InvalidSeed> {
    if !(MIN_SEED_SIZE..=MAX_SEED_SIZE).contains(&seed.len()) {
        return Err(InvalidSeed);
    }
    Ok(master_key_from_seed::<C>(seed))
}

/// Serializes both halves of a root key pair
///
/// Returns the private and the public encoding, in that order. The chain
/// code is carried verbatim in both, so derivation started from either
/// string stays consistent.
pub fn encode_root_keys<C: CurveOps>(pair: &ExtendedKeyPair<C::Curve>) -> (String, String) {
    (
        RootKey::<C>::Private(pair.secret_key().clone()).to_string(),
        RootKey::<C>::Public(*pair.public_key()).to_string(),
    )
}

fn master_key_from_seed<C: CurveOps>(seed: &[u8]) -> ExtendedKeyPair<C::Curve> {
    #[allow(clippy::expect_used)]
    let mut i = HmacSha512::new_from_slice(C::SEED_SALT)
        .expect("this never fails: hmac can handle keys of any size")
        .chain_update(seed)
        .finalize()
        .into_bytes();

    loop {
        let (i_left, i_right) = split_into_two_halves(&i);

        if let Ok(mut secret_key) = Scalar::<C::Curve>::from_be_bytes(i_left) {
            if NonZero::from_scalar(secret_key).is_some() {
                return ExtendedKeyPair::from(ExtendedSecretKey {
                    secret_key: SecretScalar::new(&mut secret_key),
                    chain_code: (*i_right).into(),
                });
            }
        }

        #[allow(clippy::expect_used)]
        {
            i = HmacSha512::new_from_slice(C::SEED_SALT)
                .expect("this never fails: hmac can handle keys of any size")
                .chain_update(&i)
                .finalize()
                .into_bytes();
        }
    }
}

/// Root key parsed from its textual form
///
/// The tag tells private and public roots apart; downstream code matches on
/// the variant and never needs to look at prefix strings again.
#[derive(Clone, Debug)]
pub enum RootKey<C: CurveOps> {
    /// Private root: secret scalar + chain code
    Private(ExtendedSecretKey<C::Curve>),
    /// Public root: public point + chain code
    Public(ExtendedPublicKey<C::Curve>),
}

impl<C: CurveOps> str::FromStr for RootKey<C> {
    type Err = InvalidKeyFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(payload) = s.strip_prefix(C::PRIVATE_KEY_PREFIX) {
            let (key, chain_code) = decode_payload(payload, C::SCALAR_SIZE)?;
            let secret_key =
                C::deserialize_secret_scalar(&key).map_err(|_| InvalidKeyFormat)?;
            Ok(RootKey::Private(ExtendedSecretKey {
                secret_key,
                chain_code,
            }))
        } else if let Some(payload) = s.strip_prefix(C::PUBLIC_KEY_PREFIX) {
            let (key, chain_code) = decode_payload(payload, C::POINT_SIZE)?;
            let public_key = C::deserialize_point(&key).map_err(|_| InvalidKeyFormat)?;
            Ok(RootKey::Public(ExtendedPublicKey {
                public_key,
                chain_code,
            }))
        } else {
            Err(InvalidKeyFormat)
        }
    }
}

impl<C: CurveOps> fmt::Display for RootKey<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RootKey::Private(key) => write!(
                f,
                "{}{}{}",
                C::PRIVATE_KEY_PREFIX,
                hex::encode(C::serialize_scalar(key.secret_key.as_ref())),
                hex::encode(key.chain_code),
            ),
            RootKey::Public(key) => write!(
                f,
                "{}{}{}",
                C::PUBLIC_KEY_PREFIX,
                hex::encode(C::serialize_point(&key.public_key)),
                hex::encode(key.chain_code),
            ),
        }
    }
}

/// Decodes `<hex key material><hex chain code>` where the key material is
/// `key_size` bytes long. Hex is accepted in either case.
fn decode_payload(payload: &str, key_size: usize) -> Result<(Vec<u8>, ChainCode), InvalidKeyFormat> {
    if payload.len() != 2 * (key_size + CHAIN_CODE_SIZE) {
        return Err(InvalidKeyFormat);
    }
    let mut bytes = hex::decode(payload).map_err(|_| InvalidKeyFormat)?;
    let chain_code = ChainCode::try_from(&bytes[key_size..]).map_err(|_| InvalidKeyFormat)?;
    bytes.truncate(key_size);
    Ok((bytes, chain_code))
}

/// Seed does not satisfy the curve's validity requirements
#[derive(Debug, Clone, Copy)]
pub struct InvalidSeed;

impl fmt::Display for InvalidSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Invalid seed")
    }
}

impl std::error::Error for InvalidSeed {}

/// String is not a validly encoded root key
///
/// Unknown prefix, wrong payload length, non-hex payload and non-canonical
/// key material all collapse into this one error: callers get a stable
/// message, and the error text never echoes attacker-controlled input.
#[derive(Debug, Clone, Copy)]
pub struct InvalidKeyFormat;

impl fmt::Display for InvalidKeyFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Invalid key format")
    }
}

impl std::error::Error for InvalidKeyFormat {}
