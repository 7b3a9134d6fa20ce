//! Seed-addressed child keys
//!
//! Deterministically maps an arbitrary seed string to a child of a root
//! key, so that cooperating parties can agree on "the key for
//! `user-4711`" by exchanging nothing but the seed string. The seed is
//! double-SHA-256 hashed and the digest split into two non-hardened child
//! indexes; derivation then walks `m/999999/I1/I2` from the root. The
//! leading `999999` level fences all seed-addressed keys into their own
//! sub-tree, so they can never collide with keys derived under any other
//! path convention.
//!
//! Because every step is non-hardened, a party holding only the public
//! root computes exactly the public half of what a party holding the
//! private root computes; no private material ever needs to move.

use digest::Digest;

use crate::{
    curve::CurveOps,
    hd::{self, NonHardenedIndex},
    keys::{InvalidKeyFormat, RootKey},
};

/// Sub-tree level reserved for seed-addressed keys
pub const SEED_SUBTREE_INDEX: u32 = 999_999;

/// Key derived from a root key and a seed string
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DerivedKey {
    /// Hex-encoded derived key: scalar followed by chain code when derived
    /// from a private root, public point alone when derived from a public
    /// root
    pub key: String,
    /// Path the key was derived at, `m/999999/<I1>/<I2>`
    pub derivation_path: String,
}

/// Derives the child key addressed by `seed` from a serialized root key
///
/// `root_key` is either a private or a public root key in its textual
/// form; the kind of the derived key follows the kind of the root. For the
/// same `(root_key, seed)` the result is always identical, and the public
/// key derived from a public root equals the public half of the key
/// derived from the matching private root.
pub fn derive_key_with_seed<C: CurveOps>(
    root_key: &str,
    seed: &str,
) -> Result<DerivedKey, InvalidKeyFormat> {
    let root: RootKey<C> = root_key.parse()?;
    let (index_1, index_2) = seed_indexes(seed);
    let path = [NonHardenedIndex(SEED_SUBTREE_INDEX), index_1, index_2];

    let key = match root {
        RootKey::Private(root) => {
            let mut pair = hd::ExtendedKeyPair::from(root);
            for index in path {
                pair = hd::derive_child_key_pair(&pair, index);
            }
            let child = pair.secret_key();
            let mut key = hex::encode(C::serialize_scalar(child.secret_key.as_ref()));
            key.push_str(&hex::encode(child.chain_code));
            key
        }
        RootKey::Public(root) => {
            let mut child = root;
            for index in path {
                child = hd::derive_child_public_key(&child, index);
            }
            hex::encode(C::serialize_point(&child.public_key))
        }
    };

    Ok(DerivedKey {
        key,
        derivation_path: format!("m/{SEED_SUBTREE_INDEX}/{index_1}/{index_2}"),
    })
}

/// Maps a seed string to its pair of child indexes
///
/// The indexes are the integer values of the first seven and the next
/// seven hex digits of `SHA-256(SHA-256(seed))`. Seven hex digits make a
/// 28-bit value, so both indexes always land in the non-hardened range.
fn seed_indexes(seed: &str) -> (NonHardenedIndex, NonHardenedIndex) {
    let digest = sha2::Sha256::digest(sha2::Sha256::digest(seed.as_bytes()));

    let index_1 = u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]) >> 4;
    let index_2 = u32::from_be_bytes([digest[3], digest[4], digest[5], digest[6]]) & 0x0fff_ffff;

    (NonHardenedIndex(index_1), NonHardenedIndex(index_2))
}
