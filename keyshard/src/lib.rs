//! Curve-agnostic threshold key management
//!
//! Key-management core for multi-party wallets: the private key is split
//! into shares that never meet again on one machine, yet every party can
//! keep deriving consistent child keys. The same code serves EdDSA-style
//! and ECDSA-style curves; see the [curve] module for what a curve has to
//! provide.
//!
//! This crate provides:
//! * [Shamir secret sharing](shamir) over a curve's scalar field \
//!   Threshold split and combine of a secret scalar; what it produces is
//!   consumed as opaque input by an MPC/TSS signing engine of your choice.
//! * [Root key generation](keys) and a self-describing textual key format \
//!   Deterministic from a seed, or drawn fresh from caller-supplied
//!   randomness.
//! * [Non-hardened hierarchical derivation](hd), including
//!   [seed-addressed child keys](hd::seeded) \
//!   A party holding only the public root derives the same child public
//!   key that holders of the private root derive, without exchanging any
//!   private material.
//! * A [one-time initialization gate](backend) guarding the arithmetic
//!   backend of each curve.
//!
//! This crate doesn't provide:
//! * The signing protocol itself, or anything blockchain-specific:
//!   transaction building and wallet plumbing live upstream of this layer.
//!
//! ```rust,ignore
//! use keyshard::{backend::Backend, curve::Ed25519};
//!
//! let backend = Backend::<Ed25519>::new();
//! backend.initialize()?;
//!
//! let pair = keyshard::keys::generate_root_key::<Ed25519>(&mut rand_core::OsRng);
//! let (root_prv, root_pub) = keyshard::keys::encode_root_keys::<Ed25519>(&pair);
//!
//! // Any party can derive the same child public key from the public root
//! let child = keyshard::derive_key_with_seed::<Ed25519>(&root_pub, "account-1")?;
//! assert_eq!(child.derivation_path, "m/999999/186609219/241888734");
//! ```

#![forbid(unsafe_code, unused_crate_dependencies)]
#![deny(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub use generic_ec;

pub mod backend;
pub mod curve;
pub mod hd;
pub mod keys;
pub mod shamir;

pub use self::{
    backend::{Arithmetic, Backend},
    curve::CurveOps,
    hd::seeded::{derive_key_with_seed, DerivedKey},
};
