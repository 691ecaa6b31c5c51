//! # zkreg-crypto — Hashing Constructions
//!
//! - **Name hashing** (`namehash.rs`): ENS `namehash`/`labelhash` and the
//!   canonicalization that maps a handle or email to its [`IdentityNode`].
//! - **Address prediction** (`create2.rs`): CREATE2 arithmetic over the
//!   EIP-1167 minimal-clone init code, used to compute a custodial account's
//!   address before it exists.
//!
//! Both are pure functions of their inputs. Keccak-256 comes from
//! `zkreg-core::digest`; the CREATE2 formula itself is `ethers-core`'s.
//!
//! [`IdentityNode`]: zkreg_core::IdentityNode

pub mod create2;
pub mod namehash;

pub use create2::{clone_init_code, create2_address, predict_clone_address};
pub use namehash::{
    canonical_label, identity_node, labelhash, namehash, subnode, EMAIL_AT_SENTINEL,
};
