//! # zkreg-state — Claim State
//!
//! The mutable side of the registrar. Every type here is a plain value with
//! no interior mutability. Fallible checks take `&self` and hand back a
//! prepared change (such as a [`PreparedTransfer`]) that applies without
//! failing, so a registrar can validate a whole claim before mutating.
//!
//! - **Nullifiers** (`nullifier.rs`): the grow-only set of consumed
//!   nullifiers.
//! - **Ledger** (`ledger.rs`): balances keyed by address. Funds may arrive
//!   before the receiving account is deployed.
//! - **Accounts** (`account.rs`): the node-indexed arena of custodial
//!   accounts and their CREATE2 address prediction.
//! - **Text records** (`records.rs`): node to linked ENS name.
//! - **Names** (`names.rs`): the [`NameRegistry`] and [`ResolverConfig`]
//!   capabilities, with an in-memory implementation of both.
//!
//! ## Crate Policy
//!
//! - Authorization failures are [`ClaimError::InsufficientAuthorization`],
//!   never panics.
//! - Nothing in this crate verifies proofs. Callers gate every mutation.
//!
//! [`ClaimError::InsufficientAuthorization`]: zkreg_core::ClaimError::InsufficientAuthorization

pub mod account;
pub mod ledger;
pub mod names;
pub mod nullifier;
pub mod records;

pub use account::{Account, AccountProvisioner, AccountState};
pub use ledger::{Ledger, PreparedTransfer};
pub use names::{InMemoryEns, NameError, NameRegistry, ResolverConfig};
pub use nullifier::NullifierGuard;
pub use records::{TextRecord, TextRecordStore};
