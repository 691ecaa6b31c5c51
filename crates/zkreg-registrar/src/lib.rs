//! # zkreg-registrar — Proof-Gated Registrar
//!
//! Ties verification and state together. A [`Registrar`] accepts a command,
//! consumes its nullifier, verifies it, derives the identity node, and hands
//! off to a [`ClaimStrategy`] for the side effect:
//!
//! - [`AccountSweep`]: deploy the node's custodial account if needed and
//!   sweep it to the commanded target.
//! - [`TextRecordLink`]: point the node's text record at an ENS name.
//! - [`NameClaim`]: create `<email>.<parent>` in the name registry and hand
//!   it to the commanded owner.
//!
//! ## Transactions
//!
//! A claim checks everything before it mutates anything. Strategies split
//! into a read-only `plan` and a `commit` that applies the plan, and the
//! nullifier is consumed only after the commit. A rejected claim leaves no
//! trace: the nullifier stays unused and no account is half-provisioned.
//! Committed events accumulate until drained with
//! [`Registrar::take_events`].

pub mod config;
pub mod event;
pub mod registrar;
pub mod strategy;

pub use config::{ConfigError, RegistrarConfig};
pub use event::ClaimEvent;
pub use registrar::{LinkRegistrar, NameRegistrar, Registrar, SweepRegistrar};
pub use strategy::{AccountSweep, ClaimContext, ClaimStrategy, NameClaim, NamePlan, TextRecordLink};
