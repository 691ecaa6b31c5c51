//! # DKIM Key Registry
//!
//! In-memory [`DkimKeyOracle`]: a set of trusted
//! `(keccak256(domain), key_hash)` pairs behind a `parking_lot::RwLock`.
//! Share it through an `Arc` so an administrator can rotate keys while a
//! registrar holds a reference.

use std::collections::BTreeSet;

use parking_lot::RwLock;

use zkreg_core::{keccak256, Bytes32};

use crate::traits::DkimKeyOracle;

/// `keccak256` of the sender domain as it appears in the public inputs.
pub fn dkim_domain_hash(domain: &str) -> Bytes32 {
    Bytes32::new(keccak256(domain.as_bytes()))
}

#[derive(Debug, Default)]
pub struct DkimRegistry {
    keys: RwLock<BTreeSet<(Bytes32, Bytes32)>>,
}

impl DkimRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trust `key_hash` for `domain`. Returns `false` if it was already trusted.
    pub fn set_key(&self, domain: &str, key_hash: Bytes32) -> bool {
        let inserted = self.keys.write().insert((dkim_domain_hash(domain), key_hash));
        tracing::debug!(domain, key_hash = %key_hash, inserted, "DKIM key registered");
        inserted
    }

    /// Stop trusting `key_hash` for `domain`. Returns `false` if it was not trusted.
    pub fn revoke_key(&self, domain: &str, key_hash: &Bytes32) -> bool {
        let removed = self.keys.write().remove(&(dkim_domain_hash(domain), *key_hash));
        tracing::debug!(domain, key_hash = %key_hash, removed, "DKIM key revoked");
        removed
    }

    /// Number of trusted pairs.
    pub fn len(&self) -> usize {
        self.keys.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.read().is_empty()
    }
}

impl DkimKeyOracle for DkimRegistry {
    fn is_key_hash_valid(&self, domain_hash: &Bytes32, key_hash: &Bytes32) -> bool {
        self.keys.read().contains(&(*domain_hash, *key_hash))
    }
}
