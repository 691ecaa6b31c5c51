//! Single-use nullifier set. Entries are never removed.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use zkreg_core::{ClaimError, Nullifier};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NullifierGuard {
    used: BTreeSet<Nullifier>,
}

impl NullifierGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `nullifier`, or fail with [`ClaimError::NullifierReused`].
    pub fn consume(&mut self, nullifier: Nullifier) -> Result<(), ClaimError> {
        if !self.used.insert(nullifier) {
            return Err(ClaimError::NullifierReused(nullifier));
        }
        Ok(())
    }

    /// Fail with [`ClaimError::NullifierReused`] if `nullifier` was consumed.
    pub fn ensure_unused(&self, nullifier: &Nullifier) -> Result<(), ClaimError> {
        if self.is_used(nullifier) {
            return Err(ClaimError::NullifierReused(*nullifier));
        }
        Ok(())
    }

    pub fn is_used(&self, nullifier: &Nullifier) -> bool {
        self.used.contains(nullifier)
    }

    pub fn len(&self) -> usize {
        self.used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }
}
