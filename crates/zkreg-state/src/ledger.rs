//! Native-currency balances keyed by address.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use zkreg_core::{Address, ClaimError};

/// A whole-balance move that already passed its overflow check.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreparedTransfer {
    from: Address,
    to: Address,
    amount: u128,
    credited: u128,
}

impl PreparedTransfer {
    pub fn amount(&self) -> u128 {
        self.amount
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    balances: BTreeMap<Address, u128>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `amount` to `account` and return the new balance.
    pub fn deposit(&mut self, account: Address, amount: u128) -> Result<u128, ClaimError> {
        let balance = self.balances.entry(account).or_insert(0);
        *balance = balance
            .checked_add(amount)
            .ok_or(ClaimError::BalanceOverflow { account })?;
        Ok(*balance)
    }

    pub fn balance_of(&self, account: &Address) -> u128 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Check that the whole balance of `from` can move to `to`.
    pub fn prepare_transfer_all(&self, from: &Address, to: Address) -> Result<PreparedTransfer, ClaimError> {
        let amount = self.balance_of(from);
        let credited = if amount == 0 || *from == to {
            self.balance_of(&to)
        } else {
            self.balance_of(&to)
                .checked_add(amount)
                .ok_or(ClaimError::BalanceOverflow { account: to })?
        };
        Ok(PreparedTransfer {
            from: *from,
            to,
            amount,
            credited,
        })
    }

    /// Apply a transfer prepared against this ledger with no mutation in
    /// between. Returns the amount moved, which may be zero.
    pub fn apply_transfer(&mut self, transfer: PreparedTransfer) -> u128 {
        if transfer.amount == 0 || transfer.from == transfer.to {
            return transfer.amount;
        }
        self.balances.remove(&transfer.from);
        self.balances.insert(transfer.to, transfer.credited);
        transfer.amount
    }

    /// Sum of all balances, saturating.
    pub fn total(&self) -> u128 {
        self.balances.values().fold(0u128, |acc, v| acc.saturating_add(*v))
    }
}
