//! # Custodial Accounts
//!
//! Each identity node owns at most one custodial account: a minimal clone of
//! a shared implementation, deployed by the provisioner with the node as the
//! CREATE2 salt. The address is known before deployment, so funds can be
//! sent to an identity that has never claimed anything.
//!
//! ## Lifecycle
//!
//! ```text
//! Unclaimed ──ensure_deployed──▶ Deployed
//! ```
//!
//! Deployment is idempotent and never repeated. The provisioner is both
//! owner and operator of every account it deploys; only the operator may
//! sweep. A sweep is prepared before the account is deployed, so a claim
//! that fails its balance check deploys nothing.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use zkreg_core::{Address, ClaimError, IdentityNode};
use zkreg_crypto::predict_clone_address;

use crate::ledger::{Ledger, PreparedTransfer};

/// Deployment state of a node's account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountState {
    Unclaimed,
    Deployed,
}

impl fmt::Display for AccountState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unclaimed => write!(f, "UNCLAIMED"),
            Self::Deployed => write!(f, "DEPLOYED"),
        }
    }
}

/// A deployed custodial account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub node: IdentityNode,
    pub address: Address,
    pub implementation: Address,
    pub owner: Address,
    pub operator: Address,
}

impl Account {
    /// Fail unless `caller` operates this account.
    pub fn authorize(&self, caller: &Address) -> Result<(), ClaimError> {
        if *caller != self.operator {
            return Err(ClaimError::InsufficientAuthorization(format!(
                "{caller} is not the operator of account {}",
                self.address
            )));
        }
        Ok(())
    }
}

/// Node-indexed account arena plus the parameters of address prediction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountProvisioner {
    implementation: Address,
    provisioner: Address,
    accounts: BTreeMap<IdentityNode, Account>,
}

impl AccountProvisioner {
    /// `provisioner` deploys clones of `implementation`.
    pub fn new(implementation: Address, provisioner: Address) -> Self {
        Self {
            implementation,
            provisioner,
            accounts: BTreeMap::new(),
        }
    }

    pub fn implementation(&self) -> Address {
        self.implementation
    }

    pub fn provisioner(&self) -> Address {
        self.provisioner
    }

    /// The address `node`'s account has, or will have once deployed.
    pub fn predict_address(&self, node: &IdentityNode) -> Address {
        predict_clone_address(&self.implementation, &self.provisioner, node.as_bytes())
    }

    /// Deploy `node`'s account if it does not exist yet. Returns its address.
    pub fn ensure_deployed(&mut self, node: IdentityNode) -> Address {
        if let Some(account) = self.accounts.get(&node) {
            return account.address;
        }
        let address = self.predict_address(&node);
        self.accounts.insert(
            node,
            Account {
                node,
                address,
                implementation: self.implementation,
                owner: self.provisioner,
                operator: self.provisioner,
            },
        );
        tracing::debug!(node = %node, account = %address, "custodial account deployed");
        address
    }

    /// Prepare sweeping `node`'s account to `target` as its operator. An
    /// undeployed account is checked as the provisioner would deploy it.
    pub fn prepare_sweep(
        &self,
        node: &IdentityNode,
        ledger: &Ledger,
        target: Address,
    ) -> Result<PreparedTransfer, ClaimError> {
        let address = match self.accounts.get(node) {
            Some(account) => {
                account.authorize(&self.provisioner)?;
                account.address
            }
            None => self.predict_address(node),
        };
        ledger.prepare_transfer_all(&address, target)
    }

    pub fn account(&self, node: &IdentityNode) -> Option<&Account> {
        self.accounts.get(node)
    }

    pub fn state(&self, node: &IdentityNode) -> AccountState {
        if self.accounts.contains_key(node) {
            AccountState::Deployed
        } else {
            AccountState::Unclaimed
        }
    }

    pub fn deployed_count(&self) -> usize {
        self.accounts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IMPL: Address = Address::new([0x11; 20]);
    const PROVISIONER: Address = Address::new([0x22; 20]);
    const TARGET: Address = Address::new([0x33; 20]);

    fn node(b: u8) -> IdentityNode {
        IdentityNode::new([b; 32])
    }

    #[test]
    fn deployed_address_equals_prediction() {
        let mut p = AccountProvisioner::new(IMPL, PROVISIONER);
        let predicted = p.predict_address(&node(1));
        assert_eq!(p.state(&node(1)), AccountState::Unclaimed);
        assert_eq!(p.ensure_deployed(node(1)), predicted);
        assert_eq!(p.state(&node(1)), AccountState::Deployed);
        let account = p.account(&node(1)).unwrap();
        assert_eq!(account.address, predicted);
        assert_eq!(account.owner, PROVISIONER);
        assert_eq!(account.operator, PROVISIONER);
    }

    #[test]
    fn ensure_deployed_is_idempotent() {
        let mut p = AccountProvisioner::new(IMPL, PROVISIONER);
        let a = p.ensure_deployed(node(1));
        let b = p.ensure_deployed(node(1));
        assert_eq!(a, b);
        assert_eq!(p.deployed_count(), 1);
    }

    #[test]
    fn prediction_is_per_node() {
        let p = AccountProvisioner::new(IMPL, PROVISIONER);
        assert_ne!(p.predict_address(&node(1)), p.predict_address(&node(2)));
    }

    #[test]
    fn sweep_of_prefunded_balance() {
        let mut p = AccountProvisioner::new(IMPL, PROVISIONER);
        let mut ledger = Ledger::new();
        ledger.deposit(p.predict_address(&node(1)), 500).unwrap();
        let sweep = p.prepare_sweep(&node(1), &ledger, TARGET).unwrap();
        assert_eq!(p.state(&node(1)), AccountState::Unclaimed);
        p.ensure_deployed(node(1));
        assert_eq!(ledger.apply_transfer(sweep), 500);
        assert_eq!(ledger.balance_of(&TARGET), 500);
        let again = p.prepare_sweep(&node(1), &ledger, TARGET).unwrap();
        assert_eq!(ledger.apply_transfer(again), 0);
    }

    #[test]
    fn failed_sweep_deploys_nothing() {
        let p = AccountProvisioner::new(IMPL, PROVISIONER);
        let mut ledger = Ledger::new();
        ledger.deposit(p.predict_address(&node(1)), 1).unwrap();
        ledger.deposit(TARGET, u128::MAX).unwrap();
        assert_eq!(
            p.prepare_sweep(&node(1), &ledger, TARGET),
            Err(ClaimError::BalanceOverflow { account: TARGET })
        );
        assert_eq!(p.deployed_count(), 0);
    }

    #[test]
    fn only_operator_is_authorized() {
        let mut p = AccountProvisioner::new(IMPL, PROVISIONER);
        p.ensure_deployed(node(1));
        let account = p.account(&node(1)).unwrap();
        assert!(account.authorize(&PROVISIONER).is_ok());
        assert!(matches!(
            account.authorize(&TARGET),
            Err(ClaimError::InsufficientAuthorization(_))
        ));
    }

    #[test]
    fn state_display() {
        assert_eq!(AccountState::Deployed.to_string(), "DEPLOYED");
    }
}
