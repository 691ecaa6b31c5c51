//! # Name Registry
//!
//! The registry and resolver capabilities a name-claiming registrar drives,
//! modelled on ENS:
//!
//! - [`NameRegistry`] tracks node ownership and each node's resolver. Only
//!   the owner of a parent may create or reassign its subnodes.
//! - [`ResolverConfig`] stores the address record of a node. The node owner,
//!   or a delegate the owner approved for that node, may set it.
//!
//! [`InMemoryEns`] implements both over plain maps.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use zkreg_core::{Address, ClaimError, IdentityNode};
use zkreg_crypto::subnode;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    #[error("{caller} does not own node {node}")]
    NotOwner { caller: Address, node: IdentityNode },

    #[error("{caller} may not set records of node {node}")]
    NotAuthorized { caller: Address, node: IdentityNode },
}

impl From<NameError> for ClaimError {
    fn from(err: NameError) -> Self {
        ClaimError::InsufficientAuthorization(err.to_string())
    }
}

pub trait NameRegistry {
    /// Create or reassign `label` under `parent`. Returns the subnode.
    fn set_subnode_owner(
        &mut self,
        caller: &Address,
        parent: &IdentityNode,
        label: &str,
        owner: Address,
    ) -> Result<IdentityNode, NameError>;

    fn set_resolver(
        &mut self,
        caller: &Address,
        node: &IdentityNode,
        resolver: Address,
    ) -> Result<(), NameError>;

    /// Transfer `node` to `owner`.
    fn set_owner(
        &mut self,
        caller: &Address,
        node: &IdentityNode,
        owner: Address,
    ) -> Result<(), NameError>;

    fn owner(&self, node: &IdentityNode) -> Option<Address>;

    fn resolver(&self, node: &IdentityNode) -> Option<Address>;
}

pub trait ResolverConfig {
    fn set_addr(
        &mut self,
        caller: &Address,
        node: &IdentityNode,
        addr: Address,
    ) -> Result<(), NameError>;

    /// Let `delegate` manage `node`'s records on behalf of `caller`.
    fn approve(&mut self, caller: &Address, node: &IdentityNode, delegate: Address, approved: bool);

    fn addr(&self, node: &IdentityNode) -> Option<Address>;

    fn is_approved(&self, owner: &Address, node: &IdentityNode, delegate: &Address) -> bool;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InMemoryEns {
    owners: BTreeMap<IdentityNode, Address>,
    resolvers: BTreeMap<IdentityNode, Address>,
    addrs: BTreeMap<IdentityNode, Address>,
    approvals: BTreeSet<(Address, IdentityNode, Address)>,
}

impl InMemoryEns {
    /// A registry whose root node is owned by `root_owner`.
    pub fn new(root_owner: Address) -> Self {
        let mut ens = Self::default();
        ens.owners.insert(IdentityNode::ZERO, root_owner);
        ens
    }

    /// Walk `name` from the root as `caller`, creating each label. Every
    /// intermediate node stays with `caller`; the last goes to `owner`.
    pub fn register_name(
        &mut self,
        caller: &Address,
        name: &str,
        owner: Address,
    ) -> Result<IdentityNode, NameError> {
        let labels: Vec<&str> = name.rsplit('.').collect();
        let mut node = IdentityNode::ZERO;
        for (i, label) in labels.iter().enumerate() {
            let next_owner = if i + 1 == labels.len() { owner } else { *caller };
            node = self.set_subnode_owner(caller, &node, label, next_owner)?;
        }
        Ok(node)
    }

    fn require_owner(&self, caller: &Address, node: &IdentityNode) -> Result<(), NameError> {
        if self.owners.get(node) == Some(caller) {
            Ok(())
        } else {
            Err(NameError::NotOwner {
                caller: *caller,
                node: *node,
            })
        }
    }
}

impl NameRegistry for InMemoryEns {
    fn set_subnode_owner(
        &mut self,
        caller: &Address,
        parent: &IdentityNode,
        label: &str,
        owner: Address,
    ) -> Result<IdentityNode, NameError> {
        self.require_owner(caller, parent)?;
        let node = subnode(parent, label);
        self.owners.insert(node, owner);
        Ok(node)
    }

    fn set_resolver(
        &mut self,
        caller: &Address,
        node: &IdentityNode,
        resolver: Address,
    ) -> Result<(), NameError> {
        self.require_owner(caller, node)?;
        self.resolvers.insert(*node, resolver);
        Ok(())
    }

    fn set_owner(
        &mut self,
        caller: &Address,
        node: &IdentityNode,
        owner: Address,
    ) -> Result<(), NameError> {
        self.require_owner(caller, node)?;
        self.owners.insert(*node, owner);
        Ok(())
    }

    fn owner(&self, node: &IdentityNode) -> Option<Address> {
        self.owners.get(node).copied()
    }

    fn resolver(&self, node: &IdentityNode) -> Option<Address> {
        self.resolvers.get(node).copied()
    }
}

impl ResolverConfig for InMemoryEns {
    fn set_addr(
        &mut self,
        caller: &Address,
        node: &IdentityNode,
        addr: Address,
    ) -> Result<(), NameError> {
        let authorized = match self.owners.get(node) {
            Some(owner) => owner == caller || self.is_approved(owner, node, caller),
            None => false,
        };
        if !authorized {
            return Err(NameError::NotAuthorized {
                caller: *caller,
                node: *node,
            });
        }
        self.addrs.insert(*node, addr);
        Ok(())
    }

    fn approve(&mut self, caller: &Address, node: &IdentityNode, delegate: Address, approved: bool) {
        let key = (*caller, *node, delegate);
        if approved {
            self.approvals.insert(key);
        } else {
            self.approvals.remove(&key);
        }
    }

    fn addr(&self, node: &IdentityNode) -> Option<Address> {
        self.addrs.get(node).copied()
    }

    fn is_approved(&self, owner: &Address, node: &IdentityNode, delegate: &Address) -> bool {
        self.approvals.contains(&(*owner, *node, *delegate))
    }
}
