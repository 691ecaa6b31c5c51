//! Events recorded by committed claims.

use std::fmt;

use serde::{Deserialize, Serialize};

use zkreg_core::{Address, IdentityNode, Nullifier};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ClaimEvent {
    AccountSwept {
        node: IdentityNode,
        nullifier: Nullifier,
        account: Address,
        target: Address,
        amount: u128,
    },
    TextRecordLinked {
        node: IdentityNode,
        nullifier: Nullifier,
        ens_name: String,
    },
    NameClaimed {
        node: IdentityNode,
        nullifier: Nullifier,
        name: String,
        owner: Address,
    },
}

impl ClaimEvent {
    pub fn node(&self) -> IdentityNode {
        match self {
            Self::AccountSwept { node, .. }
            | Self::TextRecordLinked { node, .. }
            | Self::NameClaimed { node, .. } => *node,
        }
    }

    pub fn nullifier(&self) -> Nullifier {
        match self {
            Self::AccountSwept { nullifier, .. }
            | Self::TextRecordLinked { nullifier, .. }
            | Self::NameClaimed { nullifier, .. } => *nullifier,
        }
    }
}

impl fmt::Display for ClaimEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AccountSwept {
                account,
                target,
                amount,
                ..
            } => write!(f, "swept {amount} from {account} to {target}"),
            Self::TextRecordLinked { node, ens_name, .. } => {
                write!(f, "linked {node} to {ens_name}")
            }
            Self::NameClaimed { name, owner, .. } => write!(f, "claimed {name} for {owner}"),
        }
    }
}
