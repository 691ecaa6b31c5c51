//! Text records: the ENS name an identity node has linked.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use zkreg_core::{IdentityNode, Nullifier};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRecord {
    pub ens_name: String,
    /// The value a resolver serves for the record; the linked name itself.
    pub value: String,
    /// Nullifier of the command that wrote this record.
    pub nullifier: Nullifier,
}

impl TextRecord {
    pub fn new(ens_name: String, nullifier: Nullifier) -> Self {
        let value = ens_name.clone();
        Self {
            ens_name,
            value,
            nullifier,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRecordStore {
    records: BTreeMap<IdentityNode, TextRecord>,
}

impl TextRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite `node`'s record, returning the previous one.
    pub fn set(&mut self, node: IdentityNode, record: TextRecord) -> Option<TextRecord> {
        self.records.insert(node, record)
    }

    pub fn get(&self, node: &IdentityNode) -> Option<&TextRecord> {
        self.records.get(node)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_overwrites() {
        let mut store = TextRecordStore::new();
        let node = IdentityNode::new([1; 32]);
        assert!(store.set(node, TextRecord::new("a.eth".into(), Nullifier::new([1; 32]))).is_none());
        let previous = store
            .set(node, TextRecord::new("b.eth".into(), Nullifier::new([2; 32])))
            .unwrap();
        assert_eq!(previous.ens_name, "a.eth");
        assert_eq!(store.get(&node).unwrap().ens_name, "b.eth");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn value_is_the_linked_name() {
        let record = TextRecord::new("a.eth".into(), Nullifier::new([7; 32]));
        assert_eq!(record.value, "a.eth");
        assert_eq!(record.nullifier, Nullifier::new([7; 32]));
    }
}
