//! # Name Hashing
//!
//! ENS name hashing:
//!
//! ```text
//! namehash("")        = 0x00..00
//! namehash(l + "." + rest) = keccak256(namehash(rest) || keccak256(l))
//! ```
//!
//! Identities are canonicalized before hashing: ASCII case is folded and
//! the `@` of an email is replaced by [`EMAIL_AT_SENTINEL`], so
//! `TheZDev1` and `thezdev1` land on the same node, and
//! `alice@mail.com` becomes the name `alice$mail.com.<parent>`.

use zkreg_core::{keccak256, IdentityNode};

/// Character substituted for `@` when an email becomes a name label.
pub const EMAIL_AT_SENTINEL: char = '$';

/// `keccak256(label)`.
pub fn labelhash(label: &str) -> [u8; 32] {
    keccak256(label.as_bytes())
}

/// ENS namehash of a dot-separated name.
pub fn namehash(name: &str) -> [u8; 32] {
    let mut node = [0u8; 32];
    if name.is_empty() {
        return node;
    }
    for label in name.rsplit('.') {
        node = child_node(&node, label);
    }
    node
}

/// The node of `label` directly under `parent`.
pub fn subnode(parent: &IdentityNode, label: &str) -> IdentityNode {
    IdentityNode::new(child_node(parent.as_bytes(), label))
}

fn child_node(parent: &[u8; 32], label: &str) -> [u8; 32] {
    let mut buf = [0u8; 64];
    buf[..32].copy_from_slice(parent);
    buf[32..].copy_from_slice(&labelhash(label));
    keccak256(&buf)
}

/// Case-fold an identity and replace `@` with the sentinel.
pub fn canonical_label(identity: &str) -> String {
    identity
        .to_ascii_lowercase()
        .replace('@', &EMAIL_AT_SENTINEL.to_string())
}

/// The node a claimed identity resolves to under `parent_domain`.
pub fn identity_node(identity: &str, parent_domain: &str) -> IdentityNode {
    let label = canonical_label(identity);
    let parent = parent_domain.to_ascii_lowercase();
    let name = if parent.is_empty() {
        label
    } else {
        format!("{label}.{parent}")
    };
    IdentityNode::new(namehash(&name))
}
