//! # CREATE2 Address Prediction
//!
//! A custodial account is a minimal clone (EIP-1167) of a shared
//! implementation, deployed by the provisioner with the identity node as salt:
//!
//! ```text
//! init_code = 3d602d80600a3d3981f3363d3d373d3d3d363d73 || impl || 5af43d82803e903d91602b57fd5bf3
//! address   = keccak256(0xff || deployer || salt || keccak256(init_code))[12..]
//! ```
//!
//! The result depends only on (implementation, deployer, salt), so it can be
//! computed and funded before anything is deployed.

use zkreg_core::{keccak256, Address};

const CLONE_PREFIX: [u8; 20] = [
    0x3d, 0x60, 0x2d, 0x80, 0x60, 0x0a, 0x3d, 0x39, 0x81, 0xf3, 0x36, 0x3d, 0x3d, 0x37, 0x3d, 0x3d,
    0x3d, 0x36, 0x3d, 0x73,
];

const CLONE_SUFFIX: [u8; 15] = [
    0x5a, 0xf4, 0x3d, 0x82, 0x80, 0x3e, 0x90, 0x3d, 0x91, 0x60, 0x2b, 0x57, 0xfd, 0x5b, 0xf3,
];

/// EIP-1167 creation code for a clone of `implementation`.
pub fn clone_init_code(implementation: &Address) -> Vec<u8> {
    let mut code = Vec::with_capacity(CLONE_PREFIX.len() + 20 + CLONE_SUFFIX.len());
    code.extend_from_slice(&CLONE_PREFIX);
    code.extend_from_slice(implementation.as_bytes());
    code.extend_from_slice(&CLONE_SUFFIX);
    code
}

/// CREATE2 address for `deployer`, `salt`, and the hash of the init code.
pub fn create2_address(deployer: &Address, salt: &[u8; 32], init_code_hash: &[u8; 32]) -> Address {
    let deployer = ethers_core::types::Address::from(*deployer.as_bytes());
    let created = ethers_core::utils::get_create2_address_from_hash(deployer, salt, init_code_hash);
    Address::new(created.0)
}

/// Address of the clone of `implementation` that `deployer` creates with `salt`.
pub fn predict_clone_address(implementation: &Address, deployer: &Address, salt: &[u8; 32]) -> Address {
    let init_hash = keccak256(&clone_init_code(implementation));
    create2_address(deployer, salt, &init_hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create2_eip1014_vector() {
        let init_hash = keccak256(&[0x00]);
        let addr = create2_address(&Address::ZERO, &[0u8; 32], &init_hash);
        let expected: Address = "0x4D1A2e2bB4F88F0250f26Ffff098B0b30B26BF38".parse().unwrap();
        assert_eq!(addr, expected);
    }

    #[test]
    fn clone_init_code_layout() {
        let implementation = Address::new([0xaa; 20]);
        let code = clone_init_code(&implementation);
        assert_eq!(code.len(), 55);
        assert_eq!(&code[20..40], &[0xaa; 20]);
        assert_eq!(hex::encode(&code[..20]), "3d602d80600a3d3981f3363d3d373d3d3d363d73");
    }

    #[test]
    fn prediction_depends_on_every_input() {
        let a = Address::new([1; 20]);
        let b = Address::new([2; 20]);
        let base = predict_clone_address(&a, &b, &[3; 32]);
        assert_eq!(base, predict_clone_address(&a, &b, &[3; 32]));
        assert_ne!(base, predict_clone_address(&b, &b, &[3; 32]));
        assert_ne!(base, predict_clone_address(&a, &a, &[3; 32]));
        assert_ne!(base, predict_clone_address(&a, &b, &[4; 32]));
    }
}
