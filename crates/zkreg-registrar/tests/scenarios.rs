//! End-to-end claim scenarios against the three registrar flavours, using
//! the mock proof verifier and an in-memory DKIM registry.

use std::sync::Arc;

use zkreg_core::{Address, Bytes32, ClaimError, Nullifier, ProofRejection};
use zkreg_state::{AccountState, InMemoryEns, NameRegistry, ResolverConfig};
use zkreg_zkp::{
    encode_command, ClaimEmailName, Command, CommandKind, DkimRegistry, LinkTextRecord,
    MockProofVerifier, PublicInputSet, WithdrawAll, WithdrawParams,
};
use zkreg_registrar::{
    ClaimEvent, LinkRegistrar, NameRegistrar, RegistrarConfig, SweepRegistrar,
};

const KEY_HASH: [u8; 32] = [0x0d; 32];
const REGISTRAR: Address = Address::new([0x10; 20]);
const IMPLEMENTATION: Address = Address::new([0x20; 20]);
const RESOLVER: Address = Address::new([0x30; 20]);
const ROOT: Address = Address::new([0x01; 20]);
const TARGET: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

type Sweep = SweepRegistrar<MockProofVerifier, Arc<DkimRegistry>>;
type Link = LinkRegistrar<MockProofVerifier, Arc<DkimRegistry>>;
type Names = NameRegistrar<InMemoryEns, MockProofVerifier, Arc<DkimRegistry>>;

fn target() -> Address {
    TARGET.parse().unwrap()
}

fn config(parent: &str) -> RegistrarConfig {
    RegistrarConfig::new(parent, REGISTRAR, IMPLEMENTATION).with_resolver(RESOLVER)
}

fn dkim(domain: &str) -> Arc<DkimRegistry> {
    let registry = Arc::new(DkimRegistry::new());
    registry.set_key(domain, Bytes32::new(KEY_HASH));
    registry
}

fn inputs(identity: &str, sender_domain: &str, masked: &str, nullifier: u8) -> PublicInputSet {
    PublicInputSet {
        domain_name: sender_domain.into(),
        public_key_hash: Bytes32::new(KEY_HASH),
        header_hash: Bytes32::new([0xab; 32]),
        nullifier: Nullifier::new([nullifier; 32]),
        timestamp: 1_720_000_000,
        masked_command: masked.into(),
        account_salt: Bytes32::ZERO,
        is_code_exist: false,
        auxiliary_key_hash: Bytes32::ZERO,
        claimed_identity: identity.into(),
        sender_domain: sender_domain.into(),
        prover_address: Address::ZERO,
    }
}

fn proven<K: CommandKind>(kind: &K, inputs: &PublicInputSet) -> Command<K::Params> {
    let fields = inputs.pack().unwrap();
    encode_command(kind, MockProofVerifier::new().prove(&fields), &fields).unwrap()
}

fn withdraw(identity: &str, nullifier: u8) -> Command<WithdrawParams> {
    proven(
        &WithdrawAll::new(),
        &inputs(identity, "x.com", &format!("Withdraw all eth to {TARGET}"), nullifier),
    )
}

fn sweep_registrar() -> (Sweep, Arc<DkimRegistry>) {
    let dkim = dkim("x.com");
    let registrar = SweepRegistrar::sweep(config("x.zk.eth"), MockProofVerifier::new(), Arc::clone(&dkim));
    (registrar, dkim)
}

// Scenario A: funds sent to the predicted address are swept on first claim.
#[test]
fn claim_deploys_and_sweeps_prefunded_account() {
    let (mut registrar, _) = sweep_registrar();
    let node = registrar.identity_node("thezdev1");
    let predicted = registrar.predict_address(&node);
    registrar.deposit(predicted, 1_000).unwrap();
    assert_eq!(registrar.account_state(&node), AccountState::Unclaimed);

    let raw = withdraw("thezdev1", 1).to_bytes().unwrap();
    let event = registrar.entrypoint(&raw).unwrap();

    assert_eq!(
        event,
        ClaimEvent::AccountSwept {
            node,
            nullifier: Nullifier::new([1; 32]),
            account: predicted,
            target: target(),
            amount: 1_000,
        }
    );
    assert_eq!(registrar.get_account(&node).unwrap().address, predicted);
    assert_eq!(registrar.balance_of(&predicted), 0);
    assert_eq!(registrar.balance_of(&target()), 1_000);
    assert!(registrar.is_nullifier_used(&Nullifier::new([1; 32])));
    assert_eq!(registrar.events().len(), 1);
}

// Scenario B: a replayed command is rejected and changes nothing.
#[test]
fn replay_is_rejected() {
    let (mut registrar, _) = sweep_registrar();
    let cmd = withdraw("thezdev1", 2);
    registrar.claim(&cmd).unwrap();
    let node = registrar.identity_node("thezdev1");
    registrar.deposit(registrar.predict_address(&node), 5).unwrap();

    assert_eq!(
        registrar.claim(&cmd),
        Err(ClaimError::NullifierReused(Nullifier::new([2; 32])))
    );
    assert_eq!(registrar.balance_of(&registrar.predict_address(&node)), 5);
    assert_eq!(registrar.events().len(), 1);
}

// Scenario C: case-equivalent handles share one account.
#[test]
fn case_equivalent_handles_share_an_account() {
    let (mut registrar, _) = sweep_registrar();
    assert_eq!(
        registrar.identity_node("TheZDev1"),
        registrar.identity_node("thezdev1")
    );

    let first = registrar.claim(&withdraw("TheZDev1", 3)).unwrap();
    let node = first.node();
    registrar.deposit(registrar.predict_address(&node), 40).unwrap();
    let second = registrar.claim(&withdraw("thezdev1", 4)).unwrap();

    assert_eq!(second.node(), node);
    assert!(matches!(second, ClaimEvent::AccountSwept { amount: 40, .. }));
    assert_eq!(registrar.strategy().provisioner.deployed_count(), 1);
}

// Scenario D: a target that differs from the proven command is rejected
// without consuming the nullifier or deploying anything.
#[test]
fn tampered_target_is_rejected_without_side_effects() {
    let (mut registrar, _) = sweep_registrar();
    let node = registrar.identity_node("thezdev1");
    registrar.deposit(registrar.predict_address(&node), 77).unwrap();

    let mut cmd = withdraw("thezdev1", 5);
    cmd.params.target = Address::new([0x66; 20]);
    assert_eq!(
        registrar.claim(&cmd),
        Err(ClaimError::ProofInvalid(ProofRejection::CommandMismatch))
    );
    assert!(!registrar.is_nullifier_used(&Nullifier::new([5; 32])));
    assert_eq!(registrar.account_state(&node), AccountState::Unclaimed);
    assert_eq!(registrar.balance_of(&registrar.predict_address(&node)), 77);

    // The untampered command with the same nullifier still goes through.
    let event = registrar.claim(&withdraw("thezdev1", 5)).unwrap();
    assert!(matches!(event, ClaimEvent::AccountSwept { amount: 77, .. }));
}

#[test]
fn revoked_dkim_key_is_rejected() {
    let (mut registrar, dkim) = sweep_registrar();
    dkim.revoke_key("x.com", &Bytes32::new(KEY_HASH));
    assert_eq!(
        registrar.claim(&withdraw("thezdev1", 6)),
        Err(ClaimError::DkimKeyInvalid {
            domain: "x.com".into()
        })
    );
    assert!(!registrar.is_nullifier_used(&Nullifier::new([6; 32])));
}

#[test]
fn garbage_bytes_are_a_format_error() {
    let (mut registrar, _) = sweep_registrar();
    assert!(matches!(
        registrar.entrypoint(b"not a command"),
        Err(ClaimError::Format(_))
    ));
}

#[test]
fn oversized_identity_is_a_format_error() {
    let (mut registrar, _) = sweep_registrar();
    let mut cmd = withdraw("thezdev1", 13);
    cmd.public_inputs.claimed_identity = "a".repeat(200);
    let raw = cmd.to_bytes().unwrap();
    assert!(matches!(
        registrar.entrypoint(&raw),
        Err(ClaimError::Format(_))
    ));
    assert!(!registrar.is_nullifier_used(&Nullifier::new([13; 32])));
}

#[test]
fn overflowing_sweep_leaves_no_trace() {
    let (mut registrar, _) = sweep_registrar();
    let node = registrar.identity_node("thezdev1");
    registrar.deposit(registrar.predict_address(&node), 1).unwrap();
    registrar.deposit(target(), u128::MAX).unwrap();

    assert_eq!(
        registrar.claim(&withdraw("thezdev1", 14)),
        Err(ClaimError::BalanceOverflow { account: target() })
    );
    assert!(!registrar.is_nullifier_used(&Nullifier::new([14; 32])));
    assert_eq!(registrar.account_state(&node), AccountState::Unclaimed);
    assert_eq!(registrar.balance_of(&registrar.predict_address(&node)), 1);
    assert!(registrar.events().is_empty());
}

#[test]
fn take_events_drains_the_log() {
    let (mut registrar, _) = sweep_registrar();
    registrar.claim(&withdraw("thezdev1", 15)).unwrap();
    registrar.claim(&withdraw("thezdev1", 16)).unwrap();

    let events = registrar.take_events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].nullifier(), Nullifier::new([15; 32]));
    assert!(registrar.events().is_empty());
    assert!(registrar.is_nullifier_used(&Nullifier::new([15; 32])));
}

#[test]
fn encode_produces_claimable_bytes() {
    let (mut registrar, _) = sweep_registrar();
    let fields = inputs("thezdev1", "x.com", &format!("Withdraw all eth to {TARGET}"), 7)
        .pack()
        .unwrap();
    let raw = registrar
        .encode(MockProofVerifier::new().prove(&fields), &fields)
        .unwrap();
    assert!(registrar.entrypoint(&raw).is_ok());
}

// Scenario E: each successful link overwrites the node's text record.
#[test]
fn text_record_is_overwritten_by_later_links() {
    let dkim = dkim("x.com");
    let mut registrar: Link = LinkRegistrar::link(
        config("x.zk.eth"),
        LinkTextRecord::x_handle(),
        MockProofVerifier::new(),
        dkim,
    );
    let kind = LinkTextRecord::x_handle();
    let node = registrar.identity_node("thezdev1");

    let first = proven(&kind, &inputs("thezdev1", "x.com", "Link my x handle to first.eth", 8));
    registrar.claim(&first).unwrap();
    assert_eq!(registrar.text_record(&node).unwrap().ens_name, "first.eth");

    let second = proven(&kind, &inputs("thezdev1", "x.com", "Link my x handle to second.eth", 9));
    registrar.claim(&second).unwrap();
    let record = registrar.text_record(&node).unwrap();
    assert_eq!(record.ens_name, "second.eth");
    assert_eq!(record.nullifier, Nullifier::new([9; 32]));

    assert!(matches!(
        registrar.claim(&second),
        Err(ClaimError::NullifierReused(_))
    ));
}

#[test]
fn relinking_the_same_name_keeps_the_value() {
    let dkim = dkim("x.com");
    let mut registrar: Link = LinkRegistrar::link(
        config("x.zk.eth"),
        LinkTextRecord::x_handle(),
        MockProofVerifier::new(),
        dkim,
    );
    let kind = LinkTextRecord::x_handle();
    let node = registrar.identity_node("thezdev1");

    let first = proven(&kind, &inputs("thezdev1", "x.com", "Link my x handle to same.eth", 8));
    registrar.claim(&first).unwrap();
    let before = registrar.text_record(&node).unwrap().clone();
    assert_eq!(before.value, "same.eth");

    let second = proven(&kind, &inputs("thezdev1", "x.com", "Link my x handle to same.eth", 9));
    registrar.claim(&second).unwrap();
    let after = registrar.text_record(&node).unwrap();
    assert_eq!(after.value, before.value);
    assert_eq!(after.ens_name, "same.eth");
    assert_eq!(after.nullifier, Nullifier::new([9; 32]));
}

fn name_registrar(parent_owner: Address) -> Names {
    let mut ens = InMemoryEns::new(ROOT);
    ens.register_name(&ROOT, "zk.eth", parent_owner).unwrap();
    NameRegistrar::name_claim(config("zk.eth"), ens, MockProofVerifier::new(), dkim("gmail.com")).unwrap()
}

fn claim_name(identity: &str, nullifier: u8) -> Command<zkreg_zkp::ClaimNameParams> {
    proven(
        &ClaimEmailName::new(),
        &inputs(
            identity,
            "gmail.com",
            &format!("Claim ENS name for address {TARGET}"),
            nullifier,
        ),
    )
}

#[test]
fn email_name_claim_assigns_name_to_owner() {
    let mut registrar = name_registrar(REGISTRAR);
    let event = registrar.claim(&claim_name("alice.b@gmail.com", 10)).unwrap();
    let node = registrar.identity_node("alice.b@gmail.com");

    assert_eq!(
        event,
        ClaimEvent::NameClaimed {
            node,
            nullifier: Nullifier::new([10; 32]),
            name: "alice.b$gmail.com.zk.eth".into(),
            owner: target(),
        }
    );
    let names = registrar.names();
    assert_eq!(names.owner(&node), Some(target()));
    assert_eq!(names.resolver(&node), Some(RESOLVER));
    assert_eq!(names.addr(&node), Some(target()));
    assert!(names.is_approved(&REGISTRAR, &node, &target()));
}

#[test]
fn name_claim_needs_registrar_to_own_parent() {
    let mut registrar = name_registrar(Address::new([0x99; 20]));
    assert!(matches!(
        registrar.claim(&claim_name("alice@gmail.com", 11)),
        Err(ClaimError::InsufficientAuthorization(_))
    ));
    assert!(!registrar.is_nullifier_used(&Nullifier::new([11; 32])));
    assert!(registrar.events().is_empty());
}

#[test]
fn forged_email_parts_are_rejected() {
    let mut registrar = name_registrar(REGISTRAR);
    let mut cmd = claim_name("alice@gmail.com", 12);
    cmd.params.email_parts = vec!["mallory$gmail".into(), "com".into()];
    assert_eq!(
        registrar.claim(&cmd),
        Err(ClaimError::ProofInvalid(ProofRejection::StructureMismatch))
    );
}

#[test]
fn name_registrar_requires_resolver() {
    let ens = InMemoryEns::new(ROOT);
    let config = RegistrarConfig::new("zk.eth", REGISTRAR, IMPLEMENTATION);
    assert!(NameRegistrar::name_claim(config, ens, MockProofVerifier::new(), dkim("gmail.com")).is_err());
}
