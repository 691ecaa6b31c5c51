//! # Registrar
//!
//! One generic registrar over a command kind `K`, a strategy `S`, a proof
//! verifier `V` and a DKIM oracle `D`. The three deployed flavours are the
//! [`SweepRegistrar`], [`LinkRegistrar`] and [`NameRegistrar`] aliases.
//!
//! ## Claim pipeline
//!
//! ```text
//! decode ─▶ nullifier unused? ─▶ verify ─▶ derive node ─▶ plan ─▶ commit ─▶ consume nullifier
//! ```
//!
//! Everything up to `plan` reads state only. Mutation starts at `commit`,
//! after every fallible check has passed, and the nullifier is consumed
//! together with the strategy's side effect.

use zkreg_core::{Address, ClaimError, FieldElement, IdentityNode, Nullifier};
use zkreg_crypto::identity_node;
use zkreg_state::{Account, AccountState, NameRegistry, NullifierGuard, ResolverConfig, TextRecord};
use zkreg_zkp::{
    ClaimEmailName, Command, CommandKind, CommandVerifier, DkimKeyOracle, LinkTextRecord,
    ProofVerifier, WithdrawAll,
};

use crate::config::{ConfigError, RegistrarConfig};
use crate::event::ClaimEvent;
use crate::strategy::{AccountSweep, ClaimContext, ClaimStrategy, NameClaim, TextRecordLink};

/// Registrar sweeping custodial accounts.
pub type SweepRegistrar<V, D> = Registrar<WithdrawAll, AccountSweep, V, D>;
/// Registrar linking text records.
pub type LinkRegistrar<V, D> = Registrar<LinkTextRecord, TextRecordLink, V, D>;
/// Registrar claiming email names.
pub type NameRegistrar<R, V, D> = Registrar<ClaimEmailName, NameClaim<R>, V, D>;

pub struct Registrar<K, S, V, D> {
    config: RegistrarConfig,
    verifier: CommandVerifier<K, V, D>,
    nullifiers: NullifierGuard,
    strategy: S,
    events: Vec<ClaimEvent>,
}

impl<K, S, V, D> Registrar<K, S, V, D>
where
    K: CommandKind,
    S: ClaimStrategy<K>,
    V: ProofVerifier,
    D: DkimKeyOracle,
{
    /// A registrar with fresh nullifier and event state. `strategy` carries
    /// whatever side-effect state it starts with.
    pub fn new(config: RegistrarConfig, kind: K, strategy: S, proof_verifier: V, dkim: D) -> Self {
        let verifier = CommandVerifier::new(kind, proof_verifier, dkim)
            .with_casings(config.address_casings.clone());
        Self {
            config,
            verifier,
            nullifiers: NullifierGuard::new(),
            strategy,
            events: Vec::new(),
        }
    }

    /// Decode JSON command bytes and claim.
    pub fn entrypoint(&mut self, raw: &[u8]) -> Result<ClaimEvent, ClaimError> {
        let command = Command::<K::Params>::from_bytes(raw).map_err(|e| {
            tracing::warn!(kind = self.verifier.kind().name(), error = %e, "command rejected");
            e
        })?;
        self.claim(&command)
    }

    /// Run the claim pipeline on a decoded command.
    pub fn claim(&mut self, command: &Command<K::Params>) -> Result<ClaimEvent, ClaimError> {
        let nullifier = command.nullifier();
        match self.run(command) {
            Ok(event) => {
                tracing::info!(
                    kind = self.verifier.kind().name(),
                    node = %event.node(),
                    nullifier = %nullifier,
                    "claim committed: {event}"
                );
                Ok(event)
            }
            Err(e) => {
                tracing::warn!(
                    kind = self.verifier.kind().name(),
                    nullifier = %nullifier,
                    error = %e,
                    "claim rejected"
                );
                Err(e)
            }
        }
    }

    fn run(&mut self, command: &Command<K::Params>) -> Result<ClaimEvent, ClaimError> {
        let nullifier = command.nullifier();
        self.nullifiers.ensure_unused(&nullifier)?;
        self.verifier.check(command)?;
        let ctx = ClaimContext {
            node: identity_node(command.claimed_identity(), &self.config.parent_domain),
            config: &self.config,
        };
        let plan = self.strategy.plan(&ctx, command)?;
        let event = self.strategy.commit(&ctx, command, plan)?;
        self.nullifiers.consume(nullifier)?;
        self.events.push(event.clone());
        Ok(event)
    }

    /// Command bytes for raw circuit output.
    pub fn encode(&self, proof: Vec<u8>, fields: &[FieldElement]) -> Result<Vec<u8>, ClaimError> {
        self.verifier.encode(proof, fields)?.to_bytes()
    }

    pub fn is_nullifier_used(&self, nullifier: &Nullifier) -> bool {
        self.nullifiers.is_used(nullifier)
    }

    /// Node of `identity` under the configured parent domain.
    pub fn identity_node(&self, identity: &str) -> IdentityNode {
        identity_node(identity, &self.config.parent_domain)
    }

    /// Committed events not yet taken, oldest first.
    pub fn events(&self) -> &[ClaimEvent] {
        &self.events
    }

    /// Drain the committed events, oldest first.
    pub fn take_events(&mut self) -> Vec<ClaimEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn config(&self) -> &RegistrarConfig {
        &self.config
    }

    pub fn verifier(&self) -> &CommandVerifier<K, V, D> {
        &self.verifier
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }
}

impl<V: ProofVerifier, D: DkimKeyOracle> SweepRegistrar<V, D> {
    /// Sweep registrar with an empty account arena and ledger.
    pub fn sweep(config: RegistrarConfig, proof_verifier: V, dkim: D) -> Self {
        let strategy = AccountSweep::from_config(&config);
        Self::new(config, WithdrawAll::new(), strategy, proof_verifier, dkim)
    }

    pub fn get_account(&self, node: &IdentityNode) -> Option<&Account> {
        self.strategy.provisioner.account(node)
    }

    pub fn account_state(&self, node: &IdentityNode) -> AccountState {
        self.strategy.provisioner.state(node)
    }

    pub fn predict_address(&self, node: &IdentityNode) -> Address {
        self.strategy.provisioner.predict_address(node)
    }

    /// Credit `amount` to `account`; accounts may be funded before deployment.
    pub fn deposit(&mut self, account: Address, amount: u128) -> Result<u128, ClaimError> {
        self.strategy.ledger.deposit(account, amount)
    }

    pub fn balance_of(&self, account: &Address) -> u128 {
        self.strategy.ledger.balance_of(account)
    }
}

impl<V: ProofVerifier, D: DkimKeyOracle> LinkRegistrar<V, D> {
    /// Link registrar for `kind` (handle or email template).
    pub fn link(config: RegistrarConfig, kind: LinkTextRecord, proof_verifier: V, dkim: D) -> Self {
        Self::new(config, kind, TextRecordLink::new(), proof_verifier, dkim)
    }

    pub fn text_record(&self, node: &IdentityNode) -> Option<&TextRecord> {
        self.strategy.records.get(node)
    }
}

impl<R, V, D> NameRegistrar<R, V, D>
where
    R: NameRegistry + ResolverConfig,
    V: ProofVerifier,
    D: DkimKeyOracle,
{
    /// Name registrar over `names`. The config must name a resolver.
    pub fn name_claim(config: RegistrarConfig, names: R, proof_verifier: V, dkim: D) -> Result<Self, ConfigError> {
        let resolver = config
            .resolver
            .ok_or_else(|| ConfigError::Invalid("name claims need a resolver".into()))?;
        Ok(Self::new(
            config,
            ClaimEmailName::new(),
            NameClaim::new(names, resolver),
            proof_verifier,
            dkim,
        ))
    }

    pub fn names(&self) -> &R {
        &self.strategy.names
    }
}
