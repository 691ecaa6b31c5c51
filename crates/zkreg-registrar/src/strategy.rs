//! # Claim Strategies
//!
//! The side effect a verified command triggers. A strategy owns its slice
//! of registrar state and runs in two phases:
//!
//! - `plan` performs every fallible check against `&self` and returns what
//!   `commit` needs.
//! - `commit` mutates. Given a plan from the unchanged state it must not
//!   fail; an error here means a collaborator broke its contract.

use zkreg_core::{Address, ClaimError, IdentityNode};
use zkreg_crypto::{canonical_label, namehash};
use zkreg_state::{
    AccountProvisioner, Ledger, NameRegistry, PreparedTransfer, ResolverConfig, TextRecord,
    TextRecordStore,
};
use zkreg_zkp::{
    ClaimEmailName, ClaimNameParams, Command, CommandKind, LinkParams, LinkTextRecord,
    WithdrawAll, WithdrawParams,
};

use crate::config::RegistrarConfig;
use crate::event::ClaimEvent;

/// What a strategy knows about the claim besides the command.
#[derive(Debug, Clone, Copy)]
pub struct ClaimContext<'a> {
    /// Node of the canonicalized claimed identity.
    pub node: IdentityNode,
    pub config: &'a RegistrarConfig,
}

pub trait ClaimStrategy<K: CommandKind> {
    /// Checked intent produced by `plan` and consumed by `commit`.
    type Plan;

    fn plan(&self, ctx: &ClaimContext<'_>, command: &Command<K::Params>) -> Result<Self::Plan, ClaimError>;

    fn commit(
        &mut self,
        ctx: &ClaimContext<'_>,
        command: &Command<K::Params>,
        plan: Self::Plan,
    ) -> Result<ClaimEvent, ClaimError>;
}

/// Deploy-if-absent, then sweep the custodial account to the target.
#[derive(Debug, Clone)]
pub struct AccountSweep {
    pub provisioner: AccountProvisioner,
    pub ledger: Ledger,
}

impl AccountSweep {
    pub fn new(provisioner: AccountProvisioner) -> Self {
        Self {
            provisioner,
            ledger: Ledger::new(),
        }
    }

    /// Accounts cloned from the configured implementation, deployed by the registrar.
    pub fn from_config(config: &RegistrarConfig) -> Self {
        Self::new(AccountProvisioner::new(
            config.account_implementation,
            config.registrar,
        ))
    }
}

impl ClaimStrategy<WithdrawAll> for AccountSweep {
    type Plan = PreparedTransfer;

    fn plan(&self, ctx: &ClaimContext<'_>, command: &Command<WithdrawParams>) -> Result<PreparedTransfer, ClaimError> {
        self.provisioner
            .prepare_sweep(&ctx.node, &self.ledger, command.params.target)
    }

    fn commit(
        &mut self,
        ctx: &ClaimContext<'_>,
        command: &Command<WithdrawParams>,
        plan: PreparedTransfer,
    ) -> Result<ClaimEvent, ClaimError> {
        let account = self.provisioner.ensure_deployed(ctx.node);
        let amount = self.ledger.apply_transfer(plan);
        Ok(ClaimEvent::AccountSwept {
            node: ctx.node,
            nullifier: command.nullifier(),
            account,
            target: command.params.target,
            amount,
        })
    }
}

/// Overwrite the node's text record.
#[derive(Debug, Clone, Default)]
pub struct TextRecordLink {
    pub records: TextRecordStore,
}

impl TextRecordLink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClaimStrategy<LinkTextRecord> for TextRecordLink {
    type Plan = ();

    fn plan(&self, _ctx: &ClaimContext<'_>, _command: &Command<LinkParams>) -> Result<(), ClaimError> {
        Ok(())
    }

    fn commit(
        &mut self,
        ctx: &ClaimContext<'_>,
        command: &Command<LinkParams>,
        _plan: (),
    ) -> Result<ClaimEvent, ClaimError> {
        let ens_name = command.params.ens_name.clone();
        self.records
            .set(ctx.node, TextRecord::new(ens_name.clone(), command.nullifier()));
        Ok(ClaimEvent::TextRecordLinked {
            node: ctx.node,
            nullifier: command.nullifier(),
            ens_name,
        })
    }
}

/// Create `<email parts>.<parent>` and hand it to the commanded owner.
#[derive(Debug, Clone)]
pub struct NameClaim<R> {
    pub names: R,
    pub resolver: Address,
}

impl<R> NameClaim<R> {
    pub fn new(names: R, resolver: Address) -> Self {
        Self { names, resolver }
    }
}

/// Labels to create under the parent, leftmost first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamePlan {
    parent: IdentityNode,
    labels: Vec<String>,
}

impl<R> ClaimStrategy<ClaimEmailName> for NameClaim<R>
where
    R: NameRegistry + ResolverConfig,
{
    type Plan = NamePlan;

    /// The registrar must own the parent. It then owns every subnode it
    /// creates until the final transfer, so each later call is authorized.
    fn plan(&self, ctx: &ClaimContext<'_>, command: &Command<ClaimNameParams>) -> Result<NamePlan, ClaimError> {
        let registrar = ctx.config.registrar;
        let parent_domain = &ctx.config.parent_domain;
        let parent = IdentityNode::new(namehash(parent_domain));
        if self.names.owner(&parent) != Some(registrar) {
            return Err(ClaimError::InsufficientAuthorization(format!(
                "registrar {registrar} does not own {parent_domain}"
            )));
        }
        let labels = command
            .params
            .email_parts
            .iter()
            .map(|part| canonical_label(part))
            .collect();
        Ok(NamePlan { parent, labels })
    }

    fn commit(
        &mut self,
        ctx: &ClaimContext<'_>,
        command: &Command<ClaimNameParams>,
        plan: NamePlan,
    ) -> Result<ClaimEvent, ClaimError> {
        let registrar = ctx.config.registrar;
        let mut node = plan.parent;
        for label in plan.labels.iter().rev() {
            node = self.names.set_subnode_owner(&registrar, &node, label, registrar)?;
        }

        let owner = command.params.owner;
        self.names.set_resolver(&registrar, &node, self.resolver)?;
        self.names.set_addr(&registrar, &node, owner)?;
        self.names.approve(&registrar, &node, owner, true);
        self.names.set_owner(&registrar, &node, owner)?;

        Ok(ClaimEvent::NameClaimed {
            node,
            nullifier: command.nullifier(),
            name: format!("{}.{}", plan.labels.join("."), ctx.config.parent_domain),
            owner,
        })
    }
}
