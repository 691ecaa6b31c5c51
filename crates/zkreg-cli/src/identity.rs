//! `zkreg node` and `zkreg predict`.

use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Args;

use zkreg_core::{Address, IdentityNode};
use zkreg_crypto::identity_node;
use zkreg_registrar::RegistrarConfig;
use zkreg_state::AccountProvisioner;

#[derive(Args, Debug)]
pub struct NodeArgs {
    /// Handle or email address.
    pub identity: String,

    /// Parent domain. Defaults to the one in --config.
    #[arg(long)]
    pub parent_domain: Option<String>,
}

#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Handle or email address.
    pub identity: String,
}

pub fn run_node(args: &NodeArgs, config: Option<&Path>) -> Result<u8> {
    let parent = match (&args.parent_domain, config) {
        (Some(domain), _) => domain.clone(),
        (None, Some(path)) => crate::load_config(path)?.parent_domain,
        (None, None) => bail!("either --parent-domain or --config is required"),
    };
    println!("{}", identity_node(&args.identity, &parent));
    Ok(0)
}

pub fn run_predict(args: &PredictArgs, config: Option<&Path>) -> Result<u8> {
    let path = config.context("predict needs --config")?;
    let config = crate::load_config(path)?;
    let (node, address) = predict(&config, &args.identity);
    tracing::debug!(node = %node, "predicted custodial account");
    println!("{address}");
    Ok(0)
}

/// Node and custodial account address of `identity` under `config`.
pub fn predict(config: &RegistrarConfig, identity: &str) -> (IdentityNode, Address) {
    let node = identity_node(identity, &config.parent_domain);
    let provisioner = AccountProvisioner::new(config.account_implementation, config.registrar);
    (node, provisioner.predict_address(&node))
}
