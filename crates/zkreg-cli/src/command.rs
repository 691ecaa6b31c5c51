//! # `zkreg command`
//!
//! ```bash
//! # What must the email subject say?
//! zkreg command expected --template "Withdraw all eth to {ethAddr}" \
//!     --param ethAddr:0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed --casing checksum
//!
//! # Command bytes for a relayer, from raw circuit output.
//! zkreg command encode --kind withdraw --proof 0x... --inputs fields.json
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand, ValueEnum};

use zkreg_core::FieldElement;
use zkreg_zkp::{
    build_expected_command, encode_command, AddressCasing, ClaimEmailName, CommandKind,
    CommandTemplate, LinkTextRecord, ParamKind, TemplateValue, WithdrawAll,
};

#[derive(Args, Debug)]
pub struct CommandArgs {
    #[command(subcommand)]
    pub command: CommandSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum CommandSubcommand {
    /// Print the masked command the given parameters must match.
    Expected {
        /// Command template, e.g. "Withdraw all eth to {ethAddr}".
        #[arg(long)]
        template: String,

        /// Parameter in placeholder order, as KIND:VALUE.
        #[arg(long = "param", value_name = "KIND:VALUE")]
        params: Vec<String>,

        /// Address rendering.
        #[arg(long, default_value = "checksum")]
        casing: AddressCasing,
    },

    /// Build command bytes from a proof and a field array.
    Encode {
        #[arg(long, value_enum)]
        kind: KindArg,

        /// Proof bytes as hex.
        #[arg(long)]
        proof: String,

        /// JSON array of field elements.
        #[arg(long)]
        inputs: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    /// Withdraw all eth to {ethAddr}
    Withdraw,
    /// Link my x handle to {string}
    Link,
    /// Link my email to {string}
    LinkEmail,
    /// Claim ENS name for address {ethAddr}
    ClaimName,
}

pub fn run_command(args: &CommandArgs) -> Result<u8> {
    match &args.command {
        CommandSubcommand::Expected {
            template,
            params,
            casing,
        } => {
            println!("{}", expected_command(template, params, *casing)?);
        }
        CommandSubcommand::Encode {
            kind,
            proof,
            inputs,
        } => {
            let fields = crate::read_fields(inputs)?;
            println!("{}", encode(*kind, proof, &fields)?);
        }
    }
    Ok(0)
}

/// Parse `KIND:VALUE` into a template value.
pub fn parse_param(raw: &str) -> Result<TemplateValue> {
    let (kind, value) = raw
        .split_once(':')
        .with_context(|| format!("parameter {raw:?} is not KIND:VALUE"))?;
    let kind: ParamKind = kind.parse()?;
    Ok(TemplateValue::parse(kind, value)?)
}

pub fn expected_command(template: &str, params: &[String], casing: AddressCasing) -> Result<String> {
    let values = params
        .iter()
        .map(|p| parse_param(p))
        .collect::<Result<Vec<_>>>()?;
    Ok(build_expected_command(
        &values,
        &CommandTemplate::parse(template),
        casing,
    )?)
}

/// JSON command bytes of `kind` for a hex proof and field array.
pub fn encode(kind: KindArg, proof_hex: &str, fields: &[FieldElement]) -> Result<String> {
    let digits = proof_hex.strip_prefix("0x").unwrap_or(proof_hex);
    let proof = hex::decode(digits).context("proof is not hex")?;
    match kind {
        KindArg::Withdraw => encode_with(&WithdrawAll::new(), proof, fields),
        KindArg::Link => encode_with(&LinkTextRecord::x_handle(), proof, fields),
        KindArg::LinkEmail => encode_with(&LinkTextRecord::email(), proof, fields),
        KindArg::ClaimName => encode_with(&ClaimEmailName::new(), proof, fields),
    }
}

fn encode_with<K: CommandKind>(kind: &K, proof: Vec<u8>, fields: &[FieldElement]) -> Result<String> {
    let command = encode_command(kind, proof, fields)
        .with_context(|| format!("cannot encode a {} command", kind.name()))?;
    Ok(String::from_utf8(command.to_bytes()?)?)
}
