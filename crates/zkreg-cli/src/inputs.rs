//! `zkreg inputs pack|unpack`: convert between a JSON public-input set and
//! the field array the circuit and the other subcommands consume.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use zkreg_core::FieldElement;
use zkreg_zkp::PublicInputSet;

#[derive(Args, Debug)]
pub struct InputsArgs {
    #[command(subcommand)]
    pub command: InputsCommand,
}

#[derive(Subcommand, Debug)]
pub enum InputsCommand {
    /// Pack a JSON public-input set into a field array.
    Pack {
        /// JSON file holding a public-input set.
        #[arg(long)]
        file: PathBuf,
    },
    /// Unpack a field array into a JSON public-input set.
    Unpack {
        /// JSON array of field elements.
        #[arg(long)]
        file: PathBuf,
    },
}

pub fn run_inputs(args: &InputsArgs) -> Result<u8> {
    match &args.command {
        InputsCommand::Pack { file } => {
            let content = std::fs::read_to_string(file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let inputs: PublicInputSet = serde_json::from_str(&content)
                .with_context(|| format!("{} is not a public-input set", file.display()))?;
            println!("{}", serde_json::to_string_pretty(&pack(&inputs)?)?);
        }
        InputsCommand::Unpack { file } => {
            let fields = crate::read_fields(file)?;
            let inputs = PublicInputSet::unpack(&fields).context("field array does not decode")?;
            println!("{}", serde_json::to_string_pretty(&inputs)?);
        }
    }
    Ok(0)
}

pub fn pack(inputs: &PublicInputSet) -> Result<Vec<FieldElement>> {
    inputs.pack().context("public inputs do not fit the circuit layout")
}
