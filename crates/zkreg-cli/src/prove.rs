//! `zkreg prove`: mock proof for local testing.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use zkreg_core::FieldElement;
use zkreg_zkp::{MockProofVerifier, PublicInputSet};

#[derive(Args, Debug)]
pub struct ProveArgs {
    /// JSON array of field elements.
    #[arg(long)]
    pub inputs: PathBuf,
}

pub fn run_prove(args: &ProveArgs) -> Result<u8> {
    let fields = crate::read_fields(&args.inputs)?;
    tracing::warn!("mock proofs are transparent; never submit one to a registrar that holds value");
    println!("{}", mock_proof_hex(&fields)?);
    Ok(0)
}

/// Hex mock proof over a field array with the public-input layout.
pub fn mock_proof_hex(fields: &[FieldElement]) -> Result<String> {
    PublicInputSet::unpack(fields).context("field array is not a public-input set")?;
    Ok(format!("0x{}", hex::encode(MockProofVerifier::new().prove(fields))))
}
