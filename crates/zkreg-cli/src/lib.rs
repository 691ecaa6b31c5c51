//! # zkreg-cli — Command-Line Interface
//!
//! Offline tooling around the registrar. Nothing here holds claim state;
//! every subcommand is a pure function of its arguments and files.
//!
//! ## Subcommands
//!
//! - `node` — identity node of a handle or email
//! - `predict` — custodial account address of an identity
//! - `command expected` — the masked command a set of parameters must prove
//! - `command encode` — command bytes from raw circuit output
//! - `inputs pack` / `inputs unpack` — JSON public-input set to field array and back
//! - `prove` — mock proof over a field array (development only)
//!
//! ## Crate Policy
//!
//! - Argument parsing lives in `main.rs`; handlers live in modules and
//!   delegate to the domain crates.
//! - Handlers return `anyhow::Result<u8>`, the process exit code.

use std::path::Path;

use anyhow::{Context, Result};

use zkreg_core::FieldElement;
use zkreg_registrar::RegistrarConfig;

pub mod command;
pub mod identity;
pub mod inputs;
pub mod prove;

/// Load and validate a registrar configuration file.
pub fn load_config(path: &Path) -> Result<RegistrarConfig> {
    RegistrarConfig::from_path(path)
        .with_context(|| format!("failed to load registrar config {}", path.display()))
}

/// Read a JSON array of field elements (`0x`-hex or decimal strings).
pub fn read_fields(path: &Path) -> Result<Vec<FieldElement>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("{} is not a JSON array of field elements", path.display()))
}
