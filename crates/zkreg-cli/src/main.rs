//! # zkreg CLI entry point
//!
//! Parses arguments, initializes logging, and dispatches to handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use zkreg_cli::command::{run_command, CommandArgs};
use zkreg_cli::identity::{run_node, run_predict, NodeArgs, PredictArgs};
use zkreg_cli::inputs::{run_inputs, InputsArgs};
use zkreg_cli::prove::{run_prove, ProveArgs};

/// zkreg — proof-gated identity claims.
///
/// Offline tooling for registrar operators and relayers: identity nodes,
/// account prediction, command construction and mock proving.
#[derive(Parser, Debug)]
#[command(name = "zkreg", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    json_logs: bool,

    /// Path to the registrar configuration (YAML).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the identity node of a handle or email.
    Node(NodeArgs),

    /// Print the custodial account address of an identity.
    Predict(PredictArgs),

    /// Build expected masked commands or encoded command bytes.
    Command(CommandArgs),

    /// Pack or unpack public inputs.
    Inputs(InputsArgs),

    /// Produce a mock proof for a field array.
    Prove(ProveArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    if cli.json_logs {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let config = cli.config.as_deref();
    let result = match &cli.command {
        Commands::Node(args) => run_node(args, config),
        Commands::Predict(args) => run_predict(args, config),
        Commands::Command(args) => run_command(args),
        Commands::Inputs(args) => run_inputs(args),
        Commands::Prove(args) => run_prove(args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
