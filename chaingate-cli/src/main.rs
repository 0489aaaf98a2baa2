//! ChainGate CLI
//!
//! Terminal-first interface for token ownership verification.

mod commands;
mod config;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "chaingate")]
#[command(version)]
#[command(about = "ChainGate - Token ownership verification from transfer history", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify that an address (or signer) holds tokens of a contract
    Verify(commands::verify::VerifyArgs),

    /// Recover the signer of a personal message
    Recover(commands::recover::RecoverArgs),

    /// List supported token standards and their default profiles
    Standards,

    /// List supported blockchain chains
    Chains,
}

/// Logs go to stderr, filtered by `RUST_LOG` (default `warn`).
fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_json);

    let exit_code = match cli.command {
        Commands::Verify(args) => commands::verify::run(args).await,
        Commands::Recover(args) => commands::recover::run(args),
        Commands::Standards => commands::standards::run(),
        Commands::Chains => commands::chains::run(),
    };

    std::process::exit(exit_code);
}
