//! Chains command implementation.

use colored::Colorize;

use crate::config::{CHAINS, DEFAULT_CHAIN};
use crate::output;

/// Run the chains command.
pub fn run() -> i32 {
    output::header("Supported Chains");

    println!();
    println!(
        "{:<12} {:<12} {:<28} {}",
        "Name".bold(),
        "Chain ID".bold(),
        "Description".bold(),
        "Default RPC".bold()
    );
    println!("{}", "─".repeat(90).dimmed());

    for chain in CHAINS {
        println!(
            "{:<12} {:<12} {:<28} {}",
            chain.name.green(),
            chain.chain_id,
            chain.description,
            chain.default_rpc().dimmed()
        );
    }

    println!();
    output::hint(&format!("Use --chain <NAME> with verify (default: {}).", DEFAULT_CHAIN));
    output::hint("Use --rpc-url to override the default RPC.");

    0
}
