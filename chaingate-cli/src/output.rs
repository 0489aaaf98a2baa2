//! Terminal output formatting.

use colored::Colorize;
use ethers_core::types::Address;
use ethers_core::utils::to_checksum;

use chaingate_verifier::OwnershipReport;

/// Print a success message.
pub fn success(msg: &str) {
    println!("{} {}", "✓".green().bold(), msg.green());
}

/// Print an error message.
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red().bold(), msg.red());
}

/// Print an info message.
pub fn info(msg: &str) {
    println!("{} {}", "→".cyan(), msg);
}

/// Print a header.
pub fn header(msg: &str) {
    println!("\n{}", msg.white().bold());
    println!("{}", "─".repeat(msg.chars().count()).dimmed());
}

/// Print a key-value pair.
pub fn kv(key: &str, value: &str) {
    println!("  {} {}", format!("{}:", key).dimmed(), value);
}

/// Print a helpful hint.
pub fn hint(msg: &str) {
    println!("{} {}", "💡".dimmed(), msg.dimmed());
}

pub fn checksum(address: &Address) -> String {
    to_checksum(address, None)
}

/// Print the outcome of an ownership verification.
pub fn ownership_result(report: &OwnershipReport) {
    println!();
    if report.is_owner {
        success(&format!(
            "{} holds {} token id(s)",
            checksum(&report.owner),
            report.balance
        ));
    } else {
        error(&format!("{} holds no tokens", checksum(&report.owner)));
    }

    kv("Contract", &checksum(&report.contract));
    kv("Standard", &report.standard.to_string());
    if !report.holdings.is_empty() {
        kv("Token ids", &report.holdings.to_decimal_strings().join(", "));
    }
    kv(
        "Events",
        &format!(
            "{} scanned, {} skipped",
            report.events_scanned, report.events_skipped
        ),
    );
    kv("Balance calls", &report.balance_calls.to_string());
    kv(
        "Total time",
        &format!("{:.2}s", report.total_time.as_secs_f64()),
    );
    println!();
}
