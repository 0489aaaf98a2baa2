//! Standards command implementation.

use colored::Colorize;

use chaingate_core::{StandardProfile, TokenStandard};

use crate::output;

/// Run the standards command.
pub fn run() -> i32 {
    output::header("Supported Token Standards");

    for standard in TokenStandard::ALL {
        println!();
        println!("{}  {}", standard.tag().green().bold(), standard.description().dimmed());

        match StandardProfile::default_for(standard) {
            StandardProfile::SingleOwner(p) => {
                output::kv("Transfer event", &p.transfer_event);
                output::kv("Recipient field", &p.recipient_field);
                output::kv("Token id field", &p.token_id_field);
                output::kv("Balance method", &p.balance_method);
            }
            StandardProfile::MultiQuantity(p) => {
                output::kv("Single event", &p.single_transfer_event);
                output::kv("Batch event", &p.batch_transfer_event);
                output::kv("Recipient field", &p.recipient_field);
                output::kv(
                    "Token id fields",
                    &format!("{} / {}", p.token_id_field, p.token_ids_field),
                );
                output::kv(
                    "Quantity fields",
                    &format!("{} / {}", p.quantity_field, p.quantities_field),
                );
                output::kv("Balance method", &p.balance_method);
                output::kv("Batch balance method", &p.batch_balance_method);
            }
        }
    }

    println!();
    output::hint("Use --standard <NAME> with the verify command.");
    output::hint("Override any name in the [profile] table of the config file.");
    output::hint(
        "Most erc721 contracts only expose balanceOf(owner); if balance calls revert, \
         set balance_method to a per-id method in [profile] or register the contract's own ABI.",
    );

    0
}
