//! Recover command implementation.

use clap::Args;
use serde::Serialize;

use chaingate_verifier::recover_signer;

use crate::output;

/// Arguments for the recover command.
#[derive(Args)]
pub struct RecoverArgs {
    /// 65-byte signature as hex (with or without 0x)
    #[arg(long)]
    pub signature: String,

    /// The message that was signed
    #[arg(long)]
    pub message: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct JsonOutput {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    signer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Run the recover command.
pub fn run(args: RecoverArgs) -> i32 {
    let recovered = recover_signer(&args.message, &args.signature);

    if args.json {
        let out = match &recovered {
            Ok(signer) => JsonOutput {
                success: true,
                signer: Some(output::checksum(signer)),
                error: None,
            },
            Err(e) => JsonOutput {
                success: false,
                signer: None,
                error: Some(e.to_string()),
            },
        };
        match serde_json::to_string_pretty(&out) {
            Ok(json) => println!("{}", json),
            Err(e) => output::error(&format!("Failed to encode output: {}", e)),
        }
    } else {
        match &recovered {
            Ok(signer) => {
                output::success("Signature recovered");
                output::kv("Signer", &output::checksum(signer));
            }
            Err(e) => {
                output::error(&e.to_string());
                output::hint("Signatures are 65 bytes: r, s and v, hex encoded.");
            }
        }
    }

    if recovered.is_ok() {
        0
    } else {
        1
    }
}
