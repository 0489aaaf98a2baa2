//! Verify command implementation.

use clap::Args;
use ethers_core::types::Address;
use serde::Serialize;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Instant;

use chaingate_core::{BlockEnd, ProfileOverride, TokenStandard};
use chaingate_verifier::{abi, OwnershipReport, OwnershipVerifier, VerificationRequest};

use crate::config::{get_chain, load_config, FileConfig, DEFAULT_CHAIN};
use crate::output;

/// Arguments for the verify command.
#[derive(Args)]
pub struct VerifyArgs {
    /// Token contract address
    #[arg(long)]
    pub contract: String,

    /// Token standard (erc721, erc1155); defaults to the config entry
    #[arg(short, long)]
    pub standard: Option<String>,

    /// Address whose holdings are checked
    #[arg(long, conflicts_with_all = ["signature", "message"])]
    pub owner: Option<String>,

    /// Personal-message signature; the signer is checked
    #[arg(long, requires = "message")]
    pub signature: Option<String>,

    /// The message that was signed
    #[arg(long, requires = "signature")]
    pub message: Option<String>,

    /// JSON ABI file for the contract (defaults to the bundled ABI)
    #[arg(long)]
    pub abi: Option<PathBuf>,

    /// Blockchain chain (ethereum, sepolia, polygon, base, arbitrum, optimism)
    #[arg(short, long)]
    pub chain: Option<String>,

    /// Custom RPC URL (overrides chain default)
    #[arg(long)]
    pub rpc_url: Option<String>,

    /// First block scanned for transfers
    #[arg(long)]
    pub from_block: Option<u64>,

    /// Last block scanned for transfers (a height or "latest")
    #[arg(long)]
    pub to_block: Option<BlockEnd>,

    /// Config file (defaults to ~/.chaingate/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON output structure.
#[derive(Serialize, Default)]
struct JsonOutput {
    success: bool,
    verified: bool,
    contract: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    standard: Option<String>,
    chain: String,
    balance: usize,
    token_ids: Vec<String>,
    events_scanned: usize,
    events_skipped: usize,
    balance_calls: usize,
    time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl JsonOutput {
    fn from_report(report: &OwnershipReport, chain: &str) -> Self {
        Self {
            success: true,
            verified: report.is_owner,
            contract: output::checksum(&report.contract),
            owner: Some(output::checksum(&report.owner)),
            standard: Some(report.standard.to_string()),
            chain: chain.to_string(),
            balance: report.balance,
            token_ids: report.holdings.to_decimal_strings(),
            events_scanned: report.events_scanned,
            events_skipped: report.events_skipped,
            balance_calls: report.balance_calls,
            time_ms: report.total_time.as_millis() as u64,
            error: None,
        }
    }
}

fn print_json(out: &JsonOutput) {
    match serde_json::to_string_pretty(out) {
        Ok(json) => println!("{}", json),
        Err(e) => output::error(&format!("Failed to encode output: {}", e)),
    }
}

/// A failure before or during verification.
struct Failure {
    message: String,
    hint: Option<&'static str>,
}

impl Failure {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            hint: None,
        }
    }

    fn hint(mut self, hint: &'static str) -> Self {
        self.hint = Some(hint);
        self
    }
}

/// Run the verify command.
pub async fn run(args: VerifyArgs) -> i32 {
    let start = Instant::now();
    let chain = args.chain.clone().unwrap_or_default();

    match verify(&args).await {
        Ok((report, chain)) => {
            if args.json {
                print_json(&JsonOutput::from_report(&report, &chain));
            } else {
                output::ownership_result(&report);
                if !report.is_owner && report.events_scanned == 0 {
                    output::hint("No transfers to this address were found in the block range.");
                }
            }
            if report.is_owner {
                0
            } else {
                1
            }
        }
        Err(failure) => {
            if args.json {
                print_json(&JsonOutput {
                    contract: args.contract.clone(),
                    standard: args.standard.clone(),
                    chain,
                    time_ms: start.elapsed().as_millis() as u64,
                    error: Some(failure.message),
                    ..Default::default()
                });
            } else {
                output::error(&failure.message);
                if let Some(hint) = failure.hint {
                    output::hint(hint);
                }
            }
            1
        }
    }
}

async fn verify(args: &VerifyArgs) -> Result<(OwnershipReport, String), Failure> {
    let config = load_config(args.config.as_deref()).map_err(Failure::new)?;
    let entry = config.contract(&args.contract);

    let standard = match (&args.standard, entry.and_then(|e| e.standard)) {
        (Some(raw), _) => TokenStandard::from_str(raw)
            .map_err(|e| Failure::new(e.to_string()).hint("Run `chaingate standards` for the list."))?,
        (None, Some(standard)) => standard,
        (None, None) => {
            return Err(Failure::new("No token standard given")
                .hint("Pass --standard or set `standard` for this contract in the config file."))
        }
    };

    let (chain, rpc_url) = resolve_endpoint(args, &config)?;

    let abi = match args.abi.as_ref().or(entry.and_then(|e| e.abi.as_ref())) {
        Some(path) => AbiInput::File(path.clone()),
        None => AbiInput::Bundled(standard),
    };

    let mut verifier = OwnershipVerifier::connect(&rpc_url).map_err(|e| {
        Failure::new(format!("Failed to connect to RPC: {}", e))
            .hint("Check the URL or try a different RPC endpoint.")
    })?;
    abi.register(&mut verifier, &args.contract)?;

    let request = build_request(args, standard, profile_override(args, &config))?;

    if !args.json {
        output::info(&format!(
            "Verifying {} holdings on {} ({})...",
            standard, args.contract, chain
        ));
    }

    let report = verifier.report(&request).await.map_err(|e| {
        let failure = Failure::new(format!("Verification failed: {}", e));
        if e.is_chain_error() {
            failure.hint("The RPC endpoint may limit log ranges; try --from-block.")
        } else {
            failure
        }
    })?;

    Ok((report, chain))
}

/// Flags win over the config file, which wins over the chain table.
fn resolve_endpoint(args: &VerifyArgs, config: &FileConfig) -> Result<(String, String), Failure> {
    let chain_name = args
        .chain
        .as_deref()
        .or(config.chain.as_deref())
        .unwrap_or(DEFAULT_CHAIN);

    let chain = get_chain(chain_name).ok_or_else(|| {
        Failure::new(format!("Chain '{}' not supported.", chain_name))
            .hint("Run `chaingate chains` for supported chains.")
    })?;

    let rpc_url = args
        .rpc_url
        .clone()
        .or_else(|| config.rpc_url.clone())
        .unwrap_or_else(|| chain.default_rpc().to_string());

    Ok((chain.name.to_string(), rpc_url))
}

fn profile_override(args: &VerifyArgs, config: &FileConfig) -> Option<ProfileOverride> {
    let mut overrides = config.profile.clone().unwrap_or_default();
    if args.from_block.is_some() {
        overrides.start_block = args.from_block;
    }
    if args.to_block.is_some() {
        overrides.end_block = args.to_block;
    }
    (!overrides.is_empty()).then_some(overrides)
}

fn build_request(
    args: &VerifyArgs,
    standard: TokenStandard,
    profile: Option<ProfileOverride>,
) -> Result<VerificationRequest, Failure> {
    let request = match (&args.owner, &args.signature, &args.message) {
        (Some(owner), _, _) => {
            let owner = Address::from_str(owner.trim())
                .map_err(|_| Failure::new(format!("Invalid owner address: '{}'", owner)))?;
            VerificationRequest::for_address(owner, args.contract.as_str(), standard)
        }
        (None, Some(signature), Some(message)) => VerificationRequest::for_signature(
            signature.as_str(),
            message.as_str(),
            args.contract.as_str(),
            standard,
        ),
        _ => {
            return Err(Failure::new("No identity given")
                .hint("Pass --owner, or --signature together with --message."))
        }
    };

    Ok(match profile {
        Some(profile) => request.with_profile(profile),
        None => request,
    })
}

enum AbiInput {
    File(PathBuf),
    Bundled(TokenStandard),
}

impl AbiInput {
    fn register(self, verifier: &mut OwnershipVerifier, contract: &str) -> Result<(), Failure> {
        let registered = match self {
            AbiInput::File(path) => {
                let json = std::fs::read_to_string(&path).map_err(|e| {
                    Failure::new(format!("Failed to read ABI {}: {}", path.display(), e))
                })?;
                verifier.register_contract(contract, &json)
            }
            AbiInput::Bundled(standard) => {
                abi::abi_for(standard).and_then(|abi| verifier.register_contract_abi(contract, abi))
            }
        };
        registered.map_err(|e| Failure::new(e.to_string()))
    }
}
