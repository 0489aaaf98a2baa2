//! Ownership verifier, the main public API.
//!
//! Composes the contract registry, the standard profiles and the holdings
//! reconstructor into boolean and count answers, plus a signature-based
//! variant that first recovers the claimant's address.

use ethers_core::abi::Abi;
use ethers_core::types::Address;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chaingate_core::{HoldingsSet, StandardProfile};

use crate::client::{ChainClient, EthersClient};
use crate::error::{ChainGateError, Result};
use crate::holdings::{HoldingsReconstructor, ReconstructOptions, Reconstruction};
use crate::registry::{ContractHandle, ContractRegistry};
use crate::request::{Identity, SignedRequest, VerificationRequest};
use crate::result::OwnershipReport;
use crate::signature::recover_signer;

/// Where a contract's ABI comes from.
#[derive(Debug, Clone)]
pub enum AbiSource {
    /// JSON ABI array or build artifact.
    Json(String),
    /// An ABI parsed by the caller.
    Parsed(Abi),
}

/// A contract to register at construction.
#[derive(Debug, Clone)]
pub struct ContractConfig {
    pub address: String,
    pub abi: AbiSource,
}

impl ContractConfig {
    pub fn json(address: impl Into<String>, abi_json: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            abi: AbiSource::Json(abi_json.into()),
        }
    }

    pub fn parsed(address: impl Into<String>, abi: Abi) -> Self {
        Self {
            address: address.into(),
            abi: AbiSource::Parsed(abi),
        }
    }
}

/// Construction input for [`OwnershipVerifier`].
///
/// Either `rpc_endpoint` or `client` is required. When both are given the
/// client is used.
#[derive(Default)]
pub struct VerifierConfig {
    pub rpc_endpoint: Option<String>,
    pub client: Option<Arc<dyn ChainClient>>,
    pub contracts: Vec<ContractConfig>,
    pub options: ReconstructOptions,
}

/// Token ownership verifier.
///
/// # Example
///
/// ```rust,no_run
/// use chaingate_verifier::{abi, OwnershipVerifier, VerificationRequest};
/// use chaingate_core::TokenStandard;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let contract = "0x5FbDB2315678afecb367f032d93F642f64180aa3";
///     let mut verifier = OwnershipVerifier::connect("https://ethereum-sepolia.publicnode.com")?;
///     verifier.register_contract_abi(contract, abi::single_owner_abi()?)?;
///
///     let owner = "0x00000000000000000000000000000000000000aa".parse()?;
///     let request = VerificationRequest::for_address(owner, contract, TokenStandard::SingleOwner);
///
///     println!("owner: {}", verifier.verify_ownership(&request).await?);
///     println!("balance: {}", verifier.get_balance(&request).await?);
///     Ok(())
/// }
/// ```
pub struct OwnershipVerifier {
    client: Arc<dyn ChainClient>,
    registry: ContractRegistry,
    options: ReconstructOptions,
}

impl OwnershipVerifier {
    /// Build a verifier from a config, registering its contracts.
    ///
    /// # Errors
    ///
    /// - `Config` if neither an endpoint nor a client is given, or the
    ///   endpoint URL is invalid
    /// - `InvalidContractConfig` if a contract entry is malformed
    pub fn new(config: VerifierConfig) -> Result<Self> {
        let client: Arc<dyn ChainClient> = match (config.client, config.rpc_endpoint) {
            (Some(client), endpoint) => {
                if endpoint.is_some() {
                    tracing::debug!("both client and rpc endpoint given, using the client");
                }
                client
            }
            (None, Some(endpoint)) => Arc::new(EthersClient::new(&endpoint)?),
            (None, None) => {
                return Err(ChainGateError::Config(
                    "either an RPC endpoint or a chain client is required".to_string(),
                ))
            }
        };

        let mut verifier = Self {
            client,
            registry: ContractRegistry::new(),
            options: config.options,
        };

        for contract in config.contracts {
            match contract.abi {
                AbiSource::Json(json) => verifier.register_contract(&contract.address, &json)?,
                AbiSource::Parsed(abi) => verifier.register_contract_abi(&contract.address, abi)?,
            }
        }

        Ok(verifier)
    }

    /// Connect to an HTTP RPC endpoint with no contracts registered.
    pub fn connect(rpc_url: &str) -> Result<Self> {
        Self::new(VerifierConfig {
            rpc_endpoint: Some(rpc_url.to_string()),
            ..Default::default()
        })
    }

    /// Use a pre-built chain client with no contracts registered.
    pub fn with_client(client: Arc<dyn ChainClient>) -> Self {
        Self {
            client,
            registry: ContractRegistry::new(),
            options: ReconstructOptions::default(),
        }
    }

    /// Replace the reconstruction options.
    pub fn with_options(mut self, options: ReconstructOptions) -> Self {
        self.options = options;
        self
    }

    /// Register a contract from a JSON ABI.
    pub fn register_contract(&mut self, address: &str, abi_json: &str) -> Result<()> {
        self.registry.register(address, abi_json).map(|_| ())
    }

    /// Register a contract from a parsed ABI.
    pub fn register_contract_abi(&mut self, address: &str, abi: Abi) -> Result<()> {
        self.registry.register_abi(address, abi).map(|_| ())
    }

    pub fn registry(&self) -> &ContractRegistry {
        &self.registry
    }

    /// Reconstruct the token ids the requested identity currently holds.
    pub async fn holdings(&self, request: &VerificationRequest) -> Result<HoldingsSet> {
        let (_, _, reconstruction, _) = self.run(request).await?;
        Ok(reconstruction.holdings)
    }

    /// True iff the identity holds at least one token of the contract.
    ///
    /// # Errors
    ///
    /// - `SignatureRecovery` or `ContractNotRegistered` before any chain I/O
    /// - `Core` when the resolved profile is invalid, also before any chain
    ///   I/O. An inverted block range surfaces here as
    ///   `Core(InvalidBlockRange)`; `ChainQuery` is only produced for a
    ///   range that reaches a [`ChainClient`] directly.
    /// - `ChainQuery` or `ChainCall` when the node fails
    pub async fn verify_ownership(&self, request: &VerificationRequest) -> Result<bool> {
        let holdings = self.holdings(request).await?;
        Ok(!holdings.is_empty())
    }

    /// Number of distinct token ids the identity holds.
    pub async fn get_balance(&self, request: &VerificationRequest) -> Result<usize> {
        let holdings = self.holdings(request).await?;
        Ok(holdings.len())
    }

    /// Recover the signer of `message` and verify their ownership.
    ///
    /// Fails with `SignatureRecovery` before any chain I/O when the
    /// signature cannot be recovered.
    pub async fn verify_signed_ownership(
        &self,
        signature: &str,
        message: &str,
        request: SignedRequest,
    ) -> Result<bool> {
        let owner = recover_signer(message, signature)?;
        tracing::debug!(signer = ?owner, "recovered signer");
        self.verify_ownership(&request.for_owner(owner)).await
    }

    /// Full verification with counters and timings.
    pub async fn report(&self, request: &VerificationRequest) -> Result<OwnershipReport> {
        let total_start = Instant::now();
        let (owner, contract, reconstruction, rpc_time) = self.run(request).await?;

        let report = OwnershipReport::new(
            owner,
            contract.address(),
            request.standard,
            reconstruction,
            rpc_time,
            total_start.elapsed(),
        );
        tracing::info!(
            owner = ?report.owner,
            contract = ?report.contract,
            is_owner = report.is_owner,
            balance = report.balance,
            "ownership verified"
        );
        Ok(report)
    }

    /// Signature recovery, contract resolution and profile validation all
    /// happen before the first chain call.
    async fn run(
        &self,
        request: &VerificationRequest,
    ) -> Result<(Address, &ContractHandle, Reconstruction, Duration)> {
        let owner = match &request.identity {
            Identity::Address(address) => *address,
            Identity::Signed { signature, message } => recover_signer(message, signature)?,
        };

        let contract = self.registry.resolve(&request.contract)?;

        let profile = StandardProfile::resolve(request.standard, request.profile.as_ref());
        profile.validate()?;

        let rpc_start = Instant::now();
        let reconstruction = HoldingsReconstructor::with_options(self.client.as_ref(), self.options)
            .reconstruct(contract, owner, &profile)
            .await?;

        Ok((owner, contract, reconstruction, rpc_start.elapsed()))
    }
}
