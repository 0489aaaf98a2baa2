//! # ChainGate Verifier
//!
//! **Token ownership verification from transfer history**
//!
//! This crate answers "does this address hold tokens of this contract?"
//! for single-owner (ERC-721) and multi-quantity (ERC-1155) tokens. It
//! reconstructs current holdings from historical transfer logs fetched over
//! public RPC, re-confirming each candidate id with a balance call, and can
//! recover the claimant from a signed personal message.
//!
//! ## Features
//!
//! - **History-based**: holdings come from `Transfer` / `TransferSingle` /
//!   `TransferBatch` logs addressed to the owner
//! - **Re-confirmed**: every candidate id is checked with a direct balance call
//! - **Signature login**: `personal_sign` recovery feeds the same path
//! - **Pluggable chain access**: the [`ChainClient`] trait is the only I/O boundary
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chaingate_verifier::{abi, OwnershipVerifier, SignedRequest};
//! use chaingate_core::TokenStandard;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let contract = "0x76BE3b62873462d2142405439777e971754E8E77";
//!     let mut verifier = OwnershipVerifier::connect("https://eth.llamarpc.com")?;
//!     verifier.register_contract_abi(contract, abi::multi_quantity_abi()?)?;
//!
//!     let verified = verifier
//!         .verify_signed_ownership(
//!             "0x…signature…",
//!             "Sign in to ChainGate",
//!             SignedRequest::new(contract, TokenStandard::MultiQuantity),
//!         )
//!         .await?;
//!
//!     println!("Verified: {}", verified);
//!     Ok(())
//! }
//! ```

pub mod abi;
pub mod client;
pub mod error;
pub mod holdings;
pub mod registry;
pub mod request;
pub mod result;
pub mod session;
pub mod signature;
pub mod verifier;

// Re-export main types for convenience
pub use client::{ChainClient, EthersClient, LogQuery};
pub use error::ChainGateError;
pub use holdings::{
    ConfirmationPolicy, FailureMode, HoldingsReconstructor, ReconstructOptions, Reconstruction,
};
pub use registry::{ContractHandle, ContractRegistry};
pub use request::{Identity, SignedRequest, VerificationRequest};
pub use result::OwnershipReport;
pub use session::{ConnectionState, OwnershipGate, SessionHooks, WalletSession};
pub use signature::recover_signer;
pub use verifier::{AbiSource, ContractConfig, OwnershipVerifier, VerifierConfig};
