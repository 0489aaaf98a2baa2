//! Error types for the ChainGate verifier.
//!
//! This module defines all error types that can occur during
//! construction, contract registration, chain I/O, signature recovery
//! and ownership verification.

use thiserror::Error;

/// Errors that can occur during verification operations.
#[derive(Debug, Error)]
pub enum ChainGateError {
    /// Bad construction input (no endpoint and no client, bad URL).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Contract address or ABI is empty or malformed.
    #[error("Invalid contract config: {0}")]
    InvalidContractConfig(String),

    /// No contract is registered under this address.
    #[error("Contract {0} not registered")]
    ContractNotRegistered(String),

    /// A read-only contract call failed.
    #[error("Contract call '{method}' failed: {reason}")]
    ChainCall {
        /// The contract method that was called
        method: String,
        /// Transport or ABI failure description
        reason: String,
    },

    /// A historical log query failed.
    #[error("Log query for '{event}' failed: {reason}")]
    ChainQuery {
        /// The event that was queried
        event: String,
        /// Transport or filter failure description
        reason: String,
    },

    /// The signer could not be recovered from the message and signature.
    #[error("Signature recovery failed: {0}")]
    SignatureRecovery(String),

    /// A wallet account string is not an address.
    #[error("Invalid account address: '{0}'")]
    InvalidAccount(String),

    /// A session step was attempted from the wrong state.
    #[error("Cannot {action} while session is {state}")]
    SessionState {
        /// The attempted step
        action: &'static str,
        /// The current session state
        state: String,
    },

    /// The account holds no tokens of the contract.
    #[error("Account {account} holds no tokens of contract {contract}")]
    OwnershipNotProven {
        /// The account that was checked
        account: String,
        /// The contract that was checked
        contract: String,
    },

    /// Error from chaingate-core (profile validation).
    #[error("Core error: {0}")]
    Core(#[from] chaingate_core::CoreError),
}

impl ChainGateError {
    pub(crate) fn call(method: &str, reason: impl ToString) -> Self {
        ChainGateError::ChainCall {
            method: method.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn query(event: &str, reason: impl ToString) -> Self {
        ChainGateError::ChainQuery {
            event: event.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Whether retrying the whole verification may succeed.
    pub fn is_chain_error(&self) -> bool {
        matches!(
            self,
            ChainGateError::ChainCall { .. } | ChainGateError::ChainQuery { .. }
        )
    }
}

/// Result type alias for verifier operations.
pub type Result<T> = std::result::Result<T, ChainGateError>;
