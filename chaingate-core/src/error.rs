//! Error types for the ChainGate core library.
//!
//! This module defines the errors that can occur while resolving
//! token standard profiles and interpreting decoded transfer events.

use thiserror::Error;

/// Errors that can occur in ChainGate core operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The standard tag is not one of the supported token standards.
    #[error("Unknown token standard: '{0}'. Valid standards: erc721, erc1155")]
    UnknownStandard(String),

    /// A name the reconstructor dereferences is empty after merging overrides.
    #[error("Profile for {standard} is missing required field '{field}'")]
    MissingProfileField {
        /// The standard whose profile is incomplete
        standard: &'static str,
        /// The profile field that is empty
        field: &'static str,
    },

    /// Block range start lies past its exact end.
    #[error("Invalid block range: start {start} is after end {end}")]
    InvalidBlockRange {
        /// First block of the range
        start: u64,
        /// Last block of the range
        end: u64,
    },

    /// A block range bound could not be parsed.
    #[error("Invalid block number: '{0}'. Use a decimal height or 'latest'")]
    InvalidBlockNumber(String),

    /// A decoded event lacks a field the active profile requires.
    #[error("Event '{event}' has no usable '{field}' field")]
    EventDecode {
        /// The event name from the profile
        event: String,
        /// The missing or ill-typed parameter name
        field: String,
    },
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
