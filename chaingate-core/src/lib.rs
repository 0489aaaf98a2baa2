//! # ChainGate Core
//!
//! **Token standard profiles, transfer events and holdings sets**
//!
//! This crate holds the I/O-free half of ChainGate: the typed description
//! of each supported token standard, the interpretation of decoded transfer
//! logs, and the deduplicated set of token ids an owner holds.
//!
//! ## Features
//!
//! - **Typed profiles**: one record per standard, selected by [`TokenStandard`]
//! - **Field-by-field overrides**: callers rename events or methods without
//!   restating the whole profile
//! - **Chain-sized integers**: ids and balances are `U256`
//!
//! ## Quick Start
//!
//! ```rust
//! use chaingate_core::{ProfileOverride, StandardProfile, TokenStandard};
//!
//! let standard: TokenStandard = "erc1155".parse().unwrap();
//! let overrides = ProfileOverride {
//!     start_block: Some(12_000_000),
//!     ..Default::default()
//! };
//!
//! let profile = StandardProfile::resolve(standard, Some(&overrides));
//! profile.validate().unwrap();
//! assert_eq!(profile.block_range().start, 12_000_000);
//! ```

pub mod error;
pub mod event;
pub mod holdings;
pub mod profile;
pub mod standard;

// Re-export main types for convenience
pub use error::CoreError;
pub use event::{DecodedLog, TransferEvent, TransferPayload};
pub use holdings::HoldingsSet;
pub use profile::{
    BlockEnd, BlockRange, MultiQuantityProfile, ProfileOverride, SingleOwnerProfile,
    StandardProfile,
};
pub use standard::TokenStandard;
