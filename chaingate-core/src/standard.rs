//! Supported token standards.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// The two fungibility models ChainGate can verify.
///
/// # Example
///
/// ```rust
/// use chaingate_core::TokenStandard;
///
/// let standard: TokenStandard = "erc1155".parse().unwrap();
/// assert_eq!(standard, TokenStandard::MultiQuantity);
/// assert_eq!(standard.to_string(), "erc1155");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenStandard {
    /// One owner per token id (ERC-721).
    #[serde(alias = "erc721")]
    SingleOwner,
    /// Many holders per token id with quantities (ERC-1155).
    #[serde(alias = "erc1155")]
    MultiQuantity,
}

impl TokenStandard {
    /// All supported standards.
    pub const ALL: [TokenStandard; 2] = [TokenStandard::SingleOwner, TokenStandard::MultiQuantity];

    /// Short tag used on the command line and in logs.
    pub fn tag(&self) -> &'static str {
        match self {
            TokenStandard::SingleOwner => "erc721",
            TokenStandard::MultiQuantity => "erc1155",
        }
    }

    /// Human readable description.
    pub fn description(&self) -> &'static str {
        match self {
            TokenStandard::SingleOwner => "Single-owner tokens (ERC-721)",
            TokenStandard::MultiQuantity => "Multi-quantity tokens (ERC-1155)",
        }
    }
}

impl fmt::Display for TokenStandard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for TokenStandard {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "erc721" | "erc-721" | "single-owner" | "singleowner" => Ok(TokenStandard::SingleOwner),
            "erc1155" | "erc-1155" | "multi-quantity" | "multiquantity" => {
                Ok(TokenStandard::MultiQuantity)
            }
            _ => Err(CoreError::UnknownStandard(s.to_string())),
        }
    }
}
