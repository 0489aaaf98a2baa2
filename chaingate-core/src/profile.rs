//! Standard profiles: event, parameter and method names per token standard.
//!
//! A profile tells the reconstructor which events to scan, which decoded
//! parameters hold the recipient and token ids, which read methods confirm
//! a balance, and which block range to cover. Callers may override any
//! name field by field with a [`ProfileOverride`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, Result};
use crate::standard::TokenStandard;

/// Upper bound of a block range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBlockEnd", into = "RawBlockEnd")]
pub enum BlockEnd {
    /// A fixed block height (inclusive).
    Exact(u64),
    /// Whatever block the node considers most recent.
    Latest,
}

impl fmt::Display for BlockEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockEnd::Exact(height) => write!(f, "{}", height),
            BlockEnd::Latest => f.write_str("latest"),
        }
    }
}

impl FromStr for BlockEnd {
    type Err = CoreError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("latest") {
            return Ok(BlockEnd::Latest);
        }
        s.parse::<u64>()
            .map(BlockEnd::Exact)
            .map_err(|_| CoreError::InvalidBlockNumber(s.to_string()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawBlockEnd {
    Height(u64),
    Tag(String),
}

impl TryFrom<RawBlockEnd> for BlockEnd {
    type Error = CoreError;

    fn try_from(raw: RawBlockEnd) -> std::result::Result<Self, Self::Error> {
        match raw {
            RawBlockEnd::Height(height) => Ok(BlockEnd::Exact(height)),
            RawBlockEnd::Tag(tag) => tag.parse(),
        }
    }
}

impl From<BlockEnd> for RawBlockEnd {
    fn from(end: BlockEnd) -> Self {
        match end {
            BlockEnd::Exact(height) => RawBlockEnd::Height(height),
            BlockEnd::Latest => RawBlockEnd::Tag("latest".to_string()),
        }
    }
}

/// Inclusive block range scanned for transfer events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRange {
    /// First block scanned.
    pub start: u64,
    /// Last block scanned.
    pub end: BlockEnd,
}

impl BlockRange {
    /// From genesis to the most recent block.
    pub const fn full() -> Self {
        Self {
            start: 0,
            end: BlockEnd::Latest,
        }
    }

    /// Check that the range is not inverted.
    pub fn validate(&self) -> Result<()> {
        match self.end {
            BlockEnd::Exact(end) if end < self.start => Err(CoreError::InvalidBlockRange {
                start: self.start,
                end,
            }),
            _ => Ok(()),
        }
    }
}

impl Default for BlockRange {
    fn default() -> Self {
        Self::full()
    }
}

impl fmt::Display for BlockRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

/// Names used to interpret single-owner (ERC-721) contracts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleOwnerProfile {
    pub transfer_event: String,
    pub recipient_field: String,
    pub token_id_field: String,
    pub balance_method: String,
    pub block_range: BlockRange,
}

impl Default for SingleOwnerProfile {
    fn default() -> Self {
        Self {
            transfer_event: "Transfer".to_string(),
            recipient_field: "to".to_string(),
            token_id_field: "tokenId".to_string(),
            balance_method: "balanceOf".to_string(),
            block_range: BlockRange::full(),
        }
    }
}

/// Names used to interpret multi-quantity (ERC-1155) contracts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiQuantityProfile {
    pub single_transfer_event: String,
    pub batch_transfer_event: String,
    pub recipient_field: String,
    pub token_id_field: String,
    pub token_ids_field: String,
    pub quantity_field: String,
    pub quantities_field: String,
    pub balance_method: String,
    pub batch_balance_method: String,
    pub block_range: BlockRange,
}

impl Default for MultiQuantityProfile {
    fn default() -> Self {
        Self {
            single_transfer_event: "TransferSingle".to_string(),
            batch_transfer_event: "TransferBatch".to_string(),
            recipient_field: "to".to_string(),
            token_id_field: "id".to_string(),
            token_ids_field: "ids".to_string(),
            quantity_field: "value".to_string(),
            quantities_field: "values".to_string(),
            balance_method: "balanceOf".to_string(),
            batch_balance_method: "balanceOfBatch".to_string(),
            block_range: BlockRange::full(),
        }
    }
}

/// Caller-supplied replacements for profile names.
///
/// Every field is optional; present fields win over the standard's
/// defaults, absent ones keep them. Fields the active standard does not
/// use are ignored, and so are unknown keys when deserializing.
///
/// # Example
///
/// ```rust
/// use chaingate_core::{ProfileOverride, StandardProfile, TokenStandard};
///
/// let overrides = ProfileOverride {
///     balance_method: Some("balanceOfToken".to_string()),
///     start_block: Some(17_000_000),
///     ..Default::default()
/// };
/// let profile = StandardProfile::resolve(TokenStandard::SingleOwner, Some(&overrides));
/// assert_eq!(profile.block_range().start, 17_000_000);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileOverride {
    pub transfer_event: Option<String>,
    pub single_transfer_event: Option<String>,
    pub batch_transfer_event: Option<String>,
    pub recipient_field: Option<String>,
    pub token_id_field: Option<String>,
    pub token_ids_field: Option<String>,
    pub quantity_field: Option<String>,
    pub quantities_field: Option<String>,
    pub balance_method: Option<String>,
    pub batch_balance_method: Option<String>,
    pub start_block: Option<u64>,
    pub end_block: Option<BlockEnd>,
}

impl ProfileOverride {
    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn apply_range(&self, range: &mut BlockRange) {
        if let Some(start) = self.start_block {
            range.start = start;
        }
        if let Some(end) = self.end_block {
            range.end = end;
        }
    }
}

fn pick(target: &mut String, value: &Option<String>) {
    if let Some(value) = value {
        *target = value.clone();
    }
}

fn require(standard: TokenStandard, field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CoreError::MissingProfileField {
            standard: standard.tag(),
            field,
        });
    }
    Ok(())
}

/// The resolved profile for one token standard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "standard", rename_all = "kebab-case")]
pub enum StandardProfile {
    SingleOwner(SingleOwnerProfile),
    MultiQuantity(MultiQuantityProfile),
}

impl StandardProfile {
    /// The built-in profile for a standard.
    pub fn default_for(standard: TokenStandard) -> Self {
        match standard {
            TokenStandard::SingleOwner => StandardProfile::SingleOwner(SingleOwnerProfile::default()),
            TokenStandard::MultiQuantity => {
                StandardProfile::MultiQuantity(MultiQuantityProfile::default())
            }
        }
    }

    /// Merge optional overrides into the defaults, field by field.
    ///
    /// Never fails; call [`StandardProfile::validate`] before using the
    /// result.
    pub fn resolve(standard: TokenStandard, overrides: Option<&ProfileOverride>) -> Self {
        let mut profile = Self::default_for(standard);
        let Some(o) = overrides else {
            return profile;
        };

        match &mut profile {
            StandardProfile::SingleOwner(p) => {
                pick(&mut p.transfer_event, &o.transfer_event);
                pick(&mut p.recipient_field, &o.recipient_field);
                pick(&mut p.token_id_field, &o.token_id_field);
                pick(&mut p.balance_method, &o.balance_method);
                o.apply_range(&mut p.block_range);
            }
            StandardProfile::MultiQuantity(p) => {
                pick(&mut p.single_transfer_event, &o.single_transfer_event);
                pick(&mut p.batch_transfer_event, &o.batch_transfer_event);
                pick(&mut p.recipient_field, &o.recipient_field);
                pick(&mut p.token_id_field, &o.token_id_field);
                pick(&mut p.token_ids_field, &o.token_ids_field);
                pick(&mut p.quantity_field, &o.quantity_field);
                pick(&mut p.quantities_field, &o.quantities_field);
                pick(&mut p.balance_method, &o.balance_method);
                pick(&mut p.batch_balance_method, &o.batch_balance_method);
                o.apply_range(&mut p.block_range);
            }
        }

        profile
    }

    /// The standard this profile describes.
    pub fn standard(&self) -> TokenStandard {
        match self {
            StandardProfile::SingleOwner(_) => TokenStandard::SingleOwner,
            StandardProfile::MultiQuantity(_) => TokenStandard::MultiQuantity,
        }
    }

    /// The block range to scan.
    pub fn block_range(&self) -> BlockRange {
        match self {
            StandardProfile::SingleOwner(p) => p.block_range,
            StandardProfile::MultiQuantity(p) => p.block_range,
        }
    }

    /// Check that every name the reconstructor dereferences is present and
    /// that the block range is not inverted.
    pub fn validate(&self) -> Result<()> {
        let standard = self.standard();
        match self {
            StandardProfile::SingleOwner(p) => {
                require(standard, "transfer_event", &p.transfer_event)?;
                require(standard, "recipient_field", &p.recipient_field)?;
                require(standard, "token_id_field", &p.token_id_field)?;
                require(standard, "balance_method", &p.balance_method)?;
                p.block_range.validate()
            }
            StandardProfile::MultiQuantity(p) => {
                require(standard, "single_transfer_event", &p.single_transfer_event)?;
                require(standard, "batch_transfer_event", &p.batch_transfer_event)?;
                require(standard, "recipient_field", &p.recipient_field)?;
                require(standard, "token_id_field", &p.token_id_field)?;
                require(standard, "token_ids_field", &p.token_ids_field)?;
                require(standard, "balance_method", &p.balance_method)?;
                require(standard, "batch_balance_method", &p.batch_balance_method)?;
                p.block_range.validate()
            }
        }
    }
}
