//! Ownership report structure.
//!
//! Carries the verdict, the reconstructed holdings and the counters and
//! timings of one verification.

use ethers_core::types::Address;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use chaingate_core::{HoldingsSet, TokenStandard};

use crate::holdings::Reconstruction;

/// Result of one ownership verification.
///
/// # Example
///
/// ```rust
/// use chaingate_verifier::OwnershipReport;
/// use chaingate_core::{HoldingsSet, TokenStandard};
/// use ethers_core::types::{Address, U256};
/// use std::time::Duration;
///
/// let report = OwnershipReport {
///     owner: Address::repeat_byte(0x42),
///     contract: Address::repeat_byte(0x01),
///     standard: TokenStandard::SingleOwner,
///     is_owner: true,
///     balance: 1,
///     holdings: [U256::from(5u64)].into_iter().collect::<HoldingsSet>(),
///     events_scanned: 2,
///     events_skipped: 0,
///     balance_calls: 2,
///     rpc_time: Duration::from_millis(120),
///     total_time: Duration::from_millis(125),
/// };
///
/// println!("{}", report);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnershipReport {
    /// The address whose holdings were reconstructed.
    pub owner: Address,

    /// The token contract.
    pub contract: Address,

    /// Token standard used to interpret events.
    pub standard: TokenStandard,

    /// True iff at least one token is held.
    pub is_owner: bool,

    /// Number of distinct token ids held.
    pub balance: usize,

    /// The held token ids.
    pub holdings: HoldingsSet,

    /// Transfer events examined.
    pub events_scanned: usize,

    /// Events skipped for missing fields.
    pub events_skipped: usize,

    /// Balance calls issued.
    pub balance_calls: usize,

    /// Time spent in chain I/O and reconstruction.
    #[serde(with = "duration_millis")]
    pub rpc_time: Duration,

    /// Total time from start to finish.
    #[serde(with = "duration_millis")]
    pub total_time: Duration,
}

impl OwnershipReport {
    pub(crate) fn new(
        owner: Address,
        contract: Address,
        standard: TokenStandard,
        reconstruction: Reconstruction,
        rpc_time: Duration,
        total_time: Duration,
    ) -> Self {
        let Reconstruction {
            holdings,
            events_scanned,
            events_skipped,
            balance_calls,
        } = reconstruction;

        Self {
            owner,
            contract,
            standard,
            is_owner: !holdings.is_empty(),
            balance: holdings.len(),
            holdings,
            events_scanned,
            events_skipped,
            balance_calls,
            rpc_time,
            total_time,
        }
    }
}

/// Custom serialization for Duration as milliseconds.
mod duration_millis {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (duration.as_millis() as u64).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

impl std::fmt::Display for OwnershipReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_owner {
            write!(
                f,
                "{:?} OWNS {} token(s) of {:?} ({}, {} events, {} balance calls, {:?} total)",
                self.owner,
                self.balance,
                self.contract,
                self.standard,
                self.events_scanned,
                self.balance_calls,
                self.total_time
            )
        } else {
            write!(
                f,
                "{:?} holds NO tokens of {:?} ({}, {} events scanned)",
                self.owner, self.contract, self.standard, self.events_scanned
            )
        }
    }
}
