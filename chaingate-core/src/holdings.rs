//! The set of token ids an owner currently holds.

use ethers_core::types::U256;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Deduplicated token identifiers.
///
/// Iteration is ascending so reports are deterministic; the order in which
/// ids were confirmed carries no meaning.
///
/// # Example
///
/// ```rust
/// use chaingate_core::HoldingsSet;
/// use ethers_core::types::U256;
///
/// let mut holdings = HoldingsSet::new();
/// holdings.insert(U256::from(9u64));
/// holdings.insert(U256::from(5u64));
/// holdings.insert(U256::from(9u64));
///
/// assert_eq!(holdings.len(), 2);
/// assert_eq!(holdings.to_vec(), vec![U256::from(5u64), U256::from(9u64)]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HoldingsSet {
    ids: BTreeSet<U256>,
}

impl HoldingsSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an id. Returns false if it was already present.
    pub fn insert(&mut self, token_id: U256) -> bool {
        self.ids.insert(token_id)
    }

    /// Union another set into this one.
    pub fn merge(&mut self, other: HoldingsSet) {
        self.ids.extend(other.ids);
    }

    pub fn contains(&self, token_id: &U256) -> bool {
        self.ids.contains(token_id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &U256> {
        self.ids.iter()
    }

    pub fn to_vec(&self) -> Vec<U256> {
        self.ids.iter().copied().collect()
    }

    /// Ids rendered as decimal strings.
    pub fn to_decimal_strings(&self) -> Vec<String> {
        self.ids.iter().map(|id| id.to_string()).collect()
    }
}

impl FromIterator<U256> for HoldingsSet {
    fn from_iter<I: IntoIterator<Item = U256>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

impl Extend<U256> for HoldingsSet {
    fn extend<I: IntoIterator<Item = U256>>(&mut self, iter: I) {
        self.ids.extend(iter);
    }
}

impl IntoIterator for HoldingsSet {
    type Item = U256;
    type IntoIter = std::collections::btree_set::IntoIter<U256>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.into_iter()
    }
}
