//! Holdings reconstruction from transfer history.
//!
//! Event history proves that an owner *received* a token, not that they
//! still hold it. The reconstructor therefore walks the transfers to the
//! owner most-recent-first and re-confirms every candidate id with a direct
//! balance call before adding it to the [`HoldingsSet`].
//!
//! - Single-owner: one `balanceOf(owner, id)` call per `Transfer` event.
//! - Multi-quantity: one `balanceOfBatch([owner; n], ids)` call per
//!   `TransferBatch` event, then one `balanceOf(owner, id)` per
//!   `TransferSingle` event; both result sets are merged and deduplicated.
//!
//! Events lacking a usable id field are skipped. Chain errors abort the
//! whole reconstruction unless [`FailureMode::Partial`] is selected.

use ethers_core::abi::Token;
use ethers_core::types::{Address, U256};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use chaingate_core::event::{token_to_uint, token_to_uint_list, SingleTransferFields};
use chaingate_core::{
    DecodedLog, HoldingsSet, MultiQuantityProfile, SingleOwnerProfile, StandardProfile,
    TransferEvent, TransferPayload,
};

use crate::client::{ChainClient, LogQuery};
use crate::error::{ChainGateError, Result};
use crate::registry::ContractHandle;

/// How often a token id is re-confirmed against the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConfirmationPolicy {
    /// One balance call per event, even for ids already confirmed.
    #[default]
    EveryEvent,
    /// Skip ids whose balance was already read during this call.
    ///
    /// Balance reads are idempotent within a call, so the final set is the
    /// same as with `EveryEvent`; only the number of calls drops.
    OncePerToken,
}

/// What a failed balance call does to the reconstruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureMode {
    /// Abort and return the error.
    #[default]
    FailFast,
    /// Log the error, skip that event and keep going. Log queries still
    /// fail fast.
    Partial,
}

/// Tuning knobs for [`HoldingsReconstructor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReconstructOptions {
    pub confirmation: ConfirmationPolicy,
    pub failure_mode: FailureMode,
}

/// Outcome of one reconstruction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconstruction {
    /// Ids the owner currently holds.
    pub holdings: HoldingsSet,
    /// Transfer events examined.
    pub events_scanned: usize,
    /// Events skipped for missing fields (or failed calls in partial mode).
    pub events_skipped: usize,
    /// Balance calls issued (single and batch).
    pub balance_calls: usize,
}

#[derive(Default)]
struct Tally {
    result: Reconstruction,
    checked: HashSet<U256>,
}

impl Tally {
    fn record(&mut self, token_id: U256, balance: U256) {
        self.checked.insert(token_id);
        if balance > U256::zero() {
            self.result.holdings.insert(token_id);
        }
    }
}

/// Turns transfer history into currently-held token ids.
pub struct HoldingsReconstructor<'a> {
    client: &'a dyn ChainClient,
    options: ReconstructOptions,
}

impl<'a> HoldingsReconstructor<'a> {
    pub fn new(client: &'a dyn ChainClient) -> Self {
        Self::with_options(client, ReconstructOptions::default())
    }

    pub fn with_options(client: &'a dyn ChainClient, options: ReconstructOptions) -> Self {
        Self { client, options }
    }

    /// Reconstruct the holdings of `owner` on `contract` under `profile`.
    ///
    /// The profile is expected to be validated by the caller.
    pub async fn reconstruct(
        &self,
        contract: &ContractHandle,
        owner: Address,
        profile: &StandardProfile,
    ) -> Result<Reconstruction> {
        let result = match profile {
            StandardProfile::SingleOwner(p) => self.single_owner(contract, owner, p).await?,
            StandardProfile::MultiQuantity(p) => self.multi_quantity(contract, owner, p).await?,
        };

        tracing::debug!(
            contract = ?contract.address(),
            owner = ?owner,
            standard = %profile.standard(),
            held = result.holdings.len(),
            scanned = result.events_scanned,
            skipped = result.events_skipped,
            balance_calls = result.balance_calls,
            "reconstructed holdings"
        );

        Ok(result)
    }

    async fn single_owner(
        &self,
        contract: &ContractHandle,
        owner: Address,
        profile: &SingleOwnerProfile,
    ) -> Result<Reconstruction> {
        let query = LogQuery {
            event: profile.transfer_event.clone(),
            recipient_field: profile.recipient_field.clone(),
            recipient: owner,
            range: profile.block_range,
        };
        let logs = self.client.get_logs(contract, &query).await?;

        let mut tally = Tally::default();
        self.confirm_single_events(
            contract,
            owner,
            &logs,
            profile.transfer_fields(),
            &profile.balance_method,
            &mut tally,
        )
        .await?;

        Ok(tally.result)
    }

    async fn multi_quantity(
        &self,
        contract: &ContractHandle,
        owner: Address,
        profile: &MultiQuantityProfile,
    ) -> Result<Reconstruction> {
        let batch_query = LogQuery {
            event: profile.batch_transfer_event.clone(),
            recipient_field: profile.recipient_field.clone(),
            recipient: owner,
            range: profile.block_range,
        };
        let single_query = LogQuery {
            event: profile.single_transfer_event.clone(),
            ..batch_query.clone()
        };

        // Independent reads; each list is still walked newest first below.
        let (batch_logs, single_logs) = tokio::try_join!(
            self.client.get_logs(contract, &batch_query),
            self.client.get_logs(contract, &single_query),
        )?;

        let mut batch_tally = Tally::default();
        self.confirm_batch_events(contract, owner, &batch_logs, profile, &mut batch_tally)
            .await?;

        let mut single_tally = Tally {
            checked: match self.options.confirmation {
                ConfirmationPolicy::OncePerToken => batch_tally.checked.clone(),
                ConfirmationPolicy::EveryEvent => HashSet::new(),
            },
            ..Tally::default()
        };
        self.confirm_single_events(
            contract,
            owner,
            &single_logs,
            profile.single_fields(),
            &profile.balance_method,
            &mut single_tally,
        )
        .await?;

        let mut result = batch_tally.result;
        result.holdings.merge(single_tally.result.holdings);
        result.events_scanned += single_tally.result.events_scanned;
        result.events_skipped += single_tally.result.events_skipped;
        result.balance_calls += single_tally.result.balance_calls;
        Ok(result)
    }

    async fn confirm_single_events(
        &self,
        contract: &ContractHandle,
        owner: Address,
        logs: &[DecodedLog],
        fields: SingleTransferFields<'_>,
        balance_method: &str,
        tally: &mut Tally,
    ) -> Result<()> {
        for log in logs.iter().rev() {
            tally.result.events_scanned += 1;

            let event = match TransferEvent::decode_single(log, fields, owner) {
                Ok(event) => event,
                Err(e) => {
                    tracing::warn!(block = ?log.block_number, error = %e, "skipping transfer event");
                    tally.result.events_skipped += 1;
                    continue;
                }
            };
            let TransferPayload::Single { token_id, .. } = event.payload else {
                continue;
            };

            if self.already_checked(tally, &token_id) {
                continue;
            }

            tally.result.balance_calls += 1;
            match self.balance_of(contract, balance_method, owner, token_id).await {
                Ok(balance) => tally.record(token_id, balance),
                Err(e) => self.absorb(e, log, tally)?,
            }
        }
        Ok(())
    }

    async fn confirm_batch_events(
        &self,
        contract: &ContractHandle,
        owner: Address,
        logs: &[DecodedLog],
        profile: &MultiQuantityProfile,
        tally: &mut Tally,
    ) -> Result<()> {
        for log in logs.iter().rev() {
            tally.result.events_scanned += 1;

            let event = match TransferEvent::decode_batch(log, profile.batch_fields(), owner) {
                Ok(event) => event,
                Err(e) => {
                    tracing::warn!(block = ?log.block_number, error = %e, "skipping batch event");
                    tally.result.events_skipped += 1;
                    continue;
                }
            };

            let ids: Vec<U256> = event
                .token_ids()
                .iter()
                .filter(|id| !self.already_checked(tally, id))
                .copied()
                .collect();
            if ids.is_empty() {
                continue;
            }

            tally.result.balance_calls += 1;
            match self
                .batch_balance_of(contract, &profile.batch_balance_method, owner, &ids)
                .await
            {
                Ok(balances) => {
                    for (id, balance) in ids.into_iter().zip(balances) {
                        tally.record(id, balance);
                    }
                }
                Err(e) => self.absorb(e, log, tally)?,
            }
        }
        Ok(())
    }

    fn already_checked(&self, tally: &Tally, token_id: &U256) -> bool {
        self.options.confirmation == ConfirmationPolicy::OncePerToken
            && tally.checked.contains(token_id)
    }

    /// Fail fast, or in partial mode count the event as skipped.
    fn absorb(&self, error: ChainGateError, log: &DecodedLog, tally: &mut Tally) -> Result<()> {
        match self.options.failure_mode {
            FailureMode::FailFast => Err(error),
            FailureMode::Partial => {
                tracing::warn!(block = ?log.block_number, error = %error, "balance call failed, event skipped");
                tally.result.events_skipped += 1;
                Ok(())
            }
        }
    }

    async fn balance_of(
        &self,
        contract: &ContractHandle,
        method: &str,
        owner: Address,
        token_id: U256,
    ) -> Result<U256> {
        let output = self
            .client
            .call_read(
                contract,
                method,
                vec![Token::Address(owner), Token::Uint(token_id)],
            )
            .await?;

        output
            .first()
            .and_then(token_to_uint)
            .ok_or_else(|| ChainGateError::call(method, "expected a uint256 balance"))
    }

    async fn batch_balance_of(
        &self,
        contract: &ContractHandle,
        method: &str,
        owner: Address,
        token_ids: &[U256],
    ) -> Result<Vec<U256>> {
        let accounts = vec![Token::Address(owner); token_ids.len()];
        let ids = token_ids.iter().copied().map(Token::Uint).collect();

        let output = self
            .client
            .call_read(contract, method, vec![Token::Array(accounts), Token::Array(ids)])
            .await?;

        let balances = output
            .first()
            .and_then(token_to_uint_list)
            .ok_or_else(|| ChainGateError::call(method, "expected a uint256[] of balances"))?;

        if balances.len() != token_ids.len() {
            return Err(ChainGateError::call(
                method,
                format!(
                    "returned {} balances for {} ids",
                    balances.len(),
                    token_ids.len()
                ),
            ));
        }
        Ok(balances)
    }
}
