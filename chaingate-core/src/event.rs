//! Decoded logs and standard-agnostic transfer events.
//!
//! The chain adapter hands back [`DecodedLog`]s: the ABI-decoded, named
//! parameters of one log. This module turns them into [`TransferEvent`]s
//! using the parameter names of the active profile.

use ethers_core::abi::Token;
use ethers_core::types::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::profile::{MultiQuantityProfile, SingleOwnerProfile};

/// One log with its ABI-decoded parameters, as returned by a chain client.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DecodedLog {
    /// Block the log was emitted in (None while pending).
    pub block_number: Option<u64>,
    /// Position of the log within its block.
    pub log_index: Option<u64>,
    /// Decoded parameters, by ABI name.
    pub params: Vec<(String, Token)>,
}

impl DecodedLog {
    /// Create an empty log at the given position.
    pub fn new(block_number: u64, log_index: u64) -> Self {
        Self {
            block_number: Some(block_number),
            log_index: Some(log_index),
            params: Vec::new(),
        }
    }

    /// Builder-style parameter insertion.
    pub fn with_param(mut self, name: impl Into<String>, value: Token) -> Self {
        self.params.push((name.into(), value));
        self
    }

    /// Look up a parameter by name.
    pub fn param(&self, name: &str) -> Option<&Token> {
        self.params
            .iter()
            .find(|(param, _)| param == name)
            .map(|(_, value)| value)
    }

    /// Sort key for chronological order. Pending logs sort last.
    pub fn chain_position(&self) -> (u64, u64) {
        (
            self.block_number.unwrap_or(u64::MAX),
            self.log_index.unwrap_or(u64::MAX),
        )
    }
}

/// Parameter names for a single-id transfer event.
#[derive(Debug, Clone, Copy)]
pub struct SingleTransferFields<'a> {
    pub event: &'a str,
    pub recipient: &'a str,
    pub token_id: &'a str,
    pub quantity: Option<&'a str>,
}

/// Parameter names for a batch transfer event.
#[derive(Debug, Clone, Copy)]
pub struct BatchTransferFields<'a> {
    pub event: &'a str,
    pub recipient: &'a str,
    pub token_ids: &'a str,
    pub quantities: &'a str,
}

impl SingleOwnerProfile {
    /// Field names of the `Transfer` event.
    pub fn transfer_fields(&self) -> SingleTransferFields<'_> {
        SingleTransferFields {
            event: &self.transfer_event,
            recipient: &self.recipient_field,
            token_id: &self.token_id_field,
            quantity: None,
        }
    }
}

impl MultiQuantityProfile {
    /// Field names of the `TransferSingle` event.
    pub fn single_fields(&self) -> SingleTransferFields<'_> {
        SingleTransferFields {
            event: &self.single_transfer_event,
            recipient: &self.recipient_field,
            token_id: &self.token_id_field,
            quantity: Some(&self.quantity_field),
        }
    }

    /// Field names of the `TransferBatch` event.
    pub fn batch_fields(&self) -> BatchTransferFields<'_> {
        BatchTransferFields {
            event: &self.batch_transfer_event,
            recipient: &self.recipient_field,
            token_ids: &self.token_ids_field,
            quantities: &self.quantities_field,
        }
    }
}

/// What a transfer moved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferPayload {
    Single {
        token_id: U256,
        quantity: Option<U256>,
    },
    Batch {
        token_ids: Vec<U256>,
        quantities: Vec<U256>,
    },
}

/// A transfer to the owner under scan, independent of the token standard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferEvent {
    pub recipient: Address,
    pub block_number: Option<u64>,
    pub log_index: Option<u64>,
    pub payload: TransferPayload,
}

impl TransferEvent {
    /// Interpret a log as a single-id transfer.
    ///
    /// `fallback_recipient` is used when the log carries no usable recipient
    /// parameter; logs are already filtered on it server-side.
    ///
    /// # Errors
    ///
    /// `EventDecode` when the token id is absent or not an unsigned integer.
    pub fn decode_single(
        log: &DecodedLog,
        fields: SingleTransferFields<'_>,
        fallback_recipient: Address,
    ) -> Result<Self> {
        let token_id = log
            .param(fields.token_id)
            .and_then(token_to_uint)
            .ok_or_else(|| decode_error(fields.event, fields.token_id))?;

        let quantity = fields
            .quantity
            .and_then(|name| log.param(name))
            .and_then(token_to_uint);

        Ok(Self {
            recipient: recipient_of(log, fields.recipient, fallback_recipient),
            block_number: log.block_number,
            log_index: log.log_index,
            payload: TransferPayload::Single { token_id, quantity },
        })
    }

    /// Interpret a log as a batch transfer.
    ///
    /// # Errors
    ///
    /// `EventDecode` when the id list is absent or ill-typed. A quantity list
    /// that is missing or not parallel to the ids decodes as empty.
    pub fn decode_batch(
        log: &DecodedLog,
        fields: BatchTransferFields<'_>,
        fallback_recipient: Address,
    ) -> Result<Self> {
        let token_ids = log
            .param(fields.token_ids)
            .and_then(token_to_uint_list)
            .ok_or_else(|| decode_error(fields.event, fields.token_ids))?;

        let quantities = log
            .param(fields.quantities)
            .and_then(token_to_uint_list)
            .filter(|q| q.len() == token_ids.len())
            .unwrap_or_default();

        Ok(Self {
            recipient: recipient_of(log, fields.recipient, fallback_recipient),
            block_number: log.block_number,
            log_index: log.log_index,
            payload: TransferPayload::Batch {
                token_ids,
                quantities,
            },
        })
    }

    /// Token ids carried by this transfer.
    pub fn token_ids(&self) -> &[U256] {
        match &self.payload {
            TransferPayload::Single { token_id, .. } => std::slice::from_ref(token_id),
            TransferPayload::Batch { token_ids, .. } => token_ids,
        }
    }
}

fn decode_error(event: &str, field: &str) -> CoreError {
    CoreError::EventDecode {
        event: event.to_string(),
        field: field.to_string(),
    }
}

fn recipient_of(log: &DecodedLog, field: &str, fallback: Address) -> Address {
    match log.param(field) {
        Some(Token::Address(address)) => *address,
        _ => fallback,
    }
}

/// Read an unsigned integer token.
pub fn token_to_uint(token: &Token) -> Option<U256> {
    match token {
        Token::Uint(value) => Some(*value),
        _ => None,
    }
}

/// Read an array of unsigned integer tokens.
pub fn token_to_uint_list(token: &Token) -> Option<Vec<U256>> {
    match token {
        Token::Array(items) | Token::FixedArray(items) => items.iter().map(token_to_uint).collect(),
        _ => None,
    }
}
