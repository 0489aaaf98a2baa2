//! Chain client adapter: the single external-I/O boundary.
//!
//! [`ChainClient`] exposes the two reads the reconstructor needs: a
//! read-only contract call and a historical log query filtered on the
//! recipient. [`EthersClient`] implements it over an
//! `ethers_providers::Provider<Http>`.
//!
//! Every call is a single attempt. Failures surface as `ChainCall` /
//! `ChainQuery` errors and timeouts come from the HTTP transport.

use async_trait::async_trait;
use ethers_core::abi::{Event, RawLog, Token};
use ethers_core::types::{
    transaction::eip2718::TypedTransaction, Address, BlockNumber, Filter, Log, TransactionRequest,
    H256,
};
use ethers_providers::{Http, Middleware, Provider};
use std::sync::Arc;

use chaingate_core::{BlockEnd, BlockRange, DecodedLog};

use crate::error::{ChainGateError, Result};
use crate::registry::ContractHandle;

/// Parameters of one historical log query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogQuery {
    /// Event name as declared in the contract ABI.
    pub event: String,
    /// Name of the indexed event parameter holding the recipient.
    pub recipient_field: String,
    /// Only logs transferring to this address are returned.
    pub recipient: Address,
    /// Inclusive block range.
    pub range: BlockRange,
}

/// Read access to a chain.
///
/// Implementations must return logs oldest first.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Execute a read-only call and return the decoded outputs.
    async fn call_read(
        &self,
        contract: &ContractHandle,
        method: &str,
        args: Vec<Token>,
    ) -> Result<Vec<Token>>;

    /// Fetch logs of one event whose recipient matches, oldest first.
    async fn get_logs(&self, contract: &ContractHandle, query: &LogQuery) -> Result<Vec<DecodedLog>>;
}

/// [`ChainClient`] over an HTTP JSON-RPC endpoint.
///
/// # Example
///
/// ```rust,no_run
/// use chaingate_verifier::EthersClient;
///
/// let client = EthersClient::new("https://ethereum-sepolia.publicnode.com")?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct EthersClient {
    provider: Arc<Provider<Http>>,
}

impl EthersClient {
    /// Create a client from an RPC URL.
    ///
    /// # Errors
    ///
    /// Returns `Config` if the URL is invalid.
    pub fn new(rpc_url: &str) -> Result<Self> {
        let provider = Provider::<Http>::try_from(rpc_url)
            .map_err(|e| ChainGateError::Config(format!("Invalid RPC URL: {}", e)))?;
        Ok(Self::from_provider(provider))
    }

    /// Wrap a pre-built provider.
    pub fn from_provider(provider: Provider<Http>) -> Self {
        Self {
            provider: Arc::new(provider),
        }
    }

    pub fn provider(&self) -> &Provider<Http> {
        &self.provider
    }
}

#[async_trait]
impl ChainClient for EthersClient {
    async fn call_read(
        &self,
        contract: &ContractHandle,
        method: &str,
        args: Vec<Token>,
    ) -> Result<Vec<Token>> {
        let function = contract.function(method, args.len())?;
        let data = function
            .encode_input(&args)
            .map_err(|e| ChainGateError::call(method, format!("cannot encode arguments: {}", e)))?;

        let tx: TypedTransaction = TransactionRequest::new()
            .to(contract.address())
            .data(data)
            .into();

        tracing::debug!(contract = ?contract.address(), method, "eth_call");

        let raw = self
            .provider
            .call(&tx, None)
            .await
            .map_err(|e| ChainGateError::call(method, e))?;

        function
            .decode_output(raw.as_ref())
            .map_err(|e| ChainGateError::call(method, format!("cannot decode output: {}", e)))
    }

    async fn get_logs(&self, contract: &ContractHandle, query: &LogQuery) -> Result<Vec<DecodedLog>> {
        query
            .range
            .validate()
            .map_err(|e| ChainGateError::query(&query.event, e))?;

        let event = contract.event(&query.event)?;
        let filter = build_filter(contract.address(), event, query)?;

        tracing::debug!(
            contract = ?contract.address(),
            event = %query.event,
            recipient = ?query.recipient,
            range = %query.range,
            "eth_getLogs"
        );

        let logs = self
            .provider
            .get_logs(&filter)
            .await
            .map_err(|e| ChainGateError::query(&query.event, e))?;

        Ok(decode_logs(event, logs))
    }
}

/// Build the log filter: contract address, event signature in topic 0 and
/// the recipient in the topic slot of its indexed parameter.
fn build_filter(address: Address, event: &Event, query: &LogQuery) -> Result<Filter> {
    if event.anonymous {
        return Err(ChainGateError::query(&query.event, "anonymous events are not supported"));
    }

    let slot = event
        .inputs
        .iter()
        .filter(|param| param.indexed)
        .position(|param| param.name == query.recipient_field)
        .ok_or_else(|| {
            ChainGateError::query(
                &query.event,
                format!("'{}' is not an indexed parameter", query.recipient_field),
            )
        })?;

    let to_block = match query.range.end {
        BlockEnd::Exact(height) => BlockNumber::Number(height.into()),
        BlockEnd::Latest => BlockNumber::Latest,
    };

    let filter = Filter::new()
        .address(address)
        .topic0(event.signature())
        .from_block(BlockNumber::Number(query.range.start.into()))
        .to_block(to_block);

    let recipient = H256::from(query.recipient);
    match slot {
        0 => Ok(filter.topic1(recipient)),
        1 => Ok(filter.topic2(recipient)),
        2 => Ok(filter.topic3(recipient)),
        _ => Err(ChainGateError::query(
            &query.event,
            "recipient must be among the first three indexed parameters",
        )),
    }
}

/// Decode raw logs against the event ABI, sorted oldest first.
///
/// Logs the ABI cannot decode are dropped with a warning.
fn decode_logs(event: &Event, logs: Vec<Log>) -> Vec<DecodedLog> {
    let mut decoded: Vec<DecodedLog> = logs
        .into_iter()
        .filter_map(|log| {
            let raw = RawLog {
                topics: log.topics.clone(),
                data: log.data.to_vec(),
            };
            match event.parse_log(raw) {
                Ok(parsed) => Some(DecodedLog {
                    block_number: log.block_number.map(|n| n.as_u64()),
                    log_index: log.log_index.map(|i| i.low_u64()),
                    params: parsed
                        .params
                        .into_iter()
                        .map(|param| (param.name, param.value))
                        .collect(),
                }),
                Err(e) => {
                    tracing::warn!(
                        event = %event.name,
                        tx = ?log.transaction_hash,
                        error = %e,
                        "dropping undecodable log"
                    );
                    None
                }
            }
        })
        .collect();

    decoded.sort_by_key(DecodedLog::chain_position);
    decoded
}
