#![allow(dead_code)]

use async_trait::async_trait;
use chaingate_core::DecodedLog;
use chaingate_verifier::{abi, ChainClient, ChainGateError, ContractHandle, LogQuery, OwnershipVerifier};
use ethers_core::abi::Token;
use ethers_core::types::{Address, U256};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

pub const ERC721_CONTRACT: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";
pub const ERC1155_CONTRACT: &str = "0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512";
pub const UNREGISTERED: &str = "0x9fE46736679d2D9a65F0992F2272dE9f3c7fa6e0";

pub fn wallet() -> Address {
    "0x70997970C51812dc3A010C7d01b50e0d17dc79C8".parse().unwrap()
}

/// Scripted chain: logs per event name, balances per (owner, id), and a
/// record of every call made.
#[derive(Default)]
pub struct MockChain {
    logs: HashMap<String, Vec<DecodedLog>>,
    balances: HashMap<(Address, U256), U256>,
    failing_ids: HashSet<U256>,
    fail_queries: bool,
    pub queries: Mutex<Vec<LogQuery>>,
    pub calls: Mutex<Vec<(String, Vec<Token>)>>,
}

impl MockChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_logs(mut self, event: &str, logs: Vec<DecodedLog>) -> Self {
        self.logs.entry(event.to_string()).or_default().extend(logs);
        self
    }

    pub fn with_balance(mut self, owner: Address, token_id: u64, balance: u64) -> Self {
        self.balances
            .insert((owner, U256::from(token_id)), U256::from(balance));
        self
    }

    pub fn with_failing_id(mut self, token_id: u64) -> Self {
        self.failing_ids.insert(U256::from(token_id));
        self
    }

    pub fn with_failing_queries(mut self) -> Self {
        self.fail_queries = true;
        self
    }

    pub fn query_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn chain_io_count(&self) -> usize {
        self.query_count() + self.call_count()
    }

    fn balance(&self, owner: Address, token_id: U256) -> Result<U256, ChainGateError> {
        if self.failing_ids.contains(&token_id) {
            return Err(ChainGateError::ChainCall {
                method: "balanceOf".to_string(),
                reason: "execution reverted".to_string(),
            });
        }
        Ok(self
            .balances
            .get(&(owner, token_id))
            .copied()
            .unwrap_or_default())
    }
}

#[async_trait]
impl ChainClient for MockChain {
    async fn call_read(
        &self,
        _contract: &ContractHandle,
        method: &str,
        args: Vec<Token>,
    ) -> Result<Vec<Token>, ChainGateError> {
        self.calls
            .lock()
            .unwrap()
            .push((method.to_string(), args.clone()));

        match args.as_slice() {
            [Token::Address(owner), Token::Uint(id)] => {
                Ok(vec![Token::Uint(self.balance(*owner, *id)?)])
            }
            [Token::Array(owners), Token::Array(ids)] => {
                let mut balances = Vec::with_capacity(ids.len());
                for (owner, id) in owners.iter().zip(ids) {
                    let (Token::Address(owner), Token::Uint(id)) = (owner, id) else {
                        return Err(ChainGateError::ChainCall {
                            method: method.to_string(),
                            reason: "bad batch arguments".to_string(),
                        });
                    };
                    balances.push(Token::Uint(self.balance(*owner, *id)?));
                }
                Ok(vec![Token::Array(balances)])
            }
            _ => Err(ChainGateError::ChainCall {
                method: method.to_string(),
                reason: "unexpected arguments".to_string(),
            }),
        }
    }

    async fn get_logs(
        &self,
        _contract: &ContractHandle,
        query: &LogQuery,
    ) -> Result<Vec<DecodedLog>, ChainGateError> {
        self.queries.lock().unwrap().push(query.clone());

        if self.fail_queries {
            return Err(ChainGateError::ChainQuery {
                event: query.event.clone(),
                reason: "connection refused".to_string(),
            });
        }

        Ok(self
            .logs
            .get(&query.event)
            .map(|logs| {
                logs.iter()
                    .filter(|log| matches!(log.param("to"), Some(Token::Address(to)) if *to == query.recipient))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

pub fn transfer_log(block: u64, to: Address, token_id: u64) -> DecodedLog {
    DecodedLog::new(block, 0)
        .with_param("from", Token::Address(Address::zero()))
        .with_param("to", Token::Address(to))
        .with_param("tokenId", Token::Uint(U256::from(token_id)))
}

pub fn single_log(block: u64, to: Address, id: u64, value: u64) -> DecodedLog {
    DecodedLog::new(block, 0)
        .with_param("operator", Token::Address(Address::zero()))
        .with_param("from", Token::Address(Address::zero()))
        .with_param("to", Token::Address(to))
        .with_param("id", Token::Uint(U256::from(id)))
        .with_param("value", Token::Uint(U256::from(value)))
}

pub fn batch_log(block: u64, to: Address, ids: &[u64], values: &[u64]) -> DecodedLog {
    let uints = |xs: &[u64]| Token::Array(xs.iter().map(|x| Token::Uint(U256::from(*x))).collect());
    DecodedLog::new(block, 0)
        .with_param("operator", Token::Address(Address::zero()))
        .with_param("from", Token::Address(Address::zero()))
        .with_param("to", Token::Address(to))
        .with_param("ids", uints(ids))
        .with_param("values", uints(values))
}

/// The same log with one parameter removed.
pub fn without_param(log: DecodedLog, field: &str) -> DecodedLog {
    DecodedLog {
        params: log.params.into_iter().filter(|(name, _)| name != field).collect(),
        ..log
    }
}

/// A verifier over the mock with both test contracts registered.
pub fn verifier(mock: MockChain) -> (Arc<MockChain>, OwnershipVerifier) {
    let mock = Arc::new(mock);
    let mut verifier = OwnershipVerifier::with_client(mock.clone());
    verifier
        .register_contract_abi(ERC721_CONTRACT, abi::single_owner_abi().unwrap())
        .unwrap();
    verifier
        .register_contract_abi(ERC1155_CONTRACT, abi::multi_quantity_abi().unwrap())
        .unwrap();
    (mock, verifier)
}

pub fn ids(values: &[u64]) -> Vec<U256> {
    values.iter().copied().map(U256::from).collect()
}
