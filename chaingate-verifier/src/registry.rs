//! Contract registry: address → bound contract handle.
//!
//! Populated at setup, read-only afterwards. There is no update or removal;
//! registering the same address twice is an error.

use ethers_core::abi::{Abi, Event, Function};
use ethers_core::types::Address;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{ChainGateError, Result};

/// A contract address bound to its ABI.
///
/// The reconstructor only passes handles through to the chain client; it
/// never looks inside.
#[derive(Debug, Clone)]
pub struct ContractHandle {
    address: Address,
    abi: Arc<Abi>,
}

impl ContractHandle {
    pub fn new(address: Address, abi: Abi) -> Self {
        Self {
            address,
            abi: Arc::new(abi),
        }
    }

    #[inline]
    pub fn address(&self) -> Address {
        self.address
    }

    #[inline]
    pub fn abi(&self) -> &Abi {
        &self.abi
    }

    /// Find the overload of `name` taking `arity` arguments.
    pub fn function(&self, name: &str, arity: usize) -> Result<&Function> {
        let overloads = self
            .abi
            .functions_by_name(name)
            .map_err(|_| ChainGateError::call(name, "method not found in contract ABI"))?;

        overloads
            .iter()
            .find(|f| f.inputs.len() == arity)
            .ok_or_else(|| {
                ChainGateError::call(name, format!("no overload takes {} arguments", arity))
            })
    }

    /// Find an event by name.
    pub fn event(&self, name: &str) -> Result<&Event> {
        self.abi
            .event(name)
            .map_err(|_| ChainGateError::query(name, "event not found in contract ABI"))
    }
}

/// Registry of bound contracts, keyed by address.
#[derive(Debug, Default)]
pub struct ContractRegistry {
    contracts: HashMap<Address, ContractHandle>,
}

impl ContractRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a contract from a JSON ABI.
    ///
    /// Accepts either a bare ABI array or a build artifact object with an
    /// `abi` key.
    ///
    /// # Errors
    ///
    /// `InvalidContractConfig` if the address is empty or malformed, the ABI
    /// is empty or not valid JSON ABI, or the address is already registered.
    pub fn register(&mut self, address: &str, abi_json: &str) -> Result<&ContractHandle> {
        if abi_json.trim().is_empty() {
            return Err(ChainGateError::InvalidContractConfig(
                "contract ABI is empty".to_string(),
            ));
        }
        let abi = parse_abi_json(abi_json)?;
        self.register_abi(address, abi)
    }

    /// Register a contract from an already-parsed ABI.
    pub fn register_abi(&mut self, address: &str, abi: Abi) -> Result<&ContractHandle> {
        let address = parse_contract_address(address)?;

        if abi.functions.is_empty() && abi.events.is_empty() {
            return Err(ChainGateError::InvalidContractConfig(format!(
                "ABI for {:?} declares no functions or events",
                address
            )));
        }

        if self.contracts.contains_key(&address) {
            return Err(ChainGateError::InvalidContractConfig(format!(
                "contract {:?} is already registered",
                address
            )));
        }

        tracing::debug!(contract = ?address, "registered contract");
        Ok(self
            .contracts
            .entry(address)
            .or_insert_with(|| ContractHandle::new(address, abi)))
    }

    /// Look up a registered contract.
    ///
    /// # Errors
    ///
    /// `ContractNotRegistered` if the address is absent or cannot be parsed.
    pub fn resolve(&self, address: &str) -> Result<&ContractHandle> {
        Address::from_str(address.trim())
            .ok()
            .and_then(|parsed| self.contracts.get(&parsed))
            .ok_or_else(|| ChainGateError::ContractNotRegistered(address.to_string()))
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.contracts.contains_key(address)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }
}

fn parse_contract_address(address: &str) -> Result<Address> {
    let trimmed = address.trim();
    if trimmed.is_empty() {
        return Err(ChainGateError::InvalidContractConfig(
            "contract address is empty".to_string(),
        ));
    }
    Address::from_str(trimmed).map_err(|e| {
        ChainGateError::InvalidContractConfig(format!("malformed address '{}': {}", trimmed, e))
    })
}

fn parse_abi_json(abi_json: &str) -> Result<Abi> {
    let value: serde_json::Value = serde_json::from_str(abi_json)
        .map_err(|e| ChainGateError::InvalidContractConfig(format!("ABI is not JSON: {}", e)))?;

    let abi_value = match value {
        serde_json::Value::Object(mut artifact) => artifact.remove("abi").ok_or_else(|| {
            ChainGateError::InvalidContractConfig("artifact has no 'abi' key".to_string())
        })?,
        other => other,
    };

    serde_json::from_value(abi_value)
        .map_err(|e| ChainGateError::InvalidContractConfig(format!("malformed ABI: {}", e)))
}
