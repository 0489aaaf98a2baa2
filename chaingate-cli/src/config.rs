//! Chain table and the optional TOML config file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use chaingate_core::{ProfileOverride, TokenStandard};

/// Supported blockchain configuration.
#[derive(Debug, Clone)]
pub struct ChainConfig {
    pub name: &'static str,
    pub chain_id: u64,
    pub rpc_urls: &'static [&'static str],
    pub description: &'static str,
}

impl ChainConfig {
    pub fn default_rpc(&self) -> &'static str {
        self.rpc_urls[0]
    }
}

/// All supported chains.
pub const CHAINS: &[ChainConfig] = &[
    ChainConfig {
        name: "ethereum",
        chain_id: 1,
        rpc_urls: &[
            "https://eth.llamarpc.com",
            "https://ethereum-rpc.publicnode.com",
            "https://1rpc.io/eth",
        ],
        description: "Ethereum Mainnet",
    },
    ChainConfig {
        name: "sepolia",
        chain_id: 11155111,
        rpc_urls: &[
            "https://ethereum-sepolia.publicnode.com",
            "https://rpc.sepolia.org",
            "https://1rpc.io/sepolia",
        ],
        description: "Ethereum Sepolia Testnet",
    },
    ChainConfig {
        name: "polygon",
        chain_id: 137,
        rpc_urls: &[
            "https://polygon-rpc.com",
            "https://polygon-bor-rpc.publicnode.com",
            "https://1rpc.io/matic",
        ],
        description: "Polygon PoS",
    },
    ChainConfig {
        name: "base",
        chain_id: 8453,
        rpc_urls: &[
            "https://base.publicnode.com",
            "https://mainnet.base.org",
            "https://1rpc.io/base",
        ],
        description: "Base Mainnet (Coinbase L2)",
    },
    ChainConfig {
        name: "arbitrum",
        chain_id: 42161,
        rpc_urls: &[
            "https://arbitrum.publicnode.com",
            "https://arb1.arbitrum.io/rpc",
            "https://1rpc.io/arb",
        ],
        description: "Arbitrum One",
    },
    ChainConfig {
        name: "optimism",
        chain_id: 10,
        rpc_urls: &[
            "https://optimism.publicnode.com",
            "https://mainnet.optimism.io",
            "https://1rpc.io/op",
        ],
        description: "Optimism Mainnet",
    },
];

pub const DEFAULT_CHAIN: &str = "ethereum";

/// Get chain config by name.
pub fn get_chain(name: &str) -> Option<&'static ChainConfig> {
    CHAINS.iter().find(|c| c.name.eq_ignore_ascii_case(name))
}

/// Default config filename under ~/.chaingate/
pub const DEFAULT_CONFIG_FILENAME: &str = "config.toml";

/// Contents of the config file. Every field is optional.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FileConfig {
    pub rpc_url: Option<String>,
    pub chain: Option<String>,
    pub contracts: Vec<ContractEntry>,
    pub profile: Option<ProfileOverride>,
}

/// A known contract: where its ABI lives and which standard it follows.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContractEntry {
    pub address: String,
    pub abi: Option<PathBuf>,
    pub standard: Option<TokenStandard>,
}

impl FileConfig {
    /// The entry for `address`, compared case-insensitively.
    pub fn contract(&self, address: &str) -> Option<&ContractEntry> {
        self.contracts
            .iter()
            .find(|c| c.address.trim().eq_ignore_ascii_case(address.trim()))
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".chaingate").join(DEFAULT_CONFIG_FILENAME))
}

/// Load the config file.
///
/// An explicit path must exist. Without one, a missing default file yields
/// an empty config.
pub fn load_config(path: Option<&Path>) -> Result<FileConfig, String> {
    let config_path = match path {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) => path,
            None => return Ok(FileConfig::default()),
        },
    };

    if !config_path.exists() {
        if path.is_some() {
            return Err(format!(
                "Configuration file not found: {}",
                config_path.display()
            ));
        }
        return Ok(FileConfig::default());
    }

    let raw = fs::read_to_string(&config_path)
        .map_err(|e| format!("Failed to read config: {}", e))?;

    let config: FileConfig =
        toml::from_str(&raw).map_err(|e| format!("Invalid config file: {}", e))?;

    tracing::debug!(
        path = %config_path.display(),
        contracts = config.contracts.len(),
        "loaded config"
    );
    Ok(config)
}
