//! Bundled minimal ABIs for the supported token standards.
//!
//! Only the events and read methods the reconstructor touches are listed.
//! Contracts with extra or renamed members should be registered with their
//! own ABI.

use ethers_core::abi::{parse_abi, Abi};

use chaingate_core::TokenStandard;

use crate::error::{ChainGateError, Result};

/// Single-owner token interface.
///
/// `balanceOf(address,uint256)` is the per-id confirmation method the
/// default profile calls; the standard one-argument overload is listed too.
const SINGLE_OWNER_ABI: &[&str] = &[
    "event Transfer(address indexed from, address indexed to, uint256 indexed tokenId)",
    "function balanceOf(address owner) view returns (uint256)",
    "function balanceOf(address owner, uint256 tokenId) view returns (uint256)",
];

/// Multi-quantity token interface.
const MULTI_QUANTITY_ABI: &[&str] = &[
    "event TransferSingle(address indexed operator, address indexed from, address indexed to, uint256 id, uint256 value)",
    "event TransferBatch(address indexed operator, address indexed from, address indexed to, uint256[] ids, uint256[] values)",
    "function balanceOf(address account, uint256 id) view returns (uint256)",
    "function balanceOfBatch(address[] accounts, uint256[] ids) view returns (uint256[])",
];

pub fn single_owner_abi() -> Result<Abi> {
    parse(SINGLE_OWNER_ABI)
}

pub fn multi_quantity_abi() -> Result<Abi> {
    parse(MULTI_QUANTITY_ABI)
}

/// The bundled ABI for a standard.
pub fn abi_for(standard: TokenStandard) -> Result<Abi> {
    match standard {
        TokenStandard::SingleOwner => single_owner_abi(),
        TokenStandard::MultiQuantity => multi_quantity_abi(),
    }
}

fn parse(signatures: &[&str]) -> Result<Abi> {
    parse_abi(signatures).map_err(|e| ChainGateError::InvalidContractConfig(e.to_string()))
}
