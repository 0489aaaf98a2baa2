//! Personal-message signature recovery.
//!
//! Recovers the address that signed a message with `personal_sign`
//! (EIP-191: `"\x19Ethereum Signed Message:\n" + len(message) + message`).

use ethers_core::types::{Address, Signature};
use std::str::FromStr;

use crate::error::{ChainGateError, Result};

/// Recover the signer of `message` from a 65-byte hex signature.
///
/// The signature may carry a `0x` prefix.
///
/// # Errors
///
/// `SignatureRecovery` if the signature is malformed or does not recover to
/// a valid public key.
///
/// # Example
///
/// ```rust
/// use chaingate_verifier::signature::recover_signer;
///
/// assert!(recover_signer("hello", "0xdeadbeef").is_err());
/// ```
pub fn recover_signer(message: &str, signature: &str) -> Result<Address> {
    let signature = Signature::from_str(signature.trim())
        .map_err(|e| ChainGateError::SignatureRecovery(format!("malformed signature: {}", e)))?;

    signature
        .recover(message)
        .map_err(|e| ChainGateError::SignatureRecovery(e.to_string()))
}
