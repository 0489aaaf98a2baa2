//! Verification requests.

use ethers_core::types::Address;

use chaingate_core::{ProfileOverride, TokenStandard};

/// Who is claiming ownership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    /// A wallet address given directly.
    Address(Address),
    /// A personal-message signature; the signer is the claimant.
    Signed { signature: String, message: String },
}

/// One ownership question: does this identity hold tokens of this contract?
///
/// # Example
///
/// ```rust
/// use chaingate_verifier::VerificationRequest;
/// use chaingate_core::TokenStandard;
/// use ethers_core::types::Address;
///
/// let request = VerificationRequest::for_address(
///     Address::repeat_byte(0x42),
///     "0x5FbDB2315678afecb367f032d93F642f64180aa3",
///     TokenStandard::SingleOwner,
/// );
/// assert!(request.profile.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationRequest {
    pub identity: Identity,
    pub contract: String,
    pub standard: TokenStandard,
    pub profile: Option<ProfileOverride>,
}

impl VerificationRequest {
    pub fn for_address(owner: Address, contract: impl Into<String>, standard: TokenStandard) -> Self {
        Self {
            identity: Identity::Address(owner),
            contract: contract.into(),
            standard,
            profile: None,
        }
    }

    pub fn for_signature(
        signature: impl Into<String>,
        message: impl Into<String>,
        contract: impl Into<String>,
        standard: TokenStandard,
    ) -> Self {
        Self {
            identity: Identity::Signed {
                signature: signature.into(),
                message: message.into(),
            },
            contract: contract.into(),
            standard,
            profile: None,
        }
    }

    /// Attach a profile override.
    pub fn with_profile(mut self, profile: ProfileOverride) -> Self {
        self.profile = Some(profile);
        self
    }
}

/// A request without its identity, for the signed verification path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    pub contract: String,
    pub standard: TokenStandard,
    pub profile: Option<ProfileOverride>,
}

impl SignedRequest {
    pub fn new(contract: impl Into<String>, standard: TokenStandard) -> Self {
        Self {
            contract: contract.into(),
            standard,
            profile: None,
        }
    }

    pub fn with_profile(mut self, profile: ProfileOverride) -> Self {
        self.profile = Some(profile);
        self
    }

    /// Complete the request with a recovered owner.
    pub fn for_owner(self, owner: Address) -> VerificationRequest {
        VerificationRequest {
            identity: Identity::Address(owner),
            contract: self.contract,
            standard: self.standard,
            profile: self.profile,
        }
    }
}
