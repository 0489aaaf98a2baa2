//! Wallet session: the surface a connect-button front-end drives.
//!
//! The front-end reports a connected `(provider, account)` pair, later asks
//! for verification, and wants every failure delivered to one error hook.
//! [`WalletSession`] tracks the `disconnected → connected → verified`
//! progression and routes each step through [`SessionHooks`].
//! [`OwnershipGate`] is a ready-made hook set whose verify step asks an
//! [`OwnershipVerifier`].

use async_trait::async_trait;
use ethers_core::types::Address;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{ChainGateError, Result};
use crate::request::SignedRequest;
use crate::verifier::OwnershipVerifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connected,
    Verified,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connected => "connected",
            ConnectionState::Verified => "verified",
        })
    }
}

/// Callbacks invoked by [`WalletSession`].
#[async_trait]
pub trait SessionHooks: Send + Sync {
    async fn on_connect(&self, _provider_id: &str, _account: Address) -> Result<()> {
        Ok(())
    }

    async fn on_verify(&self, _account: Address) -> Result<()> {
        Ok(())
    }

    fn on_error(&self, _error: &ChainGateError) {}
}

/// Connection state for one wallet.
pub struct WalletSession<H> {
    hooks: H,
    state: ConnectionState,
    provider_id: Option<String>,
    account: Option<Address>,
}

impl<H: SessionHooks> WalletSession<H> {
    pub fn new(hooks: H) -> Self {
        Self {
            hooks,
            state: ConnectionState::Disconnected,
            provider_id: None,
            account: None,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn account(&self) -> Option<Address> {
        self.account
    }

    pub fn provider_id(&self) -> Option<&str> {
        self.provider_id.as_deref()
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    /// Record a wallet connection.
    ///
    /// Only valid while disconnected. On failure the error hook fires and
    /// the session stays disconnected.
    pub async fn connect(&mut self, provider_id: &str, account: &str) -> Result<()> {
        let outcome = self.try_connect(provider_id, account).await;
        self.report(outcome)
    }

    async fn try_connect(&mut self, provider_id: &str, account: &str) -> Result<()> {
        self.expect_state(ConnectionState::Disconnected, "connect")?;

        let address = Address::from_str(account.trim())
            .map_err(|_| ChainGateError::InvalidAccount(account.to_string()))?;

        self.hooks.on_connect(provider_id, address).await?;

        self.provider_id = Some(provider_id.to_string());
        self.account = Some(address);
        self.state = ConnectionState::Connected;
        Ok(())
    }

    /// Run the verify hook for the connected account.
    ///
    /// Only valid while connected. Success moves the session to verified;
    /// on failure the error hook fires and the session stays connected.
    pub async fn verify(&mut self) -> Result<()> {
        let outcome = self.try_verify().await;
        self.report(outcome)
    }

    async fn try_verify(&mut self) -> Result<()> {
        self.expect_state(ConnectionState::Connected, "verify")?;
        let Some(account) = self.account else {
            return Err(self.state_error("verify"));
        };

        self.hooks.on_verify(account).await?;
        self.state = ConnectionState::Verified;
        Ok(())
    }

    /// Forget the connected wallet.
    pub fn disconnect(&mut self) {
        self.state = ConnectionState::Disconnected;
        self.provider_id = None;
        self.account = None;
    }

    fn expect_state(&self, expected: ConnectionState, action: &'static str) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(self.state_error(action))
        }
    }

    fn state_error(&self, action: &'static str) -> ChainGateError {
        ChainGateError::SessionState {
            action,
            state: self.state.to_string(),
        }
    }

    fn report(&self, outcome: Result<()>) -> Result<()> {
        if let Err(e) = &outcome {
            self.hooks.on_error(e);
        }
        outcome
    }
}

/// Hooks whose verify step requires the account to hold tokens of one
/// contract.
pub struct OwnershipGate {
    verifier: Arc<OwnershipVerifier>,
    request: SignedRequest,
}

impl OwnershipGate {
    pub fn new(verifier: Arc<OwnershipVerifier>, request: SignedRequest) -> Self {
        Self { verifier, request }
    }
}

#[async_trait]
impl SessionHooks for OwnershipGate {
    async fn on_connect(&self, provider_id: &str, account: Address) -> Result<()> {
        tracing::info!(provider = provider_id, account = ?account, "wallet connected");
        Ok(())
    }

    async fn on_verify(&self, account: Address) -> Result<()> {
        let request = self.request.clone().for_owner(account);
        if self.verifier.verify_ownership(&request).await? {
            Ok(())
        } else {
            Err(ChainGateError::OwnershipNotProven {
                account: format!("{:?}", account),
                contract: self.request.contract.clone(),
            })
        }
    }

    fn on_error(&self, error: &ChainGateError) {
        tracing::warn!(error = %error, "wallet session step failed");
    }
}
