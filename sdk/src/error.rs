//! Crate-wide error taxonomy.
//!
//! Module-local error enums stay close to the code that raises them; this
//! type is the surface the high-level operations return. The mapping from
//! a module error to a variant happens at the call site, because the same
//! underlying failure means different things in different flows: a bad PEM
//! block is `InvalidSignatureKey` when it comes from the requester's key
//! stream and `InvalidTumblerKey` when it comes from the tumbler's.

use crate::account::AddressError;
use crate::coin::CoinError;
use crate::config::ConfigError;
use crate::envelope::EnvelopeError;
use crate::keys::KeyError;
use thiserror::Error;

/// Errors returned by the SDK's high-level operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The client configuration failed validation.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// A Bech32 account public key failed validation.
    #[error("invalid public key: {0}")]
    InvalidPublicKey(#[source] AddressError),

    /// A Bech32 account address failed validation.
    #[error("invalid address: {0}")]
    InvalidAddress(#[source] AddressError),

    /// The requester's RSA signature key could not be loaded.
    #[error("invalid signature key: {0}")]
    InvalidSignatureKey(#[source] KeyError),

    /// The requester's RSA verification key could not be loaded.
    #[error("invalid verification key: {0}")]
    InvalidVerificationKey(#[source] KeyError),

    /// The tumbler's RSA public key could not be loaded.
    #[error("invalid tumbler key: {0}")]
    InvalidTumblerKey(#[source] KeyError),

    /// Power-up request parameters failed validation.
    #[error("invalid power-up parameters: {0}")]
    InvalidPowerUpParams(String),

    /// A coin amount was rejected.
    #[error("invalid amount: {0}")]
    InvalidAmount(#[from] CoinError),

    /// Building or signing a proof failed.
    #[error("proof creation failed: {0}")]
    ProofCreation(String),

    /// The OS entropy source failed.
    #[error("not enough entropy: {0}")]
    NotEnoughEntropy(#[source] rand::Error),

    /// Sealing the confidential payload failed.
    #[error("encryption failure: {0}")]
    EncryptionFailure(#[source] EnvelopeError),

    /// A message could not be serialized while assembling a transaction.
    #[error("failed to serialize message at index {index}: {source}")]
    InvalidMessage {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    /// A transaction was assembled with no messages.
    #[error("transaction contains no messages")]
    NoMessages,

    /// The delivery collaborator reported a failure.
    #[error("broadcast failed: {0}")]
    Broadcast(String),
}
