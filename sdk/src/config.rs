//! # SDK Configuration & Constants
//!
//! Every network-facing constant of the Auric client lives here. The SDK
//! deliberately has no process-wide mutable configuration: the Bech32 prefix
//! table, the LCD endpoint, and the broadcast mode are all plain values
//! threaded through constructors. If two clients in the same process want to
//! talk to two different networks, they just hold two configs.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Network Identifiers
// ---------------------------------------------------------------------------

/// The main human-readable prefix for Auric mainnet addresses.
///
/// Auric addresses double as DID method identifiers, so the HRP carries the
/// `did:aur:` scheme prefix. Bech32 permits `:` in the HRP; the separator
/// between HRP and data is always the *last* `1` in the string.
pub const MAIN_HRP: &str = "did:aur:";

/// Base denomination for fees and transfers, in the smallest unit.
pub const BASE_DENOM: &str = "uauric";

/// Flat fee charged per message in a transaction, in [`BASE_DENOM`].
pub const FEE_PER_MESSAGE: u64 = 10_000;

/// Fixed gas limit attached to every assembled transaction.
pub const TX_GAS: u64 = 200_000;

/// Default LCD (light client daemon) endpoint for a local node.
pub const DEFAULT_LCD_ENDPOINT: &str = "http://localhost:1317";

// ---------------------------------------------------------------------------
// Cryptographic Parameters
// ---------------------------------------------------------------------------

/// AES-256-GCM key length in bytes.
pub const AES_KEY_LENGTH: usize = 32;

/// AES-256-GCM nonce length in bytes. 96 bits, the standard GCM nonce size.
pub const AES_NONCE_LENGTH: usize = 12;

/// Fixed-width secp256k1 ECDSA signature length: 32-byte `r` plus 32-byte
/// `s`, each big-endian and left-zero-padded.
pub const ECDSA_SIGNATURE_LENGTH: usize = 64;

/// Account addresses carry a 20-byte payload (truncated SHA-256 of the
/// compressed public key).
pub const ACCOUNT_ADDRESS_LENGTH: usize = 20;

/// Compressed SEC1 secp256k1 public key length in bytes.
pub const COMPRESSED_PUBKEY_LENGTH: usize = 33;

/// RSA modulus size used for generated keypairs.
pub const RSA_KEY_BITS: usize = 2048;

// ---------------------------------------------------------------------------
// Bech32Prefixes
// ---------------------------------------------------------------------------

/// The full Bech32 prefix table for one Auric network.
///
/// All six prefixes derive mechanically from the main HRP, mirroring the
/// chain's own address scheme. The table is immutable once constructed —
/// components that need it borrow it from [`SdkConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bech32Prefixes {
    /// Account address prefix (`did:aur:`).
    pub account: String,
    /// Account public key prefix (`did:aur:pub`).
    pub account_pubkey: String,
    /// Validator operator address prefix (`did:aur:valoper`).
    pub validator: String,
    /// Validator operator public key prefix (`did:aur:valoperpub`).
    pub validator_pubkey: String,
    /// Consensus node address prefix (`did:aur:valcons`).
    pub consensus: String,
    /// Consensus node public key prefix (`did:aur:valconspub`).
    pub consensus_pubkey: String,
}

impl Bech32Prefixes {
    /// Derive the full prefix table from a main HRP.
    ///
    /// The derivation scheme is fixed by the chain: `pub`, `valoper`,
    /// `valoperpub`, `valcons`, and `valconspub` suffixes on the main HRP.
    pub fn with_main_prefix(main: &str) -> Self {
        Self {
            account: main.to_string(),
            account_pubkey: format!("{main}pub"),
            validator: format!("{main}valoper"),
            validator_pubkey: format!("{main}valoperpub"),
            consensus: format!("{main}valcons"),
            consensus_pubkey: format!("{main}valconspub"),
        }
    }
}

impl Default for Bech32Prefixes {
    fn default() -> Self {
        Self::with_main_prefix(MAIN_HRP)
    }
}

// ---------------------------------------------------------------------------
// TxMode
// ---------------------------------------------------------------------------

/// Broadcast mode handed to the delivery collaborator.
///
/// - `Sync`: the LCD runs basic validity checks but does not wait for block
///   inclusion.
/// - `Async`: fire and forget, no checks.
/// - `Block`: wait for the transaction to land in a block; delivery errors
///   become visible to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxMode {
    Sync,
    Async,
    Block,
}

impl TxMode {
    /// The wire string the LCD expects.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sync => "sync",
            Self::Async => "async",
            Self::Block => "block",
        }
    }
}

impl fmt::Display for TxMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SdkConfig
// ---------------------------------------------------------------------------

/// Errors produced when validating an [`SdkConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing LCD endpoint")]
    MissingEndpoint,

    #[error("malformed LCD endpoint: {0}")]
    MalformedEndpoint(String),
}

/// Behavioral knobs for one SDK client instance.
///
/// A config is cheap to clone and fully immutable once handed to
/// [`Client::new`](crate::client::Client::new); the client validates it
/// exactly once at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdkConfig {
    /// LCD REST endpoint where transactions are broadcast.
    pub lcd_endpoint: String,

    /// Broadcast mode for outgoing transactions.
    pub mode: TxMode,

    /// Bech32 prefix table for the target network.
    pub prefixes: Bech32Prefixes,
}

impl SdkConfig {
    /// Check that the config complies with the contract: a well-formed
    /// http(s) LCD endpoint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lcd_endpoint.is_empty() {
            return Err(ConfigError::MissingEndpoint);
        }

        if !self.lcd_endpoint.starts_with("http://") && !self.lcd_endpoint.starts_with("https://") {
            return Err(ConfigError::MalformedEndpoint(self.lcd_endpoint.clone()));
        }

        Ok(())
    }
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            lcd_endpoint: DEFAULT_LCD_ENDPOINT.to_string(),
            mode: TxMode::Sync,
            prefixes: Bech32Prefixes::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(SdkConfig::default().validate().is_ok());
    }

    #[test]
    fn prefix_table_derivation() {
        let p = Bech32Prefixes::default();
        assert_eq!(p.account, "did:aur:");
        assert_eq!(p.account_pubkey, "did:aur:pub");
        assert_eq!(p.validator, "did:aur:valoper");
        assert_eq!(p.validator_pubkey, "did:aur:valoperpub");
        assert_eq!(p.consensus, "did:aur:valcons");
        assert_eq!(p.consensus_pubkey, "did:aur:valconspub");
    }

    #[test]
    fn custom_main_prefix() {
        let p = Bech32Prefixes::with_main_prefix("taur");
        assert_eq!(p.account, "taur");
        assert_eq!(p.account_pubkey, "taurpub");
    }

    #[test]
    fn empty_endpoint_rejected() {
        let cfg = SdkConfig {
            lcd_endpoint: String::new(),
            ..SdkConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::MissingEndpoint)));
    }

    #[test]
    fn non_http_endpoint_rejected() {
        let cfg = SdkConfig {
            lcd_endpoint: "ftp://example.com".to_string(),
            ..SdkConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::MalformedEndpoint(_))
        ));
    }

    #[test]
    fn tx_mode_wire_strings() {
        assert_eq!(TxMode::Sync.as_str(), "sync");
        assert_eq!(TxMode::Async.as_str(), "async");
        assert_eq!(TxMode::Block.as_str(), "block");
        assert_eq!(TxMode::Block.to_string(), "block");
    }

    #[test]
    fn tx_mode_serde_lowercase() {
        assert_eq!(serde_json::to_string(&TxMode::Async).unwrap(), "\"async\"");
        let mode: TxMode = serde_json::from_str("\"block\"").unwrap();
        assert_eq!(mode, TxMode::Block);
    }
}
