//! # Wallet Collaborator
//!
//! The SDK never derives or stores account keys itself. It talks to a
//! [`Wallet`]: anything that can state its Bech32 address, its Bech32
//! public key, and hand over a secp256k1 signing key when a proof needs
//! to be made. [`LocalWallet`] is the in-memory implementation used by
//! tooling and tests; hardware-backed or remote wallets implement the
//! same trait.

use crate::account::{account_address_from_pubkey, account_pubkey_bech32, AccountId, AddressError};
use crate::config::Bech32Prefixes;
use k256::ecdsa::SigningKey;
use rand::rngs::OsRng;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors a wallet may raise while producing addresses or signing material.
#[derive(Debug, Error)]
pub enum WalletError {
    /// The wallet's key could not be encoded under the configured prefixes.
    #[error("address encoding failed: {0}")]
    Encoding(#[from] AddressError),

    /// The signing key is unavailable (locked device, revoked session).
    #[error("signing key unavailable: {0}")]
    Unavailable(String),
}

// ---------------------------------------------------------------------------
// Wallet trait
// ---------------------------------------------------------------------------

/// An account key holder.
///
/// `address` and `public_key` are expected to be cheap accessors; only
/// `signing_key` may hit slow or fallible backing stores.
pub trait Wallet {
    /// The wallet's Bech32 account address.
    fn address(&self) -> &str;

    /// The wallet's Bech32-encoded compressed public key.
    fn public_key(&self) -> &str;

    /// The secp256k1 signing key for proof creation.
    fn signing_key(&self) -> Result<SigningKey, WalletError>;
}

// ---------------------------------------------------------------------------
// LocalWallet
// ---------------------------------------------------------------------------

/// An in-memory wallet holding a secp256k1 key directly.
///
/// Address and public key encodings are precomputed at construction, so
/// the accessor contract of [`Wallet`] holds trivially.
pub struct LocalWallet {
    signing_key: SigningKey,
    address: AccountId,
    public_key: String,
}

impl LocalWallet {
    /// Wrap an existing signing key, deriving address and public key
    /// encodings under the given prefixes.
    pub fn from_signing_key(
        signing_key: SigningKey,
        prefixes: &Bech32Prefixes,
    ) -> Result<Self, WalletError> {
        let verifying = signing_key.verifying_key();
        let address = account_address_from_pubkey(verifying, prefixes)?;
        let public_key = account_pubkey_bech32(verifying, prefixes)?;
        Ok(Self {
            signing_key,
            address,
            public_key,
        })
    }

    /// Generate a fresh random wallet.
    pub fn random(prefixes: &Bech32Prefixes) -> Result<Self, WalletError> {
        Self::from_signing_key(SigningKey::random(&mut OsRng), prefixes)
    }

    /// The typed account identifier.
    pub fn account_id(&self) -> &AccountId {
        &self.address
    }
}

impl Wallet for LocalWallet {
    fn address(&self) -> &str {
        self.address.as_str()
    }

    fn public_key(&self) -> &str {
        &self.public_key
    }

    fn signing_key(&self) -> Result<SigningKey, WalletError> {
        Ok(self.signing_key.clone())
    }
}

impl std::fmt::Debug for LocalWallet {
    // Never prints the signing key.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalWallet")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
