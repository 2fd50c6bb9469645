//! # Power-Up Requests
//!
//! A power-up moves funds from an account to one of its pairwise addresses
//! through the trusted service (tumbler), without publicly linking the two.
//! The link is carried in a [`RequestProof`]: RSA-signed by the requester,
//! then sealed for the tumbler's eyes only via [`crate::envelope`].

use crate::account::{validate_account_pubkey, AccountId};
use crate::coin::{coins, Coin};
use crate::config::SdkConfig;
use crate::envelope::{self, EnvelopeError};
use crate::error::Error;
use crate::keys::{load_private_key, load_public_key};
use crate::wallet::Wallet;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::Utc;
use rsa::pkcs1v15::{Signature, SigningKey, VerifyingKey};
use rsa::signature::{SignatureEncoding, Signer, Verifier};
use rsa::RsaPublicKey;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::io::Read;
use thiserror::Error as ThisError;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

/// Inputs to [`build_power_up_request`].
///
/// The key fields are readers rather than paths so callers can feed files,
/// in-memory buffers, or anything else that yields PEM bytes.
pub struct PowerUpParams<T: Read, S: Read> {
    /// The requester's Bech32 account public key.
    pub public_key: String,
    /// SPKI PEM reader for the tumbler's RSA public key.
    pub tumbler_key: T,
    /// PKCS#8 PEM reader for the requester's RSA signature private key.
    pub signature_key: S,
    /// Amount to move, in the base denomination.
    pub amount: u64,
    /// The pairwise address receiving the funds.
    pub pairwise_address: AccountId,
}

impl<T: Read, S: Read> PowerUpParams<T, S> {
    fn validate(&self) -> Result<(), String> {
        if self.public_key.is_empty() {
            return Err("public key must not be empty".to_string());
        }
        if self.amount == 0 {
            return Err("amount must be strictly positive".to_string());
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// The confidential proof linking requester and pairwise address.
///
/// Only the tumbler ever sees this in the clear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestProof {
    pub sender_did: AccountId,
    pub pairwise_did: AccountId,
    /// Unix seconds at signing time.
    pub timestamp: i64,
    /// base64 RSA PKCS#1 v1.5 signature over the signing payload.
    pub signature: String,
}

impl RequestProof {
    /// The exact byte string the signature covers: sender, pairwise address,
    /// and decimal timestamp concatenated with no separator.
    ///
    /// The concatenation is not injective (a trailing digit of one field
    /// could in principle shift into the next), but all three components are
    /// fixed by the proof's own fields at verification time, so ambiguity
    /// never arises in practice. Kept as-is for wire compatibility.
    pub fn signing_payload(&self) -> String {
        format!("{}{}{}", self.sender_did, self.pairwise_did, self.timestamp)
    }

    /// Verify the embedded signature with the requester's RSA public key.
    pub fn verify(&self, key: &RsaPublicKey) -> Result<(), PowerUpError> {
        let bytes = BASE64
            .decode(&self.signature)
            .map_err(|e| PowerUpError::MalformedSignature(e.to_string()))?;
        let signature = Signature::try_from(bytes.as_slice())
            .map_err(|e| PowerUpError::MalformedSignature(e.to_string()))?;

        VerifyingKey::<Sha256>::new(key.clone())
            .verify(self.signing_payload().as_bytes(), &signature)
            .map_err(|_| PowerUpError::SignatureMismatch)
    }
}

/// Errors produced while checking a request proof.
#[derive(Debug, ThisError)]
pub enum PowerUpError {
    #[error("malformed proof signature: {0}")]
    MalformedSignature(String),

    #[error("proof signature does not match payload")]
    SignatureMismatch,
}

/// The on-chain power-up request. `proof` and `proof_key` are the sealed
/// envelope halves; everything else is public.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerUpRequest {
    pub claimant: AccountId,
    pub amount: Vec<Coin>,
    /// Random UUID v4, deduplicates retries on the tumbler side.
    pub id: String,
    pub proof: String,
    pub proof_key: String,
}

// ---------------------------------------------------------------------------
// Building
// ---------------------------------------------------------------------------

/// Build a sealed power-up request from the wallet to a pairwise address.
pub fn build_power_up_request<W, T, S>(
    wallet: &W,
    config: &SdkConfig,
    params: PowerUpParams<T, S>,
) -> Result<PowerUpRequest, Error>
where
    W: Wallet,
    T: Read,
    S: Read,
{
    params.validate().map_err(Error::InvalidPowerUpParams)?;
    let PowerUpParams {
        public_key,
        mut tumbler_key,
        mut signature_key,
        amount,
        pairwise_address,
    } = params;

    validate_account_pubkey(&public_key, &config.prefixes).map_err(Error::InvalidPublicKey)?;
    let claimant =
        AccountId::parse(wallet.address(), &config.prefixes).map_err(Error::InvalidAddress)?;
    let amount = coins(amount)?;

    let id = Uuid::new_v4().to_string();
    let timestamp = Utc::now().timestamp();

    let mut proof = RequestProof {
        sender_did: claimant.clone(),
        pairwise_did: pairwise_address,
        timestamp,
        signature: String::new(),
    };

    let (_, signing_rsa) =
        load_private_key(&mut signature_key).map_err(Error::InvalidSignatureKey)?;
    let signature = SigningKey::<Sha256>::new(signing_rsa).sign(proof.signing_payload().as_bytes());
    proof.signature = BASE64.encode(signature.to_bytes());

    let proof_bytes = serde_json::to_vec(&proof).map_err(|e| Error::ProofCreation(e.to_string()))?;

    let (_, tumbler_rsa) = load_public_key(&mut tumbler_key).map_err(Error::InvalidTumblerKey)?;
    let sealed = envelope::seal(&proof_bytes, &tumbler_rsa).map_err(|e| match e {
        EnvelopeError::NotEnoughEntropy(source) => Error::NotEnoughEntropy(source),
        other => Error::EncryptionFailure(other),
    })?;

    tracing::debug!(claimant = %claimant, id = %id, "built power-up request");
    Ok(PowerUpRequest {
        claimant,
        amount,
        id,
        proof: sealed.proof,
        proof_key: sealed.proof_key,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
