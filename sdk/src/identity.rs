//! # Identity Documents
//!
//! The on-chain identity record: a W3C-shaped DID document binding an
//! account address to a pair of RSA public keys, authenticated by a
//! secp256k1 proof from the account's own wallet key.
//!
//! The proof is computed over the JSON serialization of the document
//! *without* the proof field. Serialization field order is therefore part
//! of the signing contract; the structs below pin it with explicit serde
//! renames matching the wire format.

use crate::account::{validate_account_pubkey, AccountId};
use crate::config::{SdkConfig, ECDSA_SIGNATURE_LENGTH};
use crate::error::Error;
use crate::keys::load_public_key;
use crate::wallet::Wallet;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, Utc};
use k256::ecdsa::signature::{Signer, Verifier};
use k256::ecdsa::{Signature, VerifyingKey};
use serde::{Deserialize, Serialize};
use std::io::Read;
use thiserror::Error as ThisError;

// ---------------------------------------------------------------------------
// Wire constants
// ---------------------------------------------------------------------------

/// JSON-LD context for identity documents.
pub const IDENTITY_CONTEXT: &str = "https://www.w3.org/ns/did/v1";

/// Key type of the verification (encryption) public key, `#keys-1`.
pub const VERIFICATION_KEY_TYPE: &str = "RsaVerificationKey2018";

/// Key type of the signature public key, `#keys-2`.
pub const SIGNATURE_KEY_TYPE: &str = "RsaSignatureKey2018";

/// Proof type attached to identity documents.
pub const PROOF_TYPE: &str = "EcdsaSecp256k1VerificationKey2019";

/// Proof purpose attached to identity documents.
pub const PROOF_PURPOSE: &str = "authentication";

// ---------------------------------------------------------------------------
// Document types
// ---------------------------------------------------------------------------

/// One published public key inside an identity document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKeyDescriptor {
    /// Fragment identifier, `<address>#keys-N`.
    pub id: String,
    #[serde(rename = "type")]
    pub key_type: String,
    /// The account that controls this key.
    pub controller: AccountId,
    #[serde(rename = "publicKeyPem")]
    pub public_key_pem: String,
}

/// The secp256k1 proof binding a document to its controller's wallet key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    #[serde(rename = "type")]
    pub proof_type: String,
    pub created: DateTime<Utc>,
    #[serde(rename = "proofPurpose")]
    pub proof_purpose: String,
    pub controller: AccountId,
    /// The signer's Bech32-encoded account public key.
    #[serde(rename = "verificationMethod")]
    pub verification_method: String,
    /// base64 of the 64-byte `r || s` signature.
    #[serde(rename = "signatureValue")]
    pub signature_value: String,
}

/// A DID document as it appears on chain.
///
/// `proof` is `None` only transiently, while the document is being signed
/// or verified; documents built through [`build_identity_document`] always
/// carry one. Serialization omits an absent proof entirely rather than
/// emitting `null`, which is what makes sign-then-verify self-consistent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityDocument {
    #[serde(rename = "@context")]
    pub context: String,
    pub id: AccountId,
    #[serde(rename = "publicKey")]
    pub public_keys: Vec<PublicKeyDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof: Option<Proof>,
}

// ---------------------------------------------------------------------------
// Building
// ---------------------------------------------------------------------------

/// Build and sign an identity document for the given wallet.
///
/// `public_key` is the wallet's Bech32 account public key and must match
/// the wallet's address. `verification_key` and `signature_key` supply the
/// two RSA public keys in SPKI PEM form; they become `#keys-1` and
/// `#keys-2` respectively.
pub fn build_identity_document<W, V, S>(
    wallet: &W,
    config: &SdkConfig,
    public_key: &str,
    verification_key: &mut V,
    signature_key: &mut S,
) -> Result<IdentityDocument, Error>
where
    W: Wallet,
    V: Read,
    S: Read,
{
    validate_account_pubkey(public_key, &config.prefixes).map_err(Error::InvalidPublicKey)?;
    let id =
        AccountId::parse(wallet.address(), &config.prefixes).map_err(Error::InvalidAddress)?;

    let (verification_pem, _) =
        load_public_key(verification_key).map_err(Error::InvalidVerificationKey)?;
    let (signature_pem, _) = load_public_key(signature_key).map_err(Error::InvalidSignatureKey)?;

    let mut document = IdentityDocument {
        context: IDENTITY_CONTEXT.to_string(),
        id: id.clone(),
        public_keys: vec![
            PublicKeyDescriptor {
                id: format!("{id}#keys-1"),
                key_type: VERIFICATION_KEY_TYPE.to_string(),
                controller: id.clone(),
                public_key_pem: verification_pem,
            },
            PublicKeyDescriptor {
                id: format!("{id}#keys-2"),
                key_type: SIGNATURE_KEY_TYPE.to_string(),
                controller: id.clone(),
                public_key_pem: signature_pem,
            },
        ],
        proof: None,
    };

    let unsigned = serde_json::to_vec(&document).map_err(|e| Error::ProofCreation(e.to_string()))?;

    let signing_key = wallet
        .signing_key()
        .map_err(|e| Error::ProofCreation(e.to_string()))?;
    let signature: Signature = signing_key
        .try_sign(&unsigned)
        .map_err(|e| Error::ProofCreation(e.to_string()))?;

    document.proof = Some(Proof {
        proof_type: PROOF_TYPE.to_string(),
        created: Utc::now(),
        proof_purpose: PROOF_PURPOSE.to_string(),
        controller: id,
        verification_method: wallet.public_key().to_string(),
        signature_value: BASE64.encode(signature.to_bytes()),
    });

    tracing::debug!(address = wallet.address(), "built identity document");
    Ok(document)
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

/// Errors produced while verifying a document's proof.
#[derive(Debug, ThisError)]
pub enum IdentityError {
    #[error("document carries no proof")]
    MissingProof,

    #[error("unsupported proof type '{0}'")]
    UnsupportedProofType(String),

    #[error("malformed verification method: {0}")]
    MalformedVerificationMethod(String),

    #[error("malformed signature value: {0}")]
    MalformedSignature(String),

    #[error("proof signature does not match document")]
    SignatureMismatch,
}

impl IdentityDocument {
    /// Check the document's proof against its own verification method.
    ///
    /// Re-serializes the document without the proof and verifies the
    /// embedded signature over those bytes. Note this only proves the
    /// document is internally consistent; whether the verification method
    /// belongs to `id` is the chain's address-derivation check, not ours.
    pub fn verify_proof(&self) -> Result<(), IdentityError> {
        let proof = self.proof.as_ref().ok_or(IdentityError::MissingProof)?;
        if proof.proof_type != PROOF_TYPE {
            return Err(IdentityError::UnsupportedProofType(proof.proof_type.clone()));
        }

        let mut unsigned = self.clone();
        unsigned.proof = None;
        let bytes = serde_json::to_vec(&unsigned)
            .map_err(|e| IdentityError::MalformedSignature(e.to_string()))?;

        let (_hrp, key_bytes) = bech32::decode(&proof.verification_method)
            .map_err(|e| IdentityError::MalformedVerificationMethod(e.to_string()))?;
        let verifying_key = VerifyingKey::from_sec1_bytes(&key_bytes)
            .map_err(|e| IdentityError::MalformedVerificationMethod(e.to_string()))?;

        let sig_bytes = BASE64
            .decode(&proof.signature_value)
            .map_err(|e| IdentityError::MalformedSignature(e.to_string()))?;
        if sig_bytes.len() != ECDSA_SIGNATURE_LENGTH {
            return Err(IdentityError::MalformedSignature(format!(
                "expected {ECDSA_SIGNATURE_LENGTH} bytes, got {}",
                sig_bytes.len()
            )));
        }
        let signature = Signature::from_slice(&sig_bytes)
            .map_err(|e| IdentityError::MalformedSignature(e.to_string()))?;

        verifying_key
            .verify(&bytes, &signature)
            .map_err(|_| IdentityError::SignatureMismatch)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
