//! # Sealed Envelopes
//!
//! Hybrid encryption for payloads addressed to the trusted service
//! (tumbler). A fresh AES-256-GCM key seals the plaintext; the key itself
//! is wrapped with the recipient's RSA public key using PKCS#1 v1.5. Both
//! halves travel base64-encoded.
//!
//! Wire framing for the symmetric half is `nonce || ciphertext`, nonce
//! first, 12 bytes. GCM's tag is appended to the ciphertext by the cipher
//! itself. No associated data is used.

use crate::config::{AES_KEY_LENGTH, AES_NONCE_LENGTH};
use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use rsa::{Pkcs1v15Encrypt, RsaPrivateKey, RsaPublicKey};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors produced while sealing or opening envelopes.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// The OS entropy source failed while drawing key or nonce bytes.
    #[error("not enough entropy: {0}")]
    NotEnoughEntropy(#[source] rand::Error),

    /// The drawn key bytes were rejected by the cipher. Only possible on a
    /// length mismatch, which the constants here rule out.
    #[error("cipher initialization failed")]
    Cipher,

    /// AES-GCM encryption failed.
    #[error("sealing failed")]
    Seal,

    /// Wrapping the symmetric key with the recipient's RSA key failed.
    #[error("key wrap failed: {0}")]
    KeyWrap(#[source] rsa::Error),

    /// A base64 field did not decode.
    #[error("base64 decode failed: {0}")]
    Decode(#[from] base64::DecodeError),

    /// The decoded ciphertext is shorter than a nonce.
    #[error("ciphertext too short to carry a nonce")]
    TooShort,

    /// AES-GCM decryption failed: wrong key, or tampered ciphertext.
    #[error("opening failed: authentication error")]
    Open,

    /// Unwrapping the symmetric key with the RSA private key failed.
    #[error("key unwrap failed: {0}")]
    KeyUnwrap(#[source] rsa::Error),

    /// The unwrapped key has the wrong length for AES-256.
    #[error("unwrapped key has invalid length {0}")]
    BadKeyLength(usize),
}

// ---------------------------------------------------------------------------
// SealedEnvelope
// ---------------------------------------------------------------------------

/// The two base64 halves of a sealed payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedEnvelope {
    /// base64(`nonce || ciphertext`) under the fresh AES-256-GCM key.
    pub proof: String,
    /// base64 of the RSA-wrapped AES key.
    pub proof_key: String,
}

/// Seal `plaintext` for the holder of `recipient`.
///
/// Draws a fresh 32-byte key and 12-byte nonce from the OS. Key reuse is
/// structurally impossible: the key never outlives this call.
pub fn seal(plaintext: &[u8], recipient: &RsaPublicKey) -> Result<SealedEnvelope, EnvelopeError> {
    let mut key = [0u8; AES_KEY_LENGTH];
    OsRng
        .try_fill_bytes(&mut key)
        .map_err(EnvelopeError::NotEnoughEntropy)?;

    let mut nonce_bytes = [0u8; AES_NONCE_LENGTH];
    OsRng
        .try_fill_bytes(&mut nonce_bytes)
        .map_err(EnvelopeError::NotEnoughEntropy)?;

    let cipher = Aes256Gcm::new_from_slice(&key).map_err(|_| EnvelopeError::Cipher)?;
    let nonce = Nonce::from_slice(&nonce_bytes);
    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|_| EnvelopeError::Seal)?;

    let mut framed = Vec::with_capacity(AES_NONCE_LENGTH + ciphertext.len());
    framed.extend_from_slice(&nonce_bytes);
    framed.extend_from_slice(&ciphertext);

    let wrapped_key = recipient
        .encrypt(&mut OsRng, Pkcs1v15Encrypt, &key)
        .map_err(EnvelopeError::KeyWrap)?;

    Ok(SealedEnvelope {
        proof: BASE64.encode(framed),
        proof_key: BASE64.encode(wrapped_key),
    })
}

/// Open an envelope with the recipient's private key, returning the
/// plaintext.
pub fn open(envelope: &SealedEnvelope, recipient: &RsaPrivateKey) -> Result<Vec<u8>, EnvelopeError> {
    let wrapped_key = BASE64.decode(&envelope.proof_key)?;
    let key = recipient
        .decrypt(Pkcs1v15Encrypt, &wrapped_key)
        .map_err(EnvelopeError::KeyUnwrap)?;
    if key.len() != AES_KEY_LENGTH {
        return Err(EnvelopeError::BadKeyLength(key.len()));
    }

    let framed = BASE64.decode(&envelope.proof)?;
    if framed.len() < AES_NONCE_LENGTH {
        return Err(EnvelopeError::TooShort);
    }
    let (nonce_bytes, ciphertext) = framed.split_at(AES_NONCE_LENGTH);

    let cipher = Aes256Gcm::new_from_slice(&key).map_err(|_| EnvelopeError::Cipher)?;
    cipher
        .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
        .map_err(|_| EnvelopeError::Open)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
