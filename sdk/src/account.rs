//! # Account Addresses & Public Key Encodings
//!
//! Auric account identifiers are Bech32 strings whose HRP doubles as a DID
//! method prefix (`did:aur:...`). The data part is a 20-byte payload — the
//! truncated SHA-256 of the account's compressed secp256k1 public key.
//! Account public keys travel as Bech32 too, under the `did:aur:pub` prefix,
//! with the raw 33-byte compressed SEC1 point as payload.
//!
//! Bech32's built-in checksum catches up to four character errors, which
//! matters when addresses are copy-pasted between systems. Nothing in this
//! module consults global state: every decode is validated against an
//! explicit [`Bech32Prefixes`] table.

use crate::config::{Bech32Prefixes, ACCOUNT_ADDRESS_LENGTH, COMPRESSED_PUBKEY_LENGTH};
use bech32::{Bech32, Hrp};
use k256::ecdsa::VerifyingKey;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors raised while parsing or deriving addresses and key encodings.
#[derive(Debug, Error)]
pub enum AddressError {
    /// The string is not valid Bech32 (bad charset, bad checksum, no
    /// separator).
    #[error("bech32 decode error: {0}")]
    Decode(String),

    /// The decoded HRP does not match the expected prefix.
    #[error("invalid HRP: expected '{expected}', got '{got}'")]
    InvalidHrp {
        /// The prefix required by the active configuration.
        expected: String,
        /// The prefix actually found.
        got: String,
    },

    /// The decoded payload has the wrong length.
    #[error("invalid data length: expected {expected} bytes, got {got}")]
    InvalidDataLength {
        /// Expected number of bytes.
        expected: usize,
        /// Actual number of bytes.
        got: usize,
    },

    /// The payload is not a recognized public key encoding.
    #[error("not a valid compressed secp256k1 public key")]
    InvalidKeyEncoding,

    /// A configured prefix is itself not a legal Bech32 HRP.
    #[error("invalid bech32 prefix '{0}'")]
    InvalidPrefix(String),

    /// Bech32 encoding failed (payload too long for the code).
    #[error("bech32 encode error: {0}")]
    Encode(String),
}

// ---------------------------------------------------------------------------
// AccountId
// ---------------------------------------------------------------------------

/// A validated Auric account identifier.
///
/// Holds both the original Bech32 string and the decoded 20-byte payload.
/// Constructing one through [`AccountId::parse`] guarantees the HRP matches
/// the network's account prefix and the checksum and length are sound.
///
/// # Examples
///
/// ```
/// use auric_sdk::account::AccountId;
/// use auric_sdk::config::Bech32Prefixes;
///
/// let prefixes = Bech32Prefixes::default();
/// let id = AccountId::from_bytes([7u8; 20], &prefixes).unwrap();
/// let parsed = AccountId::parse(id.as_str(), &prefixes).unwrap();
/// assert_eq!(id, parsed);
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct AccountId {
    bech32: String,
    bytes: Vec<u8>,
}

impl AccountId {
    /// Parse and validate a Bech32 account address against the configured
    /// account prefix.
    pub fn parse(addr: &str, prefixes: &Bech32Prefixes) -> Result<Self, AddressError> {
        let (_hrp, bytes) = decode_with_hrp(addr, &prefixes.account)?;

        if bytes.len() != ACCOUNT_ADDRESS_LENGTH {
            return Err(AddressError::InvalidDataLength {
                expected: ACCOUNT_ADDRESS_LENGTH,
                got: bytes.len(),
            });
        }

        Ok(Self {
            bech32: addr.to_string(),
            bytes,
        })
    }

    /// Encode a raw 20-byte account payload under the configured prefix.
    pub fn from_bytes(
        bytes: [u8; ACCOUNT_ADDRESS_LENGTH],
        prefixes: &Bech32Prefixes,
    ) -> Result<Self, AddressError> {
        let encoded = encode_with_hrp(&prefixes.account, &bytes)?;
        Ok(Self {
            bech32: encoded,
            bytes: bytes.to_vec(),
        })
    }

    /// The Bech32 string form, exactly as parsed or encoded.
    pub fn as_str(&self) -> &str {
        &self.bech32
    }

    /// The raw 20-byte payload.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.bech32)
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", self.bech32)
    }
}

impl Serialize for AccountId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.bech32)
    }
}

impl<'de> Deserialize<'de> for AccountId {
    // Deserialization is deliberately lenient about the HRP: a document may
    // reference accounts from a network other than the locally configured
    // one. Checksum and payload length are still enforced. Use
    // `AccountId::parse` when the local prefix must match.
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let (_hrp, bytes) =
            bech32::decode(&s).map_err(|e| serde::de::Error::custom(e.to_string()))?;
        if bytes.len() != ACCOUNT_ADDRESS_LENGTH {
            return Err(serde::de::Error::custom(format!(
                "expected {ACCOUNT_ADDRESS_LENGTH}-byte account payload, got {}",
                bytes.len()
            )));
        }
        Ok(Self { bech32: s, bytes })
    }
}

// ---------------------------------------------------------------------------
// Public key encodings
// ---------------------------------------------------------------------------

/// Validate a Bech32-encoded account public key and return the decoded
/// secp256k1 point.
///
/// Checks the HRP against the account pubkey prefix, the payload length,
/// and that the bytes are a valid compressed SEC1 point — not every 33-byte
/// string is on the curve.
pub fn validate_account_pubkey(
    encoded: &str,
    prefixes: &Bech32Prefixes,
) -> Result<VerifyingKey, AddressError> {
    let (_hrp, bytes) = decode_with_hrp(encoded, &prefixes.account_pubkey)?;

    if bytes.len() != COMPRESSED_PUBKEY_LENGTH {
        return Err(AddressError::InvalidDataLength {
            expected: COMPRESSED_PUBKEY_LENGTH,
            got: bytes.len(),
        });
    }

    VerifyingKey::from_sec1_bytes(&bytes).map_err(|_| AddressError::InvalidKeyEncoding)
}

/// Bech32-encode a secp256k1 public key under the account pubkey prefix.
pub fn account_pubkey_bech32(
    key: &VerifyingKey,
    prefixes: &Bech32Prefixes,
) -> Result<String, AddressError> {
    let compressed = key.to_encoded_point(true);
    encode_with_hrp(&prefixes.account_pubkey, compressed.as_bytes())
}

/// Derive the account address for a secp256k1 public key.
///
/// The payload is the first 20 bytes of `SHA-256(compressed_pubkey)` —
/// the chain's fixed address derivation rule.
pub fn account_address_from_pubkey(
    key: &VerifyingKey,
    prefixes: &Bech32Prefixes,
) -> Result<AccountId, AddressError> {
    let compressed = key.to_encoded_point(true);
    let digest = Sha256::digest(compressed.as_bytes());

    let mut payload = [0u8; ACCOUNT_ADDRESS_LENGTH];
    payload.copy_from_slice(&digest[..ACCOUNT_ADDRESS_LENGTH]);
    AccountId::from_bytes(payload, prefixes)
}

// ---------------------------------------------------------------------------
// Bech32 plumbing
// ---------------------------------------------------------------------------

fn decode_with_hrp(encoded: &str, expected_prefix: &str) -> Result<(Hrp, Vec<u8>), AddressError> {
    let (hrp, bytes) =
        bech32::decode(encoded).map_err(|e| AddressError::Decode(e.to_string()))?;

    let expected = Hrp::parse(expected_prefix)
        .map_err(|_| AddressError::InvalidPrefix(expected_prefix.to_string()))?;
    if hrp != expected {
        return Err(AddressError::InvalidHrp {
            expected: expected_prefix.to_string(),
            got: hrp.to_string(),
        });
    }

    Ok((hrp, bytes))
}

fn encode_with_hrp(prefix: &str, payload: &[u8]) -> Result<String, AddressError> {
    let hrp = Hrp::parse(prefix).map_err(|_| AddressError::InvalidPrefix(prefix.to_string()))?;
    bech32::encode::<Bech32>(hrp, payload).map_err(|e| AddressError::Encode(e.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use k256::ecdsa::SigningKey;
    use rand::rngs::OsRng;

    fn prefixes() -> Bech32Prefixes {
        Bech32Prefixes::default()
    }

    #[test]
    fn address_roundtrip() {
        let id = AccountId::from_bytes([42u8; 20], &prefixes()).unwrap();
        assert!(id.as_str().starts_with("did:aur:1"));
        let parsed = AccountId::parse(id.as_str(), &prefixes()).unwrap();
        assert_eq!(id, parsed);
        assert_eq!(parsed.bytes(), &[42u8; 20]);
    }

    #[test]
    fn wrong_hrp_rejected() {
        let other = Bech32Prefixes::with_main_prefix("other");
        let id = AccountId::from_bytes([1u8; 20], &other).unwrap();
        let err = AccountId::parse(id.as_str(), &prefixes()).unwrap_err();
        assert!(matches!(err, AddressError::InvalidHrp { .. }));
    }

    #[test]
    fn corrupted_checksum_rejected() {
        let id = AccountId::from_bytes([9u8; 20], &prefixes()).unwrap();
        let mut addr = id.as_str().to_string();
        let last = addr.pop().unwrap();
        addr.push(if last == 'q' { 'p' } else { 'q' });
        assert!(matches!(
            AccountId::parse(&addr, &prefixes()),
            Err(AddressError::Decode(_))
        ));
    }

    #[test]
    fn wrong_payload_length_rejected() {
        let hrp = Hrp::parse("did:aur:").unwrap();
        let short = bech32::encode::<Bech32>(hrp, &[0u8; 8]).unwrap();
        assert!(matches!(
            AccountId::parse(&short, &prefixes()),
            Err(AddressError::InvalidDataLength { expected: 20, got: 8 })
        ));
    }

    #[test]
    fn pubkey_roundtrip() {
        let key = SigningKey::random(&mut OsRng);
        let encoded = account_pubkey_bech32(key.verifying_key(), &prefixes()).unwrap();
        assert!(encoded.starts_with("did:aur:pub1"));
        let decoded = validate_account_pubkey(&encoded, &prefixes()).unwrap();
        assert_eq!(&decoded, key.verifying_key());
    }

    #[test]
    fn pubkey_with_account_hrp_rejected() {
        // An account address is not an account pubkey, even though both
        // decode as valid bech32.
        let id = AccountId::from_bytes([3u8; 20], &prefixes()).unwrap();
        assert!(matches!(
            validate_account_pubkey(id.as_str(), &prefixes()),
            Err(AddressError::InvalidHrp { .. })
        ));
    }

    #[test]
    fn pubkey_invalid_point_rejected() {
        // 33 bytes with an invalid SEC1 tag byte: right length, not a point.
        let hrp = Hrp::parse("did:aur:pub").unwrap();
        let bogus = bech32::encode::<Bech32>(hrp, &[0xFFu8; 33]).unwrap();
        assert!(matches!(
            validate_account_pubkey(&bogus, &prefixes()),
            Err(AddressError::InvalidKeyEncoding)
        ));
    }

    #[test]
    fn address_derivation_is_deterministic() {
        let key = SigningKey::random(&mut OsRng);
        let a = account_address_from_pubkey(key.verifying_key(), &prefixes()).unwrap();
        let b = account_address_from_pubkey(key.verifying_key(), &prefixes()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn different_keys_different_addresses() {
        let k1 = SigningKey::random(&mut OsRng);
        let k2 = SigningKey::random(&mut OsRng);
        let a1 = account_address_from_pubkey(k1.verifying_key(), &prefixes()).unwrap();
        let a2 = account_address_from_pubkey(k2.verifying_key(), &prefixes()).unwrap();
        assert_ne!(a1, a2);
    }

    #[test]
    fn serde_roundtrip_preserves_string() {
        let id = AccountId::from_bytes([5u8; 20], &prefixes()).unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.as_str()));
        let back: AccountId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }

    #[test]
    fn deserialize_rejects_garbage() {
        assert!(serde_json::from_str::<AccountId>("\"not-bech32\"").is_err());
    }
}
