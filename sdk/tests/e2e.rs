//! End-to-end integration tests for the Auric SDK.
//!
//! These tests exercise the full client lifecycle: wallet creation, identity
//! document construction and self-verification, power-up request sealing and
//! tumbler-side opening, and transaction assembly through a stub delivery
//! collaborator. They prove the pieces compose: what one side of the SDK
//! seals, signs, or assembles, the other side (or a tumbler holding the
//! right key) can open, verify, or parse.
//!
//! Each test stands alone. The RSA fixtures under `testdata/` are ordinary
//! 2048-bit keys generated once, so no test pays keygen cost.

use std::io::Cursor;

use auric_sdk::account::AccountId;
use auric_sdk::codec::{Msg, MsgSend};
use auric_sdk::coin::Coin;
use auric_sdk::config::{SdkConfig, TxMode};
use auric_sdk::envelope::{self, SealedEnvelope};
use auric_sdk::powerup::{PowerUpParams, RequestProof};
use auric_sdk::tx::{BroadcastError, Broadcaster, TransactionPayload};
use auric_sdk::wallet::LocalWallet;
use auric_sdk::Client;

use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::{RsaPrivateKey, RsaPublicKey};

const REQUESTER_PUB: &str = include_str!("../testdata/requester.pub.pem");
const REQUESTER_KEY: &str = include_str!("../testdata/requester.key.pem");
const TUMBLER_PUB: &str = include_str!("../testdata/tumbler.pub.pem");
const TUMBLER_KEY: &str = include_str!("../testdata/tumbler.key.pem");

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

fn setup() -> Client<LocalWallet> {
    let config = SdkConfig::default();
    let wallet = LocalWallet::random(&config.prefixes).expect("wallet");
    Client::new(wallet, config).expect("client")
}

/// A delivery stub that records nothing and accepts everything.
struct OkBroadcaster;

impl Broadcaster for OkBroadcaster {
    fn broadcast(
        &self,
        payload: &TransactionPayload,
        _mode: TxMode,
        _endpoint: &str,
    ) -> Result<String, BroadcastError> {
        assert!(!payload.message.is_empty());
        Ok("DEADBEEF".to_string())
    }
}

// ---------------------------------------------------------------------------
// Identity lifecycle
// ---------------------------------------------------------------------------

#[test]
fn identity_document_full_lifecycle() {
    let client = setup();

    let doc = client
        .build_identity_document(
            &mut Cursor::new(REQUESTER_PUB),
            &mut Cursor::new(TUMBLER_PUB),
        )
        .expect("identity document");

    // The document binds the wallet's own address and pubkey.
    assert_eq!(doc.id.as_str(), client.address());
    let proof = doc.proof.as_ref().expect("proof");
    assert_eq!(proof.verification_method, client.public_key());

    // Anyone can check the proof from the document alone.
    doc.verify_proof().expect("self-contained verification");

    // And the document survives a trip through JSON intact.
    let json = serde_json::to_string(&doc).expect("serialize");
    let parsed: auric_sdk::IdentityDocument = serde_json::from_str(&json).expect("parse");
    parsed.verify_proof().expect("verification after roundtrip");
}

// ---------------------------------------------------------------------------
// Power-up lifecycle
// ---------------------------------------------------------------------------

#[test]
fn power_up_request_opens_on_the_tumbler_side() {
    let client = setup();
    let pairwise = AccountId::from_bytes([0x42; 20], &client.config().prefixes).expect("pairwise");

    let request = client
        .build_power_up_request(PowerUpParams {
            public_key: client.public_key().to_string(),
            tumbler_key: Cursor::new(TUMBLER_PUB),
            signature_key: Cursor::new(REQUESTER_KEY),
            amount: 1_000,
            pairwise_address: pairwise.clone(),
        })
        .expect("power-up request");

    // Public half: claimant, amount, request id.
    assert_eq!(request.claimant.as_str(), client.address());
    assert_eq!(request.amount[0].amount, "1000");
    assert_eq!(request.amount[0].denom, "uauric");

    // Tumbler side: unwrap the envelope with the tumbler's private key.
    let tumbler = RsaPrivateKey::from_pkcs8_pem(TUMBLER_KEY).expect("tumbler key");
    let sealed = SealedEnvelope {
        proof: request.proof.clone(),
        proof_key: request.proof_key.clone(),
    };
    let opened = envelope::open(&sealed, &tumbler).expect("open envelope");
    let proof: RequestProof = serde_json::from_slice(&opened).expect("parse proof");

    // The cleartext proof links claimant and pairwise address, and its RSA
    // signature checks out against the requester's public key.
    assert_eq!(proof.sender_did.as_str(), client.address());
    assert_eq!(proof.pairwise_did, pairwise);
    let requester = RsaPublicKey::from_public_key_pem(REQUESTER_PUB).expect("requester key");
    proof.verify(&requester).expect("proof signature");
}

#[test]
fn wrong_tumbler_key_cannot_open_a_request() {
    let client = setup();
    let pairwise = AccountId::from_bytes([0x42; 20], &client.config().prefixes).expect("pairwise");

    let request = client
        .build_power_up_request(PowerUpParams {
            public_key: client.public_key().to_string(),
            tumbler_key: Cursor::new(TUMBLER_PUB),
            signature_key: Cursor::new(REQUESTER_KEY),
            amount: 5,
            pairwise_address: pairwise,
        })
        .expect("power-up request");

    let wrong_key = RsaPrivateKey::from_pkcs8_pem(REQUESTER_KEY).expect("requester key");
    let sealed = SealedEnvelope {
        proof: request.proof,
        proof_key: request.proof_key,
    };
    assert!(envelope::open(&sealed, &wrong_key).is_err());
}

// ---------------------------------------------------------------------------
// Transaction assembly and delivery
// ---------------------------------------------------------------------------

#[test]
fn mixed_batch_assembles_and_broadcasts() {
    let client = setup();
    let prefixes = &client.config().prefixes;

    let doc = client
        .build_identity_document(
            &mut Cursor::new(REQUESTER_PUB),
            &mut Cursor::new(TUMBLER_PUB),
        )
        .expect("identity document");

    let from = AccountId::parse(client.address(), prefixes).expect("own address");
    let to = AccountId::from_bytes([0x11; 20], prefixes).expect("recipient");
    let send = Msg::Send(MsgSend {
        from_address: from,
        to_address: to,
        amount: vec![Coin::base(250)],
    });

    let msgs = [Msg::SetIdentity(doc), send];
    let payload = client.assemble_transaction(&msgs).expect("assemble");

    // Two messages: double fee, fixed gas, tags in batch order.
    assert_eq!(payload.message.len(), 2);
    assert_eq!(payload.message[0].type_tag, "auric/MsgSetIdentity");
    assert_eq!(payload.message[1].type_tag, "auric/MsgSend");
    assert_eq!(payload.fee.amount[0].amount, "20000");
    assert_eq!(payload.fee.gas, "200000");

    let hash = client
        .send_transaction(&OkBroadcaster, &msgs)
        .expect("broadcast");
    assert_eq!(hash, "DEADBEEF");
}

#[test]
fn identity_document_survives_enclosure_roundtrip() {
    let client = setup();
    let doc = client
        .build_identity_document(
            &mut Cursor::new(REQUESTER_PUB),
            &mut Cursor::new(TUMBLER_PUB),
        )
        .expect("identity document");

    let payload = client
        .assemble_transaction(&[Msg::SetIdentity(doc.clone())])
        .expect("assemble");

    // A node parsing the enclosure value gets back a verifiable document.
    let embedded: auric_sdk::IdentityDocument =
        serde_json::from_value(payload.message[0].value.clone()).expect("parse enclosure");
    assert_eq!(embedded, doc);
    embedded.verify_proof().expect("verification after enclosure");
}
