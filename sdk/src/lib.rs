// Copyright (c) 2026 Auric Labs. MIT License.
// See LICENSE for details.

//! # Auric SDK — Client Library
//!
//! The client-side toolkit for the Auric identity ledger. Auric accounts
//! double as decentralized identifiers (`did:aur:...`), and this crate
//! builds the three things an Auric application actually ships: signed
//! identity documents, confidential power-up requests, and the tagged
//! transaction envelopes that carry both to the chain.
//!
//! The crate takes a deliberately narrow stance on crypto: secp256k1 ECDSA
//! for wallet proofs (the chain's native account scheme), RSA for the
//! identity key material the W3C document format expects, and AES-256-GCM
//! for the hybrid envelopes addressed to the tumbler.
//!
//! ## Architecture
//!
//! - [`config`]: network constants, Bech32 prefix tables, client settings
//! - [`account`]: validated addresses and public key encodings
//! - [`keys`]: RSA PEM loading and generation
//! - [`wallet`]: the account key collaborator trait and a local impl
//! - [`identity`]: DID documents and their secp256k1 proofs
//! - [`envelope`]: hybrid AES-256-GCM + RSA sealing for the tumbler
//! - [`powerup`]: confidential pairwise funding requests
//! - [`codec`]: the static message registry and wire enclosures
//! - [`tx`]: transaction assembly and the broadcast seam
//! - [`client`]: the high-level entry point tying it all together
//!
//! Nothing in the crate touches the network. Delivery lives behind
//! [`tx::Broadcaster`], so the SDK stays transport-agnostic and fully
//! testable offline.

pub mod account;
pub mod client;
pub mod codec;
pub mod coin;
pub mod config;
pub mod envelope;
pub mod error;
pub mod identity;
pub mod keys;
pub mod powerup;
pub mod tx;
pub mod wallet;

pub use account::AccountId;
pub use client::Client;
pub use codec::{Msg, MsgKind, TypeMapping};
pub use coin::Coin;
pub use config::{Bech32Prefixes, SdkConfig, TxMode};
pub use error::Error;
pub use identity::IdentityDocument;
pub use powerup::{PowerUpParams, PowerUpRequest};
pub use tx::{Broadcaster, TransactionPayload};
pub use wallet::{LocalWallet, Wallet};
