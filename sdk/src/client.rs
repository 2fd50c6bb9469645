//! # High-Level Client
//!
//! [`Client`] bundles a wallet, a validated configuration, and the codec
//! table behind one entry point. It is the surface application code is
//! expected to hold; everything it does is also reachable through the
//! free functions in the individual modules.

use crate::codec::{Msg, TypeMapping};
use crate::config::SdkConfig;
use crate::error::Error;
use crate::identity::{build_identity_document, IdentityDocument};
use crate::powerup::{build_power_up_request, PowerUpParams, PowerUpRequest};
use crate::tx::{assemble_transaction, Broadcaster, TransactionPayload};
use crate::wallet::Wallet;
use std::io::Read;

/// One configured connection to an Auric network, bound to one wallet.
#[derive(Debug)]
pub struct Client<W: Wallet> {
    wallet: W,
    config: SdkConfig,
    type_mapping: TypeMapping,
}

impl<W: Wallet> Client<W> {
    /// Create a client. Validates the config once; every later operation
    /// can assume it is sound.
    pub fn new(wallet: W, config: SdkConfig) -> Result<Self, Error> {
        config.validate()?;
        let type_mapping = TypeMapping::standard();
        tracing::debug!(
            address = wallet.address(),
            endpoint = %config.lcd_endpoint,
            "client initialized"
        );
        Ok(Self {
            wallet,
            config,
            type_mapping,
        })
    }

    /// The wallet's Bech32 account address.
    pub fn address(&self) -> &str {
        self.wallet.address()
    }

    /// The wallet's Bech32 account public key.
    pub fn public_key(&self) -> &str {
        self.wallet.public_key()
    }

    /// The active configuration.
    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    /// The codec table in use.
    pub fn type_mapping(&self) -> &TypeMapping {
        &self.type_mapping
    }

    /// Build and sign an identity document for this client's wallet.
    ///
    /// See [`build_identity_document`] for the key stream contract.
    pub fn build_identity_document<V: Read, S: Read>(
        &self,
        verification_key: &mut V,
        signature_key: &mut S,
    ) -> Result<IdentityDocument, Error> {
        build_identity_document(
            &self.wallet,
            &self.config,
            &self.wallet.public_key().to_string(),
            verification_key,
            signature_key,
        )
    }

    /// Build a sealed power-up request from this client's wallet.
    pub fn build_power_up_request<T: Read, S: Read>(
        &self,
        params: PowerUpParams<T, S>,
    ) -> Result<PowerUpRequest, Error> {
        build_power_up_request(&self.wallet, &self.config, params)
    }

    /// Assemble a transaction from a message batch using the client's
    /// codec table.
    pub fn assemble_transaction(&self, msgs: &[Msg]) -> Result<TransactionPayload, Error> {
        assemble_transaction(&self.type_mapping, msgs)
    }

    /// Assemble and hand a message batch to a delivery collaborator,
    /// returning the transaction hash it reports.
    pub fn send_transaction<B: Broadcaster>(
        &self,
        broadcaster: &B,
        msgs: &[Msg],
    ) -> Result<String, Error> {
        let payload = self.assemble_transaction(msgs)?;
        broadcaster
            .broadcast(&payload, self.config.mode, &self.config.lcd_endpoint)
            .map_err(|e| Error::Broadcast(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::AccountId;
    use crate::codec::{Msg, MsgSend};
    use crate::coin::Coin;
    use crate::config::TxMode;
    use crate::tx::BroadcastError;
    use crate::wallet::LocalWallet;
    use std::io::Cursor;

    fn client() -> Client<LocalWallet> {
        let config = SdkConfig::default();
        let wallet = LocalWallet::random(&config.prefixes).unwrap();
        Client::new(wallet, config).unwrap()
    }

    #[test]
    fn invalid_config_rejected_at_construction() {
        let config = SdkConfig {
            lcd_endpoint: String::new(),
            ..SdkConfig::default()
        };
        let wallet = LocalWallet::random(&config.prefixes).unwrap();
        assert!(matches!(
            Client::new(wallet, config),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn identity_document_through_client() {
        let client = client();
        let doc = client
            .build_identity_document(
                &mut Cursor::new(include_str!("../testdata/requester.pub.pem")),
                &mut Cursor::new(include_str!("../testdata/tumbler.pub.pem")),
            )
            .unwrap();
        assert_eq!(doc.id.as_str(), client.address());
        doc.verify_proof().unwrap();
    }

    #[test]
    fn power_up_through_client() {
        let client = client();
        let pairwise =
            AccountId::from_bytes([9; 20], &client.config().prefixes).unwrap();
        let req = client
            .build_power_up_request(PowerUpParams {
                public_key: client.public_key().to_string(),
                tumbler_key: Cursor::new(include_str!("../testdata/tumbler.pub.pem")),
                signature_key: Cursor::new(include_str!("../testdata/requester.key.pem")),
                amount: 77,
                pairwise_address: pairwise,
            })
            .unwrap();
        assert_eq!(req.claimant.as_str(), client.address());
    }

    struct RecordingBroadcaster;

    impl Broadcaster for RecordingBroadcaster {
        fn broadcast(
            &self,
            payload: &TransactionPayload,
            mode: TxMode,
            endpoint: &str,
        ) -> Result<String, BroadcastError> {
            assert_eq!(mode, TxMode::Sync);
            assert_eq!(endpoint, "http://localhost:1317");
            assert_eq!(payload.message.len(), 1);
            Ok("ABC123".to_string())
        }
    }

    struct FailingBroadcaster;

    impl Broadcaster for FailingBroadcaster {
        fn broadcast(
            &self,
            _payload: &TransactionPayload,
            _mode: TxMode,
            _endpoint: &str,
        ) -> Result<String, BroadcastError> {
            Err(BroadcastError("connection refused".to_string()))
        }
    }

    fn send_msg(client: &Client<LocalWallet>) -> Msg {
        let from = AccountId::parse(client.address(), &client.config().prefixes).unwrap();
        let to = AccountId::from_bytes([7; 20], &client.config().prefixes).unwrap();
        Msg::Send(MsgSend {
            from_address: from,
            to_address: to,
            amount: vec![Coin::base(10)],
        })
    }

    #[test]
    fn send_transaction_returns_hash() {
        let client = client();
        let msg = send_msg(&client);
        let hash = client
            .send_transaction(&RecordingBroadcaster, &[msg])
            .unwrap();
        assert_eq!(hash, "ABC123");
    }

    #[test]
    fn broadcast_failure_surfaces() {
        let client = client();
        let msg = send_msg(&client);
        let err = client
            .send_transaction(&FailingBroadcaster, &[msg])
            .unwrap_err();
        assert!(matches!(err, Error::Broadcast(_)));
    }

    #[test]
    fn empty_batch_never_reaches_broadcaster() {
        struct PanickingBroadcaster;
        impl Broadcaster for PanickingBroadcaster {
            fn broadcast(
                &self,
                _: &TransactionPayload,
                _: TxMode,
                _: &str,
            ) -> Result<String, BroadcastError> {
                panic!("must not be called");
            }
        }

        let client = client();
        assert!(matches!(
            client.send_transaction(&PanickingBroadcaster, &[]),
            Err(Error::NoMessages)
        ));
    }
}
