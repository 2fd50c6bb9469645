//! # Transaction Assembly & Broadcast Seam
//!
//! Assembly turns a batch of messages into the JSON payload the LCD
//! accepts: enclosed messages plus a flat fee scaled by message count.
//! Delivery is behind the [`Broadcaster`] trait; the SDK ships no HTTP
//! client of its own, callers plug in whatever transport they run on.

use crate::codec::{MessageEnclosure, Msg, TypeMapping};
use crate::coin::Coin;
use crate::config::{TxMode, FEE_PER_MESSAGE, TX_GAS};
use crate::error::Error;
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

// ---------------------------------------------------------------------------
// Payload
// ---------------------------------------------------------------------------

/// Transaction fee: an amount list and a decimal gas limit string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fee {
    pub amount: Vec<Coin>,
    pub gas: String,
}

/// The assembled transaction body, ready for signing and broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionPayload {
    pub message: Vec<MessageEnclosure>,
    pub fee: Fee,
}

/// Assemble a transaction from a non-empty batch of messages.
///
/// The fee is [`FEE_PER_MESSAGE`] per message with a fixed gas limit of
/// [`TX_GAS`]; callers never price transactions themselves.
pub fn assemble_transaction(
    mapping: &TypeMapping,
    msgs: &[Msg],
) -> Result<TransactionPayload, Error> {
    if msgs.is_empty() {
        return Err(Error::NoMessages);
    }

    let mut enclosed = Vec::with_capacity(msgs.len());
    for (index, msg) in msgs.iter().enumerate() {
        let enclosure = MessageEnclosure::enclose(mapping, msg)
            .map_err(|source| Error::InvalidMessage { index, source })?;
        enclosed.push(enclosure);
    }

    let total_fee = FEE_PER_MESSAGE * msgs.len() as u64;
    tracing::debug!(messages = msgs.len(), fee = total_fee, "assembled transaction");

    Ok(TransactionPayload {
        message: enclosed,
        fee: Fee {
            amount: vec![Coin::base(total_fee)],
            gas: TX_GAS.to_string(),
        },
    })
}

// ---------------------------------------------------------------------------
// Broadcast seam
// ---------------------------------------------------------------------------

/// Transport-level broadcast failure.
#[derive(Debug, ThisError)]
#[error("{0}")]
pub struct BroadcastError(pub String);

/// Delivery collaborator for assembled transactions.
///
/// Implementations own the HTTP (or other) transport. On success they
/// return the transaction hash reported by the node.
pub trait Broadcaster {
    fn broadcast(
        &self,
        payload: &TransactionPayload,
        mode: TxMode,
        endpoint: &str,
    ) -> Result<String, BroadcastError>;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
