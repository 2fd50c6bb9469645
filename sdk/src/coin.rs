//! Denominated amounts for fees and transfers.
//!
//! Amounts are serialized as decimal strings because the chain's JSON
//! interface treats them as arbitrary-precision integers. The SDK works in
//! `u64` internally and stringifies at the boundary.

use crate::config::BASE_DENOM;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while constructing coin amounts.
#[derive(Debug, Error)]
pub enum CoinError {
    /// Zero-valued amounts are not representable on the wire.
    #[error("amount must be strictly positive")]
    ZeroAmount,
}

/// A single denominated amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: String,
}

impl Coin {
    /// A coin in the base denomination.
    pub fn base(amount: u64) -> Self {
        Self {
            denom: BASE_DENOM.to_string(),
            amount: amount.to_string(),
        }
    }
}

/// Build a single-coin amount list in the base denomination.
///
/// Rejects zero: the chain refuses empty-valued transfers.
pub fn coins(amount: u64) -> Result<Vec<Coin>, CoinError> {
    if amount == 0 {
        return Err(CoinError::ZeroAmount);
    }
    Ok(vec![Coin::base(amount)])
}
