use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::api::PaymentIntentStatus;
use crate::error::{ClientError, ClientResult};

/// State handed from intent creation to confirmation: the correlation id,
/// the provider client secret, and the values the intent was created with.
#[derive(Debug, Clone)]
pub struct PaymentSession {
    pub intent_id: String,
    pub client_secret: String,
    pub wallet: String,
    /// Amount in minor currency units (cents)
    pub amount_minor: i64,
    pub currency: String,
}

/// Result of driving a confirmed payment to rest
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentOutcome {
    /// The payment settled (directly, or via a successful capture)
    Succeeded { intent_id: String },
    /// The intent needs further user interaction before it can proceed;
    /// no automatic action is taken.
    AwaitingUser {
        status: PaymentIntentStatus,
        message: String,
    },
}

/// Convert a whole-unit amount to minor currency units (cents), validating
/// that it is positive. Rounds to the nearest cent.
pub fn to_minor_units(amount: Decimal) -> ClientResult<i64> {
    if amount <= Decimal::ZERO {
        return Err(ClientError::InvalidAmount(
            "Amount must be greater than 0".to_string(),
        ));
    }
    amount
        .checked_mul(Decimal::from(100))
        .map(|cents| cents.round())
        .and_then(|cents| cents.to_i64())
        .ok_or_else(|| ClientError::InvalidAmount("Amount is out of range".to_string()))
}
