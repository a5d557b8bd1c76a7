//! Centralized error handling for the borrow flow
//!
//! Every backend call is wrapped so that transport and non-2xx failures are
//! caught at the call site and converted into a `ClientError` with a short
//! human-readable message; nothing crosses a component boundary unhandled.

use thiserror::Error;

/// Error type covering the whole payment/verification flow
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Failed to initialize payment: {0}")]
    PaymentInit(String),

    #[error("Payment capture failed: {0}")]
    Capture(String),

    #[error("Payment cancel failed: {0}")]
    Cancel(String),

    #[error("Failed to verify collateral: {0}")]
    VerificationInit(String),

    #[error("Collateral verification failed")]
    VerificationFailed,

    #[error("Payment method not attached")]
    MissingPaymentMethod,

    #[error("Unexpected payment status: {0}")]
    UnexpectedStatus(String),

    #[error("Backend returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Flow moved to a different stage; result discarded")]
    Superseded,
}

impl ClientError {
    /// Get the error code string
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::InvalidAmount(_) => "INVALID_AMOUNT",
            ClientError::PaymentInit(_) => "PAYMENT_INIT_ERROR",
            ClientError::Capture(_) => "CAPTURE_ERROR",
            ClientError::Cancel(_) => "CANCEL_ERROR",
            ClientError::VerificationInit(_) => "VERIFICATION_INIT_ERROR",
            ClientError::VerificationFailed => "VERIFICATION_FAILED",
            ClientError::MissingPaymentMethod => "MISSING_PAYMENT_METHOD",
            ClientError::UnexpectedStatus(_) => "UNEXPECTED_STATUS",
            ClientError::Api { .. } => "API_ERROR",
            ClientError::Transport(_) => "TRANSPORT_ERROR",
            ClientError::Superseded => "SUPERSEDED",
        }
    }
}

// Convenience conversions from common error types

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Transport(format!("Invalid JSON: {}", err))
    }
}

/// Result type alias using ClientError
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            ClientError::InvalidAmount("x".to_string()).error_code(),
            "INVALID_AMOUNT"
        );
        assert_eq!(
            ClientError::PaymentInit("x".to_string()).error_code(),
            "PAYMENT_INIT_ERROR"
        );
        assert_eq!(
            ClientError::MissingPaymentMethod.error_code(),
            "MISSING_PAYMENT_METHOD"
        );
        assert_eq!(ClientError::Superseded.error_code(), "SUPERSEDED");
    }

    #[test]
    fn test_display_messages() {
        let err = ClientError::UnexpectedStatus("weird_state".to_string());
        assert!(err.to_string().contains("weird_state"));

        let err = ClientError::Api {
            status: 502,
            message: "bad gateway".to_string(),
        };
        assert!(err.to_string().contains("502"));
    }
}
