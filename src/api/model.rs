//! Wire types for the lending backend REST API
//!
//! Field names mirror the backend JSON exactly: the payment endpoints speak
//! snake_case while the collateral/verification endpoints speak camelCase.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a payment intent, as reported by the payment backend.
///
/// Unknown strings are preserved in `Other` so an unrecognized terminal value
/// can be surfaced verbatim instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentIntentStatus {
    RequiresPaymentMethod,
    RequiresConfirmation,
    RequiresAction,
    Processing,
    RequiresCapture,
    Succeeded,
    Canceled,
    Other(String),
}

impl PaymentIntentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            PaymentIntentStatus::RequiresPaymentMethod => "requires_payment_method",
            PaymentIntentStatus::RequiresConfirmation => "requires_confirmation",
            PaymentIntentStatus::RequiresAction => "requires_action",
            PaymentIntentStatus::Processing => "processing",
            PaymentIntentStatus::RequiresCapture => "requires_capture",
            PaymentIntentStatus::Succeeded => "succeeded",
            PaymentIntentStatus::Canceled => "canceled",
            PaymentIntentStatus::Other(s) => s,
        }
    }

    /// Terminal states: the backend will not move the intent further.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PaymentIntentStatus::Succeeded | PaymentIntentStatus::Canceled
        )
    }
}

impl From<String> for PaymentIntentStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "requires_payment_method" => PaymentIntentStatus::RequiresPaymentMethod,
            "requires_confirmation" => PaymentIntentStatus::RequiresConfirmation,
            "requires_action" => PaymentIntentStatus::RequiresAction,
            "processing" => PaymentIntentStatus::Processing,
            "requires_capture" => PaymentIntentStatus::RequiresCapture,
            "succeeded" => PaymentIntentStatus::Succeeded,
            "canceled" => PaymentIntentStatus::Canceled,
            _ => PaymentIntentStatus::Other(s),
        }
    }
}

impl From<PaymentIntentStatus> for String {
    fn from(status: PaymentIntentStatus) -> Self {
        status.as_str().to_string()
    }
}

/// Request body for POST /create-payment-intent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePaymentIntentRequest {
    /// Amount in minor currency units (cents)
    pub amount: i64,
    pub algo_address: String,
    pub payment_method_id: String,
    pub currency: String,
}

/// Response from POST /create-payment-intent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntentCreated {
    pub client_secret: String,
    pub payment_intent_id: String,
    pub status: PaymentIntentStatus,
}

/// Metadata attached to a payment intent by the backend
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentMetadata {
    #[serde(default)]
    pub algo_address: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// Snapshot of a payment intent from GET /payment-intent/{id}
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentStatus {
    pub id: String,
    /// Amount in minor currency units (cents)
    pub amount: i64,
    pub currency: String,
    pub status: PaymentIntentStatus,
    #[serde(default)]
    pub metadata: PaymentMetadata,
    #[serde(default)]
    pub amount_capturable: i64,
    /// Present once a payment method has been attached to the intent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
}

/// Response from POST /capture-payment/{id}
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(
        rename = "paymentIntent",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub payment_intent: Option<CapturedIntent>,
}

/// Captured intent summary embedded in a capture response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapturedIntent {
    pub id: String,
    pub status: PaymentIntentStatus,
    pub amount: i64,
    pub currency: String,
}

/// Response from POST /cancel-payment/{id}
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelResponse {
    pub id: String,
    pub status: PaymentIntentStatus,
}

/// Status of a collateral verification record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VerificationStatus {
    Pending,
    Verified,
    Failed,
    Other(String),
}

impl VerificationStatus {
    pub fn as_str(&self) -> &str {
        match self {
            VerificationStatus::Pending => "pending",
            VerificationStatus::Verified => "verified",
            VerificationStatus::Failed => "failed",
            VerificationStatus::Other(s) => s,
        }
    }
}

impl From<String> for VerificationStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "pending" => VerificationStatus::Pending,
            "verified" => VerificationStatus::Verified,
            "failed" => VerificationStatus::Failed,
            _ => VerificationStatus::Other(s),
        }
    }
}

impl From<VerificationStatus> for String {
    fn from(status: VerificationStatus) -> Self {
        status.as_str().to_string()
    }
}

/// Request body for POST /verify-collateral
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationRequest {
    pub payment_intent_id: String,
    pub algo_address: String,
    /// Borrow amount in whole currency units, as the dashboard sends it
    pub amount: f64,
}

/// Verification record from POST /verify-collateral and
/// GET /verification-status/{id}
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollateralVerification {
    pub status: VerificationStatus,
    pub collateral_amount: f64,
    pub verification_id: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub details: VerificationDetails,
}

/// Attestation details attached to a verification record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationDetails {
    pub asset_type: String,
    pub asset_value: f64,
    pub risk_score: f64,
    pub verification_method: String,
}

/// Snapshot from GET /collateral-details/{address}
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollateralDetails {
    pub total_collateral: f64,
    pub available_collateral: f64,
    pub locked_collateral: f64,
    pub assets: Vec<CollateralAsset>,
}

/// One asset line in a collateral snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollateralAsset {
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: f64,
    pub value: f64,
}
