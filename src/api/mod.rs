//! Typed client for the lending backend REST API
//!
//! `LendingBackend` is the seam between the orchestrators and the wire: the
//! HTTP implementation lives here, tests script the trait directly.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use crate::config::Config;
use crate::error::{ClientError, ClientResult};

pub mod model;

pub use model::{
    CancelResponse, CaptureResponse, CapturedIntent, CollateralAsset, CollateralDetails,
    CollateralVerification, CreatePaymentIntentRequest, PaymentIntentCreated, PaymentIntentStatus,
    PaymentMetadata, PaymentStatus, VerificationDetails, VerificationRequest, VerificationStatus,
};

/// User-flow endpoints of the lending backend
#[async_trait]
pub trait LendingBackend: Send + Sync {
    async fn create_payment_intent(
        &self,
        request: &CreatePaymentIntentRequest,
    ) -> ClientResult<PaymentIntentCreated>;

    async fn payment_status(&self, intent_id: &str) -> ClientResult<PaymentStatus>;

    async fn capture_payment(&self, intent_id: &str) -> ClientResult<CaptureResponse>;

    async fn cancel_payment(&self, intent_id: &str) -> ClientResult<CancelResponse>;

    async fn start_verification(
        &self,
        request: &VerificationRequest,
    ) -> ClientResult<CollateralVerification>;

    async fn verification_status(
        &self,
        verification_id: &str,
    ) -> ClientResult<CollateralVerification>;

    async fn collateral_details(&self, address: &str) -> ClientResult<CollateralDetails>;
}

/// HTTP implementation of [`LendingBackend`] over `reqwest`
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(config: &Config) -> Self {
        Self::with_client(
            Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| Client::new()),
            &config.api_base_url,
        )
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self.client.get(self.url(path)).send().await?;
        decode(response).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        decode(response).await
    }

    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self.client.post(self.url(path)).send().await?;
        decode(response).await
    }
}

/// Decode a response, mapping non-2xx statuses to `ClientError::Api` with a
/// short snippet of the body.
pub(crate) async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ClientError::Api {
            status: status.as_u16(),
            message: snippet(&body),
        });
    }
    Ok(response.json::<T>().await?)
}

fn snippet(body: &str) -> String {
    const MAX: usize = 200;
    let trimmed = body.trim();
    if trimmed.len() <= MAX {
        trimmed.to_string()
    } else {
        let mut end = MAX;
        while !trimmed.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}…", &trimmed[..end])
    }
}

#[async_trait]
impl LendingBackend for HttpBackend {
    async fn create_payment_intent(
        &self,
        request: &CreatePaymentIntentRequest,
    ) -> ClientResult<PaymentIntentCreated> {
        tracing::debug!(
            amount = request.amount,
            address = %request.algo_address,
            "Creating payment intent"
        );
        self.post_json("/create-payment-intent", request).await
    }

    async fn payment_status(&self, intent_id: &str) -> ClientResult<PaymentStatus> {
        self.get_json(&format!("/payment-intent/{}", intent_id)).await
    }

    async fn capture_payment(&self, intent_id: &str) -> ClientResult<CaptureResponse> {
        self.post_empty(&format!("/capture-payment/{}", intent_id))
            .await
    }

    async fn cancel_payment(&self, intent_id: &str) -> ClientResult<CancelResponse> {
        self.post_empty(&format!("/cancel-payment/{}", intent_id))
            .await
    }

    async fn start_verification(
        &self,
        request: &VerificationRequest,
    ) -> ClientResult<CollateralVerification> {
        tracing::debug!(
            intent_id = %request.payment_intent_id,
            address = %request.algo_address,
            "Starting collateral verification"
        );
        self.post_json("/verify-collateral", request).await
    }

    async fn verification_status(
        &self,
        verification_id: &str,
    ) -> ClientResult<CollateralVerification> {
        self.get_json(&format!("/verification-status/{}", verification_id))
            .await
    }

    async fn collateral_details(&self, address: &str) -> ClientResult<CollateralDetails> {
        self.get_json(&format!("/collateral-details/{}", address))
            .await
    }
}
