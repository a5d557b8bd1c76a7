//! Admin console pass-through client
//!
//! The admin endpoints are opaque: forms are serialized as-is and the JSON
//! response is handed back verbatim for display, with no client-side
//! interpretation.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::api::decode;
use crate::config::Config;
use crate::error::ClientResult;

/// Request body for POST /admin/token/create
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTokenRequest {
    pub total_units: u64,
    pub decimals: u32,
    pub asset_name: String,
    pub unit_name: String,
    pub metadata_url: String,
}

/// Whitelist action for POST /admin/whitelist/manage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WhitelistAction {
    Add,
    Remove,
}

/// Request body for POST /admin/whitelist/manage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhitelistRequest {
    pub event_id: String,
    pub addresses: Vec<String>,
    pub action: WhitelistAction,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RegenerateRequest {
    user_address: String,
}

/// Client for the admin console endpoints
#[derive(Clone)]
pub struct AdminClient {
    client: Client,
    base_url: String,
}

impl AdminClient {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Mint a new asset.
    pub async fn create_token(&self, request: &CreateTokenRequest) -> ClientResult<Value> {
        tracing::info!(asset_name = %request.asset_name, "Creating token");
        let response = self
            .client
            .post(self.url("/admin/token/create"))
            .json(request)
            .send()
            .await?;
        decode(response).await
    }

    /// Freeze a wallet.
    pub async fn freeze_wallet(&self, address: &str) -> ClientResult<Value> {
        tracing::info!(address, "Freezing wallet");
        let response = self
            .client
            .post(self.url(&format!("/admin/wallet/freeze/{}", address)))
            .send()
            .await?;
        decode(response).await
    }

    /// Unfreeze a wallet.
    pub async fn unfreeze_wallet(&self, address: &str) -> ClientResult<Value> {
        tracing::info!(address, "Unfreezing wallet");
        let response = self
            .client
            .post(self.url(&format!("/admin/wallet/unfreeze/{}", address)))
            .send()
            .await?;
        decode(response).await
    }

    /// Add or remove addresses from an event whitelist.
    pub async fn manage_whitelist(&self, request: &WhitelistRequest) -> ClientResult<Value> {
        tracing::info!(
            event_id = %request.event_id,
            count = request.addresses.len(),
            "Managing whitelist"
        );
        let response = self
            .client
            .post(self.url("/admin/whitelist/manage"))
            .json(request)
            .send()
            .await?;
        decode(response).await
    }

    /// Fetch liquidity-pool status.
    pub async fn pool_status(&self) -> ClientResult<Value> {
        let response = self.client.get(self.url("/admin/pool/status")).send().await?;
        decode(response).await
    }

    /// Reissue a token to a user.
    pub async fn regenerate_token(&self, user_address: &str) -> ClientResult<Value> {
        tracing::info!(user_address, "Regenerating token");
        let response = self
            .client
            .post(self.url("/admin/token/regenerate"))
            .json(&RegenerateRequest {
                user_address: user_address.to_string(),
            })
            .send()
            .await?;
        decode(response).await
    }
}
