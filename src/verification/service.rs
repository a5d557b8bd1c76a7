//! Verification orchestrator
//!
//! Starts a collateral verification for a settled payment and polls it to a
//! terminal state. A verification's id is stable for its polling lifetime;
//! the local record is only ever overwritten with the latest fetched
//! snapshot.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use crate::api::{
    CollateralDetails, CollateralVerification, LendingBackend, VerificationRequest,
    VerificationStatus,
};
use crate::config::Config;
use crate::error::{ClientError, ClientResult};
use crate::verification::model::VerificationReport;

#[derive(Clone)]
pub struct VerificationService {
    backend: Arc<dyn LendingBackend>,
    status_poll_interval: Duration,
}

impl VerificationService {
    pub fn new(backend: Arc<dyn LendingBackend>, config: &Config) -> Self {
        Self {
            backend,
            status_poll_interval: config.status_poll_interval,
        }
    }

    /// Request verification start for a settled payment, then immediately
    /// fetch the collateral snapshot for the address. Transport failures on
    /// either call surface as `VerificationInit`.
    pub async fn start(
        &self,
        payment_intent_id: &str,
        algo_address: &str,
        amount: f64,
    ) -> ClientResult<(CollateralVerification, CollateralDetails)> {
        let request = VerificationRequest {
            payment_intent_id: payment_intent_id.to_string(),
            algo_address: algo_address.to_string(),
            amount,
        };

        let verification = self
            .backend
            .start_verification(&request)
            .await
            .map_err(|e| ClientError::VerificationInit(e.to_string()))?;

        tracing::info!(
            verification_id = %verification.verification_id,
            status = verification.status.as_str(),
            "Collateral verification started"
        );

        let collateral = self
            .backend
            .collateral_details(algo_address)
            .await
            .map_err(|e| ClientError::VerificationInit(e.to_string()))?;

        Ok((verification, collateral))
    }

    /// Fetch the current verification record.
    pub async fn status(&self, verification_id: &str) -> ClientResult<CollateralVerification> {
        self.backend.verification_status(verification_id).await
    }

    /// Poll a pending verification at the poll interval until it leaves
    /// `pending`. Transport errors during a tick are logged and polling
    /// continues. `verified` completes; `failed` surfaces as an error
    /// instead of stalling silently.
    pub async fn poll_until_terminal(
        &self,
        verification_id: &str,
    ) -> ClientResult<CollateralVerification> {
        loop {
            sleep(self.status_poll_interval).await;

            let record = match self.backend.verification_status(verification_id).await {
                Ok(record) => record,
                Err(e) => {
                    tracing::warn!(verification_id, error = %e, "Error polling verification status");
                    continue;
                }
            };

            match &record.status {
                VerificationStatus::Pending => continue,
                VerificationStatus::Verified => {
                    tracing::info!(verification_id, "Collateral verified");
                    return Ok(record);
                }
                VerificationStatus::Failed => {
                    tracing::error!(verification_id, "Collateral verification failed");
                    return Err(ClientError::VerificationFailed);
                }
                VerificationStatus::Other(s) => {
                    return Err(ClientError::UnexpectedStatus(s.clone()));
                }
            }
        }
    }

    /// Start a verification and drive it to a terminal state. A record that
    /// comes back already `verified` completes immediately without polling.
    pub async fn run(
        &self,
        payment_intent_id: &str,
        algo_address: &str,
        amount: f64,
    ) -> ClientResult<VerificationReport> {
        let (verification, collateral) =
            self.start(payment_intent_id, algo_address, amount).await?;

        let verification = match &verification.status {
            VerificationStatus::Verified => verification,
            VerificationStatus::Pending => {
                self.poll_until_terminal(&verification.verification_id)
                    .await?
            }
            VerificationStatus::Failed => return Err(ClientError::VerificationFailed),
            VerificationStatus::Other(s) => {
                return Err(ClientError::UnexpectedStatus(s.clone()));
            }
        };

        Ok(VerificationReport {
            verification,
            collateral,
        })
    }
}
