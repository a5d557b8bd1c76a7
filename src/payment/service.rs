//! Payment orchestrator
//!
//! Creates a payment intent, settles a confirmed intent according to the
//! backend's status, and polls intent status until a terminal state. All
//! backend failures are converted into flow errors at the call site; nothing
//! is retried except the fixed-interval loops.

use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::sleep;

use crate::api::{
    CaptureResponse, CancelResponse, CreatePaymentIntentRequest, LendingBackend,
    PaymentIntentStatus, PaymentStatus,
};
use crate::config::Config;
use crate::error::{ClientError, ClientResult};
use crate::payment::model::{to_minor_units, PaymentOutcome, PaymentSession};
use crate::payment::PaymentProvider;

#[derive(Clone)]
pub struct PaymentService {
    backend: Arc<dyn LendingBackend>,
    currency: String,
    processing_recheck: Duration,
    status_poll_interval: Duration,
}

impl PaymentService {
    pub fn new(backend: Arc<dyn LendingBackend>, config: &Config) -> Self {
        Self {
            backend,
            currency: config.currency.clone(),
            processing_recheck: config.processing_recheck,
            status_poll_interval: config.status_poll_interval,
        }
    }

    /// Validate the amount and create a payment intent keyed by it.
    ///
    /// The amount is converted to minor currency units before transmission.
    /// Any transport or backend failure surfaces as `PaymentInit`.
    pub async fn initialize(
        &self,
        amount: Decimal,
        wallet: &str,
        payment_method_id: &str,
    ) -> ClientResult<PaymentSession> {
        let amount_minor = to_minor_units(amount)?;

        let request = CreatePaymentIntentRequest {
            amount: amount_minor,
            algo_address: wallet.to_string(),
            payment_method_id: payment_method_id.to_string(),
            currency: self.currency.clone(),
        };

        let created = self
            .backend
            .create_payment_intent(&request)
            .await
            .map_err(|e| ClientError::PaymentInit(e.to_string()))?;

        tracing::info!(
            intent_id = %created.payment_intent_id,
            amount_minor,
            "Payment intent created"
        );

        Ok(PaymentSession {
            intent_id: created.payment_intent_id,
            client_secret: created.client_secret,
            wallet: wallet.to_string(),
            amount_minor,
            currency: self.currency.clone(),
        })
    }

    /// Submit the payment form to the provider and settle the result.
    pub async fn confirm(
        &self,
        session: &PaymentSession,
        provider: &dyn PaymentProvider,
    ) -> ClientResult<PaymentOutcome> {
        let status = provider.confirm_payment(session).await?;
        self.settle(&status).await
    }

    /// Apply the status-dispatch policy to an intent snapshot.
    ///
    /// This is the single place the post-confirmation control flow lives;
    /// both provider confirmations and backend-confirmed intents go through
    /// it.
    pub async fn settle(&self, status: &PaymentStatus) -> ClientResult<PaymentOutcome> {
        match &status.status {
            PaymentIntentStatus::Succeeded => {
                tracing::info!(intent_id = %status.id, "Payment succeeded");
                Ok(PaymentOutcome::Succeeded {
                    intent_id: status.id.clone(),
                })
            }

            PaymentIntentStatus::Processing => {
                tracing::info!(intent_id = %status.id, "Your payment is processing");
                self.await_processing(&status.id).await
            }

            PaymentIntentStatus::RequiresPaymentMethod => Ok(PaymentOutcome::AwaitingUser {
                status: status.status.clone(),
                message: "Please enter your payment details.".to_string(),
            }),

            PaymentIntentStatus::RequiresConfirmation => Ok(PaymentOutcome::AwaitingUser {
                status: status.status.clone(),
                message: "Payment requires confirmation.".to_string(),
            }),

            PaymentIntentStatus::RequiresAction => Ok(PaymentOutcome::AwaitingUser {
                status: status.status.clone(),
                message: "Payment requires additional action.".to_string(),
            }),

            PaymentIntentStatus::RequiresCapture => {
                if status.payment_method.is_none() {
                    tracing::error!(intent_id = %status.id, "No payment method attached to intent");
                    return Err(ClientError::MissingPaymentMethod);
                }
                tracing::info!(intent_id = %status.id, "Payment authorized, capturing");
                self.capture_once(&status.id).await
            }

            other => Err(ClientError::UnexpectedStatus(other.as_str().to_string())),
        }
    }

    /// Re-check a processing intent at a fixed delay until it leaves
    /// `processing`. A `requires_capture` result is captured once; any other
    /// non-success status fails with that status string.
    async fn await_processing(&self, intent_id: &str) -> ClientResult<PaymentOutcome> {
        loop {
            sleep(self.processing_recheck).await;

            let status = self
                .backend
                .payment_status(intent_id)
                .await
                .map_err(|e| {
                    ClientError::Transport(format!("Error checking payment status: {}", e))
                })?;

            match status.status {
                PaymentIntentStatus::Succeeded => {
                    tracing::info!(intent_id, "Payment succeeded");
                    return Ok(PaymentOutcome::Succeeded {
                        intent_id: intent_id.to_string(),
                    });
                }
                PaymentIntentStatus::Processing => continue,
                PaymentIntentStatus::RequiresCapture => {
                    return self.capture_once(intent_id).await;
                }
                other => {
                    return Err(ClientError::UnexpectedStatus(other.as_str().to_string()));
                }
            }
        }
    }

    /// Capture an authorized intent exactly once; no retry on failure.
    async fn capture_once(&self, intent_id: &str) -> ClientResult<PaymentOutcome> {
        let result = self
            .backend
            .capture_payment(intent_id)
            .await
            .map_err(|e| ClientError::Capture(e.to_string()))?;

        if let Some(error) = result.error {
            tracing::error!(intent_id, %error, "Payment capture failed");
            return Err(ClientError::Capture(error));
        }
        if !result.success {
            return Err(ClientError::Capture(
                "capture was not applied".to_string(),
            ));
        }

        tracing::info!(intent_id, "Payment captured successfully");
        Ok(PaymentOutcome::Succeeded {
            intent_id: intent_id.to_string(),
        })
    }

    /// Best-effort capture, at most once per trigger.
    pub async fn capture(&self, intent_id: &str) -> ClientResult<CaptureResponse> {
        self.backend
            .capture_payment(intent_id)
            .await
            .map_err(|_| ClientError::Capture("Failed to capture payment".to_string()))
    }

    /// Best-effort cancel, at most once per trigger.
    pub async fn cancel(&self, intent_id: &str) -> ClientResult<CancelResponse> {
        self.backend
            .cancel_payment(intent_id)
            .await
            .map_err(|_| ClientError::Cancel("Failed to cancel payment".to_string()))
    }

    /// Fetch the current snapshot of an intent.
    pub async fn status(&self, intent_id: &str) -> ClientResult<PaymentStatus> {
        self.backend.payment_status(intent_id).await
    }

    /// Re-fetch an intent created earlier (e.g. after an external redirect)
    /// and report success only if it already settled.
    pub async fn resume(&self, intent_id: &str) -> ClientResult<PaymentOutcome> {
        let status = self.backend.payment_status(intent_id).await.map_err(|e| {
            ClientError::Transport(format!("Failed to verify payment status: {}", e))
        })?;

        match status.status {
            PaymentIntentStatus::Succeeded => Ok(PaymentOutcome::Succeeded {
                intent_id: intent_id.to_string(),
            }),
            other => Err(ClientError::UnexpectedStatus(other.as_str().to_string())),
        }
    }

    /// Re-fetch intent status at the poll interval until a terminal status
    /// is observed, then return it exactly once. Transport errors during a
    /// tick are logged and polling continues.
    pub async fn poll_until_terminal(&self, intent_id: &str) -> ClientResult<PaymentStatus> {
        loop {
            match self.backend.payment_status(intent_id).await {
                Ok(status) if status.status.is_terminal() => return Ok(status),
                Ok(status) => {
                    tracing::debug!(intent_id, status = status.status.as_str(), "Still polling");
                }
                Err(e) => {
                    tracing::warn!(intent_id, error = %e, "Error checking payment status");
                }
            }
            sleep(self.status_poll_interval).await;
        }
    }

    /// Spawn a background status poll with an explicit cancellation handle.
    pub fn spawn_status_poll(&self, intent_id: String) -> StatusPoll {
        self.spawn_status_poll_guarded(intent_id, || true)
    }

    /// Spawn a background status poll that also stops when `is_current`
    /// reports the owning flow has moved on. A single poll task exists per
    /// handle; dropping the handle stops the timer at the next tick.
    pub fn spawn_status_poll_guarded(
        &self,
        intent_id: String,
        is_current: impl Fn() -> bool + Send + Sync + 'static,
    ) -> StatusPoll {
        let (cancel_tx, mut cancel_rx) = watch::channel(false);
        let service = self.clone();

        let handle = tokio::spawn(async move {
            loop {
                if *cancel_rx.borrow() || !is_current() {
                    return Err(ClientError::Superseded);
                }

                match service.backend.payment_status(&intent_id).await {
                    Ok(status) if status.status.is_terminal() => {
                        // Late result from a superseded stage is discarded.
                        if !is_current() {
                            return Err(ClientError::Superseded);
                        }
                        return Ok(status);
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::warn!(intent_id = %intent_id, error = %e, "Error checking payment status");
                    }
                }

                tokio::select! {
                    changed = cancel_rx.changed() => {
                        // Cancelled explicitly, or the handle was dropped.
                        if changed.is_err() || *cancel_rx.borrow() {
                            return Err(ClientError::Superseded);
                        }
                    }
                    _ = sleep(service.status_poll_interval) => {}
                }
            }
        });

        StatusPoll { cancel_tx, handle }
    }
}

/// Handle to a spawned status poll. Cancelling (or dropping) the handle
/// stops the poll task, so no timer outlives its owner.
pub struct StatusPoll {
    cancel_tx: watch::Sender<bool>,
    handle: JoinHandle<ClientResult<PaymentStatus>>,
}

impl StatusPoll {
    /// Stop the poll task at its next scheduling point.
    pub fn cancel(&self) {
        let _ = self.cancel_tx.send(true);
    }

    /// Wait for the terminal snapshot (or cancellation).
    pub async fn outcome(self) -> ClientResult<PaymentStatus> {
        match self.handle.await {
            Ok(result) => result,
            Err(_) => Err(ClientError::Superseded),
        }
    }
}
