//! Payment stage of the borrow flow
//!
//! The third-party payment widget is an external collaborator; it appears
//! here only as the [`PaymentProvider`] seam. Everything after confirmation
//! (status dispatch, capture, polling) is [`service::PaymentService`].

use async_trait::async_trait;
use std::sync::Arc;

use crate::api::{LendingBackend, PaymentStatus};
use crate::error::ClientResult;

pub mod model;
pub mod service;

pub use model::{to_minor_units, PaymentOutcome, PaymentSession};
pub use service::{PaymentService, StatusPoll};

/// Seam for the third-party payment provider: submits the payment form for
/// a session and returns the resulting intent snapshot.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    async fn confirm_payment(&self, session: &PaymentSession) -> ClientResult<PaymentStatus>;
}

/// Provider for backend-confirmed intents: when a payment method id was
/// supplied at creation time the backend confirms server-side, so
/// "submitting the form" reduces to re-fetching the intent.
pub struct StatusRefreshProvider {
    backend: Arc<dyn LendingBackend>,
}

impl StatusRefreshProvider {
    pub fn new(backend: Arc<dyn LendingBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl PaymentProvider for StatusRefreshProvider {
    async fn confirm_payment(&self, session: &PaymentSession) -> ClientResult<PaymentStatus> {
        self.backend.payment_status(&session.intent_id).await
    }
}
