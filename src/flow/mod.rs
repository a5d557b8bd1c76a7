//! Borrow flow driver
//!
//! Sequences Amount Intake → Payment → Verification. Amount validation is
//! purely local; no backend call happens until the amount has parsed as a
//! positive decimal. The payment-intent id is the only value handed from the
//! payment stage to the verification stage.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use uuid::Uuid;

use crate::api::{CollateralDetails, CollateralVerification, LendingBackend, PaymentIntentStatus};
use crate::config::Config;
use crate::error::{ClientError, ClientResult};
use crate::payment::{PaymentOutcome, PaymentProvider, PaymentService, StatusPoll};
use crate::verification::VerificationService;

/// Parse a free-text amount input into a positive decimal.
///
/// Fails with `InvalidAmount` for anything not parseable or ≤ 0; callers
/// must not touch the network on failure.
pub fn parse_borrow_amount(input: &str) -> ClientResult<Decimal> {
    let amount: Decimal = input
        .trim()
        .parse()
        .map_err(|_| ClientError::InvalidAmount("Please enter a valid number".to_string()))?;

    if amount <= Decimal::ZERO {
        return Err(ClientError::InvalidAmount(
            "Amount must be greater than 0".to_string(),
        ));
    }

    Ok(amount)
}

/// Monotonic stage stamp for one flow instance.
///
/// Every stage transition advances the generation; background polls carry
/// the stamp they were spawned under and stop with `Superseded` once the
/// flow has moved on, so a late response from an abandoned stage is never
/// applied.
#[derive(Clone, Debug, Default)]
pub struct FlowGeneration(Arc<AtomicU64>);

impl FlowGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stamp(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }

    pub fn advance(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_current(&self, stamp: u64) -> bool {
        self.stamp() == stamp
    }
}

/// Terminal result of a flow run
#[derive(Debug, Clone)]
pub enum FlowOutcome {
    /// Payment settled and collateral verified
    Completed(FlowReport),
    /// The payment needs further user interaction; the flow stops here and
    /// the session stays resumable via the intent id.
    AwaitingUser {
        intent_id: String,
        status: PaymentIntentStatus,
        message: String,
    },
}

#[derive(Debug, Clone)]
pub struct FlowReport {
    pub intent_id: String,
    pub verification: CollateralVerification,
    pub collateral: CollateralDetails,
}

/// Drives one borrow flow end to end.
pub struct BorrowFlow {
    id: Uuid,
    payment: PaymentService,
    verification: VerificationService,
    default_wallet: String,
    generation: FlowGeneration,
}

impl BorrowFlow {
    pub fn new(backend: Arc<dyn LendingBackend>, config: &Config) -> Self {
        Self {
            id: Uuid::new_v4(),
            payment: PaymentService::new(backend.clone(), config),
            verification: VerificationService::new(backend, config),
            default_wallet: config.default_wallet.clone(),
            generation: FlowGeneration::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn payment(&self) -> &PaymentService {
        &self.payment
    }

    pub fn verification(&self) -> &VerificationService {
        &self.verification
    }

    pub fn generation(&self) -> &FlowGeneration {
        &self.generation
    }

    /// Run the flow: validate the amount, create and settle the payment,
    /// then verify collateral. Payment is always settled before verification
    /// starts; a superseding run invalidates this one's results.
    pub async fn run(
        &self,
        amount_input: &str,
        wallet: Option<&str>,
        payment_method_id: &str,
        provider: &dyn PaymentProvider,
    ) -> ClientResult<FlowOutcome> {
        // Amount intake: local only, no network on failure.
        let amount = parse_borrow_amount(amount_input)?;
        let wallet = wallet.unwrap_or(&self.default_wallet).to_string();

        let stamp = self.generation.advance();
        tracing::info!(flow_id = %self.id, %amount, wallet = %wallet, "Starting borrow flow");

        let session = self
            .payment
            .initialize(amount, &wallet, payment_method_id)
            .await?;
        let outcome = self.payment.confirm(&session, provider).await?;
        if !self.generation.is_current(stamp) {
            return Err(ClientError::Superseded);
        }

        let intent_id = match outcome {
            PaymentOutcome::Succeeded { intent_id } => intent_id,
            PaymentOutcome::AwaitingUser { status, message } => {
                return Ok(FlowOutcome::AwaitingUser {
                    intent_id: session.intent_id,
                    status,
                    message,
                });
            }
        };

        let stamp = self.generation.advance();
        tracing::info!(flow_id = %self.id, intent_id = %intent_id, "Payment settled, verifying collateral");

        let amount_major = amount
            .to_f64()
            .ok_or_else(|| ClientError::InvalidAmount("Amount is out of range".to_string()))?;
        let report = self
            .verification
            .run(&intent_id, &wallet, amount_major)
            .await?;
        if !self.generation.is_current(stamp) {
            return Err(ClientError::Superseded);
        }

        self.generation.advance();
        tracing::info!(flow_id = %self.id, intent_id = %intent_id, "Borrow flow complete");

        Ok(FlowOutcome::Completed(FlowReport {
            intent_id,
            verification: report.verification,
            collateral: report.collateral,
        }))
    }

    /// Watch a payment intent in the background while another stage (e.g. a
    /// pending verification) is on screen. The poll stops on its own when
    /// this flow moves to a different stage.
    pub fn watch_payment(&self, intent_id: &str) -> StatusPoll {
        let generation = self.generation.clone();
        let stamp = generation.stamp();
        self.payment
            .spawn_status_poll_guarded(intent_id.to_string(), move || generation.is_current(stamp))
    }
}
