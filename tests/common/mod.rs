//! Shared test fixtures: a scriptable in-memory lending backend and a
//! scriptable payment provider.
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use vusd_console::api::{
    CancelResponse, CaptureResponse, CollateralAsset, CollateralDetails, CollateralVerification,
    CreatePaymentIntentRequest, LendingBackend, PaymentIntentCreated, PaymentIntentStatus,
    PaymentMetadata, PaymentStatus, VerificationDetails, VerificationRequest, VerificationStatus,
};
use vusd_console::error::{ClientError, ClientResult};
use vusd_console::payment::{PaymentProvider, PaymentSession};

fn not_scripted(what: &str) -> ClientError {
    ClientError::Api {
        status: 404,
        message: format!("{} not scripted", what),
    }
}

/// Build an intent snapshot with the given status.
pub fn intent(id: &str, status: PaymentIntentStatus) -> PaymentStatus {
    PaymentStatus {
        id: id.to_string(),
        amount: 15_000,
        currency: "usd".to_string(),
        status,
        metadata: PaymentMetadata {
            algo_address: "TESTADDR".to_string(),
            kind: "borrow".to_string(),
        },
        amount_capturable: 0,
        payment_method: Some("pm_test".to_string()),
    }
}

/// Build a verification record with the given status.
pub fn verification(id: &str, status: VerificationStatus) -> CollateralVerification {
    CollateralVerification {
        status,
        collateral_amount: 300.0,
        verification_id: id.to_string(),
        timestamp: chrono::Utc::now(),
        details: VerificationDetails {
            asset_type: "ALGO".to_string(),
            asset_value: 300.0,
            risk_score: 12.5,
            verification_method: "on-chain".to_string(),
        },
    }
}

pub fn collateral() -> CollateralDetails {
    CollateralDetails {
        total_collateral: 500.0,
        available_collateral: 350.0,
        locked_collateral: 150.0,
        assets: vec![CollateralAsset {
            kind: "ALGO".to_string(),
            amount: 1000.0,
            value: 500.0,
        }],
    }
}

/// Scriptable in-memory backend.
///
/// Each endpoint pops from its script queue; an empty queue yields a 404-ish
/// error, except `payment_status`, which falls back to echoing the last
/// create request as a `succeeded` intent (the round-trip behavior of the
/// real backend).
#[derive(Default)]
pub struct FakeBackend {
    pub create_script: Mutex<VecDeque<ClientResult<PaymentIntentCreated>>>,
    pub status_script: Mutex<VecDeque<ClientResult<PaymentStatus>>>,
    pub capture_script: Mutex<VecDeque<ClientResult<CaptureResponse>>>,
    pub cancel_script: Mutex<VecDeque<ClientResult<CancelResponse>>>,
    pub verify_start_script: Mutex<VecDeque<ClientResult<CollateralVerification>>>,
    pub verify_status_script: Mutex<VecDeque<ClientResult<CollateralVerification>>>,
    pub collateral_script: Mutex<VecDeque<ClientResult<CollateralDetails>>>,

    pub last_create: Mutex<Option<CreatePaymentIntentRequest>>,
    pub last_verify: Mutex<Option<VerificationRequest>>,

    pub create_calls: AtomicUsize,
    pub status_calls: AtomicUsize,
    pub capture_calls: AtomicUsize,
    pub cancel_calls: AtomicUsize,
    pub verify_start_calls: AtomicUsize,
    pub verify_status_calls: AtomicUsize,
    pub collateral_calls: AtomicUsize,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a default intent creation (`pi_test_1`).
    pub fn with_created_intent(self) -> Self {
        self.create_script
            .lock()
            .unwrap()
            .push_back(Ok(PaymentIntentCreated {
                client_secret: "secret_test".to_string(),
                payment_intent_id: "pi_test_1".to_string(),
                status: PaymentIntentStatus::RequiresConfirmation,
            }));
        self
    }

    pub fn script_status(&self, result: ClientResult<PaymentStatus>) {
        self.status_script.lock().unwrap().push_back(result);
    }

    pub fn script_capture(&self, result: ClientResult<CaptureResponse>) {
        self.capture_script.lock().unwrap().push_back(result);
    }

    pub fn script_cancel(&self, result: ClientResult<CancelResponse>) {
        self.cancel_script.lock().unwrap().push_back(result);
    }

    pub fn script_verify_start(&self, result: ClientResult<CollateralVerification>) {
        self.verify_start_script.lock().unwrap().push_back(result);
    }

    pub fn script_verify_status(&self, result: ClientResult<CollateralVerification>) {
        self.verify_status_script.lock().unwrap().push_back(result);
    }

    pub fn script_collateral(&self, result: ClientResult<CollateralDetails>) {
        self.collateral_script.lock().unwrap().push_back(result);
    }

    pub fn status_call_count(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn verify_status_call_count(&self) -> usize {
        self.verify_status_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LendingBackend for FakeBackend {
    async fn create_payment_intent(
        &self,
        request: &CreatePaymentIntentRequest,
    ) -> ClientResult<PaymentIntentCreated> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_create.lock().unwrap() = Some(request.clone());
        self.create_script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(not_scripted("create_payment_intent")))
    }

    async fn payment_status(&self, intent_id: &str) -> ClientResult<PaymentStatus> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(result) = self.status_script.lock().unwrap().pop_front() {
            return result;
        }
        // Echo the last create request, as the real backend does.
        match self.last_create.lock().unwrap().as_ref() {
            Some(request) => Ok(PaymentStatus {
                id: intent_id.to_string(),
                amount: request.amount,
                currency: request.currency.clone(),
                status: PaymentIntentStatus::Succeeded,
                metadata: PaymentMetadata {
                    algo_address: request.algo_address.clone(),
                    kind: "borrow".to_string(),
                },
                amount_capturable: 0,
                payment_method: Some("pm_test".to_string()),
            }),
            None => Err(not_scripted("payment_status")),
        }
    }

    async fn capture_payment(&self, _intent_id: &str) -> ClientResult<CaptureResponse> {
        self.capture_calls.fetch_add(1, Ordering::SeqCst);
        self.capture_script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Ok(CaptureResponse {
                    success: true,
                    error: None,
                    payment_intent: None,
                })
            })
    }

    async fn cancel_payment(&self, intent_id: &str) -> ClientResult<CancelResponse> {
        self.cancel_calls.fetch_add(1, Ordering::SeqCst);
        self.cancel_script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Ok(CancelResponse {
                    id: intent_id.to_string(),
                    status: PaymentIntentStatus::Canceled,
                })
            })
    }

    async fn start_verification(
        &self,
        request: &VerificationRequest,
    ) -> ClientResult<CollateralVerification> {
        self.verify_start_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_verify.lock().unwrap() = Some(request.clone());
        self.verify_start_script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(not_scripted("start_verification")))
    }

    async fn verification_status(
        &self,
        _verification_id: &str,
    ) -> ClientResult<CollateralVerification> {
        self.verify_status_calls.fetch_add(1, Ordering::SeqCst);
        self.verify_status_script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(not_scripted("verification_status")))
    }

    async fn collateral_details(&self, _address: &str) -> ClientResult<CollateralDetails> {
        self.collateral_calls.fetch_add(1, Ordering::SeqCst);
        self.collateral_script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(collateral()))
    }
}

/// Provider that hands back a scripted confirmation snapshot.
pub struct FakeProvider {
    result: Mutex<Option<ClientResult<PaymentStatus>>>,
    pub confirm_calls: AtomicUsize,
}

impl FakeProvider {
    pub fn returning(result: ClientResult<PaymentStatus>) -> Self {
        Self {
            result: Mutex::new(Some(result)),
            confirm_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl PaymentProvider for FakeProvider {
    async fn confirm_payment(&self, _session: &PaymentSession) -> ClientResult<PaymentStatus> {
        self.confirm_calls.fetch_add(1, Ordering::SeqCst);
        self.result
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Err(not_scripted("confirm_payment")))
    }
}
