//! Collateral verification stage of the borrow flow

pub mod model;
pub mod service;

pub use model::VerificationReport;
pub use service::VerificationService;
