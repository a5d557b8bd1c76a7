//! VUSD Console Library
//!
//! Client-side orchestration for the VUSD lending backend: amount intake,
//! payment-intent lifecycle (create, confirm, capture, poll), collateral
//! verification, and the admin console's opaque pass-through endpoints.

pub mod admin;
pub mod api;
pub mod config;
pub mod error;
pub mod flow;
pub mod payment;
pub mod verification;
