pub use crate::api::model::{
    CollateralAsset, CollateralDetails, CollateralVerification, VerificationDetails,
    VerificationRequest, VerificationStatus,
};

/// Everything known after a verification run: the terminal verification
/// record plus the collateral snapshot fetched when the run started.
#[derive(Debug, Clone)]
pub struct VerificationReport {
    pub verification: CollateralVerification,
    pub collateral: CollateralDetails,
}
