//! Treasury yield curve points

use serde::{Deserialize, Serialize};

/// One constant-maturity treasury observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YieldCurvePoint {
    /// Maturity in calendar days
    pub maturity_days: f64,
    /// Annualized yield as a decimal (0.05 = 5%)
    pub annualized_yield: f64,
}

impl YieldCurvePoint {
    pub fn new(maturity_days: f64, annualized_yield: f64) -> Self {
        Self {
            maturity_days,
            annualized_yield,
        }
    }
}

/// Canonical CMT maturities in days: 1M, 3M, 6M, 1Y, 2Y, 3Y, 5Y
pub const CMT_MATURITY_DAYS: [f64; 7] = [30.4167, 91.2501, 182.5, 365.0, 730.0, 1095.0, 1825.0];
