//! Tenor state: one expiry's inputs to the variance integral

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Which side of the chain a ladder row came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LadderSource {
    Call,
    Put,
    /// Mean of the call and put midpoints at K0
    Average,
}

/// One row of the combined strike ladder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LadderEntry {
    pub strike: f64,
    /// `None` when the underlying quote had no usable bid/ask
    pub midpoint: Option<f64>,
    pub source: LadderSource,
}

impl LadderEntry {
    pub fn new(strike: f64, midpoint: Option<f64>, source: LadderSource) -> Self {
        Self {
            strike,
            midpoint,
            source,
        }
    }
}

/// Near-term or next-term expiry, fully processed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenor {
    /// Expiry date
    pub expiry: NaiveDate,
    /// Minutes from now to settlement (N)
    pub minutes_to_settlement: f64,
    /// Time to maturity in years (T)
    pub time_to_maturity: f64,
    /// Risk-free rate, decimal (R)
    pub risk_free_rate: f64,
    /// Strike where the signed call − put midpoint difference is smallest
    pub forward_strike: f64,
    /// Forward level (F)
    pub forward: f64,
    /// At-the-money strike (K0)
    pub atm_strike: f64,
    /// Truncated, combined ladder ascending by strike
    pub ladder: Vec<LadderEntry>,
    /// Generalized variance over the ladder
    pub variance: f64,
}
