//! Weighted ticker baskets

use serde::{Deserialize, Serialize};

/// A composite constituent and its weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedTicker {
    pub ticker: String,
    pub weight: f64,
}

impl WeightedTicker {
    pub fn new(ticker: impl Into<String>, weight: f64) -> Self {
        Self {
            ticker: ticker.into(),
            weight,
        }
    }

    /// Equal-weight basket
    pub fn equal(tickers: &[&str]) -> Vec<Self> {
        tickers.iter().map(|t| Self::new(*t, 1.0)).collect()
    }

    pub fn is_valid(&self) -> bool {
        !self.ticker.trim().is_empty() && self.weight.is_finite() && self.weight > 0.0
    }
}
