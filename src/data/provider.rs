//! Market data provider interfaces
//!
//! The engine only ever talks to these traits. Transport, auth and caching
//! belong to the implementations.

use chrono::NaiveDate;

use crate::core::{OptionChainSnapshot, VixResult, YieldCurvePoint};

/// Listed options for an underlying
pub trait OptionsProvider: Send + Sync {
    /// Listed expiry dates; `DataUnavailable` for an unknown ticker
    fn available_expiries(&self, ticker: &str) -> VixResult<Vec<NaiveDate>>;

    /// Call/put snapshot for one expiry
    fn option_chain(&self, ticker: &str, expiry: NaiveDate) -> VixResult<OptionChainSnapshot>;

    /// Last spot price, for diagnostics only
    fn spot_price(&self, ticker: &str) -> VixResult<f64>;
}

/// Constant-maturity treasury support points
pub trait YieldCurveProvider: Send + Sync {
    fn yield_curve_points(&self) -> VixResult<Vec<YieldCurvePoint>>;
}

impl<T: OptionsProvider + ?Sized> OptionsProvider for &T {
    fn available_expiries(&self, ticker: &str) -> VixResult<Vec<NaiveDate>> {
        (**self).available_expiries(ticker)
    }

    fn option_chain(&self, ticker: &str, expiry: NaiveDate) -> VixResult<OptionChainSnapshot> {
        (**self).option_chain(ticker, expiry)
    }

    fn spot_price(&self, ticker: &str) -> VixResult<f64> {
        (**self).spot_price(ticker)
    }
}

impl<T: YieldCurveProvider + ?Sized> YieldCurveProvider for &T {
    fn yield_curve_points(&self) -> VixResult<Vec<YieldCurvePoint>> {
        (**self).yield_curve_points()
    }
}
