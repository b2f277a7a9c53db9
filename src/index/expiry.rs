//! Near/next-term expiry selection around the 30-day horizon

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::core::{VixError, VixResult};

/// Calendar days to the constant-maturity horizon
pub const HORIZON_DAYS: i64 = 30;

/// The two expiries bracketing the horizon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryPair {
    pub near: NaiveDate,
    pub next: NaiveDate,
}

/// Pick the latest expiry at or before `now + 30 days` and the earliest one after it.
///
/// Expiries are compared at midnight of their date. Input order and repeated
/// dates do not affect the result.
pub fn select_expiries(expiries: &[NaiveDate], now: NaiveDateTime) -> VixResult<ExpiryPair> {
    let horizon = now + Duration::days(HORIZON_DAYS);
    let at_midnight = |d: &NaiveDate| d.and_time(chrono::NaiveTime::MIN);

    let near = expiries
        .iter()
        .filter(|d| at_midnight(d) <= horizon)
        .max()
        .copied();
    let next = expiries
        .iter()
        .filter(|d| at_midnight(d) > horizon)
        .min()
        .copied();

    match (near, next) {
        (Some(near), Some(next)) => Ok(ExpiryPair { near, next }),
        (None, _) => Err(VixError::insufficient_expiries(format!(
            "no expiry on or before {} (near-term)",
            horizon
        ))),
        (_, None) => Err(VixError::insufficient_expiries(format!(
            "no expiry after {} (next-term)",
            horizon
        ))),
    }
}
