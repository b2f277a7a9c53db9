//! Minute-granularity time to maturity
//!
//! N = M_current_day + M_settlement_day + M_other_days, T = N / N365, where
//! - M_current_day: minutes from now to the coming midnight
//! - M_settlement_day: minutes from midnight to settlement on the expiry day
//! - M_other_days: minutes between the coming midnight and midnight of the expiry date

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// Settlement minute on expiry day (17:30)
pub const SETTLEMENT_MINUTES: f64 = 1050.0;
/// Minutes in one calendar day
pub const MINUTES_PER_DAY: f64 = 1440.0;
/// Minutes in 30 days
pub const N30: f64 = 43_200.0;
/// Minutes in a 365-day year
pub const N365: f64 = 525_600.0;

/// Time to settlement of one expiry, measured from a fixed "now"
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Maturity {
    pub current_day_minutes: f64,
    pub settlement_day_minutes: f64,
    pub other_days_minutes: f64,
}

impl Maturity {
    pub fn new(now: NaiveDateTime, expiry: NaiveDate) -> Self {
        let next_midnight = (now.date() + Duration::days(1)).and_time(NaiveTime::MIN);
        let expiry_midnight = expiry.and_time(NaiveTime::MIN);

        Self {
            current_day_minutes: minutes_between(now, next_midnight),
            settlement_day_minutes: SETTLEMENT_MINUTES,
            other_days_minutes: minutes_between(next_midnight, expiry_midnight),
        }
    }

    /// Total minutes to settlement (N)
    pub fn minutes(&self) -> f64 {
        self.current_day_minutes + self.settlement_day_minutes + self.other_days_minutes
    }

    /// Years to settlement (T)
    pub fn years(&self) -> f64 {
        self.minutes() / N365
    }
}

/// Whole days from `now` to midnight of `expiry`, floored; used to read the yield curve
pub fn days_to_expiry(now: NaiveDateTime, expiry: NaiveDate) -> f64 {
    let minutes = (expiry.and_time(NaiveTime::MIN) - now).num_minutes();
    minutes.div_euclid(MINUTES_PER_DAY as i64) as f64
}

fn minutes_between(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    (to - from).num_milliseconds() as f64 / 60_000.0
}
