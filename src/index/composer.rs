//! Index composition
//!
//! Single name: constant-maturity interpolation of near/next-term variance to
//! 30 days, annualized and scaled to volatility points.
//!
//! Composite: weight-averaged single-name values over the constituents that
//! succeeded, with weights renormalized over that subset.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::forward::forward_level;
use super::maturity::{days_to_expiry, Maturity, N30, N365};
use super::strikes::build_ladder;
use super::variance::{tenor_variance, VarianceInputs};
use super::yield_curve::YieldCurve;
use crate::core::{OptionChainSnapshot, Tenor, TickerFailure, VixError, VixResult, WeightedTicker};

/// Run forward discovery, strike processing and the variance integral for one expiry
pub fn build_tenor(
    chain: &OptionChainSnapshot,
    now: NaiveDateTime,
    curve: &YieldCurve,
) -> VixResult<Tenor> {
    let maturity = Maturity::new(now, chain.expiry);
    let minutes = maturity.minutes();
    if minutes <= 0.0 {
        return Err(VixError::ExpiredTenor {
            expiry: chain.expiry,
            minutes,
        });
    }

    let time = maturity.years();
    let rate = curve.rate(days_to_expiry(now, chain.expiry));
    let parity = forward_level(chain, rate, time)?;
    let forward = parity.forward;
    let (atm_strike, ladder) = build_ladder(chain, forward)?;
    let variance = tenor_variance(
        chain.expiry,
        &ladder,
        VarianceInputs {
            time,
            rate,
            atm_strike,
            forward,
        },
    )?;

    tracing::debug!(
        "{} {}: T={:.6} R={:.5} K*={} C-P={:.4} F={:.4} K0={} strikes={} var={:.6}",
        chain.underlying,
        chain.expiry,
        time,
        rate,
        parity.strike,
        parity.call_mid - parity.put_mid,
        forward,
        atm_strike,
        ladder.len(),
        variance
    );

    Ok(Tenor {
        expiry: chain.expiry,
        minutes_to_settlement: minutes,
        time_to_maturity: time,
        risk_free_rate: rate,
        forward_strike: parity.strike,
        forward,
        atm_strike,
        ladder,
        variance,
    })
}

/// Near/next-term inputs to the 30-day interpolation
#[derive(Debug, Clone, Copy)]
pub struct TermVariance {
    /// Years to settlement
    pub time: f64,
    /// Tenor variance
    pub variance: f64,
    /// Minutes to settlement
    pub minutes: f64,
}

impl From<&Tenor> for TermVariance {
    fn from(tenor: &Tenor) -> Self {
        Self {
            time: tenor.time_to_maturity,
            variance: tenor.variance,
            minutes: tenor.minutes_to_settlement,
        }
    }
}

/// VIX = 100 · sqrt{[T1·σ1²·(N2−N30)/(N2−N1) + T2·σ2²·(N30−N1)/(N2−N1)] · N365/N30}
pub fn interpolate_30_day(near: TermVariance, next: TermVariance) -> VixResult<f64> {
    let span = next.minutes - near.minutes;
    if span == 0.0 {
        return Err(VixError::DegenerateTenors);
    }

    let near_weight = (next.minutes - N30) / span;
    let next_weight = (N30 - near.minutes) / span;
    let blended = (near.time * near.variance * near_weight + next.time * next.variance * next_weight)
        * (N365 / N30);

    if blended < 0.0 || !blended.is_finite() {
        return Err(VixError::NegativeVariance(blended));
    }

    Ok(100.0 * blended.sqrt())
}

/// Single-name index from the two processed tenors
pub fn blend_single_name(near: &Tenor, next: &Tenor) -> VixResult<f64> {
    interpolate_30_day(near.into(), next.into())
}

/// Single-name result with the tenors it came from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SingleNameVix {
    pub ticker: String,
    pub value: f64,
    /// Diagnostic only
    pub spot: Option<f64>,
    pub near: Tenor,
    pub next: Tenor,
}

impl SingleNameVix {
    pub fn expiries(&self) -> (NaiveDate, NaiveDate) {
        (self.near.expiry, self.next.expiry)
    }
}

/// A constituent that made it into the composite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constituent {
    pub ticker: String,
    pub weight: f64,
    pub value: f64,
}

/// Composite index with per-ticker failures
#[derive(Debug)]
pub struct CompositeVix {
    pub label: String,
    pub value: f64,
    pub constituents: Vec<Constituent>,
    pub failures: Vec<TickerFailure>,
}

impl CompositeVix {
    /// Sum of the weights that were actually used
    pub fn effective_weight(&self) -> f64 {
        self.constituents.iter().map(|c| c.weight).sum()
    }
}

/// Σ(value·weight) / Σ(weight) over the successful entries only
pub fn blend_composite(
    label: &str,
    results: impl IntoIterator<Item = (WeightedTicker, VixResult<f64>)>,
) -> VixResult<CompositeVix> {
    let mut constituents = Vec::new();
    let mut failures = Vec::new();

    for (entry, result) in results {
        match result {
            Ok(value) => constituents.push(Constituent {
                ticker: entry.ticker,
                weight: entry.weight,
                value,
            }),
            Err(error) => {
                tracing::warn!("{}: skipping {} ({})", label, entry.ticker, error);
                failures.push(TickerFailure {
                    ticker: entry.ticker,
                    error,
                });
            }
        }
    }

    let total_weight: f64 = constituents.iter().map(|c| c.weight).sum();
    if constituents.is_empty() || total_weight <= 0.0 {
        return Err(VixError::AllTickersFailed {
            label: label.to_string(),
            failures,
        });
    }

    let value = constituents
        .iter()
        .map(|c| c.value * (c.weight / total_weight))
        .sum();

    tracing::info!(
        "{}: composite {:.4} from {} tickers ({} failed)",
        label,
        value,
        constituents.len(),
        failures.len()
    );

    Ok(CompositeVix {
        label: label.to_string(),
        value,
        constituents,
        failures,
    })
}
