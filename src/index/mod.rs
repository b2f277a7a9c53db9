//! Volatility index computation
//!
//! - `yield_curve`: natural cubic spline over CMT points
//! - `expiry`: near/next-term selection around 30 days
//! - `maturity`: minute-based time to settlement
//! - `forward`: forward level from put-call parity
//! - `strikes`: K0, wing truncation, ladder combination
//! - `variance`: per-tenor variance integral
//! - `composer`: 30-day blend and weighted composite
//! - `engine`: provider-driven single-name and composite runs

pub mod composer;
pub mod engine;
pub mod expiry;
pub mod forward;
pub mod maturity;
pub mod strikes;
pub mod variance;
pub mod yield_curve;

pub use composer::{
    blend_composite, blend_single_name, build_tenor, interpolate_30_day, CompositeVix,
    Constituent, SingleNameVix, TermVariance,
};
pub use engine::VixEngine;
pub use expiry::{select_expiries, ExpiryPair, HORIZON_DAYS};
pub use forward::{forward_level, ForwardLevel};
pub use maturity::{Maturity, N30, N365, SETTLEMENT_MINUTES};
pub use strikes::{build_ladder, combine_wings, select_atm_strike, truncate_calls, truncate_puts};
pub use variance::{tenor_variance, VarianceInputs};
pub use yield_curve::{NaturalCubicSpline, YieldCurve};
