//! Core data types for the volatility index
//!
//! Defines fundamental types:
//! - OptionQuote / OptionChainSnapshot: bid/ask per strike for one expiry
//! - YieldCurvePoint: CMT support points for the discount rate
//! - Tenor / LadderEntry: per-expiry state fed to the variance integral
//! - WeightedTicker: composite constituents

pub mod basket;
pub mod error;
pub mod option;
pub mod quote;
pub mod rates;
pub mod tenor;

pub use basket::*;
pub use error::*;
pub use option::*;
pub use quote::*;
pub use rates::*;
pub use tenor::*;
