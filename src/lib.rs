//! # VIX Index - 30-day implied volatility for any optionable underlying
//!
//! Computes a CBOE-style volatility index for a single underlying from its
//! listed option chain, and weighted composites (e.g. sector indices) across
//! baskets of underlyings.
//!
//! ## Pipeline
//!
//! For each underlying:
//! - **Expiry selection**: near term (latest ≤ 30 days) and next term (earliest > 30 days)
//! - **Time to maturity**: minute counts to a 17:30 settlement
//! - **Risk-free rate**: natural cubic spline over CMT treasury yields
//! - **Forward level**: put-call parity at the strike of minimal call − put
//! - **Strike ladder**: K0, zero-bid wing truncation, put/call combination
//! - **Variance**: generalized variance integral per tenor
//! - **Blend**: interpolation of both tenors to a constant 30 days
//!
//! Composites average the single-name values by weight over the names that
//! succeeded; failed names are reported alongside the result.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use vix_index::prelude::*;
//!
//! let engine = VixEngine::new(YahooClient::new()?, FredClient::from_env_or(None)?);
//!
//! let single = engine.compute_single_name_vix("AAPL")?;
//! println!("AAPL VIX: {:.2}", single.value);
//!
//! let basket = WeightedTicker::equal(&["AAPL", "MSFT", "NVDA"]);
//! let composite = engine.compute_composite_vix("Tech", &basket)?;
//! println!("Tech VIX: {:.2} ({} failed)", composite.value, composite.failures.len());
//! # Ok::<(), vix_index::VixError>(())
//! ```
//!
//! ## What This Does NOT Do
//!
//! - Stream or update the index intraday
//! - Reconstruct historical index values
//! - Handle exchange calendars other than a fixed 17:30 settlement
//! - Validate quotes against a pricing model

pub mod config;
pub mod core;
pub mod data;
pub mod index;

/// Prelude with commonly used types
pub mod prelude {
    pub use crate::config::{CompositeConfig, VixConfig};

    pub use crate::core::{
        LadderEntry, LadderSource, OptionChainSnapshot, OptionQuote, OptionType, Tenor,
        TickerFailure, VixError, VixResult, WeightedTicker, YieldCurvePoint,
    };

    pub use crate::data::{
        FredClient, MarketSnapshot, OptionsProvider, YahooClient, YieldCurveProvider,
    };

    pub use crate::index::{CompositeVix, Constituent, SingleNameVix, VixEngine, YieldCurve};
}

// Re-export main types at crate root
pub use crate::core::{VixError, VixResult};
pub use crate::index::VixEngine;
