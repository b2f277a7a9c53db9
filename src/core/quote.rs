//! Option quote data
//!
//! Bid/ask quotes per strike and the call/put snapshot for one expiry.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use super::option::OptionType;

/// Option market quote
///
/// A missing bid or ask means the provider had no quote on that side; the
/// midpoint is then undefined rather than zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionQuote {
    /// Strike price
    pub strike: f64,
    /// Bid price (0 means no buyer interest)
    pub bid: Option<f64>,
    /// Ask price
    pub ask: Option<f64>,
    /// Call or put
    pub option_type: OptionType,
}

impl OptionQuote {
    pub fn new(strike: f64, bid: f64, ask: f64, option_type: OptionType) -> Self {
        Self {
            strike,
            bid: Some(bid),
            ask: Some(ask),
            option_type,
        }
    }

    pub fn call(strike: f64, bid: f64, ask: f64) -> Self {
        Self::new(strike, bid, ask, OptionType::Call)
    }

    pub fn put(strike: f64, bid: f64, ask: f64) -> Self {
        Self::new(strike, bid, ask, OptionType::Put)
    }

    /// Quote with neither side populated
    pub fn unquoted(strike: f64, option_type: OptionType) -> Self {
        Self {
            strike,
            bid: None,
            ask: None,
            option_type,
        }
    }

    /// Mid price, `None` unless both sides are finite
    pub fn midpoint(&self) -> Option<f64> {
        match (self.bid, self.ask) {
            (Some(bid), Some(ask)) if bid.is_finite() && ask.is_finite() => Some((bid + ask) / 2.0),
            _ => None,
        }
    }

    /// True only for an observed bid of exactly zero
    pub fn has_zero_bid(&self) -> bool {
        self.bid == Some(0.0)
    }
}

/// Calls and puts for a single expiry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionChainSnapshot {
    /// Underlying symbol
    pub underlying: String,
    /// Expiry date
    pub expiry: NaiveDate,
    /// Call quotes, ascending by strike
    pub calls: Vec<OptionQuote>,
    /// Put quotes, ascending by strike
    pub puts: Vec<OptionQuote>,
}

impl OptionChainSnapshot {
    pub fn new(underlying: impl Into<String>, expiry: NaiveDate) -> Self {
        Self {
            underlying: underlying.into(),
            expiry,
            calls: Vec::new(),
            puts: Vec::new(),
        }
    }

    /// Build a snapshot from unordered quotes, splitting by side
    pub fn from_quotes(
        underlying: impl Into<String>,
        expiry: NaiveDate,
        quotes: impl IntoIterator<Item = OptionQuote>,
    ) -> Self {
        let mut chain = Self::new(underlying, expiry);
        for quote in quotes {
            match quote.option_type {
                OptionType::Call => chain.calls.push(quote),
                OptionType::Put => chain.puts.push(quote),
            }
        }
        chain.normalize();
        chain
    }

    /// Sort both sides ascending by strike and drop repeated strikes (first quote wins)
    pub fn normalize(&mut self) {
        normalize_side(&mut self.calls);
        normalize_side(&mut self.puts);
    }

    /// Get call quote at strike
    pub fn call_at(&self, strike: f64) -> Option<&OptionQuote> {
        self.calls.iter().find(|q| q.strike == strike)
    }

    /// Get put quote at strike
    pub fn put_at(&self, strike: f64) -> Option<&OptionQuote> {
        self.puts.iter().find(|q| q.strike == strike)
    }

    /// Strikes quoted on both sides, ascending
    pub fn common_strikes(&self) -> Vec<f64> {
        self.calls
            .iter()
            .map(|q| q.strike)
            .filter(|&k| self.put_at(k).is_some())
            .collect()
    }
}

fn normalize_side(quotes: &mut Vec<OptionQuote>) {
    quotes.retain(|q| q.strike.is_finite());
    // Stable sort keeps the first quote of each strike ahead of later duplicates
    quotes.sort_by(|a, b| a.strike.total_cmp(&b.strike));
    quotes.dedup_by(|later, earlier| later.strike == earlier.strike);
}
