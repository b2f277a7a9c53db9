//! Recorded market data
//!
//! A JSON-serializable bundle of expiries, chains, spots and CMT points that
//! serves both provider traits. Used for offline runs and tests.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::provider::{OptionsProvider, YieldCurveProvider};
use crate::core::{OptionChainSnapshot, VixError, VixResult, YieldCurvePoint};
use crate::index::select_expiries;

/// Everything recorded for one underlying
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TickerSnapshot {
    pub spot: Option<f64>,
    /// Listed expiries at capture time
    pub expiries: Vec<NaiveDate>,
    /// Chains captured (usually only the near and next term)
    pub chains: Vec<OptionChainSnapshot>,
}

/// Market data captured at one point in time
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub taken_at: Option<DateTime<Utc>>,
    pub yield_curve: Vec<YieldCurvePoint>,
    pub tickers: BTreeMap<String, TickerSnapshot>,
}

impl MarketSnapshot {
    pub fn new(yield_curve: Vec<YieldCurvePoint>) -> Self {
        Self {
            taken_at: Some(Utc::now()),
            yield_curve,
            tickers: BTreeMap::new(),
        }
    }

    /// Add a chain; its expiry is added to the listed expiries if missing
    pub fn insert_chain(&mut self, mut chain: OptionChainSnapshot) {
        chain.normalize();
        let entry = self.tickers.entry(chain.underlying.clone()).or_default();
        if !entry.expiries.contains(&chain.expiry) {
            entry.expiries.push(chain.expiry);
            entry.expiries.sort();
        }
        entry.chains.retain(|c| c.expiry != chain.expiry);
        entry.chains.push(chain);
        entry.chains.sort_by_key(|c| c.expiry);
    }

    pub fn set_spot(&mut self, ticker: &str, spot: f64) {
        self.tickers.entry(ticker.to_string()).or_default().spot = Some(spot);
    }

    /// Capture the near/next-term chains for each ticker from live providers.
    ///
    /// Tickers that fail are logged and left out.
    pub fn record<O, Y>(options: &O, rates: &Y, tickers: &[String]) -> VixResult<Self>
    where
        O: OptionsProvider,
        Y: YieldCurveProvider,
    {
        let mut snapshot = Self::new(rates.yield_curve_points()?);
        let now = Local::now().naive_local();

        for ticker in tickers {
            match Self::record_ticker(options, ticker, now) {
                Ok(recorded) => {
                    tracing::info!("Recorded {} chains for {}", recorded.chains.len(), ticker);
                    snapshot.tickers.insert(ticker.clone(), recorded);
                }
                Err(e) => tracing::warn!("Could not record {}: {}", ticker, e),
            }
        }

        Ok(snapshot)
    }

    fn record_ticker<O: OptionsProvider>(
        options: &O,
        ticker: &str,
        now: NaiveDateTime,
    ) -> VixResult<TickerSnapshot> {
        let mut expiries = options.available_expiries(ticker)?;
        expiries.sort();
        expiries.dedup();

        let pair = select_expiries(&expiries, now)?;
        let chains = vec![
            options.option_chain(ticker, pair.near)?,
            options.option_chain(ticker, pair.next)?,
        ];

        Ok(TickerSnapshot {
            spot: options.spot_price(ticker).ok(),
            expiries,
            chains,
        })
    }

    /// Load from a JSON file
    pub fn load(path: impl AsRef<Path>) -> VixResult<Self> {
        let json = fs::read_to_string(path.as_ref())?;
        let snapshot: Self = serde_json::from_str(&json)
            .map_err(|e| VixError::Serialization(e.to_string()))?;

        tracing::info!(
            "Loaded snapshot with {} tickers from {:?}",
            snapshot.tickers.len(),
            path.as_ref()
        );
        Ok(snapshot)
    }

    /// Save as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> VixResult<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| VixError::Serialization(e.to_string()))?;
        fs::write(path.as_ref(), json)?;

        tracing::info!("Saved snapshot to {:?}", path.as_ref());
        Ok(())
    }

    fn ticker(&self, ticker: &str) -> VixResult<&TickerSnapshot> {
        self.tickers
            .get(ticker)
            .ok_or_else(|| VixError::data(format!("unknown ticker {}", ticker)))
    }
}

impl OptionsProvider for MarketSnapshot {
    fn available_expiries(&self, ticker: &str) -> VixResult<Vec<NaiveDate>> {
        Ok(self.ticker(ticker)?.expiries.clone())
    }

    fn option_chain(&self, ticker: &str, expiry: NaiveDate) -> VixResult<OptionChainSnapshot> {
        self.ticker(ticker)?
            .chains
            .iter()
            .find(|c| c.expiry == expiry)
            .cloned()
            .ok_or_else(|| VixError::data(format!("no {} chain recorded for {}", ticker, expiry)))
    }

    fn spot_price(&self, ticker: &str) -> VixResult<f64> {
        self.ticker(ticker)?
            .spot
            .ok_or_else(|| VixError::data(format!("no spot recorded for {}", ticker)))
    }
}

impl YieldCurveProvider for MarketSnapshot {
    fn yield_curve_points(&self) -> VixResult<Vec<YieldCurvePoint>> {
        if self.yield_curve.is_empty() {
            return Err(VixError::data("snapshot has no yield curve points"));
        }
        Ok(self.yield_curve.clone())
    }
}
