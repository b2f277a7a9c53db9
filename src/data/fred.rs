//! FRED treasury yield fetcher
//!
//! Latest constant-maturity treasury yields (DGS1MO ... DGS5) from the St. Louis
//! Fed API. FRED publishes percent; points are returned as decimals.

use serde::Deserialize;

use super::provider::YieldCurveProvider;
use crate::core::{VixError, VixResult, YieldCurvePoint, CMT_MATURITY_DAYS};

const DEFAULT_BASE_URL: &str = "https://api.stlouisfed.org/fred";

/// Environment variable consulted when no key is configured
pub const FRED_API_KEY_ENV: &str = "FRED_API_KEY";

/// CMT series, in the same order as `CMT_MATURITY_DAYS`
pub const CMT_SERIES: [&str; 7] = ["DGS1MO", "DGS3MO", "DGS6MO", "DGS1", "DGS2", "DGS3", "DGS5"];

/// FRED API client
pub struct FredClient {
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
}

impl FredClient {
    pub fn new(api_key: impl Into<String>) -> VixResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(VixError::config("FRED API key is empty"));
        }

        let client = reqwest::blocking::Client::builder()
            .build()
            .map_err(|e| VixError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
        })
    }

    /// Key from `FRED_API_KEY`, falling back to `configured`
    pub fn from_env_or(configured: Option<&str>) -> VixResult<Self> {
        match std::env::var(FRED_API_KEY_ENV).ok().filter(|k| !k.trim().is_empty()) {
            Some(key) => Self::new(key),
            None => match configured {
                Some(key) => Self::new(key),
                None => Err(VixError::config(format!(
                    "no FRED API key: set {} or [fred] api_key",
                    FRED_API_KEY_ENV
                ))),
            },
        }
    }

    /// Most recent published value of a series, in percent
    pub fn latest_value(&self, series_id: &str) -> VixResult<f64> {
        let url = format!(
            "{}/series/observations?series_id={}&api_key={}&file_type=json&sort_order=desc&limit=10",
            self.base_url, series_id, self.api_key
        );

        let response: FredObservations = self
            .client
            .get(&url)
            .send()
            .and_then(|r| r.error_for_status())
            // The URL carries the API key
            .map_err(|e| VixError::data(format!("{} request failed: {}", series_id, e.without_url())))?
            .json()
            .map_err(|e| VixError::data(format!("Failed to parse {}: {}", series_id, e.without_url())))?;

        latest_observation(&response)
            .ok_or_else(|| VixError::data(format!("No recent observation for {}", series_id)))
    }
}

impl YieldCurveProvider for FredClient {
    fn yield_curve_points(&self) -> VixResult<Vec<YieldCurvePoint>> {
        CMT_SERIES
            .iter()
            .zip(CMT_MATURITY_DAYS.iter())
            .map(|(series, &days)| {
                let percent = self.latest_value(series)?;
                tracing::debug!("{} = {:.3}%", series, percent);
                Ok(YieldCurvePoint::new(days, percent / 100.0))
            })
            .collect()
    }
}

/// First parseable value; FRED marks missing days with "."
fn latest_observation(response: &FredObservations) -> Option<f64> {
    response
        .observations
        .iter()
        .find_map(|o| o.value.trim().parse::<f64>().ok())
}

#[derive(Debug, Deserialize)]
struct FredObservations {
    observations: Vec<FredObservation>,
}

#[derive(Debug, Deserialize)]
struct FredObservation {
    #[allow(dead_code)]
    date: String,
    value: String,
}
