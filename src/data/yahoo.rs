//! Yahoo Finance data fetcher
//!
//! Listed expiries, per-expiry option chains and spot prices from Yahoo
//! Finance's unofficial API.
//!
//! Note: This is for educational/research purposes. Yahoo Finance
//! data is delayed ~15 minutes and intended for personal use.

use chrono::{DateTime, NaiveDate};
use serde::Deserialize;

use super::provider::OptionsProvider;
use crate::core::{OptionChainSnapshot, OptionQuote, OptionType, VixError, VixResult};

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com/v7/finance";

/// Yahoo Finance API client
pub struct YahooClient {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl YahooClient {
    pub fn new() -> VixResult<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> VixResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .map_err(|e| VixError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn options_response(&self, url: &str) -> VixResult<YahooOptionChainData> {
        let response: YahooOptionsResponse = self
            .client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| VixError::data(format!("Options request failed: {}", e)))?
            .json()
            .map_err(|e| VixError::data(format!("Failed to parse options: {}", e)))?;

        response
            .option_chain
            .result
            .into_iter()
            .next()
            .ok_or_else(|| VixError::data("No options data returned"))
    }

    /// Get current quote for a symbol
    pub fn get_quote(&self, symbol: &str) -> VixResult<f64> {
        let url = format!("{}/quote?symbols={}", self.base_url, symbol);

        let response: YahooQuoteResponse = self
            .client
            .get(&url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| VixError::data(format!("Quote request for {} failed: {}", symbol, e)))?
            .json()
            .map_err(|e| VixError::data(format!("Failed to parse quote: {}", e)))?;

        response
            .quote_response
            .result
            .into_iter()
            .next()
            .and_then(|q| q.regular_market_price)
            .ok_or_else(|| VixError::data(format!("No quote data returned for {}", symbol)))
    }

    /// Get available option expiration dates
    pub fn get_expirations(&self, symbol: &str) -> VixResult<Vec<NaiveDate>> {
        let url = format!("{}/options/{}", self.base_url, symbol);
        let chain = self.options_response(&url)?;

        let mut expiries: Vec<NaiveDate> = chain
            .expiration_dates
            .iter()
            .filter_map(|&ts| DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive()))
            .collect();
        expiries.sort();
        expiries.dedup();

        if expiries.is_empty() {
            return Err(VixError::data(format!("No listed expiries for {}", symbol)));
        }
        Ok(expiries)
    }

    /// Get option chain for a specific expiration
    pub fn get_option_chain(&self, symbol: &str, expiry: NaiveDate) -> VixResult<OptionChainSnapshot> {
        // Yahoo keys expiries by midnight UTC of the expiry date
        let expiry_ts = expiry.and_time(chrono::NaiveTime::MIN).and_utc().timestamp();
        let url = format!("{}/options/{}?date={}", self.base_url, symbol, expiry_ts);
        let chain_data = self.options_response(&url)?;

        let options = chain_data
            .options
            .into_iter()
            .next()
            .ok_or_else(|| VixError::data(format!("No {} chain for {}", symbol, expiry)))?;

        let quotes = options
            .calls
            .iter()
            .filter_map(|c| convert_option_quote(c, OptionType::Call))
            .chain(options.puts.iter().filter_map(|p| convert_option_quote(p, OptionType::Put)));

        Ok(OptionChainSnapshot::from_quotes(symbol, expiry, quotes))
    }
}

impl OptionsProvider for YahooClient {
    fn available_expiries(&self, ticker: &str) -> VixResult<Vec<NaiveDate>> {
        self.get_expirations(ticker)
    }

    fn option_chain(&self, ticker: &str, expiry: NaiveDate) -> VixResult<OptionChainSnapshot> {
        self.get_option_chain(ticker, expiry)
    }

    fn spot_price(&self, ticker: &str) -> VixResult<f64> {
        self.get_quote(ticker)
    }
}

/// Convert Yahoo option data to our quote format
fn convert_option_quote(data: &YahooOptionData, option_type: OptionType) -> Option<OptionQuote> {
    let strike = data.strike.filter(|k| *k > 0.0)?;

    Some(OptionQuote {
        strike,
        bid: data.bid,
        ask: data.ask,
        option_type,
    })
}

// Yahoo Finance API response structures

#[derive(Debug, Deserialize)]
struct YahooQuoteResponse {
    #[serde(rename = "quoteResponse")]
    quote_response: YahooQuoteResult,
}

#[derive(Debug, Deserialize)]
struct YahooQuoteResult {
    result: Vec<YahooQuoteData>,
}

#[derive(Debug, Deserialize)]
struct YahooQuoteData {
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct YahooOptionsResponse {
    #[serde(rename = "optionChain")]
    option_chain: YahooOptionChain,
}

#[derive(Debug, Deserialize)]
struct YahooOptionChain {
    result: Vec<YahooOptionChainData>,
}

#[derive(Debug, Deserialize)]
struct YahooOptionChainData {
    #[serde(rename = "expirationDates", default)]
    expiration_dates: Vec<i64>,
    #[serde(default)]
    options: Vec<YahooOptions>,
}

#[derive(Debug, Deserialize)]
struct YahooOptions {
    #[serde(default)]
    calls: Vec<YahooOptionData>,
    #[serde(default)]
    puts: Vec<YahooOptionData>,
}

#[derive(Debug, Deserialize)]
struct YahooOptionData {
    strike: Option<f64>,
    bid: Option<f64>,
    ask: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_options_payload() {
        let json = r#"{
            "optionChain": {
                "result": [{
                    "expirationDates": [1742515200, 1744848000],
                    "quote": {"regularMarketPrice": 571.2},
                    "options": [{
                        "calls": [
                            {"contractSymbol": "SPY250321C00570000", "strike": 570.0, "bid": 9.1, "ask": 9.3},
                            {"strike": 575.0, "bid": 6.2}
                        ],
                        "puts": [
                            {"strike": 570.0, "bid": 7.9, "ask": 8.1, "impliedVolatility": 0.18}
                        ]
                    }]
                }]
            }
        }"#;

        let response: YahooOptionsResponse = serde_json::from_str(json).unwrap();
        let data = response.option_chain.result.into_iter().next().unwrap();
        assert_eq!(data.expiration_dates.len(), 2);

        let options = &data.options[0];
        let call = convert_option_quote(&options.calls[1], OptionType::Call).unwrap();
        assert_eq!(call.strike, 575.0);
        assert!(call.midpoint().is_none());

        let put = convert_option_quote(&options.puts[0], OptionType::Put).unwrap();
        assert!((put.midpoint().unwrap() - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_missing_strike_dropped() {
        let data = YahooOptionData {
            strike: None,
            bid: Some(1.0),
            ask: Some(1.1),
        };
        assert!(convert_option_quote(&data, OptionType::Call).is_none());
    }

    #[test]
    fn test_unreachable_host_is_data_unavailable() {
        let client = YahooClient::with_base_url("http://127.0.0.1:1").unwrap();
        let expiry = NaiveDate::from_ymd_opt(2025, 3, 21).unwrap();

        assert!(matches!(client.available_expiries("SPY"), Err(VixError::DataUnavailable(_))));
        assert!(matches!(client.option_chain("SPY", expiry), Err(VixError::DataUnavailable(_))));
        assert!(matches!(client.spot_price("SPY"), Err(VixError::DataUnavailable(_))));
    }

    #[test]
    #[ignore] // Requires network
    fn test_get_expirations() {
        let client = YahooClient::new().unwrap();
        let expiries = client.get_expirations("SPY").unwrap();

        assert!(!expiries.is_empty());
        println!("SPY expiries: {:?}", expiries);
    }

    #[test]
    #[ignore] // Requires network
    fn test_get_option_chain() {
        let client = YahooClient::new().unwrap();
        let expiries = client.get_expirations("SPY").unwrap();

        if let Some(&expiry) = expiries.first() {
            let chain = client.get_option_chain("SPY", expiry).unwrap();

            println!("Chain for {}: {} calls, {} puts",
                expiry, chain.calls.len(), chain.puts.len());

            assert!(!chain.calls.is_empty());
            assert!(!chain.puts.is_empty());
        }
    }
}
