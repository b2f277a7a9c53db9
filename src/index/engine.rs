//! Provider-driven index computation
//!
//! Fetches expiries, chains and the yield curve, then runs the pipeline:
//! expiry selection → maturity → rate → forward → strike ladder → variance → blend.

use chrono::{Local, NaiveDateTime};
use rayon::prelude::*;

use super::composer::{blend_composite, blend_single_name, build_tenor, CompositeVix, SingleNameVix};
use super::expiry::select_expiries;
use super::yield_curve::YieldCurve;
use crate::core::{VixError, VixResult, WeightedTicker};
use crate::data::{OptionsProvider, YieldCurveProvider};

/// Volatility index engine over an options source and a rates source
pub struct VixEngine<O, Y> {
    options: O,
    rates: Y,
}

impl<O: OptionsProvider, Y: YieldCurveProvider> VixEngine<O, Y> {
    pub fn new(options: O, rates: Y) -> Self {
        Self { options, rates }
    }

    /// Fit the yield curve from the current CMT points
    pub fn yield_curve(&self) -> VixResult<YieldCurve> {
        let points = self.rates.yield_curve_points()?;
        YieldCurve::from_points(&points)
    }

    /// Single-name index as of the local wall clock
    pub fn compute_single_name_vix(&self, ticker: &str) -> VixResult<SingleNameVix> {
        self.compute_single_name_vix_at(ticker, Local::now().naive_local())
    }

    pub fn compute_single_name_vix_at(
        &self,
        ticker: &str,
        now: NaiveDateTime,
    ) -> VixResult<SingleNameVix> {
        let curve = self.yield_curve()?;
        self.single_name_with_curve(ticker, now, &curve)
    }

    /// Composite index as of the local wall clock
    pub fn compute_composite_vix(
        &self,
        label: &str,
        tickers: &[WeightedTicker],
    ) -> VixResult<CompositeVix> {
        self.compute_composite_vix_at(label, tickers, Local::now().naive_local())
    }

    /// Each ticker runs independently; failures are collected, not propagated
    pub fn compute_composite_vix_at(
        &self,
        label: &str,
        tickers: &[WeightedTicker],
        now: NaiveDateTime,
    ) -> VixResult<CompositeVix> {
        if tickers.is_empty() {
            return Err(VixError::invalid_input(format!(
                "composite '{}' has no tickers",
                label
            )));
        }
        if let Some(bad) = tickers.iter().find(|t| !t.is_valid()) {
            return Err(VixError::invalid_input(format!(
                "composite '{}': invalid entry {:?} (weight {})",
                label, bad.ticker, bad.weight
            )));
        }

        tracing::info!("Starting composite {} ({} tickers)", label, tickers.len());

        // One curve for the whole run, shared read-only across tickers
        let curve = match self.yield_curve() {
            Ok(curve) => curve,
            Err(e) => {
                tracing::warn!("{}: yield curve unavailable ({})", label, e);
                let reason = e.to_string();
                return blend_composite(
                    label,
                    tickers
                        .iter()
                        .map(|t| (t.clone(), Err::<f64, _>(VixError::data(reason.clone())))),
                );
            }
        };

        let results: Vec<(WeightedTicker, VixResult<f64>)> = tickers
            .par_iter()
            .map(|entry| {
                let result = self
                    .single_name_with_curve(&entry.ticker, now, &curve)
                    .map(|single| single.value);
                (entry.clone(), result)
            })
            .collect();

        blend_composite(label, results)
    }

    fn single_name_with_curve(
        &self,
        ticker: &str,
        now: NaiveDateTime,
        curve: &YieldCurve,
    ) -> VixResult<SingleNameVix> {
        tracing::info!("Calculating VIX for {}", ticker);

        let spot = match self.options.spot_price(ticker) {
            Ok(price) => {
                tracing::debug!("{} spot {:.4}", ticker, price);
                Some(price)
            }
            Err(e) => {
                tracing::debug!("{} spot unavailable: {}", ticker, e);
                None
            }
        };

        let expiries = self.options.available_expiries(ticker)?;
        let pair = select_expiries(&expiries, now)?;

        let near_chain = self.options.option_chain(ticker, pair.near)?;
        let next_chain = self.options.option_chain(ticker, pair.next)?;

        let near = build_tenor(&near_chain, now, curve)?;
        let next = build_tenor(&next_chain, now, curve)?;
        let value = blend_single_name(&near, &next)?;

        tracing::info!("VIX for {} is {:.4}", ticker, value);

        Ok(SingleNameVix {
            ticker: ticker.to_string(),
            value,
            spot,
            near,
            next,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{OptionChainSnapshot, OptionQuote, OptionType, YieldCurvePoint, CMT_MATURITY_DAYS};
    use crate::data::MarketSnapshot;
    use chrono::NaiveDate;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    fn now() -> NaiveDateTime {
        date(3, 3).and_hms_opt(10, 30, 0).unwrap()
    }

    fn curve_points() -> Vec<YieldCurvePoint> {
        let yields = [0.0432, 0.0431, 0.0425, 0.0410, 0.0399, 0.0397, 0.0402];
        CMT_MATURITY_DAYS
            .iter()
            .zip(yields.iter())
            .map(|(&d, &y)| YieldCurvePoint::new(d, y))
            .collect()
    }

    /// Smooth smile around 100 with a 0.10 wide market
    fn synthetic_chain(ticker: &str, expiry: NaiveDate, time_value: f64) -> OptionChainSnapshot {
        let quotes = (0..=16).flat_map(|i| {
            let strike = 60.0 + 5.0 * i as f64;
            let extrinsic = time_value * (-((strike - 100.0) / 15.0).powi(2)).exp();
            let call = (100.0 - strike).max(0.0) + extrinsic;
            let put = (strike - 100.0).max(0.0) + extrinsic;
            [
                OptionQuote::call(strike, (call - 0.05).max(0.0), call + 0.05),
                OptionQuote::put(strike, (put - 0.05).max(0.0), put + 0.05),
            ]
        });
        OptionChainSnapshot::from_quotes(ticker, expiry, quotes)
    }

    fn market() -> MarketSnapshot {
        let mut snapshot = MarketSnapshot::new(curve_points());
        for (ticker, scale) in [("AAA", 1.0), ("CCC", 2.0)] {
            snapshot.insert_chain(synthetic_chain(ticker, date(3, 21), 2.0 * scale));
            snapshot.insert_chain(synthetic_chain(ticker, date(3, 28), 2.5 * scale));
            snapshot.insert_chain(synthetic_chain(ticker, date(4, 11), 3.5 * scale));
            snapshot.insert_chain(synthetic_chain(ticker, date(4, 17), 3.8 * scale));
            snapshot.set_spot(ticker, 100.0);
        }
        snapshot
    }

    #[test]
    fn test_single_name_matches_manual_pipeline() {
        let data = market();
        let engine = VixEngine::new(&data, &data);

        let result = engine.compute_single_name_vix_at("AAA", now()).unwrap();
        assert_eq!(result.expiries(), (date(3, 28), date(4, 11)));
        assert_eq!(result.spot, Some(100.0));

        let curve = YieldCurve::from_points(&curve_points()).unwrap();
        let near = build_tenor(&synthetic_chain("AAA", date(3, 28), 2.5), now(), &curve).unwrap();
        let next = build_tenor(&synthetic_chain("AAA", date(4, 11), 3.5), now(), &curve).unwrap();
        let expected = blend_single_name(&near, &next).unwrap();

        assert!(result.value > 0.0);
        assert!((result.value - expected).abs() < 1e-12);
        assert!(result.near.minutes_to_settlement < 43_200.0);
        assert!(result.next.minutes_to_settlement > 43_200.0);
    }

    #[test]
    fn test_missing_spot_does_not_fail_ticker() {
        let mut data = market();
        for (expiry, time_value) in [(date(3, 28), 2.5), (date(4, 11), 3.5)] {
            data.insert_chain(synthetic_chain("NOSPOT", expiry, time_value));
        }
        let engine = VixEngine::new(&data, &data);

        let result = engine.compute_single_name_vix_at("NOSPOT", now()).unwrap();
        let reference = engine.compute_single_name_vix_at("AAA", now()).unwrap();

        assert_eq!(result.spot, None);
        assert!((result.value - reference.value).abs() < 1e-12);
        assert_eq!(result.near.forward_strike, reference.near.forward_strike);
    }

    #[test]
    fn test_richer_options_give_higher_index() {
        let data = market();
        let engine = VixEngine::new(&data, &data);

        let low = engine.compute_single_name_vix_at("AAA", now()).unwrap().value;
        let high = engine.compute_single_name_vix_at("CCC", now()).unwrap().value;
        assert!(high > low);
    }

    #[test]
    fn test_unknown_ticker() {
        let data = market();
        let engine = VixEngine::new(&data, &data);
        assert!(matches!(
            engine.compute_single_name_vix_at("ZZZ", now()),
            Err(VixError::DataUnavailable(_))
        ));
    }

    #[test]
    fn test_composite_skips_failed_ticker() {
        let data = market();
        let engine = VixEngine::new(&data, &data);

        let single = engine.compute_single_name_vix_at("AAA", now()).unwrap().value;
        let composite = engine
            .compute_composite_vix_at("Test", &WeightedTicker::equal(&["AAA", "BBB"]), now())
            .unwrap();

        assert_eq!(composite.value, single);
        assert_eq!(composite.constituents.len(), 1);
        assert_eq!(composite.failures.len(), 1);
        assert_eq!(composite.failures[0].ticker, "BBB");
        assert!(matches!(composite.failures[0].error, VixError::DataUnavailable(_)));
    }

    #[test]
    fn test_composite_weighted() {
        let data = market();
        let engine = VixEngine::new(&data, &data);

        let a = engine.compute_single_name_vix_at("AAA", now()).unwrap().value;
        let c = engine.compute_single_name_vix_at("CCC", now()).unwrap().value;
        let tickers = vec![WeightedTicker::new("AAA", 1.0), WeightedTicker::new("CCC", 3.0)];
        let composite = engine.compute_composite_vix_at("Weighted", &tickers, now()).unwrap();

        assert!((composite.value - (0.25 * a + 0.75 * c)).abs() < 1e-10);
    }

    #[test]
    fn test_composite_without_curve_fails_every_ticker() {
        let mut data = market();
        data.yield_curve.clear();
        let engine = VixEngine::new(&data, &data);

        match engine.compute_composite_vix_at("NoRates", &WeightedTicker::equal(&["AAA", "CCC"]), now()) {
            Err(VixError::AllTickersFailed { failures, .. }) => assert_eq!(failures.len(), 2),
            other => panic!("expected AllTickersFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_composite_rejects_invalid_basket() {
        let data = market();
        let engine = VixEngine::new(&data, &data);

        assert!(matches!(
            engine.compute_composite_vix_at("Empty", &[], now()),
            Err(VixError::InvalidInput(_))
        ));
        assert!(matches!(
            engine.compute_composite_vix_at("Neg", &[WeightedTicker::new("AAA", -1.0)], now()),
            Err(VixError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_insufficient_expiries() {
        let mut data = market();
        if let Some(t) = data.tickers.get_mut("AAA") {
            t.expiries.retain(|d| *d <= date(3, 28));
        }
        let engine = VixEngine::new(&data, &data);
        assert!(matches!(
            engine.compute_single_name_vix_at("AAA", now()),
            Err(VixError::InsufficientExpiries(_))
        ));
    }

    #[test]
    fn test_missing_quote_differs_from_zero_priced_quote() {
        let curve = YieldCurve::from_points(&curve_points()).unwrap();
        let wing = |gap: OptionQuote| {
            OptionChainSnapshot::from_quotes(
                "GAP",
                date(3, 28),
                vec![
                    OptionQuote::put(90.0, 0.4, 0.5),
                    OptionQuote::put(95.0, 1.0, 1.2),
                    OptionQuote::put(100.0, 2.3, 2.5),
                    OptionQuote::call(95.0, 5.9, 6.1),
                    OptionQuote::call(100.0, 2.4, 2.6),
                    OptionQuote::call(105.0, 0.0, 0.1),
                    gap,
                    OptionQuote::call(115.0, 0.3, 0.4),
                ],
            )
        };

        let missing = build_tenor(&wing(OptionQuote::unquoted(110.0, OptionType::Call)), now(), &curve).unwrap();
        let zero = build_tenor(&wing(OptionQuote::call(110.0, 0.0, 0.0)), now(), &curve).unwrap();

        // The unquoted strike is kept without a price; the zero-priced one ends the wing
        assert_eq!(missing.ladder.len(), 6);
        assert!(missing.ladder.iter().any(|e| e.strike == 110.0 && e.midpoint.is_none()));
        assert_eq!(zero.ladder.len(), 4);
        assert!(missing.variance.is_finite());
        assert!((missing.variance - zero.variance).abs() > 1e-9);
    }
}
