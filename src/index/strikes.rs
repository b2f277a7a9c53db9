//! Strike chain processing
//!
//! 1. K0: largest two-sided strike strictly below the forward
//! 2. Wing truncation: scanning outward from K0, the second of two consecutive
//!    zero bids and everything beyond it is dropped; an isolated zero bid stays
//! 3. Combination: OTM puts below K0, OTM calls above K0, and the put/call
//!    average at K0 when both sides survived

use crate::core::{
    LadderEntry, LadderSource, OptionChainSnapshot, OptionQuote, VixError, VixResult,
};

/// Largest strike with both a call and a put quote that is strictly below `forward`
pub fn select_atm_strike(chain: &OptionChainSnapshot, forward: f64) -> VixResult<f64> {
    chain
        .common_strikes()
        .into_iter()
        .filter(|&k| k < forward)
        .max_by(|a, b| a.total_cmp(b))
        .ok_or(VixError::NoStrikeBelowForward {
            expiry: chain.expiry,
            forward,
        })
}

/// Drop quotes from the second consecutive zero bid onward.
///
/// `quotes` must already be ordered outward from K0.
pub fn truncate_wing<'a, I>(quotes: I) -> Vec<OptionQuote>
where
    I: IntoIterator<Item = &'a OptionQuote>,
{
    #[derive(Default)]
    struct Scan {
        kept: Vec<OptionQuote>,
        previous_zero: bool,
        truncating: bool,
    }

    let scan = quotes.into_iter().fold(Scan::default(), |mut scan, quote| {
        if scan.truncating {
            return scan;
        }
        let zero = quote.has_zero_bid();
        if zero && scan.previous_zero {
            scan.truncating = true;
        } else {
            scan.kept.push(quote.clone());
            scan.previous_zero = zero;
        }
        scan
    });

    scan.kept
}

/// Calls at or above K0, ascending, truncated outward
pub fn truncate_calls(chain: &OptionChainSnapshot, atm_strike: f64) -> Vec<OptionQuote> {
    truncate_wing(chain.calls.iter().filter(|q| q.strike >= atm_strike))
}

/// Puts at or below K0, scanned downward; returned ascending
pub fn truncate_puts(chain: &OptionChainSnapshot, atm_strike: f64) -> Vec<OptionQuote> {
    let mut puts = truncate_wing(chain.puts.iter().rev().filter(|q| q.strike <= atm_strike));
    puts.reverse();
    puts
}

/// Merge truncated wings into one ladder ascending by strike
pub fn combine_wings(
    calls: &[OptionQuote],
    puts: &[OptionQuote],
    atm_strike: f64,
) -> Vec<LadderEntry> {
    let call_atm = calls.iter().find(|q| q.strike == atm_strike);
    let put_atm = puts.iter().find(|q| q.strike == atm_strike);
    let average_row = call_atm.zip(put_atm).map(|(c, p)| {
        let midpoint = c.midpoint().zip(p.midpoint()).map(|(cm, pm)| (cm + pm) / 2.0);
        LadderEntry::new(atm_strike, midpoint, LadderSource::Average)
    });
    let keep_atm_rows = average_row.is_none();

    let mut ladder: Vec<LadderEntry> = puts
        .iter()
        .filter(|q| q.strike < atm_strike || (keep_atm_rows && q.strike == atm_strike))
        .map(|q| LadderEntry::new(q.strike, q.midpoint(), LadderSource::Put))
        .chain(
            calls
                .iter()
                .filter(|q| q.strike > atm_strike || (keep_atm_rows && q.strike == atm_strike))
                .map(|q| LadderEntry::new(q.strike, q.midpoint(), LadderSource::Call)),
        )
        .chain(average_row)
        .collect();

    ladder.sort_by(|a, b| a.strike.total_cmp(&b.strike));
    ladder
}

/// K0 selection, truncation and combination for one expiry
pub fn build_ladder(chain: &OptionChainSnapshot, forward: f64) -> VixResult<(f64, Vec<LadderEntry>)> {
    let atm_strike = select_atm_strike(chain, forward)?;
    let calls = truncate_calls(chain, atm_strike);
    let puts = truncate_puts(chain, atm_strike);
    Ok((atm_strike, combine_wings(&calls, &puts, atm_strike)))
}
