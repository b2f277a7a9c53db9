//! Generalized variance over a strike ladder
//!
//! σ² = (2/T) Σ (ΔK_i / K_i²) e^(RT) Q(K_i) − (1/T) (F/K0 − 1)²

use chrono::NaiveDate;

use crate::core::{LadderEntry, VixError, VixResult};

/// Inputs to the variance integral other than the ladder
#[derive(Debug, Clone, Copy)]
pub struct VarianceInputs {
    pub time: f64,
    pub rate: f64,
    pub atm_strike: f64,
    pub forward: f64,
}

/// Strike interval for row `i`: one-sided at the ends, centred inside
fn strike_interval(ladder: &[LadderEntry], i: usize) -> f64 {
    let last = ladder.len() - 1;
    if i == 0 {
        ladder[1].strike - ladder[0].strike
    } else if i == last {
        ladder[last].strike - ladder[last - 1].strike
    } else {
        (ladder[i + 1].strike - ladder[i - 1].strike) / 2.0
    }
}

/// Per-row contributions; `None` where the midpoint is undefined
pub fn contributions(ladder: &[LadderEntry], time: f64, rate: f64) -> Vec<Option<f64>> {
    let growth = (rate * time).exp();
    (0..ladder.len())
        .map(|i| {
            let entry = &ladder[i];
            entry
                .midpoint
                .map(|q| strike_interval(ladder, i) / entry.strike.powi(2) * growth * q)
                .filter(|c| c.is_finite())
        })
        .collect()
}

/// Variance for one tenor. Rows without a finite contribution are left out of
/// the sum; they still set the strike spacing of their neighbours.
pub fn tenor_variance(
    expiry: NaiveDate,
    ladder: &[LadderEntry],
    inputs: VarianceInputs,
) -> VixResult<f64> {
    if ladder.len() < 2 {
        return Err(VixError::InsufficientStrikes {
            expiry,
            count: ladder.len(),
        });
    }

    let VarianceInputs {
        time,
        rate,
        atm_strike,
        forward,
    } = inputs;

    let total: f64 = contributions(ladder, time, rate).into_iter().flatten().sum();
    let forward_term = (forward / atm_strike - 1.0).powi(2);

    Ok((2.0 / time) * total - (1.0 / time) * forward_term)
}
