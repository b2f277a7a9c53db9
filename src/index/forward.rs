//! Forward level from put-call parity

use crate::core::{OptionChainSnapshot, VixError, VixResult};

/// Strike used for the forward and the midpoints observed there
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForwardLevel {
    pub forward: f64,
    pub strike: f64,
    pub call_mid: f64,
    pub put_mid: f64,
}

/// F = K* + e^(R·T) · (C(K*) − P(K*)), where K* minimizes the signed C − P
/// over strikes with both midpoints defined. Ties go to the lowest strike.
pub fn forward_level(chain: &OptionChainSnapshot, rate: f64, time: f64) -> VixResult<ForwardLevel> {
    let mut best: Option<(f64, f64, f64)> = None;

    for call in &chain.calls {
        let Some(call_mid) = call.midpoint() else { continue };
        let Some(put_mid) = chain.put_at(call.strike).and_then(|p| p.midpoint()) else {
            continue;
        };

        let diff = call_mid - put_mid;
        match best {
            Some((_, c, p)) if c - p <= diff => {}
            _ => best = Some((call.strike, call_mid, put_mid)),
        }
    }

    let (strike, call_mid, put_mid) = best.ok_or(VixError::NoOverlappingStrikes {
        expiry: chain.expiry,
    })?;

    Ok(ForwardLevel {
        forward: strike + (rate * time).exp() * (call_mid - put_mid),
        strike,
        call_mid,
        put_mid,
    })
}
