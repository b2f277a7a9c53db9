//! Risk-free rate curve
//!
//! Natural cubic spline through the CMT support points. Every knot shapes the
//! whole curve (second-derivative continuity), with zero curvature imposed at
//! both ends. Outside the support the boundary cubic is extended, so queries
//! never fail but lose accuracy far from the knots.

use crate::core::{VixError, VixResult, YieldCurvePoint};

/// Natural cubic spline on strictly increasing abscissas
#[derive(Debug, Clone)]
pub struct NaturalCubicSpline {
    x: Vec<f64>,
    y: Vec<f64>,
    /// Second derivatives at the knots
    m: Vec<f64>,
}

impl NaturalCubicSpline {
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> VixResult<Self> {
        if x.len() != y.len() {
            return Err(VixError::data("spline x and y must have the same length"));
        }
        if x.len() < 2 {
            return Err(VixError::data(format!(
                "spline needs at least 2 support points, got {}",
                x.len()
            )));
        }
        if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
            return Err(VixError::data("spline support points must be finite"));
        }
        if x.windows(2).any(|w| w[1] <= w[0]) {
            return Err(VixError::data(
                "spline abscissas must be strictly increasing with no duplicates",
            ));
        }

        let m = second_derivatives(&x, &y);
        Ok(Self { x, y, m })
    }

    /// Evaluate the spline at `xq`
    pub fn value(&self, xq: f64) -> f64 {
        let i = self.segment(xq);
        let (x0, x1) = (self.x[i], self.x[i + 1]);
        let (y0, y1) = (self.y[i], self.y[i + 1]);
        let (m0, m1) = (self.m[i], self.m[i + 1]);
        let h = x1 - x0;
        let a = x1 - xq;
        let b = xq - x0;

        m0 * a.powi(3) / (6.0 * h)
            + m1 * b.powi(3) / (6.0 * h)
            + (y0 / h - m0 * h / 6.0) * a
            + (y1 / h - m1 * h / 6.0) * b
    }

    /// Segment index whose cubic covers `xq`; boundary segments extend outward
    fn segment(&self, xq: f64) -> usize {
        let last = self.x.len() - 2;
        let idx = self.x.partition_point(|v| *v <= xq);
        idx.saturating_sub(1).min(last)
    }
}

/// Solve the tridiagonal system for knot curvatures with M_0 = M_{n-1} = 0
fn second_derivatives(x: &[f64], y: &[f64]) -> Vec<f64> {
    let n = x.len();
    let mut m = vec![0.0; n];
    if n < 3 {
        return m;
    }

    let h: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();
    let interior = n - 2;

    // Thomas algorithm over the interior knots
    let mut c_prime = vec![0.0; interior];
    let mut d_prime = vec![0.0; interior];

    for k in 0..interior {
        let i = k + 1;
        let lower = h[i - 1];
        let diag = 2.0 * (h[i - 1] + h[i]);
        let upper = h[i];
        let rhs = 6.0 * ((y[i + 1] - y[i]) / h[i] - (y[i] - y[i - 1]) / h[i - 1]);

        if k == 0 {
            c_prime[k] = upper / diag;
            d_prime[k] = rhs / diag;
        } else {
            let denom = diag - lower * c_prime[k - 1];
            c_prime[k] = upper / denom;
            d_prime[k] = (rhs - lower * d_prime[k - 1]) / denom;
        }
    }

    for k in (0..interior).rev() {
        let next = if k + 1 < interior { m[k + 2] } else { 0.0 };
        m[k + 1] = d_prime[k] - c_prime[k] * next;
    }

    m
}

/// Yield curve over maturities in days
#[derive(Debug, Clone)]
pub struct YieldCurve {
    spline: NaturalCubicSpline,
}

impl YieldCurve {
    /// Fit the curve; points may arrive in any order but maturities must be distinct
    pub fn from_points(points: &[YieldCurvePoint]) -> VixResult<Self> {
        let mut sorted = points.to_vec();
        sorted.sort_by(|a, b| a.maturity_days.total_cmp(&b.maturity_days));

        if sorted
            .windows(2)
            .any(|w| w[0].maturity_days == w[1].maturity_days)
        {
            return Err(VixError::data(
                "yield curve points share a maturity; spline is undefined",
            ));
        }

        let x = sorted.iter().map(|p| p.maturity_days).collect();
        let y = sorted.iter().map(|p| p.annualized_yield).collect();
        Ok(Self {
            spline: NaturalCubicSpline::new(x, y)?,
        })
    }

    /// Annualized yield at `days` to maturity
    pub fn rate(&self, days: f64) -> f64 {
        self.spline.value(days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CMT_MATURITY_DAYS;

    fn sample_points() -> Vec<YieldCurvePoint> {
        let yields = [0.0525, 0.0530, 0.0515, 0.0490, 0.0455, 0.0440, 0.0430];
        CMT_MATURITY_DAYS
            .iter()
            .zip(yields.iter())
            .map(|(&d, &y)| YieldCurvePoint::new(d, y))
            .collect()
    }

    #[test]
    fn test_passes_through_knots() {
        let points = sample_points();
        let curve = YieldCurve::from_points(&points).unwrap();

        for p in &points {
            assert!((curve.rate(p.maturity_days) - p.annualized_yield).abs() < 1e-12);
        }
    }

    #[test]
    fn test_order_independent() {
        let points = sample_points();
        let mut shuffled = points.clone();
        shuffled.reverse();
        shuffled.swap(1, 4);

        let a = YieldCurve::from_points(&points).unwrap();
        let b = YieldCurve::from_points(&shuffled).unwrap();
        for days in [5.0, 15.0, 45.0, 200.0, 1500.0] {
            assert!((a.rate(days) - b.rate(days)).abs() < 1e-14);
        }
    }

    #[test]
    fn test_reproduces_straight_line() {
        // A natural spline reproduces linear data exactly, including extrapolation
        let points: Vec<YieldCurvePoint> = CMT_MATURITY_DAYS
            .iter()
            .map(|&d| YieldCurvePoint::new(d, 0.01 + d * 1e-5))
            .collect();
        let curve = YieldCurve::from_points(&points).unwrap();

        for days in [1.0, 14.0, 60.0, 500.0, 2500.0] {
            assert!((curve.rate(days) - (0.01 + days * 1e-5)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_natural_boundary_curvature() {
        let spline = NaturalCubicSpline::new(
            vec![0.0, 1.0, 2.0, 3.0],
            vec![0.0, 1.0, 0.0, 1.0],
        )
        .unwrap();

        let h = 1e-4;
        let curvature = |x: f64| {
            (spline.value(x + h) - 2.0 * spline.value(x) + spline.value(x - h)) / (h * h)
        };
        assert!(curvature(h).abs() < 1e-2);
        assert!(curvature(3.0 - h).abs() < 1e-2);
        // Symmetric data, so the interior curvatures mirror each other
        assert!((curvature(1.0) + curvature(2.0)).abs() < 1e-2);
    }

    #[test]
    fn test_extrapolation_is_finite() {
        let curve = YieldCurve::from_points(&sample_points()).unwrap();
        for days in [-5.0, 0.0, 1.0, 3000.0] {
            assert!(curve.rate(days).is_finite());
        }
    }

    #[test]
    fn test_two_points_is_linear() {
        let curve = YieldCurve::from_points(&[
            YieldCurvePoint::new(30.0, 0.05),
            YieldCurvePoint::new(90.0, 0.06),
        ])
        .unwrap();
        assert!((curve.rate(60.0) - 0.055).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_degenerate_support() {
        let single = YieldCurve::from_points(&[YieldCurvePoint::new(30.0, 0.05)]);
        assert!(matches!(single, Err(VixError::DataUnavailable(_))));

        let duplicate = YieldCurve::from_points(&[
            YieldCurvePoint::new(30.0, 0.05),
            YieldCurvePoint::new(30.0, 0.06),
            YieldCurvePoint::new(90.0, 0.06),
        ]);
        assert!(matches!(duplicate, Err(VixError::DataUnavailable(_))));
    }
}
