//! Small summary statistics over `f64` samples.
//!
//! Empty inputs yield `f64::NAN` rather than panicking; callers that rank by these
//! values push NaN to the end.

use std::cmp::Ordering;

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Median with the even-count midpoint rule.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}

/// Linear-interpolation quantile (R-7), `p` in `[0, 1]`.
pub fn quantile(values: &[f64], p: f64) -> f64 {
    if values.is_empty() || p.is_nan() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let p = p.clamp(0.0, 1.0);
    let h = (sorted.len() - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (h - lo as f64)
}

/// Ascending order that puts NaN after every number, whatever its sign bit.
pub fn cmp_nan_last(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// Weights for window positions: `exp(-lambda * i)`, nearest position first.
pub fn decay_weights(len: usize, lambda: f64) -> Vec<f64> {
    (0..len).map(|i| (-lambda * i as f64).exp()).collect()
}

pub fn weighted_mean(values: &[f64], weights: &[f64]) -> f64 {
    if values.is_empty() || values.len() != weights.len() {
        return f64::NAN;
    }
    let mut weighted = 0.0;
    let mut weight_sum = 0.0;
    for (v, w) in values.iter().zip(weights) {
        weighted += v * w;
        weight_sum += w;
    }
    if weight_sum <= 0.0 {
        return f64::NAN;
    }
    weighted / weight_sum
}

/// First value (in ascending order) at which the cumulative weight reaches half the total.
pub fn weighted_median(values: &[f64], weights: &[f64]) -> f64 {
    if values.is_empty() || values.len() != weights.len() {
        return f64::NAN;
    }
    let mut pairs: Vec<(f64, f64)> = values.iter().copied().zip(weights.iter().copied()).collect();
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

    let total: f64 = pairs.iter().map(|(_, w)| w).sum();
    if total <= 0.0 {
        return f64::NAN;
    }
    let half = total / 2.0;
    let mut running = 0.0;
    for (v, w) in &pairs {
        running += w;
        if running >= half {
            return *v;
        }
    }
    // Float drift can leave `running` a hair under `half`.
    pairs.last().map(|(v, _)| *v).unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weighted_median_sorts_nan_to_the_end() {
        let values = [f64::NAN, 3.0, 1.0, 2.0];
        let weights = [1.0; 4];
        assert_eq!(weighted_median(&values, &weights), 2.0);
    }

    #[test]
    fn mean_and_median_of_small_samples() {
        assert_eq!(mean(&[80.0, 90.0, 100.0]), 90.0);
        assert_eq!(median(&[100.0, 80.0, 90.0]), 90.0);
        assert_eq!(median(&[1.0, 4.0, 2.0, 3.0]), 2.5);
        assert!(mean(&[]).is_nan());
        assert!(median(&[]).is_nan());
    }

    #[test]
    fn quantile_interpolates() {
        let v = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(quantile(&v, 0.0), 1.0);
        assert_eq!(quantile(&v, 1.0), 5.0);
        assert!((quantile(&v, 0.1) - 1.4).abs() < 1e-12);
        assert!((quantile(&v, 0.9) - 4.6).abs() < 1e-12);
    }

    #[test]
    fn zero_decay_is_uniform() {
        let w = decay_weights(4, 0.0);
        assert!(w.iter().all(|x| (*x - 1.0).abs() < 1e-12));
        let v = [80.0, 95.0, 100.0, 85.0];
        assert!((weighted_mean(&v, &w) - mean(&v)).abs() < 1e-12);
    }

    #[test]
    fn weighted_median_follows_heavy_weight() {
        let v = [100.0, 80.0, 90.0];
        let w = [0.1, 0.8, 0.1];
        assert_eq!(weighted_median(&v, &w), 80.0);
        let even = [1.0, 1.0];
        assert_eq!(weighted_median(&[5.0, 7.0], &even), 5.0);
    }
}
