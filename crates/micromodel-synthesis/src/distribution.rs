//! Histogram helpers for building weighted candidate arrays from measured
//! samples.

/// Probability mass of `values.len()` equal-width bins spanning the sample.
///
/// Bins cover `[min, max]`, or `[v − 0.5, v + 0.5]` when every sample is
/// `v`; the last bin includes its right edge. The result sums to 1 for a
/// non-empty sample.
pub fn probability_density(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    if n == 0 {
        return Vec::new();
    }

    let (mut lo, mut hi) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / n as f64;

    let mut counts = vec![0usize; n];
    for &v in values {
        let bin = (((v - lo) / width).floor() as usize).min(n - 1);
        counts[bin] += 1;
    }
    counts.into_iter().map(|c| c as f64 / n as f64).collect()
}

/// Distinct sample values in ascending order with their share in percent.
pub fn percent_probability(values: &[f64]) -> Vec<(f64, f64)> {
    if values.is_empty() {
        return Vec::new();
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let total = values.len() as f64;
    let mut shares: Vec<(f64, f64)> = Vec::new();
    for v in sorted {
        match shares.last_mut() {
            Some((last, count)) if *last == v => *count += 1.0,
            _ => shares.push((v, 1.0)),
        }
    }
    for (_, share) in &mut shares {
        *share = *share / total * 100.0;
    }
    shares
}
