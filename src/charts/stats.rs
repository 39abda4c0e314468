//! Small numeric helpers for chart derivations.

/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator). `NaN` below two values.
pub fn sample_stddev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let variance =
        values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

/// Linear-interpolated quantile of already sorted values.
pub fn quantile_sorted(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let h = (sorted.len() - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
}

fn usable(v: f64) -> Option<f64> {
    (v.is_finite() && v != 0.0).then_some(v)
}

/// Scott's rule bandwidth: `1.06 * min(sd, IQR / 1.34) * n^-0.2`.
///
/// Falls back to the standard deviation, then the first quartile, then 1
/// when the spread is zero or undefined.
pub fn scott_bandwidth(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let q1 = quantile_sorted(&sorted, 0.25);
    let q3 = quantile_sorted(&sorted, 0.75);
    let sd = sample_stddev(&sorted);
    let iqr_spread = (q3 - q1) / 1.34;

    let spread = usable(sd.min(iqr_spread))
        .or_else(|| usable(sd))
        .or_else(|| usable(q1.abs()))
        .unwrap_or(1.0);

    1.06 * spread * (values.len() as f64).powf(-0.2)
}

/// `steps` evenly spaced points covering `[lo, hi]`, both ends included.
pub fn linspace(lo: f64, hi: f64, steps: usize) -> Vec<f64> {
    match steps {
        0 => Vec::new(),
        1 => vec![lo],
        _ => {
            let step = (hi - lo) / (steps - 1) as f64;
            (0..steps).map(|i| lo + step * i as f64).collect()
        }
    }
}

/// Gaussian kernel-density estimate of `values`, sampled at `steps` points
/// across `extent`. Returns `(x, density)` pairs; empty for empty input.
pub fn kernel_density(values: &[f64], extent: (f64, f64), steps: usize) -> Vec<(f64, f64)> {
    if values.is_empty() {
        return Vec::new();
    }

    let bandwidth = scott_bandwidth(values);
    let n = values.len() as f64;
    let norm = 1.0 / (n * bandwidth * (2.0 * std::f64::consts::PI).sqrt());

    linspace(extent.0, extent.1, steps)
        .into_iter()
        .map(|x| {
            let sum: f64 = values
                .iter()
                .map(|v| {
                    let z = (x - v) / bandwidth;
                    (-0.5 * z * z).exp()
                })
                .sum();
            (x, sum * norm)
        })
        .collect()
}
