//! Window statistics for a single channel.

use super::{band_energies, Feature, WindowFeatures, FEATURE_COUNT};

/// Stateless extractor; one instance can serve every channel and window.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureExtractor;

impl FeatureExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Compute every feature for one channel's window. `window` must be non-empty; degenerate
    /// windows (length 1, zero variance, fewer than 5 samples) fall back to 0 for the features
    /// they cannot support.
    pub fn extract(&self, window: &[f64]) -> WindowFeatures {
        debug_assert!(!window.is_empty(), "empty window");
        let mut v = [0.0f64; FEATURE_COUNT];
        if window.is_empty() {
            return WindowFeatures::from_values(v);
        }

        let mut sorted = window.to_vec();
        sorted.sort_by(f64::total_cmp);

        let min = sorted[0];
        let max = sorted[sorted.len() - 1];
        // identical samples: take the moments exactly rather than through rounded sums
        let constant = min == max;
        let moments = if constant {
            Moments::constant(min)
        } else {
            Moments::of(window)
        };
        let q25 = percentile(&sorted, 25.0);
        let q75 = percentile(&sorted, 75.0);

        v[Feature::Mean.index()] = moments.mean;
        v[Feature::Std.index()] = moments.m2.sqrt();
        v[Feature::Min.index()] = min;
        v[Feature::Max.index()] = max;
        v[Feature::Median.index()] = percentile(&sorted, 50.0);
        v[Feature::Range.index()] = max - min;

        v[Feature::Q25.index()] = q25;
        v[Feature::Q75.index()] = q75;
        v[Feature::Iqr.index()] = q75 - q25;

        v[Feature::Skewness.index()] = moments.skewness();
        v[Feature::Kurtosis.index()] = moments.excess_kurtosis();

        let first = window[0];
        let last = window[window.len() - 1];
        v[Feature::FirstValue.index()] = first;
        v[Feature::LastValue.index()] = last;
        v[Feature::FirstLastDelta.index()] = last - first;

        v[Feature::Slope.index()] = ols_slope(window);

        if window.len() > 1 {
            let diffs: Vec<f64> = window.windows(2).map(|p| p[1] - p[0]).collect();
            let dm = Moments::of(&diffs);
            v[Feature::DiffMean.index()] = dm.mean;
            v[Feature::DiffStd.index()] = dm.m2.sqrt();
            v[Feature::DiffMax.index()] = diffs.iter().fold(0.0f64, |acc, d| acc.max(d.abs()));
            if !constant {
                v[Feature::Lag1Autocorr.index()] =
                    pearson(&window[..window.len() - 1], &window[1..]);
            }
        }

        for (i, energy) in band_energies(window).into_iter().enumerate() {
            if let Some(f) = Feature::fft_band(i) {
                v[f.index()] = energy;
            }
        }

        for x in v.iter_mut() {
            if !x.is_finite() {
                *x = 0.0;
            }
        }
        WindowFeatures::from_values(v)
    }
}

/// Mean and biased central moments.
struct Moments {
    mean: f64,
    m2: f64,
    m3: f64,
    m4: f64,
}

impl Moments {
    fn of(xs: &[f64]) -> Self {
        let n = xs.len() as f64;
        let mean = xs.iter().sum::<f64>() / n;
        let (mut m2, mut m3, mut m4) = (0.0, 0.0, 0.0);
        for &x in xs {
            let d = x - mean;
            let d2 = d * d;
            m2 += d2;
            m3 += d2 * d;
            m4 += d2 * d2;
        }
        Self {
            mean,
            m2: m2 / n,
            m3: m3 / n,
            m4: m4 / n,
        }
    }

    fn constant(value: f64) -> Self {
        Self {
            mean: value,
            m2: 0.0,
            m3: 0.0,
            m4: 0.0,
        }
    }

    /// Variance indistinguishable from rounding noise around the mean
    fn is_degenerate(&self) -> bool {
        self.m2 <= (f64::EPSILON * self.mean).powi(2)
    }

    fn skewness(&self) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }
        self.m3 / self.m2.powf(1.5)
    }

    fn excess_kurtosis(&self) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }
        self.m4 / (self.m2 * self.m2) - 3.0
    }
}

/// Linear-interpolation percentile over sorted, non-empty samples.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64)
}

/// Least-squares slope of value against sample index; 0 below two samples.
fn ols_slope(ys: &[f64]) -> f64 {
    if ys.len() < 2 {
        return 0.0;
    }
    let n = ys.len() as f64;
    let x_mean = (n - 1.0) / 2.0;
    let y_mean = ys.iter().sum::<f64>() / n;
    let (mut sxy, mut sxx) = (0.0, 0.0);
    for (i, &y) in ys.iter().enumerate() {
        let dx = i as f64 - x_mean;
        sxy += dx * (y - y_mean);
        sxx += dx * dx;
    }
    sxy / sxx
}

/// Pearson correlation clipped to [-1, 1]; 0 whenever it is undefined.
fn pearson(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len() as f64;
    let ma = a.iter().sum::<f64>() / n;
    let mb = b.iter().sum::<f64>() / n;
    let (mut cov, mut va, mut vb) = (0.0, 0.0, 0.0);
    for (&x, &y) in a.iter().zip(b) {
        let (dx, dy) = (x - ma, y - mb);
        cov += dx * dy;
        va += dx * dx;
        vb += dy * dy;
    }
    let r = cov / (va * vb).sqrt();
    if r.is_finite() {
        r.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}
