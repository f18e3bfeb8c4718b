//! Spectral band energies from the discrete Fourier transform of a window.

use std::f64::consts::PI;

/// Number of contiguous frequency bands
pub const SPECTRAL_BANDS: usize = 3;

/// Windows shorter than this report zero energy in every band
const MIN_SPECTRAL_SAMPLES: usize = 5;

/// Squared DFT magnitude for bins `0..n/2`.
fn half_power_spectrum(samples: &[f64]) -> Vec<f64> {
    let n = samples.len();
    let step = -2.0 * PI / n as f64;
    (0..n / 2)
        .map(|k| {
            let (mut re, mut im) = (0.0, 0.0);
            for (t, &x) in samples.iter().enumerate() {
                // reduce k*t mod n first so the angle stays small
                let angle = step * ((k * t) % n) as f64;
                re += x * angle.cos();
                im += x * angle.sin();
            }
            re * re + im * im
        })
        .collect()
}

/// Energy per band, band 0 lowest frequency. The last band absorbs the remainder when the
/// half spectrum does not split evenly.
pub fn band_energies(samples: &[f64]) -> [f64; SPECTRAL_BANDS] {
    let mut out = [0.0; SPECTRAL_BANDS];
    if samples.len() < MIN_SPECTRAL_SAMPLES {
        return out;
    }
    let power = half_power_spectrum(samples);
    let band_size = power.len() / SPECTRAL_BANDS;
    for (i, energy) in out.iter_mut().enumerate() {
        let start = i * band_size;
        let end = if i < SPECTRAL_BANDS - 1 {
            (i + 1) * band_size
        } else {
            power.len()
        };
        *energy = power[start..end].iter().sum();
    }
    out
}
