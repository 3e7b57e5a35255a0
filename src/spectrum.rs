//! Magnitude spectrum of a full window
//!
//! The snapshot is laid out according to [`SpectralMode`], transformed with
//! rustfft and cut down to the positive-frequency half. The mirrored upper
//! half of a real signal's spectrum carries no extra information, so the
//! output is always `floor(transform length / 2)` bins long.

use rustfft::{num_complex::Complex, FftPlanner};

use crate::{config::SpectralMode, error::Result, window::reshape};

/// Positive-frequency half spectrum, bin frequencies ascending from DC
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    frequencies: Vec<f32>,
    magnitudes: Vec<f32>,
}

impl Spectrum {
    pub fn new(frequencies: Vec<f32>, magnitudes: Vec<f32>) -> Self {
        assert_eq!(
            frequencies.len(),
            magnitudes.len(),
            "every bin needs a frequency"
        );
        Self {
            frequencies,
            magnitudes,
        }
    }

    pub fn frequencies(&self) -> &[f32] {
        &self.frequencies
    }

    pub fn magnitudes(&self) -> &[f32] {
        &self.magnitudes
    }

    pub fn len(&self) -> usize {
        self.magnitudes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.magnitudes.is_empty()
    }
}

/// Bin frequencies `k * sample_rate / transform_len` for `k in 0..bins`
pub fn frequency_axis(bins: usize, sample_rate: f32, transform_len: usize) -> Vec<f32> {
    let step = sample_rate / transform_len as f32;
    (0..bins).map(|k| k as f32 * step).collect()
}

pub struct SpectrumAnalyzer {
    planner: FftPlanner<f32>,
    sample_rate: f32,
    mode: SpectralMode,
}

impl SpectrumAnalyzer {
    pub fn new(sample_rate: f32, mode: SpectralMode) -> Self {
        Self {
            planner: FftPlanner::new(),
            sample_rate,
            mode,
        }
    }

    pub fn mode(&self) -> SpectralMode {
        self.mode
    }

    /// Analyze a full window snapshot; `stride` is the sample count of the
    /// most recent packet and only matters for the reshaping modes
    pub fn analyze(&mut self, samples: &[f32], stride: usize) -> Result<Spectrum> {
        let (mut magnitudes, resolution_len) = match self.mode {
            SpectralMode::Window => (self.magnitude_spectrum(samples), samples.len()),
            SpectralMode::ColumnMean => {
                let rows = reshape(samples, stride)?;
                let n_rows = rows.len() as f32;
                let mut column_mean = vec![0f32; stride];
                for row in rows {
                    for (acc, x) in column_mean.iter_mut().zip(row) {
                        *acc += x.abs() / n_rows;
                    }
                }
                // Bins keep the whole-window spacing
                (self.magnitude_spectrum(&column_mean), samples.len())
            }
            SpectralMode::RowAverage => {
                let rows = reshape(samples, stride)?;
                let n_rows = rows.len() as f32;
                let mut avg = vec![0f32; stride];
                for row in rows {
                    let mags = self.magnitude_spectrum(row);
                    for (acc, m) in avg.iter_mut().zip(mags) {
                        *acc += m / n_rows;
                    }
                }
                (avg, stride)
            }
        };
        let half = magnitudes.len() / 2;
        magnitudes.truncate(half);
        Ok(Spectrum::new(
            frequency_axis(half, self.sample_rate, resolution_len),
            magnitudes,
        ))
    }

    /// |FFT| of a real signal, full length
    fn magnitude_spectrum(&mut self, signal: &[f32]) -> Vec<f32> {
        if signal.is_empty() {
            return vec![];
        }
        let fft = self.planner.plan_fft_forward(signal.len());
        let mut buffer: Vec<Complex<f32>> = signal.iter().map(|&x| Complex::new(x, 0.0)).collect();
        fft.process(&mut buffer);
        buffer.iter().map(|c| c.norm()).collect()
    }
}
