//! Pipeline configuration and its validation

use crate::error::{Error, Result};

pub const DEFAULT_SAMPLE_RATE: f32 = 250.0;
pub const DEFAULT_WINDOW_SECONDS: f32 = 1.0;
pub const DEFAULT_LOW_CUTOFF: f32 = 6.0;
pub const DEFAULT_HIGH_CUTOFF: f32 = 20.0;
pub const DEFAULT_TOP_K: usize = 3;
pub const DEFAULT_RESET_AFTER: u32 = 20;
/// Largest window we are willing to allocate, in samples
pub const MAX_WINDOW_LEN: usize = 1 << 24;

/// How the full window is laid out before transforming
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SpectralMode {
    /// The whole window is one time series
    #[default]
    Window,
    /// Mean of |x| down each column of the (N / L, L) reshape, then transform
    ColumnMean,
    /// Transform every row of the (N / L, L) reshape and average the magnitudes
    RowAverage,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PipelineConfig {
    /// Samples per second (Hz)
    pub sample_rate: f32,
    /// Duration of the sliding window in seconds
    pub window_seconds: f32,
    /// Lower edge of the peak band, inclusive (Hz)
    pub low_cutoff: f32,
    /// Upper edge of the peak band, inclusive (Hz)
    pub high_cutoff: f32,
    pub top_k: usize,
    /// Number of moving-average updates before the average starts over
    pub reset_after: u32,
    pub mode: SpectralMode,
    /// Reject datagrams carrying a sample outside +/- this bound
    pub max_abs_sample: Option<f32>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            window_seconds: DEFAULT_WINDOW_SECONDS,
            low_cutoff: DEFAULT_LOW_CUTOFF,
            high_cutoff: DEFAULT_HIGH_CUTOFF,
            top_k: DEFAULT_TOP_K,
            reset_after: DEFAULT_RESET_AFTER,
            mode: SpectralMode::default(),
            max_abs_sample: None,
        }
    }
}

impl PipelineConfig {
    /// Number of samples held by the window, N = sample_rate * window_seconds
    pub fn window_len(&self) -> usize {
        (self.sample_rate * self.window_seconds).round() as usize
    }

    pub fn validate(self) -> Result<Self> {
        if !self.sample_rate.is_finite() || self.sample_rate <= 0.0 {
            return Err(Error::Config(format!(
                "sample rate must be positive, got {}",
                self.sample_rate
            )));
        }
        if !self.window_seconds.is_finite() || self.window_seconds <= 0.0 {
            return Err(Error::Config(format!(
                "window duration must be positive, got {}",
                self.window_seconds
            )));
        }
        // Check the product before window_len's cast can saturate
        let n = (self.sample_rate as f64 * self.window_seconds as f64).round();
        if n > MAX_WINDOW_LEN as f64 {
            return Err(Error::Config(format!(
                "window of {} samples exceeds the limit of {}",
                n, MAX_WINDOW_LEN
            )));
        }
        if self.window_len() < 2 {
            return Err(Error::Config(format!(
                "window must hold at least 2 samples, got {}",
                self.window_len()
            )));
        }
        if !self.low_cutoff.is_finite() || !self.high_cutoff.is_finite() {
            return Err(Error::Config("cutoffs must be finite".to_owned()));
        }
        if self.low_cutoff > self.high_cutoff {
            return Err(Error::Config(format!(
                "low cutoff {} Hz is above high cutoff {} Hz",
                self.low_cutoff, self.high_cutoff
            )));
        }
        if self.top_k == 0 {
            return Err(Error::Config("top-k must be at least 1".to_owned()));
        }
        if self.reset_after == 0 {
            return Err(Error::Config(
                "moving average reset threshold must be at least 1".to_owned(),
            ));
        }
        if let Some(limit) = self.max_abs_sample {
            if !(limit > 0.0) {
                return Err(Error::Config(format!(
                    "sample sanity bound must be positive, got {}",
                    limit
                )));
            }
        }
        Ok(self)
    }
}
