//! One owned instance of every stateful stage, driven once per datagram

use chrono::{DateTime, Utc};
use tracing::{debug, trace};

use crate::{
    average::MovingAverage,
    config::PipelineConfig,
    decode::Packet,
    error::Result,
    peaks::{top_peaks, Band, Peak},
    scale::scale_to_u8,
    spectrum::{Spectrum, SpectrumAnalyzer},
    window::SlidingWindow,
};

/// Output of one analysis cycle
#[derive(Debug, Clone)]
pub struct Report {
    pub timestamp: DateTime<Utc>,
    /// Counts analysis cycles since startup, starting at 1
    pub cycle: u64,
    pub spectrum: Spectrum,
    /// The spectrum magnitudes mapped onto 0..=255
    pub scaled: Vec<u8>,
    /// Strongest in-band peaks, strongest first; empty if none were found
    pub peaks: Vec<Peak>,
    /// Moving average after folding in this cycle's top peak, `None` if there was no peak
    pub moving_average: Option<f32>,
}

impl Report {
    pub fn dominant(&self) -> Option<Peak> {
        self.peaks.first().copied()
    }
}

pub struct Pipeline {
    config: PipelineConfig,
    window: SlidingWindow,
    analyzer: SpectrumAnalyzer,
    average: MovingAverage,
    band: Band,
    cycles: u64,
}

impl Pipeline {
    /// `config` should already have gone through [`PipelineConfig::validate`]
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            window: SlidingWindow::new(config.window_len()),
            analyzer: SpectrumAnalyzer::new(config.sample_rate, config.mode),
            average: MovingAverage::new(config.reset_after),
            band: Band::new(config.low_cutoff, config.high_cutoff),
            cycles: 0,
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn window(&self) -> &SlidingWindow {
        &self.window
    }

    pub fn moving_average(&self) -> &MovingAverage {
        &self.average
    }

    /// Decode a datagram payload and push it through the pipeline.
    ///
    /// Returns a report for every payload that leaves the window full, so a
    /// full window re-analyzes on each new datagram. Empty payloads are
    /// no-ops. An error here concerns this datagram only.
    pub fn ingest(&mut self, payload: &[u8]) -> Result<Option<Report>> {
        let packet = Packet::decode(payload);
        if packet.is_empty() {
            trace!("Ignoring datagram with no whole samples");
            return Ok(None);
        }
        if let Some(limit) = self.config.max_abs_sample {
            packet.check_range(limit)?;
        }
        self.window.push(packet.samples());
        if !self.window.is_full() {
            trace!(
                fill = self.window.len(),
                capacity = self.window.capacity(),
                "Window filling"
            );
            return Ok(None);
        }
        self.analyze(packet.stride()).map(Some)
    }

    fn analyze(&mut self, stride: usize) -> Result<Report> {
        let snapshot = self.window.snapshot();
        let spectrum = self.analyzer.analyze(&snapshot, stride)?;
        let scaled = scale_to_u8(spectrum.magnitudes());
        let peaks = top_peaks(&spectrum, self.band, self.config.top_k);
        let moving_average = peaks.first().map(|p| self.average.update(p.frequency));
        self.cycles += 1;
        debug!(
            cycle = self.cycles,
            bins = spectrum.len(),
            peaks = peaks.len(),
            "Analysis cycle complete"
        );
        Ok(Report {
            timestamp: Utc::now(),
            cycle: self.cycles,
            spectrum,
            scaled,
            peaks,
            moving_average,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::SpectralMode,
        decode::encode_samples,
        error::Error,
        synth::sine_datagrams,
    };

    fn small_config() -> PipelineConfig {
        PipelineConfig {
            sample_rate: 8.0,
            window_seconds: 1.0,
            low_cutoff: 0.0,
            high_cutoff: 4.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_no_report_until_full() {
        let mut pipeline = Pipeline::new(small_config());
        assert!(pipeline.ingest(&encode_samples(&[0.0; 4])).unwrap().is_none());
        assert!(pipeline.ingest(&encode_samples(&[0.0; 4])).unwrap().is_some());
    }

    #[test]
    fn test_empty_payload_is_noop() {
        let mut pipeline = Pipeline::new(small_config());
        pipeline.ingest(&encode_samples(&[1.0; 8])).unwrap();
        assert!(pipeline.ingest(&[]).unwrap().is_none());
        assert!(pipeline.ingest(&[0xff, 0xff]).unwrap().is_none());
        assert_eq!(pipeline.window().len(), 8);
    }

    #[test]
    fn test_every_push_while_full_reanalyzes() {
        let mut pipeline = Pipeline::new(small_config());
        let cycles: Vec<u64> = (0..4)
            .filter_map(|_| pipeline.ingest(&encode_samples(&[1.0; 8])).unwrap())
            .map(|r| r.cycle)
            .collect();
        assert_eq!(cycles, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_flat_window_reports_no_peak() {
        let mut pipeline = Pipeline::new(small_config());
        let report = pipeline.ingest(&encode_samples(&[0.0; 8])).unwrap().unwrap();
        assert_eq!(report.scaled, vec![0; 4]);
        assert!(report.peaks.is_empty());
        assert!(report.moving_average.is_none());
        assert_eq!(pipeline.moving_average().count(), 0);
    }

    #[test]
    fn test_out_of_range_rejected_and_window_untouched() {
        let mut pipeline = Pipeline::new(PipelineConfig {
            max_abs_sample: Some(10.0),
            ..small_config()
        });
        let err = pipeline.ingest(&encode_samples(&[1.0, 100.0])).unwrap_err();
        assert!(matches!(err, Error::OutOfRange { .. }));
        assert!(pipeline.window().is_empty());
    }

    #[test]
    fn test_sine_tracks_ten_hz() {
        let mut pipeline = Pipeline::new(PipelineConfig::default());
        let mut last = None;
        for datagram in sine_datagrams(10.0, 250.0, 1.0, 25) {
            if let Some(report) = pipeline.ingest(&datagram).unwrap() {
                last = Some(report);
            }
        }
        let report = last.expect("a full window after one second");
        let dominant = report.dominant().unwrap();
        assert!((dominant.frequency - 10.0).abs() <= 1.0);
        assert_eq!(report.moving_average, Some(dominant.frequency));
    }

    #[test]
    fn test_reshape_error_skips_cycle() {
        let mut pipeline = Pipeline::new(PipelineConfig {
            mode: SpectralMode::RowAverage,
            ..small_config()
        });
        pipeline.ingest(&encode_samples(&[0.0; 5])).unwrap();
        // 8 is not a multiple of 3
        assert!(matches!(
            pipeline.ingest(&encode_samples(&[0.0; 3])),
            Err(Error::Reshape { len: 8, stride: 3 })
        ));
        // A fitting stride recovers on the next datagram
        assert!(pipeline.ingest(&encode_samples(&[0.0; 4])).unwrap().is_some());
    }
}
