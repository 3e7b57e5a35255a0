//! Argument parsing for running from the command line

use std::net::SocketAddr;

use clap::Parser;
use clap_verbosity_flag::InfoLevel;

use crate::{
    config::{
        PipelineConfig, SpectralMode, DEFAULT_HIGH_CUTOFF, DEFAULT_LOW_CUTOFF,
        DEFAULT_RESET_AFTER, DEFAULT_SAMPLE_RATE, DEFAULT_TOP_K, DEFAULT_WINDOW_SECONDS,
    },
    RECV_BUFFER_SIZE,
};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// Address to listen for sample datagrams on
    #[clap(long, default_value = "127.0.0.1")]
    pub host: String,
    /// Port to capture UDP data from
    #[clap(short, long, default_value_t = 5005)]
    #[clap(value_parser = clap::value_parser!(u16).range(1..))]
    pub port: u16,
    /// Sample rate of the incoming stream (Hz)
    #[clap(short = 'r', long, default_value_t = DEFAULT_SAMPLE_RATE)]
    pub sample_rate: f32,
    /// Length of the analysis window (seconds)
    #[clap(short, long, default_value_t = DEFAULT_WINDOW_SECONDS)]
    pub window_seconds: f32,
    /// Lowest frequency a reported peak may have (Hz)
    #[clap(long, default_value_t = DEFAULT_LOW_CUTOFF)]
    pub low_cutoff: f32,
    /// Highest frequency a reported peak may have (Hz)
    #[clap(long, default_value_t = DEFAULT_HIGH_CUTOFF)]
    pub high_cutoff: f32,
    /// How many of the strongest in-band peaks to report
    #[clap(short = 'k', long, default_value_t = DEFAULT_TOP_K)]
    pub top_k: usize,
    /// Start the moving average over after this many cycles
    #[clap(long, default_value_t = DEFAULT_RESET_AFTER)]
    pub reset_after: u32,
    /// How the window is laid out before the FFT
    #[clap(long, value_enum, default_value = "window")]
    pub spectral_mode: SpectralMode,
    /// Drop datagrams holding a sample beyond this magnitude (or NaN/inf)
    #[clap(long)]
    pub max_abs_sample: Option<f32>,
    /// Forward each cycle's 0-255 scaled spectrum to this address
    #[clap(short, long)]
    pub forward: Option<SocketAddr>,
    /// Receive buffer size in bytes, bigger datagrams are truncated
    #[clap(long, default_value_t = RECV_BUFFER_SIZE as u64)]
    #[clap(value_parser = clap::value_parser!(u64).range(4..))]
    pub recv_buffer: u64,
    #[clap(flatten)]
    pub verbose: clap_verbosity_flag::Verbosity<InfoLevel>,
}

impl Args {
    /// Unvalidated pipeline settings
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            sample_rate: self.sample_rate,
            window_seconds: self.window_seconds,
            low_cutoff: self.low_cutoff,
            high_cutoff: self.high_cutoff,
            top_k: self.top_k,
            reset_after: self.reset_after,
            mode: self.spectral_mode,
            max_abs_sample: self.max_abs_sample,
        }
    }
}

/// Match verbosity filter with tracing subscriber log levels
pub fn convert_filter(filter: log::LevelFilter) -> tracing_subscriber::filter::LevelFilter {
    match filter {
        log::LevelFilter::Off => tracing_subscriber::filter::LevelFilter::OFF,
        log::LevelFilter::Error => tracing_subscriber::filter::LevelFilter::ERROR,
        log::LevelFilter::Warn => tracing_subscriber::filter::LevelFilter::WARN,
        log::LevelFilter::Info => tracing_subscriber::filter::LevelFilter::INFO,
        log::LevelFilter::Debug => tracing_subscriber::filter::LevelFilter::DEBUG,
        log::LevelFilter::Trace => tracing_subscriber::filter::LevelFilter::TRACE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_config() {
        let args = Args::parse_from(["ssvep_slurper"]);
        assert_eq!(args.port, 5005);
        assert_eq!(args.host, "127.0.0.1");
        assert_eq!(args.recv_buffer, RECV_BUFFER_SIZE as u64);
        assert_eq!(args.pipeline_config(), PipelineConfig::default());
    }

    #[test]
    fn test_overrides() {
        let args = Args::parse_from([
            "ssvep_slurper",
            "-p",
            "6000",
            "--spectral-mode",
            "row-average",
            "--low-cutoff",
            "7.5",
            "-k",
            "5",
            "--forward",
            "127.0.0.1:7000",
        ]);
        let cfg = args.pipeline_config();
        assert_eq!(args.port, 6000);
        assert_eq!(cfg.mode, SpectralMode::RowAverage);
        assert_eq!(cfg.low_cutoff, 7.5);
        assert_eq!(cfg.top_k, 5);
        assert_eq!(args.forward, Some("127.0.0.1:7000".parse().unwrap()));
    }

    #[test]
    fn test_rejects_port_zero() {
        assert!(Args::try_parse_from(["ssvep_slurper", "-p", "0"]).is_err());
    }

    #[test]
    fn test_verbosity_maps_to_tracing() {
        assert_eq!(
            convert_filter(log::LevelFilter::Debug),
            tracing_subscriber::filter::LevelFilter::DEBUG
        );
        let args = Args::parse_from(["ssvep_slurper"]);
        assert_eq!(
            convert_filter(args.verbose.log_level_filter()),
            tracing_subscriber::filter::LevelFilter::INFO
        );
    }
}
