//! Real-time dominant frequency tracking for sensor samples streamed over UDP.
//!
//! Datagrams of little-endian `f32` samples are pushed into a sliding window.
//! Every datagram that leaves the window full triggers an analysis cycle:
//! magnitude spectrum, 0-255 scaling for retransmission, in-band peak
//! ranking and a resetting moving average of the strongest peak.

pub mod args;
pub mod average;
pub mod capture;
pub mod config;
pub mod decode;
pub mod error;
pub mod peaks;
pub mod pipeline;
pub mod report;
pub mod scale;
pub mod spectrum;
pub mod synth;
pub mod window;

pub use config::{PipelineConfig, SpectralMode};
pub use error::{Error, Result};
pub use pipeline::{Pipeline, Report};

/// Width of one sample on the wire (little-endian `f32`)
pub const SAMPLE_WIDTH: usize = 4;
/// Largest datagram we read in one receive
pub const RECV_BUFFER_SIZE: usize = 8192;
