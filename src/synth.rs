//! Synthetic test signals, encoded the way a sensor would send them

use std::f64::consts::TAU;

use crate::decode::encode_samples;

/// Unit-amplitude sine samples `offset..offset + n` of an endless tone
pub fn sine_samples(frequency: f32, sample_rate: f32, offset: u64, n: usize) -> Vec<f32> {
    let step = TAU * frequency as f64 / sample_rate as f64;
    (0..n as u64)
        // Phase in f64, otherwise long runs drift
        .map(|i| ((offset + i) as f64 * step).rem_euclid(TAU).sin() as f32)
        .collect()
}

/// `seconds` worth of a pure tone split into datagrams of `stride` samples.
/// A final partial datagram is kept.
pub fn sine_datagrams(frequency: f32, sample_rate: f32, seconds: f32, stride: usize) -> Vec<Vec<u8>> {
    assert!(stride > 0, "datagrams need at least one sample");
    let total = (sample_rate * seconds).round() as usize;
    sine_samples(frequency, sample_rate, 0, total)
        .chunks(stride)
        .map(encode_samples)
        .collect()
}
