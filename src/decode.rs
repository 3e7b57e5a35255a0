//! Datagram payload to samples

// Datagrams have no header, length prefix or checksum. The payload is just
// consecutive little-endian f32s, so decoding can't fail: a trailing partial
// sample is dropped and anything else becomes whatever float the bits say.

use crate::{
    error::{Error, Result},
    SAMPLE_WIDTH,
};

/// The decoded samples of one datagram
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Packet {
    samples: Vec<f32>,
}

impl Packet {
    pub fn decode(payload: &[u8]) -> Self {
        Self {
            samples: decode_samples(payload),
        }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Stride length L (channel count), the number of samples this datagram carried
    pub fn stride(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Optional hardening, refuse the whole datagram if any sample is
    /// non-finite or beyond `limit` in magnitude
    pub fn check_range(&self, limit: f32) -> Result<()> {
        match self
            .samples
            .iter()
            .find(|s| !s.is_finite() || s.abs() > limit)
        {
            Some(&value) => Err(Error::OutOfRange { value, limit }),
            None => Ok(()),
        }
    }
}

/// Decode as many whole little-endian f32s as the payload holds
pub fn decode_samples(payload: &[u8]) -> Vec<f32> {
    payload
        .chunks_exact(SAMPLE_WIDTH)
        .map(|word| f32::from_le_bytes([word[0], word[1], word[2], word[3]]))
        .collect()
}

/// Inverse of [`decode_samples`], used for building datagrams
pub fn encode_samples(samples: &[f32]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_le_bytes()).collect()
}
