//! Fixed capacity FIFO of the most recent samples

use std::collections::VecDeque;

use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct SlidingWindow {
    samples: VecDeque<f32>,
    capacity: usize,
}

impl SlidingWindow {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "window capacity must be non-zero");
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append in order, evicting the oldest samples once over capacity
    pub fn push(&mut self, samples: &[f32]) {
        // Only the newest `capacity` of an oversized chunk can survive
        let incoming = &samples[samples.len().saturating_sub(self.capacity)..];
        let overflow = (self.samples.len() + incoming.len()).saturating_sub(self.capacity);
        self.samples.drain(..overflow);
        self.samples.extend(incoming);
    }

    pub fn is_full(&self) -> bool {
        self.samples.len() == self.capacity
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest to newest copy of the current contents
    pub fn snapshot(&self) -> Vec<f32> {
        self.samples.iter().copied().collect()
    }
}

/// View a snapshot as a (len / stride, stride) row-major matrix
pub fn reshape(samples: &[f32], stride: usize) -> Result<std::slice::ChunksExact<'_, f32>> {
    if stride == 0 || samples.len() % stride != 0 {
        return Err(Error::Reshape {
            len: samples.len(),
            stride,
        });
    }
    Ok(samples.chunks_exact(stride))
}
