//! Running mean of the dominant peak frequency across analysis cycles

#[derive(Debug, Clone, PartialEq)]
pub struct MovingAverage {
    mean: f64,
    count: u32,
    reset_after: u32,
}

impl MovingAverage {
    pub fn new(reset_after: u32) -> Self {
        assert!(reset_after > 0, "reset threshold must be non-zero");
        Self {
            mean: 0.0,
            count: 0,
            reset_after,
        }
    }

    /// Fold in one frequency and return the new mean. Once `reset_after`
    /// values have been folded in, the next one starts a fresh average.
    pub fn update(&mut self, frequency: f32) -> f32 {
        if self.count >= self.reset_after {
            self.reset();
        }
        self.mean = (self.mean * self.count as f64 + frequency as f64) / (self.count as f64 + 1.0);
        self.count += 1;
        self.mean as f32
    }

    pub fn reset(&mut self) {
        self.mean = 0.0;
        self.count = 0;
    }

    pub fn mean(&self) -> f32 {
        self.mean as f32
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}
