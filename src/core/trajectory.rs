use super::sample::Sample;

/// Recorded trajectory held as parallel per-frame sequences.
///
/// Every sequence has exactly `len()` entries. The buffer is built once
/// and never mutated afterwards; an empty buffer is valid and means the
/// viewer has nothing to play.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleBuffer {
    time: Vec<f64>,
    pos_x: Vec<f64>,
    pos_y: Vec<f64>,
    heading: Vec<f64>,
    vel_x: Vec<f64>,
    vel_y: Vec<f64>,
    angular_vel: Vec<f64>,
}

impl SampleBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a buffer from samples in playback order
    pub fn from_samples<I>(samples: I) -> Self
    where
        I: IntoIterator<Item = Sample>,
    {
        let mut buffer = Self::new();
        for sample in samples {
            buffer.push(sample);
        }
        buffer
    }

    fn push(&mut self, sample: Sample) {
        self.time.push(sample.time);
        self.pos_x.push(sample.pos_x);
        self.pos_y.push(sample.pos_y);
        self.heading.push(sample.heading);
        self.vel_x.push(sample.vel_x);
        self.vel_y.push(sample.vel_y);
        self.angular_vel.push(sample.angular_vel);
    }

    /// Number of frames
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Sample at `index`.
    ///
    /// Panics if `index >= len()`; callers clamp before reading.
    pub fn at(&self, index: usize) -> Sample {
        Sample {
            time: self.time[index],
            pos_x: self.pos_x[index],
            pos_y: self.pos_y[index],
            heading: self.heading[index],
            vel_x: self.vel_x[index],
            vel_y: self.vel_y[index],
            angular_vel: self.angular_vel[index],
        }
    }

    /// Recorded timestamp of a frame in seconds
    pub fn time_at(&self, index: usize) -> f64 {
        self.time[index]
    }

    /// X and Y position sequences
    pub fn positions(&self) -> (&[f64], &[f64]) {
        (&self.pos_x, &self.pos_y)
    }

    /// Timestamp of the last sample, 0 when empty
    pub fn duration(&self) -> f64 {
        self.time.last().copied().unwrap_or(0.0)
    }
}

impl FromIterator<Sample> for SampleBuffer {
    fn from_iter<T: IntoIterator<Item = Sample>>(iter: T) -> Self {
        Self::from_samples(iter)
    }
}
