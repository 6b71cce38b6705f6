use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use crate::core::{Pose, SampleBuffer, Velocity};
use crate::playback::{PlaybackClock, PlaybackStatus};

/// Playback engine for a recorded trajectory
///
/// `frame` may sit one past the last sample once playback or stepping runs
/// off the end. Every read goes through [`TimelineEngine::last_valid_index`],
/// which maps that position back onto the final sample.
pub struct TimelineEngine {
    samples: Arc<SampleBuffer>,
    clock: PlaybackClock,
    frame: usize,
    pose: Pose,
    playing: bool,
    real_speed: bool,
}

impl TimelineEngine {
    pub fn new(samples: Arc<SampleBuffer>, now: Instant) -> Self {
        Self {
            samples,
            clock: PlaybackClock::new(now),
            frame: 0,
            pose: Pose::ORIGIN,
            playing: false,
            real_speed: false,
        }
    }

    /// Engine with no samples; every operation is a no-op
    pub fn empty(now: Instant) -> Self {
        Self::new(Arc::new(SampleBuffer::new()), now)
    }

    pub fn samples(&self) -> &SampleBuffer {
        &self.samples
    }

    pub fn has_data(&self) -> bool {
        !self.samples.is_empty()
    }

    /// Current frame counter, in `0..=frame_count()`
    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn frame_count(&self) -> usize {
        self.samples.len()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_real_speed(&self) -> bool {
        self.real_speed
    }

    pub fn status(&self) -> PlaybackStatus {
        if !self.has_data() {
            PlaybackStatus::NoData
        } else if !self.playing {
            PlaybackStatus::Paused
        } else if self.frame >= self.frame_count() {
            PlaybackStatus::Finished
        } else {
            PlaybackStatus::Playing
        }
    }

    /// Frame used for data reads, or `None` without data
    pub fn last_valid_index(&self) -> Option<usize> {
        let count = self.frame_count();
        if count == 0 {
            None
        } else if self.frame >= count {
            Some(count - 1)
        } else {
            Some(self.frame)
        }
    }

    /// Pose to draw
    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn current_velocity(&self) -> Velocity {
        self.last_valid_index()
            .map(|i| self.samples.at(i).velocity())
            .unwrap_or_default()
    }

    pub fn current_angular_velocity(&self) -> f64 {
        self.last_valid_index()
            .map(|i| self.samples.at(i).angular_vel)
            .unwrap_or(0.0)
    }

    /// Recorded time of the current frame in seconds, 0 without data
    pub fn current_time(&self) -> f64 {
        self.last_valid_index()
            .map(|i| self.samples.time_at(i))
            .unwrap_or(0.0)
    }

    /// Fraction of frames consumed, 0.0 to 1.0
    pub fn progress(&self) -> f32 {
        match self.frame_count() {
            0 => 0.0,
            count => self.frame as f32 / count as f32,
        }
    }

    /// Positions of every sample already passed
    pub fn trail(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        let (xs, ys) = self.samples.positions();
        let end = self.frame.min(xs.len());
        xs[..end].iter().copied().zip(ys[..end].iter().copied())
    }

    pub fn play(&mut self) {
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    pub fn toggle_playing(&mut self) {
        self.playing = !self.playing;
    }

    /// Switch between real-speed and free-run playback.
    ///
    /// The clock keeps its epoch, so real-speed timing is measured from the
    /// last reset rather than from this call.
    pub fn set_real_speed(&mut self, real: bool) {
        self.real_speed = real;
    }

    /// Rewind to the first frame and restart the clock at `now`
    pub fn reset(&mut self, now: Instant) {
        debug!("Timeline reset");
        self.frame = 0;
        self.pose = Pose::ORIGIN;
        self.clock.restart(now);
    }

    pub fn step_forward(&mut self) {
        self.seek(self.frame as i64 + 1);
    }

    pub fn step_backward(&mut self) {
        self.seek(self.frame as i64 - 1);
    }

    /// Jump to `target`, clamped to `0..=frame_count()`.
    ///
    /// Refreshes the pose from the new position without advancing.
    pub fn seek(&mut self, target: i64) {
        if !self.has_data() {
            return;
        }

        let count = self.frame_count();
        self.frame = target.clamp(0, count as i64) as usize;
        if let Some(index) = self.last_valid_index() {
            self.pose = self.samples.at(index).pose();
        }
        debug!("Seek to frame {}/{}", self.frame, count);
    }

    /// Advance playback for one display frame.
    ///
    /// Call at most once per display frame. In real-speed mode the current
    /// frame is only consumed once its recorded timestamp has elapsed on the
    /// clock; in free-run mode every call consumes one frame.
    pub fn tick(&mut self, now: Instant, advance: bool) {
        if !self.playing || self.frame >= self.frame_count() {
            return;
        }

        if self.real_speed && !self.clock.is_due(self.samples.time_at(self.frame), now) {
            return;
        }

        self.pose = self.samples.at(self.frame).pose();
        if advance {
            self.frame += 1;
        }
    }
}
