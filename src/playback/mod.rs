pub mod clock;
pub mod engine;

pub use clock::PlaybackClock;
pub use engine::TimelineEngine;

/// Playback status as shown in the HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStatus {
    /// No samples loaded
    NoData,
    Paused,
    Playing,
    /// Playing, but the frame counter sits past the last sample
    Finished,
}

impl PlaybackStatus {
    pub fn label(&self) -> &'static str {
        match self {
            PlaybackStatus::NoData => "No data",
            PlaybackStatus::Paused => "Paused",
            PlaybackStatus::Playing => "Playing",
            PlaybackStatus::Finished => "Finished",
        }
    }
}
