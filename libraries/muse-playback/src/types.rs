//! Core types for the playback controller

use crate::error::PlaybackIssue;
use muse_core::Track;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Repeat mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepeatMode {
    /// Stop when the queue ends
    #[default]
    Off,

    /// Loop the current track only
    One,

    /// Loop the entire queue
    All,
}

/// Configuration for the playback controller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Status poll cadence (default: 1s; a tunable, not a contract)
    pub tick_interval: Duration,

    /// Initial volume (0.0..=1.0, default: 1.0)
    pub volume: f32,

    /// Initial repeat mode (default: Off)
    pub repeat: RepeatMode,

    /// Initial shuffle flag (default: off)
    pub shuffle: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(1),
            volume: 1.0,
            repeat: RepeatMode::Off,
            shuffle: false,
        }
    }
}

/// Committed playback state published to UI consumers
///
/// Owned exclusively by the controller; every field reflects either a
/// completed command or a status tick from the engine. Scrub previews never
/// touch this - see [`ScrubState`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackState {
    /// The nominal current track (kept through load failures so a retry can
    /// reuse it)
    pub track: Option<Track>,

    /// Whether audio is audibly playing
    pub is_playing: bool,

    /// Whether a resource load is in flight
    pub is_loading: bool,

    /// Whether the engine is stalled (or a seek is in flight)
    pub is_buffering: bool,

    /// Committed playback position
    pub position: Duration,

    /// Track duration (zero until the engine reports one)
    pub duration: Duration,

    /// Output volume (0.0..=1.0)
    pub volume: f32,

    /// Most recent undismissed issue, if any
    pub error: Option<PlaybackIssue>,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            track: None,
            is_playing: false,
            is_loading: false,
            is_buffering: false,
            position: Duration::ZERO,
            duration: Duration::ZERO,
            volume: 1.0,
            error: None,
        }
    }
}

impl PlaybackState {
    /// Committed progress through the track, in percent
    ///
    /// Defined only when the duration is known; zero otherwise.
    pub fn progress_percent(&self) -> f32 {
        if self.duration.is_zero() {
            return 0.0;
        }
        let percent = self.position.as_secs_f32() / self.duration.as_secs_f32() * 100.0;
        percent.clamp(0.0, 100.0)
    }
}

/// Queue cursor view for rendering "track 3 of 12" and mode icons
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueView {
    /// Position of the current track (None when the queue is empty)
    pub current_index: Option<usize>,

    /// Total queue length
    pub len: usize,

    /// Whether shuffle is active
    pub shuffle: bool,

    /// Active repeat mode
    pub repeat: RepeatMode,
}

/// Ephemeral scrub session state
///
/// While a drag is active the UI reads `preview_percent` instead of the
/// committed progress; the committed position is untouched until release.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrubState {
    /// Whether a drag gesture is in progress
    pub is_scrubbing: bool,

    /// Raw gesture value (0..=100), meaningful only while scrubbing
    pub preview_percent: f32,
}

/// Complete observable player state
///
/// Composed of the committed [`PlaybackState`], the [`QueueView`], and the
/// ephemeral [`ScrubState`], merged only at this read boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PlayerState {
    /// Committed playback state
    pub playback: PlaybackState,

    /// Queue cursor and modes
    pub queue: QueueView,

    /// Scrub preview, if a drag is active
    pub scrub: ScrubState,
}

impl PlayerState {
    /// The progress value the seek bar should render
    ///
    /// Preview while scrubbing, committed progress otherwise.
    pub fn display_percent(&self) -> f32 {
        if self.scrub.is_scrubbing {
            self.scrub.preview_percent
        } else {
            self.playback.progress_percent()
        }
    }

    /// The position the time label should render
    pub fn display_position(&self) -> Duration {
        if self.scrub.is_scrubbing {
            self.playback
                .duration
                .mul_f32(self.scrub.preview_percent / 100.0)
        } else {
            self.playback.position
        }
    }
}
