//! Scrub session state machine
//!
//! Decouples the user's drag preview from the committed playback position.
//! While a drag is active the preview tracks the raw gesture value; exactly
//! one seek is committed, on release. A track change mid-drag discards the
//! session (the new track's duration makes the old preview meaningless).

use crate::types::ScrubState;

/// Scrub gesture session
///
/// Idle between gestures; Dragging while the user holds the seek control.
/// The commit happens in [`Self::end`], which returns the single percent
/// value to seek to.
#[derive(Debug, Clone, Default)]
pub struct ScrubSession {
    dragging: bool,
    preview_percent: f32,
}

impl ScrubSession {
    /// Start a drag, seeding the preview from the committed progress
    pub fn begin(&mut self, current_percent: f32) {
        self.dragging = true;
        self.preview_percent = current_percent.clamp(0.0, 100.0);
    }

    /// Track the raw gesture value; ignored when no drag is active
    pub fn update(&mut self, percent: f32) {
        if self.dragging {
            self.preview_percent = percent.clamp(0.0, 100.0);
        }
    }

    /// End the drag and return the percent to commit
    ///
    /// Returns `None` when no drag was active (e.g. the session was reset by
    /// a track change before the gesture ended).
    pub fn end(&mut self, percent: f32) -> Option<f32> {
        if !self.dragging {
            return None;
        }

        self.dragging = false;
        self.preview_percent = 0.0;
        Some(percent.clamp(0.0, 100.0))
    }

    /// Forcibly drop the session (track changed mid-drag)
    pub fn reset(&mut self) {
        self.dragging = false;
        self.preview_percent = 0.0;
    }

    /// Whether a drag is in progress
    pub fn is_scrubbing(&self) -> bool {
        self.dragging
    }

    /// Snapshot for the published state
    pub fn state(&self) -> ScrubState {
        ScrubState {
            is_scrubbing: self.dragging,
            preview_percent: self.preview_percent,
        }
    }
}
