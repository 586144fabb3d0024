//! Queue manager
//!
//! Owns the ordered playlist, the cursor, the shuffle flag, and the repeat
//! mode, and computes next/previous selection. Navigation is index-based and
//! non-destructive: tracks stay in place, only the cursor moves.
//!
//! Playlist edits re-anchor the cursor to the current track's id rather than
//! its raw index, so an edit never silently jumps playback to a different
//! song.

use crate::shuffle::ShuffleCycle;
use crate::types::{QueueView, RepeatMode};
use muse_core::{Track, TrackId};

/// Ordered, deduplicated playlist with cursor and playback modes
#[derive(Debug, Clone)]
pub struct TrackQueue {
    /// Playlist tracks (no duplicate ids)
    tracks: Vec<Track>,

    /// Index of the current track; meaningful only when non-empty
    cursor: usize,

    /// Active repeat mode
    repeat: RepeatMode,

    /// Shuffle cycle; `Some` iff shuffle is on and the queue is non-empty
    shuffle: Option<ShuffleCycle>,

    /// Requested shuffle flag (survives an empty queue)
    shuffle_on: bool,
}

impl TrackQueue {
    /// Create an empty queue
    pub fn new(shuffle: bool, repeat: RepeatMode) -> Self {
        Self {
            tracks: Vec::new(),
            cursor: 0,
            repeat,
            shuffle: None,
            shuffle_on: shuffle,
        }
    }

    // ===== Navigation =====

    /// The current track, if the queue is non-empty
    pub fn current(&self) -> Option<&Track> {
        self.tracks.get(self.cursor)
    }

    /// Select the next track
    ///
    /// Repeat One returns the current track (the caller restarts it).
    /// At the last position, Repeat All wraps to the start; Repeat Off
    /// returns `None` - the stop condition.
    pub fn next(&mut self) -> Option<Track> {
        if self.tracks.is_empty() {
            return None;
        }

        if self.repeat == RepeatMode::One {
            return self.current().cloned();
        }

        if let Some(cycle) = self.shuffle.as_mut() {
            if let Some(index) = cycle.advance() {
                self.cursor = index;
            } else if self.repeat == RepeatMode::All {
                self.cursor = cycle.wrap_forward();
            } else {
                return None;
            }
        } else if self.cursor + 1 < self.tracks.len() {
            self.cursor += 1;
        } else if self.repeat == RepeatMode::All {
            self.cursor = 0;
        } else {
            return None;
        }

        self.current().cloned()
    }

    /// Select the previous track
    ///
    /// Mirrors [`Self::next`], but going before the start is not a stop
    /// condition: without Repeat All the cursor clamps at the first track.
    pub fn previous(&mut self) -> Option<Track> {
        if self.tracks.is_empty() {
            return None;
        }

        if self.repeat == RepeatMode::One {
            return self.current().cloned();
        }

        if let Some(cycle) = self.shuffle.as_mut() {
            if let Some(index) = cycle.rewind() {
                self.cursor = index;
            } else if self.repeat == RepeatMode::All {
                self.cursor = cycle.wrap_back();
            }
            // else: clamp at the cycle's first stop
        } else if self.cursor > 0 {
            self.cursor -= 1;
        } else if self.repeat == RepeatMode::All {
            self.cursor = self.tracks.len() - 1;
        }
        // else: clamp at index 0

        self.current().cloned()
    }

    // ===== Mutation =====

    /// Replace the playlist wholesale
    ///
    /// Duplicate ids are dropped (first occurrence wins). The cursor anchors
    /// to `anchor` when that id is present, otherwise to the first track.
    pub fn replace(&mut self, mut tracks: Vec<Track>, anchor: Option<TrackId>) {
        let mut seen = std::collections::HashSet::new();
        tracks.retain(|t| seen.insert(t.id));

        self.tracks = tracks;
        self.cursor = anchor
            .and_then(|id| self.position_of(id))
            .unwrap_or(0);
        self.rebuild_cycle();
    }

    /// Make `track` the current track, appending it if absent
    ///
    /// Covers "play this song" without an explicit playlist: an empty queue
    /// becomes a single-track playlist; a non-empty one gains the track at
    /// the end if it is not already there.
    pub fn anchor(&mut self, track: &Track) {
        if let Some(index) = self.position_of(track.id) {
            self.cursor = index;
            self.rebuild_cycle();
            return;
        }

        self.tracks.push(track.clone());
        self.cursor = self.tracks.len() - 1;
        self.rebuild_cycle();
    }

    /// Append a track; no-op if its id is already queued
    pub fn enqueue(&mut self, track: Track) -> bool {
        if self.position_of(track.id).is_some() {
            return false;
        }

        self.tracks.push(track);
        if self.tracks.len() == 1 {
            self.cursor = 0;
            self.rebuild_cycle();
        } else if let Some(cycle) = self.shuffle.as_mut() {
            cycle.insert_appended(self.tracks.len() - 1);
        }
        true
    }

    /// Remove a track by id
    ///
    /// Removing a non-current track re-anchors the cursor by id; removing
    /// the current one clamps the cursor to the nearest valid index.
    pub fn dequeue(&mut self, id: TrackId) -> Option<Track> {
        let index = self.position_of(id)?;
        let removed = self.tracks.remove(index);

        if self.tracks.is_empty() {
            self.cursor = 0;
            self.shuffle = None;
        } else if let Some(cycle) = self.shuffle.as_mut() {
            cycle.remove_index(index);
            self.cursor = cycle.current();
        } else if index < self.cursor {
            self.cursor -= 1;
        } else if self.cursor >= self.tracks.len() {
            self.cursor = self.tracks.len() - 1;
        }

        Some(removed)
    }

    /// Clear the playlist
    pub fn clear(&mut self) {
        self.tracks.clear();
        self.cursor = 0;
        self.shuffle = None;
    }

    // ===== Modes =====

    /// Set the repeat mode
    pub fn set_repeat(&mut self, mode: RepeatMode) {
        self.repeat = mode;
    }

    /// Toggle shuffle; returns the new flag
    ///
    /// Turning shuffle on anchors a fresh cycle at the current track.
    pub fn toggle_shuffle(&mut self) -> bool {
        self.shuffle_on = !self.shuffle_on;
        self.rebuild_cycle();
        self.shuffle_on
    }

    // ===== Queries =====

    /// Number of queued tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Check if the queue is empty
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// All queued tracks in playlist order
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Cursor snapshot for UI consumers
    pub fn view(&self) -> QueueView {
        QueueView {
            current_index: (!self.tracks.is_empty()).then_some(self.cursor),
            len: self.tracks.len(),
            shuffle: self.shuffle_on,
            repeat: self.repeat,
        }
    }

    fn position_of(&self, id: TrackId) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == id)
    }

    fn rebuild_cycle(&mut self) {
        self.shuffle = (self.shuffle_on && !self.tracks.is_empty())
            .then(|| ShuffleCycle::new(self.tracks.len(), self.cursor));
    }
}

impl Default for TrackQueue {
    fn default() -> Self {
        Self::new(false, RepeatMode::Off)
    }
}
