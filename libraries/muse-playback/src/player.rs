//! Public player handle
//!
//! [`Player`] is a cheap, cloneable front for the controller task. Commands
//! are fire-and-forget sends; their effects show up in the state stream.

use crate::controller::{Command, Controller};
use crate::engine::AudioEngine;
use crate::types::{PlaybackConfig, PlayerState, RepeatMode};
use muse_core::{Track, TrackId};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

/// Handle to a running playback controller
///
/// Cloning shares the same controller. The controller task exits once every
/// clone has been dropped, unloading whatever resource it still holds.
#[derive(Clone)]
pub struct Player {
    commands: mpsc::UnboundedSender<Command>,
    state: watch::Receiver<PlayerState>,
}

impl Player {
    /// Spawn a controller over `engine` and return its handle
    ///
    /// Must be called within a Tokio runtime.
    pub fn new(engine: Arc<dyn AudioEngine>, config: PlaybackConfig) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(PlayerState::default());

        let controller = Controller::new(engine, &config, command_rx, state_tx);
        tokio::spawn(controller.run());

        Self {
            commands: command_tx,
            state: state_rx,
        }
    }

    // ===== Transport =====

    /// Play `track`, keeping the current queue
    ///
    /// The track is appended to the queue if it is not already there.
    pub fn play_track(&self, track: Track) {
        self.send(Command::PlayTrack {
            track,
            playlist: None,
        });
    }

    /// Play `track` in the context of `playlist`, replacing the queue
    pub fn play_in_playlist(&self, track: Track, playlist: Vec<Track>) {
        self.send(Command::PlayTrack {
            track,
            playlist: Some(playlist),
        });
    }

    /// Toggle between playing and paused
    pub fn toggle_play_pause(&self) {
        self.send(Command::TogglePlayPause);
    }

    /// Skip to the next track per the queue's repeat and shuffle modes
    pub fn next(&self) {
        self.send(Command::Next);
    }

    /// Skip to the previous track
    pub fn previous(&self) {
        self.send(Command::Previous);
    }

    /// Seek to a percentage (0..=100) of the track duration
    pub fn seek(&self, percent: f32) {
        self.send(Command::Seek(percent));
    }

    /// Set the output volume (0.0..=1.0)
    pub fn set_volume(&self, volume: f32) {
        self.send(Command::SetVolume(volume));
    }

    // ===== Queue =====

    /// Set the repeat mode
    pub fn set_repeat(&self, mode: RepeatMode) {
        self.send(Command::SetRepeat(mode));
    }

    /// Toggle shuffle
    pub fn toggle_shuffle(&self) {
        self.send(Command::ToggleShuffle);
    }

    /// Append a track to the queue; duplicates are ignored
    pub fn enqueue(&self, track: Track) {
        self.send(Command::Enqueue(track));
    }

    /// Remove a track from the queue by id
    pub fn dequeue(&self, id: TrackId) {
        self.send(Command::Dequeue(id));
    }

    /// Clear the queue and stop playback
    pub fn clear_queue(&self) {
        self.send(Command::ClearQueue);
    }

    // ===== Scrubbing =====

    /// Start a scrub gesture on the seek bar
    pub fn begin_scrub(&self) {
        self.send(Command::BeginScrub);
    }

    /// Update the scrub preview with the raw gesture value
    pub fn update_scrub(&self, percent: f32) {
        self.send(Command::UpdateScrub(percent));
    }

    /// End the scrub gesture, committing a single seek
    pub fn end_scrub(&self, percent: f32) {
        self.send(Command::EndScrub(percent));
    }

    // ===== Lifecycle =====

    /// Dismiss the published error, if any
    pub fn dismiss_error(&self) {
        self.send(Command::DismissError);
    }

    /// Notify the controller that the app returned to the foreground
    pub fn on_foreground(&self) {
        self.send(Command::Foregrounded);
    }

    /// Notify the controller that the app moved to the background
    pub fn on_background(&self) {
        self.send(Command::Backgrounded);
    }

    // ===== Observation =====

    /// The latest published state snapshot
    pub fn state(&self) -> PlayerState {
        self.state.borrow().clone()
    }

    /// Subscribe to state changes
    pub fn subscribe(&self) -> watch::Receiver<PlayerState> {
        self.state.clone()
    }

    fn send(&self, cmd: Command) {
        // A closed channel means the controller is gone; the command is moot
        let _ = self.commands.send(cmd);
    }
}
