//! Muse Player - Playback Control
//!
//! Engine-agnostic playback control for Muse Player.
//!
//! This crate provides:
//! - A single global player with play/pause, next/previous, and seek
//! - Queue management (replace, enqueue, dequeue, clear)
//! - Repeat modes (Off, One, All)
//! - Once-per-cycle shuffle
//! - Scrub preview decoupled from the committed position
//! - Volume control (0.0 to 1.0, reapplied across track loads)
//! - A watch-based state stream for UI consumers
//!
//! # Architecture
//!
//! All state lives in one controller task. Commands, load completions, and
//! status ticks arrive over channels and are applied in order, so there is
//! never a lock around playback state and never more than one loaded
//! resource. The audio backend is provided via the [`AudioEngine`] trait;
//! the crate itself does no decoding or output.
//!
//! # Example
//!
//! ```rust,no_run
//! use muse_playback::{AudioEngine, PlaybackConfig, Player, RepeatMode, Track};
//! use std::sync::Arc;
//!
//! # async fn example(engine: Arc<dyn AudioEngine>) {
//! // `engine` wraps your platform's audio backend
//! let player = Player::new(engine, PlaybackConfig::default());
//!
//! let track = Track::new(1, "Voyager", "https://cdn.example/voyager.mp3");
//! let album = vec![
//!     track.clone(),
//!     Track::new(2, "Horizon", "https://cdn.example/horizon.mp3"),
//! ];
//!
//! player.play_in_playlist(track, album);
//! player.set_repeat(RepeatMode::All);
//!
//! // React to state changes
//! let mut states = player.subscribe();
//! while states.changed().await.is_ok() {
//!     let state = states.borrow().clone();
//!     println!("{:>5.1}%", state.display_percent());
//! }
//! # }
//! ```

mod controller;
mod engine;
mod error;
mod loader;
mod player;
mod poller;
mod queue;
mod scrub;
mod shuffle;
pub mod types;

// Public exports
pub use engine::{AudioEngine, EngineStatus, ResourceHandle};
pub use error::{EngineCallError, IssueSeverity, LoadError, PlaybackIssue};
pub use muse_core::{Track, TrackId};
pub use player::Player;
pub use queue::TrackQueue;
pub use scrub::ScrubSession;
pub use types::{PlaybackConfig, PlaybackState, PlayerState, QueueView, RepeatMode, ScrubState};
