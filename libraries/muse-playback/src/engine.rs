//! Platform-agnostic audio engine trait
//!
//! Abstracts the native audio backend (a handle-based remote player on
//! mobile, anything equivalent elsewhere). The controller only ever talks
//! to the engine through this seam, so tests drive it with a scripted fake.

use crate::error::{EngineCallError, LoadError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Opaque handle to one loaded audio resource
///
/// Valid from the `load` that produced it until the matching `unload`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceHandle(pub u64);

/// Point-in-time status of a loaded resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineStatus {
    /// Current playback position
    pub position: Duration,

    /// Total resource duration (zero while still unknown)
    pub duration: Duration,

    /// Whether the engine is currently producing audio
    pub is_playing: bool,

    /// Whether the engine is stalled waiting for data
    pub is_buffering: bool,

    /// Terminal: the resource played to its end
    pub did_finish: bool,
}

/// Asynchronous audio backend
///
/// All methods are suspension points for the controller. Implementations
/// must tolerate calls for handles they already released (`unload` is the
/// only exception: it is always issued exactly once per live handle).
#[async_trait]
pub trait AudioEngine: Send + Sync {
    /// Load a remote audio resource
    ///
    /// Returns a live handle on success. The engine does not start playback;
    /// the controller issues `play` separately.
    async fn load(&self, uri: &str) -> Result<ResourceHandle, LoadError>;

    /// Release a loaded resource
    ///
    /// Infallible from the controller's point of view: a handle the engine
    /// no longer knows is simply ignored.
    async fn unload(&self, handle: ResourceHandle);

    /// Start or resume playback
    async fn play(&self, handle: ResourceHandle) -> Result<(), EngineCallError>;

    /// Pause playback, keeping the resource loaded
    async fn pause(&self, handle: ResourceHandle) -> Result<(), EngineCallError>;

    /// Seek to an absolute position
    async fn seek(&self, handle: ResourceHandle, position: Duration)
        -> Result<(), EngineCallError>;

    /// Set output volume (0.0..=1.0)
    async fn set_volume(&self, handle: ResourceHandle, volume: f32)
        -> Result<(), EngineCallError>;

    /// Query current status
    async fn status(&self, handle: ResourceHandle) -> Result<EngineStatus, EngineCallError>;
}
