//! Error types for the playback core

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure to resolve a track into a playable resource
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// Track has no resolvable resource URI
    ///
    /// Not retryable without supplying a corrected track.
    #[error("track has no playable source")]
    MissingSource,

    /// Network, codec, or format failure
    ///
    /// Retryable by re-issuing `play_track` with the same track.
    #[error("audio source unavailable: {0}")]
    Unavailable(String),
}

/// Transient failure of an engine call (play/pause/seek/volume/status)
///
/// Never unloads the current resource; the affected feature degrades while
/// playback continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("engine {operation} failed: {reason}")]
pub struct EngineCallError {
    /// The engine operation that failed
    pub operation: String,

    /// Backend-supplied reason
    pub reason: String,
}

impl EngineCallError {
    /// Create a new engine call error
    pub fn new(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            reason: reason.into(),
        }
    }
}

/// Severity of a published playback issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueSeverity {
    /// The in-flight attempt was torn down; playback did not start
    Fatal,

    /// A feature degraded; playback continues
    Warning,
}

/// Error surfaced to UI consumers through `PlaybackState.error`
///
/// Dismissable by the UI without affecting playback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackIssue {
    /// How severe the issue is
    pub severity: IssueSeverity,

    /// Human-readable description
    pub message: String,

    /// Whether re-issuing the failed command can succeed
    pub retryable: bool,
}

impl PlaybackIssue {
    /// Check whether this issue stopped playback
    pub fn is_fatal(&self) -> bool {
        self.severity == IssueSeverity::Fatal
    }
}

impl From<&LoadError> for PlaybackIssue {
    fn from(err: &LoadError) -> Self {
        Self {
            severity: IssueSeverity::Fatal,
            message: err.to_string(),
            retryable: matches!(err, LoadError::Unavailable(_)),
        }
    }
}

impl From<&EngineCallError> for PlaybackIssue {
    fn from(err: &EngineCallError) -> Self {
        Self {
            severity: IssueSeverity::Warning,
            message: err.to_string(),
            retryable: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_errors_map_to_fatal_issues() {
        let issue = PlaybackIssue::from(&LoadError::Unavailable("timeout".to_string()));
        assert!(issue.is_fatal());
        assert!(issue.retryable);

        let issue = PlaybackIssue::from(&LoadError::MissingSource);
        assert!(issue.is_fatal());
        assert!(!issue.retryable);
    }

    #[test]
    fn engine_errors_map_to_warnings() {
        let issue = PlaybackIssue::from(&EngineCallError::new("seek", "device busy"));
        assert!(!issue.is_fatal());
        assert!(issue.message.contains("seek"));
    }
}
