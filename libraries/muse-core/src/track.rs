//! Track types

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Unique track identifier within a catalog
pub type TrackId = i64;

/// An immutable catalog entry for one playable song
///
/// Supplied by the catalog layer; the playback core never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track identifier
    pub id: TrackId,

    /// Track title
    pub title: String,

    /// Remote URI of the audio resource
    ///
    /// Empty means the catalog has no playable source for this track yet.
    pub resource_uri: String,

    /// Catalog's duration estimate (zero when unknown before load)
    pub duration_hint: Duration,
}

impl Track {
    /// Create a new track
    pub fn new(id: TrackId, title: impl Into<String>, resource_uri: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            resource_uri: resource_uri.into(),
            duration_hint: Duration::ZERO,
        }
    }

    /// Set the catalog's duration hint
    #[must_use]
    pub fn with_duration_hint(mut self, hint: Duration) -> Self {
        self.duration_hint = hint;
        self
    }

    /// Check whether the track has a resolvable audio source
    pub fn has_source(&self) -> bool {
        !self.resource_uri.is_empty()
    }
}
