//! Track resource loader
//!
//! Owns the load/unload lifecycle for exactly one resource at a time. Loads
//! run as spawned tasks; their outcomes come back to the controller tagged
//! with a generation number, and anything tagged with a superseded
//! generation is unloaded on arrival instead of installed.

use crate::engine::{AudioEngine, ResourceHandle};
use crate::error::LoadError;
use muse_core::{Track, TrackId};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

/// Completion of a spawned load, tagged with its generation
#[derive(Debug)]
pub(crate) struct LoadOutcome {
    pub generation: u64,
    pub track_id: TrackId,
    pub result: Result<ResourceHandle, LoadError>,
}

/// The single live resource
#[derive(Debug, Clone, Copy)]
pub(crate) struct LoadedResource {
    pub handle: ResourceHandle,
    pub track_id: TrackId,
    pub generation: u64,
}

/// What became of a load outcome
#[derive(Debug)]
pub(crate) enum Resolution {
    /// Outcome belonged to a superseded load; handle (if any) was unloaded
    Stale,

    /// The resource is installed as current
    Installed,

    /// The current-generation load failed
    Failed(LoadError),
}

/// Loader enforcing the at-most-one-resource invariant
pub(crate) struct ResourceLoader {
    engine: Arc<dyn AudioEngine>,
    outcomes: mpsc::UnboundedSender<LoadOutcome>,
    current: Option<LoadedResource>,
    generation: u64,
}

impl ResourceLoader {
    pub fn new(engine: Arc<dyn AudioEngine>, outcomes: mpsc::UnboundedSender<LoadOutcome>) -> Self {
        Self {
            engine,
            outcomes,
            current: None,
            generation: 0,
        }
    }

    /// Begin loading `track`, superseding any current or in-flight resource
    ///
    /// The previous resource is always unloaded and any in-flight load
    /// invalidated, even when the request itself is rejected: a rejected
    /// track still replaces whatever was playing. Returns the new
    /// generation, or `Err(MissingSource)` when the track has no resource
    /// URI.
    pub fn request(&mut self, track: &Track) -> Result<u64, LoadError> {
        self.generation += 1;
        let generation = self.generation;
        self.unload_current();

        if !track.has_source() {
            return Err(LoadError::MissingSource);
        }

        debug!(track_id = track.id, generation, "loading track resource");

        let engine = Arc::clone(&self.engine);
        let outcomes = self.outcomes.clone();
        let uri = track.resource_uri.clone();
        let track_id = track.id;
        tokio::spawn(async move {
            let result = engine.load(&uri).await;
            // Receiver gone means the controller shut down; release the
            // handle so nothing leaks.
            if let Err(unsent) = outcomes.send(LoadOutcome {
                generation,
                track_id,
                result,
            }) {
                if let Ok(handle) = unsent.0.result {
                    engine.unload(handle).await;
                }
            }
        });

        Ok(generation)
    }

    /// Apply a load outcome, discarding it when superseded
    pub fn resolve(&mut self, outcome: LoadOutcome) -> Resolution {
        if outcome.generation != self.generation {
            debug!(
                generation = outcome.generation,
                current = self.generation,
                "discarding superseded load outcome"
            );
            if let Ok(handle) = outcome.result {
                self.spawn_unload(handle);
            }
            return Resolution::Stale;
        }

        match outcome.result {
            Ok(handle) => {
                debug_assert!(self.current.is_none(), "resource installed twice");
                self.current = Some(LoadedResource {
                    handle,
                    track_id: outcome.track_id,
                    generation: outcome.generation,
                });
                Resolution::Installed
            }
            Err(err) => Resolution::Failed(err),
        }
    }

    /// Tear down to nothing loaded and nothing in flight
    ///
    /// Bumps the generation so an in-flight load resolves as stale (and is
    /// unloaded on arrival) instead of installing into an idle player.
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.unload_current();
    }

    /// Unload the current resource, if any
    pub fn unload_current(&mut self) {
        if let Some(resource) = self.current.take() {
            debug!(track_id = resource.track_id, "unloading resource");
            self.spawn_unload(resource.handle);
        }
    }

    /// The installed resource, if any
    pub fn current(&self) -> Option<&LoadedResource> {
        self.current.as_ref()
    }

    fn spawn_unload(&self, handle: ResourceHandle) {
        let engine = Arc::clone(&self.engine);
        tokio::spawn(async move {
            engine.unload(handle).await;
        });
    }
}
