//! Shared test engine
//!
//! An in-memory [`AudioEngine`] whose clock is driven entirely by the test:
//! position and finish are set explicitly, loads can be held open behind a
//! gate, and any call can be made to fail on demand.

use async_trait::async_trait;
use muse_playback::{AudioEngine, EngineCallError, EngineStatus, LoadError, ResourceHandle};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

#[derive(Debug, Clone)]
struct Resource {
    uri: String,
    position: Duration,
    duration: Duration,
    playing: bool,
    finished: bool,
    volume: f32,
}

#[derive(Default)]
struct Inner {
    next_handle: u64,
    resources: HashMap<u64, Resource>,
    failing_uris: HashMap<String, String>,
    fail_next: HashMap<String, u32>,
    load_counts: HashMap<String, u32>,
    seek_counts: HashMap<String, u32>,
}

/// Scriptable engine for controller tests
#[derive(Default)]
pub struct FakeEngine {
    inner: Mutex<Inner>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
}

impl FakeEngine {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    // ===== Scripting =====

    /// Hold future loads of `uri` until [`Self::release_load`]
    pub fn hold_load(&self, uri: &str) {
        self.gates
            .lock()
            .unwrap()
            .insert(uri.to_string(), Arc::new(Notify::new()));
    }

    /// Let one held load of `uri` proceed
    pub fn release_load(&self, uri: &str) {
        if let Some(gate) = self.gates.lock().unwrap().get(uri) {
            gate.notify_one();
        }
    }

    /// Make loads of `uri` fail with `Unavailable(reason)`
    pub fn fail_load(&self, uri: &str, reason: &str) {
        self.inner
            .lock()
            .unwrap()
            .failing_uris
            .insert(uri.to_string(), reason.to_string());
    }

    /// Stop failing loads of `uri`
    pub fn heal_load(&self, uri: &str) {
        self.inner.lock().unwrap().failing_uris.remove(uri);
    }

    /// Make the next `count` calls of `operation` fail
    pub fn fail_next(&self, operation: &str, count: u32) {
        self.inner
            .lock()
            .unwrap()
            .fail_next
            .insert(operation.to_string(), count);
    }

    /// Move the playback clock of the resource backing `uri`
    pub fn set_progress(&self, uri: &str, position: Duration) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(res) = inner.resources.values_mut().find(|r| r.uri == uri) {
            res.position = position;
        }
    }

    /// Report the resource backing `uri` as finished
    pub fn finish(&self, uri: &str) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(res) = inner.resources.values_mut().find(|r| r.uri == uri) {
            res.position = res.duration;
            res.playing = false;
            res.finished = true;
        }
    }

    // ===== Inspection =====

    /// Number of handles that were loaded and never unloaded
    pub fn live_count(&self) -> usize {
        self.inner.lock().unwrap().resources.len()
    }

    /// The uri currently playing, if any
    pub fn playing_uri(&self) -> Option<String> {
        self.inner
            .lock()
            .unwrap()
            .resources
            .values()
            .find(|r| r.playing)
            .map(|r| r.uri.clone())
    }

    /// Whether any live handle backs `uri`
    pub fn is_live(&self, uri: &str) -> bool {
        self.inner
            .lock()
            .unwrap()
            .resources
            .values()
            .any(|r| r.uri == uri)
    }

    /// Volume applied to the resource backing `uri`
    pub fn volume_of(&self, uri: &str) -> Option<f32> {
        self.inner
            .lock()
            .unwrap()
            .resources
            .values()
            .find(|r| r.uri == uri)
            .map(|r| r.volume)
    }

    /// How many times `uri` was loaded
    pub fn load_count(&self, uri: &str) -> u32 {
        self.inner
            .lock()
            .unwrap()
            .load_counts
            .get(uri)
            .copied()
            .unwrap_or(0)
    }

    /// How many seeks hit the resource backing `uri`
    pub fn seek_count(&self, uri: &str) -> u32 {
        self.inner
            .lock()
            .unwrap()
            .seek_counts
            .get(uri)
            .copied()
            .unwrap_or(0)
    }

    fn take_failure(&self, operation: &str) -> bool {
        let mut inner = self.inner.lock().unwrap();
        match inner.fail_next.get_mut(operation) {
            Some(count) if *count > 0 => {
                *count -= 1;
                true
            }
            _ => false,
        }
    }
}

#[async_trait]
impl AudioEngine for FakeEngine {
    async fn load(&self, uri: &str) -> Result<ResourceHandle, LoadError> {
        let gate = self.gates.lock().unwrap().get(uri).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let mut inner = self.inner.lock().unwrap();
        *inner.load_counts.entry(uri.to_string()).or_insert(0) += 1;

        if let Some(reason) = inner.failing_uris.get(uri) {
            return Err(LoadError::Unavailable(reason.clone()));
        }

        inner.next_handle += 1;
        let handle = inner.next_handle;
        inner.resources.insert(
            handle,
            Resource {
                uri: uri.to_string(),
                position: Duration::ZERO,
                duration: Duration::from_secs(180),
                playing: false,
                finished: false,
                volume: 1.0,
            },
        );
        Ok(ResourceHandle(handle))
    }

    async fn unload(&self, handle: ResourceHandle) {
        self.inner.lock().unwrap().resources.remove(&handle.0);
    }

    async fn play(&self, handle: ResourceHandle) -> Result<(), EngineCallError> {
        if self.take_failure("play") {
            return Err(EngineCallError::new("play", "injected failure"));
        }
        let mut inner = self.inner.lock().unwrap();
        let res = inner
            .resources
            .get_mut(&handle.0)
            .ok_or_else(|| EngineCallError::new("play", "unknown handle"))?;
        res.playing = true;
        res.finished = false;
        Ok(())
    }

    async fn pause(&self, handle: ResourceHandle) -> Result<(), EngineCallError> {
        if self.take_failure("pause") {
            return Err(EngineCallError::new("pause", "injected failure"));
        }
        let mut inner = self.inner.lock().unwrap();
        let res = inner
            .resources
            .get_mut(&handle.0)
            .ok_or_else(|| EngineCallError::new("pause", "unknown handle"))?;
        res.playing = false;
        Ok(())
    }

    async fn seek(&self, handle: ResourceHandle, position: Duration) -> Result<(), EngineCallError> {
        if self.take_failure("seek") {
            return Err(EngineCallError::new("seek", "injected failure"));
        }
        let mut inner = self.inner.lock().unwrap();
        let res = inner
            .resources
            .get_mut(&handle.0)
            .ok_or_else(|| EngineCallError::new("seek", "unknown handle"))?;
        res.position = position.min(res.duration);
        res.finished = false;
        let uri = res.uri.clone();
        *inner.seek_counts.entry(uri).or_insert(0) += 1;
        Ok(())
    }

    async fn set_volume(&self, handle: ResourceHandle, volume: f32) -> Result<(), EngineCallError> {
        if self.take_failure("set_volume") {
            return Err(EngineCallError::new("set_volume", "injected failure"));
        }
        let mut inner = self.inner.lock().unwrap();
        let res = inner
            .resources
            .get_mut(&handle.0)
            .ok_or_else(|| EngineCallError::new("set_volume", "unknown handle"))?;
        res.volume = volume;
        Ok(())
    }

    async fn status(&self, handle: ResourceHandle) -> Result<EngineStatus, EngineCallError> {
        if self.take_failure("status") {
            return Err(EngineCallError::new("status", "injected failure"));
        }
        let inner = self.inner.lock().unwrap();
        let res = inner
            .resources
            .get(&handle.0)
            .ok_or_else(|| EngineCallError::new("status", "unknown handle"))?;
        Ok(EngineStatus {
            position: res.position,
            duration: res.duration,
            is_playing: res.playing,
            is_buffering: false,
            did_finish: res.finished,
        })
    }
}
