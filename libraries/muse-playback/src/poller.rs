//! Playback status poller
//!
//! One polling task per installed resource. The task queries the engine on a
//! fixed cadence and feeds generation-tagged ticks back to the controller;
//! `did_finish` and status errors are terminal for the subscription. A new
//! resource gets a new subscription; the old task is aborted so no tick is
//! produced for a handle that no longer exists (late ticks already in the
//! channel are discarded by generation).

use crate::engine::{AudioEngine, EngineStatus};
use crate::error::EngineCallError;
use crate::loader::LoadedResource;
use muse_core::TrackId;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

/// One normalized status update, tagged with its resource generation
#[derive(Debug)]
pub(crate) struct StatusTick {
    pub generation: u64,
    pub track_id: TrackId,
    pub status: Result<EngineStatus, EngineCallError>,
}

/// Per-resource polling subscription
pub(crate) struct StatusPoller {
    engine: Arc<dyn AudioEngine>,
    ticks: mpsc::UnboundedSender<StatusTick>,
    interval: Duration,
    task: Option<JoinHandle<()>>,
}

impl StatusPoller {
    pub fn new(
        engine: Arc<dyn AudioEngine>,
        ticks: mpsc::UnboundedSender<StatusTick>,
        interval: Duration,
    ) -> Self {
        Self {
            engine,
            ticks,
            interval,
            task: None,
        }
    }

    /// Start polling `resource`, replacing any previous subscription
    pub fn watch(&mut self, resource: &LoadedResource) {
        self.stop();

        let engine = Arc::clone(&self.engine);
        let ticks = self.ticks.clone();
        let interval = self.interval;
        let handle = resource.handle;
        let generation = resource.generation;
        let track_id = resource.track_id;

        debug!(track_id, generation, "starting status subscription");

        self.task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;

                match engine.status(handle).await {
                    Ok(status) => {
                        let finished = status.did_finish;
                        let sent = ticks.send(StatusTick {
                            generation,
                            track_id,
                            status: Ok(status),
                        });
                        if sent.is_err() || finished {
                            break;
                        }
                    }
                    Err(err) => {
                        let _ = ticks.send(StatusTick {
                            generation,
                            track_id,
                            status: Err(err),
                        });
                        break;
                    }
                }
            }
        }));
    }

    /// Cancel the active subscription, if any
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for StatusPoller {
    fn drop(&mut self) {
        self.stop();
    }
}
