//! Playback controller event loop
//!
//! The controller is the single writer of all playback state. It owns the
//! loader, the poller, the queue, and the scrub session, and it runs one
//! task that merges three inputs: UI commands, load outcomes, and status
//! ticks. Engine calls that settle quickly (play, pause, seek, volume,
//! status) are awaited inline; loads and unloads run as spawned tasks so a
//! stalled network fetch never wedges the loop.
//!
//! State leaves the loop through a watch channel; consumers only ever see
//! complete [`PlayerState`] snapshots.

use crate::engine::AudioEngine;
use crate::error::PlaybackIssue;
use crate::loader::{LoadOutcome, Resolution, ResourceLoader};
use crate::poller::{StatusPoller, StatusTick};
use crate::queue::TrackQueue;
use crate::scrub::ScrubSession;
use crate::types::{PlaybackConfig, PlaybackState, PlayerState, RepeatMode};
use muse_core::{Track, TrackId};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

/// Commands accepted by the controller
#[derive(Debug)]
pub(crate) enum Command {
    /// Start playing `track`, optionally replacing the queue with `playlist`
    PlayTrack {
        track: Track,
        playlist: Option<Vec<Track>>,
    },
    TogglePlayPause,
    Next,
    Previous,
    /// Seek to a percentage of the track duration
    Seek(f32),
    SetVolume(f32),
    SetRepeat(RepeatMode),
    ToggleShuffle,
    Enqueue(Track),
    Dequeue(TrackId),
    ClearQueue,
    BeginScrub,
    UpdateScrub(f32),
    EndScrub(f32),
    DismissError,
    Foregrounded,
    Backgrounded,
}

/// The state-owning event loop behind [`crate::Player`]
pub(crate) struct Controller {
    engine: Arc<dyn AudioEngine>,
    loader: ResourceLoader,
    poller: StatusPoller,
    queue: TrackQueue,
    scrub: ScrubSession,
    playback: PlaybackState,
    state_tx: watch::Sender<PlayerState>,
    commands: mpsc::UnboundedReceiver<Command>,
    outcomes: mpsc::UnboundedReceiver<LoadOutcome>,
    ticks: mpsc::UnboundedReceiver<StatusTick>,
}

impl Controller {
    pub fn new(
        engine: Arc<dyn AudioEngine>,
        config: &PlaybackConfig,
        commands: mpsc::UnboundedReceiver<Command>,
        state_tx: watch::Sender<PlayerState>,
    ) -> Self {
        let (outcome_tx, outcomes) = mpsc::unbounded_channel();
        let (tick_tx, ticks) = mpsc::unbounded_channel();

        let playback = PlaybackState {
            volume: config.volume.clamp(0.0, 1.0),
            ..PlaybackState::default()
        };

        Self {
            loader: ResourceLoader::new(Arc::clone(&engine), outcome_tx),
            poller: StatusPoller::new(Arc::clone(&engine), tick_tx, config.tick_interval),
            engine,
            queue: TrackQueue::new(config.shuffle, config.repeat),
            scrub: ScrubSession::default(),
            playback,
            state_tx,
            commands,
            outcomes,
            ticks,
        }
    }

    /// Run until every command sender is dropped
    pub async fn run(mut self) {
        self.publish();

        loop {
            tokio::select! {
                cmd = self.commands.recv() => match cmd {
                    Some(cmd) => self.handle_command(cmd).await,
                    None => break,
                },
                Some(outcome) = self.outcomes.recv() => self.handle_outcome(outcome).await,
                Some(tick) = self.ticks.recv() => self.handle_tick(tick).await,
            }
        }

        debug!("controller shutting down");
        self.poller.stop();
        self.loader.unload_current();
    }

    async fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::PlayTrack { track, playlist } => self.play_track(track, playlist),
            Command::TogglePlayPause => self.toggle_play_pause().await,
            Command::Next => self.skip_next(),
            Command::Previous => self.skip_previous(),
            Command::Seek(percent) => self.seek_percent(percent).await,
            Command::SetVolume(volume) => self.set_volume(volume).await,
            Command::SetRepeat(mode) => {
                self.queue.set_repeat(mode);
                self.publish();
            }
            Command::ToggleShuffle => {
                let on = self.queue.toggle_shuffle();
                debug!(shuffle = on, "shuffle toggled");
                self.publish();
            }
            Command::Enqueue(track) => {
                if self.queue.enqueue(track) {
                    self.publish();
                }
            }
            Command::Dequeue(id) => {
                if self.queue.dequeue(id).is_some() {
                    self.publish();
                }
            }
            Command::ClearQueue => {
                self.queue.clear();
                self.stop_idle();
            }
            Command::BeginScrub => {
                self.scrub.begin(self.playback.progress_percent());
                self.publish();
            }
            Command::UpdateScrub(percent) => {
                self.scrub.update(percent);
                self.publish();
            }
            Command::EndScrub(percent) => self.end_scrub(percent).await,
            Command::DismissError => {
                self.playback.error = None;
                self.publish();
            }
            Command::Foregrounded => self.foregrounded().await,
            Command::Backgrounded => {
                // Playback and polling continue in the background; the next
                // foreground transition re-syncs against the engine.
                debug!("app backgrounded");
            }
        }
    }

    // ===== Track lifecycle =====

    fn play_track(&mut self, track: Track, playlist: Option<Vec<Track>>) {
        if let Some(tracks) = playlist {
            self.queue.replace(tracks, Some(track.id));
        }
        // Anchoring appends the track when the playlist does not contain it
        self.queue.anchor(&track);
        self.start_track(track);
    }

    /// Begin loading `track` and reset the committed state around it
    fn start_track(&mut self, track: Track) {
        self.poller.stop();
        self.scrub.reset();

        self.playback.error = None;
        self.playback.is_playing = false;
        self.playback.is_buffering = false;
        self.playback.position = Duration::ZERO;
        self.playback.duration = track.duration_hint;
        self.playback.track = Some(track.clone());

        match self.loader.request(&track) {
            Ok(generation) => {
                debug!(track_id = track.id, generation, "track load requested");
                self.playback.is_loading = true;
            }
            Err(err) => {
                warn!(track_id = track.id, %err, "track rejected");
                self.playback.is_loading = false;
                self.playback.error = Some(PlaybackIssue::from(&err));
            }
        }

        self.publish();
    }

    async fn handle_outcome(&mut self, outcome: LoadOutcome) {
        match self.loader.resolve(outcome) {
            Resolution::Stale => {}
            Resolution::Installed => {
                self.playback.is_loading = false;

                let Some(resource) = self.loader.current().copied() else {
                    return;
                };

                // The engine starts resources at its own default volume
                if let Err(err) = self
                    .engine
                    .set_volume(resource.handle, self.playback.volume)
                    .await
                {
                    warn!(%err, "volume apply failed");
                }

                match self.engine.play(resource.handle).await {
                    Ok(()) => self.playback.is_playing = true,
                    Err(err) => {
                        warn!(track_id = resource.track_id, %err, "playback start failed");
                        self.playback.error = Some(PlaybackIssue::from(&err));
                        self.playback.is_playing = false;
                    }
                }

                self.poller.watch(&resource);
                self.publish();
            }
            Resolution::Failed(err) => {
                warn!(%err, "track load failed");
                self.playback.is_loading = false;
                self.playback.is_playing = false;
                self.playback.error = Some(PlaybackIssue::from(&err));
                self.publish();
            }
        }
    }

    async fn handle_tick(&mut self, tick: StatusTick) {
        let Some(resource) = self.loader.current().copied() else {
            return;
        };
        if tick.generation != resource.generation {
            return;
        }

        match tick.status {
            Ok(status) => {
                self.playback.position = status.position;
                if !status.duration.is_zero() {
                    self.playback.duration = status.duration;
                }
                self.playback.is_playing = status.is_playing;
                self.playback.is_buffering = status.is_buffering;

                if status.did_finish {
                    debug!(track_id = resource.track_id, "track finished");
                    self.handle_track_end();
                } else {
                    self.publish();
                }
            }
            Err(err) => {
                warn!(track_id = resource.track_id, %err, "status poll failed");
                self.playback.error = Some(PlaybackIssue::from(&err));
                self.publish();
            }
        }
    }

    /// Natural end of track: advance per the repeat mode or go idle
    fn handle_track_end(&mut self) {
        match self.queue.next() {
            Some(track) => self.start_track(track),
            None => self.stop_idle(),
        }
    }

    /// Tear down to the idle state: nothing loaded, nothing in flight
    fn stop_idle(&mut self) {
        self.poller.stop();
        self.loader.cancel();
        self.scrub.reset();

        self.playback.track = None;
        self.playback.is_playing = false;
        self.playback.is_loading = false;
        self.playback.is_buffering = false;
        self.playback.position = Duration::ZERO;
        self.playback.duration = Duration::ZERO;

        self.publish();
    }

    // ===== Transport =====

    async fn toggle_play_pause(&mut self) {
        // A load is already heading toward playing; toggling now would race it
        if self.playback.is_loading {
            return;
        }

        let Some(resource) = self.loader.current().copied() else {
            // Nothing loaded: treat as "play whatever is current"
            if let Some(track) = self.queue.current().cloned() {
                self.start_track(track);
            }
            return;
        };

        let result = if self.playback.is_playing {
            self.engine.pause(resource.handle).await.map(|()| false)
        } else {
            self.engine.play(resource.handle).await.map(|()| true)
        };

        match result {
            Ok(playing) => self.playback.is_playing = playing,
            Err(err) => {
                warn!(%err, "toggle failed");
                self.playback.error = Some(PlaybackIssue::from(&err));
            }
        }

        self.publish();
    }

    fn skip_next(&mut self) {
        match self.queue.next() {
            Some(track) => self.start_track(track),
            None => self.stop_idle(),
        }
    }

    fn skip_previous(&mut self) {
        // Previous never stops playback; at the front the cursor clamps
        if let Some(track) = self.queue.previous() {
            self.start_track(track);
        }
    }

    async fn seek_percent(&mut self, percent: f32) {
        let Some(resource) = self.loader.current().copied() else {
            return;
        };
        if self.playback.duration.is_zero() {
            return;
        }

        let target = self
            .playback
            .duration
            .mul_f32(percent.clamp(0.0, 100.0) / 100.0);

        // Optimistic: the position jumps immediately, buffering until the
        // next tick confirms the engine caught up
        self.playback.position = target;
        self.playback.is_buffering = true;
        self.publish();

        if let Err(err) = self.engine.seek(resource.handle, target).await {
            warn!(%err, "seek failed");
            self.playback.error = Some(PlaybackIssue::from(&err));
            self.playback.is_buffering = false;
            self.publish();
        }
    }

    async fn set_volume(&mut self, volume: f32) {
        let volume = volume.clamp(0.0, 1.0);
        self.playback.volume = volume;

        // The local value is authoritative; it is reapplied on the next load
        if let Some(resource) = self.loader.current().copied() {
            if let Err(err) = self.engine.set_volume(resource.handle, volume).await {
                warn!(%err, "volume apply failed");
            }
        }

        self.publish();
    }

    async fn end_scrub(&mut self, percent: f32) {
        let committed = self.scrub.end(percent);
        self.publish();

        if let Some(percent) = committed {
            self.seek_percent(percent).await;
        }
    }

    // ===== Lifecycle =====

    /// Re-sync against the engine after the app returns to the foreground
    async fn foregrounded(&mut self) {
        let Some(resource) = self.loader.current().copied() else {
            return;
        };

        match self.engine.status(resource.handle).await {
            Ok(status) => {
                self.playback.position = status.position;
                if !status.duration.is_zero() {
                    self.playback.duration = status.duration;
                }
                self.playback.is_playing = status.is_playing;
                self.playback.is_buffering = status.is_buffering;

                if status.did_finish {
                    self.handle_track_end();
                } else {
                    // The poll task may have been terminated while backgrounded
                    self.poller.watch(&resource);
                    self.publish();
                }
            }
            Err(err) => {
                warn!(%err, "foreground re-sync failed");
            }
        }
    }

    fn publish(&self) {
        let _ = self.state_tx.send(PlayerState {
            playback: self.playback.clone(),
            queue: self.queue.view(),
            scrub: self.scrub.state(),
        });
    }
}
