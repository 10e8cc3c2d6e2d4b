// Playback controller: the one owner of the media resource.
//
// Holds the user-facing playback state and keeps it consistent with the
// backend. Every failure resets to paused and is reported exactly once as
// Action::ShowError; the caller only needs the returned error for logging.

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

use super::{MediaBackend, PlaybackError};
use crate::action::{Action, MediaEvent};
use crate::favorites::Favorites;

/// Volume restored when unmuting from silence.
pub const UNMUTE_VOLUME: f64 = 0.5;

pub struct PlaybackController<B: MediaBackend> {
    backend: B,
    action_tx: Option<mpsc::UnboundedSender<Action>>,
    source: Option<String>,
    is_playing: bool,
    is_loading: bool,
    position: f64,
    duration: f64,
    volume: f64,
    muted: bool,
    // Reached the end; the next play starts over.
    ended: bool,
}

impl<B: MediaBackend> PlaybackController<B> {
    pub fn new(backend: B, volume: f64) -> Self {
        Self {
            backend,
            action_tx: None,
            source: None,
            is_playing: false,
            is_loading: false,
            position: 0.0,
            duration: 0.0,
            volume: volume.clamp(0.0, 1.0),
            muted: false,
            ended: false,
        }
    }

    pub fn set_action_tx(&mut self, tx: mpsc::UnboundedSender<Action>) {
        self.action_tx = Some(tx);
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn muted(&self) -> bool {
        self.muted
    }

    fn report(&mut self, err: PlaybackError) -> PlaybackError {
        tracing::warn!(error = %err, source = ?self.source, "playback failure");
        self.is_playing = false;
        self.is_loading = false;
        if let Some(tx) = &self.action_tx {
            tx.send(Action::ShowError(err.to_string())).ok();
        }
        err
    }

    /// Point the player at a new URL. Reloading the current URL is a no-op.
    pub async fn load(&mut self, url: &str) -> Result<(), PlaybackError> {
        if self.source.as_deref() == Some(url) {
            return Ok(());
        }
        tracing::info!(url, "loading audio");
        self.source = Some(url.to_string());
        self.is_playing = false;
        self.is_loading = true;
        self.position = 0.0;
        self.duration = 0.0;
        self.ended = false;
        match self.backend.load(url).await {
            Ok(()) => Ok(()),
            Err(e) => Err(self.report(e)),
        }
    }

    pub async fn toggle_play(&mut self) -> Result<(), PlaybackError> {
        if self.is_playing {
            self.is_playing = false;
            return match self.backend.pause().await {
                Ok(()) => Ok(()),
                Err(e) => Err(self.report(e)),
            };
        }
        if self.source.is_none() {
            return Err(self.report(PlaybackError::NoSource));
        }

        let restart = self.ended;
        let started = async {
            if restart {
                self.backend.seek(0.0).await?;
            }
            self.backend.set_volume(self.volume).await?;
            self.backend.set_muted(self.muted).await?;
            self.backend.play().await
        }
        .await;
        match started {
            Ok(()) => {
                if restart {
                    self.position = 0.0;
                }
                self.ended = false;
                self.is_playing = true;
                Ok(())
            }
            Err(e) => Err(self.report(e)),
        }
    }

    /// Jump to `seconds`, clamped to the known duration.
    pub async fn seek(&mut self, seconds: f64) -> Result<(), PlaybackError> {
        let target = seconds.clamp(0.0, self.duration.max(0.0));
        self.position = target;
        self.ended = false;
        if self.source.is_none() {
            return Ok(());
        }
        match self.backend.seek(target).await {
            Ok(()) => Ok(()),
            Err(e) => Err(self.report(e)),
        }
    }

    pub async fn skip(&mut self, delta: f64) -> Result<(), PlaybackError> {
        self.seek(self.position + delta).await
    }

    /// Set volume in 0.0–1.0. Zero mutes, anything above unmutes.
    pub async fn set_volume(&mut self, volume: f64) -> Result<(), PlaybackError> {
        self.volume = volume.clamp(0.0, 1.0);
        self.muted = self.volume == 0.0;
        self.apply_volume().await
    }

    pub async fn toggle_mute(&mut self) -> Result<(), PlaybackError> {
        if self.muted {
            self.muted = false;
            if self.volume == 0.0 {
                self.volume = UNMUTE_VOLUME;
            }
        } else {
            self.muted = true;
        }
        self.apply_volume().await
    }

    async fn apply_volume(&mut self) -> Result<(), PlaybackError> {
        if self.source.is_none() {
            return Ok(());
        }
        let applied = async {
            self.backend.set_volume(self.volume).await?;
            self.backend.set_muted(self.muted).await
        }
        .await;
        applied.map_err(|e| self.report(e))
    }

    /// Toggle the loaded URL in `favorites`. Returns the new membership, or
    /// None when nothing is loaded.
    pub fn toggle_favorite(&self, favorites: &mut Favorites, now: DateTime<Utc>) -> Option<bool> {
        let url = self.source.as_deref()?;
        Some(favorites.toggle(url, now))
    }

    pub fn is_favorite(&self, favorites: &Favorites) -> bool {
        self.source.as_deref().is_some_and(|url| favorites.contains(url))
    }

    // ── Media events ──

    /// Apply an event from the backend. Events from an earlier load are
    /// dropped. Returns whether the event was applied.
    pub fn on_media_event(&mut self, load: u64, event: MediaEvent) -> bool {
        if load != self.backend.load_id() {
            tracing::debug!(load, current = self.backend.load_id(), ?event, "stale media event");
            return false;
        }
        match event {
            MediaEvent::Loading => self.on_loading(),
            MediaEvent::Ready => self.on_can_play(),
            MediaEvent::Position(position) => self.on_time_update(position),
            MediaEvent::Duration(duration) => self.on_duration(duration),
            MediaEvent::Ended => self.on_ended(),
            MediaEvent::Error(message) => self.on_media_error(&message),
        }
        true
    }

    pub fn on_time_update(&mut self, position: f64) {
        if position.is_finite() {
            self.position = position.max(0.0);
        }
    }

    pub fn on_duration(&mut self, duration: f64) {
        if duration.is_finite() && duration >= 0.0 {
            self.duration = duration;
        }
    }

    pub fn on_loading(&mut self) {
        self.is_loading = true;
    }

    pub fn on_can_play(&mut self) {
        self.is_loading = false;
    }

    /// Playback reached the end. The position is left where it stopped
    /// until play starts the track over.
    pub fn on_ended(&mut self) {
        self.is_playing = false;
        self.ended = true;
    }

    pub fn on_media_error(&mut self, message: &str) {
        self.report(PlaybackError::Media(message.to_string()));
    }

    pub async fn stop(&mut self) -> Result<(), PlaybackError> {
        self.is_playing = false;
        self.backend.stop().await
    }
}
