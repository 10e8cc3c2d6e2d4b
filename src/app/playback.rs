// Playback helpers: loading URLs, volume steps, and mirroring controller
// state into the components and the sky.

use std::time::Instant;

use crate::app::App;
use crate::components::player_card::PlaybackView;
use crate::favorites::audio_title;
use crate::player::MediaBackend;

/// Volume change per key press.
pub const VOLUME_STEP: f64 = 0.05;

impl<B: MediaBackend> App<B> {
    /// Load `url` paused, as when started with `--link`.
    pub async fn open_link(&mut self, url: &str) {
        let _ = self.controller.load(url).await;
        self.sync_playback();
    }

    /// Load `url` and start it. Already playing the same URL is left alone.
    pub(super) async fn load_and_play(&mut self, url: &str) {
        if self.controller.load(url).await.is_err() {
            return;
        }
        if !self.controller.is_playing() {
            let _ = self.controller.toggle_play().await;
        }
    }

    pub(super) async fn step_volume(&mut self, direction: f64) {
        let target = self.controller.volume() + direction * VOLUME_STEP;
        // Round away float drift so repeated steps land on whole percents.
        let target = (target * 100.0).round() / 100.0;
        let _ = self.controller.set_volume(target).await;
    }

    pub fn playback_view(&self) -> PlaybackView {
        let url = self.controller.source().map(str::to_string);
        PlaybackView {
            title: url.as_deref().map(audio_title),
            is_favorite: self.controller.is_favorite(&self.favorites),
            url,
            is_playing: self.controller.is_playing(),
            is_loading: self.controller.is_loading(),
            position: self.controller.position(),
            duration: self.controller.duration(),
            volume: self.controller.volume(),
            muted: self.controller.muted(),
        }
    }

    /// Push controller state to every view and the sky.
    pub(super) fn sync_playback(&mut self) {
        let view = self.playback_view();
        self.sky.set_playing(view.is_playing, Instant::now());
        self.player_card.set_view(view.clone());
        self.play_controls.set_view(view);
    }
}
