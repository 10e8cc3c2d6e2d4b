// Action dispatch: routes each Action variant to the right handler.

use std::time::Instant;

use chrono::Utc;

use crate::action::Action;
use crate::app::App;
use crate::components::tab_bar::Tab;
use crate::components::Component;
use crate::player::MediaBackend;
use crate::theme::Theme;

// How long the error bar stays up.
const ERROR_DISPLAY_SECS: u64 = 5;

impl<B: MediaBackend> App<B> {
    pub async fn handle_action(&mut self, action: Action) -> anyhow::Result<()> {
        match action {
            // Lifecycle
            Action::Quit => {
                let _ = self.controller.stop().await;
                self.running = false;
            }
            Action::Tick => {
                self.sky.tick(Instant::now());
                self.player_card.update(&action)?;
                self.play_controls.update(&action)?;
            }

            // Navigation
            Action::SelectTab(_) | Action::NextTab => {
                self.tab_bar.update(&action)?;
            }
            Action::ToggleTheme => self.toggle_theme(),
            Action::OpenUrlModal => self.url_modal.show(),
            Action::CloseUrlModal => self.url_modal.hide(),

            // Playback
            Action::LoadUrl(url) | Action::PlayFavorite(url) => {
                self.tab_bar.update(&Action::SelectTab(Tab::Player))?;
                self.load_and_play(&url).await;
            }
            Action::TogglePlayPause => {
                let _ = self.controller.toggle_play().await;
            }
            Action::SkipBy(delta) => {
                let _ = self.controller.skip(delta).await;
            }
            Action::SeekTo(position) => {
                let _ = self.controller.seek(position).await;
            }
            Action::VolumeUp => self.step_volume(1.0).await,
            Action::VolumeDown => self.step_volume(-1.0).await,
            Action::ToggleMute => {
                let _ = self.controller.toggle_mute().await;
            }

            // Favorites
            Action::ToggleFavorite => {
                if self
                    .controller
                    .toggle_favorite(&mut self.favorites, Utc::now())
                    .is_some()
                {
                    self.persist_favorites();
                }
            }
            Action::RemoveFavorite(id) => {
                if self.favorites.remove_by_id(&id).is_some() {
                    self.persist_favorites();
                }
            }

            // Media events
            Action::Media(load, event) => {
                self.controller.on_media_event(load, event);
            }

            // Errors & help
            Action::ShowError(msg) => {
                self.error_message = Some(msg);
                self.error_id += 1;
                let id = self.error_id;
                let tx = self.action_tx.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(tokio::time::Duration::from_secs(ERROR_DISPLAY_SECS)).await;
                    tx.send(Action::ClearError(id)).ok();
                });
            }
            // A newer error restarts the display time.
            Action::ClearError(id) if id == self.error_id => self.error_message = None,
            Action::ClearError(_) => {}
            Action::ShowHelp => self.show_help = true,
            Action::HideHelp => self.show_help = false,
        }

        self.sync_playback();
        Ok(())
    }

    fn toggle_theme(&mut self) {
        self.mode = self.mode.toggled();
        self.theme = Theme::for_mode(self.mode);
        self.sky.set_mode(self.mode, Instant::now());
        self.play_controls.set_mode(self.mode);
        tracing::info!(mode = self.mode.as_str(), "theme switched");
        if let Err(e) = self.db.save_theme(self.mode) {
            tracing::warn!(error = %e, "could not save theme");
            self.action_tx
                .send(Action::ShowError(format!("Could not save theme: {}", e)))
                .ok();
        }
    }

    fn persist_favorites(&mut self) {
        if let Err(e) = self.db.save_favorites(self.favorites.entries()) {
            tracing::warn!(error = %e, "could not save favorites");
            self.action_tx
                .send(Action::ShowError(format!("Could not save favorites: {}", e)))
                .ok();
        }
        self.sync_favorites();
    }

    pub(super) fn sync_favorites(&mut self) {
        self.favorites_list
            .set_entries(self.favorites.entries().to_vec());
        self.tab_bar.set_favorites_count(self.favorites.len());
    }
}
