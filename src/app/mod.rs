// Central coordinator: owns the sky, the components, the playback controller
// and the database. Runs the event loop (event → Action → handle_action →
// component updates → draw).

mod actions;
mod input;
mod playback;

use std::time::Instant;

use tokio::sync::mpsc;

pub use crate::components::tab_bar::Tab;

use crate::action::Action;
use crate::components::favorites_list::FavoritesList;
use crate::components::play_controls::PlayControls;
use crate::components::player_card::PlayerCard;
use crate::components::tab_bar::TabBar;
use crate::components::url_modal::UrlModal;
use crate::components::Component;
use crate::config::Config;
use crate::db::Database;
use crate::favorites::Favorites;
use crate::player::{MediaBackend, MpvBackend, PlaybackController};
use crate::sky::Sky;
use crate::theme::{SkyMode, Theme};
use crate::tui::{Tui, TuiEvent};
use crate::ui;

// Sky size used until the terminal reports its real size.
const INITIAL_COLS: u16 = 80;
const INITIAL_ROWS: u16 = 24;

/// Top-level coordinator. Generic over the media backend so the whole
/// action flow can run against an in-memory player.
pub struct App<B: MediaBackend = MpvBackend> {
    running: bool,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,

    // Components
    pub tab_bar: TabBar,
    pub player_card: PlayerCard,
    pub favorites_list: FavoritesList,
    pub play_controls: PlayControls,
    pub url_modal: UrlModal,

    // State
    pub controller: PlaybackController<B>,
    pub favorites: Favorites,
    pub sky: Sky,
    pub mode: SkyMode,
    pub theme: Theme,
    pub(crate) db: Database,
    pub(crate) config: Config,
    initial_link: Option<String>,
    pub show_help: bool,
    pub error_message: Option<String>,
    error_id: u64,
}

impl App<MpvBackend> {
    pub fn new(config: Config, link: Option<String>, mode: Option<SkyMode>) -> anyhow::Result<Self> {
        let db = Database::open()?;
        let mut app = Self::with_parts(config, db, MpvBackend::new(), mode, link)?;
        let tx = app.action_tx.clone();
        app.controller.backend_mut().set_action_tx(tx);
        Ok(app)
    }
}

impl<B: MediaBackend> App<B> {
    /// Assemble an app from its collaborators. The theme comes from `mode`
    /// if given, else from the database, else night.
    pub fn with_parts(
        config: Config,
        db: Database,
        backend: B,
        mode: Option<SkyMode>,
        link: Option<String>,
    ) -> anyhow::Result<Self> {
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        let mode = match mode {
            Some(mode) => mode,
            None => match db.load_theme() {
                Ok(saved) => saved.unwrap_or_default(),
                Err(e) => {
                    tracing::warn!(error = %e, "could not load theme");
                    SkyMode::default()
                }
            },
        };
        let favorites = match db.load_favorites() {
            Ok(entries) => Favorites::from_entries(entries),
            Err(e) => {
                tracing::warn!(error = %e, "could not load favorites");
                Favorites::new()
            }
        };

        let mut tab_bar = TabBar::new();
        let mut player_card = PlayerCard::new();
        let mut favorites_list = FavoritesList::new();
        let mut play_controls = PlayControls::new();
        let mut url_modal = UrlModal::new(config.general.example_urls.clone());

        for component in [
            &mut tab_bar as &mut dyn Component,
            &mut player_card,
            &mut favorites_list,
            &mut play_controls,
            &mut url_modal,
        ] {
            component.register_action_handler(action_tx.clone());
        }

        let mut controller = PlaybackController::new(backend, config.general.default_volume);
        controller.set_action_tx(action_tx.clone());

        let sky = Sky::new(INITIAL_COLS, INITIAL_ROWS, mode, &config.sky);

        let mut app = Self {
            running: true,
            action_tx,
            action_rx,
            tab_bar,
            player_card,
            favorites_list,
            play_controls,
            url_modal,
            controller,
            favorites,
            sky,
            mode,
            theme: Theme::for_mode(mode),
            db,
            config,
            initial_link: link,
            show_help: false,
            error_message: None,
            error_id: 0,
        };
        app.play_controls.set_mode(mode);
        app.sync_favorites();
        app.sync_playback();
        Ok(app)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Id of the most recent error shown; its `ClearError` carries the same id.
    pub fn error_id(&self) -> u64 {
        self.error_id
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        let mut tui = Tui::new(self.config.general.frame_rate)?;
        tui.enter()?;

        let (cols, rows) = tui.size()?;
        self.sky.resize(cols, rows, Instant::now());

        if let Some(link) = self.initial_link.take() {
            self.open_link(&link).await;
        }

        while self.running {
            let state = ui::DrawState {
                sky: &self.sky,
                now: Instant::now(),
                mode: self.mode,
                theme: &self.theme,
                tab_bar: &self.tab_bar,
                player_card: &self.player_card,
                favorites_list: &self.favorites_list,
                play_controls: &self.play_controls,
                url_modal: &self.url_modal,
                error_message: &self.error_message,
                show_help: self.show_help,
            };
            tui.draw(|frame| ui::draw(frame, &state))?;

            tokio::select! {
                Some(event) = tui.event_rx.recv() => {
                    match event {
                        TuiEvent::Key(key) => self.handle_key(key)?,
                        TuiEvent::MouseMove(col, row) => {
                            self.sky.pointer_moved(col, row, Instant::now());
                        }
                        TuiEvent::Resize(cols, rows) => {
                            self.sky.resize(cols, rows, Instant::now());
                        }
                        TuiEvent::Tick => { self.action_tx.send(Action::Tick)?; }
                    }
                }
                Some(action) = self.action_rx.recv() => {
                    self.handle_action(action).await?;
                }
            }
        }

        tui.exit()?;
        Ok(())
    }

    /// Handle every queued action, including ones queued while handling.
    pub async fn flush_actions(&mut self) {
        while let Ok(action) = self.action_rx.try_recv() {
            if let Err(e) = self.handle_action(action).await {
                tracing::warn!(error = %e, "action failed");
            }
        }
    }
}
