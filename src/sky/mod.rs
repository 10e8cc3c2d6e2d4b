// Animated sky backdrop: day clouds or night stars, plus playback-driven
// rain/meteors and the emoji trail.
//
// `Sky` is the frame scheduler for the whole layer. Each tick runs the
// active renderer first (the day renderer writes the SkyStore), then the
// precipitation renderer (which only reads it), then expires emoji.

pub mod canvas;
pub mod day;
pub mod emoji;
pub mod night;
pub mod precipitation;
pub mod store;
pub mod streak;

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

use crate::config::SkyConfig;
use crate::theme::SkyMode;

use self::canvas::{SkyCanvas, CELL_HEIGHT_PX, CELL_WIDTH_PX};
use self::day::DaySky;
use self::emoji::EmojiTrail;
use self::night::NightSky;
use self::precipitation::Precipitation;
use self::store::SkyStore;

/// Terminal resizes arrive in bursts; layout is re-derived once they settle.
pub const RESIZE_DEBOUNCE: Duration = Duration::from_millis(100);

/// Drawing surface size in virtual pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn from_cells(cols: u16, rows: u16) -> Self {
        Self {
            width: cols as f64 * CELL_WIDTH_PX,
            height: rows as f64 * CELL_HEIGHT_PX,
        }
    }
}

pub struct Sky {
    rng: StdRng,
    store: SkyStore,
    mode: SkyMode,
    viewport: Viewport,
    day: DaySky,
    night: NightSky,
    precipitation: Precipitation,
    emoji: EmojiTrail,
    emoji_enabled: bool,
    is_playing: bool,
    pending_resize: Option<(Viewport, Instant)>,
}

impl Sky {
    pub fn new(cols: u16, rows: u16, mode: SkyMode, config: &SkyConfig) -> Self {
        Self::with_rng(
            Viewport::from_cells(cols, rows),
            mode,
            config,
            StdRng::from_entropy(),
            Instant::now(),
        )
    }

    /// Build with an explicit RNG and clock, so runs are reproducible.
    pub fn with_rng(
        viewport: Viewport,
        mode: SkyMode,
        config: &SkyConfig,
        mut rng: StdRng,
        now: Instant,
    ) -> Self {
        let mut store = SkyStore::new();
        let day = DaySky::new(viewport, &mut store, &mut rng);
        let night = NightSky::new(viewport, &mut rng, now);
        if mode.is_night() {
            store.clear();
        }
        Self {
            rng,
            store,
            mode,
            viewport,
            day,
            night,
            precipitation: Precipitation::new(viewport, config.drops_per_cloud, config.meteor_count),
            emoji: EmojiTrail::new(),
            emoji_enabled: config.emoji,
            is_playing: false,
            pending_resize: None,
        }
    }

    pub fn mode(&self) -> SkyMode {
        self.mode
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn store(&self) -> &SkyStore {
        &self.store
    }

    pub fn day(&self) -> &DaySky {
        &self.day
    }

    pub fn night(&self) -> &NightSky {
        &self.night
    }

    pub fn precipitation(&self) -> &Precipitation {
        &self.precipitation
    }

    pub fn emoji(&self) -> &EmojiTrail {
        &self.emoji
    }

    /// Switch skies. The newly shown renderer is remounted from scratch.
    pub fn set_mode(&mut self, mode: SkyMode, now: Instant) {
        if mode == self.mode {
            return;
        }
        self.mode = mode;
        match mode {
            SkyMode::Day => self.day.reset(&mut self.store, &mut self.rng),
            SkyMode::Night => {
                self.store.clear();
                self.night.resize(self.viewport, &mut self.rng, now);
            }
        }
        self.precipitation
            .set_state(self.is_playing, mode.is_night(), now);
    }

    pub fn set_playing(&mut self, is_playing: bool, now: Instant) {
        self.is_playing = is_playing;
        self.precipitation
            .set_state(is_playing, self.mode.is_night(), now);
        if !is_playing {
            self.emoji.clear();
        }
    }

    /// Record a terminal resize; applied on the first tick after it settles.
    pub fn resize(&mut self, cols: u16, rows: u16, now: Instant) {
        self.pending_resize = Some((Viewport::from_cells(cols, rows), now + RESIZE_DEBOUNCE));
    }

    /// Mouse moved over cell (col, row) of the sky area.
    pub fn pointer_moved(&mut self, col: u16, row: u16, now: Instant) {
        if !self.is_playing || !self.emoji_enabled {
            return;
        }
        let x = col as f64 * CELL_WIDTH_PX;
        let y = row as f64 * CELL_HEIGHT_PX;
        self.emoji.spawn(x, y, &mut self.rng, now);
    }

    pub fn tick(&mut self, now: Instant) {
        if let Some((viewport, due)) = self.pending_resize {
            if now >= due {
                self.pending_resize = None;
                self.apply_resize(viewport, now);
            }
        }

        match self.mode {
            SkyMode::Day => self.day.tick(&mut self.store, &mut self.rng),
            SkyMode::Night => self.night.tick(&mut self.rng, now),
        }
        self.precipitation.tick(&self.store, &mut self.rng, now);
        self.emoji.tick(now);
    }

    fn apply_resize(&mut self, viewport: Viewport, now: Instant) {
        if viewport == self.viewport {
            return;
        }
        tracing::debug!(width = viewport.width, height = viewport.height, "sky resized");
        self.viewport = viewport;
        self.day.resize(viewport, &mut self.store, &mut self.rng);
        self.night.resize(viewport, &mut self.rng, now);
        if self.mode.is_night() {
            self.store.clear();
        }
        self.precipitation.resize(viewport, now);
    }

    /// Paint the whole layer into `area`.
    pub fn render(&self, area: Rect, buf: &mut Buffer, now: Instant) {
        let mut canvas = SkyCanvas::new(area.width, area.height);
        match self.mode {
            SkyMode::Day => self.day.draw(&mut canvas),
            SkyMode::Night => self.night.draw(&mut canvas),
        }
        self.precipitation.draw(&mut canvas);
        self.emoji.draw(&mut canvas, now);
        canvas.render(area, buf);
    }
}
