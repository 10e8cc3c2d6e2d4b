// Day/night mode and the color palettes for the TUI chrome drawn over the sky.
// The sky renderers carry their own colors and only consult the mode.

use ratatui::style::Color;

pub const THEME_DAY: &str = "day";
pub const THEME_NIGHT: &str = "night";

/// Which sky is showing. Persisted as `"day"` / `"night"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SkyMode {
    Day,
    #[default]
    Night,
}

impl SkyMode {
    pub fn is_night(self) -> bool {
        self == SkyMode::Night
    }

    pub fn toggled(self) -> Self {
        match self {
            SkyMode::Day => SkyMode::Night,
            SkyMode::Night => SkyMode::Day,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SkyMode::Day => THEME_DAY,
            SkyMode::Night => THEME_NIGHT,
        }
    }

    /// Parse a persisted flag. Unknown values fall back to night.
    pub fn from_name(name: &str) -> Self {
        match name {
            THEME_DAY => SkyMode::Day,
            _ => SkyMode::Night,
        }
    }

    /// Short line shown under the title.
    pub fn tagline(self) -> &'static str {
        match self {
            SkyMode::Day => "Music under the blue sky, with a refreshing daytime rain",
            SkyMode::Night => "Music in the dark of night, with meteors falling quietly",
        }
    }
}

/// Named color slots used by the UI chrome (borders, text, status indicators).
#[derive(Debug, Clone)]
pub struct Theme {
    /// Primary accent color (active tab, progress, highlights).
    pub primary: Color,
    /// Secondary accent / subtitle color.
    pub secondary: Color,
    /// Normal text color.
    pub text: Color,
    /// Dimmed / inactive text color.
    pub text_dim: Color,
    /// Accent color for key hints.
    pub accent: Color,
    /// Background of the player card and overlays.
    pub panel_bg: Color,
    /// Background color for selected items.
    pub selection_bg: Color,
    /// Border and divider color.
    pub border: Color,
    /// Error indicators and the favorite heart.
    pub error: Color,
    /// Loading indicators.
    pub buffering: Color,
    /// Playing indicators.
    pub success: Color,
}

impl Theme {
    pub fn day() -> Self {
        Self {
            primary: Color::Rgb(21, 101, 192),
            secondary: Color::Rgb(25, 118, 210),
            text: Color::Rgb(13, 40, 94),
            text_dim: Color::Rgb(66, 110, 170),
            accent: Color::Rgb(180, 120, 0),
            panel_bg: Color::Rgb(214, 234, 252),
            selection_bg: Color::Rgb(187, 222, 251),
            border: Color::Rgb(120, 160, 210),
            error: Color::Rgb(229, 57, 53),
            buffering: Color::Rgb(180, 120, 0),
            success: Color::Rgb(0, 121, 107),
        }
    }

    pub fn night() -> Self {
        Self {
            primary: Color::Rgb(224, 224, 224),
            secondary: Color::Rgb(159, 168, 218),
            text: Color::White,
            text_dim: Color::Rgb(130, 130, 140),
            accent: Color::Yellow,
            panel_bg: Color::Rgb(22, 22, 26),
            selection_bg: Color::Rgb(50, 50, 60),
            border: Color::Rgb(70, 70, 80),
            error: Color::Rgb(239, 83, 80),
            buffering: Color::Yellow,
            success: Color::Rgb(129, 199, 132),
        }
    }

    pub fn for_mode(mode: SkyMode) -> Self {
        match mode {
            SkyMode::Day => Self::day(),
            SkyMode::Night => Self::night(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::night()
    }
}
