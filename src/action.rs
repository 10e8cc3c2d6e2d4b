// Every user interaction, media event, and internal signal is represented as
// an Action variant. The App event loop dispatches these to handlers.

use crate::components::tab_bar::Tab;

/// All events flowing through the app. The [`App`](crate::app::App) event
/// loop dispatches each variant to the appropriate handler.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    SelectTab(Tab),
    NextTab,
    ToggleTheme,

    OpenUrlModal,
    CloseUrlModal,
    LoadUrl(String),

    TogglePlayPause,
    SkipBy(f64),
    SeekTo(f64),
    VolumeUp,
    VolumeDown,
    ToggleMute,

    ToggleFavorite,
    PlayFavorite(String),
    RemoveFavorite(String),

    /// Reported by the media backend, tagged with the load it belongs to.
    Media(u64, MediaEvent),

    ShowError(String),
    /// Clears the error bar if it still shows the error with this id.
    ClearError(u64),
    ShowHelp,
    HideHelp,
    Tick,
}

/// What the media backend observed about a loaded resource.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    Loading,
    Ready,
    Position(f64),
    Duration(f64),
    Ended,
    Error(String),
}
