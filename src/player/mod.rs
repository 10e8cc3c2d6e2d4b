// Playback: the controller that owns the single media resource, and the
// backend seam it drives.

pub mod controller;
pub mod ipc;
pub mod mpv;

use thiserror::Error;

pub use controller::PlaybackController;
pub use mpv::MpvBackend;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum PlaybackError {
    #[error("No audio URL loaded")]
    NoSource,
    #[error("Playback failed: {0}")]
    Rejected(String),
    #[error("Media error: {0}")]
    Media(String),
}

/// The media primitives the controller relies on. Volume is 0.0–1.0,
/// positions are seconds from the start.
#[allow(async_fn_in_trait)]
pub trait MediaBackend {
    /// Prepare `url` for playback, paused at 0.
    async fn load(&mut self, url: &str) -> Result<(), PlaybackError>;
    async fn play(&mut self) -> Result<(), PlaybackError>;
    async fn pause(&mut self) -> Result<(), PlaybackError>;
    async fn seek(&mut self, seconds: f64) -> Result<(), PlaybackError>;
    async fn set_volume(&mut self, volume: f64) -> Result<(), PlaybackError>;
    async fn set_muted(&mut self, muted: bool) -> Result<(), PlaybackError>;
    async fn stop(&mut self) -> Result<(), PlaybackError>;
    /// Number of the current load. Media events carry the number of the load
    /// that produced them.
    fn load_id(&self) -> u64;
}
