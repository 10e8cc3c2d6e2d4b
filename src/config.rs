// User configuration loaded from ~/.config/skyplayer/config.toml.
// Falls back to sensible defaults when the file is missing.

use serde::Deserialize;
use std::path::PathBuf;

/// Application configuration, deserialized from `~/.config/skyplayer/config.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub sky: SkyConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    /// Animation and redraw rate in frames per second (default: 30).
    #[serde(default = "default_frame_rate")]
    pub frame_rate: f64,
    /// Volume applied to a freshly started player, 0.0–1.0 (default: 1.0).
    #[serde(default = "default_volume")]
    pub default_volume: f64,
    /// Step used by the skip back / skip forward keys, in seconds.
    #[serde(default = "default_skip_seconds")]
    pub skip_seconds: f64,
    /// URLs offered in the Open URL prompt.
    #[serde(default = "default_example_urls")]
    pub example_urls: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SkyConfig {
    /// Raindrops bound to each cloud while playing in day mode.
    #[serde(default = "default_drops_per_cloud")]
    pub drops_per_cloud: usize,
    /// Size of the meteor pool while playing in night mode.
    #[serde(default = "default_meteor_count")]
    pub meteor_count: usize,
    /// Spawn music emoji behind the mouse pointer while playing.
    #[serde(default = "default_true")]
    pub emoji: bool,
}

fn default_frame_rate() -> f64 {
    30.0
}

fn default_volume() -> f64 {
    1.0
}

fn default_skip_seconds() -> f64 {
    10.0
}

fn default_example_urls() -> Vec<String> {
    vec![
        "https://www.soundjay.com/misc/sounds/bell-ringing-05.wav".to_string(),
        "https://files.catbox.moe/5bl6mi.flac".to_string(),
        "https://www.learningcontainer.com/wp-content/uploads/2020/02/Kalimba.mp3".to_string(),
    ]
}

fn default_drops_per_cloud() -> usize {
    4
}

fn default_meteor_count() -> usize {
    5
}

fn default_true() -> bool {
    true
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            frame_rate: default_frame_rate(),
            default_volume: default_volume(),
            skip_seconds: default_skip_seconds(),
            example_urls: default_example_urls(),
        }
    }
}

impl Default for SkyConfig {
    fn default() -> Self {
        Self {
            drops_per_cloud: default_drops_per_cloud(),
            meteor_count: default_meteor_count(),
            emoji: true,
        }
    }
}

impl Config {
    /// Read config from disk, or return defaults if the file doesn't exist.
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();
        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("skyplayer")
            .join("config.toml")
    }
}
