// Shared test helpers: an in-memory media backend and temp databases.

#![allow(dead_code)]

use skyplayer::db::Database;
use skyplayer::player::{MediaBackend, PlaybackError};

/// Records every call and fails on demand.
#[derive(Debug, Default)]
pub struct FakeBackend {
    pub calls: Vec<String>,
    pub load_error: Option<PlaybackError>,
    pub play_error: Option<PlaybackError>,
    pub paused: bool,
    pub volume: f64,
    pub muted: bool,
    pub position: f64,
    pub load_id: u64,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            paused: true,
            volume: 1.0,
            ..Self::default()
        }
    }

    pub fn failing_play(message: &str) -> Self {
        Self {
            play_error: Some(PlaybackError::Rejected(message.to_string())),
            ..Self::new()
        }
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls.iter().filter(|c| c.starts_with(prefix)).count()
    }
}

impl MediaBackend for FakeBackend {
    async fn load(&mut self, url: &str) -> Result<(), PlaybackError> {
        self.calls.push(format!("load {}", url));
        self.load_id += 1;
        if let Some(e) = self.load_error.clone() {
            return Err(e);
        }
        self.paused = true;
        self.position = 0.0;
        Ok(())
    }

    async fn play(&mut self) -> Result<(), PlaybackError> {
        self.calls.push("play".to_string());
        if let Some(e) = self.play_error.clone() {
            return Err(e);
        }
        self.paused = false;
        Ok(())
    }

    async fn pause(&mut self) -> Result<(), PlaybackError> {
        self.calls.push("pause".to_string());
        self.paused = true;
        Ok(())
    }

    async fn seek(&mut self, seconds: f64) -> Result<(), PlaybackError> {
        self.calls.push(format!("seek {}", seconds));
        self.position = seconds;
        Ok(())
    }

    async fn set_volume(&mut self, volume: f64) -> Result<(), PlaybackError> {
        self.calls.push(format!("volume {}", volume));
        self.volume = volume;
        Ok(())
    }

    async fn set_muted(&mut self, muted: bool) -> Result<(), PlaybackError> {
        self.calls.push(format!("muted {}", muted));
        self.muted = muted;
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), PlaybackError> {
        self.calls.push("stop".to_string());
        self.paused = true;
        Ok(())
    }

    fn load_id(&self) -> u64 {
        self.load_id
    }
}

pub fn open_temp_db() -> (Database, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let db = Database::open_at(&dir.path().join("test.db")).expect("open db");
    (db, dir) // caller keeps _dir alive so the directory isn't deleted mid-test
}
