// mpv-backed media resource. One mpv child per loaded URL, started paused and
// driven over its JSON IPC socket.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::json;
use tokio::process::Command;
use tokio::sync::mpsc;

use super::ipc::{self, MpvProcess};
use super::{MediaBackend, PlaybackError};
use crate::action::{Action, MediaEvent};

// Each load gets a fresh number and socket, so monitors from a previous file
// cannot attach to the new process and their events can be told apart.
static LOAD_SEQ: AtomicU64 = AtomicU64::new(0);

pub struct MpvBackend {
    load_id: u64,
    socket_path: PathBuf,
    action_tx: Option<mpsc::UnboundedSender<Action>>,
    child: MpvProcess,
}

impl Default for MpvBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MpvBackend {
    pub fn new() -> Self {
        let load_id = LOAD_SEQ.fetch_add(1, Ordering::Relaxed);
        Self {
            load_id,
            socket_path: Self::socket_path_for(load_id),
            action_tx: None,
            child: std::sync::Arc::new(tokio::sync::Mutex::new(None)),
        }
    }

    fn socket_path_for(load_id: u64) -> PathBuf {
        std::env::temp_dir().join(format!("skyplayer-mpv-{}-{}.sock", std::process::id(), load_id))
    }

    pub fn set_action_tx(&mut self, tx: mpsc::UnboundedSender<Action>) {
        self.action_tx = Some(tx);
    }

    /// True while the child for the current load has not exited.
    async fn child_running(&self) -> bool {
        let mut guard = self.child.lock().await;
        match guard.as_mut() {
            Some(child) => matches!(child.try_wait(), Ok(None)),
            None => false,
        }
    }

    async fn send(&self, args: serde_json::Value) -> Result<(), PlaybackError> {
        if !self.child_running().await {
            return Err(PlaybackError::Rejected("mpv is not running".to_string()));
        }
        // Only a freshly started child may still be creating its socket.
        if !self.socket_path.exists() && !ipc::wait_for_socket(&self.socket_path).await {
            return Err(PlaybackError::Rejected("mpv did not open its IPC socket".to_string()));
        }
        ipc::send_command(&self.socket_path, &ipc::command(args))
            .await
            .map(|_| ())
            .map_err(|e| PlaybackError::Rejected(e.to_string()))
    }

    async fn kill_child(&mut self) {
        let _ = ipc::send_command(&self.socket_path, &ipc::command(json!(["quit"]))).await;
        let mut guard = self.child.lock().await;
        if let Some(child) = guard.as_mut() {
            let _ = child.kill().await;
        }
        *guard = None;
        let _ = std::fs::remove_file(&self.socket_path);
    }
}

impl MediaBackend for MpvBackend {
    async fn load(&mut self, url: &str) -> Result<(), PlaybackError> {
        self.kill_child().await;
        self.load_id = LOAD_SEQ.fetch_add(1, Ordering::Relaxed);
        self.socket_path = Self::socket_path_for(self.load_id);
        if let Some(tx) = &self.action_tx {
            tx.send(Action::Media(self.load_id, MediaEvent::Loading)).ok();
        }

        let child = Command::new("mpv")
            .arg("--no-video")
            .arg("--no-terminal")
            .arg("--pause")
            .arg("--keep-open=yes")
            .arg(format!("--input-ipc-server={}", self.socket_path.display()))
            .arg(url)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| PlaybackError::Media(format!("failed to start mpv: {}", e)))?;
        *self.child.lock().await = Some(child);

        ipc::spawn_exit_monitor(self.child.clone(), self.load_id, self.action_tx.clone());
        ipc::spawn_position_poller(self.socket_path.clone(), self.load_id, self.action_tx.clone());
        ipc::spawn_event_observer(self.socket_path.clone(), self.load_id, self.action_tx.clone());
        Ok(())
    }

    async fn play(&mut self) -> Result<(), PlaybackError> {
        self.send(json!(["set_property", "pause", false])).await
    }

    async fn pause(&mut self) -> Result<(), PlaybackError> {
        self.send(json!(["set_property", "pause", true])).await
    }

    async fn seek(&mut self, seconds: f64) -> Result<(), PlaybackError> {
        self.send(json!(["seek", seconds, "absolute"])).await
    }

    async fn set_volume(&mut self, volume: f64) -> Result<(), PlaybackError> {
        self.send(json!(["set_property", "volume", (volume * 100.0).round()]))
            .await
    }

    async fn set_muted(&mut self, muted: bool) -> Result<(), PlaybackError> {
        self.send(json!(["set_property", "mute", muted])).await
    }

    async fn stop(&mut self) -> Result<(), PlaybackError> {
        self.kill_child().await;
        Ok(())
    }

    fn load_id(&self) -> u64 {
        self.load_id
    }
}

impl Drop for MpvBackend {
    fn drop(&mut self) {
        if let Ok(mut guard) = self.child.try_lock() {
            if let Some(child) = guard.as_mut() {
                let _ = child.start_kill();
            }
            *guard = None;
        }
        let _ = std::fs::remove_file(&self.socket_path);
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;

    // Well under the resize debounce, so a dead player never stalls a frame.
    const FAIL_FAST: Duration = Duration::from_millis(100);

    #[tokio::test]
    async fn commands_fail_fast_without_a_child() {
        let mut backend = MpvBackend::new();
        let started = Instant::now();
        let result = backend.set_volume(0.5).await;
        assert!(started.elapsed() < FAIL_FAST);
        assert_eq!(
            result,
            Err(PlaybackError::Rejected("mpv is not running".to_string()))
        );
        assert!(backend.play().await.is_err());
        assert!(started.elapsed() < FAIL_FAST);
    }

    #[tokio::test]
    async fn commands_fail_fast_after_the_child_exits() {
        let mut backend = MpvBackend::new();
        let mut child = Command::new("true").spawn().unwrap();
        child.wait().await.unwrap();
        *backend.child.lock().await = Some(child);

        let started = Instant::now();
        assert!(backend.seek(3.0).await.is_err());
        assert!(started.elapsed() < FAIL_FAST);
    }

    #[test]
    fn each_backend_gets_its_own_load_id() {
        let a = MpvBackend::new();
        let b = MpvBackend::new();
        assert_ne!(a.load_id(), b.load_id());
        assert_ne!(a.socket_path, b.socket_path);
    }
}
