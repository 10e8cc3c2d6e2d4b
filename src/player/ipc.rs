// Low-level mpv IPC: socket communication, and background tasks that turn
// mpv state into Actions (exit, position, duration, end of file, errors).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixStream;
use tokio::process::Child;
use tokio::sync::mpsc;

use crate::action::{Action, MediaEvent};

pub type MpvProcess = std::sync::Arc<tokio::sync::Mutex<Option<Child>>>;

// How long to wait for mpv's IPC socket to appear (20 * 100ms = 2s).
const SOCKET_POLL_ATTEMPTS: u32 = 20;
const SOCKET_POLL_INTERVAL: Duration = Duration::from_millis(100);
const POSITION_POLL_INTERVAL: Duration = Duration::from_millis(500);
const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(500);

const OBSERVE_DURATION: u64 = 1;
const OBSERVE_EOF: u64 = 2;

/// Wait for the IPC socket to appear on disk (up to 2 seconds).
pub async fn wait_for_socket(path: &Path) -> bool {
    for _ in 0..SOCKET_POLL_ATTEMPTS {
        if path.exists() {
            return true;
        }
        tokio::time::sleep(SOCKET_POLL_INTERVAL).await;
    }
    path.exists()
}

/// Build an IPC command line from its arguments.
pub fn command(args: Value) -> String {
    json!({ "command": args }).to_string()
}

/// Send one command over a fresh IPC connection and return its reply.
/// Event lines that arrive first are skipped; an mpv-side error becomes Err.
pub async fn send_command(socket_path: &Path, cmd: &str) -> anyhow::Result<Value> {
    let mut stream = UnixStream::connect(socket_path)
        .await
        .map_err(|e| anyhow::anyhow!("failed to connect to mpv IPC socket: {}", e))?;
    stream.write_all(format!("{}\n", cmd).as_bytes()).await?;

    let mut lines = BufReader::new(stream).lines();
    while let Some(line) = lines.next_line().await? {
        let Ok(reply) = serde_json::from_str::<Value>(&line) else {
            continue;
        };
        let Some(status) = reply.get("error").and_then(|e| e.as_str()) else {
            continue;
        };
        if status != "success" {
            anyhow::bail!("mpv rejected {}: {}", cmd, status);
        }
        return Ok(reply);
    }
    anyhow::bail!("mpv closed the IPC connection")
}

/// Poll the child process and report the end of playback if it exits on its own.
pub fn spawn_exit_monitor(child: MpvProcess, load: u64, tx: Option<mpsc::UnboundedSender<Action>>) {
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(EXIT_POLL_INTERVAL).await;
            let mut guard = child.lock().await;
            match guard.as_mut().and_then(|c| c.try_wait().ok()) {
                Some(Some(status)) => {
                    tracing::debug!(?status, "mpv exited");
                    *guard = None;
                    if let Some(tx) = &tx {
                        tx.send(Action::Media(load, MediaEvent::Ended)).ok();
                    }
                    break;
                }
                Some(None) => {} // still running
                None => break,   // stopped by us, or wait error
            }
        }
    });
}

/// Poll time-pos and forward it as a position event until the socket goes away.
pub fn spawn_position_poller(
    socket_path: PathBuf,
    load: u64,
    tx: Option<mpsc::UnboundedSender<Action>>,
) {
    tokio::spawn(async move {
        if !wait_for_socket(&socket_path).await {
            return;
        }
        let cmd = command(json!(["get_property", "time-pos"]));
        loop {
            tokio::time::sleep(POSITION_POLL_INTERVAL).await;
            if !socket_path.exists() {
                break;
            }
            match send_command(&socket_path, &cmd).await {
                Ok(reply) => {
                    if let Some(pos) = reply.get("data").and_then(|d| d.as_f64()) {
                        if let Some(tx) = &tx {
                            tx.send(Action::Media(load, MediaEvent::Position(pos))).ok();
                        }
                    }
                }
                // time-pos is unavailable until the file is loaded.
                Err(e) if e.to_string().contains("property unavailable") => {}
                Err(_) => break,
            }
        }
    });
}

/// Translate one event line from mpv into a media event, if it carries one.
pub fn event_to_media(event: &Value) -> Option<MediaEvent> {
    match event.get("event").and_then(|e| e.as_str())? {
        "file-loaded" => Some(MediaEvent::Ready),
        "end-file" => {
            if event.get("reason").and_then(|r| r.as_str()) != Some("error") {
                return None;
            }
            let message = event
                .get("file_error")
                .and_then(|m| m.as_str())
                .unwrap_or("unable to play this audio");
            Some(MediaEvent::Error(message.to_string()))
        }
        "property-change" => match event.get("id").and_then(|i| i.as_u64())? {
            OBSERVE_DURATION => event
                .get("data")
                .and_then(|d| d.as_f64())
                .map(MediaEvent::Duration),
            OBSERVE_EOF => match event.get("data").and_then(|d| d.as_bool()) {
                Some(true) => Some(MediaEvent::Ended),
                _ => None,
            },
            _ => None,
        },
        _ => None,
    }
}

/// Keep one connection open, observe duration and end of file, and forward
/// load/end/error events.
pub fn spawn_event_observer(
    socket_path: PathBuf,
    load: u64,
    tx: Option<mpsc::UnboundedSender<Action>>,
) {
    tokio::spawn(async move {
        if !wait_for_socket(&socket_path).await {
            return;
        }
        let Ok(stream) = UnixStream::connect(&socket_path).await else {
            return;
        };
        let (reader, mut writer) = stream.into_split();
        let mut lines = BufReader::new(reader).lines();

        let commands = [
            command(json!(["observe_property", OBSERVE_DURATION, "duration"])),
            command(json!(["observe_property", OBSERVE_EOF, "eof-reached"])),
        ];
        for cmd in commands {
            if writer.write_all(format!("{}\n", cmd).as_bytes()).await.is_err() {
                return;
            }
        }

        while let Ok(Some(line)) = lines.next_line().await {
            let Ok(event) = serde_json::from_str::<Value>(&line) else {
                continue;
            };
            if let Some(media) = event_to_media(&event) {
                if let Some(tx) = &tx {
                    tx.send(Action::Media(load, media)).ok();
                }
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_wraps_arguments() {
        let cmd = command(json!(["seek", 12.5, "absolute"]));
        let parsed: Value = serde_json::from_str(&cmd).unwrap();
        assert_eq!(parsed["command"][0], "seek");
        assert_eq!(parsed["command"][1], 12.5);
    }

    #[test]
    fn duration_and_eof_map_to_actions() {
        let duration = json!({"event": "property-change", "id": 1, "name": "duration", "data": 93.0});
        assert_eq!(event_to_media(&duration), Some(MediaEvent::Duration(93.0)));

        let eof = json!({"event": "property-change", "id": 2, "name": "eof-reached", "data": true});
        assert_eq!(event_to_media(&eof), Some(MediaEvent::Ended));

        let not_eof = json!({"event": "property-change", "id": 2, "data": false});
        assert_eq!(event_to_media(&not_eof), None);
    }

    #[test]
    fn only_failed_end_file_is_an_error() {
        let failed = json!({"event": "end-file", "reason": "error", "file_error": "loading failed"});
        assert_eq!(
            event_to_media(&failed),
            Some(MediaEvent::Error("loading failed".to_string()))
        );
        let stopped = json!({"event": "end-file", "reason": "stop"});
        assert_eq!(event_to_media(&stopped), None);
    }

    #[test]
    fn file_loaded_means_ready() {
        let loaded = json!({"event": "file-loaded"});
        assert_eq!(event_to_media(&loaded), Some(MediaEvent::Ready));
    }
}
