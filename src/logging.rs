// File-based logging via tracing. Writes to ~/.local/share/skyplayer/skyplayer.log
// so nothing ever lands on the terminal the sky is drawn on.

use tracing_appender::rolling;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub fn init() -> anyhow::Result<()> {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("skyplayer");
    std::fs::create_dir_all(&data_dir)?;

    let file_appender = rolling::never(&data_dir, "skyplayer.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .with(EnvFilter::from_default_env().add_directive("skyplayer=debug".parse()?))
        .init();

    // Leaked so the file writer stays open for the whole run.
    std::mem::forget(guard);
    Ok(())
}
