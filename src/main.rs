// Entry point: checks for mpv, loads config, and runs the TUI.

use clap::Parser;

use skyplayer::app::App;
use skyplayer::config::Config;
use skyplayer::logging;
use skyplayer::theme::SkyMode;

#[derive(Parser)]
#[command(name = "skyplayer", version, about = "Terminal audio player under an animated sky")]
struct Cli {
    /// Audio URL to load on startup.
    #[arg(long)]
    link: Option<String>,

    /// Start with the day sky.
    #[arg(long, conflicts_with = "night")]
    day: bool,

    /// Start with the night sky.
    #[arg(long)]
    night: bool,
}

impl Cli {
    fn mode(&self) -> Option<SkyMode> {
        match (self.day, self.night) {
            (true, _) => Some(SkyMode::Day),
            (_, true) => Some(SkyMode::Night),
            _ => None,
        }
    }
}

fn check_dependencies() {
    if which::which("mpv").is_err() {
        eprintln!("Error: mpv is required but not found. Install it with your package manager (e.g. brew install mpv).");
        std::process::exit(1);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    check_dependencies();

    let config = Config::load().unwrap_or_default();
    logging::init()?;
    tracing::info!(link = ?cli.link, "starting skyplayer");

    let mode = cli.mode();
    let mut app = App::new(config, cli.link, mode)?;
    app.run().await?;

    Ok(())
}
