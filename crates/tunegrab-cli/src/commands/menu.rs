use anyhow::Result;
use dialoguer::{Input, Select};
use std::path::Path;
use tracing::{error, warn};
use tunegrab_core::downloader::MediaKind;
use tunegrab_core::tools::{check_tools, ToolStatus};
use tunegrab_core::Config;

use super::{configure, doctor, get, playlist};
use crate::args::FormatOptions;
use crate::ui;

const ITEMS: [&str; 6] = [
    "Convert Spotify Playlist",
    "Download Single YouTube Video/Music",
    "Configure Spotify API",
    "Set Output Directory",
    "Download Settings",
    "Exit",
];

/// Interactive main menu
pub async fn run(output: Option<&Path>, config_path: Option<&Path>) -> Result<()> {
    let config = Config::load(config_path)?;

    let report = check_tools(&config).await;
    if !report.can_download() {
        println!("\n[x] Missing dependencies:");
        doctor::print_report(&report);
        anyhow::bail!("yt-dlp is required");
    }
    if report.ffmpeg == ToolStatus::Missing {
        warn!("FFmpeg not found - audio conversion and tagging may not work");
    }

    loop {
        // Settings may have changed in the previous round
        let config = super::load_effective(&FormatOptions::default(), output, config_path)?;
        let theme = ui::prompt_theme(config.ui.theme);

        println!();
        let choice = Select::with_theme(theme.as_ref())
            .with_prompt("Spotify & YouTube Downloader")
            .items(&ITEMS)
            .default(0)
            .interact()?;

        let result = match choice {
            0 => convert_playlist(&config, theme.as_ref()).await,
            1 => download_single(&config, theme.as_ref()).await,
            2 => configure::spotify(None, None, config_path),
            3 => configure::output(None, config_path),
            4 => configure::download(&FormatOptions::default(), None, config_path),
            _ => {
                println!("Goodbye!");
                return Ok(());
            }
        };

        if let Err(e) = result {
            error!("{:#}", e);
        }
    }
}

async fn convert_playlist(config: &Config, theme: &dyn dialoguer::theme::Theme) -> Result<()> {
    if !config.has_spotify_credentials() {
        anyhow::bail!("Spotify API credentials not set. Configure them first.");
    }

    let link = Input::<String>::with_theme(theme)
        .with_prompt("Enter Spotify Playlist URL")
        .interact_text()?;

    playlist::convert(&link, config).await.map(|_| ())
}

async fn download_single(config: &Config, theme: &dyn dialoguer::theme::Theme) -> Result<()> {
    let query = Input::<String>::with_theme(theme)
        .with_prompt("Enter YouTube URL or search query")
        .allow_empty(true)
        .interact_text()?;

    let kind = match Select::with_theme(theme)
        .with_prompt("Download as")
        .items(&["Music", "Video"])
        .default(0)
        .interact()?
    {
        1 => MediaKind::Video,
        _ => MediaKind::Audio,
    };

    let files = get::download(&query, kind, config).await?;
    for file in files {
        println!("Output: {}", file.display());
    }
    Ok(())
}
