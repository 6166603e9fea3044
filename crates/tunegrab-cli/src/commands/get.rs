use anyhow::{Context, Result};
use indicatif::ProgressBar;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tunegrab_core::{
    downloader::{DownloadRequest, Downloader, Fetch, MediaKind},
    Config,
};

use crate::args::FormatOptions;
use crate::ui;

pub async fn run(
    query: &str,
    kind: MediaKind,
    options: &FormatOptions,
    output: Option<&Path>,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = super::load_effective(options, output, config_path)?;
    let files = download(query, kind, &config).await?;

    for file in files {
        println!("Output: {}", file.display());
    }
    Ok(())
}

/// Download one URL or search query into the output directory
pub async fn download(query: &str, kind: MediaKind, config: &Config) -> Result<Vec<PathBuf>> {
    let query = query.trim();
    if query.is_empty() {
        anyhow::bail!("No input provided");
    }

    let downloader = Downloader::from_config(config)?;
    let request = DownloadRequest::new(query, kind);

    let pb = ProgressBar::new_spinner();
    pb.set_style(ui::spinner_style(config.ui.theme)?);
    pb.set_message(format!("Downloading {}: {}", kind, ui::truncate(query, 50)));
    pb.enable_steady_tick(Duration::from_millis(100));

    match downloader.fetch(&request, &config.output.directory).await {
        Ok(files) => {
            pb.finish_with_message("Download completed successfully!");
            Ok(files)
        }
        Err(e) => {
            pb.abandon_with_message("Download failed!");
            Err(e).with_context(|| format!("Could not download {}", query))
        }
    }
}
