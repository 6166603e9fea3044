use anyhow::{Context, Result};
use indicatif::ProgressBar;
use std::path::Path;
use tokio::sync::mpsc;
use tunegrab_core::{
    collection::{CollectionEvent, CollectionJob, Summary},
    downloader::Downloader,
    Config,
};
use tunegrab_spotify::{Credentials, SpotifyClient, SpotifyLink};

use crate::args::FormatOptions;
use crate::ui;

pub async fn run(
    link: &str,
    options: &FormatOptions,
    output: Option<&Path>,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = super::load_effective(options, output, config_path)?;
    convert(link, &config).await.map(|_| ())
}

/// Resolve a Spotify link and download all of its tracks
pub async fn convert(link: &str, config: &Config) -> Result<Summary> {
    let link = SpotifyLink::parse(link)?;
    let client = spotify_client(config)?;
    let downloader = Downloader::from_config(config)?;

    let collection = client
        .fetch(&link)
        .await
        .with_context(|| format!("Failed to resolve {}", link))?;

    println!("{}: {}", collection.kind, collection.name);
    println!("Found {} tracks", collection.tracks.len());

    let (tx, mut rx) = mpsc::channel(32);

    let theme = config.ui.theme;
    let pb = ProgressBar::new(collection.tracks.len() as u64);
    pb.set_style(ui::bar_style(theme)?);

    // Spawn progress handler
    let progress_handle = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event {
                CollectionEvent::Started { directory, .. } => {
                    pb.println(format!("[*] Output directory: {}", directory.display()));
                    pb.enable_steady_tick(std::time::Duration::from_millis(100));
                }
                CollectionEvent::Skipped { index, total, query } => {
                    pb.println(format!("[!] [{}/{}] Skipping (exists): {}", index, total, query));
                    pb.inc(1);
                }
                CollectionEvent::Downloading { index, total, query } => {
                    pb.set_message(format!("[{}/{}] {}", index, total, ui::truncate(&query, 40)));
                }
                CollectionEvent::Downloaded { index, total, query, .. } => {
                    pb.println(format!("[+] [{}/{}] Downloaded: {}", index, total, query));
                    pb.inc(1);
                }
                CollectionEvent::Failed {
                    index,
                    total,
                    query,
                    error,
                } => {
                    pb.println(format!("[x] [{}/{}] Failed: {} ({})", index, total, query, error));
                    pb.inc(1);
                }
                CollectionEvent::Finished(summary) => {
                    pb.finish_with_message(format!("Done: {}", summary));
                }
            }
        }
    });

    let job = CollectionJob::new(
        downloader,
        config.download.audio_format,
        config.download.parallel,
        tx,
    );
    let result = job.run(&collection, &config.output.directory).await;

    // Closing the channel lets the progress handler finish
    drop(job);
    progress_handle.await?;

    let summary = result?;
    println!("\nDownload complete: {}", summary);
    Ok(summary)
}

pub fn spotify_client(config: &Config) -> Result<SpotifyClient> {
    let credentials = Credentials::new(&config.spotify.client_id, &config.spotify.client_secret)?;
    Ok(SpotifyClient::new(credentials, config.spotify.max_retries))
}
