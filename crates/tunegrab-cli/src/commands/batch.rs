use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use indicatif::{MultiProgress, ProgressBar};
use std::path::Path;
use tokio::fs;
use tunegrab_core::downloader::{DownloadRequest, Downloader, Fetch, MediaKind};

use crate::args::FormatOptions;
use crate::ui;

pub async fn run(
    input: &Path,
    kind: MediaKind,
    parallel: Option<usize>,
    options: &FormatOptions,
    output: Option<&Path>,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = super::load_effective(options, output, config_path)?;

    // Read URLs / queries from file
    let content = fs::read_to_string(input)
        .await
        .context("Failed to read input file")?;

    let queries = parse_input(&content);
    if queries.is_empty() {
        println!("No URLs or queries found in input file");
        return Ok(());
    }

    let parallel = parallel.unwrap_or(config.download.parallel).max(1);
    let total = queries.len();
    println!("Processing {} entries with {} parallel workers\n", total, parallel);

    let downloader = Downloader::from_config(&config)?;
    let output_dir = config.output.directory.clone();
    let multi = MultiProgress::new();
    let spinner_style = ui::spinner_style(config.ui.theme)?;

    let results: Vec<_> = stream::iter(queries.into_iter().enumerate())
        .map(|(idx, query)| {
            let pb = multi.add(ProgressBar::new_spinner());
            pb.set_style(spinner_style.clone());
            let downloader = &downloader;
            let output_dir = &output_dir;

            async move {
                pb.set_message(format!("[{}/{}] {}", idx + 1, total, ui::truncate(&query, 50)));
                pb.enable_steady_tick(std::time::Duration::from_millis(100));

                let request = DownloadRequest::new(query.clone(), kind);
                let result = downloader.fetch(&request, output_dir).await;

                match &result {
                    Ok(files) => {
                        let name = files
                            .first()
                            .and_then(|p| p.file_name())
                            .map(|n| n.to_string_lossy().into_owned())
                            .unwrap_or_default();
                        pb.finish_with_message(format!("[{}/{}] Done: {}", idx + 1, total, name));
                    }
                    Err(e) => {
                        pb.finish_with_message(format!("[{}/{}] Failed: {}", idx + 1, total, e));
                    }
                }

                (query, result)
            }
        })
        .buffer_unordered(parallel)
        .collect()
        .await;

    // Summary
    let failed: Vec<_> = results.iter().filter(|(_, r)| r.is_err()).collect();

    println!("\n=== Batch Complete ===");
    println!("Succeeded: {}", results.len() - failed.len());
    println!("Failed: {}", failed.len());

    if !failed.is_empty() {
        println!("\nFailed entries:");
        for (query, result) in &failed {
            if let Err(e) = result {
                println!("  {} - {}", query, e);
            }
        }
    }

    Ok(())
}

/// One entry per non-empty line; lines starting with # are comments
fn parse_input(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input() {
        let content = "# favourites\nhttps://youtu.be/abc\n\n   Artist - Song  \n#skip me\n";
        assert_eq!(parse_input(content), vec!["https://youtu.be/abc", "Artist - Song"]);
    }
}
