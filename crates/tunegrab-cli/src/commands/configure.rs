use anyhow::{Context, Result};
use dialoguer::{Input, Password, Select};
use std::path::{Path, PathBuf};
use tracing::info;
use tunegrab_core::format::{AudioFormat, AudioQuality, VideoFormat};
use tunegrab_core::Config;
use tunegrab_spotify::Credentials;

use crate::args::FormatOptions;
use crate::ui;

const DASHBOARD_URL: &str = "https://developer.spotify.com/dashboard";

pub fn spotify(
    client_id: Option<String>,
    client_secret: Option<String>,
    config_path: Option<&Path>,
) -> Result<()> {
    let mut config = Config::load_file(config_path)?;
    let theme = ui::prompt_theme(config.ui.theme);

    if client_id.is_none() || client_secret.is_none() {
        println!("\nSpotify API Configuration");
        println!("To get Spotify API credentials:");
        println!("1. Go to {}", DASHBOARD_URL);
        println!("2. Log in and create an app");
        println!("3. Copy the Client ID and Client Secret\n");
    }

    let client_id = match client_id {
        Some(id) => id,
        None => Input::<String>::with_theme(theme.as_ref())
            .with_prompt("Enter Spotify Client ID")
            .allow_empty(true)
            .interact_text()?,
    };
    let client_secret = match client_secret {
        Some(secret) => secret,
        None => Password::with_theme(theme.as_ref())
            .with_prompt("Enter Spotify Client Secret")
            .allow_empty_password(true)
            .interact()?,
    };

    let credentials =
        Credentials::new(&client_id, &client_secret).context("Invalid credentials provided")?;

    config.spotify.client_id = credentials.client_id().to_string();
    config.spotify.client_secret = client_secret.trim().to_string();
    save(&config, config_path)?;

    info!("Spotify credentials saved successfully!");
    Ok(())
}

pub fn output(dir: Option<PathBuf>, config_path: Option<&Path>) -> Result<()> {
    let mut config = Config::load_file(config_path)?;
    println!("\nCurrent output directory: {}", config.output.directory.display());

    let dir = match dir {
        Some(dir) => dir,
        None => {
            let theme = ui::prompt_theme(config.ui.theme);
            let entered = Input::<String>::with_theme(theme.as_ref())
                .with_prompt("Enter new output directory path (empty keeps current)")
                .allow_empty(true)
                .interact_text()?;
            let entered = entered.trim();
            if entered.is_empty() {
                info!("Output directory unchanged");
                return Ok(());
            }
            PathBuf::from(entered)
        }
    };

    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Invalid directory: {}", dir.display()))?;

    config.output.directory = dir;
    save(&config, config_path)?;

    info!("Output path set to: {}", config.output.directory.display());
    Ok(())
}

pub fn download(
    options: &FormatOptions,
    parallel: Option<usize>,
    config_path: Option<&Path>,
) -> Result<()> {
    let mut config = Config::load_file(config_path)?;

    if options.is_empty() && parallel.is_none() {
        if !prompt_download_setting(&mut config)? {
            return Ok(());
        }
    } else {
        options.apply(&mut config);
        if let Some(parallel) = parallel {
            if parallel == 0 {
                anyhow::bail!("parallel must be at least 1");
            }
            config.download.parallel = parallel;
        }
    }

    save(&config, config_path)?;
    info!(
        "Download settings: quality {}, audio format {}, video format {}, parallel {}",
        config.download.audio_quality,
        config.download.audio_format,
        config.download.video_format,
        config.download.parallel
    );
    Ok(())
}

/// Menu for changing one download setting; false when cancelled
fn prompt_download_setting(config: &mut Config) -> Result<bool> {
    let theme = ui::prompt_theme(config.ui.theme);

    let items = [
        format!("Audio Quality (current: {})", config.download.audio_quality),
        format!("Audio Format (current: {})", config.download.audio_format),
        format!("Video Format (current: {})", config.download.video_format),
        "Cancel".to_string(),
    ];

    let choice = Select::with_theme(theme.as_ref())
        .with_prompt("Choose setting to change")
        .items(&items)
        .default(0)
        .interact()?;

    match choice {
        0 => {
            let quality: AudioQuality = Input::<String>::with_theme(theme.as_ref())
                .with_prompt("Enter audio quality (e.g., 128K, 192K, 320K)")
                .interact_text()?
                .parse()?;
            config.download.audio_quality = quality;
        }
        1 => {
            let options: Vec<&str> = AudioFormat::ALL.iter().map(|f| f.as_arg()).collect();
            let idx = Select::with_theme(theme.as_ref())
                .with_prompt("Audio format")
                .items(&options)
                .default(current_index(&AudioFormat::ALL, &config.download.audio_format))
                .interact()?;
            config.download.audio_format = AudioFormat::ALL[idx];
        }
        2 => {
            let options: Vec<&str> = VideoFormat::ALL.iter().map(|f| f.as_arg()).collect();
            let idx = Select::with_theme(theme.as_ref())
                .with_prompt("Video format")
                .items(&options)
                .default(current_index(&VideoFormat::ALL, &config.download.video_format))
                .interact()?;
            config.download.video_format = VideoFormat::ALL[idx];
        }
        _ => return Ok(false),
    }

    Ok(true)
}

fn current_index<T: PartialEq>(all: &[T], current: &T) -> usize {
    all.iter().position(|v| v == current).unwrap_or(0)
}

fn save(config: &Config, config_path: Option<&Path>) -> Result<()> {
    let path = Config::save_target(config_path)?;
    config
        .save(&path)
        .with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_flags_are_saved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        Config::default().save(&path).unwrap();

        let options = FormatOptions {
            format: Some(AudioFormat::Flac),
            quality: Some(AudioQuality::Vbr(0)),
            video_format: None,
        };
        download(&options, Some(3), Some(&path)).unwrap();

        let saved = Config::load_file(Some(&path)).unwrap();
        assert_eq!(saved.download.audio_format, AudioFormat::Flac);
        assert_eq!(saved.download.audio_quality, AudioQuality::Vbr(0));
        assert_eq!(saved.download.video_format, VideoFormat::Mp4);
        assert_eq!(saved.download.parallel, 3);
    }

    #[test]
    fn test_spotify_flags_are_saved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        Config::default().save(&path).unwrap();

        spotify(Some(" my-id ".to_string()), Some("my-secret".to_string()), Some(&path)).unwrap();
        let saved = Config::load_file(Some(&path)).unwrap();
        assert_eq!(saved.spotify.client_id, "my-id");
        assert_eq!(saved.spotify.client_secret, "my-secret");

        assert!(spotify(Some("id".to_string()), Some("  ".to_string()), Some(&path)).is_err());
    }

    #[test]
    fn test_output_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let target = dir.path().join("music/downloads");
        Config::default().save(&path).unwrap();

        output(Some(target.clone()), Some(&path)).unwrap();
        assert!(target.is_dir());
        assert_eq!(Config::load_file(Some(&path)).unwrap().output.directory, target);
    }

    #[test]
    fn test_current_index() {
        assert_eq!(current_index(&VideoFormat::ALL, &VideoFormat::Webm), 2);
    }
}
