//! Error types for tunegrab-core

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TunegrabError>;

#[derive(Error, Debug)]
pub enum TunegrabError {
    #[error("Download failed: {0}")]
    Download(#[from] DownloadError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Spotify: {0}")]
    Spotify(#[from] tunegrab_spotify::SpotifyError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("yt-dlp not found. Install it from https://github.com/yt-dlp/yt-dlp")]
    YtDlpNotFound,

    #[error("FFmpeg not found. Audio extraction and merging need it installed")]
    FfmpegNotFound,

    #[error("yt-dlp failed with exit code {code:?}: {message}")]
    YtDlpFailed { code: Option<i32>, message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Video unavailable or private: {0}")]
    VideoUnavailable(String),

    #[error("Rate limited by the video host. Try again later")]
    RateLimited,

    #[error("No results for: {0}")]
    NoResults(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    LoadError(String),

    #[error("Failed to save config: {0}")]
    SaveError(String),

    #[error("Invalid config value: {0}")]
    InvalidValue(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
