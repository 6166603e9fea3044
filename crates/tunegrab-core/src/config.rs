//! Configuration management for tunegrab

use crate::error::ConfigError;
use crate::format::{AudioFormat, AudioQuality, VideoFormat};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub spotify: SpotifyConfig,
    pub output: OutputConfig,
    pub download: DownloadConfig,
    pub paths: PathsConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyConfig {
    /// Client ID from the Spotify developer dashboard
    pub client_id: String,
    /// Client secret from the Spotify developer dashboard
    pub client_secret: String,
    /// Retries for rate-limited API requests
    pub max_retries: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Where downloads land; playlists get a subdirectory each
    pub directory: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    pub audio_quality: AudioQuality,
    pub audio_format: AudioFormat,
    pub video_format: VideoFormat,
    /// Simultaneous downloads when converting a playlist
    pub parallel: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Path to yt-dlp binary (auto-detected if not set)
    pub yt_dlp: Option<PathBuf>,
    /// Path to FFmpeg binary (auto-detected if not set)
    pub ffmpeg: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Colorful,
    Plain,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    pub theme: Theme,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            spotify: SpotifyConfig {
                client_id: String::new(),
                client_secret: String::new(),
                max_retries: 3,
            },
            output: OutputConfig {
                directory: default_output_dir(),
            },
            download: DownloadConfig {
                audio_quality: AudioQuality::default(),
                audio_format: AudioFormat::Mp3,
                video_format: VideoFormat::Mp4,
                parallel: 1,
            },
            paths: PathsConfig {
                yt_dlp: None,
                ffmpeg: None,
            },
            ui: UiConfig {
                theme: Theme::Colorful,
            },
        }
    }
}

/// Where first-run defaults go: the default file, and only when no config file exists at all
fn init_target(default_file: Option<PathBuf>, config_file: Option<&Path>) -> Option<PathBuf> {
    let default_file = default_file.filter(|p| !p.exists())?;
    match config_file {
        Some(path) if path.exists() => None,
        _ => Some(default_file),
    }
}

fn default_output_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join("Music"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Spotify Downloads")
}

impl Config {
    /// `<config_dir>/tunegrab/config.toml`
    pub fn default_file() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("tunegrab/config.toml"))
    }

    /// Load configuration from file and environment
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        // TUNEGRAB_SPOTIFY__CLIENT_ID -> spotify.client_id
        let figment = Self::file_figment(config_file).merge(Env::prefixed("TUNEGRAB_").split("__"));
        Self::extract(figment)
    }

    /// Load what is on disk only, ignoring environment overrides.
    /// Edits saved back to a file start from this.
    pub fn load_file(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        Self::extract(Self::file_figment(config_file))
    }

    fn file_figment(config_file: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        // Load from default config directory
        if let Some(default_config) = Self::default_file() {
            if default_config.exists() {
                figment = figment.merge(Toml::file(&default_config));
            }
        }

        // Load from specified config file
        if let Some(path) = config_file {
            figment = figment.merge(Toml::file(path));
        }

        figment
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        let config: Config = figment
            .extract()
            .map_err(|e| ConfigError::LoadError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load, writing defaults to the default location first when neither
    /// that file nor `config_file` exists yet.
    /// Returns the config and the path it was written to, if any.
    pub fn load_or_init(config_file: Option<&Path>) -> Result<(Self, Option<PathBuf>), ConfigError> {
        let created = match init_target(Self::default_file(), config_file) {
            Some(path) => {
                Config::default().save(&path)?;
                Some(path)
            }
            None => None,
        };

        Ok((Self::load(config_file)?, created))
    }

    /// Write as TOML, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        self.validate()?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let body = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveError(e.to_string()))?;
        std::fs::write(path, body)?;
        Ok(())
    }

    /// File that `save` should target for the given `--config` override
    pub fn save_target(config_file: Option<&Path>) -> Result<PathBuf, ConfigError> {
        config_file
            .map(Path::to_path_buf)
            .or_else(Self::default_file)
            .ok_or_else(|| ConfigError::SaveError("no config directory on this platform".to_string()))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.download.parallel == 0 {
            return Err(ConfigError::InvalidValue(
                "download.parallel must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// True when both Spotify credentials are filled in
    pub fn has_spotify_credentials(&self) -> bool {
        !self.spotify.client_id.trim().is_empty() && !self.spotify.client_secret.trim().is_empty()
    }

    /// Get yt-dlp path, auto-detecting if not configured
    pub fn yt_dlp_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(ref path) = self.paths.yt_dlp {
            Ok(path.clone())
        } else {
            which::which("yt-dlp")
                .map_err(|_| ConfigError::InvalidValue("yt-dlp not found in PATH".to_string()))
        }
    }

    /// Get FFmpeg path, auto-detecting if not configured
    pub fn ffmpeg_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(ref path) = self.paths.ffmpeg {
            Ok(path.clone())
        } else {
            which::which("ffmpeg")
                .map_err(|_| ConfigError::InvalidValue("ffmpeg not found in PATH".to_string()))
        }
    }
}
