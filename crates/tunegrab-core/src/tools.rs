//! External tool discovery (yt-dlp, FFmpeg)

use crate::config::Config;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolStatus {
    Found { path: PathBuf, version: String },
    /// Present but `--version` did not run cleanly
    Broken { path: PathBuf },
    Missing,
}

impl ToolStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, ToolStatus::Found { .. })
    }
}

#[derive(Debug, Clone)]
pub struct ToolReport {
    pub yt_dlp: ToolStatus,
    pub ffmpeg: ToolStatus,
}

impl ToolReport {
    /// yt-dlp is required; FFmpeg is only recommended
    pub fn can_download(&self) -> bool {
        self.yt_dlp.is_ok()
    }
}

pub async fn check_tools(config: &Config) -> ToolReport {
    let yt_dlp = match config.yt_dlp_path() {
        Ok(path) => query_version(&path, "--version", parse_yt_dlp_version).await,
        Err(_) => ToolStatus::Missing,
    };

    let ffmpeg = match config.ffmpeg_path() {
        Ok(path) => query_version(&path, "-version", parse_ffmpeg_version).await,
        Err(_) => ToolStatus::Missing,
    };

    ToolReport { yt_dlp, ffmpeg }
}

async fn query_version(path: &Path, flag: &str, parse: fn(&str) -> Option<String>) -> ToolStatus {
    match Command::new(path).arg(flag).output().await {
        Ok(out) if out.status.success() => {
            let stdout = String::from_utf8_lossy(&out.stdout);
            let version = parse(&stdout).unwrap_or_else(|| "unknown".to_string());
            debug!("{} version {}", path.display(), version);
            ToolStatus::Found {
                path: path.to_path_buf(),
                version,
            }
        }
        Ok(_) => ToolStatus::Broken {
            path: path.to_path_buf(),
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => ToolStatus::Missing,
        Err(_) => ToolStatus::Broken {
            path: path.to_path_buf(),
        },
    }
}

fn parse_yt_dlp_version(stdout: &str) -> Option<String> {
    stdout
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(str::to_string)
}

/// "ffmpeg version 6.1.1 Copyright ..." -> "6.1.1"
fn parse_ffmpeg_version(stdout: &str) -> Option<String> {
    stdout
        .lines()
        .next()?
        .split_whitespace()
        .nth(2)
        .map(str::to_string)
}
