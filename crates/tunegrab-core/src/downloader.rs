//! Media downloader using yt-dlp

use crate::config::{Config, DownloadConfig};
use crate::error::DownloadError;
use crate::format::{AudioFormat, AudioQuality, VideoFormat};
use crate::naming::escape_template;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Format selector for video downloads: mp4 video + m4a audio, else best single file
const VIDEO_FORMAT_SELECTOR: &str = "bestvideo[ext=mp4]+bestaudio[ext=m4a]/best";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Audio,
    Video,
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaKind::Audio => write!(f, "music"),
            MediaKind::Video => write!(f, "video"),
        }
    }
}

/// One thing to download: a URL or a free-text search
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub query: String,
    pub kind: MediaKind,
    /// Fixed output file name (without extension); the video title is used when unset
    pub file_stem: Option<String>,
}

impl DownloadRequest {
    pub fn new(query: impl Into<String>, kind: MediaKind) -> Self {
        Self {
            query: query.into(),
            kind,
            file_stem: None,
        }
    }

    pub fn with_file_stem(mut self, stem: impl Into<String>) -> Self {
        self.file_stem = Some(stem.into());
        self
    }

    /// The argument actually handed to yt-dlp
    pub fn target(&self) -> String {
        resolve_query(&self.query, self.kind)
    }
}

/// URLs pass through; anything else becomes a first-hit YouTube search
pub fn resolve_query(query: &str, kind: MediaKind) -> String {
    let query = query.trim();
    if is_url(query) {
        return query.to_string();
    }

    match kind {
        MediaKind::Audio => format!("ytsearch1:{} official audio", query),
        MediaKind::Video => format!("ytsearch1:{} official video", query),
    }
}

fn is_url(input: &str) -> bool {
    let lower = input.get(..8).unwrap_or(input).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Format and quality choices applied to every download
#[derive(Debug, Clone)]
pub struct DownloadSettings {
    pub audio_format: AudioFormat,
    pub audio_quality: AudioQuality,
    pub video_format: VideoFormat,
}

impl From<&DownloadConfig> for DownloadSettings {
    fn from(config: &DownloadConfig) -> Self {
        Self {
            audio_format: config.audio_format,
            audio_quality: config.audio_quality,
            video_format: config.video_format,
        }
    }
}

/// Anything that can turn a request into files on disk
#[allow(async_fn_in_trait)]
pub trait Fetch {
    async fn fetch(
        &self,
        request: &DownloadRequest,
        output_dir: &Path,
    ) -> Result<Vec<PathBuf>, DownloadError>;
}

#[derive(Debug)]
pub struct Downloader {
    yt_dlp_path: PathBuf,
    ffmpeg_path: Option<PathBuf>,
    settings: DownloadSettings,
}

impl Downloader {
    pub fn new(yt_dlp_path: PathBuf, ffmpeg_path: Option<PathBuf>, settings: DownloadSettings) -> Self {
        Self {
            yt_dlp_path,
            ffmpeg_path,
            settings,
        }
    }

    /// Build from configuration; yt-dlp is required, an explicit ffmpeg path is optional
    pub fn from_config(config: &Config) -> Result<Self, DownloadError> {
        let yt_dlp_path = config.yt_dlp_path().map_err(|_| DownloadError::YtDlpNotFound)?;
        Ok(Self::new(
            yt_dlp_path,
            config.paths.ffmpeg.clone(),
            DownloadSettings::from(&config.download),
        ))
    }

    /// Full yt-dlp argument list for a request
    pub fn build_args(&self, request: &DownloadRequest, output_dir: &Path) -> Vec<OsString> {
        let stem = request
            .file_stem
            .as_deref()
            .map(escape_template)
            .unwrap_or_else(|| "%(title)s".to_string());
        let template = output_dir.join(format!("{}.%(ext)s", stem));

        let mut args: Vec<OsString> = vec!["-o".into(), template.into_os_string()];
        args.extend(
            ["--no-warnings", "--newline", "--no-simulate", "--print", "after_move:filepath"]
                .map(OsString::from),
        );

        if let Some(ref ffmpeg) = self.ffmpeg_path {
            args.push("--ffmpeg-location".into());
            args.push(ffmpeg.clone().into_os_string());
        }

        match request.kind {
            MediaKind::Audio => {
                args.push("-x".into());
                args.push("--audio-format".into());
                args.push(self.settings.audio_format.as_arg().into());
                args.push("--audio-quality".into());
                args.push(self.settings.audio_quality.to_string().into());
                args.push("--embed-thumbnail".into());
                args.push("--embed-metadata".into());
            }
            MediaKind::Video => {
                args.push("-f".into());
                args.push(VIDEO_FORMAT_SELECTOR.into());
                args.push("--merge-output-format".into());
                args.push(self.settings.video_format.as_arg().into());
            }
        }

        args.push(request.target().into());
        args
    }
}

impl Fetch for Downloader {
    async fn fetch(
        &self,
        request: &DownloadRequest,
        output_dir: &Path,
    ) -> Result<Vec<PathBuf>, DownloadError> {
        debug!("Downloading {}: {}", request.kind, request.query);

        tokio::fs::create_dir_all(output_dir).await?;

        let args = self.build_args(request, output_dir);
        debug!("{} {:?}", self.yt_dlp_path.display(), args);

        let output = Command::new(&self.yt_dlp_path)
            .args(&args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => DownloadError::YtDlpNotFound,
                _ => DownloadError::Io(e),
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            debug!("yt-dlp stderr: {}", stderr);
            return Err(classify_failure(&stderr, output.status.code(), &request.query));
        }

        let files = printed_paths(&String::from_utf8_lossy(&output.stdout));
        if files.is_empty() {
            return Err(DownloadError::NoResults(request.query.clone()));
        }

        debug!("Downloaded: {:?}", files);
        Ok(files)
    }
}

/// Paths yt-dlp printed for `after_move:filepath`, one per line
fn printed_paths(stdout: &str) -> Vec<PathBuf> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('['))
        .map(PathBuf::from)
        .collect()
}

/// Map yt-dlp stderr to the failure modes users can act on
fn classify_failure(stderr: &str, code: Option<i32>, query: &str) -> DownloadError {
    let lower = stderr.to_lowercase();

    if lower.contains("video unavailable") || lower.contains("private video") {
        return DownloadError::VideoUnavailable(query.to_string());
    }
    if lower.contains("is not a valid url") || lower.contains("unsupported url") {
        return DownloadError::InvalidUrl(query.to_string());
    }
    if lower.contains("http error 429") || lower.contains("too many requests") {
        return DownloadError::RateLimited;
    }
    if lower.contains("ffmpeg not found") || lower.contains("ffprobe and ffmpeg not found") {
        return DownloadError::FfmpegNotFound;
    }

    let message = stderr
        .lines()
        .rev()
        .find(|l| l.starts_with("ERROR"))
        .or_else(|| stderr.lines().rev().find(|l| !l.trim().is_empty()))
        .unwrap_or("no error output")
        .trim()
        .to_string();

    DownloadError::YtDlpFailed { code, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn downloader(ffmpeg: Option<&str>) -> Downloader {
        Downloader::new(
            PathBuf::from("yt-dlp"),
            ffmpeg.map(PathBuf::from),
            DownloadSettings {
                audio_format: AudioFormat::Mp3,
                audio_quality: AudioQuality::Bitrate(192),
                video_format: VideoFormat::Mkv,
            },
        )
    }

    fn as_strings(args: Vec<OsString>) -> Vec<String> {
        args.into_iter().map(|a| a.to_string_lossy().into_owned()).collect()
    }

    #[test]
    fn test_resolve_query() {
        assert_eq!(
            resolve_query("https://www.youtube.com/watch?v=dQw4w9WgXcQ", MediaKind::Audio),
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
        );
        assert_eq!(
            resolve_query(" HTTP://youtu.be/abc ", MediaKind::Video),
            "HTTP://youtu.be/abc"
        );
        assert_eq!(
            resolve_query("Daft Punk - One More Time", MediaKind::Audio),
            "ytsearch1:Daft Punk - One More Time official audio"
        );
        assert_eq!(
            resolve_query("Daft Punk - One More Time", MediaKind::Video),
            "ytsearch1:Daft Punk - One More Time official video"
        );
    }

    #[test]
    fn test_audio_args() {
        let request = DownloadRequest::new("Artist - Song", MediaKind::Audio);
        let args = as_strings(downloader(None).build_args(&request, Path::new("/music")));

        assert_eq!(args[0], "-o");
        assert_eq!(args[1], format!("{}", Path::new("/music").join("%(title)s.%(ext)s").display()));
        assert!(args.windows(2).any(|w| w == ["--audio-format", "mp3"]));
        assert!(args.windows(2).any(|w| w == ["--audio-quality", "192K"]));
        assert!(args.contains(&"-x".to_string()));
        assert!(args.contains(&"--embed-thumbnail".to_string()));
        assert!(!args.contains(&"--ffmpeg-location".to_string()));
        assert_eq!(args.last().unwrap(), "ytsearch1:Artist - Song official audio");
    }

    #[test]
    fn test_video_args_with_ffmpeg_and_stem() {
        let request = DownloadRequest::new("https://youtu.be/abc", MediaKind::Video)
            .with_file_stem("50% Off");
        let args = as_strings(downloader(Some("/opt/ffmpeg")).build_args(&request, Path::new("out")));

        assert_eq!(args[1], format!("{}", Path::new("out").join("50%% Off.%(ext)s").display()));
        assert!(args.windows(2).any(|w| w == ["-f", VIDEO_FORMAT_SELECTOR]));
        assert!(args.windows(2).any(|w| w == ["--merge-output-format", "mkv"]));
        assert!(args.windows(2).any(|w| w == ["--ffmpeg-location", "/opt/ffmpeg"]));
        assert!(!args.contains(&"-x".to_string()));
        assert_eq!(args.last().unwrap(), "https://youtu.be/abc");
    }

    #[test]
    fn test_printed_paths() {
        let stdout = "/music/A - B.mp3\n\n[download] something\n/music/C.mp3\n";
        assert_eq!(
            printed_paths(stdout),
            vec![PathBuf::from("/music/A - B.mp3"), PathBuf::from("/music/C.mp3")]
        );
    }

    #[test]
    fn test_classify_failure() {
        assert!(matches!(
            classify_failure("ERROR: [youtube] abc: Private video. Sign in", Some(1), "q"),
            DownloadError::VideoUnavailable(_)
        ));
        assert!(matches!(
            classify_failure("ERROR: 'foo' is not a valid URL", Some(1), "foo"),
            DownloadError::InvalidUrl(_)
        ));
        assert!(matches!(
            classify_failure("ERROR: unable to download: HTTP Error 429: Too Many Requests", Some(1), "q"),
            DownloadError::RateLimited
        ));
        assert!(matches!(
            classify_failure("ERROR: Postprocessing: ffprobe and ffmpeg not found", Some(1), "q"),
            DownloadError::FfmpegNotFound
        ));

        match classify_failure("WARNING: x\nERROR: Requested format is not available\n", Some(1), "q") {
            DownloadError::YtDlpFailed { code, message } => {
                assert_eq!(code, Some(1));
                assert_eq!(message, "ERROR: Requested format is not available");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
