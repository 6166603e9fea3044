use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tunegrab_core::format::{AudioFormat, AudioQuality, VideoFormat};
use tunegrab_core::Config;

#[derive(Parser)]
#[command(name = "tunegrab")]
#[command(author, version, about = "Download Spotify playlists and YouTube media with yt-dlp")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Run without a subcommand to open the interactive menu
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output directory (overrides the configured one for this run)
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download every track of a Spotify playlist, album or track link
    Playlist {
        /// open.spotify.com link or spotify: URI
        link: String,

        #[command(flatten)]
        options: FormatOptions,
    },

    /// Download a single YouTube URL or the first search hit for a query
    Get {
        /// URL or search query
        query: String,

        /// Download video instead of music
        #[arg(long)]
        video: bool,

        #[command(flatten)]
        options: FormatOptions,
    },

    /// Download every URL or query listed in a file
    Batch {
        /// File with one URL or query per line (# starts a comment)
        #[arg(short, long)]
        input: PathBuf,

        /// Download video instead of music
        #[arg(long)]
        video: bool,

        /// Maximum parallel downloads (defaults to download.parallel)
        #[arg(short, long)]
        parallel: Option<usize>,

        #[command(flatten)]
        options: FormatOptions,
    },

    /// Change and save settings
    Configure {
        #[command(subcommand)]
        target: ConfigureTarget,
    },

    /// Show configuration
    Config,

    /// Check external dependencies
    Doctor,
}

#[derive(Subcommand)]
pub enum ConfigureTarget {
    /// Spotify API client credentials (prompts for anything not given)
    Spotify {
        #[arg(long)]
        client_id: Option<String>,

        #[arg(long)]
        client_secret: Option<String>,
    },

    /// Default output directory (prompts when omitted)
    Output {
        dir: Option<PathBuf>,
    },

    /// Audio quality, audio format and video format (prompts when nothing is given)
    Download {
        #[command(flatten)]
        options: FormatOptions,

        /// Simultaneous downloads for playlists and batches
        #[arg(long)]
        parallel: Option<usize>,
    },
}

#[derive(clap::Args, Clone, Debug, Default)]
pub struct FormatOptions {
    /// Audio format: mp3, m4a, aac, flac, opus, vorbis, wav, alac
    #[arg(short, long)]
    pub format: Option<AudioFormat>,

    /// Audio quality: 0-10 (VBR, 0 best) or a bitrate such as 128K, 192K, 320K
    #[arg(short, long)]
    pub quality: Option<AudioQuality>,

    /// Video container: mp4, mkv, webm, avi, mov, flv
    #[arg(long)]
    pub video_format: Option<VideoFormat>,
}

impl FormatOptions {
    pub fn is_empty(&self) -> bool {
        self.format.is_none() && self.quality.is_none() && self.video_format.is_none()
    }

    /// Overlay the given flags on a loaded config
    pub fn apply(&self, config: &mut Config) {
        if let Some(format) = self.format {
            config.download.audio_format = format;
        }
        if let Some(quality) = self.quality {
            config.download.audio_quality = quality;
        }
        if let Some(video_format) = self.video_format {
            config.download.video_format = video_format;
        }
    }
}
