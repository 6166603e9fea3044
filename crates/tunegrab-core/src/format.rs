//! Output formats and audio quality accepted by yt-dlp

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum AudioFormat {
    Mp3,
    M4a,
    Aac,
    Flac,
    Opus,
    Vorbis,
    Wav,
    Alac,
}

impl AudioFormat {
    pub const ALL: [AudioFormat; 8] = [
        AudioFormat::Mp3,
        AudioFormat::M4a,
        AudioFormat::Aac,
        AudioFormat::Flac,
        AudioFormat::Opus,
        AudioFormat::Vorbis,
        AudioFormat::Wav,
        AudioFormat::Alac,
    ];

    /// Value passed to `--audio-format`
    pub fn as_arg(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::M4a => "m4a",
            AudioFormat::Aac => "aac",
            AudioFormat::Flac => "flac",
            AudioFormat::Opus => "opus",
            AudioFormat::Vorbis => "vorbis",
            AudioFormat::Wav => "wav",
            AudioFormat::Alac => "alac",
        }
    }

    /// Extension of the file yt-dlp leaves behind
    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::Vorbis => "ogg",
            AudioFormat::Alac => "m4a",
            other => other.as_arg(),
        }
    }
}

impl FromStr for AudioFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|f| f.as_arg() == wanted)
            .ok_or_else(|| {
                ConfigError::InvalidValue(format!(
                    "unknown audio format '{}' (expected one of: {})",
                    s,
                    join(Self::ALL.iter().map(|f| f.as_arg()))
                ))
            })
    }
}

impl TryFrom<String> for AudioFormat {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_arg())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum VideoFormat {
    Mp4,
    Mkv,
    Webm,
    Avi,
    Mov,
    Flv,
}

impl VideoFormat {
    pub const ALL: [VideoFormat; 6] = [
        VideoFormat::Mp4,
        VideoFormat::Mkv,
        VideoFormat::Webm,
        VideoFormat::Avi,
        VideoFormat::Mov,
        VideoFormat::Flv,
    ];

    /// Value passed to `--merge-output-format`, also the file extension
    pub fn as_arg(&self) -> &'static str {
        match self {
            VideoFormat::Mp4 => "mp4",
            VideoFormat::Mkv => "mkv",
            VideoFormat::Webm => "webm",
            VideoFormat::Avi => "avi",
            VideoFormat::Mov => "mov",
            VideoFormat::Flv => "flv",
        }
    }
}

impl FromStr for VideoFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|f| f.as_arg() == wanted)
            .ok_or_else(|| {
                ConfigError::InvalidValue(format!(
                    "unknown video format '{}' (expected one of: {})",
                    s,
                    join(Self::ALL.iter().map(|f| f.as_arg()))
                ))
            })
    }
}

impl TryFrom<String> for VideoFormat {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::fmt::Display for VideoFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_arg())
    }
}

/// `--audio-quality` value: VBR level 0 (best) to 10, or a bitrate like `192K`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawQuality", into = "String")]
pub enum AudioQuality {
    Vbr(u8),
    Bitrate(u32),
}

impl AudioQuality {
    const MIN_KBPS: u32 = 8;
    const MAX_KBPS: u32 = 512;
}

impl Default for AudioQuality {
    fn default() -> Self {
        AudioQuality::Bitrate(192)
    }
}

impl FromStr for AudioQuality {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || {
            ConfigError::InvalidValue(format!(
                "invalid audio quality '{}' (use 0-10 or a bitrate such as 128K, 192K, 320K)",
                s
            ))
        };

        if let Some(kbps) = trimmed.strip_suffix(['K', 'k']) {
            let kbps: u32 = kbps.parse().map_err(|_| invalid())?;
            if !(Self::MIN_KBPS..=Self::MAX_KBPS).contains(&kbps) {
                return Err(invalid());
            }
            return Ok(AudioQuality::Bitrate(kbps));
        }

        match trimmed.parse::<u8>() {
            Ok(level) if level <= 10 => Ok(AudioQuality::Vbr(level)),
            _ => Err(invalid()),
        }
    }
}

/// Env values and TOML may carry a bare VBR level as a number
#[derive(Deserialize)]
#[serde(untagged)]
enum RawQuality {
    Level(u64),
    Text(String),
}

impl TryFrom<RawQuality> for AudioQuality {
    type Error = ConfigError;

    fn try_from(value: RawQuality) -> Result<Self, Self::Error> {
        match value {
            RawQuality::Level(level) => level.to_string().parse(),
            RawQuality::Text(text) => text.parse(),
        }
    }
}

impl From<AudioQuality> for String {
    fn from(value: AudioQuality) -> Self {
        value.to_string()
    }
}

impl std::fmt::Display for AudioQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AudioQuality::Vbr(level) => write!(f, "{}", level),
            AudioQuality::Bitrate(kbps) => write!(f, "{}K", kbps),
        }
    }
}

fn join<'a>(values: impl Iterator<Item = &'a str>) -> String {
    values.collect::<Vec<_>>().join(", ")
}
