//! Spotify Web API response shapes and the resolved track list

use crate::link::LinkKind;
use serde::Deserialize;

/// A track resolved from Spotify, reduced to what a search needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub title: String,
    pub artists: Vec<String>,
}

impl Track {
    /// Comma-joined artist names
    pub fn artist_line(&self) -> String {
        self.artists.join(", ")
    }

    /// Search query in "Artist, Artist - Title" form
    pub fn query(&self) -> String {
        if self.artists.is_empty() {
            self.title.clone()
        } else {
            format!("{} - {}", self.artist_line(), self.title)
        }
    }
}

/// A resolved playlist, album, or single track
#[derive(Debug, Clone)]
pub struct Collection {
    pub kind: LinkKind,
    pub name: String,
    pub tracks: Vec<Track>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_expiry")]
    pub expires_in: u64,
}

fn default_expiry() -> u64 {
    3600
}

#[derive(Debug, Deserialize)]
pub(crate) struct Page<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PlaylistObject {
    pub name: String,
    pub tracks: Page<PlaylistItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PlaylistItem {
    #[serde(default)]
    pub track: Option<TrackObject>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AlbumObject {
    pub name: String,
    pub tracks: Page<TrackObject>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TrackObject {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub artists: Vec<ArtistObject>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ArtistObject {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ErrorBody {
    Api { message: String },
    Auth(String),
}

impl TrackObject {
    /// Convert to a `Track`, dropping entries with no usable title
    pub fn into_track(self) -> Option<Track> {
        let title = self.name.filter(|n| !n.trim().is_empty())?;
        let artists = self
            .artists
            .into_iter()
            .filter_map(|a| a.name)
            .filter(|n| !n.trim().is_empty())
            .collect();
        Some(Track { title, artists })
    }
}

/// Pull a human message out of a Spotify error body, falling back to the raw text
pub(crate) fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(ErrorEnvelope {
            error: ErrorBody::Api { message },
        }) => message,
        Ok(ErrorEnvelope {
            error: ErrorBody::Auth(code),
        }) => code,
        Err(_) => body.trim().to_string(),
    }
}
