//! Spotify link parsing (open.spotify.com URLs and spotify: URIs)

use crate::SpotifyError;
use regex::Regex;
use std::sync::OnceLock;

/// What a link points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Playlist,
    Album,
    Track,
}

impl LinkKind {
    fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "playlist" => Some(LinkKind::Playlist),
            "album" => Some(LinkKind::Album),
            "track" => Some(LinkKind::Track),
            _ => None,
        }
    }
}

impl std::fmt::Display for LinkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinkKind::Playlist => write!(f, "Playlist"),
            LinkKind::Album => write!(f, "Album"),
            LinkKind::Track => write!(f, "Track"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpotifyLink {
    pub kind: LinkKind,
    pub id: String,
}

fn url_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^https?://open\.spotify\.com/(?:intl-[a-zA-Z-]+/)?(playlist|album|track)/([a-zA-Z0-9]+)(?:[/?#].*)?$",
        )
        .expect("static regex")
    })
}

fn uri_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^spotify:(playlist|album|track):([a-zA-Z0-9]+)$").expect("static regex")
    })
}

impl SpotifyLink {
    /// Parse a share URL or URI into a typed link
    pub fn parse(input: &str) -> Result<Self, SpotifyError> {
        let trimmed = input.trim();

        let caps = url_pattern()
            .captures(trimmed)
            .or_else(|| uri_pattern().captures(trimmed))
            .ok_or_else(|| SpotifyError::InvalidLink(trimmed.to_string()))?;

        let kind = LinkKind::from_segment(&caps[1])
            .ok_or_else(|| SpotifyError::InvalidLink(trimmed.to_string()))?;

        Ok(Self {
            kind,
            id: caps[2].to_string(),
        })
    }
}

impl std::fmt::Display for SpotifyLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let segment = match self.kind {
            LinkKind::Playlist => "playlist",
            LinkKind::Album => "album",
            LinkKind::Track => "track",
        };
        write!(f, "spotify:{}:{}", segment, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_playlist_url() {
        let link =
            SpotifyLink::parse("https://open.spotify.com/playlist/37i9dQZF1DXcBWIGoYBM5M?si=abc123")
                .unwrap();
        assert_eq!(link.kind, LinkKind::Playlist);
        assert_eq!(link.id, "37i9dQZF1DXcBWIGoYBM5M");
    }

    #[test]
    fn test_parse_localized_url() {
        let link =
            SpotifyLink::parse("https://open.spotify.com/intl-de/album/4aawyAB9vmqN3uQ7FjRGTy").unwrap();
        assert_eq!(link.kind, LinkKind::Album);
        assert_eq!(link.id, "4aawyAB9vmqN3uQ7FjRGTy");
    }

    #[test]
    fn test_parse_uri() {
        let link = SpotifyLink::parse("  spotify:track:11dFghVXANMlKmJXsNCbNl ").unwrap();
        assert_eq!(link.kind, LinkKind::Track);
        assert_eq!(link.id, "11dFghVXANMlKmJXsNCbNl");
        assert_eq!(link.to_string(), "spotify:track:11dFghVXANMlKmJXsNCbNl");
    }

    #[test]
    fn test_rejects_other_links() {
        assert!(SpotifyLink::parse("https://open.spotify.com/artist/0OdUWJ0sBjDrqHygGUXeCF").is_err());
        assert!(SpotifyLink::parse("https://example.com/playlist/abc").is_err());
        assert!(SpotifyLink::parse("spotify:playlist:").is_err());
        assert!(matches!(
            SpotifyLink::parse("not a link"),
            Err(SpotifyError::InvalidLink(_))
        ));
    }
}
