//! Spotify Web API client: playlist, album and track resolution

use crate::auth::{Credentials, TokenProvider, TOKEN_URL};
use crate::link::{LinkKind, SpotifyLink};
use crate::model::{
    error_message, AlbumObject, Collection, Page, PlaylistItem, PlaylistObject, Track, TrackObject,
};
use crate::SpotifyError;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, warn};

const API_BASE: &str = "https://api.spotify.com/v1";

/// Wait used when a 429 response carries no Retry-After header
const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(1);

#[derive(Debug)]
pub struct SpotifyClient {
    http: reqwest::Client,
    tokens: TokenProvider,
    api_base: String,
    max_retries: u32,
}

impl SpotifyClient {
    pub fn new(credentials: Credentials, max_retries: u32) -> Self {
        Self::with_endpoints(
            credentials,
            max_retries,
            reqwest::Client::new(),
            API_BASE.to_string(),
            TOKEN_URL.to_string(),
        )
    }

    pub(crate) fn with_endpoints(
        credentials: Credentials,
        max_retries: u32,
        http: reqwest::Client,
        api_base: String,
        token_url: String,
    ) -> Self {
        Self {
            http,
            tokens: TokenProvider::new(credentials, token_url),
            api_base,
            max_retries,
        }
    }

    /// Resolve any supported link to its list of tracks
    pub async fn fetch(&self, link: &SpotifyLink) -> Result<Collection, SpotifyError> {
        info!("Resolving {} {}", link.kind, link.id);

        match link.kind {
            LinkKind::Playlist => self.playlist(&link.id).await,
            LinkKind::Album => self.album(&link.id).await,
            LinkKind::Track => self.track(&link.id).await,
        }
    }

    /// Fetch a playlist and follow its pagination to the end
    pub async fn playlist(&self, id: &str) -> Result<Collection, SpotifyError> {
        let url = format!("{}/playlists/{}", self.api_base, id);
        let playlist: PlaylistObject = self.get_json(&url, "Playlist").await?;

        let mut items = playlist.tracks.items;
        let mut next = playlist.tracks.next;
        while let Some(url) = next {
            let page: Page<PlaylistItem> = self.get_json(&url, "Playlist page").await?;
            items.extend(page.items);
            next = page.next;
        }

        let tracks: Vec<Track> = items
            .into_iter()
            .filter_map(|item| item.track)
            .filter_map(TrackObject::into_track)
            .collect();

        debug!("Playlist {} has {} tracks", playlist.name, tracks.len());

        Ok(Collection {
            kind: LinkKind::Playlist,
            name: playlist.name,
            tracks,
        })
    }

    /// Fetch an album and follow its pagination to the end
    pub async fn album(&self, id: &str) -> Result<Collection, SpotifyError> {
        let url = format!("{}/albums/{}", self.api_base, id);
        let album: AlbumObject = self.get_json(&url, "Album").await?;

        let mut items = album.tracks.items;
        let mut next = album.tracks.next;
        while let Some(url) = next {
            let page: Page<TrackObject> = self.get_json(&url, "Album page").await?;
            items.extend(page.items);
            next = page.next;
        }

        let tracks = items
            .into_iter()
            .filter_map(TrackObject::into_track)
            .collect();

        Ok(Collection {
            kind: LinkKind::Album,
            name: album.name,
            tracks,
        })
    }

    pub async fn track(&self, id: &str) -> Result<Collection, SpotifyError> {
        let url = format!("{}/tracks/{}", self.api_base, id);
        let track: TrackObject = self.get_json(&url, "Track").await?;
        let track = track
            .into_track()
            .ok_or_else(|| SpotifyError::Decode("track has no name".to_string()))?;

        Ok(Collection {
            kind: LinkKind::Track,
            name: track.query(),
            tracks: vec![track],
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, what: &str) -> Result<T, SpotifyError> {
        let mut rate_limited = 0;
        let mut reauthenticated = false;

        loop {
            let token = self.tokens.token(&self.http).await?;
            debug!("GET {}", url);
            let response = self.http.get(url).bearer_auth(&token).send().await?;
            let status = response.status();

            if status.is_success() {
                return response
                    .json::<T>()
                    .await
                    .map_err(|e| SpotifyError::Decode(e.to_string()));
            }

            match status {
                StatusCode::TOO_MANY_REQUESTS => {
                    if rate_limited >= self.max_retries {
                        return Err(SpotifyError::RateLimited(self.max_retries));
                    }
                    rate_limited += 1;
                    let wait = retry_after(response.headers()).unwrap_or(DEFAULT_RETRY_AFTER);
                    warn!(
                        "Rate limited by Spotify (attempt {}/{}), retrying in {}s",
                        rate_limited,
                        self.max_retries,
                        wait.as_secs()
                    );
                    tokio::time::sleep(wait).await;
                }
                StatusCode::UNAUTHORIZED if !reauthenticated => {
                    debug!("Access token rejected, requesting a new one");
                    reauthenticated = true;
                    self.tokens.invalidate().await;
                }
                StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => {
                    return Err(SpotifyError::NotFound(what.to_string()));
                }
                _ => {
                    let body = response.text().await.unwrap_or_default();
                    return Err(SpotifyError::Api {
                        status: status.as_u16(),
                        message: error_message(&body),
                    });
                }
            }
        }
    }
}

/// Parse the Retry-After header (delta-seconds form only)
fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}
