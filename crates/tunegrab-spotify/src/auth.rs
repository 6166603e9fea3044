//! Client-credentials authentication against the Spotify accounts service

use crate::model::{error_message, TokenResponse};
use crate::SpotifyError;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

pub(crate) const TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

/// Refresh this long before the token actually expires
const EXPIRY_MARGIN: Duration = Duration::from_secs(30);

/// Client ID / secret pair from the Spotify developer dashboard
#[derive(Clone)]
pub struct Credentials {
    client_id: String,
    client_secret: String,
}

impl Credentials {
    /// Both values must be non-empty after trimming
    pub fn new(client_id: &str, client_secret: &str) -> Result<Self, SpotifyError> {
        let client_id = client_id.trim();
        let client_secret = client_secret.trim();

        if client_id.is_empty() || client_secret.is_empty() {
            return Err(SpotifyError::MissingCredentials);
        }

        Ok(Self {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
        })
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: Instant,
}

impl AccessToken {
    fn is_fresh(&self) -> bool {
        Instant::now() + EXPIRY_MARGIN < self.expires_at
    }
}

/// Caches the bearer token and refreshes it on demand
#[derive(Debug)]
pub(crate) struct TokenProvider {
    credentials: Credentials,
    token_url: String,
    cached: Mutex<Option<AccessToken>>,
}

impl TokenProvider {
    pub fn new(credentials: Credentials, token_url: String) -> Self {
        Self {
            credentials,
            token_url,
            cached: Mutex::new(None),
        }
    }

    pub async fn token(&self, http: &reqwest::Client) -> Result<String, SpotifyError> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh()) {
            return Ok(token.value.clone());
        }

        let token = self.request(http).await?;
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }

    pub async fn invalidate(&self) {
        *self.cached.lock().await = None;
    }

    async fn request(&self, http: &reqwest::Client) -> Result<AccessToken, SpotifyError> {
        debug!("Requesting Spotify access token for client {}", self.credentials.client_id);

        let response = http
            .post(&self.token_url)
            .basic_auth(&self.credentials.client_id, Some(&self.credentials.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 400 || status.as_u16() == 401 {
            return Err(SpotifyError::InvalidCredentials);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SpotifyError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| SpotifyError::Decode(e.to_string()))?;

        Ok(AccessToken {
            value: token.access_token,
            expires_at: Instant::now() + Duration::from_secs(token.expires_in),
        })
    }
}
