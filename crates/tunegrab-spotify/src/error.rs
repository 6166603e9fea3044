//! Error types for the Spotify bridge

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpotifyError {
    #[error("Spotify API credentials not set. Run: tunegrab configure spotify")]
    MissingCredentials,

    #[error("Spotify rejected the client credentials. Check the client ID and secret")]
    InvalidCredentials,

    #[error("Invalid Spotify link: {0}")]
    InvalidLink(String),

    #[error("{0} not found. It may be private or inaccessible")]
    NotFound(String),

    #[error("Spotify API rate limit hit after {0} retries. Try again later")]
    RateLimited(u32),

    #[error("Spotify API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Unexpected response from Spotify: {0}")]
    Decode(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
