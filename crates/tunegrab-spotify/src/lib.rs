//! Spotify Web API bridge for tunegrab
//!
//! Resolves playlist, album and track links to plain track lists using the
//! client-credentials flow. Only public catalog data is read.

mod auth;
mod client;
mod error;
mod link;
mod model;
#[cfg(test)]
mod stub;

pub use auth::Credentials;
pub use client::SpotifyClient;
pub use error::SpotifyError;
pub use link::{LinkKind, SpotifyLink};
pub use model::{Collection, Track};
