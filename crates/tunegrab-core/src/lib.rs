//! tunegrab-core: configuration and yt-dlp download pipeline for tunegrab

pub mod collection;
pub mod config;
pub mod downloader;
pub mod error;
pub mod format;
pub mod naming;
pub mod tools;

pub use config::Config;
pub use error::{Result, TunegrabError};
