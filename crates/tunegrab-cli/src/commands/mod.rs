pub mod batch;
pub mod config;
pub mod configure;
pub mod doctor;
pub mod get;
pub mod menu;
pub mod playlist;

use anyhow::Result;
use std::path::Path;
use tunegrab_core::Config;

use crate::args::FormatOptions;

/// Load config and overlay per-run flags; nothing here is saved
pub fn load_effective(
    options: &FormatOptions,
    output: Option<&Path>,
    config_path: Option<&Path>,
) -> Result<Config> {
    let mut config = Config::load(config_path)?;
    options.apply(&mut config);
    if let Some(dir) = output {
        config.output.directory = dir.to_path_buf();
    }
    Ok(config)
}
