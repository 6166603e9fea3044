mod args;
mod commands;
mod ui;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use tunegrab_core::downloader::MediaKind;
use tunegrab_core::Config;

use args::{Cli, Commands, ConfigureTarget};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let filter = match cli.verbose {
        0 => "tunegrab=info,tunegrab_core=info,tunegrab_spotify=info",
        1 => "tunegrab=debug,tunegrab_core=debug,tunegrab_spotify=debug",
        2 => "tunegrab=trace,tunegrab_core=trace,tunegrab_spotify=trace",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    let config_path = cli.config.as_deref();
    let output = cli.output.as_deref();

    // First run: write defaults so there is a file to edit
    let (_, created) = Config::load_or_init(config_path)?;
    if let Some(path) = created {
        info!("Created new config file: {}", path.display());
    }

    match cli.command {
        Some(Commands::Playlist { link, options }) => {
            commands::playlist::run(&link, &options, output, config_path).await
        }
        Some(Commands::Get { query, video, options }) => {
            let kind = if video { MediaKind::Video } else { MediaKind::Audio };
            commands::get::run(&query, kind, &options, output, config_path).await
        }
        Some(Commands::Batch {
            input,
            video,
            parallel,
            options,
        }) => {
            let kind = if video { MediaKind::Video } else { MediaKind::Audio };
            commands::batch::run(&input, kind, parallel, &options, output, config_path).await
        }
        Some(Commands::Configure { target }) => match target {
            ConfigureTarget::Spotify {
                client_id,
                client_secret,
            } => commands::configure::spotify(client_id, client_secret, config_path),
            ConfigureTarget::Output { dir } => commands::configure::output(dir, config_path),
            ConfigureTarget::Download { options, parallel } => {
                commands::configure::download(&options, parallel, config_path)
            }
        },
        Some(Commands::Config) => commands::config::run(config_path).await,
        Some(Commands::Doctor) => commands::doctor::run(config_path).await,
        None => commands::menu::run(output, config_path).await,
    }
}
