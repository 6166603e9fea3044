use anyhow::Result;
use std::path::Path;
use tunegrab_core::Config;

pub async fn run(config_path: Option<&Path>) -> Result<()> {
    let config = Config::load(config_path)?;

    println!("tunegrab configuration\n");

    println!("[spotify]");
    println!("  client_id = {}", display_or(&config.spotify.client_id, "(not set)"));
    println!("  client_secret = {}", mask(&config.spotify.client_secret));
    println!("  max_retries = {}", config.spotify.max_retries);

    println!("\n[output]");
    println!("  directory = {:?}", config.output.directory);

    println!("\n[download]");
    println!("  audio_quality = {}", config.download.audio_quality);
    println!("  audio_format = {}", config.download.audio_format);
    println!("  video_format = {}", config.download.video_format);
    println!("  parallel = {}", config.download.parallel);

    println!("\n[paths]");
    if let Some(ref p) = config.paths.yt_dlp {
        println!("  yt_dlp = {:?}", p);
    } else {
        println!("  yt_dlp = (auto-detect)");
    }
    if let Some(ref p) = config.paths.ffmpeg {
        println!("  ffmpeg = {:?}", p);
    } else {
        println!("  ffmpeg = (auto-detect)");
    }

    println!("\n[ui]");
    println!("  theme = {:?}", config.ui.theme);

    // Show config file locations
    println!("\nConfig file locations (in priority order):");
    println!("  1. Environment variables (TUNEGRAB_<SECTION>__<KEY>)");
    if let Some(p) = config_path {
        println!("  2. {} (specified)", p.display());
    }
    if let Some(p) = Config::default_file() {
        println!("  3. {}", p.display());
    }

    Ok(())
}

fn display_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

/// Show only the last four characters of a secret
fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.trim().chars().collect();
    match chars.len() {
        0 => "(not set)".to_string(),
        n if n <= 4 => "****".to_string(),
        n => format!("****{}", chars[n - 4..].iter().collect::<String>()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask() {
        assert_eq!(mask(""), "(not set)");
        assert_eq!(mask("abc"), "****");
        assert_eq!(mask("0123456789abcdef"), "****cdef");
    }
}
