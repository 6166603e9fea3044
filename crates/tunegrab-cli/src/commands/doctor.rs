use anyhow::Result;
use std::path::Path;
use tunegrab_core::tools::{check_tools, ToolReport, ToolStatus};
use tunegrab_core::Config;

pub const YT_DLP_HINT: &str = "Download and install from https://github.com/yt-dlp/yt-dlp";
pub const FFMPEG_HINT: &str = "Install from https://ffmpeg.org/download.html";

pub async fn run(config_path: Option<&Path>) -> Result<()> {
    let config = Config::load(config_path)?;

    println!("tunegrab dependency check\n");

    let report = check_tools(&config).await;
    print_report(&report);

    print!("spotify:       ");
    if config.has_spotify_credentials() {
        println!("OK (credentials set)");
    } else {
        println!("NOT CONFIGURED");
        println!("           Run: tunegrab configure spotify");
    }

    println!();
    if report.yt_dlp.is_ok() && report.ffmpeg.is_ok() && config.has_spotify_credentials() {
        println!("All dependencies OK!");
    } else {
        println!("Some dependencies are missing. See above for installation instructions.");
    }

    Ok(())
}

pub fn print_report(report: &ToolReport) {
    print!("yt-dlp:        ");
    print_status(&report.yt_dlp, YT_DLP_HINT);

    print!("ffmpeg:        ");
    print_status(&report.ffmpeg, FFMPEG_HINT);
}

fn print_status(status: &ToolStatus, hint: &str) {
    match status {
        ToolStatus::Found { version, .. } => println!("OK ({})", version),
        ToolStatus::Broken { path } => {
            println!("FOUND at {} but failed to get version", path.display());
        }
        ToolStatus::Missing => {
            println!("NOT FOUND");
            println!("           {}", hint);
        }
    }
}
