//! Terminal styling shared by the commands

use anyhow::Result;
use dialoguer::theme::{ColorfulTheme, SimpleTheme};
use indicatif::ProgressStyle;
use tunegrab_core::config::Theme;

pub fn prompt_theme(theme: Theme) -> Box<dyn dialoguer::theme::Theme> {
    match theme {
        Theme::Colorful => Box::new(ColorfulTheme::default()),
        Theme::Plain => Box::new(SimpleTheme),
    }
}

/// Counted bar for playlists and batches
pub fn bar_style(theme: Theme) -> Result<ProgressStyle> {
    let template = match theme {
        Theme::Colorful => "{spinner:.magenta} [{elapsed_precise}] {bar:40.magenta/blue} {pos}/{len} {msg}",
        Theme::Plain => "{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} {msg}",
    };
    Ok(ProgressStyle::with_template(template)?.progress_chars("=>-"))
}

pub fn spinner_style(theme: Theme) -> Result<ProgressStyle> {
    let template = match theme {
        Theme::Colorful => "{spinner:.magenta} [{elapsed_precise}] {msg}",
        Theme::Plain => "{spinner} [{elapsed_precise}] {msg}",
    };
    Ok(ProgressStyle::with_template(template)?)
}

pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer title here", 10), "a longe...");
        assert_eq!(truncate("ÄÖÜÄÖÜÄÖÜÄÖÜ", 6), "ÄÖÜ...");
    }

    #[test]
    fn test_styles_parse() {
        assert!(bar_style(Theme::Colorful).is_ok());
        assert!(bar_style(Theme::Plain).is_ok());
        assert!(spinner_style(Theme::Colorful).is_ok());
    }
}
