//! File and directory naming

use tunegrab_spotify::Track;

/// Replace characters that are invalid in file names on common platforms
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            _ => c,
        })
        .collect::<String>()
        .trim()
        .trim_end_matches('.')
        .trim_end()
        .to_string()
}

/// File stem used for a collection track, e.g. "Artist - Title"
pub fn track_file_stem(track: &Track) -> String {
    sanitize_filename(&track.query())
}

/// Escape a literal for use inside a yt-dlp output template
pub fn escape_template(literal: &str) -> String {
    literal.replace('%', "%%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("Normal Title"), "Normal Title");
        assert_eq!(sanitize_filename("Title/With:Special*Chars"), "Title_With_Special_Chars");
        assert_eq!(sanitize_filename("  Spaces  "), "Spaces");
        assert_eq!(sanitize_filename("Why?<>|\""), "Why_____");
        assert_eq!(sanitize_filename("Tab\there"), "Tab_here");
        assert_eq!(sanitize_filename("Ends with dots..."), "Ends with dots");
    }

    #[test]
    fn test_track_file_stem() {
        let track = Track {
            title: "AC/DC Tribute".to_string(),
            artists: vec!["Band A".to_string(), "Band B".to_string()],
        };
        assert_eq!(track_file_stem(&track), "Band A, Band B - AC_DC Tribute");
    }

    #[test]
    fn test_escape_template() {
        assert_eq!(escape_template("100% Pure"), "100%% Pure");
    }
}
