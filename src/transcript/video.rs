//! Video-id extraction from the URL shapes users paste.

use std::sync::OnceLock;

use regex::Regex;

/// The URL shapes recognised, tried in order: watch/short URLs, embed URLs,
/// then a bare 11-character id.
fn patterns() -> &'static [Regex; 3] {
    static PATTERNS: OnceLock<[Regex; 3]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            Regex::new(r"(?:v=|/)([0-9A-Za-z_-]{11})").expect("static pattern"),
            Regex::new(r"(?:embed/)([0-9A-Za-z_-]{11})").expect("static pattern"),
            Regex::new(r"^([0-9A-Za-z_-]{11})$").expect("static pattern"),
        ]
    })
}

/// Extract the 11-character video id from `url`, or `None` when nothing in
/// the input looks like one.
pub fn extract_video_id(url: &str) -> Option<String> {
    for pattern in patterns() {
        if let Some(caps) = pattern.captures(url) {
            let id = caps[1].to_string();
            log::debug!("extracted video id {id} from {url:?}");
            return Some(id);
        }
    }
    log::warn!("no video id found in {url:?}");
    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn watch_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".into())
        );
    }

    #[test]
    fn watch_url_with_extra_params() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s"),
            Some("dQw4w9WgXcQ".into())
        );
    }

    #[test]
    fn short_url() {
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".into())
        );
    }

    #[test]
    fn embed_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/embed/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".into())
        );
    }

    #[test]
    fn bare_id() {
        assert_eq!(
            extract_video_id("dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".into())
        );
    }

    #[test]
    fn garbage_returns_none() {
        assert_eq!(extract_video_id("not a video link"), None);
        assert_eq!(extract_video_id(""), None);
        assert_eq!(extract_video_id("short"), None);
    }
}
