//! Caption formatting: raw segments to clean prose.
//!
//! Auto-generated caption tracks carry noise a learner should never see:
//! empty lines, bracketed sound markers, doubled whitespace, and spaces
//! squeezed in before punctuation. [`format_transcript`] strips all of that
//! and joins the remaining lines into a single paragraph ready for storage
//! and prompting.

use super::fetch::CaptionSegment;

/// Bracketed sound markers that caption tracks interleave with speech.
const NOISE_MARKERS: [&str; 5] = [
    "[संगीत]",
    "[Music]",
    "[Applause]",
    "[Laughter]",
    "[Background]",
];

/// Collapse every whitespace run (spaces, tabs, newlines) to a single space
/// and trim the ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Join caption segments into clean prose.
///
/// Rules, applied per segment:
/// * empty lines and lines containing a noise marker are dropped;
/// * whitespace runs collapse to single spaces;
/// * a space squeezed in before `।`, `?` or `!` is removed;
/// * doubled dots fold into an ellipsis.
///
/// Returns an empty string when nothing survives, which callers treat as
/// "video has no usable speech".
pub fn format_transcript(segments: &[CaptionSegment]) -> String {
    let mut lines = Vec::with_capacity(segments.len());

    for segment in segments {
        let text = segment.text.trim();
        if text.is_empty() {
            continue;
        }
        if NOISE_MARKERS.iter().any(|marker| text.contains(marker)) {
            continue;
        }

        let line = normalize_whitespace(text)
            .replace(" ।", "।")
            .replace(" ?", "?")
            .replace(" !", "!")
            .replace("..", "…");

        if !line.trim().is_empty() {
            lines.push(line);
        }
    }

    let joined = lines.join(" ");
    let formatted = normalize_whitespace(&joined);

    log::debug!(
        "formatted {} caption segments into {} characters",
        segments.len(),
        formatted.len()
    );
    formatted
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(text: &str) -> CaptionSegment {
        CaptionSegment {
            text: text.into(),
            start_secs: 0.0,
            duration_secs: 1.0,
        }
    }

    #[test]
    fn joins_segments_with_spaces() {
        let segments = [seg("नमस्ते दोस्तों"), seg("आज हम सीखेंगे")];
        assert_eq!(
            format_transcript(&segments),
            "नमस्ते दोस्तों आज हम सीखेंगे"
        );
    }

    #[test]
    fn drops_empty_and_noise_segments() {
        let segments = [
            seg("नमस्ते"),
            seg("   "),
            seg("[संगीत]"),
            seg("[Music]"),
            seg("धन्यवाद"),
        ];
        assert_eq!(format_transcript(&segments), "नमस्ते धन्यवाद");
    }

    #[test]
    fn tightens_space_before_punctuation() {
        let segments = [seg("यह अच्छा है ।"), seg("सच में ?"), seg("वाह !")];
        assert_eq!(format_transcript(&segments), "यह अच्छा है। सच में? वाह!");
    }

    #[test]
    fn folds_doubled_dots_into_ellipsis() {
        let segments = [seg("तो.. चलिए शुरू करते हैं")];
        assert_eq!(format_transcript(&segments), "तो… चलिए शुरू करते हैं");
    }

    #[test]
    fn collapses_internal_whitespace() {
        let segments = [seg("नमस्ते \t  दोस्तों\nकैसे हैं")];
        assert_eq!(format_transcript(&segments), "नमस्ते दोस्तों कैसे हैं");
    }

    #[test]
    fn all_noise_yields_empty_string() {
        let segments = [seg("[Music]"), seg(""), seg("[Applause]")];
        assert_eq!(format_transcript(&segments), "");
    }

    #[test]
    fn empty_input_yields_empty_string() {
        assert_eq!(format_transcript(&[]), "");
    }

    // -----------------------------------------------------------------------
    // normalize_whitespace
    // -----------------------------------------------------------------------

    #[test]
    fn normalize_collapses_and_trims() {
        assert_eq!(
            normalize_whitespace("  एक \n दो \r\n तीन  "),
            "एक दो तीन"
        );
        assert_eq!(normalize_whitespace(""), "");
        assert_eq!(normalize_whitespace("   "), "");
    }
}
