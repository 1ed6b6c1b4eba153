//! Text-span resolution against the document's shared text buffer.
//!
//! Anchors address character offsets into the full extracted text. Spans
//! from the API can be partial (missing start or end) or out of range;
//! resolution degrades to best-effort text recovery and never fails.

use crate::docai::document::TextAnchor;

/// Resolve an optional anchor to the concatenation of its segment slices,
/// in segment order, with no separator.
///
/// Missing anchor or empty segment list yields `""`. A missing start index
/// is treated as 0, a missing end index as the full buffer length, and
/// out-of-range or inverted offsets clamp to the buffer.
pub fn anchored_text(anchor: Option<&TextAnchor>, text: &str) -> String {
    let Some(anchor) = anchor else {
        return String::new();
    };
    if anchor.text_segments.is_empty() {
        return String::new();
    }

    // Index by character so multi-byte text never splits mid-codepoint
    let chars: Vec<char> = text.chars().collect();
    let total = chars.len();

    let mut out = String::new();
    for segment in &anchor.text_segments {
        let start = segment
            .start_index
            .map(|v| v as usize)
            .unwrap_or(0)
            .min(total);
        let end = segment
            .end_index
            .map(|v| v as usize)
            .unwrap_or(total)
            .min(total);
        if start < end {
            out.extend(&chars[start..end]);
        }
    }
    out
}
