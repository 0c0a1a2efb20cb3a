//! Reference-list segmentation
//!
//! Splits a document's full text into body text and an ordered list of
//! citation strings. The input is page-concatenated text that may have been
//! reflowed by OCR or PDF extraction, so line breaks inside a reference are
//! not trusted; numbering markers are.

use regex_lite::Regex;
use std::sync::OnceLock;

/// Segments shorter than this are page numbers or OCR artifacts.
const MIN_REFERENCE_CHARS: usize = 6;

/// A document split into body text and reference strings.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentedDocument {
    /// Text before the bibliography section (the whole input when no
    /// section was detected).
    pub body: String,
    /// One entry per detected reference, in document order.
    pub references: Vec<String>,
}

fn heading_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\b(?:references|bibliography)\b").expect("valid regex"))
}

fn heading_strip_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(?:references|bibliography)\s*[:\-]*\s*").expect("valid regex")
    })
}

fn bracket_marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[\d+\]").expect("valid regex"))
}

fn bracket_strip_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\[\d+\]\s*").expect("valid regex"))
}

fn ordinal_marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+\.\s").expect("valid regex"))
}

fn ordinal_strip_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+\.\s*").expect("valid regex"))
}

fn sentence_split_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\.\s+").expect("valid regex"))
}

/// Split a document's text into body and reference strings.
///
/// A document without a detectable "References"/"Bibliography" token is a
/// valid outcome: the whole input is body text and the reference list is
/// empty.
pub fn split_references(text: &str) -> SegmentedDocument {
    let Some(heading) = heading_re().find(text) else {
        return SegmentedDocument {
            body: text.to_string(),
            references: Vec::new(),
        };
    };

    let body = text[..heading.start()].trim().to_string();
    let block = heading_strip_re().replace(&text[heading.start()..], "");

    // Rejoin lines broken by page breaks or OCR before looking for markers.
    let block = block.lines().map(str::trim_end).collect::<Vec<_>>().join(" ");

    SegmentedDocument {
        body,
        references: split_block(&block),
    }
}

/// Split a references block into individual reference strings.
fn split_block(block: &str) -> Vec<String> {
    // Bracketed ordinals are unambiguous, so they win when present;
    // `12. `-style ordinals also match years and sentence ends.
    let mut segments = split_at_markers(block, bracket_marker_re(), bracket_strip_re());
    if segments.len() <= 1 {
        segments = split_at_markers(block, ordinal_marker_re(), ordinal_strip_re());
    }
    if segments.len() <= 1 {
        segments = split_sentences(block);
    }

    segments.retain(|s| is_plausible_reference(s));
    segments
}

/// Split at every position where a numbering marker begins, stripping the
/// marker from the segment it introduces.
fn split_at_markers(block: &str, marker: &Regex, strip: &Regex) -> Vec<String> {
    let starts: Vec<usize> = marker.find_iter(block).map(|m| m.start()).collect();

    if starts.is_empty() {
        let trimmed = block.trim();
        if trimmed.is_empty() {
            return Vec::new();
        }
        return vec![trimmed.to_string()];
    }

    let mut segments = Vec::new();

    // Anything between the heading and the first marker is kept as a
    // candidate; the plausibility filter removes page-number noise.
    push_segment(&mut segments, &block[..starts[0]], strip);

    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(block.len());
        push_segment(&mut segments, &block[start..end], strip);
    }

    segments
}

fn push_segment(segments: &mut Vec<String>, raw: &str, strip: &Regex) {
    let stripped = strip.replace(raw.trim(), "");
    let segment = stripped.trim();
    if !segment.is_empty() {
        segments.push(segment.to_string());
    }
}

/// Fallback when no numbering markers were detected: split on sentence
/// boundaries, restoring the period on every segment but the last.
fn split_sentences(block: &str) -> Vec<String> {
    let pieces: Vec<&str> = sentence_split_re().split(block).collect();
    let count = pieces.len();

    pieces
        .into_iter()
        .enumerate()
        .filter_map(|(i, piece)| {
            let piece = piece.trim();
            if piece.is_empty() {
                return None;
            }
            if i + 1 < count {
                Some(format!("{}.", piece))
            } else {
                Some(piece.to_string())
            }
        })
        .collect()
}

/// Purely numeric or very short segments are artifacts, not references.
fn is_plausible_reference(segment: &str) -> bool {
    segment.chars().count() >= MIN_REFERENCE_CHARS
        && !segment.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_heading_means_no_references() {
        let text = "This paper has no bibliography section at all.\nJust prose.";
        let doc = split_references(text);
        assert!(doc.references.is_empty());
        assert_eq!(doc.body, text);
    }

    #[test]
    fn test_bracketed_markers() {
        let text = "Intro text. References [1] A. Smith, Paper One, 2020. [2] B. Jones, Paper Two, 2021.";
        let doc = split_references(text);
        assert_eq!(doc.body, "Intro text.");
        assert_eq!(doc.references.len(), 2);
        assert!(doc.references[0].starts_with("A. Smith"));
        assert!(doc.references[1].starts_with("B. Jones"));
    }

    #[test]
    fn test_bracket_segment_count_matches_marker_count() {
        let block = "Body. References [1] First reference entry. [2] Second reference entry. [3] Third reference entry.";
        let doc = split_references(block);
        let markers = bracket_marker_re().find_iter(block).count();
        assert_eq!(doc.references.len(), markers);
    }

    #[test]
    fn test_reconstruction_from_segments() {
        let text = "References [1] First reference entry, 1999 [2] Second reference entry, 2001";
        let doc = split_references(text);
        let rebuilt = doc
            .references
            .iter()
            .enumerate()
            .map(|(i, r)| format!("[{}] {}", i + 1, r))
            .collect::<Vec<_>>()
            .join(" ");
        assert_eq!(rebuilt, "[1] First reference entry, 1999 [2] Second reference entry, 2001");
    }

    #[test]
    fn test_ordinal_markers() {
        let text = "Bibliography: 1. Doe, Surveys of Testing, TR-9 2. Roe, Methods in Parsing, TR-10";
        let doc = split_references(text);
        assert_eq!(doc.references.len(), 2);
        assert!(doc.references[0].starts_with("Doe"));
        assert!(doc.references[1].starts_with("Roe"));
    }

    #[test]
    fn test_heading_is_case_insensitive() {
        let doc = split_references(
            "Some body. REFERENCES [1] An entry worth keeping. [2] Another entry retained.",
        );
        assert_eq!(
            doc.references,
            vec!["An entry worth keeping.", "Another entry retained."]
        );
        assert_eq!(doc.body, "Some body.");
    }

    #[test]
    fn test_linebreaks_inside_references_are_joined() {
        let text = "Body here.\nReferences\n[1] C. Brown, A Title Broken\nAcross Lines, 2019.\n[2] D. White, Another\nEntry, 2020.";
        let doc = split_references(text);
        assert_eq!(doc.references.len(), 2);
        assert_eq!(doc.references[0], "C. Brown, A Title Broken Across Lines, 2019.");
        assert_eq!(doc.references[1], "D. White, Another Entry, 2020.");
    }

    #[test]
    fn test_fallback_period_split() {
        let text = "Body. References Alpha entry one. Beta entry two. Gamma entry three";
        let doc = split_references(text);
        assert_eq!(
            doc.references,
            vec!["Alpha entry one.", "Beta entry two.", "Gamma entry three"]
        );
    }

    #[test]
    fn test_numeric_and_short_segments_dropped() {
        let text = "Body. References [1] 42 [2] 2020 [3] abc [4] A genuine reference entry.";
        let doc = split_references(text);
        assert_eq!(doc.references, vec!["A genuine reference entry."]);
    }

    #[test]
    fn test_no_segment_is_numeric_or_short() {
        let text = "Body. References 1. Alpha beta gamma, 1999. 2. Delta epsilon zeta, 2003.";
        let doc = split_references(text);
        assert!(!doc.references.is_empty());
        for reference in &doc.references {
            assert!(reference.chars().count() >= 6, "too short: {:?}", reference);
            assert!(
                !reference.chars().all(|c| c.is_ascii_digit()),
                "purely numeric: {:?}",
                reference
            );
        }
    }

    #[test]
    fn test_empty_block_after_heading() {
        let doc = split_references("All body text. References");
        assert!(doc.references.is_empty());
        assert_eq!(doc.body, "All body text.");
    }

    #[test]
    fn test_heading_token_must_be_whole_word() {
        let doc = split_references("We discuss cross-referencesing in depth here, nothing else.");
        assert!(doc.references.is_empty());
    }
}
