//! Document text extraction
//!
//! `LopdfParser` extracts text from PDF bytes page by page using lopdf.
//! `PlainTextParser` passes UTF-8 bytes through as a single page.

use citetrail_common::collab::DocumentParser;
use citetrail_common::errors::{AppError, Result};
use tracing::{debug, warn};

/// PDF parser producing page-ordered text
pub struct LopdfParser;

impl DocumentParser for LopdfParser {
    fn parse(&self, bytes: &[u8]) -> Result<Vec<String>> {
        let doc = lopdf::Document::load_mem(bytes).map_err(|e| AppError::Parse {
            message: format!("Failed to load PDF: {}", e),
        })?;

        let mut pages = Vec::new();
        for (index, page_id) in doc.page_iter().enumerate() {
            match doc.get_page_content(page_id) {
                Ok(content) => {
                    let text = extract_text_from_content(&content);
                    pages.push(clean_page_text(&text));
                }
                Err(e) => {
                    warn!(page = index + 1, error = %e, "Failed to extract text from page, skipping");
                }
            }
        }

        if pages.iter().all(|p| p.trim().is_empty()) {
            return Err(AppError::Parse {
                message: "No text content extracted from PDF".to_string(),
            });
        }

        debug!(page_count = pages.len(), "Text extraction complete");

        Ok(pages)
    }
}

/// Plain-text parser: the whole document is one page
pub struct PlainTextParser;

impl DocumentParser for PlainTextParser {
    fn parse(&self, bytes: &[u8]) -> Result<Vec<String>> {
        Ok(vec![String::from_utf8_lossy(bytes).into_owned()])
    }
}

/// Extract text from a PDF content stream
fn extract_text_from_content(content: &[u8]) -> String {
    // Text lives between BT and ET operators
    let content_str = String::from_utf8_lossy(content);
    let mut text = String::new();
    let mut in_text_block = false;
    let mut current_text = String::new();

    for line in content_str.lines() {
        let trimmed = line.trim();

        if trimmed == "BT" {
            in_text_block = true;
            continue;
        }

        if trimmed == "ET" {
            in_text_block = false;
            if !current_text.is_empty() {
                text.push_str(&current_text);
                text.push(' ');
                current_text.clear();
            }
            continue;
        }

        if in_text_block {
            // Text showing operators: Tj, TJ, ', "
            if let Some(text_content) = extract_text_from_operator(trimmed) {
                current_text.push_str(&text_content);
            }
        }
    }

    text
}

/// Extract text from a PDF text operator
fn extract_text_from_operator(line: &str) -> Option<String> {
    // Handle (text) Tj operator
    if line.ends_with("Tj") || line.ends_with("'") || line.ends_with("\"") {
        if let Some(start) = line.find('(') {
            if let Some(end) = line.rfind(')') {
                let text = &line[start + 1..end];
                return Some(decode_pdf_string(text));
            }
        }
    }

    // Handle [(text) num (text) num] TJ operator (array of text)
    if line.ends_with("TJ") {
        let mut result = String::new();
        let mut in_paren = false;
        let mut current = String::new();

        for ch in line.chars() {
            match ch {
                '(' => {
                    in_paren = true;
                }
                ')' => {
                    in_paren = false;
                    result.push_str(&decode_pdf_string(&current));
                    current.clear();
                }
                _ if in_paren => {
                    current.push(ch);
                }
                _ => {}
            }
        }

        if !result.is_empty() {
            return Some(result);
        }
    }

    None
}

/// Decode PDF string escapes
fn decode_pdf_string(s: &str) -> String {
    let mut result = String::new();
    let mut chars = s.chars();

    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some('n') => result.push('\n'),
                Some('r') => result.push('\r'),
                Some('t') => result.push('\t'),
                Some('\\') => result.push('\\'),
                Some('(') => result.push('('),
                Some(')') => result.push(')'),
                Some(c) => result.push(c),
                None => {}
            }
        } else {
            result.push(ch);
        }
    }

    result
}

/// Collapse whitespace runs within a page
fn clean_page_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_page_text() {
        let input = "Hello   World\n\nTest";
        assert_eq!(clean_page_text(input), "Hello World Test");
    }

    #[test]
    fn test_decode_pdf_string() {
        assert_eq!(decode_pdf_string("Hello\\nWorld"), "Hello\nWorld");
        assert_eq!(decode_pdf_string("Test\\(paren\\)"), "Test(paren)");
    }

    #[test]
    fn test_extract_tj_operator() {
        let content = b"BT\n(First line) Tj\nET\n";
        assert_eq!(extract_text_from_content(content).trim(), "First line");
    }

    #[test]
    fn test_extract_tj_array_operator() {
        let content = b"BT\n[(Hel) -20 (lo)] TJ\nET\n";
        assert_eq!(extract_text_from_content(content).trim(), "Hello");
    }

    #[test]
    fn test_invalid_bytes_are_a_parse_error() {
        let parser = LopdfParser;
        let err = parser.parse(b"this is not a pdf").unwrap_err();
        assert!(matches!(err, AppError::Parse { .. }));
    }

    #[test]
    fn test_plain_text_parser_single_page() {
        let parser = PlainTextParser;
        let pages = parser.parse(b"Body. References [1] Something.").unwrap();
        assert_eq!(pages.len(), 1);
        assert!(pages[0].starts_with("Body."));
    }
}
