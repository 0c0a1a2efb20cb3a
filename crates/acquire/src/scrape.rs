//! HTML scraping helpers for the acquisition routes
//!
//! Pure functions over page markup: find a PDF link on a landing page, or
//! the document frame on a DOI-resolver page.

use regex_lite::Regex;
use std::sync::OnceLock;

fn pdf_href_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)href\s*=\s*["']([^"']*pdf[^"']*)["']"#).expect("valid regex")
    })
}

fn embed_src_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)<(?:iframe|embed)[^>]*\bsrc\s*=\s*["']([^"']+)["']"#)
            .expect("valid regex")
    })
}

/// First anchor href on the page that mentions "pdf".
pub fn pdf_link(html: &str) -> Option<String> {
    pdf_href_re()
        .captures(html)
        .map(|caps| caps[1].to_string())
}

/// The `src` of the first iframe/embed on a resolver page.
pub fn resolver_embed_src(html: &str) -> Option<String> {
    embed_src_re()
        .captures(html)
        .map(|caps| caps[1].to_string())
}

/// Resolve a scraped URL against the page it was found on.
///
/// Handles absolute, protocol-relative and host-relative forms; anything
/// else (javascript:, fragments, mailto:) is rejected.
pub fn absolutize(url: &str, page_url: &str) -> Option<String> {
    let url = url.trim();
    if url.starts_with("http://") || url.starts_with("https://") {
        return Some(url.to_string());
    }
    if let Some(rest) = url.strip_prefix("//") {
        return Some(format!("https://{}", rest));
    }
    if url.starts_with('/') {
        let origin = origin_of(page_url)?;
        return Some(format!("{}{}", origin, url));
    }
    None
}

/// Scheme and host of a URL, without the path.
fn origin_of(url: &str) -> Option<&str> {
    let scheme_end = url.find("://")? + 3;
    match url[scheme_end..].find('/') {
        Some(path_start) => Some(&url[..scheme_end + path_start]),
        None => Some(url),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_link_found() {
        let html = r#"<a class="dl" href="/content/paper.pdf">Download PDF</a>"#;
        assert_eq!(pdf_link(html).as_deref(), Some("/content/paper.pdf"));
    }

    #[test]
    fn test_pdf_link_case_insensitive() {
        let html = r#"<A HREF="https://host.org/files/1234.PDF">full text</A>"#;
        assert_eq!(pdf_link(html).as_deref(), Some("https://host.org/files/1234.PDF"));
    }

    #[test]
    fn test_no_pdf_link() {
        assert_eq!(pdf_link("<a href=\"/about.html\">about</a>"), None);
    }

    #[test]
    fn test_resolver_embed_src() {
        let html = r#"<div id="article"><iframe src="//dl.resolver.net/paper.pdf#view"></iframe></div>"#;
        assert_eq!(
            resolver_embed_src(html).as_deref(),
            Some("//dl.resolver.net/paper.pdf#view")
        );
    }

    #[test]
    fn test_absolutize_protocol_relative() {
        assert_eq!(
            absolutize("//dl.host.net/p.pdf", "https://resolver.se/10.1/x").as_deref(),
            Some("https://dl.host.net/p.pdf")
        );
    }

    #[test]
    fn test_absolutize_host_relative() {
        assert_eq!(
            absolutize("/content/p.pdf", "https://journal.org/article/42").as_deref(),
            Some("https://journal.org/content/p.pdf")
        );
    }

    #[test]
    fn test_absolutize_rejects_script() {
        assert_eq!(absolutize("javascript:void(0)", "https://journal.org"), None);
    }
}
