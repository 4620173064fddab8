//! Page framing between a text extractor and the statement parser.
//!
//! Parsers receive one string with every page preceded by a marker line:
//!   --- Page 1 ---
//!   <page text>
//!   --- Page 2 ---
//!   <page text>

/// Marker line placed before page `number` (1-based).
pub fn page_marker(number: usize) -> String {
    format!("--- Page {number} ---")
}

/// Join ordered page texts into a single page-annotated document.
pub fn join_pages<I, S>(pages: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let parts: Vec<String> = pages
        .into_iter()
        .enumerate()
        .map(|(idx, page)| format!("\n{}\n{}", page_marker(idx + 1), page.as_ref()))
        .collect();
    parts.join("\n").trim().to_string()
}

/// Split `pdftotext` output into pages on form-feed characters.
///
/// `pdftotext` ends every page with `\f`, so the piece after the last one is
/// dropped when it holds nothing but whitespace.
pub fn split_form_feeds(text: &str) -> Vec<&str> {
    let mut pages: Vec<&str> = text.split('\u{c}').collect();
    if pages.len() > 1 && pages.last().is_some_and(|p| p.trim().is_empty()) {
        pages.pop();
    }
    pages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_pages() {
        let text = join_pages(["first page", "second page"]);
        assert_eq!(
            text,
            "--- Page 1 ---\nfirst page\n\n--- Page 2 ---\nsecond page"
        );
    }

    #[test]
    fn test_join_no_pages() {
        assert_eq!(join_pages(Vec::<String>::new()), "");
    }

    #[test]
    fn test_split_form_feeds() {
        let pages = split_form_feeds("one\nline\u{c}two\u{c}");
        assert_eq!(pages, vec!["one\nline", "two"]);

        assert_eq!(split_form_feeds("single"), vec!["single"]);
        assert_eq!(split_form_feeds("a\u{c}\u{c}b"), vec!["a", "", "b"]);
    }
}
