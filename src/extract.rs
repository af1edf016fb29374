use crate::error::ConfigError;
use regex::Regex;
use std::collections::HashSet;

/// Ordered collection of unique links, kept in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkSet {
    links: Vec<String>,
    seen: HashSet<String>,
}

impl LinkSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a link, returning false if it was already present
    pub fn insert(&mut self, link: &str) -> bool {
        if self.seen.contains(link) {
            return false;
        }
        self.seen.insert(link.to_string());
        self.links.push(link.to_string());
        true
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.links.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.links
    }

    pub fn into_vec(self) -> Vec<String> {
        self.links
    }
}

impl IntoIterator for LinkSet {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.links.into_iter()
    }
}

impl<'a> IntoIterator for &'a LinkSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.links.iter()
    }
}

impl FromIterator<String> for LinkSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut set = Self::new();
        for link in iter {
            set.insert(&link);
        }
        set
    }
}

/// Finds absolute links to files with a given extension in arbitrary text
#[derive(Debug, Clone)]
pub struct LinkExtractor {
    extension: String,
    pattern: Regex,
}

impl LinkExtractor {
    /// Build an extractor for `extension` (with or without the leading dot)
    pub fn new(extension: &str) -> Result<Self, ConfigError> {
        let extension = extension.trim_start_matches('.').to_lowercase();
        if extension.is_empty() || !extension.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ConfigError::InvalidExtension(extension));
        }

        // `\b` after the extension rejects `.pdfx` but still allows a
        // fragment or trailing punctuation
        let pattern = Regex::new(&format!(
            r#"(?i)https?://[^\s"'<>]+?\.{}\b(?:\?[^\s"'<>]*)?"#,
            regex::escape(&extension)
        ))?;

        Ok(Self { extension, pattern })
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Scans `text` line by line and returns every unique match in order
    pub fn extract(&self, text: &str) -> LinkSet {
        let mut links = LinkSet::new();

        for (line_no, line) in text.lines().enumerate() {
            for m in self.pattern.find_iter(line) {
                if links.insert(m.as_str()) {
                    ::log::trace!("Line {}: found {}", line_no + 1, m.as_str());
                }
            }
        }

        ::log::debug!(
            "Extracted {} unique .{} links",
            links.len(),
            self.extension
        );
        links
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf() -> LinkExtractor {
        LinkExtractor::new("pdf").unwrap()
    }

    #[test]
    fn test_unique_links_in_first_seen_order() {
        let text = "see https://x.test/a.pdf here\n\
                    and HTTPS://x.test/a.pdf?x=1\n\
                    again https://x.test/a.pdf";
        let links = pdf().extract(text);
        assert_eq!(
            links.as_slice(),
            ["https://x.test/a.pdf", "HTTPS://x.test/a.pdf?x=1"]
        );
    }

    #[test]
    fn test_links_inside_markup() {
        let html = r#"<a href="https://cdn.x.test/sds/Hand-Soap.pdf">Soap</a><a href='http://x.test/b.PDF'>B</a>"#;
        let links = pdf().extract(html);
        assert_eq!(
            links.as_slice(),
            ["https://cdn.x.test/sds/Hand-Soap.pdf", "http://x.test/b.PDF"]
        );
    }

    #[test]
    fn test_rejects_longer_extension() {
        let links = pdf().extract("https://x.test/a.pdfx and https://x.test/b.pdf_v2");
        assert!(links.is_empty());
    }

    #[test]
    fn test_fragment_and_trailing_punctuation() {
        let links = pdf().extract(r#"<a href="https://x.test/a.pdf#page=2">"#);
        assert_eq!(links.as_slice(), ["https://x.test/a.pdf"]);

        let links = pdf().extract("(see https://x.test/b.pdf),");
        assert_eq!(links.as_slice(), ["https://x.test/b.pdf"]);

        let links = pdf().extract("https://x.test/c.pdf, https://x.test/d.pdf;");
        assert_eq!(links.as_slice(), ["https://x.test/c.pdf", "https://x.test/d.pdf"]);
    }

    #[test]
    fn test_rejects_unusable_extension() {
        assert!(matches!(
            LinkExtractor::new(""),
            Err(ConfigError::InvalidExtension(_))
        ));
        assert!(matches!(
            LinkExtractor::new("."),
            Err(ConfigError::InvalidExtension(_))
        ));
        assert!(matches!(
            LinkExtractor::new("tar.gz"),
            Err(ConfigError::InvalidExtension(_))
        ));
    }

    #[test]
    fn test_match_never_spans_quotes_or_whitespace() {
        // The stray quote splits the span, so only the clean tail matches
        let text = r#"<a href="https://x.test/bad"name.pdf"">x</a> https://x.test/ok.pdf"#;
        let links = pdf().extract(text);
        assert_eq!(links.as_slice(), ["https://x.test/ok.pdf"]);

        let text = "https://x.test/a b.pdf";
        assert!(pdf().extract(text).is_empty());
    }

    #[test]
    fn test_query_string_kept() {
        let links = pdf().extract(r#"src="https://x.test/get.pdf?id=7&lang=en">"#);
        assert_eq!(links.as_slice(), ["https://x.test/get.pdf?id=7&lang=en"]);
    }

    #[test]
    fn test_relative_links_ignored() {
        assert!(pdf().extract(r#"<a href="/docs/a.pdf">"#).is_empty());
    }

    #[test]
    fn test_other_extension() {
        let extractor = LinkExtractor::new(".docx").unwrap();
        assert_eq!(extractor.extension(), "docx");
        let links = extractor.extract("https://x.test/a.pdf https://x.test/b.docx");
        assert_eq!(links.as_slice(), ["https://x.test/b.docx"]);
    }

    #[test]
    fn test_link_set_from_iter_dedupes() {
        let set: LinkSet = ["b", "a", "b", "c", "a"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(set.into_vec(), vec!["b", "a", "c"]);
    }
}
