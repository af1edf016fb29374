use crate::extract::LinkSet;
use regex::Regex;
use url::Url;

/// Why a link was turned away before download
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Not an absolute http(s) URL with a host
    InvalidUrl,
    /// Matched one of the exclude patterns
    Excluded,
    /// Include patterns are set and none matched
    NotIncluded,
}

/// Validates links and applies include/exclude regex patterns
#[derive(Debug, Default)]
pub struct LinkFilter {
    include_regexes: Vec<Regex>,
    exclude_regexes: Vec<Regex>,
}

impl LinkFilter {
    /// Create a new filter from include and exclude pattern lists
    pub fn new(include_patterns: &[String], exclude_patterns: &[String]) -> Result<Self, regex::Error> {
        let include_regexes = include_patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;
        let exclude_regexes = exclude_patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            include_regexes,
            exclude_regexes,
        })
    }

    /// Check a single link against all rules
    pub fn check(&self, link: &str) -> Result<(), Rejection> {
        if !is_valid_url(link) {
            return Err(Rejection::InvalidUrl);
        }

        // Exclusions take precedence
        if self.exclude_regexes.iter().any(|re| re.is_match(link)) {
            return Err(Rejection::Excluded);
        }

        if !self.include_regexes.is_empty()
            && !self.include_regexes.iter().any(|re| re.is_match(link))
        {
            return Err(Rejection::NotIncluded);
        }

        Ok(())
    }

    /// Keep only the links that pass, preserving order
    pub fn apply(&self, links: LinkSet) -> LinkSet {
        links
            .into_iter()
            .filter(|link| match self.check(link) {
                Ok(()) => true,
                Err(reason) => {
                    ::log::warn!("Skipping link {} ({:?})", link, reason);
                    false
                }
            })
            .collect()
    }
}

/// Checks whether a string is an absolute http(s) URL with a host
pub fn is_valid_url(link: &str) -> bool {
    match Url::parse(link) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(links: &[&str]) -> LinkSet {
        links.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_is_valid_url() {
        assert!(is_valid_url("https://x.test/a.pdf"));
        assert!(is_valid_url("HTTPS://x.test/a.pdf?x=1"));
        assert!(!is_valid_url("ftp://x.test/a.pdf"));
        assert!(!is_valid_url("https://"));
        assert!(!is_valid_url("not a url"));
    }

    #[test]
    fn test_default_filter_only_validates() {
        let filter = LinkFilter::default();
        let kept = filter.apply(set(&["https://x.test/a.pdf", "https://[bad/b.pdf"]));
        assert_eq!(kept.as_slice(), ["https://x.test/a.pdf"]);
    }

    #[test]
    fn test_regex_patterns() {
        let filter = LinkFilter::new(
            &[r"/sds/".to_string()],
            &[r"(?i)draft".to_string()],
        )
        .unwrap();

        assert_eq!(filter.check("https://x.test/sds/a.pdf"), Ok(()));
        assert_eq!(
            filter.check("https://x.test/brochure/a.pdf"),
            Err(Rejection::NotIncluded)
        );
        // Matching exclude pattern wins even if include matches
        assert_eq!(
            filter.check("https://x.test/sds/DRAFT-a.pdf"),
            Err(Rejection::Excluded)
        );
    }

    #[test]
    fn test_apply_preserves_order() {
        let filter = LinkFilter::new(&[], &[r"skip".to_string()]).unwrap();
        let kept = filter.apply(set(&[
            "https://x.test/c.pdf",
            "https://x.test/skip.pdf",
            "https://x.test/a.pdf",
        ]));
        assert_eq!(kept.as_slice(), ["https://x.test/c.pdf", "https://x.test/a.pdf"]);
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(LinkFilter::new(&["(".to_string()], &[]).is_err());
    }
}
