//! URL handling module for Campus-Mapper
//!
//! This module provides canonical URL keys and the crawl eligibility check
//! for the single site being mapped.

mod normalize;
mod scope;

// Re-export main functions
pub use normalize::normalize_url;
pub use scope::SiteScope;

/// Extracts the lowercased host from a URL string, if it parses
///
/// # Examples
///
/// ```
/// use campus_mapper::url::extract_host;
///
/// assert_eq!(extract_host("https://WWW.Example.EDU/a"), Some("www.example.edu".to_string()));
/// assert_eq!(extract_host("not a url"), None);
/// ```
pub fn extract_host(url: &str) -> Option<String> {
    ::url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_host_with_port() {
        assert_eq!(
            extract_host("http://127.0.0.1:8080/page"),
            Some("127.0.0.1".to_string())
        );
    }

    #[test]
    fn test_extract_host_relative() {
        assert_eq!(extract_host("/relative/path"), None);
    }
}
