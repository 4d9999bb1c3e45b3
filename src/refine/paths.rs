use url::Url;

const INDEX_FILES: &[&str] = &["index.shtml", "index.html", "index.htm", "index.php"];

/// Path component of a URL, `/` if empty
fn url_path(url: &str) -> String {
    let path = match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url.split(['?', '#']).next().unwrap_or_default().to_string(),
    };
    if path.is_empty() {
        "/".to_string()
    } else {
        path
    }
}

/// Section path used for ancestry and nav-prefix checks
///
/// A trailing index document is dropped along with trailing slashes, so
/// `/a/b/index.shtml`, `/a/b/` and `/a/b` all map to `/a/b`.
pub fn section_path(url: &str) -> String {
    let mut path = url_path(url);

    if INDEX_FILES.iter().any(|f| path.ends_with(f)) {
        if let Some(slash) = path.rfind('/') {
            path.truncate(slash);
        }
    }

    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

/// Lowercased path with trailing slashes trimmed, used by curation
pub fn curation_path(url: &str) -> String {
    let path = url_path(url).to_lowercase();
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Lowercases a configured prefix and trims trailing slashes
pub fn normalize_prefix(prefix: &str) -> String {
    prefix.to_lowercase().trim_end_matches('/').to_string()
}

/// Returns true if `target` is the same section as `source` or one of its parents
///
/// Both arguments are section paths. The root is an ancestor of everything.
pub fn is_ancestor(target: &str, source: &str) -> bool {
    if target == "/" || target == source {
        return true;
    }
    source
        .strip_prefix(target)
        .is_some_and(|rest| rest.starts_with('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_path_strips_index_documents() {
        assert_eq!(section_path("https://e.edu/a/b/index.shtml"), "/a/b");
        assert_eq!(section_path("https://e.edu/a/b/index.php"), "/a/b");
        assert_eq!(section_path("https://e.edu/index.html"), "/");
        assert_eq!(section_path("https://e.edu/a/b/"), "/a/b");
        assert_eq!(section_path("https://e.edu"), "/");
        assert_eq!(section_path("https://e.edu/a/page.shtml?x=1"), "/a/page.shtml");
    }

    #[test]
    fn test_curation_path_keeps_index_documents() {
        assert_eq!(
            curation_path("https://e.edu/Academics/Index.shtml"),
            "/academics/index.shtml"
        );
        assert_eq!(curation_path("https://e.edu/Nursing/"), "/nursing");
        assert_eq!(curation_path("https://e.edu/"), "/");
    }

    #[test]
    fn test_ancestor_relation() {
        assert!(is_ancestor("/a/b", "/a/b/c"));
        assert!(is_ancestor("/a/b/c", "/a/b/c"));
        assert!(is_ancestor("/", "/a/b/c"));
        assert!(!is_ancestor("/a/b/c/d", "/a/b/c"));
        assert!(!is_ancestor("/a/b", "/a/bc"));
        assert!(!is_ancestor("/x", "/a"));
    }

    #[test]
    fn test_normalize_prefix() {
        assert_eq!(normalize_prefix("/Pres/"), "/pres");
        assert_eq!(normalize_prefix("/contact"), "/contact");
    }
}
