use url::Url;

/// Normalizes a URL into the canonical key used as node identity
///
/// # Normalization Steps
///
/// 1. Parse the URL; absolute URLs with a host go through the `url` crate
///    (host lowercased, dot segments resolved, default port dropped)
/// 2. Remove the fragment (everything after `#`)
/// 3. Rebuild as `scheme://host[:port]/path[?query]`
/// 4. Remove trailing slashes unless the path is the root `/`
/// 5. Drop an empty query string (trailing `?`)
///
/// Anything that does not parse is normalized by string surgery with the
/// same fragment and trailing-slash rules. This never fails: malformed input
/// yields a best-effort key that the eligibility check later rejects.
///
/// # Examples
///
/// ```
/// use campus_mapper::url::normalize_url;
///
/// assert_eq!(normalize_url("https://WWW.Example.edu/page/#top"), "https://www.example.edu/page");
/// assert_eq!(normalize_url("https://www.example.edu"), "https://www.example.edu/");
/// ```
pub fn normalize_url(raw: &str) -> String {
    let raw = raw.trim();

    match Url::parse(raw) {
        Ok(url) if url.host_str().is_some_and(|h| !h.is_empty()) && !url.cannot_be_a_base() => {
            canonical_form(&url)
        }
        _ => normalize_loose(raw),
    }
}

/// Rebuilds a parsed URL without fragment, userinfo or trailing slash
fn canonical_form(url: &Url) -> String {
    let mut out = String::with_capacity(url.as_str().len());
    out.push_str(url.scheme());
    out.push_str("://");
    out.push_str(url.host_str().unwrap_or_default());

    // `port()` is None when the port is the scheme default
    if let Some(port) = url.port() {
        out.push(':');
        out.push_str(&port.to_string());
    }

    out.push_str(trim_trailing_slashes(url.path()));

    if let Some(query) = url.query().filter(|q| !q.is_empty()) {
        out.push('?');
        out.push_str(query);
    }

    out
}

/// Fragment and trailing-slash rules applied to unparseable input
fn normalize_loose(raw: &str) -> String {
    let without_fragment = raw.split('#').next().unwrap_or_default();

    let (base, query) = match without_fragment.split_once('?') {
        Some((base, query)) => (base, Some(query)),
        None => (without_fragment, None),
    };

    let trimmed = base.trim_end_matches('/');
    let mut out = if trimmed.is_empty() {
        base.to_string()
    } else {
        trimmed.to_string()
    };

    if let Some(query) = query.filter(|q| !q.is_empty()) {
        out.push('?');
        out.push_str(query);
    }

    out
}

fn trim_trailing_slashes(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}
