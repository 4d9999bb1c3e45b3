//! HTML parser for extracting links and page titles
//!
//! The document is parsed once per page into an owned [`ParsedPage`]; the
//! `scraper::Html` tree itself never leaves this module.

use crate::config::SiteConfig;
use crate::graph::truncate_label;
use crate::state::DiscoveredLink;
use crate::url::{normalize_url, SiteScope};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// Best-effort page title
    pub title: String,

    /// Eligible links in document order, with their anchor text
    pub links: Vec<DiscoveredLink>,

    /// Eligible links inside `<nav>`, `<header>` and `<footer>` (seed page only)
    pub nav_links: Vec<String>,
}

/// Parses a page and extracts its title and links
///
/// # Arguments
///
/// * `html` - The HTML content
/// * `page_url` - URL the content was served from, used to resolve relative links
/// * `is_seed` - Whether this is the seed page; only then are nav links collected
/// * `scope` - Eligibility rules for discovered links
/// * `site` - Title cleaning rules
///
/// # Example
///
/// ```
/// use campus_mapper::config::SiteConfig;
/// use campus_mapper::crawler::parse_page;
/// use campus_mapper::url::SiteScope;
///
/// let site = SiteConfig::default();
/// let scope = SiteScope::new("https://www.example.edu", &site).unwrap();
/// let html = r#"<html><head><title>Nursing | CSU Chico</title></head>
///     <body><a href="/nursing/faculty">Faculty</a></body></html>"#;
///
/// let parsed = parse_page(html, "https://www.example.edu/nursing", false, &scope, &site);
/// assert_eq!(parsed.title, "Nursing");
/// assert_eq!(parsed.links[0].url, "https://www.example.edu/nursing/faculty");
/// ```
pub fn parse_page(
    html: &str,
    page_url: &str,
    is_seed: bool,
    scope: &SiteScope,
    site: &SiteConfig,
) -> ParsedPage {
    let document = Html::parse_document(html);
    let title = extract_title(&document, page_url, site);

    let Ok(base) = Url::parse(page_url) else {
        return ParsedPage {
            title,
            ..ParsedPage::default()
        };
    };

    let links = extract_links(&document, &base, scope);
    let nav_links = if is_seed {
        extract_nav_links(&document, &base, scope)
    } else {
        Vec::new()
    };

    ParsedPage {
        title,
        links,
        nav_links,
    }
}

/// Extracts a display title for the page
///
/// In order of preference:
/// 1. `<title>` with the configured site-name fragments removed
/// 2. The first non-empty `<h1>`
/// 3. The URL path with `/` shown as ` > ` (`/a/b` becomes `a > b`)
/// 4. The configured home label
///
/// Every candidate is trimmed, whitespace-collapsed and capped at 100 characters.
pub fn extract_title(document: &Html, url: &str, site: &SiteConfig) -> String {
    if let Some(title) = first_text(document, "title") {
        let mut cleaned = title;
        for fragment in &site.title_strip {
            cleaned = cleaned.replace(fragment.as_str(), "");
        }
        let cleaned = collapse_whitespace(&cleaned);
        if !cleaned.is_empty() {
            return truncate_label(&cleaned);
        }
    }

    if let Some(h1) = first_text(document, "h1") {
        return truncate_label(&h1);
    }

    let path = Url::parse(url)
        .map(|u| u.path().to_string())
        .unwrap_or_default();
    let trimmed = path.trim_matches('/');
    if !trimmed.is_empty() {
        return truncate_label(&trimmed.replace('/', " > "));
    }

    site.home_label.clone()
}

/// Extracts every eligible `<a href>` with its anchor text
pub fn extract_links(document: &Html, base: &Url, scope: &SiteScope) -> Vec<DiscoveredLink> {
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| {
            let url = resolve_link(element, base, scope)?;
            Some(DiscoveredLink {
                url,
                text: anchor_text(element),
            })
        })
        .collect()
}

/// Extracts eligible links inside `<nav>`, `<header>` and `<footer>`, deduplicated
pub fn extract_nav_links(document: &Html, base: &Url, scope: &SiteScope) -> Vec<String> {
    let Ok(selector) = Selector::parse("nav a[href], header a[href], footer a[href]") else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    document
        .select(&selector)
        .filter_map(|element| resolve_link(element, base, scope))
        .filter(|url| seen.insert(url.clone()))
        .collect()
}

/// Resolves, normalizes and scope-checks an anchor's href
fn resolve_link(element: ElementRef<'_>, base: &Url, scope: &SiteScope) -> Option<String> {
    let href = element.value().attr("href")?.trim();
    if href.is_empty() {
        return None;
    }

    let absolute = base.join(href).ok()?;
    let normalized = normalize_url(absolute.as_str());
    scope.is_eligible(&normalized).then_some(normalized)
}

/// Trimmed anchor text, falling back to the `title` attribute
fn anchor_text(element: ElementRef<'_>) -> String {
    let text = collapse_whitespace(&element.text().collect::<String>());
    if !text.is_empty() {
        return text;
    }
    element
        .value()
        .attr("title")
        .map(collapse_whitespace)
        .unwrap_or_default()
}

fn first_text(document: &Html, tag: &str) -> Option<String> {
    let selector = Selector::parse(tag).ok()?;
    document
        .select(&selector)
        .map(|element| collapse_whitespace(&element.text().collect::<String>()))
        .find(|text| !text.is_empty())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
