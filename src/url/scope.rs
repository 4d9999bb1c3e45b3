use crate::config::SiteConfig;
use crate::{UrlError, UrlResult};
use url::Url;

/// Decides which URLs belong to the site being mapped
///
/// A URL is eligible when:
/// - its scheme is not on the scheme deny-list (`mailto`, `tel` by default)
/// - its host is the configured site host or that host's bare apex
///   (`www.example.edu` also admits `example.edu`)
/// - its explicit port, if any, matches the seed's
/// - its lowercased path does not end with a deny-listed extension
#[derive(Debug, Clone)]
pub struct SiteScope {
    host: String,
    apex: String,
    port: Option<u16>,
    skip_extensions: Vec<String>,
    skip_schemes: Vec<String>,
}

impl SiteScope {
    /// Builds the scope from the seed URL and the site rules
    ///
    /// # Errors
    ///
    /// Returns `UrlError` if the seed does not parse, is not http(s), or has no host.
    pub fn new(start_url: &str, site: &SiteConfig) -> UrlResult<Self> {
        let url = Url::parse(start_url).map_err(|e| UrlError::Parse(e.to_string()))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(UrlError::InvalidScheme(url.scheme().to_string()));
        }

        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or(UrlError::MissingHost)?
            .to_lowercase();
        let apex = host.strip_prefix("www.").unwrap_or(&host).to_string();

        Ok(Self {
            host,
            apex,
            port: url.port(),
            skip_extensions: site
                .skip_extensions
                .iter()
                .map(|e| e.to_lowercase())
                .collect(),
            skip_schemes: site.skip_schemes.iter().map(|s| s.to_lowercase()).collect(),
        })
    }

    /// The configured site host (lowercased)
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns true if the URL may be fetched and recorded
    pub fn is_eligible(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };

        if self.skip_schemes.iter().any(|s| s == parsed.scheme()) {
            return false;
        }

        let Some(host) = parsed.host_str() else {
            return false;
        };
        let host = host.to_lowercase();
        if host != self.host && host != self.apex {
            return false;
        }

        if parsed.port() != self.port {
            return false;
        }

        let path = parsed.path().to_lowercase();
        !self
            .skip_extensions
            .iter()
            .any(|ext| path.ends_with(ext.as_str()))
    }
}
