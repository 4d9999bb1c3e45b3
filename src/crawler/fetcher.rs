//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building the HTTP client with the identifying user agent and timeout
//! - GET requests that follow redirects (at most 10 hops)
//! - Classifying the outcome as success, off-site redirect or failure

use crate::config::UserAgentConfig;
use crate::url::SiteScope;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{redirect::Policy, Client};
use std::time::Duration;

/// Maximum redirect hops followed for a single fetch
pub const MAX_REDIRECTS: usize = 10;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// Redirects ended on a URL outside the site scope
    OffSite {
        /// The URL the redirect chain ended on
        final_url: String,
    },

    /// Network error, timeout, non-success status or unreadable body
    Failed {
        /// Error description
        error: String,
        /// HTTP status code, when a response was received
        status_code: Option<u16>,
    },
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout_secs` - Whole-request timeout in seconds
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use campus_mapper::config::UserAgentConfig;
/// use campus_mapper::crawler::build_http_client;
///
/// let config = UserAgentConfig {
///     crawler_name: "CampusMapper".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: "https://example.edu/about".to_string(),
///     contact_email: "admin@example.edu".to_string(),
/// };
///
/// let client = build_http_client(&config, 10).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig, timeout_secs: u64) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
    );

    Client::builder()
        .user_agent(config.header_value())
        .default_headers(headers)
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page, following redirects
///
/// # Outcomes
///
/// | Condition | Result |
/// |-----------|--------|
/// | Connection error, timeout, too many redirects | `Failed` |
/// | Non-2xx status after redirects | `Failed` |
/// | Body cannot be read as text | `Failed` |
/// | Final URL not eligible for the site | `OffSite` |
/// | Otherwise | `Success` |
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
/// * `scope` - Eligibility rules applied to the final URL
pub async fn fetch_page(client: &Client, url: &str, scope: &SiteScope) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            let error = if e.is_timeout() {
                "Request timeout".to_string()
            } else if e.is_redirect() {
                format!("Redirect error: {}", e)
            } else if e.is_connect() {
                "Connection failed".to_string()
            } else {
                e.to_string()
            };
            return FetchResult::Failed {
                error,
                status_code: e.status().map(|s| s.as_u16()),
            };
        }
    };

    let status = response.status();
    if !status.is_success() {
        return FetchResult::Failed {
            error: format!("HTTP {}", status.as_u16()),
            status_code: Some(status.as_u16()),
        };
    }

    let final_url = response.url().to_string();
    if !scope.is_eligible(&final_url) {
        return FetchResult::OffSite { final_url };
    }

    match response.text().await {
        Ok(body) => FetchResult::Success {
            final_url,
            status_code: status.as_u16(),
            body,
        },
        Err(e) => FetchResult::Failed {
            error: format!("Failed to read body: {}", e),
            status_code: Some(status.as_u16()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_test_config() -> UserAgentConfig {
        UserAgentConfig {
            crawler_name: "TestCrawler".to_string(),
            crawler_version: "1.0".to_string(),
            contact_url: "https://example.com/about".to_string(),
            contact_email: "admin@example.com".to_string(),
        }
    }

    #[test]
    fn test_build_http_client() {
        let config = create_test_config();
        let client = build_http_client(&config, 10);
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_fetch_success_and_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ok"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = build_http_client(&create_test_config(), 5).unwrap();
        let scope = SiteScope::new(&server.uri(), &SiteConfig::default()).unwrap();

        match fetch_page(&client, &format!("{}/ok", server.uri()), &scope).await {
            FetchResult::Success { body, status_code, .. } => {
                assert_eq!(status_code, 200);
                assert_eq!(body, "<html></html>");
            }
            other => panic!("expected success, got {:?}", other),
        }

        match fetch_page(&client, &format!("{}/missing", server.uri()), &scope).await {
            FetchResult::Failed { status_code, .. } => assert_eq!(status_code, Some(404)),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_redirect_off_site() {
        let server = MockServer::start().await;
        let elsewhere = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("elsewhere"))
            .mount(&elsewhere)
            .await;
        Mock::given(method("GET"))
            .and(path("/away"))
            .respond_with(
                ResponseTemplate::new(302)
                    .insert_header("Location", format!("{}/", elsewhere.uri()).as_str()),
            )
            .mount(&server)
            .await;

        let client = build_http_client(&create_test_config(), 5).unwrap();
        let scope = SiteScope::new(&server.uri(), &SiteConfig::default()).unwrap();

        let result = fetch_page(&client, &format!("{}/away", server.uri()), &scope).await;
        assert!(matches!(result, FetchResult::OffSite { .. }));
    }
}
