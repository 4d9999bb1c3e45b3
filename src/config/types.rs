use crate::refine::{CurateRules, RefineRules, SimplifyRules};
use serde::Deserialize;

/// Main configuration structure for Campus-Mapper
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub site: SiteConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub curated: CurateRules,
    #[serde(default)]
    pub refined: RefineRules,
    #[serde(default)]
    pub simplified: SimplifyRules,
}

/// How the frontier is drained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrawlMode {
    /// One fetch at a time, fixed delay after every page
    Sequential,
    /// Bounded worker pool, frontier drained in depth bands
    Concurrent,
}

impl Default for CrawlMode {
    fn default() -> Self {
        Self::Concurrent
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Seed URL the breadth-first traversal starts from
    #[serde(rename = "start-url")]
    pub start_url: String,

    /// Maximum BFS depth to fetch (the seed is depth 0)
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: u32,

    /// Delay per unit of work (milliseconds)
    ///
    /// Applied after every page in sequential mode, and divided by the worker
    /// count between dispatches in concurrent mode.
    #[serde(rename = "request-delay", default = "default_request_delay")]
    pub request_delay: u64,

    /// Number of concurrent page fetches in concurrent mode
    #[serde(default = "default_workers")]
    pub workers: u32,

    /// Frontier draining strategy
    #[serde(default)]
    pub mode: CrawlMode,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout", default = "default_request_timeout")]
    pub request_timeout: u64,
}

fn default_max_depth() -> u32 {
    6
}

fn default_request_delay() -> u64 {
    500
}

fn default_workers() -> u32 {
    4
}

fn default_request_timeout() -> u64 {
    10
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the user agent header: `Name/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Site-specific crawl eligibility and labelling rules
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SiteConfig {
    /// Path extensions that are never fetched (compared against the lowercased path)
    pub skip_extensions: Vec<String>,

    /// URL schemes that are never fetched
    pub skip_schemes: Vec<String>,

    /// Site-name fragments removed from `<title>` text
    pub title_strip: Vec<String>,

    /// Label used for the root page when no title or heading exists
    pub home_label: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            skip_extensions: [
                ".pdf", ".jpg", ".jpeg", ".png", ".gif", ".zip", ".doc", ".docx", ".xls",
                ".xlsx", ".ppt", ".pptx", ".mp4", ".mp3", ".avi", ".mov", ".css", ".js",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            skip_schemes: vec!["mailto".to_string(), "tel".to_string()],
            title_strip: vec![
                " | CSU Chico".to_string(),
                " - CSU Chico".to_string(),
                "CSU, Chico - ".to_string(),
            ],
            home_label: "CSU Chico Home".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Path of the generated Rust module exposing `create_site_graph()`
    #[serde(rename = "module-path")]
    pub module_path: String,

    /// Path to the markdown summary file
    #[serde(rename = "summary-path")]
    pub summary_path: String,
}
