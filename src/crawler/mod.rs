//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with redirect following and a same-site check on the final URL
//! - HTML parsing: titles, links and the seed's nav/footer links
//! - Frontier scheduling and worker-slot limiting
//! - Overall crawl coordination in sequential or concurrent mode

mod coordinator;
mod fetcher;
mod parser;
mod scheduler;

pub use coordinator::{run_crawl, Coordinator, CrawlOutcome, ProgressCallback};
pub use fetcher::{build_http_client, fetch_page, FetchResult, MAX_REDIRECTS};
pub use parser::{extract_links, extract_nav_links, extract_title, parse_page, ParsedPage};
pub use scheduler::{QueuedUrl, ScheduledFetch, Scheduler};
