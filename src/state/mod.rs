//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `PageState`: Per-URL states (enqueued, fetched, recorded, failed, ...)
//! - `CrawlStats`: Per-depth and per-outcome counters for a run
//! - `CrawlSession`: Shared visited set, graph, nav/footer set and labels

mod crawl_stats;
mod page_state;
mod session;

pub use crawl_stats::CrawlStats;
pub use page_state::PageState;
pub use session::{CrawlSession, DiscoveredLink};
