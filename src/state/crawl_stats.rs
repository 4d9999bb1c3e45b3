use super::PageState;
use std::collections::BTreeMap;
use std::time::Duration;

/// Counters for a single crawl run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrawlStats {
    /// Pages recorded as graph nodes, per depth
    pub pages_per_depth: BTreeMap<u32, usize>,

    /// Newly enqueued URLs discovered from pages at each depth
    pub new_links_per_depth: BTreeMap<u32, usize>,

    pub failed: usize,
    pub duplicate_redirects: usize,
    pub depth_exceeded: usize,
    pub off_site: usize,
    pub cancelled: usize,

    /// Wall time of the run, set when the run ends
    pub elapsed: Duration,
}

impl CrawlStats {
    /// Tallies a terminal page outcome
    pub fn record_outcome(&mut self, state: PageState, depth: u32) {
        match state {
            PageState::Recorded => *self.pages_per_depth.entry(depth).or_insert(0) += 1,
            PageState::Failed => self.failed += 1,
            PageState::DuplicateRedirect => self.duplicate_redirects += 1,
            PageState::DepthExceeded => self.depth_exceeded += 1,
            PageState::OffSite => self.off_site += 1,
            PageState::Cancelled => self.cancelled += 1,
        }
    }

    pub fn record_new_links(&mut self, depth: u32, count: usize) {
        *self.new_links_per_depth.entry(depth).or_insert(0) += count;
    }

    pub fn pages_recorded(&self) -> usize {
        self.pages_per_depth.values().sum()
    }

    pub fn links_discovered(&self) -> usize {
        self.new_links_per_depth.values().sum()
    }

    /// Recorded pages per second over the whole run
    pub fn pages_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.pages_recorded() as f64 / secs
        } else {
            0.0
        }
    }
}
