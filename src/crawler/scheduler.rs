//! Scheduler for managing the crawl frontier and worker concurrency
//!
//! This module handles:
//! - The FIFO frontier of `(url, depth, parent)` entries
//! - Depth-band batching for the concurrent mode
//! - Global concurrency limiting via a semaphore
//! - The stagger delay between dispatches

use crate::config::CrawlerConfig;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Batch size per worker in the concurrent mode
const BATCH_PER_WORKER: usize = 10;

/// A URL waiting in the frontier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedUrl {
    /// Canonical URL to fetch
    pub url: String,

    /// BFS depth of the URL
    pub depth: u32,

    /// Canonical URL of the page the link was found on (None for the seed)
    pub parent: Option<String>,
}

impl QueuedUrl {
    pub fn seed(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            depth: 0,
            parent: None,
        }
    }

    pub fn child(url: impl Into<String>, parent: &QueuedUrl, parent_url: &str) -> Self {
        Self {
            url: url.into(),
            depth: parent.depth + 1,
            parent: Some(parent_url.to_string()),
        }
    }
}

/// A batch entry together with its worker permit
pub struct ScheduledFetch {
    /// The URL to fetch
    pub url: QueuedUrl,

    /// The semaphore permit for this fetch
    pub _permit: OwnedSemaphorePermit,
}

/// Scheduler owns the frontier and the worker semaphore
///
/// Entries leave the frontier in FIFO order. Since children are always one
/// level deeper than the page they were found on, the frontier stays sorted
/// by depth and a batch never needs to look past the front depth.
pub struct Scheduler {
    /// FIFO frontier
    frontier: VecDeque<QueuedUrl>,

    /// Limits the number of pages in flight
    semaphore: Arc<Semaphore>,

    workers: usize,
    request_delay: Duration,
}

impl Scheduler {
    /// Creates a new scheduler
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration (workers and request delay)
    /// * `initial_frontier` - Initial URLs to crawl
    pub fn new(config: &CrawlerConfig, initial_frontier: Vec<QueuedUrl>) -> Self {
        let workers = config.workers.max(1) as usize;
        Self {
            frontier: VecDeque::from(initial_frontier),
            semaphore: Arc::new(Semaphore::new(workers)),
            workers,
            request_delay: Duration::from_millis(config.request_delay),
        }
    }

    /// Removes and returns the next URL in FIFO order
    pub fn pop(&mut self) -> Option<QueuedUrl> {
        self.frontier.pop_front()
    }

    pub fn add_to_frontier(&mut self, url: QueuedUrl) {
        tracing::trace!("Enqueued {} at depth {}", url.url, url.depth);
        self.frontier.push_back(url);
    }

    pub fn extend_frontier(&mut self, urls: impl IntoIterator<Item = QueuedUrl>) {
        for url in urls {
            self.add_to_frontier(url);
        }
    }

    /// Depth of the entry at the front of the frontier
    pub fn front_depth(&self) -> Option<u32> {
        self.frontier.front().map(|q| q.depth)
    }

    /// Takes up to `workers * 10` entries, all at the front depth
    pub fn next_batch(&mut self) -> Vec<QueuedUrl> {
        let Some(depth) = self.front_depth() else {
            return Vec::new();
        };

        let limit = self.workers * BATCH_PER_WORKER;
        let mut batch = Vec::with_capacity(limit.min(self.frontier.len()));
        while batch.len() < limit {
            match self.frontier.front() {
                Some(next) if next.depth == depth => {
                    if let Some(next) = self.frontier.pop_front() {
                        batch.push(next);
                    }
                }
                _ => break,
            }
        }

        tracing::trace!("Batch of {} URLs at depth {}", batch.len(), depth);
        batch
    }

    /// Removes everything left in the frontier
    pub fn drain(&mut self) -> Vec<QueuedUrl> {
        self.frontier.drain(..).collect()
    }

    /// Waits for a free worker slot
    ///
    /// Returns None only if the semaphore was closed.
    pub async fn schedule(&self, url: QueuedUrl) -> Option<ScheduledFetch> {
        let permit = Arc::clone(&self.semaphore).acquire_owned().await.ok()?;
        Some(ScheduledFetch {
            url,
            _permit: permit,
        })
    }

    /// Fixed delay after each page in sequential mode
    pub fn request_delay(&self) -> Duration {
        self.request_delay
    }

    /// Delay between dispatches in concurrent mode (`request_delay / workers`)
    pub fn stagger_delay(&self) -> Duration {
        self.request_delay / self.workers as u32
    }

    pub fn frontier_size(&self) -> usize {
        self.frontier.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frontier.is_empty()
    }

    pub fn available_permits(&self) -> usize {
        self.semaphore.available_permits()
    }
}
