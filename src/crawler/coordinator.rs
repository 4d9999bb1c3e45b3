//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loops that coordinate:
//! - Seeding the frontier and the visited set
//! - Fetching, parsing and recording pages into the crawl session
//! - Admitting discovered links into the frontier
//! - Polling the shutdown flag so an interrupted crawl still yields its graph

use crate::config::{Config, CrawlMode, SiteConfig};
use crate::crawler::fetcher::{build_http_client, fetch_page, FetchResult};
use crate::crawler::parser::parse_page;
use crate::crawler::scheduler::{QueuedUrl, ScheduledFetch, Scheduler};
use crate::graph::SiteGraph;
use crate::state::{CrawlSession, CrawlStats, PageState};
use crate::storage::RunStatus;
use crate::url::{normalize_url, SiteScope};
use crate::MapperError;
use chrono::{DateTime, Utc};
use reqwest::Client;
use std::collections::HashSet;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Instant;

/// Called after each recorded page with the number of pages recorded so far
/// and the page URL
pub type ProgressCallback = Arc<dyn Fn(usize, String) + Send + Sync>;

/// Everything a finished (or interrupted) crawl produced
#[derive(Debug)]
pub struct CrawlOutcome {
    /// Canonical seed URL
    pub start_url: String,
    pub graph: SiteGraph,
    pub nav_footer: HashSet<String>,
    pub stats: CrawlStats,
    /// `Completed` or `Interrupted`
    pub status: RunStatus,
    pub finished_at: DateTime<Utc>,
}

impl CrawlOutcome {
    pub fn is_interrupted(&self) -> bool {
        self.status == RunStatus::Interrupted
    }
}

/// What happened to one dequeued URL
struct PageOutcome {
    state: PageState,
    children: Vec<QueuedUrl>,
}

impl PageOutcome {
    /// True if a request went out for this URL
    fn fetched(&self) -> bool {
        self.state.made_request()
    }
}

/// Per-page processing shared by every worker task
#[derive(Clone)]
struct PageWorker {
    client: Client,
    scope: Arc<SiteScope>,
    site: Arc<SiteConfig>,
    session: Arc<CrawlSession>,
    max_depth: u32,
    progress: Option<ProgressCallback>,
}

impl PageWorker {
    /// Fetches one URL and folds the page into the session
    async fn process(&self, queued: QueuedUrl) -> PageOutcome {
        if self.session.is_shutdown_requested() {
            return self.finish(&queued, PageState::Cancelled);
        }

        if queued.depth > self.max_depth {
            return self.finish(&queued, PageState::DepthExceeded);
        }

        tracing::debug!("[depth {}] Fetching {}", queued.depth, queued.url);

        let (final_url, body) = match fetch_page(&self.client, &queued.url, &self.scope).await {
            FetchResult::Success { final_url, body, .. } => (final_url, body),
            FetchResult::OffSite { final_url } => {
                tracing::debug!("{} redirected off-site to {}", queued.url, final_url);
                return self.finish(&queued, PageState::OffSite);
            }
            FetchResult::Failed { error, .. } => {
                tracing::warn!("Failed to fetch {}: {}", queued.url, error);
                return self.finish(&queued, PageState::Failed);
            }
        };

        let mut current = queued.url.clone();
        let canonical_final = normalize_url(&final_url);
        if canonical_final != current {
            if !self.session.mark_visited(&canonical_final) {
                tracing::debug!("{} redirected to already visited {}", queued.url, canonical_final);
                return self.finish(&queued, PageState::DuplicateRedirect);
            }
            current = canonical_final;
        }

        let is_seed = queued.depth == 0;
        let parsed = parse_page(&body, &final_url, is_seed, &self.scope, &self.site);

        let recorded = self.session.record_page(
            &current,
            &parsed.title,
            queued.depth,
            queued.parent.as_deref(),
        );
        self.session.record_outcome(PageState::Recorded, queued.depth);

        if is_seed {
            tracing::debug!("Seed page has {} nav/footer links", parsed.nav_links.len());
            self.session.extend_nav_footer(parsed.nav_links);
        }

        let fresh = self.session.admit_links(&current, is_seed, &parsed.links);
        self.session.record_new_links(queued.depth, fresh.len());

        tracing::debug!(
            "Recorded {} ({} links, {} new): {}",
            current,
            parsed.links.len(),
            fresh.len(),
            parsed.title
        );

        if recorded % 10 == 0 {
            tracing::info!(
                "Progress: {} pages recorded, {} URLs visited",
                recorded,
                self.session.visited_count()
            );
        }

        if let Some(progress) = &self.progress {
            progress(recorded, current.clone());
        }

        let children = fresh
            .into_iter()
            .map(|url| QueuedUrl::child(url, &queued, &current))
            .collect();

        PageOutcome {
            state: PageState::Recorded,
            children,
        }
    }

    /// Tallies a page that never became a graph node
    fn finish(&self, queued: &QueuedUrl, state: PageState) -> PageOutcome {
        tracing::trace!("[depth {}] {} -> {}", queued.depth, queued.url, state);
        self.session.record_outcome(state, queued.depth);
        PageOutcome {
            state,
            children: Vec::new(),
        }
    }
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
    seed: String,
    session: Arc<CrawlSession>,
    worker: PageWorker,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The validated configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(MapperError)` - The seed URL is unusable or the HTTP client could not be built
    pub fn new(config: Config) -> Result<Self, MapperError> {
        let scope = SiteScope::new(&config.crawler.start_url, &config.site)?;
        let client = build_http_client(&config.user_agent, config.crawler.request_timeout)?;
        let seed = normalize_url(&config.crawler.start_url);
        let session = Arc::new(CrawlSession::new());

        let worker = PageWorker {
            client,
            scope: Arc::new(scope),
            site: Arc::new(config.site.clone()),
            session: Arc::clone(&session),
            max_depth: config.crawler.max_depth,
            progress: None,
        };

        Ok(Self {
            config: Arc::new(config),
            seed,
            session,
            worker,
        })
    }

    /// Installs a callback invoked after every recorded page
    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.worker.progress = Some(callback);
        self
    }

    /// Flag that stops the crawl once set to `true`
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        self.session.shutdown_handle()
    }

    /// Canonical form of the configured seed URL
    pub fn start_url(&self) -> &str {
        &self.seed
    }

    /// The live crawl session
    pub fn session(&self) -> Arc<CrawlSession> {
        Arc::clone(&self.session)
    }

    /// Runs the crawl to completion or until shutdown is requested
    ///
    /// An interrupted crawl is not an error: the outcome carries the partial
    /// graph with `RunStatus::Interrupted`.
    pub async fn run(self) -> Result<CrawlOutcome, MapperError> {
        let start = Instant::now();
        let crawler = &self.config.crawler;

        tracing::info!(
            "Starting {:?} crawl of {} (max depth {}, {} workers, {}ms delay)",
            crawler.mode,
            self.seed,
            crawler.max_depth,
            crawler.workers,
            crawler.request_delay
        );

        self.session.mark_visited(&self.seed);
        let mut scheduler = Scheduler::new(crawler, vec![QueuedUrl::seed(self.seed.clone())]);

        match crawler.mode {
            CrawlMode::Sequential => self.run_sequential(&mut scheduler).await,
            CrawlMode::Concurrent => self.run_concurrent(&mut scheduler).await?,
        }

        let interrupted = self.session.is_shutdown_requested();
        for queued in scheduler.drain() {
            let state = if interrupted {
                PageState::Cancelled
            } else {
                PageState::DepthExceeded
            };
            self.session.record_outcome(state, queued.depth);
        }

        self.session.set_elapsed(start.elapsed());
        let status = if interrupted {
            RunStatus::Interrupted
        } else {
            RunStatus::Completed
        };

        let graph = self.session.graph_snapshot();
        let stats = self.session.stats();

        if interrupted {
            tracing::warn!(
                "Crawl interrupted: {} pages recorded, {} edges (partial graph)",
                graph.node_count(),
                graph.edge_count()
            );
        } else {
            tracing::info!(
                "Crawl completed: {} pages, {} edges in {:?}",
                graph.node_count(),
                graph.edge_count(),
                stats.elapsed
            );
        }

        Ok(CrawlOutcome {
            start_url: self.seed.clone(),
            graph,
            nav_footer: self.session.nav_footer(),
            stats,
            status,
            finished_at: Utc::now(),
        })
    }

    /// One page at a time with a fixed delay after every fetch
    async fn run_sequential(&self, scheduler: &mut Scheduler) {
        let delay = scheduler.request_delay();

        while let Some(queued) = scheduler.pop() {
            if self.session.is_shutdown_requested() {
                self.session.record_outcome(PageState::Cancelled, queued.depth);
                break;
            }

            let outcome = self.worker.process(queued).await;
            scheduler.extend_frontier(outcome.children.iter().cloned());

            if outcome.fetched() && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }
    }

    /// Depth-band batches dispatched to a bounded pool of tasks
    async fn run_concurrent(&self, scheduler: &mut Scheduler) -> Result<(), MapperError> {
        let max_depth = self.config.crawler.max_depth;
        let stagger = scheduler.stagger_delay();
        let mut current_depth = None;

        while !scheduler.is_empty() && !self.session.is_shutdown_requested() {
            let Some(depth) = scheduler.front_depth() else {
                break;
            };

            if current_depth != Some(depth) {
                tracing::info!(
                    "Starting depth {} ({} URLs queued)",
                    depth,
                    scheduler.frontier_size()
                );
                current_depth = Some(depth);
            }

            // The frontier is depth-ordered, so everything left is too deep
            if depth > max_depth {
                break;
            }

            let batch = scheduler.next_batch();
            let mut handles = Vec::with_capacity(batch.len());

            for queued in batch {
                if self.session.is_shutdown_requested() {
                    self.session.record_outcome(PageState::Cancelled, queued.depth);
                    continue;
                }

                let Some(scheduled) = scheduler.schedule(queued).await else {
                    break;
                };

                let worker = self.worker.clone();
                handles.push(tokio::spawn(async move {
                    let ScheduledFetch { url, _permit } = scheduled;
                    worker.process(url).await
                }));

                if !stagger.is_zero() {
                    tokio::time::sleep(stagger).await;
                }
            }

            // Results are folded in dispatch order
            for handle in handles {
                match handle.await {
                    Ok(outcome) => {
                        if !self.session.is_shutdown_requested() {
                            scheduler.extend_frontier(outcome.children);
                        }
                    }
                    Err(e) if e.is_panic() => return Err(e.into()),
                    Err(e) => tracing::error!("Page task failed: {}", e),
                }
            }
        }

        Ok(())
    }
}

/// Runs a complete crawl for the given configuration
///
/// Builds the HTTP client and site scope, seeds the frontier with the start
/// URL and fetches pages breadth-first up to the configured depth. Persisting
/// and exporting the graph is left to the caller.
///
/// # Returns
///
/// * `Ok(CrawlOutcome)` - Crawl completed or was interrupted
/// * `Err(MapperError)` - Crawl could not start
///
/// # Example
///
/// ```no_run
/// use campus_mapper::config::load_config;
/// use campus_mapper::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("config.toml"))?;
/// let outcome = run_crawl(config).await?;
/// println!("{} pages", outcome.graph.node_count());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config) -> Result<CrawlOutcome, MapperError> {
    Coordinator::new(config)?.run().await
}
