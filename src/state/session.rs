//! Shared mutable state of one crawl run
//!
//! Every structure sits behind its own lock and is only reachable through the
//! accessors below, so no guard ever escapes into an `.await`. When more than
//! one lock is needed the order is nav/footer set, visited set, graph, labels.

use super::{CrawlStats, PageState};
use crate::graph::{truncate_label, SiteGraph};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

/// A link found on a page: canonical URL plus anchor text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredLink {
    pub url: String,
    pub text: String,
}

impl DiscoveredLink {
    pub fn new(url: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            text: text.into(),
        }
    }
}

/// Crawl-wide state: visited set, graph, nav/footer set, anchor labels, stats
/// and the shutdown flag
#[derive(Debug, Default)]
pub struct CrawlSession {
    visited: Mutex<HashSet<String>>,
    graph: RwLock<SiteGraph>,
    nav_footer: RwLock<HashSet<String>>,
    anchor_labels: Mutex<HashMap<String, String>>,
    stats: Mutex<CrawlStats>,
    shutdown: Arc<AtomicBool>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

impl CrawlSession {
    pub fn new() -> Self {
        Self::default()
    }

    // ===== Visited set =====

    /// Marks a URL visited; returns true if it was not visited before
    ///
    /// Check and insert happen under one lock acquisition.
    pub fn mark_visited(&self, url: &str) -> bool {
        lock(&self.visited).insert(url.to_string())
    }

    pub fn is_visited(&self, url: &str) -> bool {
        lock(&self.visited).contains(url)
    }

    pub fn visited_count(&self) -> usize {
        lock(&self.visited).len()
    }

    // ===== Graph =====

    /// Records a fetched page as a graph node, with its parent edge if any
    ///
    /// # Returns
    ///
    /// The number of nodes in the graph after recording
    pub fn record_page(&self, url: &str, label: &str, depth: u32, parent: Option<&str>) -> usize {
        let mut graph = write(&self.graph);
        graph.add_node(url, label, Some(depth));
        if let Some(parent) = parent {
            graph.add_edge(parent, url);
        }
        graph.node_count()
    }

    /// Adds `source -> target` only when `target` is already a graph node
    pub fn add_cross_edge(&self, source: &str, target: &str) -> bool {
        let mut graph = write(&self.graph);
        graph.contains_node(target) && graph.add_edge(source, target)
    }

    /// Runs `f` against the live graph under the read lock
    pub fn with_graph<R>(&self, f: impl FnOnce(&SiteGraph) -> R) -> R {
        f(&read(&self.graph))
    }

    /// Copy of the current graph
    pub fn graph_snapshot(&self) -> SiteGraph {
        read(&self.graph).clone()
    }

    pub fn into_graph(self) -> SiteGraph {
        self.graph.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    // ===== Nav/footer set =====

    pub fn extend_nav_footer(&self, urls: impl IntoIterator<Item = String>) {
        write(&self.nav_footer).extend(urls);
    }

    pub fn in_nav_footer(&self, url: &str) -> bool {
        read(&self.nav_footer).contains(url)
    }

    pub fn nav_footer(&self) -> HashSet<String> {
        read(&self.nav_footer).clone()
    }

    // ===== Labels =====

    /// Stores the anchor text for a URL unless one is already known
    pub fn seed_anchor_label(&self, url: &str, text: &str) {
        if text.is_empty() {
            return;
        }
        lock(&self.anchor_labels)
            .entry(url.to_string())
            .or_insert_with(|| truncate_label(text));
    }

    /// Graph label if the page was recorded, else the first anchor text seen
    pub fn label_for(&self, url: &str) -> Option<String> {
        if let Some(label) = read(&self.graph).label(url) {
            return Some(label.to_string());
        }
        lock(&self.anchor_labels).get(url).cloned()
    }

    // ===== Link admission =====

    /// Folds the links of a processed page into the session
    ///
    /// On the seed page nothing is filtered. On other pages a link is dropped
    /// when it is in the nav/footer set and already visited. Each surviving
    /// link is either newly marked visited (and returned for enqueueing) or,
    /// if it was already visited and is a graph node, linked from `current`
    /// as a cross edge.
    ///
    /// # Returns
    ///
    /// The newly visited URLs in discovery order
    pub fn admit_links(&self, current: &str, is_seed: bool, links: &[DiscoveredLink]) -> Vec<String> {
        let nav_footer = read(&self.nav_footer);
        let mut visited = lock(&self.visited);
        let mut fresh = Vec::new();

        for link in links {
            if !is_seed && nav_footer.contains(&link.url) && visited.contains(&link.url) {
                continue;
            }

            if visited.insert(link.url.clone()) {
                self.seed_anchor_label(&link.url, &link.text);
                fresh.push(link.url.clone());
            } else {
                let mut graph = write(&self.graph);
                if graph.contains_node(&link.url) {
                    graph.add_edge(current, &link.url);
                }
            }
        }

        fresh
    }

    // ===== Stats =====

    pub fn record_outcome(&self, state: PageState, depth: u32) {
        lock(&self.stats).record_outcome(state, depth);
    }

    pub fn record_new_links(&self, depth: u32, count: usize) {
        lock(&self.stats).record_new_links(depth, count);
    }

    pub fn set_elapsed(&self, elapsed: Duration) {
        lock(&self.stats).elapsed = elapsed;
    }

    pub fn stats(&self) -> CrawlStats {
        lock(&self.stats).clone()
    }

    // ===== Shutdown =====

    /// Shared flag; storing `true` stops the crawl at the next poll point
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    pub fn request_shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    pub fn is_shutdown_requested(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOME: &str = "https://e.edu/";

    fn links(urls: &[&str]) -> Vec<DiscoveredLink> {
        urls.iter()
            .map(|u| DiscoveredLink::new(*u, format!("text for {}", u)))
            .collect()
    }

    #[test]
    fn test_mark_visited_once() {
        let session = CrawlSession::new();
        assert!(session.mark_visited(HOME));
        assert!(!session.mark_visited(HOME));
        assert_eq!(session.visited_count(), 1);
    }

    #[test]
    fn test_record_page_keeps_first_depth() {
        let session = CrawlSession::new();
        session.record_page(HOME, "Home", 0, None);
        session.record_page("https://e.edu/a", "A", 1, Some(HOME));
        session.record_page("https://e.edu/a", "A again", 3, None);

        let graph = session.graph_snapshot();
        assert_eq!(graph.node("https://e.edu/a").unwrap().depth, Some(1));
        assert!(graph.contains_edge(HOME, "https://e.edu/a"));
    }

    #[test]
    fn test_admit_links_enqueues_new_and_links_known() {
        let session = CrawlSession::new();
        session.mark_visited(HOME);
        session.record_page(HOME, "Home", 0, None);

        let fresh = session.admit_links(HOME, true, &links(&["https://e.edu/a", HOME]));
        assert_eq!(fresh, vec!["https://e.edu/a".to_string()]);
        // Self link to a recorded node becomes a cross edge
        assert!(session.with_graph(|g| g.contains_edge(HOME, HOME)));

        // Visited but never recorded: no edge
        session.record_page("https://e.edu/b", "B", 1, Some(HOME));
        let fresh = session.admit_links("https://e.edu/b", false, &links(&["https://e.edu/a"]));
        assert!(fresh.is_empty());
        assert!(!session.with_graph(|g| g.contains_edge("https://e.edu/b", "https://e.edu/a")));
    }

    #[test]
    fn test_nav_footer_links_dropped_once_visited() {
        let session = CrawlSession::new();
        session.mark_visited(HOME);
        session.record_page(HOME, "Home", 0, None);
        session.record_page("https://e.edu/contact", "Contact", 1, Some(HOME));
        session.mark_visited("https://e.edu/contact");
        session.extend_nav_footer(["https://e.edu/contact".to_string(), "https://e.edu/maps".to_string()]);

        session.record_page("https://e.edu/x", "X", 1, Some(HOME));
        let fresh = session.admit_links(
            "https://e.edu/x",
            false,
            &links(&["https://e.edu/contact", "https://e.edu/maps"]),
        );

        // Visited nav link: no cross edge. Unvisited nav link: still enqueued
        assert_eq!(fresh, vec!["https://e.edu/maps".to_string()]);
        assert!(!session.with_graph(|g| g.contains_edge("https://e.edu/x", "https://e.edu/contact")));
    }

    #[test]
    fn test_label_for_prefers_recorded_title() {
        let session = CrawlSession::new();
        session.seed_anchor_label("https://e.edu/a", "Anchor A");
        session.seed_anchor_label("https://e.edu/a", "Second anchor");
        session.seed_anchor_label("https://e.edu/b", "");

        assert_eq!(session.label_for("https://e.edu/a").as_deref(), Some("Anchor A"));
        assert_eq!(session.label_for("https://e.edu/b"), None);

        session.record_page("https://e.edu/a", "Page A", 1, None);
        assert_eq!(session.label_for("https://e.edu/a").as_deref(), Some("Page A"));
    }

    #[test]
    fn test_shutdown_handle_is_shared() {
        let session = CrawlSession::new();
        let handle = session.shutdown_handle();
        assert!(!session.is_shutdown_requested());

        handle.store(true, Ordering::SeqCst);
        assert!(session.is_shutdown_requested());
    }
}
