//! Statistics over a crawled site graph
//!
//! This module computes the structural numbers used by `--stats`, the final
//! crawl summary and the markdown report.

use crate::graph::SiteGraph;
use crate::state::CrawlStats;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Number of entries kept in the top-degree lists
pub const TOP_NODES: usize = 10;

/// Out-degree histogram
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DegreeDistribution {
    /// Pages with no outgoing links
    pub zero: usize,
    /// 1 to 10 outgoing links
    pub low: usize,
    /// 11 to 50 outgoing links
    pub medium: usize,
    /// More than 50 outgoing links
    pub high: usize,
    pub max: usize,
}

impl DegreeDistribution {
    fn add(&mut self, degree: usize) {
        match degree {
            0 => self.zero += 1,
            1..=10 => self.low += 1,
            11..=50 => self.medium += 1,
            _ => self.high += 1,
        }
        self.max = self.max.max(degree);
    }
}

/// Edges leaving pages of one depth, grouped by the target's depth
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepthEdges {
    pub earlier: usize,
    pub same: usize,
    pub later: usize,
    /// Target has no recorded depth
    pub unknown: usize,
}

impl DepthEdges {
    pub fn total(&self) -> usize {
        self.earlier + self.same + self.later + self.unknown
    }
}

/// Graph statistics summary
#[derive(Debug, Clone, Default)]
pub struct GraphStatistics {
    pub node_count: usize,
    pub edge_count: usize,
    pub self_loops: usize,
    pub out_degree: DegreeDistribution,

    /// Highest out-degree pages, descending
    pub top_out_degree: Vec<(String, usize)>,

    /// Highest in-degree pages, descending
    pub top_in_degree: Vec<(String, usize)>,

    pub pages_per_depth: BTreeMap<u32, usize>,

    /// Keyed by source depth; sources without a depth are left out
    pub edges_by_depth: BTreeMap<u32, DepthEdges>,
}

impl GraphStatistics {
    /// Computes all statistics in one pass over nodes and one over edges
    pub fn from_graph(graph: &SiteGraph) -> Self {
        let mut stats = Self {
            node_count: graph.node_count(),
            edge_count: graph.edge_count(),
            self_loops: graph.self_loop_count(),
            ..Self::default()
        };

        let mut out_degrees = Vec::with_capacity(graph.node_count());
        let mut in_degrees = Vec::with_capacity(graph.node_count());

        for node in graph.nodes() {
            let out = graph.out_degree(&node.url);
            stats.out_degree.add(out);
            out_degrees.push((node.url.clone(), out));
            in_degrees.push((node.url.clone(), graph.in_degree(&node.url)));

            if let Some(depth) = node.depth {
                *stats.pages_per_depth.entry(depth).or_insert(0) += 1;
            }
        }

        stats.top_out_degree = top_by_count(out_degrees);
        stats.top_in_degree = top_by_count(in_degrees);

        for (source, target) in graph.edges() {
            let Some(source_depth) = graph.node(source).and_then(|n| n.depth) else {
                continue;
            };
            let bucket = stats.edges_by_depth.entry(source_depth).or_default();
            match graph.node(target).and_then(|n| n.depth) {
                None => bucket.unknown += 1,
                Some(d) => match d.cmp(&source_depth) {
                    Ordering::Less => bucket.earlier += 1,
                    Ordering::Equal => bucket.same += 1,
                    Ordering::Greater => bucket.later += 1,
                },
            }
        }

        stats
    }

    /// Mean out-degree
    pub fn average_out_degree(&self) -> f64 {
        if self.node_count == 0 {
            0.0
        } else {
            self.edge_count as f64 / self.node_count as f64
        }
    }
}

/// Stable sort by descending count, zero counts dropped
fn top_by_count(mut entries: Vec<(String, usize)>) -> Vec<(String, usize)> {
    entries.retain(|(_, count)| *count > 0);
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries.truncate(TOP_NODES);
    entries
}

/// Prints graph statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &GraphStatistics) {
    println!("=== Graph Statistics ===\n");

    println!("Overview:");
    println!("  Pages: {}", stats.node_count);
    println!("  Links: {}", stats.edge_count);
    println!("  Self loops: {}", stats.self_loops);
    println!("  Average out-degree: {:.2}", stats.average_out_degree());
    println!();

    let dist = &stats.out_degree;
    println!("Out-degree Distribution:");
    println!("  0 links: {}", dist.zero);
    println!("  1-10 links: {}", dist.low);
    println!("  11-50 links: {}", dist.medium);
    println!("  51+ links: {}", dist.high);
    println!("  Max: {}", dist.max);
    println!();

    if !stats.pages_per_depth.is_empty() {
        println!("Pages by Depth:");
        for (depth, count) in &stats.pages_per_depth {
            println!("  Depth {}: {}", depth, count);
        }
        println!();
    }

    if !stats.edges_by_depth.is_empty() {
        println!("Link Direction by Source Depth (earlier / same / later / unknown):");
        for (depth, edges) in &stats.edges_by_depth {
            println!(
                "  Depth {}: {} / {} / {} / {}",
                depth, edges.earlier, edges.same, edges.later, edges.unknown
            );
        }
        println!();
    }

    if !stats.top_out_degree.is_empty() {
        println!("Most Outgoing Links:");
        for (url, count) in &stats.top_out_degree {
            println!("  {:>6}  {}", count, url);
        }
        println!();
    }

    if !stats.top_in_degree.is_empty() {
        println!("Most Incoming Links:");
        for (url, count) in &stats.top_in_degree {
            println!("  {:>6}  {}", count, url);
        }
        println!();
    }
}

/// Prints the counters of a finished crawl
pub fn print_crawl_stats(stats: &CrawlStats) {
    println!("=== Crawl Summary ===\n");

    println!(
        "  Pages recorded: {} in {:.1}s ({:.2} pages/s)",
        stats.pages_recorded(),
        stats.elapsed.as_secs_f64(),
        stats.pages_per_second()
    );
    println!("  New links discovered: {}", stats.links_discovered());
    println!("  Failed: {}", stats.failed);
    println!("  Redirects to visited pages: {}", stats.duplicate_redirects);
    println!("  Off-site redirects: {}", stats.off_site);
    println!("  Beyond max depth: {}", stats.depth_exceeded);
    if stats.cancelled > 0 {
        println!("  Cancelled by shutdown: {}", stats.cancelled);
    }
    println!();

    println!("  Depth | Pages | New links");
    for (depth, pages) in &stats.pages_per_depth {
        let new_links = stats.new_links_per_depth.get(depth).copied().unwrap_or(0);
        println!("  {:>5} | {:>5} | {:>9}", depth, pages, new_links);
    }
    println!();
}
