use super::paths::{normalize_prefix, section_path};
use super::rules::HubRules;
use crate::graph::{PageNode, SiteGraph};
use std::collections::HashSet;

/// Classifies navigation hubs
///
/// A node is a hub if any of the following holds:
/// - its in-degree is at least `rules.threshold`
/// - its lowercased section path starts with a nav prefix
/// - its lowercased label contains a nav keyword
///
/// # Returns
///
/// The set of hub URLs
pub fn detect_hubs(graph: &SiteGraph, rules: &HubRules) -> HashSet<String> {
    let prefixes: Vec<String> = rules.nav_prefixes.iter().map(|p| normalize_prefix(p)).collect();
    let keywords: Vec<String> = rules.nav_keywords.iter().map(|k| k.to_lowercase()).collect();

    graph
        .nodes()
        .filter(|node| is_hub(graph, node, rules.threshold, &prefixes, &keywords))
        .map(|node| node.url.clone())
        .collect()
}

fn is_hub(
    graph: &SiteGraph,
    node: &PageNode,
    threshold: usize,
    prefixes: &[String],
    keywords: &[String],
) -> bool {
    if graph.in_degree(&node.url) >= threshold {
        return true;
    }

    let path = section_path(&node.url).to_lowercase();
    if prefixes.iter().any(|p| path.starts_with(p.as_str())) {
        return true;
    }

    let label = node.label.to_lowercase();
    keywords.iter().any(|k| label.contains(k.as_str()))
}

/// Hubs by in-degree alone, plus any forced URLs
pub fn hubs_by_in_degree(
    graph: &SiteGraph,
    threshold: usize,
    extra: &[String],
) -> HashSet<String> {
    let mut hubs = detect_hubs(graph, &HubRules::in_degree_only(threshold));
    hubs.extend(extra.iter().cloned());
    hubs
}

/// Removes every edge into a hub, then drops hubs left with no edges at all
///
/// Non-hub nodes are always kept, even when they lose every edge.
pub fn prune_hub_edges(graph: &SiteGraph, hubs: &HashSet<String>) -> SiteGraph {
    let mut pruned = graph.filter_edges(|_, target| !hubs.contains(target));
    pruned.remove_isolated_where(|node| hubs.contains(&node.url));
    pruned
}
