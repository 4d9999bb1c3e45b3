use super::paths::{curation_path, normalize_prefix};
use super::rules::CurateRules;
use crate::graph::{PageNode, SiteGraph};
use std::collections::HashSet;

/// Extracts the allowed subtrees of the site
///
/// A node is kept when:
/// - its URL has no query or fragment marker
/// - its path does not start with a deny prefix
/// - its in-degree is below the hub threshold
/// - its label contains no excluded keyword
/// - its path starts with an allow prefix
///
/// The result is the subgraph induced by those nodes, minus any node that
/// ended up without edges.
pub fn curate(graph: &SiteGraph, rules: &CurateRules) -> SiteGraph {
    let allow: Vec<String> = rules.allow_prefixes.iter().map(|p| normalize_prefix(p)).collect();
    let deny: Vec<String> = rules.deny_prefixes.iter().map(|p| normalize_prefix(p)).collect();
    let keywords: Vec<String> = rules
        .exclude_label_keywords
        .iter()
        .map(|k| k.to_lowercase())
        .collect();

    let keep: HashSet<String> = graph
        .nodes()
        .filter(|node| is_allowed(graph, node, rules.hub_threshold, &allow, &deny, &keywords))
        .map(|node| node.url.clone())
        .collect();

    let mut curated = graph.induced_subgraph(&keep);
    curated.remove_isolated();
    curated
}

fn is_allowed(
    graph: &SiteGraph,
    node: &PageNode,
    hub_threshold: usize,
    allow: &[String],
    deny: &[String],
    keywords: &[String],
) -> bool {
    if node.url.contains('?') || node.url.contains('#') {
        return false;
    }

    let path = curation_path(&node.url);
    if deny.iter().any(|p| path.starts_with(p.as_str())) {
        return false;
    }

    if graph.in_degree(&node.url) >= hub_threshold {
        return false;
    }

    let label = node.label.to_lowercase();
    if keywords.iter().any(|k| label.contains(k.as_str())) {
        return false;
    }

    allow.iter().any(|p| path.starts_with(p.as_str()))
}
