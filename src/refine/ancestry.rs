use super::paths::{is_ancestor, section_path};
use crate::graph::SiteGraph;

/// Returns true if the edge points back up the source's section tree
///
/// Breadcrumbs, "back to department" links, links to the homepage and self
/// links all match.
pub fn is_ancestor_edge(source: &str, target: &str) -> bool {
    is_ancestor(&section_path(target), &section_path(source))
}

/// Copy of the graph without ancestor edges; every node is kept
pub fn drop_ancestor_edges(graph: &SiteGraph) -> SiteGraph {
    graph.filter_edges(|source, target| !is_ancestor_edge(source, target))
}
