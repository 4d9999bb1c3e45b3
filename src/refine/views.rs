//! Builders for the three derived views of a crawled graph

use super::ancestry::is_ancestor_edge;
use super::clusters::{find_template_clusters, TemplateCluster};
use super::curate::curate;
use super::hubs::{detect_hubs, hubs_by_in_degree, prune_hub_edges};
use super::rules::{CurateRules, RefineRules, SimplifyRules};
use crate::graph::SiteGraph;
use std::collections::{HashMap, HashSet};

/// Hub-pruned graph with the detected hubs and template clusters
#[derive(Debug, Clone)]
pub struct SimplifiedGraph {
    pub graph: SiteGraph,
    pub hub_nodes: HashSet<String>,
    pub clusters: Vec<TemplateCluster>,
    cluster_index: HashMap<String, usize>,
}

impl SimplifiedGraph {
    /// Cluster containing `url`, if any
    pub fn cluster_of(&self, url: &str) -> Option<&TemplateCluster> {
        self.cluster_index.get(url).map(|&i| &self.clusters[i])
    }
}

/// Academic-subtree view
///
/// # Arguments
///
/// * `graph` - The full crawled graph (not modified)
/// * `rules` - Allow/deny prefixes, hub threshold and excluded label keywords
pub fn build_curated_graph(graph: &SiteGraph, rules: &CurateRules) -> SiteGraph {
    let curated = curate(graph, rules);
    tracing::debug!(
        "Curated view: {} nodes, {} edges",
        curated.node_count(),
        curated.edge_count()
    );
    curated
}

/// Forward-navigation view
///
/// Keeps every node and drops an edge when its target carries a query or
/// fragment marker, is an ancestor section of the source, or is a navigation
/// hub. Hubs are classified on the unfiltered graph.
pub fn build_refined_graph(graph: &SiteGraph, rules: &RefineRules) -> SiteGraph {
    let hubs = detect_hubs(graph, &rules.hub_rules());

    let mut refined = graph.filter_edges(|source, target| {
        !(target.contains('?')
            || target.contains('#')
            || is_ancestor_edge(source, target)
            || hubs.contains(target))
    });

    if rules.drop_isolated {
        refined.remove_isolated();
    }

    tracing::debug!(
        "Refined view: {} nodes, {} edges ({} hubs)",
        refined.node_count(),
        refined.edge_count(),
        hubs.len()
    );
    refined
}

/// Hub-pruned view with template clusters
pub fn build_simplified_graph(graph: &SiteGraph, rules: &SimplifyRules) -> SimplifiedGraph {
    let hub_nodes = hubs_by_in_degree(graph, rules.hub_threshold, &rules.extra_hubs);
    let pruned = prune_hub_edges(graph, &hub_nodes);
    let clusters = find_template_clusters(&pruned, rules.min_cluster_size);

    let mut cluster_index = HashMap::new();
    for (i, cluster) in clusters.iter().enumerate() {
        for member in &cluster.members {
            cluster_index.insert(member.clone(), i);
        }
    }

    tracing::debug!(
        "Simplified view: {} nodes, {} edges, {} hubs, {} clusters",
        pruned.node_count(),
        pruned.edge_count(),
        hub_nodes.len(),
        clusters.len()
    );

    SimplifiedGraph {
        graph: pruned,
        hub_nodes,
        clusters,
        cluster_index,
    }
}
