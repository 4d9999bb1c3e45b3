//! Directed site graph with explicit adjacency sets

use std::collections::{BTreeSet, HashMap, HashSet};

/// Maximum label length in characters
pub const MAX_LABEL_CHARS: usize = 100;

/// A crawled page: the canonical URL plus its display label and BFS depth
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageNode {
    /// Canonical URL (node identity)
    pub url: String,

    /// Best-effort human title
    pub label: String,

    /// BFS distance from the seed, fixed at first discovery
    ///
    /// `None` for nodes rebuilt from an export that carried no depth, and for
    /// endpoints created implicitly by `add_edge`.
    pub depth: Option<u32>,
}

/// Directed graph keyed by canonical URL
///
/// At most one edge exists per ordered pair. Node iteration follows insertion
/// order; successor and predecessor sets iterate in sorted order, so every
/// traversal over the graph is deterministic.
#[derive(Debug, Clone, Default)]
pub struct SiteGraph {
    nodes: HashMap<String, PageNode>,
    order: Vec<String>,
    successors: HashMap<String, BTreeSet<String>>,
    predecessors: HashMap<String, BTreeSet<String>>,
    edge_count: usize,
}

impl SiteGraph {
    /// Creates an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a graph from `(url, label)` nodes and `(source, target)` edges
    ///
    /// This is what generated graph modules call.
    pub fn from_parts<'a>(
        nodes: impl IntoIterator<Item = (&'a str, &'a str)>,
        edges: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        let mut graph = Self::new();
        for (url, label) in nodes {
            graph.add_node(url, label, None);
        }
        for (source, target) in edges {
            graph.add_edge(source, target);
        }
        graph
    }

    /// Adds a node, or updates the label of an existing one
    ///
    /// The depth of an existing node is never changed once set. Returns true if
    /// the node was newly inserted.
    pub fn add_node(&mut self, url: &str, label: &str, depth: Option<u32>) -> bool {
        let label = truncate_label(label);

        if let Some(node) = self.nodes.get_mut(url) {
            node.label = label;
            if node.depth.is_none() {
                node.depth = depth;
            }
            return false;
        }

        self.nodes.insert(
            url.to_string(),
            PageNode {
                url: url.to_string(),
                label,
                depth,
            },
        );
        self.order.push(url.to_string());
        true
    }

    /// Adds a directed edge, creating missing endpoints with the URL as label
    ///
    /// Returns true if the edge was not already present.
    pub fn add_edge(&mut self, source: &str, target: &str) -> bool {
        self.ensure_node(source);
        self.ensure_node(target);

        let inserted = self
            .successors
            .entry(source.to_string())
            .or_default()
            .insert(target.to_string());

        if inserted {
            self.predecessors
                .entry(target.to_string())
                .or_default()
                .insert(source.to_string());
            self.edge_count += 1;
        }

        inserted
    }

    /// Removes a directed edge; returns true if it existed
    pub fn remove_edge(&mut self, source: &str, target: &str) -> bool {
        let removed = self
            .successors
            .get_mut(source)
            .is_some_and(|out| out.remove(target));

        if removed {
            if let Some(incoming) = self.predecessors.get_mut(target) {
                incoming.remove(source);
            }
            self.edge_count -= 1;
        }

        removed
    }

    fn ensure_node(&mut self, url: &str) {
        if !self.nodes.contains_key(url) {
            self.add_node(url, url, None);
        }
    }

    pub fn contains_node(&self, url: &str) -> bool {
        self.nodes.contains_key(url)
    }

    pub fn contains_edge(&self, source: &str, target: &str) -> bool {
        self.successors
            .get(source)
            .is_some_and(|out| out.contains(target))
    }

    pub fn node(&self, url: &str) -> Option<&PageNode> {
        self.nodes.get(url)
    }

    /// Label lookup for a node
    pub fn label(&self, url: &str) -> Option<&str> {
        self.nodes.get(url).map(|n| n.label.as_str())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &PageNode> + '_ {
        self.order.iter().filter_map(|url| self.nodes.get(url))
    }

    /// Node URLs in insertion order
    pub fn urls(&self) -> impl Iterator<Item = &str> + '_ {
        self.order.iter().map(String::as_str)
    }

    /// Edges grouped by source (insertion order), targets sorted
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.order.iter().flat_map(move |source| {
            self.successors
                .get(source)
                .into_iter()
                .flatten()
                .map(move |target| (source.as_str(), target.as_str()))
        })
    }

    /// Direct successors of a node, sorted
    pub fn successors(&self, url: &str) -> impl Iterator<Item = &str> + '_ {
        self.successors
            .get(url)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    /// Direct predecessors of a node, sorted
    pub fn predecessors(&self, url: &str) -> impl Iterator<Item = &str> + '_ {
        self.predecessors
            .get(url)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    pub fn in_degree(&self, url: &str) -> usize {
        self.predecessors.get(url).map_or(0, BTreeSet::len)
    }

    pub fn out_degree(&self, url: &str) -> usize {
        self.successors.get(url).map_or(0, BTreeSet::len)
    }

    /// Total degree (a self loop counts twice)
    pub fn degree(&self, url: &str) -> usize {
        self.in_degree(url) + self.out_degree(url)
    }

    /// Number of edges whose source equals their target
    pub fn self_loop_count(&self) -> usize {
        self.edges().filter(|(s, t)| s == t).count()
    }

    /// Keeps only the nodes for which `keep` returns true, dropping their edges
    pub fn retain_nodes(&mut self, mut keep: impl FnMut(&PageNode) -> bool) {
        let removed: HashSet<String> = self
            .nodes()
            .filter(|node| !keep(node))
            .map(|node| node.url.clone())
            .collect();

        if removed.is_empty() {
            return;
        }

        for url in &removed {
            let outgoing = self.successors.remove(url).unwrap_or_default();
            for target in &outgoing {
                if let Some(incoming) = self.predecessors.get_mut(target) {
                    incoming.remove(url);
                }
            }
            self.edge_count -= outgoing.len();

            let incoming = self.predecessors.remove(url).unwrap_or_default();
            for source in &incoming {
                // Self loops were already counted with the outgoing set
                if source == url {
                    continue;
                }
                if let Some(out) = self.successors.get_mut(source) {
                    if out.remove(url) {
                        self.edge_count -= 1;
                    }
                }
            }

            self.nodes.remove(url);
        }

        self.order.retain(|url| !removed.contains(url));
    }

    /// Removes nodes with total degree 0 that also satisfy `predicate`
    pub fn remove_isolated_where(&mut self, mut predicate: impl FnMut(&PageNode) -> bool) {
        let isolated: HashSet<String> = self
            .nodes()
            .filter(|node| self.degree(&node.url) == 0 && predicate(node))
            .map(|node| node.url.clone())
            .collect();

        self.retain_nodes(|node| !isolated.contains(&node.url));
    }

    /// Removes every node with total degree 0
    pub fn remove_isolated(&mut self) {
        self.remove_isolated_where(|_| true);
    }

    /// Copy with every node and only the edges for which `keep` returns true
    pub fn filter_edges(&self, mut keep: impl FnMut(&str, &str) -> bool) -> SiteGraph {
        let mut filtered = SiteGraph::new();
        for node in self.nodes() {
            filtered.add_node(&node.url, &node.label, node.depth);
        }
        for (source, target) in self.edges() {
            if keep(source, target) {
                filtered.add_edge(source, target);
            }
        }
        filtered
    }

    /// Subgraph induced by `keep`: those nodes plus every edge between them
    pub fn induced_subgraph(&self, keep: &HashSet<String>) -> SiteGraph {
        let mut sub = SiteGraph::new();
        for node in self.nodes().filter(|n| keep.contains(&n.url)) {
            sub.add_node(&node.url, &node.label, node.depth);
        }
        for (source, target) in self.edges() {
            if keep.contains(source) && keep.contains(target) {
                sub.add_edge(source, target);
            }
        }
        sub
    }
}

/// Truncates a label to `MAX_LABEL_CHARS` characters
pub fn truncate_label(label: &str) -> String {
    label.chars().take(MAX_LABEL_CHARS).collect()
}
