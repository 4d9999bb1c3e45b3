//! Generated-module export of a crawled site graph
//!
//! The export is a self-contained Rust source file exposing a zero-argument
//! `create_site_graph()` that rebuilds the node set `(url, label)` and edge set
//! `(source, target)` through [`SiteGraph::from_parts`].

use crate::graph::SiteGraph;
use chrono::{DateTime, Utc};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// Metadata written into the generated module header
#[derive(Debug, Clone)]
pub struct ExportMeta {
    /// Seed URL of the crawl
    pub start_url: String,

    /// When the module was generated
    pub generated_at: DateTime<Utc>,

    /// True if the crawl was stopped before the frontier drained
    pub interrupted: bool,
}

/// Renders the graph as Rust source
///
/// String literals are produced with `{:?}`, which always yields a valid
/// Rust literal regardless of quotes, backslashes or control characters.
pub fn render_module(graph: &SiteGraph, meta: &ExportMeta) -> String {
    let mut src = String::new();

    // Writing into a String cannot fail
    let _ = writeln!(src, "//! Site graph crawled from {}", meta.start_url);
    let _ = writeln!(src, "//!");
    let _ = writeln!(src, "//! Nodes: {}", graph.node_count());
    let _ = writeln!(src, "//! Edges: {}", graph.edge_count());
    let _ = writeln!(src, "//! Generated: {}", meta.generated_at.to_rfc3339());
    if meta.interrupted {
        let _ = writeln!(
            src,
            "//! WARNING: crawl was interrupted - this is a partial graph"
        );
    }
    src.push('\n');
    src.push_str("use campus_mapper::graph::SiteGraph;\n\n");

    src.push_str("const NODES: &[(&str, &str)] = &[\n");
    for node in graph.nodes() {
        let label = node.label.replace(['\n', '\r'], " ");
        let _ = writeln!(src, "    ({:?}, {:?}),", node.url, label);
    }
    src.push_str("];\n\n");

    src.push_str("const EDGES: &[(&str, &str)] = &[\n");
    for (source, target) in graph.edges() {
        let _ = writeln!(src, "    ({:?}, {:?}),", source, target);
    }
    src.push_str("];\n\n");

    src.push_str("/// Builds the crawled site graph\n");
    src.push_str("pub fn create_site_graph() -> SiteGraph {\n");
    src.push_str("    SiteGraph::from_parts(NODES.iter().copied(), EDGES.iter().copied())\n");
    src.push_str("}\n");

    src
}

/// Renders the graph and writes it to `path`
pub fn write_module(path: &Path, graph: &SiteGraph, meta: &ExportMeta) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, render_module(graph, meta))?;
    tracing::info!(
        "Wrote graph module with {} nodes and {} edges to {}",
        graph.node_count(),
        graph.edge_count(),
        path.display()
    );
    Ok(())
}
