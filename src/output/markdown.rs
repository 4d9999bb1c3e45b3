//! Markdown summary generation
//!
//! This module generates a human-readable markdown report of a stored run:
//! run metadata, graph statistics, the sizes of the derived views and the
//! largest template clusters.

use super::stats::GraphStatistics;
use super::OutputResult;
use crate::config::Config;
use crate::graph::SiteGraph;
use crate::refine::{
    build_curated_graph, build_refined_graph, build_simplified_graph, TemplateCluster,
};
use crate::storage::RunRecord;
use std::fmt::Write as _;
use std::path::Path;

/// Number of clusters listed in the report
const CLUSTERS_SHOWN: usize = 10;

/// Node and edge count of one derived view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewSize {
    pub nodes: usize,
    pub edges: usize,
}

impl ViewSize {
    fn of(graph: &SiteGraph) -> Self {
        Self {
            nodes: graph.node_count(),
            edges: graph.edge_count(),
        }
    }
}

/// Everything the markdown report shows
#[derive(Debug, Clone)]
pub struct SummaryReport {
    pub run: RunRecord,
    pub statistics: GraphStatistics,
    pub curated: ViewSize,
    pub refined: ViewSize,
    pub simplified: ViewSize,
    pub hub_count: usize,

    /// Largest clusters first
    pub clusters: Vec<TemplateCluster>,
}

impl SummaryReport {
    /// Computes statistics and builds the three views with the configured rules
    pub fn build(run: RunRecord, graph: &SiteGraph, config: &Config) -> Self {
        let simplified = build_simplified_graph(graph, &config.simplified);

        let mut clusters = simplified.clusters.clone();
        clusters.sort_by(|a, b| b.len().cmp(&a.len()));

        Self {
            run,
            statistics: GraphStatistics::from_graph(graph),
            curated: ViewSize::of(&build_curated_graph(graph, &config.curated)),
            refined: ViewSize::of(&build_refined_graph(graph, &config.refined)),
            simplified: ViewSize::of(&simplified.graph),
            hub_count: simplified.hub_nodes.len(),
            clusters,
        }
    }
}

/// Writes the markdown report
///
/// # Arguments
///
/// * `report` - The report data
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote markdown summary
/// * `Err(OutputError)` - Failed to write summary
pub fn generate_markdown_summary(report: &SummaryReport, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_summary(report);

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(output_path, markdown)?;

    tracing::info!("Wrote summary to {}", output_path.display());
    Ok(())
}

/// Formats the report as markdown
pub fn format_markdown_summary(report: &SummaryReport) -> String {
    let mut md = String::new();
    // Writing into a String cannot fail
    let _ = write_report(&mut md, report);
    md
}

fn write_report(md: &mut String, report: &SummaryReport) -> std::fmt::Result {
    let run = &report.run;
    let stats = &report.statistics;

    writeln!(md, "# Campus Map Crawl Summary\n")?;

    writeln!(md, "## Run Information\n")?;
    writeln!(md, "- **Run ID**: {}", run.id)?;
    writeln!(md, "- **Start URL**: {}", run.start_url)?;
    writeln!(md, "- **Started**: {}", run.started_at)?;
    if let Some(finished) = &run.finished_at {
        writeln!(md, "- **Finished**: {}", finished)?;
    }
    writeln!(md, "- **Status**: {}", run.status.to_db_string())?;
    writeln!(md, "- **Config Hash**: {}\n", run.config_hash)?;

    writeln!(md, "## Graph Statistics\n")?;
    writeln!(md, "- **Pages**: {}", stats.node_count)?;
    writeln!(md, "- **Links**: {}", stats.edge_count)?;
    writeln!(md, "- **Self Loops**: {}", stats.self_loops)?;
    writeln!(md, "- **Average Out-degree**: {:.2}\n", stats.average_out_degree())?;

    writeln!(md, "| Out-degree | Pages |")?;
    writeln!(md, "|------------|-------|")?;
    writeln!(md, "| 0 | {} |", stats.out_degree.zero)?;
    writeln!(md, "| 1-10 | {} |", stats.out_degree.low)?;
    writeln!(md, "| 11-50 | {} |", stats.out_degree.medium)?;
    writeln!(md, "| 51+ | {} |", stats.out_degree.high)?;
    writeln!(md, "| max | {} |\n", stats.out_degree.max)?;

    if !stats.pages_per_depth.is_empty() {
        writeln!(md, "## Depth Breakdown\n")?;
        writeln!(md, "| Depth | Pages | Links to earlier | Same | Later | Unknown |")?;
        writeln!(md, "|-------|-------|------------------|------|-------|---------|")?;
        for (depth, pages) in &stats.pages_per_depth {
            let edges = stats.edges_by_depth.get(depth).cloned().unwrap_or_default();
            writeln!(
                md,
                "| {} | {} | {} | {} | {} | {} |",
                depth, pages, edges.earlier, edges.same, edges.later, edges.unknown
            )?;
        }
        writeln!(md)?;
    }

    if !stats.top_in_degree.is_empty() {
        writeln!(md, "## Most Linked Pages\n")?;
        writeln!(md, "| URL | Incoming Links |")?;
        writeln!(md, "|-----|----------------|")?;
        for (url, count) in &stats.top_in_degree {
            writeln!(md, "| {} | {} |", url, count)?;
        }
        writeln!(md)?;
    }

    writeln!(md, "## Derived Views\n")?;
    writeln!(md, "| View | Nodes | Edges |")?;
    writeln!(md, "|------|-------|-------|")?;
    writeln!(md, "| Full | {} | {} |", stats.node_count, stats.edge_count)?;
    for (name, size) in [
        ("Curated", report.curated),
        ("Refined", report.refined),
        ("Simplified", report.simplified),
    ] {
        writeln!(md, "| {} | {} | {} |", name, size.nodes, size.edges)?;
    }
    writeln!(md, "\nNavigation hubs removed in the simplified view: {}\n", report.hub_count)?;

    if !report.clusters.is_empty() {
        writeln!(md, "## Template Clusters\n")?;
        writeln!(md, "Total clusters: {}\n", report.clusters.len())?;
        writeln!(md, "| Members | Shared Targets | Example |")?;
        writeln!(md, "|---------|----------------|---------|")?;
        for cluster in report.clusters.iter().take(CLUSTERS_SHOWN) {
            writeln!(
                md,
                "| {} | {} | {} |",
                cluster.len(),
                cluster.signature.len(),
                cluster.members.first().map(String::as_str).unwrap_or("")
            )?;
        }
        writeln!(md)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::RunStatus;

    fn sample_run() -> RunRecord {
        RunRecord {
            id: 3,
            started_at: "2024-03-01T10:00:00Z".to_string(),
            finished_at: Some("2024-03-01T10:30:00Z".to_string()),
            config_hash: "abc123".to_string(),
            start_url: "https://www.example.edu".to_string(),
            status: RunStatus::Interrupted,
        }
    }

    fn sample_report() -> SummaryReport {
        let mut graph = SiteGraph::new();
        graph.add_node("https://www.example.edu", "Home", Some(0));
        graph.add_node("https://www.example.edu/a", "A", Some(1));
        graph.add_edge("https://www.example.edu", "https://www.example.edu/a");

        SummaryReport {
            run: sample_run(),
            statistics: GraphStatistics::from_graph(&graph),
            curated: ViewSize { nodes: 1, edges: 0 },
            refined: ViewSize { nodes: 2, edges: 1 },
            simplified: ViewSize { nodes: 2, edges: 1 },
            hub_count: 0,
            clusters: vec![TemplateCluster {
                signature: vec!["https://www.example.edu/a".to_string()],
                members: vec!["https://www.example.edu/x".to_string()],
            }],
        }
    }

    #[test]
    fn test_format_contains_sections() {
        let md = format_markdown_summary(&sample_report());

        assert!(md.starts_with("# Campus Map Crawl Summary"));
        assert!(md.contains("- **Status**: interrupted"));
        assert!(md.contains("| Refined | 2 | 1 |"));
        assert!(md.contains("| 1 | 1 | 0 | 0 | 0 | 0 |"));
        assert!(md.contains("## Template Clusters"));
    }

    #[test]
    fn test_generate_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("summary.md");

        generate_markdown_summary(&sample_report(), &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("https://www.example.edu"));
    }
}
