//! Integration tests for the derived graph views
//!
//! These tests build a small synthetic campus graph and run it through the
//! curated, refined and simplified builders with default and TOML-configured
//! rule tables.

use campus_mapper::graph::SiteGraph;
use campus_mapper::refine::{
    build_curated_graph, build_refined_graph, build_simplified_graph, CurateRules, RefineRules,
    SimplifyRules,
};

const HOME: &str = "https://www.csuchico.edu/";
const CS: &str = "https://www.csuchico.edu/academics/college/engineering/departments/computer-science";
const CS_FACULTY: &str =
    "https://www.csuchico.edu/academics/college/engineering/departments/computer-science/faculty";
const NURSING: &str = "https://www.csuchico.edu/nurs";
const ADMISSIONS: &str = "https://www.csuchico.edu/admissions";
const CONTACT: &str = "https://www.csuchico.edu/contact";
const NEWS: &str = "https://www.csuchico.edu/news/index.shtml";
const SEARCH: &str = "https://www.csuchico.edu/search?q=nursing";

/// Twelve department pages sharing the same footer, plus a few real sections
fn campus_graph() -> SiteGraph {
    let mut g = SiteGraph::new();
    g.add_node(HOME, "CSU Chico Home", Some(0));
    g.add_node(CS, "Computer Science", Some(1));
    g.add_node(NURSING, "School of Nursing", Some(1));
    g.add_node(ADMISSIONS, "Admissions", Some(1));
    g.add_node(CONTACT, "Contact Us", Some(1));
    g.add_node(NEWS, "News", Some(1));
    g.add_node(CS_FACULTY, "CS Faculty", Some(2));

    g.add_edge(HOME, CS);
    g.add_edge(HOME, NURSING);
    g.add_edge(HOME, ADMISSIONS);
    g.add_edge(HOME, SEARCH);
    g.add_edge(CS, CS_FACULTY);
    g.add_edge(CS_FACULTY, CS);
    g.add_edge(NURSING, ADMISSIONS);
    g.add_edge(ADMISSIONS, HOME);

    for i in 0..12 {
        let page = format!("https://www.csuchico.edu/dept/{}", i);
        g.add_node(&page, &format!("Department {}", i), Some(2));
        g.add_edge(HOME, &page);
        g.add_edge(&page, CONTACT);
        g.add_edge(&page, NEWS);
    }
    g
}

#[test]
fn test_views_do_not_modify_input() {
    let graph = campus_graph();
    let nodes = graph.node_count();
    let edges = graph.edge_count();

    let _ = build_curated_graph(&graph, &CurateRules::default());
    let _ = build_refined_graph(&graph, &RefineRules::default());
    let _ = build_simplified_graph(&graph, &SimplifyRules::default());

    assert_eq!(graph.node_count(), nodes);
    assert_eq!(graph.edge_count(), edges);
}

#[test]
fn test_curated_keeps_only_allowed_subtrees() {
    let graph = campus_graph();
    let curated = build_curated_graph(&graph, &CurateRules::default());

    assert!(curated.contains_node(CS));
    assert!(curated.contains_node(CS_FACULTY));
    assert!(curated.contains_node(NURSING));
    assert!(curated.contains_node(ADMISSIONS));

    for url in [HOME, CONTACT, NEWS, SEARCH] {
        assert!(!curated.contains_node(url), "{} should be excluded", url);
    }
    assert!(curated.urls().all(|u| !u.contains("/dept/")));

    // Only edges between kept nodes survive
    assert_eq!(curated.edge_count(), 3);
    assert!(curated.contains_edge(NURSING, ADMISSIONS));
}

#[test]
fn test_refined_drops_hub_query_and_ancestor_edges() {
    let graph = campus_graph();
    let refined = build_refined_graph(&graph, &RefineRules::default());

    assert_eq!(refined.node_count(), graph.node_count());

    // Ancestor edges
    assert!(!refined.contains_edge(CS_FACULTY, CS));
    assert!(!refined.contains_edge(ADMISSIONS, HOME));
    // Query target
    assert!(!refined.contains_edge(HOME, SEARCH));
    // Nav hubs by prefix and keyword
    assert!(refined.predecessors(CONTACT).next().is_none());
    assert!(refined.predecessors(NEWS).next().is_none());

    assert!(refined.contains_edge(HOME, CS));
    assert!(refined.contains_edge(CS, CS_FACULTY));
    assert!(refined.contains_edge(NURSING, ADMISSIONS));
}

#[test]
fn test_simplified_finds_footer_template() {
    let graph = campus_graph();
    let rules = SimplifyRules {
        hub_threshold: 1000,
        min_cluster_size: 5,
        extra_hubs: Vec::new(),
    };
    let simplified = build_simplified_graph(&graph, &rules);

    assert!(simplified.hub_nodes.is_empty());
    assert_eq!(simplified.clusters.len(), 1);

    let cluster = &simplified.clusters[0];
    assert_eq!(cluster.len(), 12);
    assert_eq!(cluster.signature, vec![CONTACT.to_string(), NEWS.to_string()]);
    assert!(simplified.cluster_of("https://www.csuchico.edu/dept/3").is_some());
    assert!(simplified.cluster_of(HOME).is_none());
}

#[test]
fn test_simplified_hub_pruning_is_asymmetric() {
    let mut graph = campus_graph();
    let orphan = "https://www.csuchico.edu/orphan";
    graph.add_node(orphan, "Orphan", Some(3));
    graph.add_edge(orphan, CONTACT);

    let rules = SimplifyRules {
        hub_threshold: 10,
        min_cluster_size: 5,
        extra_hubs: vec![SEARCH.to_string()],
    };
    let simplified = build_simplified_graph(&graph, &rules);
    let pruned = &simplified.graph;

    // CONTACT has in-degree 13 and NEWS 12; HOME has 1
    assert!(simplified.hub_nodes.contains(CONTACT));
    assert!(simplified.hub_nodes.contains(NEWS));
    assert!(simplified.hub_nodes.contains(SEARCH));

    // Hubs left without edges are removed
    assert!(!pruned.contains_node(CONTACT));
    assert!(!pruned.contains_node(NEWS));
    assert!(!pruned.contains_node(SEARCH));

    // Non-hubs stay even with no edges left
    assert!(pruned.contains_node(orphan));
    assert_eq!(pruned.degree(orphan), 0);

    let dept = "https://www.csuchico.edu/dept/0";
    assert_eq!(pruned.out_degree(dept), 0);
    assert!(pruned.contains_edge(HOME, dept));

    // No remaining template: the departments now have empty signatures
    assert!(simplified.clusters.is_empty());
}

#[test]
fn test_rules_from_toml_override_defaults() {
    let curated: CurateRules = toml::from_str(
        r#"
allow-prefixes = ["/dept/"]
deny-prefixes = []
"#,
    )
    .unwrap();
    let refined: RefineRules = toml::from_str("drop-isolated = true").unwrap();

    let graph = campus_graph();

    let view = build_curated_graph(&graph, &curated);
    assert!(view.is_empty(), "department pages never link to each other");

    let view = build_refined_graph(&graph, &refined);
    assert!(!view.contains_node(CONTACT));
    assert!(!view.contains_node(SEARCH));
    assert!(view.contains_node(HOME));
}
