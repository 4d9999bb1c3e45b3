//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use campus_mapper::config::{
    Config, CrawlMode, CrawlerConfig, OutputConfig, SiteConfig, UserAgentConfig,
};
use campus_mapper::crawler::{Coordinator, ProgressCallback};
use campus_mapper::graph::{render_module, write_module, ExportMeta};
use campus_mapper::refine::{CurateRules, RefineRules, SimplifyRules};
use campus_mapper::storage::{RunStatus, SqliteStorage, Storage};
use chrono::Utc;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration for the given mock server
fn create_test_config(base_url: &str, mode: CrawlMode, max_depth: u32) -> Config {
    Config {
        crawler: CrawlerConfig {
            start_url: base_url.to_string(),
            max_depth,
            request_delay: 0,
            workers: 3,
            mode,
            request_timeout: 5,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        site: SiteConfig::default(),
        output: OutputConfig {
            database_path: "./test.db".to_string(),
            module_path: "./site_graph_data.rs".to_string(),
            summary_path: "./test_summary.md".to_string(),
        },
        curated: CurateRules::default(),
        refined: RefineRules::default(),
        simplified: SimplifyRules::default(),
    }
}

async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body.to_string())
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

async fn mount_page_once(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body.to_string()))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_seed_with_nav_and_body_link() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        r#"<html><head><title>Home | CSU Chico</title></head><body>
            <nav><a href="/a">Section A</a></nav>
            <main><a href="/b">Page B</a></main>
        </body></html>"#,
    )
    .await;
    mount_page(&server, "/a", "<html><head><title>A</title></head></html>").await;
    mount_page(&server, "/b", "<html><body><h1>B heading</h1></body></html>").await;

    let config = create_test_config(&base, CrawlMode::Concurrent, 1);
    let outcome = Coordinator::new(config).unwrap().run().await.unwrap();

    let home = format!("{}/", base);
    let a = format!("{}/a", base);
    let b = format!("{}/b", base);
    let graph = &outcome.graph;

    assert_eq!(outcome.status, RunStatus::Completed);
    assert_eq!(graph.node_count(), 3);
    assert_eq!(graph.edge_count(), 2);
    assert!(graph.contains_edge(&home, &a));
    assert!(graph.contains_edge(&home, &b));

    assert_eq!(graph.node(&home).unwrap().depth, Some(0));
    assert_eq!(graph.node(&a).unwrap().depth, Some(1));
    assert_eq!(graph.node(&b).unwrap().depth, Some(1));

    assert_eq!(graph.label(&home), Some("Home"));
    assert_eq!(graph.label(&b), Some("B heading"));

    assert_eq!(outcome.nav_footer.len(), 1);
    assert!(outcome.nav_footer.contains(&a));
}

#[tokio::test]
async fn test_depth_limit_stops_fetching() {
    let server = MockServer::start().await;

    mount_page(&server, "/", r#"<a href="/one">One</a>"#).await;
    mount_page(&server, "/one", r#"<a href="/two">Two</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/two"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    for mode in [CrawlMode::Sequential, CrawlMode::Concurrent] {
        let config = create_test_config(&server.uri(), mode, 1);
        let outcome = Coordinator::new(config).unwrap().run().await.unwrap();

        assert_eq!(outcome.graph.node_count(), 2, "mode {:?}", mode);
        assert_eq!(outcome.stats.depth_exceeded, 1, "mode {:?}", mode);
        assert_eq!(outcome.stats.pages_per_depth.get(&1), Some(&1));
    }
}

#[tokio::test]
async fn test_each_url_fetched_once() {
    let server = MockServer::start().await;
    let links = r#"<a href="/">Home</a><a href="/a">A</a><a href="/b">B</a><a href="/a/">A again</a>"#;

    mount_page_once(&server, "/", links).await;
    mount_page_once(&server, "/a", links).await;
    mount_page_once(&server, "/b", links).await;

    let config = create_test_config(&server.uri(), CrawlMode::Concurrent, 3);
    let outcome = Coordinator::new(config).unwrap().run().await.unwrap();

    let home = format!("{}/", server.uri());
    let a = format!("{}/a", server.uri());
    assert_eq!(outcome.graph.node_count(), 3);
    // Every page links back to the seed, which is already a node
    assert!(outcome.graph.contains_edge(&a, &home));
    assert_eq!(outcome.stats.pages_recorded(), 3);
}

#[tokio::test]
async fn test_redirect_records_final_url() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", r#"<a href="/moved">Moved</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/moved"))
        .respond_with(
            ResponseTemplate::new(301)
                .insert_header("Location", format!("{}/new", base).as_str()),
        )
        .mount(&server)
        .await;
    mount_page(&server, "/new", "<title>New home</title>").await;

    let config = create_test_config(&base, CrawlMode::Sequential, 2);
    let outcome = Coordinator::new(config).unwrap().run().await.unwrap();

    let home = format!("{}/", base);
    let new = format!("{}/new", base);
    assert_eq!(outcome.graph.node_count(), 2);
    assert!(outcome.graph.contains_edge(&home, &new));
    assert!(!outcome.graph.contains_node(&format!("{}/moved", base)));
    assert_eq!(outcome.graph.label(&new), Some("New home"));
}

#[tokio::test]
async fn test_off_site_and_skipped_links_are_ignored() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        r#"<a href="https://other.example.org/x">Other</a>
           <a href="mailto:someone@example.edu">Mail</a>
           <a href="/catalog.pdf">Catalog</a>"#,
    )
    .await;

    let config = create_test_config(&server.uri(), CrawlMode::Concurrent, 2);
    let outcome = Coordinator::new(config).unwrap().run().await.unwrap();

    assert_eq!(outcome.graph.node_count(), 1);
    assert_eq!(outcome.graph.edge_count(), 0);
    assert_eq!(outcome.stats.links_discovered(), 0);
}

#[tokio::test]
async fn test_anchor_label_for_unfetched_page() {
    let server = MockServer::start().await;
    mount_page(&server, "/", r#"<a href="/later">Admissions Office</a>"#).await;

    let config = create_test_config(&server.uri(), CrawlMode::Concurrent, 0);
    let coordinator = Coordinator::new(config).unwrap();
    let session = coordinator.session();
    let outcome = coordinator.run().await.unwrap();

    let later = format!("{}/later", server.uri());
    assert!(!outcome.graph.contains_node(&later));
    assert_eq!(session.label_for(&later), Some("Admissions Office".to_string()));
}

#[tokio::test]
async fn test_tree_edges_follow_bfs_depth() {
    let server = MockServer::start().await;

    let seed_links: String = (1..=5)
        .map(|i| format!(r#"<a href="/p{}">P{}</a>"#, i, i))
        .collect();
    mount_page(&server, "/", &seed_links).await;
    for i in 1..=5 {
        mount_page(&server, &format!("/p{}", i), r#"<a href="/leaf">Leaf</a>"#).await;
    }
    mount_page(&server, "/leaf", "<title>Leaf</title>").await;

    let config = create_test_config(&server.uri(), CrawlMode::Concurrent, 3);
    let outcome = Coordinator::new(config).unwrap().run().await.unwrap();
    let graph = &outcome.graph;

    assert_eq!(graph.node_count(), 7);
    assert_eq!(graph.node(&format!("{}/leaf", server.uri())).unwrap().depth, Some(2));

    // Every non-seed page has a predecessor exactly one level shallower
    for node in graph.nodes() {
        let depth = node.depth.unwrap();
        if depth == 0 {
            continue;
        }
        assert!(graph
            .predecessors(&node.url)
            .any(|p| graph.node(p).and_then(|n| n.depth) == Some(depth - 1)));
    }
}

#[tokio::test]
async fn test_interrupted_crawl_exports_partial_graph() {
    let server = MockServer::start().await;
    let base = server.uri();

    let seed_links: String = (1..=5)
        .map(|i| format!(r#"<a href="/p{}">P{}</a>"#, i, i))
        .collect();
    mount_page(&server, "/", &seed_links).await;
    for i in 1..=5 {
        mount_page(&server, &format!("/p{}", i), "<title>Leaf</title>").await;
    }

    let config = create_test_config(&base, CrawlMode::Sequential, 2);
    let coordinator = Coordinator::new(config).unwrap();
    let shutdown = coordinator.shutdown_handle();
    let callback: ProgressCallback = Arc::new(move |recorded, _url| {
        if recorded >= 2 {
            shutdown.store(true, Ordering::SeqCst);
        }
    });

    let outcome = coordinator
        .with_progress_callback(callback)
        .run()
        .await
        .unwrap();

    let home = format!("{}/", base);
    let p1 = format!("{}/p1", base);
    assert!(outcome.is_interrupted());
    assert_eq!(outcome.graph.node_count(), 2);
    assert_eq!(outcome.graph.edge_count(), 1);
    assert!(outcome.graph.contains_edge(&home, &p1));
    assert_eq!(outcome.stats.cancelled, 4);

    let dir = tempfile::tempdir().unwrap();
    let module_path = dir.path().join("site_graph_data.rs");
    let meta = ExportMeta {
        start_url: outcome.start_url.clone(),
        generated_at: outcome.finished_at,
        interrupted: outcome.is_interrupted(),
    };
    write_module(&module_path, &outcome.graph, &meta).unwrap();

    let src = std::fs::read_to_string(&module_path).unwrap();
    assert_eq!(src, render_module(&outcome.graph, &meta));
    assert!(src.contains("partial graph"));
    assert!(src.contains(&format!("{:?}", p1)));
    assert!(!src.contains(&format!("{}/p2", base)));
}

#[tokio::test]
async fn test_crawl_graph_survives_storage_round_trip() {
    let server = MockServer::start().await;

    mount_page(&server, "/", r#"<title>Root</title><a href="/a">A</a><a href="/b">B</a>"#).await;
    mount_page(&server, "/a", r#"<title>A</title><a href="/b">B</a>"#).await;
    mount_page(&server, "/b", r#"<title>B</title><a href="/a">A</a>"#).await;

    let config = create_test_config(&server.uri(), CrawlMode::Sequential, 2);
    let outcome = Coordinator::new(config).unwrap().run().await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    let mut storage = SqliteStorage::new(&dir.path().join("graph.db")).unwrap();
    let run_id = storage.create_run("hash", &outcome.start_url, Utc::now()).unwrap();
    storage.save_graph(run_id, &outcome.graph).unwrap();
    storage.finish_run(run_id, outcome.status).unwrap();

    let loaded = storage.load_graph(run_id).unwrap();
    assert_eq!(loaded.node_count(), outcome.graph.node_count());
    assert_eq!(loaded.edge_count(), outcome.graph.edge_count());
    assert_eq!(
        loaded.urls().collect::<Vec<_>>(),
        outcome.graph.urls().collect::<Vec<_>>()
    );

    let run = storage.get_run(run_id).unwrap();
    assert_eq!(run.status, RunStatus::Completed);
    assert_eq!(storage.depth_breakdown(run_id).unwrap().get(&1), Some(&2));
}
