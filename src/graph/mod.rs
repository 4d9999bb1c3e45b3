//! Site graph module
//!
//! This module holds the directed link graph accumulated by a crawl and its
//! export as a generated Rust module.

pub mod export;
mod site_graph;

pub use export::{render_module, write_module, ExportMeta};
pub use site_graph::{truncate_label, PageNode, SiteGraph, MAX_LABEL_CHARS};
