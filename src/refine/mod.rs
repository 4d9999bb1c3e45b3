//! Graph refinement module
//!
//! Pure transforms from a crawled [`SiteGraph`](crate::graph::SiteGraph) to
//! derived views. None of them mutate their input.

mod ancestry;
mod clusters;
mod curate;
mod hubs;
mod paths;
mod rules;
mod views;

pub use ancestry::{drop_ancestor_edges, is_ancestor_edge};
pub use clusters::{find_template_clusters, TemplateCluster};
pub use curate::curate;
pub use hubs::{detect_hubs, hubs_by_in_degree, prune_hub_edges};
pub use paths::{curation_path, is_ancestor, section_path};
pub use rules::{CurateRules, HubRules, RefineRules, SimplifyRules};
pub use views::{build_curated_graph, build_refined_graph, build_simplified_graph, SimplifiedGraph};
