use crate::graph::SiteGraph;
use std::collections::HashMap;

/// Pages sharing exactly the same set of outgoing links
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateCluster {
    /// Sorted successor URLs shared by every member
    pub signature: Vec<String>,

    /// Member URLs in graph insertion order
    pub members: Vec<String>,
}

impl TemplateCluster {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Groups nodes by their sorted successor list
///
/// Only groups with a non-empty signature and at least `min_size` members are
/// returned, ordered by the position of their first member.
pub fn find_template_clusters(graph: &SiteGraph, min_size: usize) -> Vec<TemplateCluster> {
    let mut order: Vec<Vec<String>> = Vec::new();
    let mut groups: HashMap<Vec<String>, Vec<String>> = HashMap::new();

    for url in graph.urls() {
        let signature: Vec<String> = graph.successors(url).map(str::to_string).collect();
        if signature.is_empty() {
            continue;
        }
        let members = groups.entry(signature.clone()).or_insert_with(|| {
            order.push(signature);
            Vec::new()
        });
        members.push(url.to_string());
    }

    order
        .into_iter()
        .filter_map(|signature| {
            let members = groups.remove(&signature)?;
            (members.len() >= min_size).then_some(TemplateCluster { signature, members })
        })
        .collect()
}
