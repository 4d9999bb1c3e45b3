//! Rule tables for the derived graph views
//!
//! Every table deserializes from its own TOML section (`[curated]`, `[refined]`,
//! `[simplified]`) and falls back to the defaults below for missing keys.

use serde::Deserialize;

const NAV_KEYWORDS: &[&str] = &[
    "contact",
    "land acknowledgement",
    "give to chico state",
    "social media",
    "emergency alerts",
    "privacy policy",
];

const NAV_PREFIXES: &[&str] = &[
    "/contact",
    "/give",
    "/land-acknowledgement",
    "/maps",
    "/social-media",
    "/news",
    "/emergency",
    "/pres/",
];

const CURATE_DENY_PREFIXES: &[&str] = &[
    "/contact",
    "/land-acknowledgement",
    "/give",
    "/news",
    "/pres/",
    "/vpbf",
    "/advancement",
    "/emergency",
    "/maps",
    "/social-media",
    "/search",
];

const CURATE_ALLOW_PREFIXES: &[&str] = &[
    "/academics/college/engineering/departments/computer-science",
    "/academics/majors-programs/computer-science",
    "/academics/college/engineering/resources",
    "/academics/college/engineering/index.shtml",
    "/academics/college/engineering/departments/index.shtml",
    "/nurs",
    "/rcnp",
    "/academics/majors-programs/nursing",
    "/academics/college/communication-education/departments/kinesiology",
    "/academics/majors-programs/kinesiology",
    "/admissions",
    "/apply",
    "/cost-aid",
];

const CURATE_LABEL_KEYWORDS: &[&str] = &["contact", "land acknowledgement"];

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Navigation-hub classification
///
/// A node is a hub if its in-degree reaches `threshold`, its path starts with
/// one of `nav_prefixes`, or its label contains one of `nav_keywords`.
#[derive(Debug, Clone, PartialEq)]
pub struct HubRules {
    pub threshold: usize,
    pub nav_keywords: Vec<String>,
    pub nav_prefixes: Vec<String>,
}

impl HubRules {
    /// Threshold-only rules with no prefix or keyword matching
    pub fn in_degree_only(threshold: usize) -> Self {
        Self {
            threshold,
            nav_keywords: Vec::new(),
            nav_prefixes: Vec::new(),
        }
    }
}

impl Default for HubRules {
    fn default() -> Self {
        RefineRules::default().hub_rules()
    }
}

/// Rules for the curated (academic subtree) view
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CurateRules {
    /// Path prefixes a node must start with to be kept
    pub allow_prefixes: Vec<String>,

    /// Path prefixes that exclude a node outright
    pub deny_prefixes: Vec<String>,

    /// Nodes with in-degree at or above this are treated as navigation
    pub hub_threshold: usize,

    /// Lowercase label fragments that exclude a node
    pub exclude_label_keywords: Vec<String>,
}

impl Default for CurateRules {
    fn default() -> Self {
        Self {
            allow_prefixes: to_strings(CURATE_ALLOW_PREFIXES),
            deny_prefixes: to_strings(CURATE_DENY_PREFIXES),
            hub_threshold: 800,
            exclude_label_keywords: to_strings(CURATE_LABEL_KEYWORDS),
        }
    }
}

/// Rules for the refined (forward navigation) view
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct RefineRules {
    pub hub_threshold: usize,
    pub nav_keywords: Vec<String>,
    pub nav_prefixes: Vec<String>,

    /// Remove nodes left without any edge after filtering
    pub drop_isolated: bool,
}

impl RefineRules {
    pub fn hub_rules(&self) -> HubRules {
        HubRules {
            threshold: self.hub_threshold,
            nav_keywords: self.nav_keywords.clone(),
            nav_prefixes: self.nav_prefixes.clone(),
        }
    }
}

impl Default for RefineRules {
    fn default() -> Self {
        Self {
            hub_threshold: 500,
            nav_keywords: to_strings(NAV_KEYWORDS),
            nav_prefixes: to_strings(NAV_PREFIXES),
            drop_isolated: false,
        }
    }
}

/// Rules for the simplified (hub-pruned) view
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SimplifyRules {
    pub hub_threshold: usize,

    /// Smallest template cluster worth reporting
    pub min_cluster_size: usize,

    /// URLs treated as hubs regardless of in-degree
    pub extra_hubs: Vec<String>,
}

impl Default for SimplifyRules {
    fn default() -> Self {
        Self {
            hub_threshold: 1000,
            min_cluster_size: 5,
            extra_hubs: Vec::new(),
        }
    }
}
