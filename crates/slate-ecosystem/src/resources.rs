//! The fixed catalog of documents that make up one day's ecosystem.

use serde::{Deserialize, Serialize};

/// Identifies one document in the ecosystem.
///
/// Serialized in camelCase; these names are the keys of `loadedFrom`,
/// `lastModified` and `errors` in a serialized bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResourceKey {
    Slate,
    Injuries,
    DepthCharts,
    StartingLineups,
    Rotations,
    Boxscores,
    Stats,
}

impl ResourceKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKey::Slate => "slate",
            ResourceKey::Injuries => "injuries",
            ResourceKey::DepthCharts => "depthCharts",
            ResourceKey::StartingLineups => "startingLineups",
            ResourceKey::Rotations => "rotations",
            ResourceKey::Boxscores => "boxscores",
            ResourceKey::Stats => "stats",
        }
    }

    /// Catalog entry for this key.
    pub fn spec(&self) -> &'static ResourceSpec {
        match self {
            ResourceKey::Slate => &SLATE,
            ResourceKey::Injuries => &INJURIES,
            ResourceKey::DepthCharts => &DEPTH_CHARTS,
            ResourceKey::StartingLineups => &STARTING_LINEUPS,
            ResourceKey::Rotations => &ROTATIONS,
            ResourceKey::Boxscores => &BOXSCORES,
            ResourceKey::Stats => &STATS,
        }
    }
}

impl std::fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static description of one published document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceSpec {
    pub key: ResourceKey,
    /// File name under the date directory, e.g. `injuries.json`.
    pub filename: &'static str,
    /// A required document fails the whole load when it cannot be fetched.
    pub required: bool,
    /// Whether a miss walks back to earlier dates.
    pub participates_in_lookback: bool,
    /// Skipped without a request when history is not requested.
    pub history_gated: bool,
}

impl ResourceSpec {
    pub fn name(&self) -> &'static str {
        self.key.as_str()
    }

    /// URL of this document for `date` under `base_url`.
    pub fn url(&self, base_url: &str, date: &str) -> String {
        resource_url(base_url, date, self.filename)
    }
}

pub const SLATE: ResourceSpec = ResourceSpec {
    key: ResourceKey::Slate,
    filename: "slate.json",
    required: true,
    participates_in_lookback: false,
    history_gated: false,
};

pub const INJURIES: ResourceSpec = ResourceSpec {
    key: ResourceKey::Injuries,
    filename: "injuries.json",
    required: false,
    participates_in_lookback: true,
    history_gated: false,
};

pub const DEPTH_CHARTS: ResourceSpec = ResourceSpec {
    key: ResourceKey::DepthCharts,
    filename: "nba_depth_charts.json",
    required: false,
    participates_in_lookback: true,
    history_gated: false,
};

pub const STARTING_LINEUPS: ResourceSpec = ResourceSpec {
    key: ResourceKey::StartingLineups,
    filename: "nba_starting_lineups.json",
    required: false,
    participates_in_lookback: true,
    history_gated: false,
};

pub const ROTATIONS: ResourceSpec = ResourceSpec {
    key: ResourceKey::Rotations,
    filename: "rotations.json",
    required: false,
    participates_in_lookback: true,
    history_gated: true,
};

pub const BOXSCORES: ResourceSpec = ResourceSpec {
    key: ResourceKey::Boxscores,
    filename: "boxscores.json",
    required: false,
    participates_in_lookback: true,
    history_gated: true,
};

pub const STATS: ResourceSpec = ResourceSpec {
    key: ResourceKey::Stats,
    filename: "stats.json",
    required: false,
    participates_in_lookback: true,
    history_gated: false,
};

/// Every document, required first.
pub static CATALOG: [ResourceSpec; 7] = [
    SLATE,
    INJURIES,
    DEPTH_CHARTS,
    STARTING_LINEUPS,
    ROTATIONS,
    BOXSCORES,
    STATS,
];

/// The required document.
pub fn required_resource() -> &'static ResourceSpec {
    &SLATE
}

/// Every optional document, in catalog order.
pub fn optional_resources() -> impl Iterator<Item = &'static ResourceSpec> {
    CATALOG.iter().filter(|spec| !spec.required)
}

/// `<base>/<date>/<filename>`, tolerating a trailing slash on `base_url`.
pub fn resource_url(base_url: &str, date: &str, filename: &str) -> String {
    format!("{}/{}/{}", base_url.trim_end_matches('/'), date, filename)
}
