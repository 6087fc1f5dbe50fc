//! The ecosystem bundle and the aggregation that builds it.
//!
//! [`assemble_bundle`] merges the required outcome and every optional
//! [`ResolvedResource`] into one [`EcosystemBundle`]. It runs only after all
//! resolutions have settled and performs no I/O.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use slate_fetch::FetchOutcome;

use crate::freshness::latest_timestamp;
use crate::resolved::ResolvedResource;
use crate::resources::{optional_resources, required_resource, ResourceKey};

/// Resources whose dates feed `history.asOf`, in priority order.
const HISTORY_AS_OF_ORDER: [ResourceKey; 3] = [
    ResourceKey::Rotations,
    ResourceKey::Boxscores,
    ResourceKey::Stats,
];

/// Historical documents, grouped with the date they describe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryBundle {
    pub rotations: Option<Value>,
    pub boxscores: Option<Value>,
    pub stats: Option<Value>,
    pub as_of: String,
}

/// Resolved documents; every field is `None` when the load failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EcosystemData {
    pub slate: Option<Value>,
    pub injuries: Option<Value>,
    pub depth_charts: Option<Value>,
    pub starting_lineups: Option<Value>,
    pub history: HistoryBundle,
}

impl EcosystemData {
    fn empty(target_date: &str) -> Self {
        Self {
            slate: None,
            injuries: None,
            depth_charts: None,
            starting_lineups: None,
            history: HistoryBundle {
                rotations: None,
                boxscores: None,
                stats: None,
                as_of: target_date.to_string(),
            },
        }
    }

    /// Document for `key`, if resolved.
    pub fn get(&self, key: ResourceKey) -> Option<&Value> {
        match key {
            ResourceKey::Slate => self.slate.as_ref(),
            ResourceKey::Injuries => self.injuries.as_ref(),
            ResourceKey::DepthCharts => self.depth_charts.as_ref(),
            ResourceKey::StartingLineups => self.starting_lineups.as_ref(),
            ResourceKey::Rotations => self.history.rotations.as_ref(),
            ResourceKey::Boxscores => self.history.boxscores.as_ref(),
            ResourceKey::Stats => self.history.stats.as_ref(),
        }
    }
}

/// Per-resource `Last-Modified` values and the latest parseable one.
///
/// Serialized flat: `{ "slate": "...", "injuries": "...", "latest": ... }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LastModified {
    #[serde(flatten)]
    pub resources: BTreeMap<ResourceKey, String>,
    pub latest: Option<DateTime<Utc>>,
}

/// How usable a bundle is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BundleStatus {
    /// Slate and every enrichment resolved without error
    Ready,
    /// Slate resolved; some enrichment is missing (soft warning)
    Degraded,
    /// Slate missing; nothing usable
    Unavailable,
}

/// Everything known about one date's ecosystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EcosystemBundle {
    /// `true` iff the required slate was fetched successfully
    pub ok: bool,
    pub target_date: String,
    pub data: EcosystemData,
    /// URL each resource was served from, or last tried
    pub loaded_from: BTreeMap<ResourceKey, String>,
    pub last_modified: LastModified,
    /// Date each resource's data is from
    pub as_of: BTreeMap<ResourceKey, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub errors: BTreeMap<ResourceKey, String>,
}

impl EcosystemBundle {
    pub fn status(&self) -> BundleStatus {
        if !self.ok {
            BundleStatus::Unavailable
        } else if self.errors.is_empty() {
            BundleStatus::Ready
        } else {
            BundleStatus::Degraded
        }
    }

    /// Why the slate is missing, when it is.
    pub fn failure_message(&self) -> Option<&str> {
        if self.ok {
            None
        } else {
            self.errors.get(&ResourceKey::Slate).map(String::as_str)
        }
    }

    /// Enrichment errors of a usable bundle.
    pub fn warnings(&self) -> impl Iterator<Item = (ResourceKey, &str)> + '_ {
        self.errors
            .iter()
            .filter(move |_| self.ok)
            .map(|(key, message)| (*key, message.as_str()))
    }
}

/// Merge every settled outcome into a bundle.
///
/// `resolved` should hold one entry per optional resource; a missing entry is
/// reported as not attempted, with the target-date URL.
pub fn assemble_bundle(
    base_url: &str,
    target_date: &str,
    required: FetchOutcome,
    mut resolved: BTreeMap<ResourceKey, ResolvedResource>,
) -> EcosystemBundle {
    let slate = required_resource();

    let mut optional: BTreeMap<ResourceKey, ResolvedResource> = optional_resources()
        .map(|spec| {
            let resource = resolved
                .remove(&spec.key)
                .unwrap_or_else(|| ResolvedResource::skipped(spec.url(base_url, target_date)));
            (spec.key, resource)
        })
        .collect();

    let mut loaded_from = BTreeMap::from([(slate.key, slate.url(base_url, target_date))]);
    let mut last_modified = BTreeMap::new();
    let mut as_of = BTreeMap::new();

    for (key, resource) in &optional {
        loaded_from.insert(*key, resource.source_url.clone());
        if let Some(stamp) = &resource.last_modified {
            last_modified.insert(*key, stamp.clone());
        }
        if let Some(date) = &resource.as_of_date {
            as_of.insert(*key, date.clone());
        }
    }

    let (ok, data, errors) = match required {
        FetchOutcome::Success {
            data: slate_data,
            last_modified: slate_modified,
        } => {
            if let Some(stamp) = slate_modified {
                last_modified.insert(slate.key, stamp);
            }
            as_of.insert(slate.key, target_date.to_string());

            let errors: BTreeMap<ResourceKey, String> = optional
                .iter()
                .filter_map(|(key, r)| r.error.clone().map(|e| (*key, e)))
                .collect();

            let history_as_of = HISTORY_AS_OF_ORDER
                .iter()
                .filter_map(|key| optional.get(key).and_then(|r| r.as_of_date.as_deref()))
                .find(|date| !date.is_empty())
                .unwrap_or(target_date)
                .to_string();

            let mut take = |key: ResourceKey| optional.remove(&key).and_then(|r| r.data);
            let data = EcosystemData {
                slate: Some(slate_data),
                injuries: take(ResourceKey::Injuries),
                depth_charts: take(ResourceKey::DepthCharts),
                starting_lineups: take(ResourceKey::StartingLineups),
                history: HistoryBundle {
                    rotations: take(ResourceKey::Rotations),
                    boxscores: take(ResourceKey::Boxscores),
                    stats: take(ResourceKey::Stats),
                    as_of: history_as_of,
                },
            };
            (true, data, errors)
        }
        failure => {
            let message = failure
                .failure_message()
                .unwrap_or_else(|| "slate unavailable".to_string());
            let errors = BTreeMap::from([(slate.key, message)]);
            (false, EcosystemData::empty(target_date), errors)
        }
    };

    let latest = latest_timestamp(last_modified.values().map(String::as_str));

    EcosystemBundle {
        ok,
        target_date: target_date.to_string(),
        data,
        loaded_from,
        last_modified: LastModified {
            resources: last_modified,
            latest,
        },
        as_of,
        errors,
    }
}
