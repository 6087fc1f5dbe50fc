//! Ecosystem orchestration: one concurrent round of resolution per load.
//!
//! The required slate is fetched once at the target date with no fallback.
//! Every optional document runs its own date walk. All of them run side by
//! side on a [`JoinSet`] and the bundle is assembled only after every task
//! has settled; no failure cancels a sibling, because even a failed load
//! reports what the optional resolutions found.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Instant;

use slate_fetch::{DocumentFetcher, FetchError, FetchOutcome, HttpFetcher};
use tokio::task::{self, JoinSet};
use tracing::Instrument;

use crate::bundle::{assemble_bundle, EcosystemBundle};
use crate::config::LoaderConfig;
use crate::error::LoaderResult;
use crate::fallback::resolve_spec;
use crate::obs;
use crate::resolved::ResolvedResource;
use crate::resources::{optional_resources, required_resource, ResourceKey};

/// What to load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    /// `YYYY-MM-DD`
    pub target_date: String,
    /// When `false`, rotations and boxscores are skipped without a request.
    pub include_history: bool,
}

impl LoadRequest {
    pub fn new(target_date: impl Into<String>) -> Self {
        Self {
            target_date: target_date.into(),
            include_history: true,
        }
    }

    pub fn with_history(mut self, include_history: bool) -> Self {
        self.include_history = include_history;
        self
    }
}

/// Loader bound to one fetcher and configuration.
#[derive(Clone)]
pub struct EcosystemLoader {
    fetcher: Arc<dyn DocumentFetcher>,
    config: LoaderConfig,
}

impl std::fmt::Debug for EcosystemLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EcosystemLoader")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl EcosystemLoader {
    /// HTTP-backed loader for `config`.
    pub fn new(config: LoaderConfig) -> LoaderResult<Self> {
        config.validate()?;
        let fetcher = HttpFetcher::new(config.request_timeout, &config.user_agent)?;
        Ok(Self {
            fetcher: Arc::new(fetcher),
            config,
        })
    }

    /// Loader over any fetcher, e.g. a scripted fake.
    pub fn with_fetcher(fetcher: Arc<dyn DocumentFetcher>, config: LoaderConfig) -> Self {
        Self { fetcher, config }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub async fn load(&self, request: &LoadRequest) -> EcosystemBundle {
        load_ecosystem(Arc::clone(&self.fetcher), &self.config, request).await
    }
}

/// What one spawned task settled to.
enum Settled {
    Required(FetchOutcome),
    Optional(ResourceKey, ResolvedResource),
}

/// Load the ecosystem for `request.target_date`.
///
/// Never fails: the verdict is `EcosystemBundle::ok`, and every per-resource
/// problem is recorded in the bundle. Runs inside one `slate.load` span.
pub async fn load_ecosystem(
    fetcher: Arc<dyn DocumentFetcher>,
    config: &LoaderConfig,
    request: &LoadRequest,
) -> EcosystemBundle {
    let load_id = obs::new_load_id();
    let span = obs::load_span(&load_id, &request.target_date);
    run_load(fetcher, config, request).instrument(span).await
}

async fn run_load(
    fetcher: Arc<dyn DocumentFetcher>,
    config: &LoaderConfig,
    request: &LoadRequest,
) -> EcosystemBundle {
    let started = Instant::now();
    let base_url = config.base_url.as_str();
    let target_date = request.target_date.as_str();
    obs::emit_load_started(target_date, request.include_history, config.max_lookback_days);

    let mut tasks: JoinSet<Settled> = JoinSet::new();
    let mut resolved: BTreeMap<ResourceKey, ResolvedResource> = BTreeMap::new();
    // Task id -> resource, drained as tasks report back.
    let mut pending: HashMap<task::Id, ResourceKey> = HashMap::new();

    let slate = required_resource();
    {
        let fetcher = Arc::clone(&fetcher);
        let url = slate.url(base_url, target_date);
        let handle = tasks.spawn(
            async move { Settled::Required(fetcher.fetch_raw(&url).await) }.in_current_span(),
        );
        pending.insert(handle.id(), slate.key);
    }

    for spec in optional_resources() {
        if spec.history_gated && !request.include_history {
            obs::emit_resource_skipped(spec.name(), "history not requested");
            resolved.insert(
                spec.key,
                ResolvedResource::skipped(spec.url(base_url, target_date)),
            );
            continue;
        }

        let fetcher = Arc::clone(&fetcher);
        let base_url = base_url.to_string();
        let target_date = target_date.to_string();
        let max_lookback_days = config.max_lookback_days;
        let handle = tasks.spawn(
            async move {
                let resource = resolve_spec(
                    fetcher.as_ref(),
                    &base_url,
                    &target_date,
                    spec,
                    max_lookback_days,
                )
                .await;
                Settled::Optional(spec.key, resource)
            }
            .in_current_span(),
        );
        pending.insert(handle.id(), spec.key);
    }

    let mut required: Option<FetchOutcome> = None;

    while let Some(joined) = tasks.join_next_with_id().await {
        match joined {
            Ok((id, Settled::Required(outcome))) => {
                pending.remove(&id);
                required = Some(outcome);
            }
            Ok((id, Settled::Optional(key, resource))) => {
                pending.remove(&id);
                obs::emit_resource_resolved(
                    key.as_str(),
                    resource.as_of_date.as_deref(),
                    resource.is_available(),
                );
                resolved.insert(key, resource);
            }
            Err(e) => {
                let Some(key) = pending.remove(&e.id()) else {
                    tracing::error!(error = %e, "unknown resolution task did not complete");
                    continue;
                };
                tracing::error!(resource = %key, error = %e, "resolution task did not complete");
                let message = format!("resolution task failed: {e}");
                if key == slate.key {
                    required = Some(FetchOutcome::TransientError(FetchError::transport(message)));
                } else {
                    resolved.insert(
                        key,
                        ResolvedResource::failed(
                            target_date,
                            key.spec().url(base_url, target_date),
                            message,
                        ),
                    );
                }
            }
        }
    }

    let required = required.unwrap_or_else(|| {
        FetchOutcome::TransientError(FetchError::transport("resolution task failed"))
    });

    if let Some(message) = required.failure_message() {
        obs::emit_required_failed(slate.name(), &message);
    }

    let bundle = assemble_bundle(base_url, target_date, required, resolved);

    obs::emit_load_finished(
        target_date,
        bundle.ok,
        bundle.errors.len(),
        started.elapsed().as_millis() as u64,
    );
    bundle
}
