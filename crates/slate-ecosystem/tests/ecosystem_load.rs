//! End-to-end load scenarios against a scripted origin.
//!
//! Each test scripts which `<date>/<file>` URLs exist and checks the bundle
//! the loader assembles: verdict, data placement, fallback dates, error
//! reporting, freshness and concurrency.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde_json::json;
use slate_ecosystem::{
    load_ecosystem, BundleStatus, DocumentFetcher, EcosystemLoader, FetchError, FetchOutcome,
    LoadRequest, LoaderConfig, ResourceKey,
};
use slate_fetch::fakes::ScriptedFetcher;

const BASE: &str = "https://slates.test/nba";
const DATE: &str = "2024-10-15";

fn url(key: ResourceKey, date: &str) -> String {
    key.spec().url(BASE, date)
}

fn config(max_lookback_days: u32) -> LoaderConfig {
    LoaderConfig::new(BASE).with_max_lookback_days(max_lookback_days)
}

fn slate_doc() -> serde_json::Value {
    json!({"date": DATE, "games": [{"home": "DEN", "away": "LAL"}], "proj": null})
}

#[tokio::test]
async fn full_ecosystem_on_target_date() {
    let mut fetcher = ScriptedFetcher::new().with_document_modified(
        url(ResourceKey::Slate, DATE),
        slate_doc(),
        "Tue, 15 Oct 2024 15:00:00 GMT",
    );
    for spec in slate_ecosystem::resources::optional_resources() {
        fetcher = fetcher.with_document(url(spec.key, DATE), json!({ "kind": spec.name() }));
    }
    let loader = EcosystemLoader::with_fetcher(Arc::new(fetcher), config(30));

    let bundle = loader.load(&LoadRequest::new(DATE)).await;

    assert!(bundle.ok);
    assert_eq!(bundle.status(), BundleStatus::Ready);
    assert_eq!(bundle.data.slate, Some(slate_doc()));
    assert_eq!(bundle.data.injuries, Some(json!({"kind": "injuries"})));
    assert_eq!(
        bundle.data.starting_lineups,
        Some(json!({"kind": "startingLineups"}))
    );
    assert_eq!(
        bundle.data.history.boxscores,
        Some(json!({"kind": "boxscores"}))
    );
    assert_eq!(bundle.data.history.as_of, DATE);
    assert!(bundle.errors.is_empty());
    for (key, source) in &bundle.loaded_from {
        assert_eq!(source, &url(*key, DATE));
    }
    assert_eq!(
        bundle.last_modified.latest,
        Some(Utc.with_ymd_and_hms(2024, 10, 15, 15, 0, 0).unwrap())
    );
}

#[tokio::test]
async fn required_not_found_is_fatal_but_keeps_optional_diagnostics() {
    let fetcher = Arc::new(
        ScriptedFetcher::new()
            .with_document_modified(
                url(ResourceKey::Injuries, "2024-10-13"),
                json!({"out": []}),
                "Sun, 13 Oct 2024 21:00:00 GMT",
            )
            .with_document(url(ResourceKey::Stats, DATE), json!({"rows": 10})),
    );
    let loader = EcosystemLoader::with_fetcher(fetcher.clone(), config(30));

    let bundle = loader.load(&LoadRequest::new(DATE)).await;

    assert!(!bundle.ok);
    assert_eq!(bundle.status(), BundleStatus::Unavailable);
    assert_eq!(bundle.failure_message(), Some("HTTP 404"));
    assert!(bundle.data.slate.is_none());
    assert!(bundle.data.injuries.is_none());
    assert!(bundle.data.history.stats.is_none());

    // No date walk for the slate.
    let slate_requests: Vec<_> = fetcher
        .requests()
        .into_iter()
        .filter(|u| u.ends_with("/slate.json"))
        .collect();
    assert_eq!(slate_requests, vec![url(ResourceKey::Slate, DATE)]);

    // Optional diagnostics survive the failure.
    assert_eq!(
        bundle.loaded_from[&ResourceKey::Injuries],
        url(ResourceKey::Injuries, "2024-10-13")
    );
    assert_eq!(
        bundle.loaded_from[&ResourceKey::DepthCharts],
        url(ResourceKey::DepthCharts, DATE)
    );
    assert_eq!(
        bundle.last_modified.resources[&ResourceKey::Injuries],
        "Sun, 13 Oct 2024 21:00:00 GMT"
    );
    assert_eq!(
        bundle.last_modified.latest,
        Some(Utc.with_ymd_and_hms(2024, 10, 13, 21, 0, 0).unwrap())
    );
}

#[tokio::test]
async fn required_server_error_is_fatal_without_retry() {
    let fetcher = Arc::new(ScriptedFetcher::new().with_status(url(ResourceKey::Slate, DATE), 503));
    let loader = EcosystemLoader::with_fetcher(fetcher.clone(), config(3));

    let bundle = loader.load(&LoadRequest::new(DATE)).await;

    assert!(!bundle.ok);
    assert_eq!(bundle.errors[&ResourceKey::Slate], "HTTP 503");
    assert_eq!(fetcher.request_count(&url(ResourceKey::Slate, DATE)), 1);
}

#[tokio::test]
async fn optional_found_six_days_back_without_error() {
    let fetcher = Arc::new(
        ScriptedFetcher::new()
            .with_document(url(ResourceKey::Slate, DATE), slate_doc())
            .with_document(
                url(ResourceKey::DepthCharts, "2024-10-09"),
                json!({"DEN": {"PG": ["Murray"]}}),
            ),
    );
    let loader = EcosystemLoader::with_fetcher(fetcher, config(30));

    let bundle = loader.load(&LoadRequest::new(DATE)).await;

    assert!(bundle.ok);
    assert_eq!(
        bundle.data.depth_charts,
        Some(json!({"DEN": {"PG": ["Murray"]}}))
    );
    assert_eq!(bundle.as_of[&ResourceKey::DepthCharts], "2024-10-09");
    assert_eq!(
        bundle.loaded_from[&ResourceKey::DepthCharts],
        url(ResourceKey::DepthCharts, "2024-10-09")
    );
    assert!(!bundle.errors.contains_key(&ResourceKey::DepthCharts));
}

#[tokio::test]
async fn optional_with_only_transient_errors_reports_last_message() {
    let fetcher = Arc::new(
        ScriptedFetcher::new()
            .with_document(url(ResourceKey::Slate, DATE), slate_doc())
            .with_status(url(ResourceKey::Injuries, DATE), 500)
            .with_status(url(ResourceKey::Injuries, "2024-10-14"), 502)
            .with_outcome(
                url(ResourceKey::Injuries, "2024-10-13"),
                FetchOutcome::TransientError(FetchError::transport("operation timed out")),
            ),
    );
    let loader = EcosystemLoader::with_fetcher(fetcher, config(3));

    let bundle = loader.load(&LoadRequest::new(DATE)).await;

    assert!(bundle.ok);
    assert_eq!(bundle.status(), BundleStatus::Degraded);
    assert!(bundle.data.injuries.is_none());
    assert_eq!(
        bundle.errors[&ResourceKey::Injuries],
        "operation timed out"
    );
    assert_eq!(bundle.as_of[&ResourceKey::Injuries], DATE);
    assert_eq!(
        bundle.loaded_from[&ResourceKey::Injuries],
        url(ResourceKey::Injuries, DATE)
    );
}

#[tokio::test]
async fn clean_absence_everywhere_is_reported_per_resource() {
    let fetcher = Arc::new(
        ScriptedFetcher::new().with_document(url(ResourceKey::Slate, DATE), slate_doc()),
    );
    let loader = EcosystemLoader::with_fetcher(fetcher, config(4));

    let bundle = loader.load(&LoadRequest::new(DATE)).await;

    assert!(bundle.ok);
    assert_eq!(bundle.errors.len(), 6);
    assert_eq!(
        bundle.errors[&ResourceKey::Rotations],
        "not found within 4 days"
    );
    assert_eq!(bundle.data.history.as_of, DATE);
}

#[tokio::test]
async fn history_as_of_follows_rotations_fallback() {
    let fetcher = Arc::new(
        ScriptedFetcher::new()
            .with_document(url(ResourceKey::Slate, DATE), slate_doc())
            .with_document(url(ResourceKey::Rotations, "2024-10-14"), json!([]))
            .with_document(url(ResourceKey::Stats, DATE), json!({})),
    );
    let loader = EcosystemLoader::with_fetcher(fetcher, config(5));

    let bundle = loader.load(&LoadRequest::new(DATE)).await;

    assert_eq!(bundle.data.history.as_of, "2024-10-14");
    assert_eq!(bundle.data.history.rotations, Some(json!([])));
}

#[tokio::test]
async fn history_disabled_skips_gated_resources_without_requests() {
    let fetcher = Arc::new(
        ScriptedFetcher::new()
            .with_document(url(ResourceKey::Slate, DATE), slate_doc())
            .with_document(url(ResourceKey::Stats, "2024-10-12"), json!({"rows": 3})),
    );
    let loader = EcosystemLoader::with_fetcher(fetcher.clone(), config(5));

    let bundle = loader
        .load(&LoadRequest::new(DATE).with_history(false))
        .await;

    assert!(bundle.ok);
    assert_eq!(fetcher.request_count(&url(ResourceKey::Rotations, DATE)), 0);
    assert_eq!(fetcher.request_count(&url(ResourceKey::Boxscores, DATE)), 0);
    assert!(bundle.data.history.rotations.is_none());
    assert!(bundle.data.history.boxscores.is_none());
    assert_eq!(bundle.data.history.stats, Some(json!({"rows": 3})));
    // Skipped resources carry no date, so stats anchors the history.
    assert_eq!(bundle.data.history.as_of, "2024-10-12");
}

#[tokio::test]
async fn latest_freshness_spans_required_and_optional() {
    let fetcher = Arc::new(
        ScriptedFetcher::new()
            .with_document_modified(
                url(ResourceKey::Slate, DATE),
                slate_doc(),
                "Tue, 15 Oct 2024 15:00:00 GMT",
            )
            .with_document_modified(
                url(ResourceKey::StartingLineups, DATE),
                json!({}),
                "Tue, 15 Oct 2024 22:45:00 GMT",
            )
            .with_document_modified(
                url(ResourceKey::Injuries, DATE),
                json!({}),
                "sometime tuesday",
            ),
    );
    let loader = EcosystemLoader::with_fetcher(fetcher, config(2));

    let bundle = loader.load(&LoadRequest::new(DATE)).await;

    assert_eq!(bundle.last_modified.resources.len(), 3);
    assert_eq!(
        bundle.last_modified.latest,
        Some(Utc.with_ymd_and_hms(2024, 10, 15, 22, 45, 0).unwrap())
    );
}

#[tokio::test]
async fn latest_freshness_absent_without_headers() {
    let fetcher = Arc::new(
        ScriptedFetcher::new().with_document(url(ResourceKey::Slate, DATE), slate_doc()),
    );
    let bundle = load_ecosystem(fetcher, &config(1), &LoadRequest::new(DATE)).await;

    assert!(bundle.ok);
    assert!(bundle.last_modified.latest.is_none());
}

#[tokio::test(start_paused = true)]
async fn optional_walks_run_concurrently() {
    // Success depths: injuries 0, depth charts 3, lineups 5, rotations 2,
    // boxscores 4; stats never resolves within the 8-day window.
    let latency = Duration::from_millis(10);
    let fetcher = Arc::new(
        ScriptedFetcher::new()
            .with_latency(latency)
            .with_document(url(ResourceKey::Slate, DATE), slate_doc())
            .with_document(url(ResourceKey::Injuries, DATE), json!({}))
            .with_document(url(ResourceKey::DepthCharts, "2024-10-12"), json!({}))
            .with_document(url(ResourceKey::StartingLineups, "2024-10-10"), json!({}))
            .with_document(url(ResourceKey::Rotations, "2024-10-13"), json!({}))
            .with_document(url(ResourceKey::Boxscores, "2024-10-11"), json!({})),
    );
    let loader = EcosystemLoader::with_fetcher(fetcher.clone(), config(8));

    let started = tokio::time::Instant::now();
    let bundle = loader.load(&LoadRequest::new(DATE)).await;
    let elapsed = started.elapsed();

    assert!(bundle.ok);
    assert_eq!(bundle.errors.len(), 1);
    assert!(bundle.errors.contains_key(&ResourceKey::Stats));

    // 1 + 1 + 4 + 6 + 3 + 5 + 8 = 28 sequential requests would take 280ms;
    // the slowest single walk (stats, 8 requests) takes 80ms.
    assert_eq!(fetcher.requests().len(), 28);
    assert!(elapsed >= latency * 8, "elapsed {elapsed:?}");
    assert!(elapsed < latency * 12, "walks serialized: {elapsed:?}");
    assert!(fetcher.max_in_flight() >= 6);
}

/// Fetcher that panics for the listed URLs and delegates everything else.
struct PanicsOn {
    urls: Vec<String>,
    inner: ScriptedFetcher,
}

#[async_trait]
impl DocumentFetcher for PanicsOn {
    async fn fetch_raw(&self, url: &str) -> FetchOutcome {
        if self.urls.iter().any(|u| u == url) {
            panic!("fetcher blew up on {url}");
        }
        self.inner.fetch_raw(url).await
    }
}

#[tokio::test]
async fn panicking_resolution_becomes_an_error_value() {
    let fetcher = Arc::new(PanicsOn {
        urls: vec![url(ResourceKey::DepthCharts, DATE)],
        inner: ScriptedFetcher::new()
            .with_document(url(ResourceKey::Slate, DATE), slate_doc())
            .with_document(url(ResourceKey::Injuries, DATE), json!({"out": []})),
    });
    let loader = EcosystemLoader::with_fetcher(fetcher, config(2));

    let bundle = loader.load(&LoadRequest::new(DATE)).await;

    assert!(bundle.ok);
    assert_eq!(bundle.data.injuries, Some(json!({"out": []})));
    assert!(bundle.data.depth_charts.is_none());
    assert!(bundle.errors[&ResourceKey::DepthCharts].starts_with("resolution task failed"));
    assert_eq!(
        bundle.loaded_from[&ResourceKey::DepthCharts],
        url(ResourceKey::DepthCharts, DATE)
    );
}

#[tokio::test]
async fn each_panicking_resolution_reports_its_own_failure() {
    let fetcher = Arc::new(PanicsOn {
        urls: vec![
            url(ResourceKey::Injuries, DATE),
            url(ResourceKey::DepthCharts, DATE),
            url(ResourceKey::Stats, DATE),
        ],
        inner: ScriptedFetcher::new().with_document(url(ResourceKey::Slate, DATE), slate_doc()),
    });
    let loader = EcosystemLoader::with_fetcher(fetcher, config(2));

    let bundle = loader.load(&LoadRequest::new(DATE)).await;

    assert!(bundle.ok);
    for key in [
        ResourceKey::Injuries,
        ResourceKey::DepthCharts,
        ResourceKey::Stats,
    ] {
        let message = &bundle.errors[&key];
        assert!(message.starts_with("resolution task failed"), "{key}: {message}");
        assert!(
            message.contains(key.spec().filename),
            "{key} reported another task's panic: {message}"
        );
    }
    assert_eq!(
        bundle.errors[&ResourceKey::Rotations],
        "not found within 2 days"
    );
}

#[tokio::test]
async fn panicking_required_fetch_fails_the_load() {
    let fetcher = Arc::new(PanicsOn {
        urls: vec![url(ResourceKey::Slate, DATE)],
        inner: ScriptedFetcher::new(),
    });
    let loader = EcosystemLoader::with_fetcher(fetcher, config(1));

    let bundle = loader.load(&LoadRequest::new(DATE)).await;

    assert!(!bundle.ok);
    assert!(bundle.errors[&ResourceKey::Slate].starts_with("resolution task failed"));
}

#[tokio::test]
async fn bundle_serializes_to_documented_shape() {
    let fetcher = Arc::new(
        ScriptedFetcher::new()
            .with_document_modified(
                url(ResourceKey::Slate, DATE),
                slate_doc(),
                "Tue, 15 Oct 2024 15:00:00 GMT",
            )
            .with_document_modified(
                url(ResourceKey::Injuries, DATE),
                json!({"out": ["Embiid"]}),
                "Tue, 15 Oct 2024 12:30:00 GMT",
            ),
    );
    let loader = EcosystemLoader::with_fetcher(fetcher, config(1));

    let bundle = loader.load(&LoadRequest::new(DATE)).await;
    let value = serde_json::to_value(&bundle).unwrap();

    assert_eq!(value["ok"], json!(true));
    assert_eq!(value["data"]["injuries"], json!({"out": ["Embiid"]}));
    assert!(value["data"]["history"]["rotations"].is_null());
    assert_eq!(value["data"]["history"]["asOf"], json!(DATE));
    assert_eq!(
        value["loadedFrom"]["slate"],
        json!(url(ResourceKey::Slate, DATE))
    );
    assert_eq!(value["errors"]["stats"], json!("not found within 1 days"));
    // Per-resource stamps sit beside `latest`, not under a nested key.
    assert_eq!(
        value["lastModified"]["slate"],
        json!("Tue, 15 Oct 2024 15:00:00 GMT")
    );
    assert_eq!(
        value["lastModified"]["injuries"],
        json!("Tue, 15 Oct 2024 12:30:00 GMT")
    );
    assert_eq!(value["lastModified"]["latest"], json!("2024-10-15T15:00:00Z"));
    assert!(value["lastModified"].get("resources").is_none());

    let restored: slate_ecosystem::EcosystemBundle =
        serde_json::from_value(value.clone()).unwrap();
    assert_eq!(restored, bundle);
    assert_eq!(serde_json::to_value(&restored).unwrap(), value);
}
