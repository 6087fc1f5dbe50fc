//! Date-walking resolution for optional documents.
//!
//! Optional documents are published on a best-effort cadence and may be
//! missing for the target date (off-days, weekends, late producers). The
//! resolver walks backward one calendar day at a time and serves the most
//! recent snapshot it finds, reporting its date through `as_of_date`.

use slate_fetch::{DocumentFetcher, FetchOutcome};
use tracing::{debug, warn};

use crate::date_walk::previous_date;
use crate::resolved::ResolvedResource;
use crate::resources::{resource_url, ResourceSpec};

/// Resolve an optional document by walking back from `target_date`.
///
/// Tries at most `max_lookback_days` dates, strictly one after another,
/// stopping at the first success. A 404 is a clean miss; any other failure
/// is remembered (the latest one wins) and the walk still continues.
///
/// On exhaustion the result is anchored at `target_date`: its `as_of_date`
/// and `source_url` refer to the original date, and `error` carries the last
/// failure, or a "not found" message when every attempt was a clean miss.
pub async fn resolve_optional(
    fetcher: &dyn DocumentFetcher,
    base_url: &str,
    target_date: &str,
    filename: &str,
    max_lookback_days: u32,
) -> ResolvedResource {
    let mut current = target_date.to_string();
    let mut last_error: Option<String> = None;

    for attempt in 0..max_lookback_days {
        let url = resource_url(base_url, &current, filename);

        match fetcher.fetch_raw(&url).await {
            FetchOutcome::Success {
                data,
                last_modified,
            } => {
                debug!(filename, date = %current, attempt, "optional document found");
                return ResolvedResource::found(data, &current, url, last_modified);
            }
            FetchOutcome::NotFound => {
                debug!(filename, date = %current, attempt, "optional document not published");
            }
            FetchOutcome::TransientError(err) => {
                debug!(filename, date = %current, attempt, error = %err, "optional document failed");
                last_error = Some(err.to_string());
            }
        }

        let earlier = previous_date(&current, 1);
        if earlier == current {
            // Unparsable date: every further attempt would hit the same URL.
            break;
        }
        current = earlier;
    }

    let error = last_error.unwrap_or_else(|| not_found_message(max_lookback_days));
    warn!(filename, target_date, max_lookback_days, error = %error, "optional document unavailable");

    ResolvedResource::failed(
        target_date,
        resource_url(base_url, target_date, filename),
        error,
    )
}

/// Resolve `spec` honoring its lookback participation.
///
/// A resource that does not walk back gets exactly one attempt.
pub async fn resolve_spec(
    fetcher: &dyn DocumentFetcher,
    base_url: &str,
    target_date: &str,
    spec: &ResourceSpec,
    max_lookback_days: u32,
) -> ResolvedResource {
    let window = if spec.participates_in_lookback {
        max_lookback_days
    } else {
        max_lookback_days.min(1)
    };
    resolve_optional(fetcher, base_url, target_date, spec.filename, window).await
}

fn not_found_message(max_lookback_days: u32) -> String {
    format!("not found within {max_lookback_days} days")
}
