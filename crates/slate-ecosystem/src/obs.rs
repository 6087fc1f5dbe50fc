//! Structured tracing hooks for the load lifecycle.
//!
//! Every load runs inside a `slate.load` span carrying a generated load id,
//! so the interleaved logs of concurrently resolving resources can be told
//! apart. Lifecycle events are emitted at `info!`; a failed slate at `warn!`.

use tracing::{info, warn, Span};

/// Span covering one load. Attach with `tracing::Instrument`.
pub fn load_span(load_id: &str, target_date: &str) -> Span {
    tracing::info_span!("slate.load", load_id = %load_id, target_date = %target_date)
}

/// Fresh identifier for one load.
pub fn new_load_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Emit event: load started.
pub fn emit_load_started(target_date: &str, include_history: bool, max_lookback_days: u32) {
    info!(
        event = "load.started",
        target_date = %target_date,
        include_history = include_history,
        max_lookback_days = max_lookback_days,
    );
}

/// Emit event: one optional resource settled.
pub fn emit_resource_resolved(resource: &str, as_of_date: Option<&str>, found: bool) {
    info!(
        event = "resource.resolved",
        resource = %resource,
        as_of_date = as_of_date.unwrap_or(""),
        found = found,
    );
}

/// Emit event: resource skipped without a request.
pub fn emit_resource_skipped(resource: &str, reason: &str) {
    info!(event = "resource.skipped", resource = %resource, reason = %reason);
}

/// Emit event: the required slate could not be loaded.
pub fn emit_required_failed(resource: &str, error: &dyn std::fmt::Display) {
    warn!(event = "resource.required_failed", resource = %resource, error = %error);
}

/// Emit event: load finished with its verdict.
pub fn emit_load_finished(target_date: &str, ok: bool, error_count: usize, duration_ms: u64) {
    info!(
        event = "load.finished",
        target_date = %target_date,
        ok = ok,
        error_count = error_count,
        duration_ms = duration_ms,
    );
}
