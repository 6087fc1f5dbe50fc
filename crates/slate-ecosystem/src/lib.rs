//! Slate-Ecosystem: resilient loader for a day's slate and its enrichments
//!
//! A day's ecosystem is one required document (the slate) plus optional
//! enrichment documents (injuries, depth charts, starting lineups, rotations,
//! boxscores, stats), each published independently under
//! `<base>/<YYYY-MM-DD>/<filename>`. This crate loads all of them at once
//! and returns one [`EcosystemBundle`] that tolerates partial failure.
//!
//! ## Layer 1 - Core
//!
//! Focus: concurrency, date fallback and honest failure reporting.
//!
//! ## Key Components
//!
//! - [`previous_date`]: UTC calendar stepping over `YYYY-MM-DD` strings
//! - [`resolve_optional`]: walk back through dates until a document exists
//! - [`load_ecosystem`] / [`EcosystemLoader`]: concurrent fan-out, settle all, decide
//! - [`assemble_bundle`]: merge outcomes, errors, URLs and freshness
//! - [`lookup`]: key-tolerant reads over the loosely shaped documents
//!
//! ```rust,ignore
//! use slate_ecosystem::{EcosystemLoader, LoadRequest, LoaderConfig};
//!
//! let loader = EcosystemLoader::new(LoaderConfig::from_env())?;
//! let bundle = loader.load(&LoadRequest::new("2024-10-15")).await;
//! if !bundle.ok {
//!     eprintln!("no slate: {}", bundle.failure_message().unwrap_or_default());
//! }
//! ```

mod bundle;
mod config;
pub mod date_walk;
mod error;
mod fallback;
pub mod freshness;
mod loader;
pub mod lookup;
pub mod obs;
mod resolved;
pub mod resources;
pub mod telemetry;

pub use bundle::{
    assemble_bundle, BundleStatus, EcosystemBundle, EcosystemData, HistoryBundle, LastModified,
};
pub use config::{
    LoaderConfig, DEFAULT_BASE_URL, DEFAULT_MAX_LOOKBACK_DAYS, ENV_BASE_URL,
    ENV_MAX_LOOKBACK_DAYS,
};
pub use date_walk::previous_date;
pub use error::{LoaderError, LoaderResult};
pub use fallback::{resolve_optional, resolve_spec};
pub use freshness::{latest_timestamp, parse_timestamp};
pub use loader::{load_ecosystem, EcosystemLoader, LoadRequest};
pub use resolved::ResolvedResource;
pub use resources::{ResourceKey, ResourceSpec, CATALOG};
pub use telemetry::{init_tracing, LogFormat};

pub use slate_fetch::{DocumentFetcher, FetchError, FetchOutcome, HttpFetcher};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
