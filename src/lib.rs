//! gateway-dashboard Library
//!
//! Client-side reconciliation for a gateway admin API: typed upstream,
//! route and consumer records, list caches refreshed after every write,
//! form drafts, and API key issuing. Exposed as a library for the CLI and
//! for integration tests.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types
pub use adapters::outbound::HttpResourceClient;
pub use application::{
    FormState, KeyIssuer, ListCache, LoadState, OverviewView, RouteDraft, RoutesView, TaskOutcome,
    UpstreamDraft, UpstreamsView,
};
pub use config::{load_config, Config};
pub use domain::ports::ResourceClient;
pub use domain::{Collection, DashboardError, Route, Upstream};
