//! Application Layer
//!
//! Use cases that drive the resource client: list caches, form drafts,
//! key issuing and the views that compose them.

pub mod form;
pub mod key_issuer;
pub mod list_cache;
pub mod views;

#[cfg(test)]
pub(crate) mod testing;

pub use form::{Draft, FormState, RouteDraft, UpstreamDraft};
pub use key_issuer::KeyIssuer;
pub use list_cache::{ListCache, LoadState};
pub use views::{OverviewView, ResourceView, RoutesView, TaskOutcome, UpstreamsView, ViewText};
