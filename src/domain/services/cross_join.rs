//! Cross-Resource Join
//!
//! Pure domain logic relating routes to the upstreams they reference.
//! Collections are operator-scale, so joins are linear scans recomputed on
//! demand rather than indexed.

use crate::domain::entities::{Route, Upstream};

/// Display summary of one route linked to an upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSummary {
    pub id: String,
    /// Methods joined with `, `
    pub methods: String,
    pub uri: String,
    /// Rewrite target, or `-` when none is configured
    pub rewrite: String,
    pub auth: bool,
}

impl From<&Route> for RouteSummary {
    fn from(route: &Route) -> Self {
        Self {
            id: route.id.clone(),
            methods: route.methods_label(),
            uri: route.uri.clone(),
            rewrite: route.rewrite_target().unwrap_or("-").to_string(),
            auth: route.requires_auth(),
        }
    }
}

/// An upstream together with the routes that point at it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamOverview {
    pub upstream_id: String,
    pub routes: Vec<RouteSummary>,
}

/// Routes whose `upstream_id` equals `upstream_id`, in the given order.
pub fn routes_for_upstream<'a>(routes: &'a [Route], upstream_id: &str) -> Vec<&'a Route> {
    routes
        .iter()
        .filter(|r| r.upstream_id == upstream_id)
        .collect()
}

/// One overview entry per upstream, in upstream order.
pub fn overview(upstreams: &[Upstream], routes: &[Route]) -> Vec<UpstreamOverview> {
    upstreams
        .iter()
        .map(|u| UpstreamOverview {
            upstream_id: u.id.clone(),
            routes: routes_for_upstream(routes, &u.id)
                .into_iter()
                .map(RouteSummary::from)
                .collect(),
        })
        .collect()
}
