//! Terminal Renderer
//!
//! Plain-text rendering of the dashboard views for the operator CLI.
//! Empty collections render an explicit "no records" line.

use crate::application::{KeyIssuer, OverviewView, RoutesView, UpstreamsView};
use crate::domain::entities::Route;
use std::fmt::Write;

pub const NO_UPSTREAMS: &str = "Please Create Upstream";
pub const NO_ROUTES: &str = "No routes found";
pub const NO_OVERVIEW: &str = "No upstreams found";
pub const NO_LINKED_ROUTES: &str = "No routes linked";

fn auth_marker(auth: bool) -> &'static str {
    if auth {
        " [key-auth]"
    } else {
        ""
    }
}

/// One-line route summary: id, methods, uri, rewrite target, auth marker.
pub fn route_line(route: &Route) -> String {
    format!(
        "{} {} {} -> {}{}",
        route.id,
        route.methods_label(),
        route.uri,
        route.rewrite_target().unwrap_or("-"),
        auth_marker(route.requires_auth())
    )
}

fn error_banner(out: &mut String, error: Option<&str>) {
    if let Some(message) = error {
        let _ = writeln!(out, "Error: {}", message);
    }
}

pub fn render_upstreams(view: &UpstreamsView) -> String {
    let mut out = String::from("Upstreams\n");
    error_banner(&mut out, view.error());

    let upstreams = view.upstreams().records();
    if upstreams.is_empty() {
        let _ = writeln!(out, "{}", NO_UPSTREAMS);
        return out;
    }

    for upstream in upstreams {
        let _ = writeln!(out, "{}", upstream.id);
        let _ = writeln!(out, "  Scheme: {}", upstream.scheme.as_str());
        let _ = writeln!(out, "  Type: {}", upstream.balancer.as_str());
        let node = upstream.primary_node().map(|(addr, _)| addr).unwrap_or("-");
        let _ = writeln!(out, "  Node: {}", node);

        let linked = view.linked_routes(&upstream.id);
        if !linked.is_empty() {
            let _ = writeln!(out, "  Linked Routes:");
            for route in linked {
                let _ = writeln!(out, "    - {}", route_line(route));
            }
        }
    }
    out
}

pub fn render_routes(view: &RoutesView) -> String {
    let mut out = String::from("Routes\n");
    error_banner(&mut out, view.error());

    let routes = view.records();
    if routes.is_empty() {
        let _ = writeln!(out, "{}", NO_ROUTES);
        return out;
    }

    for route in routes {
        let _ = writeln!(out, "Route: {}", route.id);
        let _ = writeln!(out, "  URI: {}", route.uri);
        let _ = writeln!(out, "  Method(s): {}", route.methods_label());
        let _ = writeln!(out, "  Upstream ID: {}", route.upstream_id);
        if let Some(target) = route.rewrite_target() {
            let _ = writeln!(out, "  Rewrite: {}", target);
        }
        if route.requires_auth() {
            let _ = writeln!(out, "  Auth: key-auth");
        }
    }
    out
}

pub fn render_overview(view: &OverviewView) -> String {
    let mut out = String::from("Upstream Overview\n");
    if let Some(message) = view.error() {
        let _ = writeln!(out, "{}", message);
        return out;
    }

    let entries = view.overview();
    if entries.is_empty() {
        let _ = writeln!(out, "{}", NO_OVERVIEW);
        return out;
    }

    for entry in entries {
        let _ = writeln!(out, "{}", entry.upstream_id);
        if entry.routes.is_empty() {
            let _ = writeln!(out, "  {}", NO_LINKED_ROUTES);
            continue;
        }
        for r in entry.routes {
            let _ = writeln!(
                out,
                "  {} {} {} -> {}{}",
                r.id,
                r.methods,
                r.uri,
                r.rewrite,
                auth_marker(r.auth)
            );
        }
    }
    out
}

/// Render the issuer's status and reveal its key. The key is consumed.
pub fn render_issued_key(issuer: &mut KeyIssuer) -> String {
    let mut out = String::new();
    if let Some(message) = issuer.message() {
        let _ = writeln!(out, "{}", message);
    }
    if let Some(key) = issuer.take_key() {
        let _ = writeln!(out, "Generated API Key: {}", key.expose());
    }
    out
}
