//! gateway-dashboard - operator CLI for a gateway admin API
//!
//! This is the composition root that wires configuration, the HTTP
//! resource client and the views together.

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use gateway_dashboard::adapters::inbound::{
    render_issued_key, render_overview, render_routes, render_upstreams,
};
use gateway_dashboard::domain::{BalancerType, HttpMethod, PassHost, Scheme};
use gateway_dashboard::{
    load_config, HttpResourceClient, KeyIssuer, OverviewView, ResourceClient, RouteDraft,
    RoutesView, TaskOutcome, UpstreamDraft, UpstreamsView,
};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "gateway-dashboard")]
#[command(about = "Manage gateway upstreams, routes and consumer keys", long_about = None)]
struct Cli {
    /// Admin API root (overrides DASHBOARD_API_URL)
    #[arg(short, long)]
    url: Option<String>,

    /// Admin token (overrides DASHBOARD_API_KEY)
    #[arg(short, long)]
    key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage upstreams
    Upstreams {
        #[command(subcommand)]
        action: UpstreamAction,
    },
    /// Manage routes
    Routes {
        #[command(subcommand)]
        action: RouteAction,
    },
    /// Show every upstream with its linked routes
    Overview,
    /// Create a consumer and print its new API key once
    Keygen {
        /// Consumer name
        username: String,
    },
}

#[derive(Subcommand)]
enum UpstreamAction {
    List,
    Create(UpstreamArgs),
    /// Load an existing upstream, apply changes and save it
    Edit {
        /// Id of the record to load
        #[arg(value_name = "ID")]
        target: String,
        #[command(flatten)]
        args: UpstreamArgs,
    },
    Delete {
        id: String,
    },
}

#[derive(Subcommand)]
enum RouteAction {
    List,
    Create(RouteArgs),
    /// Load an existing route, apply changes and save it
    Edit {
        /// Id of the record to load
        #[arg(value_name = "ID")]
        target: String,
        #[command(flatten)]
        args: RouteArgs,
    },
    Delete {
        id: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SchemeArg {
    Http,
    Https,
}

#[derive(Clone, Copy, ValueEnum)]
enum BalancerArg {
    Roundrobin,
    Chash,
}

#[derive(Clone, Copy, ValueEnum)]
enum PassHostArg {
    Pass,
    Rewrite,
}

#[derive(Args, Default)]
struct UpstreamArgs {
    /// Unique name like 'json' or 'gofiber'
    #[arg(long)]
    id: Option<String>,
    /// Target node as domain:port
    #[arg(long)]
    node: Option<String>,
    #[arg(long)]
    weight: Option<u32>,
    #[arg(long, value_enum)]
    scheme: Option<SchemeArg>,
    /// Load balancing type
    #[arg(long = "type", value_enum)]
    balancer: Option<BalancerArg>,
    #[arg(long, value_enum)]
    pass_host: Option<PassHostArg>,
    /// Host header to send when pass-host is rewrite
    #[arg(long)]
    upstream_host: Option<String>,
}

impl UpstreamArgs {
    fn apply(self, draft: &mut UpstreamDraft) {
        if let Some(id) = self.id {
            draft.id = id;
        }
        if let Some(node) = self.node {
            draft.node = node;
        }
        if let Some(weight) = self.weight {
            draft.weight = weight;
        }
        if let Some(scheme) = self.scheme {
            draft.scheme = match scheme {
                SchemeArg::Http => Scheme::Http,
                SchemeArg::Https => Scheme::Https,
            };
        }
        if let Some(balancer) = self.balancer {
            draft.balancer = match balancer {
                BalancerArg::Roundrobin => BalancerType::RoundRobin,
                BalancerArg::Chash => BalancerType::Chash,
            };
        }
        if let Some(pass_host) = self.pass_host {
            draft.pass_host = match pass_host {
                PassHostArg::Pass => PassHost::Pass,
                PassHostArg::Rewrite => PassHost::Rewrite,
            };
        }
        if let Some(host) = self.upstream_host {
            draft.upstream_host = host;
        }
    }
}

#[derive(Args, Default)]
struct RouteArgs {
    #[arg(long)]
    id: Option<String>,
    /// Public URI (e.g. /chitin)
    #[arg(long)]
    uri: Option<String>,
    #[arg(long)]
    upstream_id: Option<String>,
    /// HTTP method; repeat for several
    #[arg(long = "method")]
    methods: Vec<HttpMethod>,
    /// Defaults to the public URI
    #[arg(long)]
    rewrite_uri: Option<String>,
    /// Require an API key (key-auth)
    #[arg(long, conflicts_with = "no_auth")]
    auth: bool,
    #[arg(long)]
    no_auth: bool,
}

impl RouteArgs {
    fn apply(self, draft: &mut RouteDraft) {
        if let Some(id) = self.id {
            draft.id = id;
        }
        if let Some(uri) = self.uri {
            draft.uri = uri;
        }
        if let Some(upstream_id) = self.upstream_id {
            draft.upstream_id = upstream_id;
        }
        if !self.methods.is_empty() {
            draft.methods = self.methods;
        }
        if let Some(rewrite_uri) = self.rewrite_uri {
            draft.rewrite_uri = rewrite_uri;
        }
        if self.auth {
            draft.use_auth = true;
        }
        if self.no_auth {
            draft.use_auth = false;
        }
    }
}

/// Turn a task outcome into the process result, surfacing the view message.
fn ensure(outcome: TaskOutcome, error: Option<&str>) -> anyhow::Result<()> {
    match outcome {
        TaskOutcome::Completed => Ok(()),
        TaskOutcome::Failed => anyhow::bail!("{}", error.unwrap_or("request failed")),
        TaskOutcome::Discarded => anyhow::bail!("request abandoned"),
    }
}

async fn upstreams(action: UpstreamAction, client: Arc<dyn ResourceClient>) -> anyhow::Result<()> {
    let mut view = UpstreamsView::new(client);
    let mounted = view.mount().await;

    let outcome = match action {
        UpstreamAction::List => mounted,
        // no writes without a listing to select from and reconcile against
        _ if mounted != TaskOutcome::Completed => mounted,
        UpstreamAction::Create(args) => {
            args.apply(view.upstreams_mut().form_mut().draft_mut());
            view.submit().await
        }
        UpstreamAction::Edit { target, args } => {
            if !view.select(&target) {
                anyhow::bail!("upstream {} not found", target);
            }
            args.apply(view.upstreams_mut().form_mut().draft_mut());
            view.submit().await
        }
        UpstreamAction::Delete { id } => view.delete(&id).await,
    };

    print!("{}", render_upstreams(&view));
    ensure(outcome, view.error())
}

async fn routes(action: RouteAction, client: Arc<dyn ResourceClient>) -> anyhow::Result<()> {
    let mut view = RoutesView::new(client);
    let mounted = view.mount().await;

    let outcome = match action {
        RouteAction::List => mounted,
        // no writes without a listing to select from and reconcile against
        _ if mounted != TaskOutcome::Completed => mounted,
        RouteAction::Create(args) => {
            args.apply(view.form_mut().draft_mut());
            view.submit().await
        }
        RouteAction::Edit { target, args } => {
            if !view.select(&target) {
                anyhow::bail!("route {} not found", target);
            }
            args.apply(view.form_mut().draft_mut());
            view.submit().await
        }
        RouteAction::Delete { id } => view.delete(&id).await,
    };

    print!("{}", render_routes(&view));
    ensure(outcome, view.error())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration from environment, then apply CLI overrides
    let mut cfg = load_config()?;
    if let Some(url) = cli.url {
        cfg.api_url = url;
    }
    if let Some(key) = cli.key {
        cfg.api_key = key;
    }

    // Setup logging
    let log_level = if cfg.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("using admin API at {}", cfg.api_url);

    let client: Arc<dyn ResourceClient> =
        Arc::new(HttpResourceClient::new(&cfg).context("invalid admin API configuration")?);

    match cli.command {
        Commands::Upstreams { action } => upstreams(action, client).await,
        Commands::Routes { action } => routes(action, client).await,
        Commands::Overview => {
            let mut view = OverviewView::new(client);
            let outcome = view.mount().await;
            print!("{}", render_overview(&view));
            ensure(outcome, view.error())
        }
        Commands::Keygen { username } => {
            let mut issuer = KeyIssuer::new(client);
            let outcome = issuer.issue(&username).await;
            let message = issuer.message().map(str::to_string);
            print!("{}", render_issued_key(&mut issuer));
            ensure(outcome, message.as_deref())
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use clap::CommandFactory;
    use gateway_dashboard::domain::ClientError;
    use gateway_dashboard::Collection;
    use serde_json::Value;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Admin API that is unreachable for listings and counts write attempts.
    struct UnreachableClient {
        writes: AtomicUsize,
    }

    impl UnreachableClient {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                writes: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl ResourceClient for UnreachableClient {
        async fn list(&self, _: Collection) -> Result<Vec<Value>, ClientError> {
            Err(ClientError::Network("connection refused".to_string()))
        }

        async fn put(&self, _: Collection, _: &str, _: Value) -> Result<(), ClientError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn delete(&self, _: Collection, _: &str, _: bool) -> Result<(), ClientError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_upstream_edit() {
        let cli = Cli::try_parse_from([
            "gateway-dashboard",
            "upstreams",
            "edit",
            "u1",
            "--node",
            "a:80",
            "--id",
            "u2",
        ])
        .unwrap();

        match cli.command {
            Commands::Upstreams {
                action: UpstreamAction::Edit { target, args },
            } => {
                assert_eq!(target, "u1");
                assert_eq!(args.node.as_deref(), Some("a:80"));
                assert_eq!(args.id.as_deref(), Some("u2"));
            }
            _ => panic!("expected upstreams edit"),
        }
    }

    #[test]
    fn test_parse_route_edit_methods() {
        let cli = Cli::try_parse_from([
            "gateway-dashboard",
            "--url",
            "http://gateway:9180/apisix",
            "routes",
            "edit",
            "r1",
            "--method",
            "get",
            "--method",
            "POST",
            "--auth",
        ])
        .unwrap();

        assert_eq!(cli.url.as_deref(), Some("http://gateway:9180/apisix"));
        match cli.command {
            Commands::Routes {
                action: RouteAction::Edit { target, args },
            } => {
                assert_eq!(target, "r1");
                assert_eq!(args.methods, vec![HttpMethod::Get, HttpMethod::Post]);
                assert!(args.auth);
            }
            _ => panic!("expected routes edit"),
        }
    }

    #[test]
    fn test_parse_rejects_conflicting_auth_flags() {
        let result = Cli::try_parse_from([
            "gateway-dashboard",
            "routes",
            "create",
            "--auth",
            "--no-auth",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_route_args_apply_overrides_only_given_fields() {
        let mut draft = RouteDraft {
            id: "r1".to_string(),
            uri: "/a".to_string(),
            upstream_id: "u1".to_string(),
            use_auth: true,
            ..RouteDraft::default()
        };
        let args = RouteArgs {
            uri: Some("/b".to_string()),
            no_auth: true,
            ..RouteArgs::default()
        };

        args.apply(&mut draft);

        assert_eq!(draft.id, "r1");
        assert_eq!(draft.uri, "/b");
        assert_eq!(draft.methods, vec![HttpMethod::Get]);
        assert!(!draft.use_auth);
    }

    #[tokio::test]
    async fn test_edit_reports_fetch_failure() {
        let client = UnreachableClient::new();
        let action = UpstreamAction::Edit {
            target: "u1".to_string(),
            args: UpstreamArgs::default(),
        };

        let err = upstreams(action, client.clone()).await.unwrap_err();

        assert_eq!(err.to_string(), "Failed to fetch upstreams");
        assert_eq!(client.writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_delete_skipped_when_listing_fails() {
        let client = UnreachableClient::new();
        let action = RouteAction::Delete {
            id: "r1".to_string(),
        };

        let err = routes(action, client.clone()).await.unwrap_err();

        assert_eq!(err.to_string(), "Failed to fetch routes");
        assert_eq!(client.writes.load(Ordering::SeqCst), 0);
    }
}
