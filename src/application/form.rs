//! Form State Controller
//!
//! Holds one flat draft per view. A draft is either blank (create) or
//! populated from a selected list record (click-to-edit), and is re-nested
//! into the collection's wire shape on submit.

use crate::domain::entities::{
    BalancerType, HttpMethod, KeyAuthConfig, PassHost, ProxyRewrite, Resource, Route,
    RoutePlugins, Scheme, Upstream,
};
use crate::domain::errors::DashboardError;
use crate::domain::ports::ResourceClient;
use crate::domain::value_objects::Mutation;
use serde_json::Value;
use std::collections::BTreeMap;

/// A flat, UI-shaped editing buffer for one kind of record.
pub trait Draft: Clone + Default + PartialEq + std::fmt::Debug + Send + Sync {
    type Record: Resource;

    /// Map a stored record onto the draft's flat fields.
    fn load_from(record: &Self::Record) -> Self;

    /// Local checks run before anything is sent.
    fn validate(&self) -> Result<(), DashboardError>;

    /// Re-nest the flat fields into the wire record. Assumes `validate` passed.
    fn build(&self) -> Self::Record;

    fn to_payload(&self) -> Result<Self::Record, DashboardError> {
        self.validate()?;
        Ok(self.build())
    }
}

/// Draft for creating or replacing an upstream with a single target node.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamDraft {
    pub id: String,
    /// Target as `host:port`
    pub node: String,
    pub weight: u32,
    pub scheme: Scheme,
    pub balancer: BalancerType,
    pub pass_host: PassHost,
    /// Required when `pass_host` is `rewrite`, ignored otherwise
    pub upstream_host: String,
}

impl Default for UpstreamDraft {
    fn default() -> Self {
        Self {
            id: String::new(),
            node: String::new(),
            weight: 1,
            scheme: Scheme::Http,
            balancer: BalancerType::RoundRobin,
            pass_host: PassHost::Pass,
            upstream_host: String::new(),
        }
    }
}

impl Draft for UpstreamDraft {
    type Record = Upstream;

    /// Only the primary node is carried over; the draft edits one target.
    fn load_from(record: &Upstream) -> Self {
        let (node, weight) = record
            .primary_node()
            .map(|(addr, weight)| (addr.to_string(), weight))
            .unwrap_or_else(|| (String::new(), 1));

        Self {
            id: record.id.clone(),
            node,
            weight,
            scheme: record.scheme,
            balancer: record.balancer,
            pass_host: record.pass_host,
            upstream_host: record.upstream_host.clone().unwrap_or_default(),
        }
    }

    fn validate(&self) -> Result<(), DashboardError> {
        if self.id.trim().is_empty() || self.node.trim().is_empty() {
            return Err(DashboardError::validation("ID and Node are required"));
        }
        if self.pass_host == PassHost::Rewrite && self.upstream_host.trim().is_empty() {
            return Err(DashboardError::validation(
                "Upstream Host is required when Pass Host is rewrite",
            ));
        }
        Ok(())
    }

    fn build(&self) -> Upstream {
        let upstream_host = match self.pass_host {
            PassHost::Rewrite => Some(self.upstream_host.trim().to_string()),
            PassHost::Pass => None,
        };

        Upstream {
            id: self.id.trim().to_string(),
            nodes: BTreeMap::from([(self.node.trim().to_string(), self.weight)]),
            scheme: self.scheme,
            balancer: self.balancer,
            pass_host: self.pass_host,
            upstream_host,
        }
    }
}

/// Draft for creating or replacing a route.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteDraft {
    pub id: String,
    pub uri: String,
    pub methods: Vec<HttpMethod>,
    pub upstream_id: String,
    /// Optional; falls back to `uri` when empty
    pub rewrite_uri: String,
    /// Expands to an empty `key-auth` plugin block
    pub use_auth: bool,
    /// Plugins the form does not edit, written back unchanged
    pub extra_plugins: BTreeMap<String, Value>,
}

impl Default for RouteDraft {
    fn default() -> Self {
        Self {
            id: String::new(),
            uri: String::new(),
            methods: vec![HttpMethod::Get],
            upstream_id: String::new(),
            rewrite_uri: String::new(),
            use_auth: false,
            extra_plugins: BTreeMap::new(),
        }
    }
}

impl Draft for RouteDraft {
    type Record = Route;

    fn load_from(record: &Route) -> Self {
        Self {
            id: record.id.clone(),
            uri: record.uri.clone(),
            methods: record.methods.clone(),
            upstream_id: record.upstream_id.clone(),
            rewrite_uri: record.rewrite_target().unwrap_or_default().to_string(),
            use_auth: record.requires_auth(),
            extra_plugins: record.plugins.other.clone(),
        }
    }

    fn validate(&self) -> Result<(), DashboardError> {
        if self.id.trim().is_empty()
            || self.uri.trim().is_empty()
            || self.upstream_id.trim().is_empty()
        {
            return Err(DashboardError::validation(
                "ID, URI, and Upstream ID are required",
            ));
        }
        Ok(())
    }

    fn build(&self) -> Route {
        let uri = self.uri.trim().to_string();
        let rewrite = match self.rewrite_uri.trim() {
            "" => uri.clone(),
            target => target.to_string(),
        };

        let mut methods = Vec::with_capacity(self.methods.len());
        for method in &self.methods {
            if !methods.contains(method) {
                methods.push(*method);
            }
        }

        Route {
            id: self.id.trim().to_string(),
            uri,
            methods,
            upstream_id: self.upstream_id.trim().to_string(),
            status: Some(1),
            plugins: RoutePlugins {
                proxy_rewrite: Some(ProxyRewrite { uri: Some(rewrite) }),
                key_auth: self.use_auth.then(KeyAuthConfig::default),
                other: self.extra_plugins.clone(),
            },
        }
    }
}

/// The single draft a view edits, plus the defaults it resets to.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState<D> {
    draft: D,
    defaults: D,
}

impl<D: Draft> FormState<D> {
    pub fn new() -> Self {
        Self::with_defaults(D::default())
    }

    pub fn with_defaults(defaults: D) -> Self {
        Self {
            draft: defaults.clone(),
            defaults,
        }
    }

    pub fn draft(&self) -> &D {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut D {
        &mut self.draft
    }

    /// Reset to the default record.
    pub fn blank(&mut self) {
        self.draft = self.defaults.clone();
    }

    /// Copy a selected record into the draft.
    pub fn load_from(&mut self, record: &D::Record) {
        self.draft = D::load_from(record);
    }

    /// Validate and build the wire record without sending it.
    pub fn prepare(&self) -> Result<D::Record, DashboardError> {
        self.draft.to_payload()
    }

    /// Validate, build and PUT the draft.
    ///
    /// Resets to blank on success; leaves the draft as-is on failure. The
    /// caller still owes its list cache a reconcile.
    pub async fn submit(&mut self, client: &dyn ResourceClient) -> Result<D::Record, DashboardError> {
        let record = self.prepare()?;
        Mutation::Put(record.clone()).execute(client).await?;
        self.blank();
        Ok(record)
    }
}

impl<D: Draft> Default for FormState<D> {
    fn default() -> Self {
        Self::new()
    }
}
