//! Domain Entities - Core business objects
//!
//! These entities mirror the records stored by the gateway admin API.
//! They have no external dependencies beyond serde and contain only
//! shape-level logic; routing and balancing semantics live in the gateway.

use crate::domain::value_objects::Collection;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A record that lives in one admin API collection.
pub trait Resource:
    Serialize + DeserializeOwned + Clone + PartialEq + std::fmt::Debug + Send + Sync + 'static
{
    /// Collection the record is stored in.
    const COLLECTION: Collection;

    /// The user-assigned identifier the record is stored under.
    fn resource_id(&self) -> &str;
}

/// Upstream transport scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    #[default]
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

/// Load balancing strategy applied by the gateway.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BalancerType {
    #[default]
    RoundRobin,
    Chash,
}

impl BalancerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RoundRobin => "roundrobin",
            Self::Chash => "chash",
        }
    }
}

/// How the gateway sets the Host header towards the upstream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PassHost {
    /// Keep the incoming Host header
    #[default]
    Pass,
    /// Override with `upstream_host`
    Rewrite,
}

impl PassHost {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Rewrite => "rewrite",
        }
    }
}

/// HTTP verbs a route can match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
    Connect,
    Trace,
    Purge,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
            Self::Connect => "CONNECT",
            Self::Trace => "TRACE",
            Self::Purge => "PURGE",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "DELETE" => Ok(Self::Delete),
            "PATCH" => Ok(Self::Patch),
            "HEAD" => Ok(Self::Head),
            "OPTIONS" => Ok(Self::Options),
            "CONNECT" => Ok(Self::Connect),
            "TRACE" => Ok(Self::Trace),
            "PURGE" => Ok(Self::Purge),
            other => Err(format!("unknown HTTP method: {}", other)),
        }
    }
}

/// A named group of backend targets with a load balancing strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Upstream {
    /// Unique, user-assigned identifier
    pub id: String,
    /// Target address (`host:port`) to weight
    #[serde(default)]
    pub nodes: BTreeMap<String, u32>,
    #[serde(default)]
    pub scheme: Scheme,
    #[serde(rename = "type", default)]
    pub balancer: BalancerType,
    #[serde(default)]
    pub pass_host: PassHost,
    /// Host header sent upstream; only meaningful with `PassHost::Rewrite`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstream_host: Option<String>,
}

impl Upstream {
    /// First target node and its weight, by address order.
    pub fn primary_node(&self) -> Option<(&str, u32)> {
        self.nodes
            .iter()
            .next()
            .map(|(addr, weight)| (addr.as_str(), *weight))
    }
}

impl Resource for Upstream {
    const COLLECTION: Collection = Collection::Upstreams;

    fn resource_id(&self) -> &str {
        &self.id
    }
}

/// Configuration of the `proxy-rewrite` plugin.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProxyRewrite {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

/// Configuration of the `key-auth` plugin.
///
/// On a route the block is empty (`{}`); on a consumer it carries the key.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyAuthConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl std::fmt::Debug for KeyAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyAuthConfig")
            .field("key", &self.key.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Plugins attached to a route.
///
/// Plugins other than `proxy-rewrite` and `key-auth` are opaque and kept
/// as raw JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoutePlugins {
    #[serde(
        rename = "proxy-rewrite",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub proxy_rewrite: Option<ProxyRewrite>,
    #[serde(rename = "key-auth", default, skip_serializing_if = "Option::is_none")]
    pub key_auth: Option<KeyAuthConfig>,
    #[serde(flatten)]
    pub other: BTreeMap<String, serde_json::Value>,
}

impl RoutePlugins {
    pub fn is_empty(&self) -> bool {
        self.proxy_rewrite.is_none() && self.key_auth.is_none() && self.other.is_empty()
    }
}

/// A mapping from a public URI and method set to an upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub id: String,
    pub uri: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<HttpMethod>,
    /// Referenced upstream. Existence is not checked locally.
    #[serde(default)]
    pub upstream_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u8>,
    #[serde(default, skip_serializing_if = "RoutePlugins::is_empty")]
    pub plugins: RoutePlugins,
}

impl Route {
    /// Target uri of the `proxy-rewrite` plugin, if configured.
    pub fn rewrite_target(&self) -> Option<&str> {
        self.plugins
            .proxy_rewrite
            .as_ref()
            .and_then(|p| p.uri.as_deref())
    }

    /// Whether callers must present a consumer key.
    pub fn requires_auth(&self) -> bool {
        self.plugins.key_auth.is_some()
    }

    /// Methods joined for display, e.g. `GET, POST`.
    pub fn methods_label(&self) -> String {
        self.methods
            .iter()
            .map(HttpMethod::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Resource for Route {
    const COLLECTION: Collection = Collection::Routes;

    fn resource_id(&self) -> &str {
        &self.id
    }
}

/// Plugins attached to a consumer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsumerPlugins {
    #[serde(rename = "key-auth")]
    pub key_auth: KeyAuthConfig,
}

/// An identity recognized by the gateway's key-auth plugin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Consumer {
    pub username: String,
    pub plugins: ConsumerPlugins,
}

impl Resource for Consumer {
    const COLLECTION: Collection = Collection::Consumers;

    fn resource_id(&self) -> &str {
        &self.username
    }
}
