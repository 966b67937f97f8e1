//! Value Objects - Immutable domain primitives
//!
//! Value objects are identified by their value rather than identity.
//! They are immutable and can be freely shared.

use serde::{Deserialize, Serialize};

/// A resource collection exposed by the gateway admin API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    /// Backend target groups
    Upstreams,
    /// URI-to-upstream mappings
    Routes,
    /// Identities bound to API keys
    Consumers,
}

impl Collection {
    /// Path segment used by the admin API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upstreams => "upstreams",
            Self::Routes => "routes",
            Self::Consumers => "consumers",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A consumer credential for the gateway's key-auth plugin.
///
/// The plaintext is only reachable through [`ApiKey::expose`]; the `Debug`
/// output is redacted so the key never ends up in a trace.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The plaintext key.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// A write against one collection.
///
/// Executing a mutation is the first half of the mutate-then-reconcile
/// protocol; the owning list cache must be reconciled afterwards.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation<R> {
    /// Create or replace the record under its own id.
    Put(R),
    /// Remove a record. `force` bypasses the gateway's reference checks.
    Delete { id: String, force: bool },
}
