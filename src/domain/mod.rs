//! Domain Layer
//!
//! Entities, value objects, ports and pure services. Nothing here performs
//! I/O directly.

pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod value_objects;

pub use entities::{
    BalancerType, Consumer, ConsumerPlugins, HttpMethod, KeyAuthConfig, PassHost, ProxyRewrite,
    Resource, Route, RoutePlugins, Scheme, Upstream,
};
pub use errors::{ClientError, DashboardError};
pub use value_objects::{ApiKey, Collection, Mutation};
