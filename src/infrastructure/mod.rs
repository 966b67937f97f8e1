//! Infrastructure Layer
//!
//! Cross-cutting concerns and infrastructure components.

pub mod lifetime;

pub use lifetime::ViewLifetime;
