//! Resource Client Port
//!
//! Defines the interface for reading and writing admin API collections.
//! Implementations may talk HTTP to a live gateway or hold records in memory.

use crate::domain::errors::ClientError;
use crate::domain::value_objects::Collection;
use async_trait::async_trait;
use serde_json::Value;

/// Uniform list/put/delete access to one gateway's admin collections.
///
/// This is an outbound port: the application layer decodes the raw
/// records it returns into typed entities. Implementations do not retry.
#[async_trait]
pub trait ResourceClient: Send + Sync {
    /// Fetch every record of a collection, in server order.
    async fn list(&self, collection: Collection) -> Result<Vec<Value>, ClientError>;

    /// Create or replace the record stored under `id`.
    async fn put(&self, collection: Collection, id: &str, body: Value) -> Result<(), ClientError>;

    /// Delete the record stored under `id`.
    async fn delete(&self, collection: Collection, id: &str, force: bool)
        -> Result<(), ClientError>;
}
