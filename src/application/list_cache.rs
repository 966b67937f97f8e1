//! List Cache - client-held snapshot of one collection
//!
//! Writes follow a two-step protocol:
//! 1. `Mutation::execute` sends the write (mutate)
//! 2. `ListCache::reconcile` re-lists the whole collection (reconcile)
//!
//! The snapshot is only ever replaced wholesale by a successful listing, so
//! it never shows a locally synthesized result as confirmed server state.

use crate::domain::entities::Resource;
use crate::domain::errors::DashboardError;
use crate::domain::ports::ResourceClient;
use crate::domain::value_objects::Mutation;

/// Load lifecycle of a cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Empty,
    Loading,
    Loaded,
    LoadError(String),
}

/// Last fetched snapshot of a collection, in server order.
#[derive(Debug, Clone, PartialEq)]
pub struct ListCache<R> {
    state: LoadState,
    records: Vec<R>,
}

impl<R: Resource> ListCache<R> {
    pub fn new() -> Self {
        Self {
            state: LoadState::Empty,
            records: Vec::new(),
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Last known-good snapshot.
    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&R> {
        self.records.iter().find(|r| r.resource_id() == id)
    }

    pub fn begin_loading(&mut self) {
        self.state = LoadState::Loading;
    }

    /// List the collection and decode each record.
    ///
    /// Records this client cannot read (written by other tools with fields
    /// outside the typed model) are logged and skipped. The listing only
    /// fails as malformed when none of its records decode.
    pub async fn fetch(client: &dyn ResourceClient) -> Result<Vec<R>, DashboardError> {
        let raw = client.list(R::COLLECTION).await?;
        let mut records = Vec::with_capacity(raw.len());
        let mut last_error = None;

        for value in raw {
            let id = value
                .get("id")
                .or_else(|| value.get("username"))
                .and_then(|v| v.as_str())
                .unwrap_or("?")
                .to_string();
            match serde_json::from_value::<R>(value) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!("skipping unreadable {} record {}: {}", R::COLLECTION, id, e);
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if records.is_empty() => Err(DashboardError::MalformedResponse(format!(
                "{} record: {}",
                R::COLLECTION,
                e
            ))),
            _ => Ok(records),
        }
    }

    /// Apply the outcome of a fetch.
    ///
    /// Success replaces the snapshot. Failure keeps the previous snapshot
    /// and records the error in the state.
    pub fn finish(&mut self, result: Result<Vec<R>, DashboardError>) -> Result<(), DashboardError> {
        match result {
            Ok(records) => {
                tracing::debug!("{} loaded: {} record(s)", R::COLLECTION, records.len());
                self.records = records;
                self.state = LoadState::Loaded;
                Ok(())
            }
            Err(e) => {
                tracing::error!("failed to list {}: {}", R::COLLECTION, e);
                self.state = LoadState::LoadError(e.to_string());
                Err(e)
            }
        }
    }

    /// Initial load on mount.
    pub async fn load(&mut self, client: &dyn ResourceClient) -> Result<(), DashboardError> {
        self.begin_loading();
        let result = Self::fetch(client).await;
        self.finish(result)
    }

    /// Replace the snapshot with a fresh listing after a successful write.
    pub async fn reconcile(&mut self, client: &dyn ResourceClient) -> Result<(), DashboardError> {
        self.load(client).await
    }
}

impl<R: Resource> Default for ListCache<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Resource> Mutation<R> {
    /// Send the write. Does not touch any cache.
    pub async fn execute(&self, client: &dyn ResourceClient) -> Result<(), DashboardError> {
        let result = match self {
            Mutation::Put(record) => {
                let body = serde_json::to_value(record).map_err(|e| {
                    DashboardError::validation(format!("cannot encode {}: {}", R::COLLECTION, e))
                })?;
                client.put(R::COLLECTION, record.resource_id(), body).await
            }
            Mutation::Delete { id, force } => client.delete(R::COLLECTION, id, *force).await,
        };

        result.map_err(|e| {
            tracing::error!("{} write failed: {}", R::COLLECTION, e);
            DashboardError::from(e)
        })
    }
}
