//! In-memory ResourceClient used by the application tests.

use crate::domain::errors::ClientError;
use crate::domain::ports::ResourceClient;
use crate::domain::value_objects::Collection;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

fn id_field(collection: Collection) -> &'static str {
    match collection {
        Collection::Consumers => "username",
        _ => "id",
    }
}

/// Mimics the admin API: insertion-ordered collections, PUT replaces in
/// place, DELETE of a referenced upstream without `force` is rejected.
pub(crate) struct MockClient {
    store: Mutex<BTreeMap<Collection, Vec<Value>>>,
    calls: Mutex<Vec<String>>,
    fail_list: AtomicBool,
    fail_writes: AtomicBool,
    delay: Mutex<Option<Duration>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self {
            store: Mutex::new(BTreeMap::new()),
            calls: Mutex::new(Vec::new()),
            fail_list: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            delay: Mutex::new(None),
        }
    }

    pub fn with(self, collection: Collection, record: Value) -> Self {
        self.store
            .lock()
            .unwrap()
            .entry(collection)
            .or_default()
            .push(record);
        self
    }

    pub fn fail_list(&self, fail: bool) {
        self.fail_list.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn records(&self, collection: Collection) -> Vec<Value> {
        self.store
            .lock()
            .unwrap()
            .get(&collection)
            .cloned()
            .unwrap_or_default()
    }

    pub fn last_body(&self, collection: Collection, id: &str) -> Option<Value> {
        self.records(collection)
            .into_iter()
            .find(|v| v[id_field(collection)] == id)
    }

    async fn pause(&self) {
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl ResourceClient for MockClient {
    async fn list(&self, collection: Collection) -> Result<Vec<Value>, ClientError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("list {}", collection));
        self.pause().await;
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(ClientError::Network("connection refused".to_string()));
        }
        Ok(self.records(collection))
    }

    async fn put(&self, collection: Collection, id: &str, body: Value) -> Result<(), ClientError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("put {} {}", collection, id));
        self.pause().await;
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ClientError::Rejected {
                status: 500,
                body: "internal error".to_string(),
            });
        }

        let mut store = self.store.lock().unwrap();
        let records = store.entry(collection).or_default();
        match records
            .iter_mut()
            .find(|v| v[id_field(collection)] == id)
        {
            Some(existing) => *existing = body,
            None => records.push(body),
        }
        Ok(())
    }

    async fn delete(
        &self,
        collection: Collection,
        id: &str,
        force: bool,
    ) -> Result<(), ClientError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("delete {} {} force={}", collection, id, force));
        self.pause().await;
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ClientError::Rejected {
                status: 500,
                body: "internal error".to_string(),
            });
        }

        let mut store = self.store.lock().unwrap();
        if collection == Collection::Upstreams && !force {
            let referenced = store
                .get(&Collection::Routes)
                .map(|routes| routes.iter().any(|r| r["upstream_id"] == id))
                .unwrap_or(false);
            if referenced {
                return Err(ClientError::Rejected {
                    status: 400,
                    body: "can not delete this upstream, route is still using it".to_string(),
                });
            }
        }

        let records = store.entry(collection).or_default();
        let before = records.len();
        records.retain(|v| v[id_field(collection)] != id);
        if records.len() == before {
            return Err(ClientError::Rejected {
                status: 404,
                body: "Key not found".to_string(),
            });
        }
        Ok(())
    }
}
