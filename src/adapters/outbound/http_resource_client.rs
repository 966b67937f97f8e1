//! HTTP Resource Client
//!
//! Implements ResourceClient against the gateway admin REST API.
//! Every request carries the static admin token; nothing is retried.

use crate::config::Config;
use crate::domain::errors::ClientError;
use crate::domain::ports::ResourceClient;
use crate::domain::value_objects::Collection;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Header carrying the admin token.
pub const ADMIN_KEY_HEADER: &str = "x-api-key";

/// Envelope returned by collection listings:
/// `{ "node": { "nodes": [ { "key": ..., "value": <entity> } ] } }`.
#[derive(Debug, Deserialize)]
struct ListEnvelope {
    #[serde(default)]
    node: Option<NodeDirectory>,
}

#[derive(Debug, Deserialize)]
struct NodeDirectory {
    /// An array of entries, or `{}` for an empty directory.
    #[serde(default)]
    nodes: Value,
}

#[derive(Debug, Deserialize)]
struct NodeEntry {
    #[allow(dead_code)]
    #[serde(default)]
    key: String,
    value: Value,
}

/// reqwest-backed admin API client.
pub struct HttpResourceClient {
    client: reqwest::Client,
    base: Url,
}

impl HttpResourceClient {
    /// Create a client from explicit configuration.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        config.validate()?;
        let base = Url::parse(&config.api_url)?;

        let mut admin_key = HeaderValue::from_str(&config.api_key)?;
        admin_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(ADMIN_KEY_HEADER, admin_key);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self { client, base })
    }

    /// `{base}/admin/{collection}[/{id}]`, with `id` percent-encoded.
    fn url_for(&self, collection: Collection, id: Option<&str>) -> Result<Url, ClientError> {
        let mut url = self.base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ClientError::Network(format!("{} cannot be a base", self.base)))?;
            segments
                .pop_if_empty()
                .push("admin")
                .push(collection.as_str());
            if let Some(id) = id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ClientError::Rejected {
            status: status.as_u16(),
            body,
        })
    }

    /// Unwrap the listing envelope into raw entity values.
    ///
    /// A missing `node`, missing `nodes`, or an empty-object directory all
    /// mean "no records".
    fn parse_listing(envelope: ListEnvelope) -> Result<Vec<Value>, ClientError> {
        let nodes = match envelope.node.map(|n| n.nodes) {
            Some(Value::Array(entries)) => entries,
            _ => return Ok(Vec::new()),
        };

        nodes
            .into_iter()
            .map(|entry| {
                serde_json::from_value::<NodeEntry>(entry)
                    .map(|e| e.value)
                    .map_err(|e| ClientError::Network(format!("invalid listing entry: {}", e)))
            })
            .collect()
    }
}

fn transport(err: reqwest::Error) -> ClientError {
    ClientError::Network(err.to_string())
}

#[async_trait]
impl ResourceClient for HttpResourceClient {
    async fn list(&self, collection: Collection) -> Result<Vec<Value>, ClientError> {
        let url = self.url_for(collection, None)?;
        tracing::debug!("GET {}", url);

        let response = self.client.get(url).send().await.map_err(transport)?;
        let response = Self::ensure_success(response).await?;
        let envelope: ListEnvelope = response.json().await.map_err(transport)?;

        Self::parse_listing(envelope)
    }

    async fn put(&self, collection: Collection, id: &str, body: Value) -> Result<(), ClientError> {
        let url = self.url_for(collection, Some(id))?;
        tracing::debug!("PUT {}", url);

        let response = self
            .client
            .put(url)
            .json(&body)
            .send()
            .await
            .map_err(transport)?;
        Self::ensure_success(response).await?;
        Ok(())
    }

    async fn delete(
        &self,
        collection: Collection,
        id: &str,
        force: bool,
    ) -> Result<(), ClientError> {
        let mut url = self.url_for(collection, Some(id))?;
        if force {
            url.query_pairs_mut().append_pair("force", "true");
        }
        tracing::debug!("DELETE {}", url);

        let response = self.client.delete(url).send().await.map_err(transport)?;
        Self::ensure_success(response).await?;
        Ok(())
    }
}
