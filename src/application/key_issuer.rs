//! API Key Issuer
//!
//! Creates a consumer bound to a freshly minted key-auth credential. The
//! key is handed to the operator once and then forgotten.

use crate::application::views::TaskOutcome;
use crate::domain::entities::{Consumer, ConsumerPlugins, KeyAuthConfig};
use crate::domain::errors::DashboardError;
use crate::domain::ports::ResourceClient;
use crate::domain::services::generate_key;
use crate::domain::value_objects::{ApiKey, Mutation};
use crate::infrastructure::ViewLifetime;
use std::sync::Arc;

/// Issues consumer keys and holds the latest one until it is taken.
pub struct KeyIssuer {
    client: Arc<dyn ResourceClient>,
    lifetime: ViewLifetime,
    issued: Option<ApiKey>,
    message: Option<String>,
}

impl KeyIssuer {
    pub fn new(client: Arc<dyn ResourceClient>) -> Self {
        Self {
            client,
            lifetime: ViewLifetime::new(),
            issued: None,
            message: None,
        }
    }

    /// Generate a key for `username` and register the consumer.
    pub async fn issue(&mut self, username: &str) -> TaskOutcome {
        self.issue_with(username, generate_key()).await
    }

    /// Register `username` with a caller-supplied key.
    pub async fn issue_with(&mut self, username: &str, key: ApiKey) -> TaskOutcome {
        let username = username.trim();
        if username.is_empty() {
            self.message = Some("Please enter a consumer name".to_string());
            return TaskOutcome::Failed;
        }

        let consumer = Consumer {
            username: username.to_string(),
            plugins: ConsumerPlugins {
                key_auth: KeyAuthConfig {
                    key: Some(key.expose().to_string()),
                },
            },
        };

        let put = Mutation::Put(consumer);
        let result: Option<Result<(), DashboardError>> =
            self.lifetime.run(put.execute(self.client.as_ref())).await;

        match result {
            None => TaskOutcome::Discarded,
            Some(Ok(())) => {
                tracing::info!("issued API key for consumer {}", username);
                self.issued = Some(key);
                self.message = Some(format!(
                    "API Key successfully generated for \"{}\"",
                    username
                ));
                TaskOutcome::Completed
            }
            Some(Err(e)) => {
                tracing::error!("consumer create error: {}", e);
                self.message = Some("Failed to generate API key.".to_string());
                TaskOutcome::Failed
            }
        }
    }

    /// Hand out the last issued key. Subsequent calls return `None`.
    pub fn take_key(&mut self) -> Option<ApiKey> {
        self.issued.take()
    }

    /// Status line for the last attempt.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn lifetime(&self) -> &ViewLifetime {
        &self.lifetime
    }
}
