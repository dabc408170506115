//! Best-effort persistence of processed results to a remote record store.
//!
//! One row per successful summarisation, inserted into a PostgREST-style
//! table. The write is fire-and-forget: any failure (network, auth, schema)
//! is reported as a stderr warning and never blocks, retries, or alters the
//! result the user already has on screen. No read, update, or delete path
//! exists here.

use crate::config::PersistenceConfig;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// User-Agent string identifying this client
const USER_AGENT: &str = concat!("studia/", env!("CARGO_PKG_VERSION"));

/// Default timeout for HTTP requests
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Error, Debug)]
pub enum PersistError {
    #[error("record store request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
}

/// One processed input/output pair, written exactly once.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingRecord<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub input_type: &'static str,
    pub original_content: &'a str,
    pub processed_content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<&'a str>,
}

impl<'a> ProcessingRecord<'a> {
    pub fn summary(
        input_type: &'static str,
        original_content: &'a str,
        processed_content: &'a str,
        user_id: Option<&'a str>,
    ) -> Self {
        Self {
            kind: "summary",
            input_type,
            original_content,
            processed_content,
            user_id,
        }
    }
}

/// Client for the remote record store.
pub struct RecordStore {
    http: Client,
    insert_url: String,
    api_key: Option<String>,
}

impl RecordStore {
    /// Build a store from config; `None` when no endpoint is configured.
    pub fn from_config(config: &PersistenceConfig) -> Option<Result<Self, PersistError>> {
        let endpoint = config.endpoint.as_deref()?;
        let insert_url = format!(
            "{}/rest/v1/{}",
            endpoint.trim_end_matches('/'),
            config.table
        );

        let store = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map(|http| Self {
                http,
                insert_url,
                api_key: config.api_key.clone(),
            })
            .map_err(PersistError::from);
        Some(store)
    }

    /// Insert one record.
    pub async fn insert(&self, record: &ProcessingRecord<'_>) -> Result<(), PersistError> {
        let mut request = self.http.post(&self.insert_url).json(record);
        if let Some(key) = &self.api_key {
            request = request
                .header("apikey", key)
                .header("Authorization", format!("Bearer {}", key));
        }
        request.send().await?.error_for_status()?;
        Ok(())
    }
}

/// Write one record, tolerating every failure.
///
/// An unconfigured endpoint skips the write silently; any other failure is
/// a stderr warning only.
pub async fn store_best_effort(config: &PersistenceConfig, record: &ProcessingRecord<'_>) {
    let store = match RecordStore::from_config(config) {
        Some(Ok(store)) => store,
        Some(Err(e)) => {
            eprintln!("Warning: failed to persist result: {}", e);
            return;
        }
        None => return,
    };

    if let Err(e) = store.insert(record).await {
        eprintln!("Warning: failed to persist result: {}", e);
    }
}
