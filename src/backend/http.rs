use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::error::BackendError;
use super::types::{DeleteParams, FetchParams, FetchResponse, MutationResponse, RecordResponse, RecordsPayload};
use super::RecordApi;
use crate::config::Config;

const PROJECT_ID_HEADER: &str = "X-Apper-Project-Id";
const PUBLIC_KEY_HEADER: &str = "X-Apper-Public-Key";

/// Record API client over HTTP.
pub struct HttpRecordClient {
    client: Client,
    base_url: String,
    project_id: String,
    public_key: String,
}

impl HttpRecordClient {
    /// Create a new client from the loaded configuration.
    pub fn new(config: &Config) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.timeout_secs.min(10)))
            .build()
            .map_err(BackendError::Http)?;

        Ok(Self {
            client,
            base_url: config.api_url().to_string(),
            project_id: config.project_id.clone(),
            public_key: config.public_key.clone(),
        })
    }

    fn records_url(&self, table: &str) -> String {
        format!("{}/tables/{}/records", self.base_url, table)
    }

    fn query_url(&self, table: &str) -> String {
        format!("{}/query", self.records_url(table))
    }

    fn record_query_url(&self, table: &str, id: i64) -> String {
        format!("{}/{}/query", self.records_url(table), id)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .header(PROJECT_ID_HEADER, &self.project_id)
            .header(PUBLIC_KEY_HEADER, &self.public_key)
    }

    async fn send<B, R>(&self, method: Method, url: String, body: &B) -> Result<R, BackendError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        debug!(%method, %url, "record api request");

        let response = self
            .request(method, &url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    BackendError::Connection(format!("Cannot connect to {}", self.base_url))
                } else {
                    BackendError::Http(e)
                }
            })?;

        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
                message: error_message(&bytes)
                    .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string()),
            });
        }

        serde_json::from_slice(&bytes).map_err(|e| BackendError::Decode(e.to_string()))
    }
}

/// Pull `message` out of an error body, if the body is JSON and has one.
fn error_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    value
        .get("message")
        .and_then(|m| m.as_str())
        .map(str::to_string)
}

#[async_trait]
impl RecordApi for HttpRecordClient {
    async fn fetch_records(
        &self,
        table: &str,
        params: &FetchParams,
    ) -> Result<FetchResponse, BackendError> {
        self.send(Method::POST, self.query_url(table), params).await
    }

    async fn get_record_by_id(
        &self,
        table: &str,
        id: i64,
        params: &FetchParams,
    ) -> Result<RecordResponse, BackendError> {
        self.send(Method::POST, self.record_query_url(table, id), params)
            .await
    }

    async fn create_record(
        &self,
        table: &str,
        payload: &RecordsPayload,
    ) -> Result<MutationResponse, BackendError> {
        self.send(Method::POST, self.records_url(table), payload)
            .await
    }

    async fn update_record(
        &self,
        table: &str,
        payload: &RecordsPayload,
    ) -> Result<MutationResponse, BackendError> {
        self.send(Method::PUT, self.records_url(table), payload)
            .await
    }

    async fn delete_record(
        &self,
        table: &str,
        params: &DeleteParams,
    ) -> Result<MutationResponse, BackendError> {
        self.send(Method::DELETE, self.records_url(table), params)
            .await
    }
}
