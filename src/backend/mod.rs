//! Record API access.
//!
//! The services never talk HTTP directly; they hold an `Arc<dyn RecordApi>`
//! so the transport can be swapped for a scripted double in tests.

mod error;
mod http;
pub mod types;

#[cfg(test)]
pub(crate) mod mock;

use async_trait::async_trait;

pub use error::BackendError;
pub use http::HttpRecordClient;
pub use types::{
    DeleteParams, FetchParams, FetchResponse, FieldError, MutationResponse, RecordResponse,
    RecordResult, RecordsPayload, SortType, WhereClause,
};

#[async_trait]
pub trait RecordApi: Send + Sync {
    async fn fetch_records(
        &self,
        table: &str,
        params: &FetchParams,
    ) -> Result<FetchResponse, BackendError>;

    async fn get_record_by_id(
        &self,
        table: &str,
        id: i64,
        params: &FetchParams,
    ) -> Result<RecordResponse, BackendError>;

    async fn create_record(
        &self,
        table: &str,
        payload: &RecordsPayload,
    ) -> Result<MutationResponse, BackendError>;

    async fn update_record(
        &self,
        table: &str,
        payload: &RecordsPayload,
    ) -> Result<MutationResponse, BackendError>;

    async fn delete_record(
        &self,
        table: &str,
        params: &DeleteParams,
    ) -> Result<MutationResponse, BackendError>;
}
