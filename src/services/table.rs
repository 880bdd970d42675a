use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, error, warn};

use super::ServiceError;
use crate::backend::{
    DeleteParams, FetchParams, MutationResponse, RecordApi, RecordResult, RecordsPayload,
};

/// One remote table plus the steps every operation on it shares: call the
/// record API, check `success`, split `results` and log the failures.
#[derive(Clone)]
pub struct RecordTable {
    api: Arc<dyn RecordApi>,
    table: &'static str,
    label: &'static str,
}

impl RecordTable {
    pub fn new(api: Arc<dyn RecordApi>, table: &'static str, label: &'static str) -> Self {
        Self { api, table, label }
    }

    pub async fn fetch<T: DeserializeOwned>(
        &self,
        params: &FetchParams,
    ) -> Result<Vec<T>, ServiceError> {
        let response = self.api.fetch_records(self.table, params).await?;

        if !response.success {
            return Err(self.rejected(response.message));
        }

        // A record that does not fit the model is dropped, not the page.
        let records: Vec<T> = response
            .data
            .unwrap_or_default()
            .into_iter()
            .filter_map(|record| match self.decode(record) {
                Ok(record) => Some(record),
                Err(err) => {
                    warn!(table = self.table, "Skipping record: {}", err);
                    None
                }
            })
            .collect();

        debug!(table = self.table, count = records.len(), "fetched records");
        Ok(records)
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        id: i64,
        params: &FetchParams,
    ) -> Result<Option<T>, ServiceError> {
        let response = self.api.get_record_by_id(self.table, id, params).await?;

        if !response.success {
            return Err(self.rejected(response.message));
        }

        match response.data {
            None | Some(Value::Null) => Ok(None),
            Some(record) => self.decode(record).map(Some),
        }
    }

    pub async fn create<T: DeserializeOwned>(
        &self,
        record: Map<String, Value>,
    ) -> Result<Option<T>, ServiceError> {
        let payload = RecordsPayload::single(record);
        let response = self.api.create_record(self.table, &payload).await?;

        self.first_success("create", response)
    }

    pub async fn update<T: DeserializeOwned>(
        &self,
        record: Map<String, Value>,
    ) -> Result<Option<T>, ServiceError> {
        let payload = RecordsPayload::single(record);
        let response = self.api.update_record(self.table, &payload).await?;

        self.first_success("update", response)
    }

    /// True when at least one record was deleted.
    pub async fn delete(&self, id: i64) -> Result<bool, ServiceError> {
        let params = DeleteParams::single(id);
        let response = self.api.delete_record(self.table, &params).await?;

        let succeeded = self.successes("delete", response)?;
        Ok(!succeeded.is_empty())
    }

    fn first_success<T: DeserializeOwned>(
        &self,
        verb: &str,
        response: MutationResponse,
    ) -> Result<Option<T>, ServiceError> {
        let succeeded = self.successes(verb, response)?;

        match succeeded.into_iter().next().and_then(|r| r.data) {
            None | Some(Value::Null) => Ok(None),
            Some(record) => self.decode(record).map(Some),
        }
    }

    /// Successful entries of `results`; the failed ones are logged. A
    /// response without `results` has no successes.
    fn successes(
        &self,
        verb: &str,
        response: MutationResponse,
    ) -> Result<Vec<RecordResult>, ServiceError> {
        if !response.success {
            return Err(self.rejected(response.message));
        }

        let (succeeded, failed): (Vec<_>, Vec<_>) = response
            .results
            .unwrap_or_default()
            .into_iter()
            .partition(|r| r.success);

        if !failed.is_empty() {
            self.log_failures(verb, &failed);
        }

        Ok(succeeded)
    }

    fn log_failures(&self, verb: &str, failed: &[RecordResult]) {
        let detail = serde_json::to_string(failed).unwrap_or_default();
        error!(
            table = self.table,
            "Failed to {} {} {} records:{}",
            verb,
            self.label,
            failed.len(),
            detail
        );

        for record in failed {
            for field_error in record.errors.iter().flatten() {
                error!(table = self.table, "{}", field_error);
            }
            if let Some(message) = &record.message {
                error!(table = self.table, "{}", message);
            }
        }
    }

    fn rejected(&self, message: Option<String>) -> ServiceError {
        ServiceError::Rejected(
            message.unwrap_or_else(|| format!("Record API rejected the {} request", self.label)),
        )
    }

    fn decode<T: DeserializeOwned>(&self, record: Value) -> Result<T, ServiceError> {
        serde_json::from_value(record).map_err(|source| ServiceError::Decode {
            label: self.label,
            source,
        })
    }
}
