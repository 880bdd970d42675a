use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::{
    BackendError, DeleteParams, FetchParams, FetchResponse, MutationResponse, RecordApi,
    RecordResponse, RecordResult, RecordsPayload,
};

/// A call received by [`MockRecordApi`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Fetch { table: String, params: FetchParams },
    Get { table: String, id: i64, params: FetchParams },
    Create { table: String, payload: RecordsPayload },
    Update { table: String, payload: RecordsPayload },
    Delete { table: String, params: DeleteParams },
}

type Scripted<T> = Mutex<VecDeque<Result<T, BackendError>>>;

/// Scripted record API: replies from per-operation queues and records
/// every request it receives.
#[derive(Default)]
pub struct MockRecordApi {
    calls: Mutex<Vec<Call>>,
    fetches: Scripted<FetchResponse>,
    gets: Scripted<RecordResponse>,
    mutations: Scripted<MutationResponse>,
}

impl MockRecordApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_fetch(&self, response: Result<FetchResponse, BackendError>) -> &Self {
        self.fetches.lock().unwrap().push_back(response);
        self
    }

    pub fn push_get(&self, response: Result<RecordResponse, BackendError>) -> &Self {
        self.gets.lock().unwrap().push_back(response);
        self
    }

    pub fn push_mutation(&self, response: Result<MutationResponse, BackendError>) -> &Self {
        self.mutations.lock().unwrap().push_back(response);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn next<T>(queue: &Scripted<T>) -> Result<T, BackendError> {
        queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(BackendError::Connection("no scripted response".into())))
    }
}

#[async_trait]
impl RecordApi for MockRecordApi {
    async fn fetch_records(
        &self,
        table: &str,
        params: &FetchParams,
    ) -> Result<FetchResponse, BackendError> {
        self.record(Call::Fetch {
            table: table.to_string(),
            params: params.clone(),
        });
        Self::next(&self.fetches)
    }

    async fn get_record_by_id(
        &self,
        table: &str,
        id: i64,
        params: &FetchParams,
    ) -> Result<RecordResponse, BackendError> {
        self.record(Call::Get {
            table: table.to_string(),
            id,
            params: params.clone(),
        });
        Self::next(&self.gets)
    }

    async fn create_record(
        &self,
        table: &str,
        payload: &RecordsPayload,
    ) -> Result<MutationResponse, BackendError> {
        self.record(Call::Create {
            table: table.to_string(),
            payload: payload.clone(),
        });
        Self::next(&self.mutations)
    }

    async fn update_record(
        &self,
        table: &str,
        payload: &RecordsPayload,
    ) -> Result<MutationResponse, BackendError> {
        self.record(Call::Update {
            table: table.to_string(),
            payload: payload.clone(),
        });
        Self::next(&self.mutations)
    }

    async fn delete_record(
        &self,
        table: &str,
        params: &DeleteParams,
    ) -> Result<MutationResponse, BackendError> {
        self.record(Call::Delete {
            table: table.to_string(),
            params: params.clone(),
        });
        Self::next(&self.mutations)
    }
}

// Response builders

pub fn fetched(data: Vec<Value>) -> Result<FetchResponse, BackendError> {
    Ok(FetchResponse {
        success: true,
        message: None,
        data: Some(data),
    })
}

pub fn found(data: Value) -> Result<RecordResponse, BackendError> {
    Ok(RecordResponse {
        success: true,
        message: None,
        data: Some(data),
    })
}

pub fn mutated(results: Vec<RecordResult>) -> Result<MutationResponse, BackendError> {
    Ok(MutationResponse {
        success: true,
        message: None,
        results: Some(results),
    })
}

pub fn rejected_mutation(message: &str) -> Result<MutationResponse, BackendError> {
    Ok(MutationResponse {
        success: false,
        message: Some(message.to_string()),
        results: None,
    })
}

pub fn ok_result(data: Value) -> RecordResult {
    RecordResult {
        success: true,
        data: Some(data),
        ..Default::default()
    }
}

pub fn failed_result(message: &str) -> RecordResult {
    RecordResult {
        success: false,
        message: Some(message.to_string()),
        ..Default::default()
    }
}
