use std::sync::Arc;

use tracing::instrument;

use super::error::OrLog;
use super::{ProjectService, RecordTable, ServiceError};
use crate::backend::{FetchParams, RecordApi, SortType};
use crate::models::{timestamp_now, Client, ClientDraft, Project, CLIENT_FIELDS};

pub const CLIENT_TABLE: &str = "client_c";

#[derive(Clone)]
pub struct ClientService {
    clients: RecordTable,
    projects: ProjectService,
}

impl ClientService {
    pub fn new(api: Arc<dyn RecordApi>) -> Self {
        Self {
            clients: RecordTable::new(api.clone(), CLIENT_TABLE, "client"),
            projects: ProjectService::new(api),
        }
    }

    /// All clients, ordered by name.
    #[instrument(skip(self))]
    pub async fn get_all(&self) -> Vec<Client> {
        let params = FetchParams::with_fields(CLIENT_FIELDS).order_by("Name", SortType::Asc);

        self.clients
            .fetch(&params)
            .await
            .or_log(|| "Error fetching clients".to_string())
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: i64) -> Option<Client> {
        let result = async {
            if id <= 0 {
                return Err(ServiceError::InvalidId("Client ID is required"));
            }
            let params = FetchParams::with_fields(CLIENT_FIELDS);
            self.clients.get::<Client>(id, &params).await
        }
        .await;

        result.or_log(|| format!("Error fetching client with ID {}", id))
    }

    #[instrument(skip(self, draft))]
    pub async fn create(&self, draft: &ClientDraft) -> Option<Client> {
        let record = draft.create_record(&timestamp_now());

        self.clients
            .create(record)
            .await
            .or_log(|| "Error creating client".to_string())
    }

    #[instrument(skip(self, draft))]
    pub async fn update(&self, id: i64, draft: &ClientDraft) -> Option<Client> {
        self.clients
            .update(draft.update_record(id))
            .await
            .or_log(|| "Error updating client".to_string())
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> bool {
        self.clients
            .delete(id)
            .await
            .or_log(|| "Error deleting client".to_string())
    }

    /// Projects owned by a client. The join happens in memory over
    /// every project.
    #[instrument(skip(self))]
    pub async fn get_projects_by_client_id(&self, client_id: i64) -> Vec<Project> {
        self.projects
            .get_all()
            .await
            .into_iter()
            .filter(|project| project.client_id() == Some(client_id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock::{failed_result, fetched, found, mutated, ok_result, Call, MockRecordApi};
    use crate::backend::{BackendError, FieldError, RecordResult};
    use crate::services::PROJECT_TABLE;
    use serde_json::{json, Value};
    use std::io;
    use std::sync::Mutex;
    use tracing_subscriber::fmt::MakeWriter;

    /// Log sink shared between the subscriber and the test.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn capture_logs() -> (CapturedLogs, tracing::subscriber::DefaultGuard) {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .without_time()
            .finish();
        let guard = tracing::subscriber::set_default(subscriber);
        (logs, guard)
    }

    fn service() -> (Arc<MockRecordApi>, ClientService) {
        let api = Arc::new(MockRecordApi::new());
        let service = ClientService::new(api.clone());
        (api, service)
    }

    #[tokio::test]
    async fn test_get_all() {
        let (api, service) = service();
        api.push_fetch(fetched(vec![
            json!({ "Id": 1, "Name": "Acme", "status_c": "Active", "Tags": "vip,retainer" }),
            json!({ "Id": 2, "Name": "Globex" }),
        ]));

        let clients = service.get_all().await;

        assert_eq!(clients.len(), 2);
        assert_eq!(clients[0].tags.0, vec!["vip", "retainer"]);

        let calls = api.calls();
        let Call::Fetch { table, params } = &calls[0] else {
            panic!("expected a fetch, got {:?}", calls[0]);
        };
        assert_eq!(table, CLIENT_TABLE);
        assert_eq!(params.fields.len(), CLIENT_FIELDS.len());
        assert_eq!(params.order_by[0].field_name, "Name");
    }

    #[tokio::test]
    async fn test_get_all_keeps_records_that_decode() {
        let (api, service) = service();
        api.push_fetch(fetched(vec![
            json!({ "Id": 1, "Name": "Acme" }),
            json!({ "Id": 2, "Name": "Globex", "phone_c": 5551234 }),
            json!({ "Name": "No id" }),
        ]));

        let clients = service.get_all().await;

        let ids: Vec<i64> = clients.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(clients[1].phone.as_deref(), Some("5551234"));
    }

    #[tokio::test]
    async fn test_get_by_id_requires_id() {
        let (api, service) = service();

        assert!(service.get_by_id(0).await.is_none());
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let (api, service) = service();
        api.push_get(found(json!({ "Id": 5, "Name": "Acme", "email_c": "ops@acme.test" })));
        api.push_get(Err(BackendError::Status {
            status: 404,
            message: "Record not found".to_string(),
        }));

        let client = service.get_by_id(5).await.unwrap();
        assert_eq!(client.email.as_deref(), Some("ops@acme.test"));
        assert!(service.get_by_id(6).await.is_none());
    }

    #[tokio::test]
    async fn test_create_maps_loose_input() {
        let (api, service) = service();
        api.push_mutation(mutated(vec![ok_result(json!({ "Id": 12, "Name": "Initech" }))]));

        let draft = ClientDraft::from_value(&json!({
            "name": "Initech",
            "email": "hello@initech.test",
            "industry_c": "Software"
        }))
        .unwrap();

        let created = service.create(&draft).await.unwrap();
        assert_eq!(created.id, 12);

        let calls = api.calls();
        let Call::Create { table, payload } = &calls[0] else {
            panic!("expected a create");
        };
        let record = &payload.records[0];
        assert_eq!(table, CLIENT_TABLE);
        assert_eq!(record["Name"], json!("Initech"));
        assert_eq!(record["email_c"], json!("hello@initech.test"));
        assert_eq!(record["industry_c"], json!("Software"));
        assert_eq!(record["status_c"], json!("Active"));
        assert_eq!(record["Tags"], json!([]));
    }

    #[tokio::test]
    async fn test_create_with_numeric_field_in_response() {
        let (api, service) = service();
        api.push_mutation(mutated(vec![ok_result(json!({
            "Id": 9,
            "Name": "Hooli",
            "phone_c": 5551234,
            "status_c": "Active"
        }))]));

        let created = service.create(&ClientDraft::default()).await.unwrap();

        assert_eq!(created.id, 9);
        assert_eq!(created.phone.as_deref(), Some("5551234"));
    }

    #[tokio::test]
    async fn test_create_with_only_failures_is_none() {
        let (api, service) = service();
        api.push_mutation(mutated(vec![RecordResult {
            success: false,
            errors: Some(vec![FieldError {
                field_label: Some("Email".to_string()),
                message: Some("is invalid".to_string()),
            }]),
            ..Default::default()
        }]));

        assert!(service.create(&ClientDraft::default()).await.is_none());
    }

    #[tokio::test]
    async fn test_failed_create_logs_summary_and_field_errors() {
        let (logs, _guard) = capture_logs();
        let (api, service) = service();
        api.push_mutation(mutated(vec![RecordResult {
            success: false,
            message: Some("Duplicate email".to_string()),
            errors: Some(vec![FieldError {
                field_label: Some("Email".to_string()),
                message: Some("is invalid".to_string()),
            }]),
            ..Default::default()
        }]));

        assert!(service.create(&ClientDraft::default()).await.is_none());

        let output = logs.contents();
        assert!(output.contains("Failed to create client 1 records:["), "{output}");
        assert!(output.contains("Email: is invalid"), "{output}");
        assert!(output.contains("Duplicate email"), "{output}");
    }

    #[tokio::test]
    async fn test_backend_message_logged_with_context() {
        let (logs, _guard) = capture_logs();
        let (api, service) = service();
        api.push_get(Err(BackendError::Status {
            status: 404,
            message: "Record not found".to_string(),
        }));

        assert!(service.get_by_id(6).await.is_none());

        let output = logs.contents();
        assert!(
            output.contains("Error fetching client with ID 6: Record not found"),
            "{output}"
        );
    }

    #[tokio::test]
    async fn test_update() {
        let (api, service) = service();
        api.push_mutation(mutated(vec![ok_result(json!({ "Id": 3, "status_c": "Inactive" }))]));

        let draft = ClientDraft {
            status: Some("Inactive".to_string()),
            ..Default::default()
        };
        let updated = service.update(3, &draft).await.unwrap();
        assert_eq!(updated.status.as_deref(), Some("Inactive"));

        let calls = api.calls();
        let Call::Update { payload, .. } = &calls[0] else {
            panic!("expected an update");
        };
        assert_eq!(
            Value::Object(payload.records[0].clone()),
            json!({ "Id": 3, "status_c": "Inactive", "Tags": [] })
        );
    }

    #[tokio::test]
    async fn test_delete() {
        let (api, service) = service();
        api.push_mutation(mutated(vec![ok_result(Value::Null)]));
        api.push_mutation(mutated(vec![failed_result("Record is referenced")]));
        api.push_mutation(Err(BackendError::Connection("refused".to_string())));

        assert!(service.delete(3).await);
        assert!(!service.delete(4).await);
        assert!(!service.delete(5).await);
    }

    #[tokio::test]
    async fn test_projects_joined_by_lookup() {
        let (api, service) = service();
        api.push_fetch(fetched(vec![
            json!({ "Id": 1, "Name": "Embedded", "clientId_c": { "Id": 7, "Name": "Acme" } }),
            json!({ "Id": 2, "Name": "Bare", "clientId_c": 7 }),
            json!({ "Id": 3, "Name": "Legacy", "clientId": 7 }),
            json!({ "Id": 4, "Name": "Other client", "clientId_c": 8 }),
            json!({ "Id": 5, "Name": "Unlinked" }),
        ]));

        let projects = service.get_projects_by_client_id(7).await;

        let ids: Vec<i64> = projects.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(matches!(&api.calls()[0], Call::Fetch { table, .. } if table == PROJECT_TABLE));
    }

    #[tokio::test]
    async fn test_projects_empty_when_fetch_fails() {
        let (_api, service) = service();

        // Nothing scripted: the double reports a connection failure.
        assert!(service.get_projects_by_client_id(7).await.is_empty());
    }
}
