use crate::helpers::{firestore_store, FIRESTORE_DOCUMENTS_PATH};
use serde_json::json;
use sociostack::domain::{
    DocumentId, DocumentStore, DocumentStoreError, FieldValue, Fields, OrderBy,
};
use std::time::Duration;
use wiremock::{
    matchers::{body_partial_json, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

fn commit_path() -> String {
    format!("{FIRESTORE_DOCUMENTS_PATH}:commit")
}

fn run_query_path() -> String {
    format!("{FIRESTORE_DOCUMENTS_PATH}:runQuery")
}

fn announcement_fields() -> Fields {
    let mut fields = Fields::new();
    fields.insert("title".to_owned(), "Exam".into());
    fields.insert("timestamp".to_owned(), FieldValue::ServerTimestamp);
    fields
}

fn query_response() -> serde_json::Value {
    json!([
        {
            "document": {
                "name": "projects/craggy-island/databases/(default)/documents/announcements/a2",
                "fields": {
                    "title": { "stringValue": "Hackathon" },
                    "timestamp": { "timestampValue": "2024-05-20T12:00:00.000000Z" }
                }
            },
            "readTime": "2024-05-21T00:00:00Z"
        },
        {
            "document": {
                "name": "projects/craggy-island/databases/(default)/documents/announcements/a1",
                "fields": {
                    "title": { "stringValue": "Welcome" },
                    "timestamp": { "timestampValue": "2024-05-01T12:00:00Z" }
                }
            },
            "readTime": "2024-05-21T00:00:00Z"
        }
    ])
}

#[tokio::test]
async fn should_create_with_precondition_and_server_timestamp() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(commit_path()))
        .and(body_partial_json(json!({
            "writes": [{
                "update": {
                    "name": "projects/craggy-island/databases/(default)/documents/announcements/a1",
                    "fields": { "title": { "stringValue": "Exam" } }
                },
                "currentDocument": { "exists": false },
                "updateTransforms": [{
                    "fieldPath": "timestamp",
                    "setToServerValue": "REQUEST_TIME"
                }]
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "writeResults": [{ "updateTime": "2024-05-21T00:00:00Z" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = firestore_store(&server, None);
    let id = DocumentId::parse("a1").unwrap();

    let result = store
        .create_document("announcements", &id, announcement_fields())
        .await;

    assert_eq!(result, Ok(()));
}

#[tokio::test]
async fn should_map_conflicts_and_missing_documents() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(commit_path()))
        .respond_with(ResponseTemplate::new(409))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{FIRESTORE_DOCUMENTS_PATH}/members/ghost")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("{FIRESTORE_DOCUMENTS_PATH}/members/ghost")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let store = firestore_store(&server, None);
    let a1 = DocumentId::parse("a1").unwrap();
    let ghost = DocumentId::parse("ghost").unwrap();

    assert_eq!(
        store
            .create_document("announcements", &a1, announcement_fields())
            .await,
        Err(DocumentStoreError::DocumentExists(a1))
    );
    assert_eq!(
        store.get_document("members", &ghost).await.map(|_| ()),
        Err(DocumentStoreError::DocumentNotFound(ghost.clone()))
    );
    assert_eq!(store.delete_document("members", &ghost).await, Ok(()));
}

#[tokio::test]
async fn should_send_the_api_key_and_decode_queries() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(run_query_path()))
        .and(query_param("key", "parochial-house"))
        .and(body_partial_json(json!({
            "structuredQuery": {
                "from": [{ "collectionId": "announcements" }],
                "orderBy": [{
                    "field": { "fieldPath": "timestamp" },
                    "direction": "DESCENDING"
                }]
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(query_response()))
        .expect(1)
        .mount(&server)
        .await;

    let store = firestore_store(&server, Some("parochial-house"));

    let documents = store
        .query("announcements", Some(OrderBy::descending("timestamp")))
        .await
        .unwrap();

    let ids: Vec<&str> = documents.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["a2", "a1"]);
    assert_eq!(documents[0].string("title"), Some("Hackathon"));
    assert!(documents[1].timestamp("timestamp").is_some());
}

#[tokio::test]
async fn should_surface_unexpected_responses() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(run_query_path()))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let store = firestore_store(&server, None);

    let result = store.query("members", None).await;

    assert!(matches!(result, Err(DocumentStoreError::UnexpectedError(_))));
}

#[tokio::test]
async fn should_only_emit_changed_snapshots_while_polling() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(run_query_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(query_response()))
        .mount(&server)
        .await;

    let store = firestore_store(&server, None);
    let mut listener = store
        .listen("announcements", Some(OrderBy::descending("timestamp")))
        .await
        .unwrap();

    let first = listener.next().await.unwrap().unwrap();
    assert_eq!(first.len(), 2);

    // Several polls return the same result, none of which is emitted.
    let repeat =
        tokio::time::timeout(Duration::from_millis(150), listener.next()).await;
    assert!(repeat.is_err(), "Unchanged snapshot was emitted again");
}

#[tokio::test]
async fn should_keep_polling_after_a_failed_snapshot() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(run_query_path()))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(run_query_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(query_response()))
        .mount(&server)
        .await;

    let store = firestore_store(&server, None);
    let mut listener = store.listen("announcements", None).await.unwrap();

    assert!(matches!(
        listener.next().await,
        Some(Err(DocumentStoreError::UnexpectedError(_)))
    ));
    let recovered = listener.next().await.unwrap().unwrap();
    assert_eq!(recovered.len(), 2);
}

#[tokio::test]
async fn should_address_documents_with_reserved_characters_in_their_id() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(format!("{FIRESTORE_DOCUMENTS_PATH}/members/a%231%3Fx%25")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let store = firestore_store(&server, None);
    let id = DocumentId::parse("a#1?x%").unwrap();

    assert_eq!(store.delete_document("members", &id).await, Ok(()));
}
