use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use color_eyre::eyre::{eyre, WrapErr};
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::{
    Client, IntoUrl, Method, RequestBuilder, Response, StatusCode, Url,
};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tokio::time::MissedTickBehavior;

use crate::domain::{
    Direction, Document, DocumentId, DocumentStore, DocumentStoreError,
    FieldValue, Fields, OrderBy, SnapshotListener,
};

lazy_static! {
    static ref SIMPLE_FIELD_PATH: Regex =
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid regex");
}

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Document store backed by the Firestore REST API.
///
/// Live listeners poll `:runQuery` and only emit when the result changes.
#[derive(Clone)]
pub struct FirestoreDocumentStore {
    http_client: Client,
    base_url: String,
    database_path: String,
    api_key: Option<Secret<String>>,
    poll_interval: Duration,
}

impl FirestoreDocumentStore {
    pub fn new(
        base_url: String,
        project_id: &str,
        api_key: Option<Secret<String>>,
        http_client: Client,
    ) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            database_path: format!("projects/{project_id}/databases/(default)"),
            api_key,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    fn documents_url(&self) -> String {
        format!("{}/{}/documents", self.base_url, self.database_path)
    }

    /// Ids are pushed as path segments so they are percent-encoded.
    fn document_url(
        &self,
        collection: &str,
        id: &DocumentId,
    ) -> Result<Url, DocumentStoreError> {
        let mut url = Url::parse(&self.documents_url())
            .wrap_err("invalid Firestore base url")
            .map_err(DocumentStoreError::UnexpectedError)?;
        url.path_segments_mut()
            .map_err(|_| {
                DocumentStoreError::UnexpectedError(eyre!(
                    "Firestore base url cannot hold a path"
                ))
            })?
            .push(collection)
            .push(id.as_str());
        Ok(url)
    }

    fn document_name(&self, collection: &str, id: &DocumentId) -> String {
        format!("{}/documents/{}/{}", self.database_path, collection, id)
    }

    fn request<U: IntoUrl>(&self, method: Method, url: U) -> RequestBuilder {
        let request = self.http_client.request(method, url);
        match &self.api_key {
            Some(key) => request.query(&[("key", key.expose_secret())]),
            None => request,
        }
    }

    async fn send(
        &self,
        request: RequestBuilder,
    ) -> Result<Response, DocumentStoreError> {
        request
            .send()
            .await
            .wrap_err("failed to reach Firestore")
            .map_err(DocumentStoreError::UnexpectedError)
    }

    async fn commit(
        &self,
        collection: &str,
        id: &DocumentId,
        fields: Fields,
        write_mode: WriteMode,
    ) -> Result<(), DocumentStoreError> {
        let (values, server_timestamps) = encode_fields(fields);
        let field_paths: Vec<String> =
            values.keys().map(|field| quote_field_path(field)).collect();

        let mut write = json!({
            "update": {
                "name": self.document_name(collection, id),
                "fields": values,
            }
        });
        match write_mode {
            WriteMode::Create => {
                write["currentDocument"] = json!({ "exists": false });
            }
            WriteMode::Replace => {}
            WriteMode::Merge => {
                write["updateMask"] = json!({ "fieldPaths": field_paths });
                write["currentDocument"] = json!({ "exists": true });
            }
        }
        if !server_timestamps.is_empty() {
            let transforms: Vec<Value> = server_timestamps
                .iter()
                .map(|field| {
                    json!({
                        "fieldPath": quote_field_path(field),
                        "setToServerValue": "REQUEST_TIME",
                    })
                })
                .collect();
            write["updateTransforms"] = Value::Array(transforms);
        }

        let url = format!("{}:commit", self.documents_url());
        let response = self
            .send(
                self.request(Method::POST, &url)
                    .json(&json!({ "writes": [write] })),
            )
            .await?;
        check_status(response, Some(id)).await?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
enum WriteMode {
    Create,
    Replace,
    Merge,
}

#[derive(Debug, Deserialize)]
struct RawDocument {
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct RunQueryItem {
    document: Option<RawDocument>,
}

async fn check_status(
    response: Response,
    id: Option<&DocumentId>,
) -> Result<Response, DocumentStoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    match (status, id) {
        (StatusCode::NOT_FOUND, Some(id)) => {
            Err(DocumentStoreError::DocumentNotFound(id.clone()))
        }
        (StatusCode::CONFLICT, Some(id)) => {
            Err(DocumentStoreError::DocumentExists(id.clone()))
        }
        _ => {
            let body = response.text().await.unwrap_or_default();
            Err(DocumentStoreError::UnexpectedError(eyre!(
                "Firestore returned {status}: {body}"
            )))
        }
    }
}

fn quote_field_path(field: &str) -> String {
    if SIMPLE_FIELD_PATH.is_match(field) {
        field.to_owned()
    } else {
        format!("`{}`", field.replace('\\', "\\\\").replace('`', "\\`"))
    }
}

/// Splits a write into encoded values and the fields that should receive
/// the server's commit time.
fn encode_fields(fields: Fields) -> (Map<String, Value>, Vec<String>) {
    let mut values = Map::new();
    let mut server_timestamps = Vec::new();
    for (field, value) in fields {
        match encode_value(&value) {
            Some(encoded) => {
                values.insert(field, encoded);
            }
            None => server_timestamps.push(field),
        }
    }
    (values, server_timestamps)
}

fn encode_value(value: &FieldValue) -> Option<Value> {
    let encoded = match value {
        FieldValue::Null => json!({ "nullValue": null }),
        FieldValue::Boolean(b) => json!({ "booleanValue": b }),
        FieldValue::Integer(i) => json!({ "integerValue": i.to_string() }),
        FieldValue::Double(d) => json!({ "doubleValue": d }),
        FieldValue::String(s) => json!({ "stringValue": s }),
        FieldValue::Timestamp(ts) => json!({
            "timestampValue": ts.to_rfc3339_opts(SecondsFormat::Micros, true)
        }),
        FieldValue::ServerTimestamp => return None,
    };
    Some(encoded)
}

fn decode_value(value: &Value) -> Option<FieldValue> {
    let (kind, inner) = value.as_object()?.iter().next()?;
    match kind.as_str() {
        "nullValue" => Some(FieldValue::Null),
        "booleanValue" => inner.as_bool().map(FieldValue::Boolean),
        "integerValue" => inner
            .as_str()
            .and_then(|i| i.parse().ok())
            .or_else(|| inner.as_i64())
            .map(FieldValue::Integer),
        "doubleValue" => inner.as_f64().map(FieldValue::Double),
        "stringValue" => {
            inner.as_str().map(|s| FieldValue::String(s.to_owned()))
        }
        "timestampValue" => inner
            .as_str()
            .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
            .map(|ts| FieldValue::Timestamp(ts.with_timezone(&Utc))),
        _ => None,
    }
}

fn decode_document(raw: RawDocument) -> Result<Document, DocumentStoreError> {
    let key = raw.name.rsplit('/').next().unwrap_or_default();
    let id = DocumentId::parse(key)
        .map_err(|e| DocumentStoreError::UnexpectedError(eyre!(e)))?;

    let mut fields = Fields::new();
    for (field, value) in raw.fields {
        match decode_value(&value) {
            Some(decoded) => {
                fields.insert(field, decoded);
            }
            None => tracing::warn!(
                document = %raw.name,
                field = %field,
                "Skipping field with unsupported Firestore type"
            ),
        }
    }
    Ok(Document::new(id, fields))
}

#[async_trait::async_trait]
impl DocumentStore for FirestoreDocumentStore {
    async fn add_document(
        &self,
        collection: &str,
        fields: Fields,
    ) -> Result<DocumentId, DocumentStoreError> {
        let id = self.new_document_id();
        self.create_document(collection, &id, fields).await?;
        Ok(id)
    }

    #[tracing::instrument(name = "Creating document in Firestore", skip_all)]
    async fn create_document(
        &self,
        collection: &str,
        id: &DocumentId,
        fields: Fields,
    ) -> Result<(), DocumentStoreError> {
        self.commit(collection, id, fields, WriteMode::Create).await
    }

    #[tracing::instrument(name = "Setting document in Firestore", skip_all)]
    async fn set_document(
        &self,
        collection: &str,
        id: &DocumentId,
        fields: Fields,
    ) -> Result<(), DocumentStoreError> {
        self.commit(collection, id, fields, WriteMode::Replace).await
    }

    #[tracing::instrument(name = "Updating document in Firestore", skip_all)]
    async fn update_document(
        &self,
        collection: &str,
        id: &DocumentId,
        fields: Fields,
    ) -> Result<(), DocumentStoreError> {
        self.commit(collection, id, fields, WriteMode::Merge).await
    }

    #[tracing::instrument(name = "Getting document from Firestore", skip_all)]
    async fn get_document(
        &self,
        collection: &str,
        id: &DocumentId,
    ) -> Result<Document, DocumentStoreError> {
        let url = self.document_url(collection, id)?;
        let response = self.send(self.request(Method::GET, url)).await?;
        let raw = check_status(response, Some(id))
            .await?
            .json::<RawDocument>()
            .await
            .wrap_err("failed to parse Firestore document")
            .map_err(DocumentStoreError::UnexpectedError)?;
        decode_document(raw)
    }

    #[tracing::instrument(name = "Deleting document from Firestore", skip_all)]
    async fn delete_document(
        &self,
        collection: &str,
        id: &DocumentId,
    ) -> Result<(), DocumentStoreError> {
        let url = self.document_url(collection, id)?;
        let response = self.send(self.request(Method::DELETE, url)).await?;
        match check_status(response, Some(id)).await {
            Ok(_) | Err(DocumentStoreError::DocumentNotFound(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }

    #[tracing::instrument(name = "Querying Firestore collection", skip_all)]
    async fn query(
        &self,
        collection: &str,
        order_by: Option<OrderBy>,
    ) -> Result<Vec<Document>, DocumentStoreError> {
        let mut structured_query = json!({
            "from": [{ "collectionId": collection }],
        });
        if let Some(order_by) = order_by {
            let direction = match order_by.direction {
                Direction::Ascending => "ASCENDING",
                Direction::Descending => "DESCENDING",
            };
            structured_query["orderBy"] = json!([{
                "field": { "fieldPath": quote_field_path(&order_by.field) },
                "direction": direction,
            }]);
        }

        let url = format!("{}:runQuery", self.documents_url());
        let response = self
            .send(
                self.request(Method::POST, &url)
                    .json(&json!({ "structuredQuery": structured_query })),
            )
            .await?;
        let items = check_status(response, None)
            .await?
            .json::<Vec<RunQueryItem>>()
            .await
            .wrap_err("failed to parse Firestore query response")
            .map_err(DocumentStoreError::UnexpectedError)?;

        items
            .into_iter()
            .filter_map(|item| item.document)
            .map(decode_document)
            .collect()
    }

    #[tracing::instrument(name = "Polling Firestore collection", skip_all)]
    async fn listen(
        &self,
        collection: &str,
        order_by: Option<OrderBy>,
    ) -> Result<SnapshotListener, DocumentStoreError> {
        let store = self.clone();
        let collection = collection.to_owned();

        Ok(SnapshotListener::spawn(move |sender| async move {
            let mut interval = tokio::time::interval(store.poll_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut last_seen: Option<Vec<Document>> = None;

            loop {
                interval.tick().await;
                let snapshot =
                    match store.query(&collection, order_by.clone()).await {
                        Ok(documents) => {
                            if last_seen.as_ref() == Some(&documents) {
                                continue;
                            }
                            last_seen = Some(documents.clone());
                            Ok(documents)
                        }
                        Err(e) => {
                            tracing::warn!(
                                collection = %collection,
                                error = %e,
                                "Failed to poll Firestore collection"
                            );
                            // Re-emit the next good result after a failure.
                            last_seen = None;
                            Err(e)
                        }
                    };
                if sender.send(snapshot).await.is_err() {
                    return;
                }
            }
        }))
    }
}
