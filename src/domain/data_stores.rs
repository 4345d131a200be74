use super::{Document, DocumentId, Fields, OrderBy, SnapshotListener};
use color_eyre::eyre::Report;
use thiserror::Error;
use tokio::sync::broadcast;

/// A collection-oriented remote database.
///
/// Writes may carry `FieldValue::ServerTimestamp`, which the store replaces
/// with its commit time. Reads never return the sentinel.
#[async_trait::async_trait]
pub trait DocumentStore {
    fn new_document_id(&self) -> DocumentId {
        DocumentId::generate()
    }

    /// Inserts a document under a store-assigned id.
    async fn add_document(
        &self,
        collection: &str,
        fields: Fields,
    ) -> Result<DocumentId, DocumentStoreError>;

    /// Inserts a document under `id`, failing if one already exists.
    async fn create_document(
        &self,
        collection: &str,
        id: &DocumentId,
        fields: Fields,
    ) -> Result<(), DocumentStoreError>;

    /// Replaces the whole document at `id`, creating it if needed.
    async fn set_document(
        &self,
        collection: &str,
        id: &DocumentId,
        fields: Fields,
    ) -> Result<(), DocumentStoreError>;

    /// Merges `fields` into an existing document.
    async fn update_document(
        &self,
        collection: &str,
        id: &DocumentId,
        fields: Fields,
    ) -> Result<(), DocumentStoreError>;

    async fn get_document(
        &self,
        collection: &str,
        id: &DocumentId,
    ) -> Result<Document, DocumentStoreError>;

    /// Deleting a document that does not exist is not an error.
    async fn delete_document(
        &self,
        collection: &str,
        id: &DocumentId,
    ) -> Result<(), DocumentStoreError>;

    /// Reads the whole collection, in document id order unless `order_by`
    /// is given.
    async fn query(
        &self,
        collection: &str,
        order_by: Option<OrderBy>,
    ) -> Result<Vec<Document>, DocumentStoreError>;

    /// Emits the current query result, then a fresh one after every change.
    async fn listen(
        &self,
        collection: &str,
        order_by: Option<OrderBy>,
    ) -> Result<SnapshotListener, DocumentStoreError>;
}

#[derive(Debug, Error)]
pub enum DocumentStoreError {
    #[error("Document not found: {0}")]
    DocumentNotFound(DocumentId),
    #[error("Document already exists: {0}")]
    DocumentExists(DocumentId),
    #[error("Unexpected error")]
    UnexpectedError(#[source] Report),
}

impl PartialEq for DocumentStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::DocumentNotFound(_), Self::DocumentNotFound(_))
                | (Self::DocumentExists(_), Self::DocumentExists(_))
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}

/// On-device key-value storage for small string preferences.
#[async_trait::async_trait]
pub trait PreferenceStore {
    async fn get(
        &self,
        key: &str,
    ) -> Result<Option<String>, PreferenceStoreError>;
    async fn set(
        &self,
        key: &str,
        value: &str,
    ) -> Result<(), PreferenceStoreError>;
    async fn remove(&self, key: &str) -> Result<(), PreferenceStoreError>;

    /// Receives the key of every successful write.
    fn subscribe(&self) -> broadcast::Receiver<String>;
}

#[derive(Debug, Error)]
pub enum PreferenceStoreError {
    #[error("Unexpected error")]
    UnexpectedError(#[source] Report),
}

impl PartialEq for PreferenceStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}
