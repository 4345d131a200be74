use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{broadcast, broadcast::error::RecvError, RwLock};

use crate::domain::{
    Document, DocumentId, DocumentStore, DocumentStoreError, FieldValue,
    Fields, OrderBy, SnapshotListener,
};

const CHANGE_BUFFER: usize = 64;

type Collection = BTreeMap<DocumentId, Fields>;

/// In-process document store. Clones share the same data.
#[derive(Clone)]
pub struct HashmapDocumentStore {
    collections: Arc<RwLock<HashMap<String, Collection>>>,
    changes: broadcast::Sender<String>,
}

impl HashmapDocumentStore {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_BUFFER);
        Self {
            collections: Arc::new(RwLock::new(HashMap::new())),
            changes,
        }
    }

    fn notify(&self, collection: &str) {
        // Nobody listening is fine.
        let _ = self.changes.send(collection.to_owned());
    }
}

impl Default for HashmapDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

fn resolve_server_timestamps(mut fields: Fields) -> Fields {
    let now = Utc::now();
    for value in fields.values_mut() {
        if *value == FieldValue::ServerTimestamp {
            *value = FieldValue::Timestamp(now);
        }
    }
    fields
}

#[async_trait::async_trait]
impl DocumentStore for HashmapDocumentStore {
    async fn add_document(
        &self,
        collection: &str,
        fields: Fields,
    ) -> Result<DocumentId, DocumentStoreError> {
        let id = self.new_document_id();
        self.create_document(collection, &id, fields).await?;
        Ok(id)
    }

    #[tracing::instrument(name = "Creating document in memory", skip_all)]
    async fn create_document(
        &self,
        collection: &str,
        id: &DocumentId,
        fields: Fields,
    ) -> Result<(), DocumentStoreError> {
        {
            let mut collections = self.collections.write().await;
            let documents =
                collections.entry(collection.to_owned()).or_default();
            if documents.contains_key(id) {
                return Err(DocumentStoreError::DocumentExists(id.clone()));
            }
            documents.insert(id.clone(), resolve_server_timestamps(fields));
        }
        self.notify(collection);
        Ok(())
    }

    #[tracing::instrument(name = "Setting document in memory", skip_all)]
    async fn set_document(
        &self,
        collection: &str,
        id: &DocumentId,
        fields: Fields,
    ) -> Result<(), DocumentStoreError> {
        self.collections
            .write()
            .await
            .entry(collection.to_owned())
            .or_default()
            .insert(id.clone(), resolve_server_timestamps(fields));
        self.notify(collection);
        Ok(())
    }

    #[tracing::instrument(name = "Updating document in memory", skip_all)]
    async fn update_document(
        &self,
        collection: &str,
        id: &DocumentId,
        fields: Fields,
    ) -> Result<(), DocumentStoreError> {
        {
            let mut collections = self.collections.write().await;
            let document = collections
                .get_mut(collection)
                .and_then(|documents| documents.get_mut(id))
                .ok_or_else(|| {
                    DocumentStoreError::DocumentNotFound(id.clone())
                })?;
            document.extend(resolve_server_timestamps(fields));
        }
        self.notify(collection);
        Ok(())
    }

    async fn get_document(
        &self,
        collection: &str,
        id: &DocumentId,
    ) -> Result<Document, DocumentStoreError> {
        match self
            .collections
            .read()
            .await
            .get(collection)
            .and_then(|documents| documents.get(id))
        {
            Some(fields) => Ok(Document::new(id.clone(), fields.clone())),
            None => Err(DocumentStoreError::DocumentNotFound(id.clone())),
        }
    }

    #[tracing::instrument(name = "Deleting document in memory", skip_all)]
    async fn delete_document(
        &self,
        collection: &str,
        id: &DocumentId,
    ) -> Result<(), DocumentStoreError> {
        let removed = self
            .collections
            .write()
            .await
            .get_mut(collection)
            .and_then(|documents| documents.remove(id));
        if removed.is_some() {
            self.notify(collection);
        }
        Ok(())
    }

    async fn query(
        &self,
        collection: &str,
        order_by: Option<OrderBy>,
    ) -> Result<Vec<Document>, DocumentStoreError> {
        let documents: Vec<Document> = self
            .collections
            .read()
            .await
            .get(collection)
            .map(|documents| {
                documents
                    .iter()
                    .map(|(id, fields)| Document::new(id.clone(), fields.clone()))
                    .collect()
            })
            .unwrap_or_default();

        Ok(match order_by {
            Some(order_by) => order_by.apply(documents),
            None => documents,
        })
    }

    #[tracing::instrument(name = "Listening to collection in memory", skip_all)]
    async fn listen(
        &self,
        collection: &str,
        order_by: Option<OrderBy>,
    ) -> Result<SnapshotListener, DocumentStoreError> {
        // Subscribe before the first read so no write slips between them.
        let mut changes = self.changes.subscribe();
        let store = self.clone();
        let collection = collection.to_owned();

        Ok(SnapshotListener::spawn(move |sender| async move {
            loop {
                let snapshot = store.query(&collection, order_by.clone()).await;
                if sender.send(snapshot).await.is_err() {
                    return;
                }

                loop {
                    match changes.recv().await {
                        Ok(changed) if changed == collection => break,
                        Ok(_) => continue,
                        Err(RecvError::Lagged(_)) => break,
                        Err(RecvError::Closed) => return,
                    }
                }
            }
        }))
    }
}
