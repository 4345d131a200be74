use crate::{
    app_state::DocumentStoreType,
    domain::{
        sort_newest_first, Announcement, AnnouncementDraft, Document,
        DocumentId, DocumentStoreError, ListenerRegistration,
    },
    utils::constants::collections,
};

/// The `announcements` collection.
#[derive(Clone)]
pub struct AnnouncementRepository {
    store: DocumentStoreType,
}

impl AnnouncementRepository {
    pub fn new(store: DocumentStoreType) -> Self {
        Self { store }
    }

    /// Stores the draft in a single write under a freshly generated id, with
    /// the id embedded in the document itself.
    #[tracing::instrument(name = "Adding announcement to store", skip_all)]
    pub async fn add(
        &self,
        draft: &AnnouncementDraft,
    ) -> Result<DocumentId, DocumentStoreError> {
        let id = self.store.new_document_id();
        self.store
            .create_document(
                collections::ANNOUNCEMENTS,
                &id,
                draft.to_fields(&id),
            )
            .await?;
        Ok(id)
    }

    #[tracing::instrument(
        name = "Fetching all announcements from store",
        skip_all
    )]
    pub async fn fetch_all(
        &self,
    ) -> Result<Vec<Announcement>, DocumentStoreError> {
        let order = Some(Announcement::feed_order());
        let documents =
            self.store.query(collections::ANNOUNCEMENTS, order).await?;
        Ok(to_announcements(&documents))
    }

    /// Calls `on_change` with the full newest-first list every time the
    /// collection changes, and `on_error` when a snapshot fails. Callbacks
    /// stop once the returned registration is dropped.
    #[tracing::instrument(name = "Subscribing to announcements", skip_all)]
    pub async fn subscribe<F, E>(
        &self,
        on_change: F,
        on_error: E,
    ) -> Result<ListenerRegistration, DocumentStoreError>
    where
        F: Fn(Vec<Announcement>) + Send + 'static,
        E: Fn(DocumentStoreError) + Send + 'static,
    {
        let order = Some(Announcement::feed_order());
        let mut listener =
            self.store.listen(collections::ANNOUNCEMENTS, order).await?;

        let task = tokio::spawn(async move {
            while let Some(snapshot) = listener.next().await {
                match snapshot {
                    Ok(documents) => on_change(to_announcements(&documents)),
                    Err(e) => on_error(e),
                }
            }
            tracing::debug!("Announcement listener finished");
        });

        Ok(ListenerRegistration::new(task))
    }
}

fn to_announcements(documents: &[Document]) -> Vec<Announcement> {
    let mut announcements: Vec<Announcement> =
        documents.iter().map(Announcement::from_document).collect();
    sort_newest_first(&mut announcements);
    announcements
}
