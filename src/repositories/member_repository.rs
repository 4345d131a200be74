use crate::{
    app_state::DocumentStoreType,
    domain::{DocumentId, DocumentStoreError, Member, MemberDetails},
    utils::constants::collections,
};

/// The `members` collection.
#[derive(Clone)]
pub struct MemberRepository {
    store: DocumentStoreType,
}

impl MemberRepository {
    pub fn new(store: DocumentStoreType) -> Self {
        Self { store }
    }

    #[tracing::instrument(name = "Adding member to store", skip_all)]
    pub async fn add(
        &self,
        details: MemberDetails,
    ) -> Result<Member, DocumentStoreError> {
        let id = self
            .store
            .add_document(collections::MEMBERS, details.to_fields())
            .await?;
        Ok(Member::with_details(id, details))
    }

    /// Overwrites the whole member document.
    #[tracing::instrument(
        name = "Updating member in store",
        skip(self, details),
        fields(member_id = %id)
    )]
    pub async fn update(
        &self,
        id: &DocumentId,
        details: &MemberDetails,
    ) -> Result<(), DocumentStoreError> {
        self.store
            .set_document(collections::MEMBERS, id, details.to_fields())
            .await
    }

    #[tracing::instrument(name = "Fetching all members from store", skip_all)]
    pub async fn fetch_all(&self) -> Result<Vec<Member>, DocumentStoreError> {
        let documents = self.store.query(collections::MEMBERS, None).await?;
        Ok(documents.iter().map(Member::from_document).collect())
    }

    #[tracing::instrument(
        name = "Deleting member from store",
        skip(self),
        fields(member_id = %id)
    )]
    pub async fn delete(
        &self,
        id: &DocumentId,
    ) -> Result<(), DocumentStoreError> {
        self.store.delete_document(collections::MEMBERS, id).await
    }
}
