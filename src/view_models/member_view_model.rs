use tokio::sync::watch;

use super::{Projection, StatusSlot};
use crate::{
    domain::{
        DirectoryStats, DocumentId, Member, MemberDetails, MemberFilter,
        OperationStatus,
    },
    repositories::MemberRepository,
};

/// State behind the member directory and member management screens.
///
/// Every successful mutation is followed by a full re-fetch, so the list is
/// only ever replaced wholesale from the store.
pub struct MemberViewModel {
    repository: MemberRepository,
    members: watch::Sender<Vec<Member>>,
    fetch_state: StatusSlot,
    add_member_state: StatusSlot,
    update_member_state: StatusSlot,
    delete_member_state: StatusSlot,
}

impl MemberViewModel {
    pub fn new(repository: MemberRepository) -> Self {
        let (members, _) = watch::channel(Vec::new());
        Self {
            repository,
            members,
            fetch_state: StatusSlot::new(),
            add_member_state: StatusSlot::new(),
            update_member_state: StatusSlot::new(),
            delete_member_state: StatusSlot::new(),
        }
    }

    /// Builds the view model and performs the initial fetch.
    pub async fn load(repository: MemberRepository) -> Self {
        let view_model = Self::new(repository);
        view_model.fetch_members().await;
        view_model
    }

    pub fn members(&self) -> watch::Receiver<Vec<Member>> {
        self.members.subscribe()
    }

    pub fn current_members(&self) -> Vec<Member> {
        self.members.borrow().clone()
    }

    /// On failure the previous list is kept and the error lands in the
    /// fetch status.
    #[tracing::instrument(name = "Fetching members", skip_all)]
    pub async fn fetch_members(&self) {
        self.fetch_state.set(OperationStatus::Loading);
        match self.repository.fetch_all().await {
            Ok(members) => {
                tracing::debug!(count = members.len(), "Members fetched");
                self.members.send_replace(members);
                self.fetch_state.set(OperationStatus::Success);
            }
            Err(e) => self.fetch_state.fail("Failed to load members", &e),
        }
    }

    #[tracing::instrument(name = "Adding member", skip_all)]
    pub async fn add_member(
        &self,
        name: &str,
        role: &str,
        domain: &str,
        contact: Option<&str>,
    ) {
        let details = match MemberDetails::parse(name, role, domain, contact)
        {
            Ok(details) => details,
            Err(e) => {
                self.add_member_state
                    .set(OperationStatus::Error(e.as_ref().to_owned()));
                return;
            }
        };

        self.add_member_state.set(OperationStatus::Loading);
        match self.repository.add(details).await {
            Ok(member) => {
                tracing::info!(member_id = %member.id, "Member added");
                self.fetch_members().await;
                self.add_member_state.set(OperationStatus::Success);
            }
            Err(e) => self.add_member_state.fail("Failed to add member", &e),
        }
    }

    /// Replaces the stored member with `member`, validated like a new one.
    #[tracing::instrument(
        name = "Updating member",
        skip_all,
        fields(member_id = %member.id)
    )]
    pub async fn update_member(&self, member: Member) {
        let details = match MemberDetails::from_member(&member) {
            Ok(details) => details,
            Err(e) => {
                self.update_member_state
                    .set(OperationStatus::Error(e.as_ref().to_owned()));
                return;
            }
        };

        self.update_member_state.set(OperationStatus::Loading);
        match self.repository.update(&member.id, &details).await {
            Ok(()) => {
                self.fetch_members().await;
                self.update_member_state.set(OperationStatus::Success);
            }
            Err(e) => self
                .update_member_state
                .fail("Failed to update member", &e),
        }
    }

    #[tracing::instrument(
        name = "Deleting member",
        skip(self),
        fields(member_id = %id)
    )]
    pub async fn delete_member(&self, id: &DocumentId) {
        self.delete_member_state.set(OperationStatus::Loading);
        match self.repository.delete(id).await {
            Ok(()) => {
                self.fetch_members().await;
                self.delete_member_state.set(OperationStatus::Success);
            }
            Err(e) => self
                .delete_member_state
                .fail("Failed to delete member", &e),
        }
    }

    /// The member with `id` in the current list, following later fetches.
    pub fn member_by_id(
        &self,
        id: &DocumentId,
    ) -> Projection<Vec<Member>, Option<Member>> {
        let id = id.clone();
        Projection::new(self.members.subscribe(), move |members: &Vec<Member>| {
            members.iter().find(|member| member.id == id).cloned()
        })
    }

    pub fn filtered(&self, filter: &MemberFilter) -> Vec<Member> {
        filter.apply(&self.members.borrow())
    }

    pub fn stats(&self, filter: &MemberFilter) -> DirectoryStats {
        filter.stats(&self.members.borrow())
    }

    pub fn fetch_state(&self) -> watch::Receiver<OperationStatus> {
        self.fetch_state.subscribe()
    }

    pub fn add_member_state(&self) -> watch::Receiver<OperationStatus> {
        self.add_member_state.subscribe()
    }

    pub fn update_member_state(&self) -> watch::Receiver<OperationStatus> {
        self.update_member_state.subscribe()
    }

    pub fn delete_member_state(&self) -> watch::Receiver<OperationStatus> {
        self.delete_member_state.subscribe()
    }

    pub fn reset_fetch_state(&self) {
        self.fetch_state.reset();
    }

    pub fn reset_add_member_state(&self) {
        self.add_member_state.reset();
    }

    pub fn reset_update_member_state(&self) {
        self.update_member_state.reset();
    }

    pub fn reset_delete_member_state(&self) {
        self.delete_member_state.reset();
    }
}
