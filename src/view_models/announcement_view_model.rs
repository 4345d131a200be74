use std::sync::Arc;

use tokio::sync::{watch, Mutex};

use super::{Projection, StatusSlot};
use crate::{
    domain::{
        Announcement, AnnouncementDraft, DocumentId, ListenerRegistration,
        OperationStatus,
    },
    repositories::AnnouncementRepository,
};

/// State behind the announcement feed and the post screen.
pub struct AnnouncementViewModel {
    repository: AnnouncementRepository,
    announcements: Arc<watch::Sender<Vec<Announcement>>>,
    ui_state: StatusSlot,
    post_state: StatusSlot,
    // At most one live subscription. Dropping it stops the feed.
    registration: Mutex<Option<ListenerRegistration>>,
}

impl AnnouncementViewModel {
    /// Builds the view model and subscribes to the feed.
    pub async fn new(repository: AnnouncementRepository) -> Self {
        let (announcements, _) = watch::channel(Vec::new());
        let view_model = Self {
            repository,
            announcements: Arc::new(announcements),
            ui_state: StatusSlot::new(),
            post_state: StatusSlot::new(),
            registration: Mutex::new(None),
        };
        view_model.fetch_announcements().await;
        view_model
    }

    /// Replaces the current subscription with a fresh one.
    #[tracing::instrument(name = "Fetching announcements", skip_all)]
    pub async fn fetch_announcements(&self) {
        self.ui_state.set(OperationStatus::Loading);

        let mut registration = self.registration.lock().await;
        registration.take();

        let announcements = Arc::clone(&self.announcements);
        let on_change_state = self.ui_state.clone();
        let on_error_state = self.ui_state.clone();
        let subscription = self
            .repository
            .subscribe(
                move |list| {
                    announcements.send_replace(list);
                    on_change_state.set(OperationStatus::Success);
                },
                move |e| {
                    on_error_state.fail("Failed to load announcements", &e)
                },
            )
            .await;

        match subscription {
            Ok(subscription) => *registration = Some(subscription),
            Err(e) => self.ui_state.fail("Failed to load announcements", &e),
        }
    }

    /// Ends the live subscription. The last list stays visible.
    pub async fn stop(&self) {
        if let Some(registration) = self.registration.lock().await.take() {
            registration.remove();
            tracing::debug!("Announcement subscription removed");
        }
    }

    pub async fn is_listening(&self) -> bool {
        self.registration
            .lock()
            .await
            .as_ref()
            .map(ListenerRegistration::is_active)
            .unwrap_or(false)
    }

    #[tracing::instrument(name = "Posting announcement", skip_all)]
    pub async fn post_announcement(
        &self,
        title: &str,
        message: &str,
        priority: &str,
    ) {
        let draft = match AnnouncementDraft::parse(title, message, priority) {
            Ok(draft) => draft,
            Err(e) => {
                self.post_state
                    .set(OperationStatus::Error(e.as_ref().to_owned()));
                return;
            }
        };

        self.post_state.set(OperationStatus::Loading);
        match self.repository.add(&draft).await {
            Ok(id) => {
                tracing::info!(announcement_id = %id, "Announcement posted");
                self.post_state.set(OperationStatus::Success);
            }
            Err(e) => self.post_state.fail("Failed to post announcement", &e),
        }
    }

    pub fn announcements(&self) -> watch::Receiver<Vec<Announcement>> {
        self.announcements.subscribe()
    }

    pub fn current_announcements(&self) -> Vec<Announcement> {
        self.announcements.borrow().clone()
    }

    pub fn announcement_by_id(
        &self,
        id: &DocumentId,
    ) -> Projection<Vec<Announcement>, Option<Announcement>> {
        let id = id.clone();
        Projection::new(
            self.announcements.subscribe(),
            move |announcements: &Vec<Announcement>| {
                announcements.iter().find(|a| a.id == id).cloned()
            },
        )
    }

    pub fn ui_state(&self) -> watch::Receiver<OperationStatus> {
        self.ui_state.subscribe()
    }

    pub fn post_state(&self) -> watch::Receiver<OperationStatus> {
        self.post_state.subscribe()
    }

    pub fn reset_state(&self) {
        self.ui_state.reset();
    }

    pub fn reset_post_state(&self) {
        self.post_state.reset();
    }
}
