use std::{error::Error, sync::Arc};

use tokio::signal;
use tracing::Level;

pub mod app_state;
pub mod domain;
pub mod navigation;
pub mod repositories;
pub mod services;
pub mod utils;
pub mod view_models;

use app_state::AppState;
use repositories::{
    AnnouncementRepository, MemberRepository, RolePreferences,
};
use view_models::{AnnouncementViewModel, MemberViewModel, RoleViewModel};

pub fn log_error_chain(e: &(dyn Error + 'static), debug_level: Level) {
    let separator =
        "\n-----------------------------------------------------------------------------------\n";
    let mut report = format!("{}{:?}\n", separator, e);
    let mut current = e.source();
    while let Some(cause) = current {
        let str = format!("Caused by:\n\n{:?}", cause);
        report = format!("{}\n{}", report, str);
        current = cause.source();
    }
    report = format!("{}\n{}", report, separator);
    match debug_level {
        Level::ERROR => tracing::error!("{}", report),
        Level::WARN => tracing::warn!("{}", report),
        Level::INFO => tracing::info!("{}", report),
        Level::DEBUG => tracing::debug!("{}", report),
        Level::TRACE => tracing::trace!("{}", report),
    }
}

/// The client session: role, member directory and announcement feed over
/// one pair of stores.
pub struct Application {
    pub roles: Arc<RoleViewModel>,
    pub members: Arc<MemberViewModel>,
    pub announcements: Arc<AnnouncementViewModel>,
}

impl Application {
    pub async fn build(app_state: AppState) -> Self {
        let roles = RoleViewModel::new(RolePreferences::new(
            app_state.preference_store,
        ));
        let members = MemberViewModel::load(MemberRepository::new(
            app_state.document_store.clone(),
        ))
        .await;
        let announcements = AnnouncementViewModel::new(
            AnnouncementRepository::new(app_state.document_store),
        )
        .await;

        Application {
            roles: Arc::new(roles),
            members: Arc::new(members),
            announcements: Arc::new(announcements),
        }
    }

    /// Reports role and feed changes until a shutdown signal arrives.
    pub async fn run(self) {
        tracing::info!(
            members = self.members.current_members().len(),
            start = ?self.roles.start_destination(),
            "Session started"
        );

        let mut role_state = self.roles.state();
        let mut feed = self.announcements.announcements();
        let mut feed_status = self.announcements.ui_state();
        let shutdown = shutdown_signal();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                changed = role_state.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    tracing::info!(
                        start = ?self.roles.start_destination(),
                        "Role updated"
                    );
                }
                changed = feed.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let announcements = feed.borrow_and_update().clone();
                    match announcements.first() {
                        Some(latest) => tracing::info!(
                            count = announcements.len(),
                            latest = %latest.title,
                            priority = %latest.priority,
                            "Announcement feed updated"
                        ),
                        None => tracing::info!("Announcement feed is empty"),
                    }
                }
                changed = feed_status.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let status = feed_status.borrow_and_update().clone();
                    if let Some(message) = status.error_message() {
                        tracing::warn!(
                            error = message,
                            "Announcement feed failing"
                        );
                    }
                }
            }
        }

        self.announcements.stop().await;
        tracing::info!("Session ended");
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
