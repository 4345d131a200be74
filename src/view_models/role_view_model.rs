use std::sync::Arc;

use tokio::{sync::watch, task::JoinHandle};
use tracing::Level;

use crate::{
    domain::Role, log_error_chain, navigation::StartDestination,
    repositories::RolePreferences,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleState {
    pub is_loading: bool,
    pub role: Option<Role>,
}

impl Default for RoleState {
    fn default() -> Self {
        Self {
            is_loading: true,
            role: None,
        }
    }
}

/// Tracks the persisted role and decides where the app starts.
pub struct RoleViewModel {
    preferences: RolePreferences,
    state: Arc<watch::Sender<RoleState>>,
    listener: JoinHandle<()>,
}

impl RoleViewModel {
    /// Must be called from within a Tokio runtime.
    pub fn new(preferences: RolePreferences) -> Self {
        let state = Arc::new(watch::channel(RoleState::default()).0);
        let mut changes = preferences.changes();

        let listener = tokio::spawn({
            let state = Arc::clone(&state);
            async move {
                while let Some(role) = changes.next().await {
                    let role = role.unwrap_or_else(|e| {
                        log_error_chain(&e, Level::WARN);
                        None
                    });
                    tracing::debug!(?role, "Role changed");
                    state.send_replace(RoleState {
                        is_loading: false,
                        role,
                    });
                }
            }
        });

        Self {
            preferences,
            state,
            listener,
        }
    }

    pub fn state(&self) -> watch::Receiver<RoleState> {
        self.state.subscribe()
    }

    pub fn current(&self) -> RoleState {
        self.state.borrow().clone()
    }

    pub fn start_destination(&self) -> StartDestination {
        let state = self.state.borrow();
        StartDestination::resolve(state.is_loading, state.role)
    }

    /// Persists the choice in the background. The new role shows up in
    /// [`RoleViewModel::state`] once written.
    pub fn select_role(&self, role: Role) -> JoinHandle<()> {
        let preferences = self.preferences.clone();
        tokio::spawn(async move {
            if let Err(e) = preferences.save_role(role).await {
                log_error_chain(&e, Level::ERROR);
            }
        })
    }

    /// Forgets the stored role in the background.
    pub fn logout(&self) -> JoinHandle<()> {
        let preferences = self.preferences.clone();
        tokio::spawn(async move {
            if let Err(e) = preferences.clear_role().await {
                log_error_chain(&e, Level::ERROR);
            }
        })
    }
}

impl Drop for RoleViewModel {
    fn drop(&mut self) {
        self.listener.abort();
    }
}
