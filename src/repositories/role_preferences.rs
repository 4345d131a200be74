use tokio::sync::broadcast::{self, error::RecvError};

use crate::{
    app_state::PreferenceStoreType,
    domain::{PreferenceStoreError, Role},
    utils::constants::ROLE_PREFERENCE_KEY,
};

/// The persisted role choice.
#[derive(Clone)]
pub struct RolePreferences {
    store: PreferenceStoreType,
}

impl RolePreferences {
    pub fn new(store: PreferenceStoreType) -> Self {
        Self { store }
    }

    #[tracing::instrument(name = "Saving role", skip(self))]
    pub async fn save_role(
        &self,
        role: Role,
    ) -> Result<(), PreferenceStoreError> {
        self.store.set(ROLE_PREFERENCE_KEY, role.as_str()).await
    }

    #[tracing::instrument(name = "Clearing role", skip_all)]
    pub async fn clear_role(&self) -> Result<(), PreferenceStoreError> {
        self.store.remove(ROLE_PREFERENCE_KEY).await
    }

    /// A stored value that is not a known role reads as no role.
    pub async fn role(&self) -> Result<Option<Role>, PreferenceStoreError> {
        let stored = self.store.get(ROLE_PREFERENCE_KEY).await?;
        Ok(stored.and_then(|value| match Role::parse(&value) {
            Ok(role) => Some(role),
            Err(e) => {
                tracing::warn!(stored = %value, "Ignoring stored role: {e}");
                None
            }
        }))
    }

    /// Starts watching the role. Changes made after this call are never
    /// missed.
    pub fn changes(&self) -> RoleChanges {
        RoleChanges {
            preferences: self.clone(),
            receiver: self.store.subscribe(),
            started: false,
        }
    }
}

pub struct RoleChanges {
    preferences: RolePreferences,
    receiver: broadcast::Receiver<String>,
    started: bool,
}

impl RoleChanges {
    /// The first call yields the current role, later calls wait for the role
    /// key to be written or removed. `None` once the store has gone away.
    pub async fn next(
        &mut self,
    ) -> Option<Result<Option<Role>, PreferenceStoreError>> {
        if self.started {
            loop {
                match self.receiver.recv().await {
                    Ok(key) if key == ROLE_PREFERENCE_KEY => break,
                    Ok(_) => continue,
                    // Missed notifications, re-read to catch up.
                    Err(RecvError::Lagged(_)) => break,
                    Err(RecvError::Closed) => return None,
                }
            }
        }
        self.started = true;
        Some(self.preferences.role().await)
    }
}
