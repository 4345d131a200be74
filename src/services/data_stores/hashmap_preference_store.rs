use std::collections::HashMap;

use tokio::sync::{broadcast, RwLock};

use crate::domain::{PreferenceStore, PreferenceStoreError};

const CHANGE_BUFFER: usize = 16;

pub struct HashmapPreferenceStore {
    values: RwLock<HashMap<String, String>>,
    changes: broadcast::Sender<String>,
}

impl Default for HashmapPreferenceStore {
    fn default() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_BUFFER);
        Self {
            values: RwLock::new(HashMap::new()),
            changes,
        }
    }
}

#[async_trait::async_trait]
impl PreferenceStore for HashmapPreferenceStore {
    async fn get(
        &self,
        key: &str,
    ) -> Result<Option<String>, PreferenceStoreError> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(
        &self,
        key: &str,
        value: &str,
    ) -> Result<(), PreferenceStoreError> {
        self.values
            .write()
            .await
            .insert(key.to_owned(), value.to_owned());
        let _ = self.changes.send(key.to_owned());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), PreferenceStoreError> {
        self.values.write().await.remove(key);
        let _ = self.changes.send(key.to_owned());
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<String> {
        self.changes.subscribe()
    }
}
