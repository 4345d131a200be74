use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use color_eyre::eyre::WrapErr;
use tokio::sync::{broadcast, Mutex};

use crate::domain::{PreferenceStore, PreferenceStoreError};
use crate::utils::constants::PREFERENCES_FILE_NAME;

const CHANGE_BUFFER: usize = 16;

type Preferences = BTreeMap<String, String>;

/// Preferences kept as one JSON object on disk.
pub struct FilePreferenceStore {
    path: PathBuf,
    // Serialises read-modify-write cycles.
    write_lock: Mutex<()>,
    changes: broadcast::Sender<String>,
}

impl FilePreferenceStore {
    pub fn new(directory: impl AsRef<Path>) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_BUFFER);
        Self {
            path: directory.as_ref().join(PREFERENCES_FILE_NAME),
            write_lock: Mutex::new(()),
            changes,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Preferences, PreferenceStoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => serde_json::from_str(&contents)
                .wrap_err_with(|| {
                    format!("failed to parse {}", self.path.display())
                })
                .map_err(PreferenceStoreError::UnexpectedError),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Preferences::new()),
            Err(e) => Err(e)
                .wrap_err_with(|| {
                    format!("failed to read {}", self.path.display())
                })
                .map_err(PreferenceStoreError::UnexpectedError),
        }
    }

    async fn save(
        &self,
        preferences: &Preferences,
    ) -> Result<(), PreferenceStoreError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .wrap_err("failed to create preferences directory")
                .map_err(PreferenceStoreError::UnexpectedError)?;
        }

        let contents = serde_json::to_string_pretty(preferences)
            .wrap_err("failed to serialise preferences")
            .map_err(PreferenceStoreError::UnexpectedError)?;

        // Write then rename so readers never see a half-written file.
        let staging = self.path.with_extension("json.tmp");
        tokio::fs::write(&staging, contents)
            .await
            .wrap_err("failed to write preferences")
            .map_err(PreferenceStoreError::UnexpectedError)?;
        tokio::fs::rename(&staging, &self.path)
            .await
            .wrap_err("failed to replace preferences file")
            .map_err(PreferenceStoreError::UnexpectedError)
    }

    async fn modify<F>(
        &self,
        key: &str,
        change: F,
    ) -> Result<(), PreferenceStoreError>
    where
        F: FnOnce(&mut Preferences) + Send,
    {
        {
            let _guard = self.write_lock.lock().await;
            let mut preferences = self.load().await?;
            change(&mut preferences);
            self.save(&preferences).await?;
        }
        let _ = self.changes.send(key.to_owned());
        Ok(())
    }
}

#[async_trait::async_trait]
impl PreferenceStore for FilePreferenceStore {
    #[tracing::instrument(name = "Reading preference from file", skip(self))]
    async fn get(
        &self,
        key: &str,
    ) -> Result<Option<String>, PreferenceStoreError> {
        Ok(self.load().await?.remove(key))
    }

    #[tracing::instrument(name = "Writing preference to file", skip(self))]
    async fn set(
        &self,
        key: &str,
        value: &str,
    ) -> Result<(), PreferenceStoreError> {
        self.modify(key, |preferences| {
            preferences.insert(key.to_owned(), value.to_owned());
        })
        .await
    }

    #[tracing::instrument(name = "Removing preference from file", skip(self))]
    async fn remove(&self, key: &str) -> Result<(), PreferenceStoreError> {
        self.modify(key, |preferences| {
            preferences.remove(key);
        })
        .await
    }

    fn subscribe(&self) -> broadcast::Receiver<String> {
        self.changes.subscribe()
    }
}
