use std::sync::Arc;

use crate::domain::{DocumentStore, PreferenceStore};

pub type DocumentStoreType = Arc<dyn DocumentStore + Send + Sync>;
pub type PreferenceStoreType = Arc<dyn PreferenceStore + Send + Sync>;

#[derive(Clone)]
pub struct AppState {
    pub document_store: DocumentStoreType,
    pub preference_store: PreferenceStoreType,
}

impl AppState {
    pub fn new(
        document_store: DocumentStoreType,
        preference_store: PreferenceStoreType,
    ) -> Self {
        Self {
            document_store,
            preference_store,
        }
    }
}
