use std::sync::Arc;

use color_eyre::eyre::Result;
use reqwest::Client;
use sociostack::{
    app_state::AppState,
    services::data_stores::{FilePreferenceStore, FirestoreDocumentStore},
    utils::{
        constants::{
            prod, FIRESTORE_API_KEY, FIRESTORE_BASE_URL, FIRESTORE_PROJECT_ID,
            PREFERENCES_DIR,
        },
        tracing::init_tracing,
    },
    Application,
};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing()?;

    let http_client = Client::builder()
        .timeout(prod::firestore::TIMEOUT)
        .build()?;
    let document_store = Arc::new(
        FirestoreDocumentStore::new(
            FIRESTORE_BASE_URL.to_owned(),
            &FIRESTORE_PROJECT_ID,
            FIRESTORE_API_KEY.clone(),
            http_client,
        )
        .with_poll_interval(prod::firestore::POLL_INTERVAL),
    );
    let preference_store =
        Arc::new(FilePreferenceStore::new(PREFERENCES_DIR.as_str()));

    let app_state = AppState::new(document_store, preference_store);
    let app = Application::build(app_state).await;
    app.run().await;

    Ok(())
}
