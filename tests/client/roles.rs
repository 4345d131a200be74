use crate::helpers::{wait_for_role, TestApp};
use sociostack::{
    app_state::{AppState, PreferenceStoreType},
    domain::{PreferenceStore, Role},
    navigation::{Screen, StartDestination},
    services::data_stores::{
        FilePreferenceStore, HashmapDocumentStore, HashmapPreferenceStore,
    },
    utils::constants::ROLE_PREFERENCE_KEY,
    Application,
};
use std::sync::Arc;
use test_context::test_context;
use uuid::Uuid;

async fn build_app(preference_store: PreferenceStoreType) -> Application {
    let document_store = Arc::new(HashmapDocumentStore::default());
    Application::build(AppState::new(document_store, preference_store)).await
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_start_at_role_selection_without_a_stored_role(
    app: &mut TestApp,
) {
    let state = app.wait_for_role(None).await;

    assert!(!state.is_loading);
    assert_eq!(
        app.app.roles.start_destination(),
        StartDestination::Screen(Screen::RoleSelection)
    );
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_follow_role_selection_and_logout(app: &mut TestApp) {
    app.app.roles.select_role(Role::Member).await.unwrap();
    app.wait_for_role(Some(Role::Member)).await;
    assert_eq!(
        app.app.roles.start_destination(),
        StartDestination::Screen(Screen::MemberHome)
    );
    assert_eq!(
        app.preference_store.get(ROLE_PREFERENCE_KEY).await,
        Ok(Some("member".to_owned()))
    );

    app.app.roles.select_role(Role::Admin).await.unwrap();
    app.wait_for_role(Some(Role::Admin)).await;
    assert_eq!(
        app.app.roles.start_destination(),
        StartDestination::Screen(Screen::AdminHome)
    );

    app.app.roles.logout().await.unwrap();
    app.wait_for_role(None).await;
    assert_eq!(app.preference_store.get(ROLE_PREFERENCE_KEY).await, Ok(None));
}

#[tokio::test]
async fn should_restore_a_stored_role_on_startup() {
    let preference_store = Arc::new(HashmapPreferenceStore::default());
    preference_store
        .set(ROLE_PREFERENCE_KEY, "admin")
        .await
        .unwrap();

    let app = build_app(preference_store).await;

    wait_for_role(&app, Some(Role::Admin)).await;
    assert_eq!(
        app.roles.start_destination(),
        StartDestination::Screen(Screen::AdminHome)
    );
}

#[tokio::test]
async fn should_ignore_an_unknown_stored_role() {
    let preference_store = Arc::new(HashmapPreferenceStore::default());
    preference_store
        .set(ROLE_PREFERENCE_KEY, "bishop")
        .await
        .unwrap();

    let app = build_app(preference_store).await;

    wait_for_role(&app, None).await;
    assert_eq!(
        app.roles.start_destination(),
        StartDestination::Screen(Screen::RoleSelection)
    );
}

#[tokio::test]
async fn should_remember_the_role_across_sessions_on_disk() {
    let dir =
        std::env::temp_dir().join(format!("sociostack-{}", Uuid::new_v4()));

    let first = build_app(Arc::new(FilePreferenceStore::new(&dir))).await;
    wait_for_role(&first, None).await;
    first.roles.select_role(Role::Member).await.unwrap();
    wait_for_role(&first, Some(Role::Member)).await;
    drop(first);

    let second = build_app(Arc::new(FilePreferenceStore::new(&dir))).await;
    wait_for_role(&second, Some(Role::Member)).await;

    tokio::fs::remove_dir_all(&dir).await.unwrap();
}
