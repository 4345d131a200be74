use crate::helpers::TestApp;
use fake::{faker::name::en::Name, Fake};
use sociostack::{
    domain::{DocumentId, MemberFilter, OperationStatus},
    repositories::MemberRepository,
};
use test_context::test_context;

#[test_context(TestApp)]
#[tokio::test]
async fn should_write_once_and_mirror_the_store(app: &mut TestApp) {
    let writes_before = app.document_store.writes();

    app.app
        .members
        .add_member("Ted", "Lead", "App Dev", Some("ted@craggy.ie"))
        .await;

    assert_eq!(app.document_store.writes() - writes_before, 1);
    assert_eq!(
        *app.app.members.add_member_state().borrow(),
        OperationStatus::Success
    );

    let stored = MemberRepository::new(app.document_store.clone())
        .fetch_all()
        .await
        .unwrap();
    assert_eq!(app.app.members.current_members(), stored);
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].name, "Ted");
    assert_eq!(stored[0].contact.as_deref(), Some("ted@craggy.ie"));
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_accept_a_long_member_name(app: &mut TestApp) {
    let name = "a".repeat(300);
    let writes_before = app.document_store.writes();

    app.app
        .members
        .add_member(&name, "Member", "App Dev", None)
        .await;

    assert_eq!(app.document_store.writes() - writes_before, 1);
    assert_eq!(
        *app.app.members.add_member_state().borrow(),
        OperationStatus::Success
    );
    assert_eq!(app.app.members.current_members()[0].name, name);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_not_touch_the_store_for_invalid_input(app: &mut TestApp) {
    let cases = [
        ("", "Lead", "App Dev", "Member name cannot be empty"),
        ("Ted", "  ", "App Dev", "Role cannot be empty"),
        ("Ted", "Lead", "", "Domain cannot be empty"),
    ];

    for (name, role, domain, message) in cases {
        let calls_before = app.document_store.calls();

        app.app.members.add_member(name, role, domain, None).await;

        assert_eq!(
            app.document_store.calls(),
            calls_before,
            "Store was called for invalid input {:?}",
            (name, role, domain)
        );
        assert_eq!(
            *app.app.members.add_member_state().borrow(),
            OperationStatus::Error(message.to_owned())
        );
        app.app.members.reset_add_member_state();
    }
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_list_every_added_member(app: &mut TestApp) {
    let mut names: Vec<String> = (0..5).map(|_| Name().fake()).collect();

    for name in names.iter() {
        app.app
            .members
            .add_member(name, "Member", "Web Dev", None)
            .await;
    }

    let mut listed: Vec<String> = app
        .app
        .members
        .current_members()
        .into_iter()
        .map(|member| member.name)
        .collect();
    listed.sort();
    names.sort();
    assert_eq!(listed, names);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_remove_deleted_member_after_fetch(app: &mut TestApp) {
    app.app
        .members
        .add_member("Dougal", "Member", "AI/ML", None)
        .await;
    let dougal = app.app.members.current_members().remove(0);

    app.app.members.delete_member(&dougal.id).await;
    app.app.members.fetch_members().await;

    assert!(app
        .app
        .members
        .current_members()
        .iter()
        .all(|member| member.id != dougal.id));
    assert_eq!(
        *app.app.members.delete_member_state().borrow(),
        OperationStatus::Success
    );
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_treat_deleting_a_missing_member_as_success(app: &mut TestApp) {
    let id = DocumentId::parse("abc123").unwrap();

    app.app.members.delete_member(&id).await;

    assert_eq!(
        *app.app.members.delete_member_state().borrow(),
        OperationStatus::Success
    );
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_keep_the_last_list_when_fetching_fails(app: &mut TestApp) {
    app.app
        .members
        .add_member("Jack", "Co Lead", "Marketing", None)
        .await;
    let before = app.app.members.current_members();

    app.document_store.go_offline();
    app.app.members.fetch_members().await;

    assert_eq!(app.app.members.current_members(), before);
    let status = app.app.members.fetch_state().borrow().clone();
    let message = status.error_message().unwrap();
    assert!(
        message.starts_with("Failed to load members"),
        "Unexpected message: {message}"
    );

    app.document_store.go_online();
    app.app.members.fetch_members().await;
    assert_eq!(
        *app.app.members.fetch_state().borrow(),
        OperationStatus::Success
    );
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_report_failed_updates(app: &mut TestApp) {
    app.app
        .members
        .add_member("Ted", "Lead", "App Dev", None)
        .await;
    let mut ted = app.app.members.current_members().remove(0);
    ted.domain = "Cyber Security".to_owned();

    app.document_store.go_offline();
    app.app.members.update_member(ted).await;

    assert!(app
        .app
        .members
        .update_member_state()
        .borrow()
        .error_message()
        .is_some());
    assert_eq!(app.app.members.current_members()[0].domain, "App Dev");
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_project_single_members_by_id(app: &mut TestApp) {
    let unknown = DocumentId::parse("nobody").unwrap();
    assert_eq!(app.app.members.member_by_id(&unknown).current(), None);

    app.app
        .members
        .add_member("Ted", "Lead", "App Dev", None)
        .await;
    let ted = app.app.members.current_members().remove(0);

    assert_eq!(app.app.members.member_by_id(&ted.id).current(), Some(ted));
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_filter_the_directory(app: &mut TestApp) {
    for (name, role, domain) in [
        ("Ted Crilly", "Lead", "App Dev"),
        ("Dougal McGuire", "Member", "App Dev"),
        ("Jack Hackett", "Member", "Marketing"),
    ] {
        app.app.members.add_member(name, role, domain, None).await;
    }

    let filter = MemberFilter {
        query: "ted".to_owned(),
        role: None,
        domain: Some("App Dev".to_owned()),
    };
    let shown = app.app.members.filtered(&filter);
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].name, "Ted Crilly");

    let stats = app.app.members.stats(&MemberFilter::default());
    assert_eq!((stats.total, stats.shown, stats.unique_roles), (3, 3, 2));
}
