use crate::helpers::TestApp;
use chrono::Utc;
use sociostack::domain::{OperationStatus, Priority};
use std::time::Duration;
use test_context::test_context;

#[test_context(TestApp)]
#[tokio::test]
async fn should_put_a_new_announcement_first_in_the_feed(app: &mut TestApp) {
    let posted_after = Utc::now();

    app.app
        .announcements
        .post_announcement("Exam", "Postponed to Friday", "High")
        .await;

    assert_eq!(
        *app.app.announcements.post_state().borrow(),
        OperationStatus::Success
    );

    let feed = app.wait_for_feed(|feed| feed.len() == 1).await;
    let exam = &feed[0];
    assert_eq!(exam.title, "Exam");
    assert_eq!(exam.message, "Postponed to Friday");
    assert_eq!(exam.priority, Priority::High);
    assert!(!exam.id.as_str().is_empty());
    assert!(exam.timestamp.unwrap() >= posted_after);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_order_the_feed_newest_first(app: &mut TestApp) {
    for title in ["Welcome", "Hackathon", "Exam"] {
        app.app
            .announcements
            .post_announcement(title, "Details inside", "Normal")
            .await;
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let feed = app.wait_for_feed(|feed| feed.len() == 3).await;

    let titles: Vec<&str> = feed.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, vec!["Exam", "Hackathon", "Welcome"]);
    assert!(feed
        .windows(2)
        .all(|pair| pair[0].timestamp >= pair[1].timestamp));
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_reject_invalid_posts_without_writing(app: &mut TestApp) {
    let cases = [
        ("", "Body", "Low", "Title cannot be empty"),
        ("Exam", "   ", "Low", "Message cannot be empty"),
    ];

    for (title, message, priority, error) in cases {
        let writes_before = app.document_store.writes();

        app.app
            .announcements
            .post_announcement(title, message, priority)
            .await;

        assert_eq!(app.document_store.writes(), writes_before);
        assert_eq!(
            *app.app.announcements.post_state().borrow(),
            OperationStatus::Error(error.to_owned())
        );
        app.app.announcements.reset_post_state();
    }
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_store_an_unrecognised_priority_as_written(app: &mut TestApp) {
    let writes_before = app.document_store.writes();

    app.app
        .announcements
        .post_announcement("Exam", "Postponed", "Urgent")
        .await;

    assert_eq!(app.document_store.writes() - writes_before, 1);
    assert_eq!(
        *app.app.announcements.post_state().borrow(),
        OperationStatus::Success
    );

    let feed = app.wait_for_feed(|feed| feed.len() == 1).await;
    assert_eq!(feed[0].priority, Priority::Other("Urgent".to_owned()));
    assert_eq!(feed[0].priority.to_string(), "Urgent");
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_report_a_failed_post(app: &mut TestApp) {
    app.document_store.go_offline();

    app.app
        .announcements
        .post_announcement("Exam", "Postponed", "High")
        .await;

    let status = app.app.announcements.post_state().borrow().clone();
    assert!(status
        .error_message()
        .unwrap()
        .starts_with("Failed to post announcement"));
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_surface_subscription_failures(app: &mut TestApp) {
    app.document_store.go_offline();

    app.app.announcements.fetch_announcements().await;

    assert!(!app.app.announcements.is_listening().await);
    let status = app.app.announcements.ui_state().borrow().clone();
    assert!(status
        .error_message()
        .unwrap()
        .starts_with("Failed to load announcements"));

    app.app.announcements.reset_state();
    assert_eq!(
        *app.app.announcements.ui_state().borrow(),
        OperationStatus::Idle
    );
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_resume_the_feed_after_a_restart(app: &mut TestApp) {
    app.app.announcements.stop().await;
    app.app
        .announcements
        .post_announcement("Missed", "Posted while stopped", "Low")
        .await;

    app.app.announcements.fetch_announcements().await;

    let feed = app.wait_for_feed(|feed| feed.len() == 1).await;
    assert_eq!(feed[0].title, "Missed");
    assert_eq!(feed[0].priority, Priority::Low);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_project_a_single_announcement(app: &mut TestApp) {
    app.app
        .announcements
        .post_announcement("Exam", "Postponed", "normal")
        .await;
    let feed = app.wait_for_feed(|feed| !feed.is_empty()).await;

    let exam = app.app.announcements.announcement_by_id(&feed[0].id);

    assert_eq!(exam.current(), Some(feed[0].clone()));
    assert_eq!(exam.current().unwrap().priority, Priority::Normal);
}
