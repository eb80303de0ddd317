//! End-to-end feed tests over the in-memory backend and store.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Duration as Minutes, Utc};

use jobhub_backend::MemoryBackend;
use jobhub_core::config::feed::FeedConfig;
use jobhub_core::events::{ChangeEvent, ChangeKind, Table};
use jobhub_core::traits::backend::DataBackend;
use jobhub_core::traits::kv::KeyValueStore;
use jobhub_core::types::id::{ApplicationId, JobId, NoticeId, PendingJobId, UserId};
use jobhub_entity::notification::NotificationKind;
use jobhub_entity::role::UserRole;
use jobhub_entity::rows::{
    ApplicationRow, ApplicationStatus, DirectNotificationRow, EmployerProfileRow, JobRow,
    JobseekerProfileRow, PendingJobRow, PendingJobStatus,
};
use jobhub_feed::NotificationFeed;
use jobhub_feed::alert::NoopAlertSink;
use jobhub_store::MemoryKeyValueStore;

/// A backend and store shared across feed restarts within one test.
struct World {
    backend: Arc<MemoryBackend>,
    store: Arc<MemoryKeyValueStore>,
}

impl World {
    fn new() -> Self {
        Self {
            backend: Arc::new(MemoryBackend::new(64)),
            store: Arc::new(MemoryKeyValueStore::new()),
        }
    }

    async fn feed(&self, user: Option<UserId>, role: UserRole) -> NotificationFeed {
        self.feed_with_config(user, role, test_config()).await
    }

    async fn feed_with_config(
        &self,
        user: Option<UserId>,
        role: UserRole,
        config: FeedConfig,
    ) -> NotificationFeed {
        NotificationFeed::spawn(
            Arc::clone(&self.backend) as Arc<dyn DataBackend>,
            Arc::clone(&self.store) as Arc<dyn KeyValueStore>,
            Arc::new(NoopAlertSink::new()),
            config,
            user,
            role,
        )
        .await
    }
}

/// Long poll interval: tests drive refreshes explicitly.
fn test_config() -> FeedConfig {
    FeedConfig {
        poll_interval_seconds: 3600,
        history_cap: 100,
        snapshot_limit: 50,
        alerts_enabled: false,
    }
}

fn ts(minutes: i64) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
        + Minutes::minutes(minutes)
}

fn job(employer: UserId, title: &str) -> JobRow {
    JobRow {
        id: JobId::new(),
        employer_id: employer,
        title: title.to_string(),
        created_at: Some(ts(0)),
    }
}

fn application(
    job: &JobRow,
    jobseeker: UserId,
    status: ApplicationStatus,
    minutes: i64,
) -> ApplicationRow {
    ApplicationRow {
        id: ApplicationId::new(),
        job_id: job.id,
        jobseeker_id: jobseeker,
        status,
        applied_at: Some(ts(minutes)),
        created_at: Some(ts(minutes)),
        updated_at: Some(ts(minutes)),
    }
}

fn employer_profile(user: UserId, company: &str) -> EmployerProfileRow {
    EmployerProfileRow {
        user_id: user,
        company_name: Some(company.to_string()),
        first_name: None,
        last_name: None,
        suffix: None,
        email: None,
    }
}

fn jobseeker_profile(user: UserId, first: &str, last: &str) -> JobseekerProfileRow {
    JobseekerProfileRow {
        user_id: user,
        first_name: Some(first.to_string()),
        last_name: Some(last.to_string()),
        suffix: None,
        email: None,
    }
}

fn pending_job(title: &str, minutes: i64) -> PendingJobRow {
    PendingJobRow {
        id: PendingJobId::new(),
        employer_id: None,
        job_title: Some(title.to_string()),
        status: PendingJobStatus::Pending,
        created_at: Some(ts(minutes)),
        updated_at: None,
    }
}

/// Wait for spawned fold tasks to observe a condition.
async fn wait_until(mut pred: impl FnMut() -> bool) {
    for _ in 0..200 {
        if pred() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not met within timeout");
}

/// Give in-flight fold tasks time to finish before asserting a negative.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(100)).await;
}

#[tokio::test]
async fn new_application_appears_in_jobseeker_feed() {
    let world = World::new();
    let jobseeker = UserId::new();
    let employer = UserId::new();

    let posting = job(employer, "Line Cook");
    world
        .backend
        .seed(Table::EmployerProfiles, vec![employer_profile(employer, "Harbor Grill")])
        .unwrap();
    world.backend.seed(Table::Jobs, vec![posting.clone()]).unwrap();
    world
        .backend
        .seed(
            Table::Applications,
            vec![application(&posting, jobseeker, ApplicationStatus::Pending, 0)],
        )
        .unwrap();

    let feed = world.feed(Some(jobseeker), UserRole::Jobseeker).await;

    assert!(!feed.is_loading());
    let notifications = feed.notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(feed.unread_count(), 1);
    assert_eq!(notifications[0].kind, NotificationKind::Info);
    assert!(notifications[0].message.contains("Line Cook"));
}

#[tokio::test]
async fn status_flip_creates_distinct_unread_notification() {
    let world = World::new();
    let jobseeker = UserId::new();
    let employer = UserId::new();

    let posting = job(employer, "Line Cook");
    let mut app = application(&posting, jobseeker, ApplicationStatus::Pending, 0);
    world
        .backend
        .seed(Table::EmployerProfiles, vec![employer_profile(employer, "Harbor Grill")])
        .unwrap();
    world.backend.seed(Table::Jobs, vec![posting]).unwrap();
    world.backend.seed(Table::Applications, vec![app.clone()]).unwrap();

    let feed = world.feed(Some(jobseeker), UserRole::Jobseeker).await;
    let first = feed.notifications().remove(0);
    feed.mark_as_read(first.id).await;
    assert_eq!(feed.unread_count(), 0);

    // The employer accepts; the row's update timestamp moves forward.
    app.status = ApplicationStatus::Accepted;
    app.updated_at = Some(ts(30));
    world.backend.update(Table::Applications, app).unwrap();

    wait_until(|| feed.notifications().len() == 2).await;

    let notifications = feed.notifications();
    assert_eq!(notifications[0].kind, NotificationKind::Success);
    assert_ne!(notifications[0].id, first.id);
    assert!(!notifications[0].read);
    assert!(notifications[0].message.contains("Harbor Grill"));

    // The acknowledged pending-stage entry survives as its own record.
    assert_eq!(notifications[1].id, first.id);
    assert!(notifications[1].read);
    assert_eq!(feed.unread_count(), 1);
}

#[tokio::test]
async fn employer_snapshot_keeps_pending_and_referred_only() {
    let world = World::new();
    let employer = UserId::new();
    let alice = UserId::new();
    let bob = UserId::new();

    let posting = job(employer, "Dockhand");
    world.backend.seed(Table::Jobs, vec![posting.clone()]).unwrap();
    world
        .backend
        .seed(
            Table::JobseekerProfiles,
            vec![
                jobseeker_profile(alice, "Alice", "Moreno"),
                jobseeker_profile(bob, "Bob", "Tan"),
            ],
        )
        .unwrap();
    world
        .backend
        .seed(
            Table::Applications,
            vec![
                application(&posting, alice, ApplicationStatus::Pending, 0),
                application(&posting, bob, ApplicationStatus::Accepted, 5),
            ],
        )
        .unwrap();
    world
        .backend
        .seed(
            Table::Notifications,
            vec![DirectNotificationRow {
                id: NoticeId::new(),
                recipient_id: employer,
                notice_type: "account verified".to_string(),
                message: "Your company account has been verified".to_string(),
                created_at: Some(ts(10)),
            }],
        )
        .unwrap();

    let feed = world.feed(Some(employer), UserRole::Employer).await;

    let notifications = feed.notifications();
    assert_eq!(notifications.len(), 2);
    assert_eq!(feed.unread_count(), 2);

    // The accepted application is not part of the employer's feed.
    assert!(notifications.iter().all(|n| !n.message.contains("Bob")));
    assert!(
        notifications
            .iter()
            .any(|n| n.message.contains("Alice Moreno") && n.message.contains("Dockhand"))
    );
    assert!(notifications.iter().any(|n| n.message.contains("verified")));
}

#[tokio::test]
async fn employer_terminal_transition_is_suppressed() {
    let world = World::new();
    let employer = UserId::new();
    let applicant = UserId::new();

    let posting = job(employer, "Dockhand");
    let mut app = application(&posting, applicant, ApplicationStatus::Pending, 0);
    world.backend.seed(Table::Jobs, vec![posting]).unwrap();
    world
        .backend
        .seed(Table::JobseekerProfiles, vec![jobseeker_profile(applicant, "Alice", "Moreno")])
        .unwrap();
    world.backend.seed(Table::Applications, vec![app.clone()]).unwrap();

    let feed = world.feed(Some(employer), UserRole::Employer).await;
    let before = feed.notifications();
    assert_eq!(before.len(), 1);

    app.status = ApplicationStatus::Accepted;
    app.updated_at = Some(ts(30));
    world.backend.update(Table::Applications, app).unwrap();

    settle().await;

    let after = feed.notifications();
    assert_eq!(after.len(), 1);
    assert_eq!(after[0].id, before[0].id);
    assert_eq!(feed.unread_count(), 1);
}

#[tokio::test]
async fn employer_referral_update_is_not_suppressed() {
    let world = World::new();
    let employer = UserId::new();
    let applicant = UserId::new();

    let posting = job(employer, "Dockhand");
    let mut app = application(&posting, applicant, ApplicationStatus::Pending, 0);
    world.backend.seed(Table::Jobs, vec![posting]).unwrap();
    world.backend.seed(Table::Applications, vec![app.clone()]).unwrap();

    let feed = world.feed(Some(employer), UserRole::Employer).await;
    assert_eq!(feed.notifications().len(), 1);

    app.status = ApplicationStatus::Referred;
    app.updated_at = Some(ts(30));
    world.backend.update(Table::Applications, app).unwrap();

    wait_until(|| feed.notifications().len() == 2).await;
    assert!(feed.notifications()[0].message.contains("referred"));
}

#[tokio::test]
async fn realtime_notice_reaches_employer() {
    let world = World::new();
    let employer = UserId::new();
    let feed = world.feed(Some(employer), UserRole::Employer).await;
    assert!(feed.notifications().is_empty());

    world
        .backend
        .insert(
            Table::Notifications,
            DirectNotificationRow {
                id: NoticeId::new(),
                recipient_id: employer,
                notice_type: "job approved".to_string(),
                message: "Your posting went live".to_string(),
                created_at: Some(ts(1)),
            },
        )
        .unwrap();

    wait_until(|| feed.notifications().len() == 1).await;
    let notifications = feed.notifications();
    assert_eq!(notifications[0].kind, NotificationKind::Success);
    assert_eq!(feed.unread_count(), 1);
}

#[tokio::test]
async fn notice_for_someone_else_is_ignored() {
    let world = World::new();
    let employer = UserId::new();
    let feed = world.feed(Some(employer), UserRole::Employer).await;

    world
        .backend
        .insert(
            Table::Notifications,
            DirectNotificationRow {
                id: NoticeId::new(),
                recipient_id: UserId::new(),
                notice_type: "job approved".to_string(),
                message: "Not yours".to_string(),
                created_at: Some(ts(1)),
            },
        )
        .unwrap();

    settle().await;
    assert!(feed.notifications().is_empty());
}

#[tokio::test]
async fn admin_duplicate_delivery_folds_to_one_entry() {
    let world = World::new();
    let admin = UserId::new();
    let feed = world.feed(Some(admin), UserRole::Admin).await;

    let row = pending_job("Night Guard", 0);
    let event = ChangeEvent {
        kind: ChangeKind::Insert,
        table: Table::Jobvacancypending,
        old: None,
        new: serde_json::to_value(&row).unwrap(),
    };

    // The transport delivers the same insert twice.
    world.backend.publish(event.clone());
    world.backend.publish(event);

    wait_until(|| !feed.notifications().is_empty()).await;
    settle().await;

    let notifications = feed.notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(feed.unread_count(), 1);
    assert!(notifications[0].message.contains("Night Guard"));
}

#[tokio::test]
async fn mark_all_as_read_is_idempotent() {
    let world = World::new();
    let admin = UserId::new();
    world
        .backend
        .seed(
            Table::Jobvacancypending,
            vec![
                pending_job("Night Guard", 0),
                pending_job("Janitor", 1),
                pending_job("Cashier", 2),
            ],
        )
        .unwrap();

    let feed = world.feed(Some(admin), UserRole::Admin).await;
    assert_eq!(feed.unread_count(), 3);

    feed.mark_all_as_read().await;
    assert_eq!(feed.unread_count(), 0);
    let first: Vec<_> = feed.notifications().iter().map(|n| (n.id, n.read)).collect();

    feed.mark_all_as_read().await;
    assert_eq!(feed.unread_count(), 0);
    let second: Vec<_> = feed.notifications().iter().map(|n| (n.id, n.read)).collect();

    assert_eq!(first, second);
}

#[tokio::test]
async fn read_state_survives_feed_restart() {
    let world = World::new();
    let admin = UserId::new();
    world
        .backend
        .seed(Table::Jobvacancypending, vec![pending_job("Night Guard", 0)])
        .unwrap();

    let feed = world.feed(Some(admin), UserRole::Admin).await;
    let id = feed.notifications()[0].id;
    feed.mark_as_read(id).await;
    feed.shutdown();
    drop(feed);

    // A new session for the same scope sees the acknowledgement.
    let feed = world.feed(Some(admin), UserRole::Admin).await;
    let notifications = feed.notifications();
    assert_eq!(notifications.len(), 1);
    assert!(notifications[0].read);
    assert_eq!(feed.unread_count(), 0);
}

#[tokio::test]
async fn history_cap_and_sort_hold_after_refresh() {
    let world = World::new();
    let admin = UserId::new();
    world
        .backend
        .seed(
            Table::Jobvacancypending,
            (0..8).map(|i| pending_job("Posting", i)).collect::<Vec<_>>(),
        )
        .unwrap();

    let config = FeedConfig {
        history_cap: 5,
        ..test_config()
    };
    let feed = world
        .feed_with_config(Some(admin), UserRole::Admin, config)
        .await;

    let notifications = feed.notifications();
    assert_eq!(notifications.len(), 5);
    for pair in notifications.windows(2) {
        assert!(pair[0].timestamp >= pair[1].timestamp);
    }
    // The oldest three aged out.
    assert!(notifications.iter().all(|n| n.timestamp >= ts(3)));
}

#[tokio::test]
async fn anonymous_feed_is_inert() {
    let world = World::new();
    world
        .backend
        .seed(Table::Jobvacancypending, vec![pending_job("Night Guard", 0)])
        .unwrap();

    let feed = world.feed(None, UserRole::Jobseeker).await;
    assert!(!feed.is_loading());
    assert!(feed.notifications().is_empty());
    assert_eq!(feed.unread_count(), 0);

    feed.refresh().await;
    assert!(feed.notifications().is_empty());
}

#[tokio::test]
async fn mark_as_read_of_unknown_id_only_grows_the_set() {
    let world = World::new();
    let admin = UserId::new();
    world
        .backend
        .seed(Table::Jobvacancypending, vec![pending_job("Night Guard", 0)])
        .unwrap();

    let feed = world.feed(Some(admin), UserRole::Admin).await;
    let unknown = jobhub_core::types::id::NotificationId::new(
        jobhub_core::types::id::SourceKind::Jobvacancy,
        uuid::Uuid::new_v4(),
        ts(99),
    );

    feed.mark_as_read(unknown).await;
    assert_eq!(feed.unread_count(), 1);
    assert_eq!(feed.notifications().len(), 1);
}
