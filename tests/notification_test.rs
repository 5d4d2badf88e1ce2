// Integration tests for notification dedup against an on-disk store

use chrono::{Duration, Utc};
use std::sync::Arc;

use teddy::notify::{Channel, NotificationTracker, DEFAULT_RETENTION_DAYS};
use teddy::store::JournalStore;

#[test]
fn test_tracking_survives_reopen() {
    let dir = tempfile::tempdir().expect("temp dir");
    let db_path = dir.path().join("journal.db");

    {
        let store = Arc::new(JournalStore::open(&db_path).expect("open store"));
        let tracker = NotificationTracker::new(store);
        tracker.track(Channel::Email, "user-1").expect("track");
    }

    let store = Arc::new(JournalStore::open(&db_path).expect("reopen store"));
    let tracker = NotificationTracker::new(store);
    assert!(tracker
        .has_received(Channel::Email, "user-1", 0)
        .expect("check"));
    assert!(!tracker
        .has_received(Channel::Sms, "user-1", 0)
        .expect("check other channel"));
}

#[test]
fn test_prune_is_per_record_not_per_channel() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = Arc::new(JournalStore::open(&dir.path().join("journal.db")).expect("open store"));
    let tracker = NotificationTracker::new(store);

    let today = Utc::now().date_naive();
    let stale = today - Duration::days(DEFAULT_RETENTION_DAYS + 5);

    tracker
        .track_on(Channel::Email, "user-1", stale)
        .expect("stale email");
    tracker
        .track_on(Channel::WeeklySummary, "user-1", stale)
        .expect("stale weekly");
    tracker
        .track_on(Channel::WeeklySummary, "user-2", today)
        .expect("fresh weekly");

    let removed = tracker.prune(DEFAULT_RETENTION_DAYS).expect("prune");
    assert_eq!(removed, 2);

    assert!(tracker
        .has_received(Channel::WeeklySummary, "user-2", 0)
        .expect("fresh record kept"));
    assert!(!tracker
        .has_received(Channel::Email, "user-1", DEFAULT_RETENTION_DAYS + 10)
        .expect("stale record gone"));
}
