// Same-day notification dedup

use chrono::{Duration, NaiveDate, Utc};
use rusqlite::params;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::errors::StoreError;
use crate::store::JournalStore;

/// Records older than this many days are dropped by `prune`
pub const DEFAULT_RETENTION_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Email,
    Sms,
    WeeklySummary,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Email => "email",
            Channel::Sms => "sms",
            Channel::WeeklySummary => "weekly_summary",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(Channel::Email),
            "sms" => Ok(Channel::Sms),
            "weekly_summary" | "weekly" => Ok(Channel::WeeklySummary),
            other => Err(StoreError::UnknownChannel(other.to_string())),
        }
    }
}

#[derive(Clone)]
pub struct NotificationTracker {
    store: Arc<JournalStore>,
}

impl NotificationTracker {
    pub fn new(store: Arc<JournalStore>) -> Self {
        Self { store }
    }

    /// Record that `user_id` received a notification on `channel`
    /// today. Returns true when this call created the record, false
    /// when the day was already claimed.
    pub fn track(&self, channel: Channel, user_id: &str) -> Result<bool, StoreError> {
        self.track_on(channel, user_id, Utc::now().date_naive())
    }

    /// Record a notification for an explicit day. Backfill scripts and
    /// tests use this; `track` is the everyday entry point.
    pub fn track_on(
        &self,
        channel: Channel,
        user_id: &str,
        day: NaiveDate,
    ) -> Result<bool, StoreError> {
        let inserted = self.store.with_conn(|conn| {
            conn.execute(
                "INSERT OR IGNORE INTO notification_log (channel, sent_on, user_id)
                 VALUES (?1, ?2, ?3)",
                params![channel.as_str(), day_key(day), user_id],
            )
        })?;
        tracing::debug!(channel = %channel, user_id = %user_id, new = inserted > 0, "Notification tracked");
        Ok(inserted > 0)
    }

    /// Whether `user_id` already received a `channel` notification in
    /// the last `days` days. `days = 0` asks about today only.
    pub fn has_received(
        &self,
        channel: Channel,
        user_id: &str,
        days: i64,
    ) -> Result<bool, StoreError> {
        let cutoff = Utc::now().date_naive() - Duration::days(days);
        self.store.with_conn(|conn| {
            conn.query_row(
                "SELECT EXISTS (
                     SELECT 1 FROM notification_log
                     WHERE channel = ?1 AND user_id = ?2 AND sent_on >= ?3
                 )",
                params![channel.as_str(), user_id, day_key(cutoff)],
                |row| row.get(0),
            )
        })
    }

    /// Drop records strictly older than `days` days across all
    /// channels. The boundary day itself is retained. Returns the
    /// number of records removed.
    pub fn prune(&self, days: i64) -> Result<usize, StoreError> {
        let cutoff = Utc::now().date_naive() - Duration::days(days);
        let removed = self.store.with_conn(|conn| {
            conn.execute(
                "DELETE FROM notification_log WHERE sent_on < ?1",
                params![day_key(cutoff)],
            )
        })?;
        if removed > 0 {
            tracing::info!(removed, cutoff = %day_key(cutoff), "Pruned notification log");
        }
        Ok(removed)
    }
}

/// Zero-padded `YYYY-MM-DD`. Fixed width keeps lexicographic order in
/// SQL identical to chronological order.
fn day_key(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> NotificationTracker {
        NotificationTracker::new(Arc::new(JournalStore::in_memory().unwrap()))
    }

    #[test]
    fn test_track_then_has_received_today() {
        let tracker = tracker();
        assert!(!tracker.has_received(Channel::Email, "user-1", 0).unwrap());

        tracker.track(Channel::Email, "user-1").unwrap();
        assert!(tracker.has_received(Channel::Email, "user-1", 0).unwrap());

        // Other channels and users unaffected
        assert!(!tracker.has_received(Channel::Sms, "user-1", 0).unwrap());
        assert!(!tracker.has_received(Channel::Email, "user-2", 0).unwrap());
    }

    #[test]
    fn test_same_day_track_claims_only_once() {
        let tracker = tracker();
        assert!(tracker.track(Channel::Sms, "user-1").unwrap());
        assert!(!tracker.track(Channel::Sms, "user-1").unwrap());
        assert!(tracker.has_received(Channel::Sms, "user-1", 0).unwrap());
    }

    #[test]
    fn test_window_excludes_older_records() {
        let tracker = tracker();
        let today = Utc::now().date_naive();
        tracker
            .track_on(Channel::Email, "user-1", today - Duration::days(3))
            .unwrap();

        assert!(!tracker.has_received(Channel::Email, "user-1", 0).unwrap());
        assert!(!tracker.has_received(Channel::Email, "user-1", 2).unwrap());
        assert!(tracker.has_received(Channel::Email, "user-1", 3).unwrap());
    }

    #[test]
    fn test_prune_retains_boundary_day() {
        let tracker = tracker();
        let today = Utc::now().date_naive();

        tracker
            .track_on(Channel::Email, "old", today - Duration::days(31))
            .unwrap();
        tracker
            .track_on(Channel::Email, "boundary", today - Duration::days(30))
            .unwrap();
        tracker.track_on(Channel::Email, "fresh", today).unwrap();

        let removed = tracker.prune(DEFAULT_RETENTION_DAYS).unwrap();
        assert_eq!(removed, 1);

        assert!(!tracker.has_received(Channel::Email, "old", 40).unwrap());
        assert!(tracker.has_received(Channel::Email, "boundary", 30).unwrap());
        assert!(tracker.has_received(Channel::Email, "fresh", 0).unwrap());
    }

    #[test]
    fn test_channel_parsing() {
        assert_eq!("email".parse::<Channel>().unwrap(), Channel::Email);
        assert_eq!("weekly".parse::<Channel>().unwrap(), Channel::WeeklySummary);
        assert!("pigeon".parse::<Channel>().is_err());
    }
}
