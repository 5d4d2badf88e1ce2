// Notification dedup tracking
//
// Prevents a user getting the same channel's notification twice in one
// calendar day. Backed by the journal database, one row per
// (channel, day, user).

mod tracker;

pub use tracker::{Channel, NotificationTracker, DEFAULT_RETENTION_DAYS};
