// Schema statements for the journal database

pub const JOURNAL_ENTRIES: &str = "CREATE TABLE IF NOT EXISTS journal_entries (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    title TEXT NOT NULL,
    content TEXT NOT NULL,
    anxiety_level INTEGER NOT NULL CHECK (anxiety_level BETWEEN 1 AND 10),
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    is_analyzed INTEGER NOT NULL DEFAULT 0,
    initial_insight TEXT,
    structured_payload TEXT,
    user_reflection TEXT
)";

pub const INDEX_ENTRIES_USER: &str =
    "CREATE INDEX IF NOT EXISTS idx_entries_user_created
     ON journal_entries (user_id, created_at DESC)";

pub const CBT_RECOMMENDATIONS: &str = "CREATE TABLE IF NOT EXISTS cbt_recommendations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    journal_entry_id TEXT NOT NULL
        REFERENCES journal_entries (id) ON DELETE CASCADE,
    thought_pattern TEXT NOT NULL,
    recommendation TEXT NOT NULL
)";

pub const INDEX_RECOMMENDATIONS_ENTRY: &str =
    "CREATE INDEX IF NOT EXISTS idx_recommendations_entry
     ON cbt_recommendations (journal_entry_id)";

// sent_on is zero-padded YYYY-MM-DD, so lexicographic comparisons in
// SQL match chronological order. The primary key makes same-day
// tracking idempotent per (channel, user).
pub const NOTIFICATION_LOG: &str = "CREATE TABLE IF NOT EXISTS notification_log (
    channel TEXT NOT NULL,
    sent_on TEXT NOT NULL,
    user_id TEXT NOT NULL,
    PRIMARY KEY (channel, sent_on, user_id)
)";

pub const ALL: &[&str] = &[
    JOURNAL_ENTRIES,
    INDEX_ENTRIES_USER,
    CBT_RECOMMENDATIONS,
    INDEX_RECOMMENDATIONS_ENTRY,
    NOTIFICATION_LOG,
];
