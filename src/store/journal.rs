// Journal entry storage

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::Mutex;
use uuid::Uuid;

use super::schema;
use crate::errors::StoreError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub content: String,
    /// Self-reported, 1 (calm) to 10 (severe)
    pub anxiety_level: u8,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_analyzed: bool,
    pub initial_insight: Option<String>,
    /// Parsed analysis payload as persisted JSON
    pub structured_payload: Option<serde_json::Value>,
    pub user_reflection: Option<String>,
}

/// Fields supplied when a new entry is written
#[derive(Debug, Clone, Deserialize)]
pub struct NewEntry {
    pub user_id: String,
    pub title: String,
    pub content: String,
    pub anxiety_level: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CbtRecommendation {
    pub thought_pattern: String,
    pub recommendation: String,
}

/// Analysis output applied to an entry. Recommendations replace the
/// entry's previous set wholesale, in the same transaction.
#[derive(Debug, Clone)]
pub struct AnalysisUpdate {
    pub analyzed: bool,
    pub initial_insight: String,
    pub structured_payload: Option<serde_json::Value>,
    pub recommendations: Vec<CbtRecommendation>,
}

pub struct JournalStore {
    conn: Mutex<Connection>,
}

impl JournalStore {
    /// Open (or create) the database at `path`
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        Self::initialize(conn)
    }

    /// In-memory database, used by tests and one-shot CLI runs
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::initialize(conn)
    }

    fn initialize(conn: Connection) -> Result<Self, StoreError> {
        conn.busy_timeout(std::time::Duration::from_secs(5))?;
        conn.query_row("PRAGMA journal_mode=WAL;", [], |_| Ok(()))?;
        conn.execute("PRAGMA foreign_keys=ON;", [])?;
        for statement in schema::ALL {
            conn.execute(statement, [])?;
        }
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run `f` with the database connection. Shared with the
    /// notification tracker, which lives in its own module but uses
    /// the same database.
    pub(crate) fn with_conn<T>(
        &self,
        f: impl FnOnce(&mut Connection) -> rusqlite::Result<T>,
    ) -> Result<T, StoreError> {
        let mut conn = self.conn.lock().expect("journal store mutex poisoned");
        Ok(f(&mut conn)?)
    }

    pub fn create_entry(&self, new: NewEntry) -> Result<JournalEntry, StoreError> {
        if !(1..=10).contains(&new.anxiety_level) {
            return Err(StoreError::InvalidAnxietyLevel(new.anxiety_level));
        }

        let now = Utc::now();
        let entry = JournalEntry {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            title: new.title,
            content: new.content,
            anxiety_level: new.anxiety_level,
            created_at: now,
            updated_at: now,
            is_analyzed: false,
            initial_insight: None,
            structured_payload: None,
            user_reflection: None,
        };

        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO journal_entries
                 (id, user_id, title, content, anxiety_level, created_at, updated_at, is_analyzed)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0)",
                params![
                    entry.id.to_string(),
                    entry.user_id,
                    entry.title,
                    entry.content,
                    entry.anxiety_level,
                    entry.created_at.to_rfc3339(),
                    entry.updated_at.to_rfc3339(),
                ],
            )
        })?;

        tracing::info!(entry_id = %entry.id, user_id = %entry.user_id, "Journal entry created");
        Ok(entry)
    }

    pub fn entry(&self, id: Uuid) -> Result<JournalEntry, StoreError> {
        let found = self.with_conn(|conn| {
            conn.query_row(
                "SELECT id, user_id, title, content, anxiety_level, created_at, updated_at,
                        is_analyzed, initial_insight, structured_payload, user_reflection
                 FROM journal_entries WHERE id = ?1",
                params![id.to_string()],
                row_to_entry,
            )
            .optional()
        })?;
        found.ok_or(StoreError::EntryNotFound(id))
    }

    /// All of a user's entries, newest first
    pub fn entries_for_user(&self, user_id: &str) -> Result<Vec<JournalEntry>, StoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, title, content, anxiety_level, created_at, updated_at,
                        is_analyzed, initial_insight, structured_payload, user_reflection
                 FROM journal_entries WHERE user_id = ?1
                 ORDER BY created_at DESC",
            )?;
            let rows = stmt.query_map(params![user_id], row_to_entry)?;
            rows.collect()
        })
    }

    /// Apply an analysis result: entry fields and the wholesale
    /// recommendation replacement commit together or not at all.
    pub fn apply_analysis(&self, id: Uuid, update: &AnalysisUpdate) -> Result<(), StoreError> {
        let payload_json = update
            .structured_payload
            .as_ref()
            .map(|value| value.to_string());

        let changed = self.with_conn(|conn| {
            let tx = conn.transaction()?;

            let changed = tx.execute(
                "UPDATE journal_entries
                 SET is_analyzed = ?2, initial_insight = ?3, structured_payload = ?4,
                     updated_at = ?5
                 WHERE id = ?1",
                params![
                    id.to_string(),
                    update.analyzed,
                    update.initial_insight,
                    payload_json,
                    Utc::now().to_rfc3339(),
                ],
            )?;

            if changed > 0 {
                tx.execute(
                    "DELETE FROM cbt_recommendations WHERE journal_entry_id = ?1",
                    params![id.to_string()],
                )?;
                for rec in &update.recommendations {
                    tx.execute(
                        "INSERT INTO cbt_recommendations
                         (journal_entry_id, thought_pattern, recommendation)
                         VALUES (?1, ?2, ?3)",
                        params![id.to_string(), rec.thought_pattern, rec.recommendation],
                    )?;
                }
            }

            tx.commit()?;
            Ok(changed)
        })?;

        if changed == 0 {
            return Err(StoreError::EntryNotFound(id));
        }
        Ok(())
    }

    pub fn add_reflection(&self, id: Uuid, reflection: &str) -> Result<(), StoreError> {
        let changed = self.with_conn(|conn| {
            conn.execute(
                "UPDATE journal_entries SET user_reflection = ?2, updated_at = ?3 WHERE id = ?1",
                params![id.to_string(), reflection, Utc::now().to_rfc3339()],
            )
        })?;
        if changed == 0 {
            return Err(StoreError::EntryNotFound(id));
        }
        Ok(())
    }

    pub fn recommendations(&self, entry_id: Uuid) -> Result<Vec<CbtRecommendation>, StoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT thought_pattern, recommendation FROM cbt_recommendations
                 WHERE journal_entry_id = ?1 ORDER BY id",
            )?;
            let rows = stmt.query_map(params![entry_id.to_string()], |row| {
                Ok(CbtRecommendation {
                    thought_pattern: row.get(0)?,
                    recommendation: row.get(1)?,
                })
            })?;
            rows.collect()
        })
    }

    /// Every CBT pattern name attached to a user's entries, newest
    /// entry first. Input to the recurring-pattern tally.
    pub fn pattern_names_for_user(&self, user_id: &str) -> Result<Vec<String>, StoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT r.thought_pattern
                 FROM cbt_recommendations r
                 JOIN journal_entries e ON e.id = r.journal_entry_id
                 WHERE e.user_id = ?1
                 ORDER BY e.created_at DESC, r.id",
            )?;
            let rows = stmt.query_map(params![user_id], |row| row.get(0))?;
            rows.collect()
        })
    }

    pub fn analyzed_count_for_user(&self, user_id: &str) -> Result<usize, StoreError> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT COUNT(*) FROM journal_entries WHERE user_id = ?1 AND is_analyzed = 1",
                params![user_id],
                |row| row.get::<_, i64>(0),
            )
        })
        .map(|count| count as usize)
    }

    /// Delete an entry and its recommendations. Returns false when the
    /// entry did not exist.
    pub fn delete_entry(&self, id: Uuid) -> Result<bool, StoreError> {
        let changed = self.with_conn(|conn| {
            conn.execute(
                "DELETE FROM journal_entries WHERE id = ?1",
                params![id.to_string()],
            )
        })?;
        Ok(changed > 0)
    }
}

fn row_to_entry(row: &Row<'_>) -> rusqlite::Result<JournalEntry> {
    let id: String = row.get(0)?;
    let created_at: String = row.get(5)?;
    let updated_at: String = row.get(6)?;
    let payload: Option<String> = row.get(9)?;

    Ok(JournalEntry {
        id: Uuid::parse_str(&id).map_err(|e| conversion_error(0, e))?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        content: row.get(3)?,
        anxiety_level: row.get(4)?,
        created_at: parse_timestamp(5, &created_at)?,
        updated_at: parse_timestamp(6, &updated_at)?,
        is_analyzed: row.get(7)?,
        initial_insight: row.get(8)?,
        structured_payload: match payload {
            Some(json) => Some(serde_json::from_str(&json).map_err(|e| conversion_error(9, e))?),
            None => None,
        },
        user_reflection: row.get(10)?,
    })
}

fn parse_timestamp(column: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_error(column, e))
}

fn conversion_error(
    column: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(err))
}
