// Embedded journal store
//
// One SQLite database holds entries, their CBT recommendations, and
// the notification log. Every multi-row mutation runs in a single
// transaction.

mod journal;
mod schema;

pub use journal::{
    AnalysisUpdate, CbtRecommendation, JournalEntry, JournalStore, NewEntry,
};
