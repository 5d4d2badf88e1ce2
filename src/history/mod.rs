// User history aggregation
// Summarizes a user's prior entries for the prompt

mod patterns;
mod summary;
mod trend;

pub use patterns::recurring_patterns;
pub use summary::{HistorySummary, HISTORY_WINDOW};
pub use trend::{anxiety_trend, AnxietyTrend};
