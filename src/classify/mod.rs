// Keyword classifiers over journal text
//
// Pure functions over static keyword tables. These run before any
// provider call and their outputs are embedded in the prompt.

mod crisis;
mod emotion;
mod metadata;
mod sentiment;

pub use crisis::{detect_crisis_indicators, CrisisAssessment, CrisisCategory, RiskLevel};
pub use emotion::{detect_emotional_tone, EmotionalTone};
pub use metadata::{extract_metadata, JournalMetadata};
pub use sentiment::{classify_sentiment, Sentiment};
