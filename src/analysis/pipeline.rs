// Pipeline orchestration

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::prompt::{build_prompt, PromptContext};
use super::render::render_payload;
use super::response::AnalysisPayload;
use crate::classify::{
    classify_sentiment, detect_crisis_indicators, detect_emotional_tone, extract_metadata,
    RiskLevel, Sentiment,
};
use crate::errors::StoreError;
use crate::history::{recurring_patterns, HistorySummary};
use crate::providers::ChatProvider;
use crate::store::{AnalysisUpdate, CbtRecommendation, JournalEntry, JournalStore, NewEntry};

/// Prior analyzed entries needed before recurring patterns are shown
const RECURRING_MIN_ANALYZED: usize = 2;
const TOP_RECURRING: usize = 3;

/// What an analysis run produced for one entry
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub entry_id: Uuid,
    /// False when the provider failed and `insight` is a canned message
    pub analyzed: bool,
    pub sentiment: Sentiment,
    pub risk: RiskLevel,
    /// Rendered HTML fragment, or the fallback message
    pub insight: String,
    pub recommendations: Vec<CbtRecommendation>,
}

pub struct AnalysisPipeline {
    store: Arc<JournalStore>,
    provider: Arc<dyn ChatProvider>,
}

impl AnalysisPipeline {
    pub fn new(store: Arc<JournalStore>, provider: Arc<dyn ChatProvider>) -> Self {
        Self { store, provider }
    }

    pub fn store(&self) -> &Arc<JournalStore> {
        &self.store
    }

    /// Save a new entry, then analyze it. The save commits before the
    /// provider is contacted, so a failed analysis never loses writing.
    pub async fn save_and_analyze(
        &self,
        new: NewEntry,
    ) -> Result<(JournalEntry, AnalysisReport), StoreError> {
        let entry = self.store.create_entry(new)?;
        let report = self.analyze_entry(entry.id).await?;
        Ok((entry, report))
    }

    /// Run the full pipeline for an existing entry.
    pub async fn analyze_entry(&self, entry_id: Uuid) -> Result<AnalysisReport, StoreError> {
        let entry = self.store.entry(entry_id)?;

        let tone = detect_emotional_tone(&entry.content);
        let crisis = detect_crisis_indicators(&entry.content);
        let metadata = extract_metadata(&entry.content);
        let sentiment = classify_sentiment(&entry.content, entry.anxiety_level);

        // Journal text stays out of the logs; the hash is enough to
        // correlate runs
        let content_sha = format!("{:x}", Sha256::digest(entry.content.as_bytes()));
        tracing::info!(
            entry_id = %entry.id,
            content_sha = %content_sha,
            sentiment = %sentiment,
            risk = %crisis.risk.as_str(),
            "Analyzing journal entry"
        );

        let history_block = self.history_block_for_user(&entry.user_id)?;
        let recurring_block = self.recurring_block(&entry.user_id)?;

        let ctx = PromptContext {
            content: &entry.content,
            anxiety_level: entry.anxiety_level,
            tone: &tone,
            crisis: &crisis,
            metadata: &metadata,
            sentiment,
            history_block: history_block.as_deref(),
            recurring_block: recurring_block.as_deref(),
        };
        let request = build_prompt(&ctx);

        match self.provider.complete(&request).await {
            Ok(response) => {
                let payload = AnalysisPayload::from_model_text(&response.content);
                let insight = render_payload(&payload);
                let recommendations = payload.recommendations();

                let payload_value = serde_json::to_value(&payload)
                    .expect("analysis payload serializes to JSON");
                self.store.apply_analysis(
                    entry.id,
                    &AnalysisUpdate {
                        analyzed: true,
                        initial_insight: insight.clone(),
                        structured_payload: Some(payload_value),
                        recommendations: recommendations.clone(),
                    },
                )?;

                tracing::info!(
                    entry_id = %entry.id,
                    model = %response.model,
                    recommendations = recommendations.len(),
                    "Analysis stored"
                );

                Ok(AnalysisReport {
                    entry_id: entry.id,
                    analyzed: true,
                    sentiment,
                    risk: crisis.risk,
                    insight,
                    recommendations,
                })
            }
            Err(err) => {
                tracing::warn!(entry_id = %entry.id, error = %err, "Analysis failed");
                let message = err.fallback_message().to_string();

                // First analysis: persist the fallback so the UI has
                // something to show. Re-analysis: keep the previous
                // good analysis instead of overwriting it.
                if !entry.is_analyzed {
                    self.store.apply_analysis(
                        entry.id,
                        &AnalysisUpdate {
                            analyzed: false,
                            initial_insight: message.clone(),
                            structured_payload: None,
                            recommendations: vec![],
                        },
                    )?;
                }

                Ok(AnalysisReport {
                    entry_id: entry.id,
                    analyzed: false,
                    sentiment,
                    risk: crisis.risk,
                    insight: message,
                    recommendations: vec![],
                })
            }
        }
    }

    /// Rendered history block for a user's next analysis. Public so
    /// the CLI can show the same view the prompt gets.
    pub fn history_block_for_user(&self, user_id: &str) -> Result<Option<String>, StoreError> {
        let entries = self.store.entries_for_user(user_id)?;

        let mut patterns_by_entry: HashMap<Uuid, Vec<String>> = HashMap::new();
        for prior in entries.iter().skip(1).take(crate::history::HISTORY_WINDOW) {
            let names = self
                .store
                .recommendations(prior.id)?
                .into_iter()
                .map(|rec| rec.thought_pattern)
                .collect();
            patterns_by_entry.insert(prior.id, names);
        }

        Ok(HistorySummary::build(&entries, &patterns_by_entry).map(|summary| summary.render()))
    }

    fn recurring_block(&self, user_id: &str) -> Result<Option<String>, StoreError> {
        if self.store.analyzed_count_for_user(user_id)? < RECURRING_MIN_ANALYZED {
            return Ok(None);
        }

        let names = self.store.pattern_names_for_user(user_id)?;
        let top = recurring_patterns(&names, TOP_RECURRING);
        if top.is_empty() {
            return Ok(None);
        }

        let mut block = String::from("RECURRING THOUGHT PATTERNS across past entries:\n");
        for (name, count) in top {
            block.push_str(&format!("- {name} ({count}x)\n"));
        }
        Ok(Some(block))
    }
}
