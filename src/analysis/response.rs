// Model response parsing
//
// The hosted model is asked for JSON but does not always oblige, and
// its JSON has gone through three shape generations. Each shape gets
// its own typed parser, tried newest first; what the parsers cannot
// claim falls through a prose detector and finally canned content.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::store::CbtRecommendation;

/// Shown when the model answered but nothing usable could be parsed
pub const UNPARSEABLE_FALLBACK: &str =
    "Thank you for sharing what's on your mind. Teddy couldn't put together detailed \
     feedback for this entry, but writing things down is already a meaningful step.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThoughtPattern {
    pub pattern: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reframe: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipExploration {
    pub prompt: String,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

/// Current shape: insight plus named patterns, strategies, and the
/// optional relationship/template extras
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnhancedAnalysis {
    pub insight_text: String,
    pub thought_patterns: Vec<ThoughtPattern>,
    pub coping_strategies: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship_exploration: Option<RelationshipExploration>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conversation_templates: Vec<String>,
}

/// Middle-generation shape: a short insight, one reflective question,
/// and a follow-up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReflectivePause {
    pub insight_text: String,
    pub reflection_prompt: String,
    pub followup_text: String,
}

/// Oldest shape: patterns and strategies without the extras
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredAnalysis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insight: Option<String>,
    pub thought_patterns: Vec<ThoughtPattern>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub coping_strategies: Vec<String>,
}

/// Every shape the pipeline knows how to handle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "format", rename_all = "snake_case")]
pub enum AnalysisPayload {
    Enhanced(EnhancedAnalysis),
    ReflectivePause(ReflectivePause),
    Structured(StructuredAnalysis),
    Raw { text: String },
}

static JSON_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\{.*\}").expect("invalid JSON block pattern"));

impl AnalysisPayload {
    /// Parse raw model text through the full ladder.
    pub fn from_model_text(text: &str) -> Self {
        let trimmed = text.trim();

        let value = serde_json::from_str::<Value>(trimmed)
            .ok()
            .or_else(|| extract_json_block(trimmed));

        if let Some(value) = value {
            if let Some(payload) = Self::from_value(&value) {
                return payload;
            }
            tracing::warn!("Model returned JSON in an unrecognized shape");
            return Self::fallback();
        }

        if looks_like_prose(trimmed) {
            return AnalysisPayload::Raw {
                text: trimmed.to_string(),
            };
        }

        tracing::warn!("Model response was neither JSON nor prose");
        Self::fallback()
    }

    /// Try each recognized shape's parser, newest shape first.
    pub fn from_value(value: &Value) -> Option<Self> {
        if let Ok(enhanced) = serde_json::from_value::<EnhancedAnalysis>(value.clone()) {
            return Some(AnalysisPayload::Enhanced(enhanced));
        }
        if let Ok(pause) = serde_json::from_value::<ReflectivePause>(value.clone()) {
            return Some(AnalysisPayload::ReflectivePause(pause));
        }
        if let Ok(structured) = serde_json::from_value::<StructuredAnalysis>(value.clone()) {
            return Some(AnalysisPayload::Structured(structured));
        }
        None
    }

    pub fn fallback() -> Self {
        AnalysisPayload::Raw {
            text: UNPARSEABLE_FALLBACK.to_string(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, AnalysisPayload::Raw { text } if text == UNPARSEABLE_FALLBACK)
    }

    /// CBT recommendation rows derived from this payload. The reframe
    /// is the actionable half when the model provided one.
    pub fn recommendations(&self) -> Vec<CbtRecommendation> {
        let patterns = match self {
            AnalysisPayload::Enhanced(enhanced) => &enhanced.thought_patterns,
            AnalysisPayload::Structured(structured) => &structured.thought_patterns,
            AnalysisPayload::ReflectivePause(_) | AnalysisPayload::Raw { .. } => return vec![],
        };

        patterns
            .iter()
            .map(|tp| CbtRecommendation {
                thought_pattern: tp.pattern.clone(),
                recommendation: tp.reframe.clone().unwrap_or_else(|| tp.description.clone()),
            })
            .collect()
    }
}

/// Salvage a `{...}` block from text that wraps JSON in prose or code
/// fences.
fn extract_json_block(text: &str) -> Option<Value> {
    let candidate = JSON_BLOCK.find(text)?.as_str();
    serde_json::from_str(candidate).ok()
}

/// The model sometimes ignores the JSON instruction entirely and
/// answers in sentences. Accept that as-is rather than discarding it.
fn looks_like_prose(text: &str) -> bool {
    !text.contains('{') && text.split_whitespace().count() >= 10
}
