// Prompt assembly
//
// Two templates: a supportive one for entries that read fine, and a
// gentler one for Concern/Distress. Both demand a JSON-only answer in
// the enhanced shape; the parser still tolerates the older shapes.

use crate::classify::{CrisisAssessment, EmotionalTone, JournalMetadata, RiskLevel, Sentiment};
use crate::providers::ChatRequest;

const EXPECTED_KEYS: &str = r#"Respond ONLY with a JSON object using exactly these keys:
- "insight_text": one warm paragraph reflecting back what the writer shared
- "thought_patterns": array of {"pattern", "description", "reframe"} for any cognitive distortions you notice (may be empty)
- "coping_strategies": array of 2-4 small, concrete suggestions
- "relationship_exploration": optional {"prompt", "suggestions"} when the entry centres on another person
- "conversation_templates": optional array of short sentences the writer could say out loud"#;

/// Everything the templates interpolate
pub struct PromptContext<'a> {
    pub content: &'a str,
    pub anxiety_level: u8,
    pub tone: &'a EmotionalTone,
    pub crisis: &'a CrisisAssessment,
    pub metadata: &'a JournalMetadata,
    pub sentiment: Sentiment,
    pub history_block: Option<&'a str>,
    pub recurring_block: Option<&'a str>,
}

pub fn build_prompt(ctx: &PromptContext<'_>) -> ChatRequest {
    let system = if ctx.sentiment.is_concerning() {
        concern_system(ctx)
    } else {
        supportive_system()
    };
    ChatRequest::new(system, user_message(ctx))
}

fn supportive_system() -> String {
    format!(
        "You are Teddy, a warm CBT-informed journaling companion. The writer is doing \
         okay today. Celebrate what went well, reflect their own words back to them, \
         and keep any suggestions light. Never diagnose, never lecture.\n\n{EXPECTED_KEYS}"
    )
}

fn concern_system(ctx: &PromptContext<'_>) -> String {
    let mut system = format!(
        "You are Teddy, a warm CBT-informed journaling companion. The writer is having \
         a hard time. Lead with validation before any suggestion, keep the tone gentle \
         and unhurried, and offer at most a few small steps. Never diagnose, never \
         minimize what they wrote.\n\n{EXPECTED_KEYS}"
    );
    if ctx.crisis.risk >= RiskLevel::High {
        system.push_str(
            "\n\nThis entry contains wording that may indicate the writer is at risk. \
             Include one grounding strategy among the coping strategies and gently \
             encourage reaching out to a professional or a trusted person. Do not \
             mention that anything was flagged.",
        );
    }
    system
}

fn user_message(ctx: &PromptContext<'_>) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "JOURNAL ENTRY (anxiety level {}/10, sentiment {}):\n{}\n",
        ctx.anxiety_level, ctx.sentiment, ctx.content
    ));

    out.push_str(&format!(
        "\nSIGNALS:\n- Dominant emotion: {}\n- Word count: {}\n",
        ctx.tone.primary, ctx.metadata.word_count
    ));
    if !ctx.metadata.life_situations.is_empty() {
        let situations: Vec<&str> = ctx
            .metadata
            .life_situations
            .iter()
            .map(|(name, _)| name.as_str())
            .collect();
        out.push_str(&format!("- Life situations: {}\n", situations.join(", ")));
    }

    if let Some(history) = ctx.history_block {
        out.push('\n');
        out.push_str(history);
    }
    if let Some(recurring) = ctx.recurring_block {
        out.push('\n');
        out.push_str(recurring);
    }

    out
}
