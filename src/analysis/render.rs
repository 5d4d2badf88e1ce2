// Rendering parsed payloads into the UI fragment
//
// The journal UI expects one HTML fragment per analysis, assembled
// from whichever sub-sections the payload carries.

use super::response::{AnalysisPayload, ThoughtPattern};

/// Render a payload to the single HTML fragment stored on the entry.
pub fn render_payload(payload: &AnalysisPayload) -> String {
    match payload {
        AnalysisPayload::Enhanced(enhanced) => {
            let mut out = String::new();
            push_paragraph(&mut out, &enhanced.insight_text);
            push_patterns(&mut out, &enhanced.thought_patterns);
            push_list(&mut out, "Things to try", &enhanced.coping_strategies);
            if let Some(exploration) = &enhanced.relationship_exploration {
                out.push_str("<h4>Worth exploring</h4>");
                push_paragraph(&mut out, &exploration.prompt);
                push_list(&mut out, "", &exploration.suggestions);
            }
            if !enhanced.conversation_templates.is_empty() {
                out.push_str("<h4>Words you could borrow</h4>");
                for template in &enhanced.conversation_templates {
                    out.push_str(&format!(
                        "<blockquote>{}</blockquote>",
                        escape_html(template)
                    ));
                }
            }
            out
        }
        AnalysisPayload::ReflectivePause(pause) => {
            let mut out = String::new();
            push_paragraph(&mut out, &pause.insight_text);
            out.push_str(&format!(
                "<blockquote>{}</blockquote>",
                escape_html(&pause.reflection_prompt)
            ));
            push_paragraph(&mut out, &pause.followup_text);
            out
        }
        AnalysisPayload::Structured(structured) => {
            let mut out = String::new();
            if let Some(insight) = &structured.insight {
                push_paragraph(&mut out, insight);
            }
            push_patterns(&mut out, &structured.thought_patterns);
            push_list(&mut out, "Things to try", &structured.coping_strategies);
            out
        }
        AnalysisPayload::Raw { text } => {
            let mut out = String::new();
            for paragraph in text.split("\n\n").filter(|p| !p.trim().is_empty()) {
                push_paragraph(&mut out, paragraph.trim());
            }
            out
        }
    }
}

fn push_paragraph(out: &mut String, text: &str) {
    if !text.is_empty() {
        out.push_str(&format!("<p>{}</p>", escape_html(text)));
    }
}

fn push_patterns(out: &mut String, patterns: &[ThoughtPattern]) {
    if patterns.is_empty() {
        return;
    }
    out.push_str("<h4>Thought patterns noticed</h4><ul>");
    for tp in patterns {
        out.push_str(&format!(
            "<li><strong>{}:</strong> {}",
            escape_html(&tp.pattern),
            escape_html(&tp.description)
        ));
        if let Some(reframe) = &tp.reframe {
            out.push_str(&format!(" <em>Try instead:</em> {}", escape_html(reframe)));
        }
        out.push_str("</li>");
    }
    out.push_str("</ul>");
}

fn push_list(out: &mut String, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    if !heading.is_empty() {
        out.push_str(&format!("<h4>{}</h4>", escape_html(heading)));
    }
    out.push_str("<ul>");
    for item in items {
        out.push_str(&format!("<li>{}</li>", escape_html(item)));
    }
    out.push_str("</ul>");
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::response::{EnhancedAnalysis, ReflectivePause, StructuredAnalysis};

    #[test]
    fn test_enhanced_renders_all_sections() {
        let payload = AnalysisPayload::Enhanced(EnhancedAnalysis {
            insight_text: "You noticed the spiral early.".to_string(),
            thought_patterns: vec![ThoughtPattern {
                pattern: "Catastrophizing".to_string(),
                description: "Expecting the worst.".to_string(),
                reframe: Some("Name the most likely outcome.".to_string()),
            }],
            coping_strategies: vec!["Step outside for five minutes.".to_string()],
            relationship_exploration: None,
            conversation_templates: vec!["I need a moment before we continue.".to_string()],
        });

        let html = render_payload(&payload);
        assert!(html.contains("<p>You noticed the spiral early.</p>"));
        assert!(html.contains("<strong>Catastrophizing:</strong>"));
        assert!(html.contains("<em>Try instead:</em> Name the most likely outcome."));
        assert!(html.contains("<li>Step outside for five minutes.</li>"));
        assert!(html.contains("<blockquote>I need a moment before we continue.</blockquote>"));
    }

    #[test]
    fn test_reflective_pause_renders_quote() {
        let payload = AnalysisPayload::ReflectivePause(ReflectivePause {
            insight_text: "A heavy day.".to_string(),
            reflection_prompt: "What helped, even a little?".to_string(),
            followup_text: "Sleep on it.".to_string(),
        });
        let html = render_payload(&payload);
        assert!(html.contains("<blockquote>What helped, even a little?</blockquote>"));
    }

    #[test]
    fn test_structured_without_insight() {
        let payload = AnalysisPayload::Structured(StructuredAnalysis {
            insight: None,
            thought_patterns: vec![],
            coping_strategies: vec!["Breathe.".to_string()],
        });
        let html = render_payload(&payload);
        assert!(!html.contains("<p>"));
        assert!(html.contains("<li>Breathe.</li>"));
    }

    #[test]
    fn test_raw_splits_paragraphs() {
        let payload = AnalysisPayload::Raw {
            text: "First thought.\n\nSecond thought.".to_string(),
        };
        let html = render_payload(&payload);
        assert_eq!(html, "<p>First thought.</p><p>Second thought.</p>");
    }

    #[test]
    fn test_user_visible_text_is_escaped() {
        let payload = AnalysisPayload::Raw {
            text: "Scores were <b>3 & 4</b> today, which counts as progress either way.".to_string(),
        };
        let html = render_payload(&payload);
        assert!(html.contains("&lt;b&gt;3 &amp; 4&lt;/b&gt;"));
    }
}
