// Emotional tone detection

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

/// Emotion keyword lists. Matching is whole-word and case-insensitive,
/// so "rage" does not fire on "storage".
const EMOTION_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "joy",
        &[
            "happy", "joyful", "delighted", "excited", "wonderful", "grateful", "thrilled",
            "proud", "celebrated",
        ],
    ),
    (
        "sadness",
        &[
            "sad", "down", "unhappy", "tearful", "crying", "cried", "heartbroken", "miserable",
            "grief", "empty",
        ],
    ),
    (
        "anger",
        &[
            "angry", "furious", "rage", "irritated", "annoyed", "resentful", "frustrated",
            "fed up",
        ],
    ),
    (
        "fear",
        &[
            "afraid", "scared", "terrified", "frightened", "dread", "panicked", "panic",
        ],
    ),
    (
        "anxiety",
        &[
            "anxious", "worried", "nervous", "uneasy", "on edge", "restless", "overthinking",
            "racing thoughts",
        ],
    ),
    (
        "hope",
        &[
            "hopeful", "optimistic", "looking forward", "better", "improving", "encouraged",
        ],
    ),
    (
        "loneliness",
        &[
            "lonely", "alone", "isolated", "disconnected", "left out", "ignored",
        ],
    ),
];

static EMOTION_MATCHERS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    EMOTION_KEYWORDS
        .iter()
        .map(|(emotion, keywords)| {
            let alternation = keywords
                .iter()
                .map(|kw| regex::escape(kw))
                .collect::<Vec<_>>()
                .join("|");
            let pattern = format!(r"(?i)\b(?:{alternation})\b");
            // Patterns are built from the static table above and always compile
            (*emotion, Regex::new(&pattern).expect("invalid emotion keyword pattern"))
        })
        .collect()
});

/// Dominant emotion plus a confidence distribution over the emotions
/// that actually matched. Emotions with zero hits are absent from the
/// map, not present with 0.0.
#[derive(Debug, Clone, PartialEq)]
pub struct EmotionalTone {
    pub primary: String,
    pub confidence: BTreeMap<String, f64>,
}

impl EmotionalTone {
    pub fn is_neutral(&self) -> bool {
        self.confidence.is_empty()
    }
}

/// Scan the text against every emotion keyword list and return the
/// argmax emotion with normalized per-emotion confidence.
///
/// Ties resolve to the emotion listed first in the table. No matches at
/// all yields "neutral" with an empty distribution.
pub fn detect_emotional_tone(text: &str) -> EmotionalTone {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for (emotion, matcher) in EMOTION_MATCHERS.iter() {
        let hits = matcher.find_iter(text).count();
        if hits > 0 {
            counts.push((emotion, hits));
        }
    }

    if counts.is_empty() {
        return EmotionalTone {
            primary: "neutral".to_string(),
            confidence: BTreeMap::new(),
        };
    }

    let total: usize = counts.iter().map(|(_, hits)| hits).sum();
    let (primary, _) = counts
        .iter()
        .fold(("", 0usize), |best, &(emotion, hits)| {
            if hits > best.1 {
                (emotion, hits)
            } else {
                best
            }
        });

    let confidence = counts
        .into_iter()
        .map(|(emotion, hits)| (emotion.to_string(), hits as f64 / total as f64))
        .collect();

    EmotionalTone {
        primary: primary.to_string(),
        confidence,
    }
}
