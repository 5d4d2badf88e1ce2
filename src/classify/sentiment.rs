// Sentiment bucketing
//
// The reported anxiety level outranks the text: a 9/10 entry is
// Distress even when the words read calm. Keyword comparison only
// decides the mid-range.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sentiment {
    Joyful,
    Positive,
    Neutral,
    Concern,
    Distress,
}

impl Sentiment {
    /// Concern and Distress route to the gentler prompt branch
    pub fn is_concerning(&self) -> bool {
        matches!(self, Sentiment::Concern | Sentiment::Distress)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Joyful => "Joyful",
            Sentiment::Positive => "Positive",
            Sentiment::Neutral => "Neutral",
            Sentiment::Concern => "Concern",
            Sentiment::Distress => "Distress",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const JOYFUL_KEYWORDS: &[&str] = &[
    "amazing", "fantastic", "wonderful", "delighted", "overjoyed", "best day", "celebrated",
];
const POSITIVE_KEYWORDS: &[&str] = &[
    "good", "nice", "pleased", "calm", "relaxed", "grateful", "proud", "hopeful",
];
const CONCERN_KEYWORDS: &[&str] = &[
    "worried", "anxious", "stressed", "nervous", "struggling", "tired", "overwhelmed",
];
const DISTRESS_KEYWORDS: &[&str] = &[
    "hopeless", "desperate", "unbearable", "panic", "terrified", "worthless", "exhausted",
];

fn word_matcher(keywords: &[&str]) -> Regex {
    let alternation = keywords
        .iter()
        .map(|kw| regex::escape(kw))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternation})\b")).expect("invalid sentiment keyword pattern")
}

static JOYFUL: Lazy<Regex> = Lazy::new(|| word_matcher(JOYFUL_KEYWORDS));
static POSITIVE: Lazy<Regex> = Lazy::new(|| word_matcher(POSITIVE_KEYWORDS));
static CONCERN: Lazy<Regex> = Lazy::new(|| word_matcher(CONCERN_KEYWORDS));
static DISTRESS: Lazy<Regex> = Lazy::new(|| word_matcher(DISTRESS_KEYWORDS));

/// Bucket an entry by anxiety level first, keyword counts second.
///
/// Deterministic for a given (text, anxiety_level) pair. On tied
/// counts the darker bucket wins: Distress over Concern over Joyful
/// over Positive.
pub fn classify_sentiment(text: &str, anxiety_level: u8) -> Sentiment {
    if anxiety_level >= 7 {
        return Sentiment::Distress;
    }
    if anxiety_level >= 5 {
        return Sentiment::Concern;
    }
    if anxiety_level <= 2 {
        return Sentiment::Joyful;
    }

    let joyful = JOYFUL.find_iter(text).count();
    let positive = POSITIVE.find_iter(text).count();
    let concern = CONCERN.find_iter(text).count();
    let distress = DISTRESS.find_iter(text).count();

    let max = joyful.max(positive).max(concern).max(distress);
    if max == 0 {
        return Sentiment::Neutral;
    }

    if distress == max {
        Sentiment::Distress
    } else if concern == max {
        Sentiment::Concern
    } else if joyful == max {
        Sentiment::Joyful
    } else {
        Sentiment::Positive
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_high_anxiety_always_distress() {
        assert_eq!(
            classify_sentiment("Best day ever, everything was amazing!", 7),
            Sentiment::Distress
        );
        assert_eq!(classify_sentiment("", 10), Sentiment::Distress);
    }

    #[test]
    fn test_anxiety_bands() {
        assert_eq!(classify_sentiment("nothing notable", 5), Sentiment::Concern);
        assert_eq!(classify_sentiment("nothing notable", 6), Sentiment::Concern);
        assert_eq!(classify_sentiment("awful words here", 2), Sentiment::Joyful);
        assert_eq!(classify_sentiment("awful words here", 1), Sentiment::Joyful);
    }

    #[test]
    fn test_keyword_comparison_in_mid_range() {
        assert_eq!(
            classify_sentiment("I felt good and calm, pleased with the day.", 3),
            Sentiment::Positive
        );
        assert_eq!(
            classify_sentiment("Worried and stressed about everything.", 3),
            Sentiment::Concern
        );
    }

    #[test]
    fn test_darker_bucket_wins_ties() {
        // one positive hit, one concern hit
        assert_eq!(
            classify_sentiment("A good morning but a worried evening.", 3),
            Sentiment::Concern
        );
        // one joyful hit, one distress hit
        assert_eq!(
            classify_sentiment("An amazing view, yet I felt hopeless.", 4),
            Sentiment::Distress
        );
    }

    #[test]
    fn test_no_matches_is_neutral() {
        assert_eq!(
            classify_sentiment("Took the bus into town.", 3),
            Sentiment::Neutral
        );
    }

    #[test]
    fn test_deterministic() {
        let text = "Worried about work but proud of the kids.";
        let first = classify_sentiment(text, 4);
        for _ in 0..10 {
            assert_eq!(classify_sentiment(text, 4), first);
        }
    }
}
