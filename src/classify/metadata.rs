// Life-situation metadata extraction

use once_cell::sync::Lazy;
use regex::Regex;

const LIFE_SITUATION_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "parenting",
        &[
            "kids", "children", "son", "daughter", "toddler", "baby", "school run", "bedtime",
            "parenting",
        ],
    ),
    (
        "relationship",
        &[
            "partner", "husband", "wife", "boyfriend", "girlfriend", "marriage", "argument",
            "divorce", "dating",
        ],
    ),
    (
        "work",
        &[
            "work", "job", "boss", "manager", "deadline", "meeting", "colleague", "overtime",
            "redundancy",
        ],
    ),
    (
        "health",
        &[
            "doctor", "hospital", "diagnosis", "pain", "sleep", "insomnia", "medication",
            "appointment",
        ],
    ),
    (
        "grief",
        &[
            "funeral", "passed away", "loss", "mourning", "grieving", "anniversary of",
        ],
    ),
];

static SITUATION_MATCHERS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    LIFE_SITUATION_KEYWORDS
        .iter()
        .map(|(situation, keywords)| {
            let alternation = keywords
                .iter()
                .map(|kw| regex::escape(kw))
                .collect::<Vec<_>>()
                .join("|");
            let pattern = format!(r"(?i)\b(?:{alternation})\b");
            (
                *situation,
                Regex::new(&pattern).expect("invalid life-situation keyword pattern"),
            )
        })
        .collect()
});

/// Lightweight metadata about an entry: which life situations it
/// touches (top three by keyword hits) and how long it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalMetadata {
    /// (situation, hit count), highest count first, at most three,
    /// only situations that matched at all
    pub life_situations: Vec<(String, usize)>,
    pub word_count: usize,
}

pub fn extract_metadata(text: &str) -> JournalMetadata {
    let mut tallies: Vec<(String, usize)> = SITUATION_MATCHERS
        .iter()
        .filter_map(|(situation, matcher)| {
            let hits = matcher.find_iter(text).count();
            (hits > 0).then(|| (situation.to_string(), hits))
        })
        .collect();

    // Highest count first; table order breaks ties (sort is stable)
    tallies.sort_by(|a, b| b.1.cmp(&a.1));
    tallies.truncate(3);

    JournalMetadata {
        life_situations: tallies,
        word_count: text.split_whitespace().count(),
    }
}
