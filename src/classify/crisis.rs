// Crisis indicator detection
//
// Phrase matching here is deliberately plain substring containment
// rather than word-boundary: "self-harm" and "self harming" should
// both fire on the "self harm" phrase after case folding.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CrisisCategory {
    SelfHarm,
    Violence,
    ExtremeDistress,
    SubstanceAbuse,
}

impl CrisisCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            CrisisCategory::SelfHarm => "self_harm",
            CrisisCategory::Violence => "violence",
            CrisisCategory::ExtremeDistress => "extreme_distress",
            CrisisCategory::SubstanceAbuse => "substance_abuse",
        }
    }
}

impl fmt::Display for CrisisCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Risk level derived from which categories matched. Ordering matters:
/// `None < Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    None,
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::None => "none",
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

static CRISIS_PHRASES: Lazy<Vec<(CrisisCategory, Vec<&'static str>)>> = Lazy::new(|| {
    vec![
        (
            CrisisCategory::SelfHarm,
            vec![
                "kill myself",
                "end my life",
                "suicide",
                "suicidal",
                "self harm",
                "self-harm",
                "hurt myself",
                "cut myself",
                "don't want to be here anymore",
                "better off without me",
            ],
        ),
        (
            CrisisCategory::Violence,
            vec![
                "hurt someone",
                "hurt them",
                "kill them",
                "kill him",
                "kill her",
                "want to hit",
                "violent thoughts",
            ],
        ),
        (
            CrisisCategory::ExtremeDistress,
            vec![
                "can't go on",
                "can't take it anymore",
                "completely hopeless",
                "no way out",
                "falling apart",
                "breaking down",
                "can't cope",
            ],
        ),
        (
            CrisisCategory::SubstanceAbuse,
            vec![
                "drinking too much",
                "drank too much",
                "blackout drunk",
                "using again",
                "relapsed",
                "overdose",
                "too many pills",
            ],
        ),
    ]
});

/// Outcome of a crisis scan: matched phrases per category plus the
/// derived overall risk level.
#[derive(Debug, Clone, PartialEq)]
pub struct CrisisAssessment {
    pub matches: BTreeMap<CrisisCategory, Vec<String>>,
    pub risk: RiskLevel,
}

impl CrisisAssessment {
    pub fn is_clear(&self) -> bool {
        self.risk == RiskLevel::None
    }
}

/// Fixed severity for each category. Risk is the maximum severity over
/// matched categories, so adding hits can never lower the level.
fn category_severity(category: CrisisCategory) -> RiskLevel {
    match category {
        CrisisCategory::SelfHarm | CrisisCategory::Violence => RiskLevel::High,
        CrisisCategory::ExtremeDistress | CrisisCategory::SubstanceAbuse => RiskLevel::Medium,
    }
}

/// Scan journal text for crisis phrases.
pub fn detect_crisis_indicators(text: &str) -> CrisisAssessment {
    let folded = text.to_lowercase();
    let mut matches: BTreeMap<CrisisCategory, Vec<String>> = BTreeMap::new();

    for (category, phrases) in CRISIS_PHRASES.iter() {
        for phrase in phrases {
            if folded.contains(phrase) {
                matches
                    .entry(*category)
                    .or_default()
                    .push((*phrase).to_string());
            }
        }
    }

    let risk = matches
        .keys()
        .map(|category| category_severity(*category).max(RiskLevel::Low))
        .max()
        .unwrap_or(RiskLevel::None);

    if risk >= RiskLevel::High {
        // The phrase comes from our static table, never from user text
        for (category, phrases) in &matches {
            tracing::warn!(category = %category, phrases = ?phrases, "Crisis indicators detected");
        }
    }

    CrisisAssessment { matches, risk }
}
