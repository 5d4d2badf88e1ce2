// Prior-entry summary for the prompt

use std::collections::HashMap;
use uuid::Uuid;

use super::trend::{anxiety_trend, AnxietyTrend};
use crate::classify::{detect_emotional_tone, extract_metadata};
use crate::store::JournalEntry;

/// How many prior entries the summary covers
pub const HISTORY_WINDOW: usize = 5;

const SNIPPET_CHARS: usize = 100;

#[derive(Debug, Clone)]
struct EntryDigest {
    title: String,
    anxiety_level: u8,
    snippet: String,
    emotion: String,
    patterns: Vec<String>,
}

/// Aggregate view over a user's recent prior entries
#[derive(Debug, Clone)]
pub struct HistorySummary {
    average_anxiety: f64,
    min_anxiety: u8,
    max_anxiety: u8,
    dominant_emotion: Option<String>,
    dominant_situation: Option<String>,
    trend: AnxietyTrend,
    digests: Vec<EntryDigest>,
}

impl HistorySummary {
    /// Build a summary from a user's entries sorted newest-first.
    ///
    /// The most recent entry is skipped: it is the one being analyzed,
    /// and history should describe what came before it. Returns `None`
    /// when the user has fewer than two entries in total.
    pub fn build(
        entries_newest_first: &[JournalEntry],
        patterns_by_entry: &HashMap<Uuid, Vec<String>>,
    ) -> Option<Self> {
        if entries_newest_first.len() < 2 {
            return None;
        }

        let window: Vec<&JournalEntry> = entries_newest_first
            .iter()
            .skip(1)
            .take(HISTORY_WINDOW)
            .collect();

        let mut emotion_tally: Vec<(String, usize)> = Vec::new();
        let mut situation_tally: Vec<(String, usize)> = Vec::new();
        let mut digests = Vec::with_capacity(window.len());

        for entry in &window {
            let tone = detect_emotional_tone(&entry.content);
            if !tone.is_neutral() {
                bump(&mut emotion_tally, &tone.primary);
            }
            let metadata = extract_metadata(&entry.content);
            if let Some((situation, _)) = metadata.life_situations.first() {
                bump(&mut situation_tally, situation);
            }

            digests.push(EntryDigest {
                title: entry.title.clone(),
                anxiety_level: entry.anxiety_level,
                snippet: snippet(&entry.content),
                emotion: tone.primary,
                patterns: patterns_by_entry
                    .get(&entry.id)
                    .cloned()
                    .unwrap_or_default(),
            });
        }

        let levels: Vec<u8> = window.iter().map(|e| e.anxiety_level).collect();
        let average_anxiety =
            levels.iter().map(|&l| l as f64).sum::<f64>() / levels.len() as f64;

        // Window is newest-first; the trend wants chronological order
        let chronological: Vec<u8> = levels.iter().rev().copied().collect();

        Some(Self {
            average_anxiety,
            min_anxiety: *levels.iter().min().expect("window is non-empty"),
            max_anxiety: *levels.iter().max().expect("window is non-empty"),
            dominant_emotion: most_frequent(emotion_tally),
            dominant_situation: most_frequent(situation_tally),
            trend: anxiety_trend(&chronological),
            digests,
        })
    }

    pub fn trend(&self) -> AnxietyTrend {
        self.trend
    }

    /// The multi-line block embedded verbatim in the prompt
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "RECENT JOURNAL HISTORY ({} prior entries):\n",
            self.digests.len()
        ));
        out.push_str(&format!(
            "- Anxiety: average {:.1}, ranging {} to {}, trend {}\n",
            self.average_anxiety, self.min_anxiety, self.max_anxiety, self.trend
        ));
        if let Some(emotion) = &self.dominant_emotion {
            out.push_str(&format!("- Most frequent emotion: {emotion}\n"));
        }
        if let Some(situation) = &self.dominant_situation {
            out.push_str(&format!("- Most frequent life situation: {situation}\n"));
        }
        out.push_str("Entries, newest first:\n");
        for (i, digest) in self.digests.iter().enumerate() {
            out.push_str(&format!(
                "{}. \"{}\" (anxiety {}, emotion {})",
                i + 1,
                digest.title,
                digest.anxiety_level,
                digest.emotion
            ));
            if !digest.patterns.is_empty() {
                out.push_str(&format!(" [patterns: {}]", digest.patterns.join(", ")));
            }
            out.push('\n');
            out.push_str(&format!("   {}\n", digest.snippet));
        }
        out
    }
}

fn bump(tally: &mut Vec<(String, usize)>, key: &str) {
    match tally.iter_mut().find(|(seen, _)| seen == key) {
        Some((_, count)) => *count += 1,
        None => tally.push((key.to_string(), 1)),
    }
}

fn most_frequent(mut tally: Vec<(String, usize)>) -> Option<String> {
    tally.sort_by(|a, b| b.1.cmp(&a.1));
    tally.into_iter().next().map(|(name, _)| name)
}

fn snippet(content: &str) -> String {
    let trimmed = content.trim();
    if trimmed.chars().count() <= SNIPPET_CHARS {
        return trimmed.to_string();
    }
    let cut: String = trimmed.chars().take(SNIPPET_CHARS).collect();
    format!("{}...", cut.trim_end())
}
