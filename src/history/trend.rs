// Anxiety trend over recent entries

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnxietyTrend {
    Improving,
    Stable,
    Worsening,
}

impl AnxietyTrend {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnxietyTrend::Improving => "improving",
            AnxietyTrend::Stable => "stable",
            AnxietyTrend::Worsening => "worsening",
        }
    }
}

impl fmt::Display for AnxietyTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compare the first half of the window against the second half.
/// Levels are chronological (oldest first); anxiety going down means
/// improvement. A half-point threshold filters noise on the 1-10
/// scale.
pub fn anxiety_trend(levels: &[u8]) -> AnxietyTrend {
    if levels.len() < 4 {
        return AnxietyTrend::Stable; // Not enough data
    }

    let mid = levels.len() / 2;
    let first_avg =
        levels[..mid].iter().map(|&l| l as f64).sum::<f64>() / mid as f64;
    let second_avg = levels[mid..].iter().map(|&l| l as f64).sum::<f64>()
        / (levels.len() - mid) as f64;

    let diff = second_avg - first_avg;
    if diff < -0.5 {
        AnxietyTrend::Improving
    } else if diff > 0.5 {
        AnxietyTrend::Worsening
    } else {
        AnxietyTrend::Stable
    }
}
