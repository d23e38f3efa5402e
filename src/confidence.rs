// src/confidence.rs

use std::fmt;

/// Symbol drawn next to a field; the tier decides its colour.
pub const CONFIDENCE_SYMBOL: &str = "●";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceTier {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierColor {
    Red,
    Amber,
    Green,
}

impl ConfidenceTier {
    pub fn symbol(self) -> &'static str {
        CONFIDENCE_SYMBOL
    }

    pub fn color(self) -> TierColor {
        match self {
            ConfidenceTier::High => TierColor::Green,
            ConfidenceTier::Medium => TierColor::Amber,
            ConfidenceTier::Low => TierColor::Red,
        }
    }
}

impl fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConfidenceTier::Low => "low",
            ConfidenceTier::Medium => "medium",
            ConfidenceTier::High => "high",
        };
        f.write_str(name)
    }
}

/// Bucket an extraction confidence score (nominally 0-100).
///
/// Scores are not clamped: anything that is not `>= 70`, NaN included, lands in `Low`.
pub fn classify(score: f64) -> ConfidenceTier {
    if score >= 90.0 {
        ConfidenceTier::High
    } else if score >= 70.0 {
        ConfidenceTier::Medium
    } else {
        ConfidenceTier::Low
    }
}

/// Missing scores are treated as low confidence.
pub fn classify_opt(score: Option<f64>) -> ConfidenceTier {
    score.map_or(ConfidenceTier::Low, classify)
}
