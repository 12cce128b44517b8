use crate::assessment::answers::{AnswerField, AnswerSet, Binary};
use serde::{Deserialize, Serialize};

/// Binary questions where "no" is the favorable answer. Q1 asks whether the
/// founder is buried in operations and Q3 whether revenue hangs on their
/// time; everywhere else "yes" signals leverage.
const NO_IS_FAVORABLE: [AnswerField; 2] = [AnswerField::Q1, AnswerField::Q3];

const BINARY_FIELDS: [AnswerField; 10] = [
    AnswerField::Q1,
    AnswerField::Q2,
    AnswerField::Q3,
    AnswerField::Q4,
    AnswerField::Q5,
    AnswerField::Q6,
    AnswerField::Q7,
    AnswerField::Q8,
    AnswerField::Q9,
    AnswerField::Q10,
];

/// Freedom score over the ten binary answers: each favorable answer is worth
/// ten points, unanswered questions count as unfavorable. Always a multiple
/// of ten in `0..=100`.
pub fn score(answers: &AnswerSet) -> u8 {
    let favorable = BINARY_FIELDS
        .iter()
        .filter(|field| {
            let wanted = if NO_IS_FAVORABLE.contains(field) {
                Binary::No
            } else {
                Binary::Yes
            };
            answers.binary(**field) == Some(wanted)
        })
        .count() as u8;
    favorable * 10
}

/// The three qualification tiers a scored lead falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Segment {
    FoundationBuilder,
    SystemOptimizer,
    SovereignFounder,
}

impl Segment {
    /// Partition is exhaustive: 0-39, 40-74, 75-100.
    pub fn for_score(score: u8) -> Self {
        if score >= 75 {
            Segment::SovereignFounder
        } else if score >= 40 {
            Segment::SystemOptimizer
        } else {
            Segment::FoundationBuilder
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Segment::FoundationBuilder => "foundation-builder",
            Segment::SystemOptimizer => "system-optimizer",
            Segment::SovereignFounder => "sovereign-founder",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Segment::FoundationBuilder => "Foundation Builder",
            Segment::SystemOptimizer => "System Optimizer",
            Segment::SovereignFounder => "Sovereign Founder",
        }
    }

    pub fn from_key(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().replace(' ', "-").as_str() {
            "foundation-builder" => Some(Segment::FoundationBuilder),
            "system-optimizer" => Some(Segment::SystemOptimizer),
            "sovereign-founder" => Some(Segment::SovereignFounder),
            _ => None,
        }
    }
}
