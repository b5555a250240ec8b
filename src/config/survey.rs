//! Survey question configuration: answer-to-points maps, pillar weights,
//! and composite "function" questions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::types::Pillar;

/// Configuration for one survey question, keyed by question number
/// (e.g. "3.04") in the config table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyQuestionConfig {
    /// Question number; filled from the table key at load time
    #[serde(default)]
    pub question_number: String,

    /// Display text for reporting
    #[serde(default)]
    pub question: String,

    /// Pillar name -> non-negative weight
    #[serde(default)]
    pub pillar_weights: BTreeMap<Pillar, f64>,

    #[serde(flatten)]
    pub kind: QuestionKind,
}

impl SurveyQuestionConfig {
    /// Positive-weight pillar entries, in stable pillar order
    pub fn active_weights(&self) -> impl Iterator<Item = (Pillar, f64)> + '_ {
        self.pillar_weights
            .iter()
            .filter(|(_, w)| **w > 0.0)
            .map(|(p, w)| (*p, *w))
    }
}

/// How a question's answer turns into raw points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuestionKind {
    /// Direct answer -> points lookup. Points are authored on the 0-10
    /// scale; an unmapped answer scores 0 but still accrues max.
    Scale { answer_scores: BTreeMap<String, f64> },

    /// The score combines this answer with other answers, patient facts,
    /// or both, via a dedicated algorithm
    Composite {
        #[serde(flatten)]
        algorithm: CompositeAlgorithm,
    },
}

impl QuestionKind {
    /// Maximum raw points this question can earn
    pub fn max_points(&self) -> f64 {
        match self {
            QuestionKind::Scale { answer_scores } => {
                answer_scores.values().copied().fold(0.0, f64::max)
            }
            QuestionKind::Composite { algorithm } => algorithm.max_points(),
        }
    }
}

/// A count band for multi-select questions: `min_count` or more selections
/// earn `factor` of the full points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountBand {
    pub min_count: u32,
    pub factor: f64,
}

/// Algorithms for composite questions.
///
/// Each returns raw points on the same 0-10 scale as scale questions, so
/// pillar accumulation does not care which kind produced a score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "algorithm", rename_all = "snake_case")]
pub enum CompositeAlgorithm {
    /// Training-shape questions: how often x how long. Both answers map to
    /// [0, 1] factors; a combined factor of 1.6 or more earns full points,
    /// anything less earns half the combined factor.
    FrequencyDuration {
        frequency_question: String,
        duration_question: String,
        frequency_factors: BTreeMap<String, f64>,
        duration_factors: BTreeMap<String, f64>,
    },

    /// Two answer categories act as row and column keys into a points grid,
    /// e.g. stress level x stress frequency.
    PairTable {
        row_question: String,
        col_question: String,
        /// row answer -> col answer -> points
        table: BTreeMap<String, BTreeMap<String, f64>>,
    },

    /// `|`-separated multi-select scored by how many options are selected,
    /// through descending count bands (sleep-hygiene protocols, cognitive
    /// activities).
    MultiSelectCount { bands: Vec<CountBand> },

    /// A `YYYY-MM-DD` screening date scored by recency against a guideline
    /// window in months.
    ScreeningRecency { window_months: u32 },

    /// Daily protein grams against a personalized target from body weight
    /// and age.
    ProteinTarget,

    /// Daily calories against a personalized Harris-Benedict BMR target
    /// from body weight, age and sex.
    CalorieTarget,
}

impl CompositeAlgorithm {
    /// Maximum raw points the algorithm can produce
    pub fn max_points(&self) -> f64 {
        match self {
            CompositeAlgorithm::PairTable { table, .. } => table
                .values()
                .flat_map(|row| row.values())
                .copied()
                .fold(0.0, f64::max),
            CompositeAlgorithm::MultiSelectCount { bands } => {
                let best = bands.iter().map(|b| b.factor).fold(0.0, f64::max);
                best * 10.0
            }
            CompositeAlgorithm::FrequencyDuration { .. }
            | CompositeAlgorithm::ScreeningRecency { .. }
            | CompositeAlgorithm::ProteinTarget
            | CompositeAlgorithm::CalorieTarget => 10.0,
        }
    }

    /// Question numbers this algorithm reads besides the question it is
    /// attached to
    pub fn constituent_questions(&self) -> Vec<&str> {
        match self {
            CompositeAlgorithm::FrequencyDuration {
                frequency_question,
                duration_question,
                ..
            } => vec![frequency_question, duration_question],
            CompositeAlgorithm::PairTable {
                row_question,
                col_question,
                ..
            } => vec![row_question, col_question],
            _ => Vec::new(),
        }
    }
}
