//! Configuration snapshot for the scoring engine.
//!
//! The whole marker/survey configuration set is an immutable value object:
//! built once, validated eagerly, then shared read-only by every scoring
//! invocation. Hot reload means building a new snapshot and swapping it
//! whole, so a run never observes half-old/half-new ranges.

pub mod loader;
pub mod marker;
pub mod survey;
pub mod validation;

use std::collections::{BTreeMap, HashMap};

use crate::core::types::Pillar;
use crate::errors::{EngineError, Result};

pub use loader::{load_from_paths, EngineSettings};
pub use marker::{MarkerConfig, RangeScore, RangeSpec, SubConfig, RAW_SCALE};
pub use survey::{CompositeAlgorithm, CountBand, QuestionKind, SurveyQuestionConfig};

/// Marker config table keyed by item key
pub type MarkerTable = im::HashMap<String, MarkerConfig>;

/// Survey question config table keyed by question number
pub type SurveyTable = im::HashMap<String, SurveyQuestionConfig>;

/// The validated, immutable configuration snapshot.
///
/// Cloning is cheap (persistent maps), so callers can hand copies to worker
/// threads freely.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub biomarkers: MarkerTable,
    pub biometrics: MarkerTable,
    pub questions: SurveyTable,
    /// Optional override for the overall aggregation; equal weighting when absent
    pub pillar_weights: Option<BTreeMap<Pillar, f64>>,
}

impl EngineConfig {
    /// Build and validate a snapshot. Fails with every accumulated issue if
    /// the configuration is structurally unsound.
    pub fn new(
        biomarkers: MarkerTable,
        biometrics: MarkerTable,
        questions: SurveyTable,
        pillar_weights: Option<BTreeMap<Pillar, f64>>,
    ) -> Result<Self> {
        let issues = validation::validate_snapshot(
            &biomarkers,
            &biometrics,
            &questions,
            pillar_weights.as_ref(),
        );
        if !issues.is_empty() {
            return Err(EngineError::invalid_config(issues));
        }

        Ok(Self {
            biomarkers,
            biometrics,
            questions,
            pillar_weights,
        })
    }

    /// Parse the three JSON tables the source system exports and build a
    /// snapshot. Primarily for tests and in-memory callers; file loading
    /// lives in [`loader`].
    pub fn from_json_strs(
        biomarker_json: &str,
        biometric_json: &str,
        survey_json: &str,
    ) -> Result<Self> {
        let biomarkers = parse_marker_table(biomarker_json)?;
        let biometrics = parse_marker_table(biometric_json)?;
        let questions = parse_survey_table(survey_json)?;
        Self::new(biomarkers, biometrics, questions, None)
    }

    /// Replace the overall pillar-weight override, revalidating the snapshot
    pub fn with_pillar_weights(self, weights: BTreeMap<Pillar, f64>) -> Result<Self> {
        Self::new(
            self.biomarkers,
            self.biometrics,
            self.questions,
            Some(weights),
        )
    }
}

/// Parse a JSON marker table, stamping each record with its table key
pub fn parse_marker_table(json: &str) -> Result<MarkerTable> {
    let raw: HashMap<String, MarkerConfig> = serde_json::from_str(json)?;
    Ok(raw
        .into_iter()
        .map(|(key, mut config)| {
            config.item_key = key.clone();
            (key, config)
        })
        .collect())
}

/// Parse a JSON survey table, stamping each record with its question number
pub fn parse_survey_table(json: &str) -> Result<SurveyTable> {
    let raw: HashMap<String, SurveyQuestionConfig> = serde_json::from_str(json)?;
    Ok(raw
        .into_iter()
        .map(|(key, mut config)| {
            config.question_number = key.clone();
            (key, config)
        })
        .collect())
}
