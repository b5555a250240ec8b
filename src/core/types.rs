//! Common type definitions used across the scoring engine

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// The seven health pillars every score rolls up into.
///
/// Variant names double as the short keys used in configuration tables;
/// `display_name` gives the full patient-facing label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Pillar {
    Nutrition,
    Movement,
    Sleep,
    Cognitive,
    Stress,
    Connection,
    CoreCare,
}

impl Pillar {
    /// All pillars in canonical reporting order. Every report carries
    /// exactly these seven, whether or not anything contributed to them.
    pub const ALL: [Pillar; 7] = [
        Pillar::Nutrition,
        Pillar::Movement,
        Pillar::Sleep,
        Pillar::Cognitive,
        Pillar::Stress,
        Pillar::Connection,
        Pillar::CoreCare,
    ];

    /// Get the patient-facing display name for this pillar
    pub fn display_name(&self) -> &'static str {
        match self {
            Pillar::Nutrition => "Healthful Nutrition",
            Pillar::Movement => "Movement + Exercise",
            Pillar::Sleep => "Restorative Sleep",
            Pillar::Cognitive => "Cognitive Health",
            Pillar::Stress => "Stress Management",
            Pillar::Connection => "Connection + Purpose",
            Pillar::CoreCare => "Core Care",
        }
    }

    /// Get the short configuration key for this pillar
    pub fn key(&self) -> &'static str {
        match self {
            Pillar::Nutrition => "Nutrition",
            Pillar::Movement => "Movement",
            Pillar::Sleep => "Sleep",
            Pillar::Cognitive => "Cognitive",
            Pillar::Stress => "Stress",
            Pillar::Connection => "Connection",
            Pillar::CoreCare => "CoreCare",
        }
    }
}

impl fmt::Display for Pillar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Lookup accepting both the short config key and the full display name.
/// Legacy exports used the display names as map keys.
static PILLAR_LOOKUP: Lazy<HashMap<&'static str, Pillar>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for pillar in Pillar::ALL {
        map.insert(pillar.key(), pillar);
        map.insert(pillar.display_name(), pillar);
    }
    map
});

impl FromStr for Pillar {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PILLAR_LOOKUP
            .get(s.trim())
            .copied()
            .ok_or_else(|| format!("unknown pillar: {s}"))
    }
}

/// Patient sex as recorded in demographics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

/// Demographic gate on a marker sub-config
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Both,
}

impl Gender {
    /// Whether this gate admits a patient of the given sex
    pub fn admits(&self, sex: Sex) -> bool {
        match self {
            Gender::Both => true,
            Gender::Male => sex == Sex::Male,
            Gender::Female => sex == Sex::Female,
        }
    }
}

/// Which input category an item belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Biomarker,
    Biometric,
    Survey,
}

impl ItemKind {
    pub fn display_name(&self) -> &str {
        match self {
            ItemKind::Biomarker => "biomarker",
            ItemKind::Biometric => "biometric",
            ItemKind::Survey => "survey",
        }
    }
}

/// Per-run patient context. Supplied fresh by the caller for every scoring
/// run, never persisted by the engine.
///
/// `scored_on` anchors date-relative scoring (screening recency). Supplying
/// it keeps a run reproducible; when absent the engine falls back to the
/// current date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientContext {
    pub age: u32,
    pub sex: Sex,
    #[serde(default)]
    pub weight_lb: Option<f64>,
    #[serde(default)]
    pub scored_on: Option<NaiveDate>,
}

impl PatientContext {
    pub fn new(age: u32, sex: Sex) -> Self {
        Self {
            age,
            sex,
            weight_lb: None,
            scored_on: None,
        }
    }

    pub fn with_weight_lb(mut self, weight_lb: f64) -> Self {
        self.weight_lb = Some(weight_lb);
        self
    }

    pub fn with_scored_on(mut self, date: NaiveDate) -> Self {
        self.scored_on = Some(date);
        self
    }
}

/// A single raw survey answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyResponse {
    pub question_number: String,
    pub answer: String,
}

impl SurveyResponse {
    pub fn new(question_number: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question_number: question_number.into(),
            answer: answer.into(),
        }
    }
}

/// Everything the engine needs to score one patient.
///
/// `patient_id` is opaque to the engine; it is carried through to the report
/// so callers can correlate batch results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientInput {
    pub patient_id: String,
    pub context: PatientContext,
    #[serde(default)]
    pub biomarkers: BTreeMap<String, f64>,
    #[serde(default)]
    pub biometrics: BTreeMap<String, f64>,
    #[serde(default)]
    pub survey: Vec<SurveyResponse>,
}

/// One pillar's share of a scored item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PillarContribution {
    pub pillar: Pillar,
    pub weight: f64,
    /// Achieved contribution to the pillar's raw total
    pub weighted_score: f64,
    /// Contribution to the pillar's max total, independent of the achieved score
    pub max_weighted: f64,
}

/// Item-level scoring outcome: one per successfully scored marker value or
/// survey question. Computed on demand, never mutated, folded straight into
/// pillar totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemScore {
    pub item_key: String,
    pub item_kind: ItemKind,
    /// Numeric input for markers; `None` for survey questions
    pub raw_value: Option<f64>,
    /// Raw answer text for survey questions; `None` for markers
    pub answer: Option<String>,
    /// Label of the matched range, for markers
    pub range_label: Option<String>,
    /// Raw points on the 0-10 authoring scale
    pub raw_score: f64,
    /// `raw_score / 10`, in [0, 1]
    pub normalized_score: f64,
    pub pillar_contributions: Vec<PillarContribution>,
}
