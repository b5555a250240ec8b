//! Composite wellness scoring engine.
//!
//! Maps raw patient inputs (lab biomarkers, body measurements, and survey
//! responses) to normalized sub-scores via sex/age-gated range tables and
//! answer maps, then weights and aggregates them across seven health
//! pillars into one overall score.
//!
//! The engine is a pure function pipeline: configuration is loaded once into
//! an immutable [`EngineConfig`] snapshot, validated eagerly, and passed
//! explicitly into [`score_patient`]. No I/O, no hidden state, no clocks
//! (date-relative scoring is anchored on the supplied context).

pub mod aggregation;
pub mod config;
pub mod core;
pub mod engine;
pub mod errors;
pub mod scoring;

// Re-export commonly used types
pub use crate::aggregation::{
    aggregate_overall, aggregate_pillar, aggregate_pillars, ComponentBreakdown, ComponentScore,
    PillarScore,
};
pub use crate::config::{
    load_from_paths, CompositeAlgorithm, EngineConfig, EngineSettings, MarkerConfig, QuestionKind,
    RangeScore, RangeSpec, SubConfig, SurveyQuestionConfig,
};
pub use crate::core::types::{
    Gender, ItemKind, ItemScore, PatientContext, PatientInput, Pillar, PillarContribution, Sex,
    SurveyResponse,
};
pub use crate::engine::{score_patient, score_patients, ScoreReport};
pub use crate::errors::{EngineError, Omission, Result, SkipReason};
