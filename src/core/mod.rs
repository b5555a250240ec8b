//! Core types shared by the scorers and aggregators

pub mod types;

pub use types::{
    Gender, ItemKind, ItemScore, PatientContext, PatientInput, Pillar, PillarContribution, Sex,
    SurveyResponse,
};
