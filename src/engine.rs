//! Engine façade: score one patient, or a batch of patients in parallel.
//!
//! Scoring a patient is a pure function of (configuration snapshot, patient
//! input); invocations are independent, so the batch API fans out across
//! patients with rayon and never synchronizes within one patient's run.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::aggregation::{aggregate_overall, aggregate_pillars, PillarScore};
use crate::config::EngineConfig;
use crate::core::types::{ItemKind, ItemScore, PatientInput};
use crate::errors::{Omission, Result};
use crate::scoring::{score_markers, score_survey};

/// The complete scoring report for one patient.
///
/// Always carries all seven pillars; item-level failures are reported as
/// omissions, never as a truncated pillar list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub patient_id: String,
    /// Overall WellPath score in [0, 1]
    pub overall_score: f64,
    pub pillars: Vec<PillarScore>,
    pub item_details: Vec<ItemScore>,
    pub omissions: Vec<Omission>,
    pub omitted_count: usize,
}

/// Score one patient against a validated configuration snapshot.
///
/// Item-level problems (missing config, demographic gaps, out-of-range
/// values, incomplete composites) are recovered locally and reported as
/// omissions. The only failure surfaced here is an invalid pillar-weight
/// override for the overall aggregation.
pub fn score_patient(config: &EngineConfig, input: &PatientInput) -> Result<ScoreReport> {
    let biomarkers = score_markers(
        &config.biomarkers,
        &input.biomarkers,
        ItemKind::Biomarker,
        &input.context,
    );
    let biometrics = score_markers(
        &config.biometrics,
        &input.biometrics,
        ItemKind::Biometric,
        &input.context,
    );
    let survey = score_survey(&config.questions, &input.survey, &input.context);

    let pillars = aggregate_pillars(&biomarkers, &biometrics, &survey);
    let overall_score = aggregate_overall(&pillars, config.pillar_weights.as_ref())?;

    let mut item_details =
        Vec::with_capacity(biomarkers.items.len() + biometrics.items.len() + survey.items.len());
    item_details.extend(biomarkers.items);
    item_details.extend(biometrics.items);
    item_details.extend(survey.items);

    let mut omissions =
        Vec::with_capacity(biomarkers.omissions.len() + biometrics.omissions.len() + survey.omissions.len());
    omissions.extend(biomarkers.omissions);
    omissions.extend(biometrics.omissions);
    omissions.extend(survey.omissions);

    log::debug!(
        "scored patient {}: {} items, {} omitted, overall {:.3}",
        input.patient_id,
        item_details.len(),
        omissions.len(),
        overall_score
    );

    Ok(ScoreReport {
        patient_id: input.patient_id.clone(),
        overall_score,
        pillars,
        item_details,
        omitted_count: omissions.len(),
        omissions,
    })
}

/// Score a batch of patients in parallel.
///
/// Each patient is an independent invocation; results come back in input
/// order, one per patient.
pub fn score_patients(config: &EngineConfig, inputs: &[PatientInput]) -> Vec<Result<ScoreReport>> {
    inputs
        .par_iter()
        .map(|input| score_patient(config, input))
        .collect()
}
