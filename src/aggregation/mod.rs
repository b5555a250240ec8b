//! Pillar and overall aggregation.
//!
//! Sums the three component outcomes into the seven pillar triples, then
//! folds pillar percentages into the overall score.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::types::Pillar;
use crate::errors::{EngineError, Result};
use crate::scoring::{ComponentOutcome, PillarTally};

/// Ratio guarded against an empty denominator: a pillar or component with
/// nothing applicable reports 0, never NaN.
fn ratio(raw: f64, max: f64) -> f64 {
    if max > 0.0 {
        raw / max
    } else {
        0.0
    }
}

/// One component's slice of a pillar
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentScore {
    pub raw_score: f64,
    pub max_score: f64,
    /// `raw_score / max_score` in [0, 1]; 0 when nothing applied
    pub normalized: f64,
}

impl From<PillarTally> for ComponentScore {
    fn from(tally: PillarTally) -> Self {
        Self {
            raw_score: tally.raw,
            max_score: tally.max,
            normalized: ratio(tally.raw, tally.max),
        }
    }
}

/// Per-component breakdown of a pillar score
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentBreakdown {
    pub biomarker: ComponentScore,
    pub biometric: ComponentScore,
    pub survey: ComponentScore,
}

/// One pillar's aggregate: achieved vs. achievable, as a percentage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PillarScore {
    pub pillar: Pillar,
    pub pillar_name: String,
    pub raw_total: f64,
    pub max_total: f64,
    /// `100 * raw_total / max_total`; 0 when nothing applied
    pub percentage: f64,
    pub components: ComponentBreakdown,
}

/// Sum one pillar's biomarker, biometric and survey tallies
pub fn aggregate_pillar(
    pillar: Pillar,
    biomarker: PillarTally,
    biometric: PillarTally,
    survey: PillarTally,
) -> PillarScore {
    let raw_total = biomarker.raw + biometric.raw + survey.raw;
    let max_total = biomarker.max + biometric.max + survey.max;

    PillarScore {
        pillar,
        pillar_name: pillar.display_name().to_string(),
        raw_total,
        max_total,
        percentage: ratio(raw_total, max_total) * 100.0,
        components: ComponentBreakdown {
            biomarker: biomarker.into(),
            biometric: biometric.into(),
            survey: survey.into(),
        },
    }
}

/// Build all seven pillar scores in canonical order. A pillar nothing
/// contributed to is reported at 0%, never dropped: callers must be able to
/// render every pillar every time.
pub fn aggregate_pillars(
    biomarkers: &ComponentOutcome,
    biometrics: &ComponentOutcome,
    survey: &ComponentOutcome,
) -> Vec<PillarScore> {
    Pillar::ALL
        .iter()
        .map(|&pillar| {
            aggregate_pillar(
                pillar,
                biomarkers.tally(pillar),
                biometrics.tally(pillar),
                survey.tally(pillar),
            )
        })
        .collect()
}

/// Combine pillar percentages into the overall score as a [0, 1] fraction.
///
/// Equal-weight mean by default; a pillar-weight override computes the
/// weighted mean instead. Weights must sum to a positive value.
pub fn aggregate_overall(
    pillars: &[PillarScore],
    weights: Option<&BTreeMap<Pillar, f64>>,
) -> Result<f64> {
    if pillars.is_empty() {
        return Ok(0.0);
    }

    match weights {
        None => {
            let sum: f64 = pillars.iter().map(|p| p.percentage).sum();
            Ok(sum / pillars.len() as f64 / 100.0)
        }
        Some(weights) => {
            let weight_sum: f64 = weights.values().sum();
            if !weight_sum.is_finite() || weight_sum <= 0.0 {
                return Err(EngineError::InvalidWeights { sum: weight_sum });
            }

            let weighted: f64 = pillars
                .iter()
                .map(|p| p.percentage * weights.get(&p.pillar).copied().unwrap_or(0.0))
                .sum();
            Ok(weighted / weight_sum / 100.0)
        }
    }
}
