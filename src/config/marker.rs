//! Marker configuration: sex/age-gated range tables for biomarkers and
//! biometrics.
//!
//! The source tables are flat JSON records; they are re-typed here as tagged
//! sums so that misconfiguration (overlapping ranges, a linear range with an
//! open bound) is rejected eagerly at load time instead of surfacing as a
//! wrong score at lookup time.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::types::{Gender, PatientContext, Pillar};

/// Raw scores are authored on a 0-10 point scale and normalized by this
/// divisor to the [0, 1] sub-score the aggregators consume.
pub const RAW_SCALE: f64 = 10.0;

/// Configuration for one scorable item (a lab biomarker or a body
/// measurement). Keyed by `item_key` in the config table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerConfig {
    /// Stable identifier; filled from the table key at load time
    #[serde(default)]
    pub item_key: String,

    /// Display name, e.g. "HDL Cholesterol"
    #[serde(default)]
    pub name: String,

    /// Pillar name -> non-negative weight; zero means the item does not
    /// contribute to that pillar
    #[serde(default)]
    pub pillar_weights: BTreeMap<Pillar, f64>,

    /// Demographic buckets, exactly one of which applies to any patient
    #[serde(rename = "subs")]
    pub sub_configs: Vec<SubConfig>,
}

impl MarkerConfig {
    /// Select the sub-config applicable to this patient.
    ///
    /// Load-time validation guarantees demographic exclusivity, so at most
    /// one bucket can match.
    pub fn sub_config_for(&self, ctx: &PatientContext) -> Option<&SubConfig> {
        self.sub_configs.iter().find(|sub| sub.applies_to(ctx))
    }

    /// Positive-weight pillar entries, in stable pillar order
    pub fn active_weights(&self) -> impl Iterator<Item = (Pillar, f64)> + '_ {
        self.pillar_weights
            .iter()
            .filter(|(_, w)| **w > 0.0)
            .map(|(p, w)| (*p, *w))
    }
}

fn default_age_max() -> u32 {
    999
}

/// A demographic bucket: a range table gated on sex and an inclusive age band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubConfig {
    #[serde(default)]
    pub gender: Gender,

    #[serde(default)]
    pub age_min: u32,

    #[serde(default = "default_age_max")]
    pub age_max: u32,

    pub ranges: Vec<RangeSpec>,
}

impl SubConfig {
    pub fn applies_to(&self, ctx: &PatientContext) -> bool {
        self.gender.admits(ctx.sex) && self.age_min <= ctx.age && ctx.age <= self.age_max
    }

    /// Locate the range containing `value`. Contiguous ranges share their
    /// boundary point; the first declared of the two adjacent ranges wins
    /// there, which validation makes value-identical for linear scoring.
    pub fn range_for(&self, value: f64) -> Option<&RangeSpec> {
        self.ranges.iter().find(|r| r.contains(value))
    }
}

/// A scoring bucket within a sub-config. Either bound may be open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeSpec {
    pub label: String,

    #[serde(default)]
    pub min: Option<f64>,

    #[serde(default)]
    pub max: Option<f64>,

    #[serde(flatten)]
    pub score: RangeScore,
}

/// How a range maps a value to raw points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "score_type", rename_all = "snake_case")]
pub enum RangeScore {
    /// Every value in the range earns the same points
    Fixed { score: f64 },
    /// Points interpolate linearly from `score_start` at `min` to
    /// `score_end` at `max`
    Linear { score_start: f64, score_end: f64 },
}

impl RangeSpec {
    pub fn contains(&self, value: f64) -> bool {
        self.min.is_none_or(|m| value >= m) && self.max.is_none_or(|m| value <= m)
    }

    /// Raw points (0-10 scale) for an in-range value.
    ///
    /// A linear range with `min == max` (or with an open bound, which
    /// validation rejects) resolves to `score_end`.
    pub fn score_at(&self, value: f64) -> f64 {
        match &self.score {
            RangeScore::Fixed { score } => *score,
            RangeScore::Linear {
                score_start,
                score_end,
            } => match (self.min, self.max) {
                (Some(min), Some(max)) if max > min => {
                    let position = (value - min) / (max - min);
                    score_start + (score_end - score_start) * position
                }
                _ => *score_end,
            },
        }
    }

    /// Points at the lower boundary, used by the continuity validation
    pub fn score_at_lower(&self) -> f64 {
        match &self.score {
            RangeScore::Fixed { score } => *score,
            RangeScore::Linear { score_start, .. } => *score_start,
        }
    }

    /// Points at the upper boundary, used by the continuity validation
    pub fn score_at_upper(&self) -> f64 {
        match &self.score {
            RangeScore::Fixed { score } => *score,
            RangeScore::Linear { score_end, .. } => *score_end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Sex;

    fn linear(label: &str, min: f64, max: f64, start: f64, end: f64) -> RangeSpec {
        RangeSpec {
            label: label.to_string(),
            min: Some(min),
            max: Some(max),
            score: RangeScore::Linear {
                score_start: start,
                score_end: end,
            },
        }
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let range = linear("optimal", 150.0, 350.0, 0.0, 7.0);
        assert!(range.contains(150.0));
        assert!(range.contains(350.0));
        assert!(!range.contains(149.9));
        assert!(!range.contains(350.1));
    }

    #[test]
    fn open_bounds_match_everything_on_that_side() {
        let range = RangeSpec {
            label: "high".to_string(),
            min: Some(240.0),
            max: None,
            score: RangeScore::Fixed { score: 2.0 },
        };
        assert!(range.contains(240.0));
        assert!(range.contains(1e9));
        assert!(!range.contains(239.0));
    }

    #[test]
    fn linear_interpolation_matches_endpoints() {
        let range = linear("decline", 100.0, 200.0, 10.0, 4.0);
        assert_eq!(range.score_at(100.0), 10.0);
        assert_eq!(range.score_at(200.0), 4.0);
        assert_eq!(range.score_at(150.0), 7.0);
    }

    #[test]
    fn degenerate_linear_range_resolves_to_score_end() {
        let range = linear("point", 50.0, 50.0, 2.0, 8.0);
        assert_eq!(range.score_at(50.0), 8.0);
    }

    #[test]
    fn sub_config_gates_on_sex_and_age() {
        let sub = SubConfig {
            gender: Gender::Female,
            age_min: 40,
            age_max: 59,
            ranges: vec![],
        };

        assert!(sub.applies_to(&PatientContext::new(40, Sex::Female)));
        assert!(sub.applies_to(&PatientContext::new(59, Sex::Female)));
        assert!(!sub.applies_to(&PatientContext::new(39, Sex::Female)));
        assert!(!sub.applies_to(&PatientContext::new(60, Sex::Female)));
        assert!(!sub.applies_to(&PatientContext::new(45, Sex::Male)));
    }

    #[test]
    fn marker_config_parses_source_json_shape() {
        let json = r#"{
            "name": "DHEA-S",
            "pillar_weights": {"CoreCare": 1.0, "Stress": 0.5},
            "subs": [
                {
                    "gender": "male",
                    "ranges": [
                        {"label": "low", "max": 150, "score_type": "fixed", "score": 0},
                        {"label": "optimal", "min": 150, "max": 350,
                         "score_type": "linear", "score_start": 0, "score_end": 7}
                    ]
                }
            ]
        }"#;

        let config: MarkerConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.name, "DHEA-S");
        assert_eq!(config.sub_configs.len(), 1);
        assert_eq!(config.sub_configs[0].gender, Gender::Male);
        assert_eq!(config.sub_configs[0].age_min, 0);
        assert_eq!(config.sub_configs[0].age_max, 999);
        assert!(matches!(
            config.sub_configs[0].ranges[1].score,
            RangeScore::Linear { .. }
        ));
    }

    #[test]
    fn active_weights_skips_zero_entries() {
        let mut weights = BTreeMap::new();
        weights.insert(Pillar::Sleep, 5.0);
        weights.insert(Pillar::Movement, 0.0);
        let config = MarkerConfig {
            item_key: "rem_sleep".to_string(),
            name: "REM Sleep".to_string(),
            pillar_weights: weights,
            sub_configs: vec![],
        };

        let active: Vec<_> = config.active_weights().collect();
        assert_eq!(active, vec![(Pillar::Sleep, 5.0)]);
    }
}
