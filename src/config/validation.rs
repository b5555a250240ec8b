//! Eager configuration validation with error accumulation.
//!
//! All issues across the whole snapshot are collected before failing, so a
//! config author sees every problem in a single run. Validation runs once at
//! snapshot construction; the scorers can then assume demographic
//! exclusivity and non-overlapping, contiguous ranges.

use std::collections::BTreeMap;

use crate::config::marker::{MarkerConfig, RangeScore, RangeSpec, SubConfig};
use crate::config::survey::{CompositeAlgorithm, QuestionKind, SurveyQuestionConfig};
use crate::core::types::{Gender, Pillar};

/// Tolerance for score continuity across a shared range boundary
const CONTINUITY_EPSILON: f64 = 1e-6;

/// Validate a whole snapshot, returning every issue found.
///
/// An empty vector means the configuration is sound.
pub fn validate_snapshot(
    biomarkers: &im::HashMap<String, MarkerConfig>,
    biometrics: &im::HashMap<String, MarkerConfig>,
    questions: &im::HashMap<String, SurveyQuestionConfig>,
    pillar_weights: Option<&BTreeMap<Pillar, f64>>,
) -> Vec<String> {
    let mut issues = Vec::new();

    validate_marker_table("biomarker", biomarkers, &mut issues);
    validate_marker_table("biometric", biometrics, &mut issues);
    for (key, question) in questions {
        validate_question(key, question, &mut issues);
    }
    if let Some(weights) = pillar_weights {
        validate_pillar_weight_override(weights, &mut issues);
    }

    // Table iteration order is unspecified; sort for stable reporting.
    issues.sort();
    issues
}

fn validate_marker_table(
    kind: &str,
    table: &im::HashMap<String, MarkerConfig>,
    issues: &mut Vec<String>,
) {
    for (key, config) in table {
        validate_marker(kind, key, config, issues);
    }
}

fn validate_marker(kind: &str, key: &str, config: &MarkerConfig, issues: &mut Vec<String>) {
    let ctx = format!("{kind} '{key}'");

    validate_weights(&ctx, &config.pillar_weights, issues);

    if config.sub_configs.is_empty() {
        issues.push(format!("{ctx}: no sub-configs"));
    }

    for (i, sub) in config.sub_configs.iter().enumerate() {
        validate_sub_config(&format!("{ctx} sub {i}"), sub, issues);
    }

    validate_demographic_exclusivity(&ctx, &config.sub_configs, issues);
}

fn validate_sub_config(ctx: &str, sub: &SubConfig, issues: &mut Vec<String>) {
    if sub.age_min > sub.age_max {
        issues.push(format!(
            "{ctx}: age_min {} exceeds age_max {}",
            sub.age_min, sub.age_max
        ));
    }

    if sub.ranges.is_empty() {
        issues.push(format!("{ctx}: no ranges"));
        return;
    }

    for range in &sub.ranges {
        validate_range(ctx, range, issues);
    }

    validate_range_coverage(ctx, &sub.ranges, issues);
}

fn validate_range(ctx: &str, range: &RangeSpec, issues: &mut Vec<String>) {
    let label = &range.label;

    if let (Some(min), Some(max)) = (range.min, range.max) {
        if min > max {
            issues.push(format!("{ctx} range '{label}': min {min} exceeds max {max}"));
        }
    }

    match &range.score {
        RangeScore::Fixed { score } => {
            if !(0.0..=10.0).contains(score) || !score.is_finite() {
                issues.push(format!(
                    "{ctx} range '{label}': score {score} outside 0-10"
                ));
            }
        }
        RangeScore::Linear {
            score_start,
            score_end,
        } => {
            if range.min.is_none() || range.max.is_none() {
                issues.push(format!(
                    "{ctx} range '{label}': linear range requires both bounds"
                ));
            }
            for (name, value) in [("score_start", score_start), ("score_end", score_end)] {
                if !(0.0..=10.0).contains(value) || !value.is_finite() {
                    issues.push(format!(
                        "{ctx} range '{label}': {name} {value} outside 0-10"
                    ));
                }
            }
        }
    }
}

/// Check that ranges partition the declared domain: sorted by lower bound,
/// no interior overlap, no gaps, open bounds only at the extremes, and
/// linear scores continuous across shared boundaries.
fn validate_range_coverage(ctx: &str, ranges: &[RangeSpec], issues: &mut Vec<String>) {
    let mut sorted: Vec<&RangeSpec> = ranges.iter().collect();
    sorted.sort_by(|a, b| {
        let a_min = a.min.unwrap_or(f64::NEG_INFINITY);
        let b_min = b.min.unwrap_or(f64::NEG_INFINITY);
        a_min.partial_cmp(&b_min).unwrap_or(std::cmp::Ordering::Equal)
    });

    for (i, range) in sorted.iter().enumerate() {
        if i > 0 && range.min.is_none() {
            issues.push(format!(
                "{ctx}: more than one range with an open lower bound"
            ));
        }
        if i + 1 < sorted.len() && range.max.is_none() {
            issues.push(format!(
                "{ctx} range '{}': open upper bound on a non-final range",
                range.label
            ));
        }
    }

    for pair in sorted.windows(2) {
        let (lower, upper) = (pair[0], pair[1]);
        let (Some(lower_max), Some(upper_min)) = (lower.max, upper.min) else {
            continue; // already reported above
        };

        if lower_max > upper_min {
            issues.push(format!(
                "{ctx}: ranges '{}' and '{}' overlap",
                lower.label, upper.label
            ));
        } else if lower_max < upper_min {
            issues.push(format!(
                "{ctx}: gap between ranges '{}' and '{}'",
                lower.label, upper.label
            ));
        } else if matches!(lower.score, RangeScore::Linear { .. })
            && matches!(upper.score, RangeScore::Linear { .. })
            && (lower.score_at_upper() - upper.score_at_lower()).abs() > CONTINUITY_EPSILON
        {
            issues.push(format!(
                "{ctx}: discontinuous linear score across boundary of '{}' and '{}'",
                lower.label, upper.label
            ));
        }
    }
}

fn genders_intersect(a: Gender, b: Gender) -> bool {
    a == Gender::Both || b == Gender::Both || a == b
}

/// No two sub-configs may both apply to the same (sex, age). The source
/// system silently took the first match, which once shipped a sex-mismatch
/// scoring bug; ambiguity is a load-time error here.
fn validate_demographic_exclusivity(ctx: &str, subs: &[SubConfig], issues: &mut Vec<String>) {
    for i in 0..subs.len() {
        for j in (i + 1)..subs.len() {
            let (a, b) = (&subs[i], &subs[j]);
            let ages_intersect = a.age_min <= b.age_max && b.age_min <= a.age_max;
            if genders_intersect(a.gender, b.gender) && ages_intersect {
                issues.push(format!(
                    "{ctx}: sub-configs {i} and {j} both apply to some (sex, age)"
                ));
            }
        }
    }
}

fn validate_question(key: &str, question: &SurveyQuestionConfig, issues: &mut Vec<String>) {
    let ctx = format!("question '{key}'");

    validate_weights(&ctx, &question.pillar_weights, issues);

    match &question.kind {
        QuestionKind::Scale { answer_scores } => {
            if answer_scores.is_empty() {
                issues.push(format!("{ctx}: empty answer score map"));
            }
            for (answer, points) in answer_scores {
                if !(0.0..=10.0).contains(points) || !points.is_finite() {
                    issues.push(format!(
                        "{ctx}: answer '{answer}' points {points} outside 0-10"
                    ));
                }
            }
        }
        QuestionKind::Composite { algorithm } => {
            validate_algorithm(&ctx, algorithm, issues);
        }
    }
}

fn validate_algorithm(ctx: &str, algorithm: &CompositeAlgorithm, issues: &mut Vec<String>) {
    match algorithm {
        CompositeAlgorithm::FrequencyDuration {
            frequency_factors,
            duration_factors,
            ..
        } => {
            for (name, factors) in [
                ("frequency_factors", frequency_factors),
                ("duration_factors", duration_factors),
            ] {
                if factors.is_empty() {
                    issues.push(format!("{ctx}: empty {name}"));
                }
                for (answer, factor) in factors {
                    if !(0.0..=1.0).contains(factor) || !factor.is_finite() {
                        issues.push(format!(
                            "{ctx}: {name} '{answer}' factor {factor} outside 0-1"
                        ));
                    }
                }
            }
        }
        CompositeAlgorithm::PairTable { table, .. } => {
            if table.is_empty() {
                issues.push(format!("{ctx}: empty pair table"));
            }
            for (row, cols) in table {
                if cols.is_empty() {
                    issues.push(format!("{ctx}: pair table row '{row}' has no columns"));
                }
                for (col, points) in cols {
                    if !(0.0..=10.0).contains(points) || !points.is_finite() {
                        issues.push(format!(
                            "{ctx}: pair table cell ('{row}', '{col}') points {points} outside 0-10"
                        ));
                    }
                }
            }
        }
        CompositeAlgorithm::MultiSelectCount { bands } => {
            if bands.is_empty() {
                issues.push(format!("{ctx}: no count bands"));
            }
            for band in bands {
                if !(0.0..=1.0).contains(&band.factor) || !band.factor.is_finite() {
                    issues.push(format!(
                        "{ctx}: band factor {} outside 0-1",
                        band.factor
                    ));
                }
            }
            for pair in bands.windows(2) {
                if pair[0].min_count <= pair[1].min_count {
                    issues.push(format!(
                        "{ctx}: count bands must be strictly descending by min_count"
                    ));
                    break;
                }
            }
        }
        CompositeAlgorithm::ScreeningRecency { window_months } => {
            if *window_months == 0 {
                issues.push(format!("{ctx}: screening window must be positive"));
            }
        }
        CompositeAlgorithm::ProteinTarget | CompositeAlgorithm::CalorieTarget => {}
    }
}

fn validate_weights(ctx: &str, weights: &BTreeMap<Pillar, f64>, issues: &mut Vec<String>) {
    for (pillar, weight) in weights {
        if *weight < 0.0 || !weight.is_finite() {
            issues.push(format!(
                "{ctx}: weight {weight} for pillar {} must be finite and non-negative",
                pillar.key()
            ));
        }
    }
}

/// The overall pillar-weight override must be usable as a weighted mean.
fn validate_pillar_weight_override(weights: &BTreeMap<Pillar, f64>, issues: &mut Vec<String>) {
    validate_weights("pillar weight override", weights, issues);

    let sum: f64 = weights.values().sum();
    if sum <= 0.0 {
        issues.push(format!(
            "pillar weight override: weights sum to {sum}, must be positive"
        ));
    }
}
