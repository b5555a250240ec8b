//! Composite question algorithms.
//!
//! A composite question combines its own answer with other answers or with
//! patient facts. Every algorithm returns raw points on the 0-10 authoring
//! scale plus the maximum it could have returned, so the survey scorer
//! accumulates composites exactly like plain scale questions.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Utc};

use crate::config::survey::{CompositeAlgorithm, CountBand};
use crate::core::types::PatientContext;
use crate::errors::SkipReason;

/// Pounds per kilogram, as used by the personalized-target formulas
const LB_PER_KG: f64 = 2.205;

/// Combined factor at or above which a frequency x duration pair earns full
/// points
const FREQ_DUR_FULL_CREDIT: f64 = 1.6;

/// Result of evaluating a composite algorithm
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompositeScore {
    pub points: f64,
    pub max_points: f64,
}

/// Evaluate a composite algorithm for one question.
///
/// `answer` is the answer to the question the algorithm is attached to;
/// `responses` gives access to constituent answers. A missing constituent
/// fails with [`SkipReason::IncompleteComposite`] and the question is left
/// unscored (excluded from raw and max), never defaulted to zero.
pub fn evaluate(
    algorithm: &CompositeAlgorithm,
    question_number: &str,
    answer: &str,
    responses: &BTreeMap<String, String>,
    ctx: &PatientContext,
) -> Result<CompositeScore, SkipReason> {
    match algorithm {
        CompositeAlgorithm::FrequencyDuration {
            frequency_question,
            duration_question,
            frequency_factors,
            duration_factors,
        } => frequency_duration(
            question_number,
            frequency_question,
            duration_question,
            frequency_factors,
            duration_factors,
            responses,
        ),
        CompositeAlgorithm::PairTable {
            row_question,
            col_question,
            table,
        } => pair_table(question_number, row_question, col_question, table, responses),
        CompositeAlgorithm::MultiSelectCount { bands } => Ok(multi_select_count(answer, bands)),
        CompositeAlgorithm::ScreeningRecency { window_months } => {
            screening_recency(question_number, answer, *window_months, ctx)
        }
        CompositeAlgorithm::ProteinTarget => protein_target(answer, ctx),
        CompositeAlgorithm::CalorieTarget => calorie_target(answer, ctx),
    }
}

fn constituent(
    responses: &BTreeMap<String, String>,
    question: &str,
) -> Result<String, SkipReason> {
    responses
        .get(question)
        .map(|a| a.trim().to_string())
        .ok_or_else(|| SkipReason::IncompleteComposite {
            missing: question.to_string(),
        })
}

fn lookup_factor(question: &str, answer: &str, factors: &BTreeMap<String, f64>) -> f64 {
    match factors.get(answer) {
        Some(factor) => *factor,
        None => {
            log::debug!("question {question}: answer '{answer}' has no factor, using 0");
            0.0
        }
    }
}

/// How often x how long. Full points when the combined factor reaches
/// [`FREQ_DUR_FULL_CREDIT`], otherwise half the combined factor.
fn frequency_duration(
    question_number: &str,
    frequency_question: &str,
    duration_question: &str,
    frequency_factors: &BTreeMap<String, f64>,
    duration_factors: &BTreeMap<String, f64>,
    responses: &BTreeMap<String, String>,
) -> Result<CompositeScore, SkipReason> {
    let freq_answer = constituent(responses, frequency_question)?;
    let dur_answer = constituent(responses, duration_question)?;

    let freq = lookup_factor(question_number, &freq_answer, frequency_factors);
    let dur = lookup_factor(question_number, &dur_answer, duration_factors);

    let factor = if freq == 0.0 && dur == 0.0 {
        0.0
    } else {
        let total = freq + dur;
        if total >= FREQ_DUR_FULL_CREDIT {
            1.0
        } else {
            total / 2.0
        }
    };

    Ok(CompositeScore {
        points: factor * 10.0,
        max_points: 10.0,
    })
}

/// Two answers index a points grid; an unmapped pair scores zero but the
/// question still accrues max.
fn pair_table(
    question_number: &str,
    row_question: &str,
    col_question: &str,
    table: &BTreeMap<String, BTreeMap<String, f64>>,
    responses: &BTreeMap<String, String>,
) -> Result<CompositeScore, SkipReason> {
    let row_answer = constituent(responses, row_question)?;
    let col_answer = constituent(responses, col_question)?;

    let points = match table.get(&row_answer).and_then(|row| row.get(&col_answer)) {
        Some(points) => *points,
        None => {
            log::debug!(
                "question {question_number}: no cell for ('{row_answer}', '{col_answer}'), using 0"
            );
            0.0
        }
    };

    let max_points = table
        .values()
        .flat_map(|row| row.values())
        .copied()
        .fold(0.0, f64::max);

    Ok(CompositeScore { points, max_points })
}

/// Split a `|`-separated multi-select answer into trimmed, non-empty options
pub fn split_selections(answer: &str) -> Vec<&str> {
    answer
        .split('|')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

fn multi_select_count(answer: &str, bands: &[CountBand]) -> CompositeScore {
    let count = split_selections(answer).len() as u32;

    // Bands are validated to be strictly descending by min_count.
    let factor = bands
        .iter()
        .find(|band| count >= band.min_count)
        .map(|band| band.factor)
        .unwrap_or(0.0);

    let best = bands.iter().map(|b| b.factor).fold(0.0, f64::max);

    CompositeScore {
        points: factor * 10.0,
        max_points: best * 10.0,
    }
}

fn months_between(earlier: NaiveDate, later: NaiveDate) -> i32 {
    (later.year() - earlier.year()) * 12 + (later.month() as i32 - earlier.month() as i32)
}

/// Screening recency: full credit within the guideline window, partial
/// credit up to 1.5x the window, token credit beyond.
fn screening_recency(
    question_number: &str,
    answer: &str,
    window_months: u32,
    ctx: &PatientContext,
) -> Result<CompositeScore, SkipReason> {
    let exam_date = NaiveDate::parse_from_str(answer.trim(), "%Y-%m-%d").map_err(|_| {
        SkipReason::IncompleteComposite {
            missing: format!("parseable date answer for {question_number}"),
        }
    })?;

    let today = ctx.scored_on.unwrap_or_else(|| Utc::now().date_naive());
    let months_ago = months_between(exam_date, today);

    let points = if months_ago <= window_months as i32 {
        10.0
    } else if months_ago as f64 <= window_months as f64 * 1.5 {
        6.0
    } else {
        2.0
    };

    Ok(CompositeScore {
        points,
        max_points: 10.0,
    })
}

fn numeric_answer(answer: &str, what: &str) -> Result<f64, SkipReason> {
    answer
        .trim()
        .parse::<f64>()
        .map_err(|_| SkipReason::IncompleteComposite {
            missing: what.to_string(),
        })
}

fn weight_kg(ctx: &PatientContext) -> Result<f64, SkipReason> {
    ctx.weight_lb
        .filter(|w| *w > 0.0)
        .map(|w| w / LB_PER_KG)
        .ok_or_else(|| SkipReason::IncompleteComposite {
            missing: "patient weight".to_string(),
        })
}

/// Daily protein grams against a personalized target: 1.2 g/kg, rising to
/// 1.5 g/kg from age 65.
fn protein_target(answer: &str, ctx: &PatientContext) -> Result<CompositeScore, SkipReason> {
    let grams = numeric_answer(answer, "numeric protein intake")?;
    let kg = weight_kg(ctx)?;

    let per_kg = if ctx.age < 65 { 1.2 } else { 1.5 };
    let target = per_kg * kg;
    let pct = grams / target;

    let points = if pct >= 1.0 {
        10.0
    } else if pct >= 0.8 {
        8.0
    } else if pct >= 0.6 {
        6.0
    } else if pct > 0.0 {
        4.0
    } else {
        0.0
    };

    Ok(CompositeScore {
        points,
        max_points: 10.0,
    })
}

/// Daily calories against a Harris-Benedict BMR target with a sedentary
/// multiplier. Reference heights: 175 cm male, 162 cm female.
fn calorie_target(answer: &str, ctx: &PatientContext) -> Result<CompositeScore, SkipReason> {
    let calories = numeric_answer(answer, "numeric calorie intake")?;
    let kg = weight_kg(ctx)?;
    let age = ctx.age as f64;

    let bmr = match ctx.sex {
        crate::core::types::Sex::Male => 88.362 + 13.397 * kg + 4.799 * 175.0 - 5.677 * age,
        crate::core::types::Sex::Female => 447.593 + 9.247 * kg + 3.098 * 162.0 - 4.330 * age,
    };
    let target = bmr * 1.2;
    let pct = if target > 0.0 { calories / target } else { 0.0 };

    let points = if (0.85..=1.15).contains(&pct) {
        10.0
    } else if (0.75..0.85).contains(&pct) || (pct > 1.15 && pct <= 1.25) {
        8.0
    } else if (0.65..0.75).contains(&pct) || (pct > 1.25 && pct <= 1.35) {
        6.0
    } else {
        2.0
    };

    Ok(CompositeScore {
        points,
        max_points: 10.0,
    })
}
