//! Survey scoring: per-question answer maps and composite dispatch, with
//! per-pillar raw/max accumulation.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::marker::RAW_SCALE;
use crate::config::survey::QuestionKind;
use crate::config::SurveyTable;
use crate::core::types::{ItemKind, ItemScore, PatientContext, PillarContribution, SurveyResponse};
use crate::errors::{Omission, SkipReason};
use crate::scoring::{composite, ComponentOutcome};

/// Question numbers that only exist to feed a composite on another question.
/// They carry no configuration of their own and are not scored directly.
fn constituent_questions(table: &SurveyTable) -> BTreeSet<String> {
    table
        .values()
        .filter_map(|q| match &q.kind {
            QuestionKind::Composite { algorithm } => Some(algorithm.constituent_questions()),
            QuestionKind::Scale { .. } => None,
        })
        .flatten()
        .map(str::to_string)
        .collect()
}

/// Score all survey responses for one patient.
///
/// Max accrues for every question offered to the patient (present in the
/// response set), independent of the answer given. A question skipped for an
/// incomplete composite accrues neither raw nor max.
pub fn score_survey(
    table: &SurveyTable,
    responses: &[SurveyResponse],
    ctx: &PatientContext,
) -> ComponentOutcome {
    // Later duplicates of a question number override earlier ones.
    let response_map: BTreeMap<String, String> = responses
        .iter()
        .map(|r| (r.question_number.clone(), r.answer.clone()))
        .collect();

    let constituents = constituent_questions(table);
    let mut outcome = ComponentOutcome::default();

    for (question_number, answer) in &response_map {
        let Some(config) = table.get(question_number) else {
            if constituents.contains(question_number) {
                log::debug!("question {question_number}: constituent answer, not scored directly");
                continue;
            }
            outcome.record_omission(Omission::new(
                question_number,
                ItemKind::Survey,
                SkipReason::ConfigNotFound,
            ));
            continue;
        };

        let (points, max_points) = match &config.kind {
            QuestionKind::Scale { answer_scores } => {
                let points = match answer_scores.get(answer.trim()) {
                    Some(points) => *points,
                    None => {
                        log::warn!(
                            "question {question_number}: unmapped answer '{answer}' scored 0"
                        );
                        0.0
                    }
                };
                (points, config.kind.max_points())
            }
            QuestionKind::Composite { algorithm } => {
                match composite::evaluate(algorithm, question_number, answer, &response_map, ctx) {
                    Ok(score) => (score.points, score.max_points),
                    Err(reason) => {
                        outcome.record_omission(Omission::new(
                            question_number,
                            ItemKind::Survey,
                            reason,
                        ));
                        continue;
                    }
                }
            }
        };

        let pillar_contributions: Vec<PillarContribution> = config
            .active_weights()
            .map(|(pillar, weight)| PillarContribution {
                pillar,
                weight,
                weighted_score: points * weight,
                max_weighted: max_points * weight,
            })
            .collect();

        outcome.record_item(ItemScore {
            item_key: question_number.clone(),
            item_kind: ItemKind::Survey,
            raw_value: None,
            answer: Some(answer.clone()),
            range_label: None,
            raw_score: points,
            normalized_score: points / RAW_SCALE,
            pillar_contributions,
        });
    }

    outcome
}
