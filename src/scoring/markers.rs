//! Marker scoring: maps a lab or body-measurement value to a normalized
//! sub-score through the sex/age-gated range tables.

use std::collections::BTreeMap;

use crate::config::marker::RAW_SCALE;
use crate::config::MarkerTable;
use crate::core::types::{ItemKind, ItemScore, PatientContext, PillarContribution};
use crate::errors::{Omission, SkipReason};
use crate::scoring::ComponentOutcome;

/// Score a single marker value.
///
/// Skips are returned, not raised: the caller records the omission and the
/// run continues. A skipped item contributes to neither the raw nor the max
/// total of any pillar.
pub fn score_value(
    table: &MarkerTable,
    item_key: &str,
    value: f64,
    kind: ItemKind,
    ctx: &PatientContext,
) -> Result<ItemScore, SkipReason> {
    let config = table.get(item_key).ok_or(SkipReason::ConfigNotFound)?;
    let sub = config
        .sub_config_for(ctx)
        .ok_or(SkipReason::NoMatchingDemographic)?;
    let range = sub.range_for(value).ok_or(SkipReason::OutOfRange)?;

    let raw_score = range.score_at(value);
    let normalized = raw_score / RAW_SCALE;

    // Max per pillar is the full weight: a scorable item can always reach
    // a normalized score of 1.0, whatever it actually achieved.
    let pillar_contributions: Vec<PillarContribution> = config
        .active_weights()
        .map(|(pillar, weight)| PillarContribution {
            pillar,
            weight,
            weighted_score: normalized * weight,
            max_weighted: weight,
        })
        .collect();

    Ok(ItemScore {
        item_key: item_key.to_string(),
        item_kind: kind,
        raw_value: Some(value),
        answer: None,
        range_label: Some(range.label.clone()),
        raw_score,
        normalized_score: normalized,
        pillar_contributions,
    })
}

/// Score a batch of marker values for one patient.
///
/// Values are visited in key order, so the outcome is deterministic for a
/// given input map.
pub fn score_markers(
    table: &MarkerTable,
    values: &BTreeMap<String, f64>,
    kind: ItemKind,
    ctx: &PatientContext,
) -> ComponentOutcome {
    let mut outcome = ComponentOutcome::default();

    for (item_key, value) in values {
        match score_value(table, item_key, *value, kind, ctx) {
            Ok(item) => outcome.record_item(item),
            Err(reason) => outcome.record_omission(Omission::new(item_key, kind, reason)),
        }
    }

    outcome
}
