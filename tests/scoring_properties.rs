//! Property tests for the scoring invariants.

mod common;

use std::collections::BTreeMap;

use proptest::prelude::*;
use wellpath::{score_patient, PatientContext, PatientInput, Sex};

fn patient(hdl: f64, crp: f64, vo2: f64, deep_sleep: f64, age: u32, sex: Sex) -> PatientInput {
    PatientInput {
        patient_id: "prop".to_string(),
        context: PatientContext::new(age, sex),
        biomarkers: BTreeMap::from([("hdl".to_string(), hdl), ("crp".to_string(), crp)]),
        biometrics: BTreeMap::from([
            ("vo2_max".to_string(), vo2),
            ("deep_sleep_minutes".to_string(), deep_sleep),
        ]),
        survey: Vec::new(),
    }
}

proptest! {
    /// Every scored item normalizes into [0, 1], and every pillar percentage
    /// into [0, 100], for any in-domain or out-of-domain value.
    #[test]
    fn normalized_scores_stay_in_unit_interval(
        hdl in -50.0..300.0f64,
        crp in -5.0..50.0f64,
        vo2 in 0.0..90.0f64,
        deep_sleep in 0.0..600.0f64,
        age in 0u32..100,
        male in any::<bool>(),
    ) {
        let config = common::engine_config();
        let sex = if male { Sex::Male } else { Sex::Female };
        let report = score_patient(&config, &patient(hdl, crp, vo2, deep_sleep, age, sex)).unwrap();

        for item in &report.item_details {
            prop_assert!((0.0..=1.0).contains(&item.normalized_score),
                "{}: normalized {}", item.item_key, item.normalized_score);
        }
        for pillar in &report.pillars {
            prop_assert!((0.0..=100.0).contains(&pillar.percentage),
                "{}: percentage {}", pillar.pillar_name, pillar.percentage);
            prop_assert!(!pillar.percentage.is_nan());
        }
        prop_assert!((0.0..=1.0).contains(&report.overall_score));
    }

    /// Max totals depend only on which items applied, never on the values
    /// supplied for them.
    #[test]
    fn max_totals_are_value_independent(
        hdl_a in 0.0..200.0f64, hdl_b in 0.0..200.0f64,
        crp_a in 0.0..10.0f64, crp_b in 0.0..10.0f64,
    ) {
        let config = common::engine_config();
        // Values chosen inside the authored domains, so nothing is skipped.
        let a = score_patient(&config, &patient(hdl_a, crp_a, 40.0, 90.0, 45, Sex::Male)).unwrap();
        let b = score_patient(&config, &patient(hdl_b, crp_b, 40.0, 90.0, 45, Sex::Male)).unwrap();

        for (pa, pb) in a.pillars.iter().zip(&b.pillars) {
            prop_assert_eq!(pa.pillar, pb.pillar);
            prop_assert!((pa.max_total - pb.max_total).abs() < 1e-12,
                "{}: {} vs {}", pa.pillar_name, pa.max_total, pb.max_total);
        }
    }

    /// Scoring is a pure function: the same input yields a bit-identical
    /// report.
    #[test]
    fn scoring_is_deterministic(
        hdl in 0.0..200.0f64,
        crp in 0.0..10.0f64,
        age in 0u32..100,
    ) {
        let config = common::engine_config();
        let input = patient(hdl, crp, 40.0, 90.0, age, Sex::Female);

        let a = score_patient(&config, &input).unwrap();
        let b = score_patient(&config, &input).unwrap();
        prop_assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    /// Linear interpolation is continuous: values straddling a validated
    /// shared boundary score within epsilon of each other.
    #[test]
    fn linear_scoring_is_continuous_at_boundaries(offset in 1e-9..1e-6f64) {
        let config = common::engine_config();

        // Male HDL boundary at 60: borderline (linear ...->10) meets optimal
        // (fixed 10).
        let below = score_patient(&config, &patient(60.0 - offset, 1.0, 40.0, 90.0, 45, Sex::Male)).unwrap();
        let above = score_patient(&config, &patient(60.0 + offset, 1.0, 40.0, 90.0, 45, Sex::Male)).unwrap();

        let hdl = |r: &wellpath::ScoreReport| {
            r.item_details.iter().find(|i| i.item_key == "hdl").unwrap().raw_score
        };
        prop_assert!((hdl(&below) - hdl(&above)).abs() < 1e-3);
    }
}
