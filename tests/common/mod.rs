//! Shared fixtures for integration tests: a small but representative
//! configuration snapshot covering fixed and linear ranges, sex/age gating,
//! scale questions, and every composite algorithm family.

// Not every test binary uses every fixture.
#![allow(dead_code)]

use std::collections::BTreeMap;

use indoc::indoc;
use wellpath::{EngineConfig, PatientContext, PatientInput, Sex, SurveyResponse};

pub const BIOMARKER_JSON: &str = indoc! {r#"
    {
        "hdl": {
            "name": "HDL Cholesterol",
            "pillar_weights": {"Nutrition": 1.0, "CoreCare": 0.5},
            "subs": [
                {
                    "gender": "male",
                    "ranges": [
                        {"label": "low", "max": 40, "score_type": "fixed", "score": 2},
                        {"label": "borderline", "min": 40, "max": 60,
                         "score_type": "linear", "score_start": 2, "score_end": 10},
                        {"label": "optimal", "min": 60, "score_type": "fixed", "score": 10}
                    ]
                },
                {
                    "gender": "female",
                    "ranges": [
                        {"label": "low", "max": 50, "score_type": "fixed", "score": 2},
                        {"label": "borderline", "min": 50, "max": 70,
                         "score_type": "linear", "score_start": 2, "score_end": 10},
                        {"label": "optimal", "min": 70, "score_type": "fixed", "score": 10}
                    ]
                }
            ]
        },
        "crp": {
            "name": "C-Reactive Protein",
            "pillar_weights": {"CoreCare": 1.0},
            "subs": [
                {
                    "ranges": [
                        {"label": "optimal", "max": 1.0, "score_type": "fixed", "score": 10},
                        {"label": "elevated", "min": 1.0, "max": 3.0,
                         "score_type": "linear", "score_start": 10, "score_end": 2},
                        {"label": "high", "min": 3.0, "max": 10.0, "score_type": "fixed", "score": 0}
                    ]
                }
            ]
        }
    }
"#};

pub const BIOMETRIC_JSON: &str = indoc! {r#"
    {
        "vo2_max": {
            "name": "VO2 Max",
            "pillar_weights": {"Movement": 2.0},
            "subs": [
                {
                    "gender": "male", "age_min": 0, "age_max": 49,
                    "ranges": [
                        {"label": "poor", "min": 0, "max": 35,
                         "score_type": "linear", "score_start": 0, "score_end": 5},
                        {"label": "fit", "min": 35, "max": 55,
                         "score_type": "linear", "score_start": 5, "score_end": 10},
                        {"label": "elite", "min": 55, "score_type": "fixed", "score": 10}
                    ]
                },
                {
                    "gender": "male", "age_min": 50, "age_max": 999,
                    "ranges": [
                        {"label": "poor", "min": 0, "max": 28,
                         "score_type": "linear", "score_start": 0, "score_end": 5},
                        {"label": "fit", "min": 28, "max": 45,
                         "score_type": "linear", "score_start": 5, "score_end": 10},
                        {"label": "elite", "min": 45, "score_type": "fixed", "score": 10}
                    ]
                },
                {
                    "gender": "female",
                    "ranges": [
                        {"label": "poor", "min": 0, "max": 30,
                         "score_type": "linear", "score_start": 0, "score_end": 5},
                        {"label": "fit", "min": 30, "max": 48,
                         "score_type": "linear", "score_start": 5, "score_end": 10},
                        {"label": "elite", "min": 48, "score_type": "fixed", "score": 10}
                    ]
                }
            ]
        },
        "deep_sleep_minutes": {
            "name": "Deep Sleep",
            "pillar_weights": {"Sleep": 2.0},
            "subs": [
                {
                    "ranges": [
                        {"label": "short", "min": 0, "max": 60,
                         "score_type": "linear", "score_start": 0, "score_end": 8},
                        {"label": "optimal", "min": 60, "max": 120, "score_type": "fixed", "score": 8},
                        {"label": "long", "min": 120, "score_type": "fixed", "score": 6}
                    ]
                }
            ]
        }
    }
"#};

pub const SURVEY_JSON: &str = indoc! {r#"
    {
        "4.01": {
            "question": "How would you rate your sleep quality?",
            "pillar_weights": {"Sleep": 8},
            "kind": "scale",
            "answer_scores": {"Poor": 2, "Fair": 5, "Good": 8, "Excellent": 10}
        },
        "7.02": {
            "question": "How often do you feel connected to your community?",
            "pillar_weights": {"Connection": 6},
            "kind": "scale",
            "answer_scores": {"Never": 0, "Sometimes": 5, "Often": 8, "Always": 10}
        },
        "3.04": {
            "question": "Cardio training",
            "pillar_weights": {"Movement": 16},
            "kind": "composite",
            "algorithm": "frequency_duration",
            "frequency_question": "3.04",
            "duration_question": "3.08",
            "frequency_factors": {
                "Rarely (a few times a month)": 0.4,
                "Occasionally (1-2 times per week)": 0.6,
                "Regularly (3-4 times per week)": 0.8,
                "Frequently (5 or more times per week)": 1.0
            },
            "duration_factors": {
                "Less than 30 minutes": 0.6,
                "30-45 minutes": 0.8,
                "45-60 minutes": 0.9,
                "More than 60 minutes": 1.0
            }
        },
        "6.01": {
            "question": "Typical stress level",
            "pillar_weights": {"Stress": 19},
            "kind": "composite",
            "algorithm": "pair_table",
            "row_question": "6.01",
            "col_question": "6.02",
            "table": {
                "No stress":       {"Rarely": 10, "Occasionally": 8.5, "Frequently": 7, "Always": 5},
                "Low stress":      {"Rarely": 9, "Occasionally": 7.5, "Frequently": 6, "Always": 4},
                "Moderate stress": {"Rarely": 7.5, "Occasionally": 6, "Frequently": 4.5, "Always": 2.5},
                "High stress":     {"Rarely": 6, "Occasionally": 4.5, "Frequently": 3, "Always": 1},
                "Extreme stress":  {"Rarely": 5, "Occasionally": 3.5, "Frequently": 2, "Always": 0}
            }
        },
        "4.07": {
            "question": "Which sleep hygiene practices do you follow?",
            "pillar_weights": {"Sleep": 9},
            "kind": "composite",
            "algorithm": "multi_select_count",
            "bands": [
                {"min_count": 7, "factor": 1.0},
                {"min_count": 5, "factor": 0.8},
                {"min_count": 3, "factor": 0.6},
                {"min_count": 1, "factor": 0.4},
                {"min_count": 0, "factor": 0.2}
            ]
        },
        "10.01": {
            "question": "Date of last dental exam",
            "pillar_weights": {"CoreCare": 3},
            "kind": "composite",
            "algorithm": "screening_recency",
            "window_months": 6
        },
        "2.11": {
            "question": "Daily protein intake (grams)",
            "pillar_weights": {"Nutrition": 5},
            "kind": "composite",
            "algorithm": "protein_target"
        },
        "9.01": {
            "question": "How often do you engage in mentally stimulating activities?",
            "pillar_weights": {"Cognitive": 8},
            "kind": "scale",
            "answer_scores": {"Rarely": 2, "Weekly": 6, "Daily": 10}
        }
    }
"#};

/// Capture engine logs in test output; safe to call from every test.
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn engine_config() -> EngineConfig {
    EngineConfig::from_json_strs(BIOMARKER_JSON, BIOMETRIC_JSON, SURVEY_JSON)
        .expect("fixture config must validate")
}

pub fn male_45(weight_lb: f64) -> PatientContext {
    PatientContext::new(45, Sex::Male)
        .with_weight_lb(weight_lb)
        .with_scored_on(chrono::NaiveDate::from_ymd_opt(2025, 6, 15).unwrap())
}

pub fn full_input() -> PatientInput {
    PatientInput {
        patient_id: "patient-001".to_string(),
        context: male_45(176.0),
        biomarkers: BTreeMap::from([("hdl".to_string(), 50.0), ("crp".to_string(), 0.8)]),
        biometrics: BTreeMap::from([
            ("vo2_max".to_string(), 45.0),
            ("deep_sleep_minutes".to_string(), 90.0),
        ]),
        survey: vec![
            SurveyResponse::new("4.01", "Good"),
            SurveyResponse::new("7.02", "Often"),
            SurveyResponse::new("3.04", "Regularly (3-4 times per week)"),
            SurveyResponse::new("3.08", "45-60 minutes"),
            SurveyResponse::new("6.01", "Moderate stress"),
            SurveyResponse::new("6.02", "Occasionally"),
            SurveyResponse::new("4.07", "Dark room | No screens | Consistent bedtime"),
            SurveyResponse::new("10.01", "2025-02-01"),
            SurveyResponse::new("2.11", "95"),
            SurveyResponse::new("9.01", "Daily"),
        ],
    }
}
