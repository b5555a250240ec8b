//! File loading for the configuration snapshot.
//!
//! Marker and survey tables are JSON (the format the config store exports);
//! engine settings, including the overall pillar-weight override, are TOML.

use std::collections::BTreeMap;
use std::fs;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use super::{parse_marker_table, parse_survey_table, EngineConfig};
use crate::core::types::Pillar;

/// Engine settings file (TOML)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineSettings {
    /// Overall-score pillar weighting; equal weighting when absent
    #[serde(default)]
    pub pillar_weights: Option<BTreeMap<Pillar, f64>>,
}

fn read_file(path: &Path) -> std::io::Result<String> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Parse engine settings from a TOML string
pub fn parse_settings(contents: &str) -> Result<EngineSettings, toml::de::Error> {
    toml::from_str(contents)
}

/// Load and validate a configuration snapshot from disk.
///
/// `settings_path` is optional; without it the overall score is an
/// equal-weight mean of the pillar percentages.
pub fn load_from_paths(
    biomarker_path: &Path,
    biometric_path: &Path,
    survey_path: &Path,
    settings_path: Option<&Path>,
) -> anyhow::Result<EngineConfig> {
    let biomarkers = read_file(biomarker_path)
        .with_context(|| format!("reading biomarker config {}", biomarker_path.display()))?;
    let biometrics = read_file(biometric_path)
        .with_context(|| format!("reading biometric config {}", biometric_path.display()))?;
    let survey = read_file(survey_path)
        .with_context(|| format!("reading survey config {}", survey_path.display()))?;

    let settings = match settings_path {
        Some(path) => {
            let contents = read_file(path)
                .with_context(|| format!("reading engine settings {}", path.display()))?;
            parse_settings(&contents)
                .with_context(|| format!("parsing engine settings {}", path.display()))?
        }
        None => EngineSettings::default(),
    };

    let biomarkers = parse_marker_table(&biomarkers)
        .with_context(|| format!("parsing biomarker config {}", biomarker_path.display()))?;
    let biometrics = parse_marker_table(&biometrics)
        .with_context(|| format!("parsing biometric config {}", biometric_path.display()))?;
    let questions = parse_survey_table(&survey)
        .with_context(|| format!("parsing survey config {}", survey_path.display()))?;

    let config = EngineConfig::new(biomarkers, biometrics, questions, settings.pillar_weights)?;
    log::debug!(
        "loaded scoring config: {} biomarkers, {} biometrics, {} questions",
        config.biomarkers.len(),
        config.biometrics.len(),
        config.questions.len()
    );
    Ok(config)
}
