//! Shared error types for the scoring engine

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::ItemKind;

/// Fatal errors for a scoring run or configuration load.
///
/// Item-level problems never surface here; they are recovered locally as
/// [`SkipReason`]s and reported as omissions. Only structurally invalid
/// configuration aborts a run.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration failed eager validation; all accumulated issues are listed
    #[error("invalid configuration ({} issues):\n{}", .issues.len(), .issues.join("\n"))]
    InvalidConfig { issues: Vec<String> },

    /// Overall pillar-weight override sums to a non-positive value
    #[error("invalid pillar weights: sum {sum} must be positive")]
    InvalidWeights { sum: f64 },

    /// IO errors from the config loader
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON errors from the config tables
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// TOML errors from the settings file
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

impl EngineError {
    pub fn invalid_config(issues: Vec<String>) -> Self {
        Self::InvalidConfig { issues }
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, EngineError>;

/// Why an individual item was left unscored.
///
/// A skipped item is excluded from both the raw and the max totals of every
/// pillar it would have contributed to: an unscorable input is a coverage
/// gap, not a zero.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// The item has no authored configuration
    #[error("no configuration for item")]
    ConfigNotFound,

    /// No sub-config matches the patient's sex and age
    #[error("no sub-config matches patient demographics")]
    NoMatchingDemographic,

    /// The value falls outside every authored range bucket
    #[error("value outside all configured ranges")]
    OutOfRange,

    /// A composite question is missing a required constituent
    #[error("composite question missing constituent: {missing}")]
    IncompleteComposite { missing: String },
}

/// Record of an item left out of a scoring run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Omission {
    pub item_key: String,
    pub item_kind: ItemKind,
    #[serde(flatten)]
    pub reason: SkipReason,
}

impl Omission {
    pub fn new(item_key: impl Into<String>, item_kind: ItemKind, reason: SkipReason) -> Self {
        Self {
            item_key: item_key.into(),
            item_kind,
            reason,
        }
    }
}
