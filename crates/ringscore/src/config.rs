//! JSON configuration for a scoring station.

use chrono::NaiveDate;
use ringscore_cascade::{CascadeDetector, DetectParams, ModelLoadError};
use ringscore_scoring::{ClassificationTable, DistanceScorer, RingTable, ScoreSession};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::pipeline::CandidatePipeline;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Who is shooting; all fields may be overridden on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    #[serde(default)]
    pub shooter_name: String,
    #[serde(default)]
    pub group_id: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// Station configuration.
///
/// The ring and classification tables have no built-in values and must be
/// present in the file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default)]
    pub image_path: Option<String>,
    pub model_path: String,
    #[serde(default)]
    pub output_path: Option<String>,
    #[serde(default)]
    pub detect: DetectParams,
    pub ring_table: RingTable,
    pub classification_table: ClassificationTable,
    #[serde(default)]
    pub session: Option<SessionInfo>,
}

impl ScoringConfig {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Resolve the output report path.
    pub fn output_path(&self) -> PathBuf {
        self.output_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("ringscore_report.json"))
    }

    /// Load the cascade model named by `model_path`.
    ///
    /// A relative `model_path` is taken as-is, relative to the working
    /// directory.
    pub fn build_detector(&self) -> Result<CascadeDetector, ModelLoadError> {
        CascadeDetector::from_json_file(&self.model_path)
    }

    pub fn build_scorer(&self) -> DistanceScorer {
        DistanceScorer::new(self.ring_table.clone())
    }

    /// Build the cascade pipeline from this config.
    pub fn build_pipeline(&self) -> Result<CandidatePipeline<CascadeDetector>, ModelLoadError> {
        Ok(CandidatePipeline::new(
            self.build_detector()?,
            self.detect.clone(),
            self.build_scorer(),
        ))
    }

    /// Start a session from the configured identity, dated `fallback_date`
    /// when the config has no date.
    pub fn new_session(&self, fallback_date: NaiveDate) -> ScoreSession {
        let info = self.session.clone().unwrap_or_default();
        ScoreSession::new(
            info.shooter_name,
            info.group_id,
            info.date.unwrap_or(fallback_date),
        )
    }
}
