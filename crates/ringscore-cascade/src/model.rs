//! Serialized Haar cascade model.
//!
//! A model is a base detection window, a pool of Haar features (weighted
//! rectangle sums inside that window) and a list of boosted stages. Each
//! stage is a sum of decision stumps over single features.

use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Errors raised while loading or validating a cascade model.
#[derive(thiserror::Error, Debug)]
pub enum ModelLoadError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("model window must be non-empty (got {width}x{height})")]
    InvalidWindow { width: usize, height: usize },
    #[error("cascade has no stages")]
    EmptyCascade,
    #[error("stage {stage} has no stumps")]
    EmptyStage { stage: usize },
    #[error("stage {stage} references unknown feature {feature}")]
    UnknownFeature { stage: usize, feature: usize },
    #[error("feature {feature} has no rectangles")]
    EmptyFeature { feature: usize },
    #[error("feature {feature} has a rectangle outside the model window")]
    FeatureOutsideWindow { feature: usize },
}

/// One weighted rectangle of a Haar feature, in model window pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightedRect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
    pub weight: f32,
}

impl WeightedRect {
    #[inline]
    pub fn area(&self) -> usize {
        self.width * self.height
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HaarFeature {
    pub rects: Vec<WeightedRect>,
}

/// Depth-one decision tree: `value < threshold ? left : right`.
///
/// `value` is the feature response normalised by the window's standard
/// deviation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stump {
    pub feature: usize,
    pub threshold: f32,
    pub left: f32,
    pub right: f32,
}

/// A boosted stage; a window passes when the stump sum reaches `threshold`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub threshold: f32,
    pub stumps: Vec<Stump>,
}

/// Pretrained cascade classifier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CascadeModel {
    /// Base window `[width, height]` the features are defined in.
    pub window: [usize; 2],
    pub stages: Vec<Stage>,
    pub features: Vec<HaarFeature>,
}

impl CascadeModel {
    /// Load and validate a JSON model from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ModelLoadError> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Parse and validate a JSON model.
    pub fn from_json_str(raw: &str) -> Result<Self, ModelLoadError> {
        let model: CascadeModel = serde_json::from_str(raw)?;
        model.validate()?;
        Ok(model)
    }

    /// Write this model to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ModelLoadError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ModelLoadError> {
        let [width, height] = self.window;
        if width == 0 || height == 0 {
            return Err(ModelLoadError::InvalidWindow { width, height });
        }
        if self.stages.is_empty() {
            return Err(ModelLoadError::EmptyCascade);
        }
        for (idx, feature) in self.features.iter().enumerate() {
            if feature.rects.is_empty() {
                return Err(ModelLoadError::EmptyFeature { feature: idx });
            }
            let outside = feature.rects.iter().any(|r| {
                r.width == 0 || r.height == 0 || r.x + r.width > width || r.y + r.height > height
            });
            if outside {
                return Err(ModelLoadError::FeatureOutsideWindow { feature: idx });
            }
        }
        for (stage_idx, stage) in self.stages.iter().enumerate() {
            if stage.stumps.is_empty() {
                return Err(ModelLoadError::EmptyStage { stage: stage_idx });
            }
            if let Some(bad) = stage
                .stumps
                .iter()
                .find(|s| s.feature >= self.features.len())
            {
                return Err(ModelLoadError::UnknownFeature {
                    stage: stage_idx,
                    feature: bad.feature,
                });
            }
        }
        Ok(())
    }

    #[inline]
    pub fn window_area(&self) -> usize {
        self.window[0] * self.window[1]
    }
}
