use serde::{Deserialize, Serialize};

use crate::DetectError;

/// Multi-scale search settings for a region detector.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectParams {
    /// Growth factor between consecutive search scales, must be > 1.
    pub scale_factor: f64,
    /// Minimum number of raw window hits in a group to accept it as a region.
    pub min_neighbors: usize,
    /// Smallest window `[width, height]` that is searched.
    pub min_window: [usize; 2],
    /// Largest window `[width, height]` that is searched.
    pub max_window: Option<[usize; 2]>,
    /// Skip windows with too few gradient edges before running the cascade.
    pub edge_pruning: bool,
    /// Minimum fraction of edge pixels a window needs when pruning is on.
    pub min_edge_density: f32,
}

impl Default for DetectParams {
    fn default() -> Self {
        Self {
            scale_factor: 1.1,
            min_neighbors: 2,
            min_window: [25, 25],
            max_window: None,
            edge_pruning: true,
            min_edge_density: 0.02,
        }
    }
}

impl DetectParams {
    pub fn validate(&self) -> Result<(), DetectError> {
        if !self.scale_factor.is_finite() || self.scale_factor <= 1.0 {
            return Err(DetectError::InvalidParams("scale_factor must be > 1.0"));
        }
        if self.min_neighbors == 0 {
            return Err(DetectError::InvalidParams("min_neighbors must be >= 1"));
        }
        if self.min_window[0] == 0 || self.min_window[1] == 0 {
            return Err(DetectError::InvalidParams("min_window must be non-empty"));
        }
        if let Some([w, h]) = self.max_window {
            if w < self.min_window[0] || h < self.min_window[1] {
                return Err(DetectError::InvalidParams(
                    "max_window must not be smaller than min_window",
                ));
            }
        }
        if !self.min_edge_density.is_finite() || !(0.0..=1.0).contains(&self.min_edge_density) {
            return Err(DetectError::InvalidParams(
                "min_edge_density must be in [0, 1]",
            ));
        }
        Ok(())
    }
}
