//! JSON report of one detection pass.

use ringscore_core::Region;
use ringscore_scoring::SessionRecord;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::config::ConfigError;
use crate::pipeline::Candidate;

/// Per-candidate summary; the crop pixels are not stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSummary {
    pub index: usize,
    pub region: Region,
    pub center: [f64; 2],
    pub distance: f64,
    pub score: u32,
    pub sub_image_size: [usize; 2],
}

impl CandidateSummary {
    pub fn from_candidate(index: usize, candidate: &Candidate) -> Self {
        let center = candidate.region.center();
        Self {
            index,
            region: candidate.region,
            center: [center.x, center.y],
            distance: candidate.distance,
            score: candidate.score,
            sub_image_size: [candidate.sub_image.width, candidate.sub_image.height],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectReport {
    pub image_path: String,
    pub config_path: String,
    #[serde(default)]
    pub image_size: Option<[usize; 2]>,
    pub num_candidates: usize,
    pub candidates: Vec<CandidateSummary>,
    #[serde(default)]
    pub session: Option<SessionRecord>,
    #[serde(default)]
    pub error: Option<String>,
}

impl DetectReport {
    /// Build an empty report for an image and config.
    pub fn new(image_path: &Path, config_path: &Path) -> Self {
        Self {
            image_path: image_path.to_string_lossy().into_owned(),
            config_path: config_path.to_string_lossy().into_owned(),
            image_size: None,
            num_candidates: 0,
            candidates: Vec::new(),
            session: None,
            error: None,
        }
    }

    /// Populate from a successful detection pass.
    pub fn set_candidates(&mut self, image_size: [usize; 2], candidates: &[Candidate]) {
        self.image_size = Some(image_size);
        self.num_candidates = candidates.len();
        self.candidates = candidates
            .iter()
            .enumerate()
            .map(|(i, c)| CandidateSummary::from_candidate(i, c))
            .collect();
        self.error = None;
    }

    pub fn set_session(&mut self, record: SessionRecord) {
        self.session = Some(record);
    }

    /// Record a failure; earlier candidates are cleared.
    pub fn set_error(&mut self, err: &dyn std::error::Error) {
        self.num_candidates = 0;
        self.candidates.clear();
        self.error = Some(err.to_string());
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ringscore_cascade::DetectError;
    use ringscore_core::{GrayImage, ImageError};

    fn candidate() -> Candidate {
        Candidate {
            region: Region::new(300, 220, 40, 40),
            sub_image: GrayImage::new(40, 40),
            distance: 0.0,
            score: 10,
        }
    }

    #[test]
    fn summary_carries_center_and_crop_size() {
        let mut report = DetectReport::new(Path::new("a.png"), Path::new("cfg.json"));
        report.set_candidates([640, 480], &[candidate()]);
        assert_eq!(report.num_candidates, 1);
        let c = &report.candidates[0];
        assert_eq!(c.center, [320.0, 240.0]);
        assert_eq!(c.sub_image_size, [40, 40]);
        assert_eq!(c.score, 10);
    }

    #[test]
    fn error_clears_candidates() {
        let mut report = DetectReport::new(Path::new("a.png"), Path::new("cfg.json"));
        report.set_candidates([640, 480], &[candidate()]);
        let err = DetectError::from(ImageError::ZeroArea {
            width: 0,
            height: 4,
        });
        report.set_error(&err);
        assert_eq!(report.num_candidates, 0);
        assert!(report.candidates.is_empty());
        assert!(report.error.is_some());
    }

    #[test]
    fn report_survives_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("report.json");
        let mut report = DetectReport::new(Path::new("a.png"), Path::new("cfg.json"));
        report.set_candidates([640, 480], &[candidate()]);
        report.write_json(&path).expect("write");
        let back = DetectReport::load_json(&path).expect("load");
        assert_eq!(back.candidates, report.candidates);
        assert_eq!(back.image_size, Some([640, 480]));
    }
}
