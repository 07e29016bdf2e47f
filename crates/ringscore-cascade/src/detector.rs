use std::path::Path;

use log::debug;
use ringscore_core::{GrayImageView, ImageError, Region};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::grouping::{group_regions, GROUP_EPS};
use crate::integral::{EdgeIntegral, IntegralImage};
use crate::model::{CascadeModel, ModelLoadError, WeightedRect};
use crate::params::DetectParams;

/// Errors returned by a detection call.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DetectError {
    #[error(transparent)]
    InvalidImage(#[from] ImageError),
    #[error("invalid detection parameters: {0}")]
    InvalidParams(&'static str),
}

/// Anything that can turn a still gray image into candidate regions.
///
/// Implementations must be read-only: the same detector may be called many
/// times on different images. Finding nothing is `Ok(vec![])`.
pub trait RegionDetector {
    fn detect(
        &self,
        image: &GrayImageView<'_>,
        params: &DetectParams,
    ) -> Result<Vec<Region>, DetectError>;
}

impl<T: RegionDetector + ?Sized> RegionDetector for &T {
    fn detect(
        &self,
        image: &GrayImageView<'_>,
        params: &DetectParams,
    ) -> Result<Vec<Region>, DetectError> {
        (**self).detect(image, params)
    }
}

impl<T: RegionDetector + ?Sized> RegionDetector for Box<T> {
    fn detect(
        &self,
        image: &GrayImageView<'_>,
        params: &DetectParams,
    ) -> Result<Vec<Region>, DetectError> {
        (**self).detect(image, params)
    }
}

/// Sliding-window Viola-Jones detector over a loaded [`CascadeModel`].
#[derive(Clone, Debug)]
pub struct CascadeDetector {
    model: CascadeModel,
}

impl CascadeDetector {
    /// Wrap an in-memory model after validating it.
    pub fn new(model: CascadeModel) -> Result<Self, ModelLoadError> {
        model.validate()?;
        Ok(Self { model })
    }

    /// Load the model once; every later `detect` reuses it.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ModelLoadError> {
        let path = path.as_ref();
        let model = CascadeModel::load_json(path)?;
        debug!(
            "loaded cascade {} ({} stages, {} features, window {}x{})",
            path.display(),
            model.stages.len(),
            model.features.len(),
            model.window[0],
            model.window[1]
        );
        Ok(Self { model })
    }

    pub fn model(&self) -> &CascadeModel {
        &self.model
    }

    /// Raw (ungrouped) window hits, in scan order.
    pub fn raw_hits(
        &self,
        image: &GrayImageView<'_>,
        params: &DetectParams,
    ) -> Result<Vec<Region>, DetectError> {
        image.ensure_non_empty()?;
        params.validate()?;

        let ii = IntegralImage::new(image);
        let edges = params.edge_pruning.then(|| EdgeIntegral::new(image));
        let [base_w, base_h] = self.model.window;

        let mut hits = Vec::new();
        let mut scale = 1.0f64;
        loop {
            let win_w = (base_w as f64 * scale).round() as usize;
            let win_h = (base_h as f64 * scale).round() as usize;
            if win_w > image.width || win_h > image.height {
                break;
            }
            if let Some([max_w, max_h]) = params.max_window {
                if win_w > max_w || win_h > max_h {
                    break;
                }
            }

            if win_w >= params.min_window[0] && win_h >= params.min_window[1] {
                let scaled = ScaledCascade::new(&self.model, scale, win_w, win_h);
                let step = (scale.round() as usize).max(1);
                for y in (0..=image.height - win_h).step_by(step) {
                    for x in (0..=image.width - win_w).step_by(step) {
                        if let Some(edges) = &edges {
                            if edges.density(x, y, win_w, win_h) < params.min_edge_density {
                                continue;
                            }
                        }
                        if scaled.accepts(&ii, x, y) {
                            hits.push(Region::new(x, y, win_w, win_h));
                        }
                    }
                }
            }

            scale *= params.scale_factor;
        }

        Ok(hits)
    }
}

impl RegionDetector for CascadeDetector {
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, image, params), fields(width = image.width, height = image.height))
    )]
    fn detect(
        &self,
        image: &GrayImageView<'_>,
        params: &DetectParams,
    ) -> Result<Vec<Region>, DetectError> {
        let hits = self.raw_hits(image, params)?;
        let regions = group_regions(
            &hits,
            params.min_neighbors,
            GROUP_EPS,
            (image.width, image.height),
        );
        debug!(
            "cascade: {} raw hits -> {} regions",
            hits.len(),
            regions.len()
        );
        Ok(regions)
    }
}

/// Feature rectangle resized to one scale, with its normalisation folded
/// into `coef`.
struct ScaledRect {
    x: usize,
    y: usize,
    w: usize,
    h: usize,
    coef: f64,
}

struct ScaledStump {
    rects: Vec<ScaledRect>,
    threshold: f64,
    left: f64,
    right: f64,
}

struct ScaledStage {
    threshold: f64,
    stumps: Vec<ScaledStump>,
}

/// The cascade resized for one window size.
///
/// Each rectangle contributes `weight * mean(rect) * area / window_area`
/// in base-window units, so responses stay comparable across scales despite
/// rounding of the resized rectangles.
struct ScaledCascade {
    win_w: usize,
    win_h: usize,
    stages: Vec<ScaledStage>,
}

impl ScaledCascade {
    fn new(model: &CascadeModel, scale: f64, win_w: usize, win_h: usize) -> Self {
        let base_area = model.window_area() as f64;
        let scale_rect = |r: &WeightedRect| {
            let x = ((r.x as f64 * scale).round() as usize).min(win_w - 1);
            let y = ((r.y as f64 * scale).round() as usize).min(win_h - 1);
            let w = ((r.width as f64 * scale).round() as usize).clamp(1, win_w - x);
            let h = ((r.height as f64 * scale).round() as usize).clamp(1, win_h - y);
            let coef = r.weight as f64 * r.area() as f64 / (base_area * (w * h) as f64);
            ScaledRect { x, y, w, h, coef }
        };

        let stages = model
            .stages
            .iter()
            .map(|stage| ScaledStage {
                threshold: stage.threshold as f64,
                stumps: stage
                    .stumps
                    .iter()
                    .map(|s| ScaledStump {
                        rects: model.features[s.feature]
                            .rects
                            .iter()
                            .map(scale_rect)
                            .collect(),
                        threshold: s.threshold as f64,
                        left: s.left as f64,
                        right: s.right as f64,
                    })
                    .collect(),
            })
            .collect();

        Self {
            win_w,
            win_h,
            stages,
        }
    }

    fn accepts(&self, ii: &IntegralImage, x: usize, y: usize) -> bool {
        let std = ii.window_std(x, y, self.win_w, self.win_h);
        self.stages.iter().all(|stage| {
            let sum: f64 = stage
                .stumps
                .iter()
                .map(|stump| {
                    let response: f64 = stump
                        .rects
                        .iter()
                        .map(|r| r.coef * ii.rect_sum(x + r.x, y + r.y, r.w, r.h) as f64)
                        .sum();
                    if response / std < stump.threshold {
                        stump.left
                    } else {
                        stump.right
                    }
                })
                .sum();
            sum >= stage.threshold
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HaarFeature, Stage, Stump};
    use ringscore_core::GrayImage;

    /// 20x20 window: bright center block against the whole window.
    fn center_blob_model() -> CascadeModel {
        CascadeModel {
            window: [20, 20],
            stages: vec![Stage {
                threshold: 0.5,
                stumps: vec![Stump {
                    feature: 0,
                    threshold: 0.3,
                    left: 0.0,
                    right: 1.0,
                }],
            }],
            features: vec![HaarFeature {
                rects: vec![
                    WeightedRect {
                        x: 0,
                        y: 0,
                        width: 20,
                        height: 20,
                        weight: -1.0,
                    },
                    WeightedRect {
                        x: 5,
                        y: 5,
                        width: 10,
                        height: 10,
                        weight: 2.0,
                    },
                ],
            }],
        }
    }

    fn params() -> DetectParams {
        DetectParams {
            min_window: [20, 20],
            ..DetectParams::default()
        }
    }

    #[test]
    fn finds_bright_block_near_its_center() {
        let mut img = GrayImage::new(64, 64);
        img.fill_rect(27, 27, 10, 10, 255);
        let det = CascadeDetector::new(center_blob_model()).expect("model");

        let regions = det.detect(&img.view(), &params()).expect("detect");
        assert!(!regions.is_empty());
        let c = regions[0].center();
        assert!((c.x - 32.0).abs() <= 3.0, "center x {}", c.x);
        assert!((c.y - 32.0).abs() <= 3.0, "center y {}", c.y);
        assert!(regions.iter().all(|r| r.fits_in(64, 64)));
    }

    #[test]
    fn flat_image_has_no_regions() {
        let img = GrayImage::from_raw(64, 48, vec![90; 64 * 48]).expect("image");
        let det = CascadeDetector::new(center_blob_model()).expect("model");
        let regions = det.detect(&img.view(), &params()).expect("detect");
        assert!(regions.is_empty());
    }

    #[test]
    fn zero_area_image_is_invalid() {
        let img = GrayImage::new(0, 0);
        let det = CascadeDetector::new(center_blob_model()).expect("model");
        let err = det.detect(&img.view(), &params()).expect_err("empty");
        assert!(matches!(err, DetectError::InvalidImage(ImageError::ZeroArea { .. })));
    }

    #[test]
    fn image_smaller_than_window_yields_nothing() {
        let img = GrayImage::new(10, 10);
        let det = CascadeDetector::new(center_blob_model()).expect("model");
        assert!(det.detect(&img.view(), &params()).expect("detect").is_empty());
    }

    #[test]
    fn min_window_above_image_skips_all_scales() {
        let mut img = GrayImage::new(64, 64);
        img.fill_rect(27, 27, 10, 10, 255);
        let det = CascadeDetector::new(center_blob_model()).expect("model");
        let p = DetectParams {
            min_window: [80, 80],
            ..DetectParams::default()
        };
        assert!(det.detect(&img.view(), &p).expect("detect").is_empty());
    }

    #[test]
    fn detector_is_reusable_and_deterministic() {
        let mut img = GrayImage::new(64, 64);
        img.fill_rect(27, 27, 10, 10, 255);
        let det = CascadeDetector::new(center_blob_model()).expect("model");
        let a = det.detect(&img.view(), &params()).expect("first");
        let b = det.detect(&img.view(), &params()).expect("second");
        assert_eq!(a, b);
    }

    #[test]
    fn invalid_params_surface_before_scanning() {
        let img = GrayImage::new(64, 64);
        let det = CascadeDetector::new(center_blob_model()).expect("model");
        let p = DetectParams {
            scale_factor: 0.9,
            ..DetectParams::default()
        };
        assert!(matches!(
            det.detect(&img.view(), &p),
            Err(DetectError::InvalidParams(_))
        ));
    }
}
