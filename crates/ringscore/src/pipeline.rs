use log::info;
use ringscore_cascade::{DetectError, DetectParams, ModelLoadError, RegionDetector};
use ringscore_core::{crop_region, GrayImage, GrayImageView, Region};
use ringscore_scoring::{DistanceScorer, ScoreSession};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::browser::CandidateBrowser;
use crate::config::ConfigError;

/// Anything that can stop a station run before candidates exist.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error("failed to load config: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to load classifier model: {0}")]
    Model(#[from] ModelLoadError),
    #[cfg(feature = "image")]
    #[error("failed to load image: {0}")]
    Image(#[from] crate::detect::LoadImageError),
    #[error(transparent)]
    Detect(#[from] DetectError),
}

/// One detected region with its crop and ring score.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    pub region: Region,
    pub sub_image: GrayImage,
    /// Pixel distance from the region center to the image center.
    pub distance: f64,
    pub score: u32,
}

/// Detector -> crop -> score, over one still image at a time.
pub struct CandidatePipeline<D> {
    detector: D,
    params: DetectParams,
    scorer: DistanceScorer,
}

impl<D: RegionDetector> CandidatePipeline<D> {
    pub fn new(detector: D, params: DetectParams, scorer: DistanceScorer) -> Self {
        Self {
            detector,
            params,
            scorer,
        }
    }

    pub fn detector(&self) -> &D {
        &self.detector
    }

    pub fn params(&self) -> &DetectParams {
        &self.params
    }

    pub fn scorer(&self) -> &DistanceScorer {
        &self.scorer
    }

    /// Run detection and build candidates in detector order.
    ///
    /// An empty list means the detector ran and found nothing.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, image), fields(width = image.width, height = image.height))
    )]
    pub fn run(&self, image: &GrayImageView<'_>) -> Result<Vec<Candidate>, DetectError> {
        let regions = self.detector.detect(image, &self.params)?;
        info!("detected {} candidate regions", regions.len());
        Ok(regions
            .into_iter()
            .map(|region| self.candidate(image, region))
            .collect())
    }

    /// Crop and score a single region.
    pub fn candidate(&self, image: &GrayImageView<'_>, region: Region) -> Candidate {
        let scored = self.scorer.score(image.width, image.height, &region);
        Candidate {
            region,
            sub_image: crop_region(image, region),
            distance: scored.distance,
            score: scored.score,
        }
    }

    /// Run detection and replace the browser contents with the result.
    ///
    /// On error the browser keeps its previous candidates.
    pub fn run_into(
        &self,
        image: &GrayImageView<'_>,
        browser: &mut CandidateBrowser,
    ) -> Result<usize, DetectError> {
        let candidates = self.run(image)?;
        let n = candidates.len();
        browser.load(candidates);
        Ok(n)
    }
}

/// Record every candidate's score as one shot, in candidate order.
pub fn record_candidates(session: &mut ScoreSession, candidates: &[Candidate]) {
    session.record_shots(candidates.iter().map(|c| c.score));
}
