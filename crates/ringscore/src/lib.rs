//! Scoring station for ring targets.
//!
//! This crate ties the workspace together:
//! - re-exports of the core, cascade and scoring crates
//! - a [`CandidatePipeline`] that turns one gray image into scored
//!   [`Candidate`]s (region, crop, distance, ring score)
//! - a [`CandidateBrowser`] for stepping through the latest candidates
//! - JSON [`ScoringConfig`] and [`DetectReport`]
//! - (feature `image`) file loading helpers in [`detect`]
//!
//! ## Quickstart
//!
//! ```no_run
//! use ringscore::{detect, ScoringConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = ScoringConfig::load_json("station.json")?;
//! let pipeline = cfg.build_pipeline()?;
//! let (_gray, candidates) = detect::run_on_file(&pipeline, "target.png")?;
//! for c in &candidates {
//!     println!("{:?} -> {}", c.region, c.score);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `ringscore::core`: gray images, regions, cropping, logging.
//! - `ringscore::cascade`: the `RegionDetector` trait and the Haar cascade.
//! - `ringscore::scoring`: ring tables, sessions, classification.
//! - `ringscore::detect` (feature `image`): decode files with the `image` crate.

pub use ringscore_cascade as cascade;
pub use ringscore_core as core;
pub use ringscore_scoring as scoring;

pub use ringscore_cascade::{CascadeDetector, DetectError, DetectParams, RegionDetector};
pub use ringscore_core::{GrayImage, GrayImageView, Region};
pub use ringscore_scoring::{
    Classification, ClassificationTable, DistanceScorer, RingTable, ScoreSession, SessionRecord,
};

mod browser;
mod config;
mod pipeline;
mod report;

pub use browser::{Boundary, BrowserState, CandidateBrowser, Navigation, NoCandidateError};
pub use config::{ConfigError, ScoringConfig, SessionInfo};
pub use pipeline::{record_candidates, Candidate, CandidatePipeline, PipelineError};
pub use report::{CandidateSummary, DetectReport};

#[cfg(feature = "image")]
pub mod detect;
