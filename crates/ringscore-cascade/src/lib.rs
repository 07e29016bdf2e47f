//! Region detection for ring-target scoring.
//!
//! The crate exposes the [`RegionDetector`] seam plus one concrete
//! implementation, [`CascadeDetector`], a Viola-Jones style Haar cascade:
//!
//! 1. Build integral and squared-integral images of the gray input.
//! 2. Scan the model window over the image at scales `1, f, f^2, ...`.
//! 3. Optionally skip windows with almost no gradient edges.
//! 4. Run the boosted stages on each remaining window, rejecting early.
//! 5. Group overlapping hits and keep groups with enough neighbours.
//!
//! ## Quickstart
//!
//! ```no_run
//! use ringscore_cascade::{CascadeDetector, DetectParams, RegionDetector};
//! use ringscore_core::GrayImage;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let detector = CascadeDetector::from_json_file("impact_cascade.json")?;
//! let img = GrayImage::new(640, 480);
//! let regions = detector.detect(&img.view(), &DetectParams::default())?;
//! println!("found {} regions", regions.len());
//! # Ok(())
//! # }
//! ```

mod detector;
mod grouping;
mod integral;
mod model;
mod params;

pub use detector::{CascadeDetector, DetectError, RegionDetector};
pub use model::{CascadeModel, HaarFeature, ModelLoadError, Stage, Stump, WeightedRect};
pub use params::DetectParams;
