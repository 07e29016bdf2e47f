//! Core types and utilities for ring-target scoring.
//!
//! This crate is intentionally small. It knows about gray images, rectangular
//! regions in pixel coordinates, and how to crop one from the other. It does
//! *not* depend on any concrete detector or image codec.

mod extract;
mod image;
mod logger;
mod region;

pub use extract::crop_region;
pub use image::{GrayImage, GrayImageView, ImageError};
pub use region::Region;

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init_with_level, parse_level};
