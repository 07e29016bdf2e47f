use ::image::{ColorType, DynamicImage, ImageReader};
use log::debug;
use ringscore_cascade::RegionDetector;
use ringscore_core::{GrayImage, GrayImageView, ImageError};
use std::path::Path;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::pipeline::{Candidate, CandidatePipeline, PipelineError};

/// Errors produced while reading an image file into a gray buffer.
#[derive(thiserror::Error, Debug)]
pub enum LoadImageError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Decode(#[from] ::image::ImageError),
    #[error(transparent)]
    Invalid(#[from] ImageError),
}

/// Open and decode an image file, then reduce it to 8-bit gray.
#[cfg_attr(feature = "tracing", instrument(level = "debug", skip(path)))]
pub fn load_gray(path: impl AsRef<Path>) -> Result<GrayImage, LoadImageError> {
    let path = path.as_ref();
    let img = ImageReader::open(path)?.decode()?;
    debug!(
        "decoded {} ({}x{}, {:?})",
        path.display(),
        img.width(),
        img.height(),
        img.color()
    );
    Ok(gray_from_dynamic(img)?)
}

/// Convert a decoded image to gray.
///
/// Only 8-bit luma, luma-alpha, RGB and RGBA layouts are accepted.
pub fn gray_from_dynamic(img: DynamicImage) -> Result<GrayImage, ImageError> {
    let gray = match img.color() {
        ColorType::L8 => img.into_luma8(),
        ColorType::La8 | ColorType::Rgb8 | ColorType::Rgba8 => img.to_luma8(),
        other => return Err(ImageError::UnsupportedLayout(format!("{other:?}"))),
    };
    let (width, height) = (gray.width() as usize, gray.height() as usize);
    let gray = GrayImage::from_raw(width, height, gray.into_raw())?;
    gray.view().ensure_non_empty()?;
    Ok(gray)
}

/// Borrow an `image::GrayImage` as a [`GrayImageView`].
pub fn gray_view(img: &::image::GrayImage) -> GrayImageView<'_> {
    GrayImageView {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.as_raw(),
    }
}

/// Build a gray image from an interleaved 1, 3 or 4 channel buffer.
pub fn gray_image_from_raw(
    width: usize,
    height: usize,
    channels: usize,
    pixels: &[u8],
) -> Result<GrayImage, ImageError> {
    GrayImage::from_interleaved(width, height, channels, pixels)
}

/// Load an image file and run the pipeline on it.
pub fn run_on_file<D: RegionDetector>(
    pipeline: &CandidatePipeline<D>,
    path: impl AsRef<Path>,
) -> Result<(GrayImage, Vec<Candidate>), PipelineError> {
    let gray = load_gray(path)?;
    let candidates = pipeline.run(&gray.view())?;
    Ok((gray, candidates))
}
