/// Errors raised when an input buffer cannot be used as a gray image.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    #[error("image has zero area (width={width}, height={height})")]
    ZeroArea { width: usize, height: usize },
    #[error("invalid image buffer length (expected {expected} bytes, got {got})")]
    BufferLength { expected: usize, got: usize },
    #[error("unsupported channel count {channels} (expected 1, 3 or 4)")]
    UnsupportedChannels { channels: usize },
    #[error("unsupported pixel layout: {0}")]
    UnsupportedLayout(String),
}

#[derive(Clone, Copy, Debug)]
pub struct GrayImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8], // row-major, len = w*h
}

impl<'a> GrayImageView<'a> {
    /// Wrap a row-major buffer, checking that it matches the dimensions.
    pub fn new(width: usize, height: usize, data: &'a [u8]) -> Result<Self, ImageError> {
        let expected = checked_len(width, height)?;
        if data.len() != expected {
            return Err(ImageError::BufferLength {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Reject images the detector cannot scan.
    pub fn ensure_non_empty(&self) -> Result<(), ImageError> {
        if self.width == 0 || self.height == 0 {
            return Err(ImageError::ZeroArea {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }

    #[inline]
    pub fn row(&self, y: usize) -> &'a [u8] {
        &self.data[y * self.width..(y + 1) * self.width]
    }

    pub fn to_owned_image(&self) -> GrayImage {
        GrayImage {
            width: self.width,
            height: self.height,
            data: self.data.to_vec(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrayImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl GrayImage {
    /// Black image of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height],
        }
    }

    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Result<Self, ImageError> {
        GrayImageView::new(width, height, &data)?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a gray image from an interleaved 8-bit buffer.
    ///
    /// One channel is copied as is; three channels are read as RGB and four
    /// as RGBA (alpha ignored), both reduced with Rec. 601 luma weights.
    pub fn from_interleaved(
        width: usize,
        height: usize,
        channels: usize,
        pixels: &[u8],
    ) -> Result<Self, ImageError> {
        if !matches!(channels, 1 | 3 | 4) {
            return Err(ImageError::UnsupportedChannels { channels });
        }
        let expected = checked_len(width, height)?
            .checked_mul(channels)
            .ok_or(ImageError::BufferLength {
                expected: usize::MAX,
                got: pixels.len(),
            })?;
        if pixels.len() != expected {
            return Err(ImageError::BufferLength {
                expected,
                got: pixels.len(),
            });
        }

        let data = if channels == 1 {
            pixels.to_vec()
        } else {
            pixels
                .chunks_exact(channels)
                .map(|px| luma(px[0], px[1], px[2]))
                .collect()
        };
        Ok(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn view(&self) -> GrayImageView<'_> {
        GrayImageView {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }

    #[inline]
    pub fn put(&mut self, x: usize, y: usize, v: u8) {
        self.data[y * self.width + x] = v;
    }

    /// Fill an axis-aligned block, clipped to the image.
    pub fn fill_rect(&mut self, x: usize, y: usize, width: usize, height: usize, v: u8) {
        let x1 = (x + width).min(self.width);
        let y1 = (y + height).min(self.height);
        for yy in y.min(y1)..y1 {
            for xx in x.min(x1)..x1 {
                self.put(xx, yy, v);
            }
        }
    }
}

fn checked_len(width: usize, height: usize) -> Result<usize, ImageError> {
    width.checked_mul(height).ok_or(ImageError::BufferLength {
        expected: usize::MAX,
        got: 0,
    })
}

#[inline]
fn luma(r: u8, g: u8, b: u8) -> u8 {
    let y = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
    y.round().clamp(0.0, 255.0) as u8
}
