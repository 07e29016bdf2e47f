use crate::{GrayImage, GrayImageView, Region};

/// Copy the pixels covered by `region` into a new image.
///
/// The region is clamped to the image bounds first, so out-of-range regions
/// produce a smaller (possibly empty) crop instead of panicking. The source
/// view is never modified.
pub fn crop_region(src: &GrayImageView<'_>, region: Region) -> GrayImage {
    let r = region.clamp_to(src.width, src.height);
    let mut data = Vec::with_capacity(r.area());
    for y in r.y..r.bottom() {
        data.extend_from_slice(&src.row(y)[r.x..r.right()]);
    }
    GrayImage {
        width: r.width,
        height: r.height,
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(width: usize, height: usize) -> GrayImage {
        let data = (0..width * height).map(|v| (v % 256) as u8).collect();
        GrayImage {
            width,
            height,
            data,
        }
    }

    #[test]
    fn crop_copies_exact_pixels() {
        let img = ramp(8, 6);
        let crop = crop_region(&img.view(), Region::new(2, 1, 3, 2));
        assert_eq!(crop.width, 3);
        assert_eq!(crop.height, 2);
        assert_eq!(crop.data, vec![10, 11, 12, 18, 19, 20]);
    }

    #[test]
    fn crop_clamps_to_bounds() {
        let img = ramp(8, 6);
        let crop = crop_region(&img.view(), Region::new(6, 4, 10, 10));
        assert_eq!((crop.width, crop.height), (2, 2));
        assert_eq!(crop.data, vec![38, 39, 46, 47]);
    }

    #[test]
    fn crop_outside_is_empty() {
        let img = ramp(8, 6);
        let crop = crop_region(&img.view(), Region::new(20, 20, 4, 4));
        assert_eq!((crop.width, crop.height), (0, 0));
        assert!(crop.data.is_empty());
    }

    #[test]
    fn crop_far_outside_does_not_overflow() {
        let img = GrayImage::new(8, 8);
        let crop = crop_region(&img.view(), Region::new(usize::MAX - 2, 0, 10, 4));
        assert_eq!((crop.width, crop.height), (0, 0));
        let crop = crop_region(&img.view(), Region::new(3, usize::MAX, 2, usize::MAX));
        assert!(crop.data.is_empty());
    }

    #[test]
    fn crop_is_repeatable() {
        let img = ramp(16, 16);
        let r = Region::new(3, 5, 7, 4);
        assert_eq!(crop_region(&img.view(), r), crop_region(&img.view(), r));
    }
}
