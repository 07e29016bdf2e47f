//! Summed-area tables for constant-time rectangle sums.

use ringscore_core::GrayImageView;

/// Sum and squared-sum tables, `(w + 1) x (h + 1)` with a zero first row/column.
pub(crate) struct IntegralImage {
    stride: usize,
    sum: Vec<u64>,
    sqsum: Vec<u64>,
}

impl IntegralImage {
    pub(crate) fn new(img: &GrayImageView<'_>) -> Self {
        let stride = img.width + 1;
        let mut sum = vec![0u64; stride * (img.height + 1)];
        let mut sqsum = vec![0u64; stride * (img.height + 1)];

        for y in 0..img.height {
            let mut row_sum = 0u64;
            let mut row_sq = 0u64;
            for (x, &v) in img.row(y).iter().enumerate() {
                let v = v as u64;
                row_sum += v;
                row_sq += v * v;
                let idx = (y + 1) * stride + x + 1;
                sum[idx] = sum[idx - stride] + row_sum;
                sqsum[idx] = sqsum[idx - stride] + row_sq;
            }
        }

        Self { stride, sum, sqsum }
    }

    #[inline]
    pub(crate) fn rect_sum(&self, x: usize, y: usize, w: usize, h: usize) -> u64 {
        box_sum(&self.sum, self.stride, x, y, w, h)
    }

    #[inline]
    pub(crate) fn rect_sqsum(&self, x: usize, y: usize, w: usize, h: usize) -> u64 {
        box_sum(&self.sqsum, self.stride, x, y, w, h)
    }

    /// Standard deviation of the window, floored at one gray level so flat
    /// windows do not blow up the normalised feature values.
    pub(crate) fn window_std(&self, x: usize, y: usize, w: usize, h: usize) -> f64 {
        let n = (w * h) as f64;
        let mean = self.rect_sum(x, y, w, h) as f64 / n;
        let var = self.rect_sqsum(x, y, w, h) as f64 / n - mean * mean;
        var.max(0.0).sqrt().max(1.0)
    }
}

/// Integral of a binary gradient-edge mask, used to skip flat windows.
pub(crate) struct EdgeIntegral {
    stride: usize,
    count: Vec<u64>,
}

/// Sobel `|gx| + |gy|` above which a pixel counts as an edge.
const EDGE_GRADIENT_THRESHOLD: i32 = 160;

impl EdgeIntegral {
    pub(crate) fn new(img: &GrayImageView<'_>) -> Self {
        let stride = img.width + 1;
        let mut count = vec![0u64; stride * (img.height + 1)];

        for y in 0..img.height {
            let mut row = 0u64;
            for x in 0..img.width {
                row += is_edge(img, x, y) as u64;
                let idx = (y + 1) * stride + x + 1;
                count[idx] = count[idx - stride] + row;
            }
        }

        Self { stride, count }
    }

    /// Fraction of edge pixels in the window.
    #[inline]
    pub(crate) fn density(&self, x: usize, y: usize, w: usize, h: usize) -> f32 {
        box_sum(&self.count, self.stride, x, y, w, h) as f32 / (w * h) as f32
    }
}

fn is_edge(img: &GrayImageView<'_>, x: usize, y: usize) -> bool {
    if x == 0 || y == 0 || x + 1 >= img.width || y + 1 >= img.height {
        return false;
    }
    let p = |dx: isize, dy: isize| -> i32 {
        img.get((x as isize + dx) as usize, (y as isize + dy) as usize) as i32
    };
    let gx = (p(1, -1) + 2 * p(1, 0) + p(1, 1)) - (p(-1, -1) + 2 * p(-1, 0) + p(-1, 1));
    let gy = (p(-1, 1) + 2 * p(0, 1) + p(1, 1)) - (p(-1, -1) + 2 * p(0, -1) + p(1, -1));
    gx.abs() + gy.abs() > EDGE_GRADIENT_THRESHOLD
}

#[inline]
fn box_sum(table: &[u64], stride: usize, x: usize, y: usize, w: usize, h: usize) -> u64 {
    let a = table[y * stride + x];
    let b = table[y * stride + x + w];
    let c = table[(y + h) * stride + x];
    let d = table[(y + h) * stride + x + w];
    d + a - b - c
}
