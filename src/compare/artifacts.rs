use std::path::Path;

use anyhow::Context as _;
use image::{GrayImage, Rgb, RgbImage, Rgba, RgbaImage};

use crate::foundation::error::TesterResult;

/// Side length of the square structuring element used to dilate alpha images.
pub const DILATION_KERNEL_SIZE: u32 = 5;
/// Number of dilation passes applied to alpha images.
pub const DILATION_ITERATIONS: u32 = 1;

/// 256-entry "hot" false-color lookup table (black, red, yellow, white).
pub fn hot_colormap() -> [[u8; 3]; 256] {
    const M: usize = 256;
    const N: usize = 3 * M / 8;
    let ramp = |i: usize, len: usize| -> u8 { ((i + 1) as f64 / len as f64 * 255.0).round() as u8 };

    let mut lut = [[0u8; 3]; M];
    for (i, entry) in lut.iter_mut().enumerate() {
        let r = if i < N { ramp(i, N) } else { 255 };
        let g = match i {
            _ if i < N => 0,
            _ if i < 2 * N => ramp(i - N, N),
            _ => 255,
        };
        let b = if i < 2 * N { 0 } else { ramp(i - 2 * N, M - 2 * N) };
        *entry = [r, g, b];
    }
    lut
}

/// Map a luminance difference image through [`hot_colormap`].
pub fn apply_hot(diff: &GrayImage) -> RgbImage {
    let lut = hot_colormap();
    RgbImage::from_fn(diff.width(), diff.height(), |x, y| {
        Rgb(lut[usize::from(diff.get_pixel(x, y).0[0])])
    })
}

/// Global threshold maximizing between-class variance of the histogram of `img`.
///
/// Returns `0` for empty or single-valued images.
pub fn otsu_threshold(img: &GrayImage) -> u8 {
    let mut hist = [0u64; 256];
    for &v in img.as_raw() {
        hist[usize::from(v)] += 1;
    }
    let total = img.as_raw().len() as f64;
    if total == 0.0 {
        return 0;
    }

    let mu: f64 = hist
        .iter()
        .enumerate()
        .map(|(i, &c)| i as f64 * c as f64 / total)
        .sum();

    let eps = f64::from(f32::EPSILON);
    let (mut q1, mut mu1, mut max_sigma) = (0.0f64, 0.0f64, 0.0f64);
    let mut threshold = 0u8;
    for (i, &count) in hist.iter().enumerate() {
        let p = count as f64 / total;
        mu1 *= q1;
        q1 += p;
        let q2 = 1.0 - q1;
        if q1.min(q2) < eps || q1.max(q2) > 1.0 - eps {
            continue;
        }
        mu1 = (mu1 + i as f64 * p) / q1;
        let mu2 = (mu - q1 * mu1) / q2;
        let sigma = q1 * q2 * (mu1 - mu2) * (mu1 - mu2);
        if sigma > max_sigma {
            max_sigma = sigma;
            threshold = i as u8;
        }
    }
    threshold
}

/// Binary mask: 255 where `img` is strictly above `threshold`, else 0.
pub fn binary_mask(img: &GrayImage, threshold: u8) -> GrayImage {
    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        let v = img.get_pixel(x, y).0[0];
        image::Luma([if v > threshold { 255 } else { 0 }])
    })
}

/// Combine a color image with a same-sized mask used as alpha.
pub fn with_alpha(color: &RgbImage, mask: &GrayImage) -> RgbaImage {
    RgbaImage::from_fn(color.width(), color.height(), |x, y| {
        let [r, g, b] = color.get_pixel(x, y).0;
        Rgba([r, g, b, mask.get_pixel(x, y).0[0]])
    })
}

/// Grey-level dilation of every channel with a `kernel` x `kernel` square, `iterations` times.
///
/// Pixels outside the image do not contribute.
pub fn dilate(img: &RgbaImage, kernel: u32, iterations: u32) -> RgbaImage {
    let radius = i64::from(kernel / 2);
    let mut out = img.clone();
    for _ in 0..iterations {
        out = dilate_pass(&out, radius, true);
        out = dilate_pass(&out, radius, false);
    }
    out
}

fn dilate_pass(src: &RgbaImage, radius: i64, horizontal: bool) -> RgbaImage {
    let (w, h) = (i64::from(src.width()), i64::from(src.height()));
    RgbaImage::from_fn(src.width(), src.height(), |x, y| {
        let mut acc = [0u8; 4];
        for d in -radius..=radius {
            let (sx, sy) = if horizontal {
                (i64::from(x) + d, i64::from(y))
            } else {
                (i64::from(x), i64::from(y) + d)
            };
            if sx < 0 || sy < 0 || sx >= w || sy >= h {
                continue;
            }
            let p = src.get_pixel(sx as u32, sy as u32).0;
            for (a, v) in acc.iter_mut().zip(p) {
                *a = (*a).max(v);
            }
        }
        Rgba(acc)
    })
}

/// Derived images for one compared frame pair.
#[derive(Clone, Debug)]
pub struct FrameArtifacts {
    /// False-colored difference image.
    pub diff: RgbImage,
    /// Difference colors with the dilated significance mask as alpha.
    pub alpha: RgbaImage,
}

impl FrameArtifacts {
    /// Build both artifacts from an absolute luminance difference image.
    pub fn from_difference(difference: &GrayImage) -> Self {
        let diff = apply_hot(difference);
        let mask = binary_mask(difference, otsu_threshold(difference));
        let alpha = dilate(
            &with_alpha(&diff, &mask),
            DILATION_KERNEL_SIZE,
            DILATION_ITERATIONS,
        );
        Self { diff, alpha }
    }

    /// Write the diff image (JPEG) and alpha image (PNG).
    pub fn save(&self, diff_path: &Path, alpha_path: &Path) -> TesterResult<()> {
        self.diff
            .save(diff_path)
            .with_context(|| format!("write diff image '{}'", diff_path.display()))?;
        self.alpha
            .save(alpha_path)
            .with_context(|| format!("write alpha image '{}'", alpha_path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compare/artifacts.rs"]
mod tests;
