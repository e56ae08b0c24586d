use image::GrayImage;
use image_compare::Algorithm;

use crate::foundation::error::{TesterError, TesterResult};

fn ensure_same_dimensions(a: &GrayImage, b: &GrayImage) -> TesterResult<()> {
    if a.dimensions() != b.dimensions() {
        let (aw, ah) = a.dimensions();
        let (bw, bh) = b.dimensions();
        return Err(TesterError::compare(format!(
            "dimension mismatch: {aw}x{ah} vs {bw}x{bh}"
        )));
    }
    Ok(())
}

/// Mean squared error between two equally-sized grayscale images.
///
/// Identical images score `0.0`; two empty images also score `0.0`.
pub fn mse(a: &GrayImage, b: &GrayImage) -> TesterResult<f64> {
    ensure_same_dimensions(a, b)?;
    let n = a.as_raw().len();
    if n == 0 {
        return Ok(0.0);
    }
    let sum: u64 = a
        .as_raw()
        .iter()
        .zip(b.as_raw())
        .map(|(&x, &y)| {
            let d = u64::from(x.abs_diff(y));
            d * d
        })
        .sum();
    Ok(sum as f64 / n as f64)
}

/// Structural similarity of two equally-sized grayscale images, in `[-1, 1]`.
pub fn ssim(a: &GrayImage, b: &GrayImage) -> TesterResult<f64> {
    ensure_same_dimensions(a, b)?;
    let similarity = image_compare::gray_similarity_structure(&Algorithm::MSSIMSimple, a, b)
        .map_err(|e| TesterError::compare(format!("ssim failed: {e:?}")))?;
    Ok(similarity.score)
}

/// Per-pixel absolute difference of two equally-sized grayscale images.
pub fn abs_diff(a: &GrayImage, b: &GrayImage) -> TesterResult<GrayImage> {
    ensure_same_dimensions(a, b)?;
    let data = a
        .as_raw()
        .iter()
        .zip(b.as_raw())
        .map(|(&x, &y)| x.abs_diff(y))
        .collect();
    GrayImage::from_raw(a.width(), a.height(), data)
        .ok_or_else(|| TesterError::compare("difference buffer size mismatch"))
}

#[cfg(test)]
#[path = "../../tests/unit/compare/metrics.rs"]
mod tests;
