use super::*;
use image::Luma;

fn flat(w: u32, h: u32, v: u8) -> GrayImage {
    GrayImage::from_pixel(w, h, Luma([v]))
}

fn gradient(w: u32, h: u32) -> GrayImage {
    GrayImage::from_fn(w, h, |x, y| Luma([((x * 7 + y * 3) % 256) as u8]))
}

#[test]
fn mse_of_identical_images_is_zero() {
    let a = gradient(32, 16);
    assert_eq!(mse(&a, &a).unwrap(), 0.0);
}

#[test]
fn mse_of_uniform_offset_is_offset_squared() {
    let a = flat(100, 100, 128);
    let b = flat(100, 100, 130);
    assert_eq!(mse(&a, &b).unwrap(), 4.0);
    assert_eq!(mse(&b, &a).unwrap(), 4.0);
}

#[test]
fn mismatched_dimensions_are_rejected() {
    let a = flat(10, 10, 0);
    let b = flat(10, 11, 0);
    let err = mse(&a, &b).unwrap_err();
    assert!(matches!(err, TesterError::Compare(_)));
    assert!(err.to_string().contains("dimension"));
    assert!(ssim(&a, &b).is_err());
    assert!(abs_diff(&a, &b).is_err());
}

#[test]
fn ssim_of_identical_images_is_one() {
    let a = gradient(64, 64);
    let s = ssim(&a, &a).unwrap();
    assert!((s - 1.0).abs() < 1e-6, "ssim {s}");
}

#[test]
fn ssim_drops_for_different_content() {
    let a = gradient(64, 64);
    let b = GrayImage::from_fn(64, 64, |x, y| Luma([if (x / 8 + y / 8) % 2 == 0 { 0 } else { 255 }]));
    let s = ssim(&a, &b).unwrap();
    assert!(s < 0.9, "ssim {s}");
    assert!(s >= -1.0);
}

#[test]
fn abs_diff_is_symmetric() {
    let a = flat(4, 4, 10);
    let b = flat(4, 4, 250);
    let d1 = abs_diff(&a, &b).unwrap();
    let d2 = abs_diff(&b, &a).unwrap();
    assert_eq!(d1, d2);
    assert!(d1.pixels().all(|p| p.0[0] == 240));
}
