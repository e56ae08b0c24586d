use super::*;
use image::Luma;

#[test]
fn hot_colormap_runs_black_to_white() {
    let lut = hot_colormap();
    assert_eq!(lut[0], [3, 0, 0]);
    assert_eq!(lut[95], [255, 0, 0]);
    assert_eq!(lut[191], [255, 255, 0]);
    assert_eq!(lut[255], [255, 255, 255]);
    for w in lut.windows(2) {
        for c in 0..3 {
            assert!(w[0][c] <= w[1][c]);
        }
    }
}

#[test]
fn otsu_splits_a_bimodal_image() {
    let img = GrayImage::from_fn(20, 10, |x, _| Luma([if x < 10 { 10 } else { 200 }]));
    let t = otsu_threshold(&img);
    assert_eq!(t, 10);
    let mask = binary_mask(&img, t);
    assert_eq!(mask.get_pixel(0, 0).0[0], 0);
    assert_eq!(mask.get_pixel(19, 9).0[0], 255);
}

#[test]
fn otsu_of_flat_image_is_zero() {
    assert_eq!(otsu_threshold(&GrayImage::from_pixel(8, 8, Luma([0]))), 0);
    assert_eq!(otsu_threshold(&GrayImage::from_pixel(8, 8, Luma([77]))), 0);
    assert_eq!(otsu_threshold(&GrayImage::new(0, 0)), 0);
}

#[test]
fn dilation_grows_a_point_to_the_kernel() {
    let mut img = RgbaImage::new(10, 10);
    img.put_pixel(5, 5, Rgba([1, 2, 3, 255]));
    let out = dilate(&img, 5, 1);
    let lit = out.pixels().filter(|p| p.0[3] == 255).count();
    assert_eq!(lit, 25);
    assert_eq!(out.get_pixel(3, 7).0, [1, 2, 3, 255]);
    assert_eq!(out.get_pixel(2, 5).0, [0, 0, 0, 0]);
}

#[test]
fn dilation_clips_at_the_border() {
    let mut img = RgbaImage::new(10, 10);
    img.put_pixel(0, 0, Rgba([0, 0, 0, 255]));
    let out = dilate(&img, 5, 1);
    assert_eq!(out.pixels().filter(|p| p.0[3] == 255).count(), 9);
}

#[test]
fn artifacts_are_written_with_alpha() {
    let dir = std::env::temp_dir().join(format!("fdt_artifacts_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();

    let difference = GrayImage::from_fn(16, 16, |x, y| Luma([if x == 8 && y == 8 { 250 } else { 0 }]));
    let artifacts = FrameArtifacts::from_difference(&difference);
    assert_eq!(artifacts.alpha.get_pixel(8, 8).0[3], 255);
    assert_eq!(artifacts.alpha.get_pixel(0, 0).0[3], 0);

    let diff_path = dir.join("0001.jpg");
    let alpha_path = dir.join("0001.png");
    artifacts.save(&diff_path, &alpha_path).unwrap();
    assert!(diff_path.is_file());
    let reloaded = image::open(&alpha_path).unwrap().to_rgba8();
    assert_eq!(reloaded, artifacts.alpha);
}
