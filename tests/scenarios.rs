//! End-to-end behaviour of the two programs' operations on small images.

use image::{GrayImage, Luma, Rgb, RgbImage};
use imglab::commands::{ToneOp, ToneSettings, Warp, WarpKind, WarpOptions};
use imglab::ops::{self, ButterworthParams, EdgeMode, Interpolation};

fn ramp(w: u32, h: u32) -> GrayImage {
    GrayImage::from_fn(w, h, |x, y| Luma([((x * 7 + y * 13) % 256) as u8]))
}

fn photo(w: u32, h: u32) -> RgbImage {
    RgbImage::from_fn(w, h, |x, y| {
        Rgb([
            ((x * 9) % 256) as u8,
            ((y * 11) % 256) as u8,
            ((x * y) % 256) as u8,
        ])
    })
}

#[test]
fn stretching_a_flat_image_returns_it_unchanged() {
    let img = GrayImage::from_pixel(8, 8, Luma([200]));
    let out = ToneOp::Stretch.apply(&img, &ToneSettings::default()).unwrap();
    assert_eq!(out, img);
}

#[test]
fn inverse_twice_restores_every_level() {
    let img = GrayImage::from_fn(16, 16, |x, y| Luma([(y * 16 + x) as u8]));
    let once = ToneOp::Inverse.apply(&img, &ToneSettings::default()).unwrap();
    assert_eq!(once.get_pixel(0, 0)[0], 255);
    let twice = ToneOp::Inverse.apply(&once, &ToneSettings::default()).unwrap();
    assert_eq!(twice, img);
}

#[test]
fn black_image_survives_every_tone_op() {
    let img = GrayImage::new(12, 10);
    for op in ToneOp::all() {
        let out = op.apply(&img, &ToneSettings::default()).unwrap();
        assert_eq!(out.dimensions(), (12, 10), "{}", op.label());
        if matches!(op, ToneOp::Gamma | ToneOp::Log | ToneOp::Spectrum) {
            assert!(out.pixels().all(|p| p[0] == 0), "{}", op.label());
        }
    }
}

#[test]
fn unbounded_lowpass_is_the_identity() {
    let img = ramp(24, 18);
    let settings = ToneSettings {
        butterworth: ButterworthParams { cutoff: f64::INFINITY, order: 2 },
        ..Default::default()
    };
    let out = ToneOp::ButterworthLowpass.apply(&img, &settings).unwrap();
    assert_eq!(out, img);
}

#[test]
fn highpass_removes_a_constant_image() {
    let img = GrayImage::from_pixel(16, 16, Luma([180]));
    let out = ToneOp::ButterworthHighpass.apply(&img, &ToneSettings::default()).unwrap();
    assert!(out.pixels().all(|p| p[0] == 0));
}

#[test]
fn lowpass_smooths_a_checkerboard() {
    let img = GrayImage::from_fn(32, 32, |x, y| Luma([if (x + y) % 2 == 0 { 255 } else { 0 }]));
    let out = ops::butterworth_lowpass(&img, ButterworthParams { cutoff: 4.0, order: 2 }).unwrap();
    let spread = |g: &GrayImage| {
        let (lo, hi) = g.pixels().fold((255u8, 0u8), |(lo, hi), p| (lo.min(p[0]), hi.max(p[0])));
        hi - lo
    };
    assert!(spread(&out) < spread(&img) / 2);
}

#[test]
fn spectrum_of_a_constant_image_peaks_at_the_centre() {
    let img = GrayImage::from_pixel(16, 12, Luma([100]));
    let out = ToneOp::Spectrum.apply(&img, &ToneSettings::default()).unwrap();
    assert_eq!(out.get_pixel(8, 6)[0], 255);
    assert_eq!(out.get_pixel(0, 0)[0], 0);
}

#[test]
fn zero_amplitude_wave_keeps_all_three_channels() {
    let img = photo(33, 21);
    let warp = WarpKind::Wave.build(&["0"], false).unwrap();
    assert_eq!(warp.apply(&img, &WarpOptions::default()).unwrap(), img);
}

#[test]
fn default_rotation_keeps_the_canvas() {
    let img = photo(40, 30);
    let warp = WarpKind::Rotate.default_warp().unwrap();
    let out = warp.apply(&img, &WarpOptions::default()).unwrap();
    assert_eq!(out.dimensions(), (40, 30));

    let expanded = Warp::Rotate { angle: 45.0, expand: true };
    let out = expanded.apply(&img, &WarpOptions::default()).unwrap();
    assert_eq!(out.dimensions(), (49, 49));
}

#[test]
fn default_translation_fills_with_black() {
    let img = RgbImage::from_pixel(50, 40, Rgb([200, 150, 100]));
    let warp = WarpKind::Translate.default_warp().unwrap();
    let out = warp.apply(&img, &WarpOptions::default()).unwrap();
    assert_eq!(*out.get_pixel(0, 0), Rgb([0, 0, 0]));
    assert_eq!(*out.get_pixel(29, 39), Rgb([0, 0, 0]));
    assert_eq!(*out.get_pixel(30, 30), Rgb([200, 150, 100]));
}

#[test]
fn blur_never_mixes_channels() {
    let img = RgbImage::from_fn(20, 20, |x, _| Rgb([if x < 10 { 255 } else { 0 }, 0, 77]));
    let out = ops::gaussian_blur(&img, 2.0).unwrap();
    assert!(out.pixels().all(|p| p[1] == 0 && p[2] == 77));
    assert!(out.get_pixel(9, 10)[0] < 255 && out.get_pixel(10, 10)[0] > 0);
}

#[test]
fn zoom_doubles_and_halves() {
    let img = photo(16, 10);
    let bigger = Warp::Zoom { factor: 2.0 }.apply(&img, &WarpOptions::default()).unwrap();
    assert_eq!(bigger.dimensions(), (32, 20));
    let smaller = Warp::Zoom { factor: 0.5 }.apply(&img, &WarpOptions::default()).unwrap();
    assert_eq!(smaller.dimensions(), (8, 5));
}

#[test]
fn edge_modes_are_selectable_per_transform() {
    let img = photo(12, 8);
    let opts = WarpOptions {
        interpolation: Interpolation::Nearest,
        translate_edge: EdgeMode::Wrap,
        rotate_edge: EdgeMode::Nearest,
    };
    let out = Warp::Translate { dx: 12.0, dy: 8.0 }.apply(&img, &opts).unwrap();
    assert_eq!(out, img);
}
