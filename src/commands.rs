// ============================================================================
// COMMANDS: the fixed operation menus of both programs
// ============================================================================
//
// Each menu entry maps to exactly one kernel call. The GUI buttons and the
// headless CLI both dispatch through these enums.
// ============================================================================

use clap::ValueEnum;
use image::{GrayImage, Pixel};

use crate::error::{Error, Result};
use crate::ops::{self, ButterworthParams, EdgeMode, Interpolation, Raster};
use crate::params::ParamField;

// ---------------------------------------------------------------------------
//  tonelab: point and frequency filters
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ToneOp {
    Inverse,
    Gamma,
    Log,
    Equalize,
    Stretch,
    Spectrum,
    ButterworthLowpass,
    ButterworthHighpass,
}

/// Tunables of the tone operations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ToneSettings {
    pub gamma: f64,
    pub butterworth: ButterworthParams,
}

impl Default for ToneSettings {
    fn default() -> Self {
        Self {
            gamma: 0.5,
            butterworth: ButterworthParams::default(),
        }
    }
}

impl ToneOp {
    pub fn label(&self) -> &'static str {
        match self {
            ToneOp::Inverse => "Image Inverse",
            ToneOp::Gamma => "Gamma Correction",
            ToneOp::Log => "Log Transformation",
            ToneOp::Equalize => "Histogram Equalization",
            ToneOp::Stretch => "Contrast Stretching",
            ToneOp::Spectrum => "Fast Fourier",
            ToneOp::ButterworthLowpass => "Butterworth Lowpass",
            ToneOp::ButterworthHighpass => "Butterworth Highpass",
        }
    }

    /// Menu order (three rows in the window).
    pub fn all() -> &'static [ToneOp] {
        &[
            ToneOp::Inverse,
            ToneOp::Gamma,
            ToneOp::Log,
            ToneOp::Equalize,
            ToneOp::Stretch,
            ToneOp::Spectrum,
            ToneOp::ButterworthLowpass,
            ToneOp::ButterworthHighpass,
        ]
    }

    pub fn apply(&self, img: &GrayImage, settings: &ToneSettings) -> Result<GrayImage> {
        match self {
            ToneOp::Inverse => Ok(ops::inverse(img)),
            ToneOp::Gamma => ops::gamma(img, settings.gamma),
            ToneOp::Log => Ok(ops::log_transform(img)),
            ToneOp::Equalize => Ok(ops::equalize_histogram(img)),
            ToneOp::Stretch => Ok(ops::stretch_contrast(img)),
            ToneOp::Spectrum => Ok(ops::magnitude_spectrum(img)),
            ToneOp::ButterworthLowpass => ops::butterworth_lowpass(img, settings.butterworth),
            ToneOp::ButterworthHighpass => ops::butterworth_highpass(img, settings.butterworth),
        }
    }
}

// ---------------------------------------------------------------------------
//  warplab: geometric and spatial transforms
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, ValueEnum)]
pub enum WarpKind {
    #[default]
    Translate,
    Rotate,
    Zoom,
    Blur,
    Wave,
}

const TRANSLATE_FIELDS: &[ParamField] = &[
    ParamField::int("dx", "Shift X (pixels)", "30"),
    ParamField::int("dy", "Shift Y (pixels)", "30"),
];
const ROTATE_FIELDS: &[ParamField] = &[ParamField::float("angle", "Rotation angle (degrees)", "45")];
const ZOOM_FIELDS: &[ParamField] = &[ParamField::float("factor", "Zoom factor (e.g. 2.0, 0.5)", "1.5")];
const BLUR_FIELDS: &[ParamField] = &[ParamField::float("sigma", "Blur sigma", "2.0")];
const WAVE_FIELDS: &[ParamField] = &[ParamField::float("amplitude", "Wave amplitude", "10")];

impl WarpKind {
    pub fn label(&self) -> &'static str {
        match self {
            WarpKind::Translate => "Translate",
            WarpKind::Rotate => "Rotate",
            WarpKind::Zoom => "Zoom In/Out",
            WarpKind::Blur => "Gaussian Blur",
            WarpKind::Wave => "Wave Effect",
        }
    }

    pub fn all() -> &'static [WarpKind] {
        &[
            WarpKind::Translate,
            WarpKind::Rotate,
            WarpKind::Zoom,
            WarpKind::Blur,
            WarpKind::Wave,
        ]
    }

    /// Numeric prompts shown before the transform runs.
    pub fn fields(&self) -> &'static [ParamField] {
        match self {
            WarpKind::Translate => TRANSLATE_FIELDS,
            WarpKind::Rotate => ROTATE_FIELDS,
            WarpKind::Zoom => ZOOM_FIELDS,
            WarpKind::Blur => BLUR_FIELDS,
            WarpKind::Wave => WAVE_FIELDS,
        }
    }

    /// Rotation additionally asks whether the canvas may grow.
    pub fn asks_expand(&self) -> bool {
        matches!(self, WarpKind::Rotate)
    }

    /// Parse prompt text (one entry per field, in order) into a command.
    pub fn build(&self, inputs: &[&str], expand: bool) -> Result<Warp> {
        let fields = self.fields();
        if inputs.len() != fields.len() {
            return Err(Error::invalid(
                "inputs",
                format!("expected {} value(s), got {}", fields.len(), inputs.len()),
            ));
        }
        let values = fields
            .iter()
            .zip(inputs)
            .map(|(field, text)| field.parse(text))
            .collect::<Result<Vec<f64>>>()?;

        let warp = match self {
            WarpKind::Translate => Warp::Translate { dx: values[0], dy: values[1] },
            WarpKind::Rotate => Warp::Rotate { angle: values[0], expand },
            WarpKind::Zoom => Warp::Zoom { factor: values[0] },
            WarpKind::Blur => Warp::Blur { sigma: values[0] },
            WarpKind::Wave => Warp::Wave { amplitude: values[0] },
        };
        Ok(warp)
    }

    /// The command obtained by accepting every default.
    pub fn default_warp(&self) -> Result<Warp> {
        let defaults: Vec<&str> = self.fields().iter().map(|f| f.default).collect();
        self.build(&defaults, false)
    }
}

/// A fully parameterised transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Warp {
    Translate { dx: f64, dy: f64 },
    Rotate { angle: f64, expand: bool },
    Zoom { factor: f64 },
    Blur { sigma: f64 },
    Wave { amplitude: f64 },
}

/// Resampling choices shared by the geometric transforms.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WarpOptions {
    pub interpolation: Interpolation,
    pub translate_edge: EdgeMode,
    pub rotate_edge: EdgeMode,
}

impl Default for WarpOptions {
    fn default() -> Self {
        Self {
            interpolation: Interpolation::Bilinear,
            translate_edge: EdgeMode::Constant(0),
            rotate_edge: EdgeMode::Reflect,
        }
    }
}

impl Warp {
    pub fn kind(&self) -> WarpKind {
        match self {
            Warp::Translate { .. } => WarpKind::Translate,
            Warp::Rotate { .. } => WarpKind::Rotate,
            Warp::Zoom { .. } => WarpKind::Zoom,
            Warp::Blur { .. } => WarpKind::Blur,
            Warp::Wave { .. } => WarpKind::Wave,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Warp::Translate { dx, dy } => format!("translate by ({dx}, {dy}) px"),
            Warp::Rotate { angle, expand: true } => format!("rotate {angle} deg (expanded canvas)"),
            Warp::Rotate { angle, expand: false } => format!("rotate {angle} deg"),
            Warp::Zoom { factor } => format!("zoom x{factor}"),
            Warp::Blur { sigma } => format!("gaussian blur sigma={sigma}"),
            Warp::Wave { amplitude } => format!("wave amplitude={amplitude}"),
        }
    }

    pub fn apply<P>(&self, img: &Raster<P>, opts: &WarpOptions) -> Result<Raster<P>>
    where
        P: Pixel<Subpixel = u8>,
    {
        match *self {
            Warp::Translate { dx, dy } => {
                ops::translate(img, dx, dy, opts.interpolation, opts.translate_edge)
            }
            Warp::Rotate { angle, expand } => {
                ops::rotate(img, angle, expand, opts.interpolation, opts.rotate_edge)
            }
            Warp::Zoom { factor } => ops::zoom(img, factor, opts.interpolation),
            Warp::Blur { sigma } => ops::gaussian_blur(img, sigma as f32),
            Warp::Wave { amplitude } => ops::wave(img, amplitude),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb, RgbImage};

    #[test]
    fn every_tone_op_runs_on_a_small_image() {
        let img = GrayImage::from_fn(16, 12, |x, y| Luma([(x * 15 + y * 3) as u8]));
        let settings = ToneSettings::default();
        for op in ToneOp::all() {
            let out = op.apply(&img, &settings).unwrap();
            assert_eq!(out.dimensions(), img.dimensions(), "{}", op.label());
        }
    }

    #[test]
    fn tone_settings_errors_surface() {
        let img = GrayImage::new(4, 4);
        let settings = ToneSettings { gamma: -1.0, ..Default::default() };
        assert!(ToneOp::Gamma.apply(&img, &settings).is_err());
        assert!(ToneOp::Inverse.apply(&img, &settings).is_ok());
    }

    #[test]
    fn defaults_build_the_documented_commands() {
        assert_eq!(WarpKind::Translate.default_warp().unwrap(), Warp::Translate { dx: 30.0, dy: 30.0 });
        assert_eq!(WarpKind::Rotate.default_warp().unwrap(), Warp::Rotate { angle: 45.0, expand: false });
        assert_eq!(WarpKind::Zoom.default_warp().unwrap(), Warp::Zoom { factor: 1.5 });
        assert_eq!(WarpKind::Blur.default_warp().unwrap(), Warp::Blur { sigma: 2.0 });
        assert_eq!(WarpKind::Wave.default_warp().unwrap(), Warp::Wave { amplitude: 10.0 });
    }

    #[test]
    fn build_reports_bad_input() {
        let err = WarpKind::Translate.build(&["abc", "3"], false).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { name: "dx", .. }));
        assert!(WarpKind::Zoom.build(&[], false).is_err());
        assert_eq!(
            WarpKind::Rotate.build(&["90"], true).unwrap(),
            Warp::Rotate { angle: 90.0, expand: true }
        );
    }

    #[test]
    fn huge_blur_sigma_is_an_error_not_a_crash() {
        let img = RgbImage::new(4, 4);
        let warp = WarpKind::Blur.build(&["1e30"], false).unwrap();
        let err = warp.apply(&img, &WarpOptions::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { name: "sigma", .. }));
    }

    #[test]
    fn warps_run_on_color_images() {
        let img = RgbImage::from_fn(20, 16, |x, y| Rgb([x as u8 * 10, y as u8 * 12, 100]));
        let opts = WarpOptions::default();
        for kind in WarpKind::all() {
            let warp = kind.default_warp().unwrap();
            assert_eq!(warp.kind(), *kind);
            let out = warp.apply(&img, &opts).unwrap();
            if *kind == WarpKind::Zoom {
                assert_eq!(out.dimensions(), (30, 24));
            } else {
                assert_eq!(out.dimensions(), img.dimensions());
            }
        }
    }
}
