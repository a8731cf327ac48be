// ============================================================================
// FREQUENCY DOMAIN: 2-D DFT, spectrum display, Butterworth filters
// ============================================================================
//
// Layout convention: a `Spectrum` is row-major, `rows x cols`, exactly like the
// image it came from. `shifted()` moves the DC term to (rows / 2, cols / 2) and
// `unshifted()` undoes it, for odd and even sizes alike.
// ============================================================================

use image::GrayImage;
use rayon::prelude::*;
use rustfft::num_complex::Complex64;
use rustfft::{FftDirection, FftPlanner};

use crate::error::{Error, Result};

/// Added to |F| before taking the log so an empty bin never yields -inf.
pub const SPECTRUM_EPSILON: f64 = 1e-8;

/// Complex 2-D spectrum of a single-channel image.
#[derive(Clone, Debug, PartialEq)]
pub struct Spectrum {
    rows: usize,
    cols: usize,
    data: Vec<Complex64>,
}

impl Spectrum {
    /// Forward 2-D DFT of a grayscale image (unnormalised).
    pub fn forward(img: &GrayImage) -> Self {
        let mut spectrum = Self {
            rows: img.height() as usize,
            cols: img.width() as usize,
            data: img
                .as_raw()
                .iter()
                .map(|&v| Complex64::new(v as f64, 0.0))
                .collect(),
        };
        spectrum.transform(FftDirection::Forward);
        spectrum
    }

    /// Inverse 2-D DFT, normalised by `1 / (rows * cols)`.
    pub fn inverse(mut self) -> Self {
        self.transform(FftDirection::Inverse);
        let n = (self.rows * self.cols) as f64;
        if n > 0.0 {
            let scale = 1.0 / n;
            self.data.iter_mut().for_each(|z| *z *= scale);
        }
        self
    }

    /// Rows first, then columns through a transpose.
    fn transform(&mut self, direction: FftDirection) {
        if self.rows == 0 || self.cols == 0 {
            return;
        }
        let mut planner = FftPlanner::<f64>::new();

        let row_fft = planner.plan_fft(self.cols, direction);
        row_fft.process(&mut self.data);

        let mut columns = transpose(&self.data, self.rows, self.cols);
        let col_fft = planner.plan_fft(self.rows, direction);
        col_fft.process(&mut columns);
        self.data = transpose(&columns, self.cols, self.rows);
    }

    /// Move the zero-frequency term to the centre.
    pub fn shifted(&self) -> Self {
        self.rolled(self.rows / 2, self.cols / 2)
    }

    /// Inverse of [`Spectrum::shifted`].
    pub fn unshifted(&self) -> Self {
        self.rolled(self.rows - self.rows / 2, self.cols - self.cols / 2)
    }

    fn rolled(&self, dr: usize, dc: usize) -> Self {
        let mut data = vec![Complex64::new(0.0, 0.0); self.data.len()];
        for r in 0..self.rows {
            let dst_row = ((r + dr) % self.rows) * self.cols;
            let src_row = r * self.cols;
            for c in 0..self.cols {
                data[dst_row + (c + dc) % self.cols] = self.data[src_row + c];
            }
        }
        Self {
            rows: self.rows,
            cols: self.cols,
            data,
        }
    }

    /// Multiply element-wise by a real row-major mask of the same shape.
    pub fn apply_mask(&mut self, mask: &[f64]) {
        debug_assert_eq!(mask.len(), self.data.len());
        self.data
            .par_iter_mut()
            .zip(mask.par_iter())
            .for_each(|(z, &m)| *z *= m);
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn data(&self) -> &[Complex64] {
        &self.data
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Complex64 {
        self.data[row * self.cols + col]
    }

    /// Largest |imaginary part|; what is left over after a round trip.
    pub fn max_imaginary(&self) -> f64 {
        self.data.iter().map(|z| z.im.abs()).fold(0.0, f64::max)
    }

    /// |z| of every coefficient, rounded and clamped to 8 bits.
    pub fn magnitude_image(&self) -> GrayImage {
        let raw = self
            .data
            .iter()
            .map(|z| z.norm().round().clamp(0.0, 255.0) as u8)
            .collect();
        GrayImage::from_raw(self.cols as u32, self.rows as u32, raw)
            .unwrap_or_else(|| GrayImage::new(self.cols as u32, self.rows as u32))
    }
}

fn transpose(data: &[Complex64], rows: usize, cols: usize) -> Vec<Complex64> {
    let mut out = vec![Complex64::new(0.0, 0.0); data.len()];
    for r in 0..rows {
        for c in 0..cols {
            out[c * rows + r] = data[r * cols + c];
        }
    }
    out
}

// ---------------------------------------------------------------------------
//  Spectrum display
// ---------------------------------------------------------------------------

/// Centred log-magnitude spectrum `20 ln(|F| + eps)`, min-max scaled to 0..=255.
/// A flat spectrum (e.g. an all-black image) displays as black.
pub fn magnitude_spectrum(img: &GrayImage) -> GrayImage {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return img.clone();
    }
    let spectrum = Spectrum::forward(img).shifted();
    let log_mag: Vec<f64> = spectrum
        .data()
        .iter()
        .map(|z| 20.0 * (z.norm() + SPECTRUM_EPSILON).ln())
        .collect();

    let min = log_mag.iter().copied().fold(f64::INFINITY, f64::min);
    let max = log_mag.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    if !range.is_finite() || range <= f64::EPSILON * max.abs().max(1.0) {
        return GrayImage::new(w, h);
    }

    let raw = log_mag
        .iter()
        .map(|&v| ((v - min) / range * 255.0).round().clamp(0.0, 255.0) as u8)
        .collect();
    GrayImage::from_raw(w, h, raw).unwrap_or_else(|| GrayImage::new(w, h))
}

// ---------------------------------------------------------------------------
//  Butterworth filters
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterKind {
    Lowpass,
    Highpass,
}

/// Cutoff radius `D0` (in frequency-plane pixels) and order `n`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ButterworthParams {
    pub cutoff: f64,
    pub order: u32,
}

impl Default for ButterworthParams {
    fn default() -> Self {
        Self {
            cutoff: 30.0,
            order: 2,
        }
    }
}

impl ButterworthParams {
    pub fn new(cutoff: f64, order: u32) -> Result<Self> {
        let params = Self { cutoff, order };
        params.validate()?;
        Ok(params)
    }

    /// `cutoff` must be positive (infinity allowed), `order` at least 1.
    pub fn validate(&self) -> Result<()> {
        if self.cutoff.is_nan() || self.cutoff <= 0.0 {
            return Err(Error::invalid(
                "cutoff",
                format!("{} is not a positive radius", self.cutoff),
            ));
        }
        if self.order == 0 || self.order > i32::MAX as u32 / 2 {
            return Err(Error::invalid(
                "order",
                format!("{} is outside 1..={}", self.order, i32::MAX / 2),
            ));
        }
        Ok(())
    }
}

/// Real-valued gain over the centred frequency plane, row-major `rows x cols`.
///
/// `D(u, v)` is the distance to `(rows / 2, cols / 2)`. Lowpass gain is
/// `1 / (1 + (D / D0)^2n)`; highpass gain is `1 / (1 + (D0 / D)^2n)` and
/// exactly zero at `D = 0`.
pub fn butterworth_mask(
    rows: usize,
    cols: usize,
    params: ButterworthParams,
    kind: FilterKind,
) -> Result<Vec<f64>> {
    params.validate()?;
    let mut mask = vec![0.0f64; rows * cols];
    if cols == 0 {
        return Ok(mask);
    }

    let crow = (rows / 2) as f64;
    let ccol = (cols / 2) as f64;
    let d0 = params.cutoff;
    let exp = 2 * params.order as i32;

    mask.par_chunks_mut(cols).enumerate().for_each(|(u, row)| {
        let du = u as f64 - crow;
        for (v, gain) in row.iter_mut().enumerate() {
            let dv = v as f64 - ccol;
            let d = (du * du + dv * dv).sqrt();
            *gain = match kind {
                FilterKind::Lowpass => 1.0 / (1.0 + (d / d0).powi(exp)),
                FilterKind::Highpass if d == 0.0 => 0.0,
                FilterKind::Highpass => 1.0 / (1.0 + (d0 / d).powi(exp)),
            };
        }
    });
    Ok(mask)
}

/// Filter `img` in the frequency domain and return the magnitude of the result.
pub fn butterworth_filter(
    img: &GrayImage,
    params: ButterworthParams,
    kind: FilterKind,
) -> Result<GrayImage> {
    params.validate()?;
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return Ok(img.clone());
    }

    let mut spectrum = Spectrum::forward(img).shifted();
    let mask = butterworth_mask(h as usize, w as usize, params, kind)?;
    spectrum.apply_mask(&mask);
    Ok(spectrum.unshifted().inverse().magnitude_image())
}

pub fn butterworth_lowpass(img: &GrayImage, params: ButterworthParams) -> Result<GrayImage> {
    butterworth_filter(img, params, FilterKind::Lowpass)
}

pub fn butterworth_highpass(img: &GrayImage, params: ButterworthParams) -> Result<GrayImage> {
    butterworth_filter(img, params, FilterKind::Highpass)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn pattern(w: u32, h: u32) -> GrayImage {
        GrayImage::from_fn(w, h, |x, y| Luma([((x * 37 + y * 91 + x * y * 7) % 256) as u8]))
    }

    #[test]
    fn shift_then_unshift_is_identity_for_odd_and_even() {
        for (w, h) in [(8, 6), (7, 5), (1, 3)] {
            let s = Spectrum::forward(&pattern(w, h));
            assert_eq!(s.shifted().unshifted(), s);
        }
    }

    #[test]
    fn shift_puts_dc_at_centre() {
        let img = GrayImage::from_pixel(7, 6, Luma([10]));
        let s = Spectrum::forward(&img).shifted();
        let dc = s.get(3, 3);
        assert!((dc.re - 420.0).abs() < 1e-9);
    }

    #[test]
    fn forward_inverse_round_trip() {
        let img = pattern(12, 9);
        let back = Spectrum::forward(&img).inverse();
        assert!(back.max_imaginary() < 1e-9);
        assert_eq!(back.magnitude_image(), img);
    }

    #[test]
    fn highpass_mask_is_zero_at_centre() {
        for (rows, cols) in [(8, 8), (7, 9), (1, 1)] {
            let mask = butterworth_mask(rows, cols, ButterworthParams::default(), FilterKind::Highpass)
                .unwrap();
            assert_eq!(mask[(rows / 2) * cols + cols / 2], 0.0);
            assert!(mask.iter().all(|g| g.is_finite()));
        }
    }

    #[test]
    fn lowpass_with_huge_cutoff_is_identity_mask() {
        let params = ButterworthParams::new(f64::INFINITY, 2).unwrap();
        let mask = butterworth_mask(16, 16, params, FilterKind::Lowpass).unwrap();
        assert!(mask.iter().all(|&g| g == 1.0));

        let params = ButterworthParams::new(1e9, 2).unwrap();
        let mask = butterworth_mask(16, 16, params, FilterKind::Lowpass).unwrap();
        assert!(mask.iter().all(|&g| (g - 1.0).abs() < 1e-12));
    }

    #[test]
    fn lowpass_with_tiny_cutoff_keeps_only_dc() {
        let params = ButterworthParams::new(1e-6, 2).unwrap();
        let mask = butterworth_mask(9, 10, params, FilterKind::Lowpass).unwrap();
        for (i, &g) in mask.iter().enumerate() {
            if i == 4 * 10 + 5 {
                assert_eq!(g, 1.0);
            } else {
                assert!(g < 1e-12, "gain {g} at {i}");
            }
        }
    }

    #[test]
    fn lowpass_gain_is_half_at_cutoff() {
        let params = ButterworthParams::new(3.0, 2).unwrap();
        let mask = butterworth_mask(16, 16, params, FilterKind::Lowpass).unwrap();
        assert!((mask[8 * 16 + 11] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn lowpass_round_trip_is_real() {
        let img = pattern(32, 24);
        let mut s = Spectrum::forward(&img).shifted();
        let mask = butterworth_mask(24, 32, ButterworthParams::default(), FilterKind::Lowpass).unwrap();
        s.apply_mask(&mask);
        let spatial = s.unshifted().inverse();
        assert!(spatial.max_imaginary() < 1e-9);
    }

    #[test]
    fn lowpass_infinite_cutoff_returns_input() {
        let img = pattern(20, 14);
        let params = ButterworthParams::new(f64::INFINITY, 2).unwrap();
        assert_eq!(butterworth_lowpass(&img, params).unwrap(), img);
    }

    #[test]
    fn highpass_removes_flat_field() {
        let img = GrayImage::from_pixel(16, 16, Luma([180]));
        let out = butterworth_highpass(&img, ButterworthParams::default()).unwrap();
        assert!(out.as_raw().iter().all(|&v| v == 0));
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        assert!(ButterworthParams::new(0.0, 2).is_err());
        assert!(ButterworthParams::new(f64::NAN, 2).is_err());
        assert!(ButterworthParams::new(30.0, 0).is_err());
        let img = pattern(4, 4);
        let bad = ButterworthParams { cutoff: -1.0, order: 2 };
        assert!(butterworth_lowpass(&img, bad).is_err());
    }

    #[test]
    fn spectrum_of_black_image_is_black() {
        let out = magnitude_spectrum(&GrayImage::new(8, 8));
        assert!(out.as_raw().iter().all(|&v| v == 0));
    }

    #[test]
    fn spectrum_of_flat_image_lights_dc_only() {
        let out = magnitude_spectrum(&GrayImage::from_pixel(8, 8, Luma([100])));
        assert_eq!(out.get_pixel(4, 4)[0], 255);
        assert_eq!(out.get_pixel(0, 0)[0], 0);
    }

    #[test]
    fn empty_images_pass_through() {
        let empty = GrayImage::new(0, 0);
        assert_eq!(magnitude_spectrum(&empty).dimensions(), (0, 0));
        let out = butterworth_lowpass(&empty, ButterworthParams::default()).unwrap();
        assert_eq!(out.dimensions(), (0, 0));
    }
}
