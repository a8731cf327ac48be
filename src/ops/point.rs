// ============================================================================
// POINT TRANSFORMS: per-sample intensity remaps
// ============================================================================
//
// Every transform builds a 256-entry lookup table and runs it over every
// sample of every channel. Table entries are computed in f64, clamped to
// 0..=255 and truncated, so no NaN ever reaches the output buffer.
// ============================================================================

use image::{GrayImage, Pixel};
use rayon::prelude::*;

use super::Raster;
use crate::error::{Error, Result};

/// 8-bit lookup table.
pub type Lut = [u8; 256];

/// Run a lookup table over every sample of `img`.
pub fn apply_lut<P>(img: &Raster<P>, lut: &Lut) -> Raster<P>
where
    P: Pixel<Subpixel = u8>,
{
    let (w, h) = img.dimensions();
    let mut out = Raster::<P>::new(w, h);
    let dst: &mut [u8] = &mut out;
    dst.par_iter_mut()
        .zip(img.as_raw().par_iter())
        .for_each(|(d, &s)| *d = lut[s as usize]);
    out
}

/// Clamp to the 8-bit range and truncate (NaN maps to 0).
#[inline]
pub(crate) fn saturate(v: f64) -> u8 {
    if v.is_nan() { 0 } else { v.clamp(0.0, 255.0) as u8 }
}

fn sample_range<P>(img: &Raster<P>) -> Option<(u8, u8)>
where
    P: Pixel<Subpixel = u8>,
{
    let raw = img.as_raw();
    let min = raw.iter().copied().min()?;
    let max = raw.iter().copied().max()?;
    Some((min, max))
}

fn zeros_like<P>(img: &Raster<P>) -> Raster<P>
where
    P: Pixel<Subpixel = u8>,
{
    Raster::<P>::new(img.width(), img.height())
}

// ---------------------------------------------------------------------------
//  Inverse
// ---------------------------------------------------------------------------

fn inverse_lut() -> Lut {
    let mut lut = [0u8; 256];
    for (i, v) in lut.iter_mut().enumerate() {
        *v = 255 - i as u8;
    }
    lut
}

/// Photographic negative: `255 - v`.
pub fn inverse<P>(img: &Raster<P>) -> Raster<P>
where
    P: Pixel<Subpixel = u8>,
{
    apply_lut(img, &inverse_lut())
}

// ---------------------------------------------------------------------------
//  Gamma / log
// ---------------------------------------------------------------------------

/// Power-law correction normalised by the image maximum.
///
/// Each sample maps to `255 * ((v + 1) / max)^gamma`, evaluated in the log
/// domain. An all-zero image yields an all-zero result.
pub fn gamma<P>(img: &Raster<P>, gamma: f64) -> Result<Raster<P>>
where
    P: Pixel<Subpixel = u8>,
{
    if !gamma.is_finite() || gamma <= 0.0 {
        return Err(Error::invalid("gamma", format!("{gamma} is not a positive number")));
    }
    let max = match sample_range(img) {
        Some((_, max)) if max > 0 => max as f64,
        _ => return Ok(zeros_like(img)),
    };

    let mut lut = [0u8; 256];
    for (i, v) in lut.iter_mut().enumerate() {
        let ratio = (i as f64 + 1.0) / max;
        *v = saturate((ratio.ln() * gamma).exp() * 255.0);
    }
    Ok(apply_lut(img, &lut))
}

/// `128 * ln(1 + v) / ln(1 + max)`. An all-zero image yields zeros.
pub fn log_transform<P>(img: &Raster<P>) -> Raster<P>
where
    P: Pixel<Subpixel = u8>,
{
    let max = match sample_range(img) {
        Some((_, max)) if max > 0 => max as f64,
        _ => return zeros_like(img),
    };

    let denom = max.ln_1p();
    let mut lut = [0u8; 256];
    for (i, v) in lut.iter_mut().enumerate() {
        *v = saturate(128.0 * (i as f64).ln_1p() / denom);
    }
    apply_lut(img, &lut)
}

// ---------------------------------------------------------------------------
//  Contrast stretching
// ---------------------------------------------------------------------------

/// Linear rescale of `[min, max]` to `[0, 255]`.
/// A constant image has no range to stretch and is returned unchanged.
pub fn stretch_contrast<P>(img: &Raster<P>) -> Raster<P>
where
    P: Pixel<Subpixel = u8>,
{
    let (min, max) = match sample_range(img) {
        Some((min, max)) if max > min => (min, max),
        _ => return img.clone(),
    };

    let range = (max - min) as f64;
    let mut lut = [0u8; 256];
    for (i, v) in lut.iter_mut().enumerate() {
        *v = saturate((i as f64 - min as f64) * 255.0 / range);
    }
    apply_lut(img, &lut)
}

// ---------------------------------------------------------------------------
//  Histogram equalization
// ---------------------------------------------------------------------------

/// 256-bin histogram over every sample.
pub fn histogram<P>(img: &Raster<P>) -> [u32; 256]
where
    P: Pixel<Subpixel = u8>,
{
    let mut hist = [0u32; 256];
    for &s in img.as_raw() {
        hist[s as usize] += 1;
    }
    hist
}

/// Cumulative-distribution remap of a single-channel image.
///
/// The lowest occupied bin maps to 0 and the rest are spread over 0..=255 in
/// proportion to the pixel count above it. An image with a single occupied
/// bin is returned unchanged.
pub fn equalize_histogram(img: &GrayImage) -> GrayImage {
    let hist = histogram(img);
    let total: u64 = hist.iter().map(|&c| c as u64).sum();

    let Some(first) = hist.iter().position(|&c| c > 0) else {
        return img.clone();
    };
    let floor = hist[first] as u64;
    if floor == total {
        return img.clone();
    }

    let scale = 255.0 / (total - floor) as f64;
    let mut lut = [0u8; 256];
    let mut sum = 0u64;
    for j in first + 1..256 {
        sum += hist[j] as u64;
        lut[j] = (sum as f64 * scale).round().clamp(0.0, 255.0) as u8;
    }
    apply_lut(img, &lut)
}
