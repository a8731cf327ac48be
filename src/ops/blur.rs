// ============================================================================
// GAUSSIAN BLUR: separable, per spatial axis, channels never mixed
// ============================================================================

use image::Pixel;
use rayon::prelude::*;

use super::Raster;
use super::sampling::EdgeMode;
use crate::error::{Error, Result};

/// Kernel radius in standard deviations.
pub const TRUNCATE: f32 = 4.0;

/// Largest accepted sigma, in multiples of the image's longest side. The
/// kernel radius then stays within `TRUNCATE` times that side.
pub const MAX_SIGMA_PER_SIDE: f32 = 1.0;

/// Hard cap on the kernel radius, whatever sigma is passed.
const MAX_RADIUS: f32 = (1 << 20) as f32;

/// Normalised 1-D Gaussian kernel of radius `floor(TRUNCATE * sigma + 0.5)`,
/// capped at 2^20 taps each side. `sigma == 0` gives the unit kernel.
pub fn gaussian_kernel(sigma: f32) -> Vec<f32> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return vec![1.0];
    }
    let radius = (TRUNCATE * sigma + 0.5).min(MAX_RADIUS) as usize;
    if radius == 0 {
        return vec![1.0];
    }
    let len = radius * 2 + 1;
    let s2 = 2.0 * sigma * sigma;
    let mut kernel: Vec<f32> = (0..len)
        .map(|i| {
            let x = i as f32 - radius as f32;
            (-x * x / s2).exp()
        })
        .collect();
    let inv = 1.0 / kernel.iter().sum::<f32>();
    for v in &mut kernel {
        *v *= inv;
    }
    kernel
}

/// Largest sigma accepted for an image whose longest side is `side`.
pub fn max_sigma(side: u32) -> f32 {
    side.max(1) as f32 * MAX_SIGMA_PER_SIDE
}

fn check_sigma(name: &'static str, sigma: f32, side: u32) -> Result<()> {
    if !sigma.is_finite() || sigma < 0.0 {
        return Err(Error::invalid(name, format!("{sigma} is not a non-negative number")));
    }
    let max = max_sigma(side);
    if sigma > max {
        return Err(Error::invalid(
            name,
            format!("{sigma} is larger than {max} for a {side}-pixel image"),
        ));
    }
    Ok(())
}

/// Blur both spatial axes with the same `sigma`.
pub fn gaussian_blur<P>(img: &Raster<P>, sigma: f32) -> Result<Raster<P>>
where
    P: Pixel<Subpixel = u8>,
{
    gaussian_blur_axes(img, sigma, sigma)
}

/// Blur rows with `sigma_y` and columns with `sigma_x`; samples outside the
/// image are read with half-sample reflection.
pub fn gaussian_blur_axes<P>(img: &Raster<P>, sigma_y: f32, sigma_x: f32) -> Result<Raster<P>>
where
    P: Pixel<Subpixel = u8>,
{
    let side = img.width().max(img.height());
    check_sigma("sigma", sigma_y, side)?;
    check_sigma("sigma", sigma_x, side)?;

    let w = img.width() as usize;
    let h = img.height() as usize;
    if w == 0 || h == 0 || (sigma_x == 0.0 && sigma_y == 0.0) {
        return Ok(img.clone());
    }

    let channels = P::CHANNEL_COUNT as usize;
    let stride = w * channels;
    let buf_in: Vec<f32> = img.as_raw().iter().map(|&b| b as f32).collect();

    // --- Horizontal pass (parallel by row) ---
    let kernel_x = gaussian_kernel(sigma_x);
    let rx = (kernel_x.len() / 2) as i64;
    let mut buf_h = vec![0.0f32; buf_in.len()];
    buf_h.par_chunks_mut(stride).enumerate().for_each(|(y, row_out)| {
        let row_in = &buf_in[y * stride..(y + 1) * stride];
        for x in 0..w {
            for ch in 0..channels {
                let mut acc = 0.0f32;
                for (ki, &kv) in kernel_x.iter().enumerate() {
                    let sx = EdgeMode::Reflect
                        .resolve(x as i64 + ki as i64 - rx, w as i64)
                        .unwrap_or(x);
                    acc += row_in[sx * channels + ch] * kv;
                }
                row_out[x * channels + ch] = acc;
            }
        }
    });

    // --- Vertical pass (parallel by row) ---
    let kernel_y = gaussian_kernel(sigma_y);
    let ry = (kernel_y.len() / 2) as i64;
    let mut out = Raster::<P>::new(w as u32, h as u32);
    let dst: &mut [u8] = &mut out;
    dst.par_chunks_mut(stride).enumerate().for_each(|(y, row_out)| {
        for (i, px) in row_out.iter_mut().enumerate() {
            let mut acc = 0.0f32;
            for (ki, &kv) in kernel_y.iter().enumerate() {
                let sy = EdgeMode::Reflect
                    .resolve(y as i64 + ki as i64 - ry, h as i64)
                    .unwrap_or(y);
                acc += buf_h[sy * stride + i] * kv;
            }
            *px = acc.round().clamp(0.0, 255.0) as u8;
        }
    });

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage};

    #[test]
    fn kernel_is_normalised_and_sized() {
        let k = gaussian_kernel(2.0);
        assert_eq!(k.len(), 17);
        assert!((k.iter().sum::<f32>() - 1.0).abs() < 1e-6);
        assert_eq!(gaussian_kernel(0.0), vec![1.0]);
    }

    #[test]
    fn zero_sigma_is_identity() {
        let img = RgbImage::from_fn(5, 4, |x, y| Rgb([x as u8 * 50, y as u8 * 60, 7]));
        assert_eq!(gaussian_blur(&img, 0.0).unwrap(), img);
    }

    #[test]
    fn flat_image_stays_flat() {
        let img = RgbImage::from_pixel(9, 7, Rgb([200, 100, 50]));
        let out = gaussian_blur(&img, 2.0).unwrap();
        assert_eq!(out, img);
    }

    #[test]
    fn channels_are_not_mixed() {
        let img = RgbImage::from_fn(6, 6, |x, _| if x < 3 { Rgb([255, 0, 0]) } else { Rgb([0, 0, 255]) });
        let out = gaussian_blur(&img, 1.5).unwrap();
        assert!(out.pixels().all(|p| p[1] == 0));
    }

    #[test]
    fn blur_spreads_an_impulse() {
        let mut img = GrayImage::new(11, 11);
        img.put_pixel(5, 5, Luma([255]));
        let out = gaussian_blur(&img, 1.0).unwrap();
        assert!(out.get_pixel(5, 5)[0] < 255);
        assert!(out.get_pixel(6, 5)[0] > 0);
        assert_eq!(out.get_pixel(6, 5), out.get_pixel(5, 6));
    }

    #[test]
    fn negative_sigma_is_rejected() {
        let img = GrayImage::new(3, 3);
        assert!(gaussian_blur(&img, -1.0).is_err());
        assert!(gaussian_blur(&img, f32::NAN).is_err());
    }

    #[test]
    fn oversized_sigma_is_rejected() {
        let img = RgbImage::new(4, 4);
        assert!(gaussian_blur(&img, 4.0).is_ok());
        let err = gaussian_blur(&img, 4.5).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { name: "sigma", .. }));
        assert!(gaussian_blur(&img, 1e30).is_err());
        assert!(gaussian_blur(&img, f32::MAX).is_err());
    }

    #[test]
    fn kernel_never_overflows() {
        assert_eq!(gaussian_kernel(f32::INFINITY), vec![1.0]);
        assert_eq!(gaussian_kernel(-3.0), vec![1.0]);
    }
}
