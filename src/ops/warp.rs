// ============================================================================
// WAVE WARP: sinusoidal row displacement
// ============================================================================

use image::Pixel;

use super::Raster;
use super::sampling::{EdgeMode, Interpolation, SampleGrid, remap};
use crate::error::{Error, Result};

/// Columns per radian of the wave: the source row is `r + A * sin(c / WAVELENGTH)`.
pub const WAVELENGTH: f64 = 20.0;

/// Source coordinates of the wave warp. The offset depends on the column only,
/// so it is evaluated once per column and shared by every row and channel.
pub fn wave_grid(width: u32, height: u32, amplitude: f64) -> SampleGrid {
    let offsets: Vec<f64> = (0..width)
        .map(|c| amplitude * (c as f64 / WAVELENGTH).sin())
        .collect();
    SampleGrid::from_fn(width, height, |r, c| (r as f64 + offsets[c as usize], c as f64))
}

/// Displace every pixel vertically along a sine of its column, sampling
/// bilinearly with reflected borders.
pub fn wave<P>(img: &Raster<P>, amplitude: f64) -> Result<Raster<P>>
where
    P: Pixel<Subpixel = u8>,
{
    if !amplitude.is_finite() {
        return Err(Error::invalid("amplitude", format!("{amplitude} is not finite")));
    }
    let grid = wave_grid(img.width(), img.height(), amplitude);
    Ok(remap(img, &grid, Interpolation::Bilinear, EdgeMode::Reflect))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn colourful(w: u32, h: u32) -> RgbImage {
        RgbImage::from_fn(w, h, |x, y| Rgb([(x * 13) as u8, (y * 29) as u8, ((x + y) * 7) as u8]))
    }

    #[test]
    fn zero_amplitude_is_identity_on_every_channel() {
        let img = colourful(40, 30);
        assert_eq!(wave(&img, 0.0).unwrap(), img);
    }

    #[test]
    fn grid_offsets_follow_the_sine() {
        let grid = wave_grid(64, 8, 10.0);
        let (r, c) = grid.get(3, 31);
        assert_eq!(c, 31.0);
        assert!((r - (3.0 + 10.0 * (31.0f64 / 20.0).sin())).abs() < 1e-12);
        assert_eq!(grid.get(5, 0), (5.0, 0.0));
    }

    #[test]
    fn channels_move_together() {
        // Same plane in every channel: the warped channels must stay equal.
        let img = RgbImage::from_fn(50, 20, |x, y| {
            let v = ((x * 5 + y * 11) % 256) as u8;
            Rgb([v, v, v])
        });
        let out = wave(&img, 7.5).unwrap();
        assert!(out.pixels().all(|p| p[0] == p[1] && p[1] == p[2]));
        assert_ne!(out, img);
    }

    #[test]
    fn non_finite_amplitude_is_rejected() {
        assert!(wave(&colourful(4, 4), f64::NAN).is_err());
    }
}
