// ============================================================================
// GEOMETRY
// ============================================================================
//
// Each transform builds a `SampleGrid` (output pixel -> source coordinate) and
// hands it to `remap`, so the interpolation and edge handling are shared.
// ============================================================================

use image::Pixel;

use super::Raster;
use super::sampling::{EdgeMode, Interpolation, SampleGrid, remap};
use crate::error::{Error, Result};

/// Largest side a zoom may produce.
pub const MAX_SIDE: u32 = 1 << 15;

/// Largest pixel count a zoom may produce.
pub const MAX_PIXELS: u64 = 1 << 26;

/// Shift content by `dx` columns and `dy` rows; vacated samples follow `edge`.
pub fn translate<P>(
    img: &Raster<P>,
    dx: f64,
    dy: f64,
    interp: Interpolation,
    edge: EdgeMode,
) -> Result<Raster<P>>
where
    P: Pixel<Subpixel = u8>,
{
    if !dx.is_finite() || !dy.is_finite() {
        return Err(Error::invalid("shift", format!("({dx}, {dy}) is not finite")));
    }
    let (w, h) = img.dimensions();
    let grid = SampleGrid::from_fn(w, h, |r, c| (r as f64 - dy, c as f64 - dx));
    Ok(remap(img, &grid, interp, edge))
}

/// cos/sin of an angle in degrees, exact at multiples of 90.
fn cos_sin_deg(angle: f64) -> (f64, f64) {
    let a = angle.rem_euclid(360.0);
    if a == 0.0 {
        (1.0, 0.0)
    } else if a == 90.0 {
        (0.0, 1.0)
    } else if a == 180.0 {
        (-1.0, 0.0)
    } else if a == 270.0 {
        (0.0, -1.0)
    } else {
        let rad = a.to_radians();
        (rad.cos(), rad.sin())
    }
}

/// Output size of a rotation: the input size, or with `expand` the bounding
/// box of the rotated corners.
pub fn rotated_size(width: u32, height: u32, angle: f64, expand: bool) -> (u32, u32) {
    if !expand {
        return (width, height);
    }
    let (c, s) = cos_sin_deg(angle);
    let (ih, iw) = (height as f64, width as f64);
    let corners = [(0.0, 0.0), (0.0, iw), (ih, 0.0), (ih, iw)];

    let mut rows = (f64::INFINITY, f64::NEG_INFINITY);
    let mut cols = (f64::INFINITY, f64::NEG_INFINITY);
    for (r, col) in corners {
        let rr = c * r + s * col;
        let cc = -s * r + c * col;
        rows = (rows.0.min(rr), rows.1.max(rr));
        cols = (cols.0.min(cc), cols.1.max(cc));
    }
    let out_w = (cols.1 - cols.0 + 0.5).floor() as u32;
    let out_h = (rows.1 - rows.0 + 0.5).floor() as u32;
    (out_w, out_h)
}

/// Rotate counter-clockwise by `angle` degrees about the image centre.
///
/// The output pixel at `o` reads the source at
/// `[[c, s], [-s, c]] * (o - out_centre) + in_centre`.
pub fn rotate<P>(
    img: &Raster<P>,
    angle: f64,
    expand: bool,
    interp: Interpolation,
    edge: EdgeMode,
) -> Result<Raster<P>>
where
    P: Pixel<Subpixel = u8>,
{
    if !angle.is_finite() {
        return Err(Error::invalid("angle", format!("{angle} is not finite")));
    }
    let (iw, ih) = img.dimensions();
    let (ow, oh) = rotated_size(iw, ih, angle, expand);
    let (c, s) = cos_sin_deg(angle);

    let half_oh = (oh as f64 - 1.0) / 2.0;
    let half_ow = (ow as f64 - 1.0) / 2.0;
    let out_centre = (c * half_oh + s * half_ow, -s * half_oh + c * half_ow);
    let in_centre = ((ih as f64 - 1.0) / 2.0, (iw as f64 - 1.0) / 2.0);
    let offset = (in_centre.0 - out_centre.0, in_centre.1 - out_centre.1);

    let grid = SampleGrid::from_fn(ow, oh, |r, col| {
        let (r, col) = (r as f64, col as f64);
        (c * r + s * col + offset.0, -s * r + c * col + offset.1)
    });
    Ok(remap(img, &grid, interp, edge))
}

/// Resample by `factor` on both spatial axes.
pub fn zoom<P>(img: &Raster<P>, factor: f64, interp: Interpolation) -> Result<Raster<P>>
where
    P: Pixel<Subpixel = u8>,
{
    zoom_axes(img, factor, factor, interp)
}

fn zoomed_side(name: &'static str, side: u32, factor: f64) -> Result<u32> {
    if !factor.is_finite() || factor <= 0.0 {
        return Err(Error::invalid(name, format!("{factor} is not a positive number")));
    }
    if side == 0 {
        return Ok(0);
    }
    let out = (side as f64 * factor).round().max(1.0);
    if out > MAX_SIDE as f64 {
        return Err(Error::invalid(
            name,
            format!("{factor} would produce a side of {out} pixels (max {MAX_SIDE})"),
        ));
    }
    Ok(out as u32)
}

/// Resample rows by `factor_y` and columns by `factor_x`; the output side is
/// `round(side * factor)` and the corner samples of input and output coincide.
pub fn zoom_axes<P>(
    img: &Raster<P>,
    factor_y: f64,
    factor_x: f64,
    interp: Interpolation,
) -> Result<Raster<P>>
where
    P: Pixel<Subpixel = u8>,
{
    let (iw, ih) = img.dimensions();
    let oh = zoomed_side("zoom factor", ih, factor_y)?;
    let ow = zoomed_side("zoom factor", iw, factor_x)?;
    let pixels = ow as u64 * oh as u64;
    if pixels > MAX_PIXELS {
        return Err(Error::invalid(
            "zoom factor",
            format!("{ow}x{oh} output exceeds {MAX_PIXELS} pixels"),
        ));
    }

    let step = |input: u32, output: u32| {
        if output > 1 {
            (input as f64 - 1.0) / (output as f64 - 1.0)
        } else {
            1.0
        }
    };
    let (sy, sx) = (step(ih, oh), step(iw, ow));

    let grid = SampleGrid::from_fn(ow, oh, |r, c| (r as f64 * sy, c as f64 * sx));
    Ok(remap(img, &grid, interp, EdgeMode::Nearest))
}
