// ============================================================================
// SAMPLING: edge modes, interpolation and coordinate remapping
// ============================================================================
//
// Every geometric kernel is an inverse mapping: for each output pixel we know
// the (row, col) it should read from the source. `SampleGrid` stores those
// coordinates once and `remap` reads every channel through the same taps.
// Taps that fall outside the source go through an `EdgeMode`.
// ============================================================================

use std::fmt;
use std::str::FromStr;

use image::Pixel;
use rayon::prelude::*;

use super::Raster;
use crate::error::Error;

/// How samples outside the source image are read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeMode {
    /// Every outside sample reads this value.
    Constant(u8),
    /// Half-sample symmetric: `d c b a | a b c d | d c b a`.
    Reflect,
    /// Whole-sample symmetric: `d c b | a b c d | c b a`.
    Mirror,
    /// Repeat the edge sample: `a a a | a b c d | d d d`.
    Nearest,
    /// Periodic: `a b c d | a b c d | a b c d`.
    Wrap,
}

impl Default for EdgeMode {
    fn default() -> Self {
        EdgeMode::Constant(0)
    }
}

impl EdgeMode {
    pub fn label(&self) -> &'static str {
        match self {
            EdgeMode::Constant(_) => "Constant",
            EdgeMode::Reflect => "Reflect",
            EdgeMode::Mirror => "Mirror",
            EdgeMode::Nearest => "Nearest",
            EdgeMode::Wrap => "Wrap",
        }
    }

    pub fn all() -> &'static [EdgeMode] {
        &[
            EdgeMode::Constant(0),
            EdgeMode::Reflect,
            EdgeMode::Mirror,
            EdgeMode::Nearest,
            EdgeMode::Wrap,
        ]
    }

    /// Map tap index `i` onto `0..n`, or `None` when the tap reads the fill value.
    #[inline]
    pub fn resolve(self, i: i64, n: i64) -> Option<usize> {
        if n <= 0 {
            return None;
        }
        if (0..n).contains(&i) {
            return Some(i as usize);
        }
        let idx = match self {
            EdgeMode::Constant(_) => return None,
            EdgeMode::Nearest => i.clamp(0, n - 1),
            EdgeMode::Wrap => i.rem_euclid(n),
            EdgeMode::Reflect => {
                let period = 2 * n;
                let m = i.rem_euclid(period);
                if m < n { m } else { period - 1 - m }
            }
            EdgeMode::Mirror => {
                if n == 1 {
                    0
                } else {
                    let period = 2 * n - 2;
                    let m = i.rem_euclid(period);
                    if m < n { m } else { period - m }
                }
            }
        };
        Some(idx as usize)
    }

    #[inline]
    fn fill(self) -> f64 {
        match self {
            EdgeMode::Constant(v) => v as f64,
            _ => 0.0,
        }
    }
}

impl fmt::Display for EdgeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeMode::Constant(v) => write!(f, "constant:{v}"),
            other => f.write_str(&other.label().to_lowercase()),
        }
    }
}

impl FromStr for EdgeMode {
    type Err = Error;

    /// Accepts `constant`, `constant:<0-255>`, `reflect`, `mirror`, `nearest`, `wrap`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        if let Some(value) = s.strip_prefix("constant:") {
            let v = value
                .parse::<u8>()
                .map_err(|_| Error::invalid("edge mode", format!("bad fill value '{value}'")))?;
            return Ok(EdgeMode::Constant(v));
        }
        match s.as_str() {
            "constant" => Ok(EdgeMode::Constant(0)),
            "reflect" => Ok(EdgeMode::Reflect),
            "mirror" => Ok(EdgeMode::Mirror),
            "nearest" => Ok(EdgeMode::Nearest),
            "wrap" => Ok(EdgeMode::Wrap),
            _ => Err(Error::invalid("edge mode", format!("unknown mode '{s}'"))),
        }
    }
}

/// Interpolation used when a source coordinate falls between samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Interpolation {
    Nearest,
    #[default]
    Bilinear,
    Bicubic,
}

impl Interpolation {
    pub fn label(&self) -> &'static str {
        match self {
            Interpolation::Nearest => "Nearest",
            Interpolation::Bilinear => "Bilinear",
            Interpolation::Bicubic => "Bicubic",
        }
    }

    pub fn all() -> &'static [Interpolation] {
        &[
            Interpolation::Nearest,
            Interpolation::Bilinear,
            Interpolation::Bicubic,
        ]
    }
}

impl FromStr for Interpolation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "nearest" | "0" => Ok(Interpolation::Nearest),
            "bilinear" | "linear" | "1" => Ok(Interpolation::Bilinear),
            "bicubic" | "cubic" | "3" => Ok(Interpolation::Bicubic),
            other => Err(Error::invalid("interpolation", format!("unknown method '{other}'"))),
        }
    }
}

/// Catmull-Rom basis (tau = 0.5): weights for taps i-1, i, i+1, i+2.
#[inline]
fn catmull_rom_weights(t: f64) -> [f64; 4] {
    let t2 = t * t;
    let t3 = t2 * t;
    [
        -0.5 * t3 + t2 - 0.5 * t,
         1.5 * t3 - 2.5 * t2 + 1.0,
        -1.5 * t3 + 2.0 * t2 + 0.5 * t,
         0.5 * t3 - 0.5 * t2,
    ]
}

/// One-axis taps: (index or None for fill, weight).
type AxisTaps = ([Option<usize>; 4], [f64; 4], usize);

fn axis_taps(coord: f64, n: i64, interp: Interpolation, edge: EdgeMode) -> AxisTaps {
    let mut idx = [None; 4];
    let mut wts = [0.0; 4];
    match interp {
        Interpolation::Nearest => {
            idx[0] = edge.resolve(coord.round() as i64, n);
            wts[0] = 1.0;
            (idx, wts, 1)
        }
        Interpolation::Bilinear => {
            let base = coord.floor();
            let t = coord - base;
            let i0 = base as i64;
            idx[0] = edge.resolve(i0, n);
            wts[0] = 1.0 - t;
            if t == 0.0 {
                return (idx, wts, 1);
            }
            idx[1] = edge.resolve(i0 + 1, n);
            wts[1] = t;
            (idx, wts, 2)
        }
        Interpolation::Bicubic => {
            let base = coord.floor();
            let t = coord - base;
            let i0 = base as i64;
            if t == 0.0 {
                idx[0] = edge.resolve(i0, n);
                wts[0] = 1.0;
                return (idx, wts, 1);
            }
            let w = catmull_rom_weights(t);
            for k in 0..4 {
                idx[k] = edge.resolve(i0 - 1 + k as i64, n);
                wts[k] = w[k];
            }
            (idx, wts, 4)
        }
    }
}

/// A source coordinate `(row, col)` for every output pixel.
#[derive(Clone, Debug)]
pub struct SampleGrid {
    width: u32,
    height: u32,
    coords: Vec<[f64; 2]>,
}

impl SampleGrid {
    /// Build a grid by evaluating `f(row, col) -> (src_row, src_col)` once per pixel.
    pub fn from_fn<F>(width: u32, height: u32, f: F) -> Self
    where
        F: Fn(u32, u32) -> (f64, f64) + Sync,
    {
        let w = width as usize;
        let mut coords = vec![[0.0f64; 2]; w * height as usize];
        if w > 0 {
            coords.par_chunks_mut(w).enumerate().for_each(|(r, row)| {
                for (c, slot) in row.iter_mut().enumerate() {
                    let (sr, sc) = f(r as u32, c as u32);
                    *slot = [sr, sc];
                }
            });
        }
        Self { width, height, coords }
    }

    /// Grid that reads every pixel from itself.
    pub fn identity(width: u32, height: u32) -> Self {
        Self::from_fn(width, height, |r, c| (r as f64, c as f64))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn get(&self, row: u32, col: u32) -> (f64, f64) {
        let [r, c] = self.coords[row as usize * self.width as usize + col as usize];
        (r, c)
    }
}

/// Resample `img` on `grid`. The taps for each output pixel are resolved once
/// and shared by every channel.
pub fn remap<P>(
    img: &Raster<P>,
    grid: &SampleGrid,
    interp: Interpolation,
    edge: EdgeMode,
) -> Raster<P>
where
    P: Pixel<Subpixel = u8>,
{
    let mut out = Raster::<P>::new(grid.width, grid.height);
    if grid.width == 0 || grid.height == 0 {
        return out;
    }

    let channels = P::CHANNEL_COUNT as usize;
    let src_w = img.width() as i64;
    let src_h = img.height() as i64;
    let src_stride = img.width() as usize * channels;
    let src = img.as_raw();
    let fill = edge.fill();
    let row_len = grid.width as usize * channels;

    let dst: &mut [u8] = &mut out;
    dst.par_chunks_mut(row_len).enumerate().for_each(|(r, row)| {
        let mut acc = [0.0f64; 4];
        for c in 0..grid.width as usize {
            let [sr, sc] = grid.coords[r * grid.width as usize + c];
            let (ri, rw, rn) = axis_taps(sr, src_h, interp, edge);
            let (ci, cw, cn) = axis_taps(sc, src_w, interp, edge);

            let acc = &mut acc[..channels.min(4)];
            acc.fill(0.0);
            for a in 0..rn {
                for b in 0..cn {
                    let weight = rw[a] * cw[b];
                    match (ri[a], ci[b]) {
                        (Some(y), Some(x)) => {
                            let base = y * src_stride + x * channels;
                            for (ch, v) in acc.iter_mut().enumerate() {
                                *v += weight * src[base + ch] as f64;
                            }
                        }
                        _ => {
                            for v in acc.iter_mut() {
                                *v += weight * fill;
                            }
                        }
                    }
                }
            }

            let px = c * channels;
            for (ch, v) in acc.iter().enumerate() {
                row[px + ch] = v.round().clamp(0.0, 255.0) as u8;
            }
        }
    });
    out
}
