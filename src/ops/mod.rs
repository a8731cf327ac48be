//! Image-processing kernels. Every kernel is a pure function from an input
//! buffer (plus parameters) to a new buffer; inputs are never mutated.

pub mod blur;
pub mod frequency;
pub mod geometry;
pub mod point;
pub mod sampling;
pub mod warp;

use image::ImageBuffer;

/// An 8-bit image with any pixel layout (`Luma`, `Rgb`, `Rgba`, ...).
pub type Raster<P> = ImageBuffer<P, Vec<u8>>;

pub use blur::{gaussian_blur, gaussian_blur_axes};
pub use frequency::{
    ButterworthParams, FilterKind, Spectrum, butterworth_filter, butterworth_highpass,
    butterworth_lowpass, butterworth_mask, magnitude_spectrum,
};
pub use geometry::{rotate, translate, zoom, zoom_axes};
pub use point::{equalize_histogram, gamma, histogram, inverse, log_transform, stretch_contrast};
pub use sampling::{EdgeMode, Interpolation, SampleGrid, remap};
pub use warp::{wave, wave_grid};
