//! imglab: two small image-processing workbenches sharing one kernel library.
//!
//! * `tonelab` - grayscale point transforms and Butterworth frequency filters.
//! * `warplab` - colour translate / rotate / zoom / blur / wave.
//!
//! The kernels in [`ops`] are pure functions over `image` buffers; [`session`]
//! holds the loaded source and last result; [`app`] and [`cli`] are the window
//! and headless front ends.

pub mod logger;

pub mod app;
pub mod cli;
pub mod commands;
pub mod components;
pub mod error;
pub mod io;
pub mod ops;
pub mod params;
pub mod session;

pub use error::{Error, Result};
