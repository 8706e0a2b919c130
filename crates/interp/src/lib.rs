//! Module for expanding DG coefficients onto dense meshes
//!
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod describe;
mod error;
mod interpolate;

// Inline anything important for a nice public API
#[doc(inline)]
pub use interpolate::{ComponentSelector, Interpolator};

#[doc(inline)]
pub use describe::frame_descriptor;

#[doc(inline)]
pub use error::{Error, Result};
