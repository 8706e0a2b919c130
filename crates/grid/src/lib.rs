//! Module for reconstructing grids from decoded frames
//!
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod error;
mod grid;

// Inline anything important for a nice public API
#[doc(inline)]
pub use grid::{build_grid, Grid};

#[doc(inline)]
pub use error::{Error, Result};
