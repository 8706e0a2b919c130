//! Module for DG basis families and transform matrix generation
//!
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod error;
mod family;
mod poly;
mod registry;

// Inline anything important for a nice public API
#[doc(inline)]
pub use family::Family;

#[doc(inline)]
pub use registry::{BasisDescriptor, BasisRegistry, Layout};

#[doc(inline)]
pub use error::{Error, Result};
