//! Module for decoding gkyl0 binary frame files
//!
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod error;
mod frame;
mod metadata;
mod reader;

pub mod cursor;

// Inline anything important for a nice public API
#[doc(inline)]
pub use frame::{FileType, Frame, RealType};

#[doc(inline)]
pub use metadata::{MetaValue, Metadata, KEY_BASIS_TYPE, KEY_POLY_ORDER};

#[doc(inline)]
pub use reader::{decode_frame, read_frame, MAGIC};

#[doc(inline)]
pub use error::{Error, Result};
