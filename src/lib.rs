//! `gktools` is a semi-modular toolkit of fast and reliable libraries for
//! plasma simulation post-processing
//!
#![doc = include_str!("../readme.md")]
#![deny(missing_docs, missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

// Re-exports of toolkit crates.
#[doc(inline)]
pub use gktools_utils as utils;

#[cfg(feature = "basis")]
#[cfg_attr(docsrs, doc(cfg(feature = "basis")))]
#[doc(inline)]
pub use gktools_basis as basis;

#[cfg(feature = "frame")]
#[cfg_attr(docsrs, doc(cfg(feature = "frame")))]
#[doc(inline)]
pub use gktools_frame as frame;

#[cfg(feature = "grid")]
#[cfg_attr(docsrs, doc(cfg(feature = "grid")))]
#[doc(inline)]
pub use gktools_grid as grid;

#[cfg(feature = "interp")]
#[cfg_attr(docsrs, doc(cfg(feature = "interp")))]
#[doc(inline)]
pub use gktools_interp as interp;
