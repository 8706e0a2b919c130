//! Common utility for extended `std` types and shared numerical helpers
//!
//! These are left public for convenience.
//!
//! For example, consistent scientific formatting and evenly spaced coordinate
//! arrays are useful everywhere.

// Alias for the format! macro
pub use std::format as f;

// Modules
mod spacing;
mod value_ext;

// Flatten
pub use spacing::linspace;
pub use value_ext::ValueExt;
