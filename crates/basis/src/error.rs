//! Result and Error types for the basis module

use crate::family::Family;

/// Type alias for `Result<T, basis::Error>`
pub type Result<T> = core::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
/// The error type for `gktools-basis`
pub enum Error {
    /// No registry entry for the requested dimension/order/family
    #[error("unsupported basis: {family:?} with {num_dims} dimensions at order {poly_order}")]
    UnsupportedBasis {
        family: Family,
        num_dims: usize,
        poly_order: usize,
    },

    /// Basis family name from frame metadata is not in the closed set
    #[error("unknown basis family name \"{0}\"")]
    UnknownFamilyName(String),
}
