//! Result and Error types for the grid module

/// Type alias for `Result<T, grid::Error>`
pub type Result<T> = core::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
/// The error type for `gktools-grid`
pub enum Error {
    /// Mapping frame disagrees with the field frame on dimensionality
    #[error("mapping frame has {mapping} dimensions, field frame has {field}")]
    DimensionMismatch { mapping: usize, field: usize },

    /// Mapping frame components do not split evenly across dimensions
    #[error("mapping frame with {num_components} components can not split over {num_dims} dimensions")]
    UnevenMappingComponents {
        num_components: usize,
        num_dims: usize,
    },

    /// Grid requested for a frame kind with no spatial extent
    #[error("frame kind {0} carries no spatial grid")]
    NoSpatialExtent(String),
}
