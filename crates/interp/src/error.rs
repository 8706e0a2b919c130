//! Result and Error types for the interp module

/// Type alias for `Result<T, interp::Error>`
pub type Result<T> = core::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
/// The error type for `gktools-interp`
pub enum Error {
    /// Frame component count inconsistent with the descriptor's node count
    #[error("{num_components} components per cell do not divide over {num_nodes} basis nodes")]
    BasisMismatch {
        num_components: usize,
        num_nodes: usize,
    },

    /// Selected equation index beyond the frame's equation count
    #[error("component {component} out of range, frame holds {num_equations} equations")]
    ComponentOutOfRange {
        component: usize,
        num_equations: usize,
    },

    /// Explicit component selection with no entries
    #[error("component selection is empty")]
    EmptySelection,

    /// Requested derivative direction beyond the frame dimensionality
    #[error("direction {direction} out of range for {num_dims} dimensions")]
    DirectionOutOfRange { direction: usize, num_dims: usize },

    /// Descriptor dimensionality disagrees with the frame
    #[error("descriptor covers {descriptor} dimensions, frame has {frame}")]
    DimensionMismatch { descriptor: usize, frame: usize },

    /// Frame kind carries no spatial DG data to expand
    #[error("frame carries no spatial DG data")]
    NoSpatialData,

    /// Frame metadata lacks an entry needed to infer the basis
    #[error("frame metadata missing entry \"{0}\"")]
    MissingMetadata(String),

    /// Basis registry rejected the requested combination
    #[error("basis lookup failed")]
    Basis(#[from] gktools_basis::Error),

    /// Failure to reshape a coefficient block
    #[error("failed to shape coefficient array")]
    Shape(#[from] ndarray::ShapeError),
}
