//! Result and Error types for the frame module

/// Type alias for `Result<T, frame::Error>`
pub type Result<T> = core::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
/// The error type for `gktools-frame`
pub enum Error {
    /// Underlying file I/O error
    #[error("failure in file I/O")]
    IOError(#[from] std::io::Error),

    /// Unrecognised combination of header version and file type
    #[error("unrecognised format (version {version}, file type {file_type})")]
    UnknownFormat { version: u64, file_type: u64 },

    /// Unrecognised real type flag, expected 0 (f64) or 1 (f32)
    #[error("unrecognised real type flag {0}")]
    UnknownRealType(u64),

    /// Fewer bytes remain than the header declares
    #[error("truncated input (expected {expected} bytes, {remaining} remain)")]
    Truncated { expected: usize, remaining: usize },

    /// Payload cell count can not be reconciled with the declared extent
    #[error("payload of {found} cells inconsistent with declared extent {cells:?}")]
    UnexpectedPayloadShape { cells: Vec<usize>, found: usize },

    /// Element size is not a whole number of reals
    #[error("element size {elem_size} is not a multiple of the {width} byte real width")]
    UnexpectedElementSize { elem_size: usize, width: usize },

    /// Appended dynamic vector blocks disagree on component count
    #[error("inconsistent components between appended blocks (expected {expected}, found {found})")]
    InconsistentBlock { expected: usize, found: usize },

    /// Range indices fall outside the declared extent
    #[error("range {lo:?} -> {up:?} outside declared extent {cells:?}")]
    RangeOutOfBounds {
        lo: Vec<usize>,
        up: Vec<usize>,
        cells: Vec<usize>,
    },

    /// Malformed key/value metadata blob
    #[error("malformed metadata blob: {0}")]
    Metadata(String),

    /// Failure to reshape a payload into the declared dimensions
    #[error("failed to shape payload array")]
    Shape(#[from] ndarray::ShapeError),
}
