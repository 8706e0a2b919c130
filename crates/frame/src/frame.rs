//! In-memory representation of a decoded frame

// crate modules
use crate::metadata::Metadata;

// gktools modules
use gktools_utils::{f, ValueExt};

// external crates
use ndarray::ArrayD;
use serde::Serialize;

/// Record kind of a decoded frame
///
/// Versioned headers carry the kind as a `u64` discriminant. Files without the
/// magic sequence fall back to [FileType::Legacy], which shares the field
/// layout but omits the header entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FileType {
    /// Cell-wise field data over the full declared extent (kind 1)
    Field,
    /// Time series of component values in appended blocks (kind 2)
    DynVector,
    /// Field data scattered over one or more index ranges (kind 3)
    MultiRangeField,
    /// Headerless version 0 layout, decoded as a field
    Legacy,
}

/// Byte width of the reals in a frame payload
///
/// Payloads are widened to `f64` on decode either way, this only records what
/// the file declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RealType {
    /// 8-byte floats (flag 0)
    F64,
    /// 4-byte floats (flag 1)
    F32,
}

impl RealType {
    /// Number of bytes per real in the payload
    pub fn byte_width(&self) -> usize {
        match self {
            RealType::F64 => 8,
            RealType::F32 => 4,
        }
    }
}

/// Immutable result of decoding one frame file
///
/// Holds the grid metadata exactly as declared by the file together with the
/// raw coefficient array. For DG data the trailing axis packs
/// `num_nodes * num_equations` scalars per cell; expanding those onto a dense
/// mesh is the job of the grid and interpolation crates.
///
/// The declared `cells` and the actual payload extent may disagree when the
/// simulation stripped ghost cells from the payload but not from the header.
/// Both are kept: `cells` as declared, and the payload extent as the leading
/// axes of `array`.
///
/// ```rust, no_run
/// # use gktools_frame::read_frame;
/// let frame = read_frame("/path/to/field_10.gkyl").unwrap();
/// println!("{frame}");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Format version, 0 for the legacy layout
    pub version: u64,
    /// Record kind decoded from the header
    pub file_type: FileType,
    /// Declared byte width of payload reals
    pub real_type: RealType,
    /// Declared number of cells per dimension (empty for dynamic vectors)
    pub cells: Vec<usize>,
    /// Lower domain bounds per dimension
    pub lower: Vec<f64>,
    /// Upper domain bounds per dimension
    pub upper: Vec<f64>,
    /// Scalars per cell on the trailing axis of `array`
    pub num_components: usize,
    /// Key/value metadata from the versioned header
    pub metadata: Metadata,
    /// Time stamps, populated for dynamic vectors only
    pub time: Vec<f64>,
    /// Raw coefficient array, shape `payload cells × num_components` or
    /// `count × num_components` for dynamic vectors
    pub array: ArrayD<f64>,
}

impl Frame {
    /// Number of spatial dimensions declared by the header
    pub fn num_dims(&self) -> usize {
        self.cells.len()
    }

    /// Per-dimension extent of the payload actually present in the file
    pub fn payload_cells(&self) -> &[usize] {
        &self.array.shape()[..self.num_dims()]
    }

    /// Width of a cell in dimension `d` from the declared bounds
    ///
    /// Ghost trimming shifts both bounds inward by whole cells, so the width
    /// is identical whether computed from declared or trimmed values.
    pub fn cell_width(&self, d: usize) -> f64 {
        (self.upper[d] - self.lower[d]) / self.cells[d] as f64
    }

    /// True when the payload extent differs from the declared extent
    pub fn has_ghost_mismatch(&self) -> bool {
        self.payload_cells() != self.cells.as_slice()
    }
}

impl std::fmt::Display for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut s = f!("Frame {{\n");
        s += &f!("    version: {} ({:?})\n", self.version, self.file_type);
        s += &f!("    reals: {:?}\n", self.real_type);
        if self.file_type == FileType::DynVector {
            s += &f!("    samples: {}\n", self.time.len());
        } else {
            s += &f!("    cells: {:?}\n", self.cells);
            for d in 0..self.num_dims() {
                s += &f!(
                    "    dim {d}: {} -> {}\n",
                    self.lower[d].sci(5, 2),
                    self.upper[d].sci(5, 2)
                );
            }
        }
        s += &f!("    components: {}\n", self.num_components);
        s += &f!("    metadata entries: {}\n", self.metadata.len());
        s += "}";
        write!(f, "{s}")
    }
}
