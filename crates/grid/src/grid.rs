//! Grid reconstruction from frame metadata

// crate modules
use crate::error::{Error, Result};

// gktools modules
use gktools_frame::{FileType, Frame};
use gktools_utils::linspace;

// external crates
use log::warn;
use ndarray::{Array1, ArrayD, Axis, SliceInfoElem};

/// Per-dimension coordinates reconstructed from a frame
///
/// Uniform grids hold one cell-edge array per dimension, length `cells + 1`.
/// Mapped grids hold one full N-dimensional coordinate array per dimension,
/// taken from a computational-to-physical mapping frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Grid {
    /// Evenly spaced cell edges per dimension
    Uniform {
        /// Cell-edge coordinates, `axes[d].len() == cells[d] + 1`
        axes: Vec<Array1<f64>>,
    },
    /// Physical coordinates from a c2p mapping frame
    Mapped {
        /// One coordinate array per dimension over the full extent
        coords: Vec<ArrayD<f64>>,
    },
}

impl Grid {
    /// Number of spatial dimensions
    pub fn num_dims(&self) -> usize {
        match self {
            Grid::Uniform { axes } => axes.len(),
            Grid::Mapped { coords } => coords.len(),
        }
    }

    /// Number of cells per dimension
    pub fn cells(&self) -> Vec<usize> {
        match self {
            Grid::Uniform { axes } => axes.iter().map(|a| a.len() - 1).collect(),
            Grid::Mapped { coords } => coords[0].shape()[..self.num_dims()].to_vec(),
        }
    }

    /// Refine a uniform grid to `sub[d]` points per cell in each dimension
    ///
    /// Mapped coordinates have no analytic refinement and are returned
    /// unchanged on the coarse cells.
    pub fn refine(&self, sub: &[usize]) -> Grid {
        match self {
            Grid::Uniform { axes } => Grid::Uniform {
                axes: axes
                    .iter()
                    .zip(sub)
                    .map(|(axis, &n)| {
                        let cells = axis.len() - 1;
                        Array1::from(linspace(axis[0], axis[cells], cells * n + 1))
                    })
                    .collect(),
            },
            Grid::Mapped { .. } => self.clone(),
        }
    }
}

/// Reconstruct the grid for a decoded frame
///
/// Without a mapping frame the grid is uniform, reproducing evenly spaced cell
/// edges between the declared bounds. A payload smaller than the declared
/// extent means ghost cells were stripped, and each dimension is trimmed
/// independently: `floor(diff/2)` cells off the lower side, `ceil(diff/2)` off
/// the upper, with the bounds shifted inward by whole cell widths. This exact
/// split is kept for bit-compatible coordinate placement.
///
/// With a mapping frame (decoded through the same reader, one coordinate
/// component per spatial dimension packed along the trailing axis), the
/// trailing axis splits into equal chunks to give physical coordinates per
/// dimension.
///
/// ```rust, no_run
/// # use gktools_frame::read_frame;
/// # use gktools_grid::build_grid;
/// let frame = read_frame("/path/to/field_10.gkyl").unwrap();
/// let grid = build_grid(&frame, None).unwrap();
/// assert_eq!(grid.num_dims(), frame.num_dims());
/// ```
pub fn build_grid(frame: &Frame, mapping: Option<&Frame>) -> Result<Grid> {
    if frame.file_type == FileType::DynVector {
        return Err(Error::NoSpatialExtent("DynVector".to_string()));
    }

    match mapping {
        Some(mapping) => build_mapped(frame, mapping),
        None => Ok(build_uniform(frame)),
    }
}

fn build_uniform(frame: &Frame) -> Grid {
    let mut axes = Vec::with_capacity(frame.num_dims());

    for d in 0..frame.num_dims() {
        let declared = frame.cells[d];
        let actual = frame.payload_cells()[d];
        let width = frame.cell_width(d);

        let diff = declared - actual;
        let trim_lower = diff / 2;
        let trim_upper = diff - trim_lower;
        if diff > 0 {
            warn!(
                "dim {d}: trimming {trim_lower} ghost cells from lower, {trim_upper} from upper"
            );
        }

        let lower = frame.lower[d] + trim_lower as f64 * width;
        let upper = frame.upper[d] - trim_upper as f64 * width;
        axes.push(Array1::from(linspace(lower, upper, actual + 1)));
    }

    Grid::Uniform { axes }
}

fn build_mapped(frame: &Frame, mapping: &Frame) -> Result<Grid> {
    let num_dims = frame.num_dims();
    if mapping.num_dims() != num_dims {
        return Err(Error::DimensionMismatch {
            mapping: mapping.num_dims(),
            field: num_dims,
        });
    }
    if mapping.num_components % num_dims != 0 {
        return Err(Error::UnevenMappingComponents {
            num_components: mapping.num_components,
            num_dims,
        });
    }

    // split the trailing axis into one chunk per spatial dimension
    let chunk = mapping.num_components / num_dims;
    let coords = (0..num_dims)
        .map(|d| {
            let mut slices: Vec<SliceInfoElem> = vec![SliceInfoElem::from(..); num_dims];
            slices.push(SliceInfoElem::Slice {
                start: (d * chunk) as isize,
                end: Some(((d + 1) * chunk) as isize),
                step: 1,
            });
            let coord = mapping.array.slice(slices.as_slice()).to_owned();
            if chunk == 1 {
                coord.remove_axis(Axis(num_dims))
            } else {
                coord
            }
        })
        .collect();

    Ok(Grid::Mapped { coords })
}
