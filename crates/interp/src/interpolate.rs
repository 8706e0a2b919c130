//! Batched expansion of DG coefficients onto dense arrays

// crate modules
use crate::error::{Error, Result};

// gktools modules
use gktools_basis::{BasisDescriptor, BasisRegistry, Layout};
use gktools_frame::{FileType, Frame};
use gktools_grid::Grid;

// external crates
use log::debug;
use ndarray::{s, Array2, ArrayD, ArrayViewD, Axis, SliceInfoElem};

/// Which equations of a multi-equation frame to expand
///
/// DG frames pack `num_nodes * num_equations` scalars per cell. The selector
/// picks equations by index, with [ComponentSelector::All] expanding every
/// one in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentSelector {
    /// Every equation in the frame
    All,
    /// A single equation by index
    Single(usize),
    /// An explicit list of equation indices
    Multiple(Vec<usize>),
}

impl ComponentSelector {
    fn resolve(&self, num_equations: usize) -> Result<Vec<usize>> {
        let selected = match self {
            ComponentSelector::All => (0..num_equations).collect(),
            ComponentSelector::Single(c) => vec![*c],
            ComponentSelector::Multiple(list) => list.clone(),
        };
        if selected.is_empty() {
            return Err(Error::EmptySelection);
        }
        for &component in &selected {
            if component >= num_equations {
                return Err(Error::ComponentOutOfRange {
                    component,
                    num_equations,
                });
            }
        }
        Ok(selected)
    }
}

/// Expands frames onto dense meshes through a shared basis registry
///
/// Holds a reference to the [BasisRegistry] whose matrix cache backs every
/// expansion. All operations are pure, neither the frame nor the grid is
/// mutated.
///
/// ```rust, no_run
/// # use gktools_basis::{BasisDescriptor, BasisRegistry, Family, Layout};
/// # use gktools_frame::read_frame;
/// # use gktools_grid::build_grid;
/// # use gktools_interp::{ComponentSelector, Interpolator};
/// let registry = BasisRegistry::new();
/// let interpolator = Interpolator::new(&registry);
///
/// let frame = read_frame("/path/to/field_10.gkyl").unwrap();
/// let grid = build_grid(&frame, None).unwrap();
/// let desc = BasisDescriptor::new(frame.num_dims(), 2, Family::Serendipity, Layout::Modal).unwrap();
///
/// let (fine, values) = interpolator
///     .interpolate(&frame, &grid, &desc, &ComponentSelector::Single(0), 3)
///     .unwrap();
/// ```
#[derive(Debug)]
pub struct Interpolator<'a> {
    registry: &'a BasisRegistry,
}

impl<'a> Interpolator<'a> {
    /// Bind an interpolator to a registry's matrix cache
    pub fn new(registry: &'a BasisRegistry) -> Self {
        Self { registry }
    }

    /// Expand coefficients onto a dense array over a refined grid
    ///
    /// Each selected equation's coefficient block is contracted against the
    /// cached interpolation matrix in one batched operation across all cells,
    /// and scattered into the dense output with `target_points` values per
    /// cell per dimension (one more along a hybrid family's quadratic axis).
    /// Multiple selected equations stack along a new trailing axis.
    pub fn interpolate(
        &self,
        frame: &Frame,
        grid: &Grid,
        descriptor: &BasisDescriptor,
        selection: &ComponentSelector,
        target_points: usize,
    ) -> Result<(Grid, ArrayD<f64>)> {
        let plan = Plan::new(frame, descriptor, selection)?;
        let matrix = self.registry.interpolation_matrix(descriptor, target_points);

        let dense = plan.expand(frame, descriptor, target_points, &matrix, 1.0)?;
        Ok((grid.refine(&descriptor.eval_points(target_points)), dense))
    }

    /// Expand derivative values onto a dense array over a refined grid
    ///
    /// Identical contraction with the derivative matrix for `direction`,
    /// rescaled by `2 / cell width` to map from the reference cell [-1, 1]
    /// back to physical units. With `direction = None` every direction is
    /// expanded and stacked along a new trailing axis (after the component
    /// axis, when one is present).
    pub fn differentiate(
        &self,
        frame: &Frame,
        grid: &Grid,
        descriptor: &BasisDescriptor,
        direction: Option<usize>,
        selection: &ComponentSelector,
        target_points: usize,
    ) -> Result<(Grid, ArrayD<f64>)> {
        let plan = Plan::new(frame, descriptor, selection)?;
        let matrices = self.registry.derivative_matrices(descriptor, target_points);
        let fine = grid.refine(&descriptor.eval_points(target_points));

        let expand_direction = |d: usize| -> Result<ArrayD<f64>> {
            let scale = 2.0 / frame.cell_width(d);
            plan.expand(frame, descriptor, target_points, &matrices[d], scale)
        };

        match direction {
            Some(d) => {
                if d >= frame.num_dims() {
                    return Err(Error::DirectionOutOfRange {
                        direction: d,
                        num_dims: frame.num_dims(),
                    });
                }
                Ok((fine, expand_direction(d)?))
            }
            None => {
                let per_direction = (0..frame.num_dims())
                    .map(expand_direction)
                    .collect::<Result<Vec<_>>>()?;
                let views: Vec<ArrayViewD<f64>> =
                    per_direction.iter().map(|a| a.view()).collect();
                let stack_axis = per_direction[0].ndim();
                Ok((fine, ndarray::stack(Axis(stack_axis), &views)?))
            }
        }
    }
}

/// Validated expansion parameters shared by value and derivative paths
struct Plan {
    cells: Vec<usize>,
    num_equations: usize,
    components: Vec<usize>,
}

impl Plan {
    fn new(
        frame: &Frame,
        descriptor: &BasisDescriptor,
        selection: &ComponentSelector,
    ) -> Result<Self> {
        if frame.file_type == FileType::DynVector || frame.num_dims() == 0 {
            return Err(Error::NoSpatialData);
        }
        if descriptor.num_dims() != frame.num_dims() {
            return Err(Error::DimensionMismatch {
                descriptor: descriptor.num_dims(),
                frame: frame.num_dims(),
            });
        }

        let num_nodes = descriptor.num_nodes();
        if frame.num_components % num_nodes != 0 {
            return Err(Error::BasisMismatch {
                num_components: frame.num_components,
                num_nodes,
            });
        }
        let num_equations = frame.num_components / num_nodes;
        let components = selection.resolve(num_equations)?;

        Ok(Self {
            cells: frame.payload_cells().to_vec(),
            num_equations,
            components,
        })
    }

    /// Contract every selected equation against `matrix` and scatter into a
    /// dense array, stacking equations along a trailing axis when several are
    /// selected
    fn expand(
        &self,
        frame: &Frame,
        descriptor: &BasisDescriptor,
        target_points: usize,
        matrix: &Array2<f64>,
        scale: f64,
    ) -> Result<ArrayD<f64>> {
        let num_cells: usize = self.cells.iter().product();
        let num_nodes = descriptor.num_nodes();
        let flat = frame
            .array
            .view()
            .into_shape_with_order((num_cells, frame.num_components))?;

        let points = descriptor.eval_points(target_points);
        debug!(
            "expanding {} equation(s) over {num_cells} cells at {points:?} points per cell",
            self.components.len()
        );

        let mut per_component = Vec::with_capacity(self.components.len());
        for &component in &self.components {
            // coefficient block for this equation, (cells, nodes)
            let block = match descriptor.layout() {
                Layout::Modal => flat
                    .slice(s![.., component * num_nodes..(component + 1) * num_nodes])
                    .to_owned(),
                Layout::Nodal => flat
                    .slice(s![.., component..; self.num_equations as isize])
                    .to_owned(),
            };

            // one batched contraction across all cells, (cells, eval points)
            let mut contracted = block.dot(&matrix.t());
            if scale != 1.0 {
                contracted *= scale;
            }

            per_component.push(self.scatter(&contracted, &points)?);
        }

        if per_component.len() == 1 {
            // selection is never empty, checked at plan construction
            Ok(per_component.remove(0))
        } else {
            let views: Vec<ArrayViewD<f64>> = per_component.iter().map(|a| a.view()).collect();
            let stack_axis = per_component[0].ndim();
            Ok(ndarray::stack(Axis(stack_axis), &views)?)
        }
    }

    /// Scatter contracted values into the dense output
    ///
    /// The flat evaluation index decomposes row-major into per-dimension
    /// sub-offsets. Each evaluation point's column, reshaped to the cell
    /// extent, lands in the output slice starting at its sub-offset with a
    /// stride of the per-axis point count.
    fn scatter(&self, contracted: &Array2<f64>, points: &[usize]) -> Result<ArrayD<f64>> {
        let fine: Vec<usize> = self
            .cells
            .iter()
            .zip(points)
            .map(|(&c, &n)| c * n)
            .collect();
        let mut dense = ArrayD::<f64>::zeros(fine);

        for e in 0..contracted.ncols() {
            let offsets = decompose(e, points);
            let values = contracted
                .column(e)
                .to_owned()
                .into_shape_with_order(self.cells.clone())?;

            let slices: Vec<SliceInfoElem> = offsets
                .iter()
                .zip(points)
                .map(|(&offset, &n)| SliceInfoElem::Slice {
                    start: offset as isize,
                    end: None,
                    step: n as isize,
                })
                .collect();
            dense.slice_mut(slices.as_slice()).assign(&values);
        }

        Ok(dense)
    }
}

/// Row-major decomposition of a flat evaluation index into per-axis offsets
fn decompose(mut index: usize, points: &[usize]) -> Vec<usize> {
    let mut offsets = vec![0; points.len()];
    for (offset, &n) in offsets.iter_mut().zip(points).rev() {
        *offset = index % n;
        index /= n;
    }
    offsets
}
