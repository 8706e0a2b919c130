//! Descriptor validation and the transform matrix cache

// standard library
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

// crate modules
use crate::error::Result;
use crate::family::Family;
use crate::poly::{legendre, legendre_deriv, norm};

// external crates
use itertools::Itertools;
use ndarray::Array2;
use serde::Serialize;

/// Coefficient layout of DG data on the trailing frame axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Layout {
    /// Contiguous modal coefficients per equation
    Modal,
    /// Node-interleaved values per equation
    Nodal,
}

/// A validated (dimension, order, family, layout) combination
///
/// Construction performs the closed-table lookup, so an instance always
/// refers to a registered basis and `num_nodes` is infallible afterwards.
///
/// ```rust
/// # use gktools_basis::{BasisDescriptor, Family, Layout};
/// let desc = BasisDescriptor::new(2, 2, Family::Serendipity, Layout::Modal).unwrap();
/// assert_eq!(desc.num_nodes(), 8);
///
/// // unregistered combinations fail at construction, not at use
/// assert!(BasisDescriptor::new(2, 9, Family::Serendipity, Layout::Modal).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct BasisDescriptor {
    num_dims: usize,
    poly_order: usize,
    family: Family,
    layout: Layout,
    num_nodes: usize,
}

impl BasisDescriptor {
    /// Validate and build a descriptor
    pub fn new(
        num_dims: usize,
        poly_order: usize,
        family: Family,
        layout: Layout,
    ) -> Result<Self> {
        let num_nodes = family.num_nodes(num_dims, poly_order)?;
        Ok(Self {
            num_dims,
            poly_order,
            family,
            layout,
            num_nodes,
        })
    }

    /// Number of spatial dimensions
    pub fn num_dims(&self) -> usize {
        self.num_dims
    }

    /// Polynomial order of the basis
    pub fn poly_order(&self) -> usize {
        self.poly_order
    }

    /// Basis family
    pub fn family(&self) -> Family {
        self.family
    }

    /// Coefficient layout
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Basis functions per cell
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// Evaluation points per axis for a target sub-cell resolution
    ///
    /// Hybrid families take one extra point along their quadratic axis, every
    /// other axis gets exactly `target_points`.
    pub fn eval_points(&self, target_points: usize) -> Vec<usize> {
        let quad_axis = self.family.quad_axis(self.num_dims);
        (0..self.num_dims)
            .map(|d| {
                if Some(d) == quad_axis {
                    target_points + 1
                } else {
                    target_points
                }
            })
            .collect()
    }
}

/// Cache key: everything the generated matrix depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct MatrixKey {
    num_dims: usize,
    poly_order: usize,
    family: Family,
    target_points: usize,
    derivative: bool,
}

#[derive(Debug, Clone)]
enum CacheEntry {
    Value(Arc<Array2<f64>>),
    Derivative(Arc<Vec<Array2<f64>>>),
}

/// Lazy cache of basis transform matrices
///
/// Generation is pure and deterministic, so identical keys always produce
/// bit-identical matrices and memoization is safe. Population follows a
/// compute-once-or-discard contract: matrices are generated outside the lock
/// and a concurrent duplicate is simply dropped in favour of the first entry.
///
/// ```rust
/// # use gktools_basis::{BasisDescriptor, BasisRegistry, Family, Layout};
/// let registry = BasisRegistry::new();
/// let desc = BasisDescriptor::new(1, 2, Family::Serendipity, Layout::Modal).unwrap();
///
/// let matrix = registry.interpolation_matrix(&desc, 3);
/// assert_eq!(matrix.nrows(), 3); // eval points
/// assert_eq!(matrix.ncols(), desc.num_nodes());
/// ```
#[derive(Debug, Default)]
pub struct BasisRegistry {
    cache: Mutex<HashMap<MatrixKey, CacheEntry>>,
}

impl BasisRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Matrix mapping modal coefficients to values at the sub-cell points
    ///
    /// Shape `(eval points, num_nodes)` where the row count is the product of
    /// the per-axis point counts from [BasisDescriptor::eval_points].
    pub fn interpolation_matrix(
        &self,
        descriptor: &BasisDescriptor,
        target_points: usize,
    ) -> Arc<Array2<f64>> {
        let key = MatrixKey {
            num_dims: descriptor.num_dims(),
            poly_order: descriptor.poly_order(),
            family: descriptor.family(),
            target_points,
            derivative: false,
        };

        if let Some(CacheEntry::Value(matrix)) = self.lookup(&key) {
            return matrix;
        }

        let matrix = Arc::new(generate(descriptor, target_points, None));
        let entry = self.insert_or_discard(key, CacheEntry::Value(matrix));
        match entry {
            CacheEntry::Value(matrix) => matrix,
            // key encodes derivative = false
            CacheEntry::Derivative(_) => unreachable!(),
        }
    }

    /// Matrices mapping modal coefficients to reference-cell partial
    /// derivatives at the sub-cell points, one per dimension
    ///
    /// Derivatives are with respect to the reference coordinates on [-1, 1],
    /// callers rescale by `2 / cell width` per physical direction.
    pub fn derivative_matrices(
        &self,
        descriptor: &BasisDescriptor,
        target_points: usize,
    ) -> Arc<Vec<Array2<f64>>> {
        let key = MatrixKey {
            num_dims: descriptor.num_dims(),
            poly_order: descriptor.poly_order(),
            family: descriptor.family(),
            target_points,
            derivative: true,
        };

        if let Some(CacheEntry::Derivative(matrices)) = self.lookup(&key) {
            return matrices;
        }

        let matrices = Arc::new(
            (0..descriptor.num_dims())
                .map(|direction| generate(descriptor, target_points, Some(direction)))
                .collect::<Vec<_>>(),
        );
        let entry = self.insert_or_discard(key, CacheEntry::Derivative(matrices));
        match entry {
            CacheEntry::Derivative(matrices) => matrices,
            CacheEntry::Value(_) => unreachable!(),
        }
    }

    /// Drop every cached matrix
    ///
    /// Primarily for testing, the cache is never invalidated otherwise.
    pub fn reset(&self) {
        self.cache.lock().expect("cache lock poisoned").clear();
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.cache.lock().expect("cache lock poisoned").len()
    }

    /// True while nothing has been generated yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup(&self, key: &MatrixKey) -> Option<CacheEntry> {
        self.cache
            .lock()
            .expect("cache lock poisoned")
            .get(key)
            .cloned()
    }

    /// Keep whichever entry reached the cache first
    fn insert_or_discard(&self, key: MatrixKey, entry: CacheEntry) -> CacheEntry {
        self.cache
            .lock()
            .expect("cache lock poisoned")
            .entry(key)
            .or_insert(entry)
            .clone()
    }
}

/// Generate one transform matrix by direct basis evaluation
///
/// Rows follow the flat evaluation point index, row-major over the per-axis
/// point sets. Columns follow the family's graded lexicographic exponent
/// order. `derivative` selects the axis differentiated, `None` for values.
fn generate(
    descriptor: &BasisDescriptor,
    target_points: usize,
    derivative: Option<usize>,
) -> Array2<f64> {
    // registered combinations were validated at descriptor construction
    let exponents = descriptor
        .family()
        .exponents(descriptor.num_dims(), descriptor.poly_order())
        .expect("descriptor refers to a registered basis");

    let points: Vec<Vec<f64>> = descriptor
        .eval_points(target_points)
        .into_iter()
        .map(axis_points)
        .collect();

    let rows: Vec<Vec<f64>> = points
        .iter()
        .map(|axis| axis.iter().copied())
        .multi_cartesian_product()
        .collect();

    let mut matrix = Array2::zeros((rows.len(), exponents.len()));
    for (r, point) in rows.iter().enumerate() {
        for (c, alpha) in exponents.iter().enumerate() {
            matrix[[r, c]] = alpha
                .iter()
                .zip(point)
                .enumerate()
                .map(|(axis, (&n, &x))| match derivative {
                    Some(direction) if direction == axis => norm(n) * legendre_deriv(n, x),
                    _ => norm(n) * legendre(n, x),
                })
                .product();
        }
    }
    matrix
}

/// `n` evenly spaced sub-cell centers on the reference interval [-1, 1]
fn axis_points(n: usize) -> Vec<f64> {
    (0..n)
        .map(|j| -1.0 + (2 * j + 1) as f64 / n as f64)
        .collect()
}
