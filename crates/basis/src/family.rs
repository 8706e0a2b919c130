//! The closed set of DG basis families

// crate modules
use crate::error::{Error, Result};

// external crates
use itertools::Itertools;
use serde::Serialize;

/// Basis families supported by the registry
///
/// All families share the same orthonormal construction, products of
/// normalized Legendre polynomials over a family-specific (downward closed)
/// exponent set. They differ only in which polynomial terms are included,
/// trading node count against approximation order.
///
/// The hybrid variants mix linear resolution with one quadratic axis:
/// [Family::GkHybrid] places it on the first velocity axis of a gyrokinetic
/// phase space, [Family::Hybrid] on the last axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Family {
    /// Serendipity space, superlinear degree capped at the order
    Serendipity,
    /// Total degree capped at the order
    MaximalOrder,
    /// Full tensor product, per-axis degree capped at the order
    Tensor,
    /// Order 1 with a quadratic first velocity axis
    GkHybrid,
    /// Order 1 with a quadratic last axis
    Hybrid,
}

/// Registered dimensionality range for every family
const MAX_DIMS: usize = 6;

/// Registered order range for the non-hybrid families
const MAX_ORDER: usize = 3;

impl Family {
    /// Resolve a basis family from its metadata name
    ///
    /// Accepts both the long names written by current simulations and the
    /// short codes of older files. The nodal serendipity code `ns` maps to
    /// [Family::Serendipity], the coefficient layout is tracked separately.
    ///
    /// ```rust
    /// # use gktools_basis::Family;
    /// assert_eq!(Family::from_name("serendipity").unwrap(), Family::Serendipity);
    /// assert_eq!(Family::from_name("mt").unwrap(), Family::Tensor);
    /// assert!(Family::from_name("chebyshev").is_err());
    /// ```
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "serendipity" | "ms" | "ns" => Ok(Family::Serendipity),
            "maximal-order" | "mo" => Ok(Family::MaximalOrder),
            "tensor" | "mt" => Ok(Family::Tensor),
            "gkhybrid" => Ok(Family::GkHybrid),
            "hybrid" | "pkpmhybrid" => Ok(Family::Hybrid),
            _ => Err(Error::UnknownFamilyName(name.to_string())),
        }
    }

    /// Number of basis functions for a registered (dimension, order) pair
    ///
    /// Closed lookup: [Error::UnsupportedBasis] for anything outside the
    /// registered combinations.
    ///
    /// ```rust
    /// # use gktools_basis::Family;
    /// assert_eq!(Family::Tensor.num_nodes(2, 2).unwrap(), 9);
    /// assert_eq!(Family::Serendipity.num_nodes(3, 2).unwrap(), 20);
    /// assert_eq!(Family::MaximalOrder.num_nodes(3, 2).unwrap(), 10);
    /// assert_eq!(Family::Hybrid.num_nodes(3, 1).unwrap(), 12);
    /// ```
    pub fn num_nodes(&self, num_dims: usize, poly_order: usize) -> Result<usize> {
        self.check_support(num_dims, poly_order)?;

        let (d, p) = (num_dims, poly_order);
        Ok(match self {
            Family::Tensor => (p + 1).pow(d as u32),
            Family::MaximalOrder => binomial(p + d, d),
            Family::Serendipity => match p {
                0 => 1,
                _ => (0..=(d.min(p / 2)))
                    .map(|i| (1 << (d - i)) * binomial(d, i) * binomial(p - i, i))
                    .sum(),
            },
            // linear tensor with one quadratic axis
            Family::GkHybrid | Family::Hybrid => 3 * (1 << (d - 1)),
        })
    }

    /// Axis carrying the extra quadratic resolution, hybrid families only
    pub fn quad_axis(&self, num_dims: usize) -> Option<usize> {
        match self {
            Family::GkHybrid => Some(match num_dims {
                1 => 0,
                2 | 3 => 1,
                4 => 2,
                _ => 3,
            }),
            Family::Hybrid => Some(num_dims - 1),
            _ => None,
        }
    }

    /// Per-axis degree caps for the family's exponent set
    fn degree_caps(&self, num_dims: usize, poly_order: usize) -> Vec<usize> {
        match self.quad_axis(num_dims) {
            Some(axis) => (0..num_dims).map(|d| if d == axis { 2 } else { 1 }).collect(),
            None => vec![poly_order; num_dims],
        }
    }

    /// Multi-indices of the family's monomials in graded lexicographic order
    ///
    /// Every set is downward closed, which is what makes the product-Legendre
    /// construction an orthonormal basis of the spanned space. The ordering
    /// here fixes the meaning of the modal coefficient layout.
    pub fn exponents(&self, num_dims: usize, poly_order: usize) -> Result<Vec<Vec<usize>>> {
        self.check_support(num_dims, poly_order)?;

        let caps = self.degree_caps(num_dims, poly_order);
        let mut set: Vec<Vec<usize>> = caps
            .iter()
            .map(|&cap| 0..=cap)
            .multi_cartesian_product()
            .filter(|alpha| match self {
                Family::MaximalOrder => alpha.iter().sum::<usize>() <= poly_order,
                Family::Serendipity => superlinear_degree(alpha) <= poly_order,
                Family::Tensor | Family::GkHybrid | Family::Hybrid => true,
            })
            .collect();
        set.sort_by_key(|alpha| (alpha.iter().sum::<usize>(), alpha.clone()));
        Ok(set)
    }

    fn check_support(&self, num_dims: usize, poly_order: usize) -> Result<()> {
        let supported = match self {
            Family::Serendipity | Family::MaximalOrder | Family::Tensor => {
                (1..=MAX_DIMS).contains(&num_dims) && poly_order <= MAX_ORDER
            }
            // gk phase spaces go up to 3x2v
            Family::GkHybrid => (1..=5).contains(&num_dims) && poly_order == 1,
            Family::Hybrid => (1..=MAX_DIMS).contains(&num_dims) && poly_order == 1,
        };

        if supported {
            Ok(())
        } else {
            Err(Error::UnsupportedBasis {
                family: *self,
                num_dims,
                poly_order,
            })
        }
    }
}

/// Sum of the exponents that are individually superlinear
fn superlinear_degree(alpha: &[usize]) -> usize {
    alpha.iter().filter(|&&a| a >= 2).sum()
}

fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    (0..k).fold(1, |acc, i| acc * (n - i) / (i + 1))
}
