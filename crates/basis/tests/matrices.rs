//! Integration tests for transform matrix generation and caching

use gktools_basis::{BasisDescriptor, BasisRegistry, Family, Layout};
use rstest::rstest;

fn all_registered() -> Vec<BasisDescriptor> {
    let mut descriptors = Vec::new();
    for family in [Family::Serendipity, Family::MaximalOrder, Family::Tensor] {
        for dims in 1..=4 {
            for order in 0..=3 {
                descriptors
                    .push(BasisDescriptor::new(dims, order, family, Layout::Modal).unwrap());
            }
        }
    }
    for dims in 1..=5 {
        descriptors.push(BasisDescriptor::new(dims, 1, Family::GkHybrid, Layout::Modal).unwrap());
        descriptors.push(BasisDescriptor::new(dims, 1, Family::Hybrid, Layout::Modal).unwrap());
    }
    descriptors
}

#[test]
fn columns_match_node_counts() {
    let registry = BasisRegistry::new();
    for desc in all_registered() {
        let matrix = registry.interpolation_matrix(&desc, 2);
        assert_eq!(matrix.ncols(), desc.num_nodes(), "{desc:?}");

        let expected_rows: usize = desc.eval_points(2).iter().product();
        assert_eq!(matrix.nrows(), expected_rows, "{desc:?}");
    }
}

#[test]
fn generation_is_idempotent() {
    let registry = BasisRegistry::new();
    let desc = BasisDescriptor::new(3, 2, Family::Serendipity, Layout::Modal).unwrap();

    let first = registry.interpolation_matrix(&desc, 3);
    registry.reset();
    assert!(registry.is_empty());
    let second = registry.interpolation_matrix(&desc, 3);

    // bit-identical, not merely close
    assert_eq!(first.as_ref(), second.as_ref());
}

#[test]
fn cache_returns_the_same_allocation() {
    let registry = BasisRegistry::new();
    let desc = BasisDescriptor::new(2, 1, Family::Tensor, Layout::Modal).unwrap();

    let first = registry.interpolation_matrix(&desc, 2);
    let second = registry.interpolation_matrix(&desc, 2);
    assert!(std::sync::Arc::ptr_eq(&first, &second));
    assert_eq!(registry.len(), 1);
}

#[test]
fn value_and_derivative_entries_are_distinct() {
    let registry = BasisRegistry::new();
    let desc = BasisDescriptor::new(2, 2, Family::Tensor, Layout::Modal).unwrap();

    registry.interpolation_matrix(&desc, 2);
    registry.derivative_matrices(&desc, 2);
    assert_eq!(registry.len(), 2);
}

#[rstest]
#[case(Family::Hybrid, 3, vec![2, 2, 3])] // quadratic last axis
#[case(Family::GkHybrid, 3, vec![2, 3, 2])] // quadratic first velocity axis
#[case(Family::GkHybrid, 1, vec![3])]
fn hybrid_axes_take_an_extra_point(
    #[case] family: Family,
    #[case] dims: usize,
    #[case] expected: Vec<usize>,
) {
    let desc = BasisDescriptor::new(dims, 1, family, Layout::Modal).unwrap();
    assert_eq!(desc.eval_points(2), expected);

    let registry = BasisRegistry::new();
    let matrix = registry.interpolation_matrix(&desc, 2);
    assert_eq!(matrix.nrows(), expected.iter().product::<usize>());
}

#[test]
fn derivative_matrices_cover_every_direction() {
    let registry = BasisRegistry::new();
    let desc = BasisDescriptor::new(3, 1, Family::Serendipity, Layout::Modal).unwrap();

    let matrices = registry.derivative_matrices(&desc, 2);
    assert_eq!(matrices.len(), 3);
    for matrix in matrices.iter() {
        assert_eq!(matrix.ncols(), desc.num_nodes());
        assert_eq!(matrix.nrows(), 8);
    }
}

#[test]
fn linear_mode_derivative_is_constant() {
    // d/dx of the normalized linear mode sqrt(3/2) x is sqrt(3/2) everywhere
    let registry = BasisRegistry::new();
    let desc = BasisDescriptor::new(1, 1, Family::Serendipity, Layout::Modal).unwrap();

    let matrices = registry.derivative_matrices(&desc, 4);
    let expected = (1.5f64).sqrt();
    for r in 0..4 {
        assert!((matrices[0][[r, 1]] - expected).abs() < 1e-14);
        assert!(matrices[0][[r, 0]].abs() < 1e-14); // constant mode
    }
}
