//! Legendre polynomial evaluation on the reference interval [-1, 1]
//!
//! The modal basis functions of every registered family are products of
//! normalized Legendre polynomials, so value and derivative evaluation both
//! reduce to the 1D recurrences here.

/// Legendre polynomial `P_n(x)` by the Bonnet recurrence
pub(crate) fn legendre(n: usize, x: f64) -> f64 {
    match n {
        0 => 1.0,
        1 => x,
        _ => {
            let mut previous = 1.0;
            let mut current = x;
            for k in 1..n {
                let next =
                    ((2 * k + 1) as f64 * x * current - k as f64 * previous) / (k + 1) as f64;
                previous = current;
                current = next;
            }
            current
        }
    }
}

/// Derivative `P'_n(x)` by the recurrence `P'_{n+1} = (2n+1) P_n + P'_{n-1}`
///
/// Stable at the interval endpoints, unlike forms dividing by `x^2 - 1`.
pub(crate) fn legendre_deriv(n: usize, x: f64) -> f64 {
    match n {
        0 => 0.0,
        1 => 1.0,
        _ => {
            let mut previous = 0.0;
            let mut current = 1.0;
            for k in 1..n {
                let next = (2 * k + 1) as f64 * legendre(k, x) + previous;
                previous = current;
                current = next;
            }
            current
        }
    }
}

/// Normalization giving unit L2 norm on [-1, 1], `sqrt((2n+1)/2)`
pub(crate) fn norm(n: usize) -> f64 {
    ((2 * n + 1) as f64 / 2.0).sqrt()
}
