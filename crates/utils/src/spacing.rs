/// Evenly spaced values over an inclusive interval
///
/// Returns `n` values from `start` to `stop` inclusive of both endpoints. The
/// last value is pinned to `stop` exactly rather than accumulated, so cell
/// edge arrays close on the declared bound bit-for-bit.
///
/// ```rust
/// # use gktools_utils::linspace;
/// assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
/// assert_eq!(linspace(2.0, 2.0, 1), vec![2.0]);
/// ```
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            let mut values: Vec<f64> = (0..n - 1).map(|i| start + step * i as f64).collect();
            values.push(stop);
            values
        }
    }
}
