use crate::f;

/// Extends floats with more specific formatting options
pub trait ValueExt {
    /// Scientific notation with fixed precision and a zero-padded exponent
    ///
    /// The default `LowerExp` output varies the exponent width, which makes
    /// columns of grid bounds ragged. This pins the mantissa precision and
    /// pads the exponent to `exp_pad` digits.
    ///
    /// ```rust
    /// # use gktools_utils::ValueExt;
    /// assert_eq!((-1.0).sci(5, 2), "-1.00000e+00");
    /// assert_eq!(1234.5.sci(3, 2), "1.234e+03");
    /// assert_eq!(0.0625.sci(2, 3), "6.25e-002");
    /// ```
    fn sci(&self, precision: usize, exp_pad: usize) -> String;
}

impl ValueExt for f64 {
    fn sci(&self, precision: usize, exp_pad: usize) -> String {
        let formatted = f!("{self:.precision$e}");
        match formatted.split_once('e') {
            Some((mantissa, exp)) => {
                let (sign, digits) = match exp.strip_prefix('-') {
                    Some(digits) => ("-", digits),
                    None => ("+", exp),
                };
                f!("{mantissa}e{sign}{digits:0>exp_pad$}")
            }
            // non-finite values have no exponent to pad
            None => formatted,
        }
    }
}
