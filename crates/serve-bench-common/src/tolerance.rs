//! Relative-error tolerance checks
//!
//! Observed metrics are compared against baseline expectations by relative
//! error, `|(expected - observed) / expected|`. A zero expectation has no
//! relative scale, so it falls back to the absolute error `|observed|`.

/// Error of `observed` relative to `expected`.
///
/// # Example
/// ```
/// use serve_bench_common::tolerance::relative_error;
///
/// assert!((relative_error(100.0, 109.0) - 0.09).abs() < 1e-12);
/// assert_eq!(relative_error(0.0, 0.25), 0.25);
/// ```
pub fn relative_error(expected: f64, observed: f64) -> f64 {
    if expected == 0.0 {
        observed.abs()
    } else {
        ((expected - observed) / expected).abs()
    }
}

/// Whether `observed` lies within `deviation` of `expected`.
///
/// Non-finite errors (NaN or infinite inputs) never validate.
pub fn within_tolerance(expected: f64, observed: f64, deviation: f64) -> bool {
    let error = relative_error(expected, observed);
    error.is_finite() && error <= deviation
}
