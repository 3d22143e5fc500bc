//! # Numeric partial derivatives
//!
//! Central-difference derivatives of vector-valued functions, and a checker
//! comparing a hand-written Jacobian against them.
//!
//! Functions take a flat slice of arguments and return a `Vec<f64>` of
//! values. Jacobians are [`DMatrix`] with one row per output and one column
//! per argument.
//!
//! ```rust
//! use nalgebra::DMatrix;
//! use pulsar_utils::derivatives::{check_all_partials, PartialsParams};
//!
//! let f = |a: &[f64]| {
//!     let (x, y) = (a[0], a[1]);
//!     let values = vec![x * y, x + y * y];
//!     let jac = DMatrix::from_row_slice(2, 2, &[y, x, 1.0, 2.0 * y]);
//!     (values, jac)
//! };
//! check_all_partials(f, &[1.5, -2.0], &PartialsParams::default()).unwrap();
//! ```
use std::cmp::Ordering::{Equal, Greater};
use std::fmt;

use nalgebra::{DMatrix, DVector};
use tracing::error;

use crate::constants::{DEFAULT_PARTIAL_ATOL, DEFAULT_PARTIAL_DELTA, DEFAULT_PARTIAL_RTOL};
use crate::pulsar_errors::PulsarError;

/// Step and tolerances used by [`check_all_partials`].
///
/// An analytic entry `a` matches its numeric estimate `n` when
/// `|a - n| <= atol + rtol * |n|`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartialsParams {
    /// Full width of the central-difference step.
    pub delta: f64,
    /// Absolute tolerance.
    pub atol: f64,
    /// Relative tolerance, scaled by the numeric estimate.
    pub rtol: f64,
}

impl PartialsParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a [`PartialsParamsBuilder`] starting from the default values.
    ///
    /// ```rust
    /// use pulsar_utils::derivatives::PartialsParams;
    ///
    /// let params = PartialsParams::builder().delta(1e-4).rtol(1e-6).build().unwrap();
    /// assert_eq!(params.atol, 1e-4);
    /// ```
    pub fn builder() -> PartialsParamsBuilder {
        PartialsParamsBuilder::new()
    }
}

impl Default for PartialsParams {
    fn default() -> Self {
        PartialsParams {
            delta: DEFAULT_PARTIAL_DELTA,
            atol: DEFAULT_PARTIAL_ATOL,
            rtol: DEFAULT_PARTIAL_RTOL,
        }
    }
}

impl fmt::Display for PartialsParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PartialsParams(delta = {:e}, atol = {:e}, rtol = {:e})",
            self.delta, self.atol, self.rtol
        )
    }
}

/// Builder for [`PartialsParams`], with validation.
#[derive(Debug, Clone)]
pub struct PartialsParamsBuilder {
    params: PartialsParams,
}

impl Default for PartialsParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialsParamsBuilder {
    pub fn new() -> Self {
        Self {
            params: PartialsParams::default(),
        }
    }

    pub fn delta(mut self, v: f64) -> Self {
        self.params.delta = v;
        self
    }
    pub fn atol(mut self, v: f64) -> Self {
        self.params.atol = v;
        self
    }
    pub fn rtol(mut self, v: f64) -> Self {
        self.params.rtol = v;
        self
    }

    /// Return true iff x > 0.0 and finite.
    #[inline]
    fn gt0(x: f64) -> bool {
        x.is_finite() && x.partial_cmp(&0.0) == Some(Greater)
    }

    /// Return true iff x >= 0.0 and finite.
    #[inline]
    fn ge0(x: f64) -> bool {
        x.is_finite() && matches!(x.partial_cmp(&0.0), Some(Greater) | Some(Equal))
    }

    /// Validate and produce the [`PartialsParams`].
    ///
    /// Validation rules
    /// -----------------
    /// * `delta > 0`
    /// * `atol >= 0`, `rtol >= 0`
    /// * all values finite
    ///
    /// Returns
    /// -----------------
    /// * `Err(PulsarError::InvalidPartialsParameter)` naming the first rule broken.
    pub fn build(self) -> Result<PartialsParams, PulsarError> {
        let p = &self.params;

        if !Self::gt0(p.delta) {
            return Err(PulsarError::InvalidPartialsParameter(
                "delta must be finite and > 0".into(),
            ));
        }
        if !Self::ge0(p.atol) {
            return Err(PulsarError::InvalidPartialsParameter(
                "atol must be finite and >= 0".into(),
            ));
        }
        if !Self::ge0(p.rtol) {
            return Err(PulsarError::InvalidPartialsParameter(
                "rtol must be finite and >= 0".into(),
            ));
        }

        Ok(self.params)
    }
}

/// Partial derivative of `f` with respect to `args[ix]`.
///
/// Uses the symmetric difference `(f(a + δ/2) - f(a - δ/2)) / δ`, with the
/// step applied to argument `ix` only.
///
/// Arguments
/// ---------
/// * `f`: function of a flat argument list returning a list of values
/// * `args`: evaluation point
/// * `ix`: index of the argument to differentiate against
/// * `delta`: full width of the step
///
/// Return
/// ------
/// * one partial per output value of `f`
///
/// Panics if `ix` is out of bounds for `args`.
pub fn numeric_partial<F>(f: F, args: &[f64], ix: usize, delta: f64) -> DVector<f64>
where
    F: Fn(&[f64]) -> Vec<f64>,
{
    let mut shifted = args.to_vec();

    shifted[ix] = args[ix] + delta / 2.0;
    let upper = DVector::from_vec(f(&shifted));

    shifted[ix] = args[ix] - delta / 2.0;
    let lower = DVector::from_vec(f(&shifted));

    (upper - lower) / delta
}

/// Numeric Jacobian of `f` at `args`.
///
/// Entry `(i, j)` is the partial of output `i` with respect to argument `j`.
/// With no arguments the Jacobian has one row per output and zero columns.
pub fn numeric_partials<F>(f: F, args: &[f64], delta: f64) -> DMatrix<f64>
where
    F: Fn(&[f64]) -> Vec<f64>,
{
    let columns: Vec<DVector<f64>> = (0..args.len())
        .map(|ix| numeric_partial(&f, args, ix, delta))
        .collect();

    let nrows = columns.first().map_or_else(|| f(args).len(), |c| c.len());
    DMatrix::from_fn(nrows, columns.len(), |i, j| columns[j][i])
}

/// Check the Jacobian returned by `f` against numeric partials.
///
/// `f` returns `(values, jacobian)`. The analytic Jacobian is evaluated at
/// `args`, the numeric one from the values alone, and both are compared
/// element-wise with the tolerances in `params`.
///
/// Entries where both Jacobians are NaN agree; a NaN on one side only is a
/// mismatch. On failure the fraction of failing entries (over the entries
/// whose error ratio is not NaN) and the worst offender are logged at error
/// level before returning.
///
/// Return
/// ------
/// * `Ok(())` when every entry agrees
/// * [`PulsarError::JacobianShape`] when the two Jacobians differ in shape
/// * [`PulsarError::PartialsMismatch`] with the worst offender otherwise
pub fn check_all_partials<F>(f: F, args: &[f64], params: &PartialsParams) -> Result<(), PulsarError>
where
    F: Fn(&[f64]) -> (Vec<f64>, DMatrix<f64>),
{
    let (_, jac) = f(args);
    let njac = numeric_partials(|a| f(a).0, args, params.delta);

    if jac.shape() != njac.shape() {
        return Err(PulsarError::JacobianShape {
            analytic: jac.shape(),
            numeric: njac.shape(),
        });
    }

    // ratio of the error to the allowed error
    let ratio = jac.zip_map(&njac, |a, n| {
        (a - n).abs() / (params.atol + params.rtol * n.abs())
    });
    // NaN on both sides agrees; NaN on one side never does
    let badness = jac.zip_zip_map(&njac, &ratio, |a, n, d| match (a.is_nan(), n.is_nan()) {
        (true, true) => f64::NEG_INFINITY,
        _ if d.is_nan() => f64::INFINITY,
        _ => d,
    });

    if badness.iter().all(|&d| d <= 1.0) {
        return Ok(());
    }
    let n_fail = ratio.iter().filter(|&&d| d > 1.0).count();
    let n_finite = ratio.iter().filter(|d| !d.is_nan()).count();
    let fail_fraction = if n_finite == 0 {
        0.0
    } else {
        n_fail as f64 / n_finite as f64
    };

    let (row, col) = badness
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(k, _)| (k % ratio.nrows(), k / ratio.nrows()))
        .unwrap_or((0, 0));
    let max_ratio = ratio[(row, col)];

    error!(
        fail_fraction,
        max_ratio,
        row,
        col,
        analytic = jac[(row, col)],
        numeric = njac[(row, col)],
        "analytic partials disagree with numeric partials"
    );

    Err(PulsarError::PartialsMismatch {
        fail_fraction,
        max_ratio,
        location: (row, col),
        analytic: jac[(row, col)],
        numeric: njac[(row, col)],
    })
}
