use crate::pulsar_errors::PulsarError;
use crate::units::{Scalar, Unit};

/// Starting accumulator for the Horner loop.
///
/// When the highest-order coefficient carries a unit, the zero must already be
/// expressed in `unit(c_last) / unit(x)` so that the first `result * x + c_last`
/// step is dimensionally consistent. A plain `x` counts as dimensionless.
fn initial_accumulator(x: Scalar, coeffs: &[Scalar]) -> Scalar {
    match coeffs.last().and_then(Scalar::unit) {
        Some(c_unit) => {
            let x_unit = x.unit().unwrap_or(Unit::dimensionless());
            Scalar::quantity(0.0, c_unit / x_unit)
        }
        None => Scalar::Plain(0.0),
    }
}

fn horner(x: Scalar, coeffs: &[Scalar], start: Scalar) -> Result<Scalar, PulsarError> {
    let mut fact = coeffs.len() as f64;
    let mut result = start;
    for &coeff in coeffs.iter().rev() {
        result = (result * x / fact).try_add(coeff)?;
        fact -= 1.0;
    }
    Ok(result)
}

/// Evaluate a Taylor series of coefficients at `x` via the Horner scheme.
///
/// Computes `c0 + c1*x/1! + c2*x^2/2! + …`. Coefficients and `x` may carry
/// units; every partial sum must be dimensionally consistent.
///
/// Arguments
/// ---------
/// * `x`: evaluation point
/// * `coeffs`: Taylor coefficients, lowest order first
///
/// Return
/// ------
/// * the series value, or [`PulsarError::UnitMismatch`] when two terms cannot be added
///
/// Example
/// -------
/// ```
/// use pulsar_utils::taylor::taylor_horner;
/// use pulsar_utils::units::Scalar;
///
/// let coeffs = [10.0, 3.0, 4.0, 12.0].map(Scalar::Plain);
/// assert_eq!(taylor_horner(Scalar::Plain(2.0), &coeffs).unwrap(), Scalar::Plain(40.0));
/// ```
pub fn taylor_horner(x: Scalar, coeffs: &[Scalar]) -> Result<Scalar, PulsarError> {
    horner(x, coeffs, initial_accumulator(x, coeffs))
}

/// Evaluate the `deriv_order`-th derivative of a Taylor series at `x`.
///
/// The derivative of a Taylor series is the series of the coefficients shifted
/// by `deriv_order`, so this is [`taylor_horner`] on `coeffs[deriv_order..]`.
/// The unit of the accumulator still follows the last coefficient of the full
/// list. A derivative order past the last coefficient yields zero.
pub fn taylor_horner_deriv(
    x: Scalar,
    coeffs: &[Scalar],
    deriv_order: usize,
) -> Result<Scalar, PulsarError> {
    let start = initial_accumulator(x, coeffs);
    let der_coeffs = coeffs.get(deriv_order..).unwrap_or(&[]);
    horner(x, der_coeffs, start)
}

/// [`taylor_horner`] for unitless `f64` coefficients.
pub fn taylor_horner_f64(x: f64, coeffs: &[f64]) -> f64 {
    let mut fact = coeffs.len() as f64;
    coeffs.iter().rev().fold(0.0, |result, &coeff| {
        let next = result * x / fact + coeff;
        fact -= 1.0;
        next
    })
}

/// [`taylor_horner_deriv`] for unitless `f64` coefficients.
pub fn taylor_horner_deriv_f64(x: f64, coeffs: &[f64], deriv_order: usize) -> f64 {
    taylor_horner_f64(x, coeffs.get(deriv_order..).unwrap_or(&[]))
}
