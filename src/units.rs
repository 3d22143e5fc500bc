//! # Physical units carried at runtime
//!
//! Timing model coefficients (`F0` in Hz, `F1` in Hz/s, …) and geometric
//! vectors may or may not carry a unit. Instead of probing values for a unit
//! attribute, every optionally-dimensioned number is a [`Scalar`]: either a
//! [`Scalar::Plain`] `f64` or a [`Scalar::Quantity`] with an attached [`Unit`].
//!
//! Units are tracked as integer exponents over four base dimensions
//! (length, time, mass, angle) plus a scale factor to the SI base unit, which is
//! all the timing helpers need for multiplication, division and compatible
//! addition.
use std::fmt;
use std::ops::{Div, Mul};

use serde::{Deserialize, Serialize};

use crate::constants::SECONDS_PER_DAY;
use crate::pulsar_errors::PulsarError;

const LENGTH: usize = 0;
const TIME: usize = 1;
const MASS: usize = 2;
const ANGLE: usize = 3;
const BASE_SYMBOLS: [&str; 4] = ["m", "s", "kg", "rad"];

/// Speed of light in m/s, used for light-second distances.
const C_LIGHT: f64 = 299_792_458.0;

/// A physical unit: a scale factor to SI times a product of base dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    scale: f64,
    dims: [i8; 4],
}

impl Unit {
    const fn base(scale: f64, dims: [i8; 4]) -> Self {
        Unit { scale, dims }
    }

    pub const fn dimensionless() -> Self {
        Unit::base(1.0, [0, 0, 0, 0])
    }

    pub const fn second() -> Self {
        Unit::base(1.0, [0, 1, 0, 0])
    }

    pub const fn day() -> Self {
        Unit::base(SECONDS_PER_DAY, [0, 1, 0, 0])
    }

    pub const fn hertz() -> Self {
        Unit::base(1.0, [0, -1, 0, 0])
    }

    pub const fn meter() -> Self {
        Unit::base(1.0, [1, 0, 0, 0])
    }

    pub const fn kilometer() -> Self {
        Unit::base(1_000.0, [1, 0, 0, 0])
    }

    pub const fn light_second() -> Self {
        Unit::base(C_LIGHT, [1, 0, 0, 0])
    }

    pub const fn kilogram() -> Self {
        Unit::base(1.0, [0, 0, 1, 0])
    }

    pub const fn radian() -> Self {
        Unit::base(1.0, [0, 0, 0, 1])
    }

    pub fn degree() -> Self {
        Unit::base(std::f64::consts::PI / 180.0, [0, 0, 0, 1])
    }

    /// Factor converting one of `self` into SI base units.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn is_dimensionless(&self) -> bool {
        self.dims == [0; 4]
    }

    /// True when both units measure the same physical dimension.
    pub fn is_equivalent(&self, other: &Unit) -> bool {
        self.dims == other.dims
    }

    /// Multiplicative factor converting a value in `self` into `target`.
    pub fn conversion_factor(&self, target: &Unit) -> Result<f64, PulsarError> {
        if !self.is_equivalent(target) {
            return Err(PulsarError::UnitMismatch(
                self.to_string(),
                target.to_string(),
            ));
        }
        Ok(self.scale / target.scale)
    }

    pub fn powi(self, n: i8) -> Unit {
        Unit {
            scale: self.scale.powi(n as i32),
            dims: self.dims.map(|d| d * n),
        }
    }
}

impl Mul for Unit {
    type Output = Unit;

    fn mul(self, rhs: Unit) -> Self::Output {
        let mut dims = self.dims;
        for (d, r) in dims.iter_mut().zip(rhs.dims) {
            *d += r;
        }
        Unit {
            scale: self.scale * rhs.scale,
            dims,
        }
    }
}

impl Div for Unit {
    type Output = Unit;

    fn div(self, rhs: Unit) -> Self::Output {
        self * rhs.powi(-1)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = [LENGTH, TIME, MASS, ANGLE]
            .iter()
            .filter(|&&i| self.dims[i] != 0)
            .map(|&i| match self.dims[i] {
                1 => BASE_SYMBOLS[i].to_string(),
                e => format!("{}^{}", BASE_SYMBOLS[i], e),
            })
            .collect();
        match (self.scale == 1.0, parts.is_empty()) {
            (true, true) => write!(f, "dimensionless"),
            (true, false) => write!(f, "{}", parts.join(" ")),
            (false, true) => write!(f, "{}", self.scale),
            (false, false) => write!(f, "{} {}", self.scale, parts.join(" ")),
        }
    }
}

/// A value with a unit attached.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub value: f64,
    pub unit: Unit,
}

impl Quantity {
    pub fn new(value: f64, unit: Unit) -> Self {
        Quantity { value, unit }
    }

    /// Express the quantity in another, equivalent unit.
    pub fn to(&self, unit: Unit) -> Result<Quantity, PulsarError> {
        let factor = self.unit.conversion_factor(&unit)?;
        Ok(Quantity::new(self.value * factor, unit))
    }

    /// Value in SI base units.
    pub fn si_value(&self) -> f64 {
        self.value * self.unit.scale()
    }
}

/// A number that may or may not carry a physical unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Scalar {
    Plain(f64),
    Quantity(Quantity),
}

impl Scalar {
    pub fn quantity(value: f64, unit: Unit) -> Self {
        Scalar::Quantity(Quantity::new(value, unit))
    }

    /// Numeric value in whatever unit the scalar is expressed in.
    pub fn value(&self) -> f64 {
        match self {
            Scalar::Plain(v) => *v,
            Scalar::Quantity(q) => q.value,
        }
    }

    pub fn unit(&self) -> Option<Unit> {
        match self {
            Scalar::Plain(_) => None,
            Scalar::Quantity(q) => Some(q.unit),
        }
    }

    pub fn has_unit(&self) -> bool {
        self.unit().is_some()
    }

    /// Same numeric value with `unit` attached (replacing any existing one).
    pub fn with_unit(self, unit: Unit) -> Scalar {
        Scalar::quantity(self.value(), unit)
    }

    /// Attach a dimensionless unit to a plain value; quantities are untouched.
    pub fn as_quantity(self) -> Quantity {
        match self {
            Scalar::Plain(v) => Quantity::new(v, Unit::dimensionless()),
            Scalar::Quantity(q) => q,
        }
    }

    /// Express the scalar in `unit`; a plain value must be asked for a dimensionless unit.
    pub fn to(&self, unit: Unit) -> Result<f64, PulsarError> {
        Ok(self.as_quantity().to(unit)?.value)
    }

    /// Sum of two scalars. The result keeps the unit of `self`.
    ///
    /// A plain value combines with a quantity only if that quantity is dimensionless.
    pub fn try_add(self, rhs: Scalar) -> Result<Scalar, PulsarError> {
        match (self, rhs) {
            (Scalar::Plain(a), Scalar::Plain(b)) => Ok(Scalar::Plain(a + b)),
            (Scalar::Quantity(a), rhs) => {
                let b = rhs.as_quantity().to(a.unit)?;
                Ok(Scalar::quantity(a.value + b.value, a.unit))
            }
            (Scalar::Plain(a), Scalar::Quantity(b)) => {
                let b = b.to(Unit::dimensionless())?;
                Ok(Scalar::Plain(a + b.value))
            }
        }
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Plain(v)
    }
}

impl From<Quantity> for Scalar {
    fn from(q: Quantity) -> Self {
        Scalar::Quantity(q)
    }
}

impl Mul for Scalar {
    type Output = Scalar;

    fn mul(self, rhs: Scalar) -> Self::Output {
        match (self, rhs) {
            (Scalar::Plain(a), Scalar::Plain(b)) => Scalar::Plain(a * b),
            (Scalar::Quantity(a), Scalar::Plain(b)) => Scalar::quantity(a.value * b, a.unit),
            (Scalar::Plain(a), Scalar::Quantity(b)) => Scalar::quantity(a * b.value, b.unit),
            (Scalar::Quantity(a), Scalar::Quantity(b)) => {
                Scalar::quantity(a.value * b.value, a.unit * b.unit)
            }
        }
    }
}

impl Mul<f64> for Scalar {
    type Output = Scalar;

    fn mul(self, rhs: f64) -> Self::Output {
        self * Scalar::Plain(rhs)
    }
}

impl Div<f64> for Scalar {
    type Output = Scalar;

    fn div(self, rhs: f64) -> Self::Output {
        match self {
            Scalar::Plain(a) => Scalar::Plain(a / rhs),
            Scalar::Quantity(q) => Scalar::quantity(q.value / rhs, q.unit),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Plain(v) => write!(f, "{v}"),
            Scalar::Quantity(q) if q.unit.is_dimensionless() && q.unit.scale() == 1.0 => {
                write!(f, "{}", q.value)
            }
            Scalar::Quantity(q) => write!(f, "{} {}", q.value, q.unit),
        }
    }
}

#[cfg(test)]
mod units_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_unit_algebra() {
        let hz_per_s = Unit::hertz() / Unit::second();
        assert_eq!(hz_per_s, Unit::second().powi(-2));
        assert!((Unit::hertz() * Unit::second()).is_dimensionless());
        assert_eq!(hz_per_s.to_string(), "s^-2");
        assert_eq!(Unit::kilometer().to_string(), "1000 m");
    }

    #[test]
    fn test_conversion() {
        let one_day = Quantity::new(1.0, Unit::day());
        assert_eq!(one_day.to(Unit::second()).unwrap().value, 86400.0);
        assert_eq!(
            one_day.to(Unit::meter()),
            Err(PulsarError::UnitMismatch("86400 s".into(), "m".into()))
        );
    }

    #[test]
    fn test_scalar_addition_keeps_left_unit() {
        let a = Scalar::quantity(1.0, Unit::kilometer());
        let b = Scalar::quantity(500.0, Unit::meter());
        let sum = a.try_add(b).unwrap();
        assert_eq!(sum.unit(), Some(Unit::kilometer()));
        assert_relative_eq!(sum.value(), 1.5);
    }

    #[test]
    fn test_plain_and_dimensionless_mix() {
        let a = Scalar::Plain(2.0);
        let b = Scalar::quantity(3.0, Unit::dimensionless());
        assert_eq!(a.try_add(b).unwrap(), Scalar::Plain(5.0));
        assert!(a.try_add(Scalar::quantity(3.0, Unit::second())).is_err());
    }

    #[test]
    fn test_scalar_mul_div() {
        let f0 = Scalar::quantity(10.0, Unit::hertz());
        let dt = Scalar::quantity(2.0, Unit::second());
        let phase = f0 * dt / 4.0;
        assert_eq!(phase.value(), 5.0);
        assert!(phase.unit().unwrap().is_dimensionless());
        assert_eq!(phase.to_string(), "5");
    }
}
