//! Position/velocity pairs with optional endpoint labels.
//!
//! Overview
//! -----------------
//! A [`PosVel`] holds the six numbers describing a position and a velocity,
//! generally aligned with ICRF (an inertial, non-rotating frame). Either vector
//! may carry a [`Unit`].
//!
//! The optional `origin` and `obj` labels name the endpoints of the vectors
//! (e.g. `"ssb" -> "earth"`). When both operands of an addition are labelled,
//! the sum must chain: the object of one is the origin of the other.
//!
//! Arithmetic semantics
//! -----------------
//! * Negation flips the vectors and swaps `origin`/`obj`.
//! * [`PosVel::try_add`] checks labels and units; the result is unlabelled as
//!   soon as one operand lacks a full label set.
//! * [`PosVel::try_sub`] is `a + (-b)`.
//! * Vectors keep the unit of the left operand.
//!
//! ```rust
//! use pulsar_utils::posvel::PosVel;
//!
//! let earth = PosVel::new(&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0])
//!     .unwrap()
//!     .with_labels("ssb", "earth");
//! let site = PosVel::new(&[0.1, 0.0, 0.0], &[0.0, 0.1, 0.0])
//!     .unwrap()
//!     .with_labels("earth", "site");
//!
//! let ssb_site = earth.try_add(&site).unwrap();
//! assert_eq!(ssb_site.origin(), Some("ssb"));
//! assert_eq!(ssb_site.obj(), Some("site"));
//! ```
use std::fmt;
use std::ops::Neg;

use itertools::Itertools;
use nalgebra::Vector3;

use crate::pulsar_errors::PulsarError;
use crate::units::Unit;

/// Position and velocity 3-vectors, with optional units and endpoint labels.
#[derive(Debug, Clone, PartialEq)]
pub struct PosVel {
    pos: Vector3<f64>,
    vel: Vector3<f64>,
    pos_unit: Option<Unit>,
    vel_unit: Option<Unit>,
    obj: Option<String>,
    origin: Option<String>,
}

fn vector3(values: &[f64], kind: &'static str) -> Result<Vector3<f64>, PulsarError> {
    match values {
        [x, y, z] => Ok(Vector3::new(*x, *y, *z)),
        _ => Err(PulsarError::InvalidVectorLength {
            kind,
            len: values.len(),
        }),
    }
}

/// Add `b` (in `ub`) to `a` (in `ua`), expressing the sum in `ua`.
///
/// A missing unit counts as dimensionless.
fn add_vectors(
    a: &Vector3<f64>,
    ua: Option<Unit>,
    b: &Vector3<f64>,
    ub: Option<Unit>,
) -> Result<Vector3<f64>, PulsarError> {
    match (ua, ub) {
        (None, None) => Ok(a + b),
        (ua, ub) => {
            let target = ua.unwrap_or(Unit::dimensionless());
            let factor = ub.unwrap_or(Unit::dimensionless()).conversion_factor(&target)?;
            Ok(a + b * factor)
        }
    }
}

impl PosVel {
    /// Build a pair from position and velocity components.
    ///
    /// Return
    /// -----------------
    /// * [`PulsarError::InvalidVectorLength`] if either slice does not hold exactly 3 values.
    pub fn new(pos: &[f64], vel: &[f64]) -> Result<Self, PulsarError> {
        Ok(Self::from_vectors(
            vector3(pos, "Position")?,
            vector3(vel, "Velocity")?,
        ))
    }

    /// Unlabelled, unitless pair from existing vectors.
    pub fn from_vectors(pos: Vector3<f64>, vel: Vector3<f64>) -> Self {
        PosVel {
            pos,
            vel,
            pos_unit: None,
            vel_unit: None,
            obj: None,
            origin: None,
        }
    }

    /// Attach endpoint labels: the vectors point from `origin` to `obj`.
    #[must_use = "`.with_labels()` returns a new PosVel"]
    pub fn with_labels(mut self, origin: impl Into<String>, obj: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self.obj = Some(obj.into());
        self
    }

    /// Attach units to the position and velocity vectors.
    #[must_use = "`.with_units()` returns a new PosVel"]
    pub fn with_units(mut self, pos_unit: Unit, vel_unit: Unit) -> Self {
        self.pos_unit = Some(pos_unit);
        self.vel_unit = Some(vel_unit);
        self
    }

    pub fn pos(&self) -> &Vector3<f64> {
        &self.pos
    }

    pub fn vel(&self) -> &Vector3<f64> {
        &self.vel
    }

    /// Units of the position and velocity, set together by [`PosVel::with_units`].
    pub fn units(&self) -> (Option<Unit>, Option<Unit>) {
        (self.pos_unit, self.vel_unit)
    }

    pub fn obj(&self) -> Option<&str> {
        self.obj.as_deref()
    }

    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    /// True when both `origin` and `obj` are set.
    pub fn has_labels(&self) -> bool {
        self.obj.is_some() && self.origin.is_some()
    }

    fn chain(&self) -> String {
        format!(
            "{}->{}",
            self.origin.as_deref().unwrap_or("None"),
            self.obj.as_deref().unwrap_or("None")
        )
    }

    /// Labels of `self + other`, or an error when the two do not chain.
    fn sum_labels(&self, other: &PosVel) -> Result<(Option<String>, Option<String>), PulsarError> {
        if !(self.has_labels() && other.has_labels()) {
            return Ok((None, None));
        }
        if self.obj == other.origin {
            Ok((self.origin.clone(), other.obj.clone()))
        } else if self.origin == other.obj {
            Ok((other.origin.clone(), self.obj.clone()))
        } else {
            Err(PulsarError::IncompatibleVectors {
                lhs: self.chain(),
                rhs: other.chain(),
            })
        }
    }

    /// Sum of two pairs.
    ///
    /// If both operands are labelled, `self.obj == other.origin` gives
    /// `self.origin -> other.obj`, and `self.origin == other.obj` gives
    /// `other.origin -> self.obj`. Any other labelling fails with
    /// [`PulsarError::IncompatibleVectors`].
    ///
    /// Units of `other` are converted into the units of `self`; incompatible
    /// units fail with [`PulsarError::UnitMismatch`].
    pub fn try_add(&self, other: &PosVel) -> Result<PosVel, PulsarError> {
        let (origin, obj) = self.sum_labels(other)?;
        Ok(PosVel {
            pos: add_vectors(&self.pos, self.pos_unit, &other.pos, other.pos_unit)?,
            vel: add_vectors(&self.vel, self.vel_unit, &other.vel, other.vel_unit)?,
            pos_unit: self.pos_unit,
            vel_unit: self.vel_unit,
            obj,
            origin,
        })
    }

    /// Difference of two pairs, `self + (-other)`.
    pub fn try_sub(&self, other: &PosVel) -> Result<PosVel, PulsarError> {
        self.try_add(&-other)
    }
}

impl Neg for PosVel {
    type Output = PosVel;

    fn neg(self) -> Self::Output {
        PosVel {
            pos: -self.pos,
            vel: -self.vel,
            pos_unit: self.pos_unit,
            vel_unit: self.vel_unit,
            obj: self.origin,
            origin: self.obj,
        }
    }
}

impl Neg for &PosVel {
    type Output = PosVel;

    fn neg(self) -> Self::Output {
        -self.clone()
    }
}

fn fmt_vector(v: &Vector3<f64>, unit: Option<Unit>) -> String {
    match unit {
        Some(u) => format!("[{}] {}", v.iter().join(", "), u),
        None => format!("[{}]", v.iter().join(", ")),
    }
}

impl fmt::Display for PosVel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}",
            fmt_vector(&self.pos, self.pos_unit),
            fmt_vector(&self.vel, self.vel_unit)
        )?;
        if self.has_labels() {
            write!(f, " {}", self.chain())?;
        }
        Ok(())
    }
}
