use thiserror::Error;

/// Failure to decompose a prefixed parameter name such as `DMX_0012` or `F1`.
///
/// Kept apart from [`PulsarError`] so callers iterating over parameter names can
/// tell "not a prefixed parameter" from any other failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PrefixError {
    #[error("Unrecognized prefix name pattern '{0}'.")]
    Unrecognized(String),
}

#[derive(Error, Debug)]
pub enum PulsarError {
    #[error("{kind} vector has length {len} instead of 3")]
    InvalidVectorLength { kind: &'static str, len: usize },

    #[error("Attempting to add incompatible vectors: {lhs} + {rhs}")]
    IncompatibleVectors { lhs: String, rhs: String },

    #[error("Invalid MJD string: {0}")]
    InvalidMjdString(String),

    #[error("Fractional day {0} is outside the normalisable range (-2, 2)")]
    FractionalDayOutOfRange(f64),

    #[error("Unable to parse floating-point value: {0}")]
    ParseFloat(String),

    #[error(transparent)]
    Prefix(#[from] PrefixError),

    #[error(
        "Unable to deal with comments that start with whitespace, but comment string {0:?} was requested."
    )]
    InvalidCommentMarker(String),

    #[error(
        "Analytic partials disagree with numeric partials: fail fraction {fail_fraction}, max fail {max_ratio} at {location:?} (analytic {analytic}, numeric {numeric})"
    )]
    PartialsMismatch {
        fail_fraction: f64,
        max_ratio: f64,
        location: (usize, usize),
        analytic: f64,
        numeric: f64,
    },

    #[error("Jacobian shape mismatch: analytic {analytic:?}, numeric {numeric:?}")]
    JacobianShape {
        analytic: (usize, usize),
        numeric: (usize, usize),
    },

    #[error("Invalid partial derivative parameter: {0}")]
    InvalidPartialsParameter(String),

    #[error("Incompatible units: {0} and {1}")]
    UnitMismatch(String, String),

    #[error(
        "This platform does not support extended precision floating-point (epsilon {0:e}), and cannot run without it."
    )]
    InsufficientPrecision(f64),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),
}

impl PartialEq for PulsarError {
    fn eq(&self, other: &Self) -> bool {
        use PulsarError::*;
        match (self, other) {
            (
                InvalidVectorLength { kind: k1, len: l1 },
                InvalidVectorLength { kind: k2, len: l2 },
            ) => k1 == k2 && l1 == l2,
            (
                IncompatibleVectors { lhs: a1, rhs: b1 },
                IncompatibleVectors { lhs: a2, rhs: b2 },
            ) => a1 == a2 && b1 == b2,
            (InvalidMjdString(a), InvalidMjdString(b)) => a == b,
            (FractionalDayOutOfRange(a), FractionalDayOutOfRange(b)) => a == b,
            (ParseFloat(a), ParseFloat(b)) => a == b,
            (Prefix(a), Prefix(b)) => a == b,
            (InvalidCommentMarker(a), InvalidCommentMarker(b)) => a == b,
            (
                PartialsMismatch {
                    location: l1,
                    fail_fraction: f1,
                    ..
                },
                PartialsMismatch {
                    location: l2,
                    fail_fraction: f2,
                    ..
                },
            ) => l1 == l2 && f1 == f2,
            (
                JacobianShape {
                    analytic: a1,
                    numeric: n1,
                },
                JacobianShape {
                    analytic: a2,
                    numeric: n2,
                },
            ) => a1 == a2 && n1 == n2,
            (InvalidPartialsParameter(a), InvalidPartialsParameter(b)) => a == b,
            (UnitMismatch(a1, b1), UnitMismatch(a2, b2)) => a1 == a2 && b1 == b2,
            (InsufficientPrecision(a), InsufficientPrecision(b)) => a == b,

            // io errors are not comparable: same variant means equal
            (IoError(_), IoError(_)) => true,

            _ => false,
        }
    }
}
