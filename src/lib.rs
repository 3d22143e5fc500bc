//! Helpers shared by pulsar timing code: high-precision MJD strings and
//! two-part times, Fortran-style number parsing, numeric partial derivatives,
//! prefixed parameter names, Taylor series and position/velocity pairs.
pub mod constants;
pub mod conversion;
pub mod derivatives;
pub mod lines;
pub mod longdouble;
pub mod posvel;
pub mod prefix;
pub mod pulsar_errors;
pub mod taylor;
pub mod time;
pub mod units;
