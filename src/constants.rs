//! # Constants and type definitions for pulsar_utils
//!
//! This module centralizes the **time constants**, **precision thresholds** and
//! **common type aliases** used throughout the crate.
//!
//! ## Overview
//!
//! - Julian/Modified Julian date offsets
//! - Day/second/nanosecond conversion factors
//! - The extended-precision requirement used by the startup precondition
//! - Default formatting and differentiation parameters

// -------------------------------------------------------------------------------------------------
// Time constants
// -------------------------------------------------------------------------------------------------

/// Offset between Julian Date and Modified Julian Date (JD = MJD + DJM0)
pub const DJM0: f64 = 2_400_000.5;

/// Number of seconds in a Julian day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Number of nanoseconds in a Julian day
pub const NANOSECONDS_PER_DAY: f64 = 86_400.0e9;

/// Number of nanoseconds in a Julian day, as an integer
pub const NANOSECONDS_PER_DAY_I64: i64 = 86_400_000_000_000;

// -------------------------------------------------------------------------------------------------
// Precision requirements
// -------------------------------------------------------------------------------------------------

/// Largest machine epsilon accepted for the extended-precision type.
///
/// A plain `f64` has an epsilon of about `2.2e-16`; an 80-bit x87 long double
/// sits around `1.08e-19`. Anything above this threshold cannot resolve a
/// nanosecond over the span of MJDs used in pulsar timing.
pub const LONGDOUBLE_EPS_THRESHOLD: f64 = 2e-19;

/// Time span (in days) over which the extended-precision MJD resolution is quoted.
pub const MJD_SPAN_DAYS: f64 = 70_000.0;

// -------------------------------------------------------------------------------------------------
// Defaults
// -------------------------------------------------------------------------------------------------

/// Default number of digits printed after the decimal point of an MJD string
pub const DEFAULT_MJD_PRECISION: usize = 15;

/// Default step used by the central differences
pub const DEFAULT_PARTIAL_DELTA: f64 = 1e-6;

/// Default absolute tolerance when checking analytic partials
pub const DEFAULT_PARTIAL_ATOL: f64 = 1e-4;

/// Default relative tolerance when checking analytic partials
pub const DEFAULT_PARTIAL_RTOL: f64 = 1e-4;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Modified Julian Date (days)
pub type MJD = f64;

/// Julian Date (days)
pub type JD = f64;

/// Integer part of a Modified Julian Date
pub type IntMJD = i64;
