//! # Extended-precision scalar
//!
//! [`LongDouble`] is an unevaluated sum of two `f64` (`hi + lo`, with
//! `|lo| <= ulp(hi) / 2`), the classic *double-double* representation. It carries
//! about 31 significant decimal digits, enough to resolve well below a nanosecond
//! on an MJD near 60000.
//!
//! Overview
//! -----------------
//! * Arithmetic (`+`, `-`, `*`, `/`, unary `-`) with `LongDouble` and `f64` operands.
//! * Exact decimal parsing through [`FromStr`] (standard `e`/`E` exponents only;
//!   Fortran exponents are handled by [`crate::conversion::str2longdouble`]).
//! * Fixed-point formatting through [`fmt::Display`], honouring `{:.N}`.
//! * The process-wide precision precondition [`ensure_extended_precision`].
//!
//! The error-free transformations follow Dekker/Knuth (`two_sum`, `two_prod`
//! through a fused multiply-add).
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};
use std::str::FromStr;
use std::sync::OnceLock;

use crate::constants::{LONGDOUBLE_EPS_THRESHOLD, MJD_SPAN_DAYS, NANOSECONDS_PER_DAY};
use crate::pulsar_errors::PulsarError;

/// Significant decimal digits kept when parsing a mantissa.
const MAX_PARSE_DIGITS: usize = 32;

/// Largest number of fraction digits produced by exact rounding when formatting.
const MAX_ROUNDED_DIGITS: usize = 30;

/// Extended-precision floating-point value stored as `hi + lo`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LongDouble {
    hi: f64,
    lo: f64,
}

#[inline]
fn two_sum(a: f64, b: f64) -> (f64, f64) {
    let s = a + b;
    let bb = s - a;
    let err = (a - (s - bb)) + (b - bb);
    (s, err)
}

#[inline]
fn quick_two_sum(a: f64, b: f64) -> (f64, f64) {
    let s = a + b;
    let err = b - (s - a);
    (s, err)
}

#[inline]
fn two_prod(a: f64, b: f64) -> (f64, f64) {
    let p = a * b;
    let err = a.mul_add(b, -p);
    (p, err)
}

impl LongDouble {
    /// Unit roundoff of the double-double format (2⁻¹⁰⁴).
    pub const EPSILON: f64 = 4.930_380_657_631_324e-32;

    pub const ZERO: LongDouble = LongDouble { hi: 0.0, lo: 0.0 };
    pub const ONE: LongDouble = LongDouble { hi: 1.0, lo: 0.0 };

    /// Build a value from two components, renormalising them.
    pub fn new(hi: f64, lo: f64) -> Self {
        let (hi, lo) = two_sum(hi, lo);
        LongDouble { hi, lo }
    }

    /// Leading component (the nearest `f64`).
    pub fn hi(&self) -> f64 {
        self.hi
    }

    /// Trailing correction.
    pub fn lo(&self) -> f64 {
        self.lo
    }

    /// Round to the nearest `f64`.
    pub fn to_f64(self) -> f64 {
        self.hi + self.lo
    }

    pub fn is_nan(&self) -> bool {
        self.hi.is_nan() || self.lo.is_nan()
    }

    pub fn is_finite(&self) -> bool {
        self.hi.is_finite() && self.lo.is_finite()
    }

    pub fn is_sign_negative(&self) -> bool {
        self.hi < 0.0 || (self.hi == 0.0 && self.lo < 0.0)
    }

    pub fn abs(self) -> Self {
        if self.is_sign_negative() {
            -self
        } else {
            self
        }
    }

    /// Largest integer less than or equal to `self`.
    pub fn floor(self) -> Self {
        let hi = self.hi.floor();
        if hi == self.hi {
            let (hi, lo) = quick_two_sum(hi, self.lo.floor());
            LongDouble { hi, lo }
        } else {
            LongDouble { hi, lo: 0.0 }
        }
    }

    /// Integer part, rounding toward zero.
    pub fn trunc(self) -> Self {
        if self.is_sign_negative() {
            -((-self).floor())
        } else {
            self.floor()
        }
    }

    /// Fractional part, with the sign of `self`.
    pub fn fract(self) -> Self {
        self - self.trunc()
    }

    /// Round half away from zero.
    pub fn round(self) -> Self {
        if self.is_sign_negative() {
            -((-self + 0.5).floor())
        } else {
            (self + 0.5).floor()
        }
    }

    /// Raise to an integer power by repeated squaring.
    pub fn powi(self, n: i32) -> Self {
        let mut base = self;
        let mut exp = n.unsigned_abs();
        let mut acc = LongDouble::ONE;
        while exp > 0 {
            if exp & 1 == 1 {
                acc = acc * base;
            }
            base = base * base;
            exp >>= 1;
        }
        if n < 0 {
            LongDouble::ONE / acc
        } else {
            acc
        }
    }

    /// Exact conversion of an integer-valued `LongDouble` to `i128`.
    ///
    /// Returns `None` when the value is not finite or does not fit.
    pub(crate) fn to_i128(self) -> Option<i128> {
        const LIMIT: f64 = 1.0e38;
        if !self.is_finite() || self.hi.abs() >= LIMIT {
            return None;
        }
        Some(self.hi as i128 + self.lo as i128)
    }
}

// -------------------------------------------------------------------------------------------------
// Conversions
// -------------------------------------------------------------------------------------------------

impl From<f64> for LongDouble {
    fn from(x: f64) -> Self {
        LongDouble { hi: x, lo: 0.0 }
    }
}

impl From<f32> for LongDouble {
    fn from(x: f32) -> Self {
        LongDouble::from(x as f64)
    }
}

impl From<i32> for LongDouble {
    fn from(x: i32) -> Self {
        LongDouble::from(x as f64)
    }
}

impl From<i64> for LongDouble {
    fn from(x: i64) -> Self {
        let hi = x as f64;
        let lo = (x as i128 - hi as i128) as f64;
        LongDouble::new(hi, lo)
    }
}

impl From<u32> for LongDouble {
    fn from(x: u32) -> Self {
        LongDouble::from(x as f64)
    }
}

impl From<LongDouble> for f64 {
    fn from(x: LongDouble) -> Self {
        x.to_f64()
    }
}

// -------------------------------------------------------------------------------------------------
// Arithmetic
// -------------------------------------------------------------------------------------------------

impl Neg for LongDouble {
    type Output = LongDouble;

    fn neg(self) -> Self::Output {
        LongDouble {
            hi: -self.hi,
            lo: -self.lo,
        }
    }
}

impl Add for LongDouble {
    type Output = LongDouble;

    fn add(self, rhs: LongDouble) -> Self::Output {
        let (s, e) = two_sum(self.hi, rhs.hi);
        let (t, f) = two_sum(self.lo, rhs.lo);
        let (s, e) = quick_two_sum(s, e + t);
        let (hi, lo) = quick_two_sum(s, e + f);
        LongDouble { hi, lo }
    }
}

impl Add<f64> for LongDouble {
    type Output = LongDouble;

    fn add(self, rhs: f64) -> Self::Output {
        let (s, e) = two_sum(self.hi, rhs);
        let (hi, lo) = quick_two_sum(s, e + self.lo);
        LongDouble { hi, lo }
    }
}

impl Add<LongDouble> for f64 {
    type Output = LongDouble;

    fn add(self, rhs: LongDouble) -> Self::Output {
        rhs + self
    }
}

impl Sub for LongDouble {
    type Output = LongDouble;

    fn sub(self, rhs: LongDouble) -> Self::Output {
        self + (-rhs)
    }
}

impl Sub<f64> for LongDouble {
    type Output = LongDouble;

    fn sub(self, rhs: f64) -> Self::Output {
        self + (-rhs)
    }
}

impl Sub<LongDouble> for f64 {
    type Output = LongDouble;

    fn sub(self, rhs: LongDouble) -> Self::Output {
        (-rhs) + self
    }
}

impl Mul for LongDouble {
    type Output = LongDouble;

    fn mul(self, rhs: LongDouble) -> Self::Output {
        let (p, e) = two_prod(self.hi, rhs.hi);
        let e = e + (self.hi * rhs.lo + self.lo * rhs.hi);
        let (hi, lo) = quick_two_sum(p, e);
        LongDouble { hi, lo }
    }
}

impl Mul<f64> for LongDouble {
    type Output = LongDouble;

    fn mul(self, rhs: f64) -> Self::Output {
        let (p, e) = two_prod(self.hi, rhs);
        let (hi, lo) = quick_two_sum(p, e + self.lo * rhs);
        LongDouble { hi, lo }
    }
}

impl Mul<LongDouble> for f64 {
    type Output = LongDouble;

    fn mul(self, rhs: LongDouble) -> Self::Output {
        rhs * self
    }
}

impl Div for LongDouble {
    type Output = LongDouble;

    fn div(self, rhs: LongDouble) -> Self::Output {
        let q1 = self.hi / rhs.hi;
        let r = self - rhs * q1;
        let q2 = r.hi / rhs.hi;
        let r = r - rhs * q2;
        let q3 = r.hi / rhs.hi;
        let (hi, lo) = quick_two_sum(q1, q2);
        LongDouble { hi, lo } + q3
    }
}

impl Div<f64> for LongDouble {
    type Output = LongDouble;

    fn div(self, rhs: f64) -> Self::Output {
        self / LongDouble::from(rhs)
    }
}

impl AddAssign for LongDouble {
    fn add_assign(&mut self, rhs: LongDouble) {
        *self = *self + rhs;
    }
}

impl SubAssign for LongDouble {
    fn sub_assign(&mut self, rhs: LongDouble) {
        *self = *self - rhs;
    }
}

impl PartialEq for LongDouble {
    fn eq(&self, other: &Self) -> bool {
        self.hi == other.hi && self.lo == other.lo
    }
}

impl PartialEq<f64> for LongDouble {
    fn eq(&self, other: &f64) -> bool {
        self.hi == *other && self.lo == 0.0
    }
}

impl PartialOrd for LongDouble {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.hi.partial_cmp(&other.hi)? {
            Ordering::Equal => self.lo.partial_cmp(&other.lo),
            ord => Some(ord),
        }
    }
}

impl PartialOrd<f64> for LongDouble {
    fn partial_cmp(&self, other: &f64) -> Option<Ordering> {
        self.partial_cmp(&LongDouble::from(*other))
    }
}

// -------------------------------------------------------------------------------------------------
// Parsing
// -------------------------------------------------------------------------------------------------

/// Exact power of ten in double-double.
fn pow10(n: i32) -> LongDouble {
    LongDouble::from(10.0).powi(n)
}

impl FromStr for LongDouble {
    type Err = PulsarError;

    /// Parse a decimal literal (`[+-]digits[.digits][(e|E)[+-]digits]`).
    ///
    /// Up to 32 significant digits are accumulated exactly; `nan`, `inf` and
    /// `infinity` are accepted case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || PulsarError::ParseFloat(s.to_string());
        let text = s.trim();

        let lowered = text.to_ascii_lowercase();
        if matches!(
            lowered.trim_start_matches(['+', '-']),
            "nan" | "inf" | "infinity"
        ) {
            return lowered
                .parse::<f64>()
                .map(LongDouble::from)
                .map_err(|_| err());
        }

        let (negative, body) = match text.as_bytes().first() {
            Some(b'-') => (true, &text[1..]),
            Some(b'+') => (false, &text[1..]),
            _ => (false, text),
        };

        let (mantissa, exponent) = match body.find(['e', 'E']) {
            Some(pos) => {
                let exp: i32 = body[pos + 1..].parse().map_err(|_| err())?;
                (&body[..pos], exp)
            }
            None => (body, 0),
        };

        let (int_digits, frac_digits) = match mantissa.split_once('.') {
            Some((i, f)) => (i, f),
            None => (mantissa, ""),
        };
        if int_digits.is_empty() && frac_digits.is_empty() {
            return Err(err());
        }
        if !int_digits
            .bytes()
            .chain(frac_digits.bytes())
            .all(|b| b.is_ascii_digit())
        {
            return Err(err());
        }

        let mut acc = LongDouble::ZERO;
        let mut significant = 0usize;
        let mut scale: i32 = exponent;
        for (pos, b) in int_digits.bytes().chain(frac_digits.bytes()).enumerate() {
            let in_fraction = pos >= int_digits.len();
            let digit = (b - b'0') as f64;
            if significant == 0 && digit == 0.0 {
                if in_fraction {
                    scale -= 1;
                }
                continue;
            }
            if significant < MAX_PARSE_DIGITS {
                acc = acc * 10.0 + digit;
                significant += 1;
                if in_fraction {
                    scale -= 1;
                }
            } else if !in_fraction {
                scale += 1;
            }
        }

        let value = match scale.cmp(&0) {
            Ordering::Equal => acc,
            Ordering::Greater => acc * pow10(scale),
            Ordering::Less => acc / pow10(-scale),
        };
        Ok(if negative { -value } else { value })
    }
}

// -------------------------------------------------------------------------------------------------
// Formatting
// -------------------------------------------------------------------------------------------------

/// Format a non-negative finite value with exactly `digits` fraction digits.
fn format_fixed(v: LongDouble, digits: usize) -> String {
    let exact_digits = digits.min(MAX_ROUNDED_DIGITS);
    let mut int_part = v.floor();
    let frac = v - int_part;

    let scale = pow10(exact_digits as i32);
    let mut scaled = (frac * scale + 0.5).floor();
    if scaled >= scale {
        scaled -= scale;
        int_part += LongDouble::ONE;
    }

    let int_str = match int_part.to_i128() {
        Some(i) => i.to_string(),
        None => format!("{:.0}", int_part.hi),
    };

    if digits == 0 {
        return int_str;
    }

    let frac_str = scaled
        .to_i128()
        .map(|f| format!("{:0width$}", f.max(0), width = exact_digits))
        .unwrap_or_else(|| "0".repeat(exact_digits));
    let padding = "0".repeat(digits - exact_digits);
    format!("{int_str}.{frac_str}{padding}")
}

/// Shortest-ish representation keeping about 31 significant digits.
fn format_general(v: LongDouble) -> String {
    if v.hi == 0.0 {
        return "0.0".to_string();
    }
    let mut exp10 = v.hi.log10().floor() as i32;
    if (-5..21).contains(&exp10) {
        let digits = (30 - exp10).clamp(1, MAX_ROUNDED_DIGITS as i32) as usize;
        let text = format_fixed(v, digits);
        let trimmed = text.trim_end_matches('0');
        return if trimmed.ends_with('.') {
            format!("{trimmed}0")
        } else {
            trimmed.to_string()
        };
    }

    let mut mantissa = v / pow10(exp10);
    if mantissa.hi >= 10.0 {
        mantissa = mantissa / 10.0;
        exp10 += 1;
    } else if mantissa.hi < 1.0 {
        mantissa = mantissa * 10.0;
        exp10 -= 1;
    }
    let text = format_fixed(mantissa, 30);
    let trimmed = text.trim_end_matches('0');
    let trimmed = if trimmed.ends_with('.') {
        format!("{trimmed}0")
    } else {
        trimmed.to_string()
    };
    format!("{trimmed}e{exp10}")
}

impl fmt::Display for LongDouble {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_nan() {
            return f.write_str("NaN");
        }
        let negative = self.is_sign_negative();
        if !self.is_finite() {
            return f.write_str(if negative { "-inf" } else { "inf" });
        }
        let magnitude = self.abs();
        let body = match f.precision() {
            Some(p) => format_fixed(magnitude, p),
            None => format_general(magnitude),
        };
        let body = if negative && body.bytes().any(|b| matches!(b, b'1'..=b'9')) {
            format!("-{body}")
        } else if f.sign_plus() {
            format!("+{body}")
        } else {
            body
        };
        f.write_str(&body)
    }
}

// -------------------------------------------------------------------------------------------------
// Precision precondition
// -------------------------------------------------------------------------------------------------

static PRECISION_CHECK: OnceLock<Result<f64, f64>> = OnceLock::new();

/// Measure the effective epsilon of [`LongDouble`] on this platform.
///
/// The declared unit roundoff is only reachable when the error-free transforms
/// really are error free (IEEE double rounding, a correct fused multiply-add).
/// A round trip through `1/3` exposes platforms where they are not.
pub fn effective_epsilon() -> f64 {
    let third = LongDouble::ONE / LongDouble::from(3.0);
    let residual = (third * 3.0 - LongDouble::ONE).abs().to_f64();
    let tiny = LongDouble::ONE + 2f64.powi(-80);
    let lost = ((tiny - LongDouble::ONE).to_f64() - 2f64.powi(-80)).abs();
    LongDouble::EPSILON.max(residual).max(lost)
}

/// Process-wide check that extended precision is really available.
///
/// Runs once; later calls return the cached verdict. Fails with
/// [`PulsarError::InsufficientPrecision`] when the measured epsilon is above
/// [`LONGDOUBLE_EPS_THRESHOLD`].
pub fn ensure_extended_precision() -> Result<(), PulsarError> {
    let verdict = PRECISION_CHECK.get_or_init(|| {
        let eps = effective_epsilon();
        if eps > LONGDOUBLE_EPS_THRESHOLD {
            Err(eps)
        } else {
            Ok(eps)
        }
    });
    match verdict {
        Ok(_) => Ok(()),
        Err(eps) => Err(PulsarError::InsufficientPrecision(*eps)),
    }
}

/// Resolution of a [`LongDouble`] MJD over the quoted span, in nanoseconds.
pub fn longdouble_mjd_eps() -> f64 {
    MJD_SPAN_DAYS * NANOSECONDS_PER_DAY * effective_epsilon()
}
