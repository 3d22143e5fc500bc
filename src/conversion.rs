use crate::longdouble::{ensure_extended_precision, LongDouble};
use crate::pulsar_errors::PulsarError;

/// CJK ideographs carrying a numeric value in the Unicode database.
const CJK_NUMERALS: &str = "〇零一二三四五六七八九十百千万萬億兆壹贰貳叁參肆伍陆陸柒捌玖拾佰仟";

/// Input accepted by the lenient numeric converters.
///
/// Text is tried with the Fortran-aware parser first; numbers are converted
/// directly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericInput<'a> {
    Text(&'a str),
    Float(f64),
    Int(i64),
}

impl<'a> From<&'a str> for NumericInput<'a> {
    fn from(s: &'a str) -> Self {
        NumericInput::Text(s)
    }
}

impl<'a> From<&'a String> for NumericInput<'a> {
    fn from(s: &'a String) -> Self {
        NumericInput::Text(s.as_str())
    }
}

impl From<f64> for NumericInput<'_> {
    fn from(x: f64) -> Self {
        NumericInput::Float(x)
    }
}

impl From<i64> for NumericInput<'_> {
    fn from(x: i64) -> Self {
        NumericInput::Int(x)
    }
}

impl From<i32> for NumericInput<'_> {
    fn from(x: i32) -> Self {
        NumericInput::Int(x as i64)
    }
}

/// Replace Fortran exponent markers (`D`, `d`) by `e`.
fn fortran_to_c_exponent(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| if c == 'D' || c == 'd' { 'e' } else { c })
        .collect()
}

/// Convert Fortran-format floating-point strings.
///
/// Exponential notation written by tempo1-era tools uses `D`/`d` as exponent
/// marker (`1.5D2`); those are turned into `e` before parsing. Numbers are
/// converted as-is.
///
/// Arguments
/// ---------
/// * `x`: the text or number to convert
///
/// Return
/// ------
/// * the value as `f64`, or [`PulsarError::ParseFloat`] for malformed text
pub fn fortran_float<'a>(x: impl Into<NumericInput<'a>>) -> Result<f64, PulsarError> {
    match x.into() {
        NumericInput::Text(s) => fortran_to_c_exponent(s)
            .parse::<f64>()
            .map_err(|_| PulsarError::ParseFloat(s.to_string())),
        NumericInput::Float(v) => Ok(v),
        NumericInput::Int(i) => Ok(i as f64),
    }
}

/// Return a long double from the input string.
///
/// Accepts Fortran-style exponent notation (`1.0d2`). Only text is accepted;
/// use [`data2longdouble`] for numbers.
pub fn str2longdouble(s: &str) -> Result<LongDouble, PulsarError> {
    ensure_extended_precision()?;
    fortran_to_c_exponent(s)
        .parse::<LongDouble>()
        .map_err(|_| PulsarError::ParseFloat(s.to_string()))
}

/// Return a long double from different kinds of data.
///
/// Text goes through [`str2longdouble`] (so Fortran exponents are allowed),
/// numbers are converted directly.
pub fn data2longdouble<'a>(data: impl Into<NumericInput<'a>>) -> Result<LongDouble, PulsarError> {
    match data.into() {
        NumericInput::Text(s) => str2longdouble(s),
        NumericInput::Float(v) => {
            ensure_extended_precision()?;
            Ok(LongDouble::from(v))
        }
        NumericInput::Int(i) => {
            ensure_extended_precision()?;
            Ok(LongDouble::from(i))
        }
    }
}

/// Element-wise [`data2longdouble`].
pub fn data2longdouble_array<'a, T>(data: &[T]) -> Result<Vec<LongDouble>, PulsarError>
where
    T: Copy + Into<NumericInput<'a>>,
{
    data.iter().map(|&v| data2longdouble(v)).collect()
}

/// Convert a long double to text without losing digits.
///
/// The output parses back to the same value through [`str2longdouble`].
pub fn longdouble2str(x: LongDouble) -> String {
    x.to_string()
}

/// Check whether a string holds a number.
///
/// True for anything the standard float parser accepts (surrounding whitespace
/// allowed) and for a single Unicode character with a numeric value (`½`, `Ⅻ`,
/// `五`, …). Fortran-style numbers (`1.0d10`) are **not** recognised.
pub fn is_number(s: &str) -> bool {
    if s.trim().parse::<f64>().is_ok() {
        return true;
    }
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => c.is_numeric() || CJK_NUMERALS.contains(c),
        _ => false,
    }
}

#[cfg(test)]
mod conversion_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_fortran_float() {
        assert_eq!(fortran_float("1.5D2").unwrap(), 150.0);
        assert_eq!(fortran_float("1.5d-2").unwrap(), 0.015);
        assert_eq!(fortran_float("  -3.25E1 ").unwrap(), -32.5);
        assert_eq!(fortran_float(4.5).unwrap(), 4.5);
        assert_eq!(fortran_float(7).unwrap(), 7.0);
        assert_eq!(
            fortran_float("1.5X2"),
            Err(PulsarError::ParseFloat("1.5X2".into()))
        );
    }

    #[test]
    fn test_str2longdouble() {
        let x = str2longdouble("1.0000000000000000001d2").unwrap();
        assert_eq!(x.hi(), 100.0);
        assert_relative_eq!(x.lo(), 1e-17, max_relative = 1e-12);

        assert!(str2longdouble("not a number").is_err());
    }

    #[test]
    fn test_data2longdouble_dispatch() {
        assert_eq!(data2longdouble("2.5D0").unwrap(), 2.5);
        assert_eq!(data2longdouble(2.5).unwrap(), 2.5);
        assert_eq!(data2longdouble(3).unwrap(), 3.0);

        let values = data2longdouble_array(&[1.0, 2.0, 3.5]).unwrap();
        assert_eq!(
            values,
            vec![
                LongDouble::from(1.0),
                LongDouble::from(2.0),
                LongDouble::from(3.5)
            ]
        );

        let texts = data2longdouble_array(&["1d1", "2E1"]).unwrap();
        assert_eq!(texts, vec![LongDouble::from(10.0), LongDouble::from(20.0)]);
    }

    #[test]
    fn test_longdouble2str_roundtrip() {
        let x = str2longdouble("55000.0000000000123456789").unwrap();
        let text = longdouble2str(x);
        let back = str2longdouble(&text).unwrap();
        assert!((back - x).abs().to_f64() < 1e-25);
    }

    #[test]
    fn test_is_number() {
        assert!(is_number("1.5"));
        assert!(is_number("-2e10"));
        assert!(is_number(" 42 "));
        assert!(is_number("½"));
        assert!(is_number("Ⅻ"));
        assert!(is_number("五"));
        assert!(!is_number("1.0d10"));
        assert!(!is_number("F0"));
        assert!(!is_number("12a"));
        assert!(!is_number(""));
    }
}
