//! # High-precision MJD times
//!
//! Pulsar timing needs sub-nanosecond resolution over tens of thousands of
//! days, well beyond what a single `f64` MJD offers. [`PulsarTime`] keeps the
//! time as a two-part Julian date (`jd1 + jd2`), the integer day living in
//! `jd1` and the day fraction in `jd2`, together with its time scale and an
//! [`MjdFormat`] tag.
//!
//! ## Formats
//!
//! * [`MjdFormat::PulsarMjd`] – the tempo convention: the fraction is the UTC
//!   clock reading divided by 86400 s. On a day ending with a leap second the
//!   clock reads `23:59:60.x` and the fraction may go past `1.0`; printed
//!   strings then roll over to the next day.
//! * [`MjdFormat::Mjd`] – a plain uniform Julian-date split.
//!
//! ## Conversions
//!
//! * [`time_from_mjd_string`] / [`time_to_mjd_string`] – exact text round trip.
//! * [`time_to_mjd_string_array`] – vectorised formatting.
//! * [`time_to_longdouble`] / [`time_from_longdouble`] – single [`LongDouble`] MJD.
//! * [`PulsarTime::to_epoch`] / [`PulsarTime::from_epoch`] – `hifitime` interop.
use std::fmt;

use hifitime::{Duration, Epoch, TimeScale};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::constants::{
    IntMJD, DEFAULT_MJD_PRECISION, DJM0, JD, MJD, NANOSECONDS_PER_DAY, NANOSECONDS_PER_DAY_I64,
    SECONDS_PER_DAY,
};
use crate::conversion::longdouble2str;
use crate::longdouble::{ensure_extended_precision, LongDouble};
use crate::pulsar_errors::PulsarError;

const NANOS_PER_SECOND: i64 = 1_000_000_000;
const NANOS_PER_MINUTE: i64 = 60 * NANOS_PER_SECOND;
const NANOS_PER_HOUR: i64 = 60 * NANOS_PER_MINUTE;

/// Digits an `i64` integer day can hold.
const MAX_MJD_DIGITS: usize = 19;

/// How the day fraction of a [`PulsarTime`] is to be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MjdFormat {
    /// UTC clock reading / 86400 s (leap seconds push the fraction past 1).
    PulsarMjd,
    /// Uniform Julian-date split.
    Mjd,
}

/// UTC calendar decomposition of a time, rounded to the nanosecond.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarTime {
    /// Integer MJD of the calendar day
    pub mjd: IntMJD,
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    /// `60` during a leap second
    pub second: u8,
    pub nanosecond: u32,
}

impl CalendarTime {
    /// Clock reading since midnight, in nanoseconds.
    pub fn nanoseconds_of_day(&self) -> i64 {
        self.hour as i64 * NANOS_PER_HOUR
            + self.minute as i64 * NANOS_PER_MINUTE
            + self.second as i64 * NANOS_PER_SECOND
            + self.nanosecond as i64
    }

    /// Clock reading as a fraction of an 86400 s day.
    pub fn day_fraction(&self) -> LongDouble {
        LongDouble::from(self.nanoseconds_of_day()) / NANOSECONDS_PER_DAY
    }
}

/// Length in seconds of the UTC day starting at MJD `imjd`.
///
/// 86401 on days ending with a positive leap second. Days before the leap
/// second era are always 86400 s long.
pub fn utc_day_length_seconds(imjd: IntMJD) -> f64 {
    let leap = |mjd: f64| {
        Epoch::from_mjd_utc(mjd)
            .leap_seconds(true)
            .unwrap_or(0.0)
    };
    SECONDS_PER_DAY + leap(imjd as f64 + 1.5) - leap(imjd as f64 + 0.5)
}

/// A time stored as a two-part Julian date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PulsarTime {
    jd1: f64,
    jd2: f64,
    scale: TimeScale,
    format: MjdFormat,
}

impl PulsarTime {
    /// Build from an integer MJD and a day fraction.
    ///
    /// The fraction is kept as given; normalisation happens on output.
    pub fn from_mjd_parts(imjd: IntMJD, fmjd: MJD, scale: TimeScale, format: MjdFormat) -> Self {
        PulsarTime {
            jd1: DJM0 + imjd as f64,
            jd2: fmjd,
            scale,
            format,
        }
    }

    /// Build from a raw two-part Julian date.
    pub fn from_jd(jd1: JD, jd2: JD, scale: TimeScale, format: MjdFormat) -> Self {
        PulsarTime {
            jd1,
            jd2,
            scale,
            format,
        }
    }

    pub fn jd1(&self) -> JD {
        self.jd1
    }

    pub fn jd2(&self) -> JD {
        self.jd2
    }

    pub fn scale(&self) -> TimeScale {
        self.scale
    }

    pub fn format(&self) -> MjdFormat {
        self.format
    }

    /// Same instant, reinterpreted with another format tag.
    pub fn with_format(self, format: MjdFormat) -> Self {
        PulsarTime { format, ..self }
    }

    /// Integer MJD and fraction in `[0, 1)`, computed without rounding.
    pub fn imjd_fmjd(&self) -> (IntMJD, LongDouble) {
        let total = (LongDouble::from(self.jd1) - DJM0) + self.jd2;
        let day = total.floor();
        (day.to_f64() as i64, total - day)
    }

    /// Split into integer day and clock fraction, keeping leap-second readings
    /// on the day they belong to.
    fn clock_split(&self) -> Result<(i64, LongDouble), PulsarError> {
        let day = LongDouble::from(self.jd1) - DJM0;
        let iday = day.floor();
        let mut imjd = iday.to_f64() as i64;
        let mut frac = (day - iday) + self.jd2;
        check_fraction(frac)?;

        while frac.is_sign_negative() {
            imjd -= 1;
            frac += LongDouble::ONE;
        }
        while frac >= LongDouble::ONE {
            let extra = utc_day_length_seconds(imjd) - SECONDS_PER_DAY;
            if frac < LongDouble::ONE + extra / SECONDS_PER_DAY {
                break;
            }
            imjd += 1;
            frac -= LongDouble::ONE;
        }
        Ok((imjd, frac))
    }

    /// UTC calendar decomposition, rounded to the nanosecond.
    ///
    /// A reading inside a leap second comes back with `second == 60`.
    pub fn utc_calendar(&self) -> Result<CalendarTime, PulsarError> {
        let (mut imjd, frac) = self.clock_split()?;
        let mut ns = (frac * NANOSECONDS_PER_DAY)
            .round()
            .to_i128()
            .ok_or(PulsarError::FractionalDayOutOfRange(frac.to_f64()))? as i64;

        let day_ns = (utc_day_length_seconds(imjd) * 1e9).round() as i64;
        if ns >= day_ns {
            imjd += 1;
            ns -= day_ns;
        }

        let (year, month, day, _, _, _, _) = Epoch::from_mjd_utc(imjd as f64 + 0.5).to_gregorian_utc();
        let (hour, minute, second, nanosecond) = if ns >= NANOSECONDS_PER_DAY_I64 {
            (23, 59, 60, ns - NANOSECONDS_PER_DAY_I64)
        } else {
            (
                ns / NANOS_PER_HOUR,
                (ns % NANOS_PER_HOUR) / NANOS_PER_MINUTE,
                (ns % NANOS_PER_MINUTE) / NANOS_PER_SECOND,
                ns % NANOS_PER_SECOND,
            )
        };

        Ok(CalendarTime {
            mjd: imjd,
            year,
            month,
            day,
            hour: hour as u8,
            minute: minute as u8,
            second: second as u8,
            nanosecond: nanosecond as u32,
        })
    }

    /// Convert to a [`hifitime::Epoch`] in the same time scale.
    pub fn to_epoch(&self) -> Result<Epoch, PulsarError> {
        if self.format == MjdFormat::PulsarMjd && self.scale == TimeScale::UTC {
            let c = self.utc_calendar()?;
            let epoch = if c.second == 60 {
                Epoch::from_gregorian_utc(c.year, c.month, c.day, 23, 59, 59, c.nanosecond)
                    + Duration::from_seconds(1.0)
            } else {
                Epoch::from_gregorian_utc(
                    c.year,
                    c.month,
                    c.day,
                    c.hour,
                    c.minute,
                    c.second,
                    c.nanosecond,
                )
            };
            return Ok(epoch);
        }

        let (imjd, frac) = self.imjd_fmjd();
        let ns = (frac * NANOSECONDS_PER_DAY)
            .round()
            .to_i128()
            .ok_or(PulsarError::FractionalDayOutOfRange(frac.to_f64()))?;
        Ok(Epoch::from_mjd_in_time_scale(imjd as f64, self.scale)
            + Duration::from_total_nanoseconds(ns))
    }

    /// Build from a [`hifitime::Epoch`], keeping its time scale.
    ///
    /// UTC epochs go through the calendar so that the clock reading (and not
    /// the elapsed time) ends up in the fraction.
    pub fn from_epoch(epoch: Epoch, format: MjdFormat) -> Self {
        let scale = epoch.time_scale;
        if scale == TimeScale::UTC {
            let (y, m, d, h, mi, s, ns) = epoch.to_gregorian_utc();
            let imjd = Epoch::from_gregorian_utc_at_noon(y, m, d)
                .to_mjd_utc_days()
                .floor() as i64;
            let clock = CalendarTime {
                mjd: imjd,
                year: y,
                month: m,
                day: d,
                hour: h,
                minute: mi,
                second: s,
                nanosecond: ns,
            };
            return PulsarTime::from_mjd_parts(imjd, clock.day_fraction().to_f64(), scale, format);
        }

        let since_mjd0 = epoch - Epoch::from_mjd_in_time_scale(0.0, scale);
        let total_ns = since_mjd0.total_nanoseconds();
        let day_ns = NANOSECONDS_PER_DAY_I64 as i128;
        let imjd = total_ns.div_euclid(day_ns) as i64;
        let frac = LongDouble::from(total_ns.rem_euclid(day_ns) as i64) / NANOSECONDS_PER_DAY;
        PulsarTime::from_mjd_parts(imjd, frac.to_f64(), scale, format)
    }
}

impl fmt::Display for PulsarTime {
    /// MJD string followed by the time scale; the formatter precision sets
    /// the number of digits.
    ///
    /// A time whose fraction cannot be normalised is written as its raw
    /// two-part Julian date instead.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prec = f.precision().unwrap_or(DEFAULT_MJD_PRECISION);
        match time_to_mjd_string(self, prec) {
            Ok(text) => write!(f, "{text} {}", self.scale),
            Err(_) => write!(f, "JD {} + {} {}", self.jd1, self.jd2, self.scale),
        }
    }
}

fn check_fraction(frac: LongDouble) -> Result<(), PulsarError> {
    if frac.abs() >= LongDouble::from(2.0) || frac.is_nan() {
        return Err(PulsarError::FractionalDayOutOfRange(frac.to_f64()));
    }
    Ok(())
}

/// Bring a fraction in `(-2, 2)` into `[0, 1)`, moving whole days into `imjd`.
fn renormalize(mut imjd: i64, mut frac: LongDouble) -> Result<(i64, LongDouble), PulsarError> {
    check_fraction(frac)?;
    while frac >= LongDouble::ONE {
        imjd += 1;
        frac -= LongDouble::ONE;
    }
    while frac.is_sign_negative() {
        imjd -= 1;
        frac += LongDouble::ONE;
    }
    Ok((imjd, frac))
}

/// Glue an integer day and a fraction into `"<imjd>.<digits>"`.
///
/// Rounding that reaches `1.0` carries into the day.
fn join_mjd(imjd: i64, frac: LongDouble, prec: usize) -> String {
    let text = format!("{frac:.prec$}");
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), ""));
    let carry: i64 = int_part.parse().unwrap_or(0);
    if prec == 0 {
        format!("{}", imjd + carry)
    } else {
        format!("{}.{}", imjd + carry, frac_part)
    }
}

/// Parse an MJD string into a [`PulsarTime`] without losing digits.
///
/// Accepts plain decimals (`"55000.123456789012"`), integers (`"55000"`) and
/// exponential notation with `e` or Fortran `d` markers (`"5.5000123D4"`).
/// Positive exponents are applied by moving the decimal point in the text so
/// the integer day stays exact.
///
/// A negative exponent almost always signals a malformed input: a warning is
/// logged and the whole value is parsed as a single `f64` fraction, which
/// loses precision.
///
/// Arguments
/// ---------
/// * `s`: the MJD text
/// * `scale`: time scale of the resulting time
///
/// Return
/// ------
/// * a [`PulsarTime`] tagged [`MjdFormat::PulsarMjd`]
pub fn time_from_mjd_string(s: &str, scale: TimeScale) -> Result<PulsarTime, PulsarError> {
    ensure_extended_precision()?;
    let invalid = || PulsarError::InvalidMjdString(s.to_string());

    let lowered = s.trim().to_lowercase().replace('d', "e");
    let (negative, body) = match lowered.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, lowered.trim_start_matches('+')),
    };

    let (imjd, fmjd) = match body.split_once('e') {
        Some((num, expon)) => {
            let expon: i32 = expon.parse().map_err(|_| invalid())?;
            if expon < 0 {
                warn!("Likely bogus sci notation input in time_from_mjd_string ('{s}')!");
                let value: f64 = body.parse().map_err(|_| invalid())?;
                (0, value)
            } else {
                let dots = num.bytes().filter(|&b| b == b'.').count();
                if dots > 1 || !num.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
                    return Err(invalid());
                }
                let (imjd_s, fmjd_s) = num.split_once('.').unwrap_or((num, ""));
                if imjd_s.len() + expon as usize > MAX_MJD_DIGITS {
                    return Err(invalid());
                }
                let shift = (expon as usize).min(fmjd_s.len());
                let padding = "0".repeat(expon as usize - shift);
                let imjd: i64 = format!("{imjd_s}{}{padding}", &fmjd_s[..shift])
                    .parse()
                    .map_err(|_| invalid())?;
                let fmjd: f64 = format!("0.{}", &fmjd_s[shift..])
                    .parse()
                    .map_err(|_| invalid())?;
                (imjd, fmjd)
            }
        }
        None => {
            let (imjd_s, fmjd_s) = body.split_once('.').unwrap_or((body, "0"));
            let imjd: i64 = imjd_s.parse().map_err(|_| invalid())?;
            let fmjd: f64 = format!("0.{fmjd_s}").parse().map_err(|_| invalid())?;
            (imjd, fmjd)
        }
    };

    if !fmjd.is_finite() {
        return Err(invalid());
    }

    let (imjd, fmjd) = if negative { (-imjd, -fmjd) } else { (imjd, fmjd) };
    Ok(PulsarTime::from_mjd_parts(imjd, fmjd, scale, MjdFormat::PulsarMjd))
}

/// Build a [`PulsarTime`] from a long double MJD.
///
/// The value goes through its full-precision text form, so it follows the
/// same rules as [`time_from_mjd_string`].
pub fn time_from_longdouble(t: LongDouble, scale: TimeScale) -> Result<PulsarTime, PulsarError> {
    time_from_mjd_string(&longdouble2str(t), scale)
}

/// Print an MJD time with `prec` digits after the decimal point.
///
/// [`MjdFormat::PulsarMjd`] times are rebuilt from their UTC clock reading
/// (nanosecond resolution); [`MjdFormat::Mjd`] times use the uniform split,
/// renormalised into `[0, 1)`.
pub fn time_to_mjd_string(t: &PulsarTime, prec: usize) -> Result<String, PulsarError> {
    ensure_extended_precision()?;
    let (imjd, fmjd) = match t.format {
        MjdFormat::PulsarMjd => {
            let calendar = t.utc_calendar()?;
            (calendar.mjd, calendar.day_fraction())
        }
        MjdFormat::Mjd => {
            let day = LongDouble::from(t.jd1) - DJM0;
            let iday = day.round();
            renormalize(iday.to_f64() as i64, (day - iday) + t.jd2)?
        }
    };
    Ok(join_mjd(imjd, fmjd, prec))
}

/// Print an array of times as MJD strings.
///
/// Each element uses the uniform Julian-date split, whatever its format tag.
pub fn time_to_mjd_string_array(ts: &[PulsarTime], prec: usize) -> Result<Vec<String>, PulsarError> {
    ensure_extended_precision()?;
    ts.iter()
        .map(|t| {
            let day = LongDouble::from(t.jd1) - DJM0;
            let iday = day.trunc();
            let (imjd, fmjd) = renormalize(iday.to_f64() as i64, (day - iday) + t.jd2)?;
            Ok(join_mjd(imjd, fmjd, prec))
        })
        .collect()
}

/// Return a time as a long double MJD.
///
/// `DJM0` is split into integer and fractional parts before the subtraction so
/// that no digits of `jd2` are lost to the large `jd1`.
pub fn time_to_longdouble(t: &PulsarTime) -> Result<LongDouble, PulsarError> {
    ensure_extended_precision()?;
    let i_djm0 = DJM0.floor();
    let f_djm0 = DJM0 - i_djm0;
    Ok((LongDouble::from(t.jd1) - i_djm0) + (LongDouble::from(t.jd2) - f_djm0))
}

#[cfg(test)]
mod time_test {
    use super::*;
    use approx::assert_relative_eq;
    use std::io;
    use std::sync::{Arc, Mutex};

    fn roundtrip(s: &str, prec: usize) -> String {
        let t = time_from_mjd_string(s, TimeScale::UTC).unwrap();
        time_to_mjd_string(&t, prec).unwrap()
    }

    #[test]
    fn test_mjd_string_roundtrip() {
        assert_eq!(roundtrip("55000.0000000000", 10), "55000.0000000000");
        assert_eq!(roundtrip("55000.123456789012", 12), "55000.123456789012");
        assert_eq!(roundtrip("55000", 3), "55000.000");
        assert_eq!(roundtrip("55000.7", 0), "55001");
    }

    #[test]
    fn test_mjd_string_exponent() {
        let t = time_from_mjd_string("5.5000123D4", TimeScale::UTC).unwrap();
        let (imjd, fmjd) = t.imjd_fmjd();
        assert_eq!(imjd, 55000);
        assert_relative_eq!(fmjd.to_f64(), 0.123, max_relative = 1e-14);

        assert_eq!(roundtrip("5.5e4", 2), "55000.00");
        assert_eq!(roundtrip("5.50001e+4", 1), "55000.1");
    }

    /// Writer collecting formatted log events for inspection.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    #[test]
    fn test_mjd_string_negative_exponent_degrades() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let t = tracing::subscriber::with_default(subscriber, || {
            time_from_mjd_string("5.5e-1", TimeScale::UTC).unwrap()
        });
        let (imjd, fmjd) = t.imjd_fmjd();
        assert_eq!(imjd, 0);
        assert_relative_eq!(fmjd.to_f64(), 0.55);

        let logged = logs.contents();
        assert!(logged.contains("WARN"));
        assert!(logged.contains("Likely bogus sci notation input"));
        assert!(logged.contains("5.5e-1"));
    }

    #[test]
    fn test_positive_exponent_does_not_warn() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            time_from_mjd_string("5.5e4", TimeScale::UTC).unwrap()
        });
        assert!(logs.contents().is_empty());
    }

    #[test]
    fn test_mjd_string_invalid() {
        assert_eq!(
            time_from_mjd_string("fifty", TimeScale::UTC),
            Err(PulsarError::InvalidMjdString("fifty".into()))
        );
        assert!(time_from_mjd_string("55000.1.2", TimeScale::UTC).is_err());
        assert!(time_from_mjd_string("5.5eX", TimeScale::UTC).is_err());
        assert_eq!(
            time_from_mjd_string("5.\u{f1}5e1", TimeScale::UTC),
            Err(PulsarError::InvalidMjdString("5.\u{f1}5e1".into()))
        );
        assert!(time_from_mjd_string("5.5.5e1", TimeScale::UTC).is_err());
    }

    #[test]
    fn test_mjd_string_huge_exponent() {
        assert_eq!(
            time_from_mjd_string("1e2000000000", TimeScale::UTC),
            Err(PulsarError::InvalidMjdString("1e2000000000".into()))
        );
        assert!(time_from_mjd_string("5.5e18", TimeScale::UTC).is_ok());
        assert!(time_from_mjd_string("5.5e19", TimeScale::UTC).is_err());
    }

    #[test]
    fn test_negative_mjd_string() {
        let t = time_from_mjd_string("-5.25", TimeScale::TT).unwrap();
        let (imjd, fmjd) = t.imjd_fmjd();
        assert_eq!(imjd, -6);
        assert_eq!(fmjd, 0.75);
    }

    #[test]
    fn test_uniform_renormalisation() {
        let later = PulsarTime::from_mjd_parts(55000, 1.25, TimeScale::TT, MjdFormat::Mjd);
        assert_eq!(time_to_mjd_string(&later, 3).unwrap(), "55001.250");

        let earlier = PulsarTime::from_mjd_parts(55000, -0.25, TimeScale::TT, MjdFormat::Mjd);
        assert_eq!(time_to_mjd_string(&earlier, 3).unwrap(), "54999.750");

        let bogus = PulsarTime::from_mjd_parts(55000, 2.5, TimeScale::TT, MjdFormat::Mjd);
        assert_eq!(
            time_to_mjd_string(&bogus, 3),
            Err(PulsarError::FractionalDayOutOfRange(2.5))
        );
    }

    #[test]
    fn test_mjd_string_array() {
        let times = [
            PulsarTime::from_mjd_parts(55000, 0.5, TimeScale::TT, MjdFormat::Mjd),
            PulsarTime::from_mjd_parts(55000, 1.75, TimeScale::TT, MjdFormat::Mjd),
            PulsarTime::from_mjd_parts(55000, -0.5, TimeScale::TT, MjdFormat::PulsarMjd),
        ];
        let strings = time_to_mjd_string_array(&times, 4).unwrap();
        assert_eq!(strings, vec!["55000.5000", "55001.7500", "54999.5000"]);
    }

    #[test]
    fn test_longdouble_conversions() {
        let t = time_from_mjd_string("55000.123456789012345", TimeScale::UTC).unwrap();
        let ld = time_to_longdouble(&t).unwrap();
        assert_eq!(ld.floor(), 55000.0);
        assert_relative_eq!(
            (ld - 55000.0).to_f64(),
            0.123456789012345,
            max_relative = 1e-15
        );

        let x: LongDouble = "55000.25".parse().unwrap();
        let back = time_from_longdouble(x, TimeScale::TDB).unwrap();
        assert_eq!(back.scale(), TimeScale::TDB);
        assert_eq!(time_to_mjd_string(&back, 6).unwrap(), "55000.250000");
    }

    #[test]
    fn test_leap_second_day() {
        // 2016-12-31 ended with a leap second
        assert_eq!(utc_day_length_seconds(57753), 86401.0);
        assert_eq!(utc_day_length_seconds(57754), 86400.0);

        let t = PulsarTime::from_mjd_parts(
            57753,
            1.0 + 0.5 / SECONDS_PER_DAY,
            TimeScale::UTC,
            MjdFormat::PulsarMjd,
        );
        let c = t.utc_calendar().unwrap();
        assert_eq!((c.year, c.month, c.day), (2016, 12, 31));
        assert_eq!((c.hour, c.minute, c.second), (23, 59, 60));
        assert_eq!(c.nanosecond, 500_000_000);

        // pulsar MJD puts the leap second on the following day
        assert_eq!(time_to_mjd_string(&t, 9).unwrap(), "57754.000005787");
    }

    #[test]
    fn test_calendar_rolls_over_on_normal_day() {
        let t = PulsarTime::from_mjd_parts(
            55000,
            1.0 + 0.5 / SECONDS_PER_DAY,
            TimeScale::UTC,
            MjdFormat::PulsarMjd,
        );
        let c = t.utc_calendar().unwrap();
        assert_eq!(c.mjd, 55001);
        assert_eq!((c.hour, c.minute, c.second), (0, 0, 0));
        assert_eq!(c.nanosecond, 500_000_000);
    }

    #[test]
    fn test_epoch_interop_utc() {
        let epoch = Epoch::from_gregorian_utc(2009, 6, 18, 12, 0, 0, 0);
        let t = PulsarTime::from_epoch(epoch, MjdFormat::PulsarMjd);
        assert_eq!(time_to_mjd_string(&t, 3).unwrap(), "55000.500");

        let parsed = time_from_mjd_string("55000.5", TimeScale::UTC).unwrap();
        assert_eq!(parsed.to_epoch().unwrap(), epoch);
    }

    #[test]
    fn test_display() {
        let t = time_from_mjd_string("55000.25", TimeScale::TDB).unwrap();
        assert_eq!(format!("{t:.4}"), "55000.2500 TDB");
        assert_eq!(t.to_string(), "55000.250000000000000 TDB");

        // out-of-range fraction falls back to the raw Julian date
        let bogus = PulsarTime::from_mjd_parts(55000, 5.0, TimeScale::TT, MjdFormat::Mjd);
        assert_eq!(bogus.to_string(), "JD 2455000.5 + 5 TT");
    }

    #[test]
    fn test_epoch_interop_tt() {
        let epoch =
            Epoch::from_mjd_in_time_scale(55000.0, TimeScale::TT) + Duration::from_seconds(3600.0);
        let t = PulsarTime::from_epoch(epoch, MjdFormat::Mjd);
        assert_eq!(t.scale(), TimeScale::TT);
        assert_eq!(time_to_mjd_string(&t, 9).unwrap(), "55000.041666667");
        assert_eq!(t.to_epoch().unwrap(), epoch);
    }
}
