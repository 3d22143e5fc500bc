use approx::assert_relative_eq;
use hifitime::{Epoch, TimeScale};
use pulsar_utils::conversion::str2longdouble;
use pulsar_utils::time::{
    time_from_longdouble, time_from_mjd_string, time_to_longdouble, time_to_mjd_string,
    time_to_mjd_string_array, utc_day_length_seconds, MjdFormat, PulsarTime,
};

#[test]
fn test_toa_strings_survive_roundtrip() {
    let toas = [
        ("53478.2858714195382", 13),
        ("54000.0000000000000", 13),
        ("56789.9999999999884", 13),
        ("58000.500000000", 9),
    ];
    for (text, prec) in toas {
        let t = time_from_mjd_string(text, TimeScale::UTC).unwrap();
        assert_eq!(time_to_mjd_string(&t, prec).unwrap(), text);
    }
}

#[test]
fn test_tdb_strings_use_uniform_split() {
    let t = time_from_mjd_string("55000.123456789012345", TimeScale::TDB)
        .unwrap()
        .with_format(MjdFormat::Mjd);
    assert_eq!(time_to_mjd_string(&t, 15).unwrap(), "55000.123456789012345");
    assert_eq!(
        time_to_mjd_string_array(&[t, t], 6).unwrap(),
        vec!["55000.123457", "55000.123457"]
    );
}

#[test]
fn test_longdouble_path_matches_string_path() {
    let text = "55555.0000000001234567";
    let x = str2longdouble(text).unwrap();

    let from_ld = time_from_longdouble(x, TimeScale::TT).unwrap();
    let from_str = time_from_mjd_string(text, TimeScale::TT).unwrap();
    assert_eq!(from_ld.imjd_fmjd().0, from_str.imjd_fmjd().0);
    assert_relative_eq!(
        from_ld.imjd_fmjd().1.to_f64(),
        from_str.imjd_fmjd().1.to_f64(),
        epsilon = 1e-18
    );

    let back = time_to_longdouble(&from_str).unwrap();
    assert!((back - x).abs().to_f64() < 1e-11 / 86400.0);
}

#[test]
fn test_leap_second_day() {
    // 2016-12-31 ends with a leap second
    assert_eq!(utc_day_length_seconds(57753), 86401.0);
    assert_eq!(utc_day_length_seconds(57754), 86400.0);

    let epoch = Epoch::from_gregorian_utc(2016, 12, 31, 23, 59, 59, 500_000_000);
    let t = PulsarTime::from_epoch(epoch, MjdFormat::PulsarMjd);
    assert_eq!(t.imjd_fmjd().0, 57753);
    assert_eq!(time_to_mjd_string(&t, 9).unwrap(), "57753.999994213");
}

#[test]
fn test_epoch_roundtrip_across_scales() {
    for scale in [TimeScale::UTC, TimeScale::TT, TimeScale::TDB] {
        let t = time_from_mjd_string("56000.25", scale).unwrap();
        let epoch = t.to_epoch().unwrap();
        let back = PulsarTime::from_epoch(epoch, MjdFormat::PulsarMjd);
        assert_eq!(back.scale(), scale);
        assert_eq!(time_to_mjd_string(&back, 10).unwrap(), "56000.2500000000");
    }
}
