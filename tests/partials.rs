use approx::assert_relative_eq;
use nalgebra::DMatrix;
use pulsar_utils::derivatives::{check_all_partials, numeric_partials, PartialsParams};
use pulsar_utils::pulsar_errors::PulsarError;
use pulsar_utils::taylor::{taylor_horner_deriv_f64, taylor_horner_f64};

/// Spin phase and frequency as functions of (dt, F0, F1, F2).
fn spin_model(args: &[f64]) -> (Vec<f64>, DMatrix<f64>) {
    let (dt, coeffs) = (args[0], &args[1..]);
    let mut phase_coeffs = vec![0.0];
    phase_coeffs.extend_from_slice(coeffs);

    let phase = taylor_horner_f64(dt, &phase_coeffs);
    let freq = taylor_horner_deriv_f64(dt, &phase_coeffs, 1);
    let fdot = taylor_horner_deriv_f64(dt, &phase_coeffs, 2);

    #[rustfmt::skip]
    let jac = DMatrix::from_row_slice(2, 4, &[
        freq, dt, dt * dt / 2.0, dt.powi(3) / 6.0,
        fdot, 1.0, dt,           dt * dt / 2.0,
    ]);
    (vec![phase, freq], jac)
}

#[test]
fn test_spin_model_partials() {
    let args = [12.5, 29.9, -3.2e-3, 4.0e-6];
    let params = PartialsParams::builder().delta(1e-5).build().unwrap();
    check_all_partials(spin_model, &args, &params).unwrap();

    let njac = numeric_partials(|a| spin_model(a).0, &args, params.delta);
    assert_eq!(njac.shape(), (2, 4));
    assert_relative_eq!(njac[(0, 1)], 12.5, max_relative = 1e-8);
}

#[test]
fn test_spin_model_wrong_sign_is_reported() {
    let wrong = |a: &[f64]| {
        let (values, mut jac) = spin_model(a);
        jac[(1, 2)] = -jac[(1, 2)];
        (values, jac)
    };
    let err = check_all_partials(wrong, &[12.5, 29.9, -3.2e-3, 4.0e-6], &PartialsParams::default())
        .unwrap_err();
    match err {
        PulsarError::PartialsMismatch {
            location,
            fail_fraction,
            ..
        } => {
            assert_eq!(location, (1, 2));
            assert_relative_eq!(fail_fraction, 0.125);
        }
        other => panic!("unexpected error {other}"),
    }
}
