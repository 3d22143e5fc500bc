use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use pulsar_utils::taylor::{taylor_horner, taylor_horner_deriv_f64, taylor_horner_f64};
use pulsar_utils::units::{Scalar, Unit};

/// Spin coefficients F0..F(n-1), decreasing in magnitude like real timing models.
fn spin_coeffs(rng: &mut StdRng, n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| rng.random_range(-1.0..1.0) * 10f64.powi(-(15 * i as i32)) * 100.0)
        .collect()
}

/// Phase over ten years of offsets (in seconds) with 12 spin terms.
fn bench_plain(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0x5EED);
    let coeffs = spin_coeffs(&mut rng, 12);
    let samples = 10_000usize;

    c.bench_function("taylor_horner/f64_12_terms", |b| {
        b.iter_batched(
            || {
                (0..samples)
                    .map(|_| rng.random_range(-1.6e8..1.6e8))
                    .collect::<Vec<f64>>()
            },
            |dts| {
                for dt in dts {
                    black_box(taylor_horner_f64(black_box(dt), &coeffs));
                }
            },
            BatchSize::LargeInput,
        )
    });

    c.bench_function("taylor_horner/f64_deriv_12_terms", |b| {
        b.iter(|| black_box(taylor_horner_deriv_f64(black_box(3.1e7), &coeffs, 1)))
    });
}

/// Same series with units on every coefficient: F0 in Hz, F1 in Hz/s, …
fn bench_units(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0xF00D);
    let mut coeffs = vec![Scalar::quantity(0.0, Unit::dimensionless())];
    coeffs.extend(
        spin_coeffs(&mut rng, 6)
            .into_iter()
            .enumerate()
            .map(|(i, v)| Scalar::quantity(v, Unit::hertz().powi(i as i8 + 1))),
    );
    let dt = Scalar::quantity(3.1e7, Unit::second());

    c.bench_function("taylor_horner/scalar_units_7_terms", |b| {
        b.iter(|| black_box(taylor_horner(black_box(dt), &coeffs).ok()))
    });
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_plain, bench_units
);
criterion_main!(benches);
