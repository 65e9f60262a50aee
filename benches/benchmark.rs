//! Benchmark to measure (and then optimize) the generation of the escape-time
//! field, which dominates the cost of a render.
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use julia_renderer::fractals::{
    escape_time::generate_escape_time_field, julia::FieldParams, recurrence::RecurrenceRule,
};

fn benchmark(c: &mut Criterion) {
    let params = FieldParams {
        resolution: [200, 200],
        ..FieldParams::default()
    };

    c.bench_function("julia_field_200x200", |b| {
        b.iter(|| black_box(params.generate().unwrap()));
    });

    c.bench_function("julia_field_closure_200x200", |b| {
        let rule = |z: num::complex::Complex64, constant: num::complex::Complex64| z * z + constant;
        b.iter(|| {
            black_box(
                generate_escape_time_field(&rule, params.constant(), 200, 200, 1.0, 300).unwrap(),
            )
        });
    });

    c.bench_function("burning_ship_field_200x200", |b| {
        b.iter(|| {
            black_box(
                generate_escape_time_field(
                    &RecurrenceRule::BurningShip,
                    params.constant(),
                    200,
                    200,
                    1.0,
                    300,
                )
                .unwrap(),
            )
        });
    });
}

criterion_group!(benches, benchmark);
criterion_main!(benches);
