//! Criterion benchmarks for chasm-core DSP primitives
//!
//! Run with: cargo bench -p chasm-core
#![allow(missing_docs)]

use chasm_core::{
    AllpassFilter, BUTTERWORTH_Q, Biquad, FilterType, ParameterSmoother, SimpleFilter,
    high_shelf_coefficients,
};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

const SAMPLE_RATE: f64 = 48000.0;
const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512, 1024];

fn generate_test_signal(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.5
        })
        .collect()
}

fn bench_allpass(c: &mut Criterion) {
    let mut group = c.benchmark_group("AllpassFilter");

    for &block_size in BLOCK_SIZES {
        let input = generate_test_signal(block_size);

        group.bench_with_input(
            BenchmarkId::new("process", block_size),
            &block_size,
            |b, _| {
                let mut allpass = AllpassFilter::<f32>::new(SAMPLE_RATE, 100.0);
                allpass.set_delay_time(29.1);
                allpass.set_feedback(0.7);
                b.iter(|| {
                    for &sample in &input {
                        black_box(allpass.process_sample(black_box(sample)));
                    }
                });
            },
        );
    }

    group.finish();
}

fn bench_biquad(c: &mut Criterion) {
    let mut group = c.benchmark_group("Biquad");

    let coefficients = high_shelf_coefficients(3000.0, BUTTERWORTH_Q, 6.0, SAMPLE_RATE);

    for &block_size in BLOCK_SIZES {
        let input = generate_test_signal(block_size);

        group.bench_with_input(
            BenchmarkId::new("process", block_size),
            &block_size,
            |b, _| {
                let mut biquad = Biquad::<f32>::with_coefficients(coefficients);
                b.iter(|| {
                    for &sample in &input {
                        black_box(biquad.process_sample(black_box(sample)));
                    }
                });
            },
        );
    }

    // Shelf redesign cost (paid every 32 samples while brightness moves)
    group.bench_function("shelf_coefficient_calc", |b| {
        b.iter(|| {
            black_box(high_shelf_coefficients(
                black_box(3000.0),
                black_box(BUTTERWORTH_Q),
                black_box(4.5),
                black_box(SAMPLE_RATE),
            ))
        });
    });

    group.finish();
}

fn bench_simple_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("SimpleFilter");

    for &block_size in BLOCK_SIZES {
        let input = generate_test_signal(block_size);

        group.bench_with_input(
            BenchmarkId::new("process", block_size),
            &block_size,
            |b, _| {
                let mut filter = SimpleFilter::<f32>::new(FilterType::HighPass, SAMPLE_RATE);
                filter.set_cutoff_percentage(30.0);
                b.iter(|| {
                    for &sample in &input {
                        black_box(filter.process_sample(black_box(sample)));
                    }
                });
            },
        );
    }

    group.finish();
}

fn bench_smoother(c: &mut Criterion) {
    let mut group = c.benchmark_group("ParameterSmoother");

    group.bench_function("next_value_1024", |b| {
        let mut smoother = ParameterSmoother::with_ramp(0.0_f32, SAMPLE_RATE, 20.0);
        let mut flip = false;
        b.iter(|| {
            flip = !flip;
            smoother.set_target_value(if flip { 1.0 } else { 0.0 });
            for _ in 0..1024 {
                black_box(smoother.next_value());
            }
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_allpass,
    bench_biquad,
    bench_simple_filter,
    bench_smoother
);
criterion_main!(benches);
