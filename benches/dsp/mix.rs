//! Benchmarks for fader gain, CV attenuation and lane summing.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use cv_modules::dsp::{
    amplify::{apply_gain, attenuate_in_place},
    mix::{fader_gain, sum_in_place},
};

use crate::BLOCK_SIZES;

pub fn bench_mix(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/mix");

    for &size in BLOCK_SIZES {
        let source: Vec<f32> = (0..size).map(|i| (i as f32 * 0.01).sin() * 5.0).collect();
        let cv: Vec<f32> = (0..size).map(|i| (i % 12) as f32).collect();
        let mut buffer = vec![0.0f32; size];
        let mut bus = vec![0.0f32; size];

        group.bench_with_input(BenchmarkId::new("fader", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&source);
                apply_gain(black_box(&mut buffer), fader_gain(black_box(1.2)));
            })
        });

        group.bench_with_input(BenchmarkId::new("attenuate", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&source);
                attenuate_in_place(black_box(&mut buffer), black_box(&cv));
            })
        });

        group.bench_with_input(BenchmarkId::new("sum_4", size), &size, |b, _| {
            b.iter(|| {
                bus.fill(0.0);
                for _ in 0..4 {
                    sum_in_place(black_box(&mut bus), black_box(&source));
                }
            })
        });
    }

    group.finish();
}
