//! Benchmarks for the exponential ADSR core.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use cv_modules::dsp::envelope::{Envelope, EnvelopeKnobs};

use crate::BLOCK_SIZES;

const SAMPLE_TIME: f32 = 1.0 / 48_000.0;

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");
    let knobs = EnvelopeKnobs::new(0.5, 0.5, 0.7, 0.5);

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Attack phase (ramping up)
        let mut env = Envelope::new();
        group.bench_with_input(BenchmarkId::new("attack", size), &size, |b, _| {
            b.iter(|| {
                env.retrigger();
                env.render(black_box(&mut buffer), &knobs, true, SAMPLE_TIME);
            })
        });

        // Sustain phase (holding steady)
        let mut env = Envelope::new();
        let fast = EnvelopeKnobs::new(0.0, 0.0, 0.7, 0.5);
        env.step(&fast, true, false, SAMPLE_TIME);
        env.step(&fast, true, false, SAMPLE_TIME);
        group.bench_with_input(BenchmarkId::new("sustain", size), &size, |b, _| {
            b.iter(|| {
                env.render(black_box(&mut buffer), &knobs, true, SAMPLE_TIME);
            })
        });

        // Release phase (ramping down)
        let mut env = Envelope::new();
        group.bench_with_input(BenchmarkId::new("release", size), &size, |b, _| {
            b.iter(|| {
                env.step(&fast, true, false, SAMPLE_TIME);
                env.render(black_box(&mut buffer), &knobs, false, SAMPLE_TIME);
            })
        });
    }

    group.finish();
}
