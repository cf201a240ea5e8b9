//! Benchmarks for ticking the ADSR and VC mixer through a host context.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use cv_modules::{
    modules::{
        adsr::{AdsrInput, AdsrOutput},
        vc_mixer::{MixerInput, MixerOutput, MIXER_CHANNELS},
    },
    Adsr, ModuleContext, ProcessArgs, VcMixer, MAX_CHANNELS,
};

use crate::BLOCK_SIZES;

pub fn bench_modules(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/modules");
    let mut args = ProcessArgs::new(48_000.0);

    for &size in BLOCK_SIZES {
        // === ADSR: gated, output patched ===
        let mut adsr = Adsr::new();
        let mut adsr_ctx = ModuleContext::for_module(&adsr);
        adsr_ctx.connect_output(AdsrOutput::Envelope);
        adsr_ctx.set_input(AdsrInput::Gate, &[10.0]).unwrap();

        group.bench_with_input(BenchmarkId::new("adsr", size), &size, |b, &size| {
            b.iter(|| {
                for _ in 0..size {
                    adsr_ctx.process(&mut adsr, &args);
                    args.advance();
                }
                black_box(adsr_ctx.output(AdsrOutput::Envelope));
            })
        });

        // === Mixer: 4 x 16 lanes with poly CV on every channel ===
        let mut mixer = VcMixer::new();
        let mut mixer_ctx = ModuleContext::for_module(&mixer);
        mixer_ctx.connect_output(MixerOutput::Mix);
        let lanes: Vec<f32> = (0..MAX_CHANNELS).map(|c| c as f32 * 0.3 - 2.0).collect();
        let cv: Vec<f32> = (0..MAX_CHANNELS).map(|c| c as f32 * 0.6).collect();
        for i in 0..MIXER_CHANNELS {
            mixer_ctx.set_input(MixerInput::Channel(i), &lanes).unwrap();
            mixer_ctx.set_input(MixerInput::ChannelCv(i), &cv).unwrap();
            mixer_ctx.connect_output(MixerOutput::Channel(i));
        }
        mixer_ctx.set_input(MixerInput::MixCv, &[8.0]).unwrap();

        group.bench_with_input(BenchmarkId::new("mixer_16_lane", size), &size, |b, &size| {
            b.iter(|| {
                for _ in 0..size {
                    mixer_ctx.process(&mut mixer, &args);
                }
                black_box(mixer_ctx.output(MixerOutput::Mix));
            })
        });

        // === Envelope into mixer channel CV, per sample ===
        mixer_ctx.disconnect_input(MixerInput::MixCv);
        group.bench_with_input(BenchmarkId::new("adsr_into_mixer", size), &size, |b, &size| {
            b.iter(|| {
                for _ in 0..size {
                    adsr_ctx.process(&mut adsr, &args);
                    let env = adsr_ctx
                        .output(AdsrOutput::Envelope)
                        .map(|p| p.voltage(0))
                        .unwrap_or(0.0);
                    mixer_ctx.set_input(MixerInput::ChannelCv(0), &[env]).unwrap();
                    mixer_ctx.process(&mut mixer, &args);
                    args.advance();
                }
                black_box(mixer_ctx.output(MixerOutput::Mix));
            })
        });
    }

    group.finish();
}
