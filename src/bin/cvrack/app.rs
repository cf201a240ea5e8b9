//! Audio device setup and the realtime callback.

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, error, info};

use cv_modules::{
    dsp::mix::gain_to_db,
    modules::{adsr::AdsrParam, vc_mixer::MixerParam},
    rack::{param_queue, ParamQueue},
};

use super::{console, patch::DemoPatch, Args};

/// Capacity of each module's parameter queue.
const QUEUE_CAPACITY: usize = 256;

/// Shared audio state
struct AudioState {
    patch: DemoPatch,
    adsr_rx: ParamQueue,
    mixer_rx: ParamQueue,
    frames: u64,
}

pub fn run(args: &Args) -> EyreResult<()> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let config = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;

    let sample_rate = config.sample_rate().0 as f32;
    let channels = config.channels() as usize;

    info!(
        host = ?host.id(),
        device = %device.name().unwrap_or_else(|_| "unknown".into()),
        sample_rate,
        channels,
        "audio output"
    );
    info!(
        bpm = args.bpm,
        gate_length = args.gate_length,
        master_db = gain_to_db(args.master),
        "patch: clock -> ADSR -> Ch 1 CV, chord -> Ch 1, drone -> Ch 2"
    );

    let mut patch = DemoPatch::new(sample_rate, args.bpm, args.gate_length);
    patch.adsr_ctx.set_param(AdsrParam::Attack, args.attack)?;
    patch.adsr_ctx.set_param(AdsrParam::Decay, args.decay)?;
    patch.adsr_ctx.set_param(AdsrParam::Sustain, args.sustain)?;
    patch.adsr_ctx.set_param(AdsrParam::Release, args.release)?;
    patch.mixer_ctx.set_param(MixerParam::MixLevel, args.master)?;

    let (adsr_tx, adsr_rx) = param_queue(patch.adsr_ctx.layout(), QUEUE_CAPACITY);
    let (mixer_tx, mixer_rx) = param_queue(patch.mixer_ctx.layout(), QUEUE_CAPACITY);

    // Wrap in Arc<Mutex> for sharing with audio thread
    let state = Arc::new(Mutex::new(AudioState {
        patch,
        adsr_rx,
        mixer_rx,
        frames: 0,
    }));

    let state_clone = state.clone();
    let stream = device
        .build_output_stream(
            &config.into(),
            move |data: &mut [f32], _| {
                let Ok(mut state) = state_clone.lock() else {
                    data.fill(0.0);
                    return;
                };

                // Destructure to allow simultaneous mutable borrows
                let AudioState {
                    patch,
                    adsr_rx,
                    mixer_rx,
                    frames,
                } = &mut *state;

                patch.apply_changes(adsr_rx, mixer_rx);

                // Copy to output (mono to all channels)
                for frame in data.chunks_mut(channels) {
                    frame.fill(patch.tick());
                    *frames += 1;
                }
            },
            |err| error!(%err, "audio stream error"),
            None,
        )
        .wrap_err("failed to build output stream")?;

    stream.play().wrap_err("failed to start output stream")?;

    match args.duration {
        Some(seconds) => {
            info!(seconds, "playing");
            std::thread::sleep(Duration::from_secs_f32(seconds.max(0.0)));
        }
        None => console::run(vec![adsr_tx, mixer_tx]).wrap_err("failed to read commands")?,
    }

    drop(stream);
    if let Ok(state) = state.lock() {
        debug!(frames = state.frames, "stopped");
    }
    Ok(())
}
