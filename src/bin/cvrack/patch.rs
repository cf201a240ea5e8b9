//! The demo patch: a gate clock drives the ADSR, whose envelope opens a
//! three-voice chord on mixer channel 1. A mono drone sits on channel 2.

use std::f32::consts::TAU;

use cv_modules::{
    modules::{
        adsr::{AdsrInput, AdsrOutput},
        vc_mixer::{MixerInput, MixerOutput},
    },
    rack::ParamReceiver,
    Adsr, InputId, ModuleContext, PolyVoltage, ProcessArgs, VcMixer,
};

/// Chord on mixer channel 1 (A3, C#4, E4).
const CHORD_HZ: [f32; 3] = [220.0, 277.18, 329.63];
/// Drone on mixer channel 2 (A2).
const DRONE_HZ: f32 = 110.0;
/// Peak oscillator voltage.
const OSC_VOLTS: f32 = 5.0;
const DRONE_VOLTS: f32 = 1.0;
const GATE_VOLTS: f32 = 10.0;
/// Volts to full-scale audio.
const AUDIO_SCALE: f32 = 0.04;

/// Feed lanes into an input every tick. Callers pass at most three lanes.
#[inline]
fn patch_lanes(ctx: &mut ModuleContext, id: impl Into<InputId>, lanes: &[f32]) {
    if let Some(port) = ctx.input_mut(id) {
        port.set_channels(lanes.len());
        for (c, &volts) in lanes.iter().enumerate() {
            port.set_voltage(c, volts);
        }
    }
}

/// Pulse clock producing one gate per beat.
#[derive(Debug, Clone, Copy)]
pub struct GateClock {
    period: f32,
    high_for: f32,
    position: f32,
}

impl GateClock {
    pub fn new(bpm: f32, gate_length: f32) -> Self {
        let period = 60.0 / bpm.max(1.0);
        Self {
            period,
            high_for: period * gate_length.clamp(0.0, 1.0),
            position: 0.0,
        }
    }

    /// Advance by `dt` seconds and report whether the gate is high.
    #[inline]
    pub fn tick(&mut self, dt: f32) -> bool {
        let high = self.position < self.high_for;
        self.position += dt;
        if self.position >= self.period {
            self.position -= self.period;
        }
        high
    }
}

pub struct DemoPatch {
    pub adsr: Adsr,
    pub adsr_ctx: ModuleContext,
    pub mixer: VcMixer,
    pub mixer_ctx: ModuleContext,
    args: ProcessArgs,
    clock: GateClock,
    chord_phase: [f32; 3],
    drone_phase: f32,
}

impl DemoPatch {
    pub fn new(sample_rate: f32, bpm: f32, gate_length: f32) -> Self {
        let adsr = Adsr::new();
        let mut adsr_ctx = ModuleContext::for_module(&adsr);
        adsr_ctx.connect_output(AdsrOutput::Envelope);

        let mixer = VcMixer::new();
        let mut mixer_ctx = ModuleContext::for_module(&mixer);
        mixer_ctx.connect_output(MixerOutput::Mix);

        Self {
            adsr,
            adsr_ctx,
            mixer,
            mixer_ctx,
            args: ProcessArgs::new(sample_rate),
            clock: GateClock::new(bpm, gate_length),
            chord_phase: [0.0; 3],
            drone_phase: 0.0,
        }
    }

    /// Drain pending parameter changes for both modules.
    pub fn apply_changes(
        &mut self,
        adsr_rx: &mut impl ParamReceiver,
        mixer_rx: &mut impl ParamReceiver,
    ) -> usize {
        self.adsr_ctx.apply_param_changes(adsr_rx) + self.mixer_ctx.apply_param_changes(mixer_rx)
    }

    /// Run both modules for one sample and return the mono audio value.
    pub fn tick(&mut self) -> f32 {
        let dt = self.args.sample_time;

        let gate = if self.clock.tick(dt) { GATE_VOLTS } else { 0.0 };
        if let Some(port) = self.adsr_ctx.input_mut(AdsrInput::Gate) {
            *port = PolyVoltage::mono(gate);
        }
        self.adsr_ctx.process(&mut self.adsr, &self.args);

        let envelope = self
            .adsr_ctx
            .output(AdsrOutput::Envelope)
            .map(|port| port.voltage(0))
            .unwrap_or(0.0);

        let mut chord = [0.0f32; 3];
        for ((lane, phase), hz) in chord
            .iter_mut()
            .zip(self.chord_phase.iter_mut())
            .zip(CHORD_HZ)
        {
            *lane = OSC_VOLTS * (*phase * TAU).sin();
            *phase = (*phase + hz * dt).fract();
        }
        let drone = DRONE_VOLTS * (self.drone_phase * TAU).sin();
        self.drone_phase = (self.drone_phase + DRONE_HZ * dt).fract();

        patch_lanes(&mut self.mixer_ctx, MixerInput::Channel(0), &chord);
        patch_lanes(&mut self.mixer_ctx, MixerInput::ChannelCv(0), &[envelope]);
        patch_lanes(&mut self.mixer_ctx, MixerInput::Channel(1), &[drone]);
        self.mixer_ctx.process(&mut self.mixer, &self.args);

        self.args.advance();

        let sum: f32 = self
            .mixer_ctx
            .output(MixerOutput::Mix)
            .map(|port| port.lanes().iter().sum())
            .unwrap_or(0.0);
        (sum * AUDIO_SCALE).clamp(-1.0, 1.0)
    }
}
