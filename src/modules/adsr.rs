use crate::{
    dsp::{
        envelope::{knob_with_cv, Envelope, EnvelopeKnobs, EnvelopeStage, StageLights},
        trigger::SchmittTrigger,
    },
    modules::{
        layout::{ModuleLayout, ParamConfig, PortInfo},
        module::{port_ids, ModuleIo, ProcessArgs, RackModule},
    },
};

/*
ADSR Module
===========

Wraps the exponential envelope core with the port contract of a modular
host:

    inputs                         outputs
    ──────                         ───────
    Attack CV  ┐                   Envelope   0..10 V
    Decay CV   │ knob + cv/10
    Sustain CV │ clamped [0,1]     lights
    Release CV ┘                   ──────
    Gate       ≥ 1 V = held        Attack / Decay / Sustain / Release
    Trigger    Schmitt 0.1/1.0 V

The module is monophonic: every input reads lane 0.

Per tick:
  1. Read the four knobs, each offset by its CV input.
  2. Threshold the gate; run the trigger through the Schmitt comparator.
  3. Step the envelope core (trigger first, then gate logic).
  4. Publish 10 × level on the output and one light per stage.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdsrParam {
    Attack,
    Decay,
    Sustain,
    Release,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdsrInput {
    Attack,
    Decay,
    Sustain,
    Release,
    Gate,
    Trigger,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdsrOutput {
    Envelope,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdsrLight {
    Attack,
    Decay,
    Sustain,
    Release,
}

port_ids! {
    AdsrParam => ParamId,
    AdsrInput => InputId,
    AdsrOutput => OutputId,
    AdsrLight => LightId,
}

/// Gate voltage at or above which a note counts as held.
pub const GATE_THRESHOLD: f32 = 1.0;
/// Output voltage at full envelope level.
pub const ENVELOPE_VOLTS: f32 = 10.0;

pub static ADSR_LAYOUT: ModuleLayout = ModuleLayout {
    name: "ADSR",
    params: &[
        ParamConfig::new("Attack", 0.0, 1.0, 0.5),
        ParamConfig::new("Decay", 0.0, 1.0, 0.5),
        ParamConfig::new("Sustain", 0.0, 1.0, 0.5),
        ParamConfig::new("Release", 0.0, 1.0, 0.5),
    ],
    inputs: &[
        PortInfo::new("Attack CV"),
        PortInfo::new("Decay CV"),
        PortInfo::new("Sustain CV"),
        PortInfo::new("Release CV"),
        PortInfo::new("Gate"),
        PortInfo::new("Trigger"),
    ],
    outputs: &[PortInfo::new("Envelope")],
    lights: &[
        PortInfo::new("Attack"),
        PortInfo::new("Decay"),
        PortInfo::new("Sustain"),
        PortInfo::new("Release"),
    ],
};

#[inline]
fn read_knob(io: &dyn ModuleIo, param: AdsrParam, cv: AdsrInput) -> f32 {
    knob_with_cv(io.param(param.into()), io.voltage(cv.into(), 0))
}

#[inline]
fn brightness(on: bool) -> f32 {
    if on {
        1.0
    } else {
        0.0
    }
}

#[derive(Debug, Clone)]
pub struct Adsr {
    env: Envelope,
    trigger: SchmittTrigger,
    stage: EnvelopeStage,
}

impl Default for Adsr {
    fn default() -> Self {
        Self::new()
    }
}

impl Adsr {
    pub fn new() -> Self {
        Self {
            env: Envelope::new(),
            trigger: SchmittTrigger::new(),
            stage: EnvelopeStage::Idle,
        }
    }

    /// Envelope level (0.0 to 1.0) after the last tick.
    pub fn level(&self) -> f32 {
        self.env.level()
    }

    pub fn is_decaying(&self) -> bool {
        self.env.is_decaying()
    }

    /// Stage after the last tick.
    pub fn stage(&self) -> EnvelopeStage {
        self.stage
    }

    pub fn lights(&self) -> StageLights {
        self.stage.into()
    }
}

impl RackModule for Adsr {
    fn layout(&self) -> &'static ModuleLayout {
        &ADSR_LAYOUT
    }

    fn process(&mut self, args: &ProcessArgs, io: &mut dyn ModuleIo) {
        let knobs = {
            let io = &*io;
            EnvelopeKnobs::new(
                read_knob(io, AdsrParam::Attack, AdsrInput::Attack),
                read_knob(io, AdsrParam::Decay, AdsrInput::Decay),
                read_knob(io, AdsrParam::Sustain, AdsrInput::Sustain),
                read_knob(io, AdsrParam::Release, AdsrInput::Release),
            )
        };

        let gate = io.voltage(AdsrInput::Gate.into(), 0) >= GATE_THRESHOLD;
        let trig = self.trigger.process(io.voltage(AdsrInput::Trigger.into(), 0));

        self.stage = self.env.step(&knobs, gate, trig, args.sample_time);

        let output = AdsrOutput::Envelope.into();
        if io.is_output_connected(output) {
            io.set_output_channels(output, 1);
            io.set_voltage(output, 0, ENVELOPE_VOLTS * self.env.level());
        }

        let lights = self.lights();
        io.set_light(AdsrLight::Attack.into(), brightness(lights.attack));
        io.set_light(AdsrLight::Decay.into(), brightness(lights.decay));
        io.set_light(AdsrLight::Sustain.into(), brightness(lights.sustain));
        io.set_light(AdsrLight::Release.into(), brightness(lights.release));
    }

    fn reset(&mut self) {
        self.env.reset();
        self.trigger.reset();
        self.stage = EnvelopeStage::Idle;
    }
}
