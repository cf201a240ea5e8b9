use std::f32::consts::SQRT_2;

use crate::{
    dsp::{
        amplify::{apply_gain, attenuate_in_place},
        mix::{fader_gain, sum_in_place},
    },
    modules::{
        layout::{ModuleLayout, ParamConfig, PortInfo},
        module::{InputId, ModuleIo, OutputId, ParamId, ProcessArgs, RackModule},
    },
    MAX_CHANNELS,
};

/*
Polyphonic VC Mixer
===================

Four polyphonic channels summed into one polyphonic mix. Each channel has a
fader and a CV-controlled attenuator; the mix has a master fader and its own
CV attenuator.

    ch1 in ──→ [fader²] ──→ [VCA ← ch1 cv] ──┬──→ ch1 out
                                             │
    ch2 in ──→   ...                         ├──→ Σ ──→ [master] ──→ [VCA ← mix cv] ──→ mix out
    ch3 in ──→   ...                         │
    ch4 in ──→   ...                       ──┘

Lane Counts
-----------

Every channel keeps the lane count of its own input. The mix carries as many
lanes as the widest connected channel, and at least one:

    ch1: 3 lanes   ─┐
    ch2: (unpatched)│   mix: 6 lanes
    ch3: 6 lanes   ─┤   (lanes 3..5 only contain ch3)
    ch4: 1 lane    ─┘   (ch4's single lane adds to lane 0 only)

A mono channel is NOT spread across the other lanes of the mix; lane c of
the mix is the sum of lane c of each channel.

CV Lanes
--------

A CV input is read per audio lane with mono broadcast: a single-lane CV
scales every lane of its channel, a polyphonic CV scales lane by lane, and
lanes beyond a polyphonic CV's count read 0 V (silencing those lanes).

Unpatched Ports
---------------

  - An unpatched channel input is skipped entirely: it adds nothing and its
    channel output is left as it was.
  - An unpatched CV leaves the channel at fader gain.
  - Outputs without a downstream cable are not computed.
*/

/// Number of input channels.
pub const MIXER_CHANNELS: usize = 4;

/// Mixer parameters: the master fader, then one fader per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MixerParam {
    MixLevel,
    Level(usize),
}

/// Mixer inputs, in layout order: master CV, channel inputs, channel CVs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MixerInput {
    MixCv,
    Channel(usize),
    ChannelCv(usize),
}

/// Mixer outputs: the mix, then one direct output per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MixerOutput {
    Mix,
    Channel(usize),
}

/// Index of channel `i` in a block of per-channel entries starting at
/// `first`. Channels past the last one map beyond every layout, so the
/// host rejects or ignores them instead of reaching a neighbouring port.
#[inline]
const fn channel_slot(first: usize, i: usize) -> usize {
    if i < MIXER_CHANNELS {
        first + i
    } else {
        usize::MAX
    }
}

impl From<MixerParam> for ParamId {
    fn from(param: MixerParam) -> Self {
        match param {
            MixerParam::MixLevel => ParamId(0),
            MixerParam::Level(i) => ParamId(channel_slot(1, i)),
        }
    }
}

impl From<MixerInput> for InputId {
    fn from(input: MixerInput) -> Self {
        match input {
            MixerInput::MixCv => InputId(0),
            MixerInput::Channel(i) => InputId(channel_slot(1, i)),
            MixerInput::ChannelCv(i) => InputId(channel_slot(1 + MIXER_CHANNELS, i)),
        }
    }
}

impl From<MixerOutput> for OutputId {
    fn from(output: MixerOutput) -> Self {
        match output {
            MixerOutput::Mix => OutputId(0),
            MixerOutput::Channel(i) => OutputId(channel_slot(1, i)),
        }
    }
}

pub static VC_MIXER_LAYOUT: ModuleLayout = ModuleLayout {
    name: "VC Mixer",
    params: &[
        // x^1 scaling up to +6 dB
        ParamConfig::new("Master level", 0.0, 2.0, 1.0).with_display(" dB", -10.0, 20.0),
        // x^2 scaling up to +6 dB
        ParamConfig::new("Ch 1 level", 0.0, SQRT_2, 1.0).with_display(" dB", -10.0, 40.0),
        ParamConfig::new("Ch 2 level", 0.0, SQRT_2, 1.0).with_display(" dB", -10.0, 40.0),
        ParamConfig::new("Ch 3 level", 0.0, SQRT_2, 1.0).with_display(" dB", -10.0, 40.0),
        ParamConfig::new("Ch 4 level", 0.0, SQRT_2, 1.0).with_display(" dB", -10.0, 40.0),
    ],
    inputs: &[
        PortInfo::new("Mix CV"),
        PortInfo::new("Ch 1"),
        PortInfo::new("Ch 2"),
        PortInfo::new("Ch 3"),
        PortInfo::new("Ch 4"),
        PortInfo::new("Ch 1 CV"),
        PortInfo::new("Ch 2 CV"),
        PortInfo::new("Ch 3 CV"),
        PortInfo::new("Ch 4 CV"),
    ],
    outputs: &[
        PortInfo::new("Mix"),
        PortInfo::new("Ch 1"),
        PortInfo::new("Ch 2"),
        PortInfo::new("Ch 3"),
        PortInfo::new("Ch 4"),
    ],
    lights: &[],
};

/// Read `channels` lanes of a CV input with mono broadcast.
#[inline]
fn read_cv(io: &dyn ModuleIo, input: InputId, channels: usize) -> [f32; MAX_CHANNELS] {
    let mut cv = [0.0; MAX_CHANNELS];
    for (c, volts) in cv[..channels].iter_mut().enumerate() {
        *volts = io.poly_voltage(input, c);
    }
    cv
}

#[inline]
fn publish(io: &mut dyn ModuleIo, output: OutputId, lanes: &[f32]) {
    io.set_output_channels(output, lanes.len());
    for (c, &volts) in lanes.iter().enumerate() {
        io.set_voltage(output, c, volts);
    }
}

/// Four-channel polyphonic mixer. Holds no state between ticks.
#[derive(Debug, Clone, Copy, Default)]
pub struct VcMixer;

impl VcMixer {
    pub fn new() -> Self {
        Self
    }
}

impl RackModule for VcMixer {
    fn layout(&self) -> &'static ModuleLayout {
        &VC_MIXER_LAYOUT
    }

    fn process(&mut self, _args: &ProcessArgs, io: &mut dyn ModuleIo) {
        let mut mix = [0.0f32; MAX_CHANNELS];
        let mut max_channels = 1;

        for i in 0..MIXER_CHANNELS {
            let input = MixerInput::Channel(i).into();
            if !io.is_input_connected(input) {
                continue;
            }

            let channels = io.input_channels(input).min(MAX_CHANNELS);
            max_channels = max_channels.max(channels);

            let mut lanes = [0.0f32; MAX_CHANNELS];
            for (c, lane) in lanes[..channels].iter_mut().enumerate() {
                *lane = io.voltage(input, c);
            }
            let lanes = &mut lanes[..channels];

            apply_gain(lanes, fader_gain(io.param(MixerParam::Level(i).into())));

            let cv_input = MixerInput::ChannelCv(i).into();
            if io.is_input_connected(cv_input) {
                let cv = read_cv(io, cv_input, channels);
                attenuate_in_place(lanes, &cv[..channels]);
            }

            let output = MixerOutput::Channel(i).into();
            if io.is_output_connected(output) {
                publish(io, output, lanes);
            }

            sum_in_place(&mut mix[..channels], lanes);
        }

        let output = MixerOutput::Mix.into();
        if io.is_output_connected(output) {
            let mix = &mut mix[..max_channels];
            apply_gain(mix, io.param(MixerParam::MixLevel.into()));

            let cv_input = MixerInput::MixCv.into();
            if io.is_input_connected(cv_input) {
                let cv = read_cv(io, cv_input, max_channels);
                attenuate_in_place(mix, &cv[..max_channels]);
            }

            publish(io, output, mix);
        }
    }
}
