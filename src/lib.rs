pub mod dsp;
pub mod error; // Host-boundary errors
pub mod modules; // Envelope and mixer modules plus the host contract
pub mod rack; // Reference in-memory host

pub use error::RackError;
pub use modules::{
    adsr::Adsr,
    module::{InputId, LightId, ModuleIo, OutputId, ParamId, ProcessArgs, RackModule},
    vc_mixer::VcMixer,
};
pub use rack::{context::ModuleContext, poly::PolyVoltage};

/// Maximum number of lanes a polyphonic port can carry.
pub const MAX_CHANNELS: usize = 16;
/// Knob positions below this are treated as infinitely fast stages.
pub(crate) const MIN_KNOB: f32 = 1e-4;
