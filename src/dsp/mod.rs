//! Low-level DSP primitives used by the modules.
//!
//! These components are allocation-free and realtime-safe. They stay focused
//! on per-sample math; port access, lane counts and lights live one level up
//! in `modules`.

/// Gain staging and voltage-controlled attenuation.
pub mod amplify;
/// Exponential attack/decay/sustain/release envelope.
pub mod envelope;
/// Fader laws and lane summing.
pub mod mix;
/// Schmitt trigger rising-edge detection.
pub mod trigger;

pub use envelope::{Envelope, EnvelopeKnobs, EnvelopeStage, StageLights};
pub use trigger::SchmittTrigger;
