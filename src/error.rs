//! Errors raised at the host boundary.
//!
//! The per-tick DSP path never fails. These errors only come out of the
//! patching and parameter-routing calls a host makes outside the audio
//! callback.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RackError {
    #[error("module '{module}' has no parameter named '{name}'")]
    UnknownParam { module: &'static str, name: String },

    #[error("parameter index {index} out of range (module has {count})")]
    ParamOutOfRange { index: usize, count: usize },

    #[error("port index {index} out of range (module has {count})")]
    PortOutOfRange { index: usize, count: usize },

    #[error("parameter queue is full")]
    QueueFull,

    #[error("invalid channel count {0} (ports carry at most 16 lanes)")]
    InvalidChannelCount(usize),
}

pub type Result<T> = std::result::Result<T, RackError>;
