//! Rack modules and the contract between a module and its host.
//!
//! A module is a `RackModule`: it describes itself with a static
//! `ModuleLayout` and, once per sample, reads parameters and inputs from a
//! `ModuleIo` and writes outputs and lights back to it.

/// Envelope generator module.
pub mod adsr;
/// Parameter and port descriptors.
pub mod layout;
/// `RackModule`, `ModuleIo`, typed port ids and per-tick timing.
pub mod module;
/// Four-channel polyphonic mixer module.
pub mod vc_mixer;
