//! Reference host: port storage and parameter routing for module instances.
//!
//! A real plugin host owns cables, scheduling and UI. This module provides
//! the smallest host that can drive the modules: per-instance parameter,
//! port and light storage, plus a realtime-safe queue for parameter changes
//! made from other threads.

/// `ModuleContext`, the `ModuleIo` implementation over owned storage.
pub mod context;
/// Parameter change messages and the lock-free queue that carries them.
pub mod handle;
/// Sixteen-lane polyphonic port value.
pub mod poly;

#[cfg(feature = "rtrb")]
pub use handle::{param_queue, ParamHandle, ParamQueue};
pub use handle::{ParamChange, ParamReceiver};
