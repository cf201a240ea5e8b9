//! Benchmarks for low-level DSP primitives.

mod envelope;
mod mix;

pub use envelope::bench_envelope;
pub use mix::bench_mix;
