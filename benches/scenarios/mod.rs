//! Module-level scenario benchmarks.
//!
//! Both modules are ticked once per sample through a `ModuleContext`, the
//! way a host drives them.

mod modules;

pub use modules::bench_modules;
