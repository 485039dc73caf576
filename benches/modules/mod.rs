//! Benchmarks for individual catalog modules.

mod oscillator;
mod pan;

pub use oscillator::bench_oscillator;
pub use pan::bench_pan;
