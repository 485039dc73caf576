//! Benchmarks for oscillator waveform generation.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use patchbay::{
    catalog::{Oscillator, Waveform},
    graph::Constant,
    ModuleRef,
};

use crate::BLOCK_SIZES;

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("modules/oscillator");

    for &size in BLOCK_SIZES {
        for waveform in [Waveform::Sine, Waveform::Saw, Waveform::Square] {
            let frequency = ModuleRef::new(Constant::new(440.0));
            let osc = ModuleRef::new(Oscillator::new(waveform, frequency));
            let mut timestamp = 0u64;

            group.bench_with_input(
                BenchmarkId::new(waveform.type_name(), size),
                &size,
                |b, &size| {
                    b.iter(|| {
                        // fresh timestamp each pass, otherwise the cache answers
                        timestamp += 1;
                        let block = osc.output(black_box(timestamp), size).unwrap();
                        black_box(block[0]);
                    })
                },
            );
        }
    }

    group.finish();
}
