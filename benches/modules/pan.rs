//! Benchmarks for the mono to stereo path.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use patchbay::{
    catalog::{Oscillator, Pan, StereoAdd, Waveform},
    graph::Constant,
    ModuleRef,
};

use crate::BLOCK_SIZES;

fn panned(frequency: f32, position: f32) -> ModuleRef {
    let tone = ModuleRef::new(Oscillator::new(
        Waveform::Sine,
        ModuleRef::new(Constant::new(frequency)),
    ));
    ModuleRef::new(Pan::new(tone, ModuleRef::new(Constant::new(position))))
}

pub fn bench_pan(c: &mut Criterion) {
    let mut group = c.benchmark_group("modules/pan");

    for &size in BLOCK_SIZES {
        let pan = panned(440.0, 0.25);
        let mut timestamp = 0u64;
        group.bench_with_input(BenchmarkId::new("pan", size), &size, |b, &size| {
            b.iter(|| {
                timestamp += 1;
                let block = pan.output(black_box(timestamp), size).unwrap();
                black_box(block[0]);
            })
        });

        let sum = ModuleRef::new(StereoAdd::new(panned(220.0, -1.0), panned(330.0, 1.0)));
        let mut timestamp = 0u64;
        group.bench_with_input(BenchmarkId::new("stereo_add", size), &size, |b, &size| {
            b.iter(|| {
                timestamp += 1;
                let block = sum.output(black_box(timestamp), size).unwrap();
                black_box(block[0]);
            })
        });
    }

    group.finish();
}
