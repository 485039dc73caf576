//! Benchmarks for the driver pulling a full patch.

use std::{hint::black_box, rc::Rc};

use criterion::{BenchmarkId, Criterion};
use patchbay::{graph::HeldControls, patch::parse_patch, Driver, Graph, Registry};

use super::CHORUS_PATCH;
use crate::BLOCK_SIZES;

pub fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("patches/render");
    let registry = Registry::standard(Rc::new(HeldControls::new()));

    for &size in BLOCK_SIZES {
        // a fresh graph per size, cached timestamps would outrun a new clock
        let mut graph = Graph::new();
        parse_patch(&registry, &mut graph, CHORUS_PATCH).unwrap();
        let mut driver = Driver::new(&graph).unwrap();
        let mut pcm = vec![0i16; size * 2];

        group.bench_with_input(BenchmarkId::new("chorus", size), &size, |b, _| {
            b.iter(|| {
                let frames = driver.render_pcm(black_box(&mut pcm)).unwrap();
                black_box(frames);
            })
        });
    }

    group.finish();
}
