//! Benchmarks for turning patch text into a graph.

use std::{hint::black_box, rc::Rc};

use criterion::Criterion;
use patchbay::{graph::HeldControls, patch::parse_patch, Graph, Registry};

use super::CHORUS_PATCH;

pub fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("patches/parse");
    let registry = Registry::standard(Rc::new(HeldControls::new()));

    group.bench_function("chorus", |b| {
        b.iter(|| {
            let mut graph = Graph::new();
            parse_patch(&registry, &mut graph, black_box(CHORUS_PATCH)).unwrap();
            black_box(graph.len());
        })
    });

    group.finish();
}
