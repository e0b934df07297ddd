//! Benchmarks for call-graph construction and cost queries
//!
//! Run with: cargo bench -p bloq-count

use std::fmt;

use bloq_count::{CallGraphBuilder, QecGatesCost, TCount, get_cost_value, identity};
use bloq_ir::gates::TGate;
use bloq_ir::{Bloq, BloqCount, BloqRef, DecomposeResult, QDType, Signature, SymbolAllocator};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

/// Node `index` of layer `level`. Every node calls every node of the layer
/// below once, so there are `width^levels` root-to-leaf paths but only
/// `levels * width` nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Layered {
    level: u32,
    index: u32,
    width: u32,
}

impl fmt::Display for Layered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}_{}", self.level, self.index)
    }
}

impl Bloq for Layered {
    fn signature(&self) -> Signature {
        Signature::build(&[("q", QDType::QBit)])
    }

    fn build_call_graph(&self, _ssa: &mut SymbolAllocator) -> DecomposeResult<Vec<BloqCount>> {
        if self.level == 0 {
            return Ok(vec![BloqCount::of(TGate::default(), 1)]);
        }
        Ok((0..self.width)
            .map(|index| {
                let child = Layered {
                    level: self.level - 1,
                    index,
                    width: self.width,
                };
                BloqCount::of(child, 1)
            })
            .collect())
    }
}

fn root(levels: u32, width: u32) -> BloqRef {
    BloqRef::new(Layered {
        level: levels,
        index: 0,
        width,
    })
}

/// Benchmark call-graph construction on deep, highly shared graphs
fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_call_graph");
    let builder = CallGraphBuilder::new();

    for (levels, width) in [(8u32, 8u32), (16, 4), (60, 2)] {
        let bloq = root(levels, width);
        let id = BenchmarkId::new(format!("width_{width}"), levels);
        group.bench_with_input(id, &bloq, |b, bloq| {
            b.iter(|| builder.build(std::slice::from_ref(black_box(bloq))).unwrap());
        });
    }

    group.finish();
}

/// Benchmark cost queries
fn bench_cost(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_cost_value");

    for width in &[2u32, 8, 32] {
        let bloq = root(12, *width);
        group.bench_with_input(BenchmarkId::new("t_count", width), &bloq, |b, bloq| {
            b.iter(|| get_cost_value(black_box(bloq), &TCount, &identity()).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("gate_counts", width), &bloq, |b, bloq| {
            b.iter(|| get_cost_value(black_box(bloq), &QecGatesCost, &identity()).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build, bench_cost);
criterion_main!(benches);
