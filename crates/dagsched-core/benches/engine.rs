use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use dagsched_core::Graph;
use dagsched_core::critical_path::find_critical_path;
use dagsched_core::ingest::GraphInput;
use dagsched_core::metrics::NoopMetrics;
use dagsched_core::paths::longest_paths;
use dagsched_core::pipeline::analyze;
use dagsched_core::scc::find_sccs;
use dagsched_core::topo;

#[derive(Clone, Copy, Debug)]
struct Tier {
    name: &'static str,
    vertices: usize,
    edges: usize,
}

const TIERS: [Tier; 3] = [
    Tier {
        name: "S",
        vertices: 1_000,
        edges: 4_000,
    },
    Tier {
        name: "M",
        vertices: 10_000,
        edges: 40_000,
    },
    Tier {
        name: "L",
        vertices: 100_000,
        edges: 400_000,
    },
];

#[derive(Clone, Copy, Debug)]
struct Prng(u64);

impl Prng {
    fn next_u64(&mut self) -> u64 {
        // 64-bit LCG constants from Numerical Recipes.
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        self.0
    }

    fn next_index(&mut self, upper_exclusive: usize) -> usize {
        (self.next_u64() as usize) % upper_exclusive
    }
}

/// Random graph; with `acyclic` every edge points from a lower to a higher id.
fn random_graph(tier: Tier, seed: u64, acyclic: bool) -> Graph {
    let mut rng = Prng(seed);
    let mut graph = Graph::directed(tier.vertices);
    for _ in 0..tier.edges {
        let mut u = rng.next_index(tier.vertices);
        let mut v = rng.next_index(tier.vertices);
        if acyclic {
            if u == v {
                continue;
            }
            if u > v {
                std::mem::swap(&mut u, &mut v);
            }
        }
        let w = (rng.next_u64() % 20) as i64 + 1;
        graph.add_edge(u, v, w).expect("generated endpoints are in range");
    }
    graph
}

fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine.tiered");

    for tier in TIERS {
        let cyclic = random_graph(tier, 0xDA65_u64 + tier.vertices as u64, false);
        let dag = random_graph(tier, 0x5C4E_u64 + tier.vertices as u64, true);
        group.throughput(Throughput::Elements(tier.edges as u64));

        group.bench_with_input(BenchmarkId::new("scc", tier.name), &cyclic, |b, g| {
            b.iter(|| black_box(find_sccs(g)));
        });

        group.bench_with_input(BenchmarkId::new("topo", tier.name), &dag, |b, g| {
            b.iter(|| black_box(topo::sort(g)));
        });

        group.bench_with_input(
            BenchmarkId::new("critical_path", tier.name),
            &dag,
            |b, g| b.iter(|| black_box(find_critical_path(g))),
        );

        group.bench_with_input(BenchmarkId::new("longest", tier.name), &dag, |b, g| {
            b.iter(|| black_box(longest_paths(g, 0)));
        });

        let input = GraphInput {
            graph: cyclic,
            source: Some(0),
        };
        group.bench_with_input(BenchmarkId::new("pipeline", tier.name), &input, |b, i| {
            b.iter(|| black_box(analyze(i, &mut NoopMetrics)));
        });
    }

    group.finish();
}

fn bench_deep_chain(c: &mut Criterion) {
    let n = 200_000;
    let chain = Graph::from_edges(n, (0..n - 1).map(|v| (v, v + 1, 1))).expect("chain");

    c.bench_function("engine.deep_chain.scc", |b| {
        b.iter(|| black_box(find_sccs(&chain)));
    });
}

criterion_group!(benches, bench_engine, bench_deep_chain);
criterion_main!(benches);
