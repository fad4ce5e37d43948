use criterion::{Criterion, black_box, criterion_group, criterion_main};
use quiver_core::{GraphConfig, Quiver, WeightedEdge};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

fn bench_store(threads: usize) -> Quiver {
    let mut config = GraphConfig::new(vec![12, 6, 6]);
    config.capacity = 1 << 20;
    config.threads = threads;
    Quiver::new(config).expect("bench config")
}

fn chain_store(n: u64) -> Quiver {
    let graph = bench_store(4);
    for u in 0..n - 1 {
        graph.insert_edge(u, u + 1, 1.0);
    }
    graph
}

fn random_edges(n: u64, m: usize, seed: u64) -> Vec<(u64, u64, f64)> {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..m)
        .map(|_| {
            (
                rng.gen_range(0..n),
                rng.gen_range(0..n),
                rng.gen_range(0.1..2.0),
            )
        })
        .collect()
}

fn ingest(c: &mut Criterion) {
    let edges = random_edges(10_000, 100_000, 7);
    c.bench_function("insert_edge_100k", |b| {
        b.iter_batched(
            || bench_store(4),
            |graph| {
                for &(u, v, w) in &edges {
                    graph.insert_edge(u, v, w);
                }
                graph
            },
            criterion::BatchSize::LargeInput,
        );
    });
}

fn materialize(c: &mut Criterion) {
    let graph = bench_store(4);
    let hub = 0u64;
    for dest in 1..=4_096u64 {
        graph.insert_edge(hub, dest, 1.0);
    }
    for dest in (1..=4_096u64).step_by(3) {
        graph.update_edge(hub, dest, 2.0);
    }
    let mut out: Vec<WeightedEdge> = Vec::new();
    c.bench_function("get_neighbours_hub_4k", |b| {
        b.iter(|| {
            graph.get_neighbours(black_box(hub), &mut out, -1);
            black_box(out.len())
        });
    });
}

fn kernels(c: &mut Criterion) {
    let n = 20_000u64;
    let graph = chain_store(n);
    for (u, v, w) in random_edges(n, 60_000, 11) {
        graph.insert_edge(u, v, w);
    }

    c.bench_function("bfs_20k", |b| {
        b.iter(|| black_box(graph.bfs(black_box(0))).len());
    });
    c.bench_function("dijkstra_20k", |b| {
        b.iter(|| black_box(graph.sssp(black_box(0))).len());
    });
    c.bench_function("delta_stepping_20k", |b| {
        b.iter(|| {
            black_box(graph.delta_stepping(black_box(0), 2.0, n as usize, 80_000)).len()
        });
    });
}

criterion_group!(benches, ingest, materialize, kernels);
criterion_main!(benches);
