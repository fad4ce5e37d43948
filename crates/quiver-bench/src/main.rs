mod reference;

use std::time::{Duration, Instant};

use anyhow::{Context, Result, ensure};
use clap::Parser;
use quiver_core::{GraphConfig, Quiver, WeightedEdge};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashSet;

use reference::AdjacencyList;

/// Dynamic-graph workload driver: times edge CRUD, neighbor
/// materialization, and traversals against a naive adjacency-list
/// baseline, and validates that both stores agree.
#[derive(Parser, Debug)]
#[command(name = "quiver-bench")]
struct Args {
    /// Number of distinct vertices per trial.
    #[arg(short = 'n', long, default_value_t = 100_000)]
    vertices: usize,

    /// Total edges per trial; the first n-1 form a chain so the graph is
    /// connected, the remainder are random non-adjacent pairs.
    #[arg(short = 'm', long, default_value_t = 2_560_000)]
    edges: usize,

    #[arg(long, default_value_t = 5)]
    trials: usize,

    /// Random re-weights applied after ingest (never to chain edges).
    #[arg(long, default_value_t = 1000)]
    updates: usize,

    /// Random deletions applied after the updates (never to chain edges).
    #[arg(long, default_value_t = 1000)]
    deletes: usize,

    /// Bucket width for the parallel shortest-path validation.
    #[arg(long, default_value_t = 2.0)]
    delta: f64,

    #[arg(long, default_value_t = 8)]
    threads: usize,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Per-level bit widths of the vertex index, most significant first.
    #[arg(long, value_delimiter = ',', default_values_t = vec![15u32, 6, 6, 5])]
    bits: Vec<u32>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let args = Args::parse();
    ensure!(args.vertices >= 2, "need at least two vertices");
    ensure!(
        args.edges >= args.vertices,
        "need at least one edge per vertex for the chain"
    );

    let mut rng = SmallRng::seed_from_u64(args.seed);
    let ids = distinct_ids(&mut rng, args.vertices);
    println!(
        "n = {}, m = {}, trials = {}",
        args.vertices, args.edges, args.trials
    );

    for trial in 1..=args.trials {
        run_trial(&args, &ids, &mut rng, trial)?;
    }
    Ok(())
}

/// Distinct random ids drawn from the 32-bit space, like real hashed keys.
fn distinct_ids(rng: &mut SmallRng, n: usize) -> Vec<u64> {
    let mut seen = FxHashSet::default();
    let mut ids = Vec::with_capacity(n);
    while ids.len() < n {
        let id = rng.r#gen::<u32>() as u64;
        if seen.insert(id) {
            ids.push(id);
        }
    }
    ids
}

struct Workload {
    edges: Vec<(u64, u64, f64)>,
    updates: Vec<(u64, u64, f64)>,
    deletes: Vec<(u64, u64)>,
}

/// Chain over `ids` in order, then distinct random non-adjacent pairs.
/// Updates and deletes draw from the random tail only, so the chain (and
/// with it connectedness) survives the whole trial.
fn build_workload(args: &Args, ids: &[u64], rng: &mut SmallRng) -> Workload {
    let n = ids.len();
    let mut pairs = FxHashSet::default();
    let mut edges = Vec::with_capacity(args.edges);
    for i in 0..n - 1 {
        edges.push((ids[i], ids[i + 1], 0.5));
        pairs.insert((i, i + 1));
    }
    while edges.len() < args.edges {
        let a = rng.gen_range(0..n);
        let b = rng.gen_range(0..n);
        if b == a + 1 || !pairs.insert((a, b)) {
            continue;
        }
        edges.push((ids[a], ids[b], 0.5));
    }

    let tail = n - 1..edges.len();
    let updates = (0..args.updates)
        .map(|_| {
            let (u, v, _) = edges[rng.gen_range(tail.clone())];
            (u, v, 1.5)
        })
        .collect();
    let deletes = (0..args.deletes)
        .map(|_| {
            let (u, v, _) = edges[rng.gen_range(tail.clone())];
            (u, v)
        })
        .collect();
    Workload {
        edges,
        updates,
        deletes,
    }
}

fn run_trial(args: &Args, ids: &[u64], rng: &mut SmallRng, trial: usize) -> Result<()> {
    let mut config = GraphConfig::new(args.bits.clone());
    config.threads = args.threads;
    config.capacity = (args.vertices + 1).next_power_of_two();
    let graph = Quiver::new(config).context("store construction")?;
    let mut baseline = AdjacencyList::default();
    let workload = build_workload(args, ids, rng);

    let quiver_insert = timed(|| {
        for &(u, v, w) in &workload.edges {
            graph.insert_edge(u, v, w);
        }
    });
    let baseline_insert = timed(|| {
        for &(u, v, w) in &workload.edges {
            baseline.insert_edge(u, v, w);
        }
    });

    let quiver_update = timed(|| {
        for &(u, v, w) in &workload.updates {
            graph.update_edge(u, v, w);
        }
    });
    let baseline_update = timed(|| {
        for &(u, v, w) in &workload.updates {
            baseline.update_edge(u, v, w);
        }
    });

    let quiver_delete = timed(|| {
        for &(u, v) in &workload.deletes {
            graph.delete_edge(u, v);
        }
    });
    let baseline_delete = timed(|| {
        for &(u, v) in &workload.deletes {
            baseline.delete_edge(u, v);
        }
    });

    let mut out: Vec<WeightedEdge> = Vec::new();
    let mut materialized = 0usize;
    let quiver_scan = timed(|| {
        for &id in ids {
            graph.get_neighbours(id, &mut out, -1);
            materialized += out.len();
        }
    });
    let mut baseline_count = 0usize;
    let baseline_scan = timed(|| {
        for &id in ids {
            baseline_count += baseline.neighbours(id).len();
        }
    });
    ensure!(
        materialized == baseline_count,
        "trial {trial}: materialized {materialized} live edges, baseline holds {baseline_count}"
    );

    let mut reached = graph.bfs(ids[0]);
    reached.sort_unstable();
    let expected = baseline.reachable(ids[0]);
    ensure!(
        reached == expected,
        "trial {trial}: BFS disagreement ({} vs {} reachable vertices)",
        reached.len(),
        expected.len()
    );

    println!(
        "trial {trial}: insert {:>9.3?} / {:>9.3?}  update {:>9.3?} / {:>9.3?}  \
         delete {:>9.3?} / {:>9.3?}  scan {:>9.3?} / {:>9.3?}  bfs {} vertices",
        quiver_insert,
        baseline_insert,
        quiver_update,
        baseline_update,
        quiver_delete,
        baseline_delete,
        quiver_scan,
        baseline_scan,
        reached.len()
    );

    if trial == args.trials {
        validate_shortest_paths(args, &graph, ids[0])?;
    }
    Ok(())
}

/// Sequential Dijkstra and parallel Δ-stepping must agree on every
/// reached vertex.
fn validate_shortest_paths(args: &Args, graph: &Quiver, source: u64) -> Result<()> {
    let nodes = graph.index().vertex_count();
    let bound = args.edges + args.updates + args.deletes;
    let sequential = graph.sssp(source);
    let parallel = graph.delta_stepping(source, args.delta, nodes, bound);
    ensure!(sequential.len() == parallel.len(), "distance vector sizes");

    let mut reached = 0usize;
    for (offset, (s, p)) in sequential.iter().zip(parallel.iter()).enumerate() {
        if s.is_finite() {
            ensure!(
                (s - p).abs() < 1e-6,
                "offset {offset}: dijkstra {s} vs delta-stepping {p}"
            );
            reached += 1;
        } else {
            ensure!(
                *p >= quiver_core::DIST_INF,
                "offset {offset}: unreachable sequentially but delta-stepping found {p}"
            );
        }
    }
    println!(
        "shortest paths agree on {reached}/{nodes} vertices (delta = {})",
        args.delta
    );
    Ok(())
}

fn timed<F: FnOnce()>(f: F) -> Duration {
    let start = Instant::now();
    f();
    start.elapsed()
}
