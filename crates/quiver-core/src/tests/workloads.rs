use rustc_hash::FxHashSet;

use super::common::{neighbours, store_with_threads};
use crate::WeightedEdge;

#[test]
fn concurrent_ingest_from_disjoint_sources() {
    let graph = store_with_threads(8);
    let threads = 8u64;
    let per_thread = 5_000u64;

    std::thread::scope(|scope| {
        for t in 0..threads {
            let graph = &graph;
            scope.spawn(move || {
                for k in 0..per_thread {
                    let src = t * per_thread + k;
                    let dest = (src + 1) % (threads * per_thread);
                    assert!(graph.insert_edge(src, dest, 1.0));
                }
            });
        }
    });

    let total = threads * per_thread;
    assert_eq!(graph.index().vertex_count() as u64, total);

    // Post-quiescence: degrees sum to the insert count and every edge
    // materializes exactly once.
    let mut degree_sum = 0i64;
    let mut materialized = 0u64;
    let mut edges: Vec<WeightedEdge> = Vec::new();
    for offset in 0..graph.index().vertex_count() as i32 {
        degree_sum += graph.index().vertex(offset).degree() as i64;
        assert!(graph.get_neighbours_by_offset(offset, &mut edges, -1));
        materialized += edges.len() as u64;
    }
    assert_eq!(degree_sum, total as i64);
    assert_eq!(materialized, total);
}

#[test]
fn concurrent_appends_to_one_source() {
    let graph = store_with_threads(8);
    let threads = 8u64;
    let per_thread = 2_000u64;
    let src = 42u64;

    std::thread::scope(|scope| {
        for t in 0..threads {
            let graph = &graph;
            scope.spawn(move || {
                for k in 0..per_thread {
                    let dest = 1_000 + t * per_thread + k;
                    assert!(graph.insert_edge(src, dest, 0.5));
                }
            });
        }
    });

    let live = neighbours(&graph, src);
    assert_eq!(live.len(), (threads * per_thread) as usize);
    let dests: FxHashSet<u64> = live.iter().map(|(dest, _)| *dest).collect();
    assert_eq!(dests.len(), live.len());
}

#[test]
fn concurrent_mixed_writers_on_shared_edges() {
    let graph = store_with_threads(4);
    // Pre-build a fully known edge set.
    for dest in 1..=64u64 {
        graph.insert_edge(0, dest, 1.0);
    }

    std::thread::scope(|scope| {
        // Two updaters bouncing weights, one deleter/re-inserter pair of
        // operations per odd destination.
        for writer in 0..4u64 {
            let graph = &graph;
            scope.spawn(move || {
                for round in 0..200u64 {
                    let dest = 1 + (writer * 7 + round) % 64;
                    if dest % 2 == 1 {
                        graph.delete_edge(0, dest);
                        graph.insert_edge(0, dest, 2.0);
                    } else {
                        graph.update_edge(0, dest, (round % 9 + 1) as f64);
                    }
                }
            });
        }
    });

    // Every destination must still be live exactly once: deletes are
    // always paired with a re-insert.
    let live = neighbours(&graph, 0);
    assert_eq!(live.len(), 64);
    assert_eq!(degree_of(&graph), 64);
}

fn degree_of(graph: &crate::Quiver) -> i32 {
    graph.index().retrieve(0, false).unwrap().degree()
}

#[test]
fn historical_snapshot_survives_later_appends() {
    let graph = store_with_threads(2);
    graph.insert_edge(1, 2, 0.5);
    graph.insert_edge(1, 3, 0.5);
    let mark = graph.index().retrieve(1, false).unwrap().log_len() as i32;

    for dest in 4..50u64 {
        graph.insert_edge(1, dest, 1.0);
    }
    graph.delete_edge(1, 2);

    let mut then: Vec<WeightedEdge> = Vec::new();
    assert!(graph.get_neighbours(1, &mut then, mark));
    let mut ids: Vec<u64> = then
        .iter()
        .map(|e| graph.index().vertex(e.dest).external_id())
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![2, 3]);
}
