use crate::{ExternalId, GraphConfig, Quiver, WeightedEdge};

/// Store sized for tests: 24-bit id space, small capacity, few workers.
pub(crate) fn small_store() -> Quiver {
    store_with_threads(4)
}

pub(crate) fn store_with_threads(threads: usize) -> Quiver {
    let mut config = GraphConfig::new(vec![8, 8, 8]);
    config.capacity = 1 << 16;
    config.threads = threads;
    Quiver::new(config).unwrap()
}

/// Neighbor set resolved back to external ids, sorted for comparison.
pub(crate) fn neighbours(graph: &Quiver, src: ExternalId) -> Vec<(ExternalId, f32)> {
    let mut edges: Vec<WeightedEdge> = Vec::new();
    assert!(graph.get_neighbours(src, &mut edges, -1));
    let mut out: Vec<(ExternalId, f32)> = edges
        .iter()
        .map(|e| (graph.index().vertex(e.dest).external_id(), e.weight))
        .collect();
    out.sort_by(|a, b| a.0.cmp(&b.0));
    out
}

pub(crate) fn degree(graph: &Quiver, src: ExternalId) -> i32 {
    graph.index().retrieve(src, false).unwrap().degree()
}
