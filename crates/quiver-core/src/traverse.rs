use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

use crate::bitmap::AtomicBitmap;
use crate::graph::Quiver;
use crate::vertex::{ExternalId, Offset, WeightedEdge};

/// Heap entry ordered so that `BinaryHeap::pop` yields the smallest
/// tentative distance.
struct HeapEntry {
    dist: f64,
    vertex: Offset,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.dist == other.dist
    }
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other.dist.total_cmp(&self.dist)
    }
}

impl Quiver {
    /// Breadth-first traversal from `source`, returning the external ids
    /// of every reachable vertex in visit order. Empty when the source is
    /// absent or query mode is disabled. Assumes quiescent writers.
    pub fn bfs(&self, source: ExternalId) -> Vec<ExternalId> {
        let mut order = Vec::new();
        if !self.query_enabled() {
            return order;
        }
        let Some(src) = self.index().retrieve(source, false) else {
            return order;
        };
        let visited = AtomicBitmap::new(self.index().vertex_count());
        let mut queue = VecDeque::new();
        let mut edges: Vec<WeightedEdge> = Vec::new();

        visited.set(src.offset() as usize);
        queue.push_back(src.offset());
        while let Some(u) = queue.pop_front() {
            order.push(self.index().vertex(u).external_id());
            self.get_neighbours_by_offset(u, &mut edges, -1);
            for edge in &edges {
                if !visited.get(edge.dest as usize) {
                    visited.set(edge.dest as usize);
                    queue.push_back(edge.dest);
                }
            }
        }
        order
    }

    /// Sequential single-source shortest paths (eager Dijkstra). Returns
    /// tentative distances indexed by dense offset, `f64::INFINITY` for
    /// unreached vertices. Stale heap entries are skipped on pop. Empty
    /// when the source is absent or query mode is disabled.
    pub fn sssp(&self, source: ExternalId) -> Vec<f64> {
        if !self.query_enabled() {
            return Vec::new();
        }
        let Some(src) = self.index().retrieve(source, false) else {
            return Vec::new();
        };
        let mut dist = vec![f64::INFINITY; self.index().vertex_count()];
        let mut heap = BinaryHeap::new();
        let mut edges: Vec<WeightedEdge> = Vec::new();

        dist[src.offset() as usize] = 0.0;
        heap.push(HeapEntry {
            dist: 0.0,
            vertex: src.offset(),
        });
        while let Some(HeapEntry { dist: du, vertex: u }) = heap.pop() {
            if du > dist[u as usize] {
                continue;
            }
            self.get_neighbours_by_offset(u, &mut edges, -1);
            for edge in &edges {
                let alt = du + edge.weight as f64;
                if alt < dist[edge.dest as usize] {
                    dist[edge.dest as usize] = alt;
                    heap.push(HeapEntry {
                        dist: alt,
                        vertex: edge.dest,
                    });
                }
            }
        }
        dist
    }
}
