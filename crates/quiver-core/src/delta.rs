//! Parallel Δ-stepping single-source shortest paths.
//!
//! The bucketed relaxation of Meyer & Sanders ("Δ-stepping: a
//! parallelizable shortest path algorithm", J. Algorithms 49(1), 2003)
//! with the bucket-fusion optimization of Zhang et al. (CGO 2020), which
//! re-relaxes light same-priority work locally instead of paying another
//! round of barriers for it.
//!
//! Workers share a double-buffered frontier and bucket index keyed by the
//! iteration parity. Per iteration: cooperatively relax the shared
//! frontier in dynamic chunks, fuse small local same-bucket remainders,
//! vote the next bucket id by atomic minimum, then gather the winning
//! local buckets into the next frontier between two barriers. A vertex
//! may sit in several buckets; the `dist[u] >= delta * bucket` guard
//! discards the stale occurrences.

use std::sync::Barrier;
use std::sync::atomic::{AtomicI32, AtomicU64, AtomicUsize, Ordering};

use tracing::trace;

use crate::graph::Quiver;
use crate::vertex::{ExternalId, Offset, WeightedEdge};

/// Bucket-id sentinel: no bucket left to process.
pub const MAX_BIN: usize = usize::MAX / 2;

/// Distance sentinel for unreached vertices; headroom for one more
/// relaxation without overflow.
pub const DIST_INF: f64 = f64::MAX / 2.0;

const BIN_SIZE_THRESHOLD: usize = 1000;
const CHUNK: usize = 64;

impl Quiver {
    /// Parallel Δ-stepping from `source` over the store's worker pool.
    /// `num_nodes` bounds the dense offsets in use; `num_edges` bounds the
    /// frontier (a vertex may be queued once per improvement). Returns
    /// tentative distances indexed by dense offset, `DIST_INF` for
    /// unreached vertices; empty when the source is absent or query mode
    /// is disabled.
    pub fn delta_stepping(
        &self,
        source: ExternalId,
        delta: f64,
        num_nodes: usize,
        num_edges: usize,
    ) -> Vec<f64> {
        if !self.query_enabled() {
            return Vec::new();
        }
        let Some(src) = self.index().retrieve(source, false) else {
            return Vec::new();
        };

        let dist: Vec<AtomicU64> = (0..num_nodes)
            .map(|_| AtomicU64::new(DIST_INF.to_bits()))
            .collect();
        dist[src.offset() as usize].store(0f64.to_bits(), Ordering::Relaxed);

        let frontier: Vec<AtomicI32> = (0..num_edges.max(1)).map(|_| AtomicI32::new(0)).collect();
        frontier[0].store(src.offset(), Ordering::Relaxed);

        // Double buffers keyed by iteration parity.
        let shared_bins = [AtomicUsize::new(0), AtomicUsize::new(MAX_BIN)];
        let tails = [AtomicUsize::new(1), AtomicUsize::new(0)];
        let cursors = [AtomicUsize::new(0), AtomicUsize::new(0)];

        let pool = self.pool();
        let barrier = Barrier::new(pool.current_num_threads());
        let rounds = AtomicUsize::new(0);

        pool.broadcast(|_| {
            let mut local_bins: Vec<Vec<Offset>> = Vec::new();
            let mut edges: Vec<WeightedEdge> = Vec::new();
            let mut iter = 0usize;

            loop {
                let curr_bin = shared_bins[iter & 1].load(Ordering::Acquire);
                if curr_bin == MAX_BIN {
                    break;
                }
                let tail = tails[iter & 1].load(Ordering::Acquire);

                // Relax: claim the shared frontier in dynamic chunks.
                // Promoted vertices (already settled below this bucket's
                // floor) are skipped as stale.
                loop {
                    let start = cursors[iter & 1].fetch_add(CHUNK, Ordering::AcqRel);
                    if start >= tail {
                        break;
                    }
                    for i in start..tail.min(start + CHUNK) {
                        let u = frontier[i].load(Ordering::Relaxed);
                        let du = f64::from_bits(dist[u as usize].load(Ordering::Relaxed));
                        if du >= delta * curr_bin as f64 {
                            self.relax(u, delta, &dist, &mut local_bins, &mut edges);
                        }
                    }
                }

                // Fusion: fold light same-priority work into this
                // iteration instead of paying another barrier round.
                while curr_bin < local_bins.len()
                    && !local_bins[curr_bin].is_empty()
                    && local_bins[curr_bin].len() < BIN_SIZE_THRESHOLD
                {
                    let pending = std::mem::take(&mut local_bins[curr_bin]);
                    for u in pending {
                        self.relax(u, delta, &dist, &mut local_bins, &mut edges);
                    }
                }

                // Vote: the smallest non-empty local bucket, reduced by
                // atomic minimum into the next shared bucket id.
                for bin in curr_bin..local_bins.len() {
                    if !local_bins[bin].is_empty() {
                        shared_bins[(iter + 1) & 1].fetch_min(bin, Ordering::AcqRel);
                        break;
                    }
                }

                if barrier.wait().is_leader() {
                    shared_bins[iter & 1].store(MAX_BIN, Ordering::Release);
                    tails[iter & 1].store(0, Ordering::Release);
                    cursors[iter & 1].store(0, Ordering::Release);
                    rounds.fetch_add(1, Ordering::Relaxed);
                }

                // Gather: workers holding the winning bucket reserve a
                // contiguous frontier range and publish it.
                let next_bin = shared_bins[(iter + 1) & 1].load(Ordering::Acquire);
                if next_bin < local_bins.len() && !local_bins[next_bin].is_empty() {
                    let reserved = tails[(iter + 1) & 1]
                        .fetch_add(local_bins[next_bin].len(), Ordering::AcqRel);
                    for (k, &u) in local_bins[next_bin].iter().enumerate() {
                        frontier[reserved + k].store(u, Ordering::Relaxed);
                    }
                    local_bins[next_bin].clear();
                }

                iter += 1;
                barrier.wait();
            }
        });

        trace!(
            rounds = rounds.load(Ordering::Relaxed),
            "delta-stepping settled"
        );
        dist.iter()
            .map(|d| f64::from_bits(d.load(Ordering::Relaxed)))
            .collect()
    }

    /// Relax every outgoing edge of `u`, lowering tentative distances by
    /// CAS-minimum and binning each improved vertex by its new priority.
    fn relax(
        &self,
        u: Offset,
        delta: f64,
        dist: &[AtomicU64],
        bins: &mut Vec<Vec<Offset>>,
        edges: &mut Vec<WeightedEdge>,
    ) {
        self.get_neighbours_by_offset(u, edges, -1);
        let du = f64::from_bits(dist[u as usize].load(Ordering::Relaxed));
        for edge in edges.iter() {
            let v = edge.dest as usize;
            let alt = du + edge.weight as f64;
            let mut current = dist[v].load(Ordering::Relaxed);
            while alt < f64::from_bits(current) {
                match dist[v].compare_exchange_weak(
                    current,
                    alt.to_bits(),
                    Ordering::Relaxed,
                    Ordering::Relaxed,
                ) {
                    Ok(_) => {
                        let bin = (alt / delta) as usize;
                        if bins.len() <= bin {
                            bins.resize_with(bin + 1, Vec::new);
                        }
                        bins[bin].push(edge.dest);
                        break;
                    }
                    Err(changed) => current = changed,
                }
            }
        }
    }
}
