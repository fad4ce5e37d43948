use std::sync::atomic::{AtomicI32, Ordering};

use once_cell::sync::OnceCell;
use tracing::debug;

use crate::bitmap::AtomicBitmap;
use crate::config::GraphConfig;
use crate::error::GraphError;
use crate::index::RadixIndex;
use crate::vertex::{ExternalId, Offset, TOMBSTONE, VertexRecord, WeightedEdge};

/// Concurrent, in-memory, dynamic directed graph store.
///
/// Edges are written as single appends to the source vertex's log and the
/// current neighbor set is reconstructed on read, so concurrent writers
/// never contend on edge state and readers never lock. Vertices are
/// resolved through the radix index to stable dense offsets.
pub struct Quiver {
    index: RadixIndex,
    /// Query mode: per-offset degree array kept in lockstep with the
    /// per-vertex counters.
    degrees: Option<Box<[AtomicI32]>>,
    /// Query mode: one seen-destination bit set per worker, slot 0 for
    /// callers outside the pool.
    seen: Vec<AtomicBitmap>,
    pool: OnceCell<rayon::ThreadPool>,
    config: GraphConfig,
}

impl Quiver {
    pub fn new(config: GraphConfig) -> Result<Self, GraphError> {
        config.validate()?;
        let index = RadixIndex::new(&config.bits_per_level, config.capacity);
        let (degrees, seen) = if config.enable_query {
            let degrees = zeroed_degrees(config.capacity);
            let seen = (0..config.threads + 1)
                .map(|_| AtomicBitmap::new(config.capacity))
                .collect();
            (Some(degrees), seen)
        } else {
            (None, Vec::new())
        };
        debug!(
            depth = config.depth,
            threads = config.threads,
            capacity = config.capacity,
            query = config.enable_query,
            "graph store initialised"
        );
        Ok(Self {
            index,
            degrees,
            seen,
            pool: OnceCell::new(),
            config,
        })
    }

    /// The vertex index, exposed for offset resolution and the census.
    #[inline]
    pub fn index(&self) -> &RadixIndex {
        &self.index
    }

    #[inline]
    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    #[inline]
    pub(crate) fn query_enabled(&self) -> bool {
        self.degrees.is_some()
    }

    /// The fixed worker pool, built on first use.
    pub(crate) fn pool(&self) -> &rayon::ThreadPool {
        self.pool.get_or_init(|| {
            rayon::ThreadPoolBuilder::new()
                .num_threads(self.config.threads)
                .thread_name(|worker| format!("quiver-worker-{worker}"))
                .build()
                .expect("spawning the worker pool")
        })
    }

    /// Seen-destination bit set for the calling worker. Pool workers get
    /// their own slot; callers outside the pool share slot 0.
    fn seen_slot(&self) -> Option<&AtomicBitmap> {
        if self.seen.is_empty() {
            return None;
        }
        let slot = rayon::current_thread_index().map_or(0, |worker| 1 + worker % self.config.threads);
        Some(&self.seen[slot])
    }

    /// Insert a directed edge, creating either endpoint on first
    /// reference. A tombstoned endpoint has no addressable offset, so the
    /// write is refused with `false`.
    pub fn insert_edge(&self, src: ExternalId, dest: ExternalId, weight: f64) -> bool {
        debug_assert!(weight != 0.0, "zero weight encodes deletion");
        let Some(src_rec) = self.index.retrieve(src, true) else {
            return false;
        };
        let Some(dest_rec) = self.index.retrieve(dest, true) else {
            return false;
        };
        let src_off = src_rec.offset();
        let dest_off = dest_rec.offset();
        if src_off == TOMBSTONE || dest_off == TOMBSTONE {
            return false;
        }
        src_rec.deg.fetch_add(1, Ordering::AcqRel);
        if let Some(degrees) = &self.degrees {
            degrees[src_off as usize].fetch_add(1, Ordering::Relaxed);
        }
        src_rec.log.push(WeightedEdge {
            weight: weight as f32,
            dest: dest_off,
        });
        true
    }

    /// Re-weight an existing edge. Appends the same entry an insert
    /// would, but leaves the degree counters untouched. `false` if either
    /// endpoint is absent.
    pub fn update_edge(&self, src: ExternalId, dest: ExternalId, weight: f64) -> bool {
        debug_assert!(weight != 0.0, "zero weight encodes deletion");
        let Some(src_rec) = self.index.retrieve(src, false) else {
            return false;
        };
        let Some(dest_rec) = self.index.retrieve(dest, false) else {
            return false;
        };
        src_rec.log.push(WeightedEdge {
            weight: weight as f32,
            dest: dest_rec.offset(),
        });
        true
    }

    /// Delete an edge by appending a zero-weight entry. `false` if either
    /// endpoint is absent. Deleting an edge that was never inserted is
    /// benign: the entry masks nothing at materialization.
    pub fn delete_edge(&self, src: ExternalId, dest: ExternalId) -> bool {
        let Some(src_rec) = self.index.retrieve(src, false) else {
            return false;
        };
        let Some(dest_rec) = self.index.retrieve(dest, false) else {
            return false;
        };
        src_rec.deg.fetch_sub(1, Ordering::AcqRel);
        if let Some(degrees) = &self.degrees {
            degrees[src_rec.offset() as usize].fetch_sub(1, Ordering::Relaxed);
        }
        src_rec.log.push(WeightedEdge {
            weight: 0.0,
            dest: dest_rec.offset(),
        });
        true
    }

    /// Logically delete a vertex. Its offset is retired, not recycled.
    pub fn delete_vertex(&self, id: ExternalId) -> bool {
        self.index.delete_vertex(id)
    }

    /// Query-mode logical degree indexed by dense offset: the O(1) view
    /// the analytical kernels size their work by. `None` with query mode
    /// disabled.
    pub fn degree_by_offset(&self, offset: Offset) -> Option<i32> {
        self.degrees
            .as_ref()
            .map(|degrees| degrees[offset as usize].load(Ordering::Relaxed))
    }

    /// Materialize the current (or historical) neighbor set of `src` into
    /// `out`. `timestamp` selects a log-prefix length; `-1` snapshots the
    /// latest. `false` only when the vertex is absent or query mode is
    /// disabled.
    pub fn get_neighbours(
        &self,
        src: ExternalId,
        out: &mut Vec<WeightedEdge>,
        timestamp: i32,
    ) -> bool {
        let Some(record) = self.index.retrieve(src, false) else {
            return false;
        };
        self.materialize(record, out, timestamp)
    }

    /// `get_neighbours` addressed by dense offset instead of external id.
    pub fn get_neighbours_by_offset(
        &self,
        src: Offset,
        out: &mut Vec<WeightedEdge>,
        timestamp: i32,
    ) -> bool {
        if src < 0 || src as usize >= self.index.vertex_count() {
            return false;
        }
        self.materialize(self.index.vertex(src), out, timestamp)
    }

    /// Fold the edge log newest-to-oldest: the first sighting of a
    /// destination decides that edge (non-zero weight emits, zero weight
    /// masks). Once the emitted count accounts for every earlier log
    /// position the remainder is copied verbatim. The scan marks
    /// destinations in the worker's bit set and clears exactly the marks
    /// it made before returning.
    fn materialize(&self, src: &VertexRecord, out: &mut Vec<WeightedEdge>, timestamp: i32) -> bool {
        let Some(seen) = self.seen_slot() else {
            return false;
        };
        let cnt = if timestamp < 0 {
            src.log.len()
        } else {
            (timestamp as usize).min(src.log.len())
        };
        let deg = src.degree() as isize;
        out.clear();
        out.reserve(deg.max(0) as usize);

        let mut emitted = 0isize;
        let mut floor = 0usize;
        for i in (0..cnt).rev() {
            let entry = *src.log.get(i);
            let dest = entry.dest as usize;
            if !seen.get(dest) {
                if entry.weight != 0.0 {
                    out.push(entry);
                    emitted += 1;
                }
                seen.set(dest);
            }
            if deg - emitted == i as isize {
                // Every earlier position is the first sighting of a
                // still-live edge.
                for j in (0..i).rev() {
                    out.push(*src.log.get(j));
                }
                floor = i;
                break;
            }
        }
        for i in floor..cnt {
            seen.clear(src.log.get(i).dest as usize);
        }
        true
    }
}

fn zeroed_degrees(n: usize) -> Box<[AtomicI32]> {
    let raw = Box::into_raw(vec![0i32; n].into_boxed_slice());
    // SAFETY: AtomicI32 has the same size, alignment, and bit validity as
    // i32, and the slice length is unchanged by the cast.
    unsafe { Box::from_raw(raw as *mut [AtomicI32]) }
}
