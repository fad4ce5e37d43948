use std::sync::atomic::{AtomicI32, AtomicU64, Ordering};

use crate::append_vec::AppendVec;

/// Caller-supplied sparse 64-bit vertex identifier.
pub type ExternalId = u64;

/// Dense logical index assigned at first insertion, immutable for the
/// vertex's lifetime. `-1` marks absent / tombstoned.
pub type Offset = i32;

pub const TOMBSTONE: Offset = -1;

/// One edge-log entry. `weight == 0.0` encodes deletion of the edge to
/// `dest`; any other weight is an insert or update setting the current
/// weight. Log order is the serialization order of operations on the
/// source vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedEdge {
    pub weight: f32,
    pub dest: Offset,
}

/// Per-vertex state: identity, dense offset, logical degree, and the
/// append-only edge log. Records are created once, never moved, and only
/// logically deleted (offset set to the tombstone); the log is never
/// rewritten, updates and deletes are additional appends.
pub struct VertexRecord {
    external_id: AtomicU64,
    offset: AtomicI32,
    /// Reserved for vertex-level version tracking.
    pub del_time: AtomicI32,
    pub(crate) deg: AtomicI32,
    pub(crate) log: AppendVec<WeightedEdge>,
}

impl VertexRecord {
    pub(crate) fn new(external_id: ExternalId, offset: Offset) -> Self {
        Self {
            external_id: AtomicU64::new(external_id),
            offset: AtomicI32::new(offset),
            del_time: AtomicI32::new(0),
            deg: AtomicI32::new(0),
            log: AppendVec::new(),
        }
    }

    #[inline]
    pub fn external_id(&self) -> ExternalId {
        self.external_id.load(Ordering::Acquire)
    }

    #[inline]
    pub(crate) fn set_external_id(&self, id: ExternalId) {
        self.external_id.store(id, Ordering::Release);
    }

    #[inline]
    pub fn offset(&self) -> Offset {
        self.offset.load(Ordering::Acquire)
    }

    #[inline]
    pub(crate) fn tombstone(&self) {
        self.offset.store(TOMBSTONE, Ordering::Release);
    }

    /// Logical out-degree: inserts minus deletes, up to appends in flight.
    #[inline]
    pub fn degree(&self) -> i32 {
        self.deg.load(Ordering::Acquire)
    }

    /// Current log length; also the newest valid materialization timestamp.
    #[inline]
    pub fn log_len(&self) -> usize {
        self.log.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_starts_live_with_empty_log() {
        let record = VertexRecord::new(42, 7);
        assert_eq!(record.external_id(), 42);
        assert_eq!(record.offset(), 7);
        assert_eq!(record.degree(), 0);
        assert_eq!(record.log_len(), 0);
        assert_eq!(record.del_time.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn tombstone_clears_offset_only() {
        let record = VertexRecord::new(9, 3);
        record.log.push(WeightedEdge {
            weight: 1.5,
            dest: 0,
        });
        record.tombstone();
        assert_eq!(record.offset(), TOMBSTONE);
        assert_eq!(record.external_id(), 9);
        assert_eq!(record.log_len(), 1);
    }
}
