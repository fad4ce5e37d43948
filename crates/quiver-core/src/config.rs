use crate::error::GraphError;

/// Default reserved dense-table capacity. Also sizes the per-worker
/// seen-destination bit sets, so it bounds the number of distinct vertices
/// a store instance can ever hold.
pub const CAP_VERTICES: usize = 50_000_000;

/// Fixed cardinality of the worker pool.
pub const MAX_THREADS: usize = 64;

/// Construction parameters for a store.
///
/// `bits_per_level` partitions the external id most-significant-first: a
/// node at level `i` fans out over `1 << bits_per_level[i]` children. The
/// widths must sum to at least the effective width of the ids the caller
/// will use (bits above the sum are ignored by the index walk).
///
/// Calibration examples for 32-bit ids: `[15, 6, 6, 5]` or, for wider
/// fan-out at the root, `[12, 3, 3, 3, 3, 3, 3, 2]`.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    pub depth: usize,
    pub bits_per_level: Vec<u32>,
    pub enable_query: bool,
    pub capacity: usize,
    pub threads: usize,
}

impl GraphConfig {
    pub fn new(bits_per_level: Vec<u32>) -> Self {
        Self {
            depth: bits_per_level.len(),
            bits_per_level,
            enable_query: true,
            capacity: CAP_VERTICES,
            threads: MAX_THREADS,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), GraphError> {
        if self.depth == 0 {
            return Err(GraphError::invalid("index depth must be at least 1"));
        }
        if self.depth != self.bits_per_level.len() {
            return Err(GraphError::invalid(format!(
                "depth {} does not match {} per-level bit widths",
                self.depth,
                self.bits_per_level.len()
            )));
        }
        if self.bits_per_level.iter().any(|&bits| bits == 0) {
            return Err(GraphError::invalid("every level must consume at least 1 bit"));
        }
        let total: u32 = self.bits_per_level.iter().sum();
        if total > 64 {
            return Err(GraphError::invalid(format!(
                "per-level bit widths sum to {total}, above the 64-bit id width"
            )));
        }
        if self.capacity == 0 {
            return Err(GraphError::invalid("vertex capacity must be non-zero"));
        }
        if self.capacity > i32::MAX as usize {
            return Err(GraphError::invalid(
                "vertex capacity must fit the 32-bit offset domain",
            ));
        }
        if self.threads == 0 {
            return Err(GraphError::invalid("worker pool needs at least 1 thread"));
        }
        Ok(())
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self::new(vec![15, 6, 6, 5])
    }
}
