//! Concurrent, in-memory, dynamic graph store for sparse 64-bit vertex
//! ids: a radix-partitioned vertex index mapping external ids to stable
//! dense offsets, per-vertex append-only edge logs materialized on read,
//! and analytical kernels (BFS, Dijkstra, parallel Δ-stepping) on top.

pub mod append_vec;
pub mod bitmap;
pub mod config;
pub mod error;
pub mod graph;
pub mod index;
pub mod vertex;

mod delta;
mod traverse;

pub use append_vec::AppendVec;
pub use bitmap::AtomicBitmap;
pub use config::{CAP_VERTICES, GraphConfig, MAX_THREADS};
pub use delta::{DIST_INF, MAX_BIN};
pub use error::GraphError;
pub use graph::Quiver;
pub use index::RadixIndex;
pub use vertex::{ExternalId, Offset, TOMBSTONE, VertexRecord, WeightedEdge};

#[cfg(test)]
mod tests;
