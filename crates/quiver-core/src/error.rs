use thiserror::Error;

/// Failures the store reports through `Result`. Absent vertices and edges
/// are not errors: the edge-level operations signal them with `false` and
/// callers are expected to treat that as a no-op.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    /// Constructor preconditions violated. Fatal at construction.
    #[error("invalid graph configuration: {reason}")]
    InvalidConfig { reason: String },

    /// The reserved dense-table capacity was exhausted. There is no
    /// recovery path mid-append; the insert path raises this as a panic.
    #[error("vertex capacity exhausted ({capacity} records)")]
    CapacityExceeded { capacity: usize },
}

impl GraphError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        GraphError::InvalidConfig {
            reason: reason.into(),
        }
    }
}
