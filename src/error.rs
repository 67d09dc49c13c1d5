//! Error taxonomy for the execution engine.
//!
//! Every engine entry point returns `anyhow::Result<T>` at the public
//! boundary (matching the teacher's `anyhow`-everywhere style) but the
//! concrete failure is always one of the variants below, so callers that
//! need to distinguish failure classes can `downcast_ref::<EngineError>()`
//! on the returned `anyhow::Error`.

use thiserror::Error;

use crate::plan::NodeId;

/// The five failure classes from the engine's error taxonomy.
///
/// Propagation policy: every error is fatal to the current plan execution.
/// The engine surfaces the first error, frees the registry, and aborts
/// outstanding parallel tasks. No partial `PartitionSet` is ever returned.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Unknown node kind, cyclic plan, missing child binding.
    #[error("plan error: {0}")]
    Plan(String),

    /// Operator's declared output schema disagrees with the computed
    /// result, or a join-key type mismatch.
    #[error("schema error: {0}")]
    Schema(String),

    /// Ragged partitions, empty partition where quantiles were required,
    /// bad row count in multi-column ops.
    #[error("data error: {0}")]
    Data(String),

    /// File missing, parse failure, partition index out of range.
    #[error("source error: {0}")]
    Source(String),

    /// Allocation failure, I/O failure.
    #[error("resource error: {0}")]
    Resource(String),
}

impl EngineError {
    pub fn plan(msg: impl Into<String>) -> Self {
        Self::Plan(msg.into())
    }

    pub fn schema(msg: impl Into<String>) -> Self {
        Self::Schema(msg.into())
    }

    pub fn data(msg: impl Into<String>) -> Self {
        Self::Data(msg.into())
    }

    pub fn source(msg: impl Into<String>) -> Self {
        Self::Source(msg.into())
    }

    pub fn resource(msg: impl Into<String>) -> Self {
        Self::Resource(msg.into())
    }

    /// Helper for "missing registry binding for node" failures, which show
    /// up in both the local and global runner.
    pub fn missing_binding(node: NodeId) -> Self {
        Self::Plan(format!("no live binding for node {node:?}"))
    }
}
