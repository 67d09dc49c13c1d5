//! # Partframe
//!
//! A physical execution engine for partitioned, columnar dataframe query
//! plans. Given a logical plan expressed as a DAG of relational
//! operators, `partframe` produces a result as a set of columnar
//! partitions by splitting the plan into pipelines of partition-local
//! operators interleaved with global operators that need cross-partition
//! coordination (shuffles, sorts, limits, coalesces).
//!
//! ## Core Concepts
//!
//! - [`Scalar`]/[`DataType`] — a typed cell value and the type it carries.
//! - [`Column`] — a typed, length-uniform array (the "Block" capability
//!   surface: filter mask, head, sample, quantiles, hash, compare).
//! - [`Schema`] — the ordered `(column_id, name, type)` contract every
//!   partition of a plan node shares.
//! - [`Partition`] — an immutable columnar table fragment; the unit every
//!   operator consumes and produces.
//! - [`PartitionSet`] — a dense `0..n` vector of same-schema partitions.
//! - [`LogicalPlan`]/[`LogicalNode`]/[`Operator`] — the plan DAG the
//!   engine executes.
//! - [`Engine`] — the driver that walks the plan and returns a
//!   [`PartitionSet`].
//!
//! ## Quick Start
//!
//! ```no_run
//! use partframe::*;
//! use partframe::plan::{LogicalPlanBuilder, Operator, SourceInfo};
//! use partframe::schema::{Field, Schema};
//! use partframe::value::DataType;
//! use std::collections::HashMap;
//!
//! # fn main() -> anyhow::Result<()> {
//! let schema = Schema::arc(vec![Field::new(0, "v", DataType::Int64)]);
//! let mut columns = HashMap::new();
//! columns.insert("v".to_string(), Column::Int64(vec![Some(1), Some(2), Some(3)]));
//! let mut builder = LogicalPlanBuilder::new();
//! let scan = builder.add(
//!     vec![],
//!     schema.clone(),
//!     1,
//!     Operator::Scan { source: SourceInfo::InMemory { columns, num_partitions: 1 } },
//! );
//! builder.set_root(scan);
//! let plan = builder.finish();
//!
//! let engine = Engine::default();
//! let result = engine.execute(&plan)?;
//! # let _ = result;
//! # Ok(())
//! # }
//! ```
//!
//! ## Operators
//!
//! Partition-local (no cross-partition coordination): `Scan`,
//! `Projection`, `Filter`, `LocalLimit`, `LocalAggregate`, `Join`.
//! Global (consume and return whole partition sets): `GlobalLimit`,
//! `Repartition`, `Sort`, `Coalesce`.
//!
//! ## Error Handling
//!
//! Every fallible operation returns [`error::EngineError`], one of five
//! classes (`Plan`, `Schema`, `Data`, `Source`, `Resource`). Every error
//! is fatal to the current plan execution — the engine surfaces the
//! first error and never returns a partial result.

pub mod catalog;
pub mod column;
pub mod engine;
pub mod error;
pub mod expr;
pub mod global;
pub mod io;
pub mod local;
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod partition;
pub mod partition_set;
pub mod plan;
pub mod planner;
pub mod registry;
pub mod sampler;
pub mod schema;
pub mod shuffle;
pub mod testing;
pub mod value;

pub use column::Column;
pub use engine::{Engine, EngineConfig, ExecMode};
pub use error::EngineError;
pub use partition::Partition;
pub use partition_set::PartitionSet;
pub use plan::{LogicalNode, LogicalPlan, LogicalPlanBuilder, NodeId, Operator};
pub use schema::{Field, Schema};
pub use value::{DataType, Scalar};
