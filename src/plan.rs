//! The logical plan DAG: [`LogicalNode`]s addressed by [`NodeId`], each
//! declaring its operator, schema, and partition count up front (schema
//! stability invariant, spec.md §3/§8).
//!
//! Grounded in the teacher's [`crate` `node.rs`] tagged-variant `Node`
//! enum, generalized from a type-erased row IR to a concrete columnar
//! one: every operator here works over [`crate::partition::Partition`]
//! directly, so there is no `Arc<dyn Any>`/`VecOps` type-erasure layer.

use crate::column::Column;
use crate::expr::{AggExpr, Expr, SortExpr};
use crate::local::join::JoinType;
use crate::schema::Schema;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl fmt::Debug for SourceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceInfo::InMemory { columns, num_partitions } => {
                write!(f, "InMemory({} columns, {num_partitions} partitions)", columns.len())
            }
            SourceInfo::Csv { paths, .. } => write!(f, "Csv({paths:?})"),
            SourceInfo::Parquet { paths } => write!(f, "Parquet({paths:?})"),
            SourceInfo::Catalog(op) => write!(f, "Catalog({op:?})"),
        }
    }
}

/// Where a `Scan` reads its rows from.
#[derive(Clone)]
pub enum SourceInfo {
    /// A whole `column_name -> column_values` dict sliced by the engine
    /// into `num_partitions` equal parts at scan time (spec.md §4.1/§6);
    /// the caller supplies unsplit columns, not pre-cut partitions.
    InMemory {
        columns: HashMap<String, Column>,
        num_partitions: usize,
    },
    Csv {
        paths: Vec<String>,
        delimiter: u8,
        has_header: bool,
    },
    Parquet { paths: Vec<String> },
    /// A catalog-backed scan; only `schema()` is consulted at plan time
    /// (spec.md §6, `ScanOperator`).
    Catalog(Arc<dyn crate::catalog::ScanOperator>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RepartitionScheme {
    Random,
    Hash,
}

/// An operator's identity and parameters. Local operators run
/// independently per partition; global operators are barriers that see
/// every partition at once (spec.md §4).
#[derive(Clone)]
pub enum Operator {
    // --- local ---
    Scan { source: SourceInfo },
    Projection { exprs: Vec<Expr> },
    Filter { predicate: Expr },
    LocalLimit { limit: usize },
    LocalAggregate { aggs: Vec<AggExpr>, group_by: Vec<Expr> },
    Join {
        left_on: Vec<Expr>,
        right_on: Vec<Expr>,
        how: JoinType,
    },
    // --- global ---
    GlobalLimit { limit: usize },
    Repartition {
        scheme: RepartitionScheme,
        /// Key expressions for `RepartitionScheme::Hash`; ignored by `Random`.
        exprs: Vec<Expr>,
        num_partitions: usize,
    },
    Sort { keys: Vec<SortExpr>, num_partitions: usize },
    Coalesce { num_partitions: usize },
}

impl Operator {
    /// True for operators that require seeing all partitions together
    /// (the planner's local/global alternation is built on this, spec.md
    /// §4.2/§5).
    pub fn is_global(&self) -> bool {
        matches!(
            self,
            Operator::GlobalLimit { .. }
                | Operator::Repartition { .. }
                | Operator::Sort { .. }
                | Operator::Coalesce { .. }
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            Operator::Scan { .. } => "Scan",
            Operator::Projection { .. } => "Projection",
            Operator::Filter { .. } => "Filter",
            Operator::LocalLimit { .. } => "LocalLimit",
            Operator::LocalAggregate { .. } => "LocalAggregate",
            Operator::Join { .. } => "Join",
            Operator::GlobalLimit { .. } => "GlobalLimit",
            Operator::Repartition { .. } => "Repartition",
            Operator::Sort { .. } => "Sort",
            Operator::Coalesce { .. } => "Coalesce",
        }
    }
}

/// One node of the plan DAG: an operator plus its declared output shape.
/// `num_partitions` is informational pre-Join/Repartition/Coalesce/Sort;
/// those operators are themselves what changes it downstream.
#[derive(Clone)]
pub struct LogicalNode {
    pub id: NodeId,
    pub children: Vec<NodeId>,
    pub schema: Arc<Schema>,
    pub num_partitions: usize,
    pub op: Operator,
}

/// The plan DAG: every node addressable by id, plus the root to execute.
#[derive(Clone, Default)]
pub struct LogicalPlan {
    pub nodes: HashMap<NodeId, LogicalNode>,
    pub root: Option<NodeId>,
}

impl LogicalPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, id: NodeId) -> Option<&LogicalNode> {
        self.nodes.get(&id)
    }

    pub fn root_node(&self) -> Option<&LogicalNode> {
        self.root.and_then(|id| self.node(id))
    }
}

/// Convenience builder that assigns sequential [`NodeId`]s while wiring
/// up a [`LogicalPlan`] (mirrors the teacher's `Pipeline::insert_node`
/// fluency, adapted to return ids instead of typed `PCollection`s since
/// this plan is columnar/dynamically-typed throughout).
#[derive(Default)]
pub struct LogicalPlanBuilder {
    plan: LogicalPlan,
    next_id: u64,
}

impl LogicalPlanBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn add(
        &mut self,
        children: Vec<NodeId>,
        schema: Arc<Schema>,
        num_partitions: usize,
        op: Operator,
    ) -> NodeId {
        let id = self.alloc();
        self.plan.nodes.insert(
            id,
            LogicalNode {
                id,
                children,
                schema,
                num_partitions,
                op,
            },
        );
        id
    }

    pub fn set_root(&mut self, id: NodeId) {
        self.plan.root = Some(id);
    }

    pub fn finish(self) -> LogicalPlan {
        self.plan
    }
}
