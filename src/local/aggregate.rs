//! `LocalAggregate`: per-partition grouped aggregation (spec.md §4.1).
//! Global merging of per-partition groups — e.g. after a `Repartition`
//! on the grouping keys — is the caller's responsibility; this operator
//! only ever sees one partition and knows nothing about the others.

use crate::error::EngineError;
use crate::expr::{AggExpr, Expr};
use crate::partition::Partition;
use crate::schema::Schema;
use std::sync::Arc;

pub fn execute(
    input: &Partition,
    aggs: &[AggExpr],
    group_by: &[Expr],
    schema: Arc<Schema>,
) -> Result<Partition, EngineError> {
    input.agg(aggs, group_by, schema)
}
