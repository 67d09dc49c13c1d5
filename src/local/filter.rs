//! `Filter`: keep rows where a boolean predicate is true; null predicate
//! values are treated as false, never as an error (spec.md §4.1).

use crate::error::EngineError;
use crate::expr::Expr;
use crate::partition::Partition;

pub fn execute(input: &Partition, predicate: &Expr) -> Result<Partition, EngineError> {
    input.filter_expr(predicate)
}
