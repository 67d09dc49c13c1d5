//! `Projection`: evaluate an ordered expression list against a partition
//! (spec.md §4.1).

use crate::error::EngineError;
use crate::expr::Expr;
use crate::partition::Partition;
use crate::schema::Schema;
use std::sync::Arc;

pub fn execute(input: &Partition, exprs: &[Expr], schema: Arc<Schema>) -> Result<Partition, EngineError> {
    input.eval_expression_list(exprs, schema)
}
