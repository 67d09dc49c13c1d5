//! Testing utilities for building and asserting on partitions/partition
//! sets, adapted from the teacher's `testing` module (assertions,
//! builders, fixtures) to this engine's columnar data model.

use crate::column::Column;
use crate::partition::Partition;
use crate::partition_set::PartitionSet;
use crate::schema::{Field, Schema};
use crate::value::{DataType, Scalar};
use std::sync::Arc;

/// Debug trace to stderr, gated on `PARTFRAME_TRACE` so it's silent by
/// default — the teacher has no `log`/`tracing` dependency and uses a
/// plain `eprintln!` helper (`testing/debug.rs`) for the same purpose.
pub fn trace(msg: impl std::fmt::Display) {
    if std::env::var_os("PARTFRAME_TRACE").is_some() {
        eprintln!("[partframe] {msg}");
    }
}

/// Render a partition's shape for a trace line: `p<id> (<rows>x<cols>)`.
pub fn partition_summary(p: &Partition) -> String {
    format!("p{} ({}x{})", p.id, p.len(), p.schema.fields.len())
}

/// Build an `Int64` column partition from plain `i64`s, with no nulls.
pub fn int_partition(id: usize, name: &str, values: Vec<i64>) -> Partition {
    let schema = Schema::arc(vec![Field::new(0, name, DataType::Int64)]);
    Partition::new(id, schema, vec![Column::Int64(values.into_iter().map(Some).collect())])
        .expect("int_partition: well-formed by construction")
}

/// Build a two-column `(Int64, Utf8)` partition, a common fixture shape
/// for join/aggregate tests.
pub fn id_name_partition(id: usize, rows: Vec<(i64, &str)>) -> Partition {
    let schema = Schema::arc(vec![
        Field::new(0, "id", DataType::Int64),
        Field::new(1, "name", DataType::Utf8),
    ]);
    let ids = Column::Int64(rows.iter().map(|(i, _)| Some(*i)).collect());
    let names = Column::Utf8(rows.iter().map(|(_, n)| Some(n.to_string())).collect());
    Partition::new(id, schema, vec![ids, names]).expect("id_name_partition: well-formed by construction")
}

/// Build an in-memory `Scan` source from whole, unsplit `(name, column)`
/// pairs — the engine does the `num_partitions`-way slicing at scan time
/// (spec.md §4.1/§6), so fixtures hand over full columns, not partitions.
pub fn in_memory_source(columns: Vec<(&str, Column)>, num_partitions: usize) -> crate::plan::SourceInfo {
    let columns = columns.into_iter().map(|(name, col)| (name.to_string(), col)).collect();
    crate::plan::SourceInfo::InMemory { columns, num_partitions }
}

/// Shorthand for a single `Int64` in-memory source.
pub fn in_memory_int_source(name: &str, values: Vec<i64>, num_partitions: usize) -> crate::plan::SourceInfo {
    in_memory_source(vec![(name, Column::Int64(values.into_iter().map(Some).collect()))], num_partitions)
}

/// Read every row of a single column out as plain `Scalar`s, in order.
pub fn column_values(partition: &Partition, col_idx: usize) -> Vec<Scalar> {
    let col = partition.column(col_idx).expect("column index in range");
    (0..col.len()).map(|i| col.get(i)).collect()
}

/// Read a single `Int64` column out as plain `i64`s; panics if any value
/// is null or of another type (assertion helper, not production code).
pub fn int_column_values(partition: &Partition, col_idx: usize) -> Vec<i64> {
    column_values(partition, col_idx)
        .into_iter()
        .map(|s| match s {
            Scalar::Int64(v) => v,
            other => panic!("expected Int64, got {other:?}"),
        })
        .collect()
}

/// Flatten every partition's given column into one `Vec<Scalar>`, in
/// partition-id order — the natural shape for order-sensitive assertions
/// against a `Sort` or `GlobalLimit` result.
pub fn flatten_column(ps: &PartitionSet, col_idx: usize) -> Vec<Scalar> {
    ps.partitions.iter().flat_map(|p| column_values(p, col_idx)).collect()
}

/// Assert a `PartitionSet`'s column, read across partitions in order,
/// equals `expected` exactly.
pub fn assert_column_eq(ps: &PartitionSet, col_idx: usize, expected: Vec<Scalar>) {
    assert_eq!(flatten_column(ps, col_idx), expected);
}

/// Assert a `PartitionSet`'s column, read across partitions, equals
/// `expected` up to reordering (used where partition assignment is not
/// deterministic across runs in row order, only in content).
pub fn assert_column_unordered_eq(ps: &PartitionSet, col_idx: usize, mut expected: Vec<Scalar>) {
    let mut actual = flatten_column(ps, col_idx);
    actual.sort_by(Scalar::cmp_nulls_last);
    expected.sort_by(Scalar::cmp_nulls_last);
    assert_eq!(actual, expected);
}

/// Assert every partition in `ps` declares the same schema as `schema`.
pub fn assert_schema_stable(ps: &PartitionSet, schema: &Arc<Schema>) {
    assert_eq!(&ps.schema, schema);
    for p in &ps.partitions {
        assert_eq!(&p.schema, schema);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_partition_round_trips_values() {
        let p = int_partition(0, "v", vec![1, 2, 3]);
        assert_eq!(int_column_values(&p, 0), vec![1, 2, 3]);
    }

    #[test]
    fn flatten_column_preserves_partition_order() {
        let schema = Schema::arc(vec![Field::new(0, "v", DataType::Int64)]);
        let ps = PartitionSet::new(
            schema,
            vec![int_partition(0, "v", vec![1, 2]), int_partition(1, "v", vec![3, 4])],
        )
        .unwrap();
        assert_column_eq(&ps, 0, vec![Scalar::Int64(1), Scalar::Int64(2), Scalar::Int64(3), Scalar::Int64(4)]);
    }
}
