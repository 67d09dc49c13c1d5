//! Range-partition boundary computation for `Sort` (spec.md §4.2.4).
//!
//! Grounded in `original_source/daft`'s distributed sort: each partition
//! contributes a deterministic sample, samples are merged into one
//! partition, and `m - 1` quantile boundaries are read off the merged,
//! sorted sample. Bucket assignment against those boundaries is monotone
//! with respect to the same comparator used to build them, so rows
//! routed into ascending target ids stay globally sorted after each
//! target's own local sort.

use crate::error::EngineError;
use crate::expr::SortExpr;
use crate::partition::Partition;
use crate::value::Scalar;
use std::cmp::Ordering;

/// Rows sampled per partition before merging (spec.md §4.2.4).
pub const SAMPLE_SIZE: usize = 20;

/// Compare two same-shaped key tuples using `keys`' per-column directions.
pub fn compare_rows(a: &[Scalar], b: &[Scalar], keys: &[SortExpr]) -> Ordering {
    for (i, key) in keys.iter().enumerate() {
        let ord = a[i].cmp_nulls_last(&b[i]);
        let ord = if key.descending { ord.reverse() } else { ord };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

pub(crate) fn key_rows(partition: &Partition, keys: &[SortExpr]) -> Result<Vec<Vec<Scalar>>, EngineError> {
    let cols = keys
        .iter()
        .map(|k| k.expr.eval(partition))
        .collect::<Result<Vec<_>, _>>()?;
    Ok((0..partition.len())
        .map(|row| cols.iter().map(|c| c.get(row)).collect())
        .collect())
}

/// Compute `num_partitions - 1` boundary tuples that split `partitions`'
/// combined key space into `num_partitions` ranges of roughly equal size.
pub fn compute_boundaries(
    partitions: &[Partition],
    keys: &[SortExpr],
    num_partitions: usize,
) -> Result<Vec<Vec<Scalar>>, EngineError> {
    if num_partitions <= 1 {
        return Ok(Vec::new());
    }

    let mut samples: Vec<Vec<Scalar>> = Vec::new();
    for partition in partitions {
        let sampled = partition.sample(SAMPLE_SIZE);
        samples.extend(key_rows(&sampled, keys)?);
    }

    if samples.is_empty() {
        return Ok(Vec::new());
    }

    samples.sort_by(|a, b| compare_rows(a, b, keys));
    let n = samples.len();
    Ok((1..num_partitions)
        .map(|k| {
            let idx = ((k * n) / num_partitions).min(n - 1);
            samples[idx].clone()
        })
        .collect())
}

/// Which target partition (`0..=boundaries.len()`) a row with key `row`
/// belongs in, given ascending boundaries built by [`compute_boundaries`].
pub fn assign_bucket(row: &[Scalar], boundaries: &[Vec<Scalar>], keys: &[SortExpr]) -> usize {
    // first boundary b_i such that row <= b_i
    boundaries
        .iter()
        .position(|b| compare_rows(row, b, keys) != Ordering::Greater)
        .unwrap_or(boundaries.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Column;
    use crate::expr::Expr;
    use crate::schema::{Field, Schema};
    use crate::value::DataType;

    fn partition(id: usize, values: Vec<i64>) -> Partition {
        let schema = Schema::arc(vec![Field::new(0, "v", DataType::Int64)]);
        Partition::new(id, schema, vec![Column::Int64(values.into_iter().map(Some).collect())]).unwrap()
    }

    #[test]
    fn boundaries_are_ascending() {
        let parts = vec![
            partition(0, (0..50).collect()),
            partition(1, (50..100).collect()),
        ];
        let keys = vec![SortExpr::new(Expr::col(0), false)];
        let boundaries = compute_boundaries(&parts, &keys, 4).unwrap();
        assert_eq!(boundaries.len(), 3);
        for w in boundaries.windows(2) {
            assert_ne!(compare_rows(&w[0], &w[1], &keys), Ordering::Greater);
        }
    }

    #[test]
    fn bucket_assignment_monotone() {
        let keys = vec![SortExpr::new(Expr::col(0), false)];
        let boundaries = vec![vec![Scalar::Int64(10)], vec![Scalar::Int64(20)]];
        assert_eq!(assign_bucket(&[Scalar::Int64(5)], &boundaries, &keys), 0);
        assert_eq!(assign_bucket(&[Scalar::Int64(15)], &boundaries, &keys), 1);
        assert_eq!(assign_bucket(&[Scalar::Int64(25)], &boundaries, &keys), 2);
    }
}
