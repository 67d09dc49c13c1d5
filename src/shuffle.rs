//! The generic shuffle kernel every global operator funnels through:
//! `Repartition`, `Sort`'s range redistribution, and (trivially, with a
//! single target) `Coalesce`.
//!
//! Grounded in the teacher's `exec_par` rayon fan-out/fan-in shape
//! (`runner.rs`), generalized from "split source N ways, fold stateless
//! ops, merge" to "map each partition into per-target buckets, then
//! reduce every target's buckets back into one partition".
//!
//! Guarantee: within a target bucket, sub-partitions are reduced in
//! ascending source-partition order — `map_fn` on partition 0 always
//! contributes before partition 1's contribution, regardless of which
//! partition's map task happens to finish first. This is what lets
//! `Sort`'s merge step stay a simple ordered merge instead of a second
//! sort.

use crate::error::EngineError;
use crate::partition::Partition;
use rayon::prelude::*;
use std::collections::HashMap;

pub fn shuffle<M, R>(
    partitions: &[Partition],
    num_targets: usize,
    map_fn: M,
    reduce_fn: R,
) -> Result<Vec<Partition>, EngineError>
where
    M: Fn(&Partition) -> Result<HashMap<usize, Partition>, EngineError> + Sync,
    R: Fn(Vec<Partition>) -> Result<Partition, EngineError> + Sync,
{
    let mapped: Vec<HashMap<usize, Partition>> = partitions
        .par_iter()
        .map(&map_fn)
        .collect::<Result<Vec<_>, _>>()?;

    let mut buckets: Vec<Vec<Partition>> = (0..num_targets).map(|_| Vec::new()).collect();
    for per_source in mapped {
        for (target, sub) in per_source {
            buckets[target].push(sub);
        }
    }
    for bucket in &mut buckets {
        bucket.sort_by_key(|p| p.id);
    }

    // A target that no source partition routed any rows to still needs an
    // output partition (repartitioning into more targets than there are
    // distinct keys/rows is routine) — `reduce_fn` is only meaningful over
    // a non-empty bucket, so synthesize an empty one directly.
    let fallback_schema = partitions.first().map(|p| p.schema.clone());
    buckets
        .into_par_iter()
        .enumerate()
        .map(|(target, bucket)| {
            if bucket.is_empty() {
                let schema = fallback_schema.clone().ok_or_else(|| {
                    EngineError::data("shuffle: cannot build an empty target partition with no input partitions".to_string())
                })?;
                Ok(Partition::empty(target, schema))
            } else {
                reduce_fn(bucket)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Column;
    use crate::schema::{Field, Schema};
    use crate::value::DataType;
    use std::sync::Arc;

    fn one_col_partition(id: usize, values: Vec<i64>) -> Partition {
        let schema = Schema::arc(vec![Field::new(0, "v", DataType::Int64)]);
        Partition::new(id, schema, vec![Column::Int64(values.into_iter().map(Some).collect())]).unwrap()
    }

    #[test]
    fn routes_and_merges_in_source_order() {
        let parts = vec![one_col_partition(0, vec![1, 2]), one_col_partition(1, vec![3, 4])];

        let out = shuffle(
            &parts,
            1,
            |p| {
                let mut m = HashMap::new();
                m.insert(0, p.clone());
                Ok(m)
            },
            |bucket| Partition::merge_partitions(&bucket, false),
        )
        .unwrap();

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].len(), 4);
        let col = out[0].column(0).unwrap();
        let values: Vec<i64> = (0..col.len())
            .map(|i| match col.get(i) {
                crate::value::Scalar::Int64(v) => v,
                _ => panic!("expected int"),
            })
            .collect();
        assert_eq!(values, vec![1, 2, 3, 4]);
    }
}
