//! `Sort`: range-partitioned distributed sort (spec.md §4.2.4). Each
//! partition contributes a deterministic sample; the merged samples give
//! `num_partitions - 1` boundaries; rows are shuffled into ascending
//! target partitions by those boundaries; each target partition is then
//! sorted locally. Target `i` holding only keys less than target `i+1`'s
//! minimum means the whole `PartitionSet`, read partition 0..n in order,
//! is globally sorted.

use crate::error::EngineError;
use crate::expr::SortExpr;
use crate::partition::Partition;
use crate::sampler::{assign_bucket, compare_rows, compute_boundaries, key_rows};
use crate::shuffle::shuffle;
use std::collections::HashMap;

pub fn execute(
    partitions: &[Partition],
    keys: &[SortExpr],
    num_partitions: usize,
) -> Result<Vec<Partition>, EngineError> {
    if partitions.is_empty() {
        return Ok(Vec::new());
    }
    let boundaries = compute_boundaries(partitions, keys, num_partitions)?;

    let shuffled = shuffle(
        partitions,
        num_partitions,
        |p| {
            let rows = key_rows(p, keys)?;
            let mut masks: HashMap<usize, Vec<bool>> = (0..num_partitions)
                .map(|t| (t, vec![false; p.len()]))
                .collect();
            for (row, key) in rows.iter().enumerate() {
                let target = assign_bucket(key, &boundaries, keys);
                masks.get_mut(&target).unwrap()[row] = true;
            }
            masks
                .into_iter()
                .map(|(t, mask)| Ok((t, p.filter(&mask)?)))
                .collect()
        },
        |bucket| Partition::merge_partitions(&bucket, false),
    )?;

    shuffled
        .into_iter()
        .enumerate()
        .map(|(id, p)| sort_locally(id, &p, keys))
        .collect()
}

fn sort_locally(id: usize, p: &Partition, keys: &[SortExpr]) -> Result<Partition, EngineError> {
    let rows = key_rows(p, keys)?;
    let mut order: Vec<usize> = (0..p.len()).collect();
    order.sort_by(|&a, &b| compare_rows(&rows[a], &rows[b], keys));
    let columns = p.columns.iter().map(|c| c.take(&order)).collect();
    Partition::new(id, p.schema.clone(), columns)
}
