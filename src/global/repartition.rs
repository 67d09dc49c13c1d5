//! `Repartition`: redistribute rows across `num_partitions` output
//! partitions, either by a seeded uniform random assignment or by
//! `hash(key_tuple) mod num_partitions` (spec.md §4.2.2).
//!
//! Both variants delegate to the generic [`crate::shuffle::shuffle`]
//! kernel: `map_fn` buckets a partition's rows by target id, `reduce_fn`
//! concatenates each target's buckets in ascending source-partition
//! order.

use crate::error::EngineError;
use crate::expr::Expr;
use crate::partition::Partition;
use crate::shuffle::shuffle;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

fn bucket_rows(partition: &Partition, targets: Vec<usize>) -> Result<HashMap<usize, Partition>, EngineError> {
    let mut masks: HashMap<usize, Vec<bool>> = HashMap::new();
    for &t in &targets {
        masks.entry(t).or_insert_with(|| vec![false; partition.len()]);
    }
    for (row, &t) in targets.iter().enumerate() {
        masks.get_mut(&t).unwrap()[row] = true;
    }
    masks
        .into_iter()
        .map(|(t, mask)| Ok((t, partition.filter(&mask)?)))
        .collect()
}

/// Uniform random assignment seeded by `(partition_id, row_index)` so
/// reruns reproduce the identical `PartitionSet` (spec.md §8 determinism
/// invariant, and "given a fixed seed" — here the seed is derived, not
/// user-supplied, since the invariant only asks for reproducibility).
pub fn random(partitions: &[Partition], num_partitions: usize) -> Result<Vec<Partition>, EngineError> {
    shuffle(
        partitions,
        num_partitions,
        |p| {
            let targets = (0..p.len())
                .map(|row| {
                    let mut rng = StdRng::seed_from_u64(seed_for(p.id, row));
                    rng.gen_range(0..num_partitions)
                })
                .collect();
            bucket_rows(p, targets)
        },
        |bucket| Partition::merge_partitions(&bucket, false),
    )
}

fn seed_for(partition_id: usize, row: usize) -> u64 {
    (partition_id as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ (row as u64)
}

/// `hash(key_tuple) mod num_partitions`, deterministic and seed-free.
pub fn hash(
    partitions: &[Partition],
    keys: &[Expr],
    num_partitions: usize,
) -> Result<Vec<Partition>, EngineError> {
    shuffle(
        partitions,
        num_partitions,
        |p| {
            let cols = keys.iter().map(|k| k.eval(p)).collect::<Result<Vec<_>, _>>()?;
            let targets = (0..p.len())
                .map(|row| {
                    let key: Vec<_> = cols.iter().map(|c| c.get(row)).collect();
                    (crate::value::hash_scalars(&key) as usize) % num_partitions
                })
                .collect();
            bucket_rows(p, targets)
        },
        |bucket| Partition::merge_partitions(&bucket, false),
    )
}
