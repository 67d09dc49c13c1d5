//! `GlobalLimit`: truncate the whole plan's output to `limit` rows total,
//! in partition-id order (spec.md §4.2.1: "Partition count is preserved").
//! Partitions are read in order and a running total (cumulative sum)
//! decides where the cut lands — the partition straddling the cut is
//! truncated with `head`, and every partition after it is kept but
//! emptied out, the same way `shuffle.rs`/`coalesce.rs` pad a target that
//! received no rows. Partitions before the cut are passed through
//! unchanged.

use crate::partition::Partition;

pub fn execute(partitions: &[Partition], limit: usize) -> Vec<Partition> {
    let mut out = Vec::with_capacity(partitions.len());
    let mut seen = 0usize;
    for p in partitions {
        if seen >= limit {
            out.push(Partition::empty(p.id, p.schema.clone()));
            continue;
        }
        let remaining = limit - seen;
        if p.len() <= remaining {
            seen += p.len();
            out.push(p.clone());
        } else {
            out.push(p.head(remaining));
            seen = limit;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Column;
    use crate::schema::{Field, Schema};
    use crate::value::DataType;

    fn partition(id: usize, values: Vec<i64>) -> Partition {
        let schema = Schema::arc(vec![Field::new(0, "v", DataType::Int64)]);
        Partition::new(id, schema, vec![Column::Int64(values.into_iter().map(Some).collect())]).unwrap()
    }

    #[test]
    fn cuts_across_partition_boundary_and_empties_the_rest() {
        let parts = vec![
            partition(0, vec![1, 2, 3, 4]),
            partition(1, vec![5, 6, 7]),
            partition(2, vec![8, 9]),
        ];
        let out = execute(&parts, 7);
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].len(), 4);
        assert_eq!(out[1].len(), 3);
        assert_eq!(out[2].len(), 0);
    }

    #[test]
    fn limit_zero_keeps_every_partition_but_empties_all_of_them() {
        let parts = vec![partition(0, vec![1, 2, 3]), partition(1, vec![4, 5])];
        let out = execute(&parts, 0);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|p| p.is_empty()));
    }
}
