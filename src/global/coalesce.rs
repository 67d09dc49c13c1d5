//! `Coalesce`: reduce `n` input partitions down to `m` output partitions
//! (spec.md §4.2) by grouping input partition `i` into output group
//! `floor(i * m / n)`, then concatenating each group in input order.

use crate::error::EngineError;
use crate::partition::Partition;

pub fn execute(partitions: &[Partition], num_partitions: usize) -> Result<Vec<Partition>, EngineError> {
    let n = partitions.len();
    if num_partitions == 0 {
        return Err(EngineError::plan("coalesce: num_partitions must be > 0".to_string()));
    }
    let mut groups: Vec<Vec<Partition>> = (0..num_partitions).map(|_| Vec::new()).collect();
    for (i, p) in partitions.iter().enumerate() {
        let target = (i * num_partitions) / n.max(1);
        groups[target.min(num_partitions - 1)].push(p.clone());
    }
    groups
        .into_iter()
        .enumerate()
        .map(|(id, group)| {
            if group.is_empty() {
                Ok(Partition::empty(id, partitions[0].schema.clone()))
            } else {
                let merged = Partition::merge_partitions(&group, false)?;
                Ok(Partition { id, ..merged })
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

    fn partition(id: usize, values: Vec<i64>) -> Partition {
        let schema = Schema::arc(vec![Field::new(0, "v", DataType::Int64)]);
        Partition::new(id, schema, vec![Column::Int64(values.into_iter().map(Some).collect())]).unwrap()
    }

    #[test]
    fn groups_by_floor_ratio() {
        let parts = (0..6).map(|i| partition(i, vec![i as i64])).collect::<Vec<_>>();
        let out = execute(&parts, 3).unwrap();
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].len(), 2);
        assert_eq!(out[1].len(), 2);
        assert_eq!(out[2].len(), 2);
    }
}
