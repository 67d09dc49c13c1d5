//! `PartitionSet`: a dense `0..n` vector of same-schema [`Partition`]s —
//! the unit every operator consumes and produces (spec.md §3).

use crate::error::EngineError;
use crate::partition::Partition;
use crate::schema::Schema;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct PartitionSet {
    pub schema: Arc<Schema>,
    pub partitions: Vec<Partition>,
}

impl PartitionSet {
    pub fn new(schema: Arc<Schema>, partitions: Vec<Partition>) -> Result<Self, EngineError> {
        for (i, p) in partitions.iter().enumerate() {
            if p.schema != schema {
                return Err(EngineError::schema(format!(
                    "partition {i} schema does not match partition set schema"
                )));
            }
        }
        Ok(Self { schema, partitions })
    }

    pub fn num_partitions(&self) -> usize {
        self.partitions.len()
    }

    pub fn num_rows(&self) -> usize {
        self.partitions.iter().map(Partition::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty() || self.num_rows() == 0
    }
}
