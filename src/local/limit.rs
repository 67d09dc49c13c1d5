//! `LocalLimit`: truncate each partition independently to at most
//! `limit` rows. This is distinct from `GlobalLimit`, which enforces the
//! limit across the whole plan (spec.md §4.1/§4.2).

use crate::partition::Partition;

pub fn execute(input: &Partition, limit: usize) -> Partition {
    input.head(limit)
}
