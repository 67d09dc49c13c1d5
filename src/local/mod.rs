//! Partition-local operators: each runs independently on a single
//! partition, with no cross-partition communication (spec.md §4.1).

pub mod aggregate;
pub mod filter;
pub mod join;
pub mod limit;
pub mod project;
pub mod scan;
