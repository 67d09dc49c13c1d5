//! Data-source adapters (spec.md §6): "external collaborators" the core
//! engine consumes only through `Scan`'s `partition_id`-indexed read
//! contract. No compression, no streaming shards, no writers — the
//! engine only ever reads (spec.md Non-goals: "persistent storage of
//! intermediate results").

#[cfg(feature = "io-csv")]
pub mod csv;

#[cfg(feature = "io-parquet")]
pub mod parquet;
