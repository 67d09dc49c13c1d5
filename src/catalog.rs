//! `ScanOperator`: the minimal surface a catalog-backed data source must
//! implement for the planner to reason about a `Scan`.
//!
//! Grounded in `original_source/daft`'s `ScanOperator`/`io/scan.py`,
//! which the planner consults for `schema()` alone at plan-construction
//! time; actual row materialization happens later in [`crate::io`].
//! Trimmed to the one method spec.md's `ScanOperator` module names —
//! partition pruning and predicate pushdown are out of scope (spec.md §9
//! Non-goals).

use crate::schema::Schema;
use std::fmt;
use std::sync::Arc;

pub trait ScanOperator: Send + Sync {
    fn schema(&self) -> Arc<Schema>;

    /// Human-readable name for plan display/debugging.
    fn name(&self) -> &str {
        "ScanOperator"
    }
}

impl fmt::Debug for dyn ScanOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScanOperator({})", self.name())
    }
}

/// A scan operator backed by a fixed, already-known schema — used for
/// in-memory/CSV/Parquet sources where the schema is supplied by the
/// caller rather than discovered from a catalog.
#[derive(Debug)]
pub struct StaticCatalogScanOperator {
    schema: Arc<Schema>,
    name: String,
}

impl StaticCatalogScanOperator {
    pub fn new(name: impl Into<String>, schema: Arc<Schema>) -> Self {
        Self {
            schema,
            name: name.into(),
        }
    }
}

impl ScanOperator for StaticCatalogScanOperator {
    fn schema(&self) -> Arc<Schema> {
        self.schema.clone()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Stub for an Iceberg-catalog-backed scan (spec.md §6 names Iceberg as
/// the motivating `ScanOperator` implementation in `original_source/`).
/// Table-metadata resolution is not implemented; this exists so the
/// `ScanOperator` seam has a second, realistic implementor beyond the
/// static one, matching the shape `original_source/daft/iceberg_scan.py`
/// exposes to the planner (schema only, no I/O at plan time).
#[derive(Debug)]
pub struct IcebergCatalogScanOperator {
    table_identifier: String,
    schema: Arc<Schema>,
}

impl IcebergCatalogScanOperator {
    pub fn new(table_identifier: impl Into<String>, schema: Arc<Schema>) -> Self {
        Self {
            table_identifier: table_identifier.into(),
            schema,
        }
    }
}

impl ScanOperator for IcebergCatalogScanOperator {
    fn schema(&self) -> Arc<Schema> {
        self.schema.clone()
    }

    fn name(&self) -> &str {
        &self.table_identifier
    }
}
