//! `Scan`: read one already-known partition's worth of rows. The actual
//! file decoding lives in [`crate::io`]; this module just dispatches on
//! [`SourceInfo`] by partition index (spec.md §4.1 Scan).

use crate::column::Column;
use crate::error::EngineError;
use crate::partition::Partition;
use crate::plan::SourceInfo;
use crate::schema::Schema;
use std::collections::HashMap;
use std::sync::Arc;

pub fn execute(
    source: &SourceInfo,
    partition_id: usize,
    schema: Arc<Schema>,
) -> Result<Partition, EngineError> {
    match source {
        SourceInfo::InMemory { columns, num_partitions } => {
            in_memory_slice(columns, *num_partitions, partition_id, schema)
        }
        SourceInfo::Csv {
            paths,
            delimiter,
            has_header,
        } => {
            let path = paths.get(partition_id).ok_or_else(|| {
                EngineError::source(format!("no csv path for partition {partition_id}"))
            })?;
            #[cfg(feature = "io-csv")]
            {
                crate::io::csv::read_partition(path, *delimiter, *has_header, partition_id, schema)
            }
            #[cfg(not(feature = "io-csv"))]
            {
                let _ = (path, delimiter, has_header, schema);
                Err(EngineError::source("csv support not compiled in (enable the `io-csv` feature)".to_string()))
            }
        }
        SourceInfo::Parquet { paths } => {
            let path = paths.get(partition_id).ok_or_else(|| {
                EngineError::source(format!("no parquet path for partition {partition_id}"))
            })?;
            #[cfg(feature = "io-parquet")]
            {
                crate::io::parquet::read_partition(path, partition_id, schema)
            }
            #[cfg(not(feature = "io-parquet"))]
            {
                let _ = (path, schema);
                Err(EngineError::source(
                    "parquet support not compiled in (enable the `io-parquet` feature)".to_string(),
                ))
            }
        }
        SourceInfo::Catalog(_) => Err(EngineError::source(
            "catalog scan operators declare schema only; row materialization is not implemented"
                .to_string(),
        )),
    }
}

/// Slice partition `partition_id` out of a whole `column_name ->
/// column_values` dict, per spec.md §4.1/§6: an N-row column dict split
/// into `num_partitions` equal parts, partition `p` getting rows
/// `[p·⌊N/np⌋, (p+1)·⌊N/np⌋)` — except the last partition, which takes
/// the remainder `N − (np−1)·⌊N/np⌋` rows instead of dropping it
/// (spec.md §9's named remainder-loss quirk, fixed per its own
/// recommendation).
fn in_memory_slice(
    columns: &HashMap<String, Column>,
    num_partitions: usize,
    partition_id: usize,
    schema: Arc<Schema>,
) -> Result<Partition, EngineError> {
    if num_partitions == 0 {
        return Err(EngineError::plan("in-memory scan: num_partitions must be > 0".to_string()));
    }
    if partition_id >= num_partitions {
        return Err(EngineError::source(format!(
            "in-memory scan: partition {partition_id} out of range for {num_partitions} partitions"
        )));
    }

    let mut sliced = Vec::with_capacity(schema.fields.len());
    let mut total_rows = None;
    for field in &schema.fields {
        let col = columns
            .get(&field.name)
            .ok_or_else(|| EngineError::schema(format!("in-memory scan: missing declared column {}", field.name)))?;
        match total_rows {
            None => total_rows = Some(col.len()),
            Some(n) if n != col.len() => {
                return Err(EngineError::data(format!(
                    "in-memory scan: column {} has {} rows, expected {n}",
                    field.name,
                    col.len()
                )));
            }
            _ => {}
        }
    }
    let n = total_rows.unwrap_or(0);
    let base = n / num_partitions;
    let start = partition_id * base;
    let end = if partition_id + 1 == num_partitions { n } else { start + base };

    for field in &schema.fields {
        let col = &columns[&field.name];
        sliced.push(col.slice(start, end));
    }

    Partition::new(partition_id, schema, sliced)
}
