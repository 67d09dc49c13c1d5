//! CSV scan backend (spec.md §6): opens the `partition_id`-th file,
//! parses with the given delimiter, skips row 1 as a header when
//! `has_header` is set, and fills columns by the declared schema's
//! column names/types — not by Serde struct derivation, since the
//! engine's rows are dynamically typed per-plan rather than fixed at
//! compile time like the teacher's `read_csv_vec<T>`.

use crate::column::Column;
use crate::error::EngineError;
use crate::partition::Partition;
use crate::schema::Schema;
use crate::value::{DataType, Scalar};
use std::fs::File;
use std::sync::Arc;

pub fn read_partition(
    path: &str,
    delimiter: u8,
    has_header: bool,
    partition_id: usize,
    schema: Arc<Schema>,
) -> Result<Partition, EngineError> {
    let file = File::open(path).map_err(|e| EngineError::source(format!("open {path}: {e}")))?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(has_header)
        .from_reader(file);

    let mut columns: Vec<Column> = schema.fields.iter().map(|f| Column::empty(f.data_type)).collect();

    for (row_idx, record) in reader.records().enumerate() {
        let record = record.map_err(|e| {
            EngineError::source(format!("parse {path} record #{}: {e}", row_idx + 1))
        })?;
        for (col_idx, field) in schema.fields.iter().enumerate() {
            let raw = record.get(col_idx).ok_or_else(|| {
                EngineError::source(format!(
                    "{path} row {}: missing column {} ({})",
                    row_idx + 1,
                    col_idx,
                    field.name
                ))
            })?;
            columns[col_idx].push_scalar(parse_field(raw, field.data_type)?);
        }
    }

    Partition::new(partition_id, schema, columns)
}

fn parse_field(raw: &str, dt: DataType) -> Result<Scalar, EngineError> {
    if raw.is_empty() {
        return Ok(Scalar::Null);
    }
    match dt {
        DataType::Int64 => raw
            .parse::<i64>()
            .map(Scalar::Int64)
            .map_err(|e| EngineError::source(format!("parse int64 {raw:?}: {e}"))),
        DataType::Float64 => raw
            .parse::<f64>()
            .map(Scalar::Float64)
            .map_err(|e| EngineError::source(format!("parse float64 {raw:?}: {e}"))),
        DataType::Boolean => raw
            .parse::<bool>()
            .map(Scalar::Boolean)
            .map_err(|e| EngineError::source(format!("parse bool {raw:?}: {e}"))),
        DataType::Utf8 => Ok(Scalar::Utf8(raw.to_string())),
    }
}
