//! Parquet scan backend (spec.md §6): reads the `partition_id`-th file
//! into an arrow table and selects the declared columns by name.
//!
//! Unlike the teacher's `read_parquet_vec<T>` (which leans on
//! `serde_arrow` to map a whole record batch straight into a typed
//! `Vec<T>`), this engine's rows are dynamically typed per-plan, so
//! columns are pulled out of the arrow arrays one at a time and
//! re-homed into [`Column`] by hand.

use crate::column::Column;
use crate::error::EngineError;
use crate::partition::Partition;
use crate::schema::Schema;
use crate::value::DataType;
use arrow::array::{Array, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use std::fs::File;
use std::sync::Arc;

pub fn read_partition(path: &str, partition_id: usize, schema: Arc<Schema>) -> Result<Partition, EngineError> {
    let file = File::open(path).map_err(|e| EngineError::source(format!("open {path}: {e}")))?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(|e| EngineError::source(format!("read parquet metadata {path}: {e}")))?
        .build()
        .map_err(|e| EngineError::source(format!("build parquet reader {path}: {e}")))?;

    let mut columns: Vec<Column> = schema.fields.iter().map(|f| Column::empty(f.data_type)).collect();

    for batch in reader {
        let batch = batch.map_err(|e| EngineError::source(format!("read parquet batch {path}: {e}")))?;
        append_batch(&batch, &schema, &mut columns)?;
    }

    Partition::new(partition_id, schema, columns)
}

fn append_batch(batch: &RecordBatch, schema: &Schema, columns: &mut [Column]) -> Result<(), EngineError> {
    for (col_idx, field) in schema.fields.iter().enumerate() {
        let array = batch.column_by_name(&field.name).ok_or_else(|| {
            EngineError::schema(format!("parquet file is missing declared column {}", field.name))
        })?;
        append_array(array.as_ref(), field.data_type, &mut columns[col_idx])?;
    }
    Ok(())
}

fn append_array(array: &dyn Array, dt: DataType, out: &mut Column) -> Result<(), EngineError> {
    match dt {
        DataType::Int64 => {
            let arr = array
                .as_any()
                .downcast_ref::<Int64Array>()
                .ok_or_else(|| EngineError::schema("expected an Int64 parquet column".to_string()))?;
            for i in 0..arr.len() {
                out.push_scalar(if arr.is_null(i) {
                    crate::value::Scalar::Null
                } else {
                    crate::value::Scalar::Int64(arr.value(i))
                });
            }
        }
        DataType::Float64 => {
            let arr = array
                .as_any()
                .downcast_ref::<Float64Array>()
                .ok_or_else(|| EngineError::schema("expected a Float64 parquet column".to_string()))?;
            for i in 0..arr.len() {
                out.push_scalar(if arr.is_null(i) {
                    crate::value::Scalar::Null
                } else {
                    crate::value::Scalar::Float64(arr.value(i))
                });
            }
        }
        DataType::Utf8 => {
            let arr = array
                .as_any()
                .downcast_ref::<StringArray>()
                .ok_or_else(|| EngineError::schema("expected a Utf8 parquet column".to_string()))?;
            for i in 0..arr.len() {
                out.push_scalar(if arr.is_null(i) {
                    crate::value::Scalar::Null
                } else {
                    crate::value::Scalar::Utf8(arr.value(i).to_string())
                });
            }
        }
        DataType::Boolean => {
            let arr = array
                .as_any()
                .downcast_ref::<BooleanArray>()
                .ok_or_else(|| EngineError::schema("expected a Boolean parquet column".to_string()))?;
            for i in 0..arr.len() {
                out.push_scalar(if arr.is_null(i) {
                    crate::value::Scalar::Null
                } else {
                    crate::value::Scalar::Boolean(arr.value(i))
                });
            }
        }
    }
    Ok(())
}
