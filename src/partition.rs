//! [`Partition`]: an immutable columnar table fragment (spec.md §3) and its
//! capability surface (spec.md §6) — the only interface the operators and
//! the shuffle kernel use.

use crate::column::Column;
use crate::error::EngineError;
use crate::expr::{AggExpr, AggFunc, Expr};
use crate::local::join::JoinType;
use crate::schema::Schema;
use crate::value::Scalar;
use std::collections::HashMap;
use std::sync::Arc;

/// An immutable columnar table fragment: a partition id, a shared schema,
/// and one [`Column`] per schema field.
#[derive(Clone, Debug)]
pub struct Partition {
    pub id: usize,
    pub schema: Arc<Schema>,
    pub columns: Vec<Column>,
}

impl Partition {
    pub fn new(id: usize, schema: Arc<Schema>, columns: Vec<Column>) -> Result<Self, EngineError> {
        if columns.len() != schema.len() {
            return Err(EngineError::schema(format!(
                "partition {id}: {} columns but schema declares {}",
                columns.len(),
                schema.len()
            )));
        }
        let lens: Vec<usize> = columns.iter().map(Column::len).collect();
        if let Some(first) = lens.first()
            && lens.iter().any(|l| l != first)
        {
            return Err(EngineError::data(format!(
                "partition {id}: ragged columns, lengths {lens:?}"
            )));
        }
        Ok(Self { id, schema, columns })
    }

    pub fn empty(id: usize, schema: Arc<Schema>) -> Self {
        let columns = schema.fields.iter().map(|f| Column::empty(f.data_type)).collect();
        Self { id, schema, columns }
    }

    pub fn len(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn column(&self, idx: usize) -> Option<&Column> {
        self.columns.get(idx)
    }

    /// First `min(k, len)` rows.
    pub fn head(&self, k: usize) -> Partition {
        let n = self.len().min(k);
        let columns = self.columns.iter().map(|c| c.slice(0, n)).collect();
        Partition {
            id: self.id,
            schema: self.schema.clone(),
            columns,
        }
    }

    /// Rows where `mask[i]` is true; `mask` must be exactly `len()` long.
    pub fn filter(&self, mask: &[bool]) -> Result<Partition, EngineError> {
        if mask.len() != self.len() {
            return Err(EngineError::data(format!(
                "filter mask length {} != partition length {}",
                mask.len(),
                self.len()
            )));
        }
        let columns = self.columns.iter().map(|c| c.filter_mask(mask)).collect();
        Ok(Partition {
            id: self.id,
            schema: self.schema.clone(),
            columns,
        })
    }

    /// Filter by a boolean predicate expression; null predicate values
    /// are treated as false (spec.md §4.1 Filter semantics).
    pub fn filter_expr(&self, predicate: &Expr) -> Result<Partition, EngineError> {
        let col = predicate.eval(self)?;
        let mask: Vec<bool> = (0..col.len()).map(|i| col.get(i).is_truthy()).collect();
        self.filter(&mask)
    }

    /// Evaluate an ordered expression list, producing a new partition
    /// whose schema is derived from the expressions (Projection, spec.md
    /// §4.1). `declared_schema` is the operator's declared output schema,
    /// used as-is for the result (schema stability invariant).
    pub fn eval_expression_list(
        &self,
        exprs: &[Expr],
        declared_schema: Arc<Schema>,
    ) -> Result<Partition, EngineError> {
        let columns = exprs.iter().map(|e| e.eval(self)).collect::<Result<Vec<_>, _>>()?;
        Partition::new(self.id, declared_schema, columns)
    }

    /// Group by `group_by` expressions (empty = single group) and compute
    /// each aggregation. One output row per distinct group key; a null
    /// group key forms its own group (spec.md §4.1 LocalAggregate).
    pub fn agg(
        &self,
        aggs: &[AggExpr],
        group_by: &[Expr],
        declared_schema: Arc<Schema>,
    ) -> Result<Partition, EngineError> {
        let key_cols: Vec<Column> = group_by
            .iter()
            .map(|e| e.eval(self))
            .collect::<Result<_, _>>()?;
        let input_cols: Vec<Column> = aggs
            .iter()
            .map(|a| a.input.eval(self))
            .collect::<Result<_, _>>()?;

        let n = self.len();
        // Preserve first-seen group order for determinism.
        let mut order: Vec<Vec<Scalar>> = Vec::new();
        let mut groups: HashMap<Vec<Scalar>, Vec<usize>> = HashMap::new();
        for row in 0..n {
            let key: Vec<Scalar> = key_cols.iter().map(|c| c.get(row)).collect();
            let entry = groups.entry(key.clone()).or_insert_with(|| {
                order.push(key.clone());
                Vec::new()
            });
            entry.push(row);
        }
        if n == 0 && group_by.is_empty() {
            // single empty group over zero rows: still one output row
            order.push(Vec::new());
            groups.insert(Vec::new(), Vec::new());
        }

        let agg_offset = group_by.len();
        let mut key_out: Vec<Column> = (0..group_by.len())
            .map(|i| Column::empty(declared_schema.fields[i].data_type))
            .collect();
        let mut agg_out: Vec<Column> = (0..aggs.len())
            .map(|i| Column::empty(declared_schema.fields[agg_offset + i].data_type))
            .collect();

        for key in &order {
            let rows = &groups[key];
            for (i, k) in key.iter().enumerate() {
                key_out[i].push_scalar(k.clone());
            }
            for (i, agg) in aggs.iter().enumerate() {
                let scalar = compute_agg(agg.func, &input_cols[i], rows)?;
                agg_out[i].push_scalar(scalar);
            }
        }

        let mut columns = key_out;
        columns.append(&mut agg_out);
        Partition::new(self.id, declared_schema, columns)
    }

    /// Equality join on `left_on`/`right_on` key expressions. Null key
    /// components never match (standard SQL null-equality semantics,
    /// decided per spec.md §9 "Join details under-specified").
    #[allow(clippy::too_many_arguments)]
    pub fn join(
        &self,
        other: &Partition,
        left_on: &[Expr],
        right_on: &[Expr],
        how: JoinType,
        declared_schema: Arc<Schema>,
    ) -> Result<Partition, EngineError> {
        crate::local::join::execute_join(self, other, left_on, right_on, how, declared_schema)
    }

    /// Deterministic, evenly-strided sample of at most `k` rows (used by
    /// the sort sampler, spec.md §4.2.4).
    pub fn sample(&self, k: usize) -> Partition {
        let idx = Column::sample_indices(self.len(), k);
        let columns = self.columns.iter().map(|c| c.take(&idx)).collect();
        Partition {
            id: self.id,
            schema: self.schema.clone(),
            columns,
        }
    }

    /// Concatenate a list of same-schema partitions in the given order.
    /// `verify_partition_id` checks every input shares this partition's id
    /// (used when merging sub-partitions that must report the same id;
    /// the sort sampler merge step passes `false` since samples come from
    /// many source partition ids, mirroring the original runner's
    /// `merge_partitions(verify_partition_id=False)` call).
    pub fn merge_partitions(
        parts: &[Partition],
        verify_partition_id: bool,
    ) -> Result<Partition, EngineError> {
        let Some(first) = parts.first() else {
            return Err(EngineError::data("merge_partitions: empty input".to_string()));
        };
        if verify_partition_id && parts.iter().any(|p| p.id != first.id) {
            return Err(EngineError::data(
                "merge_partitions: partition ids differ".to_string(),
            ));
        }
        let schema = first.schema.clone();
        let n_cols = schema.len();
        let mut columns = Vec::with_capacity(n_cols);
        for col_idx in 0..n_cols {
            let refs: Vec<&Column> = parts.iter().map(|p| &p.columns[col_idx]).collect();
            columns.push(Column::concat(&refs));
        }
        Partition::new(first.id, schema, columns)
    }
}

fn compute_agg(func: AggFunc, col: &Column, rows: &[usize]) -> Result<Scalar, EngineError> {
    let values: Vec<Scalar> = rows.iter().map(|&r| col.get(r)).filter(|s| !s.is_null()).collect();
    match func {
        AggFunc::Count => Ok(Scalar::Int64(rows.len() as i64)),
        AggFunc::Sum => {
            if values.is_empty() {
                return Ok(Scalar::Int64(0));
            }
            sum_scalars(&values)
        }
        AggFunc::Min => values
            .iter()
            .min_by(|a, b| a.cmp_nulls_last(b))
            .cloned()
            .map_or(Ok(Scalar::Null), Ok),
        AggFunc::Max => values
            .iter()
            .max_by(|a, b| a.cmp_nulls_last(b))
            .cloned()
            .map_or(Ok(Scalar::Null), Ok),
        AggFunc::Avg => {
            if values.is_empty() {
                return Ok(Scalar::Null);
            }
            let sum = sum_scalars(&values)?;
            let n = values.len() as f64;
            match sum {
                Scalar::Int64(v) => Ok(Scalar::Float64(v as f64 / n)),
                Scalar::Float64(v) => Ok(Scalar::Float64(v / n)),
                _ => Err(EngineError::schema("avg over non-numeric column".to_string())),
            }
        }
    }
}

fn sum_scalars(values: &[Scalar]) -> Result<Scalar, EngineError> {
    let any_float = values.iter().any(|v| matches!(v, Scalar::Float64(_)));
    if any_float {
        let mut acc = 0.0f64;
        for v in values {
            acc += match v {
                Scalar::Float64(x) => *x,
                Scalar::Int64(x) => *x as f64,
                other => return Err(EngineError::schema(format!("sum over non-numeric {other:?}"))),
            };
        }
        Ok(Scalar::Float64(acc))
    } else {
        let mut acc = 0i64;
        for v in values {
            acc += match v {
                Scalar::Int64(x) => *x,
                other => return Err(EngineError::schema(format!("sum over non-numeric {other:?}"))),
            };
        }
        Ok(Scalar::Int64(acc))
    }
}
