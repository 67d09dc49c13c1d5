//! CoGroup-style equality join (spec.md §4.1 Join), generalized from the
//! teacher's `helpers/joins.rs` key-to-`Vec<row>` hashmap grouping from
//! row-typed `(K, V)` collections to columnar partitions with an
//! expression-list key.
//!
//! Join output layout: all of the left partition's columns followed by
//! all of the right partition's columns (an Open Question in spec.md §9,
//! decided this way since the spec names no column-selection step for
//! joins). Output row order: left-input order first (each left row's
//! matches in right-input order), then any unmatched right rows in
//! right-input order for Right/Outer — also an Open Question decision.

use crate::column::Column;
use crate::error::EngineError;
use crate::expr::Expr;
use crate::partition::Partition;
use crate::schema::Schema;
use crate::value::Scalar;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Outer,
}

/// A join key is unmatchable if any of its components is null — nulls
/// never equal nulls in join semantics, unlike `LocalAggregate` grouping
/// (spec.md §9, decided in DESIGN.md).
fn row_key(key_cols: &[Column], row: usize) -> Option<Vec<Scalar>> {
    let key: Vec<Scalar> = key_cols.iter().map(|c| c.get(row)).collect();
    if key.iter().any(Scalar::is_null) {
        None
    } else {
        Some(key)
    }
}

pub fn execute_join(
    left: &Partition,
    right: &Partition,
    left_on: &[Expr],
    right_on: &[Expr],
    how: JoinType,
    declared_schema: Arc<Schema>,
) -> Result<Partition, EngineError> {
    if left_on.len() != right_on.len() {
        return Err(EngineError::plan(
            "join: left_on and right_on must have the same arity".to_string(),
        ));
    }

    let left_keys: Vec<Column> = left_on.iter().map(|e| e.eval(left)).collect::<Result<_, _>>()?;
    let right_keys: Vec<Column> = right_on.iter().map(|e| e.eval(right)).collect::<Result<_, _>>()?;

    let mut right_index: HashMap<Vec<Scalar>, Vec<usize>> = HashMap::new();
    for r in 0..right.len() {
        if let Some(key) = row_key(&right_keys, r) {
            right_index.entry(key).or_default().push(r);
        }
    }

    let include_unmatched_left = matches!(how, JoinType::Left | JoinType::Outer);
    let include_unmatched_right = matches!(how, JoinType::Right | JoinType::Outer);

    let mut pairs: Vec<(Option<usize>, Option<usize>)> = Vec::new();
    let mut matched_right = vec![false; right.len()];

    for l in 0..left.len() {
        match row_key(&left_keys, l) {
            Some(key) => match right_index.get(&key) {
                Some(matches) => {
                    for &r in matches {
                        matched_right[r] = true;
                        pairs.push((Some(l), Some(r)));
                    }
                }
                None if include_unmatched_left => pairs.push((Some(l), None)),
                None => {}
            },
            None if include_unmatched_left => pairs.push((Some(l), None)),
            None => {}
        }
    }

    if include_unmatched_right {
        for r in 0..right.len() {
            if !matched_right[r] {
                pairs.push((None, Some(r)));
            }
        }
    }

    let mut columns: Vec<Column> = Vec::with_capacity(declared_schema.len());
    for (col_idx, field) in left.schema.fields.iter().enumerate() {
        let src = &left.columns[col_idx];
        let mut out = Column::empty(field.data_type);
        for &(l, _) in &pairs {
            out.push_scalar(l.map_or(Scalar::Null, |row| src.get(row)));
        }
        columns.push(out);
    }
    for (col_idx, field) in right.schema.fields.iter().enumerate() {
        let src = &right.columns[col_idx];
        let mut out = Column::empty(field.data_type);
        for &(_, r) in &pairs {
            out.push_scalar(r.map_or(Scalar::Null, |row| src.get(row)));
        }
        columns.push(out);
    }

    Partition::new(left.id, declared_schema, columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Field;
    use crate::value::DataType;

    fn schema(names: &[(&str, DataType)]) -> Arc<Schema> {
        Schema::arc(
            names
                .iter()
                .enumerate()
                .map(|(i, (n, t))| Field::new(i, *n, *t))
                .collect(),
        )
    }

    #[test]
    fn inner_join_matches_equal_keys() {
        let left_schema = schema(&[("id", DataType::Int64), ("name", DataType::Utf8)]);
        let left = Partition::new(
            0,
            left_schema,
            vec![
                Column::Int64(vec![Some(1), Some(2), Some(3)]),
                Column::Utf8(vec![Some("a".into()), Some("b".into()), Some("c".into())]),
            ],
        )
        .unwrap();

        let right_schema = schema(&[("id", DataType::Int64), ("score", DataType::Int64)]);
        let right = Partition::new(
            0,
            right_schema,
            vec![
                Column::Int64(vec![Some(2), Some(3), Some(4)]),
                Column::Int64(vec![Some(20), Some(30), Some(40)]),
            ],
        )
        .unwrap();

        let out_schema = schema(&[
            ("id", DataType::Int64),
            ("name", DataType::Utf8),
            ("id", DataType::Int64),
            ("score", DataType::Int64),
        ]);

        let out = execute_join(
            &left,
            &right,
            &[Expr::col(0)],
            &[Expr::col(0)],
            JoinType::Inner,
            out_schema,
        )
        .unwrap();

        assert_eq!(out.len(), 2);
    }

    #[test]
    fn null_keys_never_match() {
        let left_schema = schema(&[("id", DataType::Int64)]);
        let left = Partition::new(0, left_schema, vec![Column::Int64(vec![None, Some(1)])]).unwrap();
        let right_schema = schema(&[("id", DataType::Int64)]);
        let right = Partition::new(0, right_schema, vec![Column::Int64(vec![None, Some(1)])]).unwrap();
        let out_schema = schema(&[("id", DataType::Int64), ("id2", DataType::Int64)]);

        let out = execute_join(
            &left,
            &right,
            &[Expr::col(0)],
            &[Expr::col(0)],
            JoinType::Inner,
            out_schema,
        )
        .unwrap();
        assert_eq!(out.len(), 1);
    }
}
