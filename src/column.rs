//! Typed, length-uniform chunked arrays — the "Block" capability surface
//! of spec.md §3/§6.
//!
//! Each variant is a plain `Vec<Option<T>>`; there is no chunking across
//! multiple physical buffers since this engine keeps a whole partition's
//! column in memory at once (no streaming within a partition). The name
//! "chunked array" is kept from the spec's vocabulary even though the
//! representation here is a single contiguous run.

use crate::value::{DataType, Scalar};
use std::cmp::Ordering;

/// A typed column. One row of [`Scalar`] values per position.
#[derive(Clone, Debug)]
pub enum Column {
    Int64(Vec<Option<i64>>),
    Float64(Vec<Option<f64>>),
    Utf8(Vec<Option<String>>),
    Boolean(Vec<Option<bool>>),
}

impl Column {
    pub fn data_type(&self) -> DataType {
        match self {
            Column::Int64(_) => DataType::Int64,
            Column::Float64(_) => DataType::Float64,
            Column::Utf8(_) => DataType::Utf8,
            Column::Boolean(_) => DataType::Boolean,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Column::Int64(v) => v.len(),
            Column::Float64(v) => v.len(),
            Column::Utf8(v) => v.len(),
            Column::Boolean(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, i: usize) -> Scalar {
        match self {
            Column::Int64(v) => v[i].map_or(Scalar::Null, Scalar::Int64),
            Column::Float64(v) => v[i].map_or(Scalar::Null, Scalar::Float64),
            Column::Utf8(v) => v[i].clone().map_or(Scalar::Null, Scalar::Utf8),
            Column::Boolean(v) => v[i].map_or(Scalar::Null, Scalar::Boolean),
        }
    }

    pub fn push_scalar(&mut self, value: Scalar) {
        match (self, value) {
            (Column::Int64(v), Scalar::Int64(x)) => v.push(Some(x)),
            (Column::Int64(v), Scalar::Null) => v.push(None),
            (Column::Float64(v), Scalar::Float64(x)) => v.push(Some(x)),
            (Column::Float64(v), Scalar::Null) => v.push(None),
            (Column::Utf8(v), Scalar::Utf8(x)) => v.push(Some(x)),
            (Column::Utf8(v), Scalar::Null) => v.push(None),
            (Column::Boolean(v), Scalar::Boolean(x)) => v.push(Some(x)),
            (Column::Boolean(v), Scalar::Null) => v.push(None),
            (col, value) => panic!(
                "push_scalar: type mismatch, column is {:?} value is {value:?}",
                col.data_type()
            ),
        }
    }

    /// Construct an empty column of the given type.
    pub fn empty(dt: DataType) -> Self {
        match dt {
            DataType::Int64 => Column::Int64(Vec::new()),
            DataType::Float64 => Column::Float64(Vec::new()),
            DataType::Utf8 => Column::Utf8(Vec::new()),
            DataType::Boolean => Column::Boolean(Vec::new()),
        }
    }

    /// Slice rows `[start, end)`.
    pub fn slice(&self, start: usize, end: usize) -> Column {
        match self {
            Column::Int64(v) => Column::Int64(v[start..end].to_vec()),
            Column::Float64(v) => Column::Float64(v[start..end].to_vec()),
            Column::Utf8(v) => Column::Utf8(v[start..end].to_vec()),
            Column::Boolean(v) => Column::Boolean(v[start..end].to_vec()),
        }
    }

    /// Gather rows at the given (not necessarily sorted or unique) indices.
    pub fn take(&self, indices: &[usize]) -> Column {
        match self {
            Column::Int64(v) => Column::Int64(indices.iter().map(|&i| v[i]).collect()),
            Column::Float64(v) => Column::Float64(indices.iter().map(|&i| v[i]).collect()),
            Column::Utf8(v) => Column::Utf8(indices.iter().map(|&i| v[i].clone()).collect()),
            Column::Boolean(v) => Column::Boolean(indices.iter().map(|&i| v[i]).collect()),
        }
    }

    /// Keep only rows where `mask[i]` is `true`.
    pub fn filter_mask(&self, mask: &[bool]) -> Column {
        match self {
            Column::Int64(v) => Column::Int64(
                v.iter()
                    .zip(mask)
                    .filter_map(|(x, &m)| m.then_some(*x))
                    .collect(),
            ),
            Column::Float64(v) => Column::Float64(
                v.iter()
                    .zip(mask)
                    .filter_map(|(x, &m)| m.then_some(*x))
                    .collect(),
            ),
            Column::Utf8(v) => Column::Utf8(
                v.iter()
                    .zip(mask)
                    .filter_map(|(x, &m)| m.then_some(x.clone()))
                    .collect(),
            ),
            Column::Boolean(v) => Column::Boolean(
                v.iter()
                    .zip(mask)
                    .filter_map(|(x, &m)| m.then_some(*x))
                    .collect(),
            ),
        }
    }

    /// Concatenate same-typed columns in the given order.
    pub fn concat(columns: &[&Column]) -> Column {
        let Some(first) = columns.first() else {
            return Column::Int64(Vec::new());
        };
        match first.data_type() {
            DataType::Int64 => {
                let mut out = Vec::new();
                for c in columns {
                    if let Column::Int64(v) = c {
                        out.extend_from_slice(v);
                    }
                }
                Column::Int64(out)
            }
            DataType::Float64 => {
                let mut out = Vec::new();
                for c in columns {
                    if let Column::Float64(v) = c {
                        out.extend_from_slice(v);
                    }
                }
                Column::Float64(out)
            }
            DataType::Utf8 => {
                let mut out = Vec::new();
                for c in columns {
                    if let Column::Utf8(v) = c {
                        out.extend(v.iter().cloned());
                    }
                }
                Column::Utf8(out)
            }
            DataType::Boolean => {
                let mut out = Vec::new();
                for c in columns {
                    if let Column::Boolean(v) = c {
                        out.extend_from_slice(v);
                    }
                }
                Column::Boolean(out)
            }
        }
    }

    pub fn compare_at(&self, i: usize, other: &Column, j: usize) -> Ordering {
        self.get(i).cmp_nulls_last(&other.get(j))
    }

    pub fn hash_at(&self, i: usize) -> u64 {
        crate::value::hash_scalars(std::slice::from_ref(&self.get(i)))
    }

    /// `m - 1` equal-probability quantile boundaries over this column's
    /// non-null values, in ascending order. Returns fewer than `m - 1`
    /// boundaries if there are fewer than `m` distinct sortable values;
    /// returns an empty vec if the column has no non-null values and
    /// `m <= 1`.
    pub fn quantiles(&self, m: usize) -> Vec<Scalar> {
        if m == 0 {
            return Vec::new();
        }
        let mut values: Vec<Scalar> = (0..self.len())
            .map(|i| self.get(i))
            .filter(|s| !s.is_null())
            .collect();
        if values.is_empty() {
            return Vec::new();
        }
        values.sort_by(Scalar::cmp_nulls_last);
        let n = values.len();
        (1..m)
            .map(|k| {
                let idx = ((k * n) / m).min(n - 1);
                values[idx].clone()
            })
            .collect()
    }

    /// Deterministic, evenly-strided sample of at most `k` rows. Not
    /// random: the sort sampler's determinism invariant (spec.md §8,
    /// "Sort is deterministic regardless of seed") falls out for free
    /// when sampling itself carries no seed.
    pub fn sample_indices(len: usize, k: usize) -> Vec<usize> {
        if len == 0 || k == 0 {
            return Vec::new();
        }
        if len <= k {
            return (0..len).collect();
        }
        let stride = len as f64 / k as f64;
        (0..k)
            .map(|i| ((i as f64 * stride) as usize).min(len - 1))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantiles_split_sorted_values() {
        let col = Column::Int64((1..=10).map(Some).collect());
        let b = col.quantiles(4);
        assert_eq!(b.len(), 3);
        for w in b.windows(2) {
            assert!(w[0].cmp_nulls_last(&w[1]) != Ordering::Greater);
        }
    }

    #[test]
    fn filter_mask_keeps_true_rows() {
        let col = Column::Int64(vec![Some(1), Some(2), Some(3)]);
        let out = col.filter_mask(&[true, false, true]);
        match out {
            Column::Int64(v) => assert_eq!(v, vec![Some(1), Some(3)]),
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn sample_indices_strided_and_in_bounds() {
        let idx = Column::sample_indices(100, 20);
        assert_eq!(idx.len(), 20);
        assert!(idx.iter().all(|&i| i < 100));
        assert!(idx.windows(2).all(|w| w[0] < w[1]));
    }
}
