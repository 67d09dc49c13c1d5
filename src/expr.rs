//! The expression language operators evaluate against a partition.
//!
//! Kept intentionally small — spec.md's Non-goals exclude "expression
//! evaluation kernels" as a rich subsystem; this is just enough to drive
//! Projection/Filter/LocalAggregate/Join/Sort predicates and keys.

use crate::column::Column;
use crate::error::EngineError;
use crate::partition::Partition;
use crate::value::{DataType, Scalar};
use std::cmp::Ordering;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
}

#[derive(Clone, Debug)]
pub enum Expr {
    /// Reference to a column by its schema position.
    Column(usize),
    Literal(Scalar),
    BinaryOp {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Not(Box<Expr>),
    /// Rename the result of evaluating an inner expression.
    Alias(Box<Expr>, String),
}

impl Expr {
    pub fn col(idx: usize) -> Self {
        Expr::Column(idx)
    }

    pub fn lit(value: Scalar) -> Self {
        Expr::Literal(value)
    }

    pub fn alias(self, name: impl Into<String>) -> Self {
        Expr::Alias(Box::new(self), name.into())
    }

    pub fn eq(self, other: Expr) -> Expr {
        bin(BinOp::Eq, self, other)
    }
    pub fn lt(self, other: Expr) -> Expr {
        bin(BinOp::Lt, self, other)
    }
    pub fn gt(self, other: Expr) -> Expr {
        bin(BinOp::Gt, self, other)
    }
    pub fn and(self, other: Expr) -> Expr {
        bin(BinOp::And, self, other)
    }

    /// The output column name for this expression (used to build a
    /// Projection's declared schema): the alias if present, else the
    /// referenced column's implied name, else a positional placeholder.
    pub fn output_name(&self, input_schema: &crate::schema::Schema) -> String {
        match self {
            Expr::Alias(_, name) => name.clone(),
            Expr::Column(idx) => input_schema
                .field(*idx)
                .map(|f| f.name.clone())
                .unwrap_or_else(|| format!("col_{idx}")),
            _ => "expr".to_string(),
        }
    }

    /// Evaluate this expression against every row of `partition`,
    /// producing one output column.
    pub fn eval(&self, partition: &Partition) -> Result<Column, EngineError> {
        match self {
            Expr::Column(idx) => partition.columns.get(*idx).cloned().ok_or_else(|| {
                EngineError::schema(format!("column index {idx} out of range"))
            }),
            Expr::Literal(value) => {
                let len = partition.len();
                let dt = value.data_type().unwrap_or(DataType::Int64);
                let mut col = Column::empty(dt);
                for _ in 0..len {
                    col.push_scalar(value.clone());
                }
                Ok(col)
            }
            Expr::Alias(inner, _) => inner.eval(partition),
            Expr::Not(inner) => {
                let col = inner.eval(partition)?;
                let mut out = Column::empty(DataType::Boolean);
                for i in 0..col.len() {
                    out.push_scalar(match col.get(i) {
                        Scalar::Boolean(b) => Scalar::Boolean(!b),
                        Scalar::Null => Scalar::Null,
                        other => {
                            return Err(EngineError::schema(format!(
                                "NOT applied to non-boolean value {other:?}"
                            )));
                        }
                    });
                }
                Ok(out)
            }
            Expr::BinaryOp { op, left, right } => {
                let l = left.eval(partition)?;
                let r = right.eval(partition)?;
                eval_binop(*op, &l, &r)
            }
        }
    }
}

fn bin(op: BinOp, left: Expr, right: Expr) -> Expr {
    Expr::BinaryOp {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

fn eval_binop(op: BinOp, l: &Column, r: &Column) -> Result<Column, EngineError> {
    if l.len() != r.len() {
        return Err(EngineError::data(format!(
            "binary op operands have mismatched lengths: {} vs {}",
            l.len(),
            r.len()
        )));
    }
    let len = l.len();
    let is_comparison = matches!(
        op,
        BinOp::Eq | BinOp::NotEq | BinOp::Lt | BinOp::LtEq | BinOp::Gt | BinOp::GtEq
    );
    let is_logical = matches!(op, BinOp::And | BinOp::Or);

    if is_comparison {
        let mut out = Column::empty(DataType::Boolean);
        for i in 0..len {
            let (a, b) = (l.get(i), r.get(i));
            if a.is_null() || b.is_null() {
                out.push_scalar(Scalar::Null);
                continue;
            }
            let ord = a.cmp_nulls_last(&b);
            let truth = match op {
                BinOp::Eq => ord == Ordering::Equal,
                BinOp::NotEq => ord != Ordering::Equal,
                BinOp::Lt => ord == Ordering::Less,
                BinOp::LtEq => ord != Ordering::Greater,
                BinOp::Gt => ord == Ordering::Greater,
                BinOp::GtEq => ord != Ordering::Less,
                _ => unreachable!(),
            };
            out.push_scalar(Scalar::Boolean(truth));
        }
        return Ok(out);
    }

    if is_logical {
        let mut out = Column::empty(DataType::Boolean);
        for i in 0..len {
            let (a, b) = (l.get(i), r.get(i));
            let truth = match op {
                BinOp::And => a.is_truthy() && b.is_truthy(),
                BinOp::Or => a.is_truthy() || b.is_truthy(),
                _ => unreachable!(),
            };
            out.push_scalar(Scalar::Boolean(truth));
        }
        return Ok(out);
    }

    // Arithmetic: numeric only, promote to f64 if either side is float.
    let numeric_kind = match (l.data_type(), r.data_type()) {
        (DataType::Float64, _) | (_, DataType::Float64) => DataType::Float64,
        (DataType::Int64, DataType::Int64) => DataType::Int64,
        (lt, rt) => {
            return Err(EngineError::schema(format!(
                "arithmetic op not defined for {lt:?} / {rt:?}"
            )));
        }
    };

    let mut out = Column::empty(numeric_kind);
    for i in 0..len {
        let (a, b) = (l.get(i), r.get(i));
        if a.is_null() || b.is_null() {
            out.push_scalar(Scalar::Null);
            continue;
        }
        let result = match numeric_kind {
            DataType::Int64 => {
                let (a, b) = (as_i64(&a)?, as_i64(&b)?);
                Scalar::Int64(match op {
                    BinOp::Add => a + b,
                    BinOp::Sub => a - b,
                    BinOp::Mul => a * b,
                    BinOp::Div => a.checked_div(b).ok_or_else(|| {
                        EngineError::data("integer division by zero".to_string())
                    })?,
                    _ => unreachable!(),
                })
            }
            DataType::Float64 => {
                let (a, b) = (as_f64(&a)?, as_f64(&b)?);
                Scalar::Float64(match op {
                    BinOp::Add => a + b,
                    BinOp::Sub => a - b,
                    BinOp::Mul => a * b,
                    BinOp::Div => a / b,
                    _ => unreachable!(),
                })
            }
            _ => unreachable!(),
        };
        out.push_scalar(result);
    }
    Ok(out)
}

fn as_i64(s: &Scalar) -> Result<i64, EngineError> {
    match s {
        Scalar::Int64(v) => Ok(*v),
        other => Err(EngineError::schema(format!("expected Int64, got {other:?}"))),
    }
}

fn as_f64(s: &Scalar) -> Result<f64, EngineError> {
    match s {
        Scalar::Float64(v) => Ok(*v),
        Scalar::Int64(v) => Ok(*v as f64),
        other => Err(EngineError::schema(format!("expected numeric, got {other:?}"))),
    }
}

/// An aggregate function applied over one input expression's values
/// within a group (spec.md §4.1, LocalAggregate).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AggFunc {
    Sum,
    Count,
    Min,
    Max,
    Avg,
}

#[derive(Clone, Debug)]
pub struct AggExpr {
    pub func: AggFunc,
    pub input: Expr,
    pub output_name: String,
}

impl AggExpr {
    pub fn new(func: AggFunc, input: Expr, output_name: impl Into<String>) -> Self {
        Self {
            func,
            input,
            output_name: output_name.into(),
        }
    }
}

/// Sort key: an expression plus direction, used by `Operator::Sort`
/// (multi-key, REDESIGN FLAG from spec.md §4.2.4/§9 lifted from the start).
#[derive(Clone, Debug)]
pub struct SortExpr {
    pub expr: Expr,
    pub descending: bool,
}

impl SortExpr {
    pub fn new(expr: Expr, descending: bool) -> Self {
        Self { expr, descending }
    }
}
