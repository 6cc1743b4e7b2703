//! # Generate parameterized SQL from resolved expressions
//!
//! This is the last stage of the pipeline. A resolved [`FilterExpr`]
//! becomes a [`sea_query`] [`Condition`], and a [`SortSpec`] becomes the
//! `ORDER BY` of a [`SelectStatement`]. [`build`] renders a statement
//! for a [`Dialect`] as SQL text plus a list of bound values, ready to
//! hand to a database driver.
//!
//! Two kinds of data end up in a statement, and they are kept apart by
//! type:
//!
//! - A [`ColumnPath`] is trusted. It can only be built from a
//!   `&'static str`, so it is always text that was compiled into the
//!   program by an adapter. It only becomes an identifier inside this
//!   module.
//! - A [`Value`] is untrusted. It carries a literal taken from a filter
//!   string, and it is only ever bound to a placeholder.
//!
//! Example:
//! ```rust
//! use list_query::{ColumnPath, Dialect, FilterExpr, Name, OpKind, Value};
//! use list_query::sql::{build, condition};
//! use list_query::sea_query::{Alias, Query};
//!
//! let score = Name::number(ColumnPath::new("media.score")).nullable();
//! let expr = FilterExpr::Comparison {
//!     op: OpKind::Greater,
//!     name: score,
//!     value: Value::Real(8.0),
//! };
//! let select = Query::select()
//!     .column(Alias::new("title"))
//!     .from(Alias::new("media"))
//!     .cond_where(condition(&expr))
//!     .to_owned();
//! let statement = build(&select, Dialect::Sqlite);
//! assert_eq!(
//!     statement.sql(),
//!     r#"SELECT "title" FROM "media" WHERE "media"."score" > ?"#
//! );
//! assert_eq!(statement.params(), &[Value::Real(8.0)]);
//! ```

use core::fmt;

use sea_query::{
    Alias, ColumnRef, Cond, Condition, Expr, Func, IntoColumnRef, IntoTableRef, NullOrdering,
    Order, PostgresQueryBuilder, Query, SelectStatement, SimpleExpr, SqliteQueryBuilder, TableRef,
};

use crate::filtering::{FilterExpr, OpKind};
use crate::sorting::{SortDirection, SortSpec};

/// A trusted reference to a storage column or table, such as
/// `media.title`.
///
/// A path is either a bare name or `table.column`; each part is quoted
/// separately when written, so `media.title` becomes `"media"."title"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnPath(&'static str);

impl ColumnPath {
    /// Wrap a column path that is part of the program text.
    pub const fn new(path: &'static str) -> Self {
        Self(path)
    }

    /// The unquoted path.
    pub fn as_str(&self) -> &'static str {
        self.0
    }

    pub(crate) fn column_ref(self) -> ColumnRef {
        match self.0.split_once('.') {
            Some((table, column)) => (Alias::new(table), Alias::new(column)).into_column_ref(),
            None => Alias::new(self.0).into_column_ref(),
        }
    }

    pub(crate) fn table_ref(self) -> TableRef {
        Alias::new(self.0).into_table_ref()
    }

    fn expr(self) -> Expr {
        Expr::col(self.column_ref())
    }
}

impl fmt::Display for ColumnPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// A value bound to a placeholder in a generated statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Integer(i64),
    Real(f64),
    Null,
}

impl Value {
    fn from_bound(value: sea_query::Value) -> Self {
        use sea_query::Value as Bound;

        match value {
            Bound::String(Some(s)) => Value::Text(s.to_string()),
            Bound::BigInt(Some(i)) => Value::Integer(i),
            Bound::Int(Some(i)) => Value::Integer(i.into()),
            Bound::Unsigned(Some(u)) => Value::Integer(u.into()),
            Bound::BigUnsigned(Some(u)) => Value::Integer(i64::try_from(u).unwrap_or(i64::MAX)),
            Bound::Double(Some(r)) => Value::Real(r),
            Bound::Float(Some(r)) => Value::Real(r.into()),
            _ => Value::Null,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{:?}", s),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Real(r) => write!(f, "{}", r),
            Value::Null => f.write_str("null"),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Real(value)
    }
}

impl From<Value> for sea_query::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Text(s) => s.into(),
            Value::Integer(i) => i.into(),
            Value::Real(r) => r.into(),
            Value::Null => sea_query::Value::String(None),
        }
    }
}

/// The SQL flavour of the target database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// `?` placeholders, as used by SQLite.
    #[default]
    Sqlite,
    /// `$1`, `$2`, ... placeholders, as used by PostgreSQL.
    Postgres,
}

/// A finished statement: SQL text and the values for its placeholders,
/// in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    sql: String,
    params: Vec<Value>,
}

impl Statement {
    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.sql, self.params)
    }
}

/// Render `select` for `dialect`.
pub fn build(select: &SelectStatement, dialect: Dialect) -> Statement {
    let (sql, values) = match dialect {
        Dialect::Sqlite => select.build(SqliteQueryBuilder),
        Dialect::Postgres => select.build(PostgresQueryBuilder),
    };
    Statement {
        sql,
        params: values.into_iter().map(Value::from_bound).collect(),
    }
}

fn comparison(op: OpKind, column: ColumnPath, value: Value) -> SimpleExpr {
    let column = column.expr();
    match (op, value) {
        (OpKind::Like, Value::Text(pattern)) => column.like(pattern),
        (OpKind::Like, other) => column.like(other.to_string()),
        (OpKind::Equal, value) => column.eq(sea_query::Value::from(value)),
        (OpKind::NotEqual, value) => column.ne(sea_query::Value::from(value)),
        (OpKind::Greater, value) => column.gt(sea_query::Value::from(value)),
        (OpKind::GreaterEqual, value) => column.gte(sea_query::Value::from(value)),
        (OpKind::Less, value) => column.lt(sea_query::Value::from(value)),
        (OpKind::LessEqual, value) => column.lte(sea_query::Value::from(value)),
    }
}

/// The condition `expr` stands for.
pub fn condition(expr: &FilterExpr) -> Condition {
    match expr {
        FilterExpr::And(left, right) => Cond::all().add(condition(left)).add(condition(right)),
        FilterExpr::Or(left, right) => Cond::any().add(condition(left)).add(condition(right)),
        FilterExpr::Not(inner) => Cond::all().not().add(condition(inner)),
        FilterExpr::IsNull { name, not } => {
            let column = name.path.expr();
            Cond::all().add(if *not {
                column.is_not_null()
            } else {
                column.is_null()
            })
        }
        FilterExpr::Comparison { op, name, value } => {
            Cond::all().add(comparison(*op, name.path, value.clone()))
        }
        FilterExpr::SetMembership { name, values, not } => {
            let column = name.path.expr();
            let values = values.iter().cloned().map(sea_query::Value::from);
            Cond::all().add(if *not {
                column.is_not_in(values)
            } else {
                column.is_in(values)
            })
        }
        FilterExpr::AssociationMembership {
            table,
            id_selector,
            ids,
            not,
        } => {
            let members = Query::select()
                .column(table.select_column.column_ref())
                .from(table.name.table_ref())
                .and_where(table.where_column.expr().is_in(ids.iter().cloned()))
                .to_owned();
            let column = id_selector.expr();
            Cond::all().add(if *not {
                column.not_in_subquery(members)
            } else {
                column.in_subquery(members)
            })
        }
    }
}

/// Order `select` by `spec`.
///
/// Every key sorts nulls last, whichever the direction.
pub fn order(select: &mut SelectStatement, spec: &SortSpec) {
    match spec {
        SortSpec::Ordered(keys) => {
            for key in keys {
                let direction = match key.direction {
                    SortDirection::Ascending => Order::Asc,
                    SortDirection::Descending => Order::Desc,
                };
                select.order_by_with_nulls(key.column.column_ref(), direction, NullOrdering::Last);
            }
        }
        SortSpec::Random => {
            select.order_by_expr(SimpleExpr::from(Func::random()), Order::Asc);
        }
    }
}
