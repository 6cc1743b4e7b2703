//! # Compile filter strings into typed predicates
//!
//! A filter string is a small boolean expression over the fields of
//! one kind of entity, for example:
//!
//! ```text
//! status == "airing" && (score > 8 || hasTag("comedy")) && malId != null
//! ```
//!
//! Turning that into something a database can run happens in two
//! steps. First [`parse_filter`] produces an untyped [`Expr`], which
//! knows nothing about any entity. Then a [`Resolver`] walks that tree
//! and asks a [`ResolverAdapter`] what every identifier and function
//! means, producing a [`FilterExpr`]. This is where all checking
//! happens:
//!
//! - every identifier must be known to the adapter, which turns it into
//!   a [`Name`] carrying a trusted [`ColumnPath`], the kind of value the
//!   column holds, and whether it can be null;
//! - every literal must match the kind of the column it is compared
//!   with, and the operator must be allowed for that kind (see
//!   [`ops`]);
//! - comparison with `null` is only allowed through `==` and `!=`, and
//!   only against nullable columns;
//! - calls go to the adapter, apart from the built-in `in(field, ...)`.
//!
//! Any failure rejects the whole filter. There is no fallback that
//! matches everything or nothing.
//!
//! Example:
//! ```rust
//! use list_query::adapters::MediaAdapter;
//! use list_query::filtering::{parse_filter, FilterExpr, Resolver};
//!
//! let expr = parse_filter(r#"status == "airing" && score > 8"#).unwrap();
//! let resolved = Resolver::new(&MediaAdapter).resolve(&expr).unwrap();
//! assert!(matches!(resolved, FilterExpr::And(..)));
//!
//! let expr = parse_filter(r#"title > 8"#).unwrap();
//! assert!(Resolver::new(&MediaAdapter).resolve(&expr).is_err());
//! ```

pub mod ast;
pub mod ops;
pub mod parser;

use chrono::NaiveDate;
use thiserror::Error;

use crate::adapter::ResolverAdapter;
use crate::sql::{ColumnPath, Value};

pub use ast::{BinaryOp, Expr, Literal, Number};
pub use ops::OpKind;
pub use parser::{parse_filter, ParseError};

/// Errors produced while resolving a parsed filter against an adapter.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The adapter does not know this identifier.
    #[error("unknown name '{0}'")]
    UnknownName(String),
    /// Neither the built-ins nor the adapter know this function.
    #[error("unknown function '{0}'")]
    UnknownFunction(String),
    /// A non-nullable field was compared with `null`.
    #[error("'{0}' is not nullable")]
    NotNullable(String),
    /// `null` was used with something other than `==` or `!=`.
    #[error("'{field}' can only be compared with null using '==' or '!=', not '{op}'")]
    NullComparison { field: String, op: OpKind },
    /// The operator is not allowed for the kind of the field.
    #[error("operator '{op}' cannot be used with {kind} field '{field}'")]
    OperatorNotAllowed {
        field: String,
        op: OpKind,
        kind: NameKind,
    },
    /// The value does not have the kind of the field.
    #[error("'{field}' is a {expected} field, found {found}")]
    TypeMismatch {
        field: String,
        expected: NameKind,
        found: String,
    },
    /// A string compared with a date field is not a date.
    #[error("'{value}' is not a date of the form YYYY-MM-DD, for field '{field}'")]
    InvalidDate { field: String, value: String },
    /// A function was called without arguments.
    #[error("'{function}' requires at least one argument")]
    MissingArguments { function: String },
    /// A function argument is not acceptable.
    #[error("invalid argument to '{function}': {message}")]
    InvalidArgument { function: String, message: String },
    /// The adapter has no table or id mapping for this association.
    #[error("association '{0}' is not supported")]
    UnsupportedAssociation(String),
    /// The expression has a shape that cannot be a condition.
    #[error("{0}")]
    Unexpected(String),
    /// An adapter specific failure.
    #[error(transparent)]
    Custom(#[from] anyhow::Error),
}

/// Errors produced by compiling a filter string.
#[derive(Debug, Error)]
pub enum FilterError {
    #[error(transparent)]
    Syntax(#[from] ParseError),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// The kind of value held by a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum NameKind {
    String,
    Number,
    /// A date stored as `YYYY-MM-DD` text.
    Date,
}

/// A resolved field: where it lives, what it holds, and whether it can
/// be null.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Name {
    pub kind: NameKind,
    pub path: ColumnPath,
    pub nullable: bool,
}

impl Name {
    pub const fn new(kind: NameKind, path: ColumnPath) -> Self {
        Self {
            kind,
            path,
            nullable: false,
        }
    }

    pub const fn string(path: ColumnPath) -> Self {
        Self::new(NameKind::String, path)
    }

    pub const fn number(path: ColumnPath) -> Self {
        Self::new(NameKind::Number, path)
    }

    pub const fn date(path: ColumnPath) -> Self {
        Self::new(NameKind::Date, path)
    }

    /// The same field, marked as nullable.
    pub const fn nullable(self) -> Self {
        Self {
            nullable: true,
            ..self
        }
    }
}

/// A many-to-many join table used to test membership.
///
/// A row of the entity passes when its id appears in `select_column`
/// of a row of `name` whose `where_column` is one of the requested ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssociationTable {
    pub name: ColumnPath,
    pub select_column: ColumnPath,
    pub where_column: ColumnPath,
}

impl AssociationTable {
    pub const fn new(
        name: &'static str,
        select_column: &'static str,
        where_column: &'static str,
    ) -> Self {
        Self {
            name: ColumnPath::new(name),
            select_column: ColumnPath::new(select_column),
            where_column: ColumnPath::new(where_column),
        }
    }
}

/// A resolved, typed filter.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterExpr {
    And(Box<FilterExpr>, Box<FilterExpr>),
    Or(Box<FilterExpr>, Box<FilterExpr>),
    Not(Box<FilterExpr>),
    IsNull {
        name: Name,
        not: bool,
    },
    Comparison {
        op: OpKind,
        name: Name,
        value: Value,
    },
    SetMembership {
        name: Name,
        values: Vec<Value>,
        not: bool,
    },
    AssociationMembership {
        table: AssociationTable,
        id_selector: ColumnPath,
        ids: Vec<String>,
        not: bool,
    },
}

impl FilterExpr {
    pub fn and(left: FilterExpr, right: FilterExpr) -> Self {
        FilterExpr::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: FilterExpr, right: FilterExpr) -> Self {
        FilterExpr::Or(Box::new(left), Box::new(right))
    }

    /// The logical negation of this expression.
    ///
    /// Null tests and membership tests flip their own flag; anything
    /// else is wrapped in [`FilterExpr::Not`].
    pub fn negate(self) -> Self {
        match self {
            FilterExpr::IsNull { name, not } => FilterExpr::IsNull { name, not: !not },
            FilterExpr::SetMembership { name, values, not } => FilterExpr::SetMembership {
                name,
                values,
                not: !not,
            },
            FilterExpr::AssociationMembership {
                table,
                id_selector,
                ids,
                not,
            } => FilterExpr::AssociationMembership {
                table,
                id_selector,
                ids,
                not: !not,
            },
            FilterExpr::Not(inner) => *inner,
            other => FilterExpr::Not(Box::new(other)),
        }
    }
}

/// Resolves parsed filters and sorts against one adapter.
///
/// A [`Resolver`] holds nothing but a reference to its adapter, so it is
/// cheap to create one per request. It is also handed to
/// [`ResolverAdapter::resolve_function_call`], so that adapters can use
/// [`in_table`](Resolver::in_table) and [`in_column`](Resolver::in_column)
/// to build their functions.
#[derive(Clone, Copy)]
pub struct Resolver<'a> {
    adapter: &'a dyn ResolverAdapter,
}

impl<'a> Resolver<'a> {
    pub fn new(adapter: &'a dyn ResolverAdapter) -> Self {
        Self { adapter }
    }

    pub fn adapter(&self) -> &'a dyn ResolverAdapter {
        self.adapter
    }

    /// Look up a field through the adapter.
    pub fn resolve_name(&self, field: &str) -> Result<Name, ResolveError> {
        self.adapter
            .resolve_variable_name(field)
            .ok_or_else(|| ResolveError::UnknownName(field.to_string()))
    }

    /// Require `expr` to be a bare identifier.
    pub fn resolve_to_ident<'e>(&self, expr: &'e Expr) -> Result<&'e str, ResolveError> {
        match expr {
            Expr::Ident(name) => Ok(name),
            other => Err(ResolveError::Unexpected(format!(
                "expected a field name, found {}",
                other.describe()
            ))),
        }
    }

    /// Require `expr`, an argument to `function`, to be a string literal.
    pub fn resolve_to_str(&self, function: &str, expr: &Expr) -> Result<String, ResolveError> {
        match expr {
            Expr::Literal(Literal::String(s)) => Ok(s.clone()),
            other => Err(ResolveError::InvalidArgument {
                function: function.to_string(),
                message: format!("expected a string, found {}", other.describe()),
            }),
        }
    }

    /// Convert `expr` into a value for the field `field`, resolved as
    /// `name`.
    pub fn resolve_value(&self, name: &Name, field: &str, expr: &Expr) -> Result<Value, ResolveError> {
        let mismatch = || ResolveError::TypeMismatch {
            field: field.to_string(),
            expected: name.kind,
            found: expr.describe(),
        };

        let literal = match expr {
            Expr::Literal(literal) => literal,
            _ => return Err(mismatch()),
        };

        match (name.kind, literal) {
            (NameKind::String, Literal::String(s)) => Ok(Value::Text(s.clone())),
            (NameKind::Number, Literal::Number(Number::Integer(i))) => Ok(Value::Integer(*i)),
            (NameKind::Number, Literal::Number(Number::Real(r))) => Ok(Value::Real(*r)),
            (NameKind::Date, Literal::String(s)) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map(|date| Value::Text(date.format("%Y-%m-%d").to_string()))
                .map_err(|_| ResolveError::InvalidDate {
                    field: field.to_string(),
                    value: s.clone(),
                }),
            _ => Err(mismatch()),
        }
    }

    /// Resolve a parsed filter.
    pub fn resolve(&self, expr: &Expr) -> Result<FilterExpr, ResolveError> {
        match expr {
            Expr::Binary {
                op: BinaryOp::And,
                left,
                right,
            } => Ok(FilterExpr::and(self.resolve(left)?, self.resolve(right)?)),
            Expr::Binary {
                op: BinaryOp::Or,
                left,
                right,
            } => Ok(FilterExpr::or(self.resolve(left)?, self.resolve(right)?)),
            Expr::Binary { op, left, right } => {
                let kind = OpKind::from_binary(*op).ok_or_else(|| {
                    ResolveError::Unexpected(format!("unsupported operator '{}'", op))
                })?;
                self.resolve_comparison(kind, left, right)
            }
            Expr::Not(inner) => Ok(self.resolve(inner)?.negate()),
            Expr::Call { function, args } => self.resolve_call(function, args),
            Expr::Ident(_) | Expr::Literal(_) => Err(ResolveError::Unexpected(format!(
                "expected a condition, found {}",
                expr.describe()
            ))),
        }
    }

    fn resolve_comparison(
        &self,
        op: OpKind,
        left: &Expr,
        right: &Expr,
    ) -> Result<FilterExpr, ResolveError> {
        let field = self.resolve_to_ident(left)?;
        let name = self.resolve_name(field)?;

        if let Expr::Literal(Literal::Null) = right {
            let not = match op {
                OpKind::Equal => false,
                OpKind::NotEqual => true,
                _ => {
                    return Err(ResolveError::NullComparison {
                        field: field.to_string(),
                        op,
                    })
                }
            };
            if !name.nullable {
                return Err(ResolveError::NotNullable(field.to_string()));
            }
            return Ok(FilterExpr::IsNull { name, not });
        }

        if !self.adapter.allowed_operators(&name).contains(&op) {
            return Err(ResolveError::OperatorNotAllowed {
                field: field.to_string(),
                op,
                kind: name.kind,
            });
        }

        let value = self.resolve_value(&name, field, right)?;
        Ok(FilterExpr::Comparison { op, name, value })
    }

    fn resolve_call(&self, function: &str, args: &[Expr]) -> Result<FilterExpr, ResolveError> {
        match function {
            "in" => {
                let (field, values) = args
                    .split_first()
                    .ok_or_else(|| ResolveError::MissingArguments {
                        function: function.to_string(),
                    })?;
                let field = self.resolve_to_ident(field)?;
                self.in_column(function, field, values)
            }
            _ => self.adapter.resolve_function_call(self, function, args),
        }
    }

    /// Build a membership test of `field` against a list of literals.
    ///
    /// `field` is resolved through the adapter, and each argument is
    /// checked against its kind. This is the helper for functions over
    /// closed sets of values such as a status or a type.
    pub fn in_column(
        &self,
        function: &str,
        field: &str,
        args: &[Expr],
    ) -> Result<FilterExpr, ResolveError> {
        if args.is_empty() {
            return Err(ResolveError::MissingArguments {
                function: function.to_string(),
            });
        }

        let name = self.resolve_name(field)?;
        let values = args
            .iter()
            .map(|arg| self.resolve_value(&name, field, arg))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FilterExpr::SetMembership {
            name,
            values,
            not: false,
        })
    }

    /// Build a membership test through the join table for `association`.
    ///
    /// Each argument must be a string; it is converted to a stored id
    /// with [`ResolverAdapter::resolve_name_to_id`]. `id_selector` is the
    /// entity's own id column, matched against the table's select column.
    pub fn in_table(
        &self,
        function: &str,
        association: &str,
        id_selector: ColumnPath,
        args: &[Expr],
    ) -> Result<FilterExpr, ResolveError> {
        if args.is_empty() {
            return Err(ResolveError::MissingArguments {
                function: function.to_string(),
            });
        }

        let mut ids = Vec::with_capacity(args.len());
        for arg in args {
            let display = self.resolve_to_str(function, arg)?;
            let id = self
                .adapter
                .resolve_name_to_id(association, &display)
                .ok_or_else(|| ResolveError::UnsupportedAssociation(association.to_string()))?;
            if id.is_empty() {
                return Err(ResolveError::InvalidArgument {
                    function: function.to_string(),
                    message: format!("{:?} does not name any {}", display, association),
                });
            }
            ids.push(id);
        }

        let table = self
            .adapter
            .resolve_table(association)
            .ok_or_else(|| ResolveError::UnsupportedAssociation(association.to_string()))?;

        Ok(FilterExpr::AssociationMembership {
            table,
            id_selector,
            ids,
            not: false,
        })
    }
}
