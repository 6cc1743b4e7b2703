//! Comparison operators and the kinds of column they apply to.
//!
//! Operator          | Filter syntax | SQL    | `String` | `Number` | `Date`
//! ------------------|---------------|--------|----------|----------|-------
//! [`Equal`]         | `==`          | `=`    | yes      | yes      | yes
//! [`NotEqual`]      | `!=`          | `<>`   | yes      | yes      | yes
//! [`Like`]          | `%`           | `LIKE` | yes      |          |
//! [`Greater`]       | `>`           | `>`    |          | yes      | yes
//! [`GreaterEqual`]  | `>=`          | `>=`   |          | yes      | yes
//! [`Less`]          | `<`           | `<`    |          | yes      | yes
//! [`LessEqual`]     | `<=`          | `<=`   |          | yes      | yes
//!
//! This is the default table. An adapter can replace it for its own
//! columns by overriding
//! [`allowed_operators`](crate::ResolverAdapter::allowed_operators).
//!
//! [`Equal`]: OpKind::Equal
//! [`NotEqual`]: OpKind::NotEqual
//! [`Like`]: OpKind::Like
//! [`Greater`]: OpKind::Greater
//! [`GreaterEqual`]: OpKind::GreaterEqual
//! [`Less`]: OpKind::Less
//! [`LessEqual`]: OpKind::LessEqual

use super::ast::BinaryOp;
use super::NameKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum OpKind {
    #[strum(to_string = "==")]
    Equal,
    #[strum(to_string = "!=")]
    NotEqual,
    #[strum(to_string = "%")]
    Like,
    #[strum(to_string = ">")]
    Greater,
    #[strum(to_string = ">=")]
    GreaterEqual,
    #[strum(to_string = "<")]
    Less,
    #[strum(to_string = "<=")]
    LessEqual,
}

impl OpKind {
    /// The comparison operator for a binary operator, if it is one.
    pub fn from_binary(op: BinaryOp) -> Option<Self> {
        Some(match op {
            BinaryOp::Eq => OpKind::Equal,
            BinaryOp::Ne => OpKind::NotEqual,
            BinaryOp::Like => OpKind::Like,
            BinaryOp::Gt => OpKind::Greater,
            BinaryOp::Ge => OpKind::GreaterEqual,
            BinaryOp::Lt => OpKind::Less,
            BinaryOp::Le => OpKind::LessEqual,
            BinaryOp::And | BinaryOp::Or => return None,
        })
    }
}

pub const STRING_OPERATORS: &[OpKind] = &[OpKind::Equal, OpKind::NotEqual, OpKind::Like];

pub const NUMBER_OPERATORS: &[OpKind] = &[
    OpKind::Equal,
    OpKind::NotEqual,
    OpKind::Greater,
    OpKind::GreaterEqual,
    OpKind::Less,
    OpKind::LessEqual,
];

pub const DATE_OPERATORS: &[OpKind] = NUMBER_OPERATORS;

impl NameKind {
    /// The operators allowed against a column of this kind by default.
    pub fn default_operators(self) -> &'static [OpKind] {
        match self {
            NameKind::String => STRING_OPERATORS,
            NameKind::Number => NUMBER_OPERATORS,
            NameKind::Date => DATE_OPERATORS,
        }
    }
}
