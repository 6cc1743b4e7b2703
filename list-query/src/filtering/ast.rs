//! The untyped syntax tree produced by [`parse_filter`](super::parse_filter).
//!
//! Nothing in here has been checked against an entity: identifiers are
//! the raw text from the filter string, and literals carry no notion of
//! which column they will be compared with. The
//! [`Resolver`](super::Resolver) turns this into a
//! [`FilterExpr`](super::FilterExpr).

use core::fmt;

/// A binary operator, as written in a filter string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum BinaryOp {
    #[strum(to_string = "||")]
    Or,
    #[strum(to_string = "&&")]
    And,
    #[strum(to_string = "==")]
    Eq,
    #[strum(to_string = "!=")]
    Ne,
    #[strum(to_string = "%")]
    Like,
    #[strum(to_string = "<")]
    Lt,
    #[strum(to_string = "<=")]
    Le,
    #[strum(to_string = ">")]
    Gt,
    #[strum(to_string = ">=")]
    Ge,
}

impl BinaryOp {
    /// Whether this operator combines two boolean expressions.
    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }
}

/// A numeric literal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Integer(i64),
    Real(f64),
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{}", i),
            Number::Real(r) => write!(f, "{:?}", r),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    Number(Number),
    Null,
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::String(s) => write!(f, "{:?}", s),
            Literal::Number(n) => write!(f, "{}", n),
            Literal::Null => f.write_str("null"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Not(Box<Expr>),
    Call {
        function: String,
        args: Vec<Expr>,
    },
    Ident(String),
    Literal(Literal),
}

impl Expr {
    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// A short description for error messages.
    pub fn describe(&self) -> String {
        match self {
            Expr::Binary { op, .. } => format!("'{}' expression", op),
            Expr::Not(_) => "negation".to_string(),
            Expr::Call { function, .. } => format!("call to '{}'", function),
            Expr::Ident(name) => format!("identifier '{}'", name),
            Expr::Literal(lit) => format!("literal {}", lit),
        }
    }
}
