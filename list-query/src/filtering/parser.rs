//! Recursive descent parser for filter strings.
//!
//! The grammar, from weakest to strongest binding:
//!
//! ```text
//! or         := and ( "||" and )*
//! and        := comparison ( "&&" comparison )*
//! comparison := unary ( ( "==" | "!=" | "%" | "<" | "<=" | ">" | ">=" ) unary )?
//! unary      := "!" unary | primary
//! primary    := "(" or ")" | IDENT "(" args ")" | IDENT | STRING | NUMBER | "null"
//! args       := ( or ( "," or )* )?
//! ```
//!
//! Strings are double quoted with `\"`, `\\`, `\n`, `\r` and `\t`
//! escapes, or back quoted with no escapes at all.
//!
//! Nesting is limited to [`MAX_DEPTH`] levels. Every parenthesis, call,
//! `!` and extra `&&` or `||` operand counts as a level, since each one
//! adds a level to the tree that later stages walk recursively.

use std::sync::OnceLock;

use log::trace;
use regex::Regex;
use thiserror::Error;

use super::ast::{BinaryOp, Expr, Literal, Number};

/// How deeply a filter may nest before it is rejected.
pub const MAX_DEPTH: usize = 128;

/// A syntax error in a filter string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at position {position}")]
pub struct ParseError {
    /// What went wrong.
    pub message: String,
    /// Byte offset into the filter string.
    pub position: usize,
    /// The text of the offending token, empty at end of input.
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Punct {
    OrOr,
    AndAnd,
    EqEq,
    NotEq,
    LessEq,
    GreaterEq,
    Less,
    Greater,
    Percent,
    Bang,
    LParen,
    RParen,
    Comma,
}

impl Punct {
    fn lookup(s: &str) -> Option<Self> {
        Some(match s {
            "||" => Punct::OrOr,
            "&&" => Punct::AndAnd,
            "==" => Punct::EqEq,
            "!=" => Punct::NotEq,
            "<=" => Punct::LessEq,
            ">=" => Punct::GreaterEq,
            "<" => Punct::Less,
            ">" => Punct::Greater,
            "%" => Punct::Percent,
            "!" => Punct::Bang,
            "(" => Punct::LParen,
            ")" => Punct::RParen,
            "," => Punct::Comma,
            _ => return None,
        })
    }

    fn comparison(self) -> Option<BinaryOp> {
        Some(match self {
            Punct::EqEq => BinaryOp::Eq,
            Punct::NotEq => BinaryOp::Ne,
            Punct::Percent => BinaryOp::Like,
            Punct::Less => BinaryOp::Lt,
            Punct::LessEq => BinaryOp::Le,
            Punct::Greater => BinaryOp::Gt,
            Punct::GreaterEq => BinaryOp::Ge,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
enum TokenKind {
    Ident(String),
    Str(String),
    Number(Number),
    Punct(Punct),
    End,
}

#[derive(Debug, Clone, PartialEq)]
struct Token {
    kind: TokenKind,
    offset: usize,
    text: String,
}

impl Token {
    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError {
            message: message.into(),
            position: self.offset,
            text: self.text.clone(),
        }
    }
}

fn token_regex() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| {
        Regex::new(concat!(
            r#"\A(?:"#,
            r#"(?P<number>-?[0-9]+(?:\.[0-9]+)?)"#,
            r#"|(?P<ident>[A-Za-z_][A-Za-z0-9_]*)"#,
            r#"|(?P<string>"(?:[^"\\]|\\.)*")"#,
            r#"|(?P<raw>`[^`]*`)"#,
            r#"|(?P<punct>&&|\|\||==|!=|<=|>=|[<>!%(),])"#,
            r#")"#,
        ))
        .expect("token pattern is a valid regex")
    })
}

fn unescape(body: &str, offset: usize, text: &str) -> Result<String, ParseError> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some(other) => {
                return Err(ParseError {
                    message: format!("unknown escape '\\{}' in string", other),
                    position: offset,
                    text: text.to_string(),
                })
            }
            None => {
                return Err(ParseError {
                    message: "unterminated escape in string".to_string(),
                    position: offset,
                    text: text.to_string(),
                })
            }
        }
    }
    Ok(out)
}

fn tokenize(input: &str) -> Result<Vec<Token>, ParseError> {
    let re = token_regex();
    let mut tokens = Vec::new();
    let mut offset = 0;

    loop {
        let rest = &input[offset..];
        let trimmed = rest.trim_start();
        offset += rest.len() - trimmed.len();
        if trimmed.is_empty() {
            break;
        }

        let caps = match re.captures(trimmed) {
            Some(caps) => caps,
            None => {
                let c = trimmed.chars().next().unwrap_or_default();
                let message = if c == '"' || c == '`' {
                    "unterminated string".to_string()
                } else {
                    format!("unexpected character '{}'", c)
                };
                return Err(ParseError {
                    message,
                    position: offset,
                    text: c.to_string(),
                });
            }
        };

        let text = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
        let kind = if caps.name("number").is_some() {
            if text.contains('.') {
                // The pattern only admits digits around one dot.
                let value: f64 = text.parse().map_err(|_| ParseError {
                    message: format!("invalid number '{}'", text),
                    position: offset,
                    text: text.to_string(),
                })?;
                TokenKind::Number(Number::Real(value))
            } else {
                let value: i64 = text.parse().map_err(|_| ParseError {
                    message: format!("number '{}' is out of range", text),
                    position: offset,
                    text: text.to_string(),
                })?;
                TokenKind::Number(Number::Integer(value))
            }
        } else if caps.name("ident").is_some() {
            TokenKind::Ident(text.to_string())
        } else if caps.name("string").is_some() {
            TokenKind::Str(unescape(&text[1..text.len() - 1], offset, text)?)
        } else if caps.name("raw").is_some() {
            TokenKind::Str(text[1..text.len() - 1].to_string())
        } else {
            match Punct::lookup(text) {
                Some(p) => TokenKind::Punct(p),
                None => {
                    return Err(ParseError {
                        message: format!("unexpected '{}'", text),
                        position: offset,
                        text: text.to_string(),
                    })
                }
            }
        };

        tokens.push(Token {
            kind,
            offset,
            text: text.to_string(),
        });
        offset += text.len();
    }

    tokens.push(Token {
        kind: TokenKind::End,
        offset: input.len(),
        text: String::new(),
    });

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos].clone();
        if token.kind != TokenKind::End {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, punct: Punct) -> bool {
        if self.peek().kind == TokenKind::Punct(punct) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, punct: Punct, what: &str) -> Result<(), ParseError> {
        if self.eat(punct) {
            Ok(())
        } else {
            Err(self.unexpected(what))
        }
    }

    fn unexpected(&self, what: &str) -> ParseError {
        let token = self.peek();
        match token.kind {
            TokenKind::End => token.error(format!("expected {}, found end of filter", what)),
            _ => token.error(format!("expected {}, found '{}'", what, token.text)),
        }
    }

    fn descend(&mut self) -> Result<(), ParseError> {
        if self.depth >= MAX_DEPTH {
            return Err(self.peek().error("filter is nested too deeply"));
        }
        self.depth += 1;
        Ok(())
    }

    fn comparison_op(&self) -> Option<BinaryOp> {
        match self.peek().kind {
            TokenKind::Punct(p) => p.comparison(),
            _ => None,
        }
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let depth = self.depth;
        let mut left = self.parse_and()?;
        while self.eat(Punct::OrOr) {
            self.descend()?;
            let right = self.parse_and()?;
            left = Expr::binary(BinaryOp::Or, left, right);
        }
        self.depth = depth;
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let depth = self.depth;
        let mut left = self.parse_comparison()?;
        while self.eat(Punct::AndAnd) {
            self.descend()?;
            let right = self.parse_comparison()?;
            left = Expr::binary(BinaryOp::And, left, right);
        }
        self.depth = depth;
        Ok(left)
    }

    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_unary()?;
        let op = match self.comparison_op() {
            Some(op) => op,
            None => return Ok(left),
        };
        self.advance();
        let right = self.parse_unary()?;
        if self.comparison_op().is_some() {
            return Err(self
                .peek()
                .error("comparisons cannot be chained, use '&&' or parentheses"));
        }
        Ok(Expr::binary(op, left, right))
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        if self.eat(Punct::Bang) {
            self.descend()?;
            let inner = self.parse_unary()?;
            self.depth -= 1;
            return Ok(Expr::Not(Box::new(inner)));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let token = self.advance();
        match token.kind {
            TokenKind::Punct(Punct::LParen) => {
                self.descend()?;
                let inner = self.parse_or()?;
                self.expect(Punct::RParen, "')'")?;
                self.depth -= 1;
                Ok(inner)
            }
            TokenKind::Ident(name) if name == "null" => Ok(Expr::Literal(Literal::Null)),
            TokenKind::Ident(name) => {
                if self.eat(Punct::LParen) {
                    self.descend()?;
                    let args = self.parse_args()?;
                    self.depth -= 1;
                    Ok(Expr::Call {
                        function: name,
                        args,
                    })
                } else {
                    Ok(Expr::Ident(name))
                }
            }
            TokenKind::Str(s) => Ok(Expr::Literal(Literal::String(s))),
            TokenKind::Number(n) => Ok(Expr::Literal(Literal::Number(n))),
            TokenKind::End => Err(token.error("unexpected end of filter")),
            TokenKind::Punct(_) => Err(token.error(format!("unexpected '{}'", token.text))),
        }
    }

    fn parse_args(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut args = Vec::new();
        if self.eat(Punct::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.parse_or()?);
            if self.eat(Punct::Comma) {
                continue;
            }
            self.expect(Punct::RParen, "',' or ')'")?;
            return Ok(args);
        }
    }
}

/// Parse a filter string into an untyped [`Expr`].
///
/// The whole string must be consumed; trailing text is an error.
pub fn parse_filter(input: &str) -> Result<Expr, ParseError> {
    let tokens = tokenize(input)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let expr = parser.parse_or()?;
    if parser.peek().kind != TokenKind::End {
        return Err(parser.unexpected("end of filter"));
    }
    trace!("parsed filter {:?} as {:?}", input, expr);
    Ok(expr)
}
