//! # Compile sort strings into orderings
//!
//! A sort string is a comma separated list of fields in priority
//! order. Each field can be followed by `:asc` or `:desc`, or prefixed
//! with `+` or `-`, to give its direction; the default is ascending. So
//! `"title:desc,score"` means sort by title in reverse, and for ties by
//! score.
//!
//! The list may also be written in mode form, as `sort=-score,title`.
//!
//! Two words are special. `random` asks for a shuffled order, and wins
//! over any fields given alongside it. `default`, like the empty
//! string, asks for whatever order the adapter considers natural.
//!
//! As with filters, parsing ([`parse_sort`]) and resolution
//! ([`Resolver::resolve_sort`]) are separate, and any field the adapter
//! cannot resolve makes the whole sort invalid.
//!
//! Example:
//! ```rust
//! use list_query::adapters::MediaAdapter;
//! use list_query::filtering::Resolver;
//! use list_query::sorting::{parse_sort, SortDirection, SortSpec};
//!
//! let sort = parse_sort("title:desc,score:asc").unwrap();
//! let spec = Resolver::new(&MediaAdapter).resolve_sort(&sort).unwrap();
//! match spec {
//!     SortSpec::Ordered(keys) => {
//!         assert_eq!(keys[0].column.as_str(), "media.title");
//!         assert_eq!(keys[0].direction, SortDirection::Descending);
//!         assert_eq!(keys[1].column.as_str(), "media.score");
//!     }
//!     SortSpec::Random => unreachable!(),
//! }
//!
//! assert_eq!(parse_sort("random,title").unwrap(), parse_sort("random").unwrap());
//! ```

use std::str::FromStr;
use std::sync::OnceLock;

use log::trace;
use regex::Regex;
use thiserror::Error;

use crate::filtering::Resolver;
use crate::sql::ColumnPath;

/// Errors produced by sorting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SortError {
    /// The sort string is malformed.
    #[error("{message} in '{item}'")]
    Syntax { message: String, item: String },
    /// The adapter does not know this field.
    #[error("cannot sort by unknown field '{0}'")]
    UnknownField(String),
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString,
)]
pub enum SortDirection {
    #[default]
    #[strum(to_string = "asc")]
    Ascending,
    #[strum(to_string = "desc")]
    Descending,
}

/// One field of an unresolved sort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortItem {
    pub field: String,
    pub direction: SortDirection,
}

/// A parsed, unresolved sort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortExpr {
    /// No sort was given; use the adapter's default.
    Default,
    Random,
    Fields(Vec<SortItem>),
}

/// One key of a resolved ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub column: ColumnPath,
    pub direction: SortDirection,
}

/// A resolved ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortSpec {
    Ordered(Vec<SortKey>),
    Random,
}

fn field_regex() -> &'static Regex {
    static FIELD: OnceLock<Regex> = OnceLock::new();
    FIELD.get_or_init(|| {
        Regex::new(r"\A[A-Za-z_][A-Za-z0-9_]*\z").expect("field pattern is a valid regex")
    })
}

fn syntax(message: impl Into<String>, item: &str) -> SortError {
    SortError::Syntax {
        message: message.into(),
        item: item.to_string(),
    }
}

fn parse_item(item: &str) -> Result<SortItem, SortError> {
    let (field, direction) = match item.split_once(':') {
        Some((field, direction)) => {
            let direction = SortDirection::from_str(direction.trim()).map_err(|_| {
                syntax(
                    format!("unknown sort direction '{}'", direction.trim()),
                    item,
                )
            })?;
            (field.trim(), Some(direction))
        }
        None => (item, None),
    };

    let (field, prefix) = if let Some(field) = field.strip_prefix('-') {
        (field, Some(SortDirection::Descending))
    } else if let Some(field) = field.strip_prefix('+') {
        (field, Some(SortDirection::Ascending))
    } else {
        (field, None)
    };

    let direction = match (prefix, direction) {
        (Some(_), Some(_)) => {
            return Err(syntax(
                "direction given both as prefix and as suffix",
                item,
            ))
        }
        (Some(d), None) | (None, Some(d)) => d,
        (None, None) => SortDirection::Ascending,
    };

    if !field_regex().is_match(field) {
        return Err(syntax("expected a field name", item));
    }

    Ok(SortItem {
        field: field.to_string(),
        direction,
    })
}

/// Parse a sort string.
pub fn parse_sort(input: &str) -> Result<SortExpr, SortError> {
    let trimmed = input.trim();
    let trimmed = trimmed.strip_prefix("sort=").unwrap_or(trimmed).trim();
    if trimmed.is_empty() || trimmed == "default" {
        return Ok(SortExpr::Default);
    }

    let mut items = Vec::new();
    let mut random = false;
    for item in trimmed.split(',') {
        let item = item.trim();
        if item.is_empty() {
            return Err(syntax("empty sort field", trimmed));
        }
        if item == "random" {
            random = true;
            continue;
        }
        let parsed = parse_item(item)?;
        if parsed.field == "random" {
            return Err(syntax("'random' cannot take a direction", item));
        }
        items.push(parsed);
    }

    let expr = if random {
        SortExpr::Random
    } else {
        SortExpr::Fields(items)
    };
    trace!("parsed sort {:?} as {:?}", input, expr);
    Ok(expr)
}

impl<'a> Resolver<'a> {
    /// Resolve a parsed sort against the adapter.
    pub fn resolve_sort(&self, expr: &SortExpr) -> Result<SortSpec, SortError> {
        match expr {
            SortExpr::Default => {
                let (column, direction) = self.adapter().default_sort();
                Ok(SortSpec::Ordered(vec![SortKey { column, direction }]))
            }
            SortExpr::Random => Ok(SortSpec::Random),
            SortExpr::Fields(items) => {
                let keys = items
                    .iter()
                    .map(|item| {
                        self.adapter()
                            .resolve_variable_name(&item.field)
                            .map(|name| SortKey {
                                column: name.path,
                                direction: item.direction,
                            })
                            .ok_or_else(|| SortError::UnknownField(item.field.clone()))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(SortSpec::Ordered(keys))
            }
        }
    }
}
