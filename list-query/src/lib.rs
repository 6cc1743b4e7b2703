//! # Filter and sort strings for listing endpoints
//!
//! This crate compiles the `filter` and `sort` query parameters of a
//! listing endpoint into parameterized SQL, and runs the resulting
//! count and page queries to produce one page of results.
//!
//! A filter is a small boolean expression over an entity's fields:
//!
//! ```text
//! status == "airing" && (score >= 8 || hasTag("comedy")) && malId != null
//! ```
//!
//! A sort is a comma separated list of fields with optional directions,
//! such as `score:desc,title`, or `random`.
//!
//! Compilation is split into stages, each with its own module:
//!
//! - [`filtering::parser`] turns a filter string into an untyped
//!   [`filtering::Expr`]; [`sorting::parse_sort`] does the same for
//!   sort strings.
//! - A [`filtering::Resolver`] checks the parsed tree against a
//!   [`ResolverAdapter`], the per-entity description of fields, join
//!   tables and functions, producing a typed [`FilterExpr`] or
//!   [`SortSpec`](sorting::SortSpec).
//! - [`sql`] turns those into [`sea_query`] conditions and orderings,
//!   rendered as SQL text with placeholders. Only column paths compiled
//!   into the program become identifiers; every literal from a request
//!   is a bound [`Value`].
//! - [`paging`] combines a base query with the compiled filter and
//!   sort, and fetches a page of rows and its metadata through an
//!   [`Executor`](paging::Executor).
//!
//! The [`compile_filter`] and [`compile_sort`] functions run parsing
//! and resolution at once, and [`paging::statements`] does the rest:
//!
//! ```rust
//! use list_query::adapters::MediaAdapter;
//! use list_query::paging::{statements, BaseQuery, FetchOptions};
//! use list_query::{compile_filter, compile_sort, Dialect, Value};
//!
//! let filter = compile_filter(&MediaAdapter, r#"hasTag("Slice of Life") && score > 7"#).unwrap();
//! let sort = compile_sort(&MediaAdapter, "score:desc").unwrap();
//! let base = BaseQuery::new("media").columns(&["media.title"]);
//! let (count, page) = statements(
//!     &base,
//!     filter.as_ref(),
//!     &sort,
//!     FetchOptions::default(),
//!     Dialect::Postgres,
//! );
//! assert!(count.sql().contains(
//!     r#""media"."id" IN (SELECT "media_id" FROM "media_tags" WHERE "tag_slug" IN ($1))"#
//! ));
//! assert!(count.sql().contains(r#""media"."score" > $2"#));
//! assert!(page.sql().ends_with(r#"ORDER BY "media"."score" DESC NULLS LAST"#));
//! assert_eq!(
//!     page.params(),
//!     &[Value::Text("slice-of-life".to_string()), Value::Integer(7)]
//! );
//! ```
//!
//! ## Features
//!
//! - `adapters` (default): the adapters for the built-in listings, in
//!   [`adapters`].
//! - `sqlite`: an [`Executor`](paging::Executor) for
//!   [`rusqlite`](https://docs.rs/rusqlite), in `sqlite`.

extern crate self as list_query;

pub mod adapter;
#[cfg(feature = "adapters")]
pub mod adapters;
pub mod compile;
pub mod filtering;
pub mod paging;
pub mod sorting;
pub mod sql;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use crate::adapter::{ColumnType, Columns, ResolverAdapter};
pub use crate::compile::{compile_filter, compile_sort, QueryError};
pub use crate::filtering::{AssociationTable, FilterExpr, Name, NameKind, OpKind};
pub use crate::paging::{FetchOptions, ListError, Page};
pub use crate::sorting::{SortDirection, SortSpec};
pub use crate::sql::{ColumnPath, Dialect, Statement, Value};
pub use sea_query;
pub use list_query_derive::Columns;
