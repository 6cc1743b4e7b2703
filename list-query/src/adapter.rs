//! # Per-entity resolution
//!
//! Everything the compiler knows about a particular entity comes from
//! its [`ResolverAdapter`]. An adapter maps the names used in filter
//! and sort strings onto trusted columns, describes the join tables
//! that back membership tests such as `hasTag("comedy")`, and defines
//! any functions specific to the entity.
//!
//! Adapters are expected to be stateless lookup tables, so a single
//! instance can be shared by every request. The trait requires
//! [`Send`] and [`Sync`] for that reason.
//!
//! The field table is the bulk of most adapters, and it can be derived
//! from an annotated struct with [`macro@Columns`](crate::Columns):
//!
//! ```rust
//! use list_query::{Columns, NameKind};
//!
//! #[derive(Columns)]
//! #[query(table = "books")]
//! pub struct Book {
//!     pub id: String,
//!     pub page_count: Option<i64>,
//!     #[query(column = "authors.name")]
//!     pub author: String,
//! }
//!
//! let pages = Book::column("pageCount").unwrap();
//! assert_eq!(pages.kind, NameKind::Number);
//! assert_eq!(pages.path.as_str(), "books.page_count");
//! assert!(pages.nullable);
//! assert_eq!(Book::column("author").unwrap().path.as_str(), "authors.name");
//! assert!(Book::column("page_count").is_none());
//! ```

use std::sync::OnceLock;

use regex::Regex;

use crate::filtering::{
    AssociationTable, Expr, FilterExpr, Name, NameKind, OpKind, ResolveError, Resolver,
};
use crate::sorting::SortDirection;
use crate::sql::ColumnPath;

/// The resolution contract for one entity.
///
/// Only [`default_sort`](ResolverAdapter::default_sort) and
/// [`resolve_variable_name`](ResolverAdapter::resolve_variable_name) are
/// required. The provided methods describe an entity with no
/// associations and no functions, using the default operator table.
pub trait ResolverAdapter: Send + Sync {
    /// The ordering used when no sort is requested.
    fn default_sort(&self) -> (ColumnPath, SortDirection);

    /// Map a field name from a filter or sort string to a column.
    ///
    /// Returning `None` makes the whole filter or sort invalid.
    fn resolve_variable_name(&self, name: &str) -> Option<Name>;

    /// Convert the display name of an associated item, such as a tag,
    /// into the id stored in the association table.
    fn resolve_name_to_id(&self, association: &str, name: &str) -> Option<String> {
        let _ = (association, name);
        None
    }

    /// The join table for an association.
    fn resolve_table(&self, association: &str) -> Option<AssociationTable> {
        let _ = association;
        None
    }

    /// Resolve a call to an entity specific function.
    ///
    /// Implementations usually match on `name` and hand the arguments
    /// to [`Resolver::in_table`] or [`Resolver::in_column`]. Names they
    /// do not recognise must produce [`ResolveError::UnknownFunction`].
    fn resolve_function_call(
        &self,
        resolver: &Resolver<'_>,
        name: &str,
        args: &[Expr],
    ) -> Result<FilterExpr, ResolveError> {
        let _ = (resolver, args);
        Err(ResolveError::UnknownFunction(name.to_string()))
    }

    /// The comparison operators allowed against `name`.
    fn allowed_operators(&self, name: &Name) -> &'static [OpKind] {
        name.kind.default_operators()
    }
}

/// A table of fields for an entity, usually derived with
/// [`macro@Columns`](crate::Columns).
pub trait Columns {
    /// Look up a field by the name used in filter strings.
    fn column(name: &str) -> Option<Name>;

    /// Every field name [`column`](Columns::column) accepts.
    fn column_names() -> &'static [&'static str];
}

/// A Rust type that can describe a column.
///
/// This determines the [`NameKind`] and nullability of fields in a
/// derived [`Columns`] table.
pub trait ColumnType {
    const KIND: NameKind;
    const NULLABLE: bool = false;
}

macro_rules! column_type {
    ($kind:ident: $($t:ty),*) => {
        $(
            impl ColumnType for $t {
                const KIND: NameKind = NameKind::$kind;
            }
        )*
    };
}

column_type!(String: String, &str);
column_type!(Number: i8, u8, i16, u16, i32, u32, i64, u64, f32, f64, bool);
column_type!(Date: chrono::NaiveDate);

impl<T> ColumnType for Option<T>
where
    T: ColumnType,
{
    const KIND: NameKind = T::KIND;
    const NULLABLE: bool = true;
}

fn separator_regex() -> &'static Regex {
    static SEPARATOR: OnceLock<Regex> = OnceLock::new();
    SEPARATOR.get_or_init(|| Regex::new("[^a-z0-9]+").expect("separator pattern is a valid regex"))
}

/// Normalise a display name into a slug, such as `"Slice of Life"` into
/// `"slice-of-life"`.
///
/// Non-ASCII text is transliterated first, so `"Pokémon"` becomes
/// `"pokemon"`. The result is empty when nothing alphanumeric is left.
pub fn slug(name: &str) -> String {
    let ascii = deunicode::deunicode(name).to_lowercase();
    separator_regex()
        .replace_all(&ascii, "-")
        .trim_matches('-')
        .to_string()
}
