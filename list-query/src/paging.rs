//! # Paginate filtered, sorted listings
//!
//! This is where compiled filters and sorts meet a database. A
//! [`BaseQuery`] describes what an entity's listing selects and from
//! where; [`paginate`] adds the filter, the ordering and a page window,
//! runs a count and a page query through an [`Executor`], and returns
//! the rows along with [`Page`] metadata.
//!
//! The two statements are run inside [`Executor::consistent`], so an
//! executor can make them see the same data, and a failure of either
//! fails the whole listing. Errors from the executor are passed through
//! untouched in [`ListError::Store`].
//!
//! [`Listing`] bundles an adapter, a base query and a dialect, and is
//! the usual entry point for a listing endpoint:
//!
//! ```rust
//! use list_query::adapters::MediaAdapter;
//! use list_query::paging::{statements, BaseQuery, FetchOptions};
//! use list_query::{compile_filter, compile_sort, Dialect};
//!
//! let base = BaseQuery::new("media").columns(&["media.id", "media.title"]);
//! let filter = compile_filter(&MediaAdapter, r#"status == "airing""#).unwrap();
//! let sort = compile_sort(&MediaAdapter, "").unwrap();
//! let options = FetchOptions { page: 2, per_page: 10 };
//! let (count, page) = statements(&base, filter.as_ref(), &sort, options, Dialect::Sqlite);
//!
//! assert_eq!(
//!     count.sql(),
//!     r#"SELECT COUNT(*) FROM "media" WHERE "media"."status" = ?"#
//! );
//! assert_eq!(
//!     page.sql(),
//!     concat!(
//!         r#"SELECT "media"."id", "media"."title" FROM "media" WHERE "media"."status" = ?"#,
//!         r#" ORDER BY "media"."title" ASC NULLS LAST LIMIT ? OFFSET ?"#
//!     )
//! );
//! assert_eq!(page.params().len(), 3);
//! ```

use log::debug;
use sea_query::{Asterisk, Cond, Condition, Expr, Func, Query, SelectStatement, SimpleExpr};
use thiserror::Error;

use crate::adapter::ResolverAdapter;
use crate::compile::{compile_filter, compile_sort, QueryError};
use crate::filtering::FilterExpr;
use crate::sorting::SortSpec;
use crate::sql::{build, condition, order, ColumnPath, Dialect, Statement, Value};

/// Errors produced by a paginated listing.
#[derive(Debug, Error)]
pub enum ListError<E>
where
    E: std::error::Error + 'static,
{
    /// The filter or sort string was rejected.
    #[error(transparent)]
    Query(#[from] QueryError),
    /// A negative page was requested.
    #[error("page must not be negative, got {0}")]
    InvalidPage(i64),
    /// The executor failed.
    #[error(transparent)]
    Store(E),
}

/// Which page to fetch.
///
/// Pages are numbered from zero. A `per_page` of zero or less fetches
/// every matching row as a single page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FetchOptions {
    pub page: i64,
    pub per_page: i64,
}

/// Metadata describing one page of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: i64,
    pub per_page: i64,
    pub total_items: i64,
    pub total_pages: i64,
}

impl Page {
    /// The transport representation of this page.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "page": self.page,
            "perPage": self.per_page,
            "totalItems": self.total_items,
            "totalPages": self.total_pages,
        })
    }
}

/// The number of pages needed for `total_items` rows.
pub fn total_pages(per_page: i64, total_items: i64) -> i64 {
    if per_page > 0 {
        total_items / per_page + i64::from(total_items % per_page != 0)
    } else if total_items > 0 {
        1
    } else {
        0
    }
}

/// How a joined table lines up with the rows of a listing.
#[derive(Debug, Clone, PartialEq)]
pub enum JoinOn {
    /// The two columns are equal.
    Columns(ColumnPath, ColumnPath),
    /// The column equals a bound value.
    Value(ColumnPath, Value),
}

impl JoinOn {
    pub fn columns(left: &'static str, right: &'static str) -> Self {
        JoinOn::Columns(ColumnPath::new(left), ColumnPath::new(right))
    }

    pub fn value(column: &'static str, value: impl Into<Value>) -> Self {
        JoinOn::Value(ColumnPath::new(column), value.into())
    }

    fn expr(&self) -> SimpleExpr {
        match self {
            JoinOn::Columns(left, right) => Expr::col(left.column_ref()).equals(right.column_ref()),
            JoinOn::Value(column, value) => {
                Expr::col(column.column_ref()).eq(sea_query::Value::from(value.clone()))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Join {
    table: ColumnPath,
    on: Vec<JoinOn>,
}

/// The trusted part of a listing query: what to select, and from where.
///
/// Joined tables are left joined, so a row of the main table is listed
/// whether or not it has a match; per-user data is joined this way,
/// with the user bound through [`JoinOn::value`]. With no columns
/// given, every column is selected.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseQuery {
    table: ColumnPath,
    columns: Vec<ColumnPath>,
    joins: Vec<Join>,
    restriction: Option<FilterExpr>,
}

impl BaseQuery {
    pub fn new(table: &'static str) -> Self {
        Self {
            table: ColumnPath::new(table),
            columns: Vec::new(),
            joins: Vec::new(),
            restriction: None,
        }
    }

    /// Select `columns`, after any selected already.
    pub fn columns(mut self, columns: &[&'static str]) -> Self {
        self.columns.extend(columns.iter().copied().map(ColumnPath::new));
        self
    }

    /// Left join `table` on all of the conditions in `on`.
    pub fn left_join<I>(mut self, table: &'static str, on: I) -> Self
    where
        I: IntoIterator<Item = JoinOn>,
    {
        self.joins.push(Join {
            table: ColumnPath::new(table),
            on: on.into_iter().collect(),
        });
        self
    }

    /// Add a condition that applies to every listing, regardless of
    /// the user's filter.
    pub fn restrict(mut self, expr: FilterExpr) -> Self {
        self.restriction = Some(match self.restriction.take() {
            Some(existing) => FilterExpr::and(existing, expr),
            None => expr,
        });
        self
    }

    fn select(&self, filter: Option<&FilterExpr>) -> SelectStatement {
        let mut select = Query::select();
        select.from(self.table.table_ref());
        for join in &self.joins {
            let on = join
                .on
                .iter()
                .fold(Cond::all(), |on, term| on.add(term.expr()));
            select.left_join(join.table.table_ref(), on);
        }

        let conditions: Option<Condition> = match (&self.restriction, filter) {
            (Some(restriction), Some(filter)) => {
                Some(Cond::all().add(condition(restriction)).add(condition(filter)))
            }
            (Some(expr), None) | (None, Some(expr)) => Some(condition(expr)),
            (None, None) => None,
        };
        if let Some(conditions) = conditions {
            select.cond_where(conditions);
        }
        select
    }
}

/// Something that can run listing statements.
pub trait Executor {
    type Row;
    type Error: std::error::Error + 'static;

    /// Run a statement returning a single count.
    fn count(&self, statement: &Statement) -> Result<i64, Self::Error>;

    /// Run a statement returning rows.
    fn fetch(&self, statement: &Statement) -> Result<Vec<Self::Row>, Self::Error>;

    /// Run `f` as one unit of work.
    ///
    /// The default just calls `f`. Executors that can should run it in
    /// a single read transaction, so the count and the page agree.
    fn consistent<T, F>(&self, f: F) -> Result<T, Self::Error>
    where
        F: FnOnce(&Self) -> Result<T, Self::Error>,
        Self: Sized,
    {
        f(self)
    }
}

/// Build the count and page statements for a listing.
pub fn statements(
    base: &BaseQuery,
    filter: Option<&FilterExpr>,
    sort: &SortSpec,
    options: FetchOptions,
    dialect: Dialect,
) -> (Statement, Statement) {
    let mut count = base.select(filter);
    count.expr(Func::count(Expr::col(Asterisk)));

    let mut page = base.select(filter);
    if base.columns.is_empty() {
        page.column(Asterisk);
    } else {
        page.columns(base.columns.iter().map(|column| column.column_ref()));
    }
    order(&mut page, sort);
    if options.per_page > 0 {
        let offset = options.page.saturating_mul(options.per_page);
        page.limit(options.per_page.unsigned_abs())
            .offset(u64::try_from(offset).unwrap_or(0));
    }

    (build(&count, dialect), build(&page, dialect))
}

/// Fetch one page of a listing.
///
/// `filter` is `None` when the user gave no filter, in which case no
/// `WHERE` clause is added for it.
pub fn paginate<X>(
    executor: &X,
    base: &BaseQuery,
    filter: Option<&FilterExpr>,
    sort: &SortSpec,
    options: FetchOptions,
    dialect: Dialect,
) -> Result<(Vec<X::Row>, Page), ListError<X::Error>>
where
    X: Executor,
{
    if options.page < 0 {
        return Err(ListError::InvalidPage(options.page));
    }

    let (count, page) = statements(base, filter, sort, options, dialect);
    debug!("count statement: {} {:?}", count.sql(), count.params());
    debug!("page statement: {} {:?}", page.sql(), page.params());

    let (total_items, rows) = executor
        .consistent(|executor| {
            let total_items = executor.count(&count)?;
            let rows = executor.fetch(&page)?;
            Ok((total_items, rows))
        })
        .map_err(ListError::Store)?;

    let page = Page {
        page: options.page,
        per_page: options.per_page,
        total_items,
        total_pages: total_pages(options.per_page, total_items),
    };

    Ok((rows, page))
}

/// A listing endpoint: an adapter, the base query for its entity, and
/// the dialect of the database it runs against.
pub struct Listing<'a> {
    adapter: &'a dyn ResolverAdapter,
    base: BaseQuery,
    dialect: Dialect,
}

impl<'a> Listing<'a> {
    pub fn new(adapter: &'a dyn ResolverAdapter, base: BaseQuery) -> Self {
        Self {
            adapter,
            base,
            dialect: Dialect::default(),
        }
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Compile `filter` and `sort`, and fetch the requested page.
    pub fn fetch<X>(
        &self,
        executor: &X,
        filter: &str,
        sort: &str,
        options: FetchOptions,
    ) -> Result<(Vec<X::Row>, Page), ListError<X::Error>>
    where
        X: Executor,
    {
        let filter = compile_filter(self.adapter, filter)?;
        let sort = compile_sort(self.adapter, sort)?;
        paginate(
            executor,
            &self.base,
            filter.as_ref(),
            &sort,
            options,
            self.dialect,
        )
    }
}
