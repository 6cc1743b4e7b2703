//! Run listings against SQLite with [`rusqlite`].
//!
//! [`SqliteExecutor`] borrows a connection and a function mapping each
//! result row to the caller's row type. The count and page statements
//! of a listing are run inside one transaction, so they see the same
//! snapshot of the data.
//!
//! ```rust
//! use list_query::adapters::MediaAdapter;
//! use list_query::paging::{BaseQuery, FetchOptions, Listing};
//! use list_query::sqlite::SqliteExecutor;
//!
//! let conn = rusqlite::Connection::open_in_memory().unwrap();
//! conn.execute_batch(
//!     "CREATE TABLE media (id TEXT, title TEXT, status TEXT, score REAL);
//!      INSERT INTO media VALUES ('1', 'Alpha', 'airing', 8.5);
//!      INSERT INTO media VALUES ('2', 'Beta', 'finished', NULL);",
//! )
//! .unwrap();
//!
//! let base = BaseQuery::new("media").columns(&["media.title"]);
//! let listing = Listing::new(&MediaAdapter, base);
//! let executor = SqliteExecutor::new(&conn, |row| row.get::<_, String>(0));
//! let (rows, page) = listing
//!     .fetch(&executor, "score == null", "", FetchOptions::default())
//!     .unwrap();
//! assert_eq!(rows, vec!["Beta".to_string()]);
//! assert_eq!(page.total_items, 1);
//! ```

use std::marker::PhantomData;

use rusqlite::types::{Null, ToSql, ToSqlOutput};
use rusqlite::{params_from_iter, Connection, Row};

use crate::paging::Executor;
use crate::sql::{Statement, Value};

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Text(s) => ToSqlOutput::from(s.as_str()),
            Value::Integer(i) => ToSqlOutput::from(*i),
            Value::Real(r) => ToSqlOutput::from(*r),
            Value::Null => ToSqlOutput::from(Null),
        })
    }
}

/// An [`Executor`] over a borrowed SQLite connection.
///
/// The connection must not already be inside a transaction when a
/// listing is fetched.
pub struct SqliteExecutor<'c, F, T> {
    conn: &'c Connection,
    map: F,
    row: PhantomData<fn() -> T>,
}

impl<'c, F, T> SqliteExecutor<'c, F, T>
where
    F: Fn(&Row<'_>) -> rusqlite::Result<T>,
{
    pub fn new(conn: &'c Connection, map: F) -> Self {
        Self {
            conn,
            map,
            row: PhantomData,
        }
    }
}

impl<'c, F, T> Executor for SqliteExecutor<'c, F, T>
where
    F: Fn(&Row<'_>) -> rusqlite::Result<T>,
{
    type Row = T;
    type Error = rusqlite::Error;

    fn count(&self, statement: &Statement) -> Result<i64, Self::Error> {
        self.conn.query_row(
            statement.sql(),
            params_from_iter(statement.params()),
            |row| row.get(0),
        )
    }

    fn fetch(&self, statement: &Statement) -> Result<Vec<T>, Self::Error> {
        let mut prepared = self.conn.prepare(statement.sql())?;
        let rows = prepared.query_map(params_from_iter(statement.params()), |row| {
            (self.map)(row)
        })?;
        rows.collect()
    }

    fn consistent<U, G>(&self, f: G) -> Result<U, Self::Error>
    where
        G: FnOnce(&Self) -> Result<U, Self::Error>,
        Self: Sized,
    {
        let transaction = self.conn.unchecked_transaction()?;
        let result = f(self)?;
        transaction.commit()?;
        Ok(result)
    }
}
