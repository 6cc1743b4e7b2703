//! A small media database for running listings end to end.
//!
//! | id | title                  | type    | status   | score | tags                          |
//! |----|------------------------|---------|----------|-------|-------------------------------|
//! | m1 | Akira                  | movie   | finished | 8.1   | action, sci-fi                |
//! | m2 | Dandadan               | tv      | airing   | 8.5   | action, comedy                |
//! | m3 | Frieren                | tv      | airing   | null  | fantasy                       |
//! | m4 | Kaiju No. 8            | tv      | airing   | 7.9   | action                        |
//! | m5 | Bocchi the Rock! Recap | special | finished | null  | comedy, music, slice-of-life  |
//!
//! [`USER`] has `m2` on their "watching" list and `m3` on their
//! "completed" list.

use list_query::adapters::MediaAdapter;
use list_query::paging::{BaseQuery, FetchOptions, JoinOn, ListError, Listing};
use list_query::sqlite::SqliteExecutor;
use list_query::Page;
use log::debug;
use rusqlite::Connection;

pub const USER: &str = "alice";

const SCHEMA: &str = r#"
CREATE TABLE media (
    id TEXT PRIMARY KEY,
    mal_id TEXT,
    tmdb_id TEXT,
    title TEXT NOT NULL,
    type TEXT NOT NULL,
    status TEXT NOT NULL,
    rating TEXT NOT NULL,
    airing_season TEXT,
    score REAL,
    episode_count INTEGER,
    start_date TEXT,
    end_date TEXT,
    created INTEGER NOT NULL,
    updated INTEGER NOT NULL
);

CREATE TABLE media_tags (
    media_id TEXT NOT NULL REFERENCES media(id),
    tag_slug TEXT NOT NULL,
    PRIMARY KEY (media_id, tag_slug)
);

CREATE TABLE user_data (
    media_id TEXT NOT NULL REFERENCES media(id),
    user_id TEXT NOT NULL,
    list TEXT,
    score INTEGER,
    PRIMARY KEY (media_id, user_id)
);
"#;

const DATA: &str = r#"
INSERT INTO media VALUES
    ('m1', '47', NULL, 'Akira', 'movie', 'finished', 'r', NULL, 8.1, 1, '1988-07-16', '1988-07-16', 100, 100),
    ('m2', '57334', NULL, 'Dandadan', 'tv', 'airing', 'pg-13', 'fall-2024', 8.5, 12, '2024-10-04', NULL, 200, 210),
    ('m3', '52991', NULL, 'Frieren', 'tv', 'airing', 'pg-13', 'fall-2023', NULL, 28, '2023-09-29', NULL, 300, 300),
    ('m4', NULL, NULL, 'Kaiju No. 8', 'tv', 'airing', 'pg-13', 'spring-2024', 7.9, 12, '2024-04-13', NULL, 400, 420),
    ('m5', NULL, '1234', 'Bocchi the Rock! Recap', 'special', 'finished', 'pg-13', NULL, NULL, NULL, NULL, NULL, 500, 500);

INSERT INTO media_tags VALUES
    ('m1', 'action'), ('m1', 'sci-fi'),
    ('m2', 'action'), ('m2', 'comedy'),
    ('m3', 'fantasy'),
    ('m4', 'action'),
    ('m5', 'comedy'), ('m5', 'music'), ('m5', 'slice-of-life');

INSERT INTO user_data VALUES
    ('m2', 'alice', 'watching', 9),
    ('m3', 'alice', 'completed', 10),
    ('m1', 'bob', 'watching', 7);
"#;

/// Open an in-memory database holding the media table above.
pub fn media_database() -> rusqlite::Result<Connection> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch(SCHEMA)?;
    conn.execute_batch(DATA)?;
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM media", [], |row| row.get(0))?;
    debug!("created media fixture with {} rows", count);
    Ok(conn)
}

/// The media listing as seen by [`USER`].
pub fn media_base() -> BaseQuery {
    BaseQuery::new("media")
        .columns(&["media.id", "media.title"])
        .left_join(
            "user_data",
            [
                JoinOn::columns("user_data.media_id", "media.id"),
                JoinOn::value("user_data.user_id", USER),
            ],
        )
}

pub fn media_listing() -> Listing<'static> {
    Listing::new(&MediaAdapter, media_base())
}

/// Fetch the titles of one page of the media listing.
pub fn titles(
    conn: &Connection,
    filter: &str,
    sort: &str,
    options: FetchOptions,
) -> Result<(Vec<String>, Page), ListError<rusqlite::Error>> {
    let executor = SqliteExecutor::new(conn, |row| row.get::<_, String>(1));
    media_listing().fetch(&executor, filter, sort, options)
}

/// Every matching title, in the requested order.
pub fn all_titles(conn: &Connection, filter: &str, sort: &str) -> Vec<String> {
    match titles(conn, filter, sort, FetchOptions::default()) {
        Ok((titles, _)) => titles,
        Err(e) => panic!("listing {:?} sorted by {:?} failed: {}", filter, sort, e),
    }
}
