use list_query::adapters::{MediaAdapter, ReleaseAdapter};
use list_query::paging::{statements, BaseQuery, FetchOptions, JoinOn};
use list_query::sorting::SortSpec;
use list_query::{compile_filter, compile_sort, Dialect, FilterExpr, Statement, Value};

const COUNT: &str = r#"SELECT COUNT(*) FROM "media" WHERE "#;

fn filter(adapter: &dyn list_query::ResolverAdapter, text: &str) -> FilterExpr {
    compile_filter(adapter, text).unwrap().unwrap()
}

fn count(adapter: &dyn list_query::ResolverAdapter, text: &str, dialect: Dialect) -> Statement {
    let (count, _) = statements(
        &BaseQuery::new("media"),
        Some(&filter(adapter, text)),
        &SortSpec::Random,
        FetchOptions::default(),
        dialect,
    );
    count
}

/// The condition of a media count, and its parameters.
fn sql(text: &str) -> (String, Vec<Value>) {
    let (sql, params) = count(&MediaAdapter, text, Dialect::Sqlite).into_parts();
    match sql.strip_prefix(COUNT) {
        Some(condition) => (condition.to_string(), params),
        None => panic!("unexpected count statement {}", sql),
    }
}

#[test]
fn comparisons() {
    let (condition, params) = sql(r#"status == "airing""#);
    assert_eq!(condition, r#""media"."status" = ?"#);
    assert_eq!(params, vec![Value::from("airing")]);

    assert_eq!(sql("score != 3").0, r#""media"."score" <> ?"#);
    assert_eq!(sql(r#"title % "A%""#).0, r#""media"."title" LIKE ?"#);
    assert_eq!(sql("episodeCount <= 12").0, r#""media"."episode_count" <= ?"#);
    assert_eq!(sql("malId == null").0, r#""media"."mal_id" IS NULL"#);
    assert_eq!(sql("userList != null").0, r#""user_data"."list" IS NOT NULL"#);
}

#[test]
fn logic() {
    let (condition, params) = sql(r#"status == "airing" && (score > 8.0 || malId == null)"#);
    assert!(condition.contains(r#""media"."status" = ?"#));
    assert!(condition.contains(r#""media"."score" > ?"#));
    assert!(condition.contains(r#""media"."mal_id" IS NULL"#));
    assert!(condition.contains(" AND "));
    assert!(condition.contains(" OR "));
    assert_eq!(params, vec![Value::from("airing"), Value::Real(8.0)]);

    let (condition, _) = sql(r#"!(status == "airing" || userList != null)"#);
    assert!(condition.starts_with("NOT"));
    assert!(condition.contains(r#""user_data"."list" IS NOT NULL"#));
}

#[test]
fn memberships() {
    let (condition, params) = sql(r#"!hasType("movie", "special")"#);
    assert_eq!(condition, r#""media"."type" NOT IN (?, ?)"#);
    assert_eq!(params, vec![Value::from("movie"), Value::from("special")]);

    let (condition, params) = sql(r#"hasTag("comedy", "Slice of Life")"#);
    assert_eq!(
        condition,
        r#""media"."id" IN (SELECT "media_id" FROM "media_tags" WHERE "tag_slug" IN (?, ?))"#
    );
    assert_eq!(params, vec![Value::from("comedy"), Value::from("slice-of-life")]);

    let (condition, _) = sql(r#"!hasTag("comedy")"#);
    assert!(condition.starts_with(r#""media"."id" NOT IN (SELECT"#));
}

#[test]
fn literals_are_always_bound() {
    let (condition, params) = sql(r#"title == "x'); DROP TABLE media; --""#);
    assert_eq!(condition, r#""media"."title" = ?"#);
    assert_eq!(params, vec![Value::from("x'); DROP TABLE media; --")]);

    let (condition, _) = sql(r#"hasTag("a\" OR 1=1 --")"#);
    assert!(!condition.contains("OR 1=1"));
}

#[test]
fn postgres_placeholders() {
    let statement = count(
        &ReleaseAdapter,
        r#"userScore >= 7 && hasTag("drama", "mystery")"#,
        Dialect::Postgres,
    );
    assert!(statement.sql().contains(r#""user_data"."score" >= $1"#));
    assert!(statement
        .sql()
        .contains(r#"(SELECT "media_id" FROM "media_tags" WHERE "tag_slug" IN ($2, $3))"#));
    assert_eq!(
        statement.params(),
        &[Value::Integer(7), Value::from("drama"), Value::from("mystery")]
    );
}

#[test]
fn orderings() {
    let base = BaseQuery::new("media").columns(&["media.title"]);
    let page = |sort: &str| {
        let spec = compile_sort(&MediaAdapter, sort).unwrap();
        statements(&base, None, &spec, FetchOptions::default(), Dialect::Sqlite).1
    };

    assert!(page("title:desc,score:asc").sql().ends_with(
        r#"ORDER BY "media"."title" DESC NULLS LAST, "media"."score" ASC NULLS LAST"#
    ));
    assert!(page("random").sql().contains("ORDER BY RANDOM()"));
}

#[test]
fn listing_statements() {
    let base = BaseQuery::new("media")
        .columns(&["media.title"])
        .left_join(
            "user_data",
            [
                JoinOn::columns("user_data.media_id", "media.id"),
                JoinOn::value("user_data.user_id", "alice"),
            ],
        )
        .restrict(filter(&MediaAdapter, r#"status != "hidden""#));
    let sort = compile_sort(&MediaAdapter, "").unwrap();
    let user = filter(&MediaAdapter, "score > 5");

    let (count, page) = statements(
        &base,
        Some(&user),
        &sort,
        FetchOptions {
            page: 3,
            per_page: 25,
        },
        Dialect::Postgres,
    );
    assert!(count
        .sql()
        .starts_with(r#"SELECT COUNT(*) FROM "media" LEFT JOIN "user_data" ON "#));
    assert!(count
        .sql()
        .contains(r#""user_data"."media_id" = "media"."id""#));
    assert!(count.sql().contains(r#""user_data"."user_id" = $1"#));
    assert!(count.sql().contains(r#""media"."status" <> $2"#));
    assert!(count.sql().contains(r#""media"."score" > $3"#));
    assert!(!count.sql().contains("ORDER BY"));

    assert!(page.sql().starts_with(r#"SELECT "media"."title" FROM "media""#));
    assert!(page
        .sql()
        .ends_with(r#"ORDER BY "media"."title" ASC NULLS LAST LIMIT $4 OFFSET $5"#));
    assert_eq!(
        page.params(),
        &[
            Value::from("alice"),
            Value::from("hidden"),
            Value::Integer(5),
            Value::Integer(25),
            Value::Integer(75),
        ]
    );
}

#[test]
fn no_filter_no_where() {
    let sort = compile_sort(&MediaAdapter, "").unwrap();
    let (count, page) = statements(
        &BaseQuery::new("media").columns(&["media.title"]),
        None,
        &sort,
        FetchOptions {
            page: 0,
            per_page: 0,
        },
        Dialect::Sqlite,
    );
    assert_eq!(count.sql(), r#"SELECT COUNT(*) FROM "media""#);
    assert_eq!(
        page.sql(),
        r#"SELECT "media"."title" FROM "media" ORDER BY "media"."title" ASC NULLS LAST"#
    );
    assert!(page.params().is_empty());

    let (_, page) = statements(
        &BaseQuery::new("media"),
        None,
        &sort,
        FetchOptions::default(),
        Dialect::Sqlite,
    );
    assert!(page.sql().starts_with(r#"SELECT * FROM "media""#));
}
