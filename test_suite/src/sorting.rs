use list_query::adapters::{MediaAdapter, NotificationAdapter, ShowAdapter};
use list_query::sorting::{parse_sort, SortError, SortKey};
use list_query::{compile_sort, ColumnPath, QueryError, ResolverAdapter, SortDirection, SortSpec};

fn key(column: &'static str, direction: SortDirection) -> SortKey {
    SortKey {
        column: ColumnPath::new(column),
        direction,
    }
}

#[test]
fn two_keys() {
    assert_eq!(
        compile_sort(&MediaAdapter, "title:desc,score:asc").unwrap(),
        SortSpec::Ordered(vec![
            key("media.title", SortDirection::Descending),
            key("media.score", SortDirection::Ascending),
        ])
    );
}

#[test]
fn default_sort() {
    for adapter in [
        &MediaAdapter as &dyn ResolverAdapter,
        &ShowAdapter,
        &NotificationAdapter,
    ] {
        let (column, direction) = adapter.default_sort();
        assert_eq!(
            compile_sort(adapter, "").unwrap(),
            SortSpec::Ordered(vec![SortKey { column, direction }])
        );
    }
    assert_eq!(
        compile_sort(&ShowAdapter, "default").unwrap(),
        SortSpec::Ordered(vec![key("shows.name", SortDirection::Ascending)])
    );
}

#[test]
fn random() {
    assert_eq!(compile_sort(&MediaAdapter, "random").unwrap(), SortSpec::Random);
    assert_eq!(
        compile_sort(&MediaAdapter, "score:desc,random,title").unwrap(),
        SortSpec::Random
    );
}

#[test]
fn deterministic() {
    let sort = parse_sort("-score,title,startDate:desc").unwrap();
    assert_eq!(sort, parse_sort("-score,title,startDate:desc").unwrap());
    assert_eq!(
        compile_sort(&MediaAdapter, "-score,title,startDate:desc").unwrap(),
        compile_sort(&MediaAdapter, "score:desc,title:asc,startDate:desc").unwrap()
    );
}

#[test]
fn unknown_fields() {
    let err = compile_sort(&MediaAdapter, "title,popularity").unwrap_err();
    assert!(matches!(
        err,
        QueryError::InvalidSort(SortError::UnknownField(ref field)) if field == "popularity"
    ));
    assert_eq!(
        err.to_string(),
        "invalid sort: cannot sort by unknown field 'popularity'"
    );

    // Fields of other entities are unknown too.
    assert!(compile_sort(&ShowAdapter, "score").is_err());
}

#[test]
fn syntax() {
    let err = compile_sort(&MediaAdapter, "title:up").unwrap_err();
    assert!(matches!(err, QueryError::InvalidSort(SortError::Syntax { .. })));
    assert_eq!(
        err.to_string(),
        "invalid sort: unknown sort direction 'up' in 'title:up'"
    );
    assert!(compile_sort(&MediaAdapter, "title,").is_err());
    assert!(compile_sort(&MediaAdapter, "title DESC").is_err());
}
