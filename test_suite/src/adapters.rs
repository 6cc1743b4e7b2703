use list_query::adapters::{
    AnimeAdapter, CollectionAdapter, MediaAdapter, NotificationAdapter, ReleaseAdapter,
    ShowAdapter,
};
use list_query::filtering::{parse_filter, Expr, ResolveError, Resolver};
use list_query::{
    compile_filter, AssociationTable, ColumnPath, FilterExpr, Name, NameKind, OpKind,
    ResolverAdapter, SortDirection, Value,
};

fn resolve(adapter: &dyn ResolverAdapter, filter: &str) -> Result<FilterExpr, ResolveError> {
    Resolver::new(adapter).resolve(&parse_filter(filter).unwrap())
}

#[test]
fn shareable() {
    fn assert_shareable<T: Send + Sync + 'static>(_: &T) {}
    assert_shareable(&MediaAdapter);

    let adapters: [&'static dyn ResolverAdapter; 6] = [
        &MediaAdapter,
        &AnimeAdapter,
        &CollectionAdapter,
        &NotificationAdapter,
        &ReleaseAdapter,
        &ShowAdapter,
    ];
    for adapter in adapters {
        let (column, direction) = adapter.default_sort();
        assert!(column.as_str().contains('.'));
        assert_eq!(direction, SortDirection::Ascending);
        assert!(adapter.resolve_variable_name("nonsense").is_none());
    }
}

#[test]
fn anime() {
    assert_eq!(
        resolve(&AnimeAdapter, r#"hasTag("Mecha")"#).unwrap(),
        FilterExpr::AssociationMembership {
            table: AssociationTable::new("anime_tags", "anime_id", "tag_slug"),
            id_selector: ColumnPath::new("animes.id"),
            ids: vec!["mecha".to_string()],
            not: false,
        }
    );
    assert!(resolve(&AnimeAdapter, "lastDataFetch == null").is_ok());
    assert!(resolve(&AnimeAdapter, r#"hasStatus("airing", "finished")"#).is_ok());
}

#[test]
fn collections() {
    assert!(resolve(&CollectionAdapter, r#"name % "Ghibli%""#).is_ok());
    assert!(matches!(
        resolve(&CollectionAdapter, "coverFile == null"),
        Err(ResolveError::UnknownName(_))
    ));
    assert!(matches!(
        resolve(&CollectionAdapter, r#"hasTag("x")"#),
        Err(ResolveError::UnknownFunction(_))
    ));
}

#[test]
fn notifications() {
    assert_eq!(
        resolve(&NotificationAdapter, "isRead == 0").unwrap(),
        FilterExpr::Comparison {
            op: OpKind::Equal,
            name: Name::number(ColumnPath::new("notifications.is_read")),
            value: Value::Integer(0),
        }
    );
    assert!(resolve(&NotificationAdapter, r#"hasType("release", "system")"#).is_ok());
    assert_eq!(
        NotificationAdapter.default_sort().0.as_str(),
        "notifications.created"
    );
}

#[test]
fn releases() {
    let score = ReleaseAdapter.resolve_variable_name("userScore").unwrap();
    assert_eq!(score.path.as_str(), "user_data.score");
    assert!(score.nullable);
    assert!(resolve(&ReleaseAdapter, r#"hasTag("drama") && userScore > 7"#).is_ok());
    assert!(resolve(&ReleaseAdapter, r#"hasType("movie")"#).is_err());
}

#[test]
fn shows() {
    assert_eq!(
        resolve(&ShowAdapter, r#"hasType("anime")"#).unwrap(),
        FilterExpr::SetMembership {
            name: Name::string(ColumnPath::new("shows.type")),
            values: vec![Value::from("anime")],
            not: false,
        }
    );
    assert_eq!(ShowAdapter.resolve_name_to_id("tags", "Comedy"), None);
}

/// A release calendar that only allows exact date matches, and fails
/// loudly on a function it cannot serve yet.
struct Calendar;

impl ResolverAdapter for Calendar {
    fn default_sort(&self) -> (ColumnPath, SortDirection) {
        (ColumnPath::new("releases.date"), SortDirection::Descending)
    }

    fn resolve_variable_name(&self, name: &str) -> Option<Name> {
        match name {
            "date" => Some(Name::date(ColumnPath::new("releases.date"))),
            "title" => Some(Name::string(ColumnPath::new("releases.title"))),
            _ => None,
        }
    }

    fn resolve_function_call(
        &self,
        _resolver: &Resolver<'_>,
        name: &str,
        _args: &[Expr],
    ) -> Result<FilterExpr, ResolveError> {
        match name {
            "thisWeek" => Err(anyhow::anyhow!("'thisWeek' needs a time zone").into()),
            _ => Err(ResolveError::UnknownFunction(name.to_string())),
        }
    }

    fn allowed_operators(&self, name: &Name) -> &'static [OpKind] {
        match name.kind {
            NameKind::Date => &[OpKind::Equal],
            kind => kind.default_operators(),
        }
    }
}

#[test]
fn custom_adapter() {
    assert!(resolve(&Calendar, r#"date == "2024-10-04""#).is_ok());
    assert!(matches!(
        resolve(&Calendar, r#"date > "2024-10-04""#),
        Err(ResolveError::OperatorNotAllowed {
            kind: NameKind::Date,
            ..
        })
    ));
    assert!(resolve(&Calendar, r#"title % "Dan%""#).is_ok());

    let err = resolve(&Calendar, "thisWeek()").unwrap_err();
    assert!(matches!(err, ResolveError::Custom(_)));
    assert_eq!(err.to_string(), "'thisWeek' needs a time zone");

    assert!(compile_filter(&Calendar, "thisWeek()").is_err());
}
