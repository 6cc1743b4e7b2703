use list_query::adapters::{MediaAdapter, ShowAdapter};
use list_query::filtering::{parse_filter, FilterError, ResolveError, Resolver};
use list_query::{
    compile_filter, AssociationTable, ColumnPath, FilterExpr, Name, NameKind, OpKind,
    QueryError, Value,
};

fn resolve(filter: &str) -> Result<FilterExpr, ResolveError> {
    let expr = parse_filter(filter).unwrap();
    Resolver::new(&MediaAdapter).resolve(&expr)
}

fn status() -> Name {
    Name::string(ColumnPath::new("media.status"))
}

#[test]
fn comparison() {
    assert_eq!(
        resolve(r#"status == "airing""#).unwrap(),
        FilterExpr::Comparison {
            op: OpKind::Equal,
            name: status(),
            value: Value::Text("airing".to_string()),
        }
    );
    assert_eq!(
        resolve("score >= 7.5").unwrap(),
        FilterExpr::Comparison {
            op: OpKind::GreaterEqual,
            name: Name::number(ColumnPath::new("media.score")).nullable(),
            value: Value::Real(7.5),
        }
    );
}

#[test]
fn structure_is_kept() {
    let resolved = resolve(r#"status == "airing" || status == "finished" && score > 8"#).unwrap();
    match resolved {
        FilterExpr::Or(left, right) => {
            assert!(matches!(*left, FilterExpr::Comparison { .. }));
            assert!(matches!(*right, FilterExpr::And(..)));
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn deterministic() {
    let filter = r#"(hasTag("comedy") || score < 5) && !(malId == null) && title % "A%""#;
    assert_eq!(resolve(filter).unwrap(), resolve(filter).unwrap());
}

#[test]
fn tags() {
    assert_eq!(
        resolve(r#"hasTag("comedy")"#).unwrap(),
        FilterExpr::AssociationMembership {
            table: AssociationTable::new("media_tags", "media_id", "tag_slug"),
            id_selector: ColumnPath::new("media.id"),
            ids: vec!["comedy".to_string()],
            not: false,
        }
    );

    match resolve(r#"!hasTag("Slice of Life", "Sci-Fi")"#).unwrap() {
        FilterExpr::AssociationMembership { ids, not, .. } => {
            assert_eq!(ids, vec!["slice-of-life", "sci-fi"]);
            assert!(not);
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn tag_arguments() {
    assert!(matches!(
        resolve("hasTag()"),
        Err(ResolveError::MissingArguments { .. })
    ));
    assert!(matches!(
        resolve("hasTag(12)"),
        Err(ResolveError::InvalidArgument { .. })
    ));
    assert!(matches!(
        resolve(r#"hasTag("!!")"#),
        Err(ResolveError::InvalidArgument { .. })
    ));
}

#[test]
fn types() {
    assert_eq!(
        resolve(r#"hasType("movie", "special")"#).unwrap(),
        FilterExpr::SetMembership {
            name: Name::string(ColumnPath::new("media.type")),
            values: vec![Value::from("movie"), Value::from("special")],
            not: false,
        }
    );
    assert_eq!(
        resolve(r#"in(status, "airing")"#).unwrap(),
        resolve(r#"hasStatus("airing")"#).unwrap()
    );
    assert!(matches!(
        resolve("hasType(1)"),
        Err(ResolveError::TypeMismatch { .. })
    ));
    assert!(matches!(
        resolve(r#"in("status", "airing")"#),
        Err(ResolveError::Unexpected(_))
    ));
    assert!(matches!(
        resolve("in(status)"),
        Err(ResolveError::MissingArguments { .. })
    ));
}

#[test]
fn nulls() {
    assert_eq!(
        resolve("malId == null").unwrap(),
        FilterExpr::IsNull {
            name: Name::string(ColumnPath::new("media.mal_id")).nullable(),
            not: false,
        }
    );
    assert_eq!(
        resolve("!(malId != null)").unwrap(),
        resolve("malId == null").unwrap()
    );
    assert!(matches!(
        resolve("title == null"),
        Err(ResolveError::NotNullable(_))
    ));
    assert!(matches!(
        resolve("score > null"),
        Err(ResolveError::NullComparison {
            op: OpKind::Greater,
            ..
        })
    ));
}

#[test]
fn negation() {
    match resolve(r#"!(status == "airing" && score > 8)"#).unwrap() {
        FilterExpr::Not(inner) => assert!(matches!(*inner, FilterExpr::And(..))),
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(
        resolve(r#"!!(status == "airing")"#).unwrap(),
        resolve(r#"status == "airing""#).unwrap()
    );
}

#[test]
fn operator_matrix() {
    assert!(resolve(r#"title % "A%""#).is_ok());
    assert!(matches!(
        resolve("score % 8"),
        Err(ResolveError::OperatorNotAllowed {
            kind: NameKind::Number,
            ..
        })
    ));
    assert!(matches!(
        resolve(r#"title > "A""#),
        Err(ResolveError::OperatorNotAllowed {
            kind: NameKind::String,
            ..
        })
    ));
    assert!(resolve(r#"startDate < "2020-01-01""#).is_ok());
    assert!(matches!(
        resolve(r#"startDate % "2020%""#),
        Err(ResolveError::OperatorNotAllowed { .. })
    ));
}

#[test]
fn literal_kinds() {
    assert!(matches!(
        resolve(r#"score == "high""#),
        Err(ResolveError::TypeMismatch {
            expected: NameKind::Number,
            ..
        })
    ));
    assert!(matches!(
        resolve("title == 3"),
        Err(ResolveError::TypeMismatch { .. })
    ));
    assert!(matches!(
        resolve("title == status"),
        Err(ResolveError::TypeMismatch { .. })
    ));
    assert!(matches!(
        resolve(r#"startDate > "yesterday""#),
        Err(ResolveError::InvalidDate { .. })
    ));
    assert_eq!(
        resolve(r#"startDate > "2024-1-5""#).unwrap(),
        FilterExpr::Comparison {
            op: OpKind::Greater,
            name: Name::date(ColumnPath::new("media.start_date")).nullable(),
            value: Value::from("2024-01-05"),
        }
    );
}

#[test]
fn unknown_things() {
    assert!(matches!(
        resolve(r#"password == "hunter2""#),
        Err(ResolveError::UnknownName(name)) if name == "password"
    ));
    assert!(matches!(
        resolve(r#"hasStudio("Madhouse")"#),
        Err(ResolveError::UnknownFunction(name)) if name == "hasStudio"
    ));
    assert!(matches!(
        resolve("title"),
        Err(ResolveError::Unexpected(_))
    ));
    assert!(matches!(
        resolve(r#""airing" == status"#),
        Err(ResolveError::Unexpected(_))
    ));
}

#[test]
fn no_partial_results() {
    // The unknown field is in the last clause; nothing is returned.
    assert!(resolve(r#"status == "airing" && (score > 8 || studio == "x")"#).is_err());
}

#[test]
fn shows_have_no_tags() {
    let expr = parse_filter(r#"hasTag("comedy")"#).unwrap();
    assert!(matches!(
        Resolver::new(&ShowAdapter).resolve(&expr),
        Err(ResolveError::UnknownFunction(_))
    ));
}

#[test]
fn compile() {
    assert_eq!(compile_filter(&MediaAdapter, "").unwrap(), None);
    assert_eq!(compile_filter(&MediaAdapter, " \t").unwrap(), None);
    assert!(compile_filter(&MediaAdapter, r#"status == "airing""#)
        .unwrap()
        .is_some());

    let err = compile_filter(&MediaAdapter, "status ==").unwrap_err();
    assert!(matches!(
        err,
        QueryError::InvalidFilter(FilterError::Syntax(_))
    ));
    assert_eq!(
        err.to_string(),
        "invalid filter: unexpected end of filter at position 9"
    );

    let err = compile_filter(&MediaAdapter, "score % 1").unwrap_err();
    assert!(matches!(
        err,
        QueryError::InvalidFilter(FilterError::Resolve(_))
    ));
    assert_eq!(
        err.to_string(),
        "invalid filter: operator '%' cannot be used with number field 'score'"
    );
}

#[test]
fn deep_nesting_is_a_syntax_error() {
    let deep = format!(
        "{}status == \"airing\"{}",
        "(".repeat(4000),
        ")".repeat(4000)
    );
    let chain = vec!["score > 1"; 5000].join(" && ");
    let negated = format!("{}hasTag(\"comedy\")", "!".repeat(4000));

    for filter in [deep, chain, negated] {
        let err = compile_filter(&MediaAdapter, &filter).unwrap_err();
        assert!(
            matches!(err, QueryError::InvalidFilter(FilterError::Syntax(ref e)) if e.message == "filter is nested too deeply"),
            "{:?}",
            err
        );
    }
}
