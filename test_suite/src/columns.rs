use chrono::NaiveDate;
use list_query::adapters::{CollectionRow, MediaRow, ReleaseRow};
use list_query::{Columns, NameKind};

#[allow(dead_code)]
#[derive(Columns)]
#[query(table = "episodes")]
struct Episode {
    id: String,
    number: u32,
    air_date: Option<NaiveDate>,
    #[query(rename = "show")]
    show_id: String,
    #[query(column = "user_data.watched_at")]
    watched_at: Option<i64>,
    #[query(exclude)]
    thumbnail: Vec<u8>,
}

#[test]
fn defaults() {
    let number = Episode::column("number").unwrap();
    assert_eq!(number.kind, NameKind::Number);
    assert_eq!(number.path.as_str(), "episodes.number");
    assert!(!number.nullable);

    let air_date = Episode::column("airDate").unwrap();
    assert_eq!(air_date.kind, NameKind::Date);
    assert_eq!(air_date.path.as_str(), "episodes.air_date");
    assert!(air_date.nullable);

    assert!(Episode::column("air_date").is_none());
}

#[test]
fn attributes() {
    let show = Episode::column("show").unwrap();
    assert_eq!(show.path.as_str(), "episodes.show_id");
    assert!(Episode::column("showId").is_none());

    let watched = Episode::column("watchedAt").unwrap();
    assert_eq!(watched.path.as_str(), "user_data.watched_at");
    assert!(watched.nullable);

    assert!(Episode::column("thumbnail").is_none());
    assert_eq!(
        Episode::column_names(),
        &["id", "number", "airDate", "show", "watchedAt"]
    );
}

#[derive(Columns)]
struct Joined<'a, T> {
    #[query(column = "a.name")]
    name: &'a str,
    #[query(column = "b.value")]
    value: Option<T>,
}

#[test]
fn generics() {
    let name = <Joined<'static, f64> as Columns>::column("name").unwrap();
    assert_eq!(name.kind, NameKind::String);
    let value = <Joined<'static, f64> as Columns>::column("value").unwrap();
    assert_eq!(value.kind, NameKind::Number);
    assert!(value.nullable);
    let joined = Joined {
        name: "x",
        value: Some(1.0f64),
    };
    assert_eq!(joined.name, "x");
    assert_eq!(joined.value, Some(1.0));
}

#[test]
fn builtin_rows() {
    assert_eq!(MediaRow::column("type").unwrap().path.as_str(), "media.type");
    assert_eq!(MediaRow::column_names().len(), 15);
    assert_eq!(
        ReleaseRow::column("mediaId").unwrap().path.as_str(),
        "media.id"
    );
    assert_eq!(
        ReleaseRow::column("userScore").unwrap().kind,
        NameKind::Number
    );
    assert_eq!(CollectionRow::column_names(), &["id", "name"]);
}
