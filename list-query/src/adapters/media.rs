use chrono::NaiveDate;

use super::{tag_id, TAGS};
use crate::adapter::ResolverAdapter;
use crate::filtering::{AssociationTable, Expr, FilterExpr, Name, ResolveError, Resolver};
use crate::sorting::SortDirection;
use crate::sql::ColumnPath;
use crate::Columns;

const MEDIA_TAGS: AssociationTable = AssociationTable::new("media_tags", "media_id", "tag_slug");

/// A row of the media listing, joined with the requesting user's data.
#[derive(Debug, Clone, PartialEq, Columns)]
#[query(table = "media")]
pub struct MediaRow {
    pub id: String,
    pub mal_id: Option<String>,
    pub tmdb_id: Option<String>,
    pub title: String,
    #[query(rename = "type", column = "media.type")]
    pub media_type: String,
    pub status: String,
    pub rating: String,
    pub airing_season: Option<String>,
    pub score: Option<f64>,
    pub episode_count: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[query(column = "user_data.list")]
    pub user_list: Option<String>,
    pub created: i64,
    pub updated: i64,
}

/// Resolves filters and sorts over [`MediaRow`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MediaAdapter;

impl ResolverAdapter for MediaAdapter {
    fn default_sort(&self) -> (ColumnPath, SortDirection) {
        (ColumnPath::new("media.title"), SortDirection::Ascending)
    }

    fn resolve_variable_name(&self, name: &str) -> Option<Name> {
        MediaRow::column(name)
    }

    fn resolve_name_to_id(&self, association: &str, name: &str) -> Option<String> {
        tag_id(association, name)
    }

    fn resolve_table(&self, association: &str) -> Option<AssociationTable> {
        match association {
            TAGS => Some(MEDIA_TAGS),
            _ => None,
        }
    }

    fn resolve_function_call(
        &self,
        resolver: &Resolver<'_>,
        name: &str,
        args: &[Expr],
    ) -> Result<FilterExpr, ResolveError> {
        match name {
            "hasTag" => resolver.in_table(name, TAGS, ColumnPath::new("media.id"), args),
            "hasType" => resolver.in_column(name, "type", args),
            "hasStatus" => resolver.in_column(name, "status", args),
            _ => Err(ResolveError::UnknownFunction(name.to_string())),
        }
    }
}
