use super::{tag_id, TAGS};
use crate::adapter::ResolverAdapter;
use crate::filtering::{AssociationTable, Expr, FilterExpr, Name, ResolveError, Resolver};
use crate::sorting::SortDirection;
use crate::sql::ColumnPath;
use crate::Columns;

/// A row of the release listing: the media a release belongs to, and
/// the requesting user's data for it.
#[derive(Debug, Clone, PartialEq, Columns)]
#[query(table = "media")]
pub struct ReleaseRow {
    #[query(column = "media.id")]
    pub media_id: String,
    pub mal_id: Option<String>,
    pub tmdb_id: Option<String>,
    pub title: String,
    pub status: String,
    pub airing_season: Option<String>,
    pub score: Option<f64>,
    #[query(column = "user_data.list")]
    pub user_list: Option<String>,
    #[query(column = "user_data.score")]
    pub user_score: Option<i64>,
}

/// Resolves filters and sorts over [`ReleaseRow`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ReleaseAdapter;

impl ResolverAdapter for ReleaseAdapter {
    fn default_sort(&self) -> (ColumnPath, SortDirection) {
        (ColumnPath::new("media.title"), SortDirection::Ascending)
    }

    fn resolve_variable_name(&self, name: &str) -> Option<Name> {
        ReleaseRow::column(name)
    }

    fn resolve_name_to_id(&self, association: &str, name: &str) -> Option<String> {
        tag_id(association, name)
    }

    fn resolve_table(&self, association: &str) -> Option<AssociationTable> {
        match association {
            TAGS => Some(AssociationTable::new("media_tags", "media_id", "tag_slug")),
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
            _ => Err(ResolveError::UnknownFunction(name.to_string())),
        }
    }
}
