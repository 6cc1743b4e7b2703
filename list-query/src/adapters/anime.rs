use super::{tag_id, TAGS};
use crate::adapter::ResolverAdapter;
use crate::filtering::{AssociationTable, Expr, FilterExpr, Name, ResolveError, Resolver};
use crate::sorting::SortDirection;
use crate::sql::ColumnPath;

/// Resolves filters and sorts over the anime listing.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnimeAdapter;

impl ResolverAdapter for AnimeAdapter {
    fn default_sort(&self) -> (ColumnPath, SortDirection) {
        (ColumnPath::new("animes.title"), SortDirection::Ascending)
    }

    fn resolve_variable_name(&self, name: &str) -> Option<Name> {
        let name = match name {
            "id" => Name::string(ColumnPath::new("animes.id")),
            "title" => Name::string(ColumnPath::new("animes.title")),
            "status" => Name::string(ColumnPath::new("animes.status")),
            "airingSeason" => Name::string(ColumnPath::new("animes.airing_season")).nullable(),
            "score" => Name::number(ColumnPath::new("animes.score")).nullable(),
            "episodeCount" => Name::number(ColumnPath::new("animes.episode_count")).nullable(),
            "lastDataFetch" => {
                Name::number(ColumnPath::new("animes.last_data_fetch")).nullable()
            }
            "userList" => Name::string(ColumnPath::new("user_data.list")).nullable(),
            _ => return None,
        };
        Some(name)
    }

    fn resolve_name_to_id(&self, association: &str, name: &str) -> Option<String> {
        tag_id(association, name)
    }

    fn resolve_table(&self, association: &str) -> Option<AssociationTable> {
        match association {
            TAGS => Some(AssociationTable::new("anime_tags", "anime_id", "tag_slug")),
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
            "hasTag" => resolver.in_table(name, TAGS, ColumnPath::new("animes.id"), args),
            "hasStatus" => resolver.in_column(name, "status", args),
            _ => Err(ResolveError::UnknownFunction(name.to_string())),
        }
    }
}
