use crate::adapter::ResolverAdapter;
use crate::filtering::{Expr, FilterExpr, Name, ResolveError, Resolver};
use crate::sorting::SortDirection;
use crate::sql::ColumnPath;

const ID: Name = Name::string(ColumnPath::new("shows.id"));
const TYPE: Name = Name::string(ColumnPath::new("shows.type"));
const NAME: Name = Name::string(ColumnPath::new("shows.name"));
const SEARCH_SLUG: Name = Name::string(ColumnPath::new("shows.search_slug"));
const CREATED: Name = Name::number(ColumnPath::new("shows.created"));
const UPDATED: Name = Name::number(ColumnPath::new("shows.updated"));

/// Resolves filters and sorts over the show listing.
///
/// Shows are not tagged, so `hasTag` is not available here.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShowAdapter;

impl ResolverAdapter for ShowAdapter {
    fn default_sort(&self) -> (ColumnPath, SortDirection) {
        (NAME.path, SortDirection::Ascending)
    }

    fn resolve_variable_name(&self, name: &str) -> Option<Name> {
        match name {
            "id" => Some(ID),
            "type" => Some(TYPE),
            "name" => Some(NAME),
            "searchSlug" => Some(SEARCH_SLUG),
            "created" => Some(CREATED),
            "updated" => Some(UPDATED),
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
            "hasType" => resolver.in_column(name, "type", args),
            _ => Err(ResolveError::UnknownFunction(name.to_string())),
        }
    }
}
