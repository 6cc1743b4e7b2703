use crate::adapter::ResolverAdapter;
use crate::filtering::Name;
use crate::sorting::SortDirection;
use crate::sql::ColumnPath;
use crate::Columns;

#[derive(Debug, Clone, PartialEq, Columns)]
#[query(table = "collections")]
pub struct CollectionRow {
    pub id: String,
    pub name: String,
    #[query(exclude)]
    pub cover_file: Option<String>,
}

/// Collections have no associations or functions; only their own
/// fields can be filtered on.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectionAdapter;

impl ResolverAdapter for CollectionAdapter {
    fn default_sort(&self) -> (ColumnPath, SortDirection) {
        (ColumnPath::new("collections.name"), SortDirection::Ascending)
    }

    fn resolve_variable_name(&self, name: &str) -> Option<Name> {
        CollectionRow::column(name)
    }
}
