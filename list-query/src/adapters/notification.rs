use crate::adapter::ResolverAdapter;
use crate::filtering::{Expr, FilterExpr, Name, ResolveError, Resolver};
use crate::sorting::SortDirection;
use crate::sql::ColumnPath;

#[derive(Debug, Clone, Copy, Default)]
pub struct NotificationAdapter;

impl ResolverAdapter for NotificationAdapter {
    fn default_sort(&self) -> (ColumnPath, SortDirection) {
        (
            ColumnPath::new("notifications.created"),
            SortDirection::Ascending,
        )
    }

    fn resolve_variable_name(&self, name: &str) -> Option<Name> {
        let name = match name {
            "id" => Name::string(ColumnPath::new("notifications.id")),
            "type" => Name::string(ColumnPath::new("notifications.type")),
            "title" => Name::string(ColumnPath::new("notifications.title")),
            // 0 or 1
            "isRead" => Name::number(ColumnPath::new("notifications.is_read")),
            "created" => Name::number(ColumnPath::new("notifications.created")),
            "updated" => Name::number(ColumnPath::new("notifications.updated")),
            _ => return None,
        };
        Some(name)
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
