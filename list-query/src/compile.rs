//! Parse and resolve in one step, mapping failures onto the two
//! umbrella errors callers report to users.

use log::debug;
use thiserror::Error;

use crate::adapter::ResolverAdapter;
use crate::filtering::{parse_filter, FilterError, FilterExpr, Resolver};
use crate::sorting::{parse_sort, SortError, SortSpec};

/// Errors produced by compiling a filter or sort string.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("invalid filter: {0}")]
    InvalidFilter(#[from] FilterError),
    #[error("invalid sort: {0}")]
    InvalidSort(#[from] SortError),
}

/// Compile a filter string for the entity described by `adapter`.
///
/// A blank filter means no filtering at all and produces `None`, not a
/// predicate that is always true.
pub fn compile_filter(
    adapter: &dyn ResolverAdapter,
    filter: &str,
) -> Result<Option<FilterExpr>, QueryError> {
    if filter.trim().is_empty() {
        return Ok(None);
    }

    let expr = parse_filter(filter).map_err(FilterError::from)?;
    let resolved = Resolver::new(adapter)
        .resolve(&expr)
        .map_err(FilterError::from)?;
    debug!("compiled filter {:?} to {:?}", filter, resolved);

    Ok(Some(resolved))
}

/// Compile a sort string for the entity described by `adapter`.
///
/// A blank sort resolves to the adapter's default ordering.
pub fn compile_sort(adapter: &dyn ResolverAdapter, sort: &str) -> Result<SortSpec, QueryError> {
    let expr = parse_sort(sort)?;
    let resolved = Resolver::new(adapter).resolve_sort(&expr)?;
    debug!("compiled sort {:?} to {:?}", sort, resolved);

    Ok(resolved)
}
