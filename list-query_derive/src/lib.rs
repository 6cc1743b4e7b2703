use proc_macro::{self, TokenStream};

use proc_macro2 as pm2;

mod attributes;
mod columns;

/// Derive the `Columns` trait, mapping the fields of a struct to
/// filterable, sortable columns.
///
/// This is only implemented for structs with named fields. Every
/// field is exposed under the lowerCamelCase form of its name, unless
/// annotated otherwise. The kind of the column and whether it is
/// nullable come from the field's type, which must implement
/// `ColumnType`. The annotations use the `query` attribute:
///
/// - `#[query(table = "media")]` On the struct. Fields without an
///   explicit column live in this table, in a column named as the
///   field is, so `air_date` becomes `media.air_date`.
///
/// - `#[query(rename = "type")]` Expose the annotated member as `type`
///   instead of using the camel cased form of its name.
///
/// - `#[query(column = "user_data.list")]` The member is stored in the
///   given column, which may belong to a joined table.
///
/// - `#[query(exclude)]` Do not expose this field; it cannot be used
///   in filters or sorts.
#[proc_macro_derive(Columns, attributes(query))]
pub fn columns(input: TokenStream) -> TokenStream {
    let derive: syn::DeriveInput = syn::parse_macro_input!(input);

    let res: pm2::TokenStream = columns::derive_columns(derive);

    res.into()
}
