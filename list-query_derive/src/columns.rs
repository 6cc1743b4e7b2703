use std::collections::BTreeSet;

use proc_macro2 as pm2;
use syn::ext::IdentExt;

use crate::attributes::QueryMeta;

fn lower_camel(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for c in name.chars() {
        if c == '_' {
            upper = !out.is_empty();
            continue;
        }
        if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

fn named_fields_error(ident: &syn::Ident) -> pm2::TokenStream {
    syn::Error::new(
        ident.span(),
        "Columns can only be derived for structs with named fields.",
    )
    .to_compile_error()
}

pub fn derive_columns(input: syn::DeriveInput) -> pm2::TokenStream {
    let syn::DeriveInput {
        ident,
        data,
        generics,
        attrs,
        ..
    } = input;

    let mut table = None;
    for attr in attrs.iter() {
        if attr.path.is_ident("query") {
            let parsed = match attr.parse_args::<QueryMeta>() {
                Ok(parsed) => parsed,
                Err(e) => return e.into_compile_error(),
            };
            if parsed.name.is_some() || parsed.column.is_some() || parsed.excluded {
                return syn::Error::new_spanned(attr, "only `table` can be given for a struct")
                    .to_compile_error();
            }
            if parsed.table.is_some() {
                table = parsed.table;
            }
        }
    }

    let named = match data {
        syn::Data::Struct(syn::DataStruct {
            fields: syn::Fields::Named(syn::FieldsNamed { named, .. }),
            ..
        }) => named,
        _ => return named_fields_error(&ident),
    };

    let mut arms = pm2::TokenStream::new();
    let mut names = Vec::new();
    let mut seen = BTreeSet::new();
    let mut bounds: Vec<syn::WherePredicate> = Vec::new();

    for field in named.iter() {
        let fieldid = match &field.ident {
            Some(fieldid) => fieldid,
            None => return named_fields_error(&ident),
        };
        let member = fieldid.unraw().to_string();
        let mut fieldname = syn::LitStr::new(&lower_camel(&member), fieldid.span());
        let mut column = None;
        let mut excluded = false;

        for attr in field.attrs.iter() {
            if attr.path.is_ident("query") {
                let parsed = match attr.parse_args::<QueryMeta>() {
                    Ok(parsed) => parsed,
                    Err(e) => return e.into_compile_error(),
                };
                if parsed.table.is_some() {
                    return syn::Error::new_spanned(attr, "`table` can only be given for a struct")
                        .to_compile_error();
                }
                if let Some(name) = parsed.name {
                    fieldname = name;
                }
                if parsed.column.is_some() {
                    column = parsed.column;
                }
                excluded |= parsed.excluded;
            }
        }

        if excluded {
            continue;
        }

        let column = match (column, &table) {
            (Some(column), _) => column,
            (None, Some(table)) => {
                syn::LitStr::new(&format!("{}.{}", table.value(), member), fieldid.span())
            }
            (None, None) => {
                return syn::Error::new_spanned(
                    fieldid,
                    "no column for this field; add #[query(table = \"...\")] to the struct or #[query(column = \"...\")] here",
                )
                .to_compile_error();
            }
        };

        if !seen.insert(fieldname.value()) {
            return syn::Error::new_spanned(&fieldname, "duplicate field name").to_compile_error();
        }

        let ty = &field.ty;
        bounds.push(syn::parse_quote! { #ty: ::list_query::adapter::ColumnType });
        arms.extend(quote::quote! {
            #fieldname => ::core::option::Option::Some(::list_query::Name {
                kind: <#ty as ::list_query::adapter::ColumnType>::KIND,
                path: ::list_query::ColumnPath::new(#column),
                nullable: <#ty as ::list_query::adapter::ColumnType>::NULLABLE,
            }),
        });
        names.push(fieldname);
    }

    let mut generics = generics;
    generics.make_where_clause().predicates.extend(bounds);
    let (generics, ty_generics, wc) = generics.split_for_impl();

    quote::quote! {
        const _: () = {
            #[automatically_derived]
            impl #generics ::list_query::adapter::Columns for #ident #ty_generics #wc {
                fn column(name: &str) -> ::core::option::Option<::list_query::Name> {
                    match name {
                        #arms
                        _ => ::core::option::Option::None,
                    }
                }

                fn column_names() -> &'static [&'static str] {
                    &[#(#names),*]
                }
            }
        };
    }
}
