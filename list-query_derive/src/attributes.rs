use syn::ext::IdentExt;

#[derive(Debug)]
pub enum QueryItem {
    Table(syn::LitStr),
    Rename(syn::LitStr),
    Column(syn::LitStr),
    Ignored,
}

impl syn::parse::Parse for QueryItem {
    fn parse(input: syn::parse::ParseStream<'_>) -> syn::Result<Self> {
        let attr = input.call(syn::Ident::parse_any)?;
        match attr.to_string().as_str() {
            "table" => {
                // table = "media"
                let _: syn::Token![=] = input.parse()?;
                let table: syn::LitStr = input.parse()?;
                check_path(&table)?;
                Ok(QueryItem::Table(table))
            }
            "rename" => {
                let _: syn::Token![=] = input.parse()?;
                let new_name: syn::LitStr = input.parse()?;
                Ok(QueryItem::Rename(new_name))
            }
            "column" => {
                // column = "user_data.list"
                let _: syn::Token![=] = input.parse()?;
                let column: syn::LitStr = input.parse()?;
                check_path(&column)?;
                Ok(QueryItem::Column(column))
            }
            "exclude" => Ok(QueryItem::Ignored),
            _ => Err(syn::Error::new_spanned(attr, "unsupported query attribute")),
        }
    }
}

/// Column paths are written into SQL verbatim, so only allow dotted
/// identifiers.
fn check_path(path: &syn::LitStr) -> syn::Result<()> {
    let value = path.value();
    let valid = !value.is_empty()
        && value.split('.').all(|part| {
            !part.is_empty()
                && part
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_')
        });
    if valid {
        Ok(())
    } else {
        Err(syn::Error::new_spanned(
            path,
            "expected a dotted identifier such as \"media.title\"",
        ))
    }
}

#[derive(Debug, Default)]
pub struct QueryMeta {
    pub table: Option<syn::LitStr>,
    pub name: Option<syn::LitStr>,
    pub column: Option<syn::LitStr>,
    pub excluded: bool,
}

impl syn::parse::Parse for QueryMeta {
    fn parse(input: syn::parse::ParseStream<'_>) -> syn::Result<Self> {
        let punc =
            syn::punctuated::Punctuated::<QueryItem, syn::Token![,]>::parse_terminated(input)?;

        let mut meta = QueryMeta::default();
        for item in punc {
            match item {
                QueryItem::Table(table) => meta.table = Some(table),
                QueryItem::Rename(new_name) => meta.name = Some(new_name),
                QueryItem::Column(column) => meta.column = Some(column),
                QueryItem::Ignored => meta.excluded = true,
            }
        }

        Ok(meta)
    }
}
