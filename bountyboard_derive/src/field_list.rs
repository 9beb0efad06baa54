use crate::helper;
use proc_macro2::TokenStream;
use syn::DeriveInput;

/// Generates `FieldList::field_list()` returning the comma separated column names of a row struct.
///
/// A field annotated with `#[sqlx(rename = "...")]` contributes the renamed column,
/// so the list always matches what `sqlx::FromRow` expects to read.
pub fn impl_field_list(input: TokenStream) -> TokenStream {
    let ast: DeriveInput = syn::parse2(input).expect("failed to parse input token stream");

    let struct_name = &ast.ident;
    let columns = helper::extract_fields(&ast.data)
        .named
        .iter()
        .filter_map(|field| {
            let ident = field.ident.as_ref()?;
            Some(helper::extract_rename(&field.attrs).unwrap_or_else(|| ident.to_string()))
        })
        .collect::<Vec<String>>();
    let field_list = columns.join(",");

    quote::quote! {
        impl FieldList for #struct_name {
            fn field_list() -> &'static str {
                #field_list
            }
        }
    }
}
