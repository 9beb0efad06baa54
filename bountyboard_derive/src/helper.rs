use syn::{Attribute, Data, Fields, FieldsNamed, Lit, LitStr, Token};

pub fn extract_fields(data: &Data) -> &FieldsNamed {
    match *data {
        Data::Struct(ref data) => match data.fields {
            Fields::Named(ref fields) => fields,
            _ => panic!("all fields must be named."),
        },
        _ => panic!("struct expected, but got other item."),
    }
}

/// Reads the column name out of `#[sqlx(rename = "...")]`, ignoring the other sqlx options.
pub fn extract_rename(attrs: &[Attribute]) -> Option<String> {
    let mut renamed = None;

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("sqlx")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let value: LitStr = meta.value()?.parse()?;
                renamed = Some(value.value());
            } else if meta.input.peek(Token![=]) {
                let _: Lit = meta.value()?.parse()?;
            }
            Ok(())
        })
        .expect("couldn't parse sqlx attribute");
    }

    renamed
}
