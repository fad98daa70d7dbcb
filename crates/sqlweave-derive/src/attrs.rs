//! Field-level `#[orm(...)]` attribute parsing.

use syn::ext::IdentExt;
use syn::{LitStr, Result};

/// One `key` or `key = "value"` entry.
pub(crate) struct TagItem {
    pub key: syn::Ident,
    pub value: Option<LitStr>,
}

/// Helper struct for parsing field attributes
pub(crate) struct FieldAttr {
    pub items: Vec<TagItem>,
}

impl syn::parse::Parse for FieldAttr {
    fn parse(input: syn::parse::ParseStream) -> Result<Self> {
        let mut items = Vec::new();

        loop {
            if input.is_empty() {
                break;
            }

            // `type` is a keyword, so accept any identifier here.
            let key = syn::Ident::parse_any(input)?;
            let value = if input.peek(syn::Token![=]) {
                let _: syn::Token![=] = input.parse()?;
                let lit: LitStr = input.parse()?;
                if lit.value().contains(';') {
                    return Err(syn::Error::new(
                        lit.span(),
                        "orm attribute values cannot contain ';'",
                    ));
                }
                Some(lit)
            } else {
                None
            };
            items.push(TagItem { key, value });

            if input.peek(syn::Token![,]) {
                let _: syn::Token![,] = input.parse()?;
            } else {
                break;
            }
        }

        if !input.is_empty() {
            return Err(input.error("expected `key` or `key = \"value\"`"));
        }
        Ok(FieldAttr { items })
    }
}

/// Everything declared in a field's `#[orm(...)]` attributes.
pub(crate) struct FieldTag {
    pub items: Vec<(String, Option<String>)>,
}

impl FieldTag {
    pub fn from_field(field: &syn::Field) -> Result<Self> {
        let mut items = Vec::new();
        for attr in &field.attrs {
            if !attr.path().is_ident("orm") {
                continue;
            }
            let parsed: FieldAttr = attr.parse_args()?;
            for item in parsed.items {
                let key = item.key.unraw().to_string();
                items.push((key, item.value.map(|v| v.value())));
            }
        }
        Ok(FieldTag { items })
    }

    pub fn has(&self, key: &str) -> bool {
        self.items.iter().any(|(k, _)| k == key)
    }

    pub fn is_ignored(&self) -> bool {
        self.has("ignore")
    }

    /// The tag string stored in `FieldDef::tag`.
    pub fn render(&self) -> String {
        self.items
            .iter()
            .map(|(key, value)| match value {
                Some(v) => format!("{key}={v}"),
                None => key.clone(),
            })
            .collect::<Vec<_>>()
            .join(";")
    }
}
