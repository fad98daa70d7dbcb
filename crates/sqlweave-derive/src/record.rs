//! Record derive macro implementation

use crate::attrs::FieldTag;
use proc_macro2::{Literal, TokenStream};
use quote::quote;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, Result};

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let name_str = name.to_string();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Record can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Record can only be derived for structs",
            ));
        }
    };

    let mut defs = Vec::new();
    let mut getters = Vec::new();
    let mut setters = Vec::new();

    for (index, field) in fields.iter().enumerate() {
        let ident = field
            .ident
            .as_ref()
            .ok_or_else(|| syn::Error::new_spanned(field, "expected a named field"))?;
        let ty = &field.ty;
        let tag = FieldTag::from_field(field)?;
        let field_name = ident.unraw().to_string();
        let raw_tag = tag.render();
        let idx = Literal::usize_unsuffixed(index);

        let type_ref = if tag.is_ignored() || tag.has("type") {
            quote! { ::sqlweave::TypeRef::opaque::<#ty>() }
        } else {
            quote! { ::sqlweave::TypeRef::of::<#ty>() }
        };
        defs.push(quote! {
            ::sqlweave::FieldDef::new(#field_name, #raw_tag, #type_ref)
        });

        if tag.is_ignored() {
            continue;
        }
        getters.push(quote! {
            #idx => ::std::option::Option::Some(
                ::sqlweave::Value::from(::std::clone::Clone::clone(&self.#ident))
            ),
        });
        setters.push(quote! {
            #idx => {
                self.#ident = <#ty as ::sqlweave::FromValue>::from_value(value)?;
            }
        });
    }

    Ok(quote! {
        impl #impl_generics ::sqlweave::Record for #name #ty_generics #where_clause {
            fn record_name() -> &'static str {
                #name_str
            }

            fn fields() -> ::std::vec::Vec<::sqlweave::FieldDef> {
                ::std::vec![#(#defs),*]
            }

            fn field_value(&self, index: usize) -> ::std::option::Option<::sqlweave::Value> {
                match index {
                    #(#getters)*
                    _ => ::std::option::Option::None,
                }
            }

            #[allow(unused_variables)]
            fn set_field_value(
                &mut self,
                index: usize,
                value: ::sqlweave::Value,
            ) -> ::std::result::Result<(), ::sqlweave::ValueError> {
                match index {
                    #(#setters)*
                    _ => {}
                }
                ::std::result::Result::Ok(())
            }
        }
    })
}
