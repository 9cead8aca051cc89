//! Code generation for `#[derive(Record)]`.

use std::collections::HashSet;

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Error, Fields, Ident, Result, Type};

use crate::parse::{self, FieldAttrs};

// -----------------------------------------------------------------------------
// Field model

struct ActiveField {
    ident: Ident,
    ty: Type,
    attrs: FieldAttrs,
}

// -----------------------------------------------------------------------------
// Expansion

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let ident = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(Error::new_spanned(
            &input.generics,
            "`#[derive(Record)]` does not support generic types",
        ));
    }

    let Data::Struct(data) = &input.data else {
        return Err(Error::new_spanned(
            ident,
            "`#[derive(Record)]` only supports structs",
        ));
    };
    let Fields::Named(fields) = &data.fields else {
        return Err(Error::new_spanned(
            ident,
            "`#[derive(Record)]` only supports structs with named fields",
        ));
    };

    let container = parse::container_attrs(&input.attrs)?;
    let type_name = container.name.unwrap_or_else(|| ident.to_string());

    let mut active = Vec::new();
    for field in &fields.named {
        let attrs = parse::field_attrs(&field.attrs)?;
        if attrs.ignore {
            continue;
        }
        active.push(ActiveField {
            ident: field.ident.clone().unwrap(), // named fields always have idents
            ty: field.ty.clone(),
            attrs,
        });
    }

    validate_keys(&active)?;

    let record_impl = record_impl(ident, &active);
    let schematic_impl = schematic_impl(ident, &type_name, container.include_nulls, &active);
    let registration = registration(ident, container.auto_register);

    Ok(quote! {
        const _: () = {
            #record_impl
            #schematic_impl
            #registration
        };
    })
}

fn validate_keys(fields: &[ActiveField]) -> Result<()> {
    let mut seen = HashSet::new();
    for field in fields {
        let key = document_key(field);
        if key.starts_with('$') {
            return Err(Error::new(
                field.ident.span(),
                format!("document key `{key}` is reserved (`$`-prefixed keys carry identity markers)"),
            ));
        }
        if !seen.insert(key.clone()) {
            return Err(Error::new(
                field.ident.span(),
                format!("document key `{key}` is used by more than one field"),
            ));
        }
    }
    Ok(())
}

fn document_key(field: &ActiveField) -> String {
    field
        .attrs
        .alias
        .clone()
        .unwrap_or_else(|| field.ident.to_string())
}

fn record_impl(ident: &Ident, fields: &[ActiveField]) -> TokenStream {
    let get_arms = fields.iter().enumerate().map(|(index, field)| {
        let fid = &field.ident;
        let ty = &field.ty;
        quote! {
            #index => ::core::option::Option::Some(
                <#ty as ::gw_record::FieldType>::to_value(&self.#fid)
            ),
        }
    });

    let set_arms = fields.iter().enumerate().map(|(index, field)| {
        let fid = &field.ident;
        let ty = &field.ty;
        quote! {
            #index => {
                self.#fid = <#ty as ::gw_record::FieldType>::from_value(value)?;
                ::core::result::Result::Ok(())
            }
        }
    });

    quote! {
        impl ::gw_record::Record for #ident {
            #[inline]
            fn record_schema(&self) -> &'static ::gw_record::schema::RecordSchema {
                <Self as ::gw_record::Schematic>::schema()
            }

            fn get_at(&self, index: usize) -> ::core::option::Option<::gw_record::Value> {
                match index {
                    #(#get_arms)*
                    _ => ::core::option::Option::None,
                }
            }

            #[allow(unused_variables, reason = "records may have no fields")]
            fn set_at(
                &mut self,
                index: usize,
                value: ::gw_record::Value,
            ) -> ::core::result::Result<(), ::gw_record::ShapeError> {
                match index {
                    #(#set_arms)*
                    _ => ::core::result::Result::Err(
                        ::gw_record::ShapeError::NoSuchField { index }
                    ),
                }
            }
        }
    }
}

fn schematic_impl(
    ident: &Ident,
    type_name: &str,
    include_nulls: bool,
    fields: &[ActiveField],
) -> TokenStream {
    let field_ctors = fields.iter().enumerate().map(|(index, field)| {
        let name = field.ident.to_string();
        let ty = &field.ty;
        let mut ctor = quote! {
            ::gw_record::schema::FieldSchema::new::<#ty>(#name, #index)
        };
        if let Some(alias) = &field.attrs.alias {
            ctor = quote! { #ctor.with_key(#alias) };
        }
        if field.attrs.required {
            ctor = quote! { #ctor.required_on_decode() };
        }
        if field.attrs.order != 0 {
            let order = field.attrs.order;
            ctor = quote! { #ctor.with_order(#order) };
        }
        ctor
    });

    let include_nulls_setter = if include_nulls {
        TokenStream::new()
    } else {
        quote! { .with_include_nulls(false) }
    };

    quote! {
        impl ::gw_record::Schematic for #ident {
            fn schema() -> &'static ::gw_record::schema::RecordSchema {
                static CELL: ::std::sync::OnceLock<::gw_record::schema::RecordSchema> =
                    ::std::sync::OnceLock::new();
                CELL.get_or_init(|| {
                    ::gw_record::schema::RecordSchema::new::<#ident>(
                        #type_name,
                        ::std::vec![#(#field_ctors),*],
                    )
                    #include_nulls_setter
                })
            }
        }
    }
}

#[cfg(feature = "auto_register")]
fn registration(ident: &Ident, auto_register: bool) -> TokenStream {
    if !auto_register {
        return TokenStream::new();
    }
    quote! {
        ::gw_record::__macro_exports::inventory::submit! {
            ::gw_record::__macro_exports::auto_register::RegistryEntry::of::<#ident>()
        }
    }
}

#[cfg(not(feature = "auto_register"))]
fn registration(_ident: &Ident, _auto_register: bool) -> TokenStream {
    TokenStream::new()
}
