//! Derive macro for `envstruct::EnvStruct`.
//!
//! ```rust,ignore
//! #[derive(Default, EnvStruct)]
//! struct Config {
//!     #[env(name = "PORT", default = "8080")]
//!     port: u16,
//!
//!     #[env(name = "TOKEN", required)]
//!     token: String,
//!
//!     #[env(name = "HOSTS", separator = ";")]
//!     hosts: Vec<String>,
//!
//!     #[env(name = "ADDR", default = "${HOST}:${PORT}", expand)]
//!     addr: String,
//!
//!     #[env(name = "COLOR", custom)]
//!     color: Rgb,
//!
//!     #[env(nested)]
//!     database: Database,
//!
//!     // no attribute: never touched
//!     cache: Vec<u8>,
//! }
//! ```

mod attr;

use attr::{FieldAttrs, FieldKind};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::spanned::Spanned;
use syn::{
    parse_macro_input, Data, DeriveInput, Fields, GenericArgument, Ident, PathArguments, Type,
};

#[proc_macro_derive(EnvStruct, attributes(env))]
pub fn derive_env_struct(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: DeriveInput) -> syn::Result<TokenStream2> {
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(syn::Error::new(
                    input.ident.span(),
                    "EnvStruct requires a struct with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new(
                input.ident.span(),
                "EnvStruct can only be derived for structs",
            ))
        }
    };

    let mut visits = Vec::new();
    let mut inspects = Vec::new();

    for field in fields {
        let Some(ident) = &field.ident else { continue };
        let Some(kind) = FieldKind::from_attrs(&field.attrs, field.span())? else {
            continue;
        };
        let label = ident.unraw().to_string();

        match kind {
            FieldKind::Nested => {
                visits.push(quote! {
                    if let ::core::option::Option::Some(inner) =
                        ::envstruct::NestedStruct::as_env_struct_mut(&mut self.#ident)
                    {
                        visitor.nested(#label, inner);
                    }
                });
                inspects.push(quote! {
                    if let ::core::option::Option::Some(inner) =
                        ::envstruct::NestedStruct::as_env_struct(&self.#ident)
                    {
                        inspector.nested(#label, inner);
                    }
                });
            }
            FieldKind::Mapped(attrs) => {
                let meta = field_meta(&label, &attrs);
                let slot = slot_ctor(ident, &field.ty, &attrs);
                visits.push(quote! {
                    {
                        const META: ::envstruct::FieldMeta = #meta;
                        visitor.field(&META, #slot);
                    }
                });
                inspects.push(quote! {
                    {
                        const META: ::envstruct::FieldMeta = #meta;
                        inspector.field(&META, ::envstruct::type_label_of(&self.#ident));
                    }
                });
            }
        }
    }

    let name = &input.ident;
    let struct_label = name.unraw().to_string();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        #[automatically_derived]
        impl #impl_generics ::envstruct::EnvStruct for #name #ty_generics #where_clause {
            fn struct_name(&self) -> &'static str {
                #struct_label
            }

            #[allow(unused_variables)]
            fn visit_fields(&mut self, visitor: &mut dyn ::envstruct::FieldVisitor) {
                #(#visits)*
            }

            #[allow(unused_variables)]
            fn inspect_fields(&self, inspector: &mut dyn ::envstruct::FieldInspector) {
                #(#inspects)*
            }
        }
    })
}

fn field_meta(label: &str, attrs: &FieldAttrs) -> TokenStream2 {
    let env = &attrs.name;
    let mut meta = quote! { ::envstruct::FieldMeta::new(#label, #env) };

    if let Some(default) = &attrs.default {
        meta = quote! { #meta.with_default(#default) };
    }
    if let Some(required) = &attrs.required {
        meta = quote! { #meta.with_required(#required) };
    }
    if let Some(separator) = &attrs.separator {
        meta = quote! { #meta.with_separator(#separator) };
    }
    if let Some(expand) = &attrs.expand {
        meta = quote! { #meta.with_expand(#expand) };
    }
    meta
}

fn slot_ctor(ident: &Ident, ty: &Type, attrs: &FieldAttrs) -> TokenStream2 {
    if !attrs.custom {
        quote! { ::envstruct::Slot::new(&mut self.#ident) }
    } else if is_vec(ty) {
        quote! { ::envstruct::Slot::custom_slice(&mut self.#ident) }
    } else {
        quote! { ::envstruct::Slot::custom(&mut self.#ident) }
    }
}

/// `Vec<T>`, or `Vec<T>` behind any number of `Option`s
fn is_vec(ty: &Type) -> bool {
    let Type::Path(path) = ty else { return false };
    let Some(last) = path.path.segments.last() else {
        return false;
    };
    if last.ident == "Vec" {
        return true;
    }
    if last.ident != "Option" {
        return false;
    }
    match &last.arguments {
        PathArguments::AngleBracketed(args) => args.args.iter().any(|arg| match arg {
            GenericArgument::Type(inner) => is_vec(inner),
            _ => false,
        }),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn test_is_vec_sees_through_option() {
        assert!(is_vec(&parse_quote!(Vec<Rgb>)));
        assert!(is_vec(&parse_quote!(std::vec::Vec<u8>)));
        assert!(is_vec(&parse_quote!(Option<Vec<Rgb>>)));
        assert!(is_vec(&parse_quote!(Option<Option<Vec<Rgb>>>)));
        assert!(!is_vec(&parse_quote!(Option<Rgb>)));
        assert!(!is_vec(&parse_quote!(Rgb)));
        assert!(!is_vec(&parse_quote!((Vec<u8>, u8))));
    }
}
