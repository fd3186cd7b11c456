//! `#[derive(Knit)]` implementation.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Data, DeriveInput, Expr, Field, Fields, LitStr, parse_macro_input};

/// Parsed `#[knit(...)]` options for one field.
#[derive(Default)]
struct FieldArgs {
    rename: Option<String>,
    default: Option<Expr>,
    sticky: bool,
}

impl FieldArgs {
    fn from_field(field: &Field) -> syn::Result<Self> {
        let mut args = FieldArgs::default();
        for attr in &field.attrs {
            if !attr.path().is_ident("knit") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    let lit: LitStr = meta.value()?.parse()?;
                    args.rename = Some(lit.value());
                    Ok(())
                } else if meta.path.is_ident("default") {
                    args.default = Some(meta.value()?.parse()?);
                    Ok(())
                } else if meta.path.is_ident("sticky") {
                    args.sticky = true;
                    Ok(())
                } else {
                    Err(meta.error("unknown knit attribute, expected `rename`, `default` or `sticky`"))
                }
            })?;
        }
        Ok(args)
    }
}

pub fn derive_knit_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            other => {
                return Err(syn::Error::new_spanned(
                    other,
                    "Knit can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Knit can only be derived for structs",
            ));
        }
    };

    let mut inits = Vec::with_capacity(fields.len());
    for field in fields {
        let args = FieldArgs::from_field(field)?;
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let ty = &field.ty;
        let key = args.rename.unwrap_or_else(|| ident.to_string());
        let fallback = match &args.default {
            Some(expr) => quote! { (#expr) },
            None => quote! { ::core::default::Default::default() },
        };

        let init = if args.sticky {
            quote! {
                #ident: match object.get(#key).and_then(<#ty as ::purl::Coerce>::coerce) {
                    ::core::option::Option::Some(value) => value,
                    ::core::option::Option::None => match previous {
                        ::core::option::Option::Some(previous) => ::core::clone::Clone::clone(&previous.#ident),
                        ::core::option::Option::None => #fallback,
                    },
                }
            }
        } else {
            quote! {
                #ident: ::purl::knit::field_or::<#ty>(object, #key, || #fallback)
            }
        };
        inits.push(init);
    }

    Ok(quote! {
        impl #impl_generics ::purl::Knit for #name #ty_generics #where_clause {
            #[allow(unused_variables)]
            fn knit(
                previous: ::core::option::Option<&Self>,
                payload: &::purl::Payload,
            ) -> ::core::result::Result<Self, ::purl::KnitError> {
                let object = ::purl::knit::expect_object(payload)?;
                ::core::result::Result::Ok(Self {
                    #(#inits,)*
                })
            }
        }

        impl #impl_generics ::purl::Coerce for #name #ty_generics #where_clause {
            fn coerce(value: &::purl::Payload) -> ::core::option::Option<Self> {
                <Self as ::purl::Knit>::knit(::core::option::Option::None, value).ok()
            }
        }
    })
}
