use proc_macro::TokenStream as TokenStream1;
use proc_macro2::Span;
use quote::quote;
use syn::{parse::Error, spanned::Spanned};

// @Task support generics and named single-field structs

#[proc_macro_derive(Index)]
pub fn derive_index(input: TokenStream1) -> TokenStream1 {
    let input = syn::parse_macro_input!(input as syn::ItemStruct);

    if !input.generics.params.is_empty() {
        return report(input.generics.params.span(), "parameters not supported");
    }

    let ident = input.ident;
    let fields_span = input.fields.span();

    const SHAPE: &str = "index types must have exactly one unnamed field";

    let ty = match input.fields {
        syn::Fields::Unnamed(fields) if fields.unnamed.len() == 1 => {
            match fields.unnamed.into_iter().next() {
                Some(field) => field.ty,
                None => return report(fields_span, SHAPE),
            }
        }
        _ => return report(fields_span, SHAPE),
    };

    let stream = quote! {
        impl ::index_map::Index for #ident {
            fn new(index: usize) -> Self {
                match <#ty as ::core::convert::TryFrom<usize>>::try_from(index) {
                    ::core::result::Result::Ok(index) => Self(index),
                    ::core::result::Result::Err(_) => ::core::panic!(
                        "index {index} does not fit into ‘{}’",
                        ::core::stringify!(#ident),
                    ),
                }
            }

            fn value(self) -> usize {
                self.0 as usize
            }
        }
    };

    stream.into()
}

fn report(span: Span, message: impl std::fmt::Display) -> TokenStream1 {
    Error::new(span, message).into_compile_error().into()
}
