// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Marshaller dispatch: code for values that are not written inline.
//!
//! Emitted code runs inside the generated `serialize` / `deserialize`
//! bodies, where `writer: &mut CodecWriter` and `reader: &mut CodecReader`
//! are in scope and `?` converts into `SerializationError`.

use proc_macro2::{Ident, TokenStream};
use quote::quote;
use syn::Type;

pub trait MarshallerDispatch {
    /// Statements writing `value` (an expression of type `&ty`).
    fn emit_encode(&self, ty: &Type, value: &TokenStream) -> TokenStream;

    /// Statements binding `let binding: ty` to a value read from `reader`.
    fn emit_decode(&self, ty: &Type, binding: &Ident) -> TokenStream;
}

/// Default dispatch through the runtime's `Marshal` trait.
#[derive(Debug, Clone)]
pub struct TraitMarshallers {
    runtime: syn::Path,
}

impl TraitMarshallers {
    pub fn new(runtime: syn::Path) -> Self {
        Self { runtime }
    }
}

impl Default for TraitMarshallers {
    fn default() -> Self {
        Self::new(syn::parse_quote!(::autocodec))
    }
}

impl MarshallerDispatch for TraitMarshallers {
    fn emit_encode(&self, ty: &Type, value: &TokenStream) -> TokenStream {
        let rt = &self.runtime;
        quote! {
            <#ty as #rt::Marshal>::encode(#value, writer)?;
        }
    }

    fn emit_decode(&self, ty: &Type, binding: &Ident) -> TokenStream {
        let rt = &self.runtime;
        quote! {
            let #binding: #ty = <#ty as #rt::Marshal>::decode(reader)?;
        }
    }
}
