// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! PUBLIC_FIELDS emission: decode into `Default::default()` and assign
//! every public field, ancestors included.

use proc_macro2::TokenStream;
use quote::quote;

use super::{CodecParts, CodecState, Generator};
use crate::access::AccessPlan;
use crate::marshaller::MarshallerDispatch;
use crate::strategy::PublicFieldsPlan;

pub(super) fn emit<M: MarshallerDispatch>(
    generator: &Generator<M>,
    ty: &syn::Path,
    plan: &PublicFieldsPlan,
) -> CodecParts {
    let mut serialize = TokenStream::new();
    let mut decode = TokenStream::new();
    let mut assign = TokenStream::new();

    for field in &plan.fields {
        let AccessPlan::PublicField { path } = &field.access else {
            continue;
        };
        let binding = &field.binding;
        let field_ty = &field.ty;
        serialize.extend(quote! {
            let #binding: &#field_ty = &value.#(#path).*;
        });
        serialize.extend(generator.write_value(&field.kind, field_ty, binding));
        decode.extend(generator.read_value(&field.kind, field_ty, binding));
        assign.extend(quote! {
            __instance.#(#path).* = #binding;
        });
    }

    let deserialize = quote! {
        #decode
        #[allow(unused_mut)]
        let mut __instance: #ty = ::core::default::Default::default();
        #assign
        ::core::result::Result::Ok(__instance)
    };

    let dependency = plan.dependency.clone();
    CodecParts {
        encoded: quote!(#ty),
        marshal_self: dependency.is_none(),
        dependency,
        state: CodecState::Stateless,
        serialize_body: serialize,
        deserialize_body: deserialize,
    }
}

#[cfg(test)]
mod tests {
    use crate::descriptor::{FieldDecl, TypeDescriptor};
    use crate::emit::Generator;
    use crate::strategy::StrategyTag;

    #[test]
    fn test_default_then_assign() {
        let base = TypeDescriptor::new("Header").with_fields(vec![FieldDecl::public("seq", "u32")]);
        let desc = TypeDescriptor::new("Packet")
            .with_fields(vec![
                FieldDecl::public("header", "Header"),
                FieldDecl::public("payload", "Vec<u8>"),
                FieldDecl::private("cached_len", "usize"),
            ])
            .with_parent("header", base);
        let codec = Generator::new()
            .generate(&desc, StrategyTag::PublicFields)
            .expect("generates");
        let de = codec.deserialize_body.to_string();
        assert!(de.contains("let mut __instance : Packet = :: core :: default :: Default :: default ()"));
        assert!(de.contains("__instance . header . seq = __0_header_seq"));
        assert!(de.contains("__instance . payload = __1_payload"));
        assert!(!de.contains("cached_len"));

        let ser = codec.serialize_body.to_string();
        assert!(ser.contains("& value . header . seq"));
    }

    #[test]
    fn test_no_public_fields() {
        let desc = TypeDescriptor::new("Opaque").with_fields(vec![FieldDecl::private("inner", "u64")]);
        let codec = Generator::new()
            .generate(&desc, StrategyTag::PublicFields)
            .expect("generates");
        assert!(codec.serialize_body.is_empty());
        assert!(codec.tokens.to_string().contains("Marshal for Opaque"));
    }
}
