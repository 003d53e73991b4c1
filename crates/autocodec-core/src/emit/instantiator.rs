// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! INSTANTIATOR emission: serialize reads each wire parameter through its
//! access plan; deserialize decodes them in the same order and calls the
//! resolved instantiator.

use proc_macro2::TokenStream;
use quote::quote;

use super::{offset_slot_ident, CodecParts, CodecState, Generator, OffsetSlot};
use crate::access::AccessPlan;
use crate::instantiator::InstantiatorCall;
use crate::marshaller::MarshallerDispatch;
use crate::strategy::InstantiatorPlan;

pub(super) fn emit<M: MarshallerDispatch>(
    generator: &Generator<M>,
    ty: &syn::Path,
    plan: &InstantiatorPlan,
) -> CodecParts {
    let rt = generator.runtime();
    let mut slots = Vec::new();
    let mut serialize = TokenStream::new();
    let mut deserialize = TokenStream::new();

    for field in &plan.wire {
        let binding = &field.binding;
        let field_ty = &field.ty;
        let read = match &field.access {
            AccessPlan::Getter { method } => quote! {
                let #binding = value.#method();
                let #binding: &#field_ty = ::core::borrow::Borrow::borrow(&#binding);
            },
            AccessPlan::PublicField { path } => quote! {
                let #binding: &#field_ty = &value.#(#path).*;
            },
            AccessPlan::RawOffset {
                declaring_type,
                path,
                field_ty: declared_ty,
            } => {
                let slot = offset_slot_ident(binding);
                let read = quote! {
                    let #binding: &#declared_ty = self.#slot.get(value);
                };
                slots.push(OffsetSlot {
                    ident: slot,
                    field_ty: declared_ty.clone(),
                    path: path.clone(),
                    declaring_type: declaring_type.clone(),
                    field: field.name.clone(),
                });
                read
            }
        };
        serialize.extend(read);
        serialize.extend(generator.write_value(&field.kind, field_ty, binding));
        deserialize.extend(generator.read_value(&field.kind, field_ty, binding));
    }

    let instantiator = &plan.instantiator;
    let has_dependency_param = instantiator.dependency.is_some();
    if has_dependency_param {
        deserialize.extend(quote! {
            let __dependency = dependency.ok_or_else(|| {
                #rt::SerializationError::missing_dependency(#rt::ObjectCodec::encoded_type_name(self))
            })?;
        });
    }

    let mut wire = plan.wire.iter();
    let args: Vec<TokenStream> = instantiator
        .params
        .iter()
        .map(|param| {
            if param.is_dependency {
                quote!(::core::clone::Clone::clone(__dependency))
            } else {
                // wire and non-dependency params are built in lockstep
                let binding = wire.next().map(|f| &f.binding);
                quote!(#binding)
            }
        })
        .collect();

    let call = match &instantiator.call {
        InstantiatorCall::StructLiteral => {
            let names = instantiator.params.iter().map(|p| &p.name);
            quote!(#ty { #(#names: #args),* })
        }
        InstantiatorCall::Associated(name) => quote!(<#ty>::#name(#(#args),*)),
    };
    deserialize.extend(match &instantiator.failure {
        None => quote!(::core::result::Result::Ok(#call)),
        Some(_) => quote! {
            #call.map_err(|cause| {
                #rt::SerializationError::instantiator(#rt::ObjectCodec::encoded_type_name(self), cause)
            })
        },
    });

    let dependency = plan.dependency.clone();
    CodecParts {
        encoded: quote!(#ty),
        marshal_self: dependency.is_none(),
        dependency,
        state: if slots.is_empty() {
            CodecState::Stateless
        } else {
            CodecState::Offsets(slots)
        },
        serialize_body: serialize,
        deserialize_body: deserialize,
    }
}
