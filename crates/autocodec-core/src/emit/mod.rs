// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Code emission.
//!
//! Every strategy produces a serialize body, a deserialize body and the
//! state its codec struct carries; [`Generator::generate`] wraps them into
//! one codec unit:
//!
//! ```text
//! struct <Name>Codec { .. }                // per-strategy state
//! impl <Name>Codec { fn new(..) -> Self }
//! impl ObjectCodec for <Name>Codec { .. }
//! impl Marshal for <Name> { .. }           // plain types only
//! ```

mod instantiator;
mod polymorphic;
mod public_fields;
mod singleton;

use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};
use syn::Type;

use crate::descriptor::TypeDescriptor;
use crate::error::ConfigError;
use crate::kind::TypeKind;
use crate::marshaller::{MarshallerDispatch, TraitMarshallers};
use crate::strategy::{self, CodecPlan, StrategyTag};

/// Output of one generation.
#[derive(Debug, Clone)]
pub struct GeneratedCodec {
    pub type_name: String,
    pub strategy: StrategyTag,
    pub codec_ident: Ident,
    pub serialize_body: TokenStream,
    pub deserialize_body: TokenStream,
    /// The complete codec unit.
    pub tokens: TokenStream,
}

/// One raw-offset slot held by a codec.
struct OffsetSlot {
    ident: Ident,
    field_ty: Type,
    path: Vec<Ident>,
    declaring_type: String,
    field: String,
}

enum CodecState {
    Stateless,
    Offsets(Vec<OffsetSlot>),
    Registry,
}

struct CodecParts {
    encoded: TokenStream,
    dependency: Option<Type>,
    state: CodecState,
    serialize_body: TokenStream,
    deserialize_body: TokenStream,
    marshal_self: bool,
}

/// Codec generator over a marshaller dispatch.
pub struct Generator<M = TraitMarshallers> {
    runtime: syn::Path,
    marshallers: M,
}

impl Generator<TraitMarshallers> {
    /// Generator targeting the `::autocodec` runtime.
    pub fn new() -> Self {
        let runtime: syn::Path = syn::parse_quote!(::autocodec);
        Self {
            marshallers: TraitMarshallers::new(runtime.clone()),
            runtime,
        }
    }

    /// Generator targeting the runtime crate at `path`, e.g. `crate::codec`.
    pub fn for_runtime(path: &str) -> Result<Self, ConfigError> {
        let runtime: syn::Path = syn::parse_str(path).map_err(|e| ConfigError::InvalidType {
            type_name: "runtime".to_string(),
            text: path.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            marshallers: TraitMarshallers::new(runtime.clone()),
            runtime,
        })
    }
}

impl Default for Generator<TraitMarshallers> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: MarshallerDispatch> Generator<M> {
    pub fn with_marshallers(runtime: syn::Path, marshallers: M) -> Self {
        Self {
            runtime,
            marshallers,
        }
    }

    pub fn runtime(&self) -> &syn::Path {
        &self.runtime
    }

    /// Select, validate and emit the codec of `desc` for `strategy`.
    ///
    /// # Errors
    ///
    /// Any [`ConfigError`] raised while planning; nothing is emitted then.
    pub fn generate(
        &self,
        desc: &TypeDescriptor,
        strategy: StrategyTag,
    ) -> Result<GeneratedCodec, ConfigError> {
        let ty = desc.type_path()?;
        let plan = strategy::select(desc, strategy)?;
        let parts = match &plan {
            CodecPlan::Instantiator(plan) => instantiator::emit(self, &ty, plan),
            CodecPlan::PublicFields(plan) => public_fields::emit(self, &ty, plan),
            CodecPlan::Polymorphic(plan) => polymorphic::emit(self, &ty, plan),
            CodecPlan::Singleton(plan) => singleton::emit(&ty, plan),
        };
        let codec_ident = parse_ident(desc, &desc.codec_name())?;
        let tokens = self.assemble(desc, &ty, &codec_ident, plan.strategy(), &parts)?;

        log::debug!(
            "[autocodec-core] generated {} for {} ({} strategy)",
            codec_ident,
            desc.display_name(),
            plan.strategy()
        );
        Ok(GeneratedCodec {
            type_name: desc.display_name().to_string(),
            strategy: plan.strategy(),
            codec_ident,
            serialize_body: parts.serialize_body,
            deserialize_body: parts.deserialize_body,
            tokens,
        })
    }

    fn assemble(
        &self,
        desc: &TypeDescriptor,
        ty: &syn::Path,
        codec: &Ident,
        strategy: StrategyTag,
        parts: &CodecParts,
    ) -> Result<TokenStream, ConfigError> {
        let rt = &self.runtime;
        let vis: syn::Visibility =
            syn::parse_str(&desc.visibility).map_err(|e: syn::Error| ConfigError::InvalidType {
                type_name: desc.display_name().to_string(),
                text: desc.visibility.clone(),
                reason: e.to_string(),
            })?;
        let doc = format!("Codec for `{}` ({} strategy).", desc.name, strategy);
        let encoded = &parts.encoded;
        let dependency = match &parts.dependency {
            Some(ty) => quote!(#ty),
            None => quote!(#rt::NoDependency),
        };
        let type_name = match &desc.qualified_name {
            Some(name) => quote!(#name),
            None => {
                let name = &desc.name;
                quote!(::core::concat!(::core::module_path!(), "::", #name))
            }
        };
        let serialize_body = &parts.serialize_body;
        let deserialize_body = &parts.deserialize_body;

        let definition = match &parts.state {
            CodecState::Stateless => quote! {
                #[doc = #doc]
                #[derive(Debug, Clone, Copy, Default)]
                #vis struct #codec;

                impl #codec {
                    pub const fn new() -> Self {
                        Self
                    }
                }
            },
            CodecState::Offsets(slots) => {
                let fields = slots.iter().map(|slot| {
                    let ident = &slot.ident;
                    let field_ty = &slot.field_ty;
                    quote!(#ident: #rt::FieldOffset<#ty, #field_ty>)
                });
                let inits = slots.iter().map(|slot| {
                    let ident = &slot.ident;
                    let field_ty = &slot.field_ty;
                    let path = &slot.path;
                    let declaring = &slot.declaring_type;
                    let field = &slot.field;
                    quote! {
                        #ident: match unsafe {
                            #rt::FieldOffset::<#ty, #field_ty>::new(
                                ::core::mem::offset_of!(#ty, #(#path).*),
                                #declaring,
                                #field,
                            )
                        } {
                            ::core::result::Result::Ok(offset) => offset,
                            ::core::result::Result::Err(_) => ::core::panic!(::core::concat!(
                                "invalid offset for field ",
                                #declaring,
                                "::",
                                #field,
                            )),
                        }
                    }
                });
                // Raw pointers never deref-coerce, so this only type-checks
                // when the declared type is the field's real type.
                let witnesses = slots.iter().map(|slot| {
                    let field_ty = &slot.field_ty;
                    let path = &slot.path;
                    quote! {
                        {
                            #[allow(dead_code)]
                            fn __declared_field_type(value: &#ty) -> *const #field_ty {
                                ::core::ptr::addr_of!(value.#(#path).*)
                            }
                        }
                    }
                });
                quote! {
                    #[doc = #doc]
                    #[derive(Debug, Clone, Copy)]
                    #vis struct #codec {
                        #(#fields,)*
                    }

                    impl #codec {
                        /// # Panics
                        ///
                        /// Panics if a field offset fails validation.
                        pub const fn new() -> Self {
                            #(#witnesses)*
                            Self {
                                #(#inits,)*
                            }
                        }
                    }

                    impl ::core::default::Default for #codec {
                        fn default() -> Self {
                            Self::new()
                        }
                    }
                }
            }
            CodecState::Registry => quote! {
                #[doc = #doc]
                #[derive(Debug, Clone)]
                #vis struct #codec {
                    registry: ::std::sync::Arc<#rt::CodecRegistry>,
                }

                impl #codec {
                    pub fn new(registry: ::std::sync::Arc<#rt::CodecRegistry>) -> Self {
                        Self { registry }
                    }

                    pub fn registry(&self) -> &::std::sync::Arc<#rt::CodecRegistry> {
                        &self.registry
                    }
                }
            },
        };

        let marshal = if parts.marshal_self {
            quote! {
                impl #rt::Marshal for #ty {
                    fn encode(&self, writer: &mut #rt::CodecWriter) -> #rt::Result<()> {
                        const CODEC: #codec = #codec::new();
                        #rt::ObjectCodec::serialize(&CODEC, self, ::core::option::Option::None, writer)
                    }

                    fn decode(reader: &mut #rt::CodecReader<'_>) -> #rt::Result<Self> {
                        const CODEC: #codec = #codec::new();
                        #rt::ObjectCodec::deserialize(&CODEC, reader, ::core::option::Option::None)
                    }
                }
            }
        } else {
            TokenStream::new()
        };

        Ok(quote! {
            #definition

            impl #rt::ObjectCodec for #codec {
                type Encoded = #encoded;
                type Dependency = #dependency;

                fn encoded_type_name(&self) -> &'static str {
                    #type_name
                }

                #[allow(unused_variables)]
                fn serialize(
                    &self,
                    value: &#encoded,
                    dependency: ::core::option::Option<&#dependency>,
                    writer: &mut #rt::CodecWriter,
                ) -> #rt::Result<()> {
                    #serialize_body
                    ::core::result::Result::Ok(())
                }

                #[allow(unused_variables)]
                fn deserialize(
                    &self,
                    reader: &mut #rt::CodecReader<'_>,
                    dependency: ::core::option::Option<&#dependency>,
                ) -> #rt::Result<#encoded> {
                    #deserialize_body
                }
            }

            #marshal
        })
    }

    /// Statements writing the value `binding` refers to.
    fn write_value(&self, kind: &TypeKind, ty: &Type, binding: &Ident) -> TokenStream {
        match kind {
            TypeKind::Bool => quote!(writer.write_bool(*#binding);),
            TypeKind::Int32 => quote!(writer.write_i32(*#binding);),
            _ => match kind.primitive_array() {
                Some((TypeKind::Bool, _)) => quote! {
                    for __element in #binding.iter() {
                        writer.write_bool(*__element);
                    }
                },
                Some(_) => quote! {
                    for __element in #binding.iter() {
                        writer.write_i32(*__element);
                    }
                },
                None => self.marshallers.emit_encode(ty, &quote!(#binding)),
            },
        }
    }

    /// Statements binding `binding: ty` to the next value on the wire.
    fn read_value(&self, kind: &TypeKind, ty: &Type, binding: &Ident) -> TokenStream {
        match kind {
            TypeKind::Bool => quote!(let #binding: bool = reader.read_bool()?;),
            TypeKind::Int32 => quote!(let #binding: i32 = reader.read_i32()?;),
            _ => match kind.primitive_array() {
                Some((TypeKind::Bool, len)) => quote! {
                    let mut #binding: #ty = [false; #len];
                    for __slot in #binding.iter_mut() {
                        *__slot = reader.read_bool()?;
                    }
                },
                Some((_, len)) => quote! {
                    let mut #binding: #ty = [0i32; #len];
                    for __slot in #binding.iter_mut() {
                        *__slot = reader.read_i32()?;
                    }
                },
                None => self.marshallers.emit_decode(ty, binding),
            },
        }
    }
}

fn parse_ident(desc: &TypeDescriptor, name: &str) -> Result<Ident, ConfigError> {
    syn::parse_str(name).map_err(|e: syn::Error| ConfigError::InvalidType {
        type_name: desc.display_name().to_string(),
        text: name.to_string(),
        reason: e.to_string(),
    })
}

fn offset_slot_ident(binding: &Ident) -> Ident {
    format_ident!("{}_offset", binding.to_string().trim_start_matches('_'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{FieldDecl, InstantiatorDecl, ParamDecl};

    fn render(desc: &TypeDescriptor, strategy: StrategyTag) -> GeneratedCodec {
        Generator::new().generate(desc, strategy).expect("generates")
    }

    #[test]
    fn test_codec_name_and_identity() {
        let desc = TypeDescriptor::new("Point")
            .with_fields(vec![FieldDecl::public("x", "i32"), FieldDecl::public("y", "i32")]);
        let codec = render(&desc, StrategyTag::Instantiator);
        assert_eq!(codec.codec_ident, "PointCodec");
        let text = codec.tokens.to_string();
        assert!(text.contains("module_path !"));
        assert!(text.contains("impl :: autocodec :: Marshal for Point"));

        let named = render(
            &desc.clone().with_qualified_name("geo::Point"),
            StrategyTag::Instantiator,
        );
        assert!(named.tokens.to_string().contains("\"geo::Point\""));
    }

    #[test]
    fn test_primitives_written_inline() {
        let desc = TypeDescriptor::new("Flags").with_fields(vec![
            FieldDecl::public("on", "bool"),
            FieldDecl::public("level", "i32"),
            FieldDecl::public("mask", "[bool; 3]"),
            FieldDecl::public("name", "String"),
        ]);
        let codec = render(&desc, StrategyTag::Instantiator);
        let ser = codec.serialize_body.to_string();
        assert!(ser.contains("writer . write_bool (* __on)"));
        assert!(ser.contains("writer . write_i32 (* __level)"));
        assert!(ser.contains("for __element in __mask . iter ()"));
        assert!(ser.contains("< String as :: autocodec :: Marshal > :: encode (__name , writer)"));

        let de = codec.deserialize_body.to_string();
        assert!(de.contains("reader . read_bool () ?"));
        assert!(de.contains("[false ; 3]"));
    }

    #[test]
    fn test_deterministic_output() {
        let desc = TypeDescriptor::new("Pair")
            .with_fields(vec![FieldDecl::private("a", "u8"), FieldDecl::private("b", "String")])
            .with_constructor(
                InstantiatorDecl::new("new").with_params(vec![ParamDecl::new("b"), ParamDecl::new("a")]),
            );
        let first = render(&desc, StrategyTag::Instantiator).tokens.to_string();
        let second = render(&desc, StrategyTag::Instantiator).tokens.to_string();
        assert_eq!(first, second);

        let mut permuted = desc.clone();
        permuted.fields.reverse();
        let third = render(&permuted, StrategyTag::Instantiator);
        assert_eq!(
            render(&desc, StrategyTag::Instantiator).serialize_body.to_string(),
            third.serialize_body.to_string()
        );
    }

    #[test]
    fn test_offset_codec_is_const_and_type_checked() {
        let desc = TypeDescriptor::new("Pair")
            .with_fields(vec![FieldDecl::private("a", "u8"), FieldDecl::private("b", "String")])
            .with_constructor(
                InstantiatorDecl::new("new").with_params(vec![ParamDecl::new("a"), ParamDecl::new("b")]),
            );
        let text = render(&desc, StrategyTag::Instantiator).tokens.to_string();
        assert!(text.contains("pub const fn new () -> Self"));
        assert!(text.contains(
            "fn __declared_field_type (value : & Pair) -> * const String { :: core :: ptr :: addr_of ! (value . b) }"
        ));
        assert!(text.contains("fn __declared_field_type (value : & Pair) -> * const u8"));
        assert!(text.contains("\"invalid offset for field \" , \"Pair\" , \"::\" , \"b\""));
        assert!(text.contains("const CODEC : PairCodec = PairCodec :: new () ;"));
        assert!(!text.contains("serialize (& PairCodec :: new ()"));
    }

    #[test]
    fn test_custom_marshallers() {
        struct Tagged;
        impl MarshallerDispatch for Tagged {
            fn emit_encode(&self, _ty: &Type, value: &TokenStream) -> TokenStream {
                quote!(custom_encode(#value, writer)?;)
            }
            fn emit_decode(&self, ty: &Type, binding: &Ident) -> TokenStream {
                quote!(let #binding: #ty = custom_decode(reader)?;)
            }
        }

        let generator = Generator::with_marshallers(syn::parse_quote!(::autocodec), Tagged);
        let desc = TypeDescriptor::new("Note").with_fields(vec![FieldDecl::public("text", "String")]);
        let codec = generator
            .generate(&desc, StrategyTag::PublicFields)
            .expect("generates");
        assert!(codec.serialize_body.to_string().contains("custom_encode"));
        assert!(codec.deserialize_body.to_string().contains("custom_decode"));
    }

    #[test]
    fn test_errors_emit_nothing() {
        let desc = TypeDescriptor::new("Point");
        assert!(Generator::new()
            .generate(&desc, StrategyTag::Polymorphic)
            .is_err());
    }
}
