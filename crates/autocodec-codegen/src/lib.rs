// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

extern crate proc_macro;

use autocodec_core::{
    ConfigError, FieldDecl, Generator, InstantiatorDecl, MethodDecl, ParamDecl, ParentLink,
    StrategyTag, TypeDescriptor, TypeRef, Visibility,
};
use proc_macro::TokenStream;
use quote::quote;
use syn::meta::ParseNestedMeta;
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{
    parenthesized, parse_macro_input, Data, DeriveInput, Fields, Ident, ItemTrait, LitStr, Token,
    Type, TypeParamBound,
};

/// `#[derive(AutoCodec)]`: generates `<Name>Codec` implementing
/// `autocodec::ObjectCodec`.
///
/// Container attributes (`#[autocodec(...)]`):
/// - `strategy = "instantiator" | "public_fields" | "singleton"` (default
///   `instantiator`)
/// - `dependency = "Type"`: type-level dependency
/// - `codec = "Name"`, `name = "qualified::Name"`
/// - `instance = "PATH"`: canonical static for singletons (default
///   `INSTANCE`)
/// - `accessors = "field, is_flag, get_other"`: read fields through these
///   zero-argument methods
/// - `constructor(name = "new", params(a, b: u32, dependency(ctx: Ctx)),
///   returns = "Result<Self, E>", instantiator)`; repeatable
/// - `factory(...)`: same keys, implicitly an instantiator
///
/// Field attributes:
/// - `#[autocodec(dependency)]`: filled from the dependency when the struct
///   literal is the instantiator
/// - `#[autocodec(parent(pub id: u32, name: String))]`: the field embeds the
///   base type, whose fields are listed
///
/// Set `AUTOCODEC_PRINT_GENERATED=1` to print the generated code to stderr.
///
/// Example:
/// ```ignore
/// use autocodec::AutoCodec;
///
/// #[derive(AutoCodec)]
/// #[autocodec(constructor(name = "new", params(width, height)))]
/// pub struct Frame {
///     width: u32,
///     height: u32,
/// }
///
/// impl Frame {
///     pub fn new(width: u32, height: u32) -> Self {
///         Self { width, height }
///     }
/// }
/// ```
#[proc_macro_derive(AutoCodec, attributes(autocodec))]
pub fn derive_auto_codec(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand_derive(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// `#[polymorphic]` on a trait: makes `dyn Trait` an abstract base whose
/// codec (`<Trait>Codec`) dispatches through an `autocodec::CodecRegistry`.
///
/// Adds `autocodec::AsAny` as a supertrait. Accepts `codec = "Name"`,
/// `name = "qualified::Name"` and `dependency = "Type"`.
///
/// Example:
/// ```ignore
/// #[autocodec::polymorphic]
/// pub trait Shape {
///     fn area(&self) -> f64;
/// }
///
/// let codec = ShapeCodec::new(registry);
/// ```
#[proc_macro_attribute]
pub fn polymorphic(args: TokenStream, item: TokenStream) -> TokenStream {
    let mut item_trait = parse_macro_input!(item as ItemTrait);
    let mut desc = TypeDescriptor::new(item_trait.ident.to_string()).abstract_type();
    let vis = &item_trait.vis;
    desc.visibility = quote!(#vis).to_string();

    let parser = syn::meta::parser(|meta| {
        if meta.path.is_ident("codec") {
            desc.codec_name = Some(string_value(&meta)?);
        } else if meta.path.is_ident("name") {
            desc.qualified_name = Some(string_value(&meta)?);
        } else if meta.path.is_ident("dependency") {
            desc.dependency = Some(TypeRef::new(string_value(&meta)?));
        } else {
            return Err(meta.error("expected `codec`, `name` or `dependency`"));
        }
        Ok(())
    });
    parse_macro_input!(args with parser);

    if !item_trait.generics.params.is_empty() {
        return syn::Error::new_spanned(&item_trait.generics, "generic traits are not supported")
            .to_compile_error()
            .into();
    }

    let has_as_any = item_trait.supertraits.iter().any(|bound| {
        matches!(bound, TypeParamBound::Trait(t) if t.path.segments.last().is_some_and(|s| s.ident == "AsAny"))
    });
    if !has_as_any {
        if item_trait.colon_token.is_none() {
            item_trait.colon_token = Some(<Token![:]>::default());
        }
        item_trait
            .supertraits
            .push(syn::parse_quote!(::autocodec::AsAny));
    }

    let codec = match Generator::new().generate(&desc, StrategyTag::Polymorphic) {
        Ok(codec) => codec,
        Err(err) => return config_error(&item_trait.ident, &err).to_compile_error().into(),
    };
    print_if_requested(&desc.name, &codec.tokens);
    let codec_tokens = codec.tokens;
    quote!(#item_trait #codec_tokens).into()
}

fn expand_derive(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "generic types are not supported",
        ));
    }

    let fields: Vec<&syn::Field> = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => named.named.iter().collect(),
            Fields::Unit => Vec::new(),
            Fields::Unnamed(_) => {
                return Err(syn::Error::new_spanned(
                    input,
                    "only named fields are supported",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "only structs are supported; use #[polymorphic] on a trait for abstract types",
            ))
        }
    };

    let mut desc = TypeDescriptor::new(input.ident.to_string());
    let vis = &input.vis;
    desc.visibility = quote!(#vis).to_string();
    let mut strategy = StrategyTag::default();
    for attr in input.attrs.iter().filter(|a| a.path().is_ident("autocodec")) {
        attr.parse_nested_meta(|meta| parse_container(&meta, &mut desc, &mut strategy))?;
    }

    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            return Err(syn::Error::new_spanned(field, "field must have a name"));
        };
        let mut decl = FieldDecl {
            name: ident.to_string(),
            ty: type_ref(&field.ty),
            visibility: visibility(&field.vis),
            is_static: false,
            is_dependency: false,
        };
        for attr in field.attrs.iter().filter(|a| a.path().is_ident("autocodec")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("dependency") {
                    decl.is_dependency = true;
                    Ok(())
                } else if meta.path.is_ident("parent") {
                    if let Some(existing) = &desc.parent {
                        return Err(meta.error(format!(
                            "only one parent field is supported; `{}` is already the parent",
                            existing.field
                        )));
                    }
                    desc.parent = Some(ParentLink {
                        field: ident.to_string(),
                        descriptor: Box::new(parse_parent(&meta, &field.ty)?),
                    });
                    Ok(())
                } else {
                    Err(meta.error("expected `dependency` or `parent(...)`"))
                }
            })?;
        }
        desc.fields.push(decl);
    }

    let codec = Generator::new()
        .generate(&desc, strategy)
        .map_err(|err| config_error(&input.ident, &err))?;
    print_if_requested(&desc.name, &codec.tokens);
    Ok(codec.tokens)
}

fn parse_container(
    meta: &ParseNestedMeta<'_>,
    desc: &mut TypeDescriptor,
    strategy: &mut StrategyTag,
) -> syn::Result<()> {
    let Some(key) = meta.path.get_ident().map(ToString::to_string) else {
        return Err(meta.error("expected an autocodec attribute key"));
    };
    match key.as_str() {
        "strategy" => {
            let lit: LitStr = meta.value()?.parse()?;
            *strategy = lit
                .value()
                .parse()
                .map_err(|err: ConfigError| syn::Error::new(lit.span(), err))?;
        }
        "dependency" => desc.dependency = Some(TypeRef::new(string_value(meta)?)),
        "codec" => desc.codec_name = Some(string_value(meta)?),
        "name" => desc.qualified_name = Some(string_value(meta)?),
        "instance" => desc.singleton_instance = Some(string_value(meta)?),
        "accessors" => {
            desc.accessor_convention = true;
            desc.methods.extend(
                string_value(meta)?
                    .split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(MethodDecl::accessor),
            );
        }
        "constructor" => desc.constructors.push(parse_instantiator(meta)?),
        "factory" => desc.factories.push(parse_instantiator(meta)?),
        _ => {
            return Err(meta.error(
                "unknown key; expected strategy, dependency, codec, name, instance, accessors, constructor or factory",
            ))
        }
    }
    Ok(())
}

fn parse_instantiator(meta: &ParseNestedMeta<'_>) -> syn::Result<InstantiatorDecl> {
    let mut decl = InstantiatorDecl::new(String::new());
    meta.parse_nested_meta(|inner| {
        if inner.path.is_ident("name") {
            decl.name = string_value(&inner)?;
        } else if inner.path.is_ident("returns") {
            decl.returns = Some(TypeRef::new(string_value(&inner)?));
        } else if inner.path.is_ident("instantiator") {
            decl.marked = true;
        } else if inner.path.is_ident("receiver") {
            decl.is_static = false;
        } else if inner.path.is_ident("params") {
            inner.parse_nested_meta(|param| {
                decl.params.push(parse_param(&param)?);
                Ok(())
            })?;
        } else {
            return Err(inner.error("expected name, params, returns, instantiator or receiver"));
        }
        Ok(())
    })?;
    if decl.name.is_empty() {
        return Err(meta.error("missing `name = \"...\"`"));
    }
    Ok(decl)
}

/// `a`, `a: Type` or `dependency(a: Type)`.
fn parse_param(meta: &ParseNestedMeta<'_>) -> syn::Result<ParamDecl> {
    if meta.path.is_ident("dependency") && meta.input.peek(syn::token::Paren) {
        let content;
        parenthesized!(content in meta.input);
        let name: Ident = content.parse()?;
        content.parse::<Token![:]>()?;
        let ty: Type = content.parse()?;
        return Ok(ParamDecl::dependency(name.to_string(), type_ref(&ty)));
    }
    let name = meta.path.require_ident()?.to_string();
    if meta.input.peek(Token![:]) {
        meta.input.parse::<Token![:]>()?;
        let ty: Type = meta.input.parse()?;
        return Ok(ParamDecl::typed(name, type_ref(&ty)));
    }
    Ok(ParamDecl::new(name))
}

/// One `vis name: Type` entry of `parent(...)`.
struct ParentField {
    vis: syn::Visibility,
    name: Ident,
    ty: Type,
}

impl Parse for ParentField {
    fn parse(input: ParseStream<'_>) -> syn::Result<Self> {
        let vis = input.parse()?;
        let name = input.parse()?;
        input.parse::<Token![:]>()?;
        let ty = input.parse()?;
        Ok(Self { vis, name, ty })
    }
}

fn parse_parent(meta: &ParseNestedMeta<'_>, field_ty: &Type) -> syn::Result<TypeDescriptor> {
    let Type::Path(path) = field_ty else {
        return Err(meta.error("a parent field must name a struct type"));
    };
    let Some(last) = path.path.segments.last() else {
        return Err(meta.error("a parent field must name a struct type"));
    };
    let content;
    parenthesized!(content in meta.input);
    let entries = Punctuated::<ParentField, Token![,]>::parse_terminated(&content)?;
    let fields = entries
        .into_iter()
        .map(|entry| FieldDecl {
            name: entry.name.to_string(),
            ty: type_ref(&entry.ty),
            visibility: visibility(&entry.vis),
            is_static: false,
            is_dependency: false,
        })
        .collect();
    Ok(TypeDescriptor::new(last.ident.to_string()).with_fields(fields))
}

fn string_value(meta: &ParseNestedMeta<'_>) -> syn::Result<String> {
    let lit: LitStr = meta.value()?.parse()?;
    Ok(lit.value())
}

fn type_ref(ty: &Type) -> TypeRef {
    TypeRef::new(quote!(#ty).to_string())
}

fn visibility(vis: &syn::Visibility) -> Visibility {
    match vis {
        syn::Visibility::Public(_) => Visibility::Public,
        _ => Visibility::Restricted,
    }
}

fn config_error(ident: &Ident, err: &ConfigError) -> syn::Error {
    syn::Error::new_spanned(ident, err.to_string())
}

fn print_if_requested(name: &str, tokens: &proc_macro2::TokenStream) {
    let enabled = std::env::var_os("AUTOCODEC_PRINT_GENERATED")
        .is_some_and(|value| !value.is_empty() && value != "0");
    if enabled {
        eprintln!("// autocodec: generated code for {}\n{}", name, tokens);
    }
}
