// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Strategy selection.
//!
//! [`select`] validates a descriptor against the requested strategy and
//! produces a [`CodecPlan`] holding everything the emitter needs. All
//! configuration errors surface here, before any code is written.

use std::fmt;
use std::str::FromStr;

use proc_macro2::Ident;
use quote::format_ident;
use syn::ext::IdentExt;
use syn::Type;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::access::{self, AccessPlan};
use crate::descriptor::TypeDescriptor;
use crate::error::ConfigError;
use crate::instantiator::{self, type_dependency, ResolvedInstantiator};
use crate::kind::{classify, TypeKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StrategyTag {
    #[default]
    Instantiator,
    PublicFields,
    Polymorphic,
    Singleton,
}

impl StrategyTag {
    pub const ALL: [StrategyTag; 4] = [
        Self::Instantiator,
        Self::PublicFields,
        Self::Polymorphic,
        Self::Singleton,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Instantiator => "instantiator",
            Self::PublicFields => "public_fields",
            Self::Polymorphic => "polymorphic",
            Self::Singleton => "singleton",
        }
    }
}

impl fmt::Display for StrategyTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyTag {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownStrategy {
                value: s.to_string(),
            })
    }
}

/// A serialized value: how to read it from an instance and how to bind it
/// when decoding.
#[derive(Debug, Clone)]
pub struct WireField {
    /// Field or parameter name, for diagnostics.
    pub name: String,
    /// Local binding in generated code.
    pub binding: Ident,
    pub ty: Type,
    pub kind: TypeKind,
    pub access: AccessPlan,
}

#[derive(Debug, Clone)]
pub struct InstantiatorPlan {
    pub instantiator: ResolvedInstantiator,
    /// Serialized parameters, in instantiator parameter order.
    pub wire: Vec<WireField>,
    pub dependency: Option<Type>,
}

#[derive(Debug, Clone)]
pub struct PublicFieldsPlan {
    /// Public fields in declaration order, ancestors expanded in place of
    /// their embedding field.
    pub fields: Vec<WireField>,
    pub dependency: Option<Type>,
}

#[derive(Debug, Clone)]
pub struct PolymorphicPlan {
    pub dependency: Option<Type>,
}

#[derive(Debug, Clone)]
pub struct SingletonPlan {
    pub instance: syn::Path,
}

#[derive(Debug, Clone)]
pub enum CodecPlan {
    Instantiator(InstantiatorPlan),
    PublicFields(PublicFieldsPlan),
    Polymorphic(PolymorphicPlan),
    Singleton(SingletonPlan),
}

impl CodecPlan {
    pub fn strategy(&self) -> StrategyTag {
        match self {
            Self::Instantiator(_) => StrategyTag::Instantiator,
            Self::PublicFields(_) => StrategyTag::PublicFields,
            Self::Polymorphic(_) => StrategyTag::Polymorphic,
            Self::Singleton(_) => StrategyTag::Singleton,
        }
    }
}

/// Validate `desc` for `strategy` and plan its codec.
pub fn select(desc: &TypeDescriptor, strategy: StrategyTag) -> Result<CodecPlan, ConfigError> {
    match strategy {
        StrategyTag::Instantiator => plan_instantiator(desc).map(CodecPlan::Instantiator),
        StrategyTag::PublicFields => plan_public_fields(desc).map(CodecPlan::PublicFields),
        StrategyTag::Polymorphic => {
            if !desc.is_abstract {
                return Err(ConfigError::NotAbstract {
                    type_name: desc.display_name().to_string(),
                });
            }
            Ok(CodecPlan::Polymorphic(PolymorphicPlan {
                dependency: type_dependency(desc)?,
            }))
        }
        StrategyTag::Singleton => {
            if type_dependency(desc)?.is_some() {
                return Err(ConfigError::SingletonWithDependency {
                    type_name: desc.display_name().to_string(),
                });
            }
            let text = desc.singleton_instance.as_deref().unwrap_or("INSTANCE");
            let instance = syn::parse_str(text).map_err(|e: syn::Error| ConfigError::InvalidType {
                type_name: desc.display_name().to_string(),
                text: text.to_string(),
                reason: e.to_string(),
            })?;
            Ok(CodecPlan::Singleton(SingletonPlan { instance }))
        }
    }
}

fn plan_instantiator(desc: &TypeDescriptor) -> Result<InstantiatorPlan, ConfigError> {
    let instantiator = instantiator::resolve(desc)?;
    let mut wire = Vec::new();
    for param in instantiator.wire_params() {
        let name = param.name.to_string();
        let kind = kind_of(desc, &name, &param.ty)?;
        let access = access::plan(desc, &name, &kind)?;
        wire.push(WireField {
            binding: format_ident!("__{}", param.name.unraw()),
            name,
            ty: param.ty.clone(),
            kind,
            access,
        });
    }
    let dependency = match &instantiator.dependency {
        Some(ty) => Some(ty.clone()),
        None => type_dependency(desc)?,
    };
    log::debug!(
        "[autocodec-core] {}: instantiator {} with {} wire field(s)",
        desc.display_name(),
        instantiator.display_name(),
        wire.len()
    );
    Ok(InstantiatorPlan {
        instantiator,
        wire,
        dependency,
    })
}

fn plan_public_fields(desc: &TypeDescriptor) -> Result<PublicFieldsPlan, ConfigError> {
    let mut fields = Vec::new();
    collect_public(desc, desc, &mut Vec::new(), &mut fields)?;
    Ok(PublicFieldsPlan {
        fields,
        dependency: type_dependency(desc)?,
    })
}

fn collect_public(
    root: &TypeDescriptor,
    level: &TypeDescriptor,
    prefix: &mut Vec<Ident>,
    out: &mut Vec<WireField>,
) -> Result<(), ConfigError> {
    for field in &level.fields {
        if field.is_static || field.is_dependency {
            continue;
        }
        let ident: Ident = syn::parse_str(&field.name).map_err(|e: syn::Error| ConfigError::InvalidType {
            type_name: root.display_name().to_string(),
            text: field.name.clone(),
            reason: e.to_string(),
        })?;

        if let Some(link) = level.parent.as_ref().filter(|link| link.field == field.name) {
            if field.is_public() {
                prefix.push(ident);
                collect_public(root, &link.descriptor, prefix, out)?;
                prefix.pop();
            }
            continue;
        }
        if !field.is_public() {
            continue;
        }

        let ty = field.ty.parse(root.display_name())?;
        let kind = kind_of(root, &field.name, &ty)?;
        if kind.is_void() {
            continue;
        }
        let mut path = prefix.clone();
        path.push(ident);
        let flat: Vec<String> = path.iter().map(|i| i.unraw().to_string()).collect();
        out.push(WireField {
            name: flat.join("."),
            binding: format_ident!("__{}_{}", out.len(), flat.join("_")),
            ty,
            kind,
            access: AccessPlan::PublicField { path },
        });
    }
    Ok(())
}

fn kind_of(desc: &TypeDescriptor, field: &str, ty: &Type) -> Result<TypeKind, ConfigError> {
    classify(ty).map_err(|reason| ConfigError::UnsupportedFieldType {
        type_name: desc.display_name().to_string(),
        field: field.to_string(),
        ty: quote::quote!(#ty).to_string(),
        reason: reason.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{FieldDecl, InstantiatorDecl, ParamDecl};

    #[test]
    fn test_strategy_tags_parse() {
        for tag in StrategyTag::ALL {
            assert_eq!(tag.as_str().parse::<StrategyTag>().expect("parses"), tag);
        }
        assert_eq!(StrategyTag::default(), StrategyTag::Instantiator);
        assert!(matches!(
            "eager".parse::<StrategyTag>(),
            Err(ConfigError::UnknownStrategy { .. })
        ));
    }

    #[test]
    fn test_polymorphic_requires_abstract() {
        let concrete = TypeDescriptor::new("Circle");
        let err = select(&concrete, StrategyTag::Polymorphic).unwrap_err();
        assert!(err.to_string().contains("is not abstract"));
        let shape = TypeDescriptor::new("Shape").abstract_type();
        assert!(matches!(
            select(&shape, StrategyTag::Polymorphic),
            Ok(CodecPlan::Polymorphic(_))
        ));
    }

    #[test]
    fn test_singleton_rejects_dependency() {
        let desc = TypeDescriptor::new("Root").with_dependency("Registry");
        assert!(matches!(
            select(&desc, StrategyTag::Singleton),
            Err(ConfigError::SingletonWithDependency { .. })
        ));
    }

    #[test]
    fn test_singleton_default_instance() {
        let desc = TypeDescriptor::new("Root");
        let Ok(CodecPlan::Singleton(plan)) = select(&desc, StrategyTag::Singleton) else {
            panic!("expected singleton plan");
        };
        assert!(plan.instance.is_ident("INSTANCE"));
    }

    #[test]
    fn test_public_fields_skip_private_static_and_void() {
        let desc = TypeDescriptor::new("Config").with_fields(vec![
            FieldDecl::public("name", "String"),
            FieldDecl::private("secret", "String"),
            FieldDecl::public("VERSION", "u32").with_static(),
            FieldDecl::public("marker", "PhantomData<u8>"),
            FieldDecl::public("enabled", "bool"),
        ]);
        let Ok(CodecPlan::PublicFields(plan)) = select(&desc, StrategyTag::PublicFields) else {
            panic!("expected public fields plan");
        };
        let names: Vec<&str> = plan.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["name", "enabled"]);
    }

    #[test]
    fn test_public_fields_expand_parent_in_place() {
        let parent = TypeDescriptor::new("Base").with_fields(vec![FieldDecl::public("id", "u32")]);
        let desc = TypeDescriptor::new("Child")
            .with_fields(vec![
                FieldDecl::public("label", "String"),
                FieldDecl::public("base", "Base"),
                FieldDecl::public("size", "i32"),
            ])
            .with_parent("base", parent);
        let Ok(CodecPlan::PublicFields(plan)) = select(&desc, StrategyTag::PublicFields) else {
            panic!("expected public fields plan");
        };
        let names: Vec<&str> = plan.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["label", "base.id", "size"]);
    }

    #[test]
    fn test_unsupported_field_type() {
        let desc = TypeDescriptor::new("Holder").with_fields(vec![FieldDecl::public("name", "&'static str")]);
        let err = select(&desc, StrategyTag::Instantiator).unwrap_err();
        let ConfigError::UnsupportedFieldType { field, .. } = &err else {
            panic!("expected UnsupportedFieldType, got {err}");
        };
        assert_eq!(field, "name");
    }

    #[test]
    fn test_wire_order_follows_parameters() {
        let fields = vec![
            FieldDecl::private("a", "i32"),
            FieldDecl::private("b", "bool"),
            FieldDecl::private("c", "String"),
        ];
        let mut reversed = fields.clone();
        reversed.reverse();
        let ctor = InstantiatorDecl::new("new").with_params(vec![
            ParamDecl::new("c"),
            ParamDecl::new("a"),
            ParamDecl::new("b"),
        ]);

        for fields in [fields, reversed] {
            let desc = TypeDescriptor::new("Triple")
                .with_fields(fields)
                .with_constructor(ctor.clone());
            let Ok(CodecPlan::Instantiator(plan)) = select(&desc, StrategyTag::Instantiator) else {
                panic!("expected instantiator plan");
            };
            let names: Vec<&str> = plan.wire.iter().map(|f| f.name.as_str()).collect();
            assert_eq!(names, ["c", "a", "b"]);
        }
    }

    #[test]
    fn test_dependency_never_on_wire() {
        let desc = TypeDescriptor::new("Link")
            .with_fields(vec![FieldDecl::private("target", "u64")])
            .with_constructor(InstantiatorDecl::new("new").with_params(vec![
                ParamDecl::dependency("resolver", "Resolver"),
                ParamDecl::new("target"),
            ]));
        let Ok(CodecPlan::Instantiator(plan)) = select(&desc, StrategyTag::Instantiator) else {
            panic!("expected instantiator plan");
        };
        assert_eq!(plan.wire.len(), 1);
        assert!(plan.dependency.is_some());
    }
}
