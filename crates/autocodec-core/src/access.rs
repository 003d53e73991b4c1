// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Field access planning.
//!
//! For every serialized instantiator parameter, decides how the generated
//! `serialize` reads the current value out of the instance:
//!
//! - types following the accessor convention: a zero-argument method named
//!   `field`, `is_field` (bool fields only) or `get_field`;
//! - otherwise the same-named field, searched through the type and then its
//!   embedded ancestors: directly when every hop is public, through a raw
//!   offset otherwise.

use proc_macro2::Ident;
use syn::Type;

use crate::descriptor::{FieldDecl, TypeDescriptor};
use crate::error::ConfigError;
use crate::kind::TypeKind;

#[derive(Debug, Clone)]
pub enum AccessPlan {
    /// `value.method()`
    Getter { method: Ident },
    /// `value.a.b`
    PublicField { path: Vec<Ident> },
    /// Read at the offset of `path` inside the instance.
    RawOffset {
        declaring_type: String,
        path: Vec<Ident>,
        field_ty: Type,
    },
}

/// A field located through the parent chain.
#[derive(Debug)]
pub struct FieldLookup<'a> {
    pub field: &'a FieldDecl,
    pub declaring: &'a TypeDescriptor,
    /// Field names from the instance down to the field, inclusive.
    pub path: Vec<&'a str>,
    /// Every hop, the field included, is public.
    pub public: bool,
}

/// Find the non-static field `name` in `desc` or its ancestors, nearest
/// declaration first.
pub fn find_field<'a>(desc: &'a TypeDescriptor, name: &str) -> Option<FieldLookup<'a>> {
    let mut level = desc;
    let mut path = Vec::new();
    let mut public = true;
    loop {
        if let Some(field) = level.fields.iter().find(|f| f.name == name && !f.is_static) {
            path.push(field.name.as_str());
            return Some(FieldLookup {
                field,
                declaring: level,
                path,
                public: public && field.is_public(),
            });
        }
        let link = level.parent.as_ref()?;
        public &= level
            .fields
            .iter()
            .any(|f| f.name == link.field && f.is_public());
        path.push(link.field.as_str());
        level = &link.descriptor;
    }
}

/// Plan how to read parameter `name` of kind `kind` from an instance.
pub fn plan(desc: &TypeDescriptor, name: &str, kind: &TypeKind) -> Result<AccessPlan, ConfigError> {
    if desc.accessor_convention {
        return plan_getter(desc, name, kind);
    }

    let lookup = find_field(desc, name).ok_or_else(|| ConfigError::FieldNotFound {
        type_name: desc.display_name().to_string(),
        field: name.to_string(),
    })?;
    let path = idents(desc, &lookup.path)?;
    if lookup.public {
        Ok(AccessPlan::PublicField { path })
    } else {
        log::debug!(
            "[autocodec-core] {}: raw offset access for {}",
            desc.display_name(),
            lookup.path.join(".")
        );
        Ok(AccessPlan::RawOffset {
            declaring_type: lookup.declaring.display_name().to_string(),
            path,
            field_ty: lookup.field.ty.parse(desc.display_name())?,
        })
    }
}

fn plan_getter(desc: &TypeDescriptor, name: &str, kind: &TypeKind) -> Result<AccessPlan, ConfigError> {
    let mut candidates = vec![name.to_string()];
    if matches!(kind, TypeKind::Bool) {
        candidates.push(format!("is_{}", name));
    } else {
        candidates.push(format!("get_{}", name));
    }

    let method = candidates
        .iter()
        .find(|candidate| {
            desc.methods
                .iter()
                .any(|m| m.arity == 0 && &m.name == *candidate)
        })
        .ok_or_else(|| ConfigError::MissingAccessor {
            type_name: desc.display_name().to_string(),
            field: name.to_string(),
        })?;
    Ok(AccessPlan::Getter {
        method: idents(desc, &[method.as_str()])?.remove(0),
    })
}

fn idents(desc: &TypeDescriptor, names: &[&str]) -> Result<Vec<Ident>, ConfigError> {
    names
        .iter()
        .map(|name| {
            syn::parse_str::<Ident>(name).map_err(|e| ConfigError::InvalidType {
                type_name: desc.display_name().to_string(),
                text: (*name).to_string(),
                reason: e.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::MethodDecl;

    fn base() -> TypeDescriptor {
        TypeDescriptor::new("Shape").with_fields(vec![
            FieldDecl::public("id", "u32"),
            FieldDecl::private("tag", "String"),
        ])
    }

    fn path_of(plan: &AccessPlan) -> Vec<String> {
        match plan {
            AccessPlan::PublicField { path } | AccessPlan::RawOffset { path, .. } => {
                path.iter().map(ToString::to_string).collect()
            }
            AccessPlan::Getter { method } => vec![method.to_string()],
        }
    }

    #[test]
    fn test_public_field_direct() {
        let plan = plan(&base(), "id", &TypeKind::Declared).expect("plans");
        assert!(matches!(plan, AccessPlan::PublicField { .. }));
    }

    #[test]
    fn test_private_field_raw_offset() {
        let plan = plan(&base(), "tag", &TypeKind::Declared).expect("plans");
        let AccessPlan::RawOffset { declaring_type, .. } = &plan else {
            panic!("expected raw offset");
        };
        assert_eq!(declaring_type, "Shape");
    }

    #[test]
    fn test_inherited_field_through_public_embedding() {
        let desc = TypeDescriptor::new("Circle")
            .with_fields(vec![
                FieldDecl::public("base", "Shape"),
                FieldDecl::public("radius", "i32"),
            ])
            .with_parent("base", base());

        let id = plan(&desc, "id", &TypeKind::Declared).expect("plans");
        assert!(matches!(id, AccessPlan::PublicField { .. }));
        assert_eq!(path_of(&id), ["base", "id"]);

        let tag = plan(&desc, "tag", &TypeKind::Declared).expect("plans");
        let AccessPlan::RawOffset { declaring_type, .. } = &tag else {
            panic!("expected raw offset");
        };
        assert_eq!(declaring_type, "Shape");
        assert_eq!(path_of(&tag), ["base", "tag"]);
    }

    #[test]
    fn test_private_embedding_forces_raw_offset() {
        let desc = TypeDescriptor::new("Circle")
            .with_fields(vec![FieldDecl::private("base", "Shape")])
            .with_parent("base", base());
        let id = plan(&desc, "id", &TypeKind::Declared).expect("plans");
        assert!(matches!(id, AccessPlan::RawOffset { .. }));
    }

    #[test]
    fn test_nearest_declaration_shadows_ancestor() {
        let desc = TypeDescriptor::new("Circle")
            .with_fields(vec![
                FieldDecl::public("base", "Shape"),
                FieldDecl::private("id", "u32"),
            ])
            .with_parent("base", base());
        let id = plan(&desc, "id", &TypeKind::Declared).expect("plans");
        assert_eq!(path_of(&id), ["id"]);
    }

    #[test]
    fn test_field_not_found() {
        let err = plan(&base(), "colour", &TypeKind::Declared).unwrap_err();
        assert!(err.to_string().contains("no field with name matching colour"));
    }

    #[test]
    fn test_accessor_names() {
        let desc = TypeDescriptor::new("Reading").with_accessors(&["celsius", "is_valid", "get_label"]);
        let celsius = plan(&desc, "celsius", &TypeKind::Int32).expect("plans");
        assert_eq!(path_of(&celsius), ["celsius"]);
        let valid = plan(&desc, "valid", &TypeKind::Bool).expect("plans");
        assert_eq!(path_of(&valid), ["is_valid"]);
        let label = plan(&desc, "label", &TypeKind::Declared).expect("plans");
        assert_eq!(path_of(&label), ["get_label"]);
    }

    #[test]
    fn test_is_prefix_only_for_bool() {
        let desc = TypeDescriptor::new("Reading").with_accessors(&["is_count"]);
        assert!(matches!(
            plan(&desc, "count", &TypeKind::Int32),
            Err(ConfigError::MissingAccessor { .. })
        ));
    }

    #[test]
    fn test_accessor_must_take_no_arguments() {
        let mut desc = TypeDescriptor::new("Reading").with_accessors(&[]);
        desc.methods.push(MethodDecl {
            name: "celsius".into(),
            arity: 1,
        });
        let err = plan(&desc, "celsius", &TypeKind::Int32).unwrap_err();
        assert!(err.to_string().contains("no accessor found for parameter celsius"));
    }
}
