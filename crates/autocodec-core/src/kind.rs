// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Field type classification.
//!
//! `bool` and `i32` (and fixed-length arrays of them) are written inline by
//! the generated code; everything else is delegated to the marshaller
//! dispatch. Types with no owned, sized value are rejected.

use syn::{Expr, Type};

#[derive(Debug, Clone)]
pub enum TypeKind {
    Bool,
    Int32,
    /// `[T; N]`. Only arrays of `Bool` or `Int32` take the inline path.
    Array { element: Box<TypeKind>, len: Expr },
    /// `()` or `PhantomData<_>`: no data.
    Void,
    /// Any other named type, tuple or array of such.
    Declared,
}

impl TypeKind {
    pub fn is_void(&self) -> bool {
        matches!(self, Self::Void)
    }

    /// Primitive element kind, if this is an inline-able array.
    pub fn primitive_array(&self) -> Option<(&TypeKind, &Expr)> {
        match self {
            Self::Array { element, len } if matches!(**element, Self::Bool | Self::Int32) => {
                Some((element, len))
            }
            _ => None,
        }
    }
}

/// Classify `ty`, or return a short reason it cannot be serialized.
pub fn classify(ty: &Type) -> Result<TypeKind, &'static str> {
    match ty {
        Type::Path(type_path) if type_path.qself.is_none() => {
            let Some(segment) = type_path.path.segments.last() else {
                return Ok(TypeKind::Declared);
            };
            let bare = type_path.path.segments.len() == 1 && segment.arguments.is_empty();
            match segment.ident.to_string().as_str() {
                "bool" if bare => Ok(TypeKind::Bool),
                "i32" if bare => Ok(TypeKind::Int32),
                "PhantomData" => Ok(TypeKind::Void),
                _ => Ok(TypeKind::Declared),
            }
        }
        Type::Path(_) => Ok(TypeKind::Declared),
        Type::Tuple(tuple) if tuple.elems.is_empty() => Ok(TypeKind::Void),
        Type::Tuple(tuple) => {
            for elem in &tuple.elems {
                classify(elem)?;
            }
            Ok(TypeKind::Declared)
        }
        Type::Array(array) => Ok(TypeKind::Array {
            element: Box::new(classify(&array.elem)?),
            len: array.len.clone(),
        }),
        Type::Paren(inner) => classify(&inner.elem),
        Type::Group(inner) => classify(&inner.elem),
        Type::Reference(_) => Err("borrowed references cannot be decoded into an owned value"),
        Type::Ptr(_) => Err("raw pointers have no serialized form"),
        Type::BareFn(_) => Err("function pointers have no serialized form"),
        Type::Slice(_) => Err("unsized slices cannot be stored by value"),
        Type::TraitObject(_) => Err("bare trait objects are unsized; box them and use the polymorphic strategy"),
        Type::ImplTrait(_) => Err("impl Trait is not a nameable field type"),
        Type::Never(_) => Err("the never type has no values"),
        Type::Infer(_) => Err("inferred types cannot appear in a codec"),
        _ => Err("type form is not supported"),
    }
}
