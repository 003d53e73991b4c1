// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Instantiator resolution.
//!
//! Picks the single constructor or factory an INSTANTIATOR codec calls on
//! deserialization, and derives its dependency parameter and failure type.
//!
//! Rules, in order:
//! 1. More than one marked instantiator (marked constructors plus all
//!    factories) is an error.
//! 2. Exactly one marked instantiator wins. Every factory is validated
//!    before marks are counted.
//! 3. Otherwise the sole constructor is used. No declared constructor means
//!    the struct literal over every non-static field.
//! 4. More than one unmarked constructor is an error.

use proc_macro2::Ident;
use syn::{GenericArgument, PathArguments, Type};

use crate::access::find_field;
use crate::descriptor::{InstantiatorDecl, ParamDecl, TypeDescriptor, TypeRef};
use crate::error::ConfigError;
use crate::kind::{classify, TypeKind};

/// How the generated code invokes the instantiator.
#[derive(Debug, Clone)]
pub enum InstantiatorCall {
    /// `Type { field: value, .. }`
    StructLiteral,
    /// `<Type>::name(args..)`
    Associated(Ident),
}

#[derive(Debug, Clone)]
pub struct ResolvedParam {
    pub name: Ident,
    pub ty: Type,
    pub is_dependency: bool,
}

#[derive(Debug, Clone)]
pub struct ResolvedInstantiator {
    pub call: InstantiatorCall,
    /// All parameters in declaration order, dependency included.
    pub params: Vec<ResolvedParam>,
    /// `E` when the instantiator returns `Result<Self, E>`.
    pub failure: Option<Type>,
    /// Type of the dependency parameter, if one is marked.
    pub dependency: Option<Type>,
}

impl ResolvedInstantiator {
    pub fn display_name(&self) -> String {
        match &self.call {
            InstantiatorCall::StructLiteral => "struct literal".to_string(),
            InstantiatorCall::Associated(name) => name.to_string(),
        }
    }

    /// Parameters that travel on the wire.
    pub fn wire_params(&self) -> impl Iterator<Item = &ResolvedParam> {
        self.params.iter().filter(|p| !p.is_dependency)
    }
}

/// Resolve the instantiator of `desc`.
pub fn resolve(desc: &TypeDescriptor) -> Result<ResolvedInstantiator, ConfigError> {
    let type_name = desc.display_name();

    for factory in &desc.factories {
        validate_factory(desc, factory)?;
    }

    let marked: Vec<&InstantiatorDecl> = desc
        .constructors
        .iter()
        .filter(|c| c.marked)
        .chain(&desc.factories)
        .collect();

    let resolved = match marked.as_slice() {
        [decl] => resolve_associated(desc, decl)?,
        [] => match desc.constructors.as_slice() {
            [] => resolve_struct_literal(desc)?,
            [constructor] => resolve_associated(desc, constructor)?,
            _ => {
                return Err(ConfigError::MultipleConstructors {
                    type_name: type_name.to_string(),
                })
            }
        },
        _ => {
            return Err(ConfigError::MultipleInstantiators {
                type_name: type_name.to_string(),
                names: marked.iter().map(|decl| decl.name.clone()).collect(),
            })
        }
    };

    if resolved.dependency.is_some() && type_dependency(desc)?.is_some() {
        return Err(ConfigError::ConflictingDependency {
            type_name: type_name.to_string(),
        });
    }
    Ok(resolved)
}

/// A factory takes no receiver and returns the type, possibly in a `Result`.
fn validate_factory(desc: &TypeDescriptor, factory: &InstantiatorDecl) -> Result<(), ConfigError> {
    if !factory.is_static {
        return Err(ConfigError::InvalidFactory {
            type_name: desc.display_name().to_string(),
            factory: factory.name.clone(),
            reason: "it takes a receiver".to_string(),
        });
    }
    if let Some(returns) = &factory.returns {
        failure_type(desc, factory, returns)?;
    }
    Ok(())
}

/// Type-level dependency, with `()` treated as absent.
pub fn type_dependency(desc: &TypeDescriptor) -> Result<Option<Type>, ConfigError> {
    let Some(dep) = &desc.dependency else {
        return Ok(None);
    };
    let ty = dep.parse(desc.display_name())?;
    match classify(&ty) {
        Ok(TypeKind::Void) => Ok(None),
        _ => Ok(Some(ty)),
    }
}

fn resolve_struct_literal(desc: &TypeDescriptor) -> Result<ResolvedInstantiator, ConfigError> {
    let params: Vec<ParamDecl> = desc
        .fields
        .iter()
        .filter(|f| !f.is_static)
        .map(|f| ParamDecl {
            name: f.name.clone(),
            ty: Some(f.ty.clone()),
            is_dependency: f.is_dependency,
        })
        .collect();
    finish(desc, "struct literal", &params, InstantiatorCall::StructLiteral, None)
}

fn resolve_associated(
    desc: &TypeDescriptor,
    decl: &InstantiatorDecl,
) -> Result<ResolvedInstantiator, ConfigError> {
    let name = parse_ident(desc, &decl.name)?;
    let failure = match &decl.returns {
        None => None,
        Some(returns) => failure_type(desc, decl, returns)?,
    };
    finish(
        desc,
        &decl.name,
        &decl.params,
        InstantiatorCall::Associated(name),
        failure,
    )
}

fn finish(
    desc: &TypeDescriptor,
    instantiator: &str,
    params: &[ParamDecl],
    call: InstantiatorCall,
    failure: Option<Type>,
) -> Result<ResolvedInstantiator, ConfigError> {
    let type_name = desc.display_name();
    if params.iter().filter(|p| p.is_dependency).count() > 1 {
        return Err(ConfigError::MultipleDependencyParameters {
            type_name: type_name.to_string(),
            instantiator: instantiator.to_string(),
        });
    }

    let mut resolved = Vec::with_capacity(params.len());
    let mut dependency = None;
    for param in params {
        let ty = match &param.ty {
            Some(ty) => ty.parse(type_name)?,
            None => find_field(desc, &param.name)
                .ok_or_else(|| ConfigError::FieldNotFound {
                    type_name: type_name.to_string(),
                    field: param.name.clone(),
                })?
                .field
                .ty
                .parse(type_name)?,
        };
        if param.is_dependency {
            dependency = Some(ty.clone());
        }
        resolved.push(ResolvedParam {
            name: parse_ident(desc, &param.name)?,
            ty,
            is_dependency: param.is_dependency,
        });
    }

    Ok(ResolvedInstantiator {
        call,
        params: resolved,
        failure,
        dependency,
    })
}

/// `Self`/the type itself gives no failure, `Result<Self, E>` gives `E`.
fn failure_type(
    desc: &TypeDescriptor,
    decl: &InstantiatorDecl,
    returns: &TypeRef,
) -> Result<Option<Type>, ConfigError> {
    let ty = returns.parse(desc.display_name())?;
    if names_self(desc, &ty) {
        return Ok(None);
    }
    if let Type::Path(path) = &ty {
        if let Some(last) = path.path.segments.last() {
            if last.ident == "Result" {
                if let PathArguments::AngleBracketed(args) = &last.arguments {
                    let types: Vec<&Type> = args
                        .args
                        .iter()
                        .filter_map(|arg| match arg {
                            GenericArgument::Type(ty) => Some(ty),
                            _ => None,
                        })
                        .collect();
                    if let [ok, err] = types.as_slice() {
                        if names_self(desc, ok) {
                            return Ok(Some((*err).clone()));
                        }
                    }
                }
            }
        }
    }
    Err(ConfigError::InvalidFactory {
        type_name: desc.display_name().to_string(),
        factory: decl.name.clone(),
        reason: format!("it returns {}, which is not assignable to the type", returns),
    })
}

fn names_self(desc: &TypeDescriptor, ty: &Type) -> bool {
    let Type::Path(path) = ty else {
        return false;
    };
    if path.qself.is_some() {
        return false;
    }
    match path.path.segments.last() {
        Some(last) => {
            last.arguments.is_empty() && (last.ident == "Self" || last.ident == desc.name.as_str())
        }
        None => false,
    }
}

fn parse_ident(desc: &TypeDescriptor, name: &str) -> Result<Ident, ConfigError> {
    syn::parse_str(name).map_err(|e: syn::Error| ConfigError::InvalidType {
        type_name: desc.display_name().to_string(),
        text: name.to_string(),
        reason: e.to_string(),
    })
}
