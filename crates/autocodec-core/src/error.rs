// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Generation-time errors.
//!
//! Every variant names the offending type, and where relevant the field,
//! instantiator or strategy, so the front end can report it against the
//! type's declaration.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// More than one constructor and none carries the instantiator marker.
    MultipleConstructors { type_name: String },
    /// More than one constructor or factory carries the instantiator marker.
    MultipleInstantiators { type_name: String, names: Vec<String> },
    /// A marked factory takes a receiver or does not return the type.
    InvalidFactory {
        type_name: String,
        factory: String,
        reason: String,
    },
    /// More than one instantiator parameter carries the dependency marker.
    MultipleDependencyParameters {
        type_name: String,
        instantiator: String,
    },
    /// Both a dependency parameter and a type-level dependency are present.
    ConflictingDependency { type_name: String },
    /// POLYMORPHIC selected for a concrete type.
    NotAbstract { type_name: String },
    /// SINGLETON selected for a type declaring a dependency.
    SingletonWithDependency { type_name: String },
    /// Accessor convention in effect but no accessor for a parameter.
    MissingAccessor { type_name: String, field: String },
    /// No field in the type or its ancestors matches a parameter.
    FieldNotFound { type_name: String, field: String },
    /// A field type no codec can be written for.
    UnsupportedFieldType {
        type_name: String,
        field: String,
        ty: String,
        reason: String,
    },
    /// Type text in a descriptor failed to parse.
    InvalidType {
        type_name: String,
        text: String,
        reason: String,
    },
    UnknownStrategy { value: String },
}

impl ConfigError {
    /// The type the error is reported against, if any.
    pub fn type_name(&self) -> Option<&str> {
        match self {
            Self::MultipleConstructors { type_name }
            | Self::MultipleInstantiators { type_name, .. }
            | Self::InvalidFactory { type_name, .. }
            | Self::MultipleDependencyParameters { type_name, .. }
            | Self::ConflictingDependency { type_name }
            | Self::NotAbstract { type_name }
            | Self::SingletonWithDependency { type_name }
            | Self::MissingAccessor { type_name, .. }
            | Self::FieldNotFound { type_name, .. }
            | Self::UnsupportedFieldType { type_name, .. }
            | Self::InvalidType { type_name, .. } => Some(type_name),
            Self::UnknownStrategy { .. } => None,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MultipleConstructors { type_name } => write!(
                f,
                "{} has multiple constructors but none is marked as the instantiator",
                type_name
            ),
            Self::MultipleInstantiators { type_name, names } => write!(
                f,
                "{} has multiple instantiators marked: {}",
                type_name,
                names.join(", ")
            ),
            Self::InvalidFactory {
                type_name,
                factory,
                reason,
            } => write!(
                f,
                "{} marks {} as an instantiator, but it is not a valid factory: {}",
                type_name, factory, reason
            ),
            Self::MultipleDependencyParameters {
                type_name,
                instantiator,
            } => write!(
                f,
                "{}::{} has more than one dependency parameter",
                type_name, instantiator
            ),
            Self::ConflictingDependency { type_name } => write!(
                f,
                "{} has both a dependency parameter and a type-level dependency",
                type_name
            ),
            Self::NotAbstract { type_name } => write!(
                f,
                "{} is not abstract, but the polymorphic strategy was selected",
                type_name
            ),
            Self::SingletonWithDependency { type_name } => write!(
                f,
                "{} declares a dependency, but the singleton strategy was selected",
                type_name
            ),
            Self::MissingAccessor { type_name, field } => write!(
                f,
                "{}: no accessor found for parameter {}",
                type_name, field
            ),
            Self::FieldNotFound { type_name, field } => write!(
                f,
                "{}: no field with name matching {}",
                type_name, field
            ),
            Self::UnsupportedFieldType {
                type_name,
                field,
                ty,
                reason,
            } => write!(
                f,
                "{}: field {} has unsupported type {} ({})",
                type_name, field, ty, reason
            ),
            Self::InvalidType {
                type_name,
                text,
                reason,
            } => write!(f, "{}: cannot parse type `{}`: {}", type_name, text, reason),
            Self::UnknownStrategy { value } => write!(
                f,
                "unknown strategy '{}' (expected instantiator, public_fields, polymorphic or singleton)",
                value
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
