// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type descriptor: the read-only structural snapshot a codec is generated
//! from.
//!
//! Populated by the `#[derive(AutoCodec)]` front end from `syn` input, or
//! deserialized from descriptor files (feature `serde`). The generator never
//! looks at anything else.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Rust type written as source text (e.g. `"Vec<u8>"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TypeRef(String);

impl TypeRef {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse the text into a `syn::Type`, naming `owner` on failure.
    pub fn parse(&self, owner: &str) -> Result<syn::Type, ConfigError> {
        syn::parse_str(&self.0).map_err(|e| ConfigError::InvalidType {
            type_name: owner.to_string(),
            text: self.0.clone(),
            reason: e.to_string(),
        })
    }
}

impl From<&str> for TypeRef {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for TypeRef {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl std::fmt::Display for TypeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Visibility {
    Public,
    /// Private or `pub(...)`-restricted.
    #[default]
    Restricted,
}

/// One declared field of a type.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FieldDecl {
    pub name: String,
    pub ty: TypeRef,
    #[cfg_attr(feature = "serde", serde(default))]
    pub visibility: Visibility,
    /// Static members reported by the host; never serialized.
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_static: bool,
    /// Injected dependency when the implicit struct literal is the
    /// instantiator.
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_dependency: bool,
}

impl FieldDecl {
    pub fn public(name: impl Into<String>, ty: impl Into<TypeRef>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            visibility: Visibility::Public,
            is_static: false,
            is_dependency: false,
        }
    }

    pub fn private(name: impl Into<String>, ty: impl Into<TypeRef>) -> Self {
        Self {
            visibility: Visibility::Restricted,
            ..Self::public(name, ty)
        }
    }

    #[must_use]
    pub fn dependency(mut self) -> Self {
        self.is_dependency = true;
        self
    }

    #[must_use]
    pub fn with_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }
}

/// One parameter of a constructor or factory.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParamDecl {
    pub name: String,
    /// Defaults to the type of the same-named field.
    #[cfg_attr(feature = "serde", serde(default))]
    pub ty: Option<TypeRef>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_dependency: bool,
}

impl ParamDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: None,
            is_dependency: false,
        }
    }

    pub fn typed(name: impl Into<String>, ty: impl Into<TypeRef>) -> Self {
        Self {
            ty: Some(ty.into()),
            ..Self::new(name)
        }
    }

    /// A parameter carrying the dependency marker.
    pub fn dependency(name: impl Into<String>, ty: impl Into<TypeRef>) -> Self {
        Self {
            is_dependency: true,
            ..Self::typed(name, ty)
        }
    }
}

/// An associated function that can build the type: a constructor, or a
/// factory carrying the instantiator marker.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InstantiatorDecl {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub params: Vec<ParamDecl>,
    /// Return type; `None` means `Self`. `Result<Self, E>` makes the
    /// instantiator fallible with failure type `E`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub returns: Option<TypeRef>,
    /// Factories must not take a receiver.
    #[cfg_attr(feature = "serde", serde(default = "default_true"))]
    pub is_static: bool,
    /// The instantiator marker. Always implied for factories.
    #[cfg_attr(feature = "serde", serde(default))]
    pub marked: bool,
}

#[cfg(feature = "serde")]
fn default_true() -> bool {
    true
}

impl InstantiatorDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            returns: None,
            is_static: true,
            marked: false,
        }
    }

    #[must_use]
    pub fn with_params(mut self, params: Vec<ParamDecl>) -> Self {
        self.params = params;
        self
    }

    #[must_use]
    pub fn returning(mut self, ty: impl Into<TypeRef>) -> Self {
        self.returns = Some(ty.into());
        self
    }

    #[must_use]
    pub fn marked(mut self) -> Self {
        self.marked = true;
        self
    }

    #[must_use]
    pub fn with_receiver(mut self) -> Self {
        self.is_static = false;
        self
    }
}

/// A method known on the type; zero-argument ones are accessor candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MethodDecl {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub arity: usize,
}

impl MethodDecl {
    pub fn accessor(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arity: 0,
        }
    }
}

/// Supertype link: the base type embedded in field `field`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParentLink {
    pub field: String,
    pub descriptor: Box<TypeDescriptor>,
}

/// Structural description of one type.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TypeDescriptor {
    /// Type identifier, e.g. `Point`.
    pub name: String,
    /// Path used in generated code; defaults to `name`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub path: Option<String>,
    /// Identity reported by the codec; defaults to
    /// `concat!(module_path!(), "::", name)`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub qualified_name: Option<String>,
    /// Visibility of the generated codec struct, as source text.
    #[cfg_attr(feature = "serde", serde(default = "default_visibility"))]
    pub visibility: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_abstract: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub fields: Vec<FieldDecl>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub parent: Option<ParentLink>,
    /// Type-level dependency.
    #[cfg_attr(feature = "serde", serde(default))]
    pub dependency: Option<TypeRef>,
    /// Declared constructors. Empty means the struct literal is the sole
    /// constructor.
    #[cfg_attr(feature = "serde", serde(default))]
    pub constructors: Vec<InstantiatorDecl>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub factories: Vec<InstantiatorDecl>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub methods: Vec<MethodDecl>,
    /// Immutable value type whose fields are read through accessors.
    #[cfg_attr(feature = "serde", serde(default))]
    pub accessor_convention: bool,
    /// Path of the canonical `static` instance (singletons).
    #[cfg_attr(feature = "serde", serde(default))]
    pub singleton_instance: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub codec_name: Option<String>,
}

#[cfg(feature = "serde")]
fn default_visibility() -> String {
    "pub".to_string()
}

impl TypeDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: None,
            qualified_name: None,
            visibility: "pub".to_string(),
            is_abstract: false,
            fields: Vec::new(),
            parent: None,
            dependency: None,
            constructors: Vec::new(),
            factories: Vec::new(),
            methods: Vec::new(),
            accessor_convention: false,
            singleton_instance: None,
            codec_name: None,
        }
    }

    #[must_use]
    pub fn with_qualified_name(mut self, name: impl Into<String>) -> Self {
        self.qualified_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_fields(mut self, fields: Vec<FieldDecl>) -> Self {
        self.fields = fields;
        self
    }

    #[must_use]
    pub fn with_parent(mut self, field: impl Into<String>, descriptor: TypeDescriptor) -> Self {
        self.parent = Some(ParentLink {
            field: field.into(),
            descriptor: Box::new(descriptor),
        });
        self
    }

    #[must_use]
    pub fn with_dependency(mut self, ty: impl Into<TypeRef>) -> Self {
        self.dependency = Some(ty.into());
        self
    }

    #[must_use]
    pub fn with_constructor(mut self, constructor: InstantiatorDecl) -> Self {
        self.constructors.push(constructor);
        self
    }

    #[must_use]
    pub fn with_factory(mut self, factory: InstantiatorDecl) -> Self {
        self.factories.push(factory);
        self
    }

    #[must_use]
    pub fn with_accessors(mut self, names: &[&str]) -> Self {
        self.accessor_convention = true;
        self.methods
            .extend(names.iter().map(|name| MethodDecl::accessor(*name)));
        self
    }

    #[must_use]
    pub fn abstract_type(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    #[must_use]
    pub fn with_singleton_instance(mut self, path: impl Into<String>) -> Self {
        self.singleton_instance = Some(path.into());
        self
    }

    /// Name used in diagnostics.
    pub fn display_name(&self) -> &str {
        self.qualified_name.as_deref().unwrap_or(&self.name)
    }

    pub fn codec_name(&self) -> String {
        self.codec_name
            .clone()
            .unwrap_or_else(|| format!("{}Codec", self.name))
    }

    pub fn type_path(&self) -> Result<syn::Path, ConfigError> {
        let text = self.path.as_deref().unwrap_or(&self.name);
        syn::parse_str(text).map_err(|e| ConfigError::InvalidType {
            type_name: self.display_name().to_string(),
            text: text.to_string(),
            reason: e.to_string(),
        })
    }
}
