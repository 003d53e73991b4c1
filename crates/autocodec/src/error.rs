// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Runtime error type shared by readers, writers, codecs and the registry.

use std::error::Error as StdError;
use std::fmt;

/// Boxed cause carried by [`SerializationError::Instantiator`].
pub type BoxedCause = Box<dyn StdError + Send + Sync + 'static>;

/// Failure raised while encoding or decoding a value.
#[derive(Debug)]
pub enum SerializationError {
    /// Reader ran past the end of its buffer.
    ReadFailed { offset: usize, reason: String },
    /// Bytes were read but do not form a valid value.
    InvalidData { reason: String },
    /// The instantiator of `type_name` returned an error during deserialization.
    Instantiator {
        type_name: &'static str,
        cause: BoxedCause,
    },
    /// Deserialization needs a dependency that the caller did not supply.
    MissingDependency { type_name: &'static str },
    /// The supplied dependency has a different type than the codec expects.
    DependencyMismatch {
        type_name: &'static str,
        expected: &'static str,
    },
    /// No codec is registered for the runtime subtype of `base`.
    UnregisteredType { base: &'static str },
    /// The discriminator read from the stream is unknown for `base`.
    UnknownDiscriminator { base: &'static str, tag: u32 },
    /// A codec with the same identity is already registered for `base`.
    DuplicateRegistration {
        base: &'static str,
        type_name: &'static str,
    },
    /// A decoded value could not be converted to the requested type.
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
}

impl SerializationError {
    /// Wraps a failure returned by an instantiator.
    pub fn instantiator<E>(type_name: &'static str, cause: E) -> Self
    where
        E: Into<BoxedCause>,
    {
        SerializationError::Instantiator {
            type_name,
            cause: cause.into(),
        }
    }

    pub fn missing_dependency(type_name: &'static str) -> Self {
        SerializationError::MissingDependency { type_name }
    }

    pub fn invalid_data(reason: impl Into<String>) -> Self {
        SerializationError::InvalidData {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for SerializationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerializationError::ReadFailed { offset, reason } => {
                write!(f, "read failed at offset {}: {}", offset, reason)
            }
            SerializationError::InvalidData { reason } => write!(f, "invalid data: {}", reason),
            SerializationError::Instantiator { type_name, cause } => {
                write!(f, "{} instantiator failed: {}", type_name, cause)
            }
            SerializationError::MissingDependency { type_name } => {
                write!(f, "{} requires a dependency but none was supplied", type_name)
            }
            SerializationError::DependencyMismatch {
                type_name,
                expected,
            } => write!(
                f,
                "{} expects a dependency of type {}, got a different type",
                type_name, expected
            ),
            SerializationError::UnregisteredType { base } => write!(
                f,
                "no codec registered for the runtime subtype of {}",
                base
            ),
            SerializationError::UnknownDiscriminator { base, tag } => write!(
                f,
                "unknown type discriminator 0x{:08X} for {} (no codec registered)",
                tag, base
            ),
            SerializationError::DuplicateRegistration { base, type_name } => write!(
                f,
                "{} is already registered as a subtype of {}",
                type_name, base
            ),
            SerializationError::TypeMismatch { expected, found } => {
                write!(f, "type mismatch: expected {}, found {}", expected, found)
            }
        }
    }
}

impl StdError for SerializationError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            SerializationError::Instantiator { cause, .. } => Some(cause.as_ref()),
            _ => None,
        }
    }
}

pub type Result<T> = core::result::Result<T, SerializationError>;
