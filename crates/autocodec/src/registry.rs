// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Polymorphic codec registry.
//!
//! Maps the concrete subtypes of an abstract base (a trait object type such
//! as `dyn Shape`) to their own codecs. Codecs generated with the
//! POLYMORPHIC strategy hold an `Arc<CodecRegistry>` handle and delegate to
//! it; there is no process-wide instance.
//!
//! # Wire format
//!
//! ```text
//! +----------------------+---------------------------------+
//! | discriminator (u32)  | payload of the concrete codec   |
//! +----------------------+---------------------------------+
//! ```
//!
//! The discriminator is the FNV-1a hash of the subtype codec's
//! `encoded_type_name()`, so it stays stable across processes as long as the
//! type keeps its name.
//!
//! # Thread Safety
//!
//! Lookups take a read lock and release it before invoking the subtype
//! codec; registration takes the write lock.

use crate::codec::{NoDependency, ObjectCodec};
use crate::error::{Result, SerializationError};
use crate::ser::{CodecReader, CodecWriter};
use parking_lot::RwLock;
use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

/// Compute FNV-1a hash (32-bit) of a type name.
pub fn type_discriminator(type_name: &str) -> u32 {
    let mut hash = 2_166_136_261_u32;
    for byte in type_name.bytes() {
        hash ^= u32::from(byte);
        hash = hash.wrapping_mul(16_777_619);
    }
    hash
}

/// Type-erased view of a subtype codec bound to one base.
trait ErasedCodec: Send + Sync {
    fn serialize_erased(
        &self,
        value: &dyn Any,
        dependency: Option<&dyn Any>,
        writer: &mut CodecWriter,
    ) -> Result<()>;

    /// Returns a `Box<B>` (for the base `B` of the table) boxed as `dyn Any`.
    fn deserialize_erased(
        &self,
        reader: &mut CodecReader<'_>,
        dependency: Option<&dyn Any>,
    ) -> Result<Box<dyn Any>>;
}

struct Upcasting<C: ObjectCodec, B: ?Sized> {
    codec: C,
    upcast: fn(C::Encoded) -> Box<B>,
}

impl<C, B> Upcasting<C, B>
where
    C: ObjectCodec,
    B: ?Sized,
{
    fn dependency<'a>(&self, dependency: Option<&'a dyn Any>) -> Result<Option<&'a C::Dependency>> {
        if TypeId::of::<C::Dependency>() == TypeId::of::<NoDependency>() {
            return Ok(None);
        }
        match dependency {
            None => Ok(None),
            Some(dep) => dep.downcast_ref::<C::Dependency>().map(Some).ok_or(
                SerializationError::DependencyMismatch {
                    type_name: self.codec.encoded_type_name(),
                    expected: type_name::<C::Dependency>(),
                },
            ),
        }
    }
}

impl<C, B> ErasedCodec for Upcasting<C, B>
where
    C: ObjectCodec,
    C::Encoded: 'static,
    B: ?Sized + 'static,
{
    fn serialize_erased(
        &self,
        value: &dyn Any,
        dependency: Option<&dyn Any>,
        writer: &mut CodecWriter,
    ) -> Result<()> {
        let value =
            value
                .downcast_ref::<C::Encoded>()
                .ok_or(SerializationError::TypeMismatch {
                    expected: type_name::<C::Encoded>(),
                    found: "a different runtime type",
                })?;
        self.codec
            .serialize(value, self.dependency(dependency)?, writer)
    }

    fn deserialize_erased(
        &self,
        reader: &mut CodecReader<'_>,
        dependency: Option<&dyn Any>,
    ) -> Result<Box<dyn Any>> {
        let value = self.codec.deserialize(reader, self.dependency(dependency)?)?;
        Ok(Box::new((self.upcast)(value)))
    }
}

struct RegisteredCodec {
    tag: u32,
    type_name: &'static str,
    codec: Box<dyn ErasedCodec>,
}

/// Subtype table of one abstract base.
#[derive(Default)]
struct BaseTable {
    by_type: HashMap<TypeId, Arc<RegisteredCodec>>,
    by_tag: HashMap<u32, Arc<RegisteredCodec>>,
}

/// Registry of subtype codecs, keyed per abstract base.
#[derive(Default)]
pub struct CodecRegistry {
    bases: RwLock<HashMap<TypeId, BaseTable>>,
}

impl CodecRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `codec` as the codec of a concrete subtype of `B`.
    ///
    /// `upcast` converts a decoded value into the base's box, typically
    /// `|value| Box::new(value)`.
    ///
    /// # Errors
    ///
    /// `DuplicateRegistration` if the subtype, or another subtype with the
    /// same discriminator, is already registered for `B`.
    pub fn register<B, C>(&self, codec: C, upcast: fn(C::Encoded) -> Box<B>) -> Result<()>
    where
        B: ?Sized + 'static,
        C: ObjectCodec + 'static,
        C::Encoded: 'static,
    {
        let subtype_name = codec.encoded_type_name();
        let tag = type_discriminator(subtype_name);
        let mut bases = self.bases.write();
        let table = bases.entry(TypeId::of::<B>()).or_default();
        if table.by_type.contains_key(&TypeId::of::<C::Encoded>())
            || table.by_tag.contains_key(&tag)
        {
            return Err(SerializationError::DuplicateRegistration {
                base: type_name::<B>(),
                type_name: subtype_name,
            });
        }

        let entry = Arc::new(RegisteredCodec {
            tag,
            type_name: subtype_name,
            codec: Box::new(Upcasting { codec, upcast }),
        });
        table.by_type.insert(TypeId::of::<C::Encoded>(), Arc::clone(&entry));
        table.by_tag.insert(tag, entry);

        log::debug!(
            "[registry] registered {} as subtype of {} (tag 0x{:08X})",
            subtype_name,
            type_name::<B>(),
            tag
        );
        Ok(())
    }

    /// Name of the codec registered for `runtime_type` under base `B`.
    pub fn lookup_codec_for<B: ?Sized + 'static>(&self, runtime_type: TypeId) -> Option<&'static str> {
        self.bases
            .read()
            .get(&TypeId::of::<B>())
            .and_then(|table| table.by_type.get(&runtime_type))
            .map(|entry| entry.type_name)
    }

    /// Write the discriminator of `value`'s runtime type, then the value
    /// through its subtype codec.
    pub fn serialize<B: ?Sized + 'static>(
        &self,
        value: &dyn Any,
        writer: &mut CodecWriter,
        dependency: Option<&dyn Any>,
    ) -> Result<()> {
        let entry = self
            .bases
            .read()
            .get(&TypeId::of::<B>())
            .and_then(|table| table.by_type.get(&Any::type_id(value)))
            .cloned()
            .ok_or(SerializationError::UnregisteredType {
                base: type_name::<B>(),
            })?;
        writer.write_u32(entry.tag);
        entry.codec.serialize_erased(value, dependency, writer)
    }

    /// Read a discriminator and decode the value with the matching subtype
    /// codec.
    pub fn deserialize<B: ?Sized + 'static>(
        &self,
        reader: &mut CodecReader<'_>,
        dependency: Option<&dyn Any>,
    ) -> Result<Box<B>> {
        let tag = reader.read_u32()?;
        let entry = self
            .bases
            .read()
            .get(&TypeId::of::<B>())
            .and_then(|table| table.by_tag.get(&tag))
            .cloned()
            .ok_or(SerializationError::UnknownDiscriminator {
                base: type_name::<B>(),
                tag,
            })?;
        let decoded = entry.codec.deserialize_erased(reader, dependency)?;
        decoded
            .downcast::<Box<B>>()
            .map(|boxed| *boxed)
            .map_err(|_| SerializationError::TypeMismatch {
                expected: type_name::<B>(),
                found: entry.type_name,
            })
    }
}

impl std::fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bases = self.bases.read();
        f.debug_struct("CodecRegistry")
            .field("bases", &bases.len())
            .field(
                "subtypes",
                &bases.values().map(|t| t.by_tag.len()).sum::<usize>(),
            )
            .finish()
    }
}
