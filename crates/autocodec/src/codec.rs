// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The codec contract implemented by every generated codec.

use crate::error::Result;
use crate::ser::{CodecReader, CodecWriter};
use std::any::Any;

/// Dependency type of codecs that take none. Uninhabited, so the only
/// value a caller can pass is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoDependency {}

/// A matched serialize/deserialize pair for one type.
///
/// Implementations hold no mutable state after construction and may be
/// shared across threads.
///
/// # Example
///
/// ```ignore
/// #[derive(AutoCodec, Debug, PartialEq)]
/// pub struct Point { pub x: i32, pub y: i32 }
///
/// let codec = PointCodec::new();
/// let mut writer = CodecWriter::new();
/// codec.serialize(&Point { x: 1, y: 2 }, None, &mut writer)?;
/// let bytes = writer.into_bytes();
/// let point = codec.deserialize(&mut CodecReader::new(&bytes), None)?;
/// ```
pub trait ObjectCodec: Send + Sync {
    /// Type produced by `deserialize`.
    type Encoded;
    /// External object supplied at deserialization time, never encoded.
    type Dependency: 'static;

    /// Identity of the encoded type (e.g. `"geometry::Point"`).
    fn encoded_type_name(&self) -> &'static str;

    fn serialize(
        &self,
        value: &Self::Encoded,
        dependency: Option<&Self::Dependency>,
        writer: &mut CodecWriter,
    ) -> Result<()>;

    fn deserialize(
        &self,
        reader: &mut CodecReader<'_>,
        dependency: Option<&Self::Dependency>,
    ) -> Result<Self::Encoded>;
}

/// Upcast to `&dyn Any`.
///
/// `#[polymorphic]` adds this as a supertrait of the annotated trait so the
/// registry can find the concrete subtype behind a trait object.
pub trait AsAny: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any + Send + Sync> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}
