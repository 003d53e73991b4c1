// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # autocodec - generated binary codecs
//!
//! Runtime support for codecs generated by `#[derive(AutoCodec)]` and
//! `#[polymorphic]`. A codec is a matched `serialize` / `deserialize` pair
//! for one type; the generator picks one of four construction strategies:
//!
//! | Strategy | Deserializes by |
//! |----------|-----------------|
//! | `instantiator` (default) | calling the single constructor or marked factory |
//! | `public_fields` | `Default::default()` then assigning public fields |
//! | `polymorphic` | looking up the concrete subtype in a [`CodecRegistry`] |
//! | `singleton` | returning the canonical `static` instance |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use autocodec::{AutoCodec, CodecReader, CodecWriter, ObjectCodec};
//!
//! #[derive(AutoCodec, Debug, PartialEq)]
//! pub struct Reading {
//!     pub sensor: String,
//!     pub celsius: i32,
//! }
//!
//! let codec = ReadingCodec::new();
//! let mut writer = CodecWriter::new();
//! codec.serialize(&Reading { sensor: "north".into(), celsius: 21 }, None, &mut writer)?;
//! let bytes = writer.into_bytes();
//! let back = codec.deserialize(&mut CodecReader::new(&bytes), None)?;
//! ```
//!
//! ## Modules Overview
//!
//! - [`ser`] - writer/reader primitives and the [`Marshal`] trait
//! - [`codec`] - the [`ObjectCodec`] contract
//! - [`registry`] - polymorphic subtype registry
//! - [`unsafe_access`] - raw-offset reads for fields without accessors

// Generated code names the runtime as `::autocodec`, including inside this crate.
extern crate self as autocodec;

pub mod codec;
pub mod error;
pub mod registry;
pub mod ser;
pub mod unsafe_access;

pub use autocodec_codegen::{polymorphic, AutoCodec};
pub use codec::{AsAny, NoDependency, ObjectCodec};
pub use error::{Result, SerializationError};
pub use registry::{type_discriminator, CodecRegistry};
pub use ser::{CodecReader, CodecWriter, Marshal};
pub use unsafe_access::{FieldOffset, FieldOffsetError};
