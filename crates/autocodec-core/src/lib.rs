// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # autocodec-core
//!
//! Codec generator shared by the `#[derive(AutoCodec)]` macro and the
//! `autocodec-gen` tool. Input is a [`TypeDescriptor`]; output is Rust
//! tokens implementing `autocodec::ObjectCodec` for the described type.
//!
//! ```text
//! TypeDescriptor + StrategyTag
//!        |
//!        v
//!   strategy::select  -- instantiator::resolve, access::plan
//!        |
//!        v
//!     CodecPlan  -->  emit (+ MarshallerDispatch)  -->  GeneratedCodec
//! ```
//!
//! Configuration problems are reported as [`ConfigError`] before any code
//! is produced.

pub mod access;
pub mod batch;
pub mod descriptor;
pub mod emit;
pub mod error;
pub mod instantiator;
pub mod kind;
pub mod marshaller;
pub mod strategy;

pub use batch::{BatchFailure, BatchReport, CodecRequest};
pub use descriptor::{
    FieldDecl, InstantiatorDecl, MethodDecl, ParamDecl, ParentLink, TypeDescriptor, TypeRef,
    Visibility,
};
pub use emit::{GeneratedCodec, Generator};
pub use error::ConfigError;
pub use marshaller::{MarshallerDispatch, TraitMarshallers};
pub use strategy::{select, CodecPlan, StrategyTag};

/// Generate the codec of `desc` against the `::autocodec` runtime.
pub fn generate(desc: &TypeDescriptor, strategy: StrategyTag) -> Result<GeneratedCodec, ConfigError> {
    Generator::new().generate(desc, strategy)
}
