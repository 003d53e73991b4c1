// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Offline codec generation from YAML manifests.

pub mod manifest;
pub mod module_writer;

pub use manifest::CodecManifest;
pub use module_writer::{CodecModuleWriter, GenerationReport};
