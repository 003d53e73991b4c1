// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Wire primitives and the `Marshal` trait for non-primitive field types.

pub mod cursor;
pub mod marshal;

pub use cursor::{CodecReader, CodecWriter};
pub use marshal::Marshal;
