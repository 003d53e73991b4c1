// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Binary writer/reader primitives used by generated codecs.
//!
//! All fixed-width values are little-endian and tag-free: `bool` is one byte
//! (0 or 1), `i32` is four bytes.

use crate::error::{Result, SerializationError};

/// Generate write methods for fixed-width primitives.
macro_rules! impl_write_le {
    ($name:ident, $type:ty) => {
        pub fn $name(&mut self, value: $type) {
            self.buffer.extend_from_slice(&value.to_le_bytes());
        }
    };
}

/// Generate read methods for fixed-width primitives.
///
/// Each generated method checks bounds (`SerializationError::ReadFailed` on
/// overflow), reads N bytes, converts via `from_le_bytes()` and advances.
macro_rules! impl_read_le {
    ($name:ident, $type:ty, $size:expr) => {
        pub fn $name(&mut self) -> Result<$type> {
            let mut bytes = [0u8; $size];
            bytes.copy_from_slice(self.read_bytes($size)?);
            Ok(<$type>::from_le_bytes(bytes))
        }
    };
}

/// Growable output stream.
#[derive(Debug, Default, Clone)]
pub struct CodecWriter {
    buffer: Vec<u8>,
}

impl CodecWriter {
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    pub fn write_bool(&mut self, value: bool) {
        self.buffer.push(u8::from(value));
    }

    impl_write_le!(write_u8, u8);
    impl_write_le!(write_i8, i8);
    impl_write_le!(write_u16, u16);
    impl_write_le!(write_i16, i16);
    impl_write_le!(write_u32, u32);
    impl_write_le!(write_i32, i32);
    impl_write_le!(write_u64, u64);
    impl_write_le!(write_i64, i64);

    pub fn write_f32(&mut self, value: f32) {
        self.write_u32(value.to_bits());
    }

    pub fn write_f64(&mut self, value: f64) {
        self.write_u64(value.to_bits());
    }

    pub fn write_bytes(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Write a `u32` length prefix, rejecting lengths that do not fit.
    pub fn write_len(&mut self, len: usize) -> Result<()> {
        let len = u32::try_from(len).map_err(|_| {
            SerializationError::invalid_data(format!("length {} exceeds u32::MAX", len))
        })?;
        self.write_u32(len);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }
}

/// Bounds-checked input stream over a borrowed buffer (zero-copy).
#[derive(Debug, Clone)]
pub struct CodecReader<'a> {
    buffer: &'a [u8],
    offset: usize,
}

impl<'a> CodecReader<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, offset: 0 }
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        let offset = self.offset;
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(SerializationError::invalid_data(format!(
                "invalid bool byte 0x{:02X} at offset {}",
                other, offset
            ))),
        }
    }

    impl_read_le!(read_u8, u8, 1);
    impl_read_le!(read_i8, i8, 1);
    impl_read_le!(read_u16, u16, 2);
    impl_read_le!(read_i16, i16, 2);
    impl_read_le!(read_u32, u32, 4);
    impl_read_le!(read_i32, i32, 4);
    impl_read_le!(read_u64, u64, 8);
    impl_read_le!(read_i64, i64, 8);

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_bits(self.read_u32()?))
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_bits(self.read_u64()?))
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self
            .offset
            .checked_add(len)
            .filter(|end| *end <= self.buffer.len())
            .ok_or_else(|| SerializationError::ReadFailed {
                offset: self.offset,
                reason: "unexpected end of buffer".into(),
            })?;
        let slice = &self.buffer[self.offset..end];
        self.offset = end;
        Ok(slice)
    }

    /// Read a `u32` length prefix; the length may not exceed the bytes left.
    pub fn read_len(&mut self) -> Result<usize> {
        let offset = self.offset;
        let len = self.read_u32()? as usize;
        if len > self.remaining() {
            return Err(SerializationError::ReadFailed {
                offset,
                reason: format!("length prefix {} exceeds remaining bytes", len),
            });
        }
        Ok(len)
    }

    /// Read a `u32` element count. Elements may encode to zero bytes, so
    /// unlike [`read_len`](Self::read_len) the count is not bounded by the
    /// bytes left; callers cap any pre-allocation with [`remaining`](Self::remaining).
    pub fn read_count(&mut self) -> Result<usize> {
        Ok(self.read_u32()? as usize)
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.offset)
    }

    pub fn is_eof(&self) -> bool {
        self.offset >= self.buffer.len()
    }
}
