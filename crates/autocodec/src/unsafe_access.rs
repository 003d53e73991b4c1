// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Raw-offset field reads.
//!
//! This is the escape hatch used by INSTANTIATOR codecs for fields that have
//! neither a public accessor nor public visibility. Generated codecs compute
//! each offset once, in their constructor, with [`core::mem::offset_of`]:
//!
//! ```ignore
//! // SAFETY: the offset comes from `offset_of!` on the same type and field.
//! let label = unsafe {
//!     FieldOffset::<Tag, String>::new(core::mem::offset_of!(Tag, label), "Tag", "label")
//! };
//! ```
//!
//! A `FieldOffset<T, F>` is only valid for the exact type `T` it was computed
//! from. Nothing outside generated codecs should construct one.
//!
//! Alongside each offset, generated codecs emit a pointer projection of the
//! same field path typed as `*const F`, so a declared field type that differs
//! from the real one is rejected at compile time:
//!
//! ```
//! use autocodec::{AutoCodec, CodecReader, CodecWriter, ObjectCodec};
//!
//! pub struct Account {
//!     id: u64,
//!     flags: u8,
//! }
//!
//! #[derive(AutoCodec)]
//! #[autocodec(constructor(name = "new", params(id)))]
//! pub struct Savings {
//!     #[autocodec(parent(id: u64))]
//!     pub base: Account,
//! }
//!
//! impl Savings {
//!     pub fn new(id: u64) -> Self {
//!         Self { base: Account { id, flags: 0 } }
//!     }
//! }
//!
//! let codec = SavingsCodec::new();
//! let mut writer = CodecWriter::new();
//! codec.serialize(&Savings::new(9), None, &mut writer).unwrap();
//! let bytes = writer.into_bytes();
//! let decoded = codec.deserialize(&mut CodecReader::new(&bytes), None).unwrap();
//! assert_eq!(decoded.base.id, 9);
//! assert_eq!(decoded.base.flags, 0);
//! ```
//!
//! ```compile_fail
//! use autocodec::AutoCodec;
//!
//! pub struct Account {
//!     id: u64,
//!     flags: u8,
//! }
//!
//! #[derive(AutoCodec)]
//! #[autocodec(constructor(name = "new", params(id)))]
//! pub struct Savings {
//!     // `id` is a u64; reading it as a String must not compile.
//!     #[autocodec(parent(id: String))]
//!     pub base: Account,
//! }
//!
//! impl Savings {
//!     pub fn new(id: String) -> Self {
//!         Self { base: Account { id: id.len() as u64, flags: 0 } }
//!     }
//! }
//! ```

use std::fmt;
use std::marker::PhantomData;
use std::mem::{align_of, size_of};

/// Offset validation failure. Generated codecs treat this as a fatal
/// initialization error and panic from their constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldOffsetError {
    pub declaring_type: &'static str,
    pub field: &'static str,
    pub reason: &'static str,
}

impl fmt::Display for FieldOffsetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid offset for field {}::{}: {}",
            self.declaring_type, self.field, self.reason
        )
    }
}

impl std::error::Error for FieldOffsetError {}

/// Byte offset of a field of type `F` inside a `T`.
pub struct FieldOffset<T, F> {
    offset: usize,
    // fn pointer keeps the marker Send + Sync regardless of T and F.
    _marker: PhantomData<fn(&T) -> &F>,
}

impl<T, F> FieldOffset<T, F> {
    /// Validate and wrap `offset`.
    ///
    /// # Safety
    ///
    /// `offset` must be the offset of a field of type exactly `F` declared
    /// (directly or through nested fields) inside `T`, as returned by
    /// `core::mem::offset_of!(T, path)`. The bounds and alignment checks
    /// below catch gross mistakes but cannot prove the field's type.
    ///
    /// # Errors
    ///
    /// Returns an error if `F` does not fit inside `T` at `offset`, or if
    /// `offset` is misaligned for `F`.
    pub const unsafe fn new(
        offset: usize,
        declaring_type: &'static str,
        field: &'static str,
    ) -> Result<Self, FieldOffsetError> {
        let in_bounds = match offset.checked_add(size_of::<F>()) {
            Some(end) => end <= size_of::<T>(),
            None => false,
        };
        let reason = if !in_bounds {
            "field extends past the end of its declaring type"
        } else if offset % align_of::<F>() != 0 {
            "offset is misaligned for the field type"
        } else {
            return Ok(Self {
                offset,
                _marker: PhantomData,
            });
        };
        Err(FieldOffsetError {
            declaring_type,
            field,
            reason,
        })
    }

    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Borrow the field out of `value`.
    pub fn get<'a>(&self, value: &'a T) -> &'a F {
        let base = (value as *const T).cast::<u8>();
        // SAFETY:
        // - `new` requires `offset` to locate an `F` field inside `T`, so the
        //   resulting pointer is in bounds, aligned and initialized.
        // - The returned borrow shares the lifetime of `value`, which keeps
        //   the field alive and immutable for that long.
        unsafe { &*base.add(self.offset).cast::<F>() }
    }
}

impl<T, F> Clone for FieldOffset<T, F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, F> Copy for FieldOffset<T, F> {}

impl<T, F> fmt::Debug for FieldOffset<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldOffset")
            .field("offset", &self.offset)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::offset_of;

    #[allow(dead_code)] // fields are only read through offsets
    struct Sensor {
        id: u64,
        label: String,
        active: bool,
    }

    #[test]
    fn test_reads_private_fields() {
        let sensor = Sensor {
            id: 7,
            label: "north".to_string(),
            active: true,
        };
        // SAFETY: offsets come from offset_of! on Sensor with matching types.
        let (id, label, active) = unsafe {
            (
                FieldOffset::<Sensor, u64>::new(offset_of!(Sensor, id), "Sensor", "id")
                    .expect("id offset"),
                FieldOffset::<Sensor, String>::new(offset_of!(Sensor, label), "Sensor", "label")
                    .expect("label offset"),
                FieldOffset::<Sensor, bool>::new(offset_of!(Sensor, active), "Sensor", "active")
                    .expect("active offset"),
            )
        };
        assert_eq!(*id.get(&sensor), 7);
        assert_eq!(label.get(&sensor), "north");
        assert!(*active.get(&sensor));
    }

    #[test]
    fn test_out_of_bounds_offset_rejected() {
        // SAFETY: the call is expected to fail validation and never read.
        let err = unsafe {
            FieldOffset::<Sensor, u64>::new(size_of::<Sensor>(), "Sensor", "id").unwrap_err()
        };
        assert_eq!(err.field, "id");
        assert!(err.to_string().contains("past the end"));
    }

    #[test]
    fn test_validates_in_const_context() {
        // SAFETY: offset comes from offset_of! on Sensor with a matching type.
        const LABEL: Result<FieldOffset<Sensor, String>, FieldOffsetError> =
            unsafe { FieldOffset::new(offset_of!(Sensor, label), "Sensor", "label") };
        let label = LABEL.expect("label offset");
        assert_eq!(label.offset(), offset_of!(Sensor, label));
    }

    #[test]
    fn test_misaligned_offset_rejected() {
        // SAFETY: the call is expected to fail validation and never read.
        let err = unsafe { FieldOffset::<Sensor, u64>::new(1, "Sensor", "id").unwrap_err() };
        assert!(err.to_string().contains("misaligned"));
    }
}
