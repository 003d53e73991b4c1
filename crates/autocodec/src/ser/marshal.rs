// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type-directed marshalling for field types that are not fixed-width
//! primitives.
//!
//! Generated codecs write `bool` and `i32` fields directly through the
//! writer; every other field type goes through [`Marshal`]. Derived types
//! without a dependency implement it too, so they nest inside other codecs.
//!
//! # Wire layout
//!
//! | Type | Encoding |
//! |------|----------|
//! | integers, floats | fixed width, little-endian |
//! | `String` | `u32` byte length + UTF-8 bytes |
//! | `Vec<T>`, maps | `u32` element count + elements |
//! | `Option<T>` | presence `bool` + value |
//! | `[T; N]` | `N` elements, no prefix |
//! | `()`, `PhantomData<T>` | nothing |

use super::cursor::{CodecReader, CodecWriter};
use crate::error::{Result, SerializationError};
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};
use std::marker::PhantomData;
use std::sync::Arc;

/// Encode/decode support for one field type.
pub trait Marshal: Sized {
    fn encode(&self, writer: &mut CodecWriter) -> Result<()>;
    fn decode(reader: &mut CodecReader<'_>) -> Result<Self>;
}

macro_rules! impl_marshal_primitive {
    ($($type:ty => $write:ident, $read:ident;)*) => {
        $(
            impl Marshal for $type {
                fn encode(&self, writer: &mut CodecWriter) -> Result<()> {
                    writer.$write(*self);
                    Ok(())
                }

                fn decode(reader: &mut CodecReader<'_>) -> Result<Self> {
                    reader.$read()
                }
            }
        )*
    };
}

impl_marshal_primitive! {
    bool => write_bool, read_bool;
    u8 => write_u8, read_u8;
    i8 => write_i8, read_i8;
    u16 => write_u16, read_u16;
    i16 => write_i16, read_i16;
    u32 => write_u32, read_u32;
    i32 => write_i32, read_i32;
    u64 => write_u64, read_u64;
    i64 => write_i64, read_i64;
    f32 => write_f32, read_f32;
    f64 => write_f64, read_f64;
}

impl Marshal for String {
    fn encode(&self, writer: &mut CodecWriter) -> Result<()> {
        writer.write_len(self.len())?;
        writer.write_bytes(self.as_bytes());
        Ok(())
    }

    fn decode(reader: &mut CodecReader<'_>) -> Result<Self> {
        let len = reader.read_len()?;
        let bytes = reader.read_bytes(len)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|e| SerializationError::invalid_data(format!("invalid UTF-8: {}", e)))
    }
}

impl<T: Marshal> Marshal for Vec<T> {
    fn encode(&self, writer: &mut CodecWriter) -> Result<()> {
        writer.write_len(self.len())?;
        for element in self {
            element.encode(writer)?;
        }
        Ok(())
    }

    fn decode(reader: &mut CodecReader<'_>) -> Result<Self> {
        let len = reader.read_count()?;
        let mut elements = Vec::with_capacity(len.min(reader.remaining()));
        for _ in 0..len {
            elements.push(T::decode(reader)?);
        }
        Ok(elements)
    }
}

impl<T: Marshal, const N: usize> Marshal for [T; N] {
    fn encode(&self, writer: &mut CodecWriter) -> Result<()> {
        for element in self {
            element.encode(writer)?;
        }
        Ok(())
    }

    fn decode(reader: &mut CodecReader<'_>) -> Result<Self> {
        let mut elements = Vec::with_capacity(N);
        for _ in 0..N {
            elements.push(T::decode(reader)?);
        }
        elements.try_into().map_err(|rest: Vec<T>| {
            SerializationError::invalid_data(format!(
                "expected {} array elements, decoded {}",
                N,
                rest.len()
            ))
        })
    }
}

impl<T: Marshal> Marshal for Option<T> {
    fn encode(&self, writer: &mut CodecWriter) -> Result<()> {
        match self {
            Some(value) => {
                writer.write_bool(true);
                value.encode(writer)
            }
            None => {
                writer.write_bool(false);
                Ok(())
            }
        }
    }

    fn decode(reader: &mut CodecReader<'_>) -> Result<Self> {
        if reader.read_bool()? {
            Ok(Some(T::decode(reader)?))
        } else {
            Ok(None)
        }
    }
}

impl<T: Marshal> Marshal for Box<T> {
    fn encode(&self, writer: &mut CodecWriter) -> Result<()> {
        (**self).encode(writer)
    }

    fn decode(reader: &mut CodecReader<'_>) -> Result<Self> {
        T::decode(reader).map(Box::new)
    }
}

impl<T: Marshal> Marshal for Arc<T> {
    fn encode(&self, writer: &mut CodecWriter) -> Result<()> {
        (**self).encode(writer)
    }

    fn decode(reader: &mut CodecReader<'_>) -> Result<Self> {
        T::decode(reader).map(Arc::new)
    }
}

impl<K: Marshal + Ord, V: Marshal> Marshal for BTreeMap<K, V> {
    fn encode(&self, writer: &mut CodecWriter) -> Result<()> {
        writer.write_len(self.len())?;
        for (key, value) in self {
            key.encode(writer)?;
            value.encode(writer)?;
        }
        Ok(())
    }

    fn decode(reader: &mut CodecReader<'_>) -> Result<Self> {
        let len = reader.read_count()?;
        let mut map = BTreeMap::new();
        for _ in 0..len {
            let key = K::decode(reader)?;
            let value = V::decode(reader)?;
            map.insert(key, value);
        }
        Ok(map)
    }
}

impl<K, V, S> Marshal for HashMap<K, V, S>
where
    K: Marshal + Eq + Hash,
    V: Marshal,
    S: BuildHasher + Default,
{
    fn encode(&self, writer: &mut CodecWriter) -> Result<()> {
        writer.write_len(self.len())?;
        for (key, value) in self {
            key.encode(writer)?;
            value.encode(writer)?;
        }
        Ok(())
    }

    fn decode(reader: &mut CodecReader<'_>) -> Result<Self> {
        let len = reader.read_count()?;
        let mut map = HashMap::with_capacity_and_hasher(len.min(reader.remaining()), S::default());
        for _ in 0..len {
            let key = K::decode(reader)?;
            let value = V::decode(reader)?;
            map.insert(key, value);
        }
        Ok(map)
    }
}

impl Marshal for () {
    fn encode(&self, _writer: &mut CodecWriter) -> Result<()> {
        Ok(())
    }

    fn decode(_reader: &mut CodecReader<'_>) -> Result<Self> {
        Ok(())
    }
}

impl<T> Marshal for PhantomData<T> {
    fn encode(&self, _writer: &mut CodecWriter) -> Result<()> {
        Ok(())
    }

    fn decode(_reader: &mut CodecReader<'_>) -> Result<Self> {
        Ok(PhantomData)
    }
}

macro_rules! impl_marshal_tuple {
    ($($name:ident),+) => {
        impl<$($name: Marshal),+> Marshal for ($($name,)+) {
            #[allow(non_snake_case)]
            fn encode(&self, writer: &mut CodecWriter) -> Result<()> {
                let ($($name,)+) = self;
                $($name.encode(writer)?;)+
                Ok(())
            }

            fn decode(reader: &mut CodecReader<'_>) -> Result<Self> {
                Ok(($($name::decode(reader)?,)+))
            }
        }
    };
}

impl_marshal_tuple!(A, B);
impl_marshal_tuple!(A, B, C);
impl_marshal_tuple!(A, B, C, D);
