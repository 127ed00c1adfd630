// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Typed facade over descriptors and dynamic values.
//!
//! [`Reflect`] ties a Rust type to its runtime descriptor and converts
//! between the two representations, which is what
//! [`Mapper::map_to`](crate::Mapper::map_to) and
//! [`Mapper::map_into`](crate::Mapper::map_into) build on. User structs
//! implement it by hand against an [`ObjectTypeBuilder`] descriptor.
//!
//! [`ObjectTypeBuilder`]: crate::types::ObjectTypeBuilder

use crate::error::{Error, Result};
use crate::types::{self, PrimitiveKind, TypeRef};
use crate::value::{PairValue, Value};
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeDelta};
use uuid::Uuid;

/// A Rust type with a runtime descriptor.
pub trait Reflect: Sized {
    fn type_ref() -> TypeRef;

    fn to_value(&self) -> Value;

    fn from_value(value: Value) -> Result<Self>;
}

fn unexpected<T: Reflect>(value: &Value) -> Error {
    let found = value
        .runtime_type()
        .map(|t| t.name().to_string())
        .unwrap_or_else(|| "null".to_string());
    Error::mismatch(found, T::type_ref())
}

macro_rules! reflect_scalar {
    ($($ty:ty => $variant:ident / $kind:ident),* $(,)?) => {
        $(
            impl Reflect for $ty {
                fn type_ref() -> TypeRef {
                    types::primitive(PrimitiveKind::$kind)
                }

                fn to_value(&self) -> Value {
                    Value::$variant(self.clone())
                }

                fn from_value(value: Value) -> Result<Self> {
                    match value {
                        Value::$variant(v) => Ok(v),
                        other => Err(unexpected::<Self>(&other)),
                    }
                }
            }
        )*
    };
}

reflect_scalar! {
    bool => Bool / Bool,
    char => Char / Char,
    i8 => I8 / I8,
    u8 => U8 / U8,
    i16 => I16 / I16,
    u16 => U16 / U16,
    i32 => I32 / I32,
    u32 => U32 / U32,
    i64 => I64 / I64,
    u64 => U64 / U64,
    f32 => F32 / F32,
    f64 => F64 / F64,
    String => String / String,
    NaiveDateTime => DateTime / DateTime,
    DateTime<FixedOffset> => Timestamp / Timestamp,
    TimeDelta => Duration / Duration,
    Uuid => Uuid / Uuid,
}

impl<T: Reflect> Reflect for Option<T> {
    /// `Nullable<T>` for value types, `T` itself otherwise.
    fn type_ref() -> TypeRef {
        let inner = T::type_ref();
        if inner.is_value_type() {
            types::nullable(&inner)
        } else {
            inner
        }
    }

    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: Reflect> Reflect for Vec<T> {
    fn type_ref() -> TypeRef {
        types::list_of(&T::type_ref())
    }

    fn to_value(&self) -> Value {
        Value::list(&T::type_ref(), self.iter().map(Reflect::to_value).collect())
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Seq(seq) => seq.items.into_iter().map(T::from_value).collect(),
            other => Err(unexpected::<Self>(&other)),
        }
    }
}

impl<K: Reflect, V: Reflect> Reflect for (K, V) {
    fn type_ref() -> TypeRef {
        types::pair(&K::type_ref(), &V::type_ref())
    }

    fn to_value(&self) -> Value {
        Value::Pair(Box::new(PairValue {
            ty: Self::type_ref(),
            key: self.0.to_value(),
            value: self.1.to_value(),
        }))
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Pair(pair) => {
                let PairValue { key, value, .. } = *pair;
                Ok((K::from_value(key)?, V::from_value(value)?))
            }
            other => Err(unexpected::<Self>(&other)),
        }
    }
}
