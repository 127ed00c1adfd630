// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dynamic value types.

use crate::types::{self, PrimitiveKind, TypeKind, TypeRef};
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeDelta};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// A dynamic value of any described type.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,

    // Primitives
    Bool(bool),
    Char(char),
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
    String(String),
    DateTime(NaiveDateTime),
    Timestamp(DateTime<FixedOffset>),
    Duration(TimeDelta),
    Uuid(Uuid),

    // Composites
    Enum(EnumValue),
    Seq(SeqValue),
    Dict(DictValue),
    Pair(Box<PairValue>),
    /// Reference-type object with observable identity.
    Object(ObjectRef),
}

impl Default for Value {
    fn default() -> Self {
        Self::Null
    }
}

/// Enum value: raw integral value of a described enum type.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumValue {
    pub ty: TypeRef,
    pub raw: i64,
}

impl EnumValue {
    /// Variant name, if `raw` is a declared value.
    pub fn variant_name(&self) -> Option<&str> {
        self.ty
            .enum_descriptor()
            .and_then(|e| e.variant_by_value(self.raw))
            .map(|v| &*v.name)
    }
}

/// Array, list or set contents.
#[derive(Debug, Clone, PartialEq)]
pub struct SeqValue {
    pub ty: TypeRef,
    pub items: Vec<Value>,
}

/// Dictionary contents in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct DictValue {
    pub ty: TypeRef,
    pub entries: Vec<(Value, Value)>,
}

impl DictValue {
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Insert, replacing the value of an equal key.
    pub fn insert(&mut self, key: Value, value: Value) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Case-insensitive lookup over string keys, trying each candidate in order.
    pub fn get_by_names(&self, names: &[Arc<str>]) -> Option<&Value> {
        for name in names {
            let hit = self.entries.iter().find(|(k, _)| match k {
                Value::String(s) => s.eq_ignore_ascii_case(name),
                _ => false,
            });
            if let Some((_, v)) = hit {
                return Some(v);
            }
        }
        None
    }
}

/// Key/value pair.
#[derive(Debug, Clone, PartialEq)]
pub struct PairValue {
    pub ty: TypeRef,
    pub key: Value,
    pub value: Value,
}

/// Object state: descriptor plus member values in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectData {
    ty: TypeRef,
    fields: Vec<(Arc<str>, Value)>,
}

impl ObjectData {
    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    pub fn fields(&self) -> &[(Arc<str>, Value)] {
        &self.fields
    }

    fn slot(&self, name: &str) -> Option<usize> {
        self.fields
            .iter()
            .position(|(n, _)| &**n == name)
            .or_else(|| {
                self.fields
                    .iter()
                    .position(|(n, _)| n.eq_ignore_ascii_case(name))
            })
    }
}

/// Shared handle to an object. Clones alias the same instance.
#[derive(Clone)]
pub struct ObjectRef(Arc<RwLock<ObjectData>>);

impl ObjectRef {
    /// Fresh instance with every member at its initial value.
    pub fn new(ty: &TypeRef) -> Self {
        let fields = ty
            .members()
            .iter()
            .map(|m| (m.name.clone(), m.initial_value()))
            .collect();
        Self(Arc::new(RwLock::new(ObjectData {
            ty: ty.clone(),
            fields,
        })))
    }

    pub fn ty(&self) -> TypeRef {
        self.0.read().ty.clone()
    }

    /// Member value (exact name first, then case-insensitive).
    pub fn get(&self, name: &str) -> Option<Value> {
        let data = self.0.read();
        data.slot(name).map(|i| data.fields[i].1.clone())
    }

    /// Set a member. Returns false if the type has no such member.
    pub fn set(&self, name: &str, value: Value) -> bool {
        let mut data = self.0.write();
        match data.slot(name) {
            Some(i) => {
                data.fields[i].1 = value;
                true
            }
            None => false,
        }
    }

    /// Apply `f` to a member in place.
    pub fn update<R>(&self, name: &str, f: impl FnOnce(&mut Value) -> R) -> Option<R> {
        let mut data = self.0.write();
        let slot = data.slot(name)?;
        Some(f(&mut data.fields[slot].1))
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> ObjectData {
        self.0.read().clone()
    }

    /// Whether both handles refer to the same instance.
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Detached copy; nested objects are copied too.
    pub fn deep_clone(&self) -> ObjectRef {
        let data = self.0.read();
        let fields = data
            .fields
            .iter()
            .map(|(n, v)| (n.clone(), v.deep_clone()))
            .collect();
        ObjectRef(Arc::new(RwLock::new(ObjectData {
            ty: data.ty.clone(),
            fields,
        })))
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        *self.0.read() == *other.0.read()
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.0.read();
        let mut s = f.debug_struct(data.ty.name());
        for (name, value) in &data.fields {
            s.field(name, value);
        }
        s.finish()
    }
}

impl Value {
    /// Check if value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Descriptor of the value's runtime type (`None` for null).
    pub fn runtime_type(&self) -> Option<TypeRef> {
        let kind = match self {
            Self::Null => return None,
            Self::Bool(_) => PrimitiveKind::Bool,
            Self::Char(_) => PrimitiveKind::Char,
            Self::I8(_) => PrimitiveKind::I8,
            Self::U8(_) => PrimitiveKind::U8,
            Self::I16(_) => PrimitiveKind::I16,
            Self::U16(_) => PrimitiveKind::U16,
            Self::I32(_) => PrimitiveKind::I32,
            Self::U32(_) => PrimitiveKind::U32,
            Self::I64(_) => PrimitiveKind::I64,
            Self::U64(_) => PrimitiveKind::U64,
            Self::F32(_) => PrimitiveKind::F32,
            Self::F64(_) => PrimitiveKind::F64,
            Self::String(_) => PrimitiveKind::String,
            Self::DateTime(_) => PrimitiveKind::DateTime,
            Self::Timestamp(_) => PrimitiveKind::Timestamp,
            Self::Duration(_) => PrimitiveKind::Duration,
            Self::Uuid(_) => PrimitiveKind::Uuid,
            Self::Enum(e) => return Some(e.ty.clone()),
            Self::Seq(s) => return Some(s.ty.clone()),
            Self::Dict(d) => return Some(d.ty.clone()),
            Self::Pair(p) => return Some(p.ty.clone()),
            Self::Object(o) => return Some(o.ty()),
        };
        Some(types::primitive(kind))
    }

    /// Default value of a freshly constructed slot of type `ty`.
    pub fn default_for(ty: &TypeRef) -> Value {
        match ty.kind() {
            TypeKind::Primitive(kind) => match kind {
                PrimitiveKind::Bool => Self::Bool(false),
                PrimitiveKind::Char => Self::Char('\0'),
                PrimitiveKind::I8 => Self::I8(0),
                PrimitiveKind::U8 => Self::U8(0),
                PrimitiveKind::I16 => Self::I16(0),
                PrimitiveKind::U16 => Self::U16(0),
                PrimitiveKind::I32 => Self::I32(0),
                PrimitiveKind::U32 => Self::U32(0),
                PrimitiveKind::I64 => Self::I64(0),
                PrimitiveKind::U64 => Self::U64(0),
                PrimitiveKind::F32 => Self::F32(0.0),
                PrimitiveKind::F64 => Self::F64(0.0),
                PrimitiveKind::String => Self::Null,
                PrimitiveKind::DateTime => Self::DateTime(NaiveDateTime::default()),
                PrimitiveKind::Timestamp => {
                    Self::Timestamp(DateTime::<chrono::Utc>::default().fixed_offset())
                }
                PrimitiveKind::Duration => Self::Duration(TimeDelta::zero()),
                PrimitiveKind::Uuid => Self::Uuid(Uuid::nil()),
            },
            TypeKind::Enum(_) => Self::Enum(EnumValue {
                ty: ty.clone(),
                raw: 0,
            }),
            TypeKind::Pair { key, value } => Self::Pair(Box::new(PairValue {
                ty: ty.clone(),
                key: Self::default_for(key),
                value: Self::default_for(value),
            })),
            TypeKind::Object(o) if o.value_type => Self::Object(ObjectRef::new(ty)),
            _ => Self::Null,
        }
    }

    /// Empty sequence of type `ty`.
    pub fn empty_seq(ty: &TypeRef) -> Value {
        Self::Seq(SeqValue {
            ty: ty.clone(),
            items: Vec::new(),
        })
    }

    /// Empty dictionary of type `ty`.
    pub fn empty_dict(ty: &TypeRef) -> Value {
        Self::Dict(DictValue {
            ty: ty.clone(),
            entries: Vec::new(),
        })
    }

    /// `List<element>` holding `items`.
    pub fn list(element: &TypeRef, items: Vec<Value>) -> Value {
        Self::Seq(SeqValue {
            ty: types::list_of(element),
            items,
        })
    }

    /// `Dictionary<key, value>` holding `entries`.
    pub fn dict(key: &TypeRef, value: &TypeRef, entries: Vec<(Value, Value)>) -> Value {
        let mut dict = DictValue {
            ty: types::dictionary(key, value),
            entries: Vec::with_capacity(entries.len()),
        };
        for (k, v) in entries {
            dict.insert(k, v);
        }
        Self::Dict(dict)
    }

    /// `Pair<K, V>` with types taken from the values (`Object` for null).
    pub fn pair(key: Value, value: Value) -> Value {
        let key_ty = key.runtime_type().unwrap_or_else(types::any);
        let value_ty = value.runtime_type().unwrap_or_else(types::any);
        Self::Pair(Box::new(PairValue {
            ty: types::pair(&key_ty, &value_ty),
            key,
            value,
        }))
    }

    /// Enum value by variant name (case-insensitive).
    pub fn enum_variant(ty: &TypeRef, name: &str) -> Option<Value> {
        let variant = ty.enum_descriptor()?.variant_by_name(name)?;
        Some(Self::Enum(EnumValue {
            ty: ty.clone(),
            raw: variant.value,
        }))
    }

    /// New object of type `ty` with the given member values.
    pub fn object<N: AsRef<str>>(ty: &TypeRef, fields: impl IntoIterator<Item = (N, Value)>) -> Value {
        let object = ObjectRef::new(ty);
        for (name, value) in fields {
            object.set(name.as_ref(), value);
        }
        Self::Object(object)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Any integral value (or enum raw value), widened.
    pub fn as_integral(&self) -> Option<i128> {
        match self {
            Self::I8(v) => Some(i128::from(*v)),
            Self::U8(v) => Some(i128::from(*v)),
            Self::I16(v) => Some(i128::from(*v)),
            Self::U16(v) => Some(i128::from(*v)),
            Self::I32(v) => Some(i128::from(*v)),
            Self::U32(v) => Some(i128::from(*v)),
            Self::I64(v) => Some(i128::from(*v)),
            Self::U64(v) => Some(i128::from(*v)),
            Self::Enum(e) => Some(i128::from(e.raw)),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Self::I32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::I64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::F64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Self::Seq(s) => Some(&s.items),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&DictValue> {
        match self {
            Self::Dict(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_pair(&self) -> Option<&PairValue> {
        match self {
            Self::Pair(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumValue> {
        match self {
            Self::Enum(e) => Some(e),
            _ => None,
        }
    }

    /// Object member by name.
    pub fn get_field(&self, name: &str) -> Option<Value> {
        self.as_object().and_then(|o| o.get(name))
    }

    /// Copy with fresh identity for every nested object.
    pub fn deep_clone(&self) -> Value {
        match self {
            Self::Object(o) => Self::Object(o.deep_clone()),
            Self::Seq(s) => Self::Seq(SeqValue {
                ty: s.ty.clone(),
                items: s.items.iter().map(Value::deep_clone).collect(),
            }),
            Self::Dict(d) => Self::Dict(DictValue {
                ty: d.ty.clone(),
                entries: d
                    .entries
                    .iter()
                    .map(|(k, v)| (k.deep_clone(), v.deep_clone()))
                    .collect(),
            }),
            Self::Pair(p) => Self::Pair(Box::new(PairValue {
                ty: p.ty.clone(),
                key: p.key.deep_clone(),
                value: p.value.deep_clone(),
            })),
            other => other.clone(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(v) => write!(f, "{}", v),
            Self::Char(v) => write!(f, "{}", v),
            Self::I8(v) => write!(f, "{}", v),
            Self::U8(v) => write!(f, "{}", v),
            Self::I16(v) => write!(f, "{}", v),
            Self::U16(v) => write!(f, "{}", v),
            Self::I32(v) => write!(f, "{}", v),
            Self::U32(v) => write!(f, "{}", v),
            Self::I64(v) => write!(f, "{}", v),
            Self::U64(v) => write!(f, "{}", v),
            Self::F32(v) => write!(f, "{}", v),
            Self::F64(v) => write!(f, "{}", v),
            Self::String(v) => f.write_str(v),
            Self::DateTime(v) => f.write_str(&crate::convert::format_datetime(v)),
            Self::Timestamp(v) => f.write_str(&v.to_rfc3339()),
            Self::Duration(v) => f.write_str(&crate::convert::format_duration(v)),
            Self::Uuid(v) => write!(f, "{}", v),
            Self::Enum(e) => match e.variant_name() {
                Some(name) => f.write_str(name),
                None => write!(f, "{}", e.raw),
            },
            Self::Seq(s) => {
                f.write_str("[")?;
                for (i, item) in s.items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Self::Dict(d) => {
                f.write_str("{")?;
                for (i, (k, v)) in d.entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                f.write_str("}")
            }
            Self::Pair(p) => write!(f, "[{}, {}]", p.key, p.value),
            Self::Object(o) => {
                let ty = o.ty();
                match ty.capabilities().and_then(|c| c.display.clone()) {
                    Some(display) => f.write_str(&display(self)),
                    None => f.write_str(ty.name()),
                }
            }
        }
    }
}

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::$variant(v)
                }
            }
        )*
    };
}

impl_from_scalar! {
    bool => Bool,
    char => Char,
    i8 => I8,
    u8 => U8,
    i16 => I16,
    u16 => U16,
    i32 => I32,
    u32 => U32,
    i64 => I64,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    String => String,
    NaiveDateTime => DateTime,
    DateTime<FixedOffset> => Timestamp,
    TimeDelta => Duration,
    Uuid => Uuid,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<ObjectRef> for Value {
    fn from(v: ObjectRef) -> Self {
        Self::Object(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Self::Null)
    }
}
