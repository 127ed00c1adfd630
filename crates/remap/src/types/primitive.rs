// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Primitive type kinds.

use serde::{Deserialize, Serialize};

/// Primitive type kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveKind {
    Bool,
    Char,
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
    String,
    /// Calendar date and time without offset.
    DateTime,
    /// Date and time with a UTC offset.
    Timestamp,
    Duration,
    Uuid,
}

impl PrimitiveKind {
    /// All kinds, in declaration order.
    pub const ALL: [PrimitiveKind; 17] = [
        Self::Bool,
        Self::Char,
        Self::I8,
        Self::U8,
        Self::I16,
        Self::U16,
        Self::I32,
        Self::U32,
        Self::I64,
        Self::U64,
        Self::F32,
        Self::F64,
        Self::String,
        Self::DateTime,
        Self::Timestamp,
        Self::Duration,
        Self::Uuid,
    ];

    /// Canonical type name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bool => "Boolean",
            Self::Char => "Char",
            Self::I8 => "SByte",
            Self::U8 => "Byte",
            Self::I16 => "Int16",
            Self::U16 => "UInt16",
            Self::I32 => "Int32",
            Self::U32 => "UInt32",
            Self::I64 => "Int64",
            Self::U64 => "UInt64",
            Self::F32 => "Single",
            Self::F64 => "Double",
            Self::String => "String",
            Self::DateTime => "DateTime",
            Self::Timestamp => "DateTimeOffset",
            Self::Duration => "TimeSpan",
            Self::Uuid => "Guid",
        }
    }

    /// Integral kinds (valid enum underlying types).
    pub fn is_integral(&self) -> bool {
        self.integral_range().is_some()
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }

    pub fn is_numeric(&self) -> bool {
        self.is_integral() || self.is_float()
    }

    /// Everything except `String` is a value type.
    pub fn is_value_type(&self) -> bool {
        !matches!(self, Self::String)
    }

    /// Inclusive range of an integral kind, widened to `i128`.
    pub fn integral_range(&self) -> Option<(i128, i128)> {
        match self {
            Self::I8 => Some((i8::MIN as i128, i8::MAX as i128)),
            Self::U8 => Some((0, u8::MAX as i128)),
            Self::I16 => Some((i16::MIN as i128, i16::MAX as i128)),
            Self::U16 => Some((0, u16::MAX as i128)),
            Self::I32 => Some((i32::MIN as i128, i32::MAX as i128)),
            Self::U32 => Some((0, u32::MAX as i128)),
            Self::I64 => Some((i64::MIN as i128, i64::MAX as i128)),
            Self::U64 => Some((0, u64::MAX as i128)),
            _ => None,
        }
    }

    /// Whether `raw` fits this integral kind.
    pub fn fits(&self, raw: i128) -> bool {
        self.integral_range()
            .is_some_and(|(min, max)| raw >= min && raw <= max)
    }

    /// Kinds that are parsed from text through a static parse capability
    /// rather than the numeric conversion table.
    pub fn is_parse_target(&self) -> bool {
        matches!(self, Self::Uuid | Self::Duration | Self::Timestamp)
    }
}
