// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Primitive conversion table and text formats.
//!
//! The table covers the "convertible" kinds (booleans, characters,
//! numerics, strings and naive date-times). Offset timestamps, durations
//! and UUIDs are reached through [`format`](Value::to_string) and the
//! `parse_*` functions instead.

use crate::error::{Error, Result};
use crate::types::{PrimitiveKind, TypeRef};
use crate::value::Value;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeDelta};
use uuid::Uuid;

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const NANOS_PER_TICK: i64 = 100;

fn in_table(kind: PrimitiveKind) -> bool {
    !matches!(
        kind,
        PrimitiveKind::Timestamp | PrimitiveKind::Duration | PrimitiveKind::Uuid
    )
}

/// Whether the conversion table has an entry for `from -> to`.
pub fn is_convertible(from: PrimitiveKind, to: PrimitiveKind) -> bool {
    use PrimitiveKind::*;
    if from == to {
        return true;
    }
    if !in_table(from) || !in_table(to) {
        return false;
    }
    match (from, to) {
        (String, _) | (_, String) => true,
        (DateTime, _) | (_, DateTime) => false,
        (Char, other) | (other, Char) => other.is_integral(),
        _ => true,
    }
}

/// Convert a primitive value through the table. Null passes through.
pub fn convert_primitive(value: &Value, target: PrimitiveKind) -> Result<Value> {
    if value.is_null() {
        return Ok(Value::Null);
    }
    if target == PrimitiveKind::String {
        return Ok(Value::String(value.to_string()));
    }
    if let Value::String(text) = value {
        return parse_primitive(text, target);
    }
    if let Some(raw) = integral_of(value) {
        return from_integral(raw, target, value);
    }
    match value {
        Value::F32(v) => from_float(f64::from(*v), target, value),
        Value::F64(v) => from_float(*v, target, value),
        Value::DateTime(v) if target == PrimitiveKind::DateTime => Ok(Value::DateTime(*v)),
        _ => Err(Error::mismatch(
            value
                .runtime_type()
                .map(|t| t.name().to_string())
                .unwrap_or_default(),
            target.name(),
        )),
    }
}

/// Integral view of integers, booleans and characters.
fn integral_of(value: &Value) -> Option<i128> {
    match value {
        Value::Bool(b) => Some(i128::from(*b)),
        Value::Char(c) => Some(i128::from(u32::from(*c))),
        Value::Enum(_) => None,
        other => other.as_integral(),
    }
}

/// Narrow a widened integral into `target`, raising `Overflow` when it
/// does not fit.
pub fn integral_to(raw: i128, target: PrimitiveKind) -> Result<Value> {
    if !target.fits(raw) {
        return Err(Error::overflow(raw, target.name()));
    }
    // Range checked above, the casts below are lossless.
    Ok(match target {
        PrimitiveKind::I8 => Value::I8(raw as i8),
        PrimitiveKind::U8 => Value::U8(raw as u8),
        PrimitiveKind::I16 => Value::I16(raw as i16),
        PrimitiveKind::U16 => Value::U16(raw as u16),
        PrimitiveKind::I32 => Value::I32(raw as i32),
        PrimitiveKind::U32 => Value::U32(raw as u32),
        PrimitiveKind::I64 => Value::I64(raw as i64),
        PrimitiveKind::U64 => Value::U64(raw as u64),
        _ => return Err(Error::mismatch("integral", target.name())),
    })
}

fn from_integral(raw: i128, target: PrimitiveKind, original: &Value) -> Result<Value> {
    match target {
        PrimitiveKind::Bool => Ok(Value::Bool(raw != 0)),
        PrimitiveKind::Char => u32::try_from(raw)
            .ok()
            .and_then(char::from_u32)
            .map(Value::Char)
            .ok_or_else(|| Error::overflow(raw, target.name())),
        PrimitiveKind::F32 => Ok(Value::F32(raw as f32)),
        PrimitiveKind::F64 => Ok(Value::F64(raw as f64)),
        kind if kind.is_integral() => integral_to(raw, kind),
        _ => Err(Error::mismatch(
            original
                .runtime_type()
                .map(|t| t.name().to_string())
                .unwrap_or_default(),
            target.name(),
        )),
    }
}

fn from_float(v: f64, target: PrimitiveKind, original: &Value) -> Result<Value> {
    match target {
        PrimitiveKind::F32 => Ok(Value::F32(v as f32)),
        PrimitiveKind::F64 => Ok(Value::F64(v)),
        PrimitiveKind::Bool => Ok(Value::Bool(v != 0.0)),
        kind if kind.is_integral() => {
            if !v.is_finite() {
                return Err(Error::overflow(v, kind.name()));
            }
            let rounded = v.round_ties_even();
            if rounded < i128::MIN as f64 || rounded > i128::MAX as f64 {
                return Err(Error::overflow(v, kind.name()));
            }
            integral_to(rounded as i128, kind).map_err(|_| Error::overflow(v, kind.name()))
        }
        _ => Err(Error::mismatch(
            original
                .runtime_type()
                .map(|t| t.name().to_string())
                .unwrap_or_default(),
            target.name(),
        )),
    }
}

/// Convert a declared constant to `target` ahead of time: primitives go
/// through the table, enums accept names and in-range integrals, anything
/// else must already be assignable.
pub fn coerce_constant(value: Value, target: &TypeRef) -> Result<Value> {
    if value.is_null() {
        if target.can_be_null() {
            return Ok(Value::Null);
        }
        return Err(Error::mismatch("null", target));
    }
    let source = match value.runtime_type() {
        Some(ty) => ty,
        None => return Err(Error::mismatch("null", target)),
    };
    if source == *target || target.is_any() {
        return Ok(value);
    }
    if let Some(inner) = target.nullable_inner() {
        return coerce_constant(value, inner);
    }
    if let Some(kind) = target.primitive() {
        return match source.primitive() {
            Some(from) if is_convertible(from, kind) => convert_primitive(&value, kind),
            _ => Err(Error::mismatch(&source, target)),
        };
    }
    if target.is_enum() {
        return match &value {
            Value::String(text) => crate::ir::enum_from_name(text, target),
            Value::Enum(e) => match e.variant_name() {
                Some(name) => crate::ir::enum_from_name(name, target),
                None => crate::ir::enum_from_raw(i128::from(e.raw), target),
            },
            other => match other.as_integral() {
                Some(raw) => crate::ir::enum_from_raw(raw, target),
                None => Err(Error::mismatch(&source, target)),
            },
        };
    }
    if target.is_assignable_from(&source) {
        Ok(value)
    } else {
        Err(Error::mismatch(&source, target))
    }
}

/// Parse text into any primitive kind.
pub fn parse_primitive(text: &str, target: PrimitiveKind) -> Result<Value> {
    let trimmed = text.trim();
    match target {
        PrimitiveKind::String => Ok(Value::String(text.to_string())),
        PrimitiveKind::Bool => match trimmed.to_ascii_lowercase().as_str() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(Error::format(text, target.name())),
        },
        PrimitiveKind::Char => {
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(Value::Char(c)),
                _ => Err(Error::format(text, target.name())),
            }
        }
        PrimitiveKind::F32 => trimmed
            .parse::<f32>()
            .map(Value::F32)
            .map_err(|_| Error::format(text, target.name())),
        PrimitiveKind::F64 => trimmed
            .parse::<f64>()
            .map(Value::F64)
            .map_err(|_| Error::format(text, target.name())),
        kind if kind.is_integral() => {
            let raw = trimmed
                .parse::<i128>()
                .map_err(|_| Error::format(text, kind.name()))?;
            integral_to(raw, kind)
        }
        PrimitiveKind::DateTime => parse_datetime(trimmed).map(Value::DateTime),
        PrimitiveKind::Timestamp => parse_timestamp(trimmed).map(Value::Timestamp),
        PrimitiveKind::Duration => parse_duration(trimmed).map(Value::Duration),
        PrimitiveKind::Uuid => parse_uuid(trimmed).map(Value::Uuid),
        _ => Err(Error::format(text, target.name())),
    }
}

/// ISO-8601 style naive date-time; fractional seconds only when present.
pub fn format_datetime(value: &NaiveDateTime) -> String {
    value.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
}

pub fn parse_datetime(text: &str) -> Result<NaiveDateTime> {
    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(parsed);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight);
        }
    }
    if let Ok(stamped) = DateTime::parse_from_rfc3339(text) {
        return Ok(stamped.naive_local());
    }
    Err(Error::format(text, PrimitiveKind::DateTime.name()))
}

pub fn parse_timestamp(text: &str) -> Result<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(text)
        .or_else(|_| DateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f %z"))
        .map_err(|_| Error::format(text, PrimitiveKind::Timestamp.name()))
}

pub fn parse_uuid(text: &str) -> Result<Uuid> {
    Uuid::parse_str(text).map_err(|_| Error::format(text, PrimitiveKind::Uuid.name()))
}

/// `[-][d.]hh:mm:ss[.fffffff]`, seven fractional digits (100 ns ticks).
pub fn format_duration(value: &TimeDelta) -> String {
    let negative = *value < TimeDelta::zero();
    let magnitude = value.abs();
    let total_secs = magnitude.num_seconds();
    let ticks = i64::from(magnitude.subsec_nanos()) / NANOS_PER_TICK;

    let days = total_secs / 86_400;
    let hours = (total_secs % 86_400) / 3_600;
    let minutes = (total_secs % 3_600) / 60;
    let seconds = total_secs % 60;

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    if days > 0 {
        out.push_str(&format!("{}.", days));
    }
    out.push_str(&format!("{:02}:{:02}:{:02}", hours, minutes, seconds));
    if ticks > 0 {
        out.push_str(&format!(".{:07}", ticks));
    }
    out
}

/// Inverse of [`format_duration`]; seconds are optional.
pub fn parse_duration(text: &str) -> Result<TimeDelta> {
    let invalid = || Error::format(text, PrimitiveKind::Duration.name());

    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };

    let first_colon = body.find(':').ok_or_else(invalid)?;
    let (days, clock) = match body[..first_colon].find('.') {
        Some(dot) => {
            let days: i64 = body[..dot].parse().map_err(|_| invalid())?;
            (days, &body[dot + 1..])
        }
        None => (0, body),
    };

    let parts: Vec<&str> = clock.split(':').collect();
    if parts.len() < 2 || parts.len() > 3 {
        return Err(invalid());
    }
    let hours: i64 = parts[0].parse().map_err(|_| invalid())?;
    let minutes: i64 = parts[1].parse().map_err(|_| invalid())?;
    let (seconds, nanos) = match parts.get(2) {
        Some(sec) => match sec.split_once('.') {
            Some((whole, frac)) => {
                if frac.is_empty() || frac.len() > 7 || !frac.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(invalid());
                }
                let ticks: i64 = format!("{:0<7}", frac).parse().map_err(|_| invalid())?;
                (whole.parse::<i64>().map_err(|_| invalid())?, ticks * NANOS_PER_TICK)
            }
            None => (sec.parse::<i64>().map_err(|_| invalid())?, 0),
        },
        None => (0, 0),
    };

    if days < 0 || !(0..24).contains(&hours) || !(0..60).contains(&minutes) || !(0..60).contains(&seconds) {
        return Err(invalid());
    }

    let total = TimeDelta::try_days(days)
        .and_then(|d| d.checked_add(&TimeDelta::try_hours(hours)?))
        .and_then(|d| d.checked_add(&TimeDelta::try_minutes(minutes)?))
        .and_then(|d| d.checked_add(&TimeDelta::try_seconds(seconds)?))
        .and_then(|d| d.checked_add(&TimeDelta::nanoseconds(nanos)))
        .ok_or_else(|| Error::overflow(text, PrimitiveKind::Duration.name()))?;
    Ok(if negative { -total } else { total })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_shape() {
        assert!(is_convertible(PrimitiveKind::I32, PrimitiveKind::String));
        assert!(is_convertible(PrimitiveKind::String, PrimitiveKind::DateTime));
        assert!(is_convertible(PrimitiveKind::Char, PrimitiveKind::U16));
        assert!(!is_convertible(PrimitiveKind::Char, PrimitiveKind::F64));
        assert!(!is_convertible(PrimitiveKind::DateTime, PrimitiveKind::I64));
        assert!(!is_convertible(PrimitiveKind::String, PrimitiveKind::Uuid));
        assert!(!is_convertible(PrimitiveKind::Uuid, PrimitiveKind::String));
    }

    #[test]
    fn test_narrowing_overflow() {
        assert_eq!(convert_primitive(&Value::I32(255), PrimitiveKind::U8), Ok(Value::U8(255)));
        assert!(matches!(
            convert_primitive(&Value::I32(300), PrimitiveKind::U8),
            Err(Error::Overflow { .. })
        ));
        assert!(matches!(
            convert_primitive(&Value::I64(-1), PrimitiveKind::U64),
            Err(Error::Overflow { .. })
        ));
    }

    #[test]
    fn test_float_rounds_half_to_even() {
        assert_eq!(convert_primitive(&Value::F64(2.5), PrimitiveKind::I32), Ok(Value::I32(2)));
        assert_eq!(convert_primitive(&Value::F64(3.5), PrimitiveKind::I32), Ok(Value::I32(4)));
        assert!(convert_primitive(&Value::F64(f64::NAN), PrimitiveKind::I32).is_err());
    }

    #[test]
    fn test_string_round_trips() {
        assert_eq!(convert_primitive(&Value::I32(42), PrimitiveKind::String), Ok("42".into()));
        assert_eq!(convert_primitive(&" 42 ".into(), PrimitiveKind::I64), Ok(Value::I64(42)));
        assert_eq!(convert_primitive(&"TRUE".into(), PrimitiveKind::Bool), Ok(Value::Bool(true)));
        assert!(matches!(
            convert_primitive(&"abc".into(), PrimitiveKind::I32),
            Err(Error::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_datetime_text() {
        let dt = parse_datetime("2024-03-01T10:20:30").expect("parse");
        assert_eq!(format_datetime(&dt), "2024-03-01T10:20:30");
        assert_eq!(parse_datetime("2024-03-01").map(|d| format_datetime(&d)), Ok("2024-03-01T00:00:00".to_string()));
        assert!(parse_datetime("yesterday").is_err());
    }

    #[test]
    fn test_duration_text() {
        let d = parse_duration("1.02:03:04.5").expect("parse");
        assert_eq!(d.num_seconds(), 86_400 + 2 * 3_600 + 3 * 60 + 4);
        assert_eq!(format_duration(&d), "1.02:03:04.5000000");
        assert_eq!(parse_duration("-00:30").map(|d| d.num_minutes()), Ok(-30));
        assert!(parse_duration("25:00:00").is_err());
        assert!(parse_duration("12").is_err());
    }
}
