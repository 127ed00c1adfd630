// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Formatting to and parsing from text.

use crate::error::{Error, Result};
use crate::ir::{Expr, Intrinsic};
use crate::strategy::Strategy;
use crate::synth::SynthContext;
use crate::types::{TypeKind, TypePair};

/// Any type with a `ToString`-like capability into a string: primitives,
/// enums and objects declaring a display capability.
pub struct ToStringStrategy;

impl Strategy for ToStringStrategy {
    fn name(&self) -> &str {
        "to-string"
    }

    fn matches(&self, pair: &TypePair) -> bool {
        if !pair.destination.is_string() {
            return false;
        }
        match pair.source.kind() {
            TypeKind::Primitive(_) | TypeKind::Enum(_) => true,
            TypeKind::Object(o) => o.capabilities.display.is_some(),
            _ => false,
        }
    }

    fn build_plan(
        &self,
        source: Expr,
        _pair: &TypePair,
        _ctx: &mut SynthContext<'_>,
    ) -> Result<Expr> {
        Ok(Expr::call(Intrinsic::Format, vec![source]))
    }
}

/// Strings into UUIDs, durations and offset timestamps, or into objects
/// declaring a static parse capability.
pub struct ParseStrategy;

impl Strategy for ParseStrategy {
    fn name(&self) -> &str {
        "parse"
    }

    fn matches(&self, pair: &TypePair) -> bool {
        if !pair.source.is_string() {
            return false;
        }
        match pair.destination.kind() {
            TypeKind::Primitive(kind) => kind.is_parse_target(),
            TypeKind::Object(o) => o.capabilities.parse.is_some(),
            _ => false,
        }
    }

    fn build_plan(
        &self,
        source: Expr,
        pair: &TypePair,
        _ctx: &mut SynthContext<'_>,
    ) -> Result<Expr> {
        let op = match pair.destination.kind() {
            TypeKind::Primitive(kind) => Intrinsic::Parse(*kind),
            TypeKind::Object(_) => Intrinsic::ParseWith(pair.destination.clone()),
            _ => return Err(Error::mismatch(&pair.source, &pair.destination)),
        };
        Ok(Expr::call(op, vec![source]))
    }
}
