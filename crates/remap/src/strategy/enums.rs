// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use crate::error::{Error, Result};
use crate::ir::{Expr, Intrinsic};
use crate::strategy::Strategy;
use crate::synth::SynthContext;
use crate::types::{TypePair, TypeRef};

/// Enum to enum (by case-insensitive name, else by range-checked raw
/// value), integral to enum, enum to integral and string to enum.
pub struct EnumStrategy;

fn is_integral(ty: &TypeRef) -> bool {
    ty.primitive().is_some_and(|k| k.is_integral())
}

impl Strategy for EnumStrategy {
    fn name(&self) -> &str {
        "enum"
    }

    fn matches(&self, pair: &TypePair) -> bool {
        let (src, dst) = (&pair.source, &pair.destination);
        match (src.is_enum(), dst.is_enum()) {
            (true, true) => true,
            (false, true) => is_integral(src) || src.is_string(),
            (true, false) => is_integral(dst),
            (false, false) => false,
        }
    }

    fn build_plan(
        &self,
        source: Expr,
        pair: &TypePair,
        _ctx: &mut SynthContext<'_>,
    ) -> Result<Expr> {
        let (src, dst) = (&pair.source, &pair.destination);
        let op = if src.is_enum() && dst.is_enum() {
            Intrinsic::EnumFromEnum(dst.clone())
        } else if dst.is_enum() && src.is_string() {
            Intrinsic::EnumFromName(dst.clone())
        } else if dst.is_enum() {
            Intrinsic::EnumFromInt(dst.clone())
        } else {
            let kind = dst.primitive().ok_or_else(|| Error::mismatch(src, dst))?;
            Intrinsic::EnumToInt(kind)
        };
        Ok(Expr::call(op, vec![source]))
    }
}
