// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use crate::convert;
use crate::error::Result;
use crate::ir::{Expr, Intrinsic};
use crate::strategy::Strategy;
use crate::synth::SynthContext;
use crate::types::TypePair;

/// Numeric, boolean, character, string and date conversion through the
/// primitive conversion table.
pub struct PrimitiveStrategy;

impl Strategy for PrimitiveStrategy {
    fn name(&self) -> &str {
        "primitive"
    }

    fn matches(&self, pair: &TypePair) -> bool {
        match (pair.source.primitive(), pair.destination.primitive()) {
            (Some(from), Some(to)) => convert::is_convertible(from, to),
            _ => false,
        }
    }

    fn build_plan(
        &self,
        source: Expr,
        pair: &TypePair,
        _ctx: &mut SynthContext<'_>,
    ) -> Result<Expr> {
        let target = pair
            .destination
            .primitive()
            .ok_or_else(|| crate::error::Error::mismatch(&pair.source, &pair.destination))?;
        Ok(Expr::call(Intrinsic::Convert(target), vec![source]))
    }
}
