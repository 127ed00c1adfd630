// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use crate::error::Result;
use crate::ir::{Expr, Intrinsic};
use crate::strategy::Strategy;
use crate::synth::SynthContext;
use crate::types::TypePair;

/// Deep copy of cloneable sources assignable to the destination.
pub struct CloneStrategy;

impl Strategy for CloneStrategy {
    fn name(&self) -> &str {
        "clone"
    }

    fn matches(&self, pair: &TypePair) -> bool {
        pair.source
            .capabilities()
            .is_some_and(|c| c.cloneable)
            && pair.destination.is_assignable_from(&pair.source)
    }

    fn build_plan(
        &self,
        source: Expr,
        _pair: &TypePair,
        _ctx: &mut SynthContext<'_>,
    ) -> Result<Expr> {
        Ok(Expr::call(Intrinsic::CloneObject, vec![source]))
    }
}
