// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use crate::error::Result;
use crate::ir::Expr;
use crate::strategy::Strategy;
use crate::synth::{members, SynthContext};
use crate::types::TypePair;

/// Member-by-member object mapping by name. Last in the built-in order.
pub struct ReflectionStrategy;

impl Strategy for ReflectionStrategy {
    fn name(&self) -> &str {
        "reflection"
    }

    fn matches(&self, pair: &TypePair) -> bool {
        pair.source.object().is_some()
            && pair.destination.object().is_some()
            && !pair.destination.is_abstract()
    }

    fn build_plan(
        &self,
        source: Expr,
        pair: &TypePair,
        ctx: &mut SynthContext<'_>,
    ) -> Result<Expr> {
        members::build_object(ctx, source, pair, None)
    }
}
