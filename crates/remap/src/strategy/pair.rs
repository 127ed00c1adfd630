// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use crate::error::{Error, Result};
use crate::ir::{Expr, Intrinsic};
use crate::strategy::Strategy;
use crate::synth::SynthContext;
use crate::types::{TypeKind, TypePair};

/// `Pair<K1, V1>` into `Pair<K2, V2>`, mapping key and value recursively.
pub struct PairStrategy;

impl Strategy for PairStrategy {
    fn name(&self) -> &str {
        "pair"
    }

    fn matches(&self, pair: &TypePair) -> bool {
        matches!(
            (pair.source.kind(), pair.destination.kind()),
            (TypeKind::Pair { .. }, TypeKind::Pair { .. })
        )
    }

    fn build_plan(
        &self,
        source: Expr,
        pair: &TypePair,
        ctx: &mut SynthContext<'_>,
    ) -> Result<Expr> {
        let (TypeKind::Pair { key: k1, value: v1 }, TypeKind::Pair { key: k2, value: v2 }) =
            (pair.source.kind(), pair.destination.kind())
        else {
            return Err(Error::mismatch(&pair.source, &pair.destination));
        };

        let (binding, subject) = ctx.bind(source);
        let key = ctx.synthesize(
            Expr::call(Intrinsic::PairKey, vec![subject.clone()]),
            &TypePair::new(k1, k2),
        )?;
        let value = ctx.synthesize(
            Expr::call(Intrinsic::PairValue, vec![subject]),
            &TypePair::new(v1, v2),
        )?;

        let make = Expr::call(
            Intrinsic::MakePair(pair.destination.clone()),
            vec![key, value],
        );
        Ok(match binding {
            Some(binding) => Expr::Block(vec![binding, make]),
            None => make,
        })
    }
}
