// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use crate::error::{Error, Result};
use crate::ir::Expr;
use crate::strategy::Strategy;
use crate::synth::SynthContext;
use crate::types::{ConstructorDescriptor, TypePair, TypeRef};

/// Wraps the source in a destination constructed through a
/// single-parameter constructor accepting the source type.
pub struct ConstructorStrategy;

fn wrapping_ctor(src: &TypeRef, dst: &TypeRef) -> Option<usize> {
    if dst.object().is_none() || dst.is_abstract() {
        return None;
    }
    dst.constructors()
        .iter()
        .position(|c: &ConstructorDescriptor| {
            c.arity() == 1 && c.params[0].ty.is_assignable_from(src)
        })
}

impl Strategy for ConstructorStrategy {
    fn name(&self) -> &str {
        "constructor"
    }

    fn matches(&self, pair: &TypePair) -> bool {
        wrapping_ctor(&pair.source, &pair.destination).is_some()
    }

    fn build_plan(
        &self,
        source: Expr,
        pair: &TypePair,
        _ctx: &mut SynthContext<'_>,
    ) -> Result<Expr> {
        let index = wrapping_ctor(&pair.source, &pair.destination)
            .ok_or_else(|| Error::mismatch(&pair.source, &pair.destination))?;
        Ok(Expr::New {
            ty: pair.destination.clone(),
            ctor: Some(index),
            args: vec![source],
            inits: Vec::new(),
        })
    }
}
