// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Recursive plan synthesis.

use crate::config::{DepthMode, MapperConfig};
use crate::error::{Error, Result};
use crate::ir::{hoist_guards, Expr, Intrinsic, Plan, VarAllocator, VarId};
use crate::mapper::Registry;
use crate::metadata::TypeMetadata;
use crate::synth::{members, normalize};
use crate::types::{TypeKind, TypePair, TypeRef};
use std::sync::Arc;

/// State of one plan compilation.
pub struct SynthContext<'a> {
    registry: &'a Registry,
    vars: VarAllocator,
}

impl<'a> SynthContext<'a> {
    pub(crate) fn new(registry: &'a Registry) -> Self {
        Self {
            registry,
            vars: VarAllocator::default(),
        }
    }

    /// Compile the plan for `pair`, rooted at the plan source.
    pub(crate) fn compile(registry: &'a Registry, pair: &TypePair) -> Result<Plan> {
        let mut ctx = Self::new(registry);
        let body = ctx.synthesize(Expr::Source, pair)?;
        Ok(Plan::new(pair.clone(), body, ctx.vars.count()))
    }

    pub fn config(&self) -> &MapperConfig {
        &self.registry.config
    }

    /// Cached member lookup tables of `ty`.
    pub fn metadata(&self, ty: &TypeRef) -> Arc<TypeMetadata> {
        self.registry.metadata.get(ty)
    }

    pub fn fresh(&mut self) -> VarId {
        self.vars.fresh()
    }

    /// Bind `expr` to a variable unless it is already trivial to re-read.
    pub fn bind(&mut self, expr: Expr) -> (Option<Expr>, Expr) {
        if expr.is_trivial() {
            return (None, expr);
        }
        let var = self.fresh();
        (Some(Expr::let_(var, expr)), Expr::Var(var))
    }

    /// Hoist the null guards of a member statement under the configured
    /// null policy.
    pub fn hoist(&mut self, stmt: Expr, fallback: Expr) -> Expr {
        let policy = self.registry.config.null_policy;
        hoist_guards(stmt, policy, fallback, &mut self.vars)
    }

    /// Expression converting `source` (of type `pair.source`) into a value
    /// of type `pair.destination`.
    pub fn synthesize(&mut self, source: Expr, pair: &TypePair) -> Result<Expr> {
        let (src, dst) = (&pair.source, &pair.destination);

        if src == dst && is_identity_type(src) {
            return Ok(source);
        }

        if let Some(inner) = dst.nullable_inner() {
            let lifted = TypePair::new(src, inner);
            if src.nullable_inner().is_none() {
                return self.synthesize(source, &lifted);
            }
            let inner_src = src.nullable_inner().cloned().unwrap_or_else(|| src.clone());
            return self.null_checked(source, Expr::Const(crate::value::Value::Null), |ctx, v| {
                ctx.synthesize(v, &TypePair::new(&inner_src, inner))
            });
        }

        if let Some(inner) = src.nullable_inner().cloned() {
            let dst = dst.clone();
            return self.null_checked(source, Expr::Default(dst.clone()), |ctx, v| {
                ctx.synthesize(v, &TypePair::new(&inner, &dst))
            });
        }

        if src.is_any() {
            if dst.is_any() {
                return Ok(source);
            }
            return Ok(Expr::call(Intrinsic::MapRuntime(dst.clone()), vec![source]));
        }

        if src.can_be_null() {
            let fallback = Expr::Default(dst.clone());
            return self.null_checked(source, fallback, |ctx, v| ctx.dispatch(v, pair));
        }
        self.dispatch(source, pair)
    }

    /// Bind `source`, yield `fallback` when it is null and `build` otherwise.
    fn null_checked(
        &mut self,
        source: Expr,
        fallback: Expr,
        build: impl FnOnce(&mut Self, Expr) -> Result<Expr>,
    ) -> Result<Expr> {
        let (binding, subject) = self.bind(source);
        let body = build(self, subject.clone())?;
        let checked = Expr::if_(Expr::is_null(subject), fallback, Some(body));
        Ok(match binding {
            Some(binding) => Expr::Block(vec![binding, checked]),
            None => checked,
        })
    }

    /// Profiles, depth rule, strategies, then normalization. `subject` is
    /// known to be non-null here.
    fn dispatch(&mut self, subject: Expr, pair: &TypePair) -> Result<Expr> {
        let registry = self.registry;
        let (src, dst) = (&pair.source, &pair.destination);

        if !dst.is_value_type() {
            if let Some(found) = registry.profiles.lookup(pair) {
                log::trace!("[remap] {} uses profile {}", pair, found.authored);
                return members::build_object(self, subject, &found.target, Some(&found));
            }
        }

        if registry.config.depth == DepthMode::Shallow
            && !dst.is_value_type()
            && dst.is_assignable_from(src)
        {
            return Ok(subject);
        }

        for strategy in registry.strategies.iter() {
            if strategy.matches(pair) {
                log::trace!("[remap] {} uses strategy {}", pair, strategy.name());
                return strategy.build_plan(subject, pair, self);
            }
        }

        if let Some(concrete) = normalize::concrete(dst) {
            return self.dispatch(subject, &TypePair::new(src, &concrete));
        }

        if dst.is_any() {
            return Ok(subject);
        }

        if dst.is_abstract() {
            return Err(Error::NoRoute {
                destination: dst.to_string(),
            });
        }

        Err(Error::mismatch(src, dst))
    }
}

/// Same-type pairs of these types map to the source itself.
fn is_identity_type(ty: &TypeRef) -> bool {
    match ty.kind() {
        TypeKind::Primitive(_) | TypeKind::Enum(_) => true,
        TypeKind::Nullable(inner) => is_identity_type(inner),
        TypeKind::Pair { key, value } => is_identity_type(key) && is_identity_type(value),
        _ => false,
    }
}
