// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Objects to and from string-keyed dictionaries.
//!
//! Keys are matched against member names case-insensitively and through
//! every naming-case spelling, so `first_name`, `firstName` and
//! `FIRST-NAME` all populate `FirstName`. Missing keys leave the member at
//! its initial value.

use crate::error::{Error, Result};
use crate::ir::{Expr, Intrinsic};
use crate::strategy::Strategy;
use crate::synth::{normalize, SynthContext};
use crate::types::{self, TypeKind, TypePair, TypeRef};
use crate::value::Value;
use std::sync::Arc;

fn string_or_any(ty: &TypeRef) -> bool {
    ty.is_string() || ty.is_any()
}

/// Value type of a string-keyed source, `None` for anything else.
fn keyed_value_type(ty: &TypeRef) -> Option<TypeRef> {
    match ty.kind() {
        TypeKind::Dictionary { key, value, .. } if string_or_any(key) => Some(value.clone()),
        TypeKind::Array { element, rank: 1 } | TypeKind::Sequence { element, .. } => {
            match element.kind() {
                TypeKind::Pair { key, value } if key.is_string() => Some(value.clone()),
                _ => None,
            }
        }
        _ => None,
    }
}

fn lookup(ctx: &SynthContext<'_>, subject: &Expr, dst: &TypeRef, name: &str) -> Expr {
    let metadata = ctx.metadata(dst);
    let names: Arc<[Arc<str>]> = match metadata.position(name) {
        Some(position) => metadata.aliases(position).into(),
        None => vec![Arc::<str>::from(name)].into(),
    };
    Expr::call(Intrinsic::DictLookup(names), vec![subject.clone()])
}

/// String-keyed dictionary (or sequence of string-keyed pairs) into an
/// object.
pub struct MapToObjectStrategy;

impl Strategy for MapToObjectStrategy {
    fn name(&self) -> &str {
        "map-to-object"
    }

    fn matches(&self, pair: &TypePair) -> bool {
        keyed_value_type(&pair.source).is_some()
            && pair.destination.object().is_some()
            && !pair.destination.is_abstract()
    }

    fn build_plan(
        &self,
        source: Expr,
        pair: &TypePair,
        ctx: &mut SynthContext<'_>,
    ) -> Result<Expr> {
        let dst = &pair.destination;
        let value_ty = keyed_value_type(&pair.source)
            .ok_or_else(|| Error::mismatch(&pair.source, dst))?;

        let mut stmts = Vec::new();
        let (binding, subject) = ctx.bind(source);
        stmts.extend(binding);

        // Parameterless constructor when there is one, else the widest one
        // fed from the dictionary.
        let ctors = dst.constructors();
        let mut initialized: Vec<Arc<str>> = Vec::new();
        let construct = if let Some(index) = ctors.iter().position(|c| c.arity() == 0) {
            Expr::New {
                ty: dst.clone(),
                ctor: Some(index),
                args: Vec::new(),
                inits: Vec::new(),
            }
        } else if let Some((index, ctor)) = ctors.iter().enumerate().max_by_key(|(_, c)| c.arity())
        {
            let mut args = Vec::with_capacity(ctor.arity());
            for param in &ctor.params {
                let read = lookup(ctx, &subject, dst, &param.name);
                args.push(ctx.synthesize(read, &TypePair::new(&value_ty, &param.ty))?);
                initialized.push(param.name.clone());
            }
            Expr::New {
                ty: dst.clone(),
                ctor: Some(index),
                args,
                inits: Vec::new(),
            }
        } else {
            Expr::New {
                ty: dst.clone(),
                ctor: None,
                args: Vec::new(),
                inits: Vec::new(),
            }
        };

        let object = ctx.fresh();
        stmts.push(Expr::let_(object, construct));

        for member in dst.members() {
            if !member.writable
                || member.ignored
                || initialized.iter().any(|n| n.eq_ignore_ascii_case(&member.name))
            {
                continue;
            }
            let read = Expr::guard(lookup(ctx, &subject, dst, &member.name));
            let value = ctx.synthesize(read, &TypePair::new(&value_ty, &member.ty))?;
            let stmt = Expr::set(Expr::Var(object), member.name.clone(), value);
            let fallback = Expr::set(
                Expr::Var(object),
                member.name.clone(),
                Expr::Default(member.ty.clone()),
            );
            stmts.push(ctx.hoist(stmt, fallback));
        }

        stmts.push(Expr::Var(object));
        Ok(Expr::Block(stmts))
    }
}

/// Object into a dictionary keyed by member name, spelled in the
/// configured key case.
pub struct ObjectToMapStrategy;

fn map_target(dst: &TypeRef) -> Option<TypeRef> {
    let concrete = normalize::concrete_or_self(dst);
    match concrete.kind() {
        TypeKind::Dictionary { key, .. } if string_or_any(key) => Some(concrete),
        _ => None,
    }
}

impl Strategy for ObjectToMapStrategy {
    fn name(&self) -> &str {
        "object-to-map"
    }

    fn matches(&self, pair: &TypePair) -> bool {
        pair.source.object().is_some() && map_target(&pair.destination).is_some()
    }

    fn build_plan(
        &self,
        source: Expr,
        pair: &TypePair,
        ctx: &mut SynthContext<'_>,
    ) -> Result<Expr> {
        let src = &pair.source;
        let dst = map_target(&pair.destination)
            .ok_or_else(|| Error::mismatch(src, &pair.destination))?;
        let value_ty = types::TypeCatalog::global()
            .element_of(&dst)
            .and_then(|e| match e.kind() {
                TypeKind::Pair { value, .. } => Some(value.clone()),
                _ => None,
            })
            .unwrap_or_else(types::any);
        let case = ctx.config().dictionary_key_case;

        let mut stmts = Vec::new();
        let (binding, subject) = ctx.bind(source);
        stmts.extend(binding);
        let out = ctx.fresh();
        stmts.push(Expr::let_(
            out,
            Expr::call(Intrinsic::NewDict(dst.clone()), vec![]),
        ));

        for member in src.members() {
            if !member.readable || member.ignored {
                continue;
            }
            let read = Expr::get(subject.clone(), member.name.clone());
            let value = ctx.synthesize(read, &TypePair::new(&member.ty, &value_ty))?;
            stmts.push(Expr::call(
                Intrinsic::DictInsert(out),
                vec![
                    Expr::Const(Value::String(case.apply(&member.name))),
                    value,
                ],
            ));
        }

        stmts.push(Expr::Var(out));
        Ok(Expr::Block(stmts))
    }
}
