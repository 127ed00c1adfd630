// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Null-guard hoisting.
//!
//! A member assignment statement may read through several nullable source
//! accesses, each marked with [`Expr::Guard`]. The pass binds every guarded
//! access to a fresh variable (inner accesses first) and nests the statement
//! inside one conditional per binding:
//!
//! ```text
//! dst.City = source.Address?.City?
//!
//! let v1 = source.Address
//! if !(v1 == null) then {
//!     let v2 = v1.City
//!     if !(v2 == null) then dst.City = v2 [else fallback]
//! } [else fallback]
//! ```
//!
//! Guards inside loop bodies and conditional branches belong to their own
//! statements and are left in place.

use crate::config::NullPolicy;
use crate::ir::{Expr, VarAllocator, VarId};

/// Hoist the guards of `stmt`. Under [`NullPolicy::Permissive`] each
/// conditional runs `fallback` when its binding is null; under
/// [`NullPolicy::Strict`] the statement is skipped.
pub fn hoist_guards(
    stmt: Expr,
    policy: NullPolicy,
    fallback: Expr,
    vars: &mut VarAllocator,
) -> Expr {
    let mut bound = Vec::new();
    let body = lift(stmt, &mut bound, vars);
    if bound.is_empty() {
        return body;
    }

    let otherwise = match policy {
        NullPolicy::Strict => None,
        NullPolicy::Permissive => Some(fallback),
    };

    bound.into_iter().rev().fold(body, |inner, (var, value)| {
        Expr::Block(vec![
            Expr::let_(var, value),
            Expr::if_(
                Expr::not(Expr::is_null(Expr::Var(var))),
                inner,
                otherwise.clone(),
            ),
        ])
    })
}

fn lift(expr: Expr, bound: &mut Vec<(VarId, Expr)>, vars: &mut VarAllocator) -> Expr {
    match expr {
        Expr::Guard(inner) => {
            let inner = lift(*inner, bound, vars);
            let var = vars.fresh();
            bound.push((var, inner));
            Expr::Var(var)
        }
        Expr::Let(id, value) => Expr::Let(id, Box::new(lift(*value, bound, vars))),
        Expr::Block(items) => Expr::Block(
            items
                .into_iter()
                .map(|e| lift(e, bound, vars))
                .collect(),
        ),
        Expr::If {
            cond,
            then,
            otherwise,
        } => Expr::If {
            cond: Box::new(lift(*cond, bound, vars)),
            then,
            otherwise,
        },
        Expr::IsNull(e) => Expr::IsNull(Box::new(lift(*e, bound, vars))),
        Expr::Not(e) => Expr::Not(Box::new(lift(*e, bound, vars))),
        Expr::Get { target, member } => Expr::Get {
            target: Box::new(lift(*target, bound, vars)),
            member,
        },
        Expr::Set {
            target,
            member,
            value,
        } => Expr::Set {
            target: Box::new(lift(*target, bound, vars)),
            member,
            value: Box::new(lift(*value, bound, vars)),
        },
        Expr::Call { op, args } => Expr::Call {
            op,
            args: args.into_iter().map(|e| lift(e, bound, vars)).collect(),
        },
        Expr::New {
            ty,
            ctor,
            args,
            inits,
        } => Expr::New {
            ty,
            ctor,
            args: args.into_iter().map(|e| lift(e, bound, vars)).collect(),
            inits: inits
                .into_iter()
                .map(|(name, e)| (name, lift(e, bound, vars)))
                .collect(),
        },
        other @ (Expr::Loop(_)
        | Expr::Source
        | Expr::Const(_)
        | Expr::Default(_)
        | Expr::Var(_)
        | Expr::Break
        | Expr::Continue) => other,
    }
}
