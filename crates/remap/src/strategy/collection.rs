// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Array, sequence and dictionary conversion.

use crate::error::Result;
use crate::ir::{Expr, Intrinsic};
use crate::strategy::Strategy;
use crate::synth::{normalize, SynthContext};
use crate::types::{self, TypeCatalog, TypeKind, TypePair, TypeRef};
use crate::value::Value;

/// Converts any single-dimension enumerable into an array, a concrete
/// list or set, or a hash map. Interface destinations are normalized to
/// their concrete equivalent first; multi-dimensional arrays are rejected.
pub struct CollectionStrategy;

fn is_source(ty: &TypeRef) -> bool {
    match ty.kind() {
        TypeKind::Array { rank, .. } => *rank == 1,
        TypeKind::Sequence { .. } | TypeKind::Dictionary { .. } => true,
        _ => false,
    }
}

fn element(ty: &TypeRef) -> Option<TypeRef> {
    TypeCatalog::global().element_of(ty)
}

impl Strategy for CollectionStrategy {
    fn name(&self) -> &str {
        "collection"
    }

    fn matches(&self, pair: &TypePair) -> bool {
        if !is_source(&pair.source) {
            return false;
        }
        let dst = normalize::concrete_or_self(&pair.destination);
        match dst.kind() {
            TypeKind::Array { rank, .. } => *rank == 1,
            TypeKind::Sequence { .. } => true,
            TypeKind::Dictionary { .. } => element(&pair.source).is_some_and(|e| {
                e.is_any() || matches!(e.kind(), TypeKind::Pair { .. })
            }),
            _ => false,
        }
    }

    fn build_plan(
        &self,
        source: Expr,
        pair: &TypePair,
        ctx: &mut SynthContext<'_>,
    ) -> Result<Expr> {
        let dst = normalize::concrete_or_self(&pair.destination);
        let src_element = element(&pair.source).unwrap_or_else(types::any);
        let dst_element = element(&dst).unwrap_or_else(types::any);
        let is_dict = matches!(dst.kind(), TypeKind::Dictionary { .. });

        let (items, out, index, len, item) =
            (ctx.fresh(), ctx.fresh(), ctx.fresh(), ctx.fresh(), ctx.fresh());
        let converted = ctx.synthesize(
            Expr::Var(item),
            &TypePair::new(&src_element, &dst_element),
        )?;

        let store = if is_dict {
            let (entry, key) = (ctx.fresh(), ctx.fresh());
            Expr::Block(vec![
                Expr::let_(entry, converted),
                Expr::let_(key, Expr::call(Intrinsic::PairKey, vec![Expr::Var(entry)])),
                // Entries whose mapped key is null are dropped.
                Expr::if_(Expr::is_null(Expr::Var(key)), Expr::Continue, None),
                Expr::call(
                    Intrinsic::DictInsert(out),
                    vec![
                        Expr::Var(key),
                        Expr::call(Intrinsic::PairValue, vec![Expr::Var(entry)]),
                    ],
                ),
            ])
        } else {
            Expr::call(Intrinsic::Push(out), vec![converted])
        };

        let create = if is_dict {
            Intrinsic::NewDict(dst.clone())
        } else {
            Intrinsic::NewSeq(dst.clone())
        };

        Ok(Expr::Block(vec![
            Expr::let_(items, Expr::call(Intrinsic::Entries, vec![source])),
            Expr::let_(out, Expr::call(create, vec![])),
            Expr::let_(index, Expr::Const(Value::I64(0))),
            Expr::let_(len, Expr::call(Intrinsic::Len, vec![Expr::Var(items)])),
            Expr::loop_(Expr::Block(vec![
                Expr::if_(
                    Expr::not(Expr::call(
                        Intrinsic::Less,
                        vec![Expr::Var(index), Expr::Var(len)],
                    )),
                    Expr::Break,
                    None,
                ),
                Expr::let_(
                    item,
                    Expr::call(Intrinsic::Item, vec![Expr::Var(items), Expr::Var(index)]),
                ),
                Expr::call(Intrinsic::Increment(index), vec![]),
                store,
            ])),
            Expr::Var(out),
        ]))
    }
}
