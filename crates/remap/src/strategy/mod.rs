// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Conversion strategies.
//!
//! A [`Strategy`] is a stateless conversion rule matched on the shape of a
//! type pair. The registry is ordered and the first matching strategy wins.

mod clone;
mod collection;
mod ctor;
mod enums;
mod fallback;
mod map_like;
mod pair;
mod primitive;
mod text;

pub use clone::CloneStrategy;
pub use collection::CollectionStrategy;
pub use ctor::ConstructorStrategy;
pub use enums::EnumStrategy;
pub use fallback::ReflectionStrategy;
pub use map_like::{MapToObjectStrategy, ObjectToMapStrategy};
pub use pair::PairStrategy;
pub use primitive::PrimitiveStrategy;
pub use text::{ParseStrategy, ToStringStrategy};

use crate::error::Result;
use crate::ir::Expr;
use crate::synth::SynthContext;
use crate::types::TypePair;
use std::sync::Arc;

/// Conversion rule over a type pair.
pub trait Strategy: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    fn matches(&self, pair: &TypePair) -> bool;

    /// Expression converting the non-null `source` into
    /// `pair.destination`.
    fn build_plan(&self, source: Expr, pair: &TypePair, ctx: &mut SynthContext<'_>)
        -> Result<Expr>;
}

/// Ordered strategy list.
#[derive(Clone, Default)]
pub struct StrategyRegistry {
    strategies: Vec<Arc<dyn Strategy>>,
}

impl StrategyRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in catalogue in priority order.
    pub fn builtin() -> Self {
        let strategies: Vec<Arc<dyn Strategy>> = vec![
            Arc::new(CollectionStrategy),
            Arc::new(PrimitiveStrategy),
            Arc::new(ToStringStrategy),
            Arc::new(ParseStrategy),
            Arc::new(EnumStrategy),
            Arc::new(PairStrategy),
            Arc::new(ConstructorStrategy),
            Arc::new(MapToObjectStrategy),
            Arc::new(ObjectToMapStrategy),
            Arc::new(CloneStrategy),
            Arc::new(ReflectionStrategy),
        ];
        Self { strategies }
    }

    /// Append after every registered strategy.
    pub fn push(&mut self, strategy: Arc<dyn Strategy>) {
        self.strategies.push(strategy);
    }

    /// Insert ahead of every registered strategy.
    pub fn prepend(&mut self, strategy: Arc<dyn Strategy>) {
        self.strategies.insert(0, strategy);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Strategy>> {
        self.strategies.iter()
    }

    /// First strategy matching `pair`.
    pub fn find(&self, pair: &TypePair) -> Option<&Arc<dyn Strategy>> {
        self.strategies.iter().find(|s| s.matches(pair))
    }

    pub fn names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

impl std::fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
