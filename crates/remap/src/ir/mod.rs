// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Intermediate representation of conversion plans.
//!
//! A plan is an [`Expr`] tree producing a destination value from the
//! plan's source value. Plans are built once per type pair by the
//! synthesizer, rewritten by [`hoist_guards`] and executed by a
//! tree-walking interpreter.

mod expr;
mod interp;
mod rewrite;

pub use expr::{Callback, Expr, Intrinsic, SourceFn, VarId};
pub use interp::Runtime;
pub(crate) use interp::{enum_from_name, enum_from_raw};
pub use rewrite::hoist_guards;

use crate::error::Result;
use crate::types::TypePair;
use crate::value::Value;
use interp::Interpreter;

/// Hands out variable slots for one plan.
#[derive(Debug, Default)]
pub struct VarAllocator {
    next: VarId,
}

impl VarAllocator {
    pub fn new(first: VarId) -> Self {
        Self { next: first }
    }

    pub fn fresh(&mut self) -> VarId {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Slots handed out so far.
    pub fn count(&self) -> usize {
        self.next
    }
}

/// Compiled, immutable conversion plan for one type pair.
#[derive(Debug)]
pub struct Plan {
    pair: TypePair,
    body: Expr,
    slots: usize,
}

impl Plan {
    pub fn new(pair: TypePair, body: Expr, slots: usize) -> Self {
        Self { pair, body, slots }
    }

    pub fn pair(&self) -> &TypePair {
        &self.pair
    }

    pub fn body(&self) -> &Expr {
        &self.body
    }

    /// Size of the variable frame.
    pub fn slots(&self) -> usize {
        self.slots
    }

    /// Run the plan against `source`.
    pub fn execute(&self, source: &Value, runtime: &dyn Runtime) -> Result<Value> {
        Interpreter::new(self.slots, source, runtime).run(&self.body)
    }
}
