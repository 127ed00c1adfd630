// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use crate::types::TypeRef;
use std::fmt;
use std::sync::Arc;

/// Custom refinement over the concrete type arguments of a family match.
pub type TypePredicate = Arc<dyn Fn(&[TypeRef]) -> bool + Send + Sync>;

/// Requirement on one generic argument slot.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotConstraint {
    Unconstrained,
    ValueType,
    /// Reference (nullable-by-nature) type.
    Reference,
    Enum,
    Nullable,
    /// Nullable wrapper around an enum.
    NullableEnum,
    /// Assignable to the given type (the type itself or a subtype).
    DerivesFrom(TypeRef),
}

impl SlotConstraint {
    pub fn holds(&self, ty: &TypeRef) -> bool {
        match self {
            SlotConstraint::Unconstrained => true,
            SlotConstraint::ValueType => ty.is_value_type(),
            SlotConstraint::Reference => !ty.is_value_type(),
            SlotConstraint::Enum => ty.is_enum(),
            SlotConstraint::Nullable => ty.nullable_inner().is_some(),
            SlotConstraint::NullableEnum => ty.nullable_inner().is_some_and(|i| i.is_enum()),
            SlotConstraint::DerivesFrom(base) => base.is_assignable_from(ty),
        }
    }
}

/// Per-slot constraints of a generic-family profile, in parameter index
/// order, plus an optional predicate over all arguments.
#[derive(Clone, Default)]
pub struct GenericConstraint {
    slots: Vec<SlotConstraint>,
    predicate: Option<TypePredicate>,
}

impl GenericConstraint {
    pub fn new(slots: Vec<SlotConstraint>) -> Self {
        Self {
            slots,
            predicate: None,
        }
    }

    pub fn with_predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&[TypeRef]) -> bool + Send + Sync + 'static,
    {
        self.predicate = Some(Arc::new(predicate));
        self
    }

    pub fn slots(&self) -> &[SlotConstraint] {
        &self.slots
    }

    /// Every slot holds for its argument and the predicate, when present,
    /// accepts the arguments.
    pub fn satisfied(&self, args: &[TypeRef]) -> bool {
        if self.slots.len() > args.len() {
            return false;
        }
        self.slots.iter().zip(args).all(|(slot, arg)| slot.holds(arg))
            && self.predicate.as_ref().map_or(true, |p| p(args))
    }
}

impl fmt::Debug for GenericConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenericConstraint")
            .field("slots", &self.slots)
            .field("predicate", &self.predicate.is_some())
            .finish()
    }
}
