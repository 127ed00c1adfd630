// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Abstract destination normalization.
//!
//! Collection interfaces are rewritten to the concrete type that
//! implements them: every sequence interface becomes `List<T>` and every
//! dictionary interface becomes `Dictionary<K, V>`. Non-generic interfaces
//! use `Object` for their element, key and value types.

use crate::types::{self, DictionaryShape, SequenceShape, TypeKind, TypeRef};

/// Concrete constructible equivalent of an abstract collection type.
/// `None` for every other type, including concrete collections.
pub fn concrete(ty: &TypeRef) -> Option<TypeRef> {
    match ty.kind() {
        TypeKind::Sequence { shape, element } if shape.is_abstract() => {
            Some(types::sequence(SequenceShape::List, element))
        }
        TypeKind::Dictionary { shape, key, value } if shape.is_abstract() => Some(
            types::dictionary_shape(DictionaryShape::HashMap, key, value),
        ),
        _ => None,
    }
}

/// `ty` itself when already concrete.
pub fn concrete_or_self(ty: &TypeRef) -> TypeRef {
    concrete(ty).unwrap_or_else(|| ty.clone())
}
