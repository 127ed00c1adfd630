// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Runtime type descriptors.
//!
//! Runtime type manipulation without compile-time type knowledge: every
//! value the engine converts carries (or is declared with) a
//! [`TypeDescriptor`], and all dispatch decisions are taken on descriptors.
//!
//! # Example
//!
//! ```rust
//! use remap::types::{self, ObjectTypeBuilder, PrimitiveKind};
//!
//! let user = ObjectTypeBuilder::new("User")
//!     .field("Id", PrimitiveKind::I32)
//!     .string_field("Name")
//!     .build();
//!
//! assert!(user.member("name").is_some());
//! assert_eq!(types::list_of(&user).name(), "List<User>");
//! ```

mod builder;
mod catalog;
mod descriptor;
mod primitive;

pub use builder::{EnumTypeBuilder, ObjectTypeBuilder};
pub use catalog::{
    any, array_of, close, dictionary, dictionary_shape, list_of, nullable, pair, param, primitive,
    sequence, set_of, string, Substitution, TypeCatalog,
};
pub use descriptor::{
    Capabilities, ConstructorDescriptor, DictionaryShape, DisplayFn, EnumDescriptor, EnumVariant,
    GenericInstance, GenericParam, MemberDescriptor, ObjectDescriptor, ParamDescriptor, ParseFn,
    SequenceShape, TypeDescriptor, TypeKind, TypeRef,
};
pub use primitive::PrimitiveKind;

/// Ordered `(source, destination)` type pair; identity key for plan
/// caching and profile/strategy matching.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypePair {
    pub source: TypeRef,
    pub destination: TypeRef,
}

impl TypePair {
    pub fn new(source: &TypeRef, destination: &TypeRef) -> Self {
        Self {
            source: source.clone(),
            destination: destination.clone(),
        }
    }
}

impl std::fmt::Display for TypePair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({} -> {})", self.source, self.destination)
    }
}
