// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent builder API for object and enum type descriptors.

use crate::types::{
    list_of, Capabilities, ConstructorDescriptor, DisplayFn, EnumDescriptor, EnumVariant,
    GenericInstance, MemberDescriptor, ObjectDescriptor, ParamDescriptor, ParseFn, PrimitiveKind,
    TypeDescriptor, TypeKind, TypeRef,
};
use crate::value::Value;
use std::sync::Arc;

/// Builder for object type descriptors.
#[derive(Debug)]
pub struct ObjectTypeBuilder {
    name: String,
    members: Vec<MemberDescriptor>,
    constructors: Vec<ConstructorDescriptor>,
    implicit_constructor: bool,
    base: Option<TypeRef>,
    value_type: bool,
    abstract_type: bool,
    capabilities: Capabilities,
    generic_params: Vec<TypeRef>,
}

impl ObjectTypeBuilder {
    /// Create a new builder for an object type. `name` is the type's
    /// identity and must not be reused for a different shape.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
            constructors: Vec::new(),
            implicit_constructor: true,
            base: None,
            value_type: false,
            abstract_type: false,
            capabilities: Capabilities::default(),
            generic_params: Vec::new(),
        }
    }

    /// Add a read/write member.
    pub fn member(self, name: impl Into<Arc<str>>, ty: TypeRef) -> Self {
        self.member_with(MemberDescriptor::new(name, ty))
    }

    /// Add a primitive read/write member.
    pub fn field(self, name: impl Into<Arc<str>>, kind: PrimitiveKind) -> Self {
        self.member(name, crate::types::primitive(kind))
    }

    /// Add a string member.
    pub fn string_field(self, name: impl Into<Arc<str>>) -> Self {
        self.field(name, PrimitiveKind::String)
    }

    /// Add a get-only member.
    pub fn read_only_member(self, name: impl Into<Arc<str>>, ty: TypeRef) -> Self {
        self.member_with(MemberDescriptor::new(name, ty).read_only())
    }

    /// Add a get-only `List<element>` member that starts out empty and is
    /// populated through its add operation.
    pub fn collection_member(self, name: impl Into<Arc<str>>, element: &TypeRef) -> Self {
        let ty = list_of(element);
        let initial = Value::empty_seq(&ty);
        self.member_with(
            MemberDescriptor::new(name, ty)
                .read_only()
                .with_initial(initial),
        )
    }

    /// Add a fully specified member. Replaces an inherited member of the
    /// same name.
    pub fn member_with(mut self, member: MemberDescriptor) -> Self {
        self.members.retain(|m| m.name != member.name);
        self.members.push(member);
        self
    }

    /// Declare a constructor; parameters bind to same-named members.
    pub fn constructor<N: Into<Arc<str>>>(mut self, params: Vec<(N, TypeRef)>) -> Self {
        let params = params
            .into_iter()
            .map(|(name, ty)| ParamDescriptor::new(name, ty))
            .collect();
        self.constructors.push(ConstructorDescriptor::new(params));
        self
    }

    /// Declare an explicit parameterless constructor.
    pub fn default_constructor(mut self) -> Self {
        self.constructors.push(ConstructorDescriptor::default());
        self
    }

    /// Suppress the implicit parameterless constructor added when no
    /// constructor is declared.
    pub fn no_implicit_constructor(mut self) -> Self {
        self.implicit_constructor = false;
        self
    }

    /// Derive from `base`; base members are inherited.
    pub fn base(mut self, base: &TypeRef) -> Self {
        let mut inherited = base.members().to_vec();
        for own in self.members.drain(..) {
            inherited.retain(|m| m.name != own.name);
            inherited.push(own);
        }
        self.members = inherited;
        self.base = Some(base.clone());
        self
    }

    /// Value-type (struct) semantics.
    pub fn value_type(mut self) -> Self {
        self.value_type = true;
        self
    }

    pub fn abstract_type(mut self) -> Self {
        self.abstract_type = true;
        self
    }

    /// Expose a deep-clone capability.
    pub fn cloneable(mut self) -> Self {
        self.capabilities.cloneable = true;
        self
    }

    /// Expose a `ToString`-like capability.
    pub fn display(mut self, display: DisplayFn) -> Self {
        self.capabilities.display = Some(display);
        self
    }

    /// Expose a static parse capability.
    pub fn parse(mut self, parse: ParseFn) -> Self {
        self.capabilities.parse = Some(parse);
        self
    }

    /// Make this an open generic definition over `params`
    /// (see [`param`](crate::types::param)).
    pub fn generic_params(mut self, params: Vec<TypeRef>) -> Self {
        self.generic_params = params;
        self
    }

    /// Build the descriptor.
    pub fn build(mut self) -> TypeRef {
        if self.constructors.is_empty() && self.implicit_constructor && !self.abstract_type {
            self.constructors.push(ConstructorDescriptor::default());
        }
        let (name, generic) = if self.generic_params.is_empty() {
            (self.name, None)
        } else {
            let params: Vec<&str> = self.generic_params.iter().map(|p| p.name()).collect();
            let full = format!("{}<{}>", self.name, params.join(", "));
            let generic = GenericInstance {
                definition: Arc::from(self.name.as_str()),
                args: self.generic_params,
                open: None,
            };
            (full, Some(generic))
        };
        Arc::new(TypeDescriptor::new(
            name,
            TypeKind::Object(ObjectDescriptor {
                members: self.members,
                constructors: self.constructors,
                base: self.base,
                value_type: self.value_type,
                abstract_type: self.abstract_type,
                capabilities: self.capabilities,
                generic,
            }),
        ))
    }
}

/// Builder for enum types.
#[derive(Debug)]
pub struct EnumTypeBuilder {
    name: String,
    variants: Vec<EnumVariant>,
    next_value: i64,
    underlying: PrimitiveKind,
}

impl EnumTypeBuilder {
    /// Create a new enum builder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variants: Vec::new(),
            next_value: 0,
            underlying: PrimitiveKind::I32,
        }
    }

    /// Add a variant with auto-incrementing value.
    pub fn variant(mut self, name: impl Into<Arc<str>>) -> Self {
        self.variants.push(EnumVariant::new(name, self.next_value));
        self.next_value += 1;
        self
    }

    /// Add a variant with explicit value.
    pub fn variant_value(mut self, name: impl Into<Arc<str>>, value: i64) -> Self {
        self.variants.push(EnumVariant::new(name, value));
        self.next_value = value + 1;
        self
    }

    /// Add an alias to the most recently declared variant.
    pub fn alias(mut self, alias: impl Into<Arc<str>>) -> Self {
        if let Some(last) = self.variants.pop() {
            self.variants.push(last.with_alias(alias));
        }
        self
    }

    /// Set underlying integral type.
    pub fn underlying(mut self, kind: PrimitiveKind) -> Self {
        self.underlying = kind;
        self
    }

    /// Build the descriptor.
    pub fn build(self) -> TypeRef {
        let desc = EnumDescriptor::new(self.variants).with_underlying(self.underlying);
        Arc::new(TypeDescriptor::new(self.name, TypeKind::Enum(desc)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types;

    #[test]
    fn test_name_is_identity() {
        let first = ObjectTypeBuilder::new("Badge").string_field("Id").build();
        let rebuilt = ObjectTypeBuilder::new("Badge").string_field("Id").build();
        assert!(!Arc::ptr_eq(&first, &rebuilt));
        assert_eq!(first, rebuilt);
        assert_eq!(
            crate::types::TypePair::new(&first, &types::string()),
            crate::types::TypePair::new(&rebuilt, &types::string())
        );
    }

    #[test]
    fn test_object_builder_members_and_ctor() {
        let ty = ObjectTypeBuilder::new("User")
            .field("Id", PrimitiveKind::I32)
            .string_field("Name")
            .build();
        assert_eq!(ty.members().len(), 2);
        assert_eq!(ty.constructors().len(), 1);
        assert_eq!(ty.constructors()[0].arity(), 0);
        assert!(ty.member("name").is_some());
    }

    #[test]
    fn test_base_members_are_inherited() {
        let base = ObjectTypeBuilder::new("Entity")
            .field("Id", PrimitiveKind::I64)
            .build();
        let derived = ObjectTypeBuilder::new("Customer")
            .string_field("Name")
            .base(&base)
            .build();
        let names: Vec<&str> = derived.members().iter().map(|m| &*m.name).collect();
        assert_eq!(names, vec!["Id", "Name"]);
        assert!(derived.is_subtype_of(&base));
        assert!(base.is_assignable_from(&derived));
    }

    #[test]
    fn test_collection_member_is_add_target() {
        let ty = ObjectTypeBuilder::new("Bag")
            .collection_member("Items", &types::string())
            .build();
        let member = ty.member("Items").expect("member");
        assert!(!member.writable);
        assert_eq!(member.add_target().map(|t| t.name()), Some("String"));
        assert!(matches!(member.initial_value(), Value::Seq(_)));
    }

    #[test]
    fn test_enum_builder_values() {
        let ty = EnumTypeBuilder::new("Level")
            .variant("Low")
            .variant_value("High", 10)
            .alias("hi")
            .variant("Max")
            .underlying(PrimitiveKind::U8)
            .build();
        let desc = ty.enum_descriptor().expect("enum");
        assert_eq!(desc.variant_by_name("max").map(|v| v.value), Some(11));
        assert_eq!(desc.variant_by_name("HI").map(|v| v.value), Some(10));
        assert_eq!(desc.underlying, PrimitiveKind::U8);
    }

    #[test]
    fn test_abstract_has_no_implicit_ctor() {
        let ty = ObjectTypeBuilder::new("Shape").abstract_type().build();
        assert!(ty.is_abstract());
        assert!(ty.constructors().is_empty());
    }
}
