// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type descriptors for runtime type information.
//!
//! A [`TypeDescriptor`] is the language-neutral summary of a runtime type's
//! shape. All strategy and profile matching operates on descriptors; a
//! descriptor's identity is its canonical name.

use crate::error::Result;
use crate::types::PrimitiveKind;
use crate::value::Value;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Shared handle to a type descriptor.
pub type TypeRef = Arc<TypeDescriptor>;

/// Display capability (`ToString`-like) of an object type.
pub type DisplayFn = Arc<dyn Fn(&Value) -> String + Send + Sync>;

/// Static parse capability of an object type.
pub type ParseFn = Arc<dyn Fn(&str) -> Result<Value> + Send + Sync>;

/// Shape of a sequence type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SequenceShape {
    /// Concrete ordered list.
    List,
    /// Concrete de-duplicating set.
    Set,
    Enumerable,
    Collection,
    ListInterface,
    ReadOnlyCollection,
    ReadOnlyList,
    NonGenericEnumerable,
    NonGenericCollection,
    NonGenericList,
}

impl SequenceShape {
    /// Generic definition name.
    pub fn definition(&self) -> &'static str {
        match self {
            Self::List => "List",
            Self::Set => "HashSet",
            Self::Enumerable | Self::NonGenericEnumerable => "IEnumerable",
            Self::Collection | Self::NonGenericCollection => "ICollection",
            Self::ListInterface | Self::NonGenericList => "IList",
            Self::ReadOnlyCollection => "IReadOnlyCollection",
            Self::ReadOnlyList => "IReadOnlyList",
        }
    }

    pub fn is_generic(&self) -> bool {
        !matches!(
            self,
            Self::NonGenericEnumerable | Self::NonGenericCollection | Self::NonGenericList
        )
    }

    pub fn is_abstract(&self) -> bool {
        !matches!(self, Self::List | Self::Set)
    }

    /// Whether a sequence of shape `self` can be viewed as `other`.
    pub fn implements(&self, other: SequenceShape) -> bool {
        use SequenceShape::*;
        if *self == other {
            return true;
        }
        let generic_ok = match (self, other.erased()) {
            (List, _) => true,
            (Set, Enumerable | Collection | ReadOnlyCollection) => true,
            (ListInterface, Enumerable | Collection) => true,
            (Collection, Enumerable) => true,
            (ReadOnlyList, Enumerable | ReadOnlyCollection) => true,
            (ReadOnlyCollection, Enumerable) => true,
            _ => false,
        };
        // Non-generic interfaces are only reachable through the generic ones
        // a concrete type also implements.
        if !other.is_generic() {
            return match other {
                NonGenericEnumerable => true,
                NonGenericCollection | NonGenericList => matches!(self, List),
                _ => false,
            };
        }
        generic_ok
    }

    fn erased(&self) -> SequenceShape {
        match self {
            Self::NonGenericEnumerable => Self::Enumerable,
            Self::NonGenericCollection => Self::Collection,
            Self::NonGenericList => Self::ListInterface,
            other => *other,
        }
    }
}

/// Shape of a dictionary type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DictionaryShape {
    /// Concrete hash map.
    HashMap,
    Interface,
    ReadOnly,
    NonGeneric,
}

impl DictionaryShape {
    pub fn definition(&self) -> &'static str {
        match self {
            Self::HashMap => "Dictionary",
            Self::Interface | Self::NonGeneric => "IDictionary",
            Self::ReadOnly => "IReadOnlyDictionary",
        }
    }

    pub fn is_abstract(&self) -> bool {
        !matches!(self, Self::HashMap)
    }
}

/// Open generic placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GenericParam {
    pub name: Arc<str>,
    /// Slot position within the owning generic definition.
    pub index: usize,
}

/// Generic instance information of an object type.
#[derive(Debug, Clone)]
pub struct GenericInstance {
    /// Definition name without arguments (`"Page"`).
    pub definition: Arc<str>,
    /// Type arguments (`Param` slots for the definition itself).
    pub args: Vec<TypeRef>,
    /// Open definition this instance was closed from.
    pub open: Option<TypeRef>,
}

/// Type kind enumeration.
#[derive(Debug, Clone)]
pub enum TypeKind {
    /// Universal "object" type.
    Any,
    Primitive(PrimitiveKind),
    Enum(EnumDescriptor),
    /// Nullable value type.
    Nullable(TypeRef),
    /// Array; `rank > 1` is multi-dimensional.
    Array { element: TypeRef, rank: u8 },
    Sequence {
        shape: SequenceShape,
        element: TypeRef,
    },
    Dictionary {
        shape: DictionaryShape,
        key: TypeRef,
        value: TypeRef,
    },
    /// Key/value pair.
    Pair { key: TypeRef, value: TypeRef },
    /// Plain object with members.
    Object(ObjectDescriptor),
    Param(GenericParam),
}

/// A complete type descriptor.
///
/// Identity is the canonical name: equality, hashing, the plan cache and
/// the metadata cache all key on it. Each name must describe one shape per
/// process; building a second, different descriptor under a name already
/// mapped reuses the plans and member positions cached for the first.
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    name: Arc<str>,
    kind: TypeKind,
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for TypeDescriptor {}

impl Hash for TypeDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl TypeDescriptor {
    /// Create a new type descriptor.
    pub fn new(name: impl Into<Arc<str>>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Canonical type name (identity).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn name_arc(&self) -> &Arc<str> {
        &self.name
    }

    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    pub fn is_any(&self) -> bool {
        matches!(self.kind, TypeKind::Any)
    }

    pub fn primitive(&self) -> Option<PrimitiveKind> {
        match self.kind {
            TypeKind::Primitive(kind) => Some(kind),
            _ => None,
        }
    }

    pub fn is_string(&self) -> bool {
        self.primitive() == Some(PrimitiveKind::String)
    }

    pub fn enum_descriptor(&self) -> Option<&EnumDescriptor> {
        match &self.kind {
            TypeKind::Enum(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_enum(&self) -> bool {
        self.enum_descriptor().is_some()
    }

    pub fn object(&self) -> Option<&ObjectDescriptor> {
        match &self.kind {
            TypeKind::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Inner type of a nullable value type.
    pub fn nullable_inner(&self) -> Option<&TypeRef> {
        match &self.kind {
            TypeKind::Nullable(inner) => Some(inner),
            _ => None,
        }
    }

    pub fn is_value_type(&self) -> bool {
        match &self.kind {
            TypeKind::Primitive(kind) => kind.is_value_type(),
            TypeKind::Enum(_) | TypeKind::Nullable(_) | TypeKind::Pair { .. } => true,
            TypeKind::Object(o) => o.value_type,
            _ => false,
        }
    }

    /// Whether a value of this type may be null.
    pub fn can_be_null(&self) -> bool {
        !self.is_value_type() || self.nullable_inner().is_some()
    }

    /// Types that cannot be constructed directly.
    pub fn is_abstract(&self) -> bool {
        match &self.kind {
            TypeKind::Sequence { shape, .. } => shape.is_abstract(),
            TypeKind::Dictionary { shape, .. } => shape.is_abstract(),
            TypeKind::Object(o) => o.abstract_type,
            TypeKind::Param(_) => true,
            _ => false,
        }
    }

    /// Whether this type mentions an unbound generic parameter.
    pub fn is_open(&self) -> bool {
        match &self.kind {
            TypeKind::Param(_) => true,
            _ => self.generic_args().iter().any(|a| a.is_open()),
        }
    }

    pub fn is_enumerable(&self) -> bool {
        matches!(
            self.kind,
            TypeKind::Array { .. } | TypeKind::Sequence { .. } | TypeKind::Dictionary { .. }
        )
    }

    /// Generic definition name, uniform across built-in and user generics.
    pub fn generic_definition(&self) -> Option<&str> {
        match &self.kind {
            TypeKind::Nullable(_) => Some("Nullable"),
            TypeKind::Array { .. } => Some("Array"),
            TypeKind::Sequence { shape, .. } if shape.is_generic() => Some(shape.definition()),
            TypeKind::Dictionary { shape, .. } if *shape != DictionaryShape::NonGeneric => {
                Some(shape.definition())
            }
            TypeKind::Pair { .. } => Some("Pair"),
            TypeKind::Object(o) => o.generic.as_ref().map(|g| &*g.definition),
            _ => None,
        }
    }

    /// Generic type arguments (empty for non-generic types).
    pub fn generic_args(&self) -> Vec<TypeRef> {
        match &self.kind {
            TypeKind::Nullable(inner) => vec![inner.clone()],
            TypeKind::Array { element, .. } => vec![element.clone()],
            TypeKind::Sequence { shape, element } if shape.is_generic() => vec![element.clone()],
            TypeKind::Dictionary { shape, key, value } if *shape != DictionaryShape::NonGeneric => {
                vec![key.clone(), value.clone()]
            }
            TypeKind::Pair { key, value } => vec![key.clone(), value.clone()],
            TypeKind::Object(o) => o
                .generic
                .as_ref()
                .map(|g| g.args.clone())
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }

    /// Direct base type of an object type.
    pub fn base(&self) -> Option<&TypeRef> {
        self.object().and_then(|o| o.base.as_ref())
    }

    /// Base types, nearest first (excluding `self`).
    pub fn base_chain(&self) -> Vec<TypeRef> {
        let mut chain = Vec::new();
        let mut current = self.base().cloned();
        while let Some(ty) = current {
            current = ty.base().cloned();
            chain.push(ty);
        }
        chain
    }

    pub fn is_subtype_of(&self, other: &TypeDescriptor) -> bool {
        self == other || self.base_chain().iter().any(|b| **b == *other)
    }

    /// Whether a value of type `source` can be stored in this type as-is.
    pub fn is_assignable_from(&self, source: &TypeDescriptor) -> bool {
        if self == source || self.is_any() {
            return true;
        }
        match (&self.kind, &source.kind) {
            (TypeKind::Nullable(inner), _) => **inner == *source,
            (TypeKind::Object(_), TypeKind::Object(_)) => source.is_subtype_of(self),
            (
                TypeKind::Sequence { shape, element },
                TypeKind::Sequence {
                    shape: src_shape,
                    element: src_element,
                },
            ) => {
                src_shape.implements(*shape) && (!shape.is_generic() || element == src_element)
            }
            (
                TypeKind::Sequence { shape, element },
                TypeKind::Array {
                    element: src_element,
                    rank: 1,
                },
            ) => !shape.is_generic() || element == src_element,
            (TypeKind::Sequence { shape, element }, TypeKind::Dictionary { key, value, .. }) => {
                if !shape.is_generic() {
                    return *shape == SequenceShape::NonGenericEnumerable;
                }
                matches!(
                    shape,
                    SequenceShape::Enumerable | SequenceShape::Collection
                        | SequenceShape::ReadOnlyCollection
                ) && matches!(&element.kind, TypeKind::Pair { key: k, value: v } if k == key && v == value)
            }
            (
                TypeKind::Dictionary { shape, key, value },
                TypeKind::Dictionary {
                    shape: DictionaryShape::HashMap,
                    key: src_key,
                    value: src_value,
                },
            ) => *shape == DictionaryShape::NonGeneric || (key == src_key && value == src_value),
            _ => false,
        }
    }

    /// Value a freshly constructed member of this type holds.
    pub fn default_value(self: &Arc<Self>) -> Value {
        Value::default_for(self)
    }

    /// Members of an object type (inherited members included).
    pub fn members(&self) -> &[MemberDescriptor] {
        self.object().map(|o| o.members.as_slice()).unwrap_or(&[])
    }

    /// Case-insensitive member lookup.
    pub fn member(&self, name: &str) -> Option<&MemberDescriptor> {
        let members = self.members();
        members
            .iter()
            .find(|m| &*m.name == name)
            .or_else(|| members.iter().find(|m| m.name.eq_ignore_ascii_case(name)))
    }

    pub fn constructors(&self) -> &[ConstructorDescriptor] {
        self.object()
            .map(|o| o.constructors.as_slice())
            .unwrap_or(&[])
    }

    pub fn capabilities(&self) -> Option<&Capabilities> {
        self.object().map(|o| &o.capabilities)
    }
}

/// Object type descriptor.
#[derive(Debug, Clone, Default)]
pub struct ObjectDescriptor {
    /// Members in declaration order, base members first.
    pub members: Vec<MemberDescriptor>,
    /// Constructors in declaration order.
    pub constructors: Vec<ConstructorDescriptor>,
    pub base: Option<TypeRef>,
    /// Value-type (struct) semantics.
    pub value_type: bool,
    pub abstract_type: bool,
    pub capabilities: Capabilities,
    pub generic: Option<GenericInstance>,
}

/// Member descriptor.
#[derive(Debug, Clone)]
pub struct MemberDescriptor {
    pub name: Arc<str>,
    pub ty: TypeRef,
    pub readable: bool,
    pub writable: bool,
    /// Excluded from object-to-dictionary projection.
    pub ignored: bool,
    /// Value the member holds right after construction.
    pub initial: Option<Value>,
}

impl MemberDescriptor {
    /// Create a read/write member.
    pub fn new(name: impl Into<Arc<str>>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            readable: true,
            writable: true,
            ignored: false,
            initial: None,
        }
    }

    pub fn read_only(mut self) -> Self {
        self.writable = false;
        self
    }

    pub fn write_only(mut self) -> Self {
        self.readable = false;
        self
    }

    pub fn ignored(mut self) -> Self {
        self.ignored = true;
        self
    }

    pub fn with_initial(mut self, value: Value) -> Self {
        self.initial = Some(value);
        self
    }

    /// Value after construction (declared initial value or type default).
    pub fn initial_value(&self) -> Value {
        self.initial
            .clone()
            .unwrap_or_else(|| Value::default_for(&self.ty))
    }

    /// Element type when this member is a non-writable collection exposing
    /// a single-argument add operation.
    pub fn add_target(&self) -> Option<&TypeRef> {
        if self.writable {
            return None;
        }
        match self.ty.kind() {
            TypeKind::Sequence { shape, element } if !shape.is_abstract() => Some(element),
            _ => None,
        }
    }
}

/// Constructor descriptor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstructorDescriptor {
    pub params: Vec<ParamDescriptor>,
}

impl ConstructorDescriptor {
    pub fn new(params: Vec<ParamDescriptor>) -> Self {
        Self { params }
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Parameter type signature, e.g. `(Int32, String)`.
    pub fn signature(&self) -> String {
        let names: Vec<&str> = self.params.iter().map(|p| p.ty.name()).collect();
        format!("({})", names.join(", "))
    }

    pub fn matches_signature(&self, types: &[TypeRef]) -> bool {
        self.params.len() == types.len()
            && self.params.iter().zip(types).all(|(p, t)| p.ty == *t)
    }
}

/// Constructor parameter. Binds to the member of the same name.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamDescriptor {
    pub name: Arc<str>,
    pub ty: TypeRef,
}

impl ParamDescriptor {
    pub fn new(name: impl Into<Arc<str>>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Optional capabilities of an object type.
#[derive(Clone, Default)]
pub struct Capabilities {
    /// Exposes a deep-clone operation.
    pub cloneable: bool,
    pub display: Option<DisplayFn>,
    pub parse: Option<ParseFn>,
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capabilities")
            .field("cloneable", &self.cloneable)
            .field("display", &self.display.is_some())
            .field("parse", &self.parse.is_some())
            .finish()
    }
}

/// Enumeration type descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDescriptor {
    pub variants: Vec<EnumVariant>,
    /// Underlying integral type (default `I32`).
    pub underlying: PrimitiveKind,
}

impl EnumDescriptor {
    pub fn new(variants: Vec<EnumVariant>) -> Self {
        Self {
            variants,
            underlying: PrimitiveKind::I32,
        }
    }

    pub fn with_underlying(mut self, underlying: PrimitiveKind) -> Self {
        self.underlying = underlying;
        self
    }

    /// Case-insensitive lookup by name, then by alias.
    pub fn variant_by_name(&self, name: &str) -> Option<&EnumVariant> {
        let name = name.trim();
        self.variants
            .iter()
            .find(|v| v.name.eq_ignore_ascii_case(name))
            .or_else(|| {
                self.variants
                    .iter()
                    .find(|v| v.aliases.iter().any(|a| a.eq_ignore_ascii_case(name)))
            })
    }

    pub fn variant_by_value(&self, value: i64) -> Option<&EnumVariant> {
        self.variants.iter().find(|v| v.value == value)
    }
}

/// Enum variant.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumVariant {
    pub name: Arc<str>,
    pub value: i64,
    /// Alternative spellings accepted when parsing from text.
    pub aliases: Vec<Arc<str>>,
}

impl EnumVariant {
    pub fn new(name: impl Into<Arc<str>>, value: i64) -> Self {
        Self {
            name: name.into(),
            value,
            aliases: Vec::new(),
        }
    }

    pub fn with_alias(mut self, alias: impl Into<Arc<str>>) -> Self {
        self.aliases.push(alias.into());
        self
    }
}
