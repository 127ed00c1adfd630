// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Process-wide memo table of structural type descriptors.
//!
//! Built-in shapes (`List<T>`, `T[]`, `Nullable<T>`, dictionaries, pairs)
//! and closed instantiations of user generic definitions are built once
//! and shared for the lifetime of the process.

use crate::error::{Error, Result};
use crate::types::{
    DictionaryShape, GenericInstance, GenericParam, MemberDescriptor, ParamDescriptor,
    PrimitiveKind, SequenceShape, TypeDescriptor, TypeKind, TypeRef,
};
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// Type substitution keyed by the name of the type being replaced.
pub type Substitution = HashMap<Arc<str>, TypeRef>;

/// Concurrent descriptor memo table.
pub struct TypeCatalog {
    types: DashMap<Arc<str>, TypeRef>,
}

static CATALOG: OnceLock<TypeCatalog> = OnceLock::new();

impl TypeCatalog {
    fn new() -> Self {
        let catalog = Self {
            types: DashMap::new(),
        };
        catalog.intern("Object", || TypeKind::Any);
        for kind in PrimitiveKind::ALL {
            catalog.intern(kind.name(), || TypeKind::Primitive(kind));
        }
        catalog
    }

    /// The shared catalog.
    pub fn global() -> &'static TypeCatalog {
        CATALOG.get_or_init(TypeCatalog::new)
    }

    /// Number of memoized descriptors.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<TypeRef> {
        self.types.get(name).map(|t| t.clone())
    }

    fn intern(&self, name: &str, build: impl FnOnce() -> TypeKind) -> TypeRef {
        if let Some(hit) = self.types.get(name) {
            return hit.clone();
        }
        self.types
            .entry(Arc::from(name))
            .or_insert_with(|| Arc::new(TypeDescriptor::new(name, build())))
            .clone()
    }

    fn intern_keyed(&self, key: String, build: impl FnOnce() -> TypeDescriptor) -> TypeRef {
        if let Some(hit) = self.types.get(key.as_str()) {
            return hit.clone();
        }
        self.types
            .entry(Arc::from(key))
            .or_insert_with(|| Arc::new(build()))
            .clone()
    }

    pub fn any(&self) -> TypeRef {
        self.intern("Object", || TypeKind::Any)
    }

    pub fn primitive(&self, kind: PrimitiveKind) -> TypeRef {
        self.intern(kind.name(), || TypeKind::Primitive(kind))
    }

    pub fn nullable(&self, inner: &TypeRef) -> TypeRef {
        if inner.nullable_inner().is_some() || !inner.is_value_type() {
            return inner.clone();
        }
        let name = format!("Nullable<{}>", inner.name());
        self.intern(&name, || TypeKind::Nullable(inner.clone()))
    }

    pub fn array(&self, element: &TypeRef, rank: u8) -> TypeRef {
        let rank = rank.max(1);
        let commas = ",".repeat(usize::from(rank - 1));
        let name = format!("{}[{}]", element.name(), commas);
        self.intern(&name, || TypeKind::Array {
            element: element.clone(),
            rank,
        })
    }

    pub fn sequence(&self, shape: SequenceShape, element: &TypeRef) -> TypeRef {
        if !shape.is_generic() {
            let any = self.any();
            return self.intern(shape.definition(), || TypeKind::Sequence {
                shape,
                element: any,
            });
        }
        let name = format!("{}<{}>", shape.definition(), element.name());
        self.intern(&name, || TypeKind::Sequence {
            shape,
            element: element.clone(),
        })
    }

    pub fn dictionary(&self, shape: DictionaryShape, key: &TypeRef, value: &TypeRef) -> TypeRef {
        if shape == DictionaryShape::NonGeneric {
            let any = self.any();
            return self.intern("IDictionary", || TypeKind::Dictionary {
                shape,
                key: any.clone(),
                value: any,
            });
        }
        let name = format!("{}<{}, {}>", shape.definition(), key.name(), value.name());
        self.intern(&name, || TypeKind::Dictionary {
            shape,
            key: key.clone(),
            value: value.clone(),
        })
    }

    pub fn pair(&self, key: &TypeRef, value: &TypeRef) -> TypeRef {
        let name = format!("Pair<{}, {}>", key.name(), value.name());
        self.intern(&name, || TypeKind::Pair {
            key: key.clone(),
            value: value.clone(),
        })
    }

    /// Element type of an enumerable (pairs for dictionaries).
    pub fn element_of(&self, ty: &TypeRef) -> Option<TypeRef> {
        match ty.kind() {
            TypeKind::Array { element, .. } | TypeKind::Sequence { element, .. } => {
                Some(element.clone())
            }
            TypeKind::Dictionary { key, value, .. } => Some(self.pair(key, value)),
            _ => None,
        }
    }

    /// Close an open generic object definition over concrete arguments.
    pub fn close(&self, definition: &TypeRef, args: &[TypeRef]) -> Result<TypeRef> {
        let object = definition.object().ok_or_else(|| {
            Error::Argument(format!("{} is not a generic object definition", definition))
        })?;
        let generic = object.generic.as_ref().ok_or_else(|| {
            Error::Argument(format!("{} is not a generic object definition", definition))
        })?;
        let open = generic.open.clone().unwrap_or_else(|| definition.clone());
        let open_generic = open
            .object()
            .and_then(|o| o.generic.as_ref())
            .ok_or_else(|| Error::Argument(format!("{} has no open definition", definition)))?;
        if open_generic.args.len() != args.len() {
            return Err(Error::Argument(format!(
                "{} expects {} type arguments, got {}",
                open,
                open_generic.args.len(),
                args.len()
            )));
        }

        let mut subst = Substitution::new();
        for (param, arg) in open_generic.args.iter().zip(args) {
            subst.insert(param.name_arc().clone(), arg.clone());
        }

        let arg_names: Vec<&str> = args.iter().map(|a| a.name()).collect();
        let name = format!("{}<{}>", open_generic.definition, arg_names.join(", "));
        // Keyed by definition identity so unrelated definitions sharing a
        // name never alias each other.
        let key = format!("{}#{:p}", name, Arc::as_ptr(&open));
        let mut closed = open
            .object()
            .cloned()
            .ok_or_else(|| Error::Argument(format!("{} is not an object type", open)))?;
        closed.members = closed
            .members
            .iter()
            .map(|m| {
                Ok(MemberDescriptor {
                    ty: self.substitute(&m.ty, &subst)?,
                    ..m.clone()
                })
            })
            .collect::<Result<_>>()?;
        for ctor in &mut closed.constructors {
            ctor.params = ctor
                .params
                .iter()
                .map(|p| Ok(ParamDescriptor::new(p.name.clone(), self.substitute(&p.ty, &subst)?)))
                .collect::<Result<_>>()?;
        }
        closed.base = closed
            .base
            .as_ref()
            .map(|b| self.substitute(b, &subst))
            .transpose()?;
        closed.generic = Some(GenericInstance {
            definition: open_generic.definition.clone(),
            args: args.to_vec(),
            open: Some(open.clone()),
        });

        Ok(self.intern_keyed(key, || {
            TypeDescriptor::new(name.as_str(), TypeKind::Object(closed))
        }))
    }

    /// Structurally replace every type named in `subst`.
    pub fn substitute(&self, ty: &TypeRef, subst: &Substitution) -> Result<TypeRef> {
        if let Some(replacement) = subst.get(ty.name_arc()) {
            return Ok(replacement.clone());
        }
        if subst.is_empty() {
            return Ok(ty.clone());
        }
        Ok(match ty.kind() {
            TypeKind::Nullable(inner) => self.nullable(&self.substitute(inner, subst)?),
            TypeKind::Array { element, rank } => self.array(&self.substitute(element, subst)?, *rank),
            TypeKind::Sequence { shape, element } => {
                self.sequence(*shape, &self.substitute(element, subst)?)
            }
            TypeKind::Dictionary { shape, key, value } => self.dictionary(
                *shape,
                &self.substitute(key, subst)?,
                &self.substitute(value, subst)?,
            ),
            TypeKind::Pair { key, value } => {
                self.pair(&self.substitute(key, subst)?, &self.substitute(value, subst)?)
            }
            TypeKind::Object(o) => match &o.generic {
                Some(generic) => {
                    let args = generic
                        .args
                        .iter()
                        .map(|a| self.substitute(a, subst))
                        .collect::<Result<Vec<_>>>()?;
                    if args == generic.args {
                        ty.clone()
                    } else {
                        self.close(ty, &args)?
                    }
                }
                None => ty.clone(),
            },
            _ => ty.clone(),
        })
    }
}

/// Shared `Object` descriptor.
pub fn any() -> TypeRef {
    TypeCatalog::global().any()
}

pub fn primitive(kind: PrimitiveKind) -> TypeRef {
    TypeCatalog::global().primitive(kind)
}

pub fn string() -> TypeRef {
    primitive(PrimitiveKind::String)
}

pub fn nullable(inner: &TypeRef) -> TypeRef {
    TypeCatalog::global().nullable(inner)
}

pub fn array_of(element: &TypeRef) -> TypeRef {
    TypeCatalog::global().array(element, 1)
}

pub fn list_of(element: &TypeRef) -> TypeRef {
    TypeCatalog::global().sequence(SequenceShape::List, element)
}

pub fn set_of(element: &TypeRef) -> TypeRef {
    TypeCatalog::global().sequence(SequenceShape::Set, element)
}

pub fn sequence(shape: SequenceShape, element: &TypeRef) -> TypeRef {
    TypeCatalog::global().sequence(shape, element)
}

/// Concrete `Dictionary<K, V>`.
pub fn dictionary(key: &TypeRef, value: &TypeRef) -> TypeRef {
    TypeCatalog::global().dictionary(DictionaryShape::HashMap, key, value)
}

pub fn dictionary_shape(shape: DictionaryShape, key: &TypeRef, value: &TypeRef) -> TypeRef {
    TypeCatalog::global().dictionary(shape, key, value)
}

pub fn pair(key: &TypeRef, value: &TypeRef) -> TypeRef {
    TypeCatalog::global().pair(key, value)
}

/// Generic placeholder for slot `index` of a definition.
pub fn param(name: &str, index: usize) -> TypeRef {
    Arc::new(TypeDescriptor::new(
        name,
        TypeKind::Param(GenericParam {
            name: Arc::from(name),
            index,
        }),
    ))
}

pub fn close(definition: &TypeRef, args: &[TypeRef]) -> Result<TypeRef> {
    TypeCatalog::global().close(definition, args)
}
