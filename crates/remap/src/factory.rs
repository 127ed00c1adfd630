// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Instance templates and their retargeting onto closed type pairs.
//!
//! A profile may replace default constructor selection with an
//! [`InstanceTemplate`]: "construct `ty` through the constructor with this
//! parameter signature, feeding it these arguments, then initialize these
//! members". Templates of generic-family profiles are authored against
//! open types (`Page<T>`) and are re-resolved for every closed pair the
//! family matches (`Page<Int32>`), by unifying the authored pair with the
//! target pair and substituting the bound parameters.
//!
//! # Example
//!
//! ```rust
//! use remap::factory::{InstanceTemplate, TemplateArg};
//! use remap::types::{self, ObjectTypeBuilder, PrimitiveKind};
//!
//! let i32_ty = types::primitive(PrimitiveKind::I32);
//! let view = ObjectTypeBuilder::new("CounterView")
//!     .field("Start", PrimitiveKind::I32)
//!     .constructor(vec![("Start", i32_ty.clone())])
//!     .build();
//!
//! let template = InstanceTemplate::new(&view)
//!     .constructor(vec![i32_ty], vec![TemplateArg::path("Count")]);
//! assert_eq!(template.to_string(), "new CounterView(Int32: source.Count)");
//! ```

use crate::error::{Error, Result};
use crate::types::{Substitution, TypeCatalog, TypeKind, TypePair, TypeRef};
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// Where a constructor argument or member initializer takes its value.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateArg {
    /// The whole source value.
    Source,
    /// A member path on the source.
    SourcePath(Vec<Arc<str>>),
    Const(Value),
    Default(TypeRef),
}

impl TemplateArg {
    /// Source member path from dotted notation (`"Address.City"`).
    pub fn path(dotted: &str) -> Self {
        TemplateArg::SourcePath(split_path(dotted))
    }
}

impl fmt::Display for TemplateArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateArg::Source => f.write_str("source"),
            TemplateArg::SourcePath(path) => {
                f.write_str("source")?;
                for segment in path {
                    write!(f, ".{}", segment)?;
                }
                Ok(())
            }
            TemplateArg::Const(v) => write!(f, "{}", v),
            TemplateArg::Default(ty) => write!(f, "default({})", ty),
        }
    }
}

pub(crate) fn split_path(dotted: &str) -> Vec<Arc<str>> {
    dotted
        .split('.')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(Arc::from)
        .collect()
}

/// Author-written "new instance" expression.
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceTemplate {
    ty: TypeRef,
    /// Constructor parameter signature; `None` selects the parameterless one.
    ctor: Option<Vec<TypeRef>>,
    args: Vec<TemplateArg>,
    inits: Vec<(Arc<str>, TemplateArg)>,
}

impl InstanceTemplate {
    /// Template constructing `ty` through its parameterless constructor.
    pub fn new(ty: &TypeRef) -> Self {
        Self {
            ty: ty.clone(),
            ctor: None,
            args: Vec::new(),
            inits: Vec::new(),
        }
    }

    /// Construct through the constructor with parameter types `signature`.
    pub fn constructor(mut self, signature: Vec<TypeRef>, args: Vec<TemplateArg>) -> Self {
        self.ctor = Some(signature);
        self.args = args;
        self
    }

    /// Member initializer applied after construction.
    pub fn init(mut self, member: impl Into<Arc<str>>, arg: TemplateArg) -> Self {
        self.inits.push((member.into(), arg));
        self
    }

    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }
}

impl fmt::Display for InstanceTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "new {}(", self.ty)?;
        if let Some(signature) = &self.ctor {
            for (i, (ty, arg)) in signature.iter().zip(&self.args).enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}: {}", ty, arg)?;
            }
        }
        f.write_str(")")?;
        if !self.inits.is_empty() {
            f.write_str(" {")?;
            for (i, (member, arg)) in self.inits.iter().enumerate() {
                let sep = if i == 0 { " " } else { ", " };
                write!(f, "{}{} = {}", sep, member, arg)?;
            }
            f.write_str(" }")?;
        }
        Ok(())
    }
}

/// A template bound to one closed type pair.
#[derive(Debug, Clone)]
pub struct ResolvedTemplate {
    ty: TypeRef,
    ctor: Option<usize>,
    args: Vec<TemplateArg>,
    inits: Vec<(Arc<str>, TemplateArg)>,
}

impl ResolvedTemplate {
    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    /// Constructor index on [`ResolvedTemplate::ty`].
    pub fn ctor(&self) -> Option<usize> {
        self.ctor
    }

    pub fn args(&self) -> &[TemplateArg] {
        &self.args
    }

    pub fn inits(&self) -> &[(Arc<str>, TemplateArg)] {
        &self.inits
    }
}

/// Specializes instance templates for concrete type pairs.
pub struct InstanceFactory;

impl InstanceFactory {
    /// Re-resolve `template`, authored for `authored`, against `target`.
    ///
    /// Every type reference is substituted, the constructor is re-resolved
    /// by signature, and every initialized member and source path must
    /// exist on the retargeted types.
    ///
    /// # Errors
    ///
    /// `Error::Setup` naming both pairs and the template when any
    /// structural reference cannot be resolved.
    pub fn retarget(
        template: &InstanceTemplate,
        authored: &TypePair,
        target: &TypePair,
    ) -> Result<ResolvedTemplate> {
        let setup = |reason: String| Error::Setup {
            authored: authored.to_string(),
            target: target.to_string(),
            template: template.to_string(),
            reason,
        };

        let mut subst = Substitution::new();
        if !unify(&authored.source, &target.source, &mut subst)
            || !unify(&authored.destination, &target.destination, &mut subst)
        {
            return Err(setup("target pair does not unify with the authored pair".into()));
        }

        let catalog = TypeCatalog::global();
        let substitute = |ty: &TypeRef| {
            catalog
                .substitute(ty, &subst)
                .map_err(|e| setup(e.to_string()))
        };

        let ty = substitute(&template.ty)?;
        if ty.object().is_none() || ty.is_open() || ty.is_abstract() {
            return Err(setup(format!("{} is not a constructible type", ty)));
        }
        if !target.destination.is_assignable_from(&ty) {
            return Err(setup(format!(
                "{} is not assignable to {}",
                ty, target.destination
            )));
        }

        let ctor = match &template.ctor {
            Some(signature) => {
                let signature = signature
                    .iter()
                    .map(&substitute)
                    .collect::<Result<Vec<_>>>()?;
                if signature.len() != template.args.len() {
                    return Err(setup(format!(
                        "constructor takes {} arguments, template supplies {}",
                        signature.len(),
                        template.args.len()
                    )));
                }
                let index = ty
                    .constructors()
                    .iter()
                    .position(|c| c.matches_signature(&signature))
                    .ok_or_else(|| {
                        let names: Vec<&str> = signature.iter().map(|t| t.name()).collect();
                        setup(format!("{} has no constructor ({})", ty, names.join(", ")))
                    })?;
                Some(index)
            }
            None if ty.constructors().is_empty() => None,
            None => Some(
                ty.constructors()
                    .iter()
                    .position(|c| c.arity() == 0)
                    .ok_or_else(|| setup(format!("{} has no parameterless constructor", ty)))?,
            ),
        };

        let resolve_arg = |arg: &TemplateArg| -> Result<TemplateArg> {
            match arg {
                TemplateArg::SourcePath(path) => {
                    if resolve_path(&target.source, path).is_none() {
                        return Err(setup(format!(
                            "{} has no member path {}",
                            target.source, arg
                        )));
                    }
                    Ok(arg.clone())
                }
                TemplateArg::Default(t) => Ok(TemplateArg::Default(substitute(t)?)),
                other => Ok(other.clone()),
            }
        };

        let args = template
            .args
            .iter()
            .map(&resolve_arg)
            .collect::<Result<Vec<_>>>()?;

        let mut inits = Vec::with_capacity(template.inits.len());
        for (name, arg) in &template.inits {
            let member = ty
                .member(name)
                .filter(|m| m.writable)
                .ok_or_else(|| setup(format!("{} has no writable member {}", ty, name)))?;
            inits.push((member.name.clone(), resolve_arg(arg)?));
        }

        Ok(ResolvedTemplate {
            ty,
            ctor,
            args,
            inits,
        })
    }
}

/// Type reached by following readable members along `path`.
pub(crate) fn resolve_path(src: &TypeRef, path: &[Arc<str>]) -> Option<TypeRef> {
    let mut ty = src.clone();
    for segment in path {
        ty = ty.member(segment).filter(|m| m.readable)?.ty.clone();
    }
    Some(ty)
}

/// Structurally match `pattern` against `concrete`, binding generic
/// parameters in `subst`.
pub(crate) fn unify(pattern: &TypeRef, concrete: &TypeRef, subst: &mut Substitution) -> bool {
    if let TypeKind::Param(param) = pattern.kind() {
        return match subst.get(&param.name) {
            Some(bound) => bound == concrete,
            None => {
                subst.insert(param.name.clone(), concrete.clone());
                true
            }
        };
    }
    if pattern == concrete {
        return true;
    }
    if !pattern.is_open() {
        // Closed object patterns also match their subtypes.
        return pattern.object().is_some() && concrete.is_subtype_of(pattern);
    }

    match (pattern.generic_definition(), concrete.generic_definition()) {
        (Some(a), Some(b)) if a == b => {}
        _ => return false,
    }
    if let (TypeKind::Array { rank: a, .. }, TypeKind::Array { rank: b, .. }) =
        (pattern.kind(), concrete.kind())
    {
        if a != b {
            return false;
        }
    }
    let (pattern_args, concrete_args) = (pattern.generic_args(), concrete.generic_args());
    pattern_args.len() == concrete_args.len()
        && pattern_args
            .iter()
            .zip(&concrete_args)
            .all(|(p, c)| unify(p, c, subst))
}
