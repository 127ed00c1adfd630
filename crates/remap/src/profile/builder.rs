// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent profile declaration.

use super::{GenericConstraint, MemberOverride, Profile, ValueResolver};
use crate::convert;
use crate::error::{Error, Result};
use crate::factory::{self, InstanceFactory, InstanceTemplate};
use crate::ir::SourceFn;
use crate::types::{TypeKind, TypePair, TypeRef};
use crate::value::Value;
use std::sync::Arc;

/// Declares the rules of one profile.
///
/// Invalid declarations are recorded rather than raised; the first one
/// surfaces when the profile is registered.
pub struct ProfileBuilder {
    pair: TypePair,
    family: bool,
    overrides: Vec<(Arc<str>, MemberOverride)>,
    template: Option<InstanceTemplate>,
    includes: Vec<TypeRef>,
    constraint: Option<GenericConstraint>,
    errors: Vec<Error>,
}

impl ProfileBuilder {
    pub(crate) fn new(source: &TypeRef, destination: &TypeRef, family: bool) -> Self {
        Self {
            pair: TypePair::new(source, destination),
            family,
            overrides: Vec::new(),
            template: None,
            includes: Vec::new(),
            constraint: None,
            errors: Vec::new(),
        }
    }

    /// Never assign `member`.
    pub fn ignore(self, member: &str) -> Self {
        self.rule(member, MemberOverride::Ignore)
    }

    /// Assign a fixed value to `member`, converted to the member type when
    /// the profile is declared.
    pub fn constant(self, member: &str, value: impl Into<Value>) -> Self {
        self.rule(member, MemberOverride::Constant(value.into()))
    }

    /// Populate `member` from a dotted source member path.
    pub fn from_path(self, member: &str, path: &str) -> Self {
        self.rule(member, MemberOverride::FromPath(factory::split_path(path)))
    }

    /// Populate `member` from a closure over the whole source value. The
    /// result is mapped to the member type by its runtime type.
    pub fn from_fn<F>(self, member: &str, f: F) -> Self
    where
        F: Fn(&Value) -> Result<Value> + Send + Sync + 'static,
    {
        let f: SourceFn = Arc::new(f);
        self.rule(member, MemberOverride::FromFn(f))
    }

    pub fn from_resolver(self, member: &str, resolver: Arc<dyn ValueResolver>) -> Self {
        self.rule(member, MemberOverride::FromResolver(resolver))
    }

    /// Populate `member` by feeding the value at `path` to `converter`.
    pub fn convert_using<F>(self, member: &str, path: &str, converter: F) -> Self
    where
        F: Fn(&Value) -> Result<Value> + Send + Sync + 'static,
    {
        let converter: SourceFn = Arc::new(converter);
        self.rule(
            member,
            MemberOverride::ConvertUsing {
                path: factory::split_path(path),
                converter,
            },
        )
    }

    /// Replace constructor selection with `template`.
    pub fn new_instance(mut self, template: InstanceTemplate) -> Self {
        self.template = Some(template);
        self
    }

    /// Apply this profile's member rules to `subtype` destinations too.
    pub fn include(mut self, subtype: &TypeRef) -> Self {
        let dst = &self.pair.destination;
        if subtype == dst || !subtype.is_subtype_of(dst) {
            self.errors.push(Error::Argument(format!(
                "{} is not a subtype of {}",
                subtype, dst
            )));
        } else if !self.includes.contains(subtype) {
            self.includes.push(subtype.clone());
        }
        self
    }

    /// Constrain the closed instantiations a family profile matches.
    pub fn include_constraints(mut self, constraint: GenericConstraint) -> Self {
        self.constraint = Some(constraint);
        self
    }

    fn rule(mut self, member: &str, rule: MemberOverride) -> Self {
        let dst = self.pair.destination.clone();
        let Some(declared) = dst.member(member) else {
            self.errors.push(Error::Argument(format!(
                "{} has no member {}",
                dst, member
            )));
            return self;
        };
        let ctor_param = dst.constructors().iter().any(|c| {
            c.params
                .iter()
                .any(|p| p.name.eq_ignore_ascii_case(&declared.name))
        });
        if !declared.writable && !ctor_param && !matches!(rule, MemberOverride::Ignore) {
            self.errors.push(Error::Argument(format!(
                "{}.{} is not writable",
                dst, declared.name
            )));
            return self;
        }
        let rule = match rule {
            MemberOverride::Constant(value) if !declared.ty.is_open() => {
                match convert::coerce_constant(value, &declared.ty) {
                    Ok(value) => MemberOverride::Constant(value),
                    Err(e) => {
                        self.errors.push(Error::Argument(format!(
                            "constant for {}.{}: {}",
                            dst, declared.name, e
                        )));
                        return self;
                    }
                }
            }
            rule => rule,
        };
        let name = declared.name.clone();
        match self.overrides.iter_mut().find(|(n, _)| *n == name) {
            Some(existing) => existing.1 = rule,
            None => self.overrides.push((name, rule)),
        }
        self
    }

    /// Validate the declaration and produce the profile.
    pub(crate) fn finish(mut self) -> Result<Profile> {
        if !self.errors.is_empty() {
            return Err(self.errors.swap_remove(0));
        }
        let TypePair {
            source: src,
            destination: dst,
        } = &self.pair;

        if dst.object().is_none() {
            return Err(Error::Argument(format!(
                "profile destination {} is not an object type",
                dst
            )));
        }

        let open = src.is_open() || dst.is_open();
        if self.family && !open {
            return Err(Error::Argument(format!(
                "generic profile {} names no open type",
                self.pair
            )));
        }
        if !self.family && open {
            return Err(Error::Argument(format!(
                "profile {} names an open type; declare it as a generic profile",
                self.pair
            )));
        }

        if let Some(constraint) = &self.constraint {
            if !self.family {
                return Err(Error::Argument(format!(
                    "constraints on non-generic profile {}",
                    self.pair
                )));
            }
            let params = family_params(&self.pair).len();
            if constraint.slots().len() > params {
                return Err(Error::Argument(format!(
                    "{} constraint slots for {} type parameters in {}",
                    constraint.slots().len(),
                    params,
                    self.pair
                )));
            }
        }

        match &self.template {
            None if dst.is_abstract() => {
                return Err(Error::Argument(format!(
                    "abstract destination {} needs an instance template",
                    dst
                )));
            }
            None if dst.constructors().is_empty() => {
                return Err(Error::Argument(format!(
                    "{} has no usable constructor",
                    dst
                )));
            }
            Some(template) if !self.family => {
                InstanceFactory::retarget(template, &self.pair, &self.pair)?;
            }
            _ => {}
        }

        if !self.family {
            for (member, rule) in &self.overrides {
                let path = match rule {
                    MemberOverride::FromPath(path) => path,
                    MemberOverride::ConvertUsing { path, .. } => path,
                    _ => continue,
                };
                if path.is_empty() || factory::resolve_path(src, path).is_none() {
                    return Err(Error::Argument(format!(
                        "{}: {} has no readable path {}",
                        member,
                        src,
                        path.join(".")
                    )));
                }
            }
        }

        Ok(Profile {
            pair: self.pair,
            overrides: self.overrides,
            template: self.template,
            includes: self.includes,
            constraint: self.constraint,
            family: self.family,
        })
    }
}

/// Generic parameters of a family pair, in slot index order.
pub(crate) fn family_params(pair: &TypePair) -> Vec<TypeRef> {
    fn collect(ty: &TypeRef, out: &mut Vec<TypeRef>) {
        if let TypeKind::Param(_) = ty.kind() {
            if !out.contains(ty) {
                out.push(ty.clone());
            }
            return;
        }
        for arg in ty.generic_args() {
            collect(&arg, out);
        }
    }

    let mut params = Vec::new();
    collect(&pair.source, &mut params);
    collect(&pair.destination, &mut params);
    params.sort_by_key(|p| match p.kind() {
        TypeKind::Param(g) => g.index,
        _ => usize::MAX,
    });
    params
}
