// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Object construction and member-by-member population.

use crate::convert;
use crate::error::{Error, Result};
use crate::factory::{InstanceFactory, ResolvedTemplate, TemplateArg};
use crate::ir::{Callback, Expr, Intrinsic};
use crate::profile::{MemberOverride, ProfileMatch};
use crate::synth::SynthContext;
use crate::types::{self, MemberDescriptor, TypePair, TypeRef};
use crate::value::Value;
use std::sync::Arc;

/// Build a `pair.destination` object from `subject`, applying the member
/// rules of `profile` when one matched.
pub fn build_object(
    ctx: &mut SynthContext<'_>,
    subject: Expr,
    pair: &TypePair,
    profile: Option<&ProfileMatch>,
) -> Result<Expr> {
    let (src, dst) = (&pair.source, &pair.destination);
    let mut stmts = Vec::new();
    let (binding, subject) = ctx.bind(subject);
    stmts.extend(binding);

    let template = match profile {
        Some(found) if !found.via_include => match found.profile.template() {
            Some(template) => Some(InstanceFactory::retarget(template, &found.authored, pair)?),
            None => None,
        },
        _ => None,
    };

    let (construct, initialized) = match &template {
        Some(resolved) => lower_template(ctx, resolved, &subject, src)?,
        None => select_constructor(ctx, &subject, src, dst, profile, &mut stmts)?,
    };
    // Template-built instances may be a subtype of the destination.
    let built_ty = template
        .as_ref()
        .map(|t| t.ty().clone())
        .unwrap_or_else(|| dst.clone());

    let object = ctx.fresh();
    stmts.push(Expr::let_(object, construct));

    for member in built_ty.members() {
        if initialized.iter().any(|n| n.eq_ignore_ascii_case(&member.name)) {
            continue;
        }

        let rule = profile.and_then(|p| p.profile.override_for(&member.name));
        let stmt = match rule {
            Some(MemberOverride::Ignore) => continue,
            // Constructor-only member the chosen constructor does not take.
            Some(_) if !member.writable => continue,
            Some(rule) => {
                let value = lower_override(ctx, rule, &subject, src, member)?;
                Expr::set(Expr::Var(object), member.name.clone(), value)
            }
            None => match populate(ctx, &subject, src, member, object)? {
                Some(stmt) => stmt,
                None => continue,
            },
        };

        let fallback = if member.writable {
            Expr::set(
                Expr::Var(object),
                member.name.clone(),
                Expr::Default(member.ty.clone()),
            )
        } else {
            Expr::Block(Vec::new())
        };
        stmts.push(ctx.hoist(stmt, fallback));
    }

    stmts.push(Expr::Var(object));
    Ok(Expr::Block(stmts))
}

/// Same-name population of one destination member, `None` when the
/// source has nothing for it.
fn populate(
    ctx: &mut SynthContext<'_>,
    subject: &Expr,
    src: &TypeRef,
    member: &MemberDescriptor,
    object: usize,
) -> Result<Option<Expr>> {
    let Some(source_member) = readable_member(ctx, src, &member.name) else {
        return Ok(None);
    };

    if member.writable {
        let value = ctx.synthesize(
            read(subject, &source_member),
            &TypePair::new(&source_member.ty, &member.ty),
        )?;
        return Ok(Some(Expr::set(Expr::Var(object), member.name.clone(), value)));
    }

    let Some(element) = member.add_target() else {
        return Ok(None);
    };

    // Read-only collection: convert the source to an array of the element
    // type and add each item.
    let array = types::array_of(element);
    let converted = ctx.synthesize(
        read(subject, &source_member),
        &TypePair::new(&source_member.ty, &array),
    )?;
    let (items, index, len) = (ctx.fresh(), ctx.fresh(), ctx.fresh());
    Ok(Some(Expr::Block(vec![
        Expr::let_(items, converted),
        Expr::let_(index, Expr::Const(Value::I64(0))),
        Expr::let_(len, Expr::call(Intrinsic::Len, vec![Expr::Var(items)])),
        Expr::loop_(Expr::Block(vec![
            Expr::if_(
                Expr::not(Expr::call(
                    Intrinsic::Less,
                    vec![Expr::Var(index), Expr::Var(len)],
                )),
                Expr::Break,
                None,
            ),
            Expr::call(
                Intrinsic::AddToMember(member.name.clone()),
                vec![
                    Expr::Var(object),
                    Expr::call(Intrinsic::Item, vec![Expr::Var(items), Expr::Var(index)]),
                ],
            ),
            Expr::call(Intrinsic::Increment(index), vec![]),
        ])),
    ])))
}

/// Member read, guarded when the member can hold null.
fn read(subject: &Expr, member: &MemberDescriptor) -> Expr {
    let get = Expr::get(subject.clone(), member.name.clone());
    if member.ty.can_be_null() {
        Expr::guard(get)
    } else {
        get
    }
}

/// Readable source member matching `name` case-insensitively.
pub fn readable_member(
    ctx: &SynthContext<'_>,
    src: &TypeRef,
    name: &str,
) -> Option<MemberDescriptor> {
    let position = ctx.metadata(src).position(name)?;
    src.members()
        .get(position)
        .filter(|m| m.readable)
        .cloned()
}

/// Follow a dotted member path through `src`; each nullable hop is guarded
/// when `guarded` is set.
pub fn read_path(
    subject: &Expr,
    src: &TypeRef,
    path: &[Arc<str>],
    guarded: bool,
) -> Result<(Expr, TypeRef)> {
    let mut expr = subject.clone();
    let mut ty = src.clone();
    for segment in path {
        let member = ty
            .member(segment)
            .filter(|m| m.readable)
            .cloned()
            .ok_or_else(|| {
                Error::Argument(format!("{} has no readable member {}", ty, segment))
            })?;
        expr = Expr::get(expr, member.name.clone());
        if guarded && member.ty.can_be_null() {
            expr = Expr::guard(expr);
        }
        ty = member.ty;
    }
    Ok((expr, ty))
}

fn lower_override(
    ctx: &mut SynthContext<'_>,
    rule: &MemberOverride,
    subject: &Expr,
    src: &TypeRef,
    member: &MemberDescriptor,
) -> Result<Expr> {
    let runtime = |value: Expr| Expr::call(Intrinsic::MapRuntime(member.ty.clone()), vec![value]);
    match rule {
        MemberOverride::Ignore => Ok(Expr::Default(member.ty.clone())),
        // Family constants are only typed once the pair is closed.
        MemberOverride::Constant(value) => {
            let value = convert::coerce_constant(value.clone(), &member.ty).map_err(|e| {
                Error::Argument(format!("constant for member {}: {}", member.name, e))
            })?;
            Ok(Expr::Const(value))
        }
        MemberOverride::FromPath(path) => {
            let (read, ty) = read_path(subject, src, path, true)?;
            ctx.synthesize(read, &TypePair::new(&ty, &member.ty))
        }
        MemberOverride::FromFn(f) => Ok(runtime(Expr::call(
            Intrinsic::Custom(Callback::new(member.name.clone(), f.clone())),
            vec![subject.clone()],
        ))),
        MemberOverride::FromResolver(resolver) => {
            let resolver = resolver.clone();
            let f: crate::ir::SourceFn = Arc::new(move |v: &Value| resolver.resolve(v));
            Ok(runtime(Expr::call(
                Intrinsic::Custom(Callback::new(member.name.clone(), f)),
                vec![subject.clone()],
            )))
        }
        MemberOverride::ConvertUsing { path, converter } => {
            let (read, _) = read_path(subject, src, path, true)?;
            Ok(runtime(Expr::call(
                Intrinsic::Custom(Callback::new(member.name.clone(), converter.clone())),
                vec![read],
            )))
        }
    }
}

/// Construction expression for `dst` plus the members it initializes.
///
/// A parameterless constructor wins. Otherwise the constructor with the
/// most parameters that are all satisfied is used: a parameter is satisfied
/// by a profile rule for its member, or by a same-named readable source
/// member. Rule-driven arguments are bound in `prelude` ahead of the call.
pub fn select_constructor(
    ctx: &mut SynthContext<'_>,
    subject: &Expr,
    src: &TypeRef,
    dst: &TypeRef,
    profile: Option<&ProfileMatch>,
    prelude: &mut Vec<Expr>,
) -> Result<(Expr, Vec<Arc<str>>)> {
    let ctors = dst.constructors();
    if let Some(index) = ctors.iter().position(|c| c.arity() == 0) {
        return Ok((
            Expr::New {
                ty: dst.clone(),
                ctor: Some(index),
                args: Vec::new(),
                inits: Vec::new(),
            },
            Vec::new(),
        ));
    }

    let mut candidates: Vec<usize> = (0..ctors.len()).collect();
    candidates.sort_by_key(|&i| std::cmp::Reverse(ctors[i].arity()));

    'candidates: for index in candidates {
        let ctor = &ctors[index];
        let mut args = Vec::with_capacity(ctor.arity());
        let mut bindings = Vec::new();
        for param in &ctor.params {
            match profile.and_then(|p| p.profile.override_for(&param.name)) {
                Some(MemberOverride::Ignore) => args.push(Expr::Default(param.ty.clone())),
                Some(rule) => {
                    let target = MemberDescriptor::new(param.name.clone(), param.ty.clone());
                    let value = lower_override(ctx, rule, subject, src, &target)?;
                    let slot = ctx.fresh();
                    bindings.push(Expr::let_(slot, Expr::Default(param.ty.clone())));
                    let fallback = Expr::let_(slot, Expr::Default(param.ty.clone()));
                    bindings.push(ctx.hoist(Expr::let_(slot, value), fallback));
                    args.push(Expr::Var(slot));
                }
                None => {
                    let Some(source_member) = readable_member(ctx, src, &param.name) else {
                        continue 'candidates;
                    };
                    let read = Expr::get(subject.clone(), source_member.name.clone());
                    match ctx.synthesize(read, &TypePair::new(&source_member.ty, &param.ty)) {
                        Ok(arg) => args.push(arg),
                        Err(_) => continue 'candidates,
                    }
                }
            }
        }
        prelude.extend(bindings);
        let initialized = ctor.params.iter().map(|p| p.name.clone()).collect();
        return Ok((
            Expr::New {
                ty: dst.clone(),
                ctor: Some(index),
                args,
                inits: Vec::new(),
            },
            initialized,
        ));
    }

    Err(Error::mismatch(src, dst))
}

/// Lower a retargeted instance template to a construction expression.
fn lower_template(
    ctx: &mut SynthContext<'_>,
    resolved: &ResolvedTemplate,
    subject: &Expr,
    src: &TypeRef,
) -> Result<(Expr, Vec<Arc<str>>)> {
    let ty = resolved.ty().clone();
    let mut initialized = Vec::new();
    let mut args = Vec::new();
    if let Some(index) = resolved.ctor() {
        let params = ty.constructors()[index].params.clone();
        for (param, arg) in params.iter().zip(resolved.args()) {
            args.push(lower_arg(ctx, arg, subject, src, &param.ty)?);
            initialized.push(param.name.clone());
        }
    }
    let mut inits = Vec::new();
    for (name, arg) in resolved.inits() {
        let member_ty = ty
            .member(name)
            .map(|m| m.ty.clone())
            .ok_or_else(|| Error::mismatch(format!("member {}", name), &ty))?;
        inits.push((name.clone(), lower_arg(ctx, arg, subject, src, &member_ty)?));
        initialized.push(name.clone());
    }
    Ok((
        Expr::New {
            ty,
            ctor: resolved.ctor(),
            args,
            inits,
        },
        initialized,
    ))
}

fn lower_arg(
    ctx: &mut SynthContext<'_>,
    arg: &TemplateArg,
    subject: &Expr,
    src: &TypeRef,
    target: &TypeRef,
) -> Result<Expr> {
    match arg {
        TemplateArg::Source => ctx.synthesize(subject.clone(), &TypePair::new(src, target)),
        TemplateArg::SourcePath(path) => {
            let (read, ty) = read_path(subject, src, path, false)?;
            ctx.synthesize(read, &TypePair::new(&ty, target))
        }
        TemplateArg::Const(value) => Ok(Expr::Const(value.clone())),
        TemplateArg::Default(ty) => Ok(Expr::Default(ty.clone())),
    }
}
