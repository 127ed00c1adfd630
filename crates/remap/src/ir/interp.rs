// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Tree-walking plan interpreter.

use crate::convert;
use crate::error::{Error, Result};
use crate::ir::{Expr, Intrinsic, VarId};
use crate::types::{self, SequenceShape, TypeKind, TypeRef};
use crate::value::{DictValue, EnumValue, PairValue, SeqValue, Value};

/// Re-entry point for values whose type is only known at run time.
pub trait Runtime {
    fn map_runtime(&self, value: Value, destination: &TypeRef) -> Result<Value>;
}

/// Control flow out of an evaluated expression.
#[derive(Debug)]
pub(crate) enum Flow {
    Value(Value),
    Break,
    Continue,
}

macro_rules! value {
    ($flow:expr) => {
        match $flow? {
            Flow::Value(v) => v,
            other => return Ok(other),
        }
    };
}

/// Evaluates one plan against one source value.
pub(crate) struct Interpreter<'a> {
    frame: Vec<Value>,
    source: &'a Value,
    runtime: &'a dyn Runtime,
}

impl<'a> Interpreter<'a> {
    pub(crate) fn new(slots: usize, source: &'a Value, runtime: &'a dyn Runtime) -> Self {
        Self {
            frame: vec![Value::Null; slots],
            source,
            runtime,
        }
    }

    pub(crate) fn run(&mut self, body: &Expr) -> Result<Value> {
        match self.eval(body)? {
            Flow::Value(v) => Ok(v),
            Flow::Break | Flow::Continue => Ok(Value::Null),
        }
    }

    fn slot(&mut self, id: VarId) -> &mut Value {
        if id >= self.frame.len() {
            self.frame.resize(id + 1, Value::Null);
        }
        &mut self.frame[id]
    }

    fn eval(&mut self, expr: &Expr) -> Result<Flow> {
        match expr {
            Expr::Source => Ok(Flow::Value(self.source.clone())),
            Expr::Const(v) => Ok(Flow::Value(v.deep_clone())),
            Expr::Default(ty) => Ok(Flow::Value(Value::default_for(ty))),
            Expr::Var(id) => Ok(Flow::Value(self.frame.get(*id).cloned().unwrap_or_default())),

            Expr::Let(id, value) => {
                let v = value!(self.eval(value));
                *self.slot(*id) = v;
                Ok(Flow::Value(Value::Null))
            }

            Expr::Block(items) => {
                let mut last = Value::Null;
                for item in items {
                    last = value!(self.eval(item));
                }
                Ok(Flow::Value(last))
            }

            Expr::If {
                cond,
                then,
                otherwise,
            } => {
                let cond = value!(self.eval(cond));
                let taken = cond
                    .as_bool()
                    .ok_or_else(|| Error::mismatch(describe(&cond), "Boolean"))?;
                if taken {
                    self.eval(then)
                } else if let Some(otherwise) = otherwise {
                    self.eval(otherwise)
                } else {
                    Ok(Flow::Value(Value::Null))
                }
            }

            Expr::Loop(body) => {
                loop {
                    match self.eval(body)? {
                        Flow::Break => break,
                        Flow::Continue | Flow::Value(_) => continue,
                    }
                }
                Ok(Flow::Value(Value::Null))
            }

            Expr::Break => Ok(Flow::Break),
            Expr::Continue => Ok(Flow::Continue),

            Expr::IsNull(e) => {
                let v = value!(self.eval(e));
                Ok(Flow::Value(Value::Bool(v.is_null())))
            }

            Expr::Not(e) => {
                let v = value!(self.eval(e));
                let b = v
                    .as_bool()
                    .ok_or_else(|| Error::mismatch(describe(&v), "Boolean"))?;
                Ok(Flow::Value(Value::Bool(!b)))
            }

            Expr::New {
                ty,
                ctor,
                args,
                inits,
            } => {
                if ty.object().is_none() {
                    return Err(Error::mismatch("constructor call", ty));
                }
                let object = crate::value::ObjectRef::new(ty);
                if let Some(index) = ctor {
                    let params = ty
                        .constructors()
                        .get(*index)
                        .map(|c| c.params.clone())
                        .ok_or_else(|| Error::mismatch(format!("constructor #{}", index), ty))?;
                    for (param, arg) in params.iter().zip(args) {
                        let v = value!(self.eval(arg));
                        object.set(&param.name, v);
                    }
                }
                for (member, init) in inits {
                    let v = value!(self.eval(init));
                    if !object.set(member, v) {
                        return Err(Error::mismatch(format!("member {}", member), ty));
                    }
                }
                Ok(Flow::Value(Value::Object(object)))
            }

            Expr::Get { target, member } => {
                let target = value!(self.eval(target));
                Ok(Flow::Value(read_member(&target, member)?))
            }

            Expr::Set {
                target,
                member,
                value,
            } => {
                let target = value!(self.eval(target));
                let v = value!(self.eval(value));
                match &target {
                    Value::Object(o) if o.set(member, v) => Ok(Flow::Value(Value::Null)),
                    other => Err(Error::mismatch(
                        describe(other),
                        format!("object with member {}", member),
                    )),
                }
            }

            Expr::Call { op, args } => self.call(op, args),

            Expr::Guard(inner) => self.eval(inner),
        }
    }

    fn call(&mut self, op: &Intrinsic, args: &[Expr]) -> Result<Flow> {
        match op {
            Intrinsic::Push(id) => {
                let item = value!(self.eval(arg(args, 0)?));
                match self.slot(*id) {
                    Value::Seq(seq) => push(seq, item),
                    other => return Err(Error::mismatch(describe(other), "sequence")),
                }
                Ok(Flow::Value(Value::Null))
            }
            Intrinsic::DictInsert(id) => {
                let key = value!(self.eval(arg(args, 0)?));
                let v = value!(self.eval(arg(args, 1)?));
                match self.slot(*id) {
                    Value::Dict(dict) => dict.insert(key, v),
                    other => return Err(Error::mismatch(describe(other), "dictionary")),
                }
                Ok(Flow::Value(Value::Null))
            }
            Intrinsic::Increment(id) => {
                let next = match self.slot(*id) {
                    Value::I64(n) => n.saturating_add(1),
                    other => return Err(Error::mismatch(describe(other), "Int64")),
                };
                *self.slot(*id) = Value::I64(next);
                Ok(Flow::Value(Value::Null))
            }
            Intrinsic::Item => {
                let index = value!(self.eval(arg(args, 1)?));
                let index = index
                    .as_i64()
                    .and_then(|i| usize::try_from(i).ok())
                    .ok_or_else(|| Error::mismatch(describe(&index), "Int64"))?;
                // Borrow variables in place; loops index the same list repeatedly.
                let item = match arg(args, 0)? {
                    Expr::Var(id) => item_at(self.frame.get(*id), index)?,
                    other => {
                        let seq = value!(self.eval(other));
                        item_at(Some(&seq), index)?
                    }
                };
                Ok(Flow::Value(item))
            }
            Intrinsic::Len => {
                let len = match arg(args, 0)? {
                    Expr::Var(id) => length(self.frame.get(*id)),
                    other => {
                        let v = value!(self.eval(other));
                        length(Some(&v))
                    }
                }?;
                Ok(Flow::Value(Value::I64(len)))
            }
            _ => {
                let mut values = Vec::with_capacity(args.len());
                for a in args {
                    values.push(value!(self.eval(a)));
                }
                self.apply(op, values).map(Flow::Value)
            }
        }
    }

    fn apply(&self, op: &Intrinsic, mut values: Vec<Value>) -> Result<Value> {
        let first = if values.is_empty() {
            Value::Null
        } else {
            values.swap_remove(0)
        };
        match op {
            Intrinsic::Convert(kind) => convert::convert_primitive(&first, *kind),
            Intrinsic::Format => Ok(match first {
                Value::Null => Value::Null,
                other => Value::String(other.to_string()),
            }),
            Intrinsic::Parse(kind) => match &first {
                Value::Null => Ok(Value::Null),
                Value::String(text) => convert::parse_primitive(text, *kind),
                other => Err(Error::mismatch(describe(other), kind.name())),
            },
            Intrinsic::ParseWith(ty) => {
                let parse = ty
                    .capabilities()
                    .and_then(|c| c.parse.clone())
                    .ok_or_else(|| Error::mismatch("String", ty))?;
                match &first {
                    Value::Null => Ok(Value::Null),
                    Value::String(text) => parse(text),
                    other => Err(Error::mismatch(describe(other), ty)),
                }
            }
            Intrinsic::EnumFromName(ty) => match &first {
                Value::Null => Ok(Value::default_for(ty)),
                Value::String(text) => enum_from_name(text, ty),
                other => Err(Error::mismatch(describe(other), ty)),
            },
            Intrinsic::EnumFromEnum(ty) => match &first {
                Value::Enum(source) => {
                    let by_name = source
                        .variant_name()
                        .and_then(|name| Value::enum_variant(ty, name));
                    match by_name {
                        Some(v) => Ok(v),
                        None => enum_from_raw(i128::from(source.raw), ty),
                    }
                }
                Value::Null => Ok(Value::default_for(ty)),
                other => Err(Error::mismatch(describe(other), ty)),
            },
            Intrinsic::EnumFromInt(ty) => match first.as_integral() {
                Some(raw) => enum_from_raw(raw, ty),
                None if first.is_null() => Ok(Value::default_for(ty)),
                None => Err(Error::mismatch(describe(&first), ty)),
            },
            Intrinsic::EnumToInt(kind) => match &first {
                Value::Enum(e) => convert::integral_to(i128::from(e.raw), *kind),
                Value::Null => Ok(Value::default_for(&types::primitive(*kind))),
                other => Err(Error::mismatch(describe(other), kind.name())),
            },
            Intrinsic::CloneObject => Ok(first.deep_clone()),
            Intrinsic::NewSeq(ty) => Ok(Value::empty_seq(ty)),
            Intrinsic::NewDict(ty) => Ok(Value::empty_dict(ty)),
            Intrinsic::AddToMember(member) => {
                let item = values.pop().unwrap_or_default();
                add_to_member(&first, member, item)?;
                Ok(Value::Null)
            }
            Intrinsic::Entries => entries(first),
            Intrinsic::Less => {
                let rhs = values.pop().unwrap_or_default();
                match (first.as_i64(), rhs.as_i64()) {
                    (Some(a), Some(b)) => Ok(Value::Bool(a < b)),
                    _ => Err(Error::mismatch(describe(&first), "Int64")),
                }
            }
            Intrinsic::MakePair(ty) => {
                let value = values.pop().unwrap_or_default();
                Ok(Value::Pair(Box::new(PairValue {
                    ty: ty.clone(),
                    key: first,
                    value,
                })))
            }
            Intrinsic::PairKey => match first {
                Value::Pair(p) => Ok(p.key),
                Value::Null => Ok(Value::Null),
                other => Err(Error::mismatch(describe(&other), "Pair")),
            },
            Intrinsic::PairValue => match first {
                Value::Pair(p) => Ok(p.value),
                Value::Null => Ok(Value::Null),
                other => Err(Error::mismatch(describe(&other), "Pair")),
            },
            Intrinsic::DictLookup(names) => Ok(dict_lookup(&first, names)),
            Intrinsic::MapRuntime(destination) => self.runtime.map_runtime(first, destination),
            Intrinsic::Custom(callback) => (callback.f)(&first),
            Intrinsic::Push(_)
            | Intrinsic::DictInsert(_)
            | Intrinsic::Increment(_)
            | Intrinsic::Item
            | Intrinsic::Len => Err(Error::mismatch(format!("{:?}", op), "pure intrinsic")),
        }
    }
}

fn arg(args: &[Expr], index: usize) -> Result<&Expr> {
    args.get(index)
        .ok_or_else(|| Error::mismatch(format!("{} arguments", args.len()), "intrinsic call"))
}

/// Runtime type name for error messages.
fn describe(value: &Value) -> String {
    value
        .runtime_type()
        .map(|t| t.name().to_string())
        .unwrap_or_else(|| "null".to_string())
}

fn read_member(target: &Value, member: &str) -> Result<Value> {
    match target {
        Value::Null => Ok(Value::Null),
        Value::Object(o) => o
            .get(member)
            .ok_or_else(|| Error::mismatch(o.ty(), format!("object with member {}", member))),
        Value::Pair(p) if member.eq_ignore_ascii_case("key") => Ok(p.key.clone()),
        Value::Pair(p) if member.eq_ignore_ascii_case("value") => Ok(p.value.clone()),
        other => Err(Error::mismatch(
            describe(other),
            format!("object with member {}", member),
        )),
    }
}

fn push(seq: &mut SeqValue, item: Value) {
    let is_set = matches!(
        seq.ty.kind(),
        TypeKind::Sequence {
            shape: SequenceShape::Set,
            ..
        }
    );
    if is_set && seq.items.contains(&item) {
        return;
    }
    seq.items.push(item);
}

fn item_at(seq: Option<&Value>, index: usize) -> Result<Value> {
    match seq {
        Some(Value::Seq(s)) => s
            .items
            .get(index)
            .cloned()
            .ok_or_else(|| Error::overflow(index, format!("{} items", s.items.len()))),
        Some(other) => Err(Error::mismatch(describe(other), "sequence")),
        None => Err(Error::mismatch("null", "sequence")),
    }
}

fn length(value: Option<&Value>) -> Result<i64> {
    let len = match value {
        Some(Value::Seq(s)) => s.items.len(),
        Some(Value::Dict(d)) => d.entries.len(),
        Some(Value::Null) | None => 0,
        Some(other) => return Err(Error::mismatch(describe(other), "sequence")),
    };
    i64::try_from(len).map_err(|_| Error::overflow(len, "Int64"))
}

/// Every enumerable as a flat list; dictionaries yield their pairs.
fn entries(value: Value) -> Result<Value> {
    match value {
        Value::Seq(s) => {
            let element = types::TypeCatalog::global()
                .element_of(&s.ty)
                .unwrap_or_else(types::any);
            Ok(Value::Seq(SeqValue {
                ty: types::list_of(&element),
                items: s.items,
            }))
        }
        Value::Dict(d) => {
            let pair_ty = types::TypeCatalog::global()
                .element_of(&d.ty)
                .unwrap_or_else(|| types::pair(&types::any(), &types::any()));
            let items = d
                .entries
                .into_iter()
                .map(|(key, value)| {
                    Value::Pair(Box::new(PairValue {
                        ty: pair_ty.clone(),
                        key,
                        value,
                    }))
                })
                .collect();
            Ok(Value::Seq(SeqValue {
                ty: types::list_of(&pair_ty),
                items,
            }))
        }
        Value::Null => Ok(Value::list(&types::any(), Vec::new())),
        other => Err(Error::mismatch(describe(&other), "enumerable")),
    }
}

fn add_to_member(target: &Value, member: &str, item: Value) -> Result<()> {
    let object = match target {
        Value::Object(o) => o,
        other => return Err(Error::mismatch(describe(other), "object")),
    };
    let member_ty = object
        .ty()
        .member(member)
        .map(|m| m.ty.clone())
        .ok_or_else(|| Error::mismatch(object.ty(), format!("object with member {}", member)))?;
    let added = object.update(member, |slot| {
        if slot.is_null() {
            *slot = Value::empty_seq(&member_ty);
        }
        match slot {
            Value::Seq(seq) => {
                push(seq, item);
                true
            }
            _ => false,
        }
    });
    match added {
        Some(true) => Ok(()),
        _ => Err(Error::mismatch(member_ty, "collection")),
    }
}

fn dict_lookup(source: &Value, names: &[std::sync::Arc<str>]) -> Value {
    match source {
        Value::Dict(d) => d.get_by_names(names).cloned().unwrap_or_default(),
        Value::Seq(s) => {
            let as_dict = DictValue {
                ty: s.ty.clone(),
                entries: s
                    .items
                    .iter()
                    .filter_map(|item| match item {
                        Value::Pair(p) => Some((p.key.clone(), p.value.clone())),
                        _ => None,
                    })
                    .collect(),
            };
            as_dict.get_by_names(names).cloned().unwrap_or_default()
        }
        _ => Value::Null,
    }
}

pub(crate) fn enum_from_name(text: &str, ty: &TypeRef) -> Result<Value> {
    if let Some(v) = Value::enum_variant(ty, text) {
        return Ok(v);
    }
    match text.trim().parse::<i128>() {
        Ok(raw) => enum_from_raw(raw, ty),
        Err(_) => Err(Error::format(text, ty)),
    }
}

pub(crate) fn enum_from_raw(raw: i128, ty: &TypeRef) -> Result<Value> {
    let underlying = ty
        .enum_descriptor()
        .map(|e| e.underlying)
        .ok_or_else(|| Error::mismatch("integral", ty))?;
    if !underlying.fits(raw) {
        return Err(Error::overflow(raw, ty));
    }
    let raw = i64::try_from(raw).map_err(|_| Error::overflow(raw, ty))?;
    Ok(Value::Enum(EnumValue {
        ty: ty.clone(),
        raw,
    }))
}
