// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Plan expression tree.

use crate::error::Result;
use crate::types::{PrimitiveKind, TypeRef};
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// Slot in the plan's variable frame.
pub type VarId = usize;

/// User function over a single value.
pub type SourceFn = Arc<dyn Fn(&Value) -> Result<Value> + Send + Sync>;

/// Named user callback embedded in a plan.
#[derive(Clone)]
pub struct Callback {
    pub label: Arc<str>,
    pub f: SourceFn,
}

impl Callback {
    pub fn new(label: impl Into<Arc<str>>, f: SourceFn) -> Self {
        Self {
            label: label.into(),
            f,
        }
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callback({})", self.label)
    }
}

/// Built-in operations invoked through [`Expr::Call`].
#[derive(Debug, Clone)]
pub enum Intrinsic {
    /// Primitive conversion table.
    Convert(PrimitiveKind),
    /// `ToString`-like formatting.
    Format,
    /// Parse text into a primitive.
    Parse(PrimitiveKind),
    /// Parse text through an object type's parse capability.
    ParseWith(TypeRef),
    /// Text to enum by name or alias.
    EnumFromName(TypeRef),
    /// Enum to enum by name, falling back to the range-checked raw value.
    EnumFromEnum(TypeRef),
    /// Integral to enum, range-checked against the underlying kind.
    EnumFromInt(TypeRef),
    /// Enum to integral, range-checked.
    EnumToInt(PrimitiveKind),
    /// Clone capability.
    CloneObject,
    /// Empty sequence (array, list or set) of the given type.
    NewSeq(TypeRef),
    /// Append to the sequence in a variable; sets skip duplicates.
    Push(VarId),
    /// Append to a collection member of an object in place.
    AddToMember(Arc<str>),
    /// Empty dictionary of the given type.
    NewDict(TypeRef),
    /// Insert into the dictionary in a variable.
    DictInsert(VarId),
    /// Materialize any enumerable as a list of its items.
    Entries,
    Len,
    Item,
    Less,
    /// Increment the integer in a variable.
    Increment(VarId),
    MakePair(TypeRef),
    PairKey,
    PairValue,
    /// First string-keyed entry matching any of the names, case-insensitive.
    DictLookup(Arc<[Arc<str>]>),
    /// Map through the engine using the value's runtime type.
    MapRuntime(TypeRef),
    Custom(Callback),
}

/// Plan expression.
#[derive(Debug, Clone)]
pub enum Expr {
    /// The plan's input value.
    Source,
    Const(Value),
    /// Default value of a type.
    Default(TypeRef),
    Var(VarId),
    /// Bind a variable; evaluates to null.
    Let(VarId, Box<Expr>),
    /// Evaluates to the last expression (null when empty).
    Block(Vec<Expr>),
    If {
        cond: Box<Expr>,
        then: Box<Expr>,
        otherwise: Option<Box<Expr>>,
    },
    /// Repeat until `Break`.
    Loop(Box<Expr>),
    Break,
    Continue,
    IsNull(Box<Expr>),
    Not(Box<Expr>),
    /// Construct an object: constructor `ctor` of `ty` bound to `args`,
    /// then member initializers in order.
    New {
        ty: TypeRef,
        ctor: Option<usize>,
        args: Vec<Expr>,
        inits: Vec<(Arc<str>, Expr)>,
    },
    Get {
        target: Box<Expr>,
        member: Arc<str>,
    },
    Set {
        target: Box<Expr>,
        member: Arc<str>,
        value: Box<Expr>,
    },
    Call {
        op: Intrinsic,
        args: Vec<Expr>,
    },
    /// Null guard around a nullable source access. Transparent when
    /// evaluated; hoisted into enclosing conditionals by
    /// [`hoist_guards`](crate::ir::hoist_guards).
    Guard(Box<Expr>),
}

impl Expr {
    pub fn let_(var: VarId, value: Expr) -> Expr {
        Expr::Let(var, Box::new(value))
    }

    pub fn if_(cond: Expr, then: Expr, otherwise: Option<Expr>) -> Expr {
        Expr::If {
            cond: Box::new(cond),
            then: Box::new(then),
            otherwise: otherwise.map(Box::new),
        }
    }

    pub fn is_null(expr: Expr) -> Expr {
        Expr::IsNull(Box::new(expr))
    }

    pub fn not(expr: Expr) -> Expr {
        Expr::Not(Box::new(expr))
    }

    pub fn get(target: Expr, member: impl Into<Arc<str>>) -> Expr {
        Expr::Get {
            target: Box::new(target),
            member: member.into(),
        }
    }

    pub fn set(target: Expr, member: impl Into<Arc<str>>, value: Expr) -> Expr {
        Expr::Set {
            target: Box::new(target),
            member: member.into(),
            value: Box::new(value),
        }
    }

    pub fn call(op: Intrinsic, args: Vec<Expr>) -> Expr {
        Expr::Call { op, args }
    }

    pub fn guard(expr: Expr) -> Expr {
        Expr::Guard(Box::new(expr))
    }

    pub fn loop_(body: Expr) -> Expr {
        Expr::Loop(Box::new(body))
    }

    /// Whether evaluating this expression twice is free and has no effect.
    pub fn is_trivial(&self) -> bool {
        matches!(self, Expr::Source | Expr::Var(_) | Expr::Const(_) | Expr::Default(_))
    }

    /// Number of `Guard` nodes in the tree.
    pub fn guard_count(&self) -> usize {
        let mut count = 0;
        self.visit(&mut |e| {
            if matches!(e, Expr::Guard(_)) {
                count += 1;
            }
        });
        count
    }

    /// Pre-order traversal.
    pub fn visit(&self, f: &mut impl FnMut(&Expr)) {
        f(self);
        match self {
            Expr::Let(_, e)
            | Expr::Loop(e)
            | Expr::IsNull(e)
            | Expr::Not(e)
            | Expr::Guard(e)
            | Expr::Get { target: e, .. } => e.visit(f),
            Expr::Block(items) | Expr::Call { args: items, .. } => {
                items.iter().for_each(|e| e.visit(f))
            }
            Expr::If {
                cond,
                then,
                otherwise,
            } => {
                cond.visit(f);
                then.visit(f);
                if let Some(e) = otherwise {
                    e.visit(f);
                }
            }
            Expr::New { args, inits, .. } => {
                args.iter().for_each(|e| e.visit(f));
                inits.iter().for_each(|(_, e)| e.visit(f));
            }
            Expr::Set { target, value, .. } => {
                target.visit(f);
                value.visit(f);
            }
            Expr::Source
            | Expr::Const(_)
            | Expr::Default(_)
            | Expr::Var(_)
            | Expr::Break
            | Expr::Continue => {}
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Source => f.write_str("source"),
            Expr::Const(v) => write!(f, "{:?}", v.to_string()),
            Expr::Default(ty) => write!(f, "default({})", ty),
            Expr::Var(id) => write!(f, "v{}", id),
            Expr::Let(id, e) => write!(f, "let v{} = {}", id, e),
            Expr::Block(items) => {
                f.write_str("{ ")?;
                for (i, e) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    write!(f, "{}", e)?;
                }
                f.write_str(" }")
            }
            Expr::If {
                cond,
                then,
                otherwise,
            } => {
                write!(f, "if {} then {}", cond, then)?;
                match otherwise {
                    Some(e) => write!(f, " else {}", e),
                    None => Ok(()),
                }
            }
            Expr::Loop(body) => write!(f, "loop {}", body),
            Expr::Break => f.write_str("break"),
            Expr::Continue => f.write_str("continue"),
            Expr::IsNull(e) => write!(f, "{} == null", e),
            Expr::Not(e) => write!(f, "!({})", e),
            Expr::New {
                ty,
                args,
                inits,
                ..
            } => {
                write!(f, "new {}(", ty)?;
                for (i, a) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", a)?;
                }
                f.write_str(")")?;
                if !inits.is_empty() {
                    f.write_str(" { ")?;
                    for (i, (name, e)) in inits.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{} = {}", name, e)?;
                    }
                    f.write_str(" }")?;
                }
                Ok(())
            }
            Expr::Get { target, member } => write!(f, "{}.{}", target, member),
            Expr::Set {
                target,
                member,
                value,
            } => write!(f, "{}.{} = {}", target, member, value),
            Expr::Call { op, args } => {
                write!(f, "{:?}(", op)?;
                for (i, a) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", a)?;
                }
                f.write_str(")")
            }
            Expr::Guard(e) => write!(f, "{}?", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_count_sees_nested_guards() {
        let inner = Expr::guard(Expr::get(Expr::Source, "Address"));
        let outer = Expr::guard(Expr::get(inner, "City"));
        let stmt = Expr::set(Expr::Var(0), "City", outer);
        assert_eq!(stmt.guard_count(), 2);
    }

    #[test]
    fn test_display() {
        let expr = Expr::set(
            Expr::Var(1),
            "Name",
            Expr::guard(Expr::get(Expr::Source, "Name")),
        );
        assert_eq!(expr.to_string(), "v1.Name = source.Name?");
    }
}
