// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! User-declared customizations for one type pair or one open-generic
//! family.
//!
//! A [`Profile`] carries per-member overrides, an optional instance
//! template replacing constructor selection, destination subtypes sharing
//! its rules, and (for families) the constraints a closed instantiation
//! must satisfy. Profiles are declared through [`ProfileBuilder`] while the
//! engine is composed and are read-only afterwards.
//!
//! # Example
//!
//! ```rust
//! use remap::types::{ObjectTypeBuilder, PrimitiveKind};
//! use remap::Mapper;
//!
//! let dto = ObjectTypeBuilder::new("AccountDto")
//!     .string_field("Login")
//!     .string_field("Password")
//!     .build();
//! let view = ObjectTypeBuilder::new("AccountView")
//!     .string_field("Login")
//!     .string_field("Password")
//!     .build();
//!
//! let mapper = Mapper::builder()
//!     .define_profile(&dto, &view, |p| p.ignore("Password"))
//!     .build()
//!     .unwrap();
//! assert!(mapper.plan(&dto, &view).is_ok());
//! ```

mod builder;
mod constraint;
mod discovery;
mod registry;

pub use builder::ProfileBuilder;
pub use constraint::{GenericConstraint, SlotConstraint, TypePredicate};
pub(crate) use discovery::discover;
pub use discovery::{registrations, ProfileRegistration};
pub use registry::ProfileRegistry;

use crate::error::Result;
use crate::factory::InstanceTemplate;
use crate::ir::SourceFn;
use crate::types::{TypePair, TypeRef};
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// Computes a destination member value from the whole source value.
pub trait ValueResolver: Send + Sync {
    fn resolve(&self, source: &Value) -> Result<Value>;
}

impl<F> ValueResolver for F
where
    F: Fn(&Value) -> Result<Value> + Send + Sync,
{
    fn resolve(&self, source: &Value) -> Result<Value> {
        self(source)
    }
}

/// Replacement rule for one destination member.
#[derive(Clone)]
pub enum MemberOverride {
    /// Never assigned; the member keeps its initial value.
    Ignore,
    Constant(Value),
    /// Dotted member path on the source, null guarded at every hop.
    FromPath(Vec<Arc<str>>),
    FromFn(SourceFn),
    FromResolver(Arc<dyn ValueResolver>),
    /// Source path fed through a converter.
    ConvertUsing {
        path: Vec<Arc<str>>,
        converter: SourceFn,
    },
}

impl fmt::Debug for MemberOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberOverride::Ignore => f.write_str("Ignore"),
            MemberOverride::Constant(v) => f.debug_tuple("Constant").field(v).finish(),
            MemberOverride::FromPath(path) => f.debug_tuple("FromPath").field(path).finish(),
            MemberOverride::FromFn(_) => f.write_str("FromFn(..)"),
            MemberOverride::FromResolver(_) => f.write_str("FromResolver(..)"),
            MemberOverride::ConvertUsing { path, .. } => {
                f.debug_struct("ConvertUsing").field("path", path).finish()
            }
        }
    }
}

/// A declared customization.
#[derive(Debug)]
pub struct Profile {
    pair: TypePair,
    overrides: Vec<(Arc<str>, MemberOverride)>,
    template: Option<InstanceTemplate>,
    includes: Vec<TypeRef>,
    constraint: Option<GenericConstraint>,
    family: bool,
}

impl Profile {
    /// The pair this profile was authored for (open for families).
    pub fn pair(&self) -> &TypePair {
        &self.pair
    }

    pub fn is_family(&self) -> bool {
        self.family
    }

    /// Override declared for `member`, matched case-insensitively.
    pub fn override_for(&self, member: &str) -> Option<&MemberOverride> {
        self.overrides
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(member))
            .map(|(_, rule)| rule)
    }

    pub fn overrides(&self) -> impl Iterator<Item = (&str, &MemberOverride)> {
        self.overrides.iter().map(|(n, r)| (&**n, r))
    }

    pub fn template(&self) -> Option<&InstanceTemplate> {
        self.template.as_ref()
    }

    /// Destination subtypes sharing this profile's member rules.
    pub fn includes(&self) -> &[TypeRef] {
        &self.includes
    }

    pub fn constraint(&self) -> Option<&GenericConstraint> {
        self.constraint.as_ref()
    }
}

/// Result of a profile lookup for one concrete pair.
#[derive(Debug, Clone)]
pub struct ProfileMatch {
    pub profile: Arc<Profile>,
    /// Pair the profile (and its template) was authored against.
    pub authored: TypePair,
    /// Concrete pair being built.
    pub target: TypePair,
    /// Matched through an included destination subtype.
    pub via_include: bool,
}
