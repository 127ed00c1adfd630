// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # remap - object mapping by plan synthesis
//!
//! Converts values of one runtime type into values of another by
//! synthesizing a conversion plan per `(source, destination)` type pair,
//! caching it, and executing it for every value of that pair.
//!
//! ## Quick Start
//!
//! ```rust
//! use remap::types::{self, EnumTypeBuilder, ObjectTypeBuilder, PrimitiveKind};
//! use remap::{Mapper, Result, Value};
//!
//! fn main() -> Result<()> {
//!     let status = EnumTypeBuilder::new("Status")
//!         .variant("Inactive")
//!         .variant("Active")
//!         .build();
//!     let mapper = Mapper::new();
//!
//!     let active = mapper.map(&Value::from("active"), &status)?;
//!     assert_eq!(active, Value::enum_variant(&status, "Active").unwrap());
//!
//!     let numbers = Value::list(&types::primitive(PrimitiveKind::I32), vec![1.into(), 2.into()]);
//!     let texts = mapper.map(&numbers, &types::list_of(&types::string()))?;
//!     assert_eq!(texts.as_seq().map(<[Value]>::len), Some(2));
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------------+
//! |   Mapper::map / map_from / map_to / map_into      (mapper)          |
//! +---------------------------------------------------------------------+
//! |   PlanCache (TypePair -> Arc<Plan>)                 (cache)         |
//! +---------------------------------------------------------------------+
//! |   Synthesizer: profiles -> depth rule -> strategies -> normalize    |
//! |   (synth, profile, strategy, factory)                               |
//! +---------------------------------------------------------------------+
//! |   IR: Expr tree, guard hoisting, interpreter        (ir)            |
//! +---------------------------------------------------------------------+
//! |   Type descriptors, dynamic values, conversions     (types, value)  |
//! +---------------------------------------------------------------------+
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Mapper`] | The engine; clone-cheap, thread-safe |
//! | [`MapperBuilder`] | Startup composition: config, strategies, profiles |
//! | [`TypeDescriptor`](types::TypeDescriptor) | Runtime type of every mapped value |
//! | [`Value`] | Dynamic value carrying its type |
//! | [`Plan`](ir::Plan) | Compiled conversion for one type pair |

/// Plan cache keyed by type pair.
pub mod cache;
/// Engine configuration (null policy, depth, cache sizes, YAML loading).
pub mod config;
/// Primitive conversion table, parsing and formatting.
pub mod convert;
/// Error taxonomy.
pub mod error;
/// Instance templates and generic retargeting.
pub mod factory;
/// Plan IR, guard hoisting and interpreter.
pub mod ir;
/// Mapping engine and its builder.
pub mod mapper;
/// Per-type member metadata cache.
pub mod metadata;
/// Naming-case transformer.
pub mod naming;
/// Profiles, member overrides and discovery.
pub mod profile;
/// Typed facade over descriptors and values.
pub mod reflect;
/// Built-in conversion strategies.
pub mod strategy;
/// Recursive plan synthesis.
pub mod synth;
/// Runtime type descriptors.
pub mod types;
/// Dynamic values.
pub mod value;

pub use config::{DepthMode, MapperConfig, NullPolicy};
pub use error::{Error, Result};
pub use factory::{InstanceTemplate, TemplateArg};
pub use mapper::{Mapper, MapperBuilder};
pub use naming::NameCase;
pub use profile::{GenericConstraint, MemberOverride, ProfileBuilder, SlotConstraint, ValueResolver};
pub use reflect::Reflect;
pub use strategy::Strategy;
pub use types::{TypePair, TypeRef};
pub use value::{ObjectRef, Value};

#[doc(hidden)]
pub use inventory;
