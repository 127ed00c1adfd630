// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Mapping engine entry points.
//!
//! A [`Mapper`] is composed once through [`MapperBuilder`] (configuration,
//! custom strategies, profiles, discovery) and is read-only afterwards.
//! Plans are compiled on first use per type pair and cached; cloning a
//! `Mapper` shares its registry and plan cache.
//!
//! # Example
//!
//! ```rust
//! use remap::types::{self, ObjectTypeBuilder, PrimitiveKind};
//! use remap::{Mapper, Value};
//!
//! let dto = ObjectTypeBuilder::new("PointDto")
//!     .field("X", PrimitiveKind::I32)
//!     .field("Y", PrimitiveKind::I32)
//!     .build();
//! let view = ObjectTypeBuilder::new("PointView")
//!     .field("X", PrimitiveKind::I64)
//!     .string_field("Y")
//!     .build();
//!
//! let mapper = Mapper::new();
//! let source = Value::object(&dto, [("X", Value::I32(3)), ("Y", Value::I32(4))]);
//! let mapped = mapper.map(&source, &view).unwrap();
//! assert_eq!(mapped.get_field("X"), Some(Value::I64(3)));
//! assert_eq!(mapped.get_field("Y"), Some(Value::String("4".into())));
//! ```

use crate::cache::{CacheStats, PlanCache};
use crate::config::MapperConfig;
use crate::error::{Error, Result};
use crate::ir::{Plan, Runtime};
use crate::metadata::{LookupStats, MetadataCache};
use crate::profile::{self, ProfileBuilder, ProfileRegistry};
use crate::reflect::Reflect;
use crate::strategy::{Strategy, StrategyRegistry};
use crate::synth::SynthContext;
use crate::types::{TypePair, TypeRef};
use crate::value::Value;
use arc_swap::ArcSwap;
use std::sync::{Arc, OnceLock};

/// Frozen engine state shared by every clone of a [`Mapper`].
pub struct Registry {
    pub(crate) config: MapperConfig,
    pub(crate) strategies: StrategyRegistry,
    pub(crate) profiles: ProfileRegistry,
    pub(crate) metadata: MetadataCache,
    pub(crate) plans: PlanCache,
}

impl Registry {
    fn plan(&self, pair: &TypePair) -> Result<Arc<Plan>> {
        self.plans.get_or_build(pair, || {
            log::debug!("[remap] compiling plan {}", pair);
            let plan = SynthContext::compile(self, pair);
            if let Err(e) = &plan {
                log::debug!("[remap] no plan for {}: {}", pair, e);
            }
            plan
        })
    }

    fn map_value(&self, value: &Value, source: &TypeRef, destination: &TypeRef) -> Result<Value> {
        let pair = TypePair::new(source, destination);
        self.plan(&pair)?.execute(value, self)
    }
}

impl Runtime for Registry {
    fn map_runtime(&self, value: Value, destination: &TypeRef) -> Result<Value> {
        match value.runtime_type() {
            Some(source) => self.map_value(&value, &source, destination),
            None => Ok(Value::default_for(destination)),
        }
    }
}

/// The mapping engine.
#[derive(Clone)]
pub struct Mapper {
    registry: Arc<Registry>,
}

static GLOBAL: OnceLock<ArcSwap<Mapper>> = OnceLock::new();

impl Mapper {
    pub fn builder() -> MapperBuilder {
        MapperBuilder::new()
    }

    /// Engine with the default configuration, built-in strategies only.
    pub fn new() -> Self {
        MapperBuilder::new().assemble()
    }

    pub fn config(&self) -> &MapperConfig {
        &self.registry.config
    }

    /// Compiled plan for `(source, destination)`.
    pub fn plan(&self, source: &TypeRef, destination: &TypeRef) -> Result<Arc<Plan>> {
        self.registry.plan(&TypePair::new(source, destination))
    }

    /// Map `value` into `destination`, dispatching on the value's runtime
    /// type. Null maps to the destination default.
    pub fn map(&self, value: &Value, destination: &TypeRef) -> Result<Value> {
        match value.runtime_type() {
            Some(source) => self.registry.map_value(value, &source, destination),
            None => Ok(Value::default_for(destination)),
        }
    }

    /// Map `value`, declared as `source`, into `destination`.
    pub fn map_from(&self, value: &Value, source: &TypeRef, destination: &TypeRef) -> Result<Value> {
        self.registry.map_value(value, source, destination)
    }

    /// Map a dynamic value into a typed destination.
    pub fn map_to<D: Reflect>(&self, value: &Value) -> Result<D> {
        D::from_value(self.map(value, &D::type_ref())?)
    }

    /// Typed-to-typed mapping.
    pub fn map_into<S: Reflect, D: Reflect>(&self, value: &S) -> Result<D> {
        let mapped = self.map_from(&value.to_value(), &S::type_ref(), &D::type_ref())?;
        D::from_value(mapped)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.registry.plans.stats()
    }

    pub fn metadata_stats(&self) -> LookupStats {
        self.registry.metadata.stats()
    }

    /// Names of the registered strategies in dispatch order.
    pub fn strategy_names(&self) -> Vec<&str> {
        self.registry.strategies.names()
    }

    /// Process-wide default engine. Built lazily with profile discovery on
    /// first use unless one was installed.
    ///
    /// A rejected discovered profile fails every call until a mapper is
    /// installed with [`Mapper::install_global`].
    pub fn global() -> Result<Arc<Mapper>> {
        if let Some(slot) = GLOBAL.get() {
            return Ok(slot.load_full());
        }
        let mapper = MapperBuilder::new()
            .discover_profiles()
            .build()
            .map_err(|e| {
                log::error!("[remap] profile discovery failed: {}", e);
                e
            })?;
        Ok(GLOBAL
            .get_or_init(|| ArcSwap::from_pointee(mapper))
            .load_full())
    }

    /// Replace the process-wide default engine.
    pub fn install_global(mapper: Mapper) {
        match GLOBAL.get() {
            Some(slot) => slot.store(Arc::new(mapper)),
            None => {
                if let Err(raced) = GLOBAL.set(ArcSwap::from_pointee(mapper)) {
                    if let Some(slot) = GLOBAL.get() {
                        slot.store(raced.load_full());
                    }
                }
            }
        }
        log::debug!("[remap] global mapper installed");
    }
}

impl Default for Mapper {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Mapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mapper")
            .field("config", &self.registry.config)
            .field("strategies", &self.registry.strategies)
            .field("profiles", &self.registry.profiles.len())
            .finish()
    }
}

/// Startup composition of a [`Mapper`].
///
/// Declarations are validated as they are made; [`MapperBuilder::build`]
/// fails with the first rejected one.
pub struct MapperBuilder {
    config: MapperConfig,
    strategies: StrategyRegistry,
    profiles: ProfileRegistry,
    discover: bool,
}

impl MapperBuilder {
    pub fn new() -> Self {
        Self {
            config: MapperConfig::default(),
            strategies: StrategyRegistry::builtin(),
            profiles: ProfileRegistry::new(),
            discover: false,
        }
    }

    pub fn config(mut self, config: MapperConfig) -> Self {
        self.config = config;
        self
    }

    /// Append a strategy after the built-ins.
    pub fn with_strategy(mut self, strategy: impl Strategy + 'static) -> Self {
        self.strategies.push(Arc::new(strategy));
        self
    }

    /// Insert a strategy ahead of the built-ins.
    pub fn prepend_strategy(mut self, strategy: impl Strategy + 'static) -> Self {
        self.strategies.prepend(Arc::new(strategy));
        self
    }

    /// Declare a profile for `(source, destination)`.
    pub fn define_profile<F>(mut self, source: &TypeRef, destination: &TypeRef, declare: F) -> Self
    where
        F: FnOnce(ProfileBuilder) -> ProfileBuilder,
    {
        self.profiles.define_profile(source, destination, declare);
        self
    }

    /// Declare a profile for every closed instantiation of an open pair.
    pub fn define_generic_profile<F>(
        mut self,
        source: &TypeRef,
        destination: &TypeRef,
        declare: F,
    ) -> Self
    where
        F: FnOnce(ProfileBuilder) -> ProfileBuilder,
    {
        self.profiles
            .define_generic_profile(source, destination, declare);
        self
    }

    /// Apply every profile registered with [`profile!`](crate::profile!).
    pub fn discover_profiles(mut self) -> Self {
        self.discover = true;
        self
    }

    /// Validate everything declared and freeze the engine.
    ///
    /// # Errors
    ///
    /// The first configuration error or rejected profile declaration.
    pub fn build(mut self) -> Result<Mapper> {
        self.config.validate()?;
        if self.discover {
            profile::discover(&mut self.profiles);
        }
        if let Some(e) = self.profiles.take_error() {
            return Err(e);
        }
        if self.strategies.is_empty() {
            return Err(Error::Argument("no strategies registered".into()));
        }
        Ok(self.assemble())
    }

    fn assemble(self) -> Mapper {
        let metadata = MetadataCache::new(self.config.metadata_cache_capacity);
        for pair in self.profiles.pairs() {
            metadata.pin(&pair.source);
            metadata.pin(&pair.destination);
        }
        log::debug!(
            "[remap] mapper ready: {} strategies, {} profiles, {:?} nulls, {:?} depth",
            self.strategies.len(),
            self.profiles.len(),
            self.config.null_policy,
            self.config.depth
        );
        Mapper {
            registry: Arc::new(Registry {
                config: self.config,
                strategies: self.strategies,
                profiles: self.profiles,
                metadata,
                plans: PlanCache::new(),
            }),
        }
    }
}

impl Default for MapperBuilder {
    fn default() -> Self {
        Self::new()
    }
}
