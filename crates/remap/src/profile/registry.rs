// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::builder::{family_params, ProfileBuilder};
use super::{Profile, ProfileMatch};
use crate::error::Error;
use crate::factory;
use crate::types::{Substitution, TypeRef, TypePair};
use std::collections::HashMap;
use std::sync::Arc;

/// Profiles declared while the engine is composed.
///
/// Lookup order for a concrete pair: exact pair, included destination
/// subtype, the source's base chain (nearest first), then generic families
/// in registration order.
#[derive(Debug, Default)]
pub struct ProfileRegistry {
    exact: HashMap<TypePair, Arc<Profile>>,
    included: HashMap<TypePair, Arc<Profile>>,
    families: Vec<Arc<Profile>>,
    errors: Vec<Error>,
}

impl ProfileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a profile for one concrete pair.
    pub fn define_profile<F>(&mut self, source: &TypeRef, destination: &TypeRef, declare: F)
    where
        F: FnOnce(ProfileBuilder) -> ProfileBuilder,
    {
        self.add(declare(ProfileBuilder::new(source, destination, false)));
    }

    /// Declare a profile for every closed instantiation of an open pair.
    pub fn define_generic_profile<F>(&mut self, source: &TypeRef, destination: &TypeRef, declare: F)
    where
        F: FnOnce(ProfileBuilder) -> ProfileBuilder,
    {
        self.add(declare(ProfileBuilder::new(source, destination, true)));
    }

    fn add(&mut self, builder: ProfileBuilder) {
        match builder.finish() {
            Ok(profile) => self.insert(profile),
            Err(e) => {
                log::warn!("[profile] rejected declaration: {}", e);
                self.errors.push(e);
            }
        }
    }

    fn insert(&mut self, profile: Profile) {
        let profile = Arc::new(profile);
        let pair = profile.pair().clone();

        if profile.is_family() {
            log::debug!("[profile] registered family {}", pair);
            self.families.push(profile);
            return;
        }

        if self.exact.contains_key(&pair) {
            self.errors
                .push(Error::Argument(format!("duplicate profile for {}", pair)));
            return;
        }
        for subtype in profile.includes() {
            let included = TypePair::new(&pair.source, subtype);
            if self.included.contains_key(&included) || self.exact.contains_key(&included) {
                self.errors.push(Error::Argument(format!(
                    "{} is already covered by another profile",
                    included
                )));
                return;
            }
            self.included.insert(included, profile.clone());
        }
        log::debug!("[profile] registered {}", pair);
        self.exact.insert(pair, profile);
    }

    /// Profile applying to `pair`, if any.
    pub fn lookup(&self, pair: &TypePair) -> Option<ProfileMatch> {
        let found = |profile: &Arc<Profile>, via_include: bool| ProfileMatch {
            profile: profile.clone(),
            authored: profile.pair().clone(),
            target: pair.clone(),
            via_include,
        };

        if let Some(profile) = self.exact.get(pair) {
            return Some(found(profile, false));
        }
        if let Some(profile) = self.included.get(pair) {
            return Some(found(profile, true));
        }

        for base in pair.source.base_chain() {
            let inherited = TypePair::new(&base, &pair.destination);
            if let Some(profile) = self.exact.get(&inherited) {
                return Some(found(profile, false));
            }
            if let Some(profile) = self.included.get(&inherited) {
                return Some(found(profile, true));
            }
        }

        self.families
            .iter()
            .find(|family| family_matches(family, pair))
            .map(|family| found(family, false))
    }

    /// Concrete pairs with an exact profile.
    pub fn pairs(&self) -> impl Iterator<Item = &TypePair> {
        self.exact.keys()
    }

    pub fn len(&self) -> usize {
        self.exact.len() + self.families.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Declarations rejected so far.
    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    pub(crate) fn take_error(&mut self) -> Option<Error> {
        if self.errors.is_empty() {
            None
        } else {
            Some(self.errors.remove(0))
        }
    }

    pub(crate) fn reject(&mut self, error: Error) {
        self.errors.push(error);
    }
}

fn family_matches(family: &Profile, pair: &TypePair) -> bool {
    let authored = family.pair();
    let mut subst = Substitution::new();
    if !factory::unify(&authored.source, &pair.source, &mut subst)
        || !factory::unify(&authored.destination, &pair.destination, &mut subst)
    {
        return false;
    }
    let Some(args) = family_params(authored)
        .iter()
        .map(|p| subst.get(p.name()).cloned())
        .collect::<Option<Vec<_>>>()
    else {
        return false;
    };
    family.constraint().map_or(true, |c| c.satisfied(&args))
}
