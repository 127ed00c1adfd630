// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Link-time profile registration.
//!
//! Profiles declared anywhere in the final binary with [`profile!`] are
//! collected at link time and applied by
//! [`MapperBuilder::discover_profiles`](crate::MapperBuilder::discover_profiles).
//!
//! ```rust,ignore
//! remap::profile!("orders", |registry| {
//!     registry.define_profile(&order_dto(), &order_view(), |p| p.ignore("Secret"));
//! });
//! ```
//!
//! [`profile!`]: crate::profile!

use super::ProfileRegistry;
use crate::error::Error;

/// One collected profile registration.
pub struct ProfileRegistration {
    /// Name used in logs and errors; must not be empty.
    pub name: &'static str,
    pub register: fn(&mut ProfileRegistry),
}

inventory::collect!(ProfileRegistration);

/// Submit a profile registration for discovery.
#[macro_export]
macro_rules! profile {
    ($name:expr, $register:expr $(,)?) => {
        $crate::inventory::submit! {
            $crate::profile::ProfileRegistration {
                name: $name,
                register: $register,
            }
        }
    };
}

/// Every collected registration, sorted by name.
pub fn registrations() -> Vec<&'static ProfileRegistration> {
    let mut all: Vec<_> = inventory::iter::<ProfileRegistration>().collect();
    all.sort_by_key(|r| r.name);
    all
}

/// Apply every collected registration to `registry`; returns how many ran.
pub(crate) fn discover(registry: &mut ProfileRegistry) -> usize {
    let mut applied = 0;
    for registration in registrations() {
        if registration.name.trim().is_empty() {
            registry.reject(Error::Argument(
                "profile registration with an empty name".into(),
            ));
            continue;
        }
        log::debug!("[discovery] applying profile set '{}'", registration.name);
        (registration.register)(registry);
        applied += 1;
    }
    log::debug!("[discovery] {} profile set(s) applied", applied);
    applied
}
