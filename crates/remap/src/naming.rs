// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Naming-case transformer used for string-keyed member matching.

use heck::{ToKebabCase, ToLowerCamelCase, ToShoutySnakeCase, ToSnakeCase, ToUpperCamelCase};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Naming convention applied to member names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameCase {
    /// Keep the declared name.
    #[default]
    AsIs,
    /// `firstName`
    Camel,
    /// `FirstName`
    Pascal,
    /// `first_name`
    Snake,
    /// `first-name`
    Kebab,
    /// `FIRST_NAME`
    ScreamingSnake,
}

impl NameCase {
    pub const ALL: [NameCase; 6] = [
        NameCase::AsIs,
        NameCase::Camel,
        NameCase::Pascal,
        NameCase::Snake,
        NameCase::Kebab,
        NameCase::ScreamingSnake,
    ];

    pub fn apply(&self, name: &str) -> String {
        match self {
            NameCase::AsIs => name.to_string(),
            NameCase::Camel => name.to_lower_camel_case(),
            NameCase::Pascal => name.to_upper_camel_case(),
            NameCase::Snake => name.to_snake_case(),
            NameCase::Kebab => name.to_kebab_case(),
            NameCase::ScreamingSnake => name.to_shouty_snake_case(),
        }
    }
}

/// Every spelling of `name` across all naming cases, declared name first,
/// without duplicates.
pub fn aliases(name: &str) -> Vec<Arc<str>> {
    let mut out: Vec<Arc<str>> = Vec::with_capacity(NameCase::ALL.len());
    for case in NameCase::ALL {
        let spelled = case.apply(name);
        if !out.iter().any(|a| a.eq_ignore_ascii_case(&spelled)) {
            out.push(Arc::from(spelled));
        }
    }
    out
}
