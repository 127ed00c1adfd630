// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Engine configuration.
//!
//! # Example YAML
//!
//! ```yaml
//! # remap.yaml
//! null_policy: permissive
//! depth: shallow
//! metadata_cache_capacity: 1024
//! dictionary_key_case: snake
//! ```
//!
//! Every key is optional; enum values are matched case-insensitively.

use crate::error::{Error, Result};
use crate::metadata;
use crate::naming::NameCase;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// How nested null source values are carried into the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NullPolicy {
    /// Skip the assignment; the destination member keeps its initial value.
    #[default]
    Strict,
    /// Assign the destination member's default explicitly.
    Permissive,
}

/// Behaviour when the destination is directly assignable from the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DepthMode {
    /// Rebuild a detached copy member by member.
    #[default]
    Deep,
    /// Alias the source instance into the destination.
    Shallow,
}

/// Mapper configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapperConfig {
    pub null_policy: NullPolicy,
    pub depth: DepthMode,
    /// Capacity of the member metadata LRU cache.
    pub metadata_cache_capacity: usize,
    /// Key spelling used when projecting objects into string-keyed maps.
    pub dictionary_key_case: NameCase,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            null_policy: NullPolicy::Strict,
            depth: DepthMode::Deep,
            metadata_cache_capacity: metadata::DEFAULT_CAPACITY,
            dictionary_key_case: NameCase::AsIs,
        }
    }
}

impl MapperConfig {
    pub fn null_policy(mut self, policy: NullPolicy) -> Self {
        self.null_policy = policy;
        self
    }

    pub fn depth(mut self, depth: DepthMode) -> Self {
        self.depth = depth;
        self
    }

    pub fn metadata_cache_capacity(mut self, capacity: usize) -> Self {
        self.metadata_cache_capacity = capacity;
        self
    }

    pub fn dictionary_key_case(mut self, case: NameCase) -> Self {
        self.dictionary_key_case = case;
        self
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.metadata_cache_capacity == 0 {
            return Err(Error::Config(
                "metadata_cache_capacity must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Load from a YAML file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("[config] loading mapper config from {}", path.display());
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parse YAML content.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let doc: YamlMapperConfig = if content.trim().is_empty() {
            YamlMapperConfig::default()
        } else {
            serde_yaml::from_str(content)
                .map_err(|e| Error::Config(format!("Failed to parse YAML: {}", e)))?
        };
        doc.into_config()
    }
}

/// Root YAML document structure.
#[derive(Debug, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct YamlMapperConfig {
    /// STRICT or PERMISSIVE
    pub null_policy: Option<String>,
    /// DEEP or SHALLOW
    pub depth: Option<String>,
    pub metadata_cache_capacity: Option<usize>,
    /// AS_IS, CAMEL, PASCAL, SNAKE, KEBAB or SCREAMING_SNAKE
    pub dictionary_key_case: Option<String>,
}

impl YamlMapperConfig {
    pub fn into_config(self) -> Result<MapperConfig> {
        let mut config = MapperConfig::default();

        if let Some(ref policy) = self.null_policy {
            config.null_policy = match normalize(policy).as_str() {
                "STRICT" => NullPolicy::Strict,
                "PERMISSIVE" => NullPolicy::Permissive,
                other => return Err(Error::Config(format!("Invalid null_policy: {}", other))),
            };
        }

        if let Some(ref depth) = self.depth {
            config.depth = match normalize(depth).as_str() {
                "DEEP" => DepthMode::Deep,
                "SHALLOW" => DepthMode::Shallow,
                other => return Err(Error::Config(format!("Invalid depth: {}", other))),
            };
        }

        if let Some(capacity) = self.metadata_cache_capacity {
            config.metadata_cache_capacity = capacity;
        }

        if let Some(ref case) = self.dictionary_key_case {
            config.dictionary_key_case = match normalize(case).as_str() {
                "AS_IS" | "ASIS" | "NONE" => NameCase::AsIs,
                "CAMEL" => NameCase::Camel,
                "PASCAL" => NameCase::Pascal,
                "SNAKE" => NameCase::Snake,
                "KEBAB" => NameCase::Kebab,
                "SCREAMING_SNAKE" | "UPPER_SNAKE" => NameCase::ScreamingSnake,
                other => {
                    return Err(Error::Config(format!("Invalid dictionary_key_case: {}", other)))
                }
            };
        }

        config.validate()?;
        Ok(config)
    }
}

fn normalize(raw: &str) -> String {
    raw.trim().to_uppercase().replace('-', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MapperConfig::default();
        assert_eq!(config.null_policy, NullPolicy::Strict);
        assert_eq!(config.depth, DepthMode::Deep);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_yaml() {
        let yaml = r#"
null_policy: permissive
depth: SHALLOW
metadata_cache_capacity: 64
dictionary_key_case: screaming-snake
"#;
        let config = MapperConfig::from_yaml_str(yaml).expect("parse");
        assert_eq!(config.null_policy, NullPolicy::Permissive);
        assert_eq!(config.depth, DepthMode::Shallow);
        assert_eq!(config.metadata_cache_capacity, 64);
        assert_eq!(config.dictionary_key_case, NameCase::ScreamingSnake);
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(MapperConfig::from_yaml_str("").expect("parse"), MapperConfig::default());
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            MapperConfig::from_yaml_str("null_policy: sometimes"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            MapperConfig::from_yaml_str("metadata_cache_capacity: 0"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            MapperConfig::from_yaml_str("unknown_key: 1"),
            Err(Error::Config(_))
        ));
    }
}
