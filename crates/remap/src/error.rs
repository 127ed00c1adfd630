// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error taxonomy for plan synthesis, plan execution and configuration.

use std::fmt;

/// Errors raised by the mapping engine.
///
/// Configuration-time variants (`Argument`, `Config`) surface from
/// [`MapperBuilder::build`](crate::MapperBuilder::build). Every other
/// variant aborts the whole top-level `map` call: no partially built
/// destination value is ever returned.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    // ========================================================================
    // Synthesis Errors
    // ========================================================================
    /// No profile or strategy converts `source` into `destination`.
    TypeMismatch {
        source: String,
        destination: String,
    },
    /// Abstract, non-instantiable destination with nothing intercepting it.
    NoRoute { destination: String },
    /// Instance template could not be retargeted to a new type pair.
    Setup {
        authored: String,
        target: String,
        template: String,
        reason: String,
    },

    // ========================================================================
    // Execution Errors
    // ========================================================================
    /// Value exceeds the representable range of the target type.
    Overflow { value: String, target: String },
    /// Text could not be parsed into the target type.
    InvalidFormat { input: String, target: String },
    /// A user resolver, converter or callback failed.
    Resolver(String),

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Invalid configuration-time input (profiles, member rules, strategies).
    Argument(String),
    /// Engine configuration could not be loaded or is invalid.
    Config(String),
}

impl Error {
    pub(crate) fn mismatch(source: impl fmt::Display, destination: impl fmt::Display) -> Self {
        Error::TypeMismatch {
            source: source.to_string(),
            destination: destination.to_string(),
        }
    }

    pub(crate) fn overflow(value: impl fmt::Display, target: impl fmt::Display) -> Self {
        Error::Overflow {
            value: value.to_string(),
            target: target.to_string(),
        }
    }

    pub(crate) fn format(input: impl fmt::Display, target: impl fmt::Display) -> Self {
        Error::InvalidFormat {
            input: input.to_string(),
            target: target.to_string(),
        }
    }

    /// True for errors that can only be raised while composing the engine.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Argument(_) | Error::Config(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::TypeMismatch {
                source,
                destination,
            } => write!(f, "No mapping route from {} to {}", source, destination),
            Error::NoRoute { destination } => write!(
                f,
                "Cannot instantiate abstract destination {} (register a profile or strategy)",
                destination
            ),
            Error::Setup {
                authored,
                target,
                template,
                reason,
            } => write!(
                f,
                "Cannot retarget instance template {} authored for {} to {}: {}",
                template, authored, target, reason
            ),
            Error::Overflow { value, target } => {
                write!(f, "Value {} is out of range for {}", value, target)
            }
            Error::InvalidFormat { input, target } => {
                write!(f, "Cannot parse {:?} as {}", input, target)
            }
            Error::Resolver(msg) => write!(f, "Resolver failed: {}", msg),
            Error::Argument(msg) => write!(f, "Invalid argument: {}", msg),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// Convenient alias for results using the crate `Error` type.
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_both_types() {
        let err = Error::mismatch("UserDto", "Int32");
        let text = err.to_string();
        assert!(text.contains("UserDto"));
        assert!(text.contains("Int32"));
    }

    #[test]
    fn test_configuration_classification() {
        assert!(Error::Argument("x".into()).is_configuration());
        assert!(Error::Config("x".into()).is_configuration());
        assert!(!Error::overflow(300, "Byte").is_configuration());
    }
}
