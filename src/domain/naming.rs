//! Deterministic resource naming.
//!
//! Every provider name is derived from `{base}-{environment}-{role}` and then
//! sanitized for the target resource kind. The same inputs always produce the
//! same name, which is what makes "does this already exist?" checks possible.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use super::{AppError, Environment, ResourceKind};

/// Character-set and length rules applied after joining the name segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamingPolicy {
    /// Keep hyphens; optionally lowercase; truncate and trim trailing hyphens.
    Hyphenated { max_len: usize, lowercase: bool },
    /// Strip everything but ASCII alphanumerics, lowercase, truncate.
    Alphanumeric { max_len: usize },
}

impl NamingPolicy {
    pub fn apply(&self, raw: &str) -> String {
        match *self {
            NamingPolicy::Hyphenated { max_len, lowercase } => {
                let cased = if lowercase { raw.to_ascii_lowercase() } else { raw.to_string() };
                let truncated: String = cased.chars().take(max_len).collect();
                truncated.trim_end_matches('-').to_string()
            }
            NamingPolicy::Alphanumeric { max_len } => raw
                .chars()
                .filter(char::is_ascii_alphanumeric)
                .map(|c| c.to_ascii_lowercase())
                .take(max_len)
                .collect(),
        }
    }
}

fn validate_segment(
    what: &'static str,
    value: &str,
    min_len: usize,
    max_len: usize,
) -> Result<(), AppError> {
    let invalid = |reason: &str| AppError::InvalidIdentifier {
        what,
        value: value.to_string(),
        reason: reason.to_string(),
    };

    if value.len() < min_len || value.len() > max_len {
        return Err(invalid(&format!("length must be between {} and {}", min_len, max_len)));
    }
    if !value.starts_with(|c: char| c.is_ascii_lowercase()) {
        return Err(invalid("must start with a lowercase letter"));
    }
    if !value.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-') {
        return Err(invalid("only lowercase ASCII letters, digits and hyphens are allowed"));
    }
    if value.ends_with('-') || value.contains("--") {
        return Err(invalid("hyphens must separate non-empty segments"));
    }
    Ok(())
}

/// Validated application base name, e.g. `bo-gpsc-reports`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct BaseName(String);

impl BaseName {
    pub fn new(value: &str) -> Result<Self, AppError> {
        validate_segment("base name", value, 2, 40)?;
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BaseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for BaseName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        BaseName::new(&s).map_err(serde::de::Error::custom)
    }
}

/// Validated logical role of a resource, e.g. `backend` or `sqlserver`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    pub fn new(value: &str) -> Result<Self, AppError> {
        validate_segment("role", value, 1, 40)?;
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Role {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Role::new(&s).map_err(serde::de::Error::custom)
    }
}

/// Provider name for `role` of `kind` in `environment`.
pub fn resource_name(
    base: &BaseName,
    environment: Environment,
    role: &Role,
    kind: ResourceKind,
) -> String {
    let raw = format!("{}-{}-{}", base, environment.label(), role);
    kind.naming_policy().apply(&raw)
}

/// Resource group used when neither the command line nor the manifest names one.
pub fn default_resource_group(base: &BaseName, environment: Environment) -> String {
    format!("{}-{}-rg", base, environment.label())
}
