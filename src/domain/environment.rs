use std::fmt;

use serde::{Deserialize, Serialize};

use super::AppError;

/// Deployment environments supported by the naming convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development: cheapest SKUs, safe to tear down at will.
    Dev,
    /// User acceptance testing.
    Uat,
    /// Production.
    Prod,
}

impl Environment {
    /// All environments in promotion order.
    pub const ALL: [Environment; 3] = [Environment::Dev, Environment::Uat, Environment::Prod];

    /// Label used as the naming suffix and in manifests.
    pub fn label(&self) -> &'static str {
        match self {
            Environment::Dev => "dev",
            Environment::Uat => "uat",
            Environment::Prod => "prod",
        }
    }

    /// Parse an environment label. Matching is exact; `Dev` or `staging` are rejected.
    pub fn parse(value: &str) -> Result<Environment, AppError> {
        Environment::ALL
            .into_iter()
            .find(|env| env.label() == value)
            .ok_or_else(|| AppError::InvalidEnvironment(value.to_string()))
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
