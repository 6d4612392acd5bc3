use std::io;

use thiserror::Error;

/// Library-wide error type for azprov operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Configuration or environment issue.
    #[error("{0}")]
    Configuration(String),

    /// Environment name outside the supported set.
    #[error("Invalid environment '{0}': must be one of dev, uat, prod")]
    InvalidEnvironment(String),

    /// Base name or role identifier is malformed.
    #[error("Invalid {what} '{value}': {reason}")]
    InvalidIdentifier { what: &'static str, value: String, reason: String },

    /// Resource kind label is unknown.
    #[error("Unknown resource kind '{0}'")]
    UnknownKind(String),

    /// Manifest file not found at the given path.
    #[error("Manifest not found: {0}. Run 'azprov init' first.")]
    ManifestNotFound(String),

    /// Manifest already present when scaffolding.
    #[error("Manifest already exists: {0} (use --force to overwrite)")]
    ManifestExists(String),

    /// Manifest content is structurally valid but semantically wrong.
    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    /// Role referenced by a dependency, parent, property or group does not exist.
    #[error("Resource '{role}' references unknown role '{target}'")]
    UnknownRole { role: String, target: String },

    /// Target passed on the command line matches neither a role nor a group.
    #[error("Unknown target '{name}'. Available: {available}")]
    UnknownTarget { name: String, available: String },

    /// Two resources resolve to the same provider name.
    #[error("Resources '{first}' and '{second}' both resolve to {kind} name '{name}'")]
    NameCollision { kind: String, name: String, first: String, second: String },

    /// Circular dependency between resources.
    #[error("Circular dependency detected: {0}")]
    CircularDependency(String),

    /// Property template rendering failed.
    #[error("Failed to render property '{property}' of '{role}': {details}")]
    Template { role: String, property: String, details: String },

    /// The provider CLI has no authenticated session.
    #[error("Not logged in to Azure CLI: {0}. Run 'az login' first.")]
    NotAuthenticated(String),

    /// Target resource group is absent.
    #[error("Resource group '{0}' does not exist (use --create-group to create it)")]
    ResourceGroupMissing(String),

    /// A create was attempted before its dependencies exist.
    #[error("Cannot create '{resource}': dependency '{dependency}' is not present")]
    DependencyMissing { resource: String, dependency: String },

    /// A delete was refused because live dependents still reference the resource.
    #[error("Refusing to delete '{resource}': still referenced by {dependents}")]
    DependentsPresent { resource: String, dependents: String },

    /// A provider CLI invocation failed.
    #[error("Provider error running '{command}': {details}")]
    Provider { command: String, details: String },

    /// Parse error.
    #[error("Failed to parse {what}: {details}")]
    ParseError { what: String, details: String },

    /// Run stopped after a critical step failed.
    #[error("Aborted after critical step '{role}' failed")]
    Aborted { role: String },

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    /// YAML parsing error.
    #[error("YAML parse error: {0}")]
    YamlParseError(#[from] serde_yaml::Error),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonParseError(#[from] serde_json::Error),
}

/// Coarse failure category used for reporting and exit decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Input or state did not satisfy a precondition; nothing was attempted.
    Precondition,
    /// The provider rejected or failed an operation.
    Provider,
    /// Local failure unrelated to the provider.
    Internal,
}

impl AppError {
    pub fn config_error<S: Into<String>>(message: S) -> Self {
        AppError::Configuration(message.into())
    }

    pub fn manifest<S: Into<String>>(message: S) -> Self {
        AppError::InvalidManifest(message.into())
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            AppError::Provider { .. } | AppError::Aborted { .. } => ErrorCategory::Provider,
            AppError::Io(_) | AppError::ParseError { .. } => ErrorCategory::Internal,
            AppError::Configuration(_)
            | AppError::InvalidEnvironment(_)
            | AppError::InvalidIdentifier { .. }
            | AppError::UnknownKind(_)
            | AppError::ManifestNotFound(_)
            | AppError::ManifestExists(_)
            | AppError::InvalidManifest(_)
            | AppError::UnknownRole { .. }
            | AppError::UnknownTarget { .. }
            | AppError::NameCollision { .. }
            | AppError::CircularDependency(_)
            | AppError::Template { .. }
            | AppError::NotAuthenticated(_)
            | AppError::ResourceGroupMissing(_)
            | AppError::DependencyMissing { .. }
            | AppError::DependentsPresent { .. }
            | AppError::TomlParseError(_)
            | AppError::YamlParseError(_)
            | AppError::JsonParseError(_) => ErrorCategory::Precondition,
        }
    }
}
