use serde::{Deserialize, Serialize};

use crate::domain::{AppError, ResolvedResource, ResourceDescriptor, ResourceState};

/// Authenticated provider session, as reported by `az account show`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Account {
    /// Subscription id.
    pub id: String,
    /// Subscription display name.
    pub name: String,
    #[serde(default)]
    pub user: Option<AccountUser>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AccountUser {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// Port onto the cloud provider's control plane.
///
/// Every call blocks until the provider CLI returns.
pub trait ControlPlane {
    /// Current authenticated session. Fails with `NotAuthenticated` when logged out.
    fn account(&self) -> Result<Account, AppError>;

    /// Make `subscription` the active subscription for subsequent calls.
    fn select_subscription(&self, subscription: &str) -> Result<(), AppError>;

    fn group_exists(&self, name: &str) -> Result<bool, AppError>;

    fn create_group(&self, name: &str, location: &str) -> Result<(), AppError>;

    /// Live state of a single resource.
    fn state(&self, resource: &ResourceDescriptor) -> Result<ResourceState, AppError>;

    fn create(&self, resource: &ResolvedResource) -> Result<(), AppError>;

    fn delete(&self, resource: &ResolvedResource) -> Result<(), AppError>;

    /// Names of live resources that the provider knows still hang off `resource`
    /// (web apps on a plan, databases on a server, subnets in a network).
    fn attached(&self, resource: &ResourceDescriptor) -> Result<Vec<String>, AppError>;
}
