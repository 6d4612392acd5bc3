use std::fmt;

use serde::{Deserialize, Serialize};

use super::AppError;
use super::naming::NamingPolicy;

/// Azure resource types the provisioner knows how to manage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    VirtualNetwork,
    Subnet,
    NetworkSecurityGroup,
    AppServicePlan,
    WebApp,
    SqlServer,
    SqlDatabase,
    KeyVault,
    StorageAccount,
    PrivateEndpoint,
    TemplateDeployment,
}

/// A property whose value names another role in the manifest.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceKey {
    pub key: &'static str,
    pub kinds: &'static [ResourceKind],
}

const PRIVATE_LINK_TARGETS: &[ResourceKind] = &[
    ResourceKind::SqlServer,
    ResourceKind::KeyVault,
    ResourceKind::StorageAccount,
    ResourceKind::WebApp,
];

impl ResourceKind {
    pub const ALL: [ResourceKind; 11] = [
        ResourceKind::VirtualNetwork,
        ResourceKind::Subnet,
        ResourceKind::NetworkSecurityGroup,
        ResourceKind::AppServicePlan,
        ResourceKind::WebApp,
        ResourceKind::SqlServer,
        ResourceKind::SqlDatabase,
        ResourceKind::KeyVault,
        ResourceKind::StorageAccount,
        ResourceKind::PrivateEndpoint,
        ResourceKind::TemplateDeployment,
    ];

    /// Manifest label.
    pub fn label(&self) -> &'static str {
        match self {
            ResourceKind::VirtualNetwork => "virtual-network",
            ResourceKind::Subnet => "subnet",
            ResourceKind::NetworkSecurityGroup => "network-security-group",
            ResourceKind::AppServicePlan => "app-service-plan",
            ResourceKind::WebApp => "web-app",
            ResourceKind::SqlServer => "sql-server",
            ResourceKind::SqlDatabase => "sql-database",
            ResourceKind::KeyVault => "key-vault",
            ResourceKind::StorageAccount => "storage-account",
            ResourceKind::PrivateEndpoint => "private-endpoint",
            ResourceKind::TemplateDeployment => "template-deployment",
        }
    }

    pub fn from_label(label: &str) -> Result<ResourceKind, AppError> {
        ResourceKind::ALL
            .into_iter()
            .find(|kind| kind.label() == label)
            .ok_or_else(|| AppError::UnknownKind(label.to_string()))
    }

    /// How names for this kind are derived from `{base}-{env}-{role}`.
    pub fn naming_policy(&self) -> NamingPolicy {
        match self {
            ResourceKind::StorageAccount => NamingPolicy::Alphanumeric { max_len: 24 },
            ResourceKind::KeyVault => NamingPolicy::Hyphenated { max_len: 24, lowercase: true },
            ResourceKind::SqlServer => NamingPolicy::Hyphenated { max_len: 63, lowercase: true },
            ResourceKind::WebApp => NamingPolicy::Hyphenated { max_len: 60, lowercase: true },
            ResourceKind::AppServicePlan => {
                NamingPolicy::Hyphenated { max_len: 40, lowercase: false }
            }
            ResourceKind::VirtualNetwork | ResourceKind::TemplateDeployment => {
                NamingPolicy::Hyphenated { max_len: 64, lowercase: false }
            }
            ResourceKind::Subnet
            | ResourceKind::NetworkSecurityGroup
            | ResourceKind::PrivateEndpoint => {
                NamingPolicy::Hyphenated { max_len: 80, lowercase: false }
            }
            ResourceKind::SqlDatabase => NamingPolicy::Hyphenated { max_len: 128, lowercase: false },
        }
    }

    /// Kind of the resource that scopes this one, if any.
    pub fn parent_kind(&self) -> Option<ResourceKind> {
        match self {
            ResourceKind::Subnet => Some(ResourceKind::VirtualNetwork),
            ResourceKind::SqlDatabase => Some(ResourceKind::SqlServer),
            _ => None,
        }
    }

    /// Properties that name other roles and therefore imply a dependency edge.
    pub fn reference_keys(&self) -> &'static [ReferenceKey] {
        match self {
            ResourceKind::Subnet => {
                &[ReferenceKey { key: "nsg", kinds: &[ResourceKind::NetworkSecurityGroup] }]
            }
            ResourceKind::WebApp => &[
                ReferenceKey { key: "plan", kinds: &[ResourceKind::AppServicePlan] },
                ReferenceKey { key: "subnet", kinds: &[ResourceKind::Subnet] },
            ],
            ResourceKind::PrivateEndpoint => &[
                ReferenceKey { key: "target", kinds: PRIVATE_LINK_TARGETS },
                ReferenceKey { key: "subnet", kinds: &[ResourceKind::Subnet] },
            ],
            _ => &[],
        }
    }

    /// Properties that must be present after rendering.
    pub fn required_properties(&self) -> &'static [&'static str] {
        match self {
            ResourceKind::VirtualNetwork | ResourceKind::Subnet => &["address_prefix"],
            ResourceKind::WebApp => &["plan"],
            ResourceKind::SqlServer => &["admin_user", "admin_password"],
            ResourceKind::PrivateEndpoint => &["target", "subnet", "group_id"],
            ResourceKind::TemplateDeployment => &["template"],
            _ => &[],
        }
    }

    /// Whether the provider accepts `--no-wait` for create and delete of this kind.
    pub fn supports_no_wait(&self) -> bool {
        matches!(
            self,
            ResourceKind::SqlDatabase
                | ResourceKind::PrivateEndpoint
                | ResourceKind::TemplateDeployment
        )
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Identity of one provider resource: (type, name, resource group).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceDescriptor {
    pub kind: ResourceKind,
    pub role: String,
    pub name: String,
    pub resource_group: String,
    /// Name of the scoping parent (virtual network for a subnet, server for a database).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

impl fmt::Display for ResourceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.parent {
            Some(parent) => write!(f, "{} {}/{}", self.kind, parent, self.name),
            None => write!(f, "{} {}", self.kind, self.name),
        }
    }
}

/// Live lifecycle state of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceState {
    Present,
    Absent,
}

impl ResourceState {
    pub fn is_present(&self) -> bool {
        matches!(self, ResourceState::Present)
    }
}

impl fmt::Display for ResourceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ResourceState::Present => "present",
            ResourceState::Absent => "absent",
        })
    }
}
