pub mod dependency_graph;
pub mod environment;
pub mod error;
pub mod manifest;
pub mod naming;
pub mod plan;
pub mod resource;

pub use dependency_graph::DependencyGraph;
pub use environment::Environment;
pub use error::{AppError, ErrorCategory};
pub use manifest::{
    MANIFEST_FILE, Manifest, Overrides, RenderMode, ResolvedManifest, ResolvedResource, ResourceSpec,
};
pub use naming::{BaseName, NamingPolicy, Role, resource_name};
pub use plan::{Action, Disposition, Operation, Plan, PlanStep};
pub use resource::{ResourceDescriptor, ResourceKind, ResourceState};
