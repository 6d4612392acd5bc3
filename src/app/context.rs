use crate::ports::{ControlPlane, Reporter};

/// Application context holding dependencies for command execution.
pub struct AppContext<C: ControlPlane, R: Reporter> {
    cloud: C,
    reporter: R,
}

impl<C: ControlPlane, R: Reporter> AppContext<C, R> {
    /// Create a new application context.
    pub fn new(cloud: C, reporter: R) -> Self {
        Self { cloud, reporter }
    }

    /// Get a reference to the provider control plane.
    pub fn cloud(&self) -> &C {
        &self.cloud
    }

    /// Get a reference to the progress reporter.
    pub fn reporter(&self) -> &R {
        &self.reporter
    }
}
