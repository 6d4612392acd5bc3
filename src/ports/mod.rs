mod control_plane;
mod reporter;

pub use control_plane::{Account, AccountUser, ControlPlane};
pub use reporter::{NoopReporter, Reporter};
