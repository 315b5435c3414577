pub mod chaos;
pub mod version;

pub use chaos::{ChaosMode, ChaosState};
pub use version::{VersionInfo, SERVICE_VERSION};
