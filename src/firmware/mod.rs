//! Firmware checkout identity.

mod installation;
mod version;

pub use installation::{
    FirmwareInstallation, InstallationCache, InstallationLocator, NoVersionSource, VersionSource,
    KLIPPER_PATH_ENV, UNKNOWN_VERSION,
};
pub use version::{FirmwareComparand, FirmwareVersion};
