//! Locating the firmware checkout and remembering what was found.
//!
//! Obtaining a describe string is delegated to a [`VersionSource`]; the core
//! never spawns processes itself. The [`InstallationCache`] is created once at
//! startup and handed to whatever needs "the current installation".

use super::version::FirmwareVersion;
use crate::config::FirmwareConfig;
use crate::error::{Result, VersionError};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Environment variable overriding the checkout location.
pub const KLIPPER_PATH_ENV: &str = "KBOARD_KLIPPER_PATH";

/// Label used wherever a version could not be obtained.
pub const UNKNOWN_VERSION: &str = "(unknown version)";

/// Supplies the raw describe string for a checkout.
pub trait VersionSource {
    /// Describe the checkout at `path`, or `None` when no string is available.
    fn describe(&self, path: &Path) -> Option<String>;
}

/// A source that never has a version; useful when only the path matters.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoVersionSource;

impl VersionSource for NoVersionSource {
    fn describe(&self, _path: &Path) -> Option<String> {
        None
    }
}

/// A located checkout and its version, if one could be determined.
#[derive(Debug, Clone, Serialize)]
pub struct FirmwareInstallation {
    pub path: PathBuf,
    pub describe: Option<String>,
    pub version: Option<FirmwareVersion>,
}

impl FirmwareInstallation {
    /// Ask `source` for the checkout's describe string and parse it.
    ///
    /// A missing or unparseable string leaves the version unknown.
    pub fn probe(path: PathBuf, source: &dyn VersionSource) -> Self {
        let describe = source.describe(&path);
        let version = describe
            .as_deref()
            .and_then(|raw| match FirmwareVersion::parse(raw) {
                Ok(version) => Some(version),
                Err(e) => {
                    tracing::warn!("Ignoring firmware version at {}: {e}", path.display());
                    None
                }
            });
        if describe.is_none() {
            tracing::debug!("No version source for {}", path.display());
        }
        Self {
            path,
            describe,
            version,
        }
    }

    /// The describe string, or a placeholder when unknown.
    #[must_use]
    pub fn version_label(&self) -> &str {
        self.version
            .as_ref()
            .map_or(UNKNOWN_VERSION, |version| version.raw.as_str())
    }
}

// ============================================================================
// Installation Discovery
// ============================================================================

/// Search order for the firmware checkout.
///
/// 1. Explicit path, if provided
/// 2. The `KBOARD_KLIPPER_PATH` override
/// 3. Configured search paths
/// 4. `~/klipper`, `~/Klipper`, `/usr/src/klipper`
#[derive(Debug, Clone, Default)]
pub struct InstallationLocator {
    explicit: Option<PathBuf>,
    env_override: Option<PathBuf>,
    search_paths: Vec<PathBuf>,
}

impl InstallationLocator {
    /// Locator reading the environment override and default locations.
    #[must_use]
    pub fn new() -> Self {
        Self {
            explicit: None,
            env_override: std::env::var_os(KLIPPER_PATH_ENV).map(PathBuf::from),
            search_paths: default_search_paths(),
        }
    }

    /// Locator honouring the configured path and extra search paths.
    #[must_use]
    pub fn from_config(config: &FirmwareConfig) -> Self {
        let mut locator = Self::new().with_explicit(config.path.clone());
        let mut search_paths = config.search_paths.clone();
        search_paths.append(&mut locator.search_paths);
        locator.search_paths = search_paths;
        locator
    }

    #[must_use]
    pub fn with_explicit(mut self, path: Option<PathBuf>) -> Self {
        self.explicit = path;
        self
    }

    #[must_use]
    pub fn with_env_override(mut self, path: Option<PathBuf>) -> Self {
        self.env_override = path;
        self
    }

    #[must_use]
    pub fn with_search_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.search_paths = paths;
        self
    }

    /// Find the checkout directory.
    ///
    /// An explicit path or environment override that does not exist is an
    /// error rather than a reason to keep searching.
    pub fn locate(&self) -> Result<PathBuf> {
        if let Some(path) = &self.explicit {
            return require_existing(path, "configured firmware path");
        }
        if let Some(path) = &self.env_override {
            return require_existing(path, KLIPPER_PATH_ENV);
        }
        self.search_paths
            .iter()
            .find(|path| path.exists())
            .cloned()
            .ok_or_else(|| VersionError::InstallationNotFound {
                searched: self
                    .search_paths
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

fn require_existing(path: &Path, origin: &str) -> Result<PathBuf> {
    if path.exists() {
        Ok(path.to_path_buf())
    } else {
        Err(VersionError::config(format!(
            "{origin} {} does not exist",
            path.display()
        )))
    }
}

fn default_search_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join("klipper"));
        paths.push(home.join("Klipper"));
    }
    paths.push(PathBuf::from("/usr/src/klipper"));
    paths
}

// ============================================================================
// Installation Cache
// ============================================================================

/// Write-once holder for the current installation.
///
/// The first successful lookup wins; later calls return it without touching
/// the locator or the version source again.
#[derive(Debug, Default)]
pub struct InstallationCache {
    cell: OnceLock<FirmwareInstallation>,
}

impl InstallationCache {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
        }
    }

    /// The installation, if one has been found.
    #[must_use]
    pub fn get(&self) -> Option<&FirmwareInstallation> {
        self.cell.get()
    }

    /// Return the cached installation, locating and probing it on first use.
    ///
    /// A failed lookup is not cached.
    pub fn get_or_locate(
        &self,
        locator: &InstallationLocator,
        source: &dyn VersionSource,
    ) -> Result<&FirmwareInstallation> {
        if let Some(found) = self.cell.get() {
            return Ok(found);
        }
        let installation = FirmwareInstallation::probe(locator.locate()?, source);
        tracing::info!(
            "Found firmware {} at {}",
            installation.version_label(),
            installation.path.display()
        );
        Ok(self.cell.get_or_init(|| installation))
    }
}
