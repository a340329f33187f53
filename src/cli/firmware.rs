//! `firmware` command handler.
//!
//! Reports the firmware checkout's version, either from a describe string
//! given on the command line or from the located installation.

use super::{emit, exit_code};
use crate::config::{FirmwareConfig, OutputFormat};
use crate::firmware::{
    FirmwareComparand, FirmwareVersion, InstallationCache, InstallationLocator, VersionSource,
    UNKNOWN_VERSION,
};
use anyhow::{Context, Result};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt::Write as _;
use std::path::PathBuf;

/// What is known about the firmware checkout.
#[derive(Debug, Clone, Serialize)]
pub struct FirmwareReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    pub version: Option<FirmwareVersion>,
    pub feature_line: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_feature_line: Option<u64>,
    /// Whether the minimum feature line is met; `None` without a minimum
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meets_minimum: Option<bool>,
}

impl FirmwareReport {
    fn new(path: Option<PathBuf>, version: Option<FirmwareVersion>, minimum: Option<u64>) -> Self {
        let meets_minimum = minimum.map(|line| {
            version.as_ref().is_some_and(|v| {
                v.compare(&FirmwareComparand::Major(line)) != Ordering::Less
            })
        });
        Self {
            path,
            feature_line: version.as_ref().map(FirmwareVersion::feature_line),
            version,
            min_feature_line: minimum,
            meets_minimum,
        }
    }

    fn to_text(&self) -> String {
        let mut out = String::new();
        if let Some(path) = &self.path {
            let _ = writeln!(out, "Firmware checkout: {}", path.display());
        }
        match &self.version {
            Some(version) => {
                let _ = writeln!(out, "Version:           {version}");
                let release = version
                    .release
                    .iter()
                    .map(u64::to_string)
                    .collect::<Vec<_>>()
                    .join(".");
                let kind = if version.is_untagged() {
                    "untagged".to_string()
                } else if version.is_development() {
                    format!("{} commits after v{release}", version.commit_depth)
                } else {
                    format!("tag v{release}")
                };
                let dirty = if version.dirty { ", dirty" } else { "" };
                let _ = writeln!(out, "Build:             {kind}{dirty}");
            }
            None => {
                let _ = writeln!(out, "Version:           {UNKNOWN_VERSION}");
            }
        }
        if let (Some(line), Some(ok)) = (self.min_feature_line, self.meets_minimum) {
            let verdict = if ok { "met" } else { "NOT met" };
            let _ = writeln!(out, "Minimum line {line}:   {verdict}");
        }
        out
    }
}

/// Build the report from a describe string, or from the cached installation.
pub fn inspect_firmware(
    config: &FirmwareConfig,
    describe: Option<&str>,
    cache: &InstallationCache,
    source: &dyn VersionSource,
) -> Result<FirmwareReport> {
    if let Some(describe) = describe {
        let version = FirmwareVersion::parse(describe)
            .with_context(|| format!("parsing describe string '{describe}'"))?;
        return Ok(FirmwareReport::new(
            None,
            Some(version),
            config.min_feature_line,
        ));
    }

    let locator = InstallationLocator::from_config(config);
    let installation = cache
        .get_or_locate(&locator, source)
        .context("locating the firmware checkout")?;
    Ok(FirmwareReport::new(
        Some(installation.path.clone()),
        installation.version.clone(),
        config.min_feature_line,
    ))
}

/// Run the `firmware` command, returning the desired exit code.
pub fn run_firmware(
    config: &FirmwareConfig,
    describe: Option<&str>,
    cache: &InstallationCache,
    source: &dyn VersionSource,
    format: OutputFormat,
) -> Result<i32> {
    let report = inspect_firmware(config, describe, cache, source)?;
    if report.meets_minimum == Some(false) && report.version.is_none() {
        tracing::warn!("Firmware version unknown; cannot confirm the minimum feature line");
    }
    emit(format, &report, &report.to_text())?;
    Ok(exit_code(report.meets_minimum.unwrap_or(true)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::firmware::NoVersionSource;
    use std::path::Path;

    struct FixedSource(&'static str);

    impl VersionSource for FixedSource {
        fn describe(&self, _path: &Path) -> Option<String> {
            Some(self.0.to_string())
        }
    }

    fn minimum(line: u64) -> FirmwareConfig {
        FirmwareConfig {
            min_feature_line: Some(line),
            ..FirmwareConfig::default()
        }
    }

    #[test]
    fn test_describe_argument_skips_lookup() {
        let cache = InstallationCache::new();
        let report = inspect_firmware(
            &minimum(12),
            Some("v0.12.0-45-gdeadbee-dirty"),
            &cache,
            &NoVersionSource,
        )
        .unwrap();
        assert!(cache.get().is_none());
        assert_eq!(report.feature_line, Some(12));
        assert_eq!(report.meets_minimum, Some(true));
        insta::assert_snapshot!(report.to_text(), @r"
        Version:           v0.12.0-45-gdeadbee-dirty
        Build:             45 commits after v0.12.0, dirty
        Minimum line 12:   met
        ");
    }

    #[test]
    fn test_malformed_describe_argument() {
        let cache = InstallationCache::new();
        let err = inspect_firmware(
            &FirmwareConfig::default(),
            Some("v0.12-1"),
            &cache,
            &NoVersionSource,
        )
        .unwrap_err();
        assert!(err.to_string().contains("v0.12-1"));
    }

    #[test]
    fn test_located_installation() {
        let dir = tempfile::tempdir().unwrap();
        let config = FirmwareConfig {
            path: Some(dir.path().to_path_buf()),
            min_feature_line: Some(13),
            ..FirmwareConfig::default()
        };
        let cache = InstallationCache::new();
        let report =
            inspect_firmware(&config, None, &cache, &FixedSource("v0.12.0-3-gabc")).unwrap();
        assert_eq!(report.path.as_deref(), Some(dir.path()));
        assert_eq!(report.meets_minimum, Some(false));
        assert!(cache.get().is_some());
    }

    #[test]
    fn test_unknown_version_fails_minimum() {
        let dir = tempfile::tempdir().unwrap();
        let config = FirmwareConfig {
            path: Some(dir.path().to_path_buf()),
            min_feature_line: Some(1),
            ..FirmwareConfig::default()
        };
        let report =
            inspect_firmware(&config, None, &InstallationCache::new(), &NoVersionSource).unwrap();
        assert!(report.version.is_none());
        assert_eq!(report.meets_minimum, Some(false));
        assert!(report.to_text().contains(UNKNOWN_VERSION));
    }
}
