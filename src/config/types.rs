//! Configuration types for board2kconf.

use crate::error::{ErrorContext, Result};
use crate::version::Dependency;
use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Unified application configuration that can be loaded from CLI args or config files.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// Firmware checkout lookup
    pub firmware: FirmwareConfig,
    /// Dependency requirements checked by `deps`
    pub dependencies: DependencyConfig,
    /// Output configuration (format, colors)
    pub output: OutputConfig,
}

impl AppConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an `AppConfig` builder.
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }
}

// ============================================================================
// Builder for AppConfig
// ============================================================================

/// Builder for constructing `AppConfig` with fluent API.
#[derive(Debug, Default)]
#[must_use]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    /// Set the firmware checkout path.
    pub fn firmware_path(mut self, path: Option<PathBuf>) -> Self {
        self.config.firmware.path = path;
        self
    }

    /// Add an extra directory to search for the checkout.
    pub fn search_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.firmware.search_paths.push(path.into());
        self
    }

    /// Require at least this firmware feature line.
    pub const fn min_feature_line(mut self, line: Option<u64>) -> Self {
        self.config.firmware.min_feature_line = line;
        self
    }

    /// Add a dependency requirement line.
    pub fn requirement(mut self, line: impl Into<String>) -> Self {
        self.config.dependencies.requirements.push(line.into());
        self
    }

    /// Set the output format.
    pub const fn output_format(mut self, format: OutputFormat) -> Self {
        self.config.output.format = format;
        self
    }

    /// Disable colored output.
    pub const fn no_color(mut self, no_color: bool) -> Self {
        self.config.output.no_color = no_color;
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}

// ============================================================================
// Section Types
// ============================================================================

/// Where to find the firmware checkout and what it must provide.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct FirmwareConfig {
    /// Explicit checkout path; overrides discovery
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Extra directories searched before the default locations
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub search_paths: Vec<PathBuf>,
    /// Minimum feature line (second tag component) the checkout must reach
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_feature_line: Option<u64>,
}

/// Dependency requirements, one requirement line per entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DependencyConfig {
    /// Lines such as `urwid >=2.1, !=2.1.1`
    pub requirements: Vec<String>,
}

impl DependencyConfig {
    /// Parse every requirement line.
    pub fn parse(&self) -> Result<Vec<Dependency>> {
        self.requirements
            .iter()
            .enumerate()
            .map(|(i, line)| {
                line.parse::<Dependency>()
                    .with_context(|| format!("dependencies.requirements[{i}]"))
            })
            .collect()
    }
}

/// Output format for command results
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// Structured JSON output
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// Result format
    pub format: OutputFormat,
    /// Disable colored output
    pub no_color: bool,
}

impl OutputConfig {
    /// Whether ANSI colour may be used, given whether `NO_COLOR` is set.
    #[must_use]
    pub const fn use_color(&self, no_color_env: bool) -> bool {
        !self.no_color && !no_color_env
    }
}
