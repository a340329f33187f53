//! Configuration validation for board2kconf.

use super::types::{AppConfig, DependencyConfig, FirmwareConfig, OutputConfig};
use crate::version::Dependency;

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.firmware.validate());
        errors.extend(self.dependencies.validate());
        errors.extend(self.output.validate());
        errors
    }
}

impl Validatable for FirmwareConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if let Some(path) = &self.path {
            if path.as_os_str().is_empty() {
                errors.push(ConfigError {
                    field: "firmware.path".to_string(),
                    message: "Path must not be empty".to_string(),
                });
            }
        }
        for (i, path) in self.search_paths.iter().enumerate() {
            if path.as_os_str().is_empty() {
                errors.push(ConfigError {
                    field: format!("firmware.search_paths[{i}]"),
                    message: "Path must not be empty".to_string(),
                });
            }
        }
        errors
    }
}

impl Validatable for DependencyConfig {
    fn validate(&self) -> Vec<ConfigError> {
        self.requirements
            .iter()
            .enumerate()
            .filter_map(|(i, line)| {
                line.parse::<Dependency>().err().map(|e| ConfigError {
                    field: format!("dependencies.requirements[{i}]"),
                    message: e.to_string(),
                })
            })
            .collect()
    }
}

impl Validatable for OutputConfig {
    fn validate(&self) -> Vec<ConfigError> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AppConfig::default().is_valid());
    }

    #[test]
    fn test_bad_requirement_reported_per_entry() {
        let config = AppConfig::builder()
            .requirement("urwid >=2.1")
            .requirement("tomli =>2.0")
            .requirement("pyserial >= x.y")
            .build();
        let errors = config.validate();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "dependencies.requirements[1]");
        assert!(errors[0].message.contains("=>"));
        assert_eq!(errors[1].field, "dependencies.requirements[2]");
    }

    #[test]
    fn test_empty_paths_rejected() {
        let config = AppConfig::builder()
            .firmware_path(Some(PathBuf::new()))
            .search_path("")
            .build();
        let fields: Vec<String> = config.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["firmware.path", "firmware.search_paths[0]"]);
    }
}
