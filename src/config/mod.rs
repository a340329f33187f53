//! Configuration module for board2kconf.
//!
//! This module provides:
//! - Type-safe configuration structures
//! - Validation for all configuration values
//! - YAML config file loading and discovery
//! - CLI argument merging
//!
//! # Configuration File
//!
//! Place a `.board2kconf.yaml` file in your project root or `~/.config/board2kconf/`:
//!
//! ```yaml
//! firmware:
//!   path: /home/pi/klipper
//!   min_feature_line: 12
//! dependencies:
//!   requirements:
//!     - urwid >=2.1, !=2.1.1
//! ```

pub mod file;
mod types;
mod validation;

pub use types::{
    AppConfig, AppConfigBuilder, DependencyConfig, FirmwareConfig, OutputConfig, OutputFormat,
};
pub use validation::{ConfigError, Validatable};

pub use file::{
    discover_config_file, generate_example_config, load_config_file, load_or_default,
    ConfigFileError,
};

/// Generate a JSON Schema for the `AppConfig` configuration format.
///
/// Editors can use it to validate and autocomplete `.board2kconf.yaml` files.
#[must_use]
pub fn generate_json_schema() -> String {
    let schema = schemars::schema_for!(AppConfig);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_schema_lists_sections() {
        let schema = generate_json_schema();
        assert!(schema.contains("\"firmware\""));
        assert!(schema.contains("\"min_feature_line\""));
        assert!(schema.contains("\"requirements\""));
    }
}
