//! **Version identity and comparison for firmware tooling.**
//!
//! `board2kconf` answers two questions a board-configuration tool keeps
//! asking: "does this installed package satisfy that requirement line?" and
//! "which firmware build is checked out here?".
//!
//! ## Core Concepts & Modules
//!
//! - **[`version`]**: [`VersionNumber`] parses PEP 440 style version strings
//!   and compares them with the release-segment alignment rules used by
//!   requirement checks. [`RequirementSpecifier`] evaluates one
//!   `<operator><version>` clause and [`Dependency`] evaluates a whole
//!   requirement line against an installed [`Distribution`].
//! - **[`firmware`]**: [`FirmwareVersion`] reads `git describe` output of a
//!   firmware checkout. [`InstallationCache`] locates the checkout once per
//!   process.
//! - **[`config`]**: YAML configuration with discovery, validation and a
//!   JSON Schema.
//! - **[`cli`]**: testable handlers behind the `board2kconf` binary.
//!
//! ## Checking a requirement
//!
//! ```
//! use board2kconf::{RequirementSpecifier, VersionNumber};
//!
//! let spec: RequirementSpecifier = ">= 1.0".parse()?;
//! assert!(spec.satisfied_by(&VersionNumber::parse("1.0.0")?)?);
//! assert!(!spec.satisfied_by(&VersionNumber::parse("0.9")?)?);
//! # Ok::<(), board2kconf::VersionError>(())
//! ```
//!
//! ## Checking a dependency line
//!
//! ```
//! use board2kconf::{Dependency, Distribution};
//!
//! let dep: Dependency = "urwid >=2.1, !=2.1.1".parse()?;
//! assert!(dep.satisfied_by(&Distribution::new("urwid", "2.2".parse()?))?);
//! assert!(!dep.satisfied_by(&Distribution::new("urwid", "2.1.1".parse()?))?);
//! # Ok::<(), board2kconf::VersionError>(())
//! ```
//!
//! ## Reading a firmware build
//!
//! ```
//! use board2kconf::{FirmwareComparand, FirmwareVersion};
//! use std::cmp::Ordering;
//!
//! let fw = FirmwareVersion::parse("v0.12.0-45-gdeadbee")?;
//! assert_eq!(fw.feature_line(), 12);
//! assert!(fw.is_development());
//! assert_eq!(fw.compare(&FirmwareComparand::Major(12)), Ordering::Greater);
//! # Ok::<(), board2kconf::VersionError>(())
//! ```

#![warn(clippy::unwrap_used)]

pub mod cli;
pub mod config;
pub mod error;
pub mod firmware;
pub mod version;

pub use config::{AppConfig, AppConfigBuilder, OutputFormat};
pub use error::{ErrorContext, Result, VersionError};
pub use firmware::{
    FirmwareComparand, FirmwareInstallation, FirmwareVersion, InstallationCache,
    InstallationLocator, VersionSource,
};
pub use version::{
    is_version_like, parse_specifiers, Dependency, Distribution, Operator, Qualifier,
    ReleaseVersion, RequirementSpecifier, VersionNumber,
};
