//! Named dependencies and the installed distributions they are checked against.

use super::number::VersionNumber;
use super::requirement::{parse_specifiers, RequirementSpecifier};
use crate::error::{ErrorContext, Result, VersionError};
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static DEPENDENCY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)^\s*
        (?P<name>[A-Za-z0-9](?:[A-Za-z0-9._-]*[A-Za-z0-9])?)
        \s*(?:\[(?P<extras>[^\]]*)\])?
        \s*(?P<specs>[^;]*?)
        \s*(?:;\s*(?P<marker>.*?))?
        \s*$",
    )
    .expect("static regex")
});

/// An installed distribution: a name and the version it reports.
#[derive(Debug, Clone, Serialize)]
pub struct Distribution {
    pub name: String,
    pub version: VersionNumber,
}

impl Distribution {
    pub fn new(name: impl Into<String>, version: VersionNumber) -> Self {
        Self {
            name: name.into(),
            version,
        }
    }
}

impl FromStr for Distribution {
    type Err = VersionError;

    /// Parse `name=version`, or the `name==version` form `pip freeze` prints.
    /// Versions outside the grammar are kept literal.
    fn from_str(s: &str) -> Result<Self> {
        let (name, version) = s
            .split_once('=')
            .ok_or_else(|| VersionError::malformed(s, "expected NAME=VERSION"))?;
        let version = version.strip_prefix('=').unwrap_or(version);
        if version.trim().is_empty() || version.starts_with('=') {
            return Err(VersionError::malformed(s, "expected NAME=VERSION"));
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(VersionError::malformed(s, "distribution name is empty"));
        }
        Ok(Self::new(name, VersionNumber::parse_or_literal(version)))
    }
}

/// A named dependency with the specifiers an installed version must meet.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Dependency {
    pub distro_name: String,
    pub specifiers: Vec<RequirementSpecifier>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extras: Vec<String>,
    /// Environment marker, kept verbatim and never evaluated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<String>,
}

impl Dependency {
    pub fn new(distro_name: impl Into<String>, specifiers: Vec<RequirementSpecifier>) -> Self {
        Self {
            distro_name: distro_name.into(),
            specifiers,
            ..Self::default()
        }
    }

    /// Whether `distribution` satisfies every specifier.
    ///
    /// A distribution with a different name never satisfies the dependency.
    /// Evaluation stops at the first failing specifier; a dependency without
    /// specifiers is satisfied by any version.
    pub fn satisfied_by(&self, distribution: &Distribution) -> Result<bool> {
        if distribution.name != self.distro_name {
            return Ok(false);
        }

        for spec in &self.specifiers {
            if !spec.satisfied_by(&distribution.version)? {
                tracing::debug!(
                    "{} {} does not satisfy {spec}",
                    distribution.name,
                    distribution.version
                );
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl FromStr for Dependency {
    type Err = VersionError;

    /// Parse a requirement line such as `urwid[curses] >=2.1,!=2.1.1 ; python_version >= "3.9"`.
    fn from_str(s: &str) -> Result<Self> {
        let caps = DEPENDENCY_RE
            .captures(s)
            .ok_or_else(|| VersionError::malformed(s, "not a dependency requirement"))?;

        let distro_name = caps["name"].to_string();
        let extras = caps
            .name("extras")
            .map(|m| {
                m.as_str()
                    .split(',')
                    .map(str::trim)
                    .filter(|e| !e.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let specs = caps.name("specs").map_or("", |m| m.as_str()).trim();
        let specs = specs
            .strip_prefix('(')
            .and_then(|inner| inner.strip_suffix(')'))
            .unwrap_or(specs);
        let specifiers =
            parse_specifiers(specs).with_context(|| format!("dependency '{distro_name}'"))?;

        let marker = caps
            .name("marker")
            .map(|m| m.as_str().trim().to_string())
            .filter(|m| !m.is_empty());

        Ok(Self {
            distro_name,
            specifiers,
            extras,
            marker,
        })
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.distro_name)?;
        if !self.extras.is_empty() {
            write!(f, "[{}]", self.extras.join(","))?;
        }
        let specs: Vec<String> = self.specifiers.iter().map(ToString::to_string).collect();
        if !specs.is_empty() {
            write!(f, "{}", specs.join(","))?;
        }
        if let Some(marker) = &self.marker {
            write!(f, "; {marker}")?;
        }
        Ok(())
    }
}
