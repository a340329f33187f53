//! `satisfies` command handler.
//!
//! Checks one version against a comma-separated specifier list.

use super::{emit, exit_code};
use crate::config::OutputFormat;
use crate::version::{parse_specifiers, RequirementSpecifier, VersionNumber};
use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt::Write as _;

/// Result of one specifier against the candidate.
#[derive(Debug, Clone, Serialize)]
pub struct SpecifierOutcome {
    pub specifier: RequirementSpecifier,
    pub satisfied: bool,
}

/// Result of a `satisfies` run.
#[derive(Debug, Clone, Serialize)]
pub struct SatisfiesReport {
    pub version: VersionNumber,
    pub satisfied: bool,
    pub specifiers: Vec<SpecifierOutcome>,
}

impl SatisfiesReport {
    fn to_text(&self) -> String {
        let mut out = String::new();
        let verdict = if self.satisfied {
            "satisfies"
        } else {
            "does not satisfy"
        };
        let _ = writeln!(out, "{} {verdict} the requirement", self.version);
        for outcome in &self.specifiers {
            let mark = if outcome.satisfied { "ok  " } else { "FAIL" };
            let _ = writeln!(out, "  [{mark}] {}", outcome.specifier);
        }
        out
    }
}

/// Evaluate every specifier in `requirements` against `version`.
///
/// A candidate outside the version grammar is kept literal, so only `===`
/// and `!=` style checks can succeed against it.
pub fn evaluate_requirements(version: &str, requirements: &str) -> Result<SatisfiesReport> {
    let candidate = VersionNumber::parse_or_literal(version);
    if candidate.is_literal() {
        tracing::warn!("'{version}' is not a recognized version; comparing it literally");
    }
    let specs = parse_specifiers(requirements)
        .with_context(|| format!("parsing requirement '{requirements}'"))?;

    let specifiers = specs
        .into_iter()
        .map(|specifier| {
            let satisfied = specifier
                .satisfied_by(&candidate)
                .with_context(|| format!("evaluating '{specifier}'"))?;
            Ok(SpecifierOutcome {
                specifier,
                satisfied,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(SatisfiesReport {
        satisfied: specifiers.iter().all(|o| o.satisfied),
        version: candidate,
        specifiers,
    })
}

/// Run the `satisfies` command, returning the desired exit code.
pub fn run_satisfies(version: &str, requirements: &str, format: OutputFormat) -> Result<i32> {
    let report = evaluate_requirements(version, requirements)?;
    emit(format, &report, &report.to_text())?;
    Ok(exit_code(report.satisfied))
}
