//! `deps` command handler.
//!
//! Checks the configured dependency requirements against the installed
//! distributions supplied by the caller.

use super::{emit, exit_code};
use crate::config::AppConfig;
use crate::version::{Dependency, Distribution, VersionNumber};
use anyhow::Result;
use serde::Serialize;
use std::fmt::Write as _;

/// Outcome for one dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyStatus {
    Satisfied,
    Unsatisfied,
    /// No installed distribution with this name was supplied
    Missing,
}

/// One row of the `deps` report.
#[derive(Debug, Clone, Serialize)]
pub struct DependencyReport {
    pub dependency: Dependency,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installed: Option<VersionNumber>,
    pub status: DependencyStatus,
}

/// Check each dependency against the matching installed distribution.
pub fn check_dependencies(
    dependencies: Vec<Dependency>,
    installed: &[Distribution],
) -> Result<Vec<DependencyReport>> {
    dependencies
        .into_iter()
        .map(|dependency| -> Result<DependencyReport> {
            let found = installed.iter().find(|d| d.name == dependency.distro_name);
            let status = match found {
                None => DependencyStatus::Missing,
                Some(dist) => {
                    if dependency.satisfied_by(dist)? {
                        DependencyStatus::Satisfied
                    } else {
                        DependencyStatus::Unsatisfied
                    }
                }
            };
            Ok(DependencyReport {
                installed: found.map(|d| d.version.clone()),
                dependency,
                status,
            })
        })
        .collect()
}

fn to_text(reports: &[DependencyReport]) -> String {
    if reports.is_empty() {
        return "No dependencies configured\n".to_string();
    }
    let mut out = String::new();
    for report in reports {
        let installed = report
            .installed
            .as_ref()
            .map_or_else(|| "not installed".to_string(), ToString::to_string);
        let status = match report.status {
            DependencyStatus::Satisfied => "ok",
            DependencyStatus::Unsatisfied => "UNSATISFIED",
            DependencyStatus::Missing => "MISSING",
        };
        let _ = writeln!(out, "{:<12} {} (installed: {installed})", status, report.dependency);
    }
    out
}

/// Run the `deps` command, returning the desired exit code.
pub fn run_deps(config: &AppConfig, installed: &[Distribution]) -> Result<i32> {
    let dependencies = config.dependencies.parse()?;
    tracing::debug!("Checking {} dependencies", dependencies.len());
    let reports = check_dependencies(dependencies, installed)?;
    emit(config.output.format, &reports, &to_text(&reports))?;
    Ok(exit_code(
        reports
            .iter()
            .all(|r| r.status == DependencyStatus::Satisfied),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deps(lines: &[&str]) -> Vec<Dependency> {
        lines.iter().map(|l| l.parse().unwrap()).collect()
    }

    fn installed(pairs: &[&str]) -> Vec<Distribution> {
        pairs.iter().map(|p| p.parse().unwrap()).collect()
    }

    #[test]
    fn test_statuses() {
        let reports = check_dependencies(
            deps(&["urwid >=2.1, !=2.1.1", "tomli", "pyserial >=3.4"]),
            &installed(&["urwid=2.1.1", "pyserial=3.5"]),
        )
        .unwrap();
        let statuses: Vec<DependencyStatus> = reports.iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            vec![
                DependencyStatus::Unsatisfied,
                DependencyStatus::Missing,
                DependencyStatus::Satisfied
            ]
        );
        assert!(reports[1].installed.is_none());
    }

    #[test]
    fn test_text_report() {
        let reports =
            check_dependencies(deps(&["urwid >=2.1"]), &installed(&["urwid=2.2"])).unwrap();
        assert_eq!(
            to_text(&reports),
            "ok           urwid>=2.1 (installed: 2.2)\n"
        );
        assert_eq!(to_text(&[]), "No dependencies configured\n");
    }

    #[test]
    fn test_json_report() {
        let reports =
            check_dependencies(deps(&["tomli >=1.0"]), &installed(&["urwid=2.2"])).unwrap();
        insta::assert_json_snapshot!(reports, @r#"
        [
          {
            "dependency": {
              "distro_name": "tomli",
              "specifiers": [
                ">=1.0"
              ]
            },
            "status": "missing"
          }
        ]
        "#);
    }
}
